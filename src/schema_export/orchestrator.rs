//! Drives the per-dialect export runs.
//!
//! Each run is a pure function of (schema source, dialect, output
//! directory): a fresh generation context, a rendered raw script written
//! to the derived path, then the cleanup filter over that path in place.
//! Nothing is shared between runs, so one dialect's configuration cannot
//! contaminate another's output.

use crate::error::{SchemaGenError, SchemaGenResult};
use crate::types::{SchemaCatalog, SchemaSource};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use super::cleanup::clean_ddl_file;
use super::dialect::{Dialect, GenerationContext};
use super::renderer::DdlRenderer;

/// Outcome of one dialect's export run
#[derive(Debug)]
pub struct DialectOutcome {
    /// Dialect this outcome belongs to
    pub dialect: Dialect,
    /// Path of the cleaned artifact, or the error that stopped this run
    pub result: SchemaGenResult<PathBuf>,
}

/// Summary of a full multi-dialect export run
#[derive(Debug)]
pub struct ExportSummary {
    /// Per-dialect outcomes, in export order
    pub outcomes: Vec<DialectOutcome>,
}

impl ExportSummary {
    /// Whether every dialect produced its artifact
    pub fn is_successful(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }

    /// Paths of the artifacts that were written
    pub fn written_files(&self) -> Vec<&Path> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().map(PathBuf::as_path))
            .collect()
    }
}

/// Artifact path for one (dialect, namespace) run.
///
/// `ddl_<dialect>_<namespace with dots as underscores>.sql`, inside the
/// output directory when one is given, otherwise relative to the current
/// directory.
pub fn output_path(dialect: Dialect, namespace: &str, output_dir: Option<&Path>) -> PathBuf {
    let file_name = format!("ddl_{}_{}.sql", dialect.name(), namespace.replace('.', "_"));
    match output_dir {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}

/// Export one dialect: render the raw script, write it, clean it in place.
///
/// The generation context is built fresh here and dropped when the run
/// ends; it is never reused across dialects.
pub fn export_dialect(
    source: &SchemaSource,
    dialect: Dialect,
    output_dir: Option<&Path>,
) -> SchemaGenResult<PathBuf> {
    let context = GenerationContext::for_dialect(dialect);
    let script = DdlRenderer::new(context).render(source);

    let path = output_path(dialect, &source.namespace, output_dir);
    info!("Writing file {}", path.display());
    fs::write(&path, script).map_err(|e| {
        SchemaGenError::generation(
            dialect.name(),
            format!("could not write {}: {}", path.display(), e),
        )
    })?;

    clean_ddl_file(&path).map_err(|e| SchemaGenError::cleanup(path.display().to_string(), e))?;
    Ok(path)
}

/// Export every dialect in the fixed order for one namespace.
///
/// An unresolvable namespace is a configuration error and fails the run
/// before any dialect is attempted. Per-dialect failures are reported and
/// recorded, and the remaining dialects are still attempted.
pub fn export_all(
    catalog: &SchemaCatalog,
    namespace: &str,
    output_dir: Option<&Path>,
) -> SchemaGenResult<ExportSummary> {
    let source = catalog.resolve(namespace)?;
    info!(
        "Exporting namespace {} ({} entities) for {} dialects",
        namespace,
        source.entities.len(),
        Dialect::EXPORTED.len()
    );

    let mut outcomes = Vec::new();
    for dialect in Dialect::EXPORTED {
        let result = export_dialect(source, dialect, output_dir);
        if let Err(e) = &result {
            error!("Export failed for dialect {}: {}", dialect, e);
        }
        outcomes.push(DialectOutcome { dialect, result });
    }
    Ok(ExportSummary { outcomes })
}

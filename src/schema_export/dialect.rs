use crate::types::{ColumnType, TypeKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Target database dialects understood by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dialect {
    Postgres,
    Oracle,
    Mysql,
    Hsql,
}

impl Dialect {
    /// Dialects written by a full export run, in fixed order
    pub const EXPORTED: [Dialect; 3] = [Dialect::Postgres, Dialect::Oracle, Dialect::Mysql];

    /// Lowercase dialect name, used in artifact file names and diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Postgres => "postgres",
            Dialect::Oracle => "oracle",
            Dialect::Mysql => "mysql",
            Dialect::Hsql => "hsql",
        }
    }

    /// Whether the dialect models sequences as first-class schema objects
    pub fn supports_sequences(&self) -> bool {
        !matches!(self, Dialect::Mysql)
    }

    /// Vendor SQL type for a portable column type, before overrides
    fn default_sql_type(&self, column_type: &ColumnType) -> String {
        match self {
            Dialect::Postgres => match column_type {
                ColumnType::Varchar(Some(len)) => format!("varchar({})", len),
                ColumnType::Varchar(None) => "varchar(255)".to_string(),
                ColumnType::Text => "text".to_string(),
                ColumnType::Integer => "int4".to_string(),
                ColumnType::BigInt => "int8".to_string(),
                ColumnType::Double => "float8".to_string(),
                ColumnType::Numeric(precision, scale) => {
                    numeric_sql("numeric", *precision, *scale)
                }
                ColumnType::Boolean => "boolean".to_string(),
                ColumnType::Timestamp => "timestamp".to_string(),
                ColumnType::Date => "date".to_string(),
                ColumnType::Blob => "bytea".to_string(),
            },
            Dialect::Oracle => match column_type {
                ColumnType::Varchar(Some(len)) => format!("varchar2({} char)", len),
                ColumnType::Varchar(None) => "varchar2(255 char)".to_string(),
                ColumnType::Text => "clob".to_string(),
                ColumnType::Integer => "number(10,0)".to_string(),
                ColumnType::BigInt => "number(19,0)".to_string(),
                ColumnType::Double => "double precision".to_string(),
                ColumnType::Numeric(precision, scale) => numeric_sql("number", *precision, *scale),
                ColumnType::Boolean => "number(1,0)".to_string(),
                ColumnType::Timestamp => "timestamp".to_string(),
                ColumnType::Date => "date".to_string(),
                ColumnType::Blob => "blob".to_string(),
            },
            Dialect::Mysql => match column_type {
                ColumnType::Varchar(Some(len)) => format!("varchar({})", len),
                ColumnType::Varchar(None) => "varchar(255)".to_string(),
                ColumnType::Text => "longtext".to_string(),
                ColumnType::Integer => "integer".to_string(),
                ColumnType::BigInt => "bigint".to_string(),
                ColumnType::Double => "double precision".to_string(),
                ColumnType::Numeric(precision, scale) => {
                    numeric_sql("decimal", *precision, *scale)
                }
                ColumnType::Boolean => "bit".to_string(),
                // No fractional seconds without an explicit precision; full
                // runs install a datetime(3) override on top of this.
                ColumnType::Timestamp => "datetime".to_string(),
                ColumnType::Date => "date".to_string(),
                ColumnType::Blob => "longblob".to_string(),
            },
            Dialect::Hsql => match column_type {
                ColumnType::Varchar(Some(len)) => format!("varchar({})", len),
                ColumnType::Varchar(None) => "varchar(255)".to_string(),
                ColumnType::Text => "longvarchar".to_string(),
                ColumnType::Integer => "integer".to_string(),
                ColumnType::BigInt => "bigint".to_string(),
                ColumnType::Double => "double".to_string(),
                ColumnType::Numeric(precision, scale) => {
                    numeric_sql("numeric", *precision, *scale)
                }
                ColumnType::Boolean => "boolean".to_string(),
                ColumnType::Timestamp => "timestamp".to_string(),
                ColumnType::Date => "date".to_string(),
                ColumnType::Blob => "blob".to_string(),
            },
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn numeric_sql(base: &str, precision: Option<u32>, scale: Option<u32>) -> String {
    match (precision, scale) {
        (Some(p), Some(s)) => format!("{}({},{})", base, p, s),
        (Some(p), None) => format!("{}({})", base, p),
        _ => base.to_string(),
    }
}

/// Pluggable column-type override table applied on top of dialect defaults
#[derive(Debug, Clone, Default)]
pub struct TypeOverrides {
    overrides: HashMap<TypeKind, String>,
}

impl TypeOverrides {
    /// Create an empty override table
    pub fn new() -> Self {
        Self {
            overrides: HashMap::new(),
        }
    }

    /// Register a vendor SQL type for every column of the given kind
    pub fn register(&mut self, kind: TypeKind, sql: impl Into<String>) {
        self.overrides.insert(kind, sql.into());
    }

    /// Look up the override for a type kind
    pub fn lookup(&self, kind: TypeKind) -> Option<&str> {
        self.overrides.get(&kind).map(String::as_str)
    }
}

/// Immutable per-run bundle of dialect and column-type overrides.
///
/// One context is built fresh for each (source, dialect) run and never
/// shared across runs, so a dialect-specific override cannot leak into
/// another dialect's output.
#[derive(Debug, Clone)]
pub struct GenerationContext {
    dialect: Dialect,
    overrides: TypeOverrides,
}

impl GenerationContext {
    /// Build a fresh context for one dialect run.
    ///
    /// MySQL stores timestamps with sub-second precision only when the
    /// column is declared as datetime(3), so its context installs that
    /// override; the other dialects keep their native timestamp type.
    pub fn for_dialect(dialect: Dialect) -> Self {
        let mut overrides = TypeOverrides::new();
        if dialect == Dialect::Mysql {
            overrides.register(TypeKind::Timestamp, "datetime(3)");
        }
        Self { dialect, overrides }
    }

    /// Add a column-type override to this context
    pub fn with_override(mut self, kind: TypeKind, sql: impl Into<String>) -> Self {
        self.overrides.register(kind, sql);
        self
    }

    /// Dialect this context generates for
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Vendor SQL type for a portable column type; overrides win over the
    /// dialect default
    pub fn sql_type(&self, column_type: &ColumnType) -> String {
        match self.overrides.lookup(column_type.kind()) {
            Some(sql) => sql.to_string(),
            None => self.dialect.default_sql_type(column_type),
        }
    }
}

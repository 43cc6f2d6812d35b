//! Removes drop statements from generated schema-creation scripts.
//!
//! The raw script produced for a dialect starts with statements that tear
//! down any existing schema (drop table, drop sequence, alter table ...
//! drop constraint). Those are useless in a script meant only to create a
//! fresh database, so they are filtered out before the artifact is
//! published. The filter works on the exporter's line convention alone:
//! one statement-fragment per line, statement blocks separated by a single
//! blank line. It never parses SQL.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::mem;
use std::path::Path;
use tempfile::NamedTempFile;

/// States of the line filter.
///
/// The block-skip and lookahead rules live entirely in the transitions, so
/// each rule can be exercised on its own.
#[derive(Debug)]
enum FilterState {
    /// Looking at the first line of the next statement block
    Scanning,
    /// A one-line drop statement was discarded; its trailing separator
    /// line is discarded too
    SkipSeparator,
    /// An "alter table" line is held until its successor decides whether
    /// the block is kept or dropped
    PendingAlter(String),
    /// Inside a drop-constraint block; lines are discarded through the
    /// next blank line inclusive
    SkippingUntilBlank,
}

/// Streaming filter over the lines of a raw DDL script.
///
/// Fed one line at a time; kept lines come back in input order, whole
/// statement blocks at a time. Matching is raw substring containment on
/// the lowercase keywords the exporter emits, checked in fixed order:
/// "drop table", then "drop sequence", then "alter table".
pub struct CruftFilter {
    state: FilterState,
}

impl CruftFilter {
    pub fn new() -> Self {
        Self {
            state: FilterState::Scanning,
        }
    }

    /// Feed one input line; lines to keep are appended to `out`
    pub fn feed(&mut self, line: &str, out: &mut Vec<String>) {
        let state = mem::replace(&mut self.state, FilterState::Scanning);
        self.state = match state {
            FilterState::Scanning => {
                if line.contains("drop table") || line.contains("drop sequence") {
                    FilterState::SkipSeparator
                } else if line.contains("alter table") {
                    if line.contains("drop") {
                        // One-line drop-constraint form; skip the rest of
                        // the block as well
                        FilterState::SkippingUntilBlank
                    } else {
                        FilterState::PendingAlter(line.to_owned())
                    }
                } else {
                    out.push(line.to_owned());
                    FilterState::Scanning
                }
            }
            // The separator after a one-line drop goes regardless of content
            FilterState::SkipSeparator => FilterState::Scanning,
            FilterState::PendingAlter(first) => {
                if line.contains("drop") {
                    FilterState::SkippingUntilBlank
                } else {
                    // An add-constraint or add-key block: keep both lines,
                    // original order
                    out.push(first);
                    out.push(line.to_owned());
                    FilterState::Scanning
                }
            }
            FilterState::SkippingUntilBlank => {
                if line.is_empty() {
                    FilterState::Scanning
                } else {
                    FilterState::SkippingUntilBlank
                }
            }
        };
    }

    /// Flush at end of stream.
    ///
    /// End of stream is an implicit block terminator: a drop block missing
    /// its trailing blank line simply ends, and an "alter table" line with
    /// no successor is kept rather than lost.
    pub fn finish(&mut self, out: &mut Vec<String>) {
        if let FilterState::PendingAlter(first) =
            mem::replace(&mut self.state, FilterState::Scanning)
        {
            out.push(first);
        }
    }
}

impl Default for CruftFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the filter over a complete script and return the cleaned text
pub fn clean_script(input: &str) -> String {
    let mut filter = CruftFilter::new();
    let mut kept = Vec::new();
    for line in input.lines() {
        filter.feed(line, &mut kept);
    }
    filter.finish(&mut kept);

    let mut out = kept.join("\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

/// Clean a generated DDL file in place.
///
/// The cleaned text goes to a temporary file in the same directory, which
/// is atomically persisted over the original on success. A reader of
/// `path` therefore sees either the raw script or the complete cleaned
/// one, never a partial write; on any failure the raw file is left
/// untouched and the temporary file is removed when dropped.
pub fn clean_ddl_file(path: &Path) -> io::Result<()> {
    let reader = BufReader::new(File::open(path)?);

    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let tmp = match dir {
        Some(dir) => NamedTempFile::new_in(dir)?,
        None => NamedTempFile::new_in(".")?,
    };

    {
        let mut writer = BufWriter::new(tmp.as_file());
        let mut filter = CruftFilter::new();
        let mut kept = Vec::new();

        for line in reader.lines() {
            let line = line?;
            filter.feed(&line, &mut kept);
            for kept_line in kept.drain(..) {
                writer.write_all(kept_line.as_bytes())?;
                writer.write_all(b"\n")?;
            }
        }
        filter.finish(&mut kept);
        for kept_line in kept.drain(..) {
            writer.write_all(kept_line.as_bytes())?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
    }

    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

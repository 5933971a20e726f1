use crate::error::{UnicharError, UnicharResult};
use crate::model::CharacterRecord;
use crate::sources::Source;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// Number of tab-separated fields per table line: name, comment, code, block.
pub const FIELD_COUNT: usize = 4;

/// Loads the prepared flat-file character table.
pub struct TableSource {
    path: PathBuf,
}

impl TableSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Source for TableSource {
    fn scan(&self) -> UnicharResult<Vec<CharacterRecord>> {
        debug!("Reading character table {:?}", self.path);
        let content = fs::read_to_string(&self.path).map_err(|e| UnicharError::io(&self.path, e))?;
        let records = parse_table(&content)?;
        info!("TableSource: loaded {} records", records.len());
        Ok(records)
    }
}

/// Parse a whole table, all or nothing.
///
/// Empty lines are skipped so a trailing newline is harmless. Any other line,
/// one made only of tabs included, must have exactly four fields, the
/// trailing tab of an empty block included.
pub fn parse_table(content: &str) -> UnicharResult<Vec<CharacterRecord>> {
    let mut records = Vec::new();
    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim_end_matches('\r');
        if line.trim_matches(' ').is_empty() {
            continue;
        }
        records.push(parse_line(line, idx + 1)?);
    }
    Ok(records)
}

fn parse_line(line: &str, line_no: usize) -> UnicharResult<CharacterRecord> {
    let fields: Vec<&str> = line.split('\t').collect();
    match fields.as_slice() {
        [name, comment, code, block] => CharacterRecord::new(name, comment, block, code, line_no),
        _ => Err(UnicharError::FieldCount {
            line: line_no,
            found: fields.len(),
        }),
    }
}

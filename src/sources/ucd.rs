//! Offline preparation of the character table from the Unicode Character
//! Database (`Blocks.txt` and `UnicodeData.txt`).

use crate::error::{UnicharError, UnicharResult};
use log::{debug, info, warn};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_UCD_URL: &str = "https://www.unicode.org/Public/UCD/latest/ucd";

const BLOCKS_FILE: &str = "Blocks.txt";
const DATA_FILE: &str = "UnicodeData.txt";

/// Where the UCD files come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UcdSource {
    Remote(String),
    Local(PathBuf),
}

impl UcdSource {
    /// `http(s)://` locations are fetched, anything else is a directory.
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            UcdSource::Remote(location.trim_end_matches('/').to_string())
        } else {
            UcdSource::Local(PathBuf::from(location))
        }
    }

    fn read(&self, file: &str) -> UnicharResult<String> {
        match self {
            UcdSource::Remote(base) => {
                let url = format!("{}/{}", base, file);
                info!("Downloading {}...", url);
                let client = reqwest::blocking::Client::builder()
                    .timeout(Duration::from_secs(60))
                    .build()?;
                let body = client.get(&url).send()?.error_for_status()?.text()?;
                info!("Done");
                Ok(body)
            }
            UcdSource::Local(dir) => {
                let path = dir.join(file);
                debug!("Reading {:?}", path);
                fs::read_to_string(&path).map_err(|e| UnicharError::io(path, e))
            }
        }
    }

    /// Build the full table text from this source.
    pub fn build_table(&self) -> UnicharResult<String> {
        let blocks = BlockIndex::parse(&self.read(BLOCKS_FILE)?)?;
        let data = self.read(DATA_FILE)?;
        Ok(generate_table(&data, &blocks))
    }
}

/// Drop blank lines and `#` comments.
fn clean(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

/// Sorted, non-overlapping code point ranges with their block names.
#[derive(Debug, Clone, Default)]
pub struct BlockIndex {
    ranges: Vec<(u32, u32, String)>,
}

impl BlockIndex {
    pub fn parse(blocks_txt: &str) -> UnicharResult<Self> {
        let re = Regex::new(r"^([0-9A-Fa-f]+)\.\.([0-9A-Fa-f]+)\s*;\s*(.+)$")
            .map_err(|e| UnicharError::Ucd(e.to_string()))?;

        let mut ranges = Vec::new();
        for line in clean(blocks_txt) {
            let caps = re
                .captures(line)
                .ok_or_else(|| UnicharError::Ucd(format!("bad block line: {line}")))?;
            let start = u32::from_str_radix(&caps[1], 16).map_err(|e| UnicharError::Ucd(e.to_string()))?;
            let end = u32::from_str_radix(&caps[2], 16).map_err(|e| UnicharError::Ucd(e.to_string()))?;
            ranges.push((start, end, caps[3].trim().to_string()));
        }
        ranges.sort_by_key(|&(start, _, _)| start);
        debug!("Parsed {} blocks", ranges.len());
        Ok(Self { ranges })
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Binary search for the block containing `code`.
    pub fn locate(&self, code: u32) -> Option<&str> {
        let (mut lo, mut hi) = (0, self.ranges.len());
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let (start, end, name) = &self.ranges[mid];
            if code < *start {
                hi = mid;
            } else if code > *end {
                lo = mid + 1;
            } else {
                return Some(name);
            }
        }
        None
    }
}

/// Turn `UnicodeData.txt` into `name\tcomment\tcode\tblock` lines.
///
/// Lines whose code is not hex or not a scalar value (surrogates) are skipped,
/// the table must only hold characters that decode.
pub fn generate_table(unicode_data: &str, blocks: &BlockIndex) -> String {
    info!("Parsing character data...");
    let mut output = Vec::new();
    let mut skipped = 0usize;

    for line in clean(unicode_data) {
        let attributes: Vec<&str> = line.split(';').collect();
        if attributes.len() < 11 {
            warn!("Skipping short UCD line: {}", line);
            skipped += 1;
            continue;
        }
        let (code, name, comment) = (attributes[0], attributes[1], attributes[10]);

        let Ok(num) = u32::from_str_radix(code, 16) else {
            warn!("Could not convert {}", code);
            skipped += 1;
            continue;
        };
        if char::from_u32(num).is_none() {
            debug!("Skipping non-scalar code {}", code);
            skipped += 1;
            continue;
        }

        let block = blocks.locate(num).unwrap_or_else(|| {
            warn!("Code {} not found in any block", code);
            ""
        });
        output.push(format!("{}\t{}\t{}\t{}", name, comment, code, block));
    }

    info!("Generated {} table lines ({} skipped)", output.len(), skipped);
    output.join("\n")
}

/// Write the table through a temporary file so readers never see a partial one.
pub fn write_table(path: &Path, contents: &str) -> UnicharResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| UnicharError::io(parent, e))?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, contents).map_err(|e| UnicharError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| UnicharError::io(path, e))?;
    info!("Wrote character table to {:?}", path);
    Ok(())
}

use crate::error::{UnicharError, UnicharResult};
use crate::model::CharacterRecord;
use log::debug;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

const ICON_TEMPLATE: &str = r#"
<svg width="100" height="100" xmlns="http://www.w3.org/2000/svg">
  <circle cx="50" cy="50" r="50" fill="white" />
  <text x="50" y="50" dy=".35em" text-anchor="middle" font-family="{font}" font-size="60">{symbol}</text>
</svg>
"#;

/// On-disk cache of per-character SVG icons, one file per code point.
pub struct IconCache {
    dir: PathBuf,
    font: String,
    cache: HashMap<String, PathBuf>,
}

impl IconCache {
    pub fn new(dir: impl Into<PathBuf>, font: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            font: font.into(),
            cache: HashMap::new(),
        }
    }

    /// Path of the icon for `record`, writing it on first use.
    pub fn get(&mut self, record: &CharacterRecord) -> UnicharResult<PathBuf> {
        if let Some(path) = self.cache.get(record.code()) {
            return Ok(path.clone());
        }

        let path = self.dir.join(format!("icon_{}.svg", record.code()));
        if !path.is_file() {
            fs::create_dir_all(&self.dir).map_err(|e| UnicharError::io(&self.dir, e))?;
            debug!("Writing icon {:?}", path);
            fs::write(&path, render_icon(record.character(), &self.font)).map_err(|e| UnicharError::io(&path, e))?;
        }

        self.cache.insert(record.code().to_string(), path.clone());
        Ok(path)
    }
}

pub fn render_icon(symbol: char, font: &str) -> String {
    ICON_TEMPLATE
        .replace("{font}", &escape_xml(font))
        .replace("{symbol}", &escape_xml(&glyph(symbol)))
}

// Control characters are not allowed in XML text
fn glyph(c: char) -> String {
    if c.is_control() {
        '\u{FFFD}'.to_string()
    } else {
        c.to_string()
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

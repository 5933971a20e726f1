use crate::entities::html_entity;
use crate::model::CharacterRecord;
use crate::ui::icons::IconCache;
use log::warn;
use serde::Serialize;
use std::path::PathBuf;

/// A search hit ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultItem {
    pub icon: Option<PathBuf>,
    pub title: String,
    pub description: String,
    pub copy_text: String,  // Enter copies the character
    pub copy_code: String,  // Alt+Enter copies the code
}

impl ResultItem {
    pub fn from_record(record: &CharacterRecord, icon: Option<PathBuf>) -> Self {
        let html = html_entity(record.character())
            .map(|entity| format!(" - HTML: {}", entity))
            .unwrap_or_default();

        Self {
            icon,
            title: format!("{} - {}", capitalize(record.name()), record.character()),
            description: format!("{}{} - Alt+Enter: U+{}", record.block(), html, record.code()),
            copy_text: record.character().to_string(),
            copy_code: record.code().to_string(),
        }
    }
}

/// Turn ranked records into display items; a failed icon only drops the icon.
pub fn render_results(records: &[CharacterRecord], icons: Option<&mut IconCache>) -> Vec<ResultItem> {
    let mut icons = icons;
    records
        .iter()
        .map(|record| {
            let icon = icons.as_deref_mut().and_then(|cache| match cache.get(record) {
                Ok(path) => Some(path),
                Err(e) => {
                    warn!("No icon for U+{}: {}", record.code(), e);
                    None
                }
            });
            ResultItem::from_record(record, icon)
        })
        .collect()
}

/// First character upper case, the rest lower case.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

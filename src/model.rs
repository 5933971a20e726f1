use crate::error::{UnicharError, UnicharResult};

/// Placeholder name the UCD uses for control characters.
pub const CONTROL_PLACEHOLDER: &str = "<control>";

/// A single row of the character table.
///
/// Records are immutable once built: the fields are private and the search
/// text is derived from them in the constructor, so the two can never diverge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterRecord {
    name: String,      // Effective display name (comment for control characters)
    comment: String,   // Secondary description, often empty
    block: String,     // Containing block, empty if unresolved
    code: String,      // Hex code point as found in the table, e.g. "0041"
    character: char,   // Decoded scalar value of `code`
    search_text: String,
}

impl CharacterRecord {
    /// Build a record from raw table fields.
    ///
    /// `line` is only used to locate the offending row in errors.
    pub fn new(name: &str, comment: &str, block: &str, code: &str, line: usize) -> UnicharResult<Self> {
        let invalid = || UnicharError::InvalidCode {
            line,
            code: code.to_string(),
        };
        // from_str_radix accepts a leading '+', the table format does not
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let value = u32::from_str_radix(code, 16).map_err(|_| invalid())?;
        let character = char::from_u32(value).ok_or_else(|| UnicharError::NotScalar {
            line,
            code: code.to_string(),
        })?;

        let name = if name == CONTROL_PLACEHOLDER { comment } else { name };
        let search_text = format!("{} {} {} {}", character, code, name, comment);

        Ok(Self {
            name: name.to_string(),
            comment: comment.to_string(),
            block: block.to_string(),
            code: code.to_string(),
            character,
            search_text,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn block(&self) -> &str {
        &self.block
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn character(&self) -> char {
        self.character
    }

    /// The only text the scorer sees: character, code, name and comment.
    pub fn search_text(&self) -> &str {
        &self.search_text
    }
}

/// The loaded character table, in file order. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<CharacterRecord>,
}

impl RecordStore {
    pub fn new(records: Vec<CharacterRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[CharacterRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

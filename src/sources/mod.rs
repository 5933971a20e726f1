use crate::error::UnicharResult;
use crate::model::CharacterRecord;

pub trait Source {
    fn scan(&self) -> UnicharResult<Vec<CharacterRecord>>;
}

pub mod table;
pub mod ucd;

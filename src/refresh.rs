//! Regeneration of a stale character table.

use crate::error::{UnicharError, UnicharResult};
use crate::sources::ucd::{write_table, UcdSource};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Something that can rebuild the table file at `table`.
pub trait Refresh: Send + Sync {
    fn refresh(&self, table: &Path) -> UnicharResult<()>;
}

/// Rebuilds the table from the Unicode Character Database.
pub struct UcdRefresher {
    source: UcdSource,
}

impl UcdRefresher {
    pub fn new(source: UcdSource) -> Self {
        Self { source }
    }
}

impl Refresh for UcdRefresher {
    fn refresh(&self, table: &Path) -> UnicharResult<()> {
        let backup = backup_path(table);
        if table.is_file() && !backup.is_file() {
            info!("backup the file with Unicode list to: {:?}", backup);
            fs::copy(table, &backup).map_err(|e| UnicharError::io(&backup, e))?;
        }

        info!("regenerate the file with Unicode list: {:?}", table);
        let contents = self.source.build_table()?;
        write_table(table, &contents)
    }
}

pub fn backup_path(table: &Path) -> PathBuf {
    let mut name = table.as_os_str().to_owned();
    name.push(".bkp");
    PathBuf::from(name)
}

/// Whole hours since the table was last written.
pub fn table_age_hours(table: &Path) -> Option<u64> {
    let modified = fs::metadata(table).and_then(|m| m.modified()).ok()?;
    let age = SystemTime::now().duration_since(modified).unwrap_or_default();
    Some(age.as_secs() / 3600)
}

/// True when `0 < update_interval < age`; an unreadable table is never stale.
pub fn is_stale(table: &Path, update_interval: i64) -> bool {
    if update_interval <= 0 {
        return false;
    }
    match table_age_hours(table) {
        Some(age) => (update_interval as u64) < age,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_file_is_not_stale() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("unicode_list.txt");
        fs::write(&path, "").unwrap();
        assert_eq!(table_age_hours(&path), Some(0));
        assert!(!is_stale(&path, 1));
        assert!(!is_stale(&path, 0));
        assert!(!is_stale(&path, -4));
    }

    #[test]
    fn test_missing_file_is_not_stale() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!is_stale(&dir.path().join("absent.txt"), 1));
    }

    #[test]
    fn test_backup_path() {
        assert_eq!(backup_path(Path::new("/x/unicode_list.txt")), PathBuf::from("/x/unicode_list.txt.bkp"));
    }

    #[test]
    fn test_ucd_refresher_backs_up_once() {
        let ucd = tempfile::tempdir().unwrap();
        fs::write(ucd.path().join("Blocks.txt"), "0000..007F; Basic Latin\n").unwrap();
        fs::write(ucd.path().join("UnicodeData.txt"), "0041;LATIN CAPITAL LETTER A;Lu;0;L;;;;;N;;;;0061;\n").unwrap();

        let out = tempfile::tempdir().unwrap();
        let table = out.path().join("unicode_list.txt");
        fs::write(&table, "OLD\t\t0042\tBasic Latin").unwrap();

        let refresher = UcdRefresher::new(UcdSource::Local(ucd.path().to_path_buf()));
        refresher.refresh(&table).unwrap();
        refresher.refresh(&table).unwrap();

        assert_eq!(fs::read_to_string(backup_path(&table)).unwrap(), "OLD\t\t0042\tBasic Latin");
        assert_eq!(fs::read_to_string(&table).unwrap(), "LATIN CAPITAL LETTER A\t\t0041\tBasic Latin");
    }
}

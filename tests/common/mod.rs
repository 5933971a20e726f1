use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// A character table written to a temporary directory.
pub struct TableFile {
    _dir: TempDir,
    pub path: PathBuf,
}

pub fn table_file(contents: &str) -> TableFile {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("unicode_list.txt");
    fs::write(&path, contents).unwrap();
    TableFile { _dir: dir, path }
}

pub const SMALL_TABLE: &str = "\
<control>\tNULL\t0000\tBasic Latin
DIGIT ONE\t\t0031\tBasic Latin
DIGIT TWO\t\t0032\tBasic Latin
LATIN CAPITAL LETTER A\t\t0041\tBasic Latin
LATIN SMALL LETTER A\t\t0061\tBasic Latin
LATIN SMALL LETTER B\t\t0062\tBasic Latin
AMPERSAND\t\t0026\tBasic Latin
EURO SIGN\t\t20AC\tCurrency Symbols
GREEK SMALL LETTER ALPHA\t\t03B1\tGreek and Coptic
UNASSIGNED TEST\t\t0378\t
";

// Reading and writing document files and paste payloads.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use taskgrid_config::Settings;
use taskgrid_engine::{CellCoordinate, Document, DocumentOptions, EngineError};

use crate::CliError;

pub fn options_from(settings: &Settings) -> DocumentOptions {
    DocumentOptions {
        max_history: settings.history_max_entries,
        default_column_width: settings.column_width(),
    }
}

pub fn load_document(path: &Path, options: DocumentOptions) -> Result<Document, CliError> {
    let json = fs::read_to_string(path)
        .map_err(|e| CliError::io(format!("{}: {}", path.display(), e)))?;
    Document::from_json(&json, options).map_err(|e| {
        CliError::from(e).with_hint(format!("{} is not a taskgrid document", path.display()))
    })
}

pub fn save_document(doc: &Document, path: &Path) -> Result<(), CliError> {
    let json = doc.export_json().map_err(CliError::from)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| CliError::io(format!("{}: {}", parent.display(), e)))?;
    }
    fs::write(path, json + "\n").map_err(|e| CliError::io(format!("{}: {}", path.display(), e)))?;
    log::debug!("wrote {}", path.display());
    Ok(())
}

/// `--out` when given, otherwise the input file itself.
pub fn output_path(input: &Path, out: Option<PathBuf>) -> PathBuf {
    out.unwrap_or_else(|| input.to_path_buf())
}

/// Read a payload file; `-` means stdin.
pub fn read_payload(path: &Path) -> Result<String, CliError> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| CliError::io(format!("stdin: {}", e)))?;
        return Ok(buf);
    }
    fs::read_to_string(path).map_err(|e| CliError::io(format!("{}: {}", path.display(), e)))
}

/// Parse a 1-based `ROW,COL` pair into a grid coordinate.
pub fn parse_cell(s: &str) -> Result<CellCoordinate, CliError> {
    let usage = || {
        CliError::args(format!("invalid cell {:?}", s)).with_hint("use ROW,COL counted from 1, e.g. 2,1")
    };
    let (row, col) = s.split_once(',').ok_or_else(usage)?;
    let row: usize = row.trim().parse().map_err(|_| usage())?;
    let col: usize = col.trim().parse().map_err(|_| usage())?;
    if row == 0 || col == 0 {
        return Err(usage());
    }
    Ok(CellCoordinate::new(row - 1, col - 1))
}

impl From<EngineError> for CliError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::InvalidSnapshot(_) => CliError::document(err.to_string()),
            _ => CliError::rejected(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cell() {
        assert_eq!(parse_cell("1,1").unwrap(), CellCoordinate::new(0, 0));
        assert_eq!(parse_cell(" 3 , 2 ").unwrap(), CellCoordinate::new(2, 1));
        assert!(parse_cell("0,1").is_err());
        assert!(parse_cell("A1").is_err());
        assert!(parse_cell("1,").is_err());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plans").join("launch.json");

        let mut doc = Document::with_rows(2, DocumentOptions::default());
        let id = doc.grid().tasks()[0].id.clone();
        doc.edit_cell(&id, "col-name", "Kickoff").unwrap();
        save_document(&doc, &path).unwrap();

        let loaded = load_document(&path, DocumentOptions::default()).unwrap();
        assert_eq!(loaded.snapshot(), doc.snapshot());
        assert_eq!(loaded.history().undo_len(), 0);
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{\"tasks\": 3}").unwrap();

        let err = load_document(&path, DocumentOptions::default()).unwrap_err();
        assert_eq!(err.code, crate::exit_codes::EXIT_INVALID_DOCUMENT);
        assert!(err.hint.is_some());
    }
}

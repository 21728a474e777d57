//! CSV input and output for the cleaning pipeline.

use std::fs::{self, File};
use std::path::Path;

use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use tracing::info;

use crate::error::{CleaningError, Result};

/// Load a posts export with every column read as text.
///
/// Schema inference is disabled so raw artifacts (quoted numbers, mixed
/// boolean spellings, timestamps stored as text) reach the cleaning passes
/// exactly as they appear in the file instead of being coerced at load
/// time.
pub fn read_table(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(CleaningError::InputNotFound(path.display().to_string()));
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| CleaningError::LoadFailed(e.to_string()))?
        .finish()
        .map_err(|e| CleaningError::LoadFailed(e.to_string()))?;

    info!(
        "Loaded {} rows, {} columns from {}",
        df.height(),
        df.width(),
        path.display()
    );
    Ok(df)
}

/// Write the cleaned table as UTF-8 CSV with standard double-quote quoting.
///
/// Parent directories are created as needed. Null cells serialize as empty
/// fields.
pub fn write_table(df: &mut DataFrame, path: &Path) -> Result<()> {
    let write_failed = |reason: String| CleaningError::OutputWriteFailed {
        path: path.display().to_string(),
        reason,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| write_failed(e.to_string()))?;
    }

    let mut file = File::create(path).map_err(|e| write_failed(e.to_string()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(df)
        .map_err(|e| write_failed(e.to_string()))?;

    info!("Cleaned CSV saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_read_table_missing_file() {
        let result = read_table(Path::new("/nonexistent/posts.csv"));
        assert!(matches!(result, Err(CleaningError::InputNotFound(_))));
    }

    #[test]
    fn test_read_table_keeps_everything_textual() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posts.csv");
        std::fs::write(&path, "post_id,likes\n1,100\n2,200\n").unwrap();

        let df = read_table(&path).unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(df.column("likes").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("likes").unwrap().str().unwrap().get(0), Some("100"));
    }

    #[test]
    fn test_write_table_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.csv");
        let mut df = df!(
            "post_id" => &["1", "2"],
            "post_text" => &[Some("hello"), None],
        )
        .unwrap();

        write_table(&mut df, &path).unwrap();
        let restored = read_table(&path).unwrap();

        assert_eq!(restored.height(), 2);
        assert_eq!(
            restored.column("post_text").unwrap().str().unwrap().get(0),
            Some("hello")
        );
        assert!(restored.column("post_text").unwrap().str().unwrap().get(1).is_none());
    }
}

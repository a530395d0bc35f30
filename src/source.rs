use std::{collections::HashMap, path::Path};

use crate::error::{LoadError, LoadResult};

/// One source row, keyed by column header.
pub type SourceRow = HashMap<String, String>;

/// The full input dataset, held in memory. The dataset is bounded (one CSV,
/// thousands of rows), so there is no streaming.
#[derive(Debug)]
pub struct SourceTable {
    headers: Vec<String>,
    rows: Vec<SourceRow>,
}

impl SourceTable {
    /// Read the CSV at `path`. Fails before any storage contact when the file
    /// is missing or the required `id` column is absent.
    pub fn open(path: &Path) -> LoadResult<Self> {
        if !path.exists() {
            return Err(LoadError::MissingInput(path.to_path_buf()));
        }

        let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
        let headers: Vec<String> =
            reader.headers()?.iter().map(|h| h.trim().to_string()).collect();

        if !headers.iter().any(|h| h == "id") {
            return Err(LoadError::MissingColumn("id".to_string()));
        }

        let mut rows = Vec::new();
        for record in reader.deserialize() {
            rows.push(record?);
        }

        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[SourceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Trimmed, non-empty cell access.
pub fn field<'a>(row: &'a SourceRow, name: &str) -> Option<&'a str> {
    row.get(name).map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// First present-and-non-empty column among `candidates`, in order. Upstream
/// schemas are inconsistent about column names, so each logical field carries
/// a priority list.
pub fn first_populated<'a>(row: &'a SourceRow, candidates: &[&str]) -> Option<&'a str> {
    candidates.iter().find_map(|name| field(row, name))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn open_reads_header_and_rows() {
        let file = write_csv("id,title,budget\n1,Alien,11000000\n2,Aliens,18500000\n");
        let table = SourceTable::open(file.path()).unwrap();

        assert_eq!(table.headers().to_vec(), vec!["id", "title", "budget"]);
        assert_eq!(table.len(), 2);
        assert_eq!(field(&table.rows()[0], "title"), Some("Alien"));
        assert_eq!(field(&table.rows()[1], "id"), Some("2"));
    }

    #[test]
    fn missing_file_fails_before_storage() {
        let err = SourceTable::open(Path::new("/nonexistent/movies.csv")).unwrap_err();
        assert!(matches!(err, LoadError::MissingInput(_)));
    }

    #[test]
    fn missing_id_column_is_a_config_error() {
        let file = write_csv("title,budget\nAlien,11000000\n");
        let err = SourceTable::open(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(col) if col == "id"));
    }

    #[test]
    fn blank_cells_read_as_absent() {
        let file = write_csv("id,title,runtime\n1,Alien,\n");
        let table = SourceTable::open(file.path()).unwrap();
        assert_eq!(field(&table.rows()[0], "runtime"), None);
        assert_eq!(field(&table.rows()[0], "missing_column"), None);
    }

    #[test]
    fn first_populated_respects_priority_order() {
        let file = write_csv("id,genres_list,genres\n1,\"[\"\"Action\"\"]\",Drama\n");
        let table = SourceTable::open(file.path()).unwrap();
        let row = &table.rows()[0];

        assert_eq!(first_populated(row, &["main_genre", "genres_list", "genres"]), Some(r#"["Action"]"#));
        assert_eq!(first_populated(row, &["genres", "genres_list"]), Some("Drama"));
        assert_eq!(first_populated(row, &["main_genre"]), None);
    }
}

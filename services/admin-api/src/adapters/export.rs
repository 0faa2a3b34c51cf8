//! services/admin-api/src/adapters/export.rs
//!
//! Writes reporting-query results to local JSON files so they can be served
//! back as downloads. File names are deterministic per query + filter value,
//! so re-running the same export overwrites the previous file.

use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Failed to serialize export payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to write export file: {0}")]
    Io(#[from] std::io::Error),
}

/// The written file plus the exact bytes it contains. Handlers stream the
/// bytes back, which keeps the download identical to the inline response.
pub struct ExportedFile {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

/// A JSON export adapter rooted at a configured directory.
#[derive(Clone)]
pub struct JsonExporter {
    dir: PathBuf,
}

impl JsonExporter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Builds the deterministic `<query>_<filter>.json` name. The filter is
    /// caller-supplied URL input; anything outside [A-Za-z0-9_-] is replaced
    /// so the name can never escape the export directory.
    pub fn file_name(query: &str, filter: &str) -> String {
        let safe: String = filter
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        format!("{}_{}.json", query, safe)
    }

    /// Serializes `data` as pretty-printed JSON and writes it under the
    /// export directory, creating the directory on first use.
    pub async fn export<T: Serialize>(
        &self,
        file_name: &str,
        data: &T,
    ) -> Result<ExportedFile, ExportError> {
        let bytes = serde_json::to_vec_pretty(data)?;
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(file_name);
        tokio::fs::write(&path, &bytes).await?;
        Ok(ExportedFile { path, bytes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn file_names_are_deterministic_per_query_and_filter() {
        assert_eq!(
            JsonExporter::file_name("users_by_career", "3"),
            "users_by_career_3.json"
        );
        assert_eq!(
            JsonExporter::file_name("courses_by_status", "C"),
            "courses_by_status_C.json"
        );
        // Same inputs, same name.
        assert_eq!(
            JsonExporter::file_name("user_courses", "12"),
            JsonExporter::file_name("user_courses", "12")
        );
    }

    #[test]
    fn file_names_neutralize_path_separators() {
        assert_eq!(
            JsonExporter::file_name("users_by_career", "../etc/passwd"),
            "users_by_career____etc_passwd.json"
        );
    }

    #[tokio::test]
    async fn exported_file_content_equals_inline_payload() {
        let dir = std::env::temp_dir().join("connectia_export_test");
        let exporter = JsonExporter::new(dir.clone());
        let payload = json!([{"id_usuario": 1, "nm_usuario": "Ana"}]);

        let exported = exporter
            .export("users_by_career_1.json", &payload)
            .await
            .unwrap();

        let on_disk = tokio::fs::read(&exported.path).await.unwrap();
        assert_eq!(on_disk, exported.bytes);
        let parsed: serde_json::Value = serde_json::from_slice(&on_disk).unwrap();
        assert_eq!(parsed, payload);

        tokio::fs::remove_file(&exported.path).await.ok();
    }
}

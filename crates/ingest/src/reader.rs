use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

const SUPPORTED_EXTENSIONS: [&str; 2] = ["txt", "md"];

pub struct FileReader;

impl FileReader {
    pub async fn read_file(path: &Path) -> Result<String> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");

        if !SUPPORTED_EXTENSIONS.contains(&extension) {
            anyhow::bail!(
                "Unsupported file format: {:?} (expected one of: .{})",
                extension,
                SUPPORTED_EXTENSIONS.join(", .")
            );
        }

        fs::read_to_string(path)
            .await
            .context(format!("Failed to read file: {:?}", path))
    }
}

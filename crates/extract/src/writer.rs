use std::path::Path;
use tokio::fs;
use tracing::info;

use crate::error::Result;
use crate::schema::Document;

/// Serialize a validated document as pretty-printed JSON
pub async fn save_document(document: &Document, path: &Path) -> Result<()> {
    let json = document
        .to_json_pretty()
        .map_err(std::io::Error::other)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, json).await?;

    info!(
        path = %path.display(),
        entities = document.entities().len(),
        relationships = document.relationships().len(),
        "Saved knowledge graph"
    );
    Ok(())
}

/// Read a document previously written by [`save_document`] (or any file in the same shape)
pub async fn load_document(path: &Path) -> Result<Document> {
    let text = fs::read_to_string(path).await?;
    Ok(Document::from_json_str(&text)?)
}

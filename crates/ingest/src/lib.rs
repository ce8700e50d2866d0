pub mod reader;
pub mod source;

pub use reader::FileReader;
pub use source::SourceDocument;

use anyhow::Result;
use std::path::Path;
use tracing::info;

/// Read a single report file into a source document
pub async fn ingest_file(path: &Path) -> Result<SourceDocument> {
    let text = FileReader::read_file(path).await?;
    let doc = SourceDocument::new(path.to_string_lossy().to_string(), text);

    info!(
        path = %path.display(),
        doc_id = %doc.doc_id,
        chars = doc.char_count(),
        "Read source document"
    );

    Ok(doc)
}

/// Wrap pasted text (no backing file) as a source document
pub fn ingest_text(text: impl Into<String>) -> SourceDocument {
    SourceDocument::new("<pasted>".to_string(), text.into())
}

use sha2::{Digest, Sha256};

/// Text of a financial document ready to be sent for extraction
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// Hex SHA-256 of the text, stable across runs
    pub doc_id: String,
    pub origin: String,
    pub text: String,
}

impl SourceDocument {
    pub fn new(origin: String, text: String) -> Self {
        Self {
            doc_id: content_id(&text),
            origin,
            text,
        }
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// First `max_chars` characters, for previews
    pub fn preview(&self, max_chars: usize) -> String {
        if self.char_count() <= max_chars {
            return self.text.clone();
        }
        let head: String = self.text.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}

pub fn content_id(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

use dashmap::DashMap;
use extract::{Document, Provider};
use std::sync::Arc;

/// Extraction results keyed by provider and source content hash
pub struct ResultCache {
    documents: Arc<DashMap<String, Document>>,
    max_entries: usize,
}

impl ResultCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            documents: Arc::new(DashMap::new()),
            max_entries,
        }
    }

    pub fn key(provider: Provider, doc_id: &str) -> String {
        format!("{}:{}", provider, doc_id)
    }

    pub fn insert(&self, key: String, document: Document) {
        if self.max_entries == 0 {
            return;
        }
        if self.documents.len() >= self.max_entries {
            // Simple eviction: clear 25% when full
            let to_remove: Vec<_> = self.documents.iter()
                .take((self.max_entries / 4).max(1))
                .map(|r| r.key().clone())
                .collect();
            for key in to_remove {
                self.documents.remove(&key);
            }
        }
        self.documents.insert(key, document);
    }

    pub fn get(&self, key: &str) -> Option<Document> {
        self.documents.get(key).map(|r| r.value().clone())
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }
}

pub mod config;
pub mod error;
pub mod llm;
pub mod normalizer;
pub mod prompt;
pub mod retry;
pub mod schema;
pub mod validator;
pub mod writer;

pub use config::{DetectiveConfig, Provider, ProviderConfig, RetryConfig};
pub use error::{Error, Result, UpstreamError, ValidationError};
pub use llm::{ChatClient, CompletionModel};
pub use schema::{Document, Entity, EntityType, Metadata, Relationship, RelationshipType};
pub use validator::validate;
pub use writer::{load_document, save_document};

use tracing::{info, warn};

pub struct Extractor<C = ChatClient> {
    llm_client: C,
}

impl Extractor<ChatClient> {
    pub fn from_config(config: &DetectiveConfig) -> Result<Self> {
        Ok(Self::new(ChatClient::new(config)?))
    }
}

impl<C: CompletionModel> Extractor<C> {
    pub fn new(llm_client: C) -> Self {
        Self { llm_client }
    }

    pub fn describe(&self) -> String {
        self.llm_client.describe()
    }

    /// Extract a validated knowledge graph from document text.
    ///
    /// The model output is never repaired: non-JSON output is an upstream
    /// error and a schema violation aborts with the rule that was broken.
    pub async fn extract_from_text(&self, text: &str) -> Result<Document> {
        let prompt = prompt::build_extraction_prompt(text);

        info!(
            model = %self.llm_client.describe(),
            chars = text.chars().count(),
            "Extracting entities and relationships"
        );

        let content = self
            .llm_client
            .complete(prompt::SYSTEM_PROMPT, &prompt)
            .await?;

        let json = normalizer::extract_json(&content);
        let raw: serde_json::Value = serde_json::from_str(json).map_err(|e| {
            let preview: String = json.chars().take(500).collect();
            warn!(error = %e, response = %preview, "Model returned non-JSON output");
            UpstreamError::MalformedResponse {
                provider: self.llm_client.provider_name(),
                message: format!("response is not JSON: {}", e),
            }
        })?;

        let document = validate(&raw).inspect_err(|e| {
            warn!(rule = e.rule(), path = e.path(), "Model output failed validation");
        })?;

        info!(
            entities = document.entities().len(),
            relationships = document.relationships().len(),
            "Extraction complete"
        );
        Ok(document)
    }
}

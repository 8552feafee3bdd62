//! Ollama model provisioning
//!
//! Used once at startup, before the first chat turn: checks that the
//! configured model exists on the Ollama server and pulls it if not.
//! Chat requests themselves go through `GenaiProvider`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::logging::Logger;
use super::error::{ProviderError, ProviderResult};

/// Model listing and download for a backend that hosts models locally
#[async_trait]
pub trait ModelProvisioner: Send + Sync {
    /// Names of the models currently available
    async fn list_models(&self) -> ProviderResult<Vec<String>>;

    /// Download a model, returning once it is available
    async fn pull_model(&self, model: &str) -> ProviderResult<()>;
}

/// What `ensure_model` had to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// The model was already present
    AlreadyAvailable,
    /// The model was pulled just now
    Pulled,
}

/// Whether `model` appears in a model listing
///
/// A listed `llama3.2:latest` satisfies `llama3.2`, and so does any tag of
/// the same base name.
pub fn is_model_listed(listed: &[String], model: &str) -> bool {
    let latest = format!("{}:latest", model);
    listed.iter().any(|name| {
        name == model || *name == latest || name.split(':').next() == Some(model)
    })
}

/// Make sure `model` is available, pulling it when allowed
pub async fn ensure_model(
    provisioner: &dyn ModelProvisioner,
    model: &str,
    auto_pull: bool,
    logger: &dyn Logger,
) -> ProviderResult<ProvisionOutcome> {
    let listed = provisioner.list_models().await?;
    logger.debug(&format!("[Provision] {} models available", listed.len()));

    if is_model_listed(&listed, model) {
        logger.info(&format!("[Provision] Model '{}' is available", model));
        return Ok(ProvisionOutcome::AlreadyAvailable);
    }

    if !auto_pull {
        return Err(ProviderError::model_unavailable(
            model,
            "not present on the server and auto-pull is disabled",
        ));
    }

    logger.info(&format!("[Provision] Pulling model '{}'", model));
    provisioner.pull_model(model).await?;
    logger.info(&format!("[Provision] Model '{}' ready", model));
    Ok(ProvisionOutcome::Pulled)
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    name: String,
}

#[derive(Debug, Serialize)]
struct PullRequest<'a> {
    model: &'a str,
    name: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct PullResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    error: Option<String>,
}

/// HTTP client for the Ollama model management API
pub struct OllamaClient {
    host: String,
    http: reqwest::Client,
    logger: Arc<dyn Logger>,
}

impl OllamaClient {
    /// Create a client for the server at `host` (e.g. `http://localhost:11434`)
    pub fn new(host: impl Into<String>, logger: Arc<dyn Logger>) -> Self {
        Self {
            host: host.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            logger,
        }
    }

    /// Server base URL without trailing slash
    pub fn host(&self) -> &str {
        &self.host
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.host, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl ModelProvisioner for OllamaClient {
    async fn list_models(&self) -> ProviderResult<Vec<String>> {
        let url = self.url("api/tags");
        self.logger.debug(&format!("[OllamaClient] GET {}", url));

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::api_error("ollama", status.as_u16(), body));
        }

        let tags: TagsResponse = response.json().await?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    async fn pull_model(&self, model: &str) -> ProviderResult<()> {
        let url = self.url("api/pull");
        self.logger.debug(&format!("[OllamaClient] POST {} model={}", url, model));

        let response = self
            .http
            .post(&url)
            .json(&PullRequest {
                model,
                name: model,
                stream: false,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::api_error("ollama", status.as_u16(), body));
        }

        let pull: PullResponse = response.json().await?;
        if let Some(error) = pull.error {
            return Err(ProviderError::model_unavailable(model, error));
        }
        if pull.status != "success" {
            return Err(ProviderError::invalid_response(
                "ollama",
                format!("unexpected pull status '{}'", pull.status),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use parking_lot::Mutex;

    struct FakeProvisioner {
        listed: Vec<String>,
        pulled: Mutex<Vec<String>>,
    }

    impl FakeProvisioner {
        fn with_models(models: &[&str]) -> Self {
            Self {
                listed: models.iter().map(|m| m.to_string()).collect(),
                pulled: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ModelProvisioner for FakeProvisioner {
        async fn list_models(&self) -> ProviderResult<Vec<String>> {
            Ok(self.listed.clone())
        }

        async fn pull_model(&self, model: &str) -> ProviderResult<()> {
            self.pulled.lock().push(model.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_model_listing_match() {
        let listed = vec!["llama3.2:latest".to_string(), "qwen2.5:7b".to_string()];
        assert!(is_model_listed(&listed, "llama3.2"));
        assert!(is_model_listed(&listed, "llama3.2:latest"));
        assert!(is_model_listed(&listed, "qwen2.5"));
        assert!(is_model_listed(&listed, "qwen2.5:7b"));
        assert!(!is_model_listed(&listed, "mistral"));
        assert!(!is_model_listed(&listed, "llama3"));
    }

    #[tokio::test]
    async fn test_available_model_is_not_pulled() {
        let provisioner = FakeProvisioner::with_models(&["llama3.2:latest"]);
        let outcome = ensure_model(&provisioner, "llama3.2", true, &NoOpLogger)
            .await
            .unwrap();

        assert_eq!(outcome, ProvisionOutcome::AlreadyAvailable);
        assert!(provisioner.pulled.lock().is_empty());
    }

    #[tokio::test]
    async fn test_missing_model_is_pulled() {
        let provisioner = FakeProvisioner::with_models(&["mistral:latest"]);
        let outcome = ensure_model(&provisioner, "llama3.2", true, &NoOpLogger)
            .await
            .unwrap();

        assert_eq!(outcome, ProvisionOutcome::Pulled);
        assert_eq!(*provisioner.pulled.lock(), vec!["llama3.2".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_model_without_auto_pull() {
        let provisioner = FakeProvisioner::with_models(&[]);
        let result = ensure_model(&provisioner, "llama3.2", false, &NoOpLogger).await;

        assert!(matches!(result, Err(ProviderError::ModelUnavailable { .. })));
        assert!(provisioner.pulled.lock().is_empty());
    }

    #[test]
    fn test_client_urls() {
        let client = OllamaClient::new("http://localhost:11434/", Arc::new(NoOpLogger));
        assert_eq!(client.host(), "http://localhost:11434");
        assert_eq!(client.url("api/tags"), "http://localhost:11434/api/tags");
        assert_eq!(client.url("/api/pull"), "http://localhost:11434/api/pull");
    }
}

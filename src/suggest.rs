//! The suggest module asks an LLM model for improved versions of a page's
//! title, meta description and heading tags.

use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use llm::builder::{LLMBackend, LLMBuilder};
use llm::chat::{ChatMessage, ChatProvider};
use log::{debug, error, info};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use url::Url;

use crate::constants::{DEFAULT_MODEL_TIMEOUT_SECS, THINK_STRIPPER};

static THINK_STRIPPER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(THINK_STRIPPER).expect("Failed to compile THINK_STRIPPER regex"));

/// Failure of a single suggestion request.
#[derive(Error, Debug)]
pub enum SuggestionError {
    /// The model service rejected the request or could not be reached.
    #[error("Could not retrieve SEO suggestions from model {model}: {cause}")]
    Provider { model: String, cause: String },
    /// The model did not answer in time.
    #[error("Model {model} did not answer within {}s", .timeout.as_secs())]
    Timeout { model: String, timeout: Duration },
}

/// Client sending prompts to one LLM model.
pub struct SuggestionClient {
    model: Box<dyn ChatProvider>,
    model_name: String,
    timeout: Duration,
    strip_thinking: bool,
}

impl SuggestionClient {
    /// Wraps an already built chat provider.
    pub fn new(model: Box<dyn ChatProvider>, model_name: impl Into<String>) -> Self {
        Self {
            model,
            model_name: model_name.into(),
            timeout: Duration::from_secs(DEFAULT_MODEL_TIMEOUT_SECS),
            strip_thinking: false,
        }
    }

    /// Builds a client from a model URL such as `ollama://llama3` or `ollama://8b@llama3.1`.
    ///
    /// # Arguments
    ///
    /// * `model_url` - Backend as scheme, model name as host (plus user part as tag)
    /// * `base_url` - Optional endpoint override for the backend
    /// * `api_key` - Optional API key for hosted backends
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// * The scheme is not a known backend
    /// * The URL carries no model name
    /// * The LLM provider fails to build
    pub fn from_model_url(
        model_url: &Url,
        base_url: Option<&str>,
        api_key: Option<String>,
    ) -> Result<Self> {
        let model_name = model_name(model_url)?;
        let llm_builder = LLMBuilder::new()
            .backend(
                LLMBackend::from_str(model_url.scheme())
                    .map_err(|e| anyhow::anyhow!("Invalid LLM backend: {}", e))?,
            )
            .model(model_name.as_str());

        let llm_builder = match base_url {
            Some(base_url) => llm_builder.base_url(base_url),
            None => llm_builder,
        };

        let llm_builder = match api_key {
            Some(api_key) => {
                info!("API key is provided for {model_name}");
                llm_builder.api_key(api_key)
            }
            None => llm_builder,
        };

        let model: Box<dyn ChatProvider> = llm_builder
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build LLM model: {}", e))?;

        Ok(Self::new(model, model_name))
    }

    /// Limits how long a single request may take.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Removes `<think>` blocks of reasoning models from responses.
    pub fn with_thinking_stripped(mut self, strip_thinking: bool) -> Self {
        self.strip_thinking = strip_thinking;
        self
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Sends `prompt` as a single user message and returns the model's answer.
    ///
    /// The answer is returned verbatim unless thinking stripping is enabled.
    ///
    /// # Errors
    ///
    /// Returns [`SuggestionError`] if the model service fails or does not answer in time.
    pub async fn get_suggestions(&self, prompt: &str) -> Result<String, SuggestionError> {
        debug!(
            "Sending {} chars prompt to model {}",
            prompt.len(),
            self.model_name
        );

        let messages = vec![ChatMessage::user().content(prompt).build()];

        let response = match tokio::time::timeout(self.timeout, self.model.chat(&messages)).await {
            Ok(Ok(response)) => response.to_string(),
            Ok(Err(err)) => {
                error!("Model {} failed: {err}", self.model_name);
                return Err(SuggestionError::Provider {
                    model: self.model_name.clone(),
                    cause: err.to_string(),
                });
            }
            Err(_) => {
                error!("Model {} timed out after {:?}", self.model_name, self.timeout);
                return Err(SuggestionError::Timeout {
                    model: self.model_name.clone(),
                    timeout: self.timeout,
                });
            }
        };

        debug!(
            "Model {} answered with {} chars",
            self.model_name,
            response.len()
        );

        if self.strip_thinking {
            Ok(THINK_STRIPPER_REGEX
                .replace_all(&response, "")
                .trim()
                .to_owned())
        } else {
            Ok(response)
        }
    }
}

/// Resolves the model name from a model URL: the host, joined with the user part by `:`.
///
/// # Errors
///
/// Returns an error if the URL has no host.
pub fn model_name(model_url: &Url) -> Result<String> {
    Ok([
        model_url
            .host_str()
            .context("Specify model name as host URL.")?,
        model_url.username(),
    ]
    .iter()
    .filter(|x| !x.is_empty())
    .copied()
    .collect::<Vec<_>>()
    .join(":"))
}

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use llm::{
    chat::{ChatMessage, ChatProvider, ChatResponse, Tool},
    error::LLMError,
};
use reqwest::StatusCode;
use url::Url;

use seomancer::fetch::{Fetch, FetchError};
use seomancer::{Pipeline, Storage, SuggestionClient};

pub const EXAMPLE_URL: &str = "https://example.com/";

pub const FULL_PAGE: &str = r#"<!doctype html>
<html>
<head>
    <title>  Example Domain  </title>
    <meta charset="utf-8">
    <meta name="description" content="An example page for documentation.">
</head>
<body>
    <h1>Example Domain</h1>
    <h2>First section</h2>
    <p>Some text</p>
    <h2>Second <em>section</em></h2>
    <h3>Details</h3>
    <h4>Fine print</h4>
</body>
</html>"#;

/// Counts calls and answers with a scripted outcome.
#[derive(Clone)]
pub struct StubFetcher {
    outcome: Result<String, StatusCode>,
    calls: Arc<AtomicUsize>,
}

impl StubFetcher {
    pub fn html(html: &str) -> Self {
        Self {
            outcome: Ok(html.to_owned()),
            calls: Arc::default(),
        }
    }

    pub fn status(status: StatusCode) -> Self {
        Self {
            outcome: Err(status),
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetch for StubFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone().map_err(|status| FetchError::Status {
            url: url.to_string(),
            status,
        })
    }
}

/// Chat provider answering every request with the same scripted outcome.
#[derive(Clone)]
pub struct StubLlmProvider {
    outcome: Result<String, String>,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl StubLlmProvider {
    pub fn new(response_content: &str) -> Self {
        StubLlmProvider {
            outcome: Ok(response_content.to_owned()),
            delay: None,
            calls: Arc::default(),
        }
    }

    pub fn failing(cause: &str) -> Self {
        StubLlmProvider {
            outcome: Err(cause.to_owned()),
            delay: None,
            calls: Arc::default(),
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn client(&self) -> SuggestionClient {
        SuggestionClient::new(Box::new(self.clone()), "stub")
    }
}

impl ChatProvider for StubLlmProvider {
    fn chat<'life0, 'life1, 'async_trait>(
        &'life0 self,
        _messages: &'life1 [ChatMessage],
    ) -> ::core::pin::Pin<
        Box<
            dyn ::core::future::Future<Output = Result<Box<dyn ChatResponse>, LLMError>>
                + ::core::marker::Send
                + 'async_trait,
        >,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            #[derive(Debug)]
            struct StringResponse(String);

            impl ChatResponse for StringResponse {
                fn text(&self) -> Option<String> {
                    Some(self.0.clone())
                }

                fn tool_calls(&self) -> Option<Vec<llm::ToolCall>> {
                    panic!()
                }

                fn thinking(&self) -> Option<String> {
                    None
                }

                fn usage(&self) -> Option<llm::chat::Usage> {
                    None
                }
            }

            impl std::fmt::Display for StringResponse {
                fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(formatter, "{}", self.0)
                }
            }

            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            match &self.outcome {
                Ok(content) => {
                    Ok(Box::new(StringResponse(content.clone())) as Box<dyn ChatResponse>)
                }
                Err(cause) => Err(LLMError::ProviderError(cause.clone())),
            }
        })
    }

    fn chat_with_tools<'life0, 'life1, 'life2, 'async_trait>(
        &'life0 self,
        _messages: &'life1 [ChatMessage],
        _tools: Option<&'life2 [Tool]>,
    ) -> ::core::pin::Pin<
        Box<
            dyn ::core::future::Future<Output = Result<Box<dyn ChatResponse>, LLMError>>
                + ::core::marker::Send
                + 'async_trait,
        >,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        'life2: 'async_trait,
        Self: 'async_trait,
    {
        panic!()
    }
}

pub fn pipeline(fetcher: &StubFetcher, llm: &StubLlmProvider) -> Pipeline {
    Pipeline::new(
        Box::new(fetcher.clone()),
        llm.client(),
        Storage::in_memory().expect("In-memory storage should open."),
    )
}

//! The seomancer library fetches a single page, extracts its on-page SEO signals,
//! scores them against a fixed rubric and asks an LLM for improved versions of
//! the title, meta description and heading tags.

use std::fmt;

use thiserror::Error;

pub mod constants;
pub mod fetch;
pub mod parse;
pub mod pipeline;
pub mod prompt;
pub mod score;
pub mod server;
pub mod storage;
pub mod suggest;

/// A step of the analysis pipeline that can terminate a run.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Stage {
    /// Retrieving the page HTML.
    Fetch,
    /// Asking the language model for suggestions.
    Suggest,
    /// Handing the assembled report to storage.
    Persist,
}

impl fmt::Display for Stage {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Stage::Fetch => "fetch",
            Stage::Suggest => "suggest",
            Stage::Persist => "persist",
        })
    }
}

/// The single user-facing failure of an analysis run.
#[derive(Error, Clone, PartialEq, Eq, Debug)]
#[error("{stage} stage failed: {cause}")]
pub struct AnalysisError {
    pub stage: Stage,
    pub cause: String,
}

impl AnalysisError {
    pub fn new(stage: Stage, cause: impl Into<String>) -> Self {
        Self {
            stage,
            cause: cause.into(),
        }
    }

    /// Fetch failures are blamed on the submitted URL, everything else on the backend.
    pub fn is_client_error(&self) -> bool {
        self.stage == Stage::Fetch
    }
}

pub use parse::{SeoSignals, extract_signals};
pub use pipeline::Pipeline;
pub use prompt::build_prompt;
pub use score::{ScoreResult, score, score_signals};
pub use storage::{Report, Storage};
pub use suggest::SuggestionClient;

//! The pipeline module runs one analysis end to end:
//! fetch, extract, score, build the prompt, ask for suggestions, store the report.
//!
//! Stages run strictly one after another. A failed fetch ends the run before any
//! model call, and nothing is stored unless every stage succeeded.

use log::{error, info};
use url::Url;

use crate::fetch::Fetch;
use crate::parse::extract_signals;
use crate::prompt::build_prompt;
use crate::score::{ScoreResult, score_signals};
use crate::storage::{NewReport, Report, Storage};
use crate::suggest::SuggestionClient;
use crate::{AnalysisError, Stage};

/// The analysis pipeline with its injected collaborators.
pub struct Pipeline {
    fetcher: Box<dyn Fetch>,
    suggester: SuggestionClient,
    storage: Storage,
    prompt_template: Option<String>,
}

impl Pipeline {
    pub fn new(fetcher: Box<dyn Fetch>, suggester: SuggestionClient, storage: Storage) -> Self {
        Self {
            fetcher,
            suggester,
            storage,
            prompt_template: None,
        }
    }

    /// Uses `template` instead of the built-in prompt, see [`build_prompt`].
    pub fn with_prompt_template(mut self, template: Option<String>) -> Self {
        self.prompt_template = template;
        self
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Runs the full pipeline for `url` and stores the resulting report.
    ///
    /// # Errors
    ///
    /// Returns an [`AnalysisError`] naming the stage that failed:
    /// * `Fetch` - the URL is invalid, unreachable or answered with a non-2xx status
    /// * `Suggest` - the model service failed or timed out
    /// * `Persist` - the report could not be stored
    pub async fn analyze_and_suggest(&self, url: &str) -> Result<Report, AnalysisError> {
        let ScoreResult { signals, score } = audit(self.fetcher.as_ref(), url).await?;

        let prompt = build_prompt(&signals, self.prompt_template.as_deref());

        info!(
            "Requesting SEO improvements for {url} from {}",
            self.suggester.model_name()
        );
        let suggestions = self.suggester.get_suggestions(&prompt).await.map_err(|e| {
            error!("Failed to get SEO suggestions for {url}: {e}");
            AnalysisError::new(Stage::Suggest, e.to_string())
        })?;

        let report = self
            .storage
            .insert_report(&NewReport {
                url: url.to_owned(),
                score,
                suggestions,
            })
            .map_err(|e| {
                error!("Failed to store report for {url}: {e:#}");
                AnalysisError::new(Stage::Persist, format!("{e:#}"))
            })?;

        info!("Report for {url} saved with ID: {}", report.id);
        Ok(report)
    }
}

/// Fetches, extracts and scores `url` without calling the model or storing anything.
///
/// # Errors
///
/// Returns a fetch-stage [`AnalysisError`] if the URL is invalid or cannot be retrieved.
pub async fn audit(fetcher: &dyn Fetch, url: &str) -> Result<ScoreResult, AnalysisError> {
    let page_url = Url::parse(url).map_err(|e| {
        error!("Rejected URL {url}: {e}");
        AnalysisError::new(Stage::Fetch, format!("Invalid URL {url}: {e}"))
    })?;

    let html = fetcher.fetch(&page_url).await.map_err(|e| {
        error!("SEO analysis failed for {url}: {e}");
        AnalysisError::new(Stage::Fetch, e.to_string())
    })?;

    let result = score_signals(extract_signals(url, &html));
    info!("SEO analysis for {url} complete. Score: {}", result.score);

    Ok(result)
}

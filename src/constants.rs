use std::time::Duration;

pub const MODEL_API_KEY_ENV_NAME: &str = "SEOMANCER_MODEL_API_KEY";

pub const DEFAULT_DB_PATH: &str = "seomancer.db";
pub const DEFAULT_MODEL_URL: &str = "ollama://llama3";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";

pub const USER_AGENT: &str = "SEOMancer Bot";
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 120;

/// Placeholder rendered for any signal the page does not provide.
pub const MISSING_PLACEHOLDER: &str = "N/A";

pub(crate) const THINK_STRIPPER: &str = r"<think>[\s\S]*</think>\s*";

pub(crate) const DEFAULT_PROMPT_TEMPLATE: &str = r#"
You are reviewing the on-page SEO of {url}.
Suggest improvements for its title tag, meta description and header tags (H1, H2, ...).
Give a concrete rewritten version of every tag, not general advice.

Current SEO data:
{seo_data}

Answer in plain, readable text using this layout:
**Improved Title:** <new title>
**Improved Meta Description:** <new meta description>
**Improved H1:** <new main heading>
**Improved H2:** <new subheadings, one per line>
"#;

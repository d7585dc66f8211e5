use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::constants::{DEFAULT_PROMPT_TEMPLATE, MISSING_PLACEHOLDER};
use crate::parse::SeoSignals;

static PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{(url|seo_data)\}").expect("Failed to compile placeholder regex")
});

/// Renders the signal block sent to the model.
///
/// Only `h1` and `h2` headings are included, joined with `", "`. Empty fields
/// render as `N/A`.
pub fn render_seo_data(signals: &SeoSignals) -> String {
    format!(
        "URL: {}\nTitle: {}\nMeta Description: {}\nH1 Headers: {}\nH2 Headers: {}",
        or_placeholder(&signals.url),
        or_placeholder(&signals.title),
        or_placeholder(&signals.meta_description),
        or_placeholder(&signals.headings("h1").join(", ")),
        or_placeholder(&signals.headings("h2").join(", ")),
    )
}

/// Builds the model prompt from `template`, or the built-in one when `None`.
///
/// `{url}` and `{seo_data}` placeholders are substituted in a single pass over
/// the template, so placeholder text inside the URL is kept as is. A template
/// without `{seo_data}` gets the signal block appended after it.
pub fn build_prompt(signals: &SeoSignals, template: Option<&str>) -> String {
    let template = template.unwrap_or(DEFAULT_PROMPT_TEMPLATE);
    let seo_data = render_seo_data(signals);

    let prompt = PLACEHOLDER_REGEX.replace_all(template, |caps: &Captures<'_>| {
        if caps.get(1).as_ref().map(regex::Match::as_str) == Some("url") {
            or_placeholder(&signals.url).to_owned()
        } else {
            seo_data.clone()
        }
    });

    if template.contains("{seo_data}") {
        prompt.into_owned()
    } else {
        format!("{}\n\n{seo_data}\n", prompt.trim_end())
    }
}

fn or_placeholder(value: &str) -> &str {
    if value.is_empty() {
        MISSING_PLACEHOLDER
    } else {
        value
    }
}

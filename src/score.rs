//! The score module rates a signal set against a fixed, additive rubric.
//!
//! | criterion                | points |
//! |--------------------------|--------|
//! | title present            | 30     |
//! | meta description present | 30     |
//! | at least one `h1`        | 20     |
//! | at least one `h2`        | 10     |
//! | at least one `h3`        | 10     |
//!
//! `h4`..`h6` are extracted but earn nothing.

use serde::Serialize;

use crate::parse::SeoSignals;

pub const TITLE_POINTS: u8 = 30;
pub const META_DESCRIPTION_POINTS: u8 = 30;
pub const H1_POINTS: u8 = 20;
pub const H2_POINTS: u8 = 10;
pub const H3_POINTS: u8 = 10;

/// Highest attainable score.
pub const MAX_SCORE: u8 = 100;

/// Outcome of one rubric row for a signal set.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct RubricCheck {
    pub criterion: &'static str,
    pub points: u8,
    pub passed: bool,
}

/// A signal set together with its score.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct ScoreResult {
    pub signals: SeoSignals,
    pub score: u8,
}

/// Evaluates every rubric row against `signals`.
pub fn rubric_checks(signals: &SeoSignals) -> Vec<RubricCheck> {
    let has_headings = |level: &str| !signals.headings(level).is_empty();

    vec![
        RubricCheck {
            criterion: "title",
            points: TITLE_POINTS,
            passed: !signals.title.is_empty(),
        },
        RubricCheck {
            criterion: "meta description",
            points: META_DESCRIPTION_POINTS,
            passed: !signals.meta_description.is_empty(),
        },
        RubricCheck {
            criterion: "h1",
            points: H1_POINTS,
            passed: has_headings("h1"),
        },
        RubricCheck {
            criterion: "h2",
            points: H2_POINTS,
            passed: has_headings("h2"),
        },
        RubricCheck {
            criterion: "h3",
            points: H3_POINTS,
            passed: has_headings("h3"),
        },
    ]
}

/// Sum of the points of every passed rubric row, in `0..=100`.
pub fn score(signals: &SeoSignals) -> u8 {
    rubric_checks(signals)
        .iter()
        .filter(|check| check.passed)
        .map(|check| check.points)
        .sum()
}

/// Scores `signals` and keeps them alongside the result.
pub fn score_signals(signals: SeoSignals) -> ScoreResult {
    let score = score(&signals);
    ScoreResult { signals, score }
}

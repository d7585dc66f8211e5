use crate::pipeline_extras::{EXAMPLE_URL, FULL_PAGE};
use seomancer::extract_signals;
use seomancer::parse::HEADING_LEVELS;
use spectral::prelude::*;

mod pipeline_extras;

fn assert_all_levels_present(html: &str) {
    let signals = extract_signals(EXAMPLE_URL, html);
    assert_that(&signals.headings.len()).is_equal_to(HEADING_LEVELS.len());
    for level in HEADING_LEVELS {
        assert_that(&signals.headings.contains_key(level)).is_true();
    }
}

#[test]
fn extracts_title_description_and_headings() {
    let signals = extract_signals(EXAMPLE_URL, FULL_PAGE);

    assert_that(&signals.url.as_str()).is_equal_to(EXAMPLE_URL);
    assert_that(&signals.title.as_str()).is_equal_to("Example Domain");
    assert_that(&signals.meta_description.as_str())
        .is_equal_to("An example page for documentation.");
    assert_that(&signals.headings("h1").to_vec()).is_equal_to(vec!["Example Domain".to_owned()]);
    assert_that(&signals.headings("h2").to_vec()).is_equal_to(vec![
        "First section".to_owned(),
        "Second section".to_owned(),
    ]);
    assert_that(&signals.headings("h3").to_vec()).is_equal_to(vec!["Details".to_owned()]);
    assert_that(&signals.headings("h4").to_vec()).is_equal_to(vec!["Fine print".to_owned()]);
    assert_that(&signals.headings("h5").is_empty()).is_true();
    assert_that(&signals.headings("h6").is_empty()).is_true();
}

#[test]
fn title_only_page_leaves_other_fields_empty() {
    let signals = extract_signals(EXAMPLE_URL, "<title>Example Domain</title>");

    assert_that(&signals.title.as_str()).is_equal_to("Example Domain");
    assert_that(&signals.meta_description.is_empty()).is_true();
    assert_that(&signals.headings.values().all(Vec::is_empty)).is_true();
    assert_all_levels_present("<title>Example Domain</title>");
}

#[test]
fn first_title_wins() {
    let signals = extract_signals(
        EXAMPLE_URL,
        "<html><head><title>First</title><title>Second</title></head></html>",
    );

    assert_that(&signals.title.as_str()).is_equal_to("First");
}

#[test]
fn meta_description_name_is_case_sensitive() {
    let signals = extract_signals(
        EXAMPLE_URL,
        r#"<head><meta name="Description" content="Upper"><meta name="DESCRIPTION" content="Shout"></head>"#,
    );

    assert_that(&signals.meta_description.is_empty()).is_true();
}

#[test]
fn meta_description_takes_first_matching_meta() {
    let signals = extract_signals(
        EXAMPLE_URL,
        r#"<head>
            <meta name="keywords" content="a, b">
            <meta name="description" content="First description">
            <meta name="description" content="Second description">
        </head>"#,
    );

    assert_that(&signals.meta_description.as_str()).is_equal_to("First description");
}

#[test]
fn meta_description_without_content_is_empty() {
    let signals = extract_signals(EXAMPLE_URL, r#"<meta name="description">"#);

    assert_that(&signals.meta_description.is_empty()).is_true();
}

#[test]
fn duplicate_headings_are_kept_in_document_order() {
    let signals = extract_signals(
        EXAMPLE_URL,
        "<h2>Repeat</h2><h1>Main</h1><h2>Other</h2><h2>Repeat</h2>",
    );

    assert_that(&signals.headings("h2").to_vec()).is_equal_to(vec![
        "Repeat".to_owned(),
        "Other".to_owned(),
        "Repeat".to_owned(),
    ]);
    assert_that(&signals.headings("h1").to_vec()).is_equal_to(vec!["Main".to_owned()]);
}

#[test]
fn empty_heading_is_still_collected() {
    let signals = extract_signals(EXAMPLE_URL, "<h1>   </h1>");

    assert_that(&signals.headings("h1").to_vec()).is_equal_to(vec![String::new()]);
}

#[test]
fn malformed_input_never_fails() {
    let inputs = [
        String::new(),
        "<<<>>>".to_owned(),
        "<title>Unclosed".to_owned(),
        "<h1><h2><h3></h1>".to_owned(),
        r#"<meta name="description" content=">"#.to_owned(),
        String::from_utf8_lossy(&[0xff, 0xfe, 0x00, 0x3c, 0x68, 0x31, 0x3e, 0x80]).into_owned(),
    ];

    for html in &inputs {
        assert_all_levels_present(html);
    }
}

#[test]
fn extraction_is_idempotent() {
    let first = extract_signals(EXAMPLE_URL, FULL_PAGE);
    let second = extract_signals(EXAMPLE_URL, FULL_PAGE);

    assert_that(&first).is_equal_to(second);
}

// Integration tests for link classification and markdown rendering working
// together: Reddit links in markdown must come out pointing at the gateway,
// everything else must pass through untouched.
use std::sync::Arc;

use geddit::{
    adapters::Md2Gemtext,
    core::{GemtextRenderer, UrlClassifier},
};

const BASE: &str = "gemini://example.org/cgi-bin/geddit/";

fn renderer() -> GemtextRenderer {
    GemtextRenderer::new(Arc::new(Md2Gemtext::new()), UrlClassifier::new(BASE))
}

#[test]
fn test_reddit_link_in_markdown_is_rewritten() {
    let lines = renderer().render("See [this thread](https://www.reddit.com/r/test/comments/abc123/title/) for details.");
    assert!(
        lines.contains(&format!(
            "=> {BASE}r/test/comments/abc123/title/ this thread"
        )),
        "got: {lines:?}"
    );
}

#[test]
fn test_foreign_link_in_markdown_is_preserved() {
    let lines = renderer().render("See [the docs](https://docs.example.com/guide).");
    assert!(lines.contains(&"=> https://docs.example.com/guide the docs".to_string()));
}

#[test]
fn test_unsupported_reddit_path_is_not_rewritten() {
    let lines = renderer().render("[wiki](https://www.reddit.com/r/test/wiki/index)");
    assert!(lines.contains(&"=> https://www.reddit.com/r/test/wiki/index wiki".to_string()));
}

#[test]
fn test_markdown_headings_are_demoted() {
    let lines = renderer().render("# Top\n\nbody text\n\n## Sub");
    assert!(lines.contains(&"## Top".to_string()));
    assert!(lines.contains(&"### Sub".to_string()));
    assert!(lines.contains(&"body text".to_string()));
}

#[test]
fn test_rendered_gateway_links_are_stable_on_second_pass() {
    // Rendering output that already points at the gateway must not be
    // rewritten again if it flows through the classifier a second time.
    let classifier = UrlClassifier::new(BASE);
    let first = classifier.classify("https://reddit.com/r/test");
    assert!(first.gateway_target);
    let second = classifier.classify(&first.url);
    assert!(!second.gateway_target);
    assert_eq!(second.url, first.url);
}

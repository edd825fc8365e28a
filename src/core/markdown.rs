//! Gemtext rendering of Reddit markdown.
//!
//! Wraps the [`MarkdownConverter`] port and post-processes its output:
//! headings are demoted one level so the `#` level stays reserved for page
//! titles, and `=> ` link lines get their targets rewritten through the URL
//! classifier so a browsing client stays inside the gateway.
use std::sync::Arc;

use crate::{core::classify::UrlClassifier, ports::markdown::MarkdownConverter};

/// Renders markdown to post-processed gemtext lines.
#[derive(Clone)]
pub struct GemtextRenderer {
    converter: Arc<dyn MarkdownConverter>,
    classifier: UrlClassifier,
}

impl GemtextRenderer {
    pub fn new(converter: Arc<dyn MarkdownConverter>, classifier: UrlClassifier) -> Self {
        Self {
            converter,
            classifier,
        }
    }

    /// Convert markdown to gemtext lines, demoting headings and rewriting
    /// link targets.
    pub fn render(&self, markdown: &str) -> Vec<String> {
        self.converter
            .to_gemtext(markdown)
            .split('\n')
            .map(|line| self.adjust_line(line))
            .collect()
    }

    fn adjust_line(&self, line: &str) -> String {
        if line.starts_with('#') {
            format!("#{line}")
        } else if line.starts_with("=> ") {
            // The target is the first space-delimited token after the
            // prefix; the label is preserved verbatim.
            let mut tokens: Vec<String> = line.split(' ').map(str::to_string).collect();
            if let Some(target) = tokens.get_mut(1) {
                *target = self.classifier.classify(target).url;
            }
            tokens.join(" ")
        } else {
            line.to_string()
        }
    }
}

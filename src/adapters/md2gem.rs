//! Markdown to gemtext conversion using pulldown-cmark.
//!
//! Implements the [`MarkdownConverter`] port. Gemtext is line-oriented, so
//! paragraphs are flattened to single lines and inline links are collected
//! per block and emitted as a trailing `=> ` line group, the paragraph-style
//! link placement the core renderer expects. Heading levels are emitted 1:1
//! (capped at gemtext's three levels); demotion is the renderer's job.
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

use crate::ports::markdown::MarkdownConverter;

/// pulldown-cmark backed converter.
pub struct Md2Gemtext {
    options: Options,
}

impl Md2Gemtext {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_STRIKETHROUGH);
        Self { options }
    }
}

impl Default for Md2Gemtext {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownConverter for Md2Gemtext {
    fn to_gemtext(&self, markdown: &str) -> String {
        let mut writer = Writer::default();
        for event in Parser::new_ext(markdown, self.options) {
            writer.event(event);
        }
        writer.finish()
    }
}

/// Accumulates gemtext lines from a markdown event stream.
#[derive(Default)]
struct Writer {
    lines: Vec<String>,
    current: String,
    /// Links collected in the current block: (target, label).
    links: Vec<(String, String)>,
    link_dest: Option<String>,
    link_label: String,
    quote_depth: usize,
    in_code_block: bool,
}

impl Writer {
    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(Tag::Paragraph) => self.flush_line(),
            Event::End(TagEnd::Paragraph) => self.end_block(),
            Event::Start(Tag::Heading { level, .. }) => {
                self.flush_line();
                let depth = (level as usize).min(3);
                self.current = format!("{} ", "#".repeat(depth));
            }
            Event::End(TagEnd::Heading(_)) => self.end_block(),
            Event::Start(Tag::Item) => {
                self.flush_line();
                self.current.push_str("* ");
            }
            Event::End(TagEnd::Item) => self.flush_line(),
            Event::End(TagEnd::List(_)) => self.end_block(),
            Event::Start(Tag::BlockQuote(_)) => self.quote_depth += 1,
            Event::End(TagEnd::BlockQuote(_)) => {
                self.quote_depth = self.quote_depth.saturating_sub(1);
                if self.quote_depth == 0 {
                    self.end_block();
                }
            }
            Event::Start(Tag::CodeBlock(kind)) => {
                self.flush_line();
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => info.to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                self.lines.push(format!("```{lang}"));
                self.in_code_block = true;
            }
            Event::End(TagEnd::CodeBlock) => {
                self.in_code_block = false;
                self.lines.push("```".to_string());
                self.blank_line();
            }
            Event::Start(Tag::Link { dest_url, .. }) => {
                self.link_dest = Some(dest_url.to_string());
                self.link_label.clear();
            }
            Event::End(TagEnd::Link) => {
                if let Some(dest) = self.link_dest.take() {
                    self.links.push((dest, self.link_label.clone()));
                }
            }
            Event::Start(Tag::Image { dest_url, .. }) => {
                self.link_dest = Some(dest_url.to_string());
                self.link_label.clear();
            }
            Event::End(TagEnd::Image) => {
                if let Some(dest) = self.link_dest.take() {
                    self.links.push((dest, self.link_label.clone()));
                }
            }
            Event::Text(text) => {
                if self.in_code_block {
                    for line in text.trim_end_matches('\n').split('\n') {
                        self.lines.push(line.to_string());
                    }
                } else {
                    if self.link_dest.is_some() {
                        self.link_label.push_str(&text);
                    }
                    self.current.push_str(&text);
                }
            }
            Event::Code(code) => {
                if self.link_dest.is_some() {
                    self.link_label.push_str(&code);
                }
                self.current.push_str(&format!("`{code}`"));
            }
            Event::SoftBreak => self.current.push(' '),
            Event::HardBreak => self.flush_line(),
            Event::Rule => {
                self.flush_line();
                self.blank_line();
            }
            _ => {}
        }
    }

    /// Close the current line, applying the blockquote prefix.
    fn flush_line(&mut self) {
        if self.current.is_empty() {
            return;
        }
        let line = std::mem::take(&mut self.current);
        if self.quote_depth > 0 {
            self.lines.push(format!("> {line}"));
        } else {
            self.lines.push(line);
        }
    }

    /// Close a block: flush the text line, emit collected links, then a
    /// separating blank line.
    fn end_block(&mut self) {
        self.flush_line();
        for (dest, label) in std::mem::take(&mut self.links) {
            if label.is_empty() {
                self.lines.push(format!("=> {dest}"));
            } else {
                self.lines.push(format!("=> {dest} {label}"));
            }
        }
        self.blank_line();
    }

    fn blank_line(&mut self) {
        if self.lines.last().is_some_and(|l| !l.is_empty()) {
            self.lines.push(String::new());
        }
    }

    fn finish(mut self) -> String {
        self.end_block();
        while self.lines.last().is_some_and(String::is_empty) {
            self.lines.pop();
        }
        self.lines.join("\n")
    }
}

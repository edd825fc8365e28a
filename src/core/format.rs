//! Content formatters.
//!
//! Pure functions from content models to ordered gemtext lines. Fragments
//! compose by concatenation with blank-line separators; every paginated
//! section is capped at [`ITEM_LIMIT`] items and renders a placeholder line
//! instead of an empty list.
use thiserror::Error;
use url::Url;

use crate::{
    core::{
        classify::UrlClassifier,
        markdown::GemtextRenderer,
        model::{
            Comment, Redditor, SubredditInfo, Submission, author_name, format_timestamp,
        },
    },
    ports::reddit::CommentThread,
};

/// Fixed cap on rendered items per paginated section.
pub const ITEM_LIMIT: usize = 25;

/// Placeholder for empty submission or comment listings.
pub const EMPTY_LISTING: &str = "There's nothing here!";

/// Error for a parent fullname without a `t1_` or `t3_` prefix. Comments
/// always reply to a comment or a submission, so anything else is a decoding
/// defect.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Bad parent id \"{0}\". Expecting it to start with t1_ or t3_.")]
pub struct BadParentId(pub String);

/// Turns content models into gemtext pages.
#[derive(Clone)]
pub struct PageFormatter {
    classifier: UrlClassifier,
    renderer: GemtextRenderer,
}

impl PageFormatter {
    pub fn new(classifier: UrlClassifier, renderer: GemtextRenderer) -> Self {
        Self {
            classifier,
            renderer,
        }
    }

    /// Subreddit listing page: header, metadata, then submission summaries.
    pub fn subreddit_page(&self, sub: &SubredditInfo, submissions: &[Submission]) -> Vec<String> {
        let timestamp = format_timestamp(sub.created_utc, true, false);
        let mut lines = vec![
            format!("# Subreddit: {}", sub.display_name),
            format!("Created on {timestamp}. {} subscribers.", sub.subscribers),
            String::new(),
            "## Submissions".to_string(),
            String::new(),
        ];

        let shown = &submissions[..submissions.len().min(ITEM_LIMIT)];
        if shown.is_empty() {
            lines.push(EMPTY_LISTING.to_string());
        }
        for submission in shown {
            lines.extend(self.submission_summary(submission));
            lines.push(String::new());
        }

        lines
    }

    /// Three-line submission summary used in listings and profile pages.
    pub fn submission_summary(&self, submission: &Submission) -> Vec<String> {
        let url = self.classifier.classify(&submission.url).url;
        let author = author_name(submission.author.as_deref());
        let timestamp = format_timestamp(submission.created_utc, false, submission.edited);
        // Scheme and host of the external target, so the reader can see
        // where the link leads before following it.
        let (scheme, host) = match Url::parse(&submission.url) {
            Ok(parsed) => (
                parsed.scheme().to_string(),
                parsed.host_str().unwrap_or("").to_string(),
            ),
            Err(_) => (String::new(), String::new()),
        };
        let comments_url = self.classifier.classify(&submission.permalink).url;

        vec![
            format!("=> {url} {}", submission.title),
            format!(
                "created by {author} on {timestamp} - {} upvotes ({scheme}, {host})",
                submission.score
            ),
            format!("=> {comments_url} {} comments", submission.num_comments),
        ]
    }

    /// Submission thread page: header block, rendered self text, then the
    /// top-level comments.
    pub fn submission_page(&self, submission: &Submission, comments: &[Comment]) -> Vec<String> {
        let timestamp = format_timestamp(submission.created_utc, false, submission.edited);
        let total = comments.len();
        let shown = &comments[..total.min(ITEM_LIMIT)];

        let mut lines = vec![
            format!("# {}", submission.title),
            format!("=> {}", submission.url),
            format!(
                "created by {} on {timestamp}",
                author_name(submission.author.as_deref())
            ),
            format!(
                "{} upvotes, {total} top-level comments (showing {})",
                submission.score,
                shown.len()
            ),
            String::new(),
        ];

        if !submission.selftext.is_empty() {
            lines.extend(self.renderer.render(&submission.selftext));
            lines.push(String::new());
        }

        lines.push(String::new());
        lines.push("# Comments".to_string());
        lines.push(String::new());

        if shown.is_empty() {
            lines.push(EMPTY_LISTING.to_string());
        }
        for comment in shown {
            lines.extend(self.comment_summary(comment, true));
            lines.push(String::new());
        }

        lines
    }

    /// Comment permalink page: header block, links back to the submission
    /// and (when the parent is a comment) the parent, the rendered body,
    /// then the replies.
    pub fn comment_page(&self, thread: &CommentThread) -> Result<Vec<String>, BadParentId> {
        let comment = &thread.comment;
        let author = author_name(comment.author.as_deref());
        let timestamp = format_timestamp(comment.created_utc, false, comment.edited);
        let total = comment.replies.len();
        let shown = &comment.replies[..total.min(ITEM_LIMIT)];

        let mut lines = vec![
            format!("# Comment by {author} on {timestamp}"),
            format!(
                "{} upvotes, {total} direct replies (showing {})",
                comment.score,
                shown.len()
            ),
            format!(
                "=> {} View submission: {}",
                self.submission_url(comment),
                thread.submission_title
            ),
        ];

        let (parent_url, parent_is_submission) = self.parent_url(comment)?;
        if !parent_is_submission {
            lines.push(format!("=> {parent_url} View parent comment"));
        }

        lines.push(String::new());
        lines.extend(self.renderer.render(&comment.body));
        lines.push(String::new());
        lines.push(String::new());
        lines.push("# Replies".to_string());
        lines.push(String::new());

        if shown.is_empty() {
            lines.push(EMPTY_LISTING.to_string());
        }
        for reply in shown {
            lines.extend(self.comment_summary(reply, true));
            lines.push(String::new());
        }

        Ok(lines)
    }

    /// Comment summary used in thread and listing contexts.
    ///
    /// `show_reply_count` should only be set when the comment came from an
    /// already loaded tree; counting replies otherwise would need another
    /// round trip per comment.
    pub fn comment_summary(&self, comment: &Comment, show_reply_count: bool) -> Vec<String> {
        let author = author_name(comment.author.as_deref());
        let timestamp = format_timestamp(comment.created_utc, false, comment.edited);
        let url = self.classifier.classify(&comment.permalink).url;

        let mut metadata = format!("{} upvotes", comment.score);
        if show_reply_count {
            metadata.push_str(&format!(", {} direct replies", comment.replies.len()));
        }

        let mut lines = vec![
            format!("=> {url} Comment by {author} at {timestamp}"),
            metadata,
            String::new(),
        ];
        lines.extend(self.renderer.render(&comment.body));
        lines
    }

    /// User profile page. Suspended accounts short-circuit to a notice line;
    /// the caller must not have fetched listings for them.
    pub fn redditor_page(
        &self,
        redditor: &Redditor,
        submissions: &[Submission],
        comments: &[Comment],
    ) -> Vec<String> {
        let mut lines = vec![format!("# Redditor: {}", redditor.name)];

        if redditor.is_suspended {
            lines.push("User is banned or suspended.".to_string());
            return lines;
        }

        let timestamp = format_timestamp(redditor.created_utc, true, false);
        lines.push(format!(
            "Redditor since {timestamp} ({} link karma, {} comment karma)",
            redditor.link_karma, redditor.comment_karma
        ));
        lines.push(String::new());

        lines.push("# Submissions".to_string());
        lines.push(String::new());
        let shown = &submissions[..submissions.len().min(ITEM_LIMIT)];
        if shown.is_empty() {
            lines.push("User has no submissions.".to_string());
            lines.push(String::new());
        }
        for submission in shown {
            lines.extend(self.submission_summary(submission));
            lines.push(String::new());
        }

        lines.push("# Comments".to_string());
        lines.push(String::new());
        let shown = &comments[..comments.len().min(ITEM_LIMIT)];
        if shown.is_empty() {
            lines.push("User has no comments.".to_string());
            lines.push(String::new());
        }
        for comment in shown {
            lines.extend(self.comment_summary(comment, false));
            lines.push(String::new());
        }

        lines
    }

    /// Gateway URL of the submission a comment belongs to: the permalink
    /// minus its trailing comment-id segment.
    fn submission_url(&self, comment: &Comment) -> String {
        let trimmed = comment.permalink.trim_end_matches('/');
        let without_id = match trimmed.rfind('/') {
            Some(pos) => &trimmed[..pos],
            None => trimmed,
        };
        self.classifier.classify(without_id).url
    }

    /// Gateway URL of a comment's parent, plus whether that parent is the
    /// submission itself.
    fn parent_url(&self, comment: &Comment) -> Result<(String, bool), BadParentId> {
        if let Some(parent_id) = comment.parent_id.strip_prefix("t1_") {
            // Parent is a comment: swap the trailing id segment of this
            // comment's permalink for the parent's id.
            let trimmed = comment.permalink.trim_end_matches('/');
            let mut fragments: Vec<&str> = trimmed.split('/').collect();
            if let Some(last) = fragments.last_mut() {
                *last = parent_id;
            }
            Ok((self.classifier.classify(&fragments.join("/")).url, false))
        } else if comment.parent_id.starts_with("t3_") {
            Ok((self.submission_url(comment), true))
        } else {
            Err(BadParentId(comment.parent_id.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{core::markdown::GemtextRenderer, ports::markdown::MarkdownConverter};

    struct Passthrough;

    impl MarkdownConverter for Passthrough {
        fn to_gemtext(&self, markdown: &str) -> String {
            markdown.to_string()
        }
    }

    const BASE: &str = "gemini://example.org/";

    fn formatter() -> PageFormatter {
        let classifier = UrlClassifier::new(BASE);
        let renderer = GemtextRenderer::new(Arc::new(Passthrough), classifier.clone());
        PageFormatter::new(classifier, renderer)
    }

    fn submission(id: &str) -> Submission {
        Submission {
            id: id.to_string(),
            title: format!("Title {id}"),
            author: Some("alice".to_string()),
            created_utc: 1614602096,
            edited: false,
            score: 42,
            url: "https://example.com/article".to_string(),
            permalink: format!("/r/test/comments/{id}/title_{id}/"),
            selftext: String::new(),
            num_comments: 7,
        }
    }

    fn comment(id: &str, parent_id: &str) -> Comment {
        Comment {
            id: id.to_string(),
            author: Some("bob".to_string()),
            created_utc: 1614602096,
            edited: false,
            score: 3,
            body: "A comment body.".to_string(),
            permalink: format!("/r/test/comments/abc123/title/{id}/"),
            parent_id: parent_id.to_string(),
            replies: Vec::new(),
        }
    }

    #[test]
    fn test_subreddit_page_header_and_sections() {
        let sub = SubredditInfo {
            display_name: "test".to_string(),
            created_utc: 1614602096,
            subscribers: 1234,
        };
        let lines = formatter().subreddit_page(&sub, &[submission("abc")]);
        assert_eq!(lines[0], "# Subreddit: test");
        assert_eq!(lines[1], "Created on 01/03/2021. 1234 subscribers.");
        assert_eq!(lines[3], "## Submissions");
        assert!(lines.contains(&"=> https://example.com/article Title abc".to_string()));
    }

    #[test]
    fn test_subreddit_page_empty_placeholder() {
        let sub = SubredditInfo {
            display_name: "ghost".to_string(),
            created_utc: 0,
            subscribers: 0,
        };
        let lines = formatter().subreddit_page(&sub, &[]);
        assert!(lines.contains(&EMPTY_LISTING.to_string()));
    }

    #[test]
    fn test_submission_summary_shape() {
        let lines = formatter().submission_summary(&submission("abc"));
        assert_eq!(
            lines,
            vec![
                "=> https://example.com/article Title abc".to_string(),
                "created by alice on 01/03/2021 at 12:34 UTC - 42 upvotes (https, example.com)"
                    .to_string(),
                "=> gemini://example.org/r/test/comments/abc/title_abc/ 7 comments".to_string(),
            ]
        );
    }

    #[test]
    fn test_submission_summary_deleted_author_and_edited() {
        let mut s = submission("abc");
        s.author = None;
        s.edited = true;
        let lines = formatter().submission_summary(&s);
        assert!(lines[1].starts_with("created by [deleted] on 01/03/2021 at 12:34 UTC*"));
    }

    #[test]
    fn test_submission_page_counts_capped_at_limit() {
        let comments: Vec<Comment> = (0..30)
            .map(|i| comment(&format!("c{i}"), "t3_abc123"))
            .collect();
        let lines = formatter().submission_page(&submission("abc123"), &comments);
        assert!(
            lines.contains(&"42 upvotes, 30 top-level comments (showing 25)".to_string()),
            "got: {lines:?}"
        );
        let rendered = lines
            .iter()
            .filter(|l| l.contains("Comment by bob"))
            .count();
        assert_eq!(rendered, 25);
    }

    #[test]
    fn test_submission_page_selftext_rendered_when_present() {
        let mut s = submission("abc123");
        s.selftext = "Some **body** text".to_string();
        let lines = formatter().submission_page(&s, &[]);
        assert!(lines.contains(&"Some **body** text".to_string()));
        assert!(lines.contains(&EMPTY_LISTING.to_string()));
    }

    #[test]
    fn test_comment_page_parent_comment_link() {
        let thread = CommentThread {
            comment: comment("def456", "t1_parent1"),
            submission_title: "Title abc123".to_string(),
        };
        let lines = formatter().comment_page(&thread).unwrap();
        assert_eq!(lines[0], "# Comment by bob on 01/03/2021 at 12:34 UTC");
        assert!(lines.contains(
            &"=> gemini://example.org/r/test/comments/abc123/title View submission: Title abc123"
                .to_string()
        ));
        assert!(lines.contains(
            &"=> gemini://example.org/r/test/comments/abc123/title/parent1 View parent comment"
                .to_string()
        ));
    }

    #[test]
    fn test_comment_page_no_parent_link_for_top_level() {
        let thread = CommentThread {
            comment: comment("def456", "t3_abc123"),
            submission_title: "Title abc123".to_string(),
        };
        let lines = formatter().comment_page(&thread).unwrap();
        assert!(!lines.iter().any(|l| l.contains("View parent comment")));
    }

    #[test]
    fn test_comment_page_bad_parent_id() {
        let thread = CommentThread {
            comment: comment("def456", "t5_weird"),
            submission_title: "irrelevant".to_string(),
        };
        let err = formatter().comment_page(&thread).unwrap_err();
        assert_eq!(err, BadParentId("t5_weird".to_string()));
    }

    #[test]
    fn test_comment_summary_reply_count_optional() {
        let mut c = comment("def456", "t3_abc123");
        c.replies = vec![comment("r1", "t1_def456"), comment("r2", "t1_def456")];
        let with = formatter().comment_summary(&c, true);
        assert_eq!(with[1], "3 upvotes, 2 direct replies");
        let without = formatter().comment_summary(&c, false);
        assert_eq!(without[1], "3 upvotes");
    }

    #[test]
    fn test_redditor_page_suspended_short_circuits() {
        let redditor = Redditor {
            name: "someuser".to_string(),
            created_utc: 1614602096,
            is_suspended: true,
            link_karma: 0,
            comment_karma: 0,
        };
        let lines = formatter().redditor_page(&redditor, &[], &[]);
        assert_eq!(
            lines,
            vec![
                "# Redditor: someuser".to_string(),
                "User is banned or suspended.".to_string(),
            ]
        );
    }

    #[test]
    fn test_redditor_page_sections_and_placeholders() {
        let redditor = Redditor {
            name: "alice".to_string(),
            created_utc: 1614602096,
            is_suspended: false,
            link_karma: 100,
            comment_karma: 200,
        };
        let lines = formatter().redditor_page(&redditor, &[], &[comment("c1", "t3_x")]);
        assert_eq!(
            lines[1],
            "Redditor since 01/03/2021 (100 link karma, 200 comment karma)"
        );
        assert!(lines.contains(&"User has no submissions.".to_string()));
        assert!(!lines.contains(&"User has no comments.".to_string()));
    }
}

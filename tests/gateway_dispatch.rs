// Integration tests for request dispatch: path shapes in, Gemini response
// envelopes out, with a canned Reddit API double standing in for upstream.
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use geddit::{
    config::GatewayConfig,
    core::{
        Response, Router,
        model::{Comment, Redditor, SortOrder, SubredditInfo, Submission},
        router,
    },
    ports::{
        MarkdownConverter,
        reddit::{CommentThread, RedditApi, RedditApiResult},
    },
};

const BASE: &str = "gemini://example.org/cgi-bin/geddit/";

fn submission(id: &str) -> Submission {
    Submission {
        id: id.to_string(),
        title: format!("Title {id}"),
        author: Some("alice".to_string()),
        created_utc: 1614602096,
        edited: false,
        score: 42,
        url: "https://example.com/article".to_string(),
        permalink: format!("/r/test/comments/{id}/title/"),
        selftext: String::new(),
        num_comments: 7,
    }
}

fn comment(id: &str) -> Comment {
    Comment {
        id: id.to_string(),
        author: Some("bob".to_string()),
        created_utc: 1614602096,
        edited: false,
        score: 3,
        body: "A comment body.".to_string(),
        permalink: format!("/r/test/comments/abc123/title/{id}/"),
        parent_id: "t3_abc123".to_string(),
        replies: Vec::new(),
    }
}

/// Canned upstream. Counts listing fetches so tests can assert the
/// suspended-profile short circuit.
#[derive(Default)]
struct FakeReddit {
    suspended: bool,
    top_level_comments: usize,
    listings_fetched: AtomicBool,
}

#[async_trait]
impl RedditApi for FakeReddit {
    async fn subreddit(&self, name: &str) -> RedditApiResult<SubredditInfo> {
        Ok(SubredditInfo {
            display_name: name.to_string(),
            created_utc: 1614602096,
            subscribers: 1234,
        })
    }

    async fn subreddit_submissions(
        &self,
        _name: &str,
        _sort: SortOrder,
        limit: usize,
    ) -> RedditApiResult<Vec<Submission>> {
        Ok((0..limit.min(3))
            .map(|i| submission(&format!("s{i}")))
            .collect())
    }

    async fn submission(&self, id: &str) -> RedditApiResult<(Submission, Vec<Comment>)> {
        let comments = (0..self.top_level_comments)
            .map(|i| comment(&format!("c{i}")))
            .collect();
        Ok((submission(id), comments))
    }

    async fn comment_thread(&self, id: &str) -> RedditApiResult<CommentThread> {
        Ok(CommentThread {
            comment: comment(id),
            submission_title: "Title abc123".to_string(),
        })
    }

    async fn redditor(&self, name: &str) -> RedditApiResult<Redditor> {
        Ok(Redditor {
            name: name.to_string(),
            created_utc: 1614602096,
            is_suspended: self.suspended,
            link_karma: 100,
            comment_karma: 200,
        })
    }

    async fn redditor_submissions(
        &self,
        _name: &str,
        _limit: usize,
    ) -> RedditApiResult<Vec<Submission>> {
        self.listings_fetched.store(true, Ordering::SeqCst);
        Ok(vec![submission("s1")])
    }

    async fn redditor_comments(&self, _name: &str, _limit: usize) -> RedditApiResult<Vec<Comment>> {
        self.listings_fetched.store(true, Ordering::SeqCst);
        Ok(vec![comment("c1")])
    }
}

struct Passthrough;

impl MarkdownConverter for Passthrough {
    fn to_gemtext(&self, markdown: &str) -> String {
        markdown.to_string()
    }
}

fn test_router(fake: FakeReddit) -> (Router, Arc<FakeReddit>) {
    let config = Arc::new(GatewayConfig {
        base_url: BASE.to_string(),
        ..GatewayConfig::default()
    });
    let fake = Arc::new(fake);
    let router = Router::new(config, fake.clone(), Arc::new(Passthrough));
    (router, fake)
}

fn body_of(response: Response) -> String {
    match response {
        Response::Success { body } => body,
        other => panic!("expected success, got {other:?}"),
    }
}

#[tokio::test]
async fn test_subreddit_listing_page() {
    let (router, _) = test_router(FakeReddit::default());
    let body = body_of(router.dispatch("/r/test", "").await.unwrap());
    assert!(body.starts_with("# Subreddit: test\n"));
    assert!(body.contains("## Submissions"));
    assert!(body.contains("=> https://example.com/article Title s0"));
}

#[tokio::test]
async fn test_submission_thread_page() {
    let (router, _) = test_router(FakeReddit {
        top_level_comments: 2,
        ..FakeReddit::default()
    });
    let body = body_of(router.dispatch("/r/test/comments/abc123", "").await.unwrap());
    assert!(body.starts_with("# Title abc123\n"));
    assert!(body.contains("=> https://example.com/article"));
    assert!(body.contains("# Comments"));
    assert!(body.contains("42 upvotes, 2 top-level comments (showing 2)"));
}

#[tokio::test]
async fn test_submission_thread_caps_comments_at_item_limit() {
    let (router, _) = test_router(FakeReddit {
        top_level_comments: 30,
        ..FakeReddit::default()
    });
    let body = body_of(router.dispatch("/r/test/comments/abc123", "").await.unwrap());
    assert!(body.contains("42 upvotes, 30 top-level comments (showing 25)"));
}

#[tokio::test]
async fn test_comment_thread_page() {
    let (router, _) = test_router(FakeReddit::default());
    let body = body_of(
        router
            .dispatch("/r/test/comments/abc123/title/def456", "")
            .await
            .unwrap(),
    );
    assert!(body.starts_with("# Comment by bob on"));
    assert!(body.contains("View submission: Title abc123"));
    assert!(body.contains("# Replies"));
}

#[tokio::test]
async fn test_bare_subreddit_with_query_redirects_permanently() {
    let (router, _) = test_router(FakeReddit::default());
    let response = router.dispatch("/r/", "foo").await.unwrap();
    assert_eq!(
        response,
        Response::Redirect {
            url: format!("{BASE}r/foo"),
            permanent: true,
        }
    );
}

#[tokio::test]
async fn test_bare_subreddit_without_query_prompts() {
    let (router, _) = test_router(FakeReddit::default());
    let response = router.dispatch("/r/", "").await.unwrap();
    assert_eq!(
        response,
        Response::Input {
            prompt: "Enter subreddit name:".to_string(),
        }
    );
}

#[tokio::test]
async fn test_suspended_profile_is_two_lines_and_fetches_nothing() {
    let (router, fake) = test_router(FakeReddit {
        suspended: true,
        ..FakeReddit::default()
    });
    let body = body_of(router.dispatch("/u/someuser", "").await.unwrap());
    assert_eq!(body, "# Redditor: someuser\nUser is banned or suspended.");
    assert!(!fake.listings_fetched.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_active_profile_renders_sections() {
    let (router, fake) = test_router(FakeReddit::default());
    let body = body_of(router.dispatch("/u/someuser", "").await.unwrap());
    assert!(body.contains("Redditor since 01/03/2021 (100 link karma, 200 comment karma)"));
    assert!(body.contains("# Submissions"));
    assert!(body.contains("# Comments"));
    assert!(fake.listings_fetched.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_unknown_command_echoes_path() {
    let (router, _) = test_router(FakeReddit::default());
    let response = router.dispatch("/x/y", "").await.unwrap();
    match response {
        Response::BadRequest { message } => assert!(message.contains("/x/y")),
        other => panic!("expected bad request, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_path_without_landing_page() {
    let (router, _) = test_router(FakeReddit::default());
    let body = body_of(router.dispatch("", "").await.unwrap());
    assert_eq!(body, router::WORKING_NOTICE);
}

#[tokio::test]
async fn test_empty_path_with_landing_page() {
    let page = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(page.path(), "# Welcome\nHello there.\n").unwrap();
    let config = Arc::new(GatewayConfig {
        base_url: BASE.to_string(),
        landing_page: Some(page.path().to_str().unwrap().to_string()),
        ..GatewayConfig::default()
    });
    let router = Router::new(config, Arc::new(FakeReddit::default()), Arc::new(Passthrough));
    let body = body_of(router.dispatch("/", "").await.unwrap());
    assert_eq!(body, "# Welcome\nHello there.\n");
}

#[tokio::test]
async fn test_check_only_agrees_with_live_dispatch() {
    let (router_live, _) = test_router(FakeReddit::default());
    for path in [
        "",
        "/",
        "/r/",
        "/r/test",
        "/r/test/",
        "/r/test/comments/abc123",
        "/r/test/comments/abc123/title/def456",
        "/r/test/extra",
        "/u/",
        "/u/someuser",
        "/u/someuser/comments",
        "/x/y",
        "/wiki/index",
    ] {
        let supported = router::supports(path);
        let response = router_live.dispatch(path, "").await.unwrap();
        let rejected_for_shape = matches!(response, Response::BadRequest { .. });
        assert_eq!(
            supported, !rejected_for_shape,
            "check-only and live dispatch disagree on {path:?}"
        );
    }
}

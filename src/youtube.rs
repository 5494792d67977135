//! YouTube Data API v3 comment fetching.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::config::Settings;
use crate::error::{AppError, Result};

/// Hard cap the API places on `maxResults` for `commentThreads.list`
pub const MAX_PAGE_SIZE: usize = 100;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// API payloads
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentThreadListResponse {
    #[serde(default)]
    pub items: Vec<CommentThread>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommentThread {
    pub snippet: CommentThreadSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentThreadSnippet {
    pub top_level_comment: TopLevelComment,
}

#[derive(Debug, Deserialize)]
pub struct TopLevelComment {
    pub snippet: CommentSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentSnippet {
    #[serde(default)]
    pub text_display: String,
    pub author_channel_id: Option<AuthorChannelId>,
    pub author_display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AuthorChannelId {
    pub value: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

/// One page of comment text plus the cursor for the next page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentPage {
    pub comments: Vec<String>,
    pub next_page_token: Option<String>,
}

impl From<CommentThreadListResponse> for CommentPage {
    /// Keeps only comments written by a channel; deleted or anonymous
    /// authors carry no `authorChannelId`.
    fn from(response: CommentThreadListResponse) -> Self {
        let comments = response
            .items
            .into_iter()
            .map(|thread| thread.snippet.top_level_comment.snippet)
            .filter(|snippet| snippet.author_channel_id.is_some())
            .map(|snippet| snippet.text_display)
            .collect();
        CommentPage {
            comments,
            next_page_token: response.next_page_token.filter(|t| !t.is_empty()),
        }
    }
}

// ============================================================================
// Comment source
// ============================================================================

/// Anything that can serve pages of top-level comments for a video.
#[async_trait]
pub trait CommentSource: Send + Sync {
    async fn fetch_page(
        &self,
        video_id: &str,
        page_token: Option<&str>,
        max_results: usize,
    ) -> Result<CommentPage>;
}

/// HTTP client for `commentThreads.list`
#[derive(Clone)]
pub struct YouTubeClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl YouTubeClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: settings.api_url.clone(),
            api_key: settings.api_key.clone(),
        })
    }
}

#[async_trait]
impl CommentSource for YouTubeClient {
    async fn fetch_page(
        &self,
        video_id: &str,
        page_token: Option<&str>,
        max_results: usize,
    ) -> Result<CommentPage> {
        let url = format!("{}/commentThreads", self.base_url);
        let mut query: Vec<(&str, String)> = vec![
            ("part", "snippet".to_string()),
            ("videoId", video_id.to_string()),
            ("maxResults", max_results.clamp(1, MAX_PAGE_SIZE).to_string()),
            ("textFormat", "plainText".to_string()),
            ("key", self.api_key.clone()),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token.to_string()));
        }

        let response = self.http.get(&url).query(&query).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(upstream_error(status.as_u16(), &body));
        }

        let payload: CommentThreadListResponse = response.json().await?;
        Ok(payload.into())
    }
}

fn upstream_error(status: u16, body: &str) -> AppError {
    let message = serde_json::from_str::<ApiErrorEnvelope>(body)
        .map(|e| e.error.message)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.chars().take(200).collect());
    AppError::Upstream { status, message }
}

/// Pages through the comment threads until `max_comments` are collected
/// or the API runs out of pages. Never returns more than `max_comments`.
pub async fn fetch_comments(
    source: &dyn CommentSource,
    video_id: &str,
    max_comments: usize,
) -> Result<Vec<String>> {
    let mut comments: Vec<String> = Vec::new();
    let mut page_token: Option<String> = None;
    let mut page_number = 0u32;

    while comments.len() < max_comments {
        let remaining = max_comments - comments.len();
        let page = source
            .fetch_page(video_id, page_token.as_deref(), remaining.min(MAX_PAGE_SIZE))
            .await?;
        page_number += 1;

        let take = page.comments.len().min(remaining);
        comments.extend(page.comments.into_iter().take(take));
        tracing::debug!(
            "📥 Page {} for {}: {} comments (total {})",
            page_number,
            video_id,
            take,
            comments.len()
        );

        match page.next_page_token {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }

    tracing::info!("📥 Fetched {} comments for {} in {} pages", comments.len(), video_id, page_number);
    Ok(comments)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Serves canned pages and records every request it receives.
    pub(crate) struct FakeSource {
        pages: Vec<CommentPage>,
        pub requests: Mutex<Vec<(Option<String>, usize)>>,
    }

    impl FakeSource {
        pub(crate) fn new(pages: Vec<CommentPage>) -> Self {
            Self {
                pages,
                requests: Mutex::new(Vec::new()),
            }
        }

        /// `count` pages of `per_page` comments each, chained by tokens.
        pub(crate) fn paged(count: usize, per_page: usize) -> Self {
            let pages = (0..count)
                .map(|p| CommentPage {
                    comments: (0..per_page).map(|c| format!("comment {}-{}", p, c)).collect(),
                    next_page_token: if p + 1 < count { Some(format!("page{}", p + 1)) } else { None },
                })
                .collect();
            Self::new(pages)
        }
    }

    #[async_trait]
    impl CommentSource for FakeSource {
        async fn fetch_page(
            &self,
            _video_id: &str,
            page_token: Option<&str>,
            max_results: usize,
        ) -> Result<CommentPage> {
            self.requests
                .lock()
                .unwrap()
                .push((page_token.map(str::to_string), max_results));
            let index = match page_token {
                None => 0,
                Some(token) => token.trim_start_matches("page").parse::<usize>().unwrap(),
            };
            let mut page = self.pages[index].clone();
            page.comments.truncate(max_results);
            Ok(page)
        }
    }

    struct FailingSource;

    #[async_trait]
    impl CommentSource for FailingSource {
        async fn fetch_page(&self, _: &str, _: Option<&str>, _: usize) -> Result<CommentPage> {
            Err(AppError::Upstream {
                status: 403,
                message: "The video has disabled comments.".to_string(),
            })
        }
    }

    const SAMPLE_RESPONSE: &str = r#"{
        "kind": "youtube#commentThreadListResponse",
        "nextPageToken": "QURTSl9p",
        "pageInfo": {"totalResults": 3, "resultsPerPage": 3},
        "items": [
            {"snippet": {"videoId": "dQw4w9WgXcQ", "topLevelComment": {"snippet": {
                "textDisplay": "Never gonna give you up",
                "authorDisplayName": "@fan",
                "authorChannelId": {"value": "UC123"}
            }}}},
            {"snippet": {"videoId": "dQw4w9WgXcQ", "topLevelComment": {"snippet": {
                "textDisplay": "orphaned comment",
                "authorDisplayName": ""
            }}}},
            {"snippet": {"videoId": "dQw4w9WgXcQ", "topLevelComment": {"snippet": {
                "textDisplay": "Classic 🔥",
                "authorChannelId": {"value": "UC456"}
            }}}}
        ]
    }"#;

    #[test]
    fn test_parse_response_skips_missing_author() {
        let response: CommentThreadListResponse = serde_json::from_str(SAMPLE_RESPONSE).unwrap();
        let page = CommentPage::from(response);
        assert_eq!(page.comments, vec!["Never gonna give you up", "Classic 🔥"]);
        assert_eq!(page.next_page_token.as_deref(), Some("QURTSl9p"));
    }

    #[test]
    fn test_parse_last_page() {
        let response: CommentThreadListResponse =
            serde_json::from_str(r#"{"items": [], "nextPageToken": ""}"#).unwrap();
        let page = CommentPage::from(response);
        assert!(page.comments.is_empty());
        assert!(page.next_page_token.is_none());
    }

    #[test]
    fn test_upstream_error_message() {
        let body = r#"{"error": {"code": 403, "message": "The request cannot be completed because you have exceeded your quota."}}"#;
        match upstream_error(403, body) {
            AppError::Upstream { status, message } => {
                assert_eq!(status, 403);
                assert!(message.contains("quota"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        match upstream_error(500, "Internal Server Error") {
            AppError::Upstream { message, .. } => assert_eq!(message, "Internal Server Error"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_stops_at_max() {
        let source = FakeSource::paged(5, 100);
        let comments = fetch_comments(&source, "dQw4w9WgXcQ", 250).await.unwrap();
        assert_eq!(comments.len(), 250);

        let requests = source.requests.lock().unwrap();
        assert_eq!(
            *requests,
            vec![
                (None, 100),
                (Some("page1".to_string()), 100),
                (Some("page2".to_string()), 50),
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_stops_without_next_token() {
        let source = FakeSource::paged(2, 30);
        let comments = fetch_comments(&source, "dQw4w9WgXcQ", 800).await.unwrap();
        assert_eq!(comments.len(), 60);
        assert_eq!(comments[0], "comment 0-0");
        assert_eq!(comments[59], "comment 1-29");
        assert_eq!(source.requests.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_zero_max_makes_no_request() {
        let source = FakeSource::paged(1, 10);
        let comments = fetch_comments(&source, "dQw4w9WgXcQ", 0).await.unwrap();
        assert!(comments.is_empty());
        assert!(source.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_propagates_errors() {
        let err = fetch_comments(&FailingSource, "dQw4w9WgXcQ", 10).await.unwrap_err();
        assert!(matches!(err, AppError::Upstream { status: 403, .. }));
    }
}

pub mod error;
pub mod types;

pub use error::{InstagramError, Result};
pub use types::{
    MediaEdge, PageInfo, ProfileUser, TimelineMedia, TimelinePageResponse, TimelinePost,
    WebProfileResponse,
};

use std::collections::VecDeque;

const BASE_URL: &str = "https://www.instagram.com";

/// App id the Instagram web client sends; the profile endpoint rejects
/// requests without it.
const WEB_APP_ID: &str = "936619743392459";

/// Query hash for the profile timeline GraphQL query.
const TIMELINE_QUERY_HASH: &str = "e769aa130647d2354c40ea6a439bfc08";

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Posts fetched per timeline page.
const PAGE_SIZE: u32 = 12;

#[derive(Clone)]
pub struct InstagramClient {
    client: reqwest::Client,
    session_id: Option<String>,
}

impl InstagramClient {
    /// Anonymous access works for public profiles; a `sessionid` cookie
    /// lifts the tighter anonymous rate limits.
    pub fn new(session_id: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            session_id,
        }
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let mut req = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header("x-ig-app-id", WEB_APP_ID);
        if let Some(session_id) = &self.session_id {
            req = req.header(reqwest::header::COOKIE, format!("sessionid={session_id}"));
        }
        req
    }

    /// Resolve a profile by username. Returns the numeric user id and the
    /// first timeline page.
    pub async fn fetch_profile(&self, username: &str) -> Result<ProfileUser> {
        let url = format!("{}/api/v1/users/web_profile_info/", BASE_URL);
        let resp = self.get(&url).query(&[("username", username)]).send().await?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(InstagramError::ProfileNotFound(username.to_string()));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(InstagramError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let profile: WebProfileResponse = resp.json().await?;
        profile
            .data
            .user
            .ok_or_else(|| InstagramError::ProfileNotFound(username.to_string()))
    }

    /// Fetch one timeline page after the given cursor.
    pub async fn fetch_posts_page(&self, user_id: &str, after: &str) -> Result<TimelineMedia> {
        let variables = serde_json::json!({
            "id": user_id,
            "first": PAGE_SIZE,
            "after": after,
        })
        .to_string();

        let url = format!("{}/graphql/query/", BASE_URL);
        let resp = self
            .get(&url)
            .query(&[
                ("query_hash", TIMELINE_QUERY_HASH),
                ("variables", variables.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(InstagramError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let page: TimelinePageResponse = resp.json().await?;
        page.data
            .user
            .map(|user| user.timeline_media)
            .ok_or_else(|| InstagramError::Parse("missing user in timeline page".to_string()))
    }

    /// Open a profile's post feed. Resolves the profile up front; paging
    /// happens lazily as the feed is consumed.
    pub async fn posts(&self, username: &str) -> Result<PostFeed> {
        tracing::info!(username, "Opening profile feed");
        let profile = self.fetch_profile(username).await?;
        tracing::debug!(
            user_id = %profile.id,
            post_count = profile.timeline_media.count,
            "Profile resolved"
        );
        Ok(PostFeed::new(self.clone(), profile))
    }
}

/// Lazily paged feed of a profile's posts in native reverse-chronological
/// order. Finite and non-restartable: once drained it stays empty.
pub struct PostFeed {
    client: InstagramClient,
    user_id: String,
    buffer: VecDeque<TimelinePost>,
    next_cursor: Option<String>,
}

impl PostFeed {
    fn new(client: InstagramClient, profile: ProfileUser) -> Self {
        let media = profile.timeline_media;
        let next_cursor = media.page_info.next_cursor();
        Self {
            client,
            user_id: profile.id,
            buffer: media.edges.into_iter().map(|edge| edge.node).collect(),
            next_cursor,
        }
    }

    /// Yield the next post, fetching the next page on demand. `Ok(None)`
    /// once the profile's timeline is exhausted.
    pub async fn try_next(&mut self) -> Result<Option<TimelinePost>> {
        loop {
            if let Some(post) = self.buffer.pop_front() {
                return Ok(Some(post));
            }
            let Some(cursor) = self.next_cursor.take() else {
                return Ok(None);
            };
            let page = self.client.fetch_posts_page(&self.user_id, &cursor).await?;
            tracing::debug!(fetched = page.edges.len(), "Fetched timeline page");
            self.next_cursor = page.page_info.next_cursor();
            self.buffer
                .extend(page.edges.into_iter().map(|edge| edge.node));
        }
    }
}

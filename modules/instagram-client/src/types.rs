use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

/// Response envelope for the `web_profile_info` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct WebProfileResponse {
    pub data: WebProfileData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebProfileData {
    /// Absent for unknown or inaccessible profiles.
    pub user: Option<ProfileUser>,
}

/// The slice of a profile the timeline feed needs: the numeric user id
/// (required for paging) and the first page of posts.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileUser {
    pub id: String,
    pub username: Option<String>,
    #[serde(rename = "edge_owner_to_timeline_media")]
    pub timeline_media: TimelineMedia,
}

/// One page of a profile's timeline, newest first.
#[derive(Debug, Clone, Deserialize)]
pub struct TimelineMedia {
    pub count: Option<i64>,
    pub page_info: PageInfo,
    #[serde(default)]
    pub edges: Vec<MediaEdge>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

impl PageInfo {
    /// Cursor for the next page, or `None` when the feed is exhausted.
    pub fn next_cursor(&self) -> Option<String> {
        if self.has_next_page {
            self.end_cursor.clone()
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaEdge {
    pub node: TimelinePost,
}

/// A single post from the timeline feed.
#[derive(Debug, Clone, Deserialize)]
pub struct TimelinePost {
    pub id: String,
    pub shortcode: String,
    #[serde(default)]
    pub is_video: bool,
    /// Machine-supplied media title. Reels with licensed audio carry the
    /// track here, formatted as "Song Title · Artist Name".
    pub title: Option<String>,
    /// "clips" for Reels, "feed" or "igtv" otherwise.
    pub product_type: Option<String>,
    #[serde(rename = "edge_media_to_caption", default)]
    pub caption_edges: CaptionEdges,
    pub taken_at_timestamp: Option<i64>,
}

impl TimelinePost {
    /// The author-written caption, if any.
    pub fn caption(&self) -> Option<&str> {
        self.caption_edges
            .edges
            .first()
            .map(|edge| edge.node.text.as_str())
    }

    /// True for short-form video posts (Reels).
    pub fn is_clip(&self) -> bool {
        self.is_video && self.product_type.as_deref() == Some("clips")
    }

    /// Canonical permalink for the post.
    pub fn post_url(&self) -> String {
        format!("https://www.instagram.com/p/{}/", self.shortcode)
    }

    pub fn taken_at(&self) -> Option<DateTime<Utc>> {
        self.taken_at_timestamp
            .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaptionEdges {
    #[serde(default)]
    pub edges: Vec<CaptionEdge>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaptionEdge {
    pub node: CaptionNode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaptionNode {
    pub text: String,
}

/// Response envelope for the paged timeline GraphQL query.
#[derive(Debug, Clone, Deserialize)]
pub struct TimelinePageResponse {
    pub data: TimelinePageData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimelinePageData {
    pub user: Option<TimelinePageUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimelinePageUser {
    #[serde(rename = "edge_owner_to_timeline_media")]
    pub timeline_media: TimelineMedia,
}

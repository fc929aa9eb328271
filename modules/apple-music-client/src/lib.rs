pub mod error;
pub mod types;

pub use error::{AppleMusicError, Result};
pub use types::{
    BatchStats, CatalogSong, LibraryAddRequest, SearchAddOutcome, SearchResponse, SongAttributes,
};

use std::time::Duration;

const BASE_URL: &str = "https://api.music.apple.com/v1";

/// Default number of candidates requested from catalog search.
const DEFAULT_SEARCH_LIMIT: u32 = 5;

/// Fixed delay between requests on the batch add path.
const BATCH_ADD_DELAY: Duration = Duration::from_millis(500);

pub struct AppleMusicClient {
    client: reqwest::Client,
    developer_token: String,
    user_token: Option<String>,
    storefront: String,
}

impl AppleMusicClient {
    /// The developer token authenticates every call; the user token is only
    /// needed for library writes and may be absent in search-only use.
    pub fn new(developer_token: impl Into<String>, user_token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            developer_token: developer_token.into(),
            user_token,
            storefront: "us".to_string(),
        }
    }

    pub fn with_storefront(mut self, storefront: impl Into<String>) -> Self {
        self.storefront = storefront.into();
        self
    }

    pub fn has_user_token(&self) -> bool {
        self.user_token.is_some()
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let req = req.bearer_auth(&self.developer_token);
        match &self.user_token {
            Some(token) => req.header("Music-User-Token", token),
            None => req,
        }
    }

    /// Search the catalog for a song. Returns the service's top-ranked hit,
    /// or `None` on an empty result set; no local re-ranking.
    pub async fn search_song(
        &self,
        title: &str,
        artist: &str,
        limit: u32,
    ) -> Result<Option<CatalogSong>> {
        let term = format!("{title} {artist}").trim().to_string();
        let limit = limit.to_string();
        let url = format!("{}/catalog/{}/search", BASE_URL, self.storefront);

        let resp = self
            .authed(self.client.get(&url))
            .query(&[
                ("term", term.as_str()),
                ("types", "songs"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AppleMusicError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let results: SearchResponse = resp.json().await?;
        let top = results
            .results
            .songs
            .and_then(|page| page.data.into_iter().next());

        match &top {
            Some(song) => tracing::info!(
                name = %song.attributes.name,
                artist = %song.attributes.artist_name,
                "Found catalog song"
            ),
            None => tracing::warn!(title, artist, "No catalog results"),
        }

        Ok(top)
    }

    /// Add a catalog song to the user's library. Fails without a network
    /// call when no user token is present; HTTP 201 and 202 are success.
    pub async fn add_song_to_library(&self, song_id: &str) -> Result<()> {
        if self.user_token.is_none() {
            return Err(AppleMusicError::MissingUserToken);
        }

        let url = format!("{}/me/library", BASE_URL);
        let resp = self
            .authed(self.client.post(&url))
            .query(&[("ids[songs]", song_id)])
            .json(&LibraryAddRequest::song(song_id))
            .send()
            .await?;

        let status = resp.status();
        if status == reqwest::StatusCode::CREATED || status == reqwest::StatusCode::ACCEPTED {
            tracing::info!(song_id, "Added song to library");
            Ok(())
        } else {
            let body = resp.text().await.unwrap_or_default();
            Err(AppleMusicError::Api {
                status: status.as_u16(),
                message: body,
            })
        }
    }

    /// Add many catalog ids sequentially, pausing between requests. This is
    /// a convenience path that bypasses search.
    pub async fn add_songs_batch(&self, song_ids: &[String]) -> BatchStats {
        let mut stats = BatchStats::default();
        for song_id in song_ids {
            match self.add_song_to_library(song_id).await {
                Ok(()) => stats.success += 1,
                Err(e) => {
                    tracing::warn!(song_id = %song_id, error = %e, "Library add failed");
                    stats.failed += 1;
                }
            }
            tokio::time::sleep(BATCH_ADD_DELAY).await;
        }
        stats
    }

    /// Search then add in one operation. Failures are folded into the
    /// outcome rather than raised: a search miss or search transport error
    /// classifies as `NotFound`, a failed add as `Failed`.
    pub async fn search_and_add(&self, title: &str, artist: &str) -> SearchAddOutcome {
        let song = match self.search_song(title, artist, DEFAULT_SEARCH_LIMIT).await {
            Ok(Some(song)) => song,
            Ok(None) => {
                return SearchAddOutcome::NotFound(
                    "Song not found in Apple Music catalog".to_string(),
                );
            }
            Err(e) => {
                tracing::error!(title, artist, error = %e, "Catalog search failed");
                return SearchAddOutcome::NotFound(
                    "Song not found in Apple Music catalog".to_string(),
                );
            }
        };

        let name = song.attributes.name;
        let artist_name = song.attributes.artist_name;

        match self.add_song_to_library(&song.id).await {
            Ok(()) => SearchAddOutcome::Added(format!("Added '{name}' by {artist_name}")),
            Err(e) => SearchAddOutcome::Failed(format!(
                "Found '{name}' by {artist_name} but failed to add to library: {e}"
            )),
        }
    }
}

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

use instagram_client::{InstagramClient, InstagramError, PostFeed, TimelinePost};

use crate::extract::extract_song;
use crate::pacing::Pacer;
use crate::types::SongSet;

/// How often to log scan progress, in posts.
const PROGRESS_INTERVAL: usize = 10;

/// A profile's posts as a lazy, finite, non-restartable stream.
#[async_trait]
pub trait PostStream: Send {
    async fn try_next(&mut self) -> Result<Option<TimelinePost>, InstagramError>;
}

/// Opens post streams by profile name.
#[async_trait]
pub trait PostSource: Send + Sync {
    async fn open(&self, username: &str) -> Result<Box<dyn PostStream>, InstagramError>;
}

#[async_trait]
impl PostStream for PostFeed {
    async fn try_next(&mut self) -> Result<Option<TimelinePost>, InstagramError> {
        PostFeed::try_next(self).await
    }
}

#[async_trait]
impl PostSource for InstagramClient {
    async fn open(&self, username: &str) -> Result<Box<dyn PostStream>, InstagramError> {
        let feed = self.posts(username).await?;
        Ok(Box::new(feed))
    }
}

/// Scans a profile's posts for song mentions and deduplicates them.
pub struct SongScraper<S> {
    source: S,
    pacer: Arc<dyn Pacer>,
}

impl<S: PostSource> SongScraper<S> {
    pub fn new(source: S, pacer: Arc<dyn Pacer>) -> Self {
        Self { source, pacer }
    }

    /// Scan up to `max_posts` posts and return the unique songs found, in
    /// first-seen order.
    ///
    /// Failures never propagate: an unresolvable profile yields an empty
    /// set, and a mid-scan feed failure truncates the scan while keeping
    /// everything found so far.
    pub async fn scrape(&self, target: &str, max_posts: usize) -> SongSet {
        info!(target, max_posts, "Scanning profile for songs");

        let mut songs = SongSet::new();
        let mut feed = match self.source.open(target).await {
            Ok(feed) => feed,
            Err(e) => {
                error!(target, error = %e, "Failed to resolve profile");
                return songs;
            }
        };

        let mut posts_checked = 0;
        while posts_checked < max_posts {
            let post = match feed.try_next().await {
                Ok(Some(post)) => post,
                Ok(None) => break,
                Err(e) => {
                    error!(error = %e, "Feed failed mid-scan, keeping songs found so far");
                    break;
                }
            };
            posts_checked += 1;

            if let Some(song) = extract_song(&post) {
                info!(song = %song, "Found song");
                songs.fold(song);
            }

            if posts_checked % PROGRESS_INTERVAL == 0 {
                info!(posts_checked, unique_songs = songs.len(), "Scan progress");
            }

            self.pacer.pause().await;
        }

        info!(posts_checked, unique_songs = songs.len(), "Scan complete");
        songs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pacing::NoDelay;
    use instagram_client::types::CaptionEdges;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    fn reel(shortcode: &str, media_title: &str) -> TimelinePost {
        TimelinePost {
            id: shortcode.to_string(),
            shortcode: shortcode.to_string(),
            is_video: true,
            title: Some(media_title.to_string()),
            product_type: Some("clips".to_string()),
            caption_edges: CaptionEdges::default(),
            taken_at_timestamp: None,
        }
    }

    fn plain(shortcode: &str) -> TimelinePost {
        TimelinePost {
            id: shortcode.to_string(),
            shortcode: shortcode.to_string(),
            is_video: false,
            title: None,
            product_type: None,
            caption_edges: CaptionEdges::default(),
            taken_at_timestamp: None,
        }
    }

    fn network_error() -> InstagramError {
        InstagramError::Network("connection reset".to_string())
    }

    struct FakeStream {
        posts: VecDeque<Result<TimelinePost, InstagramError>>,
    }

    #[async_trait]
    impl PostStream for FakeStream {
        async fn try_next(&mut self) -> Result<Option<TimelinePost>, InstagramError> {
            match self.posts.pop_front() {
                Some(Ok(post)) => Ok(Some(post)),
                Some(Err(e)) => Err(e),
                None => Ok(None),
            }
        }
    }

    struct FakeSource {
        // Consumed on open; a second open yields an empty feed, matching the
        // non-restartable contract.
        posts: Mutex<VecDeque<Result<TimelinePost, InstagramError>>>,
        fail_open: bool,
    }

    impl FakeSource {
        fn with_posts(posts: Vec<Result<TimelinePost, InstagramError>>) -> Self {
            Self {
                posts: Mutex::new(posts.into_iter().collect()),
                fail_open: false,
            }
        }

        fn unresolvable() -> Self {
            Self {
                posts: Mutex::new(VecDeque::new()),
                fail_open: true,
            }
        }
    }

    #[async_trait]
    impl PostSource for FakeSource {
        async fn open(&self, username: &str) -> Result<Box<dyn PostStream>, InstagramError> {
            if self.fail_open {
                return Err(InstagramError::ProfileNotFound(username.to_string()));
            }
            let posts = std::mem::take(&mut *self.posts.lock().unwrap());
            Ok(Box::new(FakeStream { posts }))
        }
    }

    fn scraper(source: FakeSource) -> SongScraper<FakeSource> {
        SongScraper::new(source, Arc::new(NoDelay))
    }

    #[tokio::test]
    async fn collects_unique_songs_in_first_seen_order() {
        let source = FakeSource::with_posts(vec![
            Ok(reel("a", "Flowers · Miley Cyrus")),
            Ok(plain("b")),
            Ok(reel("c", "Levitating · Dua Lipa")),
            Ok(reel("d", "FLOWERS · miley cyrus")),
        ]);

        let songs = scraper(source).scrape("someband", 100).await;
        assert_eq!(songs.len(), 2);

        let titles: Vec<_> = songs.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["Flowers", "Levitating"]);

        // First occurrence's provenance survives the duplicate in post "d".
        let flowers = songs.iter().next().unwrap();
        assert_eq!(
            flowers.post_url.as_deref(),
            Some("https://www.instagram.com/p/a/")
        );
    }

    #[tokio::test]
    async fn honors_max_posts() {
        let source = FakeSource::with_posts(vec![
            Ok(reel("a", "Flowers · Miley Cyrus")),
            Ok(reel("b", "Levitating · Dua Lipa")),
            Ok(reel("c", "As It Was · Harry Styles")),
        ]);

        let songs = scraper(source).scrape("someband", 2).await;
        assert_eq!(songs.len(), 2);
    }

    #[tokio::test]
    async fn unresolvable_profile_yields_empty_set() {
        let songs = scraper(FakeSource::unresolvable()).scrape("nobody", 50).await;
        assert!(songs.is_empty());
    }

    #[tokio::test]
    async fn mid_scan_failure_truncates_but_keeps_progress() {
        let source = FakeSource::with_posts(vec![
            Ok(reel("a", "Flowers · Miley Cyrus")),
            Err(network_error()),
            Ok(reel("b", "Levitating · Dua Lipa")),
        ]);

        let songs = scraper(source).scrape("someband", 50).await;
        let titles: Vec<_> = songs.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["Flowers"]);
    }
}

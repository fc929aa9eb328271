use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, warn};

use apple_music_client::{AppleMusicClient, SearchAddOutcome};

use crate::report::{RunReport, SongOutcome};
use crate::scraper::{PostSource, SongScraper};
use crate::types::SongSet;

/// Marker message attached to every song classified in dry-run mode.
pub const DRY_RUN_MESSAGE: &str = "DRY RUN - not actually added";

/// Resolves a song mention against the catalog and adds it to the library.
#[async_trait]
pub trait LibraryResolver: Send + Sync {
    async fn search_and_add(&self, title: &str, artist: &str) -> anyhow::Result<SearchAddOutcome>;
}

#[async_trait]
impl LibraryResolver for AppleMusicClient {
    async fn search_and_add(&self, title: &str, artist: &str) -> anyhow::Result<SearchAddOutcome> {
        Ok(AppleMusicClient::search_and_add(self, title, artist).await)
    }
}

/// Phases of one run. Dry-run is a variant of resolving that never touches
/// the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Scraping,
    Resolving { dry_run: bool },
    Reporting,
    Done,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunPhase::Idle => write!(f, "idle"),
            RunPhase::Scraping => write!(f, "scraping"),
            RunPhase::Resolving { dry_run: false } => write!(f, "resolving"),
            RunPhase::Resolving { dry_run: true } => write!(f, "resolving (dry run)"),
            RunPhase::Reporting => write!(f, "reporting"),
            RunPhase::Done => write!(f, "done"),
        }
    }
}

enum ResolveMode {
    /// Classify everything as added without touching the catalog.
    DryRun,
    Live(Arc<dyn LibraryResolver>),
}

/// Drives scrape → resolve → classify for one run. Owns the scraping and
/// catalog sessions for the run's duration.
pub struct Pipeline<S> {
    scraper: SongScraper<S>,
    mode: ResolveMode,
    phase: RunPhase,
}

impl<S: PostSource> Pipeline<S> {
    pub fn live(scraper: SongScraper<S>, resolver: Arc<dyn LibraryResolver>) -> Self {
        Self {
            scraper,
            mode: ResolveMode::Live(resolver),
            phase: RunPhase::Idle,
        }
    }

    pub fn dry_run(scraper: SongScraper<S>) -> Self {
        Self {
            scraper,
            mode: ResolveMode::DryRun,
            phase: RunPhase::Idle,
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    fn advance(&mut self, phase: RunPhase) {
        info!(phase = %phase, "Pipeline phase");
        self.phase = phase;
    }

    /// Run the full pipeline against one profile.
    pub async fn run(&mut self, target: &str, max_posts: usize) -> RunReport {
        self.advance(RunPhase::Scraping);
        let songs = self.scraper.scrape(target, max_posts).await;
        if songs.is_empty() {
            warn!("No songs found in scanned posts");
        } else {
            info!(unique_songs = songs.len(), "Resolving songs against the catalog");
        }

        self.advance(RunPhase::Resolving {
            dry_run: matches!(self.mode, ResolveMode::DryRun),
        });
        let songs_found = songs.len() as u32;
        let mut report = self.process_songs(songs).await;

        self.advance(RunPhase::Reporting);
        report.stats = crate::stats::RunStats {
            songs_found,
            songs_added: report.added.len() as u32,
            songs_not_found: report.not_found.len() as u32,
            songs_failed: report.failed.len() as u32,
        };

        self.advance(RunPhase::Done);
        report
    }

    /// Resolve each unique song sequentially, in set order, classifying the
    /// outcome. A single song's failure never aborts the run.
    async fn process_songs(&self, songs: SongSet) -> RunReport {
        let total = songs.len();
        let mut report = RunReport::default();

        for (index, song) in songs.into_iter().enumerate() {
            info!(song = %song, "[{}/{}] Processing", index + 1, total);

            let outcome = match &self.mode {
                ResolveMode::DryRun => {
                    info!("  [dry run] Would search and add to the library");
                    SearchAddOutcome::Added(DRY_RUN_MESSAGE.to_string())
                }
                ResolveMode::Live(resolver) => {
                    match resolver.search_and_add(&song.title, &song.artist).await {
                        Ok(outcome) => outcome,
                        Err(e) => SearchAddOutcome::Failed(format!("Unexpected error: {e}")),
                    }
                }
            };

            match outcome {
                SearchAddOutcome::Added(message) => {
                    info!("  ✓ {message}");
                    report.added.push(SongOutcome::new(song, message));
                }
                SearchAddOutcome::NotFound(message) => {
                    warn!("  ✗ {message}");
                    report.not_found.push(SongOutcome::new(song, message));
                }
                SearchAddOutcome::Failed(message) => {
                    error!("  ✗ {message}");
                    report.failed.push(SongOutcome::new(song, message));
                }
            }
        }

        report
    }
}

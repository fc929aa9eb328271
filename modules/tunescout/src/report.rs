use std::fmt;
use std::io;

use crate::stats::RunStats;
use crate::types::Song;

const STATUS_ADDED: &str = "ADDED";
const STATUS_NOT_FOUND: &str = "NOT_FOUND";
const STATUS_FAILED: &str = "FAILED";

/// One processed song plus its outcome message.
#[derive(Debug, Clone)]
pub struct SongOutcome {
    pub song: Song,
    pub message: String,
}

impl SongOutcome {
    pub fn new(song: Song, message: impl Into<String>) -> Self {
        Self {
            song,
            message: message.into(),
        }
    }
}

/// Full result of a pipeline run: per-classification lists plus counters.
#[derive(Debug, Default)]
pub struct RunReport {
    pub added: Vec<SongOutcome>,
    pub not_found: Vec<SongOutcome>,
    pub failed: Vec<SongOutcome>,
    pub stats: RunStats,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(60);
        writeln!(f, "{rule}")?;
        writeln!(f, "EXECUTION SUMMARY")?;
        writeln!(f, "{rule}")?;
        writeln!(f, "Total songs found:     {}", self.stats.songs_found)?;
        writeln!(f, "Successfully added:    {}", self.stats.songs_added)?;
        writeln!(f, "Not found in catalog:  {}", self.stats.songs_not_found)?;
        writeln!(f, "Failed to add:         {}", self.stats.songs_failed)?;

        if !self.not_found.is_empty() {
            writeln!(f, "\nSongs not found in the catalog:")?;
            for outcome in &self.not_found {
                writeln!(f, "  - {}", outcome.song)?;
            }
        }

        if !self.failed.is_empty() {
            writeln!(f, "\nFailed songs:")?;
            for outcome in &self.failed {
                writeln!(f, "  - {}: {}", outcome.song, outcome.message)?;
            }
        }

        write!(f, "{rule}")
    }
}

/// Write the report as CSV, one row per processed song, grouped
/// added / not-found / failed.
pub fn write_csv<W: io::Write>(report: &RunReport, writer: W) -> Result<(), csv::Error> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["Song Title", "Artist", "Status", "Message", "Source Post URL"])?;

    let groups = [
        (STATUS_ADDED, &report.added),
        (STATUS_NOT_FOUND, &report.not_found),
        (STATUS_FAILED, &report.failed),
    ];
    for (status, outcomes) in groups {
        for outcome in outcomes {
            csv.write_record([
                outcome.song.title.as_str(),
                outcome.song.artist.as_str(),
                status,
                outcome.message.as_str(),
                outcome.song.post_url.as_deref().unwrap_or(""),
            ])?;
        }
    }

    csv.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> RunReport {
        RunReport {
            added: vec![SongOutcome::new(
                Song::new("Flowers", "Miley Cyrus").with_post_url("https://www.instagram.com/p/a/"),
                "Added 'Flowers' by Miley Cyrus",
            )],
            not_found: vec![SongOutcome::new(
                Song::new("Unknown Song XYZ123", "Nobody"),
                "Song not found in Apple Music catalog",
            )],
            failed: vec![SongOutcome::new(
                Song::new("Levitating", "Dua Lipa").with_post_url("https://www.instagram.com/p/b/"),
                "Found 'Levitating' by Dua Lipa but failed to add to library: API error (status 403): forbidden",
            )],
            stats: RunStats {
                songs_found: 3,
                songs_added: 1,
                songs_not_found: 1,
                songs_failed: 1,
            },
        }
    }

    #[test]
    fn csv_has_header_and_one_row_per_song() {
        let mut buf = Vec::new();
        write_csv(&sample_report(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "Song Title,Artist,Status,Message,Source Post URL"
        );
        assert_eq!(
            lines[1],
            "Flowers,Miley Cyrus,ADDED,Added 'Flowers' by Miley Cyrus,https://www.instagram.com/p/a/"
        );
        assert!(lines[2].starts_with("Unknown Song XYZ123,Nobody,NOT_FOUND,"));
        // Missing post URL becomes an empty trailing field.
        assert!(lines[2].ends_with(','));
        assert!(lines[3].contains("FAILED"));
        assert!(lines[3].contains("status 403"));
    }

    #[test]
    fn summary_lists_problem_songs() {
        let text = sample_report().to_string();
        assert!(text.contains("Total songs found:     3"));
        assert!(text.contains("Successfully added:    1"));
        assert!(text.contains("Unknown Song XYZ123 by Nobody"));
        assert!(text.contains("Levitating by Dua Lipa: Found 'Levitating'"));
    }
}

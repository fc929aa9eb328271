use std::fmt;

/// Counters from one pipeline run. After a complete run,
/// `songs_added + songs_not_found + songs_failed == songs_found`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub songs_found: u32,
    pub songs_added: u32,
    pub songs_not_found: u32,
    pub songs_failed: u32,
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "found={} added={} not_found={} failed={}",
            self.songs_found, self.songs_added, self.songs_not_found, self.songs_failed
        )
    }
}

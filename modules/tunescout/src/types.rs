use std::collections::HashMap;
use std::fmt;

/// A song inferred from a post's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    pub title: String,
    pub artist: String,
    /// Permalink of the post the mention was first seen in.
    pub post_url: Option<String>,
}

impl Song {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            post_url: None,
        }
    }

    pub fn with_post_url(mut self, url: impl Into<String>) -> Self {
        self.post_url = Some(url.into());
        self
    }

    pub fn key(&self) -> String {
        song_key(&self.title, &self.artist)
    }
}

impl fmt::Display for Song {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} by {}", self.title, self.artist)
    }
}

/// Identity key for deduplication: case- and whitespace-insensitive on both
/// title and artist. The post URL carries no identity.
pub fn song_key(title: &str, artist: &str) -> String {
    format!("{}|{}", normalize(title), normalize(artist))
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Insertion-ordered set of songs, deduplicated by `song_key`. The earliest
/// seen mention wins; later equivalents are dropped.
#[derive(Debug, Default)]
pub struct SongSet {
    songs: Vec<Song>,
    keys: HashMap<String, usize>,
}

impl SongSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a song into the set. Returns true when the song was new.
    pub fn fold(&mut self, song: Song) -> bool {
        let key = song.key();
        if self.keys.contains_key(&key) {
            return false;
        }
        self.keys.insert(key, self.songs.len());
        self.songs.push(song);
        true
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Song> {
        self.songs.iter()
    }
}

impl IntoIterator for SongSet {
    type Item = Song;
    type IntoIter = std::vec::IntoIter<Song>;

    /// Iteration follows insertion order, so one run's output is stable.
    fn into_iter(self) -> Self::IntoIter {
        self.songs.into_iter()
    }
}

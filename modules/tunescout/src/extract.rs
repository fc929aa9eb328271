//! Heuristic song extraction from a post's textual fields.
//!
//! Matchers are independent functions tried in declared order; the first to
//! produce a mention wins. There is no ranking across matchers.

use instagram_client::TimelinePost;

use crate::types::Song;

/// Separators Instagram uses in machine-supplied media titles,
/// e.g. "Flowers · Miley Cyrus".
const TITLE_SEPARATORS: [char; 2] = ['·', '•'];

/// Music note symbols people put in front of track credits in captions.
const NOTE_SYMBOLS: [char; 4] = ['♪', '♫', '🎵', '🎶'];

type Matcher = fn(&TimelinePost) -> Option<Song>;

const MATCHERS: &[Matcher] = &[match_media_title, match_caption_note_line];

/// Extract a song mention from one post, or nothing. Matchers only inspect
/// fields, so a malformed post simply matches nothing.
pub fn extract_song(post: &TimelinePost) -> Option<Song> {
    MATCHERS
        .iter()
        .find_map(|matcher| matcher(post))
        .map(|song| song.with_post_url(post.post_url()))
}

/// Reels with licensed audio carry the track in the media title, split by a
/// middle-dot separator.
fn match_media_title(post: &TimelinePost) -> Option<Song> {
    let raw = post.title.as_deref()?;
    let (title, artist) = raw.split_once(TITLE_SEPARATORS)?;
    non_empty_pair(title, artist)
}

/// Clips whose caption credits the track on its own line, e.g.
/// "♫ Levitating - Dua Lipa". The first hyphen is the split point.
fn match_caption_note_line(post: &TimelinePost) -> Option<Song> {
    if !post.is_clip() {
        return None;
    }
    let caption = post.caption()?;
    caption.lines().find_map(|line| {
        if !line.contains(NOTE_SYMBOLS) {
            return None;
        }
        let stripped = line.replace(NOTE_SYMBOLS, "");
        let (title, artist) = stripped.split_once('-')?;
        non_empty_pair(title, artist)
    })
}

/// Both segments must survive trimming, otherwise the matcher falls through.
fn non_empty_pair(title: &str, artist: &str) -> Option<Song> {
    let title = title.trim();
    let artist = artist.trim();
    if title.is_empty() || artist.is_empty() {
        return None;
    }
    Some(Song::new(title, artist))
}

#[cfg(test)]
mod tests {
    use super::*;
    use instagram_client::types::{CaptionEdge, CaptionEdges, CaptionNode};

    fn post(
        title: Option<&str>,
        caption: Option<&str>,
        is_video: bool,
        product_type: Option<&str>,
    ) -> TimelinePost {
        TimelinePost {
            id: "1".to_string(),
            shortcode: "Cabc123".to_string(),
            is_video,
            title: title.map(str::to_string),
            product_type: product_type.map(str::to_string),
            caption_edges: CaptionEdges {
                edges: caption
                    .map(|text| {
                        vec![CaptionEdge {
                            node: CaptionNode {
                                text: text.to_string(),
                            },
                        }]
                    })
                    .unwrap_or_default(),
            },
            taken_at_timestamp: None,
        }
    }

    fn clip(title: Option<&str>, caption: Option<&str>) -> TimelinePost {
        post(title, caption, true, Some("clips"))
    }

    #[test]
    fn media_title_with_separator_yields_mention() {
        let song = extract_song(&clip(Some("Flowers · Miley Cyrus"), None)).unwrap();
        assert_eq!(song.title, "Flowers");
        assert_eq!(song.artist, "Miley Cyrus");
        assert_eq!(
            song.post_url.as_deref(),
            Some("https://www.instagram.com/p/Cabc123/")
        );
    }

    #[test]
    fn bullet_separator_also_splits() {
        let song = extract_song(&clip(Some("Levitating • Dua Lipa"), None)).unwrap();
        assert_eq!(song.title, "Levitating");
        assert_eq!(song.artist, "Dua Lipa");
    }

    #[test]
    fn caption_note_line_on_clip_yields_mention() {
        let song = extract_song(&clip(None, Some("new reel!\n♫ Levitating - Dua Lipa\n#music")))
            .unwrap();
        assert_eq!(song.title, "Levitating");
        assert_eq!(song.artist, "Dua Lipa");
    }

    #[test]
    fn emoji_note_symbols_are_stripped() {
        let song = extract_song(&clip(None, Some("🎵 Blinding Lights - The Weeknd 🎶"))).unwrap();
        assert_eq!(song.title, "Blinding Lights");
        assert_eq!(song.artist, "The Weeknd");
    }

    #[test]
    fn media_title_takes_priority_over_caption() {
        let song = extract_song(&clip(
            Some("Flowers · Miley Cyrus"),
            Some("♫ Levitating - Dua Lipa"),
        ))
        .unwrap();
        assert_eq!(song.title, "Flowers");
        assert_eq!(song.artist, "Miley Cyrus");
    }

    #[test]
    fn empty_segment_falls_through_to_next_matcher() {
        // The media title splits into one non-empty segment, so the caption
        // matcher gets its turn.
        let song = extract_song(&clip(Some("Flowers · "), Some("♫ Levitating - Dua Lipa")))
            .unwrap();
        assert_eq!(song.title, "Levitating");
    }

    #[test]
    fn caption_line_without_note_symbol_is_ignored() {
        assert!(extract_song(&clip(None, Some("Levitating - Dua Lipa"))).is_none());
    }

    #[test]
    fn note_line_without_hyphen_is_ignored() {
        assert!(extract_song(&clip(None, Some("♫ Levitating by Dua Lipa"))).is_none());
    }

    #[test]
    fn caption_matcher_only_applies_to_clips() {
        let standard = post(None, Some("♫ Levitating - Dua Lipa"), false, None);
        assert!(extract_song(&standard).is_none());

        let plain_video = post(None, Some("♫ Levitating - Dua Lipa"), true, Some("feed"));
        assert!(extract_song(&plain_video).is_none());
    }

    #[test]
    fn first_hyphen_is_the_split_point() {
        let song = extract_song(&clip(None, Some("♫ Lo-Fi Beats - Chillhop"))).unwrap();
        assert_eq!(song.title, "Lo");
        assert_eq!(song.artist, "Fi Beats - Chillhop");
    }

    #[test]
    fn post_with_no_text_yields_nothing() {
        assert!(extract_song(&clip(None, None)).is_none());
        assert!(extract_song(&post(None, None, false, None)).is_none());
    }
}

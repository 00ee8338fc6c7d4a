//! Core data model for the streaming history.
//!
//! Defines the canonical listen record and the song identity key.
//! A dataset is an ordered `Vec<Listen>`, ascending by timestamp; it is
//! replaced wholesale on import or delete and never mutated in place.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One recorded play of a track, in canonical form.
///
/// Field names serialize in camelCase (`endTime`, `artistName`, ...) so a
/// persisted dataset is the canonical record list verbatim, compatible
/// with the export format it was normalized from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listen {
    /// Minute-resolution timestamp, `YYYY-MM-DD HH:MM`. No seconds, no
    /// timezone offset; lexicographic order equals chronological order.
    pub end_time: String,
    /// Artist name
    pub artist_name: String,
    /// Track title
    pub track_name: String,
    /// Playback duration in milliseconds
    pub ms_played: u64,
}

impl Listen {
    /// Date portion of the timestamp (`YYYY-MM-DD`).
    pub fn date(&self) -> &str {
        self.end_time.split(' ').next().unwrap_or(&self.end_time)
    }

    /// Whole seconds played, truncated toward zero.
    pub fn seconds_played(&self) -> u64 {
        self.ms_played / 1000
    }

    /// Identity of the played track.
    pub fn song_key(&self) -> SongKey {
        SongKey {
            artist: self.artist_name.clone(),
            track: self.track_name.clone(),
        }
    }
}

/// Identity of a track: artist plus title as a structured pair.
///
/// The pair is used everywhere inside the engine; the `"artist|track"`
/// string form exists only at the view boundary, where item ids must be
/// strings. That form is ambiguous when a name contains `|`, so it is
/// never used as a lookup key internally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SongKey {
    pub artist: String,
    pub track: String,
}

impl SongKey {
    pub fn new(artist: impl Into<String>, track: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            track: track.into(),
        }
    }

    /// Parse the `"artist|track"` view-id form, splitting on the first `|`.
    pub fn parse(id: &str) -> Option<Self> {
        let (artist, track) = id.split_once('|')?;
        Some(Self::new(artist, track))
    }
}

impl fmt::Display for SongKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.artist, self.track)
    }
}

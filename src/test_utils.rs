//! Test utilities and fixtures for listen-lens tests.

use crate::model::Listen;

/// Creates a canonical listen with a default duration.
///
/// Customize further fields with struct update syntax:
///
/// ```ignore
/// let long_play = Listen {
///     ms_played: 600_000,
///     ..listen("2022-01-01 10:00", "Artist", "Track")
/// };
/// ```
pub fn listen(end_time: &str, artist: &str, track: &str) -> Listen {
    Listen {
        end_time: end_time.to_string(),
        artist_name: artist.to_string(),
        track_name: track.to_string(),
        ms_played: 180_000,
    }
}

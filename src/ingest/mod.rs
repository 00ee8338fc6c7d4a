//! Ingestion of raw streaming-history exports.
//!
//! Export batches arrive as JSON arrays of raw listen objects in one of
//! two incompatible shapes: the canonical form (minute-resolution
//! camelCase fields) and the extended raw form (`ts` / `ms_played` /
//! `master_metadata_*` fields). Normalization reconciles both into
//! [`Listen`]; any record matching neither shape is silently dropped.
//! Malformed JSON at the file-parse boundary is the caller's concern.

use crate::model::Listen;
use serde_json::Value;
use tracing::debug;

/// Convert one raw record into canonical form, or reject it.
///
/// Shape sniffing: a truthy `msPlayed` marks the canonical shape, which
/// is accepted as-is (field subset); a truthy `ms_played` marks the
/// extended shape, which is mapped field by field. Extended records
/// whose metadata names are null (podcast episodes in real exports)
/// are rejected. Pure function, no side effects beyond a debug log.
pub fn normalize(raw: &Value) -> Option<Listen> {
    let obj = raw.as_object()?;

    if truthy(obj.get("msPlayed")) {
        // Already canonical: keep the four known fields, drop the rest.
        return match serde_json::from_value::<Listen>(raw.clone()) {
            Ok(listen) => Some(listen),
            Err(e) => {
                debug!(error = %e, "dropping malformed canonical record");
                None
            }
        };
    }

    if truthy(obj.get("ms_played")) {
        let ts = obj.get("ts")?.as_str()?;
        let artist = obj.get("master_metadata_album_artist_name")?.as_str()?;
        let track = obj.get("master_metadata_track_name")?.as_str()?;
        let ms_played = obj.get("ms_played")?.as_u64()?;
        return Some(Listen {
            end_time: convert_timestamp(ts),
            artist_name: artist.to_string(),
            track_name: track.to_string(),
            ms_played,
        });
    }

    None
}

/// Merge one or more uploaded batches into a single chronological dataset.
///
/// Flattens the batches in order, normalizes each record (dropping
/// rejects without counting them), then sorts by `end_time`. The
/// timestamp format is zero-padded, so lexicographic order is
/// chronological order; the sort is stable, so equal timestamps keep
/// batch order, then in-batch order.
pub fn merge_batches(batches: &[Vec<Value>]) -> Vec<Listen> {
    let mut listens: Vec<Listen> = batches.iter().flatten().filter_map(normalize).collect();
    listens.sort_by(|a, b| a.end_time.cmp(&b.end_time));
    listens
}

/// `2022-06-17T19:53:06Z` -> `2022-06-17 19:53`
fn convert_timestamp(ts: &str) -> String {
    let spaced = ts.replacen('T', " ", 1);
    let trimmed = spaced.trim_end_matches('Z');
    let minute: Vec<&str> = trimmed.splitn(3, ':').take(2).collect();
    minute.join(":")
}

/// JSON truthiness as the shape sniffing defines it: absent, null,
/// false, 0 and the empty string are falsy, everything else truthy.
fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_none_or(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

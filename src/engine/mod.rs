//! Cross-filter engine over a streaming-history dataset.
//!
//! The [`Engine`] owns the canonical dataset plus the session state
//! (month range, selection) and derives every view from them: ranked
//! artists, ranked songs scoped by the selected artist, the final listen
//! set, and its day/week series. Derivations are recomputed fresh from
//! the current inputs on every call; nothing is patched incrementally,
//! so there is no cached state to invalidate.
//!
//! Cascade precedence: time range → artist selection → song selection →
//! listen set. Song selection strictly overrides artist selection at the
//! listen level, even when both are set from earlier interaction.

pub mod filter;
pub mod rank;
pub mod series;

use crate::model::{Listen, SongKey};
use filter::{MonthRange, TimeFilter};
use rank::Ranked;
use series::CountSeries;

/// Item handed to a view: an opaque id plus a preformatted label.
/// Views render these verbatim and report toggle events back by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub id: String,
    pub label: String,
}

/// Current selection: at most one artist and one song.
///
/// Checking an item replaces the previous selection with it; unchecking
/// the selected item clears it. Selections are not pruned when the
/// filtered dataset changes, so either may go stale until re-toggled;
/// a stale selection simply matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub artist: Option<String>,
    pub song: Option<SongKey>,
}

impl Selection {
    pub fn toggle_artist(&mut self, name: &str) {
        if self.artist.as_deref() == Some(name) {
            self.artist = None;
        } else {
            self.artist = Some(name.to_string());
        }
    }

    pub fn toggle_song(&mut self, key: &SongKey) {
        if self.song.as_ref() == Some(key) {
            self.song = None;
        } else {
            self.song = Some(key.clone());
        }
    }
}

/// The cross-filter selection coordinator.
#[derive(Debug, Default)]
pub struct Engine {
    dataset: Vec<Listen>,
    range: Option<MonthRange>,
    selection: Selection,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dataset(dataset: Vec<Listen>) -> Self {
        let mut engine = Self::new();
        engine.load(dataset);
        engine
    }

    /// Replace the dataset wholesale.
    ///
    /// The range resets to the dataset's full span (present but
    /// inactive until the host enables it) and the selection clears.
    pub fn load(&mut self, dataset: Vec<Listen>) {
        self.range = MonthRange::full_span(&dataset);
        self.selection = Selection::default();
        self.dataset = dataset;
    }

    /// Drop the dataset; delete means absent dataset, not an error.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn dataset(&self) -> &[Listen] {
        &self.dataset
    }

    pub fn range(&self) -> Option<MonthRange> {
        self.range
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Install an edited range. The end-before-begin correction runs on
    /// every change, before the filter is derived from the range.
    pub fn set_range(&mut self, range: MonthRange) {
        self.range = Some(range.corrected());
    }

    pub fn toggle_artist(&mut self, name: &str) {
        self.selection.toggle_artist(name);
    }

    pub fn toggle_song(&mut self, key: &SongKey) {
        self.selection.toggle_song(key);
    }

    fn time_filter(&self) -> TimeFilter {
        self.range
            .map(|r| r.time_filter())
            .unwrap_or_else(TimeFilter::disabled)
    }

    /// The time-filtered dataset every level derives from.
    pub fn filtered(&self) -> Vec<Listen> {
        self.time_filter().apply(&self.dataset)
    }

    /// Ranked artists over the entire time-filtered dataset. Song
    /// selection does not scope this level.
    pub fn artists(&self) -> Vec<Ranked<String>> {
        rank::rank(&self.filtered(), |l| Some(l.artist_name.clone()))
    }

    /// Ranked songs, scoped to the selected artist when one is set;
    /// otherwise every song is a candidate.
    pub fn songs(&self) -> Vec<Ranked<SongKey>> {
        let filtered = self.filtered();
        match &self.selection.artist {
            Some(artist) => rank::rank(&filtered, |l| {
                (l.artist_name == *artist).then(|| l.song_key())
            }),
            None => rank::rank(&filtered, |l| Some(l.song_key())),
        }
    }

    /// The final listen set.
    ///
    /// Song selection strictly overrides artist selection; with nothing
    /// selected the set is empty. A stale selection that matches nothing
    /// in the current candidates also yields an empty set.
    pub fn listens(&self) -> Vec<Listen> {
        let filtered = self.filtered();
        if let Some(song) = &self.selection.song {
            filtered
                .into_iter()
                .filter(|l| l.artist_name == song.artist && l.track_name == song.track)
                .collect()
        } else if let Some(artist) = &self.selection.artist {
            filtered
                .into_iter()
                .filter(|l| l.artist_name == *artist)
                .collect()
        } else {
            Vec::new()
        }
    }

    /// Daily listen counts over the final listen set, gap-filled.
    pub fn daily_series(&self) -> CountSeries {
        let listens = self.listens();
        series::bucket_by_day(listens.iter().map(|l| l.end_time.as_str()))
    }

    /// Weekly roll-up of [`Engine::daily_series`].
    pub fn weekly_series(&self) -> CountSeries {
        series::bucket_by_week(&self.daily_series())
    }

    // ------------------------------------------------------------------
    // Engine-to-view contract
    // ------------------------------------------------------------------

    /// Artist level: id is the artist name, label is `"<name> (<count>)"`.
    pub fn artist_items(&self) -> Vec<ListItem> {
        self.artists()
            .into_iter()
            .map(|r| {
                let label = format!("{} ({})", r.key, r.count);
                ListItem { id: r.key, label }
            })
            .collect()
    }

    /// Song level: id is the `"artist|track"` form, label shows the
    /// track title only, `"<track> (<count>)"`.
    pub fn song_items(&self) -> Vec<ListItem> {
        self.songs()
            .into_iter()
            .map(|r| ListItem {
                id: r.key.to_string(),
                label: format!("{} ({})", r.key.track, r.count),
            })
            .collect()
    }

    /// Listen level: id is the position, label is
    /// `"<endTime> (<seconds>s)"` with seconds truncated toward zero.
    pub fn listen_items(&self) -> Vec<ListItem> {
        self.listens()
            .iter()
            .enumerate()
            .map(|(i, l)| ListItem {
                id: i.to_string(),
                label: format!("{} ({}s)", l.end_time, l.seconds_played()),
            })
            .collect()
    }
}

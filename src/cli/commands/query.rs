//! Query commands: ranked views, listen lists and series.

use crate::engine::filter::MonthRange;
use crate::engine::{Engine, ListItem};
use crate::error::ResultExt;
use crate::model::SongKey;
use crate::store::{self, BlobStore, DATASET_SLOT};

use super::{GroupMode, WindowArgs};

/// List artists ranked by listen count.
pub fn cmd_artists(store: &BlobStore, window: &WindowArgs, limit: usize) -> anyhow::Result<()> {
    let Some(engine) = load_engine(store, window)? else {
        return no_dataset();
    };
    print_items("Artist", &engine.artist_items(), limit);
    Ok(())
}

/// List songs ranked by listen count, optionally scoped to one artist.
pub fn cmd_songs(
    store: &BlobStore,
    window: &WindowArgs,
    artist: Option<&str>,
    limit: usize,
) -> anyhow::Result<()> {
    let Some(mut engine) = load_engine(store, window)? else {
        return no_dataset();
    };
    if let Some(artist) = artist {
        engine.toggle_artist(artist);
    }
    print_items("Song", &engine.song_items(), limit);
    Ok(())
}

/// List the individual listens for the given selection.
pub fn cmd_listens(
    store: &BlobStore,
    window: &WindowArgs,
    artist: Option<&str>,
    song: Option<&str>,
    limit: usize,
) -> anyhow::Result<()> {
    let Some(mut engine) = load_engine(store, window)? else {
        return no_dataset();
    };
    select(&mut engine, artist, song)?;

    let items = engine.listen_items();
    if items.is_empty() {
        println!("No listens selected.");
        return Ok(());
    }
    let title = match &engine.selection().song {
        Some(key) => format!("{key} listens"),
        None => "Listen".to_string(),
    };
    print_items(&title, &items, limit);
    Ok(())
}

/// Print listen counts for the current selection, bucketed by day or week.
pub fn cmd_series(
    store: &BlobStore,
    window: &WindowArgs,
    artist: Option<&str>,
    song: Option<&str>,
    mode: GroupMode,
) -> anyhow::Result<()> {
    let Some(mut engine) = load_engine(store, window)? else {
        return no_dataset();
    };
    select(&mut engine, artist, song)?;

    let series = match mode {
        GroupMode::Day => engine.daily_series(),
        GroupMode::Week => engine.weekly_series(),
    };
    if series.is_empty() {
        println!("No listens selected.");
        return Ok(());
    }
    for (date, count) in series.iter() {
        println!("{date}  {count:>5}");
    }
    Ok(())
}

// ============================================================================
// Shared helper functions
// ============================================================================

/// Load the stored dataset into an engine and apply the month window.
/// Returns `None` when no dataset is stored.
fn load_engine(store: &BlobStore, window: &WindowArgs) -> anyhow::Result<Option<Engine>> {
    let Some(blob) = store.load(DATASET_SLOT)? else {
        return Ok(None);
    };
    let dataset = store::deserialize(&blob).with_context("stored dataset is corrupt")?;
    let mut engine = Engine::with_dataset(dataset);
    if !window.is_empty()
        && let Some(full) = engine.range()
    {
        let (begin_year, begin_month) = match &window.from {
            Some(s) => parse_month(s)?,
            None => (full.begin_year, full.begin_month),
        };
        let (end_year, end_month) = match &window.to {
            Some(s) => parse_month(s)?,
            None => (full.end_year, full.end_month),
        };
        engine.set_range(MonthRange {
            enabled: true,
            begin_month,
            begin_year,
            end_month,
            end_year,
        });
    }
    Ok(Some(engine))
}

/// Apply the command's selection flags via the toggle rule.
///
/// `--song` is a track title when `--artist` is given, or a full
/// `"Artist|Track"` id on its own.
fn select(engine: &mut Engine, artist: Option<&str>, song: Option<&str>) -> anyhow::Result<()> {
    if let Some(artist) = artist {
        engine.toggle_artist(artist);
    }
    if let Some(song) = song {
        let key = match artist {
            Some(artist) => SongKey::new(artist, song),
            None => SongKey::parse(song).ok_or_else(|| {
                anyhow::anyhow!("--song without --artist must be an 'Artist|Track' id, got {song:?}")
            })?,
        };
        engine.toggle_song(&key);
    }
    Ok(())
}

fn parse_month(input: &str) -> anyhow::Result<(i32, u32)> {
    let parsed = input
        .split_once('-')
        .and_then(|(y, m)| Some((y.parse::<i32>().ok()?, m.parse::<u32>().ok()?)))
        .filter(|&(_, m)| (1..=12).contains(&m));
    match parsed {
        Some(month) => Ok(month),
        None => anyhow::bail!("expected YYYY-MM, got {input:?}"),
    }
}

fn print_items(title: &str, items: &[ListItem], limit: usize) {
    println!("{title}");
    let shown = if limit == 0 {
        items.len()
    } else {
        limit.min(items.len())
    };
    for item in &items[..shown] {
        println!("  {}", item.label);
    }
    if shown < items.len() {
        println!("  ... and {} more", items.len() - shown);
    }
}

fn no_dataset() -> anyhow::Result<()> {
    println!("No dataset stored. Run `listen-lens import` first.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::listen;
    use tempfile::tempdir;

    fn seeded_store(dir: &std::path::Path) -> BlobStore {
        let store = BlobStore::at(dir);
        let dataset = vec![
            listen("2022-01-01 10:00", "Alpha", "One"),
            listen("2022-02-01 10:00", "Beta", "Two"),
        ];
        store
            .save(DATASET_SLOT, &store::serialize(&dataset).unwrap())
            .unwrap();
        store
    }

    fn window(from: Option<&str>, to: Option<&str>) -> WindowArgs {
        WindowArgs {
            from: from.map(String::from),
            to: to.map(String::from),
        }
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2022-06").unwrap(), (2022, 6));
        assert!(parse_month("2022-13").is_err());
        assert!(parse_month("June 2022").is_err());
        assert!(parse_month("2022").is_err());
    }

    #[test]
    fn test_load_engine_without_window_leaves_filter_inactive() {
        let dir = tempdir().unwrap();
        let store = seeded_store(dir.path());
        let engine = load_engine(&store, &window(None, None)).unwrap().unwrap();
        assert!(!engine.range().unwrap().enabled);
        assert_eq!(engine.filtered().len(), 2);
    }

    #[test]
    fn test_load_engine_applies_window() {
        let dir = tempdir().unwrap();
        let store = seeded_store(dir.path());
        let engine = load_engine(&store, &window(None, Some("2022-01")))
            .unwrap()
            .unwrap();
        let range = engine.range().unwrap();
        assert!(range.enabled);
        // Missing --from defaults to the dataset's span start.
        assert_eq!((range.begin_year, range.begin_month), (2022, 1));
        assert_eq!(engine.filtered().len(), 1);
    }

    #[test]
    fn test_load_engine_reports_missing_dataset() {
        let dir = tempdir().unwrap();
        let store = BlobStore::at(dir.path());
        assert!(load_engine(&store, &window(None, None)).unwrap().is_none());
    }

    #[test]
    fn test_select_builds_song_key_from_both_flags() {
        let mut engine = Engine::with_dataset(vec![
            listen("2022-01-01 10:00", "Alpha", "One"),
            listen("2022-01-02 10:00", "Alpha", "Two"),
        ]);
        select(&mut engine, Some("Alpha"), Some("One")).unwrap();
        assert_eq!(engine.listens().len(), 1);
        assert_eq!(engine.listens()[0].track_name, "One");
    }

    #[test]
    fn test_select_accepts_full_song_id_without_artist() {
        let mut engine = Engine::with_dataset(vec![
            listen("2022-01-01 10:00", "Alpha", "One"),
            listen("2022-01-02 10:00", "Beta", "One"),
        ]);
        select(&mut engine, None, Some("Alpha|One")).unwrap();
        assert_eq!(engine.listens().len(), 1);
        assert_eq!(engine.listens()[0].artist_name, "Alpha");

        let mut engine = Engine::with_dataset(vec![listen("2022-01-01 10:00", "Alpha", "One")]);
        assert!(select(&mut engine, None, Some("no id form")).is_err());
    }
}

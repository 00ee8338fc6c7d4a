//! CLI command definitions and dispatch.
//!
//! - `import`: read export batches and replace the stored dataset
//! - `info` / `delete`: inspect or remove the stored dataset
//! - `artists` / `songs` / `listens`: render the ranked views
//! - `series`: render day/week listen counts

mod import;
mod query;

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use crate::config::{self, Config};
use crate::error::Result;
use crate::store::BlobStore;

pub use import::{cmd_delete, cmd_import, cmd_info};
pub use query::{cmd_artists, cmd_listens, cmd_series, cmd_songs};

/// Listen Lens CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Override the dataset store directory
    #[arg(long, global = true, env = "LISTEN_LENS_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Import streaming-history export files, replacing any stored dataset
    Import {
        /// Export files or directories to import (JSON batches)
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Show a summary of the stored dataset
    Info,
    /// Remove the stored dataset
    Delete,
    /// Show the configuration, writing the default file if missing
    Config,
    /// List artists ranked by listen count
    Artists {
        #[command(flatten)]
        window: WindowArgs,
        /// Maximum rows to print (0 = all)
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// List songs ranked by listen count
    Songs {
        #[command(flatten)]
        window: WindowArgs,
        /// Scope the ranking to one artist
        #[arg(short, long)]
        artist: Option<String>,
        /// Maximum rows to print (0 = all)
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// List the individual listens for an artist or song
    Listens {
        #[command(flatten)]
        window: WindowArgs,
        /// Artist to select
        #[arg(short, long)]
        artist: Option<String>,
        /// Track title (with --artist) or a full 'Artist|Track' id
        #[arg(short, long)]
        song: Option<String>,
        /// Maximum rows to print (0 = all)
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Print listen counts bucketed by day or week
    Series {
        #[command(flatten)]
        window: WindowArgs,
        /// Artist to select
        #[arg(short, long)]
        artist: Option<String>,
        /// Track title (with --artist) or a full 'Artist|Track' id
        #[arg(short, long)]
        song: Option<String>,
        /// Bucket size (default from config)
        #[arg(long, value_enum)]
        by: Option<GroupMode>,
    },
}

/// Month window shared by the query commands.
#[derive(Args)]
pub struct WindowArgs {
    /// Start of the month window
    #[arg(long, value_name = "YYYY-MM")]
    pub from: Option<String>,
    /// End of the month window
    #[arg(long, value_name = "YYYY-MM")]
    pub to: Option<String>,
}

impl WindowArgs {
    pub fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }
}

/// Series bucket size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GroupMode {
    Day,
    Week,
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let config = config::load();
    let store = open_store(cli.data_dir.as_deref(), &config)?;

    match &cli.command {
        Commands::Import { paths } => cmd_import(&store, paths),
        Commands::Info => cmd_info(&store),
        Commands::Delete => cmd_delete(&store),
        Commands::Config => cmd_config(),
        Commands::Artists { window, limit } => {
            cmd_artists(&store, window, limit.unwrap_or(config.display.limit))
        }
        Commands::Songs {
            window,
            artist,
            limit,
        } => cmd_songs(
            &store,
            window,
            artist.as_deref(),
            limit.unwrap_or(config.display.limit),
        ),
        Commands::Listens {
            window,
            artist,
            song,
            limit,
        } => cmd_listens(
            &store,
            window,
            artist.as_deref(),
            song.as_deref(),
            limit.unwrap_or(config.display.limit),
        ),
        Commands::Series {
            window,
            artist,
            song,
            by,
        } => {
            let mode = by.unwrap_or_else(|| default_group_mode(&config));
            cmd_series(&store, window, artist.as_deref(), song.as_deref(), mode)
        }
    }
}

/// Print the active configuration, creating the default file on first use.
fn cmd_config() -> anyhow::Result<()> {
    let Some(path) = config::config_path() else {
        anyhow::bail!("could not determine config directory");
    };
    if !path.exists() {
        config::save(&Config::default())?;
        println!("Wrote default config to {}", path.display());
    }
    println!("# {}", path.display());
    print!("{}", std::fs::read_to_string(&path)?);
    Ok(())
}

// ============================================================================
// Shared helper functions
// ============================================================================

/// Resolve the blob store root: flag, then config, then the OS data dir.
fn open_store(flag: Option<&Path>, config: &Config) -> Result<BlobStore> {
    match (flag, &config.store.data_dir) {
        (Some(dir), _) => Ok(BlobStore::at(dir)),
        (None, Some(dir)) => Ok(BlobStore::at(dir)),
        (None, None) => BlobStore::open_default(),
    }
}

fn default_group_mode(config: &Config) -> GroupMode {
    if config.display.group_by.eq_ignore_ascii_case("day") {
        GroupMode::Day
    } else {
        GroupMode::Week
    }
}

/// Collect batch files from a mix of files and directories.
/// Directories are walked recursively for `.json` files, in name order
/// so that batch order is deterministic.
pub(crate) fn collect_json_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in walkdir::WalkDir::new(path)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .filter(|e| is_json_file(e.path()))
            {
                files.push(entry.path().to_path_buf());
            }
        } else {
            files.push(path.clone());
        }
    }
    files
}

/// Check if a path has a .json extension
pub(crate) fn is_json_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_is_json_file() {
        assert!(is_json_file(Path::new("history.json")));
        assert!(is_json_file(Path::new("HISTORY.JSON")));
        assert!(!is_json_file(Path::new("history.csv")));
        assert!(!is_json_file(Path::new("json")));
    }

    #[test]
    fn test_collect_walks_directories_in_name_order() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("b.json")).unwrap();
        File::create(dir.path().join("a.json")).unwrap();
        File::create(dir.path().join("notes.txt")).unwrap();

        let files = collect_json_files(&[dir.path().to_path_buf()]);
        let names: Vec<_> = files
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .collect();
        assert_eq!(names, vec!["a.json", "b.json"]);
    }

    #[test]
    fn test_collect_keeps_explicit_files_verbatim() {
        // An explicitly named file is not extension-filtered.
        let files = collect_json_files(&[PathBuf::from("/exports/odd-name.txt")]);
        assert_eq!(files, vec![PathBuf::from("/exports/odd-name.txt")]);
    }
}

use std::fmt;

use clap::{Parser, Subcommand};
use colored::Colorize;
use error_stack::fmt::{Charset, ColorMode};
use error_stack::{Report, ResultExt};

use crate::config::Config;
use crate::download::commands::DownloadCommands;
use crate::paths::normalize_root;
use crate::playlist::resolve_playlists;

mod catalog;
mod config;
mod dialoguer;
mod download;
mod paths;
mod playlist;
mod prompt;

#[derive(Debug)]
pub struct PlaylistCourierError;
impl fmt::Display for PlaylistCourierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Playlist courier error")
    }
}
impl std::error::Error for PlaylistCourierError {}

pub type PlaylistCourierResult<T> = error_stack::Result<T, PlaylistCourierError>;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Export Spotify playlists to disk via spotdl")]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, default_value = "config.json")]
    config: String,
    #[command(subcommand)]
    command: CourierCommands,
}

#[derive(Subcommand, Debug, PartialEq, Clone)]
enum CourierCommands {
    /// Resolve playlists, pick the ones to export and run spotdl on each
    Download,
    /// List the playlists the configured account owns, without downloading
    Playlists,
    /// Reads and validates the current config file
    Config,
}

impl CourierCommands {
    pub async fn execute(&self, config_path: &str) -> PlaylistCourierResult<()> {
        return match self {
            CourierCommands::Download => {
                DownloadCommands::execute(config_path)
                    .await
                    .change_context(PlaylistCourierError)
            }
            CourierCommands::Playlists => {
                let config = Config::load(config_path).change_context(PlaylistCourierError)?;
                let root =
                    normalize_root(&config.root_folder).change_context(PlaylistCourierError)?;
                let playlists = resolve_playlists(&config, &root)
                    .await
                    .change_context(PlaylistCourierError)?;
                println!("all your playlists:");
                for (index, playlist) in playlists.iter().enumerate() {
                    println!(
                        "{}. {} ({} tracks)",
                        index + 1,
                        playlist.name.cyan(),
                        playlist.expected_track_count
                    );
                }
                Ok(())
            }
            CourierCommands::Config => {
                let config = Config::load(config_path).change_context(PlaylistCourierError)?;
                println!("Current config:\n{:#?}", config);
                Ok(())
            }
        };
    }
}

pub struct Suggestion(String);

impl Suggestion {
    pub fn new<S: Into<String>>(value: S) -> Self {
        Self(value.into())
    }

    pub fn set_report() {
        Report::set_charset(Charset::Utf8);
        Report::set_color_mode(ColorMode::Color);
        Report::install_debug_hook::<Self>(|Self(value), context| {
            context.push_body(format!("{}: {value}", "suggestion".yellow()))
        });
    }
}

async fn run() -> PlaylistCourierResult<()> {
    let cli = Cli::parse();

    Suggestion::set_report();

    cli.command.execute(&cli.config).await?;

    Ok(())
}

#[tokio::main]
async fn main() -> PlaylistCourierResult<()> {
    run().await
}

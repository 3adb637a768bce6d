use std::fmt;

use error_stack::ResultExt;

use crate::catalog::SpotifyCatalog;
use crate::config::{Config, SourceKind};

#[derive(Debug)]
pub struct PlaylistError;

impl fmt::Display for PlaylistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Playlist error")
    }
}

impl std::error::Error for PlaylistError {}

pub type PlaylistResult<T> = error_stack::Result<T, PlaylistError>;

/// One playlist in the working set. Independent value copy once resolved;
/// nothing is shared between playlists during the run.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistRecord {
    pub name: String,
    pub source_url: String,
    pub output_directory: String,
    /// Catalog identifier. Absent for config-declared playlists.
    pub external_id: Option<String>,
    /// Declared track count, used only for reconciliation. Zero means
    /// unknown (config-declared playlists carry no authoritative count).
    pub expected_track_count: u64,
}

/// Produces the uniform playlist working set from whichever source the
/// config selects. Every record starts out targeting the root folder; the
/// folder-per-playlist pass rewrites `output_directory` later.
pub async fn resolve_playlists(config: &Config, root: &str) -> PlaylistResult<Vec<PlaylistRecord>> {
    match config.source {
        SourceKind::Catalog => {
            let catalog = SpotifyCatalog::new().await.change_context(PlaylistError)?;
            let entries = catalog
                .user_playlists(&config.username)
                .await
                .change_context(PlaylistError)?;
            Ok(entries
                .into_iter()
                .map(|entry| PlaylistRecord {
                    name: entry.name,
                    source_url: entry.external_url,
                    output_directory: root.to_string(),
                    external_id: Some(entry.id),
                    expected_track_count: entry.track_total,
                })
                .collect())
        }
        SourceKind::Declared => Ok(config
            .playlists
            .iter()
            .map(|declared| PlaylistRecord {
                name: declared.name.clone(),
                source_url: declared.url.clone(),
                output_directory: root.to_string(),
                external_id: None,
                expected_track_count: 0,
            })
            .collect()),
    }
}

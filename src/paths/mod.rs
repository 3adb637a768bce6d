use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use colored::Colorize;
use error_stack::{IntoReport, Report, ResultExt};

use crate::playlist::PlaylistRecord;

#[derive(Debug)]
pub struct PathError;

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Path error")
    }
}

impl std::error::Error for PathError {}

pub type PathResult<T> = error_stack::Result<T, PathError>;

/// The computed output directory for one playlist, keyed by playlist name.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistPath {
    pub playlist_name: String,
    pub path: String,
}

/// Collapses redundant separators and relative segments, pure string work.
/// Fails on an empty path or one that is not valid UTF-8 after rebuilding.
pub fn normalize_root(path: &str) -> PathResult<String> {
    if path.trim().is_empty() {
        return Err(Report::new(PathError).attach_printable("root folder path is empty"));
    }
    let mut normalized = PathBuf::new();
    for component in Path::new(path.trim()).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(
                    normalized.components().next_back(),
                    Some(Component::Normal(_))
                ) {
                    normalized.pop();
                } else if !matches!(
                    normalized.components().next_back(),
                    Some(Component::RootDir | Component::Prefix(_))
                ) {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    if normalized.as_os_str().is_empty() {
        normalized.push(".");
    }
    let normalized = normalized
        .to_str()
        .ok_or(PathError)
        .into_report()
        .attach_printable(format!("cannot normalize root folder path '{}'", path))?;
    Ok(normalized.to_string())
}

/// Creates the root directory tree if it is missing. Failing here is fatal,
/// unlike the per-playlist directories below.
pub fn ensure_root_exists(root: &str) -> PathResult<()> {
    if !Path::new(root).is_dir() {
        fs::create_dir_all(root)
            .into_report()
            .change_context(PathError)
            .attach_printable(format!("failed to create root folder '{}'", root))?;
    }
    Ok(())
}

/// `root/name` for every playlist. Pure, no filesystem access.
pub fn compute_directories(root: &str, playlists: &[PlaylistRecord]) -> Vec<PlaylistPath> {
    playlists
        .iter()
        .map(|playlist| PlaylistPath {
            playlist_name: playlist.name.clone(),
            path: Path::new(root)
                .join(&playlist.name)
                .to_string_lossy()
                .into_owned(),
        })
        .collect()
}

/// Rewrites each record's output directory with its computed path, joining
/// by playlist name. The join is only well defined when names are unique,
/// so a duplicate name fails fast rather than pairing arbitrarily; an
/// unmatched computed path fails too instead of being silently dropped.
pub fn merge_directories(
    playlists: &[PlaylistRecord],
    computed: &[PlaylistPath],
) -> PathResult<Vec<PlaylistRecord>> {
    let mut seen = HashSet::new();
    for playlist in playlists {
        if !seen.insert(playlist.name.as_str()) {
            return Err(Report::new(PathError).attach_printable(format!(
                "playlist name '{}' appears more than once, directories cannot be merged by name",
                playlist.name
            )));
        }
    }

    let mut merged = Vec::with_capacity(computed.len());
    for pair in computed {
        let record = playlists
            .iter()
            .find(|playlist| playlist.name == pair.playlist_name)
            .ok_or(PathError)
            .into_report()
            .attach_printable(format!(
                "computed a directory for '{}' but no such playlist exists",
                pair.playlist_name
            ))?;
        merged.push(PlaylistRecord {
            output_directory: pair.path.clone(),
            ..record.clone()
        });
    }
    Ok(merged)
}

/// Best-effort batch creation: a pre-existing directory is fine, any other
/// failure is printed and that one directory is skipped. This is the only
/// step in the run that is not fail-fast.
pub fn create_directories(paths: &[PlaylistPath]) {
    for pair in paths {
        match fs::create_dir(&pair.path) {
            Ok(()) => {}
            Err(error) if error.kind() == ErrorKind::AlreadyExists => {}
            Err(error) => {
                eprintln!(
                    "{} {}: {}",
                    "could not create directory".red(),
                    pair.path,
                    error
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> PlaylistRecord {
        PlaylistRecord {
            name: name.to_string(),
            source_url: format!("https://open.spotify.com/playlist/{}", name),
            output_directory: "/music".to_string(),
            external_id: None,
            expected_track_count: 10,
        }
    }

    #[test]
    fn normalize_collapses_redundant_segments() {
        assert_eq!(normalize_root("/music//mixes/./deep").unwrap(), "/music/mixes/deep");
        assert_eq!(normalize_root("/music/mixes/../deep").unwrap(), "/music/deep");
        assert_eq!(normalize_root("./music/").unwrap(), "music");
        assert_eq!(normalize_root(".").unwrap(), ".");
    }

    #[test]
    fn normalize_rejects_empty_path() {
        assert!(normalize_root("   ").is_err());
    }

    #[test]
    fn compute_joins_root_and_name() {
        let playlists = vec![record("roadtrip"), record("focus")];
        let computed = compute_directories("/music", &playlists);
        assert_eq!(
            computed,
            vec![
                PlaylistPath {
                    playlist_name: "roadtrip".to_string(),
                    path: "/music/roadtrip".to_string(),
                },
                PlaylistPath {
                    playlist_name: "focus".to_string(),
                    path: "/music/focus".to_string(),
                },
            ]
        );
    }

    #[test]
    fn merge_rewrites_only_the_output_directory() {
        let playlists = vec![record("roadtrip")];
        let computed = compute_directories("/music", &playlists);
        let merged = merge_directories(&playlists, &computed).unwrap();
        assert_eq!(merged[0].output_directory, "/music/roadtrip");
        assert_eq!(merged[0].name, playlists[0].name);
        assert_eq!(merged[0].source_url, playlists[0].source_url);
        assert_eq!(merged[0].expected_track_count, 10);
    }

    #[test]
    fn compute_then_merge_is_idempotent() {
        let playlists = vec![record("roadtrip"), record("focus")];
        let computed = compute_directories("/music", &playlists);
        let merged = merge_directories(&playlists, &computed).unwrap();

        let recomputed = compute_directories("/music", &merged);
        let remerged = merge_directories(&merged, &recomputed).unwrap();
        assert_eq!(merged, remerged);
    }

    #[test]
    fn merge_fails_on_duplicate_names() {
        let playlists = vec![record("roadtrip"), record("roadtrip")];
        let computed = compute_directories("/music", &playlists);
        assert!(merge_directories(&playlists, &computed).is_err());
    }

    #[test]
    fn merge_fails_on_unmatched_computed_path() {
        let playlists = vec![record("roadtrip")];
        let computed = vec![PlaylistPath {
            playlist_name: "focus".to_string(),
            path: "/music/focus".to_string(),
        }];
        assert!(merge_directories(&playlists, &computed).is_err());
    }

    #[test]
    fn create_directories_is_idempotent() {
        let tempdir = tempfile::tempdir().unwrap();
        let root = tempdir.path().to_string_lossy().into_owned();
        let playlists = vec![record("roadtrip"), record("focus")];
        let computed = compute_directories(&root, &playlists);

        std::fs::create_dir(&computed[0].path).unwrap();
        create_directories(&computed);
        create_directories(&computed);
        assert!(Path::new(&computed[0].path).is_dir());
        assert!(Path::new(&computed[1].path).is_dir());
    }
}

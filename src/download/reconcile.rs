use std::fs;

use colored::Colorize;
use error_stack::{IntoReport, ResultExt};

use crate::download::{DownloadError, DownloadResult};
use crate::playlist::PlaylistRecord;

/// Extensions counted as downloaded audio, matched case-insensitively on
/// the file's extension. Hidden files like `.mp3` have no extension and are
/// not counted; subdirectories are not descended into.
pub const AUDIO_EXTENSIONS: [&str; 6] = ["mp3", "m4a", "flac", "opus", "ogg", "wav"];

/// Five-way classification of one playlist's download completeness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum OutcomeBand {
    #[strum(serialize = "none-found")]
    NoneFound,
    #[strum(serialize = "partial-low")]
    PartialLow,
    #[strum(serialize = "partial-mid")]
    PartialMid,
    #[strum(serialize = "near-complete")]
    NearComplete,
    #[strum(serialize = "complete")]
    Complete,
}

/// Counts recognized audio files directly inside `directory`.
pub fn count_audio_files(directory: &str) -> DownloadResult<u64> {
    let entries = fs::read_dir(directory)
        .into_report()
        .change_context(DownloadError)
        .attach_printable(format!("failed to list output directory '{}'", directory))?;

    let mut count = 0;
    for entry in entries {
        let entry = entry.into_report().change_context(DownloadError)?;
        let file_type = entry.file_type().into_report().change_context(DownloadError)?;
        if !file_type.is_file() {
            continue;
        }
        let path = entry.path();
        let Some(extension) = path.extension().and_then(|extension| extension.to_str()) else {
            continue;
        };
        if AUDIO_EXTENSIONS
            .iter()
            .any(|known| extension.eq_ignore_ascii_case(known))
        {
            count += 1;
        }
    }
    Ok(count)
}

/// Total over all non-negative pairs. An unknown expected count (zero, the
/// config-declared case) cannot divide, so it collapses to found/not-found.
pub fn classify(found: u64, expected: u64) -> OutcomeBand {
    if found == 0 {
        return OutcomeBand::NoneFound;
    }
    if expected == 0 || found >= expected {
        return OutcomeBand::Complete;
    }
    let percent = ((found as f64 / expected as f64) * 100.0).round() as u64;
    if percent < 33 {
        OutcomeBand::PartialLow
    } else if percent < 66 {
        OutcomeBand::PartialMid
    } else {
        OutcomeBand::NearComplete
    }
}

/// Prints the per-playlist outcome line, colored by band.
pub fn report_outcome(playlist: &PlaylistRecord, found: u64) {
    let band = classify(found, playlist.expected_track_count);
    let label = band.to_string();
    let label = match band {
        OutcomeBand::NoneFound => label.red(),
        OutcomeBand::PartialLow | OutcomeBand::PartialMid => label.yellow(),
        OutcomeBand::NearComplete | OutcomeBand::Complete => label.green(),
    };
    if playlist.expected_track_count == 0 {
        println!("{} songs found on disk [{}]", found, label);
    } else if band == OutcomeBand::Complete {
        println!("all songs successfully downloaded! [{}]", label);
    } else {
        println!(
            "{}/{} songs found and downloaded [{}]",
            found, playlist.expected_track_count, label
        );
    }
}

#[cfg(test)]
mod tests {
    use std::fs::File;

    use super::*;

    #[test]
    fn classify_band_boundaries() {
        assert_eq!(classify(32, 100), OutcomeBand::PartialLow);
        assert_eq!(classify(33, 100), OutcomeBand::PartialMid);
        assert_eq!(classify(65, 100), OutcomeBand::PartialMid);
        assert_eq!(classify(66, 100), OutcomeBand::NearComplete);
        assert_eq!(classify(99, 100), OutcomeBand::NearComplete);
    }

    #[test]
    fn classify_completeness() {
        assert_eq!(classify(0, 50), OutcomeBand::NoneFound);
        assert_eq!(classify(50, 50), OutcomeBand::Complete);
        // Over-delivery still counts as complete.
        assert_eq!(classify(60, 50), OutcomeBand::Complete);
    }

    #[test]
    fn classify_handles_unknown_expected_count() {
        assert_eq!(classify(5, 0), OutcomeBand::Complete);
        assert_eq!(classify(0, 0), OutcomeBand::NoneFound);
    }

    #[test]
    fn classify_rounds_percent_before_banding() {
        // 999/1000 rounds to 100 but is still short of complete.
        assert_eq!(classify(999, 1000), OutcomeBand::NearComplete);
        // 1/3 rounds to 33, landing exactly on the partial-mid edge.
        assert_eq!(classify(1, 3), OutcomeBand::PartialMid);
    }

    #[test]
    fn band_labels_render_as_kebab_case() {
        assert_eq!(OutcomeBand::NoneFound.to_string(), "none-found");
        assert_eq!(OutcomeBand::NearComplete.to_string(), "near-complete");
    }

    #[test]
    fn count_matches_recognized_extensions_case_insensitively() {
        let tempdir = tempfile::tempdir().unwrap();
        for name in ["one.mp3", "two.FLAC", "three.Ogg", "notes.txt", ".mp3"] {
            File::create(tempdir.path().join(name)).unwrap();
        }
        std::fs::create_dir(tempdir.path().join("nested.mp3")).unwrap();

        let found = count_audio_files(&tempdir.path().to_string_lossy()).unwrap();
        assert_eq!(found, 3);
    }

    #[test]
    fn count_fails_on_missing_directory() {
        assert!(count_audio_files("/definitely/not/here").is_err());
    }
}

use std::fmt;

use crate::config::Config;
use crate::playlist::PlaylistRecord;

pub const SPOTDL_PROGRAM: &str = "spotdl";

/// One spotdl invocation for one playlist. The args are spawn-ready (no
/// shell quoting); `Display` renders the equivalent command line with the
/// output directory quoted so paths with spaces read back correctly.
#[derive(Debug, Clone, PartialEq)]
pub struct SpotdlInvocation {
    pub program: String,
    pub args: Vec<String>,
}

impl fmt::Display for SpotdlInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        let mut quote_next = false;
        for arg in &self.args {
            if quote_next {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
            quote_next = arg == "--output";
        }
        Ok(())
    }
}

/// Pure mapping from validated options and one playlist to the spotdl
/// argument list, in a fixed order: URL, m3u flag, format, lyrics provider,
/// thread counts, output directory.
pub fn build_invocation(config: &Config, playlist: &PlaylistRecord) -> SpotdlInvocation {
    let mut args = vec![playlist.source_url.clone()];
    if config.generate_m3u {
        args.push("--m3u".to_string());
    }
    args.push("--output-format".to_string());
    args.push(config.output_format.clone());
    if let Some(provider) = &config.lyrics_provider {
        args.push("--lyrics-provider".to_string());
        args.push(provider.clone());
    }
    if let Some(threads) = config.download_threads {
        args.push("--download-threads".to_string());
        args.push(threads.to_string());
    }
    if let Some(threads) = config.search_threads {
        args.push("--search-threads".to_string());
        args.push(threads.to_string());
    }
    args.push("--output".to_string());
    args.push(playlist.output_directory.clone());

    SpotdlInvocation {
        program: SPOTDL_PROGRAM.to_string(),
        args,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SourceKind, ValidationProfile};

    fn config() -> Config {
        Config {
            source: SourceKind::Catalog,
            username: "a".repeat(25),
            playlists: Vec::new(),
            root_folder: "/music".to_string(),
            folder_per_playlist: true,
            output_format: "mp3".to_string(),
            generate_m3u: true,
            lyrics_provider: Some("genius".to_string()),
            download_threads: Some(4),
            search_threads: Some(8),
            validation_profile: ValidationProfile::Strict,
            prompt_default_accept: true,
            abort_on_empty_selection: false,
        }
    }

    fn playlist(directory: &str) -> PlaylistRecord {
        PlaylistRecord {
            name: "roadtrip".to_string(),
            source_url: "https://open.spotify.com/playlist/abc".to_string(),
            output_directory: directory.to_string(),
            external_id: Some("abc".to_string()),
            expected_track_count: 12,
        }
    }

    #[test]
    fn flags_appear_in_fixed_order() {
        let invocation = build_invocation(&config(), &playlist("/music/roadtrip"));
        assert_eq!(
            invocation.args,
            vec![
                "https://open.spotify.com/playlist/abc",
                "--m3u",
                "--output-format",
                "mp3",
                "--lyrics-provider",
                "genius",
                "--download-threads",
                "4",
                "--search-threads",
                "8",
                "--output",
                "/music/roadtrip",
            ]
        );
    }

    #[test]
    fn m3u_flag_is_omitted_when_disabled() {
        let mut config = config();
        config.generate_m3u = false;
        let invocation = build_invocation(&config, &playlist("/music/roadtrip"));
        assert!(!invocation.args.iter().any(|arg| arg == "--m3u"));
    }

    #[test]
    fn optional_tuning_flags_are_omitted_for_declared_profiles() {
        let mut config = config();
        config.lyrics_provider = None;
        config.download_threads = None;
        config.search_threads = None;
        let invocation = build_invocation(&config, &playlist("/music/roadtrip"));
        assert!(!invocation.args.iter().any(|arg| arg.starts_with("--lyrics")));
        assert!(!invocation.args.iter().any(|arg| arg.ends_with("-threads")));
    }

    #[test]
    fn rendered_command_quotes_the_output_directory() {
        let invocation = build_invocation(&config(), &playlist("/music/road trip"));
        let rendered = invocation.to_string();
        assert!(rendered.starts_with("spotdl https://open.spotify.com/playlist/abc"));
        assert!(rendered.ends_with("--output \"/music/road trip\""));
    }
}

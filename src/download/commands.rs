use colored::Colorize;
use error_stack::{Report, ResultExt};

use crate::config::Config;
use crate::download::{command, reconcile, runner, DownloadError, DownloadResult};
use crate::paths;
use crate::playlist::{resolve_playlists, PlaylistRecord};
use crate::prompt::{ConsoleAsker, SelectionPrompt};

pub struct DownloadCommands;

impl DownloadCommands {
    /// The whole run: validate config, resolve playlists, let the user pick,
    /// then download and reconcile each selected playlist sequentially.
    pub async fn execute(config_path: &str) -> DownloadResult<()> {
        let config = Config::load(config_path).change_context(DownloadError)?;
        let root = paths::normalize_root(&config.root_folder).change_context(DownloadError)?;
        paths::ensure_root_exists(&root).change_context(DownloadError)?;

        let playlists = resolve_playlists(&config, &root)
            .await
            .change_context(DownloadError)?;
        if playlists.is_empty() {
            println!("{}", "the account owns no playlists, nothing to do".yellow());
            return Ok(());
        }

        let prompt = SelectionPrompt {
            default_accept: config.prompt_default_accept,
        };
        let mut asker = ConsoleAsker;
        let mut selected = prompt
            .select(playlists, &mut asker)
            .change_context(DownloadError)?;
        if selected.is_empty() {
            if config.abort_on_empty_selection {
                return Err(Report::new(DownloadError)
                    .attach_printable("no playlists selected and abort_on_empty_selection is set"));
            }
            println!("{}", "no playlists selected, nothing to do".yellow());
            return Ok(());
        }

        if config.folder_per_playlist {
            selected =
                Self::isolate_per_playlist(&root, selected).change_context(DownloadError)?;
        }

        // Best-effort from here on: one playlist failing to download or
        // reconcile must not stop the remaining ones.
        for playlist in &selected {
            if let Err(report) = Self::download_and_reconcile(&config, playlist) {
                eprintln!("{:?}", report);
            }
        }
        Ok(())
    }

    fn download_and_reconcile(config: &Config, playlist: &PlaylistRecord) -> DownloadResult<()> {
        let invocation = command::build_invocation(config, playlist);
        runner::run_download(&invocation, &playlist.name)?;

        let found = reconcile::count_audio_files(&playlist.output_directory)?;
        reconcile::report_outcome(playlist, found);
        println!();
        Ok(())
    }

    /// Gives each selected playlist its own `root/name` directory: compute
    /// the paths, merge them back into the records by name and create the
    /// directories best-effort.
    fn isolate_per_playlist(
        root: &str,
        selected: Vec<PlaylistRecord>,
    ) -> paths::PathResult<Vec<PlaylistRecord>> {
        let computed = paths::compute_directories(root, &selected);
        let merged = paths::merge_directories(&selected, &computed)?;
        paths::create_directories(&computed);
        Ok(merged)
    }
}

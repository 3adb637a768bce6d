use std::fmt;

use colored::Colorize;
use error_stack::ResultExt;

use crate::dialoguer::Dialoguer;
use crate::playlist::PlaylistRecord;

#[derive(Debug)]
pub struct PromptError;

impl fmt::Display for PromptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Prompt error")
    }
}

impl std::error::Error for PromptError {}

pub type PromptResult<T> = error_stack::Result<T, PromptError>;

const AFFIRMATIVE_ANSWERS: [&str; 2] = ["y", "yes"];

/// Where answers come from. The selection flow is written against this seam
/// so it runs against scripted answers in tests, terminal-free.
pub trait Asker {
    fn ask(&mut self, prompt: &str) -> PromptResult<String>;
}

/// Production asker backed by the dialoguer wrapper. Empty input is allowed
/// so the default-accept flow can treat it as a yes.
pub struct ConsoleAsker;

impl Asker for ConsoleAsker {
    fn ask(&mut self, prompt: &str) -> PromptResult<String> {
        Dialoguer::input(prompt.to_string(), true).change_context(PromptError)
    }
}

fn is_affirmative(answer: &str, accept_empty: bool) -> bool {
    let token = answer.trim().to_lowercase();
    AFFIRMATIVE_ANSWERS.contains(&token.as_str()) || (accept_empty && token.is_empty())
}

/// Single-pass interactive filter: one "download everything?" question,
/// then one yes/no per playlist when the user wants to pick manually.
pub struct SelectionPrompt {
    /// When set, an empty per-playlist answer counts as a yes.
    pub default_accept: bool,
}

impl SelectionPrompt {
    pub fn select(
        &self,
        playlists: Vec<PlaylistRecord>,
        asker: &mut dyn Asker,
    ) -> PromptResult<Vec<PlaylistRecord>> {
        if playlists.is_empty() {
            return Ok(playlists);
        }

        println!("all your playlists:");
        for (index, playlist) in playlists.iter().enumerate() {
            println!("{}. {}", index + 1, playlist.name.cyan());
        }
        println!();

        let answer = asker.ask("download all playlists? ('y' for yes, 'n' to manually select)")?;
        if is_affirmative(&answer, false) {
            return Ok(playlists);
        }

        let mut selected = Vec::new();
        for playlist in playlists {
            let question = if self.default_accept {
                format!("download playlist: {}? y/n (or empty to accept)", playlist.name)
            } else {
                format!("download playlist: {}? y/n", playlist.name)
            };
            if is_affirmative(&asker.ask(&question)?, self.default_accept) {
                println!("{} {}\n", "DOWNLOADING".green(), playlist.name);
                selected.push(playlist);
            } else {
                println!("{} {}\n", "IGNORING".yellow(), playlist.name);
            }
        }
        Ok(selected)
    }
}

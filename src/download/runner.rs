use std::io::{BufRead, BufReader};
use std::process::{Command, Stdio};
use std::time::Duration;

use colored::Colorize;
use error_stack::{IntoReport, ResultExt};
use indicatif::ProgressBar;

use crate::download::command::SpotdlInvocation;
use crate::download::{DownloadError, DownloadResult};
use crate::Suggestion;

/// Spawns one spotdl run and streams its stdout line by line as it arrives.
/// Lines that are not valid UTF-8 are dropped rather than aborting the run.
/// A failing exit status is not an error here: fewer files on disk surface
/// through reconciliation instead.
pub fn run_download(invocation: &SpotdlInvocation, playlist_name: &str) -> DownloadResult<()> {
    println!("\n{}", playlist_name.cyan());

    let mut child = Command::new(&invocation.program)
        .args(&invocation.args)
        .stdout(Stdio::piped())
        .spawn()
        .into_report()
        .change_context(DownloadError)
        .attach_printable(format!("failed to spawn '{}'", invocation))
        .attach(Suggestion::new("is spotdl installed and on your PATH?"))?;

    let stdout = child
        .stdout
        .take()
        .ok_or(DownloadError)
        .into_report()
        .attach_printable("child process has no stdout handle")?;
    let mut reader = BufReader::new(stdout);

    let spinner = ProgressBar::new_spinner();
    spinner.set_message(format!("waiting for {} output...", invocation.program));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let mut waiting_first_line = true;
    let mut buffer = Vec::new();
    loop {
        buffer.clear();
        let read = reader
            .read_until(b'\n', &mut buffer)
            .into_report()
            .change_context(DownloadError)?;
        if read == 0 {
            break;
        }
        if waiting_first_line {
            spinner.finish_and_clear();
            waiting_first_line = false;
        }
        if let Ok(line) = std::str::from_utf8(&buffer) {
            println!("{}", line.trim_end());
        }
    }
    if waiting_first_line {
        spinner.finish_and_clear();
    }

    child
        .wait()
        .into_report()
        .change_context(DownloadError)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn tolerates_undecodable_output_and_waits_for_exit() {
        // Mixes a valid line, a raw invalid UTF-8 byte line and another
        // valid line; the runner must survive all three.
        let invocation = SpotdlInvocation {
            program: "sh".to_string(),
            args: vec![
                "-c".to_string(),
                "printf 'one\\n\\377\\n'; echo two".to_string(),
            ],
        };
        run_download(&invocation, "smoke").unwrap();
    }

    #[test]
    fn missing_program_is_a_runner_error() {
        let invocation = SpotdlInvocation {
            program: "definitely-not-a-real-binary".to_string(),
            args: vec![],
        };
        assert!(run_download(&invocation, "smoke").is_err());
    }
}

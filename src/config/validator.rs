use colored::Colorize;
use error_stack::Report;
use serde_json::Value;
use url::Url;

use crate::config::{ConfigError, ConfigResult};

const OUTPUT_FORMATS: [&str; 6] = ["mp3", "m4a", "flac", "opus", "ogg", "wav"];
const LYRICS_PROVIDERS: [&str; 2] = ["genius", "musixmatch"];
const FALLBACK_OUTPUT_FORMAT: &str = "mp3";
const USERNAME_LENGTH: usize = 25;

fn rule_violation(message: String) -> Report<ConfigError> {
    Report::new(ConfigError).attach_printable(message)
}

fn required(key: &str) -> Report<ConfigError> {
    rule_violation(format!("'{}' in config.json is required", key))
}

/// Fetches a required string field, distinguishing "missing" from "wrong
/// type" from "blank" so the report names the first violated rule.
fn string_field<'a>(data: &'a Value, key: &str) -> ConfigResult<&'a str> {
    let value = match data.get(key) {
        None | Some(Value::Null) => return Err(required(key)),
        Some(value) => value,
    };
    let value = value
        .as_str()
        .ok_or_else(|| rule_violation(format!("'{}' in config.json must be a string", key)))?;
    if value.trim().is_empty() {
        return Err(required(key));
    }
    Ok(value)
}

fn positive_integer(data: &Value, key: &str) -> ConfigResult<()> {
    let value = data
        .get(key)
        .filter(|value| !value.is_null())
        .ok_or_else(|| {
            rule_violation(
                "'download_threads'/'search_threads' in config.json is required".to_string(),
            )
        })?;
    let value = value.as_i64().ok_or_else(|| {
        rule_violation(
            "'download_threads'/'search_threads' in config.json must be an integer".to_string(),
        )
    })?;
    if value <= 0 {
        return Err(rule_violation(
            "'download_threads'/'search_threads' in config.json must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

fn keyword_field<'a>(data: &'a Value, key: &str, allowed: &[&str]) -> ConfigResult<&'a str> {
    let value = string_field(data, key)?;
    if !allowed.contains(&value) {
        return Err(rule_violation(format!(
            "'{}' in config.json must be one of ({})",
            key,
            allowed.join("/")
        )));
    }
    Ok(value)
}

fn is_catalog_sourced(data: &Value) -> ConfigResult<bool> {
    match data.get("source") {
        None | Some(Value::Null) => Ok(true),
        Some(_) => Ok(keyword_field(data, "source", &["catalog", "declared"])? == "catalog"),
    }
}

fn is_strict_profile(data: &Value) -> ConfigResult<bool> {
    match data.get("validation_profile") {
        None | Some(Value::Null) => Ok(true),
        Some(_) => {
            Ok(keyword_field(data, "validation_profile", &["strict", "lenient"])? == "strict")
        }
    }
}

fn check_username(data: &Value, strict: bool) -> ConfigResult<()> {
    let username = string_field(data, "username")?;
    if strict && username.chars().count() != USERNAME_LENGTH {
        return Err(rule_violation(format!(
            "'username' in config.json should be {} characters long",
            USERNAME_LENGTH
        )));
    }
    Ok(())
}

fn check_declared_playlists(data: &Value) -> ConfigResult<()> {
    let playlists = match data.get("playlists") {
        None | Some(Value::Null) => return Err(required("playlists")),
        Some(value) => value,
    };
    let playlists = playlists
        .as_array()
        .ok_or_else(|| rule_violation("'playlists' in config.json must be a list".to_string()))?;
    if playlists.is_empty() {
        return Err(required("playlists"));
    }
    for entry in playlists {
        string_field(entry, "name")?;
        let url = string_field(entry, "url")?;
        Url::parse(url).map_err(|_| {
            rule_violation(format!("'{}' in config.json is not a valid playlist URL", url))
        })?;
    }
    Ok(())
}

fn check_output_format(data: &mut Value, strict: bool) -> ConfigResult<()> {
    let known = string_field(data, "output_format").map(|format| {
        OUTPUT_FORMATS
            .iter()
            .any(|allowed| format.eq_ignore_ascii_case(allowed))
    });
    match known {
        Ok(true) => Ok(()),
        Ok(false) if strict => Err(rule_violation(format!(
            "'output_format' in config.json must be of the following ({})",
            OUTPUT_FORMATS.join("/")
        ))),
        Err(report) if strict => Err(report),
        // Lenient profile: warn and fall back instead of failing.
        _ => {
            println!(
                "{}",
                format!(
                    "unknown or missing 'output_format', falling back to {}",
                    FALLBACK_OUTPUT_FORMAT
                )
                .yellow()
            );
            data["output_format"] = Value::String(FALLBACK_OUTPUT_FORMAT.to_string());
            Ok(())
        }
    }
}

fn check_spotdl_tuning(data: &Value, catalog: bool) -> ConfigResult<()> {
    for key in ["download_threads", "search_threads"] {
        if catalog || data.get(key).map_or(false, |value| !value.is_null()) {
            positive_integer(data, key)?;
        }
    }
    if catalog || data.get("lyrics_provider").map_or(false, |value| !value.is_null()) {
        let provider = string_field(data, "lyrics_provider").map_err(|_| {
            rule_violation(
                "'lyrics_provider' in config.json must be 'genius' or 'musixmatch'".to_string(),
            )
        })?;
        if !LYRICS_PROVIDERS.contains(&provider) {
            return Err(rule_violation(
                "'lyrics_provider' in config.json must be 'genius' or 'musixmatch'".to_string(),
            ));
        }
    }
    Ok(())
}

/// Validates the raw config document against the full rule set, in a fixed
/// order so the reported rule is deterministic. Returns the document
/// unchanged except for the lenient-profile output format fallback.
pub fn validate(data: &mut Value) -> ConfigResult<()> {
    if !data.is_object() {
        return Err(rule_violation(
            "config.json must be a JSON object".to_string(),
        ));
    }
    let strict = is_strict_profile(data)?;
    let catalog = is_catalog_sourced(data)?;

    if catalog {
        check_username(data, strict)?;
    } else {
        check_declared_playlists(data)?;
    }
    string_field(data, "root_folder")?;
    check_output_format(data, strict)?;
    check_spotdl_tuning(data, catalog)?;
    Ok(())
}

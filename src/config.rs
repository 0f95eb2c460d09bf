use std::fs;
use std::path::{Path, PathBuf};

use encoding_rs::{Encoding, UTF_8};
use serde::Deserialize;
use serde_json::Value;

use crate::{Error, Result, MAX_COOLDOWN_SECS};

/// What goes into a table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellMode {
    Rank,
    Score,
}

impl CellMode {
    /// `RANK_MODE` is "true" for ranks and "false" for scores, in any case.
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "true" => Ok(CellMode::Rank),
            "false" => Ok(CellMode::Score),
            _ => Err(Error::Config(format!("Bad value in settings: RANK_MODE = {value:?}"))),
        }
    }
}

/// The settings file as written by hand. Numbers and flags may be stored as strings.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct RawSettings {
    master_leaderboard_url: String,
    name_cache_path: PathBuf,
    csv_file_path: PathBuf,
    rank_mode: Value,
    rank_cutoff: Value,
    internet_cooldown: Value,
    #[serde(default)]
    csv_encoding: Option<String>,
}

/// Validated scraper settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Where the table of all leaderboards is stored.
    pub master_url: String,
    pub name_cache_path: PathBuf,
    pub csv_path: PathBuf,
    pub mode: CellMode,
    /// How many people to take from each leaderboard.
    pub rank_cutoff: usize,
    /// Average wait in seconds before each profile request.
    pub cooldown: f64,
    pub encoding: &'static Encoding,
}

impl Settings {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Couldn't read '{}': {e}", path.display())))?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawSettings =
            serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;

        let mode = match &raw.rank_mode {
            Value::Bool(true) => CellMode::Rank,
            Value::Bool(false) => CellMode::Score,
            Value::String(s) => CellMode::parse(s)?,
            other => return Err(Error::Config(format!("Bad value in settings: RANK_MODE = {other}"))),
        };

        let rank_cutoff = match &raw.rank_cutoff {
            Value::Number(n) => n.as_u64().map(|n| n as usize),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
        .ok_or_else(|| bad_value("RANK_CUTOFF", &raw.rank_cutoff))?;

        let cooldown = match &raw.internet_cooldown {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
        .filter(|secs: &f64| (0.0..=MAX_COOLDOWN_SECS).contains(secs))
        .ok_or_else(|| bad_value("INTERNET_COOLDOWN", &raw.internet_cooldown))?;

        let encoding = match raw.csv_encoding.as_deref() {
            None => UTF_8,
            Some(label) => Encoding::for_label(label.trim().as_bytes())
                .ok_or_else(|| Error::Config(format!("Unknown CSV_ENCODING {label:?}")))?,
        };
        // utf-16 and friends can only be decoded, `encode` would quietly write utf-8.
        if encoding.output_encoding() != encoding {
            return Err(Error::Config(format!(
                "CSV_ENCODING {} can't be used for output",
                encoding.name()
            )));
        }

        Ok(Self {
            master_url: raw.master_leaderboard_url,
            name_cache_path: raw.name_cache_path,
            csv_path: raw.csv_file_path,
            mode,
            rank_cutoff,
            cooldown,
            encoding,
        })
    }
}

fn bad_value(key: &str, value: &Value) -> Error {
    Error::Config(format!("Bad value in settings: {key} = {value}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SETTINGS: &str = r#"{
        "MASTER_LEADERBOARD_URL": "http://steamcommunity.com/stats/247080/leaderboards/?xml=1",
        "NAME_CACHE_PATH": "name_cache.json",
        "CSV_FILE_PATH": "rankings.csv",
        "RANK_MODE": "True",
        "RANK_CUTOFF": "20",
        "INTERNET_COOLDOWN": "2.5"
    }"#;

    #[test]
    fn string_values_are_parsed() {
        let settings = Settings::from_json(SETTINGS).unwrap();
        assert_eq!(settings.mode, CellMode::Rank);
        assert_eq!(settings.rank_cutoff, 20);
        assert_eq!(settings.cooldown, 2.5);
        assert_eq!(settings.csv_path, PathBuf::from("rankings.csv"));
        assert_eq!(settings.encoding, UTF_8);
    }

    #[test]
    fn native_json_values_are_accepted() {
        let json = r#"{
            "MASTER_LEADERBOARD_URL": "http://master",
            "NAME_CACHE_PATH": "c.json",
            "CSV_FILE_PATH": "o.csv",
            "RANK_MODE": false,
            "RANK_CUTOFF": 0,
            "INTERNET_COOLDOWN": 0,
            "CSV_ENCODING": "windows-1252"
        }"#;
        let settings = Settings::from_json(json).unwrap();
        assert_eq!(settings.mode, CellMode::Score);
        assert_eq!(settings.rank_cutoff, 0);
        assert_eq!(settings.cooldown, 0.0);
        assert_eq!(settings.encoding.name(), "windows-1252");
    }

    #[test]
    fn bad_rank_mode_is_fatal() {
        let json = SETTINGS.replace(r#""True""#, r#""yes""#);
        assert!(matches!(Settings::from_json(&json), Err(Error::Config(_))));
    }

    #[test]
    fn negative_values_are_rejected() {
        let json = SETTINGS.replace(r#""20""#, r#""-3""#);
        assert!(matches!(Settings::from_json(&json), Err(Error::Config(_))));

        let json = SETTINGS.replace(r#""2.5""#, r#""-1""#);
        assert!(matches!(Settings::from_json(&json), Err(Error::Config(_))));
    }

    #[test]
    fn huge_cooldown_is_rejected() {
        let json = SETTINGS.replace(r#""2.5""#, r#""1e20""#);
        assert!(matches!(Settings::from_json(&json), Err(Error::Config(_))));

        let json = SETTINGS.replace(r#""2.5""#, r#""3600""#);
        assert_eq!(Settings::from_json(&json).unwrap().cooldown, 3600.0);
    }

    #[test]
    fn decode_only_encodings_are_rejected() {
        for label in ["utf-16", "UTF-16BE", "iso-2022-kr"] {
            let json = SETTINGS.replace(
                r#""INTERNET_COOLDOWN": "2.5""#,
                &format!(r#""INTERNET_COOLDOWN": "2.5", "CSV_ENCODING": "{label}""#),
            );
            assert!(
                matches!(Settings::from_json(&json), Err(Error::Config(_))),
                "{label} was accepted"
            );
        }
    }

    #[test]
    fn missing_key_is_fatal() {
        let json = SETTINGS.replace("CSV_FILE_PATH", "CSV_PATH");
        assert!(matches!(Settings::from_json(&json), Err(Error::Config(_))));
    }
}

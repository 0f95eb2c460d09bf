//! Leaderboard scraper.
//! Downloads the top entries of every known leaderboard, turns steam ids into names
//! and writes one CSV row per player with a column per leaderboard.

mod macros;
mod parse;
mod request;

pub mod category;
pub mod config;
pub mod error;
pub mod leaderboard;
pub mod process;
pub mod resolver;
pub mod table;
pub mod writer;

pub use category::{Category, CategoryKind, CategorySet};
pub use config::{CellMode, Settings};
pub use error::{Error, Result};
pub use request::{Fetch, HttpFetcher};

/// Where the settings are looked for, relative to the current directory.
pub const DEFAULT_SETTINGS_PATH: &str = "settings.json";
/// Speed boards store `SPEED_SCORE_BASE - milliseconds` as their score.
pub const SPEED_SCORE_BASE: i64 = 100_000_000;
/// Upper bound for `INTERNET_COOLDOWN`, in seconds.
pub const MAX_COOLDOWN_SECS: f64 = 3600.0;
const PROFILE_URL_PREFIX: &str = "https://steamcommunity.com/profiles/";
const PROFILE_TITLE_PREFIX: &str = "Steam Community :: ";
const USER_AGENT: &str = concat!("lbscrape/", env!("CARGO_PKG_VERSION"));

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::time::Duration;

use rand_distr::{Distribution, Normal};

use crate::parse::parse_profile_name;
use crate::request::{request_page, Fetch};
use crate::{info_time, warn_time, Error, Result, MAX_COOLDOWN_SECS, PROFILE_URL_PREFIX};

/// Steam id -> display name. Steam ids are kept as strings, never numbers.
///
/// Entries are only ever added, a cached id is never looked up again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameCache {
    names: BTreeMap<String, String>,
}

impl NameCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the cache file. A missing file is an empty cache, a broken one is an error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info_time!("No steam id/name cache found at '{}'.", path.display());
                return Ok(Self::new());
            }
            Err(e) => return Err(e.into()),
        };
        let names = serde_json::from_str(&json)?;
        Ok(Self { names })
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.names)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn get(&self, steam_id: &str) -> Option<&str> {
        self.names.get(steam_id).map(String::as_str)
    }

    /// Stores a name unless the id is already known. Returns the name that ends up cached.
    pub fn insert(&mut self, steam_id: impl Into<String>, name: impl Into<String>) -> &str {
        self.names.entry(steam_id.into()).or_insert_with(|| name.into())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Translates steam ids into in-game names, scraping the profile page on a cache miss.
pub struct NameResolver<'f, F> {
    fetcher: &'f F,
    cache: NameCache,
    delay: Option<Normal<f64>>,
    profile_url: String,
}

impl<'f, F: Fetch> NameResolver<'f, F> {
    /// `average_delay` is in seconds. Every profile request waits a random time around it
    /// (normal distribution, sd = average / 3) so we don't hammer the site.
    pub fn new(fetcher: &'f F, cache: NameCache, average_delay: f64) -> Result<Self> {
        if !(0.0..=MAX_COOLDOWN_SECS).contains(&average_delay) {
            return Err(Error::Config(format!(
                "delay must be between 0 and {MAX_COOLDOWN_SECS} seconds, got {average_delay}"
            )));
        }
        let delay = if average_delay > 0.0 {
            let dist = Normal::new(average_delay, average_delay / 3.0)
                .map_err(|e| Error::Config(format!("bad delay {average_delay}: {e}")))?;
            Some(dist)
        } else {
            None
        };

        Ok(Self {
            fetcher,
            cache,
            delay,
            profile_url: PROFILE_URL_PREFIX.to_string(),
        })
    }

    /// Profile pages are requested at `{prefix}{steam_id}`.
    pub fn with_profile_url(mut self, prefix: impl Into<String>) -> Self {
        self.profile_url = prefix.into();
        self
    }

    /// e.g. "76561197993869032" -> "pancelor"
    pub async fn resolve(&mut self, steam_id: &str) -> Result<String> {
        if let Some(name) = self.cache.get(steam_id) {
            return Ok(name.to_string());
        }

        info_time!("Scraping steam for user id '{}'...", steam_id);
        self.throttle().await;

        let url = format!("{}{}", self.profile_url, steam_id);
        let html = request_page(self.fetcher, &url).await;
        let name =
            parse_profile_name(&html).ok_or_else(|| Error::NameNotFound(steam_id.to_string()))?;

        Ok(self.cache.insert(steam_id, name).to_string())
    }

    pub fn cache(&self) -> &NameCache {
        &self.cache
    }

    async fn throttle(&self) {
        let Some(dist) = &self.delay else {
            return;
        };
        // A `Duration` can't be negative. The upper clamp only cuts the far tail.
        let secs = dist
            .sample(&mut rand::thread_rng())
            .clamp(0.0, 3.0 * MAX_COOLDOWN_SECS);
        tokio::time::sleep(Duration::from_secs_f64(secs)).await;
    }
}

/// Writes the name cache back to disk when scraping is over, however it ends.
///
/// Call `finish` on the happy path to see save errors. If the session is dropped
/// instead (an early `?` return or a panic) the cache is still saved and errors are logged.
pub struct CacheSession<'f, F> {
    resolver: NameResolver<'f, F>,
    path: PathBuf,
    saved: bool,
}

impl<'f, F> CacheSession<'f, F> {
    pub fn begin(resolver: NameResolver<'f, F>, path: impl Into<PathBuf>) -> Self {
        Self {
            resolver,
            path: path.into(),
            saved: false,
        }
    }

    /// Saves the cache and hands it back.
    pub fn finish(mut self) -> Result<NameCache> {
        self.saved = true;
        save_logged(&self.resolver.cache, &self.path)?;
        Ok(std::mem::take(&mut self.resolver.cache))
    }
}

impl<'f, F> Deref for CacheSession<'f, F> {
    type Target = NameResolver<'f, F>;

    fn deref(&self) -> &Self::Target {
        &self.resolver
    }
}

impl<F> DerefMut for CacheSession<'_, F> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.resolver
    }
}

impl<F> Drop for CacheSession<'_, F> {
    fn drop(&mut self) {
        if self.saved {
            return;
        }
        if let Err(e) = save_logged(&self.resolver.cache, &self.path) {
            warn_time!("Couldn't save the name cache to '{}': {}", self.path.display(), e);
        }
    }
}

fn save_logged(cache: &NameCache, path: &Path) -> Result<()> {
    info_time!(
        "Saving the name cache ({} names) to '{}'...",
        cache.len(),
        path.display()
    );
    cache.save(path)
}

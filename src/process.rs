use chrono::Local;

use crate::category::CategorySet;
use crate::config::{CellMode, Settings};
use crate::leaderboard::{fetch_entries, format_clock_time, list_boards};
use crate::request::Fetch;
use crate::resolver::{CacheSession, NameCache, NameResolver};
use crate::table::PlayerTable;
use crate::writer::{write_table, WriteSummary};
use crate::{info_time, Result};

/// Everything `download_table` needs besides the name resolver.
#[derive(Debug, Clone, Copy)]
pub struct ScrapeJob<'a> {
    pub categories: &'a CategorySet,
    pub master_url: &'a str,
    pub rank_cutoff: usize,
    pub mode: CellMode,
}

/// Downloads every recognized leaderboard and folds it into one player x category table.
///
/// Boards are visited in master index order, entries in rank order. Boards the index
/// doesn't list stay empty; boards we don't know are never downloaded.
pub async fn download_table<F: Fetch>(
    fetcher: &F,
    resolver: &mut NameResolver<'_, F>,
    job: ScrapeJob<'_>,
) -> Result<PlayerTable> {
    let mut table = PlayerTable::new(job.categories.len());
    info_time!(
        "Columns: {}",
        job.categories.names().collect::<Vec<_>>().join(", ")
    );

    info_time!("Downloading leaderboards from '{}'...", job.master_url);
    let boards = list_boards(fetcher, job.master_url)
        .await?
        .filter_map(|board| {
            let category = job.categories.lookup(&board.name)?;
            Some((category, board.url))
        })
        .collect::<Vec<_>>();

    for (category, url) in boards {
        let is_speed = category.kind.is_speed();
        info_time!("Downloading leaderboard '{}'...\n(url='{}')", category.name, url);

        let start_time = Local::now();
        for entry in fetch_entries(fetcher, &url, is_speed, job.rank_cutoff).await? {
            let name = resolver.resolve(&entry.steam_id).await?;
            table.get_or_create(&name).cells[category.column] = match job.mode {
                CellMode::Rank => entry.rank.to_string(),
                CellMode::Score => entry.score.to_string(),
            };

            if is_speed {
                let time = format_clock_time(entry.score);
                info_time!("\t{}: {} with time {}", entry.rank, name, time);
            } else {
                info_time!("\t{}: {} with score {}", entry.rank, name, entry.score);
            }
        }
        info_time!(start_time, "Finished leaderboard '{}'", category.name);
    }

    Ok(table)
}

/// The whole run: load the cache, scrape, save the cache (even on failure), write the table.
pub async fn process_site<F: Fetch>(
    fetcher: &F,
    settings: &Settings,
    categories: &CategorySet,
) -> Result<WriteSummary> {
    info_time!(
        "Loading the name cache from '{}'...",
        settings.name_cache_path.display()
    );
    let cache = NameCache::load(&settings.name_cache_path)?;
    info_time!("Loaded {} cached names", cache.len());

    let resolver = NameResolver::new(fetcher, cache, settings.cooldown)?;
    let mut session = CacheSession::begin(resolver, &settings.name_cache_path);

    let job = ScrapeJob {
        categories,
        master_url: &settings.master_url,
        rank_cutoff: settings.rank_cutoff,
        mode: settings.mode,
    };
    let table = download_table(fetcher, &mut *session, job).await?;
    info_time!("Data downloaded successfully! {} players", table.len());
    session.finish()?;

    let local_now = Local::now();
    let summary = write_table(
        &table,
        &settings.csv_path,
        settings.encoding,
        &settings.name_cache_path,
    )
    .await?;
    info_time!(
        local_now,
        "Saved rankings to '{}'",
        settings.csv_path.display()
    );

    Ok(summary)
}

use crate::parse::{parse_board_index, parse_entries};
use crate::request::{request_page, Fetch};
use crate::{info_time, Result, SPEED_SCORE_BASE};

/// A board listed in the master index. Rebuilt every run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardRef {
    /// Uppercased board name.
    pub name: String,
    pub url: String,
}

/// One ranked row of a leaderboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub steam_id: String,
    pub rank: u32,
    /// Points for score boards, elapsed milliseconds for speed boards.
    pub score: i64,
}

/// Downloads the master index and lists every board it names.
/// A master index that couldn't be downloaded lists nothing.
pub async fn list_boards<F: Fetch>(
    fetcher: &F,
    master_url: &str,
) -> Result<impl Iterator<Item = LeaderboardRef>> {
    let xml = request_page(fetcher, master_url).await;
    let boards = parse_board_index(&xml)?;
    info_time!("Master index lists {} leaderboards", boards.len());
    Ok(boards.into_iter())
}

/// Downloads a single board and returns its top `rank_cutoff` entries.
///
/// Speed boards store `SPEED_SCORE_BASE - time`, so their scores are flipped back into
/// milliseconds here. A cutoff of zero returns before touching the network.
pub async fn fetch_entries<F: Fetch>(
    fetcher: &F,
    board_url: &str,
    is_speed: bool,
    rank_cutoff: usize,
) -> Result<impl Iterator<Item = Entry>> {
    if rank_cutoff == 0 {
        return Ok(Vec::<Entry>::new().into_iter());
    }

    let xml = request_page(fetcher, board_url).await;
    let mut entries = parse_entries(&xml, rank_cutoff)?;
    if is_speed {
        for entry in entries.iter_mut() {
            entry.score = speed_time(entry.score);
        }
    }
    Ok(entries.into_iter())
}

/// Turns a stored speed-board score into the run time in milliseconds.
#[inline]
pub fn speed_time(raw_score: i64) -> i64 {
    SPEED_SCORE_BASE - raw_score
}

/// `MM:SS.ss`, e.g. 78650 ms -> `01:18.65`.
pub fn format_clock_time(millis: i64) -> String {
    let minutes = millis.div_euclid(60_000);
    let seconds = millis.rem_euclid(60_000) as f64 / 1000.0;
    format!("{:02}:{:05.2}", minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::mock::MockFetcher;
    use crate::Error;

    const BOARD: &str = "<response><entries>\
        <entry><steamid>111</steamid><score>21345</score><rank>1</rank></entry>\
        <entry><steamid>222</steamid><score>20000</score><rank>2</rank></entry>\
        </entries></response>";

    #[test]
    fn speed_scores_are_inverted() {
        assert_eq!(speed_time(21345), 99978655);
        assert_eq!(speed_time(SPEED_SCORE_BASE), 0);
    }

    #[test]
    fn clock_time_is_zero_padded() {
        assert_eq!(format_clock_time(78650), "01:18.65");
        assert_eq!(format_clock_time(5_000), "00:05.00");
        assert_eq!(format_clock_time(61 * 60_000 + 1_230), "61:01.23");
    }

    #[tokio::test]
    async fn zero_cutoff_makes_no_request() {
        let fetcher = MockFetcher::default().with_page("http://board", BOARD);
        let entries: Vec<_> = fetch_entries(&fetcher, "http://board", false, 0)
            .await
            .unwrap()
            .collect();

        assert!(entries.is_empty());
        assert!(fetcher.requests.borrow().is_empty());
    }

    #[tokio::test]
    async fn speed_board_entries_are_adjusted() {
        let fetcher = MockFetcher::default().with_page("http://board", BOARD);
        let entries: Vec<_> = fetch_entries(&fetcher, "http://board", true, 1)
            .await
            .unwrap()
            .collect();

        assert_eq!(
            entries,
            vec![Entry {
                steam_id: "111".into(),
                rank: 1,
                score: 99978655,
            }]
        );
    }

    #[tokio::test]
    async fn score_board_entries_are_untouched() {
        let fetcher = MockFetcher::default().with_page("http://board", BOARD);
        let scores: Vec<_> = fetch_entries(&fetcher, "http://board", false, 10)
            .await
            .unwrap()
            .map(|e| e.score)
            .collect();

        assert_eq!(scores, vec![21345, 20000]);
    }

    #[tokio::test]
    async fn error_page_is_not_an_empty_board() {
        let page = "<html><body><h1>Error</h1><p>The leaderboard is unavailable</p></body></html>";
        let fetcher = MockFetcher::default().with_page("http://board", page);
        let res = fetch_entries(&fetcher, "http://board", false, 20).await;

        assert!(matches!(res, Err(Error::MissingElement("entries"))));
    }

    #[tokio::test]
    async fn unreachable_board_is_empty() {
        let fetcher = MockFetcher::default();
        let entries = fetch_entries(&fetcher, "http://board", true, 20).await.unwrap();

        assert_eq!(entries.count(), 0);
    }

    #[tokio::test]
    async fn unreachable_index_lists_nothing() {
        let fetcher = MockFetcher::default();
        let boards: Vec<_> = list_boards(&fetcher, "http://master").await.unwrap().collect();

        assert!(boards.is_empty());
        assert_eq!(fetcher.count("http://master"), 1);
    }
}

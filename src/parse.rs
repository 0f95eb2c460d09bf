use roxmltree::{Document, Node};
use scraper::{Html, Selector};

use crate::category::normalize;
use crate::leaderboard::{Entry, LeaderboardRef};
use crate::{Error, Result, PROFILE_TITLE_PREFIX};

/// Parses the master index into `(NAME, url)` pairs, names uppercased.
/// An empty document has no boards.
pub(crate) fn parse_board_index(xml: &str) -> Result<Vec<LeaderboardRef>> {
    if xml.trim().is_empty() {
        return Ok(Vec::new());
    }
    let doc = Document::parse(xml)?;

    let mut boards = Vec::new();
    for board in doc.descendants().filter(|n| n.has_tag_name("leaderboard")) {
        let name = child_text(board, "name")?;
        let url = child_text(board, "url")?;
        boards.push(LeaderboardRef {
            name: normalize(&name),
            url,
        });
    }
    Ok(boards)
}

/// Parses at most `cutoff` entries of a single leaderboard, in document order.
/// Scores are returned as stored by the remote service.
///
/// An empty document has no entries, any other document must have `<entries>` under its root.
pub(crate) fn parse_entries(xml: &str, cutoff: usize) -> Result<Vec<Entry>> {
    if xml.trim().is_empty() {
        return Ok(Vec::new());
    }
    let doc = Document::parse(xml)?;
    let list = child(doc.root_element(), "entries")?;

    let mut entries = Vec::with_capacity(cutoff.min(100));
    for entry in list
        .children()
        .filter(|n| n.has_tag_name("entry"))
        .take(cutoff)
    {
        let steam_id = child_text(entry, "steamid")?;
        let score = child_text(entry, "score")?;
        let rank = child_text(entry, "rank")?;

        entries.push(Entry {
            steam_id,
            rank: parse_number(&rank, "rank")?,
            score: parse_number(&score, "score")?,
        });
    }
    Ok(entries)
}

/// Pulls the display name out of a profile page's `<title>`.
/// Everything after the prefix is the name, spaces included.
pub(crate) fn parse_profile_name(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let title_selector = create_selector("title").ok()?;
    let title = doc
        .select(&title_selector)
        .next()?
        .text()
        .collect::<String>();

    title
        .strip_prefix(PROFILE_TITLE_PREFIX)
        .map(|name| name.to_string())
}

#[inline]
fn create_selector(sel_str: &str) -> Result<Selector> {
    Selector::parse(sel_str).map_err(|_| Error::InvalidSelector(sel_str.into()))
}

fn child<'a, 'input>(
    parent: Node<'a, 'input>,
    element: &'static str,
) -> Result<Node<'a, 'input>> {
    parent
        .children()
        .find(|n| n.has_tag_name(element))
        .ok_or(Error::MissingElement(element))
}

/// Trimmed text of a child element. CDATA sections count as text.
fn child_text(parent: Node, element: &'static str) -> Result<String> {
    let node = child(parent, element)?;
    let text = node
        .descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect::<String>();
    Ok(text.trim().to_string())
}

fn parse_number<T: std::str::FromStr>(value: &str, element: &'static str) -> Result<T> {
    value.parse().map_err(|_| Error::BadNumber {
        element,
        value: value.to_string(),
    })
}

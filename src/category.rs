use std::collections::HashMap;

use crate::{Error, Result};

/// Speed boards hold an elapsed time (lower is better), score boards hold points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryKind {
    Speed,
    Score,
}

impl CategoryKind {
    pub fn is_speed(self) -> bool {
        self == CategoryKind::Speed
    }
}

/// One recognized leaderboard and the column it occupies in the output table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub kind: CategoryKind,
    pub column: usize,
}

/// The fixed, ordered set of boards we care about.
///
/// Built once at startup. The order of the categories *is* the column order of every
/// `PlayerRow`, so the set can't be changed after construction.
#[derive(Debug, Clone)]
pub struct CategorySet {
    categories: Vec<Category>,
    by_name: HashMap<String, usize>,
}

const SPEED_CATEGORIES: [&str; 7] = [
    "SPEEDRUN",
    "SPEEDRUN Bard",
    "SPEEDRUN Monk",
    "SPEEDRUN Aria",
    "SPEEDRUN Bolt",
    "SPEEDRUN Dove",
    "SPEEDRUN Eli",
];

const SCORE_CATEGORIES: [&str; 7] = [
    "HARDCORE",
    "HARDCORE Bard",
    "HARDCORE Monk",
    "HARDCORE Aria",
    "HARDCORE Bolt",
    "HARDCORE Dove",
    "HARDCORE Eli",
];

impl CategorySet {
    /// Speed categories come first, then score categories. Names are uppercased.
    pub fn new<S, T>(speed: &[S], score: &[T]) -> Result<Self>
    where
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let set = Self::build(
            speed
                .iter()
                .map(|n| (n.as_ref(), CategoryKind::Speed))
                .chain(score.iter().map(|n| (n.as_ref(), CategoryKind::Score))),
        );
        match set.categories.iter().find(|c| set.by_name[&c.name] != c.column) {
            Some(dup) => Err(Error::DuplicateCategory(dup.name.clone())),
            None => Ok(set),
        }
    }

    /// The fourteen boards of the game: plain + six characters, for both speedrun and hardcore.
    pub fn standard() -> Self {
        Self::build(
            SPEED_CATEGORIES
                .iter()
                .map(|n| (*n, CategoryKind::Speed))
                .chain(SCORE_CATEGORIES.iter().map(|n| (*n, CategoryKind::Score))),
        )
    }

    fn build<'a>(named: impl Iterator<Item = (&'a str, CategoryKind)>) -> Self {
        let mut categories = Vec::new();
        let mut by_name = HashMap::new();
        for (column, (name, kind)) in named.enumerate() {
            let name = normalize(name);
            // First occurrence wins, `new` reports the rest.
            by_name.entry(name.clone()).or_insert(column);
            categories.push(Category { name, kind, column });
        }
        Self {
            categories,
            by_name,
        }
    }

    /// Looks up a board name as it appears in the master index (case-insensitive).
    pub fn lookup(&self, name: &str) -> Option<&Category> {
        self.by_name
            .get(&normalize(name))
            .map(|&idx| &self.categories[idx])
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }
}

#[inline]
pub(crate) fn normalize(name: &str) -> String {
    name.trim().to_uppercase()
}

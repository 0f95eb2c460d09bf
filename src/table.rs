use std::collections::HashMap;

/// A player's cells, one per category, in category order. Empty string means no data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRow {
    pub name: String,
    pub cells: Vec<String>,
}

impl PlayerRow {
    /// Name first, then the cells.
    pub fn record(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.cells.iter().map(String::as_str))
    }
}

/// Display name -> row. Rows keep the order in which players were first seen.
#[derive(Debug, Clone)]
pub struct PlayerTable {
    width: usize,
    rows: Vec<PlayerRow>,
    index: HashMap<String, usize>,
}

impl PlayerTable {
    /// `width` is the number of categories.
    pub fn new(width: usize) -> Self {
        Self {
            width,
            rows: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Returns the row for `name`, creating an all-empty one on first sight.
    pub fn get_or_create(&mut self, name: &str) -> &mut PlayerRow {
        let idx = match self.index.get(name) {
            Some(&idx) => idx,
            None => {
                self.rows.push(PlayerRow {
                    name: name.to_string(),
                    cells: vec![String::new(); self.width],
                });
                self.index.insert(name.to_string(), self.rows.len() - 1);
                self.rows.len() - 1
            }
        };
        &mut self.rows[idx]
    }

    pub fn get(&self, name: &str) -> Option<&PlayerRow> {
        self.index.get(name).map(|&idx| &self.rows[idx])
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[PlayerRow] {
        &self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_created_once_with_full_width() {
        let mut table = PlayerTable::new(3);
        table.get_or_create("pancelor").cells[0] = "1".into();
        table.get_or_create("bolt").cells[2] = "7".into();
        table.get_or_create("pancelor").cells[1] = "4".into();

        assert_eq!(table.len(), 2);
        let row = table.get("pancelor").unwrap();
        assert_eq!(row.cells, vec!["1", "4", ""]);
        assert!(table.rows().iter().all(|r| r.cells.len() == 3));

        let names: Vec<_> = table.rows().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["pancelor", "bolt"]);
    }

    #[test]
    fn record_starts_with_name() {
        let mut table = PlayerTable::new(2);
        table.get_or_create("a,b").cells[1] = "9".into();
        let record: Vec<_> = table.rows()[0].record().collect();
        assert_eq!(record, vec!["a,b", "", "9"]);
    }
}

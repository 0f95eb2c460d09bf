use std::io;
use std::path::Path;

use encoding_rs::Encoding;
use tokio::{fs::File, io::AsyncWriteExt};

use crate::table::{PlayerRow, PlayerTable};
use crate::{info_time, warn_time, Error, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub written: usize,
    pub skipped: usize,
}

/// Writes one headerless CSV record per player to `path`.
///
/// Records that can't be represented in `encoding` are left out and reported;
/// `name_cache_path` is only used to point the user at the offending name.
pub async fn write_table(
    table: &PlayerTable,
    path: &Path,
    encoding: &'static Encoding,
    name_cache_path: &Path,
) -> Result<WriteSummary> {
    let (bytes, summary) = encode_table(table, encoding, name_cache_path)?;

    let mut file = File::create(path).await?;
    file.write_all(&bytes).await?;
    file.flush().await?;
    Ok(summary)
}

/// Same as `write_table` but into memory.
pub fn encode_table(
    table: &PlayerTable,
    encoding: &'static Encoding,
    name_cache_path: &Path,
) -> Result<(Vec<u8>, WriteSummary)> {
    let mut out = Vec::new();
    let mut summary = WriteSummary::default();

    for row in table.rows() {
        let record = csv_record(row)?;
        let (bytes, _, had_errors) = encoding.encode(&record);
        if had_errors {
            summary.skipped += 1;
            let stars = "*".repeat(80);
            warn_time!(
                "\n{}\nENCODING ERROR: can't write {:?} as {}; please search for it in the name cache ({}) and fix or remove it\n{}",
                stars,
                row.name,
                encoding.name(),
                name_cache_path.display(),
                stars
            );
            continue;
        }
        out.extend_from_slice(&bytes);
        summary.written += 1;
    }

    info_time!(
        "Encoded {} records ({} skipped)",
        summary.written,
        summary.skipped
    );
    Ok((out, summary))
}

/// A single `\n`-terminated CSV line, quoting only where needed.
fn csv_record(row: &PlayerRow) -> Result<String> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    wtr.write_record(row.record())?;
    let bytes = wtr.into_inner().map_err(|e| Error::Io(e.into_error()))?;

    String::from_utf8(bytes).map_err(|e| Error::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

#[cfg(test)]
mod tests {
    use encoding_rs::{UTF_8, WINDOWS_1252};

    use super::*;

    fn read_back(bytes: &[u8]) -> Vec<Vec<String>> {
        csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(bytes)
            .records()
            .map(|r| r.unwrap().iter().map(String::from).collect())
            .collect()
    }

    #[test]
    fn quoted_names_round_trip() {
        let mut table = PlayerTable::new(3);
        table.get_or_create("pancelor").cells[0] = "99978655".into();
        table.get_or_create("a, \"b\"").cells[2] = "12".into();
        table.get_or_create("two\nlines");

        let (bytes, summary) = encode_table(&table, UTF_8, Path::new("cache.json")).unwrap();
        assert_eq!(summary, WriteSummary { written: 3, skipped: 0 });

        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.starts_with("pancelor,99978655,,\n\"a, \"\"b\"\"\",,,12\n"));

        let expected: Vec<Vec<String>> = table
            .rows()
            .iter()
            .map(|r| r.record().map(String::from).collect())
            .collect();
        assert_eq!(read_back(&bytes), expected);
    }

    #[test]
    fn unencodable_record_is_skipped() {
        let mut table = PlayerTable::new(1);
        table.get_or_create("café").cells[0] = "1".into();
        table.get_or_create("東京").cells[0] = "2".into();
        table.get_or_create("bolt").cells[0] = "3".into();

        let (bytes, summary) = encode_table(&table, WINDOWS_1252, Path::new("cache.json")).unwrap();
        assert_eq!(summary, WriteSummary { written: 2, skipped: 1 });
        assert_eq!(bytes, b"caf\xe9,1\nbolt,3\n");
    }

    #[tokio::test]
    async fn table_lands_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rankings.csv");
        let mut table = PlayerTable::new(2);
        table.get_or_create("pancelor").cells[1] = "5".into();

        write_table(&table, &path, UTF_8, Path::new("cache.json"))
            .await
            .unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "pancelor,,5\n");
    }
}

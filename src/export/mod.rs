use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::session::Record;

/// Media type of every export
pub const CSV_MIME: &str = "text/csv";

/// Serialize records as CSV with a header row.
///
/// Fields containing commas, quotes or newlines are quoted. An empty slice
/// yields just the header line.
pub fn to_csv<R: Record>(records: &[R]) -> Result<String> {
    let mut buf = Vec::new();
    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(&mut buf);

        writer
            .write_record(R::HEADERS)
            .context("Failed to write CSV header")?;
        for record in records {
            writer
                .write_record(record.csv_fields())
                .with_context(|| format!("Failed to write CSV row for '{}'", record.coin()))?;
        }
        writer.flush().context("Failed to flush CSV output")?;
    }

    String::from_utf8(buf).context("CSV output is not valid UTF-8")
}

/// Default export location for a record type inside `dir`
pub fn export_path<R: Record>(dir: &Path) -> PathBuf {
    dir.join(R::EXPORT_FILE_NAME)
}

/// Write records to `path` as CSV atomically
///
/// Uses atomic-write-file so a failed export never leaves a truncated file.
pub fn write_csv<R: Record>(path: &Path, records: &[R]) -> Result<()> {
    let content = to_csv(records)?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save {}", path.display()))?;

    log::info!(
        "Exported {} rows to {} ({})",
        records.len(),
        path.display(),
        CSV_MIME
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{Answers, Metrics, PipelineRecord, ScoreRecord};

    fn parse(csv_text: &str) -> (Vec<String>, Vec<Vec<String>>) {
        let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
        let headers = reader
            .headers()
            .unwrap()
            .iter()
            .map(String::from)
            .collect();
        let rows = reader
            .records()
            .map(|r| r.unwrap().iter().map(String::from).collect())
            .collect();
        (headers, rows)
    }

    #[test]
    fn test_rejected_appends_never_reach_export() {
        use crate::error::ValidationError;
        use crate::session::SessionStore;

        let mut store = SessionStore::new();
        let mut accepted = 0;
        for coin in ["FET", "", "ONDO", "   ", "\t\n", "FET"] {
            match store.append(ScoreRecord::new(coin, "AI", Metrics::default(), "")) {
                Ok(_) => accepted += 1,
                Err(e) => assert_eq!(e, ValidationError::EmptyCoin),
            }
        }
        assert_eq!(accepted, 3);
        assert_eq!(store.len(), accepted);

        let (_, rows) = parse(&to_csv(store.all()).unwrap());
        assert_eq!(rows.len(), accepted);
        let coins: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(coins, ["FET", "ONDO", "FET"]);

        let mut pipeline = SessionStore::new();
        assert!(pipeline.append(PipelineRecord::new("", "AI", &Answers::default(), "")).is_err());
        pipeline.append(PipelineRecord::new("SOL", "L1", &Answers::default(), "")).unwrap();
        let (_, rows) = parse(&to_csv(pipeline.all()).unwrap());
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_empty_store_is_header_only() {
        let records: Vec<ScoreRecord> = vec![];
        let out = to_csv(&records).unwrap();
        let (headers, rows) = parse(&out);
        assert_eq!(headers, ScoreRecord::HEADERS);
        assert!(rows.is_empty());
        assert_eq!(out.lines().count(), 1);
    }

    #[test]
    fn test_scorecard_header() {
        let out = to_csv::<ScoreRecord>(&[]).unwrap();
        assert!(out.starts_with(
            "Coin,Sector,Market Context,Sector Flow,Smart Money,Exchange Flow,Volume & OI,\
             Chart Setup,OBV Strength,Social Buzz,Liquidity,Contract Safety,Final Score,Notes"
        ));
    }

    #[test]
    fn test_pipeline_header() {
        let out = to_csv::<PipelineRecord>(&[]).unwrap();
        assert_eq!(out.trim_end(), "Coin,Sector,Passes,Progress %,Verdict,Notes");
    }

    #[test]
    fn test_one_row_per_record() {
        let records = vec![
            ScoreRecord::new("SOL", "L1", Metrics::default(), ""),
            ScoreRecord::new("ARB", "L2", Metrics::default(), ""),
            ScoreRecord::new("SOL", "L1", Metrics::default(), "again"),
        ];
        let (_, rows) = parse(&to_csv(&records).unwrap());
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][0], "SOL");
        assert_eq!(rows[1][0], "ARB");
        assert_eq!(rows[2][13], "again");
        assert_eq!(rows[0][12], "3.00");
    }

    #[test]
    fn test_notes_round_trip() {
        let notes = "nice, setup \"confirmed\"";
        let records = vec![ScoreRecord::new("SOL", "L1", Metrics::default(), notes)];
        let out = to_csv(&records).unwrap();
        let (_, rows) = parse(&out);
        assert_eq!(rows[0][13], notes);
    }

    #[test]
    fn test_multiline_notes_round_trip() {
        let notes = "line one\nline two, with comma";
        let records = vec![PipelineRecord::new(
            "TIA",
            "Modular",
            &Answers::new([true; 6]),
            notes,
        )];
        let (_, rows) = parse(&to_csv(&records).unwrap());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][4], "Strong Gem");
        assert_eq!(rows[0][5], notes);
    }

    #[test]
    fn test_export_path_uses_record_file_name() {
        let dir = Path::new("/tmp/gems");
        assert_eq!(
            export_path::<ScoreRecord>(dir),
            dir.join("hidden_gem_scores.csv")
        );
        assert_eq!(
            export_path::<PipelineRecord>(dir),
            dir.join("hidden_gem_pipeline.csv")
        );
    }

    #[test]
    fn test_write_csv_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_path::<ScoreRecord>(dir.path());
        let records = vec![ScoreRecord::new("SOL", "L1", Metrics::default(), "a, b")];

        write_csv(&path, &records).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, to_csv(&records).unwrap());
    }

    #[test]
    fn test_write_csv_overwrites_previous_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_path::<ScoreRecord>(dir.path());
        let mut records = vec![ScoreRecord::new("SOL", "L1", Metrics::default(), "")];
        write_csv(&path, &records).unwrap();

        records.push(ScoreRecord::new("ARB", "L2", Metrics::default(), ""));
        write_csv(&path, &records).unwrap();

        let (_, rows) = parse(&std::fs::read_to_string(&path).unwrap());
        assert_eq!(rows.len(), 2);
    }
}

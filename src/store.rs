use crate::error::StoreError;
use crate::models::rating::SubmissionRecord;

/// Destination for finalized submissions. The workflow is the only caller;
/// implementations must never reorder or rewrite rows already stored.
pub trait ResultStore {
    fn append(&self, records: &[SubmissionRecord]) -> Result<(), StoreError>;
}

#[cfg(feature = "ssr")]
mod csv_impl {
    use super::ResultStore;
    use crate::error::StoreError;
    use crate::models::rating::SubmissionRecord;
    use leptos::logging::log;
    use std::collections::HashSet;
    use std::fs::{self, File, OpenOptions};
    use std::io::{Read, Seek, SeekFrom, Write};
    use std::path::{Path, PathBuf};

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::models::rating::RatingValue;
        use chrono::{TimeZone, Utc};

        fn record(user: &str, review: &str, rating: RatingValue, secs: i64) -> SubmissionRecord {
            SubmissionRecord {
                user_id: user.into(),
                review_id: review.into(),
                rating,
                comment: String::new(),
                timestamp: Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap(),
            }
        }

        #[test]
        fn first_append_writes_header_once() {
            let dir = tempfile::tempdir().unwrap();
            let store = CsvResultStore::new(dir.path().join("results.csv"));

            store
                .append(&[record("alice", "P1/human", RatingValue::Good, 0)])
                .unwrap();
            store
                .append(&[record("bob", "P2/llm", RatingValue::Poor, 1)])
                .unwrap();

            let contents = fs::read_to_string(store.path()).unwrap();
            let lines: Vec<&str> = contents.lines().collect();
            assert_eq!(lines.len(), 3);
            assert_eq!(lines[0], "user_id,review_id,rating,comment,timestamp");
            assert!(lines[1].starts_with("alice,P1/human,3,,"));
            assert!(lines[2].starts_with("bob,P2/llm,1,,"));
            assert_eq!(contents.matches("user_id").count(), 1);
        }

        #[test]
        fn existing_rows_are_kept_verbatim() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("results.csv");
            let existing = "user_id,review_id,rating,comment,timestamp\n\
                            carol,P9/human,2,\"terse, but fair\",2024-01-01T00:00:00Z\n";
            fs::write(&path, existing).unwrap();

            let store = CsvResultStore::new(&path);
            store
                .append(&[record("alice", "P1/human", RatingValue::Excellent, 0)])
                .unwrap();

            let contents = fs::read_to_string(&path).unwrap();
            assert!(contents.starts_with(existing));
            assert_eq!(contents.lines().count(), 3);
        }

        #[test]
        fn unterminated_last_row_is_not_merged() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("results.csv");
            // an interrupted write or a hand-edited file can lose the final newline
            let existing = "user_id,review_id,rating,comment,timestamp\n\
                            carol,P9/human,2,,2024-01-01T00:00:00Z";
            fs::write(&path, existing).unwrap();

            let store = CsvResultStore::new(&path);
            store
                .append(&[
                    record("alice", "P1/human", RatingValue::Excellent, 0),
                    record("alice", "P2/human", RatingValue::Good, 0),
                ])
                .unwrap();

            let contents = fs::read_to_string(&path).unwrap();
            assert!(contents.starts_with(existing));
            assert_eq!(contents.lines().count(), 4);
            assert_eq!(contents.matches("user_id").count(), 1);

            let rows = store.read_all().unwrap();
            let users: Vec<&str> = rows.iter().map(|r| r.user_id.as_str()).collect();
            assert_eq!(users, vec!["carol", "alice", "alice"]);
            assert_eq!(rows[0].review_id, "P9/human");
            assert_eq!(store.progress("alice").unwrap(), 2);
            assert_eq!(store.progress("carol").unwrap(), 1);
        }

        #[test]
        fn unwritable_path_reports_storage_error() {
            let dir = tempfile::tempdir().unwrap();
            let blocker = dir.path().join("not-a-dir");
            fs::write(&blocker, "").unwrap();

            let store = CsvResultStore::new(blocker.join("results.csv"));
            let err = store
                .append(&[record("alice", "P1/human", RatingValue::Good, 0)])
                .unwrap_err();
            assert!(matches!(err, StoreError::StorageWrite { .. }));
        }

        #[test]
        fn missing_file_reads_as_empty() {
            let dir = tempfile::tempdir().unwrap();
            let store = CsvResultStore::new(dir.path().join("nothing-yet.csv"));
            assert!(store.read_all().unwrap().is_empty());
            assert_eq!(store.progress("alice").unwrap(), 0);
        }

        #[test]
        fn progress_ignores_duplicated_rows() {
            let dir = tempfile::tempdir().unwrap();
            let store = CsvResultStore::new(dir.path().join("results.csv"));
            let batch = vec![
                record("alice", "P1/human", RatingValue::Good, 0),
                record("alice", "P2/human", RatingValue::Fair, 0),
                record("bob", "P1/human", RatingValue::Poor, 0),
            ];
            store.append(&batch).unwrap();
            // a crash-and-retry leaves the same rows twice
            store.append(&batch[..2]).unwrap();

            assert_eq!(store.read_all().unwrap().len(), 5);
            assert_eq!(store.progress("alice").unwrap(), 2);
            assert_eq!(store.progress("bob").unwrap(), 1);
            assert_eq!(store.progress("dave").unwrap(), 0);
        }

        #[test]
        fn comments_survive_a_read_back() {
            let dir = tempfile::tempdir().unwrap();
            let store = CsvResultStore::new(dir.path().join("results.csv"));
            let mut row = record("alice", "P1/human", RatingValue::VeryGood, 0);
            row.comment = "quotes \"and\", commas\nand newlines".into();
            store.append(&[row.clone()]).unwrap();

            assert_eq!(store.read_all().unwrap(), vec![row]);
        }
    }

    /// Append-only CSV log of submissions.
    ///
    /// The header is written only when the file is new or empty. Each call
    /// encodes all rows up front and hands them to the OS in a single write,
    /// so concurrent writers can interleave whole batches but not split rows.
    #[derive(Debug, Clone)]
    pub struct CsvResultStore {
        path: PathBuf,
    }

    impl CsvResultStore {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        fn write_error(&self, source: std::io::Error) -> StoreError {
            StoreError::StorageWrite {
                path: self.path.clone(),
                source,
            }
        }

        fn encode(records: &[SubmissionRecord], with_header: bool) -> Result<Vec<u8>, StoreError> {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(with_header)
                .from_writer(Vec::new());
            for record in records {
                writer.serialize(record)?;
            }
            writer
                .into_inner()
                .map_err(|e| StoreError::Encode(e.into_error().into()))
        }

        fn ends_with_newline(file: &mut File) -> std::io::Result<bool> {
            let mut last = [0u8; 1];
            file.seek(SeekFrom::End(-1))?;
            file.read_exact(&mut last)?;
            Ok(last[0] == b'\n')
        }

        /// Every row currently in the file, in file order.
        pub fn read_all(&self) -> Result<Vec<SubmissionRecord>, StoreError> {
            if !self.path.exists() {
                return Ok(Vec::new());
            }
            let read_error = |source| StoreError::Read {
                path: self.path.clone(),
                source,
            };
            let mut reader = csv::Reader::from_path(&self.path).map_err(read_error)?;
            let records = reader
                .deserialize()
                .collect::<Result<Vec<SubmissionRecord>, _>>()
                .map_err(read_error)?;
            Ok(records)
        }

        /// Number of ratings already stored for `user_id`, counting rows that
        /// share (user, review, timestamp) once.
        pub fn progress(&self, user_id: &str) -> Result<usize, StoreError> {
            let distinct: HashSet<(String, chrono::DateTime<chrono::Utc>)> = self
                .read_all()?
                .into_iter()
                .filter(|record| record.user_id == user_id)
                .map(|record| (record.review_id, record.timestamp))
                .collect();
            Ok(distinct.len())
        }
    }

    impl ResultStore for CsvResultStore {
        fn append(&self, records: &[SubmissionRecord]) -> Result<(), StoreError> {
            if records.is_empty() {
                return Ok(());
            }

            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| self.write_error(e))?;
            }

            let mut file = OpenOptions::new()
                .read(true)
                .create(true)
                .append(true)
                .open(&self.path)
                .map_err(|e| self.write_error(e))?;
            let is_new = file.metadata().map_err(|e| self.write_error(e))?.len() == 0;

            // Rows must start on a fresh line even if the last write was cut short.
            let mut payload = Vec::new();
            if !is_new && !Self::ends_with_newline(&mut file).map_err(|e| self.write_error(e))? {
                payload.push(b'\n');
            }
            payload.extend(Self::encode(records, is_new)?);
            file.write_all(&payload).map_err(|e| self.write_error(e))?;
            file.sync_data().map_err(|e| self.write_error(e))?;

            log!(
                "[STORE] Appended {} rows to {}{}",
                records.len(),
                self.path.display(),
                if is_new { " (new file)" } else { "" }
            );
            Ok(())
        }
    }
}

#[cfg(feature = "ssr")]
pub use csv_impl::CsvResultStore;

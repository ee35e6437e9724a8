// Snapshot import and export

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate, Utc};
use walkdir::WalkDir;

use super::Store;
use crate::constants::SAMPLE_SNAPSHOT_FILENAME;
use crate::error::{Result, ViralError};
use crate::ranking::snapshot::{day_offset_digits, read_raw_videos, snapshot_date, write_json};
use crate::video::normalize_videos;

/// Per-file outcome of a directory import
#[derive(Debug, Clone)]
pub struct ImportedFile {
    pub path: PathBuf,
    /// None when the file name carries an offset that cannot be dated
    pub date: Option<NaiveDate>,
    pub imported: usize,
}

/// Import a snapshot file, dating it relative to the local calendar day
pub fn import_from_file(store: &Store, path: &Path) -> Result<usize> {
    import_from_file_as_of(store, path, Local::now().date_naive())
}

/// Import a snapshot file as its day's ranking.
/// A missing, malformed, or undatable file imports 0 records; store failures are returned.
pub fn import_from_file_as_of(store: &Store, path: &Path, today: NaiveDate) -> Result<usize> {
    let date = match snapshot_date(path, today) {
        Ok(date) => date,
        Err(e) => {
            log::warn!("Skipping import of {}: {}", path.display(), e);
            return Ok(0);
        }
    };

    let raw = match read_raw_videos(path) {
        Ok(raw) => raw,
        Err(e @ ViralError::MalformedImport { .. }) => {
            log::warn!("Skipping import: {}", e);
            return Ok(0);
        }
        Err(e) => return Err(e),
    };

    let videos = normalize_videos(&raw, &Utc::now().to_rfc3339());
    store.replace_daily_ranking(date, &videos)?;

    log::info!("Imported {} videos from {} for {}", videos.len(), path.display(), date);
    Ok(videos.len())
}

/// Snapshot files in `data_dir`, in import order: the sample mirror first,
/// then `videos-<n>.json` by name
pub fn snapshot_files(data_dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    let sample = data_dir.join(SAMPLE_SNAPSHOT_FILENAME);
    if sample.is_file() {
        files.push(sample);
    }

    let mut daily: Vec<PathBuf> = WalkDir::new(data_dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.file_name().to_str().and_then(day_offset_digits).is_some())
        .map(|e| e.into_path())
        .collect();
    daily.sort();
    files.extend(daily);

    files
}

/// Import every snapshot file in a directory. One bad file never stops the loop.
pub fn import_directory(store: &Store, data_dir: &Path, today: NaiveDate) -> Result<Vec<ImportedFile>> {
    let mut results = Vec::new();

    for path in snapshot_files(data_dir) {
        let imported = import_from_file_as_of(store, &path, today)?;
        results.push(ImportedFile {
            date: snapshot_date(&path, today).ok(),
            path,
            imported,
        });
    }

    Ok(results)
}

/// Write the full stored ranking for `date` to a JSON file. Returns the number of videos written.
pub fn export_ranking(store: &Store, date: NaiveDate, output: &Path) -> Result<usize> {
    let ranked = store.query_ranking(date, i64::MAX, None)?;
    write_json(output, &ranked)?;
    Ok(ranked.len())
}

// Data directory file layout
// Per-platform viral files, daily snapshot files, and their JSON encoding.

use std::path::{Path, PathBuf};

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::constants::{
    ALL_VIDEOS_PREFIX, ALL_VIDEOS_SUFFIX, SAMPLE_SNAPSHOT_FILENAME, SNAPSHOT_PREFIX,
    TOP_VIRAL_PREFIX, TOP_VIRAL_SUFFIX,
};
use crate::error::{Result, ViralError};
use crate::video::{NormalizedVideo, Platform, RawVideo};

/// `top_<platform>_viral_videos.json`
pub fn top_viral_path(data_dir: &Path, platform: Platform) -> PathBuf {
    data_dir.join(format!("{}{}{}", TOP_VIRAL_PREFIX, platform, TOP_VIRAL_SUFFIX))
}

/// `all_<platform>_videos.json`
pub fn all_videos_path(data_dir: &Path, platform: Platform) -> PathBuf {
    data_dir.join(format!("{}{}{}", ALL_VIDEOS_PREFIX, platform, ALL_VIDEOS_SUFFIX))
}

/// `videos-<dayOffset>.json`
pub fn snapshot_path(data_dir: &Path, day_offset: u32) -> PathBuf {
    data_dir.join(format!("{}{}.json", SNAPSHOT_PREFIX, day_offset))
}

/// Digits of a `videos-<n>.json` file name, if the name follows the pattern
pub fn day_offset_digits(file_name: &str) -> Option<&str> {
    let re = regex::Regex::new(r"^videos-(\d+)\.json$").ok()?;
    let caps = re.captures(file_name)?;
    Some(caps.get(1)?.as_str())
}

/// Day offset embedded in a snapshot file name, if it follows the pattern and fits
pub fn parse_day_offset(file_name: &str) -> Option<u32> {
    day_offset_digits(file_name)?.parse().ok()
}

/// Calendar date `day_offset` days before `today`; None past chrono's range
pub fn date_for_offset(today: NaiveDate, day_offset: u32) -> Option<NaiveDate> {
    today.checked_sub_days(Days::new(u64::from(day_offset)))
}

/// Ranking date for a snapshot file: its day offset before `today`, or `today`
/// when the name carries no offset. An offset that cannot be dated is an error.
pub fn snapshot_date(path: &Path, today: NaiveDate) -> Result<NaiveDate> {
    let digits = match path.file_name().and_then(|n| n.to_str()).and_then(day_offset_digits) {
        Some(digits) => digits,
        None => return Ok(today),
    };

    digits
        .parse::<u32>()
        .ok()
        .and_then(|offset| date_for_offset(today, offset))
        .ok_or_else(|| ViralError::InvalidDate(format!("day offset {} before {} is out of range", digits, today)))
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, data: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(path, json)?;
    log::debug!("Data saved to {}", path.display());
    Ok(())
}

/// Read a JSON array of raw records. Anything else is a malformed import.
pub fn read_raw_videos(path: &Path) -> Result<Vec<RawVideo>> {
    let malformed = |reason: String| ViralError::MalformedImport {
        path: path.display().to_string(),
        reason,
    };

    let content = std::fs::read_to_string(path).map_err(|e| malformed(e.to_string()))?;
    let value: serde_json::Value = serde_json::from_str(&content).map_err(|e| malformed(e.to_string()))?;

    if !value.is_array() {
        return Err(malformed("does not contain a list of videos".to_string()));
    }

    serde_json::from_value(value).map_err(|e| malformed(e.to_string()))
}

/// Write the daily snapshot. Offset 0 is mirrored to `sample-videos.json`.
pub fn write_snapshot(data_dir: &Path, day_offset: u32, videos: &[NormalizedVideo]) -> Result<PathBuf> {
    let path = snapshot_path(data_dir, day_offset);
    write_json(&path, videos)?;

    if day_offset == 0 {
        write_json(&data_dir.join(SAMPLE_SNAPSHOT_FILENAME), videos)?;
    }

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_day_offset() {
        assert_eq!(parse_day_offset("videos-0.json"), Some(0));
        assert_eq!(parse_day_offset("videos-12.json"), Some(12));
        assert_eq!(parse_day_offset("videos-.json"), None);
        assert_eq!(parse_day_offset("videos-x.json"), None);
        assert_eq!(parse_day_offset("sample-videos.json"), None);
    }

    #[test]
    fn test_snapshot_date_counts_back_from_today() {
        let today = day(2026, 3, 1);
        assert_eq!(snapshot_date(Path::new("/data/videos-2.json"), today).unwrap(), day(2026, 2, 27));
        assert_eq!(snapshot_date(Path::new("videos-0.json"), today).unwrap(), today);
        assert_eq!(snapshot_date(Path::new("sample-videos.json"), today).unwrap(), today);
        assert_eq!(snapshot_date(Path::new("export.json"), today).unwrap(), today);
    }

    #[test]
    fn test_out_of_range_offset_is_not_today() {
        let today = day(2026, 10, 17);
        assert_eq!(date_for_offset(today, u32::MAX), None);

        for name in ["videos-4000000000.json", "videos-99999999999999999999.json"] {
            assert!(matches!(
                snapshot_date(Path::new(name), today),
                Err(ViralError::InvalidDate(_))
            ));
        }
        assert_eq!(parse_day_offset("videos-99999999999999999999.json"), None);
        assert!(day_offset_digits("videos-99999999999999999999.json").is_some());
    }

    #[test]
    fn test_platform_file_names() {
        let dir = Path::new("/data");
        assert_eq!(top_viral_path(dir, Platform::TikTok), dir.join("top_tiktok_viral_videos.json"));
        assert_eq!(all_videos_path(dir, Platform::YouTube), dir.join("all_youtube_videos.json"));
    }

    #[test]
    fn test_read_raw_videos_rejects_non_lists() {
        let tmp = TempDir::new().unwrap();
        let object = tmp.path().join("object.json");
        let broken = tmp.path().join("broken.json");
        std::fs::write(&object, r#"{"id": "a"}"#).unwrap();
        std::fs::write(&broken, "[{").unwrap();

        for path in [&object, &broken, &tmp.path().join("missing.json")] {
            assert!(matches!(read_raw_videos(path), Err(ViralError::MalformedImport { .. })));
        }
    }

    #[test]
    fn test_write_snapshot_mirrors_today() {
        let tmp = TempDir::new().unwrap();
        write_snapshot(tmp.path(), 0, &[]).unwrap();
        write_snapshot(tmp.path(), 3, &[]).unwrap();

        assert!(tmp.path().join("videos-0.json").exists());
        assert!(tmp.path().join("videos-3.json").exists());
        assert!(tmp.path().join(SAMPLE_SNAPSHOT_FILENAME).exists());
    }
}

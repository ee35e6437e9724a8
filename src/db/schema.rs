// Database schema types and query helpers

use std::collections::HashSet;

use chrono::NaiveDate;
use rusqlite::{Connection, params, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::error::{ViralError, Result};
use crate::video::{NormalizedVideo, Platform, Profile};

/// Storage format for ranking dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| ViralError::InvalidDate(s.to_string()))
}

// ----- Profile -----

pub fn upsert_profile(conn: &Connection, profile: &Profile) -> Result<()> {
    conn.execute(
        "INSERT INTO profiles (id, platform, name, url, follower_count, last_updated)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(id) DO UPDATE SET
            platform = excluded.platform,
            name = excluded.name,
            url = excluded.url,
            follower_count = excluded.follower_count,
            last_updated = excluded.last_updated",
        params![
            profile.id,
            profile.platform.as_str(),
            profile.name,
            profile.url,
            profile.follower_count,
            profile.last_updated,
        ],
    )?;
    Ok(())
}

pub fn get_profile(conn: &Connection, id: &str) -> Result<Option<Profile>> {
    let result = conn.query_row(
        "SELECT id, platform, name, url, follower_count, last_updated FROM profiles WHERE id = ?1",
        params![id],
        |row| {
            let platform: String = row.get(1)?;
            Ok(Profile {
                id: row.get(0)?,
                platform: Platform::parse(&platform),
                name: row.get(2)?,
                url: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                follower_count: row.get::<_, Option<i64>>(4)?.unwrap_or(0),
                last_updated: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
            })
        },
    ).optional()?;
    Ok(result)
}

// ----- Video -----

/// A row of the videos table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredVideo {
    pub id: String,
    pub platform: Platform,
    pub profile_id: String,
    pub title: String,
    pub url: String,
    pub thumbnail: String,
    pub views: i64,
    pub performance_ratio: f64,
    pub post_date: String,
    pub collection_date: String,
}

const VIDEO_COLUMNS: &str =
    "v.id, v.platform, v.profile_id, v.title, v.url, v.thumbnail, v.views, v.performance_ratio, v.post_date, v.collection_date";

/// Map a row starting at `offset` onto a StoredVideo
fn video_from_row(row: &Row, offset: usize) -> rusqlite::Result<StoredVideo> {
    let platform: String = row.get(offset + 1)?;
    Ok(StoredVideo {
        id: row.get(offset)?,
        platform: Platform::parse(&platform),
        profile_id: row.get(offset + 2)?,
        title: row.get(offset + 3)?,
        url: row.get(offset + 4)?,
        thumbnail: row.get::<_, Option<String>>(offset + 5)?.unwrap_or_default(),
        views: row.get(offset + 6)?,
        performance_ratio: row.get(offset + 7)?,
        post_date: row.get(offset + 8)?,
        collection_date: row.get(offset + 9)?,
    })
}

/// Insert or fully overwrite a video. `collected_at` is the ingestion stamp.
pub fn upsert_video(conn: &Connection, video: &NormalizedVideo, collected_at: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO videos (id, platform, profile_id, title, url, thumbnail, views,
                             performance_ratio, post_date, collection_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
         ON CONFLICT(id) DO UPDATE SET
            platform = excluded.platform,
            profile_id = excluded.profile_id,
            title = excluded.title,
            url = excluded.url,
            thumbnail = excluded.thumbnail,
            views = excluded.views,
            performance_ratio = excluded.performance_ratio,
            post_date = excluded.post_date,
            collection_date = excluded.collection_date",
        params![
            video.id,
            video.platform.as_str(),
            video.creator,
            video.title,
            video.url,
            video.thumbnail,
            video.views.min(i64::MAX as u64) as i64,
            video.performance_ratio,
            video.post_date,
            collected_at,
        ],
    )?;
    Ok(())
}

pub fn get_video(conn: &Connection, id: &str) -> Result<Option<StoredVideo>> {
    let sql = format!("SELECT {} FROM videos v WHERE v.id = ?1", VIDEO_COLUMNS);
    let result = conn.query_row(&sql, params![id], |row| video_from_row(row, 0)).optional()?;
    Ok(result)
}

pub fn count_videos(conn: &Connection) -> Result<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM videos", [], |row| row.get(0))?;
    Ok(count)
}

// ----- Daily ranking -----

/// A stored video with its rank on one date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedVideo {
    pub rank: i64,
    #[serde(flatten)]
    pub video: StoredVideo,
}

/// Replace the ranking for `date` with `videos` in order (rank = position, from 1).
/// Each ranked video is upserted as it is ranked. All-or-nothing: on error the previous ranking stays.
/// A repeated id keeps its first position and its first record so ranks stay contiguous.
pub fn replace_daily_ranking(
    conn: &Connection,
    date: NaiveDate,
    videos: &[NormalizedVideo],
    collected_at: &str,
) -> Result<usize> {
    let date_str = format_date(date);
    let tx = conn.unchecked_transaction()?;

    tx.execute("DELETE FROM daily_rankings WHERE date = ?1", params![date_str])?;

    let mut seen = HashSet::new();
    let mut rank: i64 = 0;
    for video in videos {
        if !seen.insert(video.id.as_str()) {
            log::warn!("Duplicate video {} in ranking for {}, keeping first position", video.id, date_str);
            continue;
        }
        upsert_video(&tx, video, collected_at)?;
        rank += 1;
        tx.execute(
            "INSERT INTO daily_rankings (date, video_id, rank) VALUES (?1, ?2, ?3)",
            params![date_str, video.id, rank],
        )?;
    }

    tx.commit()?;
    Ok(rank as usize)
}

/// Videos ranked on `date`, best first, optionally restricted to one platform.
/// The platform filter applies before the limit.
pub fn query_ranking(
    conn: &Connection,
    date: NaiveDate,
    limit: i64,
    platform: Option<Platform>,
) -> Result<Vec<RankedVideo>> {
    let sql = format!(
        "SELECT d.rank, {}
         FROM daily_rankings d
         JOIN videos v ON v.id = d.video_id
         WHERE d.date = ?1 AND (?2 IS NULL OR v.platform = ?2)
         ORDER BY d.rank ASC
         LIMIT ?3",
        VIDEO_COLUMNS
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        params![format_date(date), platform.map(|p| p.as_str()), limit],
        |row| {
            Ok(RankedVideo {
                rank: row.get(0)?,
                video: video_from_row(row, 1)?,
            })
        },
    )?;

    let mut ranked = Vec::new();
    for row in rows {
        ranked.push(row?);
    }
    Ok(ranked)
}

/// Distinct dates that have a ranking, most recent first
pub fn list_dates_with_data(conn: &Connection, limit: i64) -> Result<Vec<NaiveDate>> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT date FROM daily_rankings ORDER BY date DESC LIMIT ?1",
    )?;
    let rows = stmt.query_map(params![limit], |row| row.get::<_, String>(0))?;

    let mut dates = Vec::new();
    for row in rows {
        dates.push(parse_date(&row?)?);
    }
    Ok(dates)
}

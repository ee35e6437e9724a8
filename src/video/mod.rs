// Video record types
// Raw per-platform records, the JSON wire shape they arrive in, and the canonical record.

pub mod normalize;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

pub use normalize::{normalize_video, normalize_videos};

// ----- Platform -----

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Platform {
    Instagram,
    YouTube,
    TikTok,
    Facebook,
    Unknown,
}

impl Platform {
    /// Platforms with a collector, in pool concatenation order
    pub const COLLECTED: [Platform; 4] = [
        Platform::Instagram,
        Platform::YouTube,
        Platform::TikTok,
        Platform::Facebook,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::YouTube => "youtube",
            Platform::TikTok => "tiktok",
            Platform::Facebook => "facebook",
            Platform::Unknown => "unknown",
        }
    }

    /// Lenient mapping: anything unrecognized becomes `Unknown`
    pub fn parse(s: &str) -> Platform {
        match s.trim().to_ascii_lowercase().as_str() {
            "instagram" => Platform::Instagram,
            "youtube" => Platform::YouTube,
            "tiktok" => Platform::TikTok,
            "facebook" => Platform::Facebook,
            _ => Platform::Unknown,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Platform {
    fn from(s: String) -> Self {
        Platform::parse(&s)
    }
}

/// Strict parse for user input (CLI filters)
impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match Platform::parse(s) {
            Platform::Unknown if !s.eq_ignore_ascii_case("unknown") => {
                Err(format!("unknown platform '{}'", s))
            }
            p => Ok(p),
        }
    }
}

// ----- Wire record -----

/// Flat JSON shape shared by every platform's files. Every field is optional;
/// unrecognized fields (likes, comments, duration, ...) are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(default, deserialize_with = "string_or_number", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub views: Option<i64>,
    #[serde(default, alias = "performanceRatio", skip_serializing_if = "Option::is_none")]
    pub performance_ratio: Option<f64>,
    #[serde(default, alias = "postDate", skip_serializing_if = "Option::is_none")]
    pub post_date: Option<String>,
    #[serde(default, rename = "videoId", skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,

    // Creator keys, one per platform
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
}

impl RawRecord {
    /// First creator key present, in platform order, then the canonical `creator`
    pub fn creator_key(&self) -> Option<String> {
        [&self.profile, &self.channel_id, &self.username, &self.page_id, &self.creator]
            .into_iter()
            .find_map(|k| k.clone())
    }
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_count<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|v| v.min(i64::MAX as u64) as i64))
            .or_else(|| n.as_f64().map(|v| v as i64)),
        Some(serde_json::Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    })
}

// ----- Raw video (tagged by platform) -----

/// Platform-specific part of a raw record: each variant carries only its own creator key
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformSource {
    Instagram { profile: Option<String> },
    YouTube { channel_id: Option<String>, video_id: Option<String> },
    TikTok { username: Option<String> },
    Facebook { page_id: Option<String> },
    Unknown { creator: Option<String> },
}

/// A video as delivered by one platform's collector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawRecord", into = "RawRecord")]
pub struct RawVideo {
    pub id: String,
    pub title: Option<String>,
    pub url: Option<String>,
    pub thumbnail: Option<String>,
    pub views: u64,
    pub performance_ratio: Option<f64>,
    pub post_date: Option<String>,
    pub source: PlatformSource,
}

impl RawVideo {
    pub fn platform(&self) -> Platform {
        match self.source {
            PlatformSource::Instagram { .. } => Platform::Instagram,
            PlatformSource::YouTube { .. } => Platform::YouTube,
            PlatformSource::TikTok { .. } => Platform::TikTok,
            PlatformSource::Facebook { .. } => Platform::Facebook,
            PlatformSource::Unknown { .. } => Platform::Unknown,
        }
    }

    /// Minimal record for tests and synthetic collectors
    pub fn new(id: impl Into<String>, source: PlatformSource, views: u64) -> Self {
        Self {
            id: id.into(),
            title: None,
            url: None,
            thumbnail: None,
            views,
            performance_ratio: None,
            post_date: None,
            source,
        }
    }
}

impl From<RawRecord> for RawVideo {
    fn from(record: RawRecord) -> Self {
        let platform = record
            .platform
            .as_deref()
            .map(Platform::parse)
            .unwrap_or(Platform::Unknown);
        let creator = record.creator_key();

        let source = match platform {
            Platform::Instagram => PlatformSource::Instagram { profile: creator },
            Platform::YouTube => PlatformSource::YouTube {
                channel_id: creator,
                video_id: record.video_id,
            },
            Platform::TikTok => PlatformSource::TikTok { username: creator },
            Platform::Facebook => PlatformSource::Facebook { page_id: creator },
            Platform::Unknown => PlatformSource::Unknown { creator },
        };

        RawVideo {
            id: record.id.unwrap_or_default(),
            title: record.title,
            url: record.url,
            thumbnail: record.thumbnail,
            // Negative counts are clamped at the boundary
            views: record.views.unwrap_or(0).max(0) as u64,
            performance_ratio: record.performance_ratio,
            post_date: record.post_date,
            source,
        }
    }
}

impl From<RawVideo> for RawRecord {
    fn from(video: RawVideo) -> Self {
        let platform = video.platform();
        let mut record = RawRecord {
            id: Some(video.id),
            platform: Some(platform.as_str().to_string()),
            title: video.title,
            url: video.url,
            thumbnail: video.thumbnail,
            views: Some(video.views.min(i64::MAX as u64) as i64),
            performance_ratio: video.performance_ratio,
            post_date: video.post_date,
            ..RawRecord::default()
        };

        match video.source {
            PlatformSource::Instagram { profile } => record.profile = profile,
            PlatformSource::YouTube { channel_id, video_id } => {
                record.channel_id = channel_id;
                record.video_id = video_id;
            }
            PlatformSource::TikTok { username } => record.username = username,
            PlatformSource::Facebook { page_id } => record.page_id = page_id,
            PlatformSource::Unknown { creator } => record.creator = creator,
        }

        record
    }
}

// ----- Canonical video -----

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedVideo {
    pub id: String,
    pub platform: Platform,
    pub creator: String,
    pub title: String,
    pub url: String,
    pub thumbnail: String,
    pub views: u64,
    pub performance_ratio: f64,
    pub post_date: String,
    /// YouTube embed id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
}

// ----- Profile -----

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub platform: Platform,
    pub name: String,
    pub url: String,
    pub follower_count: i64,
    pub last_updated: String,
}

// Cross-platform normalization
// Pure mapping from raw per-platform records to the canonical record. No I/O.

use super::{NormalizedVideo, PlatformSource, RawVideo};
use crate::constants::{DEFAULT_PERFORMANCE_RATIO, UNKNOWN_CREATOR, UNTITLED_VIDEO};

/// Normalize one record. `sequence` is its position in the batch and only
/// matters for records that arrive without an id.
pub fn normalize_video(sequence: usize, raw: &RawVideo, ingested_at: &str) -> NormalizedVideo {
    let platform = raw.platform();

    let id = if raw.id.trim().is_empty() {
        format!("{}-anon-{}", platform, sequence)
    } else {
        raw.id.clone()
    };

    let (creator, video_id) = match &raw.source {
        PlatformSource::Instagram { profile } => (profile.clone(), None),
        PlatformSource::YouTube { channel_id, video_id } => (
            channel_id.clone(),
            Some(video_id.clone().unwrap_or_else(|| id.clone())),
        ),
        PlatformSource::TikTok { username } => (username.clone(), None),
        PlatformSource::Facebook { page_id } => (page_id.clone(), None),
        PlatformSource::Unknown { creator } => (creator.clone(), None),
    };

    NormalizedVideo {
        id,
        platform,
        creator: creator.unwrap_or_else(|| UNKNOWN_CREATOR.to_string()),
        title: raw.title.clone().unwrap_or_else(|| UNTITLED_VIDEO.to_string()),
        url: raw.url.clone().unwrap_or_default(),
        thumbnail: raw.thumbnail.clone().unwrap_or_default(),
        views: raw.views,
        // f64::max also maps NaN to 0
        performance_ratio: raw.performance_ratio.unwrap_or(DEFAULT_PERFORMANCE_RATIO).max(0.0),
        post_date: raw.post_date.clone().unwrap_or_else(|| ingested_at.to_string()),
        video_id,
    }
}

/// Normalize a batch 1:1, preserving order
pub fn normalize_videos(raw: &[RawVideo], ingested_at: &str) -> Vec<NormalizedVideo> {
    raw.iter()
        .enumerate()
        .map(|(seq, video)| normalize_video(seq, video, ingested_at))
        .collect()
}

// Per-platform collection
// Collectors supply raw videos and profiles; this module reduces them to each platform's viral file.

pub mod sample;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::error::{Result, ViralError};
use crate::ranking::snapshot::{all_videos_path, top_viral_path, write_json};
use crate::scoring::{identify_viral, sort_by_ratio_desc};
use crate::video::{Platform, Profile, RawVideo};

/// Source of one platform's videos and creator profiles.
/// Returning an empty list is the normal "no data" answer; errors are for real failures.
pub trait Collector {
    fn platform(&self) -> Platform;

    fn fetch_videos(&self) -> Result<Vec<RawVideo>>;

    fn fetch_profiles(&self) -> Result<Vec<Profile>> {
        Ok(Vec::new())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionReport {
    pub platform: Platform,
    pub total_videos: usize,
    pub top_viral: Vec<RawVideo>,
    pub profiles: Vec<Profile>,
}

/// Reduce one platform's cohort to its top viral videos, best first
pub fn viral_subset(mut videos: Vec<RawVideo>, min_ratio: f64, top_count: usize) -> Vec<RawVideo> {
    videos.sort_by(|a, b| b.views.cmp(&a.views));

    let mut viral = identify_viral(&videos, min_ratio);
    sort_by_ratio_desc(&mut viral);
    viral.truncate(top_count);
    viral
}

/// Run one collector and write `all_<platform>_videos.json` and
/// `top_<platform>_viral_videos.json` into `data_dir`
pub fn collect_platform(collector: &dyn Collector, data_dir: &Path, settings: &Settings) -> Result<CollectionReport> {
    let platform = collector.platform();

    let profiles = match collector.fetch_profiles() {
        Ok(profiles) => profiles,
        Err(e) => {
            log::warn!("Profile collection failed for {}: {}", platform, e);
            Vec::new()
        }
    };

    let mut videos = collector.fetch_videos().map_err(|e| ViralError::CollectorUnavailable {
        platform,
        reason: e.to_string(),
    })?;
    videos.sort_by(|a, b| b.views.cmp(&a.views));
    write_json(&all_videos_path(data_dir, platform), &videos)?;

    let total_videos = videos.len();
    let top_viral = viral_subset(videos, settings.min_ratio, settings.platform_top_count);
    write_json(&top_viral_path(data_dir, platform), &top_viral)?;

    log::info!(
        "Collected {} {} videos, {} viral, {} profiles",
        total_videos,
        platform,
        top_viral.len(),
        profiles.len()
    );

    Ok(CollectionReport {
        platform,
        total_videos,
        top_viral,
        profiles,
    })
}

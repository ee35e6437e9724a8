// Ranking Pipeline
// Per-platform viral subsets -> pool -> normalize -> re-filter -> rank -> snapshot + store

pub mod snapshot;

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::collect::sample::generate_sample_ranking;
use crate::collect::{viral_subset, Collector};
use crate::config::Settings;
use crate::db::Store;
use crate::error::{Result, ViralError};
use crate::scoring::select_top_viral;
use crate::video::{normalize_videos, NormalizedVideo, Platform, RawVideo};

/// Where one platform's viral subset comes from
pub trait ViralSource {
    fn platform(&self) -> Platform;

    fn viral_videos(&self) -> Result<Vec<RawVideo>>;
}

/// A previously written `top_<platform>_viral_videos.json`
pub struct FileSource {
    pub platform: Platform,
    pub path: PathBuf,
}

impl FileSource {
    pub fn in_dir(data_dir: &Path, platform: Platform) -> Self {
        Self {
            platform,
            path: snapshot::top_viral_path(data_dir, platform),
        }
    }

    /// File sources for every collected platform, in pool order
    pub fn all_in_dir(data_dir: &Path) -> Vec<FileSource> {
        Platform::COLLECTED
            .iter()
            .map(|&platform| FileSource::in_dir(data_dir, platform))
            .collect()
    }
}

impl ViralSource for FileSource {
    fn platform(&self) -> Platform {
        self.platform
    }

    fn viral_videos(&self) -> Result<Vec<RawVideo>> {
        snapshot::read_raw_videos(&self.path).map_err(|e| ViralError::CollectorUnavailable {
            platform: self.platform,
            reason: e.to_string(),
        })
    }
}

/// A live collector, reduced to its viral subset in memory
pub struct CollectorSource<'a> {
    pub collector: &'a dyn Collector,
    pub min_ratio: f64,
    pub top_count: usize,
}

impl ViralSource for CollectorSource<'_> {
    fn platform(&self) -> Platform {
        self.collector.platform()
    }

    fn viral_videos(&self) -> Result<Vec<RawVideo>> {
        let videos = self.collector.fetch_videos()?;
        Ok(viral_subset(videos, self.min_ratio, self.top_count))
    }
}

#[derive(Debug, Clone)]
pub struct RankingOptions {
    pub min_ratio: f64,
    pub count: usize,
    pub day_offset: u32,
    /// Reference day; the ranking is stored for `today - day_offset`
    pub today: NaiveDate,
    pub generate_samples: bool,
    pub sample_count: usize,
    pub sample_seed: Option<u64>,
    pub data_dir: PathBuf,
}

impl RankingOptions {
    pub fn from_settings(settings: &Settings, data_dir: &Path) -> Self {
        Self {
            min_ratio: settings.min_ratio,
            count: settings.top_count,
            day_offset: 0,
            today: Local::now().date_naive(),
            generate_samples: settings.generate_samples,
            sample_count: settings.sample_count,
            sample_seed: None,
            data_dir: data_dir.to_path_buf(),
        }
    }

    /// `today - day_offset`; an offset past the calendar's range is an error
    pub fn target_date(&self) -> Result<NaiveDate> {
        snapshot::date_for_offset(self.today, self.day_offset).ok_or_else(|| {
            ViralError::InvalidDate(format!("{} days before {} is out of range", self.day_offset, self.today))
        })
    }
}

/// Result of a ranking run. An empty run is an outcome, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum RankingOutcome {
    Ranked(Vec<NormalizedVideo>),
    /// No viral videos anywhere and samples were not requested
    Empty,
    /// No source had data; synthetic videos were generated on request
    Sampled(Vec<NormalizedVideo>),
}

impl RankingOutcome {
    pub fn videos(&self) -> &[NormalizedVideo] {
        match self {
            RankingOutcome::Ranked(videos) | RankingOutcome::Sampled(videos) => videos,
            RankingOutcome::Empty => &[],
        }
    }
}

/// Concatenate every source's viral subset in source order.
/// A failing source is logged and contributes nothing.
pub fn gather_viral_pool(sources: &[&dyn ViralSource]) -> Vec<RawVideo> {
    let mut pool = Vec::new();

    for source in sources {
        match source.viral_videos() {
            Ok(videos) => {
                log::info!("Loaded {} viral videos from {}", videos.len(), source.platform());
                pool.extend(videos);
            }
            Err(e) => {
                log::warn!("No viral videos from {}: {}", source.platform(), e);
            }
        }
    }

    pool
}

/// Normalize the pool and select the top `count` by carried-over ratio.
/// Ratios are not re-averaged across platforms.
pub fn rank_pool(pool: &[RawVideo], min_ratio: f64, count: usize, ingested_at: DateTime<Utc>) -> Vec<NormalizedVideo> {
    let normalized = normalize_videos(pool, &ingested_at.to_rfc3339());
    select_top_viral(&normalized, count, min_ratio)
}

/// Run the daily ranking: gather, rank, write the snapshot file, replace the stored ranking
pub fn run_ranking(store: &Store, sources: &[&dyn ViralSource], options: &RankingOptions) -> Result<RankingOutcome> {
    let date = options.target_date()?;
    let now = Utc::now();
    let pool = gather_viral_pool(sources);

    let outcome = if pool.is_empty() {
        if options.generate_samples {
            log::warn!("No real data available, generating {} sample videos", options.sample_count);
            let mut rng = match options.sample_seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            RankingOutcome::Sampled(generate_sample_ranking(&mut rng, options.sample_count, now))
        } else {
            RankingOutcome::Empty
        }
    } else {
        let top = rank_pool(&pool, options.min_ratio, options.count, now);
        if top.is_empty() {
            RankingOutcome::Empty
        } else {
            RankingOutcome::Ranked(top)
        }
    };

    if matches!(outcome, RankingOutcome::Empty) {
        log::warn!("No viral videos found across {} sources", sources.len());
        return Ok(outcome);
    }

    let videos = outcome.videos();
    let path = snapshot::write_snapshot(&options.data_dir, options.day_offset, videos)?;
    let ranked = store.replace_daily_ranking(date, videos)?;

    log::info!("Stored {} ranked videos for {} ({})", ranked, date, path.display());
    Ok(outcome)
}

// Scoring Engine
// Cohort averages, performance ratios, and viral selection


use std::cmp::Ordering;

use crate::video::{NormalizedVideo, RawVideo};

/// Average view count of a cohort. An empty cohort averages to 0.
pub fn average_views(videos: &[RawVideo]) -> f64 {
    if videos.is_empty() {
        return 0.0;
    }

    let total: f64 = videos.iter().map(|v| v.views as f64).sum();
    total / videos.len() as f64
}

/// Views relative to the cohort average (unrounded, never clamped above)
pub fn performance_ratio(views: u64, average: f64) -> f64 {
    if average > 0.0 {
        views as f64 / average
    } else {
        0.0
    }
}

/// Round a ratio to one decimal place, nearest value with exact ties to even.
/// Decimal formatting rounds the exact binary value, so 2.25 becomes 2.2.
pub fn round_ratio(ratio: f64) -> f64 {
    format!("{:.1}", ratio).parse().unwrap_or(ratio)
}

/// Unrounded ratio of every video against its own cohort, in input order
pub fn score_cohort(videos: &[RawVideo]) -> Vec<f64> {
    let average = average_views(videos);
    videos.iter().map(|v| performance_ratio(v.views, average)).collect()
}

/// Keep the videos at or above `min_ratio`, with their rounded ratio attached.
/// Output stays in input order; sorting is the caller's job.
pub fn identify_viral(videos: &[RawVideo], min_ratio: f64) -> Vec<RawVideo> {
    if videos.is_empty() {
        return Vec::new();
    }

    let average = average_views(videos);
    log::debug!("Cohort of {} videos, average views {:.1}", videos.len(), average);

    videos
        .iter()
        .filter_map(|video| {
            let ratio = performance_ratio(video.views, average);
            if ratio >= min_ratio {
                let mut viral = video.clone();
                viral.performance_ratio = Some(round_ratio(ratio));
                Some(viral)
            } else {
                None
            }
        })
        .collect()
}

/// Stable descending sort of raw videos by attached ratio (missing ratio sorts as 0)
pub fn sort_by_ratio_desc(videos: &mut [RawVideo]) {
    videos.sort_by(|a, b| {
        let ra = a.performance_ratio.unwrap_or(0.0);
        let rb = b.performance_ratio.unwrap_or(0.0);
        rb.total_cmp(&ra)
    });
}

/// A video with its position in the concatenated pool
#[derive(Debug, Clone)]
pub struct Candidate {
    pub sequence: usize,
    pub video: NormalizedVideo,
}

/// Order by ratio descending, then by pool position ascending
fn rank_order(a: &Candidate, b: &Candidate) -> Ordering {
    b.video
        .performance_ratio
        .total_cmp(&a.video.performance_ratio)
        .then(a.sequence.cmp(&b.sequence))
}

/// Filter by `min_ratio`, rank, and take the first `count`.
/// Ties go to the video that appears earlier in `videos`.
pub fn select_top_viral(videos: &[NormalizedVideo], count: usize, min_ratio: f64) -> Vec<NormalizedVideo> {
    let mut candidates: Vec<Candidate> = videos
        .iter()
        .enumerate()
        .filter(|(_, v)| v.performance_ratio >= min_ratio)
        .map(|(sequence, video)| Candidate { sequence, video: video.clone() })
        .collect();

    candidates.sort_by(rank_order);
    candidates.truncate(count);

    candidates.into_iter().map(|c| c.video).collect()
}

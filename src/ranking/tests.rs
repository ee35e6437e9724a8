// Ranking pipeline tests

use super::*;
use crate::ranking::snapshot::{top_viral_path, write_json};
use crate::video::PlatformSource;
use tempfile::TempDir;

struct StaticSource {
    platform: Platform,
    videos: Option<Vec<RawVideo>>,
}

impl ViralSource for StaticSource {
    fn platform(&self) -> Platform {
        self.platform
    }

    fn viral_videos(&self) -> Result<Vec<RawVideo>> {
        self.videos.clone().ok_or_else(|| ViralError::CollectorUnavailable {
            platform: self.platform,
            reason: "offline".to_string(),
        })
    }
}

fn raw(id: &str, platform: Platform, ratio: f64) -> RawVideo {
    let source = match platform {
        Platform::Instagram => PlatformSource::Instagram { profile: Some("ig".to_string()) },
        Platform::YouTube => PlatformSource::YouTube { channel_id: Some("UC".to_string()), video_id: None },
        Platform::TikTok => PlatformSource::TikTok { username: Some("tok".to_string()) },
        Platform::Facebook => PlatformSource::Facebook { page_id: Some("page".to_string()) },
        Platform::Unknown => PlatformSource::Unknown { creator: None },
    };
    let mut video = RawVideo::new(id, source, 50_000);
    video.performance_ratio = Some(ratio);
    video
}

fn source(platform: Platform, videos: Vec<RawVideo>) -> StaticSource {
    StaticSource { platform, videos: Some(videos) }
}

fn options(data_dir: &Path) -> RankingOptions {
    RankingOptions {
        min_ratio: 2.0,
        count: 10,
        day_offset: 0,
        today: NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
        generate_samples: false,
        sample_count: 5,
        sample_seed: Some(11),
        data_dir: data_dir.to_path_buf(),
    }
}

fn ids(videos: &[NormalizedVideo]) -> Vec<&str> {
    videos.iter().map(|v| v.id.as_str()).collect()
}

#[test]
fn test_pool_keeps_source_order_and_skips_failures() {
    let ig = source(Platform::Instagram, vec![raw("i1", Platform::Instagram, 3.0)]);
    let yt = StaticSource { platform: Platform::YouTube, videos: None };
    let tk = source(Platform::TikTok, vec![raw("t1", Platform::TikTok, 5.0), raw("t2", Platform::TikTok, 2.5)]);

    let pool = gather_viral_pool(&[&ig, &yt, &tk]);
    let pool_ids: Vec<&str> = pool.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(pool_ids, vec!["i1", "t1", "t2"]);
}

#[test]
fn test_rank_pool_refilters_and_breaks_ties_by_source_order() {
    let pool = vec![
        raw("ig-tie", Platform::Instagram, 4.0),
        raw("ig-low", Platform::Instagram, 1.2),
        raw("yt-top", Platform::YouTube, 9.5),
        raw("tk-tie", Platform::TikTok, 4.0),
        raw("fb", Platform::Facebook, 2.0),
    ];

    let top = rank_pool(&pool, 2.0, 10, Utc::now());
    assert_eq!(ids(&top), vec!["yt-top", "ig-tie", "tk-tie", "fb"]);

    let top2 = rank_pool(&pool, 2.0, 2, Utc::now());
    assert_eq!(ids(&top2), vec!["yt-top", "ig-tie"]);
}

#[test]
fn test_ratios_are_carried_over_not_recomputed() {
    // Views differ wildly across platforms; only the attached ratios matter
    let mut big = raw("big", Platform::YouTube, 2.1);
    big.views = 9_000_000;
    let mut small = raw("small", Platform::TikTok, 6.0);
    small.views = 800;

    let top = rank_pool(&[big, small], 2.0, 10, Utc::now());
    assert_eq!(ids(&top), vec!["small", "big"]);
    assert_eq!(top[0].performance_ratio, 6.0);
}

#[test]
fn test_run_ranking_persists_snapshot_and_store() {
    let tmp = TempDir::new().unwrap();
    let store = Store::open_in_memory().unwrap();
    let opts = options(tmp.path());

    let yt = source(Platform::YouTube, vec![raw("y1", Platform::YouTube, 3.0)]);
    let fb = source(Platform::Facebook, vec![raw("f1", Platform::Facebook, 7.0)]);

    let outcome = run_ranking(&store, &[&yt, &fb], &opts).unwrap();
    assert!(matches!(outcome, RankingOutcome::Ranked(_)));
    assert_eq!(ids(outcome.videos()), vec!["f1", "y1"]);

    assert!(tmp.path().join("videos-0.json").exists());
    assert!(tmp.path().join("sample-videos.json").exists());

    let stored = store.query_ranking(opts.today, 10, None).unwrap();
    let ranks: Vec<(i64, &str)> = stored.iter().map(|r| (r.rank, r.video.id.as_str())).collect();
    assert_eq!(ranks, vec![(1, "f1"), (2, "y1")]);
    assert_eq!(stored[1].video.profile_id, "UC");
    assert_eq!(store.get_profile("UC").unwrap(), None);
}

#[test]
fn test_run_ranking_uses_day_offset() {
    let tmp = TempDir::new().unwrap();
    let store = Store::open_in_memory().unwrap();
    let opts = RankingOptions { day_offset: 3, ..options(tmp.path()) };

    let tk = source(Platform::TikTok, vec![raw("t1", Platform::TikTok, 3.0)]);
    run_ranking(&store, &[&tk], &opts).unwrap();

    assert!(tmp.path().join("videos-3.json").exists());
    assert!(!tmp.path().join("sample-videos.json").exists());
    assert_eq!(
        store.list_dates_with_data(30).unwrap(),
        vec![NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()]
    );
}

#[test]
fn test_out_of_range_day_offset_fails_before_writing() {
    let tmp = TempDir::new().unwrap();
    let store = Store::open_in_memory().unwrap();
    let opts = RankingOptions { day_offset: u32::MAX, ..options(tmp.path()) };

    let tk = source(Platform::TikTok, vec![raw("t1", Platform::TikTok, 3.0)]);
    let result = run_ranking(&store, &[&tk], &opts);

    assert!(matches!(result, Err(ViralError::InvalidDate(_))));
    assert!(matches!(opts.target_date(), Err(ViralError::InvalidDate(_))));
    assert!(!tmp.path().join(format!("videos-{}.json", u32::MAX)).exists());
    assert!(store.list_dates_with_data(30).unwrap().is_empty());
}

#[test]
fn test_empty_run_is_explicit_and_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    let store = Store::open_in_memory().unwrap();
    let opts = options(tmp.path());

    let down = StaticSource { platform: Platform::Instagram, videos: None };
    let empty = source(Platform::TikTok, Vec::new());

    let outcome = run_ranking(&store, &[&down, &empty], &opts).unwrap();
    assert_eq!(outcome, RankingOutcome::Empty);
    assert!(outcome.videos().is_empty());
    assert!(!tmp.path().join("videos-0.json").exists());
    assert!(store.list_dates_with_data(30).unwrap().is_empty());
}

#[test]
fn test_pool_below_threshold_is_empty_without_samples() {
    let tmp = TempDir::new().unwrap();
    let store = Store::open_in_memory().unwrap();
    let opts = RankingOptions { generate_samples: true, ..options(tmp.path()) };

    let weak = source(Platform::TikTok, vec![raw("t1", Platform::TikTok, 1.1)]);
    assert_eq!(run_ranking(&store, &[&weak], &opts).unwrap(), RankingOutcome::Empty);
}

#[test]
fn test_samples_only_when_requested() {
    let tmp = TempDir::new().unwrap();
    let store = Store::open_in_memory().unwrap();
    let opts = RankingOptions { generate_samples: true, ..options(tmp.path()) };

    let outcome = run_ranking(&store, &[], &opts).unwrap();
    match &outcome {
        RankingOutcome::Sampled(videos) => assert_eq!(videos.len(), 5),
        other => panic!("expected samples, got {:?}", other),
    }
    assert_eq!(store.query_ranking(opts.today, 10, None).unwrap().len(), 5);
}

#[test]
fn test_file_sources_read_platform_files() {
    let tmp = TempDir::new().unwrap();
    write_json(
        &top_viral_path(tmp.path(), Platform::Instagram),
        &vec![raw("i1", Platform::Instagram, 2.5)],
    ).unwrap();
    std::fs::write(top_viral_path(tmp.path(), Platform::TikTok), "{broken").unwrap();

    let sources = FileSource::all_in_dir(tmp.path());
    let refs: Vec<&dyn ViralSource> = sources.iter().map(|s| s as &dyn ViralSource).collect();
    let pool = gather_viral_pool(&refs);

    assert_eq!(pool.len(), 1);
    assert_eq!(pool[0].id, "i1");
    assert!(matches!(
        sources[2].viral_videos(),
        Err(ViralError::CollectorUnavailable { platform: Platform::TikTok, .. })
    ));
}

#[test]
fn test_collector_source_reduces_cohort() {
    use crate::collect::sample::SampleCollector;

    let collector = SampleCollector::new(Platform::YouTube, 3);
    let live = CollectorSource { collector: &collector, min_ratio: 2.0, top_count: 4 };

    let viral = live.viral_videos().unwrap();
    assert!(viral.len() <= 4);
    assert!(viral.iter().all(|v| v.performance_ratio.unwrap_or(0.0) >= 2.0));
}

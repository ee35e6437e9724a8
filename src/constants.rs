// Viral Rank Constants
// Defaults for the ranking pipeline and file layout. Settings can override the pipeline values.

// Scoring
pub const DEFAULT_MIN_RATIO: f64 = 2.0;
pub const DEFAULT_TOP_COUNT: usize = 10;
pub const PLATFORM_TOP_COUNT: usize = 10; // Per-platform viral file size
pub const DEFAULT_PERFORMANCE_RATIO: f64 = 1.0;

// Query defaults
pub const DEFAULT_QUERY_LIMIT: i64 = 10;
pub const DEFAULT_DATES_LIMIT: i64 = 30;

// Placeholders
pub const UNKNOWN_CREATOR: &str = "Unknown Creator";
pub const UNTITLED_VIDEO: &str = "Untitled Video";

// Paths
pub const DATA_FOLDER: &str = ".viralrank";
pub const DB_FILENAME: &str = "viral_videos.db";
pub const SETTINGS_FILENAME: &str = "settings.json";
pub const SAMPLE_SNAPSHOT_FILENAME: &str = "sample-videos.json";
pub const SNAPSHOT_PREFIX: &str = "videos-";
pub const TOP_VIRAL_PREFIX: &str = "top_";
pub const TOP_VIRAL_SUFFIX: &str = "_viral_videos.json";
pub const ALL_VIDEOS_PREFIX: &str = "all_";
pub const ALL_VIDEOS_SUFFIX: &str = "_videos.json";

// Store
pub const STORE_BUSY_TIMEOUT_MS: u64 = 5_000;

// Sample data
pub const DEFAULT_SAMPLE_COUNT: usize = 10;
pub const SAMPLE_RATIO_MIN: f64 = 2.1;
pub const SAMPLE_RATIO_MAX: f64 = 15.0;
pub const SAMPLE_BASE_VIEWS_MIN: u64 = 10_000;
pub const SAMPLE_BASE_VIEWS_MAX: u64 = 200_000;
pub const SAMPLE_VIDEOS_PER_ACCOUNT: usize = 20;
pub const SAMPLE_LOOKBACK_DAYS: i64 = 7;
pub const SAMPLE_OUTLIER_CHANCE: f64 = 0.3;

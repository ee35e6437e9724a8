// Viral Rank CLI binary

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

use viral_rank_lib::collect::sample::SampleCollector;
use viral_rank_lib::collect::{collect_platform, Collector};
use viral_rank_lib::config::{default_data_dir, Settings};
use viral_rank_lib::constants::{DEFAULT_DATES_LIMIT, DEFAULT_QUERY_LIMIT};
use viral_rank_lib::db::import::{export_ranking, import_directory, import_from_file};
use viral_rank_lib::db::schema::parse_date;
use viral_rank_lib::db::{get_db_path, Store};
use viral_rank_lib::ranking::snapshot::date_for_offset;
use viral_rank_lib::ranking::{run_ranking, FileSource, RankingOptions, RankingOutcome, ViralSource};
use viral_rank_lib::Platform;

#[derive(Parser)]
#[command(name = "viralrank")]
#[command(about = "Viral Rank - daily cross-platform short-video rankings", long_about = None)]
#[command(version)]
struct Cli {
    /// Data directory (defaults to ~/.viralrank)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a settings.json with the current values
    InitSettings,

    /// Collect every platform with the synthetic collectors
    Collect {
        /// Seed for the synthetic collectors
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Rank the per-platform viral files and store the day's top videos
    Rank {
        /// Days before today to store the ranking under
        #[arg(long, default_value = "0")]
        day_offset: u32,
        /// Generate sample videos if no platform has data
        #[arg(long)]
        samples: bool,
    },

    /// Import snapshot files (a single file, or every snapshot in the data directory)
    Import {
        path: Option<PathBuf>,
    },

    /// Show the ranking for a date
    Show {
        /// Days before today
        #[arg(long, default_value = "0", conflicts_with = "date")]
        day_offset: u32,
        /// Exact date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
        /// Only this platform
        #[arg(long, value_parser = parse_platform)]
        platform: Option<Platform>,
        #[arg(long, default_value_t = DEFAULT_QUERY_LIMIT)]
        limit: i64,
    },

    /// List dates that have rankings
    Dates {
        #[arg(long, default_value_t = DEFAULT_DATES_LIMIT)]
        limit: i64,
    },

    /// Export a date's ranking to JSON
    Export {
        output: PathBuf,
        /// Exact date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },

    /// Collect, rank, and import in one pass
    Daily {
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };

    match cli.command {
        Commands::InitSettings => cmd_init_settings(&data_dir),
        Commands::Collect { seed } => cmd_collect(&data_dir, seed).map(|_| ()),
        Commands::Rank { day_offset, samples } => cmd_rank(&data_dir, day_offset, samples),
        Commands::Import { path } => cmd_import(&data_dir, path),
        Commands::Show { day_offset, date, platform, limit } => cmd_show(&data_dir, day_offset, date, platform, limit),
        Commands::Dates { limit } => cmd_dates(&data_dir, limit),
        Commands::Export { output, date } => cmd_export(&data_dir, output, date),
        Commands::Daily { seed } => cmd_daily(&data_dir, seed),
    }
}

fn cmd_init_settings(data_dir: &Path) -> Result<()> {
    let settings = Settings::load(data_dir)?;
    let path = settings.save(data_dir)?;
    println!("Settings written to {}", path.display());
    Ok(())
}

/// Collect all platforms; profiles go straight into the store
fn cmd_collect(data_dir: &Path, seed: Option<u64>) -> Result<usize> {
    let settings = Settings::load(data_dir)?;
    let store = open_store(data_dir)?;
    let seed = seed.unwrap_or_else(|| Local::now().timestamp() as u64);

    let mut viral_total = 0;
    for collector in SampleCollector::all(seed) {
        match collect_platform(&collector, data_dir, &settings) {
            Ok(report) => {
                for profile in &report.profiles {
                    store.upsert_profile(profile)?;
                }
                println!(
                    "{:>10}: {:>4} videos, {:>3} viral, {:>2} profiles",
                    report.platform,
                    report.total_videos,
                    report.top_viral.len(),
                    report.profiles.len()
                );
                viral_total += report.top_viral.len();
            }
            Err(e) => log::error!("Collection failed for {}: {}", collector.platform(), e),
        }
    }

    store.close()?;
    Ok(viral_total)
}

fn cmd_rank(data_dir: &Path, day_offset: u32, samples: bool) -> Result<()> {
    let settings = Settings::load(data_dir)?;
    let store = open_store(data_dir)?;

    let mut options = RankingOptions::from_settings(&settings, data_dir);
    options.day_offset = day_offset;
    options.generate_samples |= samples;

    let sources = FileSource::all_in_dir(data_dir);
    let refs: Vec<&dyn ViralSource> = sources.iter().map(|s| s as &dyn ViralSource).collect();
    let outcome = run_ranking(&store, &refs, &options)?;

    match &outcome {
        RankingOutcome::Ranked(videos) => {
            println!("Ranked {} viral videos for {}", videos.len(), options.target_date()?);
        }
        RankingOutcome::Sampled(videos) => {
            println!("No platform data; stored {} SAMPLE videos for {}", videos.len(), options.target_date()?);
        }
        RankingOutcome::Empty => {
            println!("No viral videos found. Run 'viralrank collect' first, or pass --samples.");
            return Ok(());
        }
    }

    print_videos(outcome.videos().iter().enumerate().map(|(i, v)| {
        (i as i64 + 1, v.platform, v.performance_ratio, v.views as i64, v.title.as_str())
    }));

    store.close()?;
    Ok(())
}

fn cmd_import(data_dir: &Path, path: Option<PathBuf>) -> Result<()> {
    let store = open_store(data_dir)?;

    match path {
        Some(file) => {
            let count = import_from_file(&store, &file)?;
            println!("Imported {} videos from {}", count, file.display());
        }
        None => {
            let results = import_directory(&store, data_dir, Local::now().date_naive())?;
            if results.is_empty() {
                println!("No snapshot files found in {}", data_dir.display());
            }
            for result in results {
                let date = result.date.map(|d| d.to_string()).unwrap_or_else(|| "-".repeat(10));
                println!("{}  {:>3} videos  {}", date, result.imported, result.path.display());
            }
        }
    }

    store.close()?;
    Ok(())
}

fn cmd_show(
    data_dir: &Path,
    day_offset: u32,
    date: Option<String>,
    platform: Option<Platform>,
    limit: i64,
) -> Result<()> {
    let store = open_store(data_dir)?;
    let date = resolve_date(date, day_offset)?;

    let ranked = store.query_ranking(date, limit, platform)?;
    if ranked.is_empty() {
        println!("No ranking stored for {}.", date);
        return Ok(());
    }

    println!("Top viral videos for {}", date);
    println!();
    print_videos(ranked.iter().map(|r| {
        (r.rank, r.video.platform, r.video.performance_ratio, r.video.views, r.video.title.as_str())
    }));

    Ok(())
}

fn cmd_dates(data_dir: &Path, limit: i64) -> Result<()> {
    let store = open_store(data_dir)?;
    let dates = store.list_dates_with_data(limit)?;

    if dates.is_empty() {
        println!("No rankings stored yet.");
        return Ok(());
    }

    for date in dates {
        let count = store.query_ranking(date, i64::MAX, None)?.len();
        println!("{}: {} videos", date, count);
    }

    Ok(())
}

fn cmd_export(data_dir: &Path, output: PathBuf, date: Option<String>) -> Result<()> {
    let store = open_store(data_dir)?;
    let date = resolve_date(date, 0)?;

    let count = export_ranking(&store, date, &output)?;
    println!("Exported {} videos for {} to {}", count, date, output.display());
    Ok(())
}

/// One scheduled run: collect, rank today, import every snapshot
fn cmd_daily(data_dir: &Path, seed: Option<u64>) -> Result<()> {
    let start = Instant::now();
    log::info!("Running daily collection job");

    let result = cmd_collect(data_dir, seed)
        .and_then(|_| cmd_rank(data_dir, 0, false))
        .and_then(|_| cmd_import(data_dir, None));

    let elapsed = start.elapsed().as_secs_f64();
    match &result {
        Ok(()) => log::info!("Daily job completed in {:.2} seconds", elapsed),
        Err(e) => log::error!("Daily job failed after {:.2} seconds: {}", elapsed, e),
    }
    result
}

// --- Helper Functions ---

fn open_store(data_dir: &Path) -> Result<Store> {
    Store::open(&get_db_path(data_dir))
}

fn parse_platform(s: &str) -> std::result::Result<Platform, String> {
    s.parse()
}

fn resolve_date(date: Option<String>, day_offset: u32) -> Result<NaiveDate> {
    match date {
        Some(d) => Ok(parse_date(&d)?),
        None => {
            let today = Local::now().date_naive();
            date_for_offset(today, day_offset)
                .ok_or_else(|| anyhow::anyhow!("{} days before {} is out of range", day_offset, today))
        }
    }
}

fn print_videos<'a>(rows: impl Iterator<Item = (i64, Platform, f64, i64, &'a str)>) {
    println!("{:>4}  {:>10}  {:>6}  {:>10}  {}", "Rank", "Platform", "Ratio", "Views", "Title");
    println!("{}", "-".repeat(70));

    for (rank, platform, ratio, views, title) in rows {
        let title = if title.chars().count() > 40 {
            format!("{}...", title.chars().take(37).collect::<String>())
        } else {
            title.to_string()
        };
        println!("{:>4}  {:>10}  {:>5.1}x  {:>10}  {}", rank, platform.as_str(), ratio, views, title);
    }
}

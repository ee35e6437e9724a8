// Viral Rank - Library Entry Point

pub mod constants;
pub mod error;
pub mod config;
pub mod video;
pub mod scoring;
pub mod collect;
pub mod ranking;
pub mod db;

pub use db::Store;
pub use error::{Result, ViralError};
pub use ranking::{run_ranking, RankingOptions, RankingOutcome};
pub use video::{NormalizedVideo, Platform, Profile, RawVideo};

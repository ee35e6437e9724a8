// Synthetic data
// Seeded stand-in collectors for each platform, and the fallback sample ranking.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::Collector;
use crate::constants::{
    SAMPLE_BASE_VIEWS_MAX, SAMPLE_BASE_VIEWS_MIN, SAMPLE_LOOKBACK_DAYS, SAMPLE_OUTLIER_CHANCE,
    SAMPLE_RATIO_MAX, SAMPLE_RATIO_MIN, SAMPLE_VIDEOS_PER_ACCOUNT,
};
use crate::error::Result;
use crate::scoring::round_ratio;
use crate::video::{NormalizedVideo, Platform, PlatformSource, Profile, RawVideo};

const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const YOUTUBE_ID_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";
const DIGITS: &[u8] = b"0123456789";

/// Default accounts followed on each platform
pub fn default_accounts(platform: Platform) -> Vec<String> {
    let accounts: &[&str] = match platform {
        Platform::Instagram => &["sei.come.sei", "founderspodcast", "matthgray", "hormozi", "onlinemarketinges.co"],
        Platform::YouTube => &[
            "UCfzlCWGWYyIQ0aLC5w48gBQ",
            "UCnYMOamNKLGVlJgRUbamveA",
            "UCJ24N4O0bP7LGLBDvye7oCA",
            "UCfbLDMh6uGOZePAfqqjVZ-g",
            "UCG-vvPTyh24D9ScKdxvOvxg",
        ],
        Platform::TikTok => &["motivation", "selfimprovement", "mindsetcoach", "bookclub", "inspirationdaily"],
        Platform::Facebook => &["mindsetmentor", "selfimprovementdaily", "motivationmafia", "bookloversclub", "successmindset"],
        Platform::Unknown => &[],
    };
    accounts.iter().map(|a| a.to_string()).collect()
}

fn random_id(rng: &mut StdRng, charset: &[u8], len: usize) -> String {
    (0..len)
        .map(|_| charset[rng.gen_range(0..charset.len())] as char)
        .collect()
}

/// Platform-shaped video id
fn platform_video_id(rng: &mut StdRng, platform: Platform) -> String {
    match platform {
        Platform::YouTube => random_id(rng, YOUTUBE_ID_CHARS, 11),
        Platform::TikTok => random_id(rng, DIGITS, 19),
        Platform::Facebook => random_id(rng, DIGITS, 15),
        Platform::Instagram | Platform::Unknown => random_id(rng, ALPHANUMERIC, 11),
    }
}

fn video_url(platform: Platform, account: &str, video_id: &str) -> String {
    match platform {
        Platform::Instagram => format!("https://www.instagram.com/{}/p/{}/", account, video_id),
        Platform::YouTube => format!("https://www.youtube.com/shorts/{}", video_id),
        Platform::TikTok => format!("https://www.tiktok.com/@{}/video/{}", account, video_id),
        Platform::Facebook => format!("https://www.facebook.com/reel/{}", video_id),
        Platform::Unknown => String::new(),
    }
}

fn platform_source(platform: Platform, account: &str, video_id: &str) -> PlatformSource {
    let account = Some(account.to_string());
    match platform {
        Platform::Instagram => PlatformSource::Instagram { profile: account },
        Platform::YouTube => PlatformSource::YouTube {
            channel_id: account,
            video_id: Some(video_id.to_string()),
        },
        Platform::TikTok => PlatformSource::TikTok { username: account },
        Platform::Facebook => PlatformSource::Facebook { page_id: account },
        Platform::Unknown => PlatformSource::Unknown { creator: account },
    }
}

fn title_case(s: &str) -> String {
    s.split(|c: char| c == '.' || c == '_' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Deterministic synthetic collector. Roughly a third of each account's
/// videos are outliers at 2.1x-15x their base views.
pub struct SampleCollector {
    pub platform: Platform,
    pub accounts: Vec<String>,
    pub videos_per_account: usize,
    pub seed: u64,
    pub now: DateTime<Utc>,
}

impl SampleCollector {
    pub fn new(platform: Platform, seed: u64) -> Self {
        Self {
            platform,
            accounts: default_accounts(platform),
            videos_per_account: SAMPLE_VIDEOS_PER_ACCOUNT,
            seed,
            now: Utc::now(),
        }
    }

    /// One collector per collected platform, each with its own seed
    pub fn all(seed: u64) -> Vec<SampleCollector> {
        Platform::COLLECTED
            .iter()
            .enumerate()
            .map(|(i, &platform)| SampleCollector::new(platform, seed.wrapping_add(i as u64)))
            .collect()
    }

    fn rng(&self, salt: u64) -> StdRng {
        StdRng::seed_from_u64(self.seed.wrapping_mul(31).wrapping_add(salt))
    }

    fn account_videos(&self, rng: &mut StdRng, account: &str) -> Vec<RawVideo> {
        (0..self.videos_per_account)
            .map(|i| {
                let post_date = self.now - Duration::seconds(rng.gen_range(0..SAMPLE_LOOKBACK_DAYS * 86_400));
                let base_views = rng.gen_range(SAMPLE_BASE_VIEWS_MIN..=SAMPLE_BASE_VIEWS_MAX / 2);
                let is_outlier = rng.gen_bool(SAMPLE_OUTLIER_CHANCE);
                let multiplier = if is_outlier {
                    rng.gen_range(SAMPLE_RATIO_MIN..SAMPLE_RATIO_MAX)
                } else {
                    rng.gen_range(0.5..1.9)
                };
                let video_id = platform_video_id(rng, self.platform);

                RawVideo {
                    id: video_id.clone(),
                    title: Some(format!("Self-Improvement Short #{}", i + 1)),
                    url: Some(video_url(self.platform, account, &video_id)),
                    thumbnail: Some(format!("https://picsum.photos/seed/{}_{}_{}/500/500", self.platform, account, i)),
                    views: (base_views as f64 * multiplier) as u64,
                    performance_ratio: None,
                    post_date: Some(post_date.to_rfc3339()),
                    source: platform_source(self.platform, account, &video_id),
                }
            })
            .collect()
    }
}

impl Collector for SampleCollector {
    fn platform(&self) -> Platform {
        self.platform
    }

    fn fetch_videos(&self) -> Result<Vec<RawVideo>> {
        let mut rng = self.rng(0);
        let mut videos = Vec::new();
        for account in &self.accounts {
            log::debug!("Generating sample {} videos for {}", self.platform, account);
            videos.extend(self.account_videos(&mut rng, account));
        }
        Ok(videos)
    }

    fn fetch_profiles(&self) -> Result<Vec<Profile>> {
        let mut rng = self.rng(1);
        Ok(self
            .accounts
            .iter()
            .map(|account| Profile {
                id: account.clone(),
                platform: self.platform,
                name: title_case(account),
                url: format!("https://www.{}.com/{}", self.platform, account),
                follower_count: rng.gen_range(10_000..5_000_000),
                last_updated: self.now.to_rfc3339(),
            })
            .collect())
    }
}

/// Synthetic top-N ranking used only when a run found nothing and samples were requested.
/// Sorted by ratio, best first.
pub fn generate_sample_ranking<R: Rng>(rng: &mut R, count: usize, now: DateTime<Utc>) -> Vec<NormalizedVideo> {
    let mut videos: Vec<NormalizedVideo> = (0..count)
        .map(|i| {
            let platform = *Platform::COLLECTED.choose(rng).unwrap_or(&Platform::Instagram);
            let base_views = rng.gen_range(SAMPLE_BASE_VIEWS_MIN..=SAMPLE_BASE_VIEWS_MAX);
            let ratio = round_ratio(rng.gen_range(SAMPLE_RATIO_MIN..SAMPLE_RATIO_MAX));
            let mut id_rng = StdRng::seed_from_u64(rng.gen());
            let id = platform_video_id(&mut id_rng, platform);
            let post_date = now - Duration::seconds(rng.gen_range(0..SAMPLE_LOOKBACK_DAYS * 86_400));
            let creator = format!("{}Creator{}", title_case(platform.as_str()), i);

            NormalizedVideo {
                url: video_url(platform, &creator, &id),
                thumbnail: format!("https://picsum.photos/seed/{}_{}/500/500", platform, i),
                video_id: (platform == Platform::YouTube).then(|| id.clone()),
                id,
                platform,
                creator,
                title: format!("Viral Self-Improvement Video #{}", i + 1),
                views: (base_views as f64 * ratio) as u64,
                performance_ratio: ratio,
                post_date: post_date.to_rfc3339(),
            }
        })
        .collect();

    videos.sort_by(|a, b| b.performance_ratio.total_cmp(&a.performance_ratio));
    videos
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collect::viral_subset;

    fn fixed_now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-10-17T00:00:00Z").unwrap().with_timezone(&Utc)
    }

    fn collector(platform: Platform) -> SampleCollector {
        SampleCollector { now: fixed_now(), ..SampleCollector::new(platform, 42) }
    }

    #[test]
    fn test_sample_collector_is_deterministic() {
        let a = collector(Platform::TikTok).fetch_videos().unwrap();
        let b = collector(Platform::TikTok).fetch_videos().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 5 * SAMPLE_VIDEOS_PER_ACCOUNT);
    }

    #[test]
    fn test_sample_videos_are_platform_shaped() {
        let videos = collector(Platform::YouTube).fetch_videos().unwrap();
        for video in &videos {
            assert_eq!(video.platform(), Platform::YouTube);
            assert_eq!(video.id.len(), 11);
            assert!(video.url.as_deref().unwrap().ends_with(&video.id));
            assert!(matches!(video.source, PlatformSource::YouTube { channel_id: Some(_), .. }));
        }

        let tiktok = collector(Platform::TikTok).fetch_videos().unwrap();
        assert!(tiktok.iter().all(|v| v.id.len() == 19 && v.id.chars().all(|c| c.is_ascii_digit())));
    }

    #[test]
    fn test_sample_profiles_cover_accounts() {
        let profiles = collector(Platform::Facebook).fetch_profiles().unwrap();
        assert_eq!(profiles.len(), 5);
        assert_eq!(profiles[0].id, "mindsetmentor");
        assert_eq!(profiles[0].url, "https://www.facebook.com/mindsetmentor");
        assert_eq!(title_case("sei.come.sei"), "Sei Come Sei");
    }

    #[test]
    fn test_sample_cohort_produces_viral_subset() {
        let c = collector(Platform::Instagram);
        let viral = viral_subset(c.fetch_videos().unwrap(), 2.0, 10);

        assert!(!viral.is_empty());
        assert!(viral.windows(2).all(|w| w[0].performance_ratio >= w[1].performance_ratio));
    }

    #[test]
    fn test_sample_ranking_is_sorted_and_viral() {
        let mut rng = StdRng::seed_from_u64(7);
        let videos = generate_sample_ranking(&mut rng, 10, fixed_now());

        assert_eq!(videos.len(), 10);
        assert!(videos.iter().all(|v| v.performance_ratio >= SAMPLE_RATIO_MIN));
        assert!(videos.windows(2).all(|w| w[0].performance_ratio >= w[1].performance_ratio));
        for v in videos.iter().filter(|v| v.platform == Platform::YouTube) {
            assert_eq!(v.video_id.as_deref(), Some(v.id.as_str()));
        }
    }
}

//! Social-proof simulation.
//!
//! Models the landing page's "people are joining right now" widgets as
//! explicit state machines: a bounded activity feed fed by a cancellable
//! periodic task, and a cosmetic spots-claimed percentage that ramps
//! linearly toward a campaign deadline. Nothing here is persisted and the
//! only teardown contract is cancellation of the feed task.

use std::collections::VecDeque;
use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Maximum number of entries the feed shows at once.
pub const FEED_CAPACITY: usize = 3;

/// Percentage shown at the start of the campaign.
pub const SPOTS_START_PERCENT: f64 = 25.0;

/// Percentage the ramp saturates at.
pub const SPOTS_MAX_PERCENT: f64 = 95.0;

/// Campaign length driving the spots-claimed ramp.
pub const CAMPAIGN_HOURS: f64 = 15.0 * 24.0;

/// Interval between simulated signups.
pub const FEED_TICK_RANGE_MS: RangeInclusive<u64> = 5_000..=8_000;

const SIMULATED_NAMES: &[&str] = &[
    "Priya", "Rahul", "Sneha", "Arjun", "Ananya", "Vikram", "Neha", "Rohan",
    "Ishita", "Karan", "Diya", "Aditya", "Kavya", "Siddharth", "Riya", "Aman",
    "Pooja", "Harsh", "Meera", "Varun", "Tanvi", "Nikhil", "Sara", "Ayush",
];

const SIMULATED_CITIES: &[&str] = &[
    "Mumbai", "Delhi", "Bangalore", "Hyderabad", "Chennai", "Pune", "Kolkata",
    "Ahmedabad", "Jaipur", "Lucknow", "Chandigarh", "Kochi", "Indore", "Bhopal",
    "Gurgaon", "Noida", "Coimbatore", "Surat", "Nagpur", "Vadodara",
];

/// One feed entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    pub name: String,
    pub city: String,
    pub registered_at: DateTime<Utc>,
    /// True when this entry came from an actual registration rather than
    /// the simulator.
    pub real_user: bool,
}

/// Generates a simulated feed entry from the fixed name/city pools.
pub fn simulated_activity<R: Rng + ?Sized>(rng: &mut R) -> Activity {
    Activity {
        name: (*SIMULATED_NAMES.choose(rng).expect("non-empty pool")).to_string(),
        city: (*SIMULATED_CITIES.choose(rng).expect("non-empty pool")).to_string(),
        registered_at: Utc::now(),
        real_user: false,
    }
}

/// Bounded, newest-first activity feed.
#[derive(Debug, Default)]
pub struct ActivityFeed {
    entries: VecDeque<Activity>,
}

impl ActivityFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes an entry to the head, dropping the oldest past capacity.
    pub fn push(&mut self, activity: Activity) {
        self.entries.push_front(activity);
        self.entries.truncate(FEED_CAPACITY);
    }

    /// Pushes a real registrant to the head of the feed.
    pub fn push_registered(&mut self, name: impl Into<String>, city: impl Into<String>) {
        self.push(Activity {
            name: name.into(),
            city: city.into(),
            registered_at: Utc::now(),
            real_user: true,
        });
    }

    pub fn entries(&self) -> impl Iterator<Item = &Activity> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Cosmetic spots-claimed percentage at `now` for a campaign that started
/// at `start`.
///
/// Ramps linearly from 25% to 95% over 15 days and clamps at both ends;
/// times before `start` read as the starting percentage.
pub fn spots_claimed(start: DateTime<Utc>, now: DateTime<Utc>) -> u8 {
    let hours_elapsed = (now - start).num_seconds() as f64 / 3600.0;
    let per_hour = (SPOTS_MAX_PERCENT - SPOTS_START_PERCENT) / CAMPAIGN_HOURS;
    let progress = SPOTS_START_PERCENT + hours_elapsed * per_hour;
    progress.clamp(SPOTS_START_PERCENT, SPOTS_MAX_PERCENT).round() as u8
}

/// Periodic task that appends simulated signups to a shared feed.
///
/// Each tick sleeps a uniformly random duration from the configured range,
/// then pushes one simulated entry. The task runs until its cancellation
/// token fires.
pub struct FeedTask {
    feed: Arc<Mutex<ActivityFeed>>,
    tick_range_ms: RangeInclusive<u64>,
    token: CancellationToken,
}

impl FeedTask {
    pub fn new(feed: Arc<Mutex<ActivityFeed>>, token: CancellationToken) -> Self {
        Self {
            feed,
            tick_range_ms: FEED_TICK_RANGE_MS,
            token,
        }
    }

    /// Overrides the tick interval range (tests use millisecond ticks).
    pub fn with_tick_range_ms(mut self, range: RangeInclusive<u64>) -> Self {
        self.tick_range_ms = range;
        self
    }

    /// Spawns the feed loop onto the current runtime.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                let millis = rand::thread_rng().gen_range(self.tick_range_ms.clone());
                tokio::select! {
                    _ = self.token.cancelled() => {
                        debug!("activity feed task cancelled");
                        break;
                    }
                    _ = tokio::time::sleep(Duration::from_millis(millis)) => {
                        let activity = {
                            let mut rng = rand::thread_rng();
                            simulated_activity(&mut rng)
                        };
                        self.feed.lock().await.push(activity);
                    }
                }
            }
        })
    }
}

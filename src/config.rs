//! Store and line configuration.

use std::fmt::{self, Display};

use bon::bon;
use tokio::time::Duration;

use crate::{
    clock::TimeScale,
    error::{StoreError, StoreResult},
};

/// The item limit given to lines which don't have one.
pub const UNLIMITED_ITEMS: u32 = 1000;

/// Configuration for a single checkout line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineConfig {
    pub(crate) item_limit: u32,
}

impl LineConfig {
    /// A line for customers with at most `item_limit` items.
    pub fn express(item_limit: u32) -> Self {
        Self { item_limit }
    }

    /// A line with no practical item limit.
    pub fn unlimited() -> Self {
        Self {
            item_limit: UNLIMITED_ITEMS,
        }
    }

    /// The most items a customer in this line may carry.
    pub fn item_limit(&self) -> u32 {
        self.item_limit
    }
}

impl Default for LineConfig {
    fn default() -> Self {
        Self::unlimited()
    }
}

/// Parameters for a single simulated business day.
///
/// All durations are in simulated time. They are compressed by `time_scale` when the simulation
/// actually waits.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct StoreConfig {
    pub(crate) lines: Vec<LineConfig>,
    pub(crate) open_duration: Duration,
    pub(crate) time_scale: u32,
    pub(crate) arrival_chance: f64,
    pub(crate) arrival_interval: Duration,
    pub(crate) item_time: Duration,
    pub(crate) payment_time: Duration,
    pub(crate) render_interval: Duration,
    pub(crate) max_items: u32,
    pub(crate) seed: Option<u64>,
}

#[bon]
impl StoreConfig {
    #[allow(missing_docs)]
    #[builder]
    pub fn new(
        /// One cashier is hired per line.
        #[builder(default = vec![LineConfig::default(); 4])]
        lines: Vec<LineConfig>,
        /// How long the store accepts new customers.
        #[builder(default = Duration::from_secs(14 * 60 * 60))]
        open_duration: Duration,
        /// How much to compress simulated time by.
        #[builder(default = 5000)]
        time_scale: u32,
        /// The chance of a customer arriving in each arrival interval, between 0 and 1.
        #[builder(default = 0.63)]
        arrival_chance: f64,
        /// How often a customer might arrive.
        #[builder(default = Duration::from_secs(30))]
        arrival_interval: Duration,
        /// Time to scan and bag one item.
        #[builder(default = Duration::from_secs(5))]
        item_time: Duration,
        /// Time to take a customer's money.
        #[builder(default = Duration::from_secs(30))]
        payment_time: Duration,
        /// How often to draw the lines, when drawing is enabled.
        #[builder(default = Duration::from_secs(30))]
        render_interval: Duration,
        /// Customers carry between 1 and `max_items` items.
        #[builder(default = 60)]
        max_items: u32,
        /// Seed for reproducible arrivals.
        seed: Option<u64>,
    ) -> Self {
        Self {
            lines,
            open_duration,
            time_scale,
            arrival_chance,
            arrival_interval,
            item_time,
            payment_time,
            render_interval,
            max_items,
            seed,
        }
    }

    /// Check the configuration before opening the store.
    pub fn validate(&self) -> StoreResult<()> {
        if self.lines.is_empty() {
            return Err(StoreError::InvalidConfig(
                "a store needs at least one line".to_string(),
            ));
        }
        self.time_scale()?;
        if !(0.0..=1.0).contains(&self.arrival_chance) {
            return Err(StoreError::InvalidConfig(format!(
                "arrival chance must be between 0 and 1, got {}",
                self.arrival_chance
            )));
        }
        if self.arrival_interval.is_zero() {
            return Err(StoreError::InvalidConfig(
                "arrival interval must be greater than zero".to_string(),
            ));
        }
        if self.max_items == 0 {
            return Err(StoreError::InvalidConfig(
                "customers must be able to carry at least one item".to_string(),
            ));
        }
        if !self.lines.iter().any(|l| l.item_limit >= self.max_items) {
            return Err(StoreError::NoEligibleLine {
                items: self.max_items,
            });
        }

        Ok(())
    }

    pub(crate) fn time_scale(&self) -> StoreResult<TimeScale> {
        TimeScale::new(self.time_scale).ok_or_else(|| {
            StoreError::InvalidConfig("time scale must be greater than zero".to_string())
        })
    }

    /// Simulated time a cashier spends on a customer with `items` items.
    pub fn service_time(&self, items: u32) -> Duration {
        self.item_time.saturating_mul(items) + self.payment_time
    }

    /// One entry per line, in line order.
    pub fn lines(&self) -> &[LineConfig] {
        &self.lines
    }

    /// How long arrivals are accepted, in simulated time.
    pub fn open_duration(&self) -> Duration {
        self.open_duration
    }

    /// How often to draw the lines, in simulated time.
    pub fn render_interval(&self) -> Duration {
        self.render_interval
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Display for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let limits: Vec<_> = self.lines.iter().map(|l| l.item_limit).collect();
        write!(
            f,
            "lines: {:?}, open: {:?}, scale: 1:{}, arrivals: {} per {:?}, item: {:?}, payment: {:?}",
            limits,
            self.open_duration,
            self.time_scale,
            self.arrival_chance,
            self.arrival_interval,
            self.item_time,
            self.payment_time
        )
    }
}

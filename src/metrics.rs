//! Wait time collection and aggregation

use tokio::time::Duration;

/// How long one customer waited in line, in simulated time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitSample {
    /// The line the customer waited in
    pub line: usize,
    /// How many items the customer carried
    pub items: u32,
    /// Simulated time from joining the line to reaching the cashier
    pub wait: Duration,
}

/// Summary statistics over all wait samples
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaitStats {
    /// Number of customers served
    pub count: usize,
    /// Mean wait
    pub mean: Duration,
    /// Longest wait
    pub max: Duration,
    /// Median wait
    pub p50: Duration,
    /// 99th percentile wait
    pub p99: Duration,
}

impl WaitStats {
    /// Returns `None` when there are no samples, rather than dividing by zero.
    pub fn from_waits(waits: &[Duration]) -> Option<Self> {
        if waits.is_empty() {
            return None;
        }

        let mut sorted = waits.to_vec();
        sorted.sort();

        Some(Self {
            count: sorted.len(),
            mean: duration_mean(&sorted),
            max: *sorted.last()?,
            p50: duration_percentile(&sorted, 0.5),
            p99: duration_percentile(&sorted, 0.99),
        })
    }
}

/// Collects wait samples from every cashier
#[derive(Debug, Default)]
pub struct MetricsCollector {
    samples: Vec<WaitSample>,
}

impl MetricsCollector {
    /// An empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one served customer
    pub fn record(&mut self, sample: WaitSample) {
        self.samples.push(sample);
    }

    /// Every sample, in the order they were recorded
    pub fn samples(&self) -> &[WaitSample] {
        &self.samples
    }

    /// Number of customers served from a given line
    pub fn served_from(&self, line: usize) -> usize {
        self.samples.iter().filter(|s| s.line == line).count()
    }

    /// Aggregate the waits, or `None` if nobody was served
    pub fn wait_stats(&self) -> Option<WaitStats> {
        let waits: Vec<_> = self.samples.iter().map(|s| s.wait).collect();
        WaitStats::from_waits(&waits)
    }
}

/// Mean of a non-empty set of waits. Sums in nanoseconds, so a long day can't overflow.
fn duration_mean(waits: &[Duration]) -> Duration {
    let total: u128 = waits.iter().map(Duration::as_nanos).sum();
    let mean = total / waits.len() as u128;
    Duration::from_nanos(u64::try_from(mean).unwrap_or(u64::MAX))
}

/// Linearly interpolated percentile of non-empty, sorted waits.
fn duration_percentile(sorted: &[Duration], p: f64) -> Duration {
    let rank = p * (sorted.len() - 1) as f64;
    let lower = sorted[rank.floor() as usize];
    let upper = sorted[rank.ceil() as usize];

    lower + (upper - lower).mul_f64(rank.fract())
}

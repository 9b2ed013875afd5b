use std::time::Duration;

use checkout_sim::{LineConfig, StoreConfig};

/// A short day in real time: one simulated second per real second, ten minutes open.
pub fn short_day(lines: Vec<LineConfig>) -> StoreConfig {
    StoreConfig::builder()
        .lines(lines)
        .time_scale(1)
        .open_duration(Duration::from_secs(600))
        .arrival_interval(Duration::from_secs(5))
        .arrival_chance(0.8)
        .item_time(Duration::from_millis(200))
        .payment_time(Duration::from_secs(2))
        .render_interval(Duration::from_secs(30))
        .seed(1234)
        .build()
}

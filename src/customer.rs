//! Customers.

use tokio::time::Instant;

/// A shopper waiting to check out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Customer {
    items: u32,
    arrived_at: Instant,
}

impl Customer {
    /// A customer carrying `items` items, who joined a line at `arrived_at`.
    pub fn new(items: u32, arrived_at: Instant) -> Self {
        Self { items, arrived_at }
    }

    /// A customer arriving now.
    pub fn arriving(items: u32) -> Self {
        Self::new(items, Instant::now())
    }

    /// How many items are in the basket.
    pub fn items(&self) -> u32 {
        self.items
    }

    /// When the customer joined a line, in real (compressed) time.
    pub fn arrived_at(&self) -> Instant {
        self.arrived_at
    }
}

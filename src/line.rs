//! Checkout lines.

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Mutex,
    },
};

use tokio::sync::Notify;

use crate::{
    config::LineConfig,
    customer::Customer,
    error::{StoreError, StoreResult},
};

/// A checkout line: the customers waiting for one cashier.
///
/// Customers are added by the dispatcher and removed by the line's own cashier, in the order they
/// arrived. The length counters can be read at any time without taking the lock.
#[derive(Debug)]
pub struct Line {
    index: usize,
    item_limit: u32,

    customers: Mutex<VecDeque<Customer>>,

    /// Mirrors `customers.len()`, updated while the lock is held.
    length: AtomicUsize,
    /// The longest the line has ever been.
    max_length: AtomicUsize,

    /// Is a cashier still serving this line?
    open: AtomicBool,

    /// Wakes the cashier when a customer joins.
    arrivals: Notify,
}

/// A consistent view of a line's counters.
///
/// `max_length` is never less than `length`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSnapshot {
    /// Position of the line in the store.
    pub index: usize,
    /// The most items a customer in this line may carry.
    pub item_limit: u32,
    /// Customers waiting to be served.
    pub length: usize,
    /// The longest the line has been so far.
    pub max_length: usize,
    /// Whether a cashier is still serving the line.
    pub open: bool,
}

impl LineSnapshot {
    /// Can a customer with this many items join the line?
    pub fn accepts(&self, items: u32) -> bool {
        items <= self.item_limit
    }
}

impl Line {
    /// An empty, open line.
    pub fn new(index: usize, config: LineConfig) -> Self {
        Self {
            index,
            item_limit: config.item_limit,
            customers: Mutex::new(VecDeque::new()),
            length: AtomicUsize::new(0),
            max_length: AtomicUsize::new(0),
            open: AtomicBool::new(true),
            arrivals: Notify::new(),
        }
    }

    /// Position of the line in the store.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The most items a customer in this line may carry.
    pub fn item_limit(&self) -> u32 {
        self.item_limit
    }

    /// Add a customer to the back of the line.
    pub fn enqueue(&self, customer: Customer) {
        {
            let mut customers = self
                .customers
                .lock()
                .expect("should not panic while holding lock");

            customers.push_back(customer);

            // Raise the high-water mark first, so nobody sees a length above it.
            let length = customers.len();
            self.max_length.fetch_max(length, Ordering::AcqRel);
            self.length.store(length, Ordering::Release);
        }

        self.arrivals.notify_one();
    }

    /// Remove the customer at the front of the line.
    ///
    /// Check [`Line::len`] first: calling this on an empty line is a bug.
    pub fn dequeue(&self) -> StoreResult<Customer> {
        let mut customers = self
            .customers
            .lock()
            .expect("should not panic while holding lock");

        let customer = customers
            .pop_front()
            .ok_or(StoreError::EmptyQueue { line: self.index })?;

        self.length.store(customers.len(), Ordering::Release);

        Ok(customer)
    }

    /// Customers currently waiting.
    pub fn len(&self) -> usize {
        self.length.load(Ordering::Acquire)
    }

    /// Is nobody waiting?
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The longest the line has been so far.
    pub fn max_len(&self) -> usize {
        self.max_length.load(Ordering::Acquire)
    }

    /// Is a cashier still serving this line?
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    pub(crate) fn close(&self) {
        self.open.store(false, Ordering::Release);
    }

    /// Wait until a customer joins the line.
    ///
    /// A customer who joined while nobody was waiting still counts, so checking the length and
    /// then waiting can't miss an arrival.
    pub(crate) async fn customer_joined(&self) {
        self.arrivals.notified().await;
    }

    /// Read the counters without taking the lock.
    pub fn snapshot(&self) -> LineSnapshot {
        // Length before the high-water mark, which was raised before the length was.
        let length = self.len();
        let max_length = self.max_len();

        LineSnapshot {
            index: self.index,
            item_limit: self.item_limit,
            length,
            max_length,
            open: self.is_open(),
        }
    }
}

//! The store: opening, taking in customers, closing and reporting.

use std::{
    fmt::{self, Display},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use tokio::{
    sync::watch,
    time::{Duration, Instant},
};
use tracing::{debug, error, info, warn};

use crate::{
    arrival::ArrivalProcess,
    cashier::{Cashier, CashierHandle},
    clock::TimeScale,
    config::StoreConfig,
    customer::Customer,
    dispatcher,
    error::{StoreError, StoreResult},
    line::{Line, LineSnapshot},
    metrics::{MetricsCollector, WaitSample},
    report::{LineReport, StoreReport},
};

/// The phase of the business day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    /// Customers are arriving.
    Open,
    /// No new customers, but cashiers are still serving the people in line.
    Closing,
    /// Every line has been served and every register is closed.
    Closed,
}

impl Display for StoreState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StoreState::Open => "open",
            StoreState::Closing => "closing",
            StoreState::Closed => "closed",
        })
    }
}

/// Everything shared between the store, its cashiers and any observers for one simulated day.
#[derive(Debug)]
pub(crate) struct Floor {
    config: StoreConfig,
    scale: TimeScale,

    lines: Vec<Arc<Line>>,

    /// Written only by the store, read by every cashier.
    state: watch::Sender<StoreState>,

    metrics: Mutex<MetricsCollector>,

    registers_open: AtomicUsize,
}

impl Floor {
    pub fn new(config: StoreConfig) -> StoreResult<Self> {
        config.validate()?;
        let scale = config.time_scale()?;

        let lines = config
            .lines
            .iter()
            .enumerate()
            .map(|(index, line)| Arc::new(Line::new(index, *line)))
            .collect();

        let (state, _) = watch::channel(StoreState::Open);

        Ok(Self {
            config,
            scale,
            lines,
            state,
            metrics: Mutex::new(MetricsCollector::new()),
            registers_open: AtomicUsize::new(0),
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn scale(&self) -> TimeScale {
        self.scale
    }

    pub fn lines(&self) -> &[Arc<Line>] {
        &self.lines
    }

    pub fn state(&self) -> StoreState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.state.subscribe()
    }

    pub fn set_state(&self, state: StoreState) {
        self.state.send_replace(state);
    }

    pub fn record(&self, sample: WaitSample) {
        self.metrics
            .lock()
            .expect("should not panic while holding lock")
            .record(sample);
    }

    #[cfg(test)]
    pub fn samples(&self) -> Vec<WaitSample> {
        self.metrics
            .lock()
            .expect("should not panic while holding lock")
            .samples()
            .to_vec()
    }

    pub fn registers_open(&self) -> usize {
        self.registers_open.load(Ordering::Acquire)
    }

    pub fn register_opened(&self) {
        self.registers_open.fetch_add(1, Ordering::AcqRel);
    }

    pub fn register_closed(&self) {
        self.registers_open.fetch_sub(1, Ordering::AcqRel);
    }
}

/// What the store looks like at one moment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSnapshot {
    /// The phase of the day.
    pub state: StoreState,
    /// Cashiers still at their registers.
    pub registers_open: usize,
    /// One entry per line, in line order.
    pub lines: Vec<LineSnapshot>,
}

/// Read-only access to a running store, for displays.
#[derive(Debug, Clone)]
pub struct StoreObserver {
    floor: Arc<Floor>,
}

impl StoreObserver {
    /// Read the state, the register count and every line's counters.
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            state: self.floor.state(),
            registers_open: self.floor.registers_open(),
            lines: self.floor.lines().iter().map(|l| l.snapshot()).collect(),
        }
    }

    /// The phase of the day.
    pub fn state(&self) -> StoreState {
        self.floor.state()
    }

    /// The configured render interval, compressed into real time.
    pub fn render_interval(&self) -> Duration {
        self.floor
            .scale()
            .compress(self.floor.config().render_interval())
    }

    /// Wait until every register has closed.
    pub async fn wait_for_closed(&self) {
        let mut state_rx = self.floor.subscribe();
        // The sender lives as long as the floor, which we hold.
        let _ = state_rx
            .wait_for(|state| *state == StoreState::Closed)
            .await;
    }
}

/// Runs one simulated business day.
///
/// Opening the store hires one cashier per line. Running it generates arrivals until closing time,
/// then waits for every line to be served before producing a report.
pub struct Store {
    floor: Arc<Floor>,
    cashiers: Vec<CashierHandle>,
    arrival_process: ArrivalProcess,

    arrivals: usize,
    turned_away: usize,
}

impl Store {
    /// Validate the configuration and start a cashier for every line.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        let floor = Arc::new(Floor::new(config)?);

        let config = floor.config();
        let arrival_process =
            ArrivalProcess::new(config.arrival_chance, config.max_items, config.seed)?;

        if floor.scale().compress(config.arrival_interval).is_zero() {
            return Err(StoreError::InvalidConfig(
                "arrival interval vanishes once compressed by the time scale".to_string(),
            ));
        }

        let cashiers = floor
            .lines()
            .iter()
            .map(|line| Cashier::spawn(line.clone(), floor.clone()))
            .collect();

        info!(config = %floor.config(), "Store is open");

        Ok(Self {
            floor,
            cashiers,
            arrival_process,
            arrivals: 0,
            turned_away: 0,
        })
    }

    /// A read-only view of the store that stays valid after [`Store::run`] takes it.
    pub fn observer(&self) -> StoreObserver {
        StoreObserver {
            floor: self.floor.clone(),
        }
    }

    /// The phase of the day.
    pub fn state(&self) -> StoreState {
        self.floor.state()
    }

    /// Take in customers until closing time, then close once every line is empty.
    pub async fn run(mut self) -> StoreResult<StoreReport> {
        let scale = self.floor.scale();
        let tick = scale.compress(self.floor.config().arrival_interval);
        let close_at = Instant::now() + scale.compress(self.floor.config().open_duration);

        while Instant::now() < close_at {
            if let Some(items) = self.arrival_process.next_arrival() {
                self.admit(Customer::arriving(items));
            }

            tokio::time::sleep(tick).await;
        }

        self.floor.set_state(StoreState::Closing);
        info!(arrivals = self.arrivals, "Store is closing");

        let understaffed = self.close_registers().await;

        self.floor.set_state(StoreState::Closed);
        info!("Store is closed");

        Ok(self.report(understaffed))
    }

    fn admit(&mut self, customer: Customer) {
        self.arrivals += 1;

        if let Err(err) = dispatcher::queue_up(self.floor.lines(), customer) {
            self.turned_away += 1;
            warn!(error = %err, "Customer turned away");
        }
    }

    /// Wait for every cashier to finish. Returns the lines whose cashier failed.
    async fn close_registers(&mut self) -> Vec<usize> {
        let mut understaffed = Vec::new();

        for cashier in self.cashiers.drain(..) {
            let line = cashier.line();
            match cashier.join().await {
                Ok(shift) => {
                    debug!(line, served = shift.served, "Register closed");
                }
                Err(err) => {
                    error!(line, error = %err, "Register closed early, store is understaffed");
                    understaffed.push(line);
                }
            }
        }

        understaffed
    }

    fn report(&self, understaffed: Vec<usize>) -> StoreReport {
        let metrics = self
            .floor
            .metrics
            .lock()
            .expect("should not panic while holding lock");

        let lines: Vec<_> = self
            .floor
            .lines()
            .iter()
            .map(|line| LineReport {
                index: line.index(),
                item_limit: line.item_limit(),
                served: metrics.served_from(line.index()),
                max_length: line.max_len(),
            })
            .collect();

        let stranded = understaffed
            .iter()
            .map(|&index| self.floor.lines()[index].len())
            .sum();

        StoreReport {
            arrivals: self.arrivals,
            served: metrics.samples().len(),
            turned_away: self.turned_away,
            waits: metrics.wait_stats(),
            longest_line: lines.iter().map(|l| l.max_length).max().unwrap_or(0),
            lines,
            understaffed,
            stranded,
        }
    }
}

impl Drop for Store {
    fn drop(&mut self) {
        // Only non-empty if the store was dropped without running to completion.
        for cashier in &self.cashiers {
            cashier.abort();
        }
    }
}

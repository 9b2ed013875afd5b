use std::sync::Arc;

use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, info_span, Instrument};

use crate::{
    error::{StoreError, StoreResult},
    line::Line,
    metrics::WaitSample,
    store::{Floor, StoreState},
};

/// Serves one line until the store has closed and the line is empty.
pub(crate) struct Cashier {
    line: Arc<Line>,
    floor: Arc<Floor>,

    /// Used to notice the store closing while waiting for customers.
    state_rx: watch::Receiver<StoreState>,
}

/// What a cashier did during the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shift {
    /// The line the cashier served.
    pub line: usize,
    /// Customers checked out.
    pub served: usize,
}

/// A handle to a running cashier task.
#[derive(Debug)]
pub(crate) struct CashierHandle {
    line: usize,
    handle: JoinHandle<StoreResult<Shift>>,
}

/// Keeps the register marked open for as long as the cashier task is alive.
///
/// Dropped when the task finishes, fails or panics, so a dead cashier's line stops receiving
/// customers.
struct RegisterGuard {
    line: Arc<Line>,
    floor: Arc<Floor>,
}

impl Cashier {
    pub fn spawn(line: Arc<Line>, floor: Arc<Floor>) -> CashierHandle {
        let index = line.index();
        let guard = RegisterGuard::open(line.clone(), floor.clone());

        let cashier = Cashier {
            state_rx: floor.subscribe(),
            line,
            floor,
        };

        let handle = tokio::spawn(
            async move {
                let _guard = guard;
                cashier.run().await
            }
            .instrument(info_span!("cashier", line = index)),
        );

        CashierHandle {
            line: index,
            handle,
        }
    }

    async fn run(mut self) -> StoreResult<Shift> {
        let mut served = 0;

        loop {
            // Read the state before the length. Every customer let in before the store left
            // `Open` is visible once we see it has, so an empty line then stays empty.
            let state = *self.state_rx.borrow_and_update();

            if !self.line.is_empty() {
                self.serve_next().await?;
                served += 1;
                continue;
            }

            if state != StoreState::Open {
                break;
            }

            tokio::select! {
                _ = self.line.customer_joined() => {}
                _ = self.state_rx.changed() => {}
            }
        }

        debug!(served, "Register closing");

        Ok(Shift {
            line: self.line.index(),
            served,
        })
    }

    async fn serve_next(&mut self) -> StoreResult<()> {
        let customer = self.line.dequeue()?;

        let scale = self.floor.scale();
        let wait = scale.expand(customer.arrived_at().elapsed());
        let service = scale.compress(self.floor.config().service_time(customer.items()));

        self.floor.record(WaitSample {
            line: self.line.index(),
            items: customer.items(),
            wait,
        });

        debug!(
            items = customer.items(),
            wait_secs = wait.as_secs_f64(),
            "Checking out customer"
        );

        tokio::time::sleep(service).await;

        Ok(())
    }
}

impl CashierHandle {
    pub fn line(&self) -> usize {
        self.line
    }

    /// Wait for the cashier to finish their shift.
    ///
    /// A cashier which returned an error or panicked is reported as failed.
    pub async fn join(self) -> StoreResult<Shift> {
        match self.handle.await {
            Ok(Ok(shift)) => Ok(shift),
            Ok(Err(err)) => Err(StoreError::CashierFailed {
                line: self.line,
                reason: err.to_string(),
            }),
            Err(join_err) => Err(StoreError::CashierFailed {
                line: self.line,
                reason: join_err.to_string(),
            }),
        }
    }

    /// Stop the cashier without waiting for their line to empty.
    pub(crate) fn abort(&self) {
        self.handle.abort();
    }

    #[cfg(test)]
    pub(crate) fn from_task(line: usize, handle: JoinHandle<StoreResult<Shift>>) -> Self {
        Self { line, handle }
    }
}

impl RegisterGuard {
    fn open(line: Arc<Line>, floor: Arc<Floor>) -> Self {
        floor.register_opened();
        Self { line, floor }
    }
}

impl Drop for RegisterGuard {
    fn drop(&mut self) {
        self.line.close();
        self.floor.register_closed();
    }
}

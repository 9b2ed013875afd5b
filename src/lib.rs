//! Simulate a day at the supermarket checkouts.
//!
//! Customers walk in at random, each carrying a random number of items. Each one joins the
//! shortest line that will take their basket, and waits for that line's cashier. Every cashier is a
//! task of its own, serving their line in arrival order at a speed that depends on the number of
//! items. At closing time no more customers are let in, but the cashiers keep working until every
//! line is empty. A report of wait times and line lengths is then produced.
//!
//! The whole day runs in compressed time: with the default time scale of 5000, a fourteen hour day
//! takes about ten seconds.
//!
//! See the README for an example.

#![deny(missing_docs)]

#[cfg(doctest)]
use doc_comment::doctest;
#[cfg(doctest)]
doctest!("../README.md");

pub mod arrival;
mod cashier;
pub mod clock;
pub mod config;
pub mod customer;
pub mod dispatcher;
pub mod error;
pub mod line;
pub mod metrics;
pub mod render;
pub mod report;
mod store;

pub use cashier::Shift;
pub use config::{LineConfig, StoreConfig};
pub use error::StoreError;
pub use render::Renderer;
pub use report::StoreReport;
pub use store::{Store, StoreObserver, StoreSnapshot, StoreState};

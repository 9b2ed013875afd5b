//! The end of day report.

use std::fmt::{self, Display};

use crate::metrics::WaitStats;

/// How one line did over the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineReport {
    /// Position of the line in the store.
    pub index: usize,
    /// The most items a customer in this line could carry.
    pub item_limit: u32,
    /// Customers checked out of this line.
    pub served: usize,
    /// The longest this line got.
    pub max_length: usize,
}

/// Summary of a simulated business day, produced once the store has closed.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreReport {
    /// Customers who walked in.
    pub arrivals: usize,
    /// Customers who were checked out.
    pub served: usize,
    /// Customers who found no open line that would take their basket.
    pub turned_away: usize,
    /// Wait time statistics, or `None` if nobody was served.
    pub waits: Option<WaitStats>,
    /// The longest any line got.
    pub longest_line: usize,
    /// One entry per line, in line order.
    pub lines: Vec<LineReport>,
    /// Lines whose cashier stopped working before closing.
    pub understaffed: Vec<usize>,
    /// Customers left waiting in understaffed lines.
    pub stranded: usize,
}

impl StoreReport {
    /// Mean wait in seconds, if anyone was served.
    pub fn mean_wait_secs(&self) -> Option<f64> {
        self.waits.map(|w| w.mean.as_secs_f64())
    }
}

impl Display for StoreReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Customers: {}", self.arrivals)?;

        match &self.waits {
            Some(waits) => {
                writeln!(
                    f,
                    "Average Wait Time: {:.2} seconds",
                    waits.mean.as_secs_f64()
                )?;
                writeln!(
                    f,
                    "Maximum Wait Time: {:.2} seconds",
                    waits.max.as_secs_f64()
                )?;
            }
            None => writeln!(f, "No customers were served")?,
        }

        writeln!(f, "Longest Queue Length: {}", self.longest_line)?;

        writeln!(f)?;
        writeln!(f, "Customers Served:  {}", self.served)?;
        if self.turned_away > 0 {
            writeln!(f, "Turned Away:       {}", self.turned_away)?;
        }
        if let Some(waits) = &self.waits {
            writeln!(f, "Median Wait Time:  {:.2} seconds", waits.p50.as_secs_f64())?;
            writeln!(f, "p99 Wait Time:     {:.2} seconds", waits.p99.as_secs_f64())?;
        }

        for line in &self.lines {
            writeln!(
                f,
                "  Line {} (max {} items): served {}, longest {}",
                line.index, line.item_limit, line.served, line.max_length
            )?;
        }

        if !self.understaffed.is_empty() {
            writeln!(
                f,
                "Understaffed lines: {:?} ({} customers stranded)",
                self.understaffed, self.stranded
            )?;
        }

        Ok(())
    }
}

//! Routing arriving customers to a line.
//!
//! A customer joins the shortest open line that accepts their basket. When two lines are equally
//! short, the line seen first is kept only if its item limit is strictly smaller than the
//! challenger's; otherwise the later line wins. The effect is that ties favour express lanes, and
//! among lines with equal limits, the last one.

use std::sync::Arc;

use tracing::debug;

use crate::{
    customer::Customer,
    error::{StoreError, StoreResult},
    line::{Line, LineSnapshot},
};

/// Pick the position of the line a customer with `items` items should join.
///
/// Returns `None` if no open line accepts the customer. Given the same snapshots, always picks the
/// same line.
pub fn choose_line<I>(items: u32, lines: I) -> Option<usize>
where
    I: IntoIterator<Item = LineSnapshot>,
{
    let mut chosen: Option<(usize, LineSnapshot)> = None;

    for (position, line) in lines.into_iter().enumerate() {
        if !line.open || !line.accepts(items) {
            continue;
        }

        if let Some((_, current)) = &chosen {
            if line.length > current.length {
                continue;
            }
            if line.length == current.length && current.item_limit < line.item_limit {
                continue;
            }
        }

        chosen = Some((position, line));
    }

    chosen.map(|(position, _)| position)
}

/// Send a customer to the best line and return its position.
///
/// The dispatcher is the only producer for every line, so lengths can only shrink between choosing
/// a line and joining it.
pub fn queue_up(lines: &[Arc<Line>], customer: Customer) -> StoreResult<usize> {
    let items = customer.items();

    let position = choose_line(items, lines.iter().map(|line| line.snapshot()))
        .ok_or(StoreError::NoEligibleLine { items })?;

    let line = &lines[position];
    line.enqueue(customer);

    debug!(
        line = position,
        items,
        length = line.len(),
        "Customer joined line"
    );

    Ok(position)
}

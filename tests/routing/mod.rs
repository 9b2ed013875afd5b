use std::sync::Arc;

use checkout_sim::{
    config::LineConfig,
    customer::Customer,
    dispatcher::{choose_line, queue_up},
    line::Line,
};
use tokio::time::Instant;

fn lines(limits: &[u32]) -> Vec<Arc<Line>> {
    limits
        .iter()
        .enumerate()
        .map(|(i, limit)| Arc::new(Line::new(i, LineConfig::express(*limit))))
        .collect()
}

#[test]
fn single_line_keeps_arrival_order() {
    let lines = lines(&[1000]);
    let now = Instant::now();

    for items in [5, 10, 2] {
        queue_up(&lines, Customer::new(items, now)).unwrap();
    }

    let served: Vec<_> = (0..3)
        .map(|_| lines[0].dequeue().unwrap().items())
        .collect();

    assert_eq!(served, vec![5, 10, 2]);
}

#[test]
fn large_basket_goes_to_unlimited_line() {
    let lines = lines(&[10, 1000]);
    for _ in 0..10 {
        lines[1].enqueue(Customer::arriving(20));
    }

    assert_eq!(queue_up(&lines, Customer::arriving(15)), Ok(1));
}

#[test]
fn tie_between_empty_equal_lines() {
    let lines = lines(&[1000, 1000]);

    assert_eq!(queue_up(&lines, Customer::arriving(3)), Ok(1));
    // Line 1 now has one customer, so line 0 is shortest.
    assert_eq!(queue_up(&lines, Customer::arriving(3)), Ok(0));
}

#[test]
fn small_baskets_balance_across_lines() {
    let lines = lines(&[15, 1000, 1000]);

    for _ in 0..9 {
        queue_up(&lines, Customer::arriving(5)).unwrap();
    }

    let lengths: Vec<_> = lines.iter().map(|l| l.len()).collect();
    assert_eq!(lengths, vec![3, 3, 3]);
}

#[test]
fn routing_ignores_history() {
    let lines = lines(&[10, 1000, 25]);
    lines[1].enqueue(Customer::arriving(40));
    lines[1].dequeue().unwrap();

    let snapshots: Vec<_> = lines.iter().map(|l| l.snapshot()).collect();

    // Line 1 once held a customer, but only current lengths matter.
    assert_eq!(choose_line(5, snapshots.clone()), Some(0));
    assert_eq!(choose_line(20, snapshots.clone()), Some(2));
    assert_eq!(choose_line(40, snapshots), Some(1));
}

use std::time::Duration;

use checkout_sim::{LineConfig, Store, StoreConfig, StoreState};
use futures::future::join_all;
use rstest::rstest;
use tokio::time::Instant;

use crate::{assert_elapsed, types::short_day};

#[tokio::test]
#[rstest]
#[timeout(Duration::from_secs(5))]
async fn every_customer_is_served_before_closing() {
    tokio::time::pause();

    let config = short_day(vec![
        LineConfig::express(10),
        LineConfig::unlimited(),
        LineConfig::unlimited(),
    ]);

    let start = Instant::now();
    let store = Store::open(config).unwrap();
    let observer = store.observer();

    let closed = {
        let observer = observer.clone();
        tokio_test::task::spawn(async move {
            observer.wait_for_closed().await;
        })
    };

    let report = store.run().await.unwrap();

    tokio::time::timeout(Duration::from_secs(1), closed)
        .await
        .expect("observer should see the store close");

    assert!(report.arrivals > 0);
    assert_eq!(report.served, report.arrivals);
    assert_eq!(report.turned_away, 0);
    assert!(report.understaffed.is_empty());
    assert_eq!(
        report.lines.iter().map(|l| l.served).sum::<usize>(),
        report.served
    );

    let snapshot = observer.snapshot();
    assert_eq!(snapshot.state, StoreState::Closed);
    assert_eq!(snapshot.registers_open, 0);
    assert!(snapshot.lines.iter().all(|l| l.length == 0));

    assert!(start.elapsed() >= Duration::from_secs(600));
}

#[tokio::test]
#[rstest]
#[timeout(Duration::from_secs(5))]
async fn no_customers_means_no_data() {
    tokio::time::pause();

    let config = StoreConfig::builder()
        .time_scale(1)
        .open_duration(Duration::from_secs(60))
        .arrival_chance(0.0)
        .build();

    let report = Store::open(config).unwrap().run().await.unwrap();

    assert_eq!(report.arrivals, 0);
    assert_eq!(report.served, 0);
    assert_eq!(report.waits, None);
    assert_eq!(report.longest_line, 0);
    assert!(report.to_string().contains("No customers were served"));
}

#[tokio::test]
#[rstest]
#[timeout(Duration::from_secs(5))]
async fn lines_only_shrink_once_closing() {
    tokio::time::pause();

    // One slow cashier, so there is a queue left at closing time.
    let config = StoreConfig::builder()
        .lines(vec![LineConfig::unlimited()])
        .time_scale(1)
        .open_duration(Duration::from_secs(300))
        .arrival_interval(Duration::from_secs(5))
        .arrival_chance(1.0)
        .item_time(Duration::from_secs(1))
        .payment_time(Duration::from_secs(10))
        .seed(99)
        .build();

    let store = Store::open(config).unwrap();
    let observer = store.observer();

    let watcher = tokio::spawn(async move {
        let mut lengths_at_close: Option<Vec<usize>> = None;

        loop {
            let snapshot = observer.snapshot();
            let lengths: Vec<_> = snapshot.lines.iter().map(|l| l.length).collect();

            match snapshot.state {
                StoreState::Open => {}
                StoreState::Closing => {
                    if let Some(previous) = &lengths_at_close {
                        for (now, before) in lengths.iter().zip(previous.iter()) {
                            assert!(now <= before, "a customer joined after closing");
                        }
                    }
                    lengths_at_close = Some(lengths);
                }
                StoreState::Closed => {
                    assert!(lengths.iter().all(|&l| l == 0));
                    return lengths_at_close;
                }
            }

            tokio::time::sleep(Duration::from_millis(500)).await;
        }
    });

    let report = store.run().await.unwrap();
    let lengths_at_close = watcher.await.unwrap().expect("should have seen the store closing");

    assert!(lengths_at_close[0] > 0, "queue should be left at closing");
    assert_eq!(report.served, report.arrivals);
    assert!(report.longest_line >= lengths_at_close[0]);
}

#[tokio::test]
#[rstest]
#[timeout(Duration::from_secs(5))]
async fn single_customer_day_takes_open_duration_plus_service() {
    tokio::time::pause();

    // Exactly one arrival opportunity, which always succeeds.
    let config = StoreConfig::builder()
        .lines(vec![LineConfig::unlimited()])
        .time_scale(1)
        .open_duration(Duration::from_secs(1))
        .arrival_interval(Duration::from_secs(1))
        .arrival_chance(1.0)
        .max_items(1)
        .item_time(Duration::from_secs(3))
        .payment_time(Duration::from_secs(7))
        .build();

    let start = Instant::now();
    let report = Store::open(config).unwrap().run().await.unwrap();

    assert_eq!(report.arrivals, 1);
    let waits = report.waits.expect("one customer was served");
    assert_eq!(waits.count, 1);
    assert_eq!(waits.max, Duration::ZERO);

    // Service takes 10s and starts straight away, so it outlasts the one second of opening.
    assert_elapsed!(start, Duration::from_secs(10), Duration::from_millis(2));
}

#[tokio::test]
#[rstest]
#[timeout(Duration::from_secs(5))]
async fn renderer_stops_when_store_closes() {
    tokio::time::pause();

    let store = Store::open(short_day(vec![LineConfig::unlimited()])).unwrap();
    let renderer = checkout_sim::Renderer::new(store.observer(), Vec::new()).spawn();

    store.run().await.unwrap();

    let out = renderer.await.unwrap().unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("Store: open"));
    assert!(text.contains("Store: closed"));
}

/// A display that has gone away.
struct BrokenPipe;

impl std::io::Write for BrokenPipe {
    fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
        Err(std::io::ErrorKind::BrokenPipe.into())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
#[rstest]
#[timeout(Duration::from_secs(5))]
async fn failed_renderer_does_not_lose_report() {
    tokio::time::pause();

    let store = Store::open(short_day(vec![LineConfig::unlimited()])).unwrap();
    let renderer = checkout_sim::Renderer::new(store.observer(), BrokenPipe).spawn();

    let report = store.run().await.unwrap();

    assert!(renderer.await.unwrap().is_err());
    assert_eq!(report.served, report.arrivals);
    assert!(report.to_string().starts_with("Customers: "));
}

#[tokio::test]
async fn invalid_config_is_rejected_before_opening() {
    let config = StoreConfig::builder()
        .lines(vec![LineConfig::express(10)])
        .build();

    let err = Store::open(config).err().expect("should be rejected");

    assert_eq!(err, checkout_sim::StoreError::NoEligibleLine { items: 60 });
}

#[tokio::test]
#[rstest]
#[timeout(Duration::from_secs(5))]
async fn stores_run_independently() {
    tokio::time::pause();

    let busy = short_day(vec![LineConfig::unlimited()]);
    let empty = StoreConfig::builder()
        .time_scale(1)
        .open_duration(Duration::from_secs(600))
        .arrival_chance(0.0)
        .build();

    let stores = vec![Store::open(busy).unwrap(), Store::open(empty).unwrap()];
    let reports = join_all(stores.into_iter().map(|store| store.run())).await;

    let busy = reports[0].as_ref().unwrap();
    let empty = reports[1].as_ref().unwrap();

    assert!(busy.served > 0);
    assert_eq!(busy.served, busy.arrivals);
    assert_eq!(empty.served, 0);
    assert_eq!(empty.lines.len(), 4);
}

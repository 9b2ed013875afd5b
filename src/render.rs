//! Live console view of the checkout lines.

use std::io::{self, Write};

use tokio::{task::JoinHandle, time::Duration};

use crate::store::{StoreObserver, StoreSnapshot, StoreState};

/// Periodically draws the store until it closes.
///
/// Only reads snapshots; never touches the lines themselves.
pub struct Renderer<W> {
    observer: StoreObserver,
    interval: Duration,
    out: W,
}

impl<W> Renderer<W>
where
    W: Write + Send + 'static,
{
    /// Draw `observer`'s store to `out`, at the store's configured render interval.
    pub fn new(observer: StoreObserver, out: W) -> Self {
        let interval = observer.render_interval();
        Self {
            observer,
            interval,
            out,
        }
    }

    /// Run the renderer in the background. The handle yields the writer back once the store
    /// has closed.
    pub fn spawn(self) -> JoinHandle<io::Result<W>> {
        tokio::spawn(self.run())
    }

    /// Draw a frame every interval, and a final one once the store has closed.
    pub async fn run(mut self) -> io::Result<W> {
        loop {
            let snapshot = self.observer.snapshot();
            draw(&snapshot, &mut self.out)?;

            if snapshot.state == StoreState::Closed {
                return Ok(self.out);
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = self.observer.wait_for_closed() => {}
            }
        }
    }
}

/// Draw one frame: the store status, then each line as a register followed by its customers.
pub fn draw(snapshot: &StoreSnapshot, out: &mut impl Write) -> io::Result<()> {
    // Clear the screen and move to the top left.
    write!(out, "\x1b[2J\x1b[H")?;

    writeln!(out, "Store: {}", snapshot.state)?;
    writeln!(out, "Registers Open: {}", snapshot.registers_open)?;

    for line in &snapshot.lines {
        writeln!(out)?;
        writeln!(out, "{}", if line.open { 'X' } else { '-' })?;
        writeln!(out, "{}", "0".repeat(line.length))?;
    }

    out.flush()
}

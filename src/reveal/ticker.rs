use crate::reveal::protocol::RevealTick;
use std::time::Duration;
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Shortest interval accepted by the ticker; `tokio::time::interval` rejects zero.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Spawn a task that emits `tick` every `period` until aborted or the receiver goes away.
///
/// The first tick fires one full period after spawning. Missed ticks are delayed rather than
/// bursted so a stalled loop does not receive a flood of catch-up ticks.
pub fn spawn_ticker(tick: RevealTick, period: Duration, tx: Sender<RevealTick>) -> JoinHandle<()> {
    let period = period.max(MIN_PERIOD);
    tokio::spawn(async move {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            if tx.send(tick).await.is_err() {
                break;
            }
        }
    })
}

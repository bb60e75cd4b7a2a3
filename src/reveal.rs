//! Timer adapter that drives reveal sessions.
//!
//! Each animating bubble gets its own ticker task. The driver keeps track of which ticker
//! belongs to which bubble so that starting a new session aborts the previous ticker before the
//! new session exists. Ticks that were already queued in the channel when a session was
//! replaced still arrive at the render loop; [`RevealDriver::apply`] recognises them by their
//! session id and turns them into no-ops.

pub mod protocol;
pub mod ticker;

pub use protocol::{BubbleId, RevealTick};

use crate::message::Sender;
use crate::session::{RenderSession, SessionId, TickOutcome};
use log::debug;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Capacity of the tick channel; tickers wait when the loop falls behind.
const TICK_CHANNEL_CAPACITY: usize = 64;

struct ActiveTicker {
    session: SessionId,
    handle: JoinHandle<()>,
}

/// Owns the ticker tasks for all animating bubbles.
pub struct RevealDriver {
    period: Duration,
    tick_tx: mpsc::Sender<RevealTick>,
    next_session: SessionId,
    tickers: HashMap<BubbleId, ActiveTicker>,
}

impl RevealDriver {
    pub fn new(period: Duration, tick_tx: mpsc::Sender<RevealTick>) -> Self {
        Self {
            period,
            tick_tx,
            next_session: 1,
            tickers: HashMap::new(),
        }
    }

    /// Create a driver together with the receiving end of its tick channel.
    pub fn channel(period: Duration) -> (Self, mpsc::Receiver<RevealTick>) {
        let (tx, rx) = mpsc::channel(TICK_CHANNEL_CAPACITY);
        (Self::new(period, tx), rx)
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Start a fresh session for `bubble`, cancelling whatever that bubble was revealing.
    ///
    /// Animating sessions spawn a ticker, so this must be called inside a tokio runtime when
    /// `animate` may be honoured.
    pub fn start(
        &mut self,
        bubble: BubbleId,
        message: Option<&str>,
        sender: Sender,
        animate: bool,
    ) -> RenderSession {
        self.cancel(bubble);

        let id = self.next_session;
        self.next_session += 1;
        let session = RenderSession::start(id, message, sender, animate);

        if !session.is_complete() {
            let tick = RevealTick {
                bubble,
                session: id,
            };
            let handle = ticker::spawn_ticker(tick, self.period, self.tick_tx.clone());
            self.tickers.insert(
                bubble,
                ActiveTicker {
                    session: id,
                    handle,
                },
            );
            debug!(
                "bubble {bubble}: session {id} revealing {} units every {:?}",
                session.len(),
                self.period
            );
        }

        session
    }

    /// Apply a tick to the bubble's current session, ignoring stale ticks.
    pub fn apply(&mut self, tick: RevealTick, session: &mut RenderSession) -> TickOutcome {
        if tick.session != session.id() {
            debug!(
                "bubble {}: dropping stale tick for session {} (current {})",
                tick.bubble,
                tick.session,
                session.id()
            );
            return TickOutcome::Idle;
        }

        let outcome = session.tick();
        if session.is_complete() {
            self.release(tick.bubble, session.id());
        }
        outcome
    }

    /// Reveal the rest of the session immediately and stop its ticker.
    pub fn skip(&mut self, bubble: BubbleId, session: &mut RenderSession) -> bool {
        let skipped = session.skip();
        self.release(bubble, session.id());
        skipped
    }

    /// Abort the ticker attached to `bubble`, if any.
    pub fn cancel(&mut self, bubble: BubbleId) -> bool {
        match self.tickers.remove(&bubble) {
            Some(active) => {
                active.handle.abort();
                debug!("bubble {bubble}: cancelled session {}", active.session);
                true
            }
            None => false,
        }
    }

    /// Number of tickers currently running.
    pub fn active_count(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_animating(&self, bubble: BubbleId) -> bool {
        self.tickers.contains_key(&bubble)
    }

    /// Abort every ticker.
    pub fn shutdown(&mut self) {
        for (_, active) in self.tickers.drain() {
            active.handle.abort();
        }
    }

    fn release(&mut self, bubble: BubbleId, session: SessionId) {
        let owned = self
            .tickers
            .get(&bubble)
            .is_some_and(|active| active.session == session);
        if owned {
            self.cancel(bubble);
        }
    }
}

impl Drop for RevealDriver {
    fn drop(&mut self) {
        self.shutdown();
    }
}

//! Messages exchanged between reveal tickers and the render loop.

use crate::session::SessionId;

/// Index of a bubble within the conversation view.
pub type BubbleId = usize;

/// Emitted by a ticker each time its interval elapses.
///
/// The render loop applies a tick only when `session` still matches the bubble's current
/// session; anything else is a leftover from a replaced session and is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealTick {
    pub bubble: BubbleId,
    pub session: SessionId,
}

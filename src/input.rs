//! Input handling subsystem.
//!
//! Terminal events are polled on a blocking thread, translated by a small state machine into
//! [`InputAction`]s and forwarded to the render loop over a tokio channel.

pub mod service;

pub use service::{
    spawn_input_thread, InputAction, InputService, InputStateMachine, ScrollDirection,
};

// Inputinfo Event Handling
// Host event loop integration for the device monitor

pub mod r#loop;

pub use r#loop::{EventLoop, EventLoopError, EventLoopResult, PollOutcome};

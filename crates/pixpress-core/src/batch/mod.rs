pub mod coordinator;
pub mod observer;

pub use coordinator::{BatchSummary, Coordinator, ProcessOutcome};
pub use observer::{BatchObserver, NoOpObserver};

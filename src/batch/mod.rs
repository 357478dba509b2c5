pub mod command;
pub mod consumer;
pub mod registry;
pub mod staging;

pub use command::{BatchCommand, BatchRunId};
pub use consumer::run_consumer;
pub use registry::BatchRunRegistry;

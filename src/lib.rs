pub mod batch;
pub mod config;
pub mod record;
pub mod service;
pub mod store;

pub use batch::command::BatchRunId;
pub use config::Config;
pub use record::Record;
pub use service::LastValueService;

pub mod status;
pub mod status_writer;

pub use status::{error_conditions, is_ready, observed_conditions};
pub use status_writer::{StatusWriter, WriteOutcome};

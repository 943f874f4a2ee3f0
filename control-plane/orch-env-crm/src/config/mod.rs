mod types;

pub use types::{CrmConfig, MigrationConfig, RetryPolicy, StatusWriteConfig};

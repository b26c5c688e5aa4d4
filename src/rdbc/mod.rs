pub mod connection;
pub mod pool;
pub mod value;

pub const DEFAULT_PROVIDER_NAME: &str = "default";

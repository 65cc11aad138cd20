pub mod discovery;

pub use discovery::{api_base, models_url, ConnectionProbeResult, DiscoveryError, ModelDiscoveryClient};

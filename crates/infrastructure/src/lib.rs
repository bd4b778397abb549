//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod fan_out_sweep_event_sink;
mod gcp_access_token;
mod gcp_secret_manager_store;
mod http_sweep_event_sink;
mod in_memory_secret_version_store;
mod tracing_sweep_event_sink;

pub use fan_out_sweep_event_sink::FanOutSweepEventSink;
pub use gcp_access_token::{AccessTokenSource, GcpAuthTokenSource, StaticAccessToken};
pub use gcp_secret_manager_store::{
    DEFAULT_SECRET_MANAGER_ENDPOINT, GcpSecretManagerConfig, GcpSecretManagerStore,
};
pub use http_sweep_event_sink::HttpSweepEventSink;
pub use in_memory_secret_version_store::{InMemorySecretVersionStore, RecordedMutation};
pub use tracing_sweep_event_sink::TracingSweepEventSink;

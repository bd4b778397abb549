//! Application services and ports.

#![forbid(unsafe_code)]

mod sweep_ports;
mod sweep_service;

pub use sweep_ports::{SecretVersionStore, SweepEvent, SweepEventKind, SweepEventSink};
pub use sweep_service::{
    ProjectSweepReport, SecretSweepReport, SecretSweepService, SkippedSecret, SweepConfig,
};

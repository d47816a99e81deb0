#![warn(rust_2018_idioms)]

pub mod adapter;
pub mod config;
pub mod domain;
pub mod enrich;
pub mod error;
pub mod pipeline;
pub mod port;
pub mod router;
pub mod telemetry;
pub mod test_support;

pub use domain::{Identity, Level, LogEvent, RequestContext};
pub use pipeline::{Pipeline, PipelineBuilder};
pub use router::SinkFilter;

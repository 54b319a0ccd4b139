//! Library side of the `datahub` command: configuration loading, logging
//! setup and the event pipeline that ties the crates together.

pub mod config;
pub mod logging;
pub mod pipeline;

//! Scrapes lobbying firm registration and financial activity records from
//! the CAL-ACCESS disclosure site into a single sorted JSON document.

pub mod apis;
pub mod config;
pub mod constants;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod parser;
pub mod pipeline;
pub mod queue;
pub mod types;

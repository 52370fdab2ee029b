pub mod config;
pub mod logging;

pub mod error;
pub mod fetch;
pub mod formula;
pub mod resolver;
pub mod spec;

pub mod api;
pub mod cli;
pub(crate) mod commands;
pub mod config;
mod connector;

pub use connector::Connector;

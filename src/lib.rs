pub mod client;
pub mod commands;
pub mod config;
pub mod fs;
pub mod models;
pub mod orchestrator;
pub mod schema;
pub mod validation;

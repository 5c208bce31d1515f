pub mod commands;
pub mod config;
pub mod data;
pub mod engine;
pub mod indicators;
pub mod models;
pub mod performance;
pub mod signals;
pub mod suggestions;

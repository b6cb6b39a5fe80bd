//! services/app/src/lib.rs

pub mod adapters;
pub mod cli;
pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod session;
pub mod state;

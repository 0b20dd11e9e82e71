//! Tile game server - a minimal remote command interpreter.
//!
//! This library exposes the core modules for use in integration tests.

pub mod cli;
pub mod commands;
pub mod config;
pub mod console;
pub mod error;
pub mod interpreter;
pub mod logging;
pub mod server;

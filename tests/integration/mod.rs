//! Integration tests for the tile game server.

pub mod binary_test;
pub mod console_test;
pub mod server_test;

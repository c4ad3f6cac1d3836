//! Server module for cmdterm
//!
//! # Module Structure
//!
//! - `config`: Configuration structures for the server, engine, REPL and logging
//! - `loader`: Configuration loading from files and environment
//! - `init`: HTTP server initialization and run loop

pub mod config;
mod init;
mod loader;

// Re-export public API
pub use init::run;
pub use loader::load_config;

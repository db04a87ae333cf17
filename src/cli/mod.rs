//! CLI module
//!
//! Command-line interface for poking at the API by hand.
//!
//! # Commands
//!
//! - `wsse` - Print a freshly signed `X-WSSE` header value
//! - `get` - GET an endpoint and print its `data`
//! - `post` - POST a JSON body and print the returned `data`

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;

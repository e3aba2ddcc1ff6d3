//! Debug Logger
//!
//! A toggleable debug logger that writes tagged records to one or more
//! destinations. The host owns a [`DebugLogger`] and passes it by reference;
//! while disabled every emission is a cheap no-op.

#![deny(rust_2018_idioms)]
#![warn(missing_docs)]

#[macro_use]
mod macros;

pub mod config;
pub mod error;
pub mod logger;

pub use config::DebugConfig;
pub use error::{DebugLogError, Result};
pub use logger::{CallSite, DebugLogger, Destination, Flags, Message, Options, SharedBuffer, Style, TAG};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

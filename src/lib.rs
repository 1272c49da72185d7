#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![doc = include_str!("../README.md")]

// Macro modules (must be declared before use)
#[macro_use]
pub mod logging;

pub mod credentials;
pub mod error;
pub mod net;

// Re-export commonly used types
#[doc(inline)]
pub use credentials::{Credentials, HOST, PASSWORD, SSID};
#[doc(inline)]
pub use error::{BoardError, Field, Result};
#[doc(inline)]
pub use net::{Host, Ipv4Addr, ServerEndpoint, DEFAULT_SERVER_PORT};

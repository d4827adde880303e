//! Core types, percent-encoding, and configuration for OAuth 1.0a.
//!
//! This crate provides the building blocks shared by OAuth signers and
//! servers: the [`Client`] and [`Token`] credentials (including the empty
//! [`Token::null`] used before a token exists), the RFC 3986 percent-encoder
//! every signature depends on, and the [`ServerConfig`] settings.

pub mod encoding;

mod config;
mod error;
mod types;

pub use config::{DEFAULT_TIMESTAMP_THRESHOLD, ServerConfig};
pub use error::{CoreError, CoreResult};
pub use types::{Client, Token, TokenType};

//! Core domain + application logic for the poll bot.
//!
//! This crate is framework-agnostic. Telegram lives behind the `MessagingPort`
//! trait implemented in the adapter crate; everything a chat room can do with a
//! poll goes through `PollStore`.

pub mod audit;
pub mod bot;
pub mod command;
pub mod config;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod messaging;
pub mod poll;
pub mod store;

pub use errors::{Error, PollError, Result};

//! # Command Handling
//!
//! The runtime is driven by JSON command lines standing in for OS callbacks,
//! chain events and user actions. Every command produces one [`Reply`].

pub mod commands;

pub use commands::{Command, CommandHandler, RegionOutline, Reply};

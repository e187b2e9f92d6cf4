#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
pub mod core;

pub use crate::core::bridge::{handle_command, CommandReply, CHANNEL};

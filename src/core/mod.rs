pub mod bridge;
pub mod config;
pub mod listener;
pub mod model;
pub mod platform;
pub mod presentation;
pub mod wake;

#[cfg(test)]
pub(crate) mod testing;

//! Dracula CLI library exports for testing

pub mod commands;
pub mod core;
pub mod remote;
pub mod tui;

#[cfg(test)]
pub mod test_support;

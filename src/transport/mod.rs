//! Terminal transport: command handlers and views

pub mod cli;
pub mod view;

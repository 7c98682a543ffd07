//! Single-list terminal to-do manager library.

pub mod app;
pub mod config;
pub mod store;
pub mod tasks;
pub mod ui;
pub mod worker;

#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod fetch;
pub mod logging;
pub mod markdown;
pub mod registry;
pub mod render;
pub mod resolve;
pub mod shell;
pub mod site;
pub mod theme;
pub mod view;

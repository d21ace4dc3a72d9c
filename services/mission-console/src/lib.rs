pub mod commands;
pub mod config;
pub mod console;
pub mod dev;
pub mod domain;
pub mod repository;

pub use commands::*;
pub use console::Session;
pub use domain::*;
pub use repository::*;

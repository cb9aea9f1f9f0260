//! Analysis configuration for the command line.
//!
//! Values are merged with the precedence CLI flags > `-S KEY=VALUE` > TOML
//! file > built-in defaults, then validated by the core config builder.

mod builder;
mod defaults;
mod file;
mod models;

pub use builder::build_config;
pub use models::AppConfig;

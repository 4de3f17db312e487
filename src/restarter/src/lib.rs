pub mod config;
pub mod controller;
pub mod model;
pub mod resources_logic;

pub use config::Config;
pub use controller::*;

#[cfg(test)]
pub mod fixtures;

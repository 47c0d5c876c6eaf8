//! Configuration management for the MFD resolver
//!
//! - **settings**: MfdConfig, the process configuration loaded once at startup
//! - **locations**: well-known folders under the user's Saved Games directory

pub mod locations;
pub mod settings;

pub use settings::MfdConfig;

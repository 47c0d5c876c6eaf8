//! MFD module resolver
//!
//! Loads cockpit module definitions, resolves every configuration node
//! against a registry of named display regions, and produces geometry,
//! file paths and hierarchy ready for a renderer.

pub mod cache;
pub mod config;
pub mod constants;
pub mod display;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod module;
pub mod paths;
pub mod report;

//! starship - terminal browser for hypermedia APIs
//!
//! Loads HAL or Siren resources, projects them into indexable view models
//! and follows their transitions.

pub mod app;
pub mod config;
pub mod event;
pub mod hyperdrive;
pub mod ui;
pub mod viewmodel;

/// Version injected at compile time via STARSHIP_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("STARSHIP_VERSION") {
    Some(v) => v,
    None => "dev",
};

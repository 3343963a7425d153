//! Climb detection and elevation-profile analysis for cycling routes.
//!
//! The library entry point is [`detect_climbs`]; the binary wraps it in a
//! small HTTP service (see [`routes`]).

pub mod config;
pub mod error;
pub mod pipeline;
pub mod routes;
pub mod state;
pub mod types;

pub use error::{AppError, ConfigError, ProfileError};
pub use pipeline::analyze::analyze;
pub use pipeline::detect::{detect_climbs, detect_climbs_unchecked, validate_samples};
pub use types::climb::{Climb, ClimbCategory, ClimbPoint, DetectionConfig, DetectionStrategy};
pub use types::profile::ElevationSample;

//! Build artifact harvesting for the Flutter step
//!
//! This crate locates build outputs under a working tree, drops artifacts
//! left over from previous runs, and copies each survivor into the deploy
//! directory under a collision-safe name.

pub mod clock;
pub mod collector;
pub mod error;
pub mod filter;
pub mod record;
pub mod resolver;

pub use clock::{Clock, SystemClock};
pub use collector::ArtifactCollector;
pub use error::{HarvestError, Result};
pub use filter::ArtifactFilter;
pub use record::DeployRecord;
pub use resolver::{split_name, DeployPathResolver};

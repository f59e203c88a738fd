//! CometAPI-hosted models: Sora and Veo video, Nanobanana and Seedream images.
//!
//! All four platforms authenticate with the same `cometapi` bearer key.

mod client;
pub mod config;
pub mod error;
pub mod image;
pub mod params;
pub mod video;

pub use config::CometApiConfig;
pub use image::CometImage;
pub use params::{CometImageParams, CometVideoParams, CometVideoQuery};
pub use video::{CometVideo, CometVideoStatus};

#[cfg(test)]
#[path = "../tests/cometapi_tests.rs"]
mod cometapi_tests;

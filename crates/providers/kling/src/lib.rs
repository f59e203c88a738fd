//! Kling video generation: image-to-video, text-to-video and task status.

pub mod auth;
pub mod config;
pub mod error;
pub mod params;
pub mod video;

pub use config::KlingConfig;
pub use params::{KlingImageToVideoParams, KlingTaskQuery, KlingTaskType, KlingTextToVideoParams};
pub use video::{KlingImageToVideo, KlingTaskStatus, KlingTextToVideo};

#[cfg(test)]
#[path = "../tests/kling_params_tests.rs"]
mod kling_params_tests;

#[cfg(test)]
#[path = "../tests/kling_adapter_tests.rs"]
mod kling_adapter_tests;

//! Typed Kling request parameters and their wire bodies.

use serde::Serialize;
use serde_json::{Map as JsonMap, Value};

use crate::gateway_core::error::GatewayError;
use crate::gateway_core::params::ParamReader;

pub const DEFAULT_MODEL: &str = "kling-v1";
pub const DEFAULT_DURATION: &str = "5";
pub const DEFAULT_MODE: &str = "std";
pub const DEFAULT_ASPECT_RATIO: &str = "16:9";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KlingImageToVideoParams {
    pub model_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_tail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cfg_scale: Option<f64>,
    pub mode: String,
    /// Seconds as a string (`"5"` or `"10"`).
    pub duration: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub static_mask: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic_masks: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_control: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
}

impl KlingImageToVideoParams {
    pub fn from_params(params: &JsonMap<String, Value>) -> Result<Self, GatewayError> {
        let p = ParamReader::new(params);
        let image = p.first_str("image")?;
        let image_tail = p.optional_str("image_tail")?;
        if image.is_none() && image_tail.is_none() {
            return Err(GatewayError::invalid_input(
                "`image` or `image_tail` is required",
            ));
        }
        Ok(Self {
            model_name: p.str_or("model_name", DEFAULT_MODEL)?,
            image,
            image_tail,
            prompt: p.optional_str("prompt")?,
            negative_prompt: p.optional_str("negative_prompt")?,
            cfg_scale: p.optional_f64("cfg_scale")?,
            mode: p.str_or("mode", DEFAULT_MODE)?,
            duration: p.str_or("duration", DEFAULT_DURATION)?,
            static_mask: p.optional_str("static_mask")?,
            dynamic_masks: p.non_empty_array("dynamic_masks")?,
            camera_control: p.non_empty_object("camera_control")?,
            callback_url: p.optional_str("callback_url")?,
        })
    }

    pub fn to_body(&self) -> Result<Value, GatewayError> {
        Ok(serde_json::to_value(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KlingTextToVideoParams {
    pub model_name: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cfg_scale: Option<f64>,
    pub mode: String,
    pub aspect_ratio: String,
    pub duration: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_control: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
}

impl KlingTextToVideoParams {
    pub fn from_params(params: &JsonMap<String, Value>) -> Result<Self, GatewayError> {
        let p = ParamReader::new(params);
        Ok(Self {
            model_name: p.str_or("model_name", DEFAULT_MODEL)?,
            prompt: p.required_str("prompt")?,
            negative_prompt: p.optional_str("negative_prompt")?,
            cfg_scale: p.optional_f64("cfg_scale")?,
            mode: p.str_or("mode", DEFAULT_MODE)?,
            aspect_ratio: p.str_or("aspect_ratio", DEFAULT_ASPECT_RATIO)?,
            duration: p.str_or("duration", DEFAULT_DURATION)?,
            camera_control: p.non_empty_object("camera_control")?,
            callback_url: p.optional_str("callback_url")?,
        })
    }

    pub fn to_body(&self) -> Result<Value, GatewayError> {
        Ok(serde_json::to_value(self)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KlingTaskType {
    ImageToVideo,
    TextToVideo,
}

impl KlingTaskType {
    pub fn path_segment(&self) -> &'static str {
        match self {
            KlingTaskType::ImageToVideo => "image2video",
            KlingTaskType::TextToVideo => "text2video",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "image2video" => Some(KlingTaskType::ImageToVideo),
            "text2video" => Some(KlingTaskType::TextToVideo),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KlingTaskQuery {
    pub task_id: String,
    pub task_type: KlingTaskType,
}

impl KlingTaskQuery {
    pub fn from_params(params: &JsonMap<String, Value>) -> Result<Self, GatewayError> {
        let p = ParamReader::new(params);
        let task_id = p.required_str("taskId")?;
        let task_type = match p.optional_str("taskType")? {
            None => KlingTaskType::ImageToVideo,
            Some(raw) => KlingTaskType::parse(&raw).ok_or_else(|| {
                GatewayError::invalid_input("`taskType` must be image2video or text2video")
            })?,
        };
        Ok(Self { task_id, task_type })
    }

    pub fn path(&self) -> String {
        format!(
            "/v1/videos/{}/{}",
            self.task_type.path_segment(),
            urlencoding::encode(&self.task_id)
        )
    }
}

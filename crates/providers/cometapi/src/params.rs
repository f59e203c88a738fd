//! Typed CometAPI request parameters.

use serde::Serialize;
use serde_json::{Map as JsonMap, Value};

use crate::gateway_core::error::GatewayError;
use crate::gateway_core::params::ParamReader;
use crate::gateway_core::transport::MultipartForm;

pub const SORA_DEFAULT_MODEL: &str = "sora-2";
pub const VEO_DEFAULT_MODEL: &str = "veo3-fast";
pub const NANOBANANA_DEFAULT_MODEL: &str = "gemini-2.5-flash-image";
pub const NANOBANANA_DEFAULT_SIZE: u32 = 1024;
pub const SEEDREAM_DEFAULT_MODEL: &str = "doubao-seedream-4-0-250828";
pub const SEEDREAM_DEFAULT_SIZE: u32 = 2048;

/// Video creation request, sent as multipart form data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CometVideoParams {
    pub model: String,
    pub prompt: String,
    pub seconds: Option<u32>,
    pub size: Option<(u32, u32)>,
}

impl CometVideoParams {
    /// Sora needs the duration and both dimensions.
    pub fn sora(params: &JsonMap<String, Value>) -> Result<Self, GatewayError> {
        let p = ParamReader::new(params);
        Ok(Self {
            model: p.str_or("model", SORA_DEFAULT_MODEL)?,
            prompt: p.required_str("prompt")?,
            seconds: Some(p.required_u32("duration")?),
            size: Some((p.required_u32("width")?, p.required_u32("height")?)),
        })
    }

    /// Veo only needs a prompt; size is sent when both dimensions are given.
    pub fn veo(params: &JsonMap<String, Value>) -> Result<Self, GatewayError> {
        let p = ParamReader::new(params);
        let width = p.optional_u32("width")?;
        let height = p.optional_u32("height")?;
        Ok(Self {
            model: p.str_or("model", VEO_DEFAULT_MODEL)?,
            prompt: p.required_str("prompt")?,
            seconds: p.optional_u32("duration")?,
            size: width.zip(height),
        })
    }

    pub fn to_form(&self) -> MultipartForm {
        let mut form = MultipartForm::new();
        form.push_text("model", self.model.as_str());
        form.push_text("prompt", self.prompt.as_str());
        if let Some(seconds) = self.seconds {
            form.push_text("seconds", seconds.to_string());
        }
        if let Some((width, height)) = self.size {
            form.push_text("size", format!("{width}x{height}"));
        }
        form
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CometVideoQuery {
    pub task_id: String,
}

impl CometVideoQuery {
    pub fn from_params(params: &JsonMap<String, Value>) -> Result<Self, GatewayError> {
        Ok(Self {
            task_id: ParamReader::new(params).required_str("taskId")?,
        })
    }

    pub fn path(&self) -> String {
        format!("/v1/videos/{}", urlencoding::encode(&self.task_id))
    }
}

/// Image generation request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CometImageParams {
    pub model: String,
    pub prompt: String,
    pub n: u32,
    pub size: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Vec<String>>,
}

impl CometImageParams {
    fn read(
        params: &JsonMap<String, Value>,
        default_model: &str,
        default_size: u32,
        with_references: bool,
    ) -> Result<Self, GatewayError> {
        let p = ParamReader::new(params);
        let width = p.u32_or("width", default_size)?;
        let height = p.u32_or("height", default_size)?;
        Ok(Self {
            model: p.str_or("model", default_model)?,
            prompt: p.required_str("prompt")?,
            n: p.u32_or("n", 1)?,
            size: format!("{width}x{height}"),
            image: if with_references {
                p.non_empty_str_array("image")?
            } else {
                None
            },
        })
    }

    pub fn nanobanana(params: &JsonMap<String, Value>) -> Result<Self, GatewayError> {
        Self::read(params, NANOBANANA_DEFAULT_MODEL, NANOBANANA_DEFAULT_SIZE, false)
    }

    /// Seedream also accepts reference image URLs.
    pub fn seedream(params: &JsonMap<String, Value>) -> Result<Self, GatewayError> {
        Self::read(params, SEEDREAM_DEFAULT_MODEL, SEEDREAM_DEFAULT_SIZE, true)
    }

    pub fn to_body(&self) -> Result<Value, GatewayError> {
        Ok(serde_json::to_value(self)?)
    }
}

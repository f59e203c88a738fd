//! Typed reads over the untyped `{...params}` object of a generation request.
//!
//! Rules shared by every adapter:
//! 1) Absent keys, `null` and blank strings count as unset.
//! 2) Defaults fill unset keys only; explicit values always win.
//! 3) A set value of the wrong JSON type is a client input error.
//! 4) Structured extras (arrays/objects) are only returned when non-empty.

use serde_json::{Map as JsonMap, Value};

use crate::core::error::GatewayError;
use crate::core::json::is_empty_value;

#[derive(Debug, Clone, Copy)]
pub struct ParamReader<'a> {
    params: &'a JsonMap<String, Value>,
}

fn wrong_type(key: &str, expected: &str) -> GatewayError {
    GatewayError::invalid_input(format!("`{key}` must be {expected}"))
}

fn required(key: &str) -> GatewayError {
    GatewayError::invalid_input(format!("`{key}` is required"))
}

impl<'a> ParamReader<'a> {
    pub fn new(params: &'a JsonMap<String, Value>) -> Self {
        Self { params }
    }

    /// Raw value for `key` when it is set.
    pub fn value(&self, key: &str) -> Option<&'a Value> {
        match self.params.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.trim().is_empty() => None,
            Some(v) => Some(v),
        }
    }

    pub fn is_set(&self, key: &str) -> bool {
        self.value(key).is_some()
    }

    pub fn optional_str(&self, key: &str) -> Result<Option<String>, GatewayError> {
        match self.value(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
            Some(_) => Err(wrong_type(key, "a string")),
        }
    }

    pub fn required_str(&self, key: &str) -> Result<String, GatewayError> {
        self.optional_str(key)?.ok_or_else(|| required(key))
    }

    pub fn str_or(&self, key: &str, default: &str) -> Result<String, GatewayError> {
        Ok(self
            .optional_str(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// A string, or the first string of an array of strings.
    pub fn first_str(&self, key: &str) -> Result<Option<String>, GatewayError> {
        match self.value(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
            Some(Value::Array(items)) => match items.first() {
                None => Ok(None),
                Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
                Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
                Some(Value::Null) => Ok(None),
                Some(_) => Err(wrong_type(key, "a string or an array of strings")),
            },
            Some(_) => Err(wrong_type(key, "a string or an array of strings")),
        }
    }

    pub fn optional_u32(&self, key: &str) -> Result<Option<u32>, GatewayError> {
        match self.value(key) {
            None => Ok(None),
            Some(Value::Number(n)) => n
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .filter(|v| *v > 0)
                .map(Some)
                .ok_or_else(|| wrong_type(key, "a positive integer")),
            Some(_) => Err(wrong_type(key, "a positive integer")),
        }
    }

    pub fn required_u32(&self, key: &str) -> Result<u32, GatewayError> {
        self.optional_u32(key)?.ok_or_else(|| required(key))
    }

    pub fn u32_or(&self, key: &str, default: u32) -> Result<u32, GatewayError> {
        Ok(self.optional_u32(key)?.unwrap_or(default))
    }

    pub fn optional_f64(&self, key: &str) -> Result<Option<f64>, GatewayError> {
        match self.value(key) {
            None => Ok(None),
            Some(Value::Number(n)) => n.as_f64().map(Some).ok_or_else(|| wrong_type(key, "a number")),
            Some(_) => Err(wrong_type(key, "a number")),
        }
    }

    /// Array for `key`, only when it has at least one non-empty element.
    pub fn non_empty_array(&self, key: &str) -> Result<Option<Vec<Value>>, GatewayError> {
        match self.value(key) {
            None => Ok(None),
            Some(Value::Array(items)) => {
                let kept: Vec<Value> = items
                    .iter()
                    .filter(|v| !is_empty_value(v))
                    .cloned()
                    .collect();
                Ok(if kept.is_empty() { None } else { Some(kept) })
            }
            Some(_) => Err(wrong_type(key, "an array")),
        }
    }

    /// Array of strings for `key`, blanks dropped; `None` when nothing remains.
    pub fn non_empty_str_array(&self, key: &str) -> Result<Option<Vec<String>>, GatewayError> {
        let Some(items) = self.non_empty_array(key)? else {
            return Ok(None);
        };
        items
            .into_iter()
            .map(|v| match v {
                Value::String(s) => Ok(s.trim().to_string()),
                _ => Err(wrong_type(key, "an array of strings")),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    /// Object for `key`, only when it has at least one entry.
    pub fn non_empty_object(&self, key: &str) -> Result<Option<Value>, GatewayError> {
        match self.value(key) {
            None => Ok(None),
            Some(v @ Value::Object(map)) => Ok(if map.is_empty() { None } else { Some(v.clone()) }),
            Some(_) => Err(wrong_type(key, "an object")),
        }
    }
}

#[cfg(test)]
#[path = "../tests/params_tests.rs"]
mod params_tests;

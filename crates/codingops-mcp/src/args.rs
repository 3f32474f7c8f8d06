//! Typed access to a tool call's argument bag.
//!
//! Lookups try the exact key first and fall back to a case-insensitive
//! match, so `ref`, `Ref` and `REF` all address the same argument.

use std::str::FromStr;

use codingops_core::{Error, Result, UnknownVariant};
use serde_json::{Map, Value};

#[derive(Debug, Default)]
pub struct Args {
    map: Map<String, Value>,
}

impl Args {
    pub fn from_value(value: Option<Value>) -> Result<Self> {
        match value {
            None | Some(Value::Null) => Ok(Self::default()),
            Some(Value::Object(map)) => Ok(Self { map }),
            Some(_) => Err(Error::InvalidParams(
                "arguments must be a JSON object".to_string(),
            )),
        }
    }

    fn get(&self, name: &str) -> Option<&Value> {
        self.map
            .get(name)
            .or_else(|| {
                self.map
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(name))
                    .map(|(_, value)| value)
            })
            .filter(|value| !value.is_null())
    }

    pub fn required_str(&self, name: &str) -> Result<String> {
        match self.get(name) {
            None => Err(missing(name)),
            Some(Value::String(s)) if s.trim().is_empty() => {
                Err(Error::InvalidParams(format!("{} must not be empty", name)))
            }
            Some(Value::String(s)) => Ok(s.clone()),
            Some(_) => Err(Error::InvalidParams(format!("{} must be a string", name))),
        }
    }

    /// Optional string; an empty string counts as absent.
    pub fn optional_str(&self, name: &str) -> Result<Option<String>> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::String(s)) if s.is_empty() => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(Error::InvalidParams(format!("{} must be a string", name))),
        }
    }

    /// Required text that may be empty, such as a description.
    pub fn required_text(&self, name: &str) -> Result<String> {
        match self.get(name) {
            None => Err(missing(name)),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(_) => Err(Error::InvalidParams(format!("{} must be a string", name))),
        }
    }

    pub fn required_u64(&self, name: &str) -> Result<u64> {
        self.optional_u64(name)?.ok_or_else(|| missing(name))
    }

    /// Accepts non-negative integers and numeric strings.
    pub fn optional_u64(&self, name: &str) -> Result<Option<u64>> {
        let Some(value) = self.get(name) else {
            return Ok(None);
        };
        let parsed = match value {
            Value::Number(n) => n.as_u64(),
            Value::String(s) if s.trim().is_empty() => return Ok(None),
            Value::String(s) => s.trim().parse::<u64>().ok(),
            _ => None,
        };
        parsed.map(Some).ok_or_else(|| {
            Error::InvalidParams(format!("{} must be a non-negative integer", name))
        })
    }

    pub fn optional_u32(&self, name: &str) -> Result<Option<u32>> {
        match self.optional_u64(name)? {
            None => Ok(None),
            Some(n) => u32::try_from(n)
                .map(Some)
                .map_err(|_| Error::InvalidParams(format!("{} is out of range", name))),
        }
    }

    /// Positive page-style number (page number, page size, limit).
    pub fn optional_positive_u32(&self, name: &str) -> Result<Option<u32>> {
        match self.optional_u32(name)? {
            Some(0) => Err(Error::InvalidParams(format!("{} must be at least 1", name))),
            other => Ok(other),
        }
    }

    pub fn required_enum<T>(&self, name: &str) -> Result<T>
    where
        T: FromStr<Err = UnknownVariant>,
    {
        self.optional_enum(name)?.ok_or_else(|| missing(name))
    }

    pub fn optional_enum<T>(&self, name: &str) -> Result<Option<T>>
    where
        T: FromStr<Err = UnknownVariant>,
    {
        match self.optional_str(name)? {
            None => Ok(None),
            Some(raw) => raw
                .parse::<T>()
                .map(Some)
                .map_err(|e| Error::InvalidParams(format!("{}: {}", name, e))),
        }
    }

    /// `"0"`/`"1"`, `0`/`1` or a boolean.
    pub fn required_flag(&self, name: &str) -> Result<bool> {
        match self.get(name) {
            None => Err(missing(name)),
            Some(Value::Bool(b)) => Ok(*b),
            Some(Value::String(s)) if s == "1" => Ok(true),
            Some(Value::String(s)) if s == "0" => Ok(false),
            Some(Value::Number(n)) if n.as_u64() == Some(1) => Ok(true),
            Some(Value::Number(n)) if n.as_u64() == Some(0) => Ok(false),
            Some(_) => Err(Error::InvalidParams(format!("{} must be \"0\" or \"1\"", name))),
        }
    }

    pub fn required_array(&self, name: &str) -> Result<&[Value]> {
        match self.get(name) {
            None => Err(missing(name)),
            Some(Value::Array(items)) => Ok(items.as_slice()),
            Some(_) => Err(Error::InvalidParams(format!("{} must be an array", name))),
        }
    }
}

fn missing(name: &str) -> Error {
    Error::InvalidParams(format!("{} is required", name))
}

//! Province, city and district lookups for address forms.
//!
//! These endpoints are not consistent about their envelope: the list may sit
//! under `content.result`, directly under `content`/`data`, or be the body
//! itself. All three shapes are accepted.

use serde_json::Value;

use crate::cache::REFERENCE_TTL;
use crate::endpoint::Endpoint;
use crate::error::ApiError;
use crate::http::{ApiClient, Payload};
use crate::types::{Place, decode};

fn place_list(endpoint: &'static str, body: Value) -> Result<Vec<Place>, ApiError> {
    let list = match body {
        Value::Array(_) => body,
        Value::Object(mut map) => {
            let inner = map.remove("content").or_else(|| map.remove("data")).unwrap_or(Value::Null);
            match inner {
                Value::Object(mut content) => content.remove("result").unwrap_or(Value::Null),
                other => other,
            }
        }
        _ => Value::Null,
    };
    if list.is_null() {
        return Ok(Vec::new());
    }
    decode(endpoint, list)
}

fn require(field: &str, value: &str) -> Result<String, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::Validation(format!("{field} is required")));
    }
    Ok(value.to_owned())
}

impl ApiClient {
    /// # Errors
    ///
    /// Transport, business and decode errors.
    pub async fn provinces(&self) -> Result<Vec<Place>, ApiError> {
        self.places(Endpoint::Provinces).await
    }

    /// # Errors
    ///
    /// Validation, transport, business and decode errors.
    pub async fn cities(&self, province_id: &str) -> Result<Vec<Place>, ApiError> {
        self.places(Endpoint::Cities(require("province id", province_id)?)).await
    }

    /// # Errors
    ///
    /// Validation, transport, business and decode errors.
    pub async fn districts(&self, city_id: &str) -> Result<Vec<Place>, ApiError> {
        self.places(Endpoint::Districts(require("city id", city_id)?)).await
    }

    async fn places(&self, endpoint: Endpoint) -> Result<Vec<Place>, ApiError> {
        let body = self.execute_cached(&endpoint, Payload::Empty, REFERENCE_TTL).await?;
        place_list(endpoint.name(), body)
    }
}

#[cfg(test)]
#[path = "locations_test.rs"]
mod tests;

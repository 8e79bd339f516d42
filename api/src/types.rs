//! Request and response schemas for the supplier API.
//!
//! DESIGN
//! ======
//! The server is loose about scalar types: ids and prices arrive as numbers
//! or strings depending on the endpoint. Each response is parsed into an
//! explicit struct at the boundary; the lenient helpers below accept both
//! spellings so callers only ever see one type per field.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use session::UserIdentity;

use crate::error::ApiError;

// =============================================================================
// LENIENT SCALARS
// =============================================================================

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn string_from_scalar<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    scalar_to_string(value).ok_or_else(|| D::Error::custom("expected string or number"))
}

fn opt_string_from_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(scalar_to_string))
}

fn opt_f64_from_scalar<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("expected number, got `{s}`"))),
        Some(other) => Err(D::Error::custom(format!("expected number, got {other}"))),
    }
}

fn opt_i64_from_scalar<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_i64()),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("expected integer, got `{s}`"))),
        Some(other) => Err(D::Error::custom(format!("expected integer, got {other}"))),
    }
}

// =============================================================================
// ENVELOPES
// =============================================================================

/// `{"content": T}`. Some endpoints say `data` instead.
#[derive(Clone, Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(alias = "data")]
    pub content: T,
}

/// `{"result": [T] | null}`; `null` is an empty list.
#[derive(Clone, Debug, Deserialize)]
pub struct ResultList<T> {
    pub result: Option<Vec<T>>,
}

impl<T> Default for ResultList<T> {
    fn default() -> Self {
        Self { result: None }
    }
}

impl<T> ResultList<T> {
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.result.unwrap_or_default()
    }
}

/// Parse a response body into `T`, naming the endpoint on failure.
pub(crate) fn decode<T>(endpoint: &'static str, value: Value) -> Result<T, ApiError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_value(value).map_err(|e| ApiError::decode(endpoint, &e))
}

/// Parse an acknowledgement; an empty body acknowledges nothing in particular.
pub(crate) fn decode_ack(endpoint: &'static str, value: Value) -> Result<ApiAck, ApiError> {
    if value.is_null() {
        return Ok(ApiAck::default());
    }
    decode(endpoint, value)
}

/// Loose acknowledgement returned by the mutating endpoints.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct ApiAck {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, deserialize_with = "opt_i64_from_scalar")]
    pub status: Option<i64>,
    #[serde(default)]
    pub content: Option<Value>,
}

// =============================================================================
// AUTH
// =============================================================================

fn require(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(format!("{field} is required")));
    }
    Ok(())
}

const MIN_PASSWORD_LEN: usize = 6;

fn require_password(field: &str, value: &str) -> Result<(), ApiError> {
    require(field, value)?;
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::Validation(format!("{field} must be at least {MIN_PASSWORD_LEN} characters")));
    }
    Ok(())
}

#[derive(Clone, Debug, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    /// Always empty; the server requires the key.
    pub device: String,
}

impl LoginRequest {
    #[must_use]
    pub fn new(username: &str, password: &str) -> Self {
        Self { username: username.trim().to_owned(), password: password.to_owned(), device: String::new() }
    }

    pub(crate) fn validate(&self) -> Result<(), ApiError> {
        require("username", &self.username)?;
        require("password", &self.password)
    }
}

/// Content of a login response.
#[derive(Clone, Debug, Deserialize)]
pub struct LoginContent {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default, deserialize_with = "opt_i64_from_scalar")]
    pub status: Option<i64>,
    #[serde(default, deserialize_with = "opt_string_from_scalar")]
    pub userid: Option<String>,
    #[serde(default, deserialize_with = "opt_i64_from_scalar")]
    pub log: Option<i64>,
}

impl LoginContent {
    /// The issued credential, if the server accepted the login.
    #[must_use]
    pub fn accepted_token(&self) -> Option<session::Credential> {
        if self.status != Some(1) {
            return None;
        }
        self.token.clone().and_then(session::Credential::new)
    }
}

/// Content of the decode-token response.
#[derive(Clone, Debug, Deserialize)]
pub struct DecodedToken {
    #[serde(deserialize_with = "string_from_scalar")]
    pub userid: String,
    pub username: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "opt_string_from_scalar")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "opt_i64_from_scalar")]
    pub log: Option<i64>,
}

impl From<DecodedToken> for UserIdentity {
    fn from(token: DecodedToken) -> Self {
        Self { id: token.userid, name: token.name, email: token.username, phone: token.phone.unwrap_or_default(), verified: true }
    }
}

/// Supplier registration form. Sent form-encoded.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Contact person.
    pub cp: String,
    pub npwp: String,
    pub address: String,
    pub shipping_province: String,
    pub shipping_city: String,
    pub shipping_district: String,
    pub zip: String,
    pub phone1: String,
    pub phone2: String,
    pub email: String,
    pub password: String,
    pub acc_name: String,
    pub acc_no: String,
    pub acc_bank: String,
}

impl RegisterRequest {
    pub(crate) fn validate(&self) -> Result<(), ApiError> {
        require("name", &self.name)?;
        require("phone1", &self.phone1)?;
        require("email", &self.email)?;
        require_password("password", &self.password)
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct RequestOtpRequest {
    pub username: String,
}

/// Reset a forgotten password with the OTP sent to `username`.
#[derive(Clone, Debug, Serialize)]
pub struct ForgotPasswordRequest {
    pub username: String,
    pub new_password: String,
    pub otp: String,
}

impl ForgotPasswordRequest {
    pub(crate) fn validate(&self) -> Result<(), ApiError> {
        require("username", &self.username)?;
        require("otp", &self.otp)?;
        require_password("new_password", &self.new_password)
    }
}

#[derive(Clone, Debug)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

impl ChangePasswordRequest {
    pub(crate) fn validate(&self) -> Result<(), ApiError> {
        require("old_password", &self.old_password)?;
        require_password("new_password", &self.new_password)
    }

    pub(crate) fn form(&self) -> Vec<(&'static str, String)> {
        vec![("old_pass", self.old_password.clone()), ("new_pass", self.new_password.clone())]
    }
}

/// Supplier profile as returned by `supplier/get`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Supplier {
    #[serde(deserialize_with = "string_from_scalar")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, deserialize_with = "opt_string_from_scalar")]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

// =============================================================================
// PRODUCTS
// =============================================================================

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Product {
    #[serde(deserialize_with = "string_from_scalar")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "opt_string_from_scalar")]
    pub sku: Option<String>,
    #[serde(default, deserialize_with = "opt_f64_from_scalar")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "opt_i64_from_scalar")]
    pub stock: Option<i64>,
    #[serde(default, deserialize_with = "opt_string_from_scalar")]
    pub category: Option<String>,
    #[serde(default)]
    pub shortdesc: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "opt_f64_from_scalar")]
    pub weight: Option<f64>,
    #[serde(default, deserialize_with = "opt_i64_from_scalar")]
    pub status: Option<i64>,
    #[serde(default, deserialize_with = "opt_f64_from_scalar")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "opt_string_from_scalar")]
    pub restricted: Option<String>,
    #[serde(default, deserialize_with = "opt_string_from_scalar")]
    pub period: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub url1: Option<String>,
    #[serde(default)]
    pub url2: Option<String>,
    #[serde(default)]
    pub url3: Option<String>,
    #[serde(default)]
    pub url4: Option<String>,
    #[serde(default)]
    pub url5: Option<String>,
    #[serde(default)]
    pub url6: Option<String>,
}

impl Product {
    /// Main image followed by the gallery slots, skipping empty ones.
    #[must_use]
    pub fn images(&self) -> Vec<&str> {
        [&self.image, &self.url1, &self.url2, &self.url3, &self.url4, &self.url5, &self.url6]
            .into_iter()
            .filter_map(|u| u.as_deref())
            .filter(|u| !u.trim().is_empty())
            .collect()
    }

    /// Published products have status 1.
    #[must_use]
    pub fn is_published(&self) -> bool {
        self.status == Some(1)
    }
}

/// Sort direction accepted by the listing endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Body of the product listing call.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProductQuery {
    pub limit: u32,
    pub offset: u32,
    pub orderby: String,
    pub order: SortOrder,
    pub category: String,
    /// Comma-separated city names.
    pub location: String,
    pub condition: String,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            limit: 30,
            offset: 0,
            orderby: String::new(),
            order: SortOrder::Asc,
            category: String::new(),
            location: String::new(),
            condition: String::new(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct SearchQuery {
    pub filter: String,
}

/// Product fields a supplier edits. Absent fields are omitted from the body.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortdesc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restricted: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
}

impl ProductDraft {
    pub(crate) fn validate(&self) -> Result<(), ApiError> {
        require("name", &self.name)?;
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(ApiError::Validation("price must be a non-negative number".to_owned()));
        }
        if self.stock.is_some_and(|s| s < 0) {
            return Err(ApiError::Validation("stock must not be negative".to_owned()));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        let id = pick(&raw, &["id", "category_id"]).unwrap_or_default();
        let name = pick(&raw, &["name", "category_name", "title"]).unwrap_or_else(|| "Unknown category".to_owned());
        Ok(Self { id, name })
    }
}

/// City a product ships from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProductCity {
    pub name: String,
}

impl<'de> Deserialize<'de> for ProductCity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        Ok(Self { name: pick(&raw, &["name", "city_name"]).unwrap_or_else(|| "Unknown city".to_owned()) })
    }
}

/// First non-empty scalar among `keys`.
fn pick(raw: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| raw.get(*k).cloned().and_then(scalar_to_string))
        .find(|s| !s.trim().is_empty())
}

// =============================================================================
// ORDERS
// =============================================================================

/// Body of the order listing call. The server wants every field as a string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OrderQuery {
    pub limit: String,
    pub offset: String,
    pub start: String,
    pub end: String,
    pub sent: String,
    pub delivered: String,
    pub paid: String,
}

impl Default for OrderQuery {
    fn default() -> Self {
        Self {
            limit: "120".into(),
            offset: "0".into(),
            start: String::new(),
            end: String::new(),
            sent: String::new(),
            delivered: String::new(),
            paid: String::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Order {
    #[serde(deserialize_with = "string_from_scalar")]
    pub id: String,
    #[serde(default, alias = "created")]
    pub order_date: Option<String>,
    #[serde(default, alias = "product_name")]
    pub name: Option<String>,
    #[serde(default, alias = "price", deserialize_with = "opt_f64_from_scalar")]
    pub total: Option<f64>,
    #[serde(default, deserialize_with = "opt_i64_from_scalar")]
    pub sent: Option<i64>,
    #[serde(default, deserialize_with = "opt_i64_from_scalar")]
    pub delivered: Option<i64>,
    #[serde(default, deserialize_with = "opt_i64_from_scalar")]
    pub paid: Option<i64>,
    #[serde(default)]
    pub awb: Option<String>,
}

/// Content of the order listing response.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct OrderPage {
    #[serde(default)]
    pub result: Option<Vec<Order>>,
    #[serde(default, deserialize_with = "opt_i64_from_scalar")]
    pub total_orders: Option<i64>,
    #[serde(default, deserialize_with = "opt_f64_from_scalar")]
    pub total_outstanding: Option<f64>,
    #[serde(default, deserialize_with = "opt_i64_from_scalar")]
    pub record: Option<i64>,
}

impl OrderPage {
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        self.result.as_deref().unwrap_or_default()
    }
}

// =============================================================================
// LOCATIONS
// =============================================================================

/// Province, city or district: an id and a display name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Place {
    pub id: String,
    pub name: String,
}

impl<'de> Deserialize<'de> for Place {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        let id = pick(&raw, &["id", "province_id", "city_id", "district_id", "subdistrict_id"])
            .ok_or_else(|| D::Error::custom("location without id"))?;
        let name = pick(&raw, &["name", "province", "city_name", "city", "district_name", "subdistrict_name"])
            .unwrap_or_else(|| id.clone());
        Ok(Self { id, name })
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;

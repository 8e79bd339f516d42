//! Endpoint table for the supplier API.
//!
//! Paths are relative to the configured base URL. Dynamic segments (ids,
//! OTP codes) are appended as separate path segments so they are escaped by
//! the URL builder instead of being spliced into a string.

use reqwest::Method;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    // Auth
    Login,
    Register,
    /// Reset a forgotten password with an OTP.
    ForgotPassword,
    RequestOtp,
    VerifyOtp { user_id: String, otp: String },
    ChangePassword,
    Profile,
    Logout,
    DecodeToken,

    // Products
    ProductList,
    ProductGet(String),
    ProductSearch,
    ProductCategories,
    ProductCities,
    ProductAdd,
    ProductUpdate(String),
    ProductAddImage(String),
    ProductPublish(String),

    // Orders
    OrderList,
    OrderSetAwb(String),

    // Locations
    Provinces,
    Cities(String),
    Districts(String),
}

impl Endpoint {
    /// Short stable name for logs and errors.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Register => "register",
            Self::ForgotPassword => "forgot_password",
            Self::RequestOtp => "request_otp",
            Self::VerifyOtp { .. } => "verify_otp",
            Self::ChangePassword => "change_password",
            Self::Profile => "profile",
            Self::Logout => "logout",
            Self::DecodeToken => "decode_token",
            Self::ProductList => "product_list",
            Self::ProductGet(_) => "product_get",
            Self::ProductSearch => "product_search",
            Self::ProductCategories => "product_categories",
            Self::ProductCities => "product_cities",
            Self::ProductAdd => "product_add",
            Self::ProductUpdate(_) => "product_update",
            Self::ProductAddImage(_) => "product_add_image",
            Self::ProductPublish(_) => "product_publish",
            Self::OrderList => "order_list",
            Self::OrderSetAwb(_) => "order_set_awb",
            Self::Provinces => "provinces",
            Self::Cities(_) => "cities",
            Self::Districts(_) => "districts",
        }
    }

    #[must_use]
    pub fn method(&self) -> Method {
        match self {
            Self::VerifyOtp { .. }
            | Self::Profile
            | Self::Logout
            | Self::DecodeToken
            | Self::ProductGet(_)
            | Self::ProductCategories
            | Self::ProductCities
            | Self::ProductPublish(_)
            | Self::Provinces
            | Self::Cities(_)
            | Self::Districts(_) => Method::GET,
            Self::ProductUpdate(_) => Method::PUT,
            Self::Login
            | Self::Register
            | Self::ForgotPassword
            | Self::RequestOtp
            | Self::ChangePassword
            | Self::ProductList
            | Self::ProductSearch
            | Self::ProductAdd
            | Self::ProductAddImage(_)
            | Self::OrderList
            | Self::OrderSetAwb(_) => Method::POST,
        }
    }

    /// Path segments below the base URL. An empty final segment yields a
    /// trailing slash.
    #[must_use]
    pub fn segments(&self) -> Vec<&str> {
        match self {
            Self::Login => vec!["supplier", "login"],
            Self::Register => vec!["supplier", "add"],
            Self::ForgotPassword => vec!["supplier", "forgot"],
            Self::RequestOtp => vec!["supplier", "req_otp"],
            Self::VerifyOtp { user_id, otp } => vec!["supplier", "verify", user_id.as_str(), otp.as_str()],
            Self::ChangePassword => vec!["supplier", "change_password"],
            Self::Profile => vec!["supplier", "get"],
            Self::Logout => vec!["supplier", "logout"],
            Self::DecodeToken => vec!["supplier", "decode_token"],
            Self::ProductList => vec!["product", ""],
            Self::ProductGet(id) => vec!["product", "get", id.as_str()],
            Self::ProductSearch => vec!["product", "search"],
            Self::ProductCategories => vec!["product", "category"],
            Self::ProductCities => vec!["product", "city_product"],
            Self::ProductAdd => vec!["product", "add"],
            Self::ProductUpdate(id) => vec!["product", "update", id.as_str()],
            Self::ProductAddImage(id) => vec!["product", "add_image", id.as_str()],
            Self::ProductPublish(id) => vec!["product", "publish", id.as_str()],
            Self::OrderList => vec!["order", "get"],
            Self::OrderSetAwb(id) => vec!["order", "set_awb", id.as_str()],
            Self::Provinces => vec!["city", "get_province_rj"],
            Self::Cities(province_id) => vec!["city", "get_city_rj", province_id.as_str()],
            Self::Districts(city_id) => vec!["city", "get_district_rj", city_id.as_str()],
        }
    }

    /// Relative path, for logs and cache keys.
    #[must_use]
    pub fn path(&self) -> String {
        self.segments().join("/")
    }

    /// Endpoints of the unauthenticated password-reset/OTP flows. A 401 from
    /// these is a business answer (wrong or expired code), not a dead session.
    #[must_use]
    pub fn is_session_exempt(&self) -> bool {
        matches!(self, Self::ForgotPassword | Self::RequestOtp | Self::VerifyOtp { .. })
    }
}

#[cfg(test)]
#[path = "endpoint_test.rs"]
mod tests;

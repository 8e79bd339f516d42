//! Route table: every view of the supplier client and how it is guarded.

use crate::LANDING_PATH;
use crate::guards::{self, FlowRequirement, GuardDecision};
use crate::navigation::FlowContext;
use crate::state::SessionSnapshot;

/// Context keys handed over by the registration and forgot-password screens.
pub const FLOW_PHONE: &str = "phone";
pub const FLOW_USER_ID: &str = "userId";

const VERIFICATION_FLOW: FlowRequirement = FlowRequirement { required: &[FLOW_PHONE, FLOW_USER_ID], entry: "/register" };
const RESET_PASSWORD_FLOW: FlowRequirement = FlowRequirement { required: &[FLOW_PHONE], entry: "/forgot-password" };

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Verification,
    ForgotPassword,
    ResetPassword,
    Dashboard,
    Products,
    CreateProduct,
    ProductDetail(String),
    EditProduct(String),
    Orders,
    Profile,
}

/// Guard applied to a route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Guest,
    /// Guest-only, then flow-gated.
    GuestFlow(FlowRequirement),
    Protected,
}

/// Outcome of navigating to a path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    Loading,
    Redirect(&'static str),
    Render(Route),
}

impl Route {
    /// Match a path against the table. `None` for `/` and unknown paths.
    #[must_use]
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let route = match segments.as_slice() {
            ["login"] => Self::Login,
            ["register"] => Self::Register,
            ["verification"] => Self::Verification,
            ["forgot-password"] => Self::ForgotPassword,
            ["reset-password"] => Self::ResetPassword,
            ["dashboard"] => Self::Dashboard,
            ["products"] => Self::Products,
            ["products", "create"] => Self::CreateProduct,
            ["products", id] => Self::ProductDetail((*id).to_owned()),
            ["products", id, "edit"] => Self::EditProduct((*id).to_owned()),
            ["orders"] => Self::Orders,
            ["profile"] => Self::Profile,
            _ => return None,
        };
        Some(route)
    }

    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Login => "/login".into(),
            Self::Register => "/register".into(),
            Self::Verification => "/verification".into(),
            Self::ForgotPassword => "/forgot-password".into(),
            Self::ResetPassword => "/reset-password".into(),
            Self::Dashboard => "/dashboard".into(),
            Self::Products => "/products".into(),
            Self::CreateProduct => "/products/create".into(),
            Self::ProductDetail(id) => format!("/products/{id}"),
            Self::EditProduct(id) => format!("/products/{id}/edit"),
            Self::Orders => "/orders".into(),
            Self::Profile => "/profile".into(),
        }
    }

    #[must_use]
    pub fn access(&self) -> Access {
        match self {
            Self::Login | Self::Register | Self::ForgotPassword => Access::Guest,
            Self::Verification => Access::GuestFlow(VERIFICATION_FLOW),
            Self::ResetPassword => Access::GuestFlow(RESET_PASSWORD_FLOW),
            Self::Dashboard
            | Self::Products
            | Self::CreateProduct
            | Self::ProductDetail(_)
            | Self::EditProduct(_)
            | Self::Orders
            | Self::Profile => Access::Protected,
        }
    }
}

/// Decide what navigating to `path` shows, given the session and the flow
/// context handed over with the navigation.
#[must_use]
pub fn resolve(path: &str, session: &SessionSnapshot, flow: &FlowContext) -> Resolution {
    let Some(route) = Route::parse(path) else {
        return Resolution::Redirect(LANDING_PATH);
    };
    let decision = match route.access() {
        Access::Guest => guards::guest_only(session),
        Access::Protected => guards::protected(session),
        Access::GuestFlow(requirement) => match guards::guest_only(session) {
            GuardDecision::Render => guards::flow_gated(flow, &requirement),
            other => other,
        },
    };
    match decision {
        GuardDecision::Loading => Resolution::Loading,
        GuardDecision::Redirect(to) => Resolution::Redirect(to),
        GuardDecision::Render => Resolution::Render(route),
    }
}

#[cfg(test)]
#[path = "routes_test.rs"]
mod tests;

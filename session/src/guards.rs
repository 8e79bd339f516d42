//! Navigation-time guards.
//!
//! All guards are pure: they read a snapshot (or flow context) and return a
//! decision. The authentication guards refuse to decide while the session is
//! still loading; the flow guard ignores the session entirely.

use crate::navigation::FlowContext;
use crate::state::SessionSnapshot;
use crate::{LANDING_PATH, LOGIN_PATH};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Startup validation pending: show a placeholder, decide nothing.
    Loading,
    Redirect(&'static str),
    Render,
}

/// Keys a flow-gated view needs from the previous screen, and where to send
/// the user when they are missing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlowRequirement {
    pub required: &'static [&'static str],
    pub entry: &'static str,
}

/// Views that need an authenticated supplier.
#[must_use]
pub fn protected(session: &SessionSnapshot) -> GuardDecision {
    if session.is_loading {
        GuardDecision::Loading
    } else if !session.is_authenticated() {
        GuardDecision::Redirect(LOGIN_PATH)
    } else {
        GuardDecision::Render
    }
}

/// Views only meaningful when logged out (login, register, ...).
#[must_use]
pub fn guest_only(session: &SessionSnapshot) -> GuardDecision {
    if session.is_loading {
        GuardDecision::Loading
    } else if session.is_authenticated() {
        GuardDecision::Redirect(LANDING_PATH)
    } else {
        GuardDecision::Render
    }
}

/// Views that continue a multi-step flow. Blank values count as missing.
#[must_use]
pub fn flow_gated(flow: &FlowContext, requirement: &FlowRequirement) -> GuardDecision {
    let complete = requirement
        .required
        .iter()
        .all(|key| flow.get(*key).is_some_and(|v| !v.trim().is_empty()));
    if complete {
        GuardDecision::Render
    } else {
        GuardDecision::Redirect(requirement.entry)
    }
}

#[cfg(test)]
#[path = "guards_test.rs"]
mod tests;

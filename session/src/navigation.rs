//! In-process routing surface: current view, redirects, and flow context.
//!
//! Flow context is the small map a screen hands to the next one ("here is
//! the phone number you just entered"). It lives only as long as the
//! navigation that carried it; any later navigation replaces it.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

/// Parameters carried from one view to the next.
pub type FlowContext = BTreeMap<String, String>;

/// The part of navigation the request pipeline depends on.
pub trait Navigator: Send + Sync {
    fn current_path(&self) -> String;
    /// Replace the current view with `path`, dropping any flow context.
    fn redirect(&self, path: &str);
}

#[derive(Debug)]
struct NavState {
    path: String,
    flow: FlowContext,
    history: Vec<String>,
}

/// Default [`Navigator`]: tracks the current path and every visited path.
#[derive(Debug)]
pub struct Navigation {
    inner: Mutex<NavState>,
}

impl Navigation {
    #[must_use]
    pub fn new(path: &str) -> Self {
        Self {
            inner: Mutex::new(NavState { path: path.to_owned(), flow: FlowContext::new(), history: vec![path.to_owned()] }),
        }
    }

    /// Move to `path`, handing it `flow`.
    pub fn navigate(&self, path: &str, flow: FlowContext) {
        let mut state = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        tracing::debug!(from = %state.path, to = %path, "navigate");
        state.path = path.to_owned();
        state.flow = flow;
        state.history.push(path.to_owned());
    }

    #[must_use]
    pub fn flow_context(&self) -> FlowContext {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .flow
            .clone()
    }

    /// Every path entered so far, oldest first, including the starting one.
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .history
            .clone()
    }
}

impl Navigator for Navigation {
    fn current_path(&self) -> String {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .path
            .clone()
    }

    fn redirect(&self, path: &str) {
        tracing::info!(to = %path, "redirect");
        self.navigate(path, FlowContext::new());
    }
}

#[cfg(test)]
#[path = "navigation_test.rs"]
mod tests;

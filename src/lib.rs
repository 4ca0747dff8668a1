//! User Deprovisioning Console
//!
//! A typed controller for the user-deprovisioning admin workflow: validate
//! operator input, call the backend's connection-test and deprovision
//! endpoints, replay result lists into a severity-typed log, and handle the
//! one-time generated password. The controller core is front-end agnostic;
//! a terminal console hosts it in production.

pub mod actions;
pub mod api;
pub mod config;
pub mod console;
pub mod controller;
pub mod log;
pub mod logging;
pub mod validate;
pub mod view;

use serde::{Deserialize, Serialize};

pub use controller::{FormController, Phase, Sleeper, TokioSleeper};
pub use view::{Clipboard, Control, CopyOutcome, View};

/// Configuration for the deprovisioning console
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConsoleConfig {
    /// Base URL of the deprovisioning backend
    pub base_url: String,
    /// Operator prefills
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Operator prefills. The directory password is never stored here; it is
/// prompted for at startup and lives only in controller state.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Directory username prefill; prompted for when empty
    #[serde(default)]
    pub username: String,
}

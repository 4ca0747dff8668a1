//! The form controller: owns all page state and drives the two backend
//! operations through the `ApiClient`, `View`, `Sleeper`, and `Clipboard`
//! seams.

use crate::actions::{ActionSelection, Category};
use crate::api::{ApiClient, ApiError, StatusMessage};
use crate::log::{LogEntry, LogPanel, Severity};
use crate::validate::{self, Field, FieldState};
use crate::view::{Clipboard, Control, CopyOutcome, View};
use std::time::Duration;

/// Pause before each replayed result line. Pacing for readability, not a
/// rate limit.
pub const REPLAY_PACING: Duration = Duration::from_millis(300);
/// Pause between the last replayed result and the completion summary.
pub const SUMMARY_PAUSE: Duration = Duration::from_millis(500);
/// Pause between the completion summary and the password reveal.
pub const REVEAL_PAUSE: Duration = Duration::from_millis(800);
/// Cooldown before the test control re-enables.
pub const TEST_COOLDOWN: Duration = Duration::from_secs(2);
/// Cooldown before the run controls re-enable.
pub const RUN_COOLDOWN: Duration = Duration::from_secs(3);
/// Delay between a 401 log entry and the forced session restart.
pub const TEST_RELOAD_DELAY: Duration = Duration::from_secs(2);
pub const RUN_RELOAD_DELAY: Duration = Duration::from_secs(3);
/// Interval of the credential-hygiene sweep while the console sits idle.
pub const IDLE_SWEEP_INTERVAL: Duration = Duration::from_secs(300);

const PASSWORD_NOTES: [&str; 3] = [
    "This password excludes the user's first and last name.",
    "Copy this password now - it will not be shown again!",
    "Store securely according to your organization's password policy.",
];

/// Timer seam so tests can run the replay without real time passing.
pub trait Sleeper {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()>;
}

/// Production sleeper backed by the tokio timer.
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Workflow phase. Transitions that do not match the table in the module
/// docs are checked conditions and no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Confirming,
    Submitting,
    Replaying,
}

pub struct FormController<A, V, S> {
    api: A,
    view: V,
    sleeper: S,
    phase: Phase,
    email: String,
    username: String,
    password: String,
    confirmation: String,
    actions: ActionSelection,
    panel: LogPanel,
    current_password: Option<String>,
}

impl<A, V, S> FormController<A, V, S>
where
    A: ApiClient,
    V: View,
    S: Sleeper,
{
    pub fn new(api: A, view: V, sleeper: S) -> Self {
        Self {
            api,
            view,
            sleeper,
            phase: Phase::Idle,
            email: String::new(),
            username: String::new(),
            password: String::new(),
            confirmation: String::new(),
            actions: ActionSelection::default(),
            panel: LogPanel::new(),
            current_password: None,
        }
    }

    /// One-time session setup: wipe any stale credential password, emit the
    /// initial log lines, and push the starting field/control states.
    pub fn startup(&mut self) {
        self.password.clear();
        self.view.credential_password_cleared();
        self.add_log(
            Severity::Info,
            "System initialized with user authentication. Enter directory credentials to begin.",
        );
        self.add_log(
            Severity::Info,
            "Security reminder: credentials are used only for this session",
        );
        self.add_log(
            Severity::Warning,
            "Ensure you have proper authorization before proceeding",
        );
        self.view.progress(0, Some("Ready"));
        self.validate_form();
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True for the request lifetime of a deprovisioning run.
    pub fn is_processing(&self) -> bool {
        matches!(self.phase, Phase::Submitting | Phase::Replaying)
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn log_entries(&self) -> &[LogEntry] {
        self.panel.entries()
    }

    pub fn current_password(&self) -> Option<&str> {
        self.current_password.as_deref()
    }

    pub fn actions(&self) -> &ActionSelection {
        &self.actions
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    // ---- input events -----------------------------------------------------

    pub fn set_email(&mut self, value: &str) {
        self.email = value.trim().to_string();
        self.validate_form();
    }

    pub fn set_username(&mut self, value: &str) {
        self.username = value.trim().to_string();
        self.validate_form();
    }

    pub fn set_password(&mut self, value: &str) {
        self.password = value.trim().to_string();
        self.validate_form();
    }

    pub fn set_confirmation(&mut self, value: &str) {
        self.confirmation = value.to_string();
        self.validate_confirmation();
    }

    /// Toggle a whole action category on or off.
    pub fn toggle_category(&mut self, category: Category, enabled: bool) {
        self.actions.set_enabled(category, enabled);
        let state = if enabled { "enabled" } else { "disabled" };
        self.add_log(
            Severity::Info,
            format!("{} actions {state}", category.key().to_uppercase()),
        );
        self.validate_form();
    }

    /// Check or uncheck one action. Returns false for an unknown id.
    pub fn set_action_checked(&mut self, id: &str, checked: bool) -> bool {
        self.actions.set_checked(id, checked)
    }

    // ---- validation -------------------------------------------------------

    /// Recompute field feedback and control enablement from current input.
    /// Returns whether the form as a whole is submittable.
    pub fn validate_form(&mut self) -> bool {
        let email_state = validate::email_field_state(&self.email);
        self.view.field_state(Field::TargetEmail, email_state);
        self.view
            .field_state(Field::DirectoryUsername, validate::presence_state(&self.username));
        self.view
            .field_state(Field::DirectoryPassword, validate::presence_state(&self.password));

        let creds = validate::credentials_present(&self.username, &self.password);
        let form_valid = email_state == FieldState::Valid && creds;
        let processing = self.is_processing();

        self.view.control_enabled(Control::Test, creds && !processing);
        self.view.control_enabled(Control::Start, form_valid && !processing);
        form_valid
    }

    /// Recompute the proceed gate from the confirmation text.
    pub fn validate_confirmation(&mut self) -> bool {
        let valid = validate::confirmation_valid(&self.confirmation);
        self.view.control_enabled(Control::Proceed, valid);
        valid
    }

    fn check_credentials_strict(&mut self) -> bool {
        match validate::check_credentials(&self.username, &self.password) {
            Ok(()) => {
                self.view
                    .field_state(Field::DirectoryUsername, FieldState::Valid);
                self.view
                    .field_state(Field::DirectoryPassword, FieldState::Valid);
                true
            }
            Err(issue) => {
                self.view.field_state(issue.field(), FieldState::Invalid);
                self.add_log(Severity::Error, issue.message());
                false
            }
        }
    }

    fn check_email_strict(&mut self) -> bool {
        match validate::check_email_strict(&self.email) {
            Ok(()) => {
                self.view.field_state(Field::TargetEmail, FieldState::Valid);
                true
            }
            Err(issue) => {
                self.view.field_state(Field::TargetEmail, FieldState::Invalid);
                self.add_log(Severity::Error, issue.message());
                false
            }
        }
    }

    // ---- logging ----------------------------------------------------------

    fn add_log(&mut self, severity: Severity, message: impl Into<String>) {
        let entry = self.panel.append(severity, message);
        self.view.log(&entry);
    }

    /// Surface an otherwise-unhandled front-end error in the visible log.
    pub fn report_error(&mut self, message: &str) {
        self.add_log(Severity::Error, format!("Application error: {message}"));
    }

    /// Empty the panel and its mirror, forget any revealed password, and
    /// reset the progress indicator.
    pub fn clear_log(&mut self) {
        self.panel.clear();
        self.current_password = None;
        self.view.log_cleared();
        self.view.progress(0, Some("Ready"));
        self.add_log(Severity::Info, "Log cleared. System ready for new operations.");
    }

    /// Wipe the credential password and any revealed one-time password.
    /// Used on teardown.
    pub fn clear_sensitive_data(&mut self) {
        self.password.clear();
        self.current_password = None;
        self.view.credential_password_cleared();
        self.validate_form();
    }

    /// Periodic credential hygiene: after [`IDLE_SWEEP_INTERVAL`] of
    /// inactivity, drop secrets unless an operation is in flight.
    pub fn idle_sweep(&mut self) {
        if self.is_processing() {
            return;
        }
        if !self.password.is_empty() || self.current_password.is_some() {
            self.clear_sensitive_data();
            tracing::debug!("idle sweep cleared session secrets");
        }
    }

    // ---- connection test --------------------------------------------------

    pub async fn test_connections(&mut self) {
        if self.phase != Phase::Idle {
            return;
        }
        if !validate::credentials_present(&self.username, &self.password) {
            self.add_log(
                Severity::Error,
                "Enter directory credentials before testing connections",
            );
            return;
        }
        if !self.check_credentials_strict() {
            return;
        }

        self.view.control_enabled(Control::Test, false);
        self.view.control_busy(Control::Test, true);
        self.add_log(Severity::Info, "Starting connection tests with provided credentials...");
        self.view.progress(10, Some("Testing connections..."));

        let outcome = self.api.test_connections(&self.username, &self.password).await;
        match outcome {
            Ok(result) => {
                self.view.progress(100, Some("Tests completed"));
                for (subsystem, ok) in result.checks() {
                    let text = if ok { subsystem.ok_text() } else { subsystem.fail_text() };
                    self.view.subsystem_status(subsystem, ok, text);
                }
                for msg in &result.messages {
                    self.add_log(msg.status, msg.message.clone());
                }
                let succeeded = result.success_count();
                let total = result.total();
                let severity = if succeeded == total { Severity::Success } else { Severity::Warning };
                self.add_log(
                    severity,
                    format!("Connection tests completed: {succeeded}/{total} successful"),
                );
                if result.ad {
                    self.add_log(
                        Severity::Success,
                        format!("Directory authentication successful for: {}", self.username),
                    );
                } else {
                    self.add_log(
                        Severity::Error,
                        format!("Directory authentication failed for: {}", self.username),
                    );
                }
            }
            Err(ApiError::SessionExpired) => {
                self.session_expired(TEST_RELOAD_DELAY).await;
                return;
            }
            Err(ApiError::Server(message)) => {
                self.add_log(Severity::Error, format!("Connection test failed: {message}"));
                self.view.progress(0, Some("Test failed"));
            }
            Err(ApiError::Transport(message)) => {
                self.add_log(Severity::Error, format!("Connection error: {message}"));
                self.view.progress(0, Some("Test failed"));
            }
        }

        self.sleeper.sleep(TEST_COOLDOWN).await;
        self.view.control_busy(Control::Test, false);
        self.view.progress(0, Some("Ready"));
        self.validate_form();
    }

    // ---- deprovisioning run -----------------------------------------------

    /// Idle → Confirming. Strict submit-time validation runs first; any
    /// failure is logged and leaves the phase unchanged.
    pub fn start_deprovisioning(&mut self) {
        if self.phase != Phase::Idle {
            return;
        }
        if !self.check_email_strict() || !self.check_credentials_strict() {
            return;
        }
        if !self.validate_form() {
            return;
        }

        self.phase = Phase::Confirming;
        self.confirmation.clear();
        self.view.open_confirmation(&self.email, &self.username);
        self.validate_confirmation();
    }

    /// Confirming → Idle with no side effects.
    pub fn cancel_confirmation(&mut self) {
        if self.phase != Phase::Confirming {
            return;
        }
        self.phase = Phase::Idle;
        self.view.close_confirmation();
    }

    /// Confirming → Submitting. The confirmation text is re-verified here
    /// even though the proceed control is gated on it; the gate alone is
    /// not trusted.
    pub async fn proceed_with_deprovisioning(&mut self) {
        if self.phase != Phase::Confirming {
            return;
        }
        if !validate::confirmation_valid(&self.confirmation) {
            self.add_log(
                Severity::Error,
                format!("Type {} to proceed with deprovisioning", validate::CONFIRMATION_PHRASE),
            );
            return;
        }

        self.view.close_confirmation();
        self.phase = Phase::Submitting;
        self.view.control_enabled(Control::Start, false);
        self.view.control_enabled(Control::Test, false);
        self.view.control_busy(Control::Start, true);

        self.view.progress(5, Some("Starting..."));
        self.add_log(
            Severity::Warning,
            format!("DEPROVISIONING STARTED for: {}", self.email),
        );
        self.add_log(
            Severity::Info,
            format!("Using directory credentials: {}", self.username),
        );

        let outcome = self
            .api
            .deprovision(&self.email, &self.actions, &self.username, &self.password)
            .await;
        match outcome {
            Ok(outcome) => {
                self.phase = Phase::Replaying;
                self.replay(outcome.results, outcome.password).await;
            }
            Err(ApiError::SessionExpired) => {
                self.phase = Phase::Idle;
                self.view.control_busy(Control::Start, false);
                self.session_expired(RUN_RELOAD_DELAY).await;
                return;
            }
            Err(ApiError::Server(message)) => {
                self.add_log(Severity::Error, format!("Process failed: {message}"));
                self.view.progress(0, Some("Failed"));
            }
            Err(ApiError::Transport(message)) => {
                self.add_log(Severity::Error, format!("Network error: {message}"));
                self.view.progress(0, Some("Error"));
            }
        }

        self.sleeper.sleep(RUN_COOLDOWN).await;
        self.phase = Phase::Idle;
        self.view.control_busy(Control::Start, false);
        self.validate_form();
    }

    /// Replay the ordered result list into the log with fixed pacing, then
    /// summarize and, when the backend generated one, reveal the password.
    async fn replay(&mut self, results: Vec<StatusMessage>, password: Option<String>) {
        let total = results.len();
        let mut succeeded = 0usize;

        for (index, result) in results.into_iter().enumerate() {
            self.sleeper.sleep(REPLAY_PACING).await;
            self.add_log(result.status, result.message);
            if result.status == Severity::Success {
                succeeded += 1;
            }
            let percent = (((index + 1) as f64 / total as f64) * 90.0).round() as u8;
            self.view
                .progress(percent, Some(&format!("Processing... {}/{}", index + 1, total)));
        }

        self.sleeper.sleep(SUMMARY_PAUSE).await;
        self.view.progress(100, Some("Completed"));
        let severity = if succeeded == total { Severity::Success } else { Severity::Warning };
        self.add_log(
            severity,
            format!("Process completed! {succeeded}/{total} actions successful"),
        );

        if let Some(password) = password {
            self.sleeper.sleep(REVEAL_PAUSE).await;
            self.reveal_password(password);
        }
    }

    fn reveal_password(&mut self, password: String) {
        self.view.reveal_password(&password, &PASSWORD_NOTES);
        self.current_password = Some(password);
        self.add_log(
            Severity::Success,
            "Password generated and displayed above - copy immediately!",
        );
    }

    /// Copy the revealed one-time password, walking the clipboard fallback
    /// chain and logging which mechanism worked.
    pub fn copy_current_password(&mut self, clipboard: &mut dyn Clipboard) {
        let Some(password) = self.current_password.clone() else {
            self.add_log(Severity::Error, "No generated password to copy");
            return;
        };
        match clipboard.copy(&password) {
            Ok(CopyOutcome::Primary) => {
                self.add_log(Severity::Success, "Password copied to clipboard");
            }
            Ok(CopyOutcome::Fallback) => {
                self.add_log(Severity::Success, "Password copied to clipboard (fallback method)");
            }
            Err(err) => {
                tracing::warn!("clipboard copy failed: {err:#}");
                self.add_log(Severity::Error, "Failed to copy password to clipboard");
                self.add_log(Severity::Info, "Select and copy the password above manually");
            }
        }
    }

    async fn session_expired(&mut self, delay: Duration) {
        self.add_log(
            Severity::Error,
            "Authentication session expired. Log in again and restart the console.",
        );
        self.sleeper.sleep(delay).await;
        self.view.session_expired();
    }
}

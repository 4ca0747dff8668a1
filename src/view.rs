//! Rendering seam between the controller and whatever front end hosts it.

use crate::api::Subsystem;
use crate::log::LogEntry;
use crate::validate::{Field, FieldState};

/// Actionable controls the controller enables and disables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Test,
    Start,
    Proceed,
}

/// Everything the controller needs from a front end. A terminal view backs
/// the production console; tests use a recording implementation.
pub trait View {
    /// Visual validity feedback for one input.
    fn field_state(&mut self, field: Field, state: FieldState);

    /// Enable or disable an actionable control.
    fn control_enabled(&mut self, control: Control, enabled: bool);

    /// Swap a control's label to/from its busy form for a request lifetime.
    fn control_busy(&mut self, control: Control, busy: bool);

    /// Append one entry to the visible log (the panel auto-scrolls).
    fn log(&mut self, entry: &LogEntry);

    /// The operator cleared the log; drop everything rendered so far.
    fn log_cleared(&mut self);

    /// Update the progress indicator. The label is kept when `None`.
    fn progress(&mut self, percent: u8, label: Option<&str>);

    /// Status line for one connection-test subsystem.
    fn subsystem_status(&mut self, subsystem: Subsystem, ok: bool, text: &str);

    /// Open the confirmation dialog naming the target and the credentials
    /// that will be used.
    fn open_confirmation(&mut self, target_email: &str, directory_username: &str);

    fn close_confirmation(&mut self);

    /// Show the one-time generated password with its handling notes. The
    /// view must not retain the password anywhere the controller cannot
    /// clear.
    fn reveal_password(&mut self, password: &str, notes: &[&str]);

    /// The credential password was wiped (clear action, idle sweep, or
    /// teardown); remove it from any input display.
    fn credential_password_cleared(&mut self);

    /// The backend session is gone; the hosting front end must force a
    /// fresh login before anything else can run.
    fn session_expired(&mut self);
}

/// Which copy mechanism ended up working.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    Primary,
    Fallback,
}

/// Platform clipboard seam. Implementations try their native mechanism
/// first and a legacy fallback second; both failing is an error the
/// controller turns into a manual-copy instruction.
pub trait Clipboard {
    fn copy(&mut self, text: &str) -> anyhow::Result<CopyOutcome>;
}

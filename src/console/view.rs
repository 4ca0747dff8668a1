//! Terminal rendering of the controller's view contract.

use crate::api::Subsystem;
use crate::log::LogEntry;
use crate::validate::{Field, FieldState};
use crate::view::{Control, View};

/// Replace control characters so server-supplied text cannot smuggle
/// escape sequences into the terminal (the terminal analog of HTML
/// escaping in the log panel).
pub fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

fn severity_tag(entry: &LogEntry) -> String {
    entry.severity.as_str().to_uppercase()
}

fn field_label(field: Field) -> &'static str {
    match field {
        Field::TargetEmail => "target email",
        Field::DirectoryUsername => "directory username",
        Field::DirectoryPassword => "directory password",
    }
}

fn state_label(state: FieldState) -> &'static str {
    match state {
        FieldState::Neutral => "empty",
        FieldState::Invalid => "invalid",
        FieldState::Valid => "ok",
    }
}

fn control_label(control: Control) -> &'static str {
    match control {
        Control::Test => "test",
        Control::Start => "start",
        Control::Proceed => "confirm",
    }
}

/// Prints log lines and dialogs to stdout and keeps the latest field,
/// control, and subsystem states for the `status` command.
pub struct TerminalView {
    fields: Vec<(Field, FieldState)>,
    controls: Vec<(Control, bool)>,
    busy: Vec<Control>,
    subsystems: Vec<(Subsystem, String)>,
    progress: (u8, String),
}

impl Default for TerminalView {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalView {
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            controls: Vec::new(),
            busy: Vec::new(),
            subsystems: Vec::new(),
            progress: (0, "Ready".to_string()),
        }
    }

    fn remember<K: PartialEq + Copy, T>(slots: &mut Vec<(K, T)>, key: K, value: T) {
        if let Some(slot) = slots.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            slots.push((key, value));
        }
    }

    /// Dump the tracked state for the `status` command.
    pub fn render_status(&self) {
        println!("fields:");
        for (field, state) in &self.fields {
            println!("  {:20} {}", field_label(*field), state_label(*state));
        }
        println!("controls:");
        for (control, enabled) in &self.controls {
            let busy = if self.busy.contains(control) { " (busy)" } else { "" };
            println!(
                "  {:20} {}{busy}",
                control_label(*control),
                if *enabled { "enabled" } else { "disabled" }
            );
        }
        if !self.subsystems.is_empty() {
            println!("last connection test:");
            for (subsystem, line) in &self.subsystems {
                println!("  {:20} {line}", subsystem.label());
            }
        }
        println!("progress: {}% - {}", self.progress.0, self.progress.1);
    }
}

impl View for TerminalView {
    fn field_state(&mut self, field: Field, state: FieldState) {
        Self::remember(&mut self.fields, field, state);
    }

    fn control_enabled(&mut self, control: Control, enabled: bool) {
        Self::remember(&mut self.controls, control, enabled);
    }

    fn control_busy(&mut self, control: Control, busy: bool) {
        if busy {
            if !self.busy.contains(&control) {
                self.busy.push(control);
            }
        } else {
            self.busy.retain(|c| *c != control);
        }
    }

    fn log(&mut self, entry: &LogEntry) {
        println!(
            "[{}] {:7} {}",
            entry.timestamp,
            severity_tag(entry),
            sanitize(&entry.message)
        );
    }

    fn log_cleared(&mut self) {
        println!("--- log cleared ---");
    }

    fn progress(&mut self, percent: u8, label: Option<&str>) {
        if let Some(label) = label {
            self.progress = (percent, label.to_string());
        } else {
            self.progress.0 = percent;
        }
        println!("    progress: {}% - {}", self.progress.0, self.progress.1);
    }

    fn subsystem_status(&mut self, subsystem: Subsystem, ok: bool, text: &str) {
        let line = format!("{} {}", if ok { "[ok]" } else { "[fail]" }, sanitize(text));
        println!("  {:20} {line}", subsystem.label());
        Self::remember(&mut self.subsystems, subsystem, line);
    }

    fn open_confirmation(&mut self, target_email: &str, directory_username: &str) {
        println!();
        println!("=== CONFIRM DEPROVISIONING ===");
        println!("  target user:          {}", sanitize(target_email));
        println!("  directory credentials: {}", sanitize(directory_username));
        println!("This will disable the account and revoke access across connected systems.");
        println!("Type `confirm CONFIRM` to proceed, or `cancel` to abort.");
        println!();
    }

    fn close_confirmation(&mut self) {
        println!("--- confirmation closed ---");
    }

    fn reveal_password(&mut self, password: &str, notes: &[&str]) {
        println!();
        println!("==============================================");
        println!(" Generated password (SAVE IMMEDIATELY):");
        println!("   {}", sanitize(password));
        for note in notes {
            println!("   {note}");
        }
        println!(" Run `copy` to copy it to the clipboard.");
        println!("==============================================");
        println!();
    }

    fn credential_password_cleared(&mut self) {
        Self::remember(&mut self.fields, Field::DirectoryPassword, FieldState::Neutral);
    }

    fn session_expired(&mut self) {
        println!();
        println!("The backend session has expired.");
        println!("Log in again in your browser, then restart this console.");
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_terminal_escapes() {
        let cleaned = sanitize("\x1b[31malert\x1b[0m\nnext");
        assert!(!cleaned.chars().any(|c| c.is_control()));
        assert!(cleaned.contains("alert"));
        assert!(cleaned.contains("next"));
    }

    #[test]
    fn remember_overwrites_instead_of_appending() {
        let mut view = TerminalView::new();
        view.field_state(Field::TargetEmail, FieldState::Invalid);
        view.field_state(Field::TargetEmail, FieldState::Valid);
        assert_eq!(view.fields, vec![(Field::TargetEmail, FieldState::Valid)]);
    }

    #[test]
    fn progress_keeps_label_when_none() {
        let mut view = TerminalView::new();
        view.progress(40, Some("Processing... 2/5"));
        view.progress(55, None);
        assert_eq!(view.progress, (55, "Processing... 2/5".to_string()));
    }
}

//! Keyboard shortcut registry and dispatch.

use crate::input::{Key, KeyEvent};
use crate::interaction::{Action, InteractionMode};
use crate::session::BoardSession;

/// What a shortcut does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutCommand {
    SelectAll,
    Undo,
    Redo,
    Duplicate,
    Copy,
    Paste,
    Group,
    Ungroup,
    ToggleLock,
    BringToFront,
    SendToBack,
    Delete,
    Cancel,
    TemporaryPan,
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub command: ShortcutCommand,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        command: ShortcutCommand,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            command,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Shift+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }

    fn matches(&self, label: &str, event: &KeyEvent) -> bool {
        self.key == label && self.ctrl == event.modifiers.command() && self.shift == event.modifiers.shift
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("A", true, false, ShortcutCommand::SelectAll, "Select all shapes"),
            Shortcut::new("Z", true, false, ShortcutCommand::Undo, "Undo"),
            Shortcut::new("Z", true, true, ShortcutCommand::Redo, "Redo"),
            Shortcut::new("Y", true, false, ShortcutCommand::Redo, "Redo"),
            Shortcut::new("D", true, false, ShortcutCommand::Duplicate, "Duplicate selection"),
            Shortcut::new("C", true, false, ShortcutCommand::Copy, "Copy shapes"),
            Shortcut::new("V", true, false, ShortcutCommand::Paste, "Paste shapes"),
            Shortcut::new("G", true, false, ShortcutCommand::Group, "Group selected shapes"),
            Shortcut::new("G", true, true, ShortcutCommand::Ungroup, "Ungroup selected shapes"),
            Shortcut::new("L", true, false, ShortcutCommand::ToggleLock, "Lock or unlock selection"),
            Shortcut::new("F", true, false, ShortcutCommand::BringToFront, "Bring to front"),
            Shortcut::new("B", true, false, ShortcutCommand::SendToBack, "Send to back"),
            Shortcut::new("Delete", false, false, ShortcutCommand::Delete, "Delete selection"),
            Shortcut::new("Backspace", false, false, ShortcutCommand::Delete, "Delete selection"),
            Shortcut::new("Escape", false, false, ShortcutCommand::Cancel, "Cancel current action"),
            Shortcut::new("Space", false, false, ShortcutCommand::TemporaryPan, "Pan while held"),
        ]
    }

    /// Find the command bound to a key event.
    pub fn resolve(event: &KeyEvent) -> Option<ShortcutCommand> {
        let label = key_label(event.key);
        Self::all()
            .into_iter()
            .find(|shortcut| shortcut.matches(&label, event))
            .map(|shortcut| shortcut.command)
    }

    /// One line per shortcut, for help overlays.
    pub fn help_text() -> String {
        Self::all()
            .iter()
            .map(|shortcut| format!("{:20} {}", shortcut.format(), shortcut.description))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn key_label(key: Key) -> String {
    match key {
        Key::Character(c) => c.to_ascii_uppercase().to_string(),
        Key::Delete => "Delete".to_string(),
        Key::Backspace => "Backspace".to_string(),
        Key::Space => "Space".to_string(),
        Key::Escape => "Escape".to_string(),
    }
}

impl BoardSession {
    /// Handle a key press. Ignored while a drag or resize is in progress.
    pub fn on_key_down(&mut self, event: &KeyEvent) -> Vec<Action> {
        if self.is_transforming() {
            return Vec::new();
        }
        let Some(command) = ShortcutRegistry::resolve(event) else {
            return Vec::new();
        };
        let typing = event.text_input_focused || self.editing.is_some();
        log::trace!("shortcut {:?} (typing: {})", command, typing);

        let changed = match command {
            ShortcutCommand::TemporaryPan => {
                if !typing {
                    self.tools.begin_temporary_pan();
                }
                return Vec::new();
            }
            ShortcutCommand::Cancel => {
                // A connector draft only ends on pointer-up.
                if matches!(self.mode, InteractionMode::Marquee { .. }) {
                    self.mode = InteractionMode::Idle;
                }
                self.end_text_edit();
                return Vec::new();
            }
            ShortcutCommand::SelectAll => {
                if typing {
                    return Vec::new();
                }
                self.select_all();
                return vec![Action::SelectionChanged];
            }
            ShortcutCommand::Delete if typing => return Vec::new(),
            ShortcutCommand::Delete => self.delete_selection(),
            ShortcutCommand::Copy => {
                if !typing {
                    self.copy_selection();
                }
                return Vec::new();
            }
            ShortcutCommand::Paste if typing => return Vec::new(),
            ShortcutCommand::Paste => !self.paste().is_empty(),
            ShortcutCommand::Undo => self.undo(),
            ShortcutCommand::Redo => self.redo(),
            ShortcutCommand::Duplicate => !self.duplicate_selection().is_empty(),
            ShortcutCommand::Group => self.group_selection().is_some(),
            ShortcutCommand::Ungroup => self.ungroup_selection(),
            ShortcutCommand::ToggleLock => self.toggle_lock_selection(),
            ShortcutCommand::BringToFront => self.bring_selection_to_front(),
            ShortcutCommand::SendToBack => self.send_selection_to_back(),
        };

        if changed {
            vec![Action::HistoryChanged, Action::SelectionChanged]
        } else {
            Vec::new()
        }
    }

    /// Handle a key release.
    pub fn on_key_up(&mut self, event: &KeyEvent) {
        if event.key == Key::Space {
            self.tools.end_temporary_pan();
        }
    }
}

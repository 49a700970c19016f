//! Keyboard shortcut registry and documentation.

/// What a shortcut does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    SelectAll,
    DeleteSelected,
    /// Abort the current gesture and clear the selection.
    Cancel,
    CycleGrid,
    ResetCamera,
    FitContent,
    ShowHelp,
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub description: &'static str,
    /// `None` for entries that only document a pointer gesture.
    pub action: Option<ShortcutAction>,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        description: &'static str,
        action: Option<ShortcutAction>,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            description,
            action,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+A").
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

    fn matches(&self, key: &str, ctrl: bool, shift: bool) -> bool {
        self.key.eq_ignore_ascii_case(key) && self.ctrl == ctrl && self.shift == shift
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        use ShortcutAction::*;
        vec![
            Shortcut::new("A", true, false, "Select all shapes", Some(SelectAll)),
            Shortcut::new("Delete", false, false, "Delete selected shapes", Some(DeleteSelected)),
            Shortcut::new("Backspace", false, false, "Delete selected shapes", Some(DeleteSelected)),
            Shortcut::new("Escape", false, false, "Cancel and clear selection", Some(Cancel)),
            Shortcut::new("G", false, false, "Cycle grid style", Some(CycleGrid)),
            Shortcut::new("0", false, false, "Reset view", Some(ResetCamera)),
            Shortcut::new("F", false, false, "Fit view to shapes", Some(FitContent)),
            Shortcut::new("F1", false, false, "Show keyboard shortcuts", Some(ShowHelp)),
            Shortcut::new("Click", true, false, "Add shape to selection", None),
            Shortcut::new("Drag", true, false, "Add marquee to selection", None),
            Shortcut::new("Right click", false, false, "Clear selection", None),
            Shortcut::new("Middle drag", false, false, "Pan view", None),
            Shortcut::new("Wheel", false, false, "Zoom at cursor", None),
        ]
    }

    /// Find the action bound to a key with the given modifiers.
    pub fn find(key: &str, ctrl: bool, shift: bool) -> Option<ShortcutAction> {
        Self::all()
            .into_iter()
            .find(|s| s.action.is_some() && s.matches(key, ctrl, shift))
            .and_then(|s| s.action)
    }

    /// Print all shortcuts to console.
    pub fn print_all() {
        println!("\n=== Keyboard Shortcuts ===");
        for shortcut in Self::all() {
            println!("  {:20} {}", shortcut.format(), shortcut.description);
        }
        println!();
    }
}

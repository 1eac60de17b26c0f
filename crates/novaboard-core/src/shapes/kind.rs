//! Shape kinds and their capability table.

use serde::{Deserialize, Serialize};

/// The closed set of shape variants a board can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShapeKind {
    #[default]
    Task,
    Idea,
    Data,
    Text,
    Rectangle,
    Circle,
    Note,
    Sheet,
    Image,
    Voice,
}

/// What the host should do right after a shape of a kind is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreationFollowUp {
    /// Start inline text editing on the new shape.
    TextEdit,
    /// Ask the host to open the external document editor.
    DocumentEditor,
    /// Ask the host to capture media; no shape is placed by the tool itself.
    MediaCapture,
    /// Nothing further.
    None,
}

/// Operations a kind permits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub resizable: bool,
    pub lockable: bool,
    pub text_editable: bool,
    pub accepts_attachments: bool,
    pub accepts_subtasks: bool,
    /// Height follows content after subtask/attachment/text changes.
    pub auto_sizes: bool,
    /// Drawn behind other shapes as a grouping frame.
    pub container: bool,
    pub on_create: CreationFollowUp,
}

impl Capabilities {
    const CARD: Self = Self {
        resizable: true,
        lockable: true,
        text_editable: true,
        accepts_attachments: true,
        accepts_subtasks: true,
        auto_sizes: true,
        container: false,
        on_create: CreationFollowUp::TextEdit,
    };
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 10] = [
        ShapeKind::Task,
        ShapeKind::Idea,
        ShapeKind::Data,
        ShapeKind::Text,
        ShapeKind::Rectangle,
        ShapeKind::Circle,
        ShapeKind::Note,
        ShapeKind::Sheet,
        ShapeKind::Image,
        ShapeKind::Voice,
    ];

    /// Capability table lookup.
    pub fn capabilities(self) -> Capabilities {
        let card = Capabilities::CARD;
        match self {
            ShapeKind::Task | ShapeKind::Idea => card,
            ShapeKind::Data => Capabilities {
                accepts_subtasks: false,
                ..card
            },
            ShapeKind::Text | ShapeKind::Circle => Capabilities {
                accepts_attachments: false,
                accepts_subtasks: false,
                auto_sizes: false,
                ..card
            },
            ShapeKind::Rectangle => Capabilities {
                accepts_attachments: false,
                accepts_subtasks: false,
                auto_sizes: false,
                container: true,
                on_create: CreationFollowUp::None,
                ..card
            },
            ShapeKind::Note | ShapeKind::Sheet => Capabilities {
                accepts_attachments: false,
                accepts_subtasks: false,
                auto_sizes: false,
                on_create: CreationFollowUp::DocumentEditor,
                ..card
            },
            ShapeKind::Image => Capabilities {
                text_editable: false,
                accepts_subtasks: false,
                auto_sizes: false,
                on_create: CreationFollowUp::MediaCapture,
                ..card
            },
            ShapeKind::Voice => Capabilities {
                text_editable: false,
                auto_sizes: false,
                on_create: CreationFollowUp::MediaCapture,
                ..card
            },
        }
    }

    /// Width and height of a freshly placed shape.
    pub fn default_size(self) -> (f64, f64) {
        match self {
            ShapeKind::Text => (200.0, 60.0),
            ShapeKind::Circle => (140.0, 140.0),
            ShapeKind::Note | ShapeKind::Sheet => (200.0, 240.0),
            ShapeKind::Rectangle | ShapeKind::Image => (300.0, 300.0),
            ShapeKind::Voice => (200.0, 100.0),
            ShapeKind::Task | ShapeKind::Idea | ShapeKind::Data => (200.0, 120.0),
        }
    }

    /// Human-readable name.
    pub fn display_name(self) -> &'static str {
        match self {
            ShapeKind::Task => "Task",
            ShapeKind::Idea => "Idea",
            ShapeKind::Data => "Data",
            ShapeKind::Text => "Text",
            ShapeKind::Rectangle => "Container",
            ShapeKind::Circle => "Circle",
            ShapeKind::Note => "Note",
            ShapeKind::Sheet => "Sheet",
            ShapeKind::Image => "Image",
            ShapeKind::Voice => "Voice Note",
        }
    }
}

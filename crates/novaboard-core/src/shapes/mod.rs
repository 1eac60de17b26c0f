//! Shape definitions for the board.

mod connection;
mod kind;

pub use connection::{Connection, ConnectionStyle, Edge, EdgeKey};
pub use kind::{Capabilities, CreationFollowUp, ShapeKind};

use crate::geometry::{self, CardContent};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Generate a fresh opaque token for shapes, groups, subtasks and attachments.
pub fn new_token() -> String {
    Uuid::new_v4().to_string()
}

/// Unique, immutable identifier of a shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeId(String);

impl ShapeId {
    /// Generate a new random id.
    pub fn new() -> Self {
        Self(new_token())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ShapeId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for ShapeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ShapeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Workflow status of a task-like shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn from_completed(completed: bool) -> Self {
        if completed { TaskStatus::Done } else { TaskStatus::Todo }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// A checklist item on a shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

impl Subtask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: new_token(),
            title: title.into(),
            completed: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Image,
    Audio,
}

/// Media attached to a shape. `url` holds a base64 data URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AttachmentKind,
    pub url: String,
    pub mime_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Attachment {
    pub fn new(kind: AttachmentKind, url: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            id: new_token(),
            kind,
            url: url.into(),
            mime_type: mime_type.into(),
            name: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    Solid,
    Dashed,
    Dotted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
    Justify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListStyle {
    None,
    Bullet,
    Numbered,
}

/// Presentation overrides. Opaque to the interaction core.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeStyling {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_style: Option<BorderStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_decoration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_style: Option<ListStyle>,
}

impl ShapeStyling {
    /// Frame styling given to new containers.
    pub fn container() -> Self {
        Self {
            fill_color: Some("#272732".to_string()),
            border_color: Some("#475569".to_string()),
            border_width: Some(2.0),
            border_radius: Some(16.0),
            border_style: Some(BorderStyle::Solid),
            ..Default::default()
        }
    }

    /// Overlay every field that is set in `patch`.
    pub fn merge(&mut self, patch: &ShapeStyling) {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if patch.$field.is_some() {
                    self.$field = patch.$field.clone();
                })*
            };
        }
        take!(
            fill_color,
            border_color,
            border_width,
            border_radius,
            border_style,
            font_size,
            font_weight,
            font_family,
            font_style,
            text_decoration,
            text_align,
            list_style
        );
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// A shape on the board.
///
/// Connections are not stored here; the board keeps them in its edge set and
/// projects them back onto shapes only for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    pub id: ShapeId,
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded_node_ids: Option<Vec<ShapeId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<Subtask>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub hide_subtasks: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    /// Legacy background override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styling: Option<ShapeStyling>,
    /// Free-form payload for notes and sheets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<serde_json::Value>,
}

impl Shape {
    /// Create a shape of `kind` with the given geometry and creation defaults.
    pub fn new(kind: ShapeKind, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: ShapeId::new(),
            kind,
            x,
            y,
            width,
            height,
            text: String::new(),
            group_id: None,
            expanded_node_ids: None,
            status: Some(TaskStatus::Todo),
            priority: None,
            start_date: None,
            due_date: None,
            subtasks: Vec::new(),
            hide_subtasks: false,
            assignee: None,
            attachments: Vec::new(),
            color: None,
            locked: false,
            opacity: Some(1.0),
            styling: kind
                .capabilities()
                .container
                .then(ShapeStyling::container),
            content: None,
        }
    }

    /// Create a shape of `kind` with its default size, centered on `center`.
    pub fn centered(kind: ShapeKind, center: Point) -> Self {
        let (width, height) = kind.default_size();
        Self::new(kind, center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn capabilities(&self) -> Capabilities {
        self.kind.capabilities()
    }

    /// Bounding rectangle in canvas coordinates.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn center(&self) -> Point {
        self.rect().center()
    }

    pub fn set_origin(&mut self, origin: Point) {
        self.x = origin.x;
        self.y = origin.y;
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.x = rect.x0;
        self.y = rect.y0;
        self.width = rect.width();
        self.height = rect.height();
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// Whether subtasks have been materialized into sibling shapes.
    pub fn is_expanded(&self) -> bool {
        self.expanded_node_ids.is_some()
    }

    /// Grow or shrink to fit content, for kinds that auto-size.
    /// Returns true if the height changed.
    pub fn auto_size(&mut self) -> bool {
        if !self.capabilities().auto_sizes {
            return false;
        }
        let content = CardContent {
            text: &self.text,
            subtask_count: self.subtasks.len(),
            subtasks_hidden: self.hide_subtasks,
            has_attachments: !self.attachments.is_empty(),
        };
        match geometry::auto_height(self.height, content) {
            Some(height) => {
                self.height = height;
                true
            }
            None => false,
        }
    }

    /// Clone with a fresh id, offset by `delta`.
    pub fn duplicate(&self, delta: Vec2) -> Self {
        let mut copy = self.clone();
        copy.id = ShapeId::new();
        copy.translate(delta);
        copy.expanded_node_ids = None;
        copy.hide_subtasks = false;
        copy
    }
}

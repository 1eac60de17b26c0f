//! Text-generation collaborator: request building, output parsing and
//! application of generated content to the board.

use crate::session::BoardSession;
use crate::shapes::{Attachment, Edge, Shape, ShapeId, ShapeKind, Subtask};
use crate::storage::BoxFuture;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Context used when a shape has no text and no instruction was given.
pub const DEFAULT_CONTEXT: &str = "Project Task";
/// Instruction used by refine requests without one.
pub const DEFAULT_REFINE_INSTRUCTION: &str = "Improve clarity";

const NOTE_GAP: f64 = 50.0;
const NOTE_SIZE: (f64, f64) = (200.0, 240.0);
const NODE_SIZE: (f64, f64) = (180.0, 120.0);
const NODE_SPACING: f64 = 220.0;
const NODE_DROP: f64 = 100.0;

/// Generation errors.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GenerationError {
    #[error("Generator unavailable: {0}")]
    Unavailable(String),
    #[error("Malformed generator output: {0}")]
    Malformed(String),
    #[error("Generation failed: {0}")]
    Failed(String),
}

/// Result type for generation.
pub type GenerationResult<T> = Result<T, GenerationError>;

/// What to generate for a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    /// Append suggested subtasks to the shape.
    Subtasks,
    /// Spawn connected idea shapes below the shape.
    Nodes,
    /// Rewrite the shape's text.
    Refine,
    /// Spawn a connected note.
    Note,
    /// Spawn a connected sheet.
    Sheet,
}

/// Inline media sent along with a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineMedia {
    pub mime_type: String,
    /// Base64 payload without the data-URL prefix.
    pub data: String,
}

impl InlineMedia {
    /// Extract the payload of a `data:<mime>;base64,<payload>` attachment.
    /// Returns `None` when the URL carries no valid base64 payload.
    pub fn from_attachment(attachment: &Attachment) -> Option<Self> {
        let (_, payload) = attachment.url.split_once(',')?;
        if payload.is_empty() || STANDARD.decode(payload).is_err() {
            return None;
        }
        Some(Self {
            mime_type: attachment.mime_type.clone(),
            data: payload.to_string(),
        })
    }
}

/// One request to the collaborator, built for one selected shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub shape_id: ShapeId,
    pub mode: GenerationMode,
    /// Shape text or user instruction the result should be about.
    pub context: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<InlineMedia>,
}

/// Generated content.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutput {
    Suggestions(Vec<String>),
    /// Sheet cells keyed by cell id (`A1`, `B2`, ...).
    Cells(BTreeMap<String, String>),
    Text(String),
}

#[derive(Deserialize)]
struct SuggestionList {
    #[serde(default)]
    subtasks: Vec<String>,
}

impl GenerationOutput {
    /// Parse a raw collaborator response for `mode`.
    ///
    /// Subtasks and nodes expect `{"subtasks": [...]}`, sheets a JSON object of
    /// cells; refine and note responses are plain text.
    pub fn parse(mode: GenerationMode, raw: &str) -> GenerationResult<Self> {
        match mode {
            GenerationMode::Subtasks | GenerationMode::Nodes => {
                let list: SuggestionList = serde_json::from_str(raw)
                    .map_err(|e| GenerationError::Malformed(e.to_string()))?;
                Ok(GenerationOutput::Suggestions(
                    list.subtasks
                        .into_iter()
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect(),
                ))
            }
            GenerationMode::Sheet => {
                let cells: BTreeMap<String, serde_json::Value> = serde_json::from_str(raw)
                    .map_err(|e| GenerationError::Malformed(e.to_string()))?;
                Ok(GenerationOutput::Cells(
                    cells
                        .into_iter()
                        .filter(|(key, _)| is_cell_id(key))
                        .map(|(key, value)| match value {
                            serde_json::Value::String(text) => (key, text),
                            other => (key, other.to_string()),
                        })
                        .collect(),
                ))
            }
            GenerationMode::Refine | GenerationMode::Note => {
                Ok(GenerationOutput::Text(raw.trim().to_string()))
            }
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            GenerationOutput::Suggestions(items) => items.is_empty(),
            GenerationOutput::Cells(cells) => cells.is_empty(),
            GenerationOutput::Text(text) => text.trim().is_empty(),
        }
    }
}

/// Whether `key` is a cell id: column letters followed by a row number.
pub fn is_cell_id(key: &str) -> bool {
    let digits_at = key.find(|c: char| c.is_ascii_digit()).unwrap_or(key.len());
    let (column, row) = key.split_at(digits_at);
    !column.is_empty()
        && column.chars().all(|c| c.is_ascii_uppercase())
        && !row.is_empty()
        && row.chars().all(|c| c.is_ascii_digit())
        && !row.starts_with('0')
}

/// The external text-generation service.
#[cfg(not(target_arch = "wasm32"))]
pub trait TextGenerator: Send + Sync {
    fn generate(&self, request: &GenerationRequest) -> BoxFuture<'_, GenerationResult<GenerationOutput>>;
}

/// The external text-generation service (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait TextGenerator {
    fn generate(&self, request: &GenerationRequest) -> BoxFuture<'_, GenerationResult<GenerationOutput>>;
}

impl BoardSession {
    /// Build one request per selected shape and mark each as pending.
    /// Shapes already waiting on a result are skipped.
    pub fn begin_generation(&mut self, mode: GenerationMode, instruction: Option<&str>) -> Vec<GenerationRequest> {
        let instruction = instruction.map(str::trim).filter(|s| !s.is_empty());
        let mut requests = Vec::new();
        for shape in self.store.state().shapes.iter() {
            if !self.selection.contains(&shape.id) || self.pending.contains(&shape.id) {
                continue;
            }
            let (context, instruction) = match mode {
                GenerationMode::Refine => (
                    shape.text.clone(),
                    Some(instruction.unwrap_or(DEFAULT_REFINE_INSTRUCTION).to_string()),
                ),
                _ => {
                    let context = instruction
                        .or_else(|| Some(shape.text.trim()).filter(|t| !t.is_empty()))
                        .unwrap_or(DEFAULT_CONTEXT);
                    (context.to_string(), instruction.map(str::to_string))
                }
            };
            requests.push(GenerationRequest {
                shape_id: shape.id.clone(),
                mode,
                context,
                instruction,
                attachments: shape
                    .attachments
                    .iter()
                    .filter_map(InlineMedia::from_attachment)
                    .collect(),
            });
        }
        for request in &requests {
            self.pending.insert(request.shape_id.clone());
        }
        log::debug!("{} generation requests ({:?})", requests.len(), mode);
        requests
    }

    /// Apply a collaborator result. The pending mark is always cleared.
    /// Returns true when the board changed.
    pub fn complete_generation(
        &mut self,
        request: &GenerationRequest,
        result: GenerationResult<GenerationOutput>,
    ) -> bool {
        self.pending.remove(&request.shape_id);
        let output = match result {
            Ok(output) if !output.is_empty() => output,
            Ok(_) => {
                log::warn!("empty generation output for {}", request.shape_id);
                return false;
            }
            Err(e) => {
                log::warn!("generation for {} failed: {}", request.shape_id, e);
                return false;
            }
        };

        let source_id = request.shape_id.clone();
        let style = self.tools.connection_style;
        let applied = self.edit(|state| {
            let Some(source) = state.get(&source_id) else {
                return false;
            };
            let rect = source.rect();

            let spawned: Vec<Shape> = match (request.mode, output) {
                (GenerationMode::Subtasks, GenerationOutput::Suggestions(items)) => {
                    let Some(shape) = state.get_mut(&source_id) else {
                        return false;
                    };
                    if !shape.capabilities().accepts_subtasks {
                        return false;
                    }
                    shape.subtasks.extend(items.into_iter().map(Subtask::new));
                    shape.hide_subtasks = false;
                    shape.auto_size();
                    return true;
                }
                (GenerationMode::Refine, GenerationOutput::Text(text)) => {
                    let Some(shape) = state.get_mut(&source_id) else {
                        return false;
                    };
                    if shape.locked || shape.text == text {
                        return false;
                    }
                    shape.text = text;
                    shape.auto_size();
                    return true;
                }
                (GenerationMode::Note, GenerationOutput::Text(text)) => {
                    let (w, h) = NOTE_SIZE;
                    vec![Shape::new(ShapeKind::Note, rect.x1 + NOTE_GAP, rect.y0, w, h).with_text(text)]
                }
                (GenerationMode::Sheet, GenerationOutput::Cells(cells)) => {
                    let (w, h) = NOTE_SIZE;
                    let mut sheet = Shape::new(ShapeKind::Sheet, rect.x1 + NOTE_GAP, rect.y0, w, h)
                        .with_text(format!("Sheet: {}", request.context));
                    sheet.content = Some(serde_json::json!({ "cells": cells }));
                    vec![sheet]
                }
                (GenerationMode::Nodes, GenerationOutput::Suggestions(items)) => {
                    let (w, h) = NODE_SIZE;
                    let y = rect.y1 + NODE_DROP;
                    items
                        .into_iter()
                        .enumerate()
                        .map(|(i, text)| {
                            Shape::new(ShapeKind::Idea, rect.x0 + i as f64 * NODE_SPACING, y, w, h).with_text(text)
                        })
                        .collect()
                }
                (mode, _) => {
                    log::warn!("generation output does not match mode {:?}", mode);
                    return false;
                }
            };

            let ids: Vec<ShapeId> = spawned.iter().map(|s| s.id.clone()).collect();
            state.shapes.extend(spawned);
            for id in ids {
                state.connect(Edge::new(source_id.clone(), id, style));
            }
            true
        });
        if !applied {
            log::warn!("generation result for {} not applied", request.shape_id);
        }
        applied
    }
}

/// Run `requests` through `generator` in order, pairing each request with its result.
///
/// The session is not borrowed while the generator runs; feed the results to
/// [`BoardSession::complete_generation`] when they arrive.
pub async fn generate_all<G: TextGenerator + ?Sized>(
    generator: &G,
    requests: Vec<GenerationRequest>,
) -> Vec<(GenerationRequest, GenerationResult<GenerationOutput>)> {
    let mut results = Vec::with_capacity(requests.len());
    for request in requests {
        let result = generator.generate(&request).await;
        results.push((request, result));
    }
    results
}

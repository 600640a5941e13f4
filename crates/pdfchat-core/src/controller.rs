//! Interaction controller: owns the current document and drives the
//! placeholder edit loop.
//!
//! ```text
//! Idle --begin_edit(target)--> Editing --confirm_edit(value)--> Idle
//!                              Editing --cancel_edit()--------> Idle
//! ```
//!
//! A second `begin_edit` while editing replaces the pending target.
//! Every change to the tree produces a new immutable snapshot and a new
//! render; a failed render is logged and the previous preview stays.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::activation;
use crate::annotate::annotate;
use crate::bridge::RenderBridge;
use crate::chat::TurnId;
use crate::error::ControllerError;
use crate::node::DocumentNode;
use crate::placeholder;
use crate::rewrite::rewrite_counted;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingEdit {
    pub target: String,
}

/// What the edit surface should show after an activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditPrompt {
    pub target: String,
    pub prefill: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum EditState {
    Idle,
    Editing { target: String },
}

/// Result of a confirmed edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditOutcome {
    pub notice: String,
    pub replaced: usize,
    pub revision: u64,
}

/// The most recent successful render.
#[derive(Debug, Clone)]
pub struct Preview {
    pub revision: u64,
    pub bytes: Arc<Vec<u8>>,
}

pub struct InteractionController<R> {
    renderer: R,
    current: Option<Arc<DocumentNode>>,
    pending_edit: Option<PendingEdit>,
    preview: Option<Preview>,
    revision: u64,
    loaded_turn: Option<TurnId>,
}

impl<R: RenderBridge> InteractionController<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            current: None,
            pending_edit: None,
            preview: None,
            revision: 0,
            loaded_turn: None,
        }
    }

    /// Replace the current document with a freshly annotated `raw` tree.
    pub fn load_document(&mut self, raw: &DocumentNode) -> u64 {
        self.current = Some(Arc::new(annotate(raw)));
        self.pending_edit = None;
        self.revision += 1;
        info!(revision = self.revision, "document loaded");
        self.render();
        self.revision
    }

    /// Load a document produced by the agent for chat turn `turn`.
    ///
    /// Returns `false` and leaves the preview alone if a document from a
    /// later turn is already loaded.
    pub fn accept_agent_document(&mut self, turn: TurnId, raw: &DocumentNode) -> bool {
        if let Some(loaded) = self.loaded_turn
            && turn < loaded
        {
            warn!(
                turn = turn.0,
                loaded_turn = loaded.0,
                "discarding document from stale chat turn"
            );
            return false;
        }
        self.loaded_turn = Some(turn);
        self.load_document(raw);
        true
    }

    /// Open an edit for the placeholder with literal text `target`.
    pub fn begin_edit(&mut self, target: &str) -> Result<EditPrompt, ControllerError> {
        if self.current.is_none() {
            return Err(ControllerError::NoDocument);
        }
        if target.is_empty() {
            return Err(ControllerError::EmptyTarget);
        }
        if let Some(previous) = &self.pending_edit {
            info!(previous = %previous.target, placeholder = target, "replacing pending edit");
        }
        self.pending_edit = Some(PendingEdit {
            target: target.to_string(),
        });
        Ok(EditPrompt {
            target: target.to_string(),
            prefill: placeholder::strip_brackets(target),
        })
    }

    /// Open an edit from an activation link clicked in the preview.
    pub fn begin_edit_from_link(&mut self, uri: &str) -> Result<EditPrompt, ControllerError> {
        let target = activation::target_from_link(uri)
            .ok_or_else(|| ControllerError::InvalidLink(uri.to_string()))?;
        self.begin_edit(&target)
    }

    /// Apply `new_value` to the pending placeholder.
    ///
    /// Returns `None` when no edit is pending.
    pub fn confirm_edit(&mut self, new_value: &str) -> Option<EditOutcome> {
        let pending = self.pending_edit.take()?;
        let current = self.current.as_ref()?;

        let (rewritten, replaced) = rewrite_counted(current, &pending.target, new_value);
        let new_literal = placeholder::wrap(new_value);
        self.current = Some(Arc::new(rewritten));
        self.revision += 1;

        info!(
            revision = self.revision,
            placeholder = %pending.target,
            replacement = %new_literal,
            replaced,
            "placeholder edited"
        );
        self.render();

        Some(EditOutcome {
            notice: format!("Updated {} to {}", pending.target, new_literal),
            replaced,
            revision: self.revision,
        })
    }

    pub fn cancel_edit(&mut self) {
        if let Some(pending) = self.pending_edit.take() {
            info!(placeholder = %pending.target, "edit cancelled");
        }
    }

    pub fn state(&self) -> EditState {
        match &self.pending_edit {
            Some(pending) => EditState::Editing {
                target: pending.target.clone(),
            },
            None => EditState::Idle,
        }
    }

    /// Immutable snapshot of the current tree.
    pub fn current(&self) -> Option<Arc<DocumentNode>> {
        self.current.clone()
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn render(&mut self) {
        let Some(tree) = self.current.clone() else {
            return;
        };
        match self.renderer.render(&tree) {
            Ok(bytes) => {
                info!(revision = self.revision, bytes = bytes.len(), "preview rendered");
                self.preview = Some(Preview {
                    revision: self.revision,
                    bytes: Arc::new(bytes),
                });
            }
            Err(e) => {
                warn!(revision = self.revision, error = %e, "render failed, keeping previous preview");
            }
        }
    }
}

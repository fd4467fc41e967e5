//! Serializable commands: every engine operation as one JSON-friendly value.
//!
//! A command log replays through [`Engine::apply`] onto the same surface
//! the tool panels call directly, so a recorded session and a live one
//! cannot drift apart. Commands that take `ids` fall back to the current
//! selection when `ids` is omitted, which is how scripts refer to elements
//! whose ids were minted during replay.

#[cfg(test)]
#[path = "command_test.rs"]
mod command_test;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::element::{ElementId, ElementPatch, ElementSpec, FileRef, GroupId};
use crate::engine::Engine;
use crate::geom::{Point, Size};
use crate::smart::{SettingsError, SmartKind};
use crate::tool::Tool;
use crate::transform::{Alignment, FlipAxis};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    // Elements
    AddElement { element: ElementSpec },
    UpdateElement { id: ElementId, patch: ElementPatch },
    DeleteElements { ids: Option<Vec<ElementId>> },
    LockElements { ids: Option<Vec<ElementId>> },
    UnlockElements { ids: Option<Vec<ElementId>> },
    BringToFront { ids: Option<Vec<ElementId>> },
    SendToBack { ids: Option<Vec<ElementId>> },

    // Selection
    Select { ids: Vec<ElementId> },
    AddToSelection { ids: Vec<ElementId> },
    SelectAt { point: Point, #[serde(default)] additive: bool },
    SelectAll,
    SelectGroup { group_id: GroupId },
    ClearSelection,

    // Transforms
    Align { ids: Option<Vec<ElementId>>, edge: Alignment },
    Flip { ids: Option<Vec<ElementId>>, axis: FlipAxis },
    Move { ids: Option<Vec<ElementId>>, delta: Point },
    Resize { id: ElementId, size: Size },
    Rotate { ids: Option<Vec<ElementId>>, rotation: f64 },

    // Groups
    Group { ids: Option<Vec<ElementId>> },
    Ungroup { group_id: GroupId },

    // Clipboard
    Copy { ids: Option<Vec<ElementId>> },
    Cut { ids: Option<Vec<ElementId>> },
    Paste,

    // Tools
    SetTool { tool: Tool },
    Escape,

    // Smart elements and uploads
    CreateSmartElement { kind: SmartKind, #[serde(default)] settings: Map<String, Value>, position: Point },
    AddSmartElement { kind: SmartKind, position: Point, #[serde(default)] data: Value },
    AddFile { file: FileRef, position: Point },

    // Viewport
    SetZoom { zoom: f64 },
    ZoomAt { point: Point, zoom: f64 },
    PanBy { delta: Point },
    CenterOn { point: Point },
    FitToContent,
    ResetViewport,
    SetScreenSize { size: Size },
}

/// What a command did, for logs and replay transcripts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Outcome {
    Done,
    Created { id: ElementId },
    Changed { ids: Vec<ElementId> },
    Applied { applied: bool },
    Grouped { group_id: Option<GroupId> },
    Copied { count: usize },
    Hit { id: Option<ElementId> },
    Zoom { zoom: f64 },
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

impl Engine {
    /// Run one command.
    ///
    /// # Errors
    ///
    /// Only smart-element commands can fail, with the settings error that
    /// rejected their input.
    pub fn apply(&mut self, command: Command) -> Result<Outcome, CommandError> {
        let outcome = match command {
            Command::AddElement { element } => Outcome::Created { id: self.add_element(element) },
            Command::UpdateElement { id, patch } => Outcome::Applied { applied: self.update_element(&id, &patch) },
            Command::DeleteElements { ids } => {
                let ids = self.targets(ids);
                Outcome::Changed { ids: self.delete_elements(&ids) }
            }
            Command::LockElements { ids } => {
                let ids = self.targets(ids);
                Outcome::Changed { ids: self.lock_elements(&ids) }
            }
            Command::UnlockElements { ids } => {
                let ids = self.targets(ids);
                Outcome::Changed { ids: self.unlock_elements(&ids) }
            }
            Command::BringToFront { ids } => {
                let ids = self.targets(ids);
                Outcome::Changed { ids: self.bring_to_front(&ids) }
            }
            Command::SendToBack { ids } => {
                let ids = self.targets(ids);
                Outcome::Changed { ids: self.send_to_back(&ids) }
            }

            Command::Select { ids } => {
                self.select(&ids);
                Outcome::Done
            }
            Command::AddToSelection { ids } => {
                self.add_to_selection(&ids);
                Outcome::Done
            }
            Command::SelectAt { point, additive } => Outcome::Hit { id: self.select_at(point, additive) },
            Command::SelectAll => {
                self.select_all();
                Outcome::Done
            }
            Command::SelectGroup { group_id } => Outcome::Changed { ids: self.select_group(&group_id) },
            Command::ClearSelection => {
                self.clear_selection();
                Outcome::Done
            }

            Command::Align { ids, edge } => {
                let ids = self.targets(ids);
                Outcome::Changed { ids: self.align_elements(&ids, edge) }
            }
            Command::Flip { ids, axis } => {
                let ids = self.targets(ids);
                Outcome::Changed { ids: self.flip(&ids, axis) }
            }
            Command::Move { ids, delta } => {
                let ids = self.targets(ids);
                Outcome::Changed { ids: self.move_elements(&ids, delta) }
            }
            Command::Resize { id, size } => Outcome::Applied { applied: self.resize_element(&id, size) },
            Command::Rotate { ids, rotation } => {
                let ids = self.targets(ids);
                Outcome::Changed { ids: self.rotate_elements(&ids, rotation) }
            }

            Command::Group { ids } => {
                let ids = self.targets(ids);
                Outcome::Grouped { group_id: self.group_elements(&ids) }
            }
            Command::Ungroup { group_id } => Outcome::Changed { ids: self.ungroup_elements(&group_id) },

            Command::Copy { ids } => {
                let ids = self.targets(ids);
                Outcome::Copied { count: self.copy_elements(&ids) }
            }
            Command::Cut { ids } => {
                let ids = self.targets(ids);
                Outcome::Changed { ids: self.cut_elements(&ids) }
            }
            Command::Paste => Outcome::Changed { ids: self.paste_elements() },

            Command::SetTool { tool } => {
                self.set_active_tool(tool);
                Outcome::Done
            }
            Command::Escape => {
                self.escape();
                Outcome::Done
            }

            Command::CreateSmartElement { kind, settings, position } => {
                Outcome::Created { id: self.create_smart_element(kind, &settings, position)? }
            }
            Command::AddSmartElement { kind, position, data } => {
                Outcome::Created { id: self.add_smart_element(kind, position, &data)? }
            }
            Command::AddFile { file, position } => Outcome::Created { id: self.add_file_element(file, position) },

            Command::SetZoom { zoom } => Outcome::Zoom { zoom: self.set_zoom(zoom) },
            Command::ZoomAt { point, zoom } => Outcome::Zoom { zoom: self.zoom_at(point, zoom) },
            Command::PanBy { delta } => {
                self.pan_by(delta);
                Outcome::Done
            }
            Command::CenterOn { point } => {
                self.center_on(point);
                Outcome::Done
            }
            Command::FitToContent => {
                self.fit_to_content();
                Outcome::Zoom { zoom: self.viewport().zoom() }
            }
            Command::ResetViewport => {
                self.reset_viewport();
                Outcome::Done
            }
            Command::SetScreenSize { size } => {
                self.set_screen_size(size);
                Outcome::Done
            }
        };
        Ok(outcome)
    }

    fn targets(&self, ids: Option<Vec<ElementId>>) -> Vec<ElementId> {
        ids.unwrap_or_else(|| self.selected_ids())
    }
}

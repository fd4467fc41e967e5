//! Canvas engine: one owned value per canvas that ties the element store,
//! viewport, selection, clipboard, and tool state together.
//!
//! Every operation a tool panel can issue is a method here. Expected
//! conditions (unknown ids, locked elements, empty clipboard, zoom out of
//! range) are absorbed as no-ops or clamps and never surface as errors.
//! Only boundary input (smart settings, snapshots) returns `Result`.
//!
//! A persistence or sync collaborator opts into the change journal with
//! [`Engine::with_journal`] and drains it with [`Engine::take_changes`].
//! Without it, mutations retain nothing.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::clipboard::Clipboard;
use crate::config::{ConfigError, EngineConfig};
use crate::consts::FILE_TILE_SIZE;
use crate::element::{
    CanvasElement, ElementId, ElementPatch, ElementPayload, ElementSpec, ElementType, FileRef, GroupId, MindmapNodeData,
};
use crate::geom::{Bounds, Point, Size};
use crate::group;
use crate::selection::{Selection, bounding_box};
use crate::smart::{SettingsError, SmartKind, SmartPayload, SmartSettings, build_initial_payload};
use crate::store::{ElementStore, StoreError};
use crate::tool::{Panel, Tool, ToolState, resolve_panel};
use crate::transform::{self, Alignment, FlipAxis};
use crate::viewport::{Viewport, ViewportState};

/// Text given to a mind-map root when none is supplied.
const DEFAULT_MIND_MAP_TEXT: &str = "Central Idea";

/// One entry of the change journal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum Change {
    Created { element: CanvasElement },
    /// The element as it stands after the mutation.
    Updated { element: CanvasElement },
    Deleted { id: ElementId },
    ViewportChanged { viewport: ViewportState },
}

/// Serializable document state: every element plus pan and zoom.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub elements: Vec<CanvasElement>,
    #[serde(default)]
    pub viewport: ViewportState,
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snapshot rejected: {0}")]
    Store(#[from] StoreError),
}

pub struct Engine {
    store: ElementStore,
    viewport: Viewport,
    selection: Selection,
    clipboard: Clipboard,
    tools: ToolState,
    config: EngineConfig,
    journal: bool,
    changes: Vec<Change>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::from_valid_config(EngineConfig::default())
    }
}

impl Engine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with non-default limits.
    ///
    /// # Errors
    ///
    /// Returns the `ConfigError` from [`EngineConfig::validate`].
    pub fn with_config(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: EngineConfig) -> Self {
        Self {
            store: ElementStore::new(),
            viewport: Viewport::new(config.min_zoom, config.max_zoom, config.fit_padding),
            selection: Selection::new(),
            clipboard: Clipboard::new(),
            tools: ToolState::new(),
            config,
            journal: false,
            changes: Vec::new(),
        }
    }

    /// Record every mutation until drained by [`Engine::take_changes`].
    #[must_use]
    pub fn with_journal(mut self) -> Self {
        self.journal = true;
        self
    }

    #[must_use]
    pub fn journal_enabled(&self) -> bool {
        self.journal
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // --- Elements ---

    /// Add an element on top of the z-order.
    pub fn add_element(&mut self, spec: ElementSpec) -> ElementId {
        let id = self.store.add_element(spec);
        self.record_created(&[id]);
        id
    }

    /// Merge `patch` into an element. `false` for an unknown id.
    pub fn update_element(&mut self, id: &ElementId, patch: &ElementPatch) -> bool {
        let applied = self.store.update_element(id, patch);
        if applied {
            self.record_updated(&[*id]);
        }
        applied
    }

    /// Delete every listed unlocked element and drop it from the selection.
    pub fn delete_elements(&mut self, ids: &[ElementId]) -> Vec<ElementId> {
        let removed = self.store.delete_elements(ids);
        self.selection.retain_existing(&self.store);
        self.record_deleted(&removed);
        if !removed.is_empty() {
            info!(removed = removed.len(), requested = ids.len(), "deleted elements");
        }
        removed
    }

    pub fn lock_elements(&mut self, ids: &[ElementId]) -> Vec<ElementId> {
        let changed = self.store.set_locked(ids, true);
        self.record_updated(&changed);
        changed
    }

    pub fn unlock_elements(&mut self, ids: &[ElementId]) -> Vec<ElementId> {
        let changed = self.store.set_locked(ids, false);
        self.record_updated(&changed);
        changed
    }

    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&CanvasElement> {
        self.store.get(id)
    }

    /// All elements in paint order.
    #[must_use]
    pub fn elements(&self) -> Vec<&CanvasElement> {
        self.store.sorted_elements()
    }

    #[must_use]
    pub fn elements_of_type(&self, ty: ElementType) -> Vec<&CanvasElement> {
        self.store.elements_of_type(ty)
    }

    pub fn find<P>(&self, pred: P) -> Vec<&CanvasElement>
    where
        P: Fn(&CanvasElement) -> bool,
    {
        self.store.find(pred)
    }

    #[must_use]
    pub fn element_count(&self) -> usize {
        self.store.len()
    }

    /// Elements lying entirely inside a frame.
    #[must_use]
    pub fn elements_in_frame(&self, frame_id: &ElementId) -> Vec<ElementId> {
        self.store.elements_in_frame(frame_id)
    }

    pub fn bring_to_front(&mut self, ids: &[ElementId]) -> Vec<ElementId> {
        let moved = self.store.bring_to_front(ids);
        self.record_updated(&moved);
        moved
    }

    pub fn send_to_back(&mut self, ids: &[ElementId]) -> Vec<ElementId> {
        let moved = self.store.send_to_back(ids);
        self.record_updated(&moved);
        moved
    }

    // --- Selection ---

    /// Replace the selection. Unknown ids are dropped.
    pub fn select(&mut self, ids: &[ElementId]) {
        let live = self.existing(ids);
        self.selection.select(&live);
    }

    pub fn add_to_selection(&mut self, ids: &[ElementId]) {
        let live = self.existing(ids);
        self.selection.add(&live);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Select every element, in paint order.
    pub fn select_all(&mut self) {
        let all: Vec<ElementId> = self.store.sorted_elements().into_iter().map(|el| el.id).collect();
        self.selection.select(&all);
    }

    /// Selected ids that still exist, in selection order.
    #[must_use]
    pub fn selected_ids(&self) -> Vec<ElementId> {
        self.selection.ids(&self.store)
    }

    /// First selected element; the one inspector panels show.
    #[must_use]
    pub fn primary_selection(&self) -> Option<&CanvasElement> {
        self.selection.primary(&self.store)
    }

    #[must_use]
    pub fn is_selected(&self, id: &ElementId) -> bool {
        self.selection.contains(id) && self.store.contains(id)
    }

    /// World-space box around the selection, rotation-aware.
    #[must_use]
    pub fn selection_bounds(&self) -> Option<Bounds> {
        bounding_box(&self.store, &self.selected_ids())
    }

    /// World-space box around any set of elements.
    #[must_use]
    pub fn bounding_box(&self, ids: &[ElementId]) -> Option<Bounds> {
        bounding_box(&self.store, ids)
    }

    /// Hit-test a screen point and select the topmost element there, along
    /// with the rest of its group. `additive` extends the selection instead
    /// of replacing it; a miss without `additive` clears it.
    pub fn select_at(&mut self, screen: Point, additive: bool) -> Option<ElementId> {
        let world = self.viewport.screen_to_world(screen);
        let Some(hit) = self.store.topmost_at(world).map(|el| el.id) else {
            if !additive {
                self.selection.clear();
            }
            return None;
        };
        let ids = group::expand_to_groups(&self.store, &[hit]);
        if additive {
            self.selection.add(&ids);
        } else {
            self.selection.select(&ids);
        }
        debug!(%hit, selected = ids.len(), "selected at point");
        Some(hit)
    }

    /// Replace the selection with every member of a group.
    pub fn select_group(&mut self, group_id: &GroupId) -> Vec<ElementId> {
        let members = group::group_members(&self.store, group_id);
        self.selection.select(&members);
        members
    }

    // --- Transforms ---

    pub fn align_elements(&mut self, ids: &[ElementId], edge: Alignment) -> Vec<ElementId> {
        let moved = transform::align_elements(&mut self.store, ids, edge);
        self.record_updated(&moved);
        moved
    }

    pub fn flip_horizontally(&mut self, ids: &[ElementId]) -> Vec<ElementId> {
        self.flip(ids, FlipAxis::Horizontal)
    }

    pub fn flip_vertically(&mut self, ids: &[ElementId]) -> Vec<ElementId> {
        self.flip(ids, FlipAxis::Vertical)
    }

    pub fn flip(&mut self, ids: &[ElementId], axis: FlipAxis) -> Vec<ElementId> {
        let flipped = transform::flip(&mut self.store, ids, axis);
        self.record_updated(&flipped);
        flipped
    }

    pub fn move_elements(&mut self, ids: &[ElementId], delta: Point) -> Vec<ElementId> {
        let moved = transform::move_elements(&mut self.store, ids, delta);
        self.record_updated(&moved);
        moved
    }

    pub fn resize_element(&mut self, id: &ElementId, size: Size) -> bool {
        let resized = transform::resize_element(&mut self.store, id, size);
        if resized {
            self.record_updated(&[*id]);
        }
        resized
    }

    pub fn rotate_elements(&mut self, ids: &[ElementId], rotation: f64) -> Vec<ElementId> {
        let rotated = transform::rotate_elements(&mut self.store, ids, rotation);
        self.record_updated(&rotated);
        rotated
    }

    // --- Groups ---

    /// Group two or more existing elements under a fresh id.
    pub fn group_elements(&mut self, ids: &[ElementId]) -> Option<GroupId> {
        let group_id = group::group_elements(&mut self.store, ids)?;
        let members = group::group_members(&self.store, &group_id);
        self.record_updated(&members);
        Some(group_id)
    }

    pub fn ungroup_elements(&mut self, group_id: &GroupId) -> Vec<ElementId> {
        let cleared = group::ungroup_elements(&mut self.store, group_id);
        self.record_updated(&cleared);
        cleared
    }

    #[must_use]
    pub fn group_members(&self, group_id: &GroupId) -> Vec<ElementId> {
        group::group_members(&self.store, group_id)
    }

    // --- Clipboard ---

    pub fn copy_elements(&mut self, ids: &[ElementId]) -> usize {
        let copied = self.clipboard.copy(&self.store, ids);
        debug!(copied, "copied elements");
        copied
    }

    pub fn cut_elements(&mut self, ids: &[ElementId]) -> Vec<ElementId> {
        let removed = self.clipboard.cut(&mut self.store, ids);
        self.selection.retain_existing(&self.store);
        self.record_deleted(&removed);
        removed
    }

    /// Paste the clipboard at the configured offset and select the copies.
    /// An empty clipboard changes nothing, selection included.
    pub fn paste_elements(&mut self) -> Vec<ElementId> {
        let offset = Point::new(self.config.paste_offset, self.config.paste_offset);
        let pasted = self.clipboard.paste(&mut self.store, offset);
        if !pasted.is_empty() {
            self.selection.select(&pasted);
            self.record_created(&pasted);
        }
        pasted
    }

    #[must_use]
    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    // --- Tools ---

    /// Switch tools. Always succeeds and always clears the selection.
    pub fn set_active_tool(&mut self, tool: Tool) {
        let previous = self.tools.set(tool);
        self.selection.clear();
        debug!(from = %previous, to = %tool, "tool changed");
    }

    #[must_use]
    pub fn active_tool(&self) -> Tool {
        self.tools.active()
    }

    /// Back to the selection tool with nothing selected.
    pub fn escape(&mut self) {
        self.tools.escape();
        self.selection.clear();
    }

    /// Panel the host should show for the current tool and selection.
    #[must_use]
    pub fn active_panel(&self) -> Option<Panel> {
        let single = self.selection.single(&self.store).map(CanvasElement::element_type);
        resolve_panel(self.tools.active(), single)
    }

    // --- Smart elements and uploads ---

    /// Create a widget from a tool panel's flat settings map. Mind maps
    /// bypass the factory and become a root `mindmap_node`.
    ///
    /// # Errors
    ///
    /// Returns a `SettingsError` if the settings fail validation; nothing is
    /// created in that case.
    pub fn create_smart_element(
        &mut self,
        kind: SmartKind,
        settings: &Map<String, Value>,
        position: Point,
    ) -> Result<ElementId, SettingsError> {
        if kind == SmartKind::MindMap {
            return Ok(self.add_mind_map_root(mind_map_text(settings), position));
        }
        let settings = SmartSettings::from_flat(kind, settings)?;
        let payload = build_initial_payload(&settings);
        Ok(self.add_smart_payload(payload, position))
    }

    /// Add one generated widget. `data` is a full payload or a flat settings
    /// map for `kind`; `null` means default settings.
    ///
    /// # Errors
    ///
    /// Returns a `SettingsError` if `data` is neither.
    pub fn add_smart_element(
        &mut self,
        kind: SmartKind,
        position: Point,
        data: &Value,
    ) -> Result<ElementId, SettingsError> {
        if kind == SmartKind::MindMap {
            let text = match data {
                Value::Object(map) => mind_map_text(map),
                Value::String(s) if !s.trim().is_empty() => s.trim().to_string(),
                _ => DEFAULT_MIND_MAP_TEXT.to_string(),
            };
            return Ok(self.add_mind_map_root(text, position));
        }
        let empty = Value::Object(Map::new());
        let data = if data.is_null() { &empty } else { data };
        let payload = SmartPayload::from_data(kind, data)?;
        Ok(self.add_smart_payload(payload, position))
    }

    fn add_smart_payload(&mut self, payload: SmartPayload, position: Point) -> ElementId {
        let kind = payload.kind();
        let id = self.add_element(ElementSpec::new(position, kind.default_size(), ElementPayload::Smart(payload)));
        info!(%id, %kind, "smart element created");
        id
    }

    fn add_mind_map_root(&mut self, text: String, position: Point) -> ElementId {
        let node = MindmapNodeData { text, is_root: true, parent_id: None, color: None };
        let id = self.add_element(ElementSpec::new(
            position,
            SmartKind::MindMap.default_size(),
            ElementPayload::MindmapNode(node),
        ));
        info!(%id, "mind map root created");
        id
    }

    /// Place an uploaded file. Images, documents, and other files each get
    /// their own element type, chosen from the MIME type.
    pub fn add_file_element(&mut self, file: FileRef, position: Point) -> ElementId {
        let payload = ElementPayload::from_upload(file);
        let ty = payload.element_type();
        let id = self.add_element(ElementSpec::new(position, FILE_TILE_SIZE.into(), payload));
        info!(%id, kind = ?ty, "file element created");
        id
    }

    // --- Viewport ---

    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Set the zoom factor, clamped. Returns the zoom applied.
    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        let applied = self.viewport.set_zoom(zoom);
        self.record_viewport();
        applied
    }

    /// Zoom keeping the world point under `screen` fixed.
    pub fn zoom_at(&mut self, screen: Point, zoom: f64) -> f64 {
        let applied = self.viewport.zoom_at(screen, zoom);
        self.record_viewport();
        applied
    }

    /// Shift the view by a screen-space delta.
    pub fn pan_by(&mut self, delta: Point) {
        self.viewport.pan_by(delta);
        self.record_viewport();
    }

    pub fn set_pan(&mut self, pan: Point) {
        self.viewport.set_pan(pan);
        self.record_viewport();
    }

    pub fn center_on(&mut self, world: Point) {
        self.viewport.center_on(world);
        self.record_viewport();
    }

    pub fn fit_to_bounds(&mut self, bounds: Bounds) {
        self.viewport.fit_to_bounds(bounds);
        self.record_viewport();
    }

    /// Fit every element on screen. No-op on an empty canvas.
    pub fn fit_to_content(&mut self) {
        let all: Vec<ElementId> = self.store.sorted_elements().into_iter().map(|el| el.id).collect();
        if let Some(bounds) = bounding_box(&self.store, &all) {
            self.fit_to_bounds(bounds);
        }
    }

    pub fn reset_viewport(&mut self) {
        self.viewport.reset();
        self.record_viewport();
    }

    pub fn set_screen_size(&mut self, size: Size) {
        self.viewport.set_screen_size(size);
    }

    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        self.viewport.world_to_screen(world)
    }

    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        self.viewport.screen_to_world(screen)
    }

    // --- Persistence ---

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            elements: self.store.sorted_elements().into_iter().cloned().collect(),
            viewport: self.viewport.state(),
        }
    }

    /// Replace the document and viewport with `snapshot`. On error the
    /// engine is left untouched. Selection and the change journal reset.
    ///
    /// # Errors
    ///
    /// `SnapshotError::Store` if two elements share an id.
    pub fn restore(&mut self, snapshot: Snapshot) -> Result<(), SnapshotError> {
        let mut store = ElementStore::new();
        for element in snapshot.elements {
            store.insert_existing(element)?;
        }
        self.store = store;
        self.viewport.apply_state(snapshot.viewport);
        self.selection.clear();
        self.changes.clear();
        info!(elements = self.store.len(), "snapshot restored");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `SnapshotError::Json` if serialization fails.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(&self.snapshot())?)
    }

    /// # Errors
    ///
    /// Returns `SnapshotError::Json` for malformed input and
    /// `SnapshotError::Store` for duplicate ids.
    pub fn restore_json(&mut self, json: &str) -> Result<(), SnapshotError> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        self.restore(snapshot)
    }

    /// Drain the change journal. Always empty unless the engine was built
    /// [`with_journal`](Engine::with_journal).
    pub fn take_changes(&mut self) -> Vec<Change> {
        std::mem::take(&mut self.changes)
    }

    // --- Journal ---

    fn existing(&self, ids: &[ElementId]) -> Vec<ElementId> {
        ids.iter().copied().filter(|id| self.store.contains(id)).collect()
    }

    fn record_created(&mut self, ids: &[ElementId]) {
        self.record_renumbered(ids);
        if !self.journal {
            return;
        }
        for id in ids {
            if let Some(element) = self.store.get(id) {
                self.changes.push(Change::Created { element: element.clone() });
            }
        }
    }

    fn record_updated(&mut self, ids: &[ElementId]) {
        self.record_renumbered(ids);
        if !self.journal {
            return;
        }
        for id in ids {
            if let Some(element) = self.store.get(id) {
                self.changes.push(Change::Updated { element: element.clone() });
            }
        }
    }

    /// Elements the store shifted while making room in the z-order, minus
    /// those the caller is about to record itself.
    fn record_renumbered(&mut self, skip: &[ElementId]) {
        let shifted = self.store.take_renumbered();
        if !self.journal {
            return;
        }
        for id in shifted.iter().filter(|id| !skip.contains(*id)) {
            if let Some(element) = self.store.get(id) {
                self.changes.push(Change::Updated { element: element.clone() });
            }
        }
    }

    fn record_deleted(&mut self, ids: &[ElementId]) {
        if self.journal {
            self.changes.extend(ids.iter().map(|id| Change::Deleted { id: *id }));
        }
    }

    fn record_viewport(&mut self) {
        if self.journal {
            self.changes.push(Change::ViewportChanged { viewport: self.viewport.state() });
        }
    }
}

fn mind_map_text(settings: &Map<String, Value>) -> String {
    ["text", "title", "centralIdea", "central_idea"]
        .iter()
        .find_map(|key| settings.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map_or_else(|| DEFAULT_MIND_MAP_TEXT.to_string(), str::to_string)
}

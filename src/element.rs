//! Element model: the canvas element entity, its per-type payloads, and the
//! spec/patch types used to create and edit elements.
//!
//! Every element shares the same geometric envelope (`position`, `size`,
//! `rotation`, `z_index`) and carries exactly one payload variant selected by
//! its type. Payloads serialize with an internal `"type"` tag so a snapshot
//! reads as flat JSON objects.

#[cfg(test)]
#[path = "element_test.rs"]
mod element_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geom::{Bounds, Point, Size, rotated_corners};
use crate::smart::{SmartKind, SmartPayload};

/// Unique identifier for a canvas element.
pub type ElementId = Uuid;

/// Identifier shared by every member of a group.
pub type GroupId = Uuid;

/// The closed set of element types, without payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    Shape,
    Text,
    Image,
    File,
    Document,
    Frame,
    MindmapNode,
    Smart,
}

/// Outline of a `shape` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    #[default]
    Rectangle,
    Ellipse,
    Triangle,
    Diamond,
    Star,
    Line,
    Arrow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeData {
    pub shape: ShapeKind,
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f64,
}

impl Default for ShapeData {
    fn default() -> Self {
        Self { shape: ShapeKind::Rectangle, fill: "#D94B4B".into(), stroke: "#1F1A17".into(), stroke_width: 1.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextData {
    pub content: String,
    pub font_size: f64,
    pub color: String,
}

impl Default for TextData {
    fn default() -> Self {
        Self { content: String::new(), font_size: 16.0, color: "#1F1A17".into() }
    }
}

/// Reference to an uploaded blob. The engine never touches the bytes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FileRef {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    pub url: String,
}

impl FileRef {
    /// Element type an upload of this MIME type should become.
    #[must_use]
    pub fn element_type(&self) -> ElementType {
        let mime = self.mime_type.to_ascii_lowercase();
        if mime.starts_with("image/") {
            ElementType::Image
        } else if mime == "application/pdf"
            || mime.starts_with("text/")
            || mime.contains("wordprocessingml")
            || mime.contains("spreadsheetml")
            || mime.contains("presentationml")
            || mime == "application/msword"
        {
            ElementType::Document
        } else {
            ElementType::File
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentData {
    pub file: FileRef,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FrameData {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MindmapNodeData {
    pub text: String,
    pub is_root: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ElementId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Type-specific content of an element. The variant *is* the element type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementPayload {
    Shape(ShapeData),
    Text(TextData),
    Image(FileRef),
    File(FileRef),
    Document(DocumentData),
    Frame(FrameData),
    MindmapNode(MindmapNodeData),
    Smart(SmartPayload),
}

impl ElementPayload {
    #[must_use]
    pub fn element_type(&self) -> ElementType {
        match self {
            Self::Shape(_) => ElementType::Shape,
            Self::Text(_) => ElementType::Text,
            Self::Image(_) => ElementType::Image,
            Self::File(_) => ElementType::File,
            Self::Document(_) => ElementType::Document,
            Self::Frame(_) => ElementType::Frame,
            Self::MindmapNode(_) => ElementType::MindmapNode,
            Self::Smart(_) => ElementType::Smart,
        }
    }

    /// Sub-kind of a smart widget, `None` for every other type.
    #[must_use]
    pub fn smart_kind(&self) -> Option<SmartKind> {
        match self {
            Self::Smart(payload) => Some(payload.kind()),
            _ => None,
        }
    }

    /// Wrap an uploaded file in the payload its MIME type calls for.
    #[must_use]
    pub fn from_upload(file: FileRef) -> Self {
        match file.element_type() {
            ElementType::Image => Self::Image(file),
            ElementType::Document => {
                let title = file.name.clone();
                Self::Document(DocumentData { file, title, page_count: None })
            }
            _ => Self::File(file),
        }
    }
}

/// Non-geometric bookkeeping attached to an element.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ElementMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
}

/// A canvas element as stored in the document and in snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasElement {
    pub id: ElementId,
    /// Top-left corner in world coordinates.
    pub position: Point,
    pub size: Size,
    /// Clockwise rotation in degrees around the element center.
    #[serde(default)]
    pub rotation: f64,
    /// Stacking order; lower values paint beneath higher values.
    pub z_index: i64,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub flip_x: bool,
    #[serde(default)]
    pub flip_y: bool,
    #[serde(default)]
    pub metadata: ElementMetadata,
    pub payload: ElementPayload,
}

impl CanvasElement {
    #[must_use]
    pub fn element_type(&self) -> ElementType {
        self.payload.element_type()
    }

    #[must_use]
    pub fn group_id(&self) -> Option<GroupId> {
        self.metadata.group_id
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.position.x + self.size.width / 2.0, self.position.y + self.size.height / 2.0)
    }

    /// World-space corners, rotation applied.
    #[must_use]
    pub fn corners(&self) -> [Point; 4] {
        rotated_corners(self.position, self.size, self.rotation)
    }

    /// Axis-aligned box covering the (possibly rotated) element.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        if self.rotation == 0.0 {
            return Bounds::from_rect(self.position, self.size);
        }
        let [a, b, c, d] = self.corners();
        Bounds::from_points([a, b, c, d]).unwrap_or_else(|| Bounds::from_rect(self.position, self.size))
    }

    /// Whether `world` lies on the element, honoring rotation.
    #[must_use]
    pub fn contains_point(&self, world: Point) -> bool {
        let local = world.rotate_around(self.center(), -self.rotation);
        Bounds::from_rect(self.position, self.size).contains_point(local)
    }
}

/// Everything needed to create an element; the store assigns id and z-order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementSpec {
    pub position: Point,
    pub size: Size,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub flip_x: bool,
    #[serde(default)]
    pub flip_y: bool,
    pub payload: ElementPayload,
}

impl ElementSpec {
    #[must_use]
    pub fn new(position: Point, size: Size, payload: ElementPayload) -> Self {
        Self { position, size, rotation: 0.0, locked: false, flip_x: false, flip_y: false, payload }
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    #[must_use]
    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    /// Spec that recreates `element` (minus identity and stacking) at an offset.
    #[must_use]
    pub fn from_element(element: &CanvasElement, offset: Point) -> Self {
        Self {
            position: element.position.offset(offset),
            size: element.size,
            rotation: element.rotation,
            locked: element.locked,
            flip_x: element.flip_x,
            flip_y: element.flip_y,
            payload: element.payload.clone(),
        }
    }
}

/// Sparse update for an element. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,
    /// Replacement payload; must be of the element's existing type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<ElementPayload>,
}

impl ElementPatch {
    /// Whether the patch moves, resizes, or rotates the element.
    #[must_use]
    pub fn touches_geometry(&self) -> bool {
        self.position.is_some() || self.size.is_some() || self.rotation.is_some()
    }
}

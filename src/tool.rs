//! Tool state: the active tool and which side panel it opens.
//!
//! Panel resolution depends on both the active tool and the current single
//! selection, so it is a pure function of the two (`resolve_panel`) rather
//! than state stored alongside the tool.

#[cfg(test)]
#[path = "tool_test.rs"]
mod tool_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::element::ElementType;

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    /// Pointer / selection tool (default).
    #[default]
    SelectionTool,
    /// Freehand pen that turns strokes into shapes.
    SmartPen,
    /// Draw and navigate frames.
    FrameTool,
    /// Upload images, documents, and other files.
    FileUploader,
    /// Create text elements.
    TextTool,
    /// Create shapes.
    ShapesTool,
    /// Pick and configure a smart widget.
    SmartElementTool,
}

impl Tool {
    pub const ALL: [Self; 7] = [
        Self::SelectionTool,
        Self::SmartPen,
        Self::FrameTool,
        Self::FileUploader,
        Self::TextTool,
        Self::ShapesTool,
        Self::SmartElementTool,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SelectionTool => "selection_tool",
            Self::SmartPen => "smart_pen",
            Self::FrameTool => "frame_tool",
            Self::FileUploader => "file_uploader",
            Self::TextTool => "text_tool",
            Self::ShapesTool => "shapes_tool",
            Self::SmartElementTool => "smart_element_tool",
        }
    }

    /// Settings panel this tool opens on its own, if any.
    #[must_use]
    pub fn panel(self) -> Option<Panel> {
        match self {
            Self::SelectionTool => None,
            Self::SmartPen => Some(Panel::SmartPenSettings),
            Self::FrameTool => Some(Panel::FrameNavigator),
            Self::FileUploader => Some(Panel::FileUploader),
            Self::TextTool => Some(Panel::TextSettings),
            Self::ShapesTool => Some(Panel::ShapesSettings),
            Self::SmartElementTool => Some(Panel::SmartElementPicker),
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tool: {0}")]
pub struct ToolParseError(pub String);

impl FromStr for Tool {
    type Err = ToolParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|tool| tool.as_str() == s).ok_or_else(|| ToolParseError(s.to_owned()))
    }
}

/// Side panels a host can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Panel {
    /// Inspector for a single selected document.
    DocumentInspector,
    /// Frame properties plus the frame navigator.
    FrameNavigator,
    SmartPenSettings,
    FileUploader,
    TextSettings,
    ShapesSettings,
    SmartElementPicker,
}

/// Decide which panel to show.
///
/// A single selected document wins, then frame context (the frame tool or a
/// single selected frame), then the active tool's own panel.
#[must_use]
pub fn resolve_panel(tool: Tool, single_selected: Option<ElementType>) -> Option<Panel> {
    match (tool, single_selected) {
        (_, Some(ElementType::Document)) => Some(Panel::DocumentInspector),
        (Tool::FrameTool, _) | (_, Some(ElementType::Frame)) => Some(Panel::FrameNavigator),
        (tool, _) => tool.panel(),
    }
}

/// The active tool. Switching is unconditional; the engine clears the
/// selection alongside.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToolState {
    active: Tool,
}

impl ToolState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn active(&self) -> Tool {
        self.active
    }

    /// Switch tools. Returns the tool that was active before.
    pub fn set(&mut self, tool: Tool) -> Tool {
        std::mem::replace(&mut self.active, tool)
    }

    /// Return to the selection tool.
    pub fn escape(&mut self) -> Tool {
        self.set(Tool::SelectionTool)
    }
}

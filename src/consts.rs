//! Shared numeric constants for the canvas engine.

// ── Viewport ────────────────────────────────────────────────────

/// Lowest zoom factor the viewport accepts (25%).
pub const MIN_ZOOM: f64 = 0.25;

/// Highest zoom factor the viewport accepts (500%).
pub const MAX_ZOOM: f64 = 5.0;

/// Screen-space margin left around content by `fit_to_bounds`, in pixels.
pub const FIT_PADDING_PX: f64 = 40.0;

// ── Clipboard ───────────────────────────────────────────────────

/// World-space offset applied to pasted copies on each axis.
pub const PASTE_OFFSET: f64 = 20.0;

// ── Smart elements ──────────────────────────────────────────────

/// Default footprint of a kanban board.
pub const KANBAN_SIZE: (f64, f64) = (640.0, 420.0);

/// Default footprint of a voting poll.
pub const VOTING_SIZE: (f64, f64) = (320.0, 280.0);

/// Default footprint of a timeline strip.
pub const TIMELINE_SIZE: (f64, f64) = (720.0, 180.0);

/// Default footprint of a checklist card.
pub const CHECKLIST_SIZE: (f64, f64) = (280.0, 320.0);

/// Default footprint of a mind-map root node.
pub const MINDMAP_NODE_SIZE: (f64, f64) = (180.0, 64.0);

/// Default footprint of an uploaded file or document tile.
pub const FILE_TILE_SIZE: (f64, f64) = (240.0, 300.0);

/// Upper bound on generated options, milestones, and checklist items.
pub const MAX_GENERATED_ITEMS: u32 = 50;

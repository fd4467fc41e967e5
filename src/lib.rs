//! In-memory engine for a freeform visual canvas board.
//!
//! The crate holds the document model for shapes, text, uploads, frames,
//! mind-map nodes, and smart widgets, together with the viewport transform
//! and the selection, transform, grouping, and clipboard operations that
//! tool panels drive. Rendering, networking, and persistence belong to the
//! host; the engine exposes read-only state, a change journal, and JSON
//! snapshots for them to consume.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Owned per-canvas [`engine::Engine`], change journal, snapshots |
//! | [`command`] | Serializable [`command::Command`] log replayed through the engine |
//! | [`element`] | Element entity, typed payloads, create/update specs |
//! | [`store`] | Element store: CRUD, paint order, frame and hit queries |
//! | [`viewport`] | Pan/zoom state and world/screen conversions |
//! | [`selection`] | Insertion-ordered selection and bounding boxes |
//! | [`transform`] | Align, flip, move, resize, rotate |
//! | [`group`] | Group membership via shared group ids |
//! | [`clipboard`] | Copy, cut, and paste with group remapping |
//! | [`tool`] | Active tool and panel resolution |
//! | [`smart`] | Smart widget settings and the initial payload factory |
//! | [`config`] | Engine limits read from the environment |
//! | [`geom`] | Points, sizes, and axis-aligned bounds |
//! | [`consts`] | Shared numeric constants (zoom limits, default sizes, etc.) |

pub mod clipboard;
pub mod command;
pub mod config;
pub mod consts;
pub mod element;
pub mod engine;
pub mod geom;
pub mod group;
pub mod selection;
pub mod smart;
pub mod store;
pub mod tool;
pub mod transform;
pub mod viewport;

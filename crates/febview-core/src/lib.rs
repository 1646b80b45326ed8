//! Core types for febview.
//!
//! This crate provides the geometry and view plumbing shared by the model
//! and the interactive view:
//! - [`Ray`], [`Transform`] and [`BoundingBox`] primitives
//! - screen rectangles and the segment/rectangle test
//! - selection [`Region`]s and the [`HitTest`] trait
//! - [`Camera`] and [`ViewTransform`] for world/screen mapping
//! - the construction [`Grid`], [`ColorMap`]s and [`ViewSettings`]

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Settings structs legitimately have many boolean flags
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
// Screen-space code names coordinates x0, y0, x1, y1
#![allow(clippy::many_single_char_names)]
#![allow(clippy::similar_names)]

pub mod camera;
pub mod color_map;
pub mod error;
pub mod grid;
pub mod math;
pub mod region;
pub mod screen;
pub mod settings;

pub use camera::{Camera, ProjectionMode, ViewTransform};
pub use color_map::{ColorMap, ColorMapRegistry, DEFAULT_COLOR_MAP};
pub use error::{FebviewError, Result};
pub use grid::Grid;
pub use math::{BoundingBox, Ray, Transform};
pub use region::{BoxRegion, CircleRegion, FreehandRegion, HitTest, Region, RegionStyle};
pub use screen::{segment_intersects_rect, ScreenRect, PICK_TOLERANCE};
pub use settings::{ViewSettings, MAX_PICK_TOLERANCE};

// Re-export glam types for convenience
pub use glam::{DQuat, DVec3, IVec2, Vec3};

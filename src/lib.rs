//! waterfall-rs: scrolling waterfall viewports for live time-series telemetry.
//!
//! Each viewport plots `(value, timestamp)` samples with values on the
//! horizontal axis and time on the vertical axis, newest at the top. The crate
//! owns the data model, the coordinate mapping, incremental redraw
//! scheduling, drag selection, and cursor sharing between viewports; actual
//! pixels are produced by a host-supplied [`render::DrawingSurface`].

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{RenderOutcome, WaterfallConfig, WaterfallEvent, WaterfallKind, WaterfallViewport};
pub use error::{WaterfallError, WaterfallResult};

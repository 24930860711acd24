mod cursor_overlay;
mod data_controller;
mod events;
mod pointer_controller;
mod render_coordinator;
mod render_state;
mod variant;
mod viewport;
mod viewport_config;

pub use events::{WaterfallEvent, WaterfallListener};
pub use render_coordinator::RenderOutcome;
pub use render_state::{RenderPass, RenderState, RenderStateMachine};
pub use variant::{
    OverlayHook, ReferenceLineHook, SeriesDrawMode, SeriesStyle, VariantDescriptor, WaterfallKind,
};
pub use viewport::WaterfallViewport;
pub use viewport_config::{GridConfig, WaterfallConfig};

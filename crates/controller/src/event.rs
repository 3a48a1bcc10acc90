use foundation::math::Vec2;
use scene::ViewTransform;

/// Notifications for the host, drained after each call into the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    DatasetLoaded { shapes: usize, skipped: usize },
    /// The dataset failed; only the background is drawn.
    Fallback { reason: String },
    HoverChanged { index: Option<usize> },
    TooltipMoved { position: Vec2 },
    SelectionChanged { index: Option<usize> },
    PanelShown { name: String },
    /// Draw order changed; the shape at `index` is now on top.
    Raised { index: usize },
    TransitionStarted { target: ViewTransform },
    ViewChanged { view: ViewTransform },
}

//! Cross-component coordination: a typed event channel plus the chart,
//! brush and legend units that talk over it.

pub mod brush_unit;
pub mod chart_unit;
pub mod event_bus;
pub mod legend_unit;
pub mod sync_phase;

pub use brush_unit::{
    BrushCallback, BrushGeometry, BrushUnit, HandleLabel, PreviewCurve, PreviewPoint,
    SelectionMode, brush_geometry, brush_total, resolve_selection,
};
pub use chart_unit::{ChartClick, ChartUnit};
pub use event_bus::{
    BusEvent, BusPayload, EventChannel, EventHandler, EventKind, RemoveTarget, SubscriberId,
    WeakEventChannel,
};
pub use legend_unit::{ACTIVE_LEGEND_TEXT_COLOR, INACTIVE_LEGEND_COLOR, LegendItem, LegendUnit};
pub use sync_phase::SyncPhase;

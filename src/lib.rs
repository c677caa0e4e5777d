//! tendency-chart: headless engine for brushable tendency (line) charts.
//!
//! The crate computes everything a host needs to draw a line chart, its
//! overview brush, legend and tooltip: the visible data window, scales,
//! axis ticks, projected line points and hover state. Drawing itself is
//! delegated to a [`render::Renderer`].
//!
//! Components coordinate over an [`interaction::EventChannel`] and can mount
//! in any order.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{BrushConfig, ChartConfig, ChartState, TextMetrics, compute_chart_state};
pub use crate::core::{DataIndex, Dataset, Datum, IndexRequest, Series, WindowPolicy, XValue, normalize};
pub use error::{TendencyError, TendencyResult};
pub use interaction::{
    BrushUnit, BusEvent, BusPayload, ChartUnit, EventChannel, EventKind, LegendUnit, SubscriberId,
    SyncPhase,
};
pub use render::{NullRenderer, RenderFrame, Renderer};

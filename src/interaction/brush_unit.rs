use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::api::{BrushConfig, ChartConfigPatch, CustomLine, GuideLine, TextMetrics, TextSize};
use crate::core::{
    DataIndex, Datum, IndexRequest, LinearScale, PointScale, WindowPolicy, XValue, normalize,
};

use super::event_bus::{BusPayload, EventChannel, EventKind, RemoveTarget, SubscriberId, WeakEventChannel};
use super::sync_phase::SyncPhase;

const LABEL_CACHE_GROUP: &str = "brush";
const PREVIEW_TOP_OFFSET: f64 = 1.0;

/// How a requested selection is reconciled with the step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// External range change: ignored unless the start already sits on a
    /// step boundary.
    Update,
    /// Drag: both ends snap to the step.
    Move,
}

/// Drag extent of the brush in its own pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrushGeometry {
    pub left: f64,
    pub right: f64,
    pub width: f64,
    pub height: f64,
    pub handle_width: f64,
}

impl BrushGeometry {
    #[must_use]
    pub fn extent(&self) -> (f64, f64) {
        (self.left, self.left + self.width)
    }
}

/// Margins leave room for the widest handle label on both sides.
#[must_use]
pub fn brush_geometry(config: &BrushConfig, preview: &[Datum], metrics: Option<&mut TextMetrics>) -> BrushGeometry {
    let total = brush_total(config, preview);
    let widest = total
        .checked_sub(1)
        .and_then(|last| preview.get(last))
        .map_or_else(|| total.to_string(), |datum| datum.text.to_string());
    let label = metrics.map_or_else(TextSize::default, |metrics| {
        metrics.measure(&widest, config.font_size, Some(LABEL_CACHE_GROUP))
    });

    let margin = label.width + config.handle_width / 2.0 + config.text_margin;
    BrushGeometry {
        left: margin,
        right: margin,
        width: (config.width - margin * 2.0).max(0.0),
        height: config.height,
        handle_width: config.handle_width,
    }
}

/// Explicit `length` wins over the preview length.
#[must_use]
pub fn brush_total(config: &BrushConfig, preview: &[Datum]) -> usize {
    config.length.unwrap_or(preview.len())
}

/// Reconciles a requested `[start, end]` with the step and total.
#[must_use]
pub fn resolve_selection(mode: SelectionMode, request: IndexRequest, previous: DataIndex) -> DataIndex {
    let next = normalize(request, &[], &WindowPolicy::StepAligned);
    if mode == SelectionMode::Move || next.total == 0 {
        return next;
    }

    let max_index = next.total - 1;
    let start = request
        .start_index
        .filter(|start| *start >= 0)
        .map_or(0, |start| start as usize);
    let end = request
        .end_index
        .filter(|end| *end >= 0)
        .map_or(max_index, |end| end as usize);
    let lower = start.min(end).min(max_index);

    if lower % next.step == 0 {
        next
    } else {
        trace!(start = lower, step = next.step, "keeping previous selection off step");
        normalize(
            IndexRequest::from(previous)
                .with_total(next.total)
                .with_step(next.step),
            &[],
            &WindowPolicy::StepAligned,
        )
    }
}

/// Label drawn beside a handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandleLabel {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreviewPoint {
    pub x: f64,
    pub y: f64,
}

/// Overview curve drawn behind the brush, in preview-local pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewCurve {
    pub translate_x: f64,
    pub width: f64,
    pub height: f64,
    pub points: Vec<PreviewPoint>,
    pub custom_lines: Vec<GuideLine>,
}

pub type BrushCallback = Box<dyn FnMut(DataIndex)>;

struct BrushInner {
    config: BrushConfig,
    preview: Vec<Datum>,
    preview_lines: Vec<CustomLine>,
    geometry: BrushGeometry,
    scale: LinearScale,
    selection: DataIndex,
    selection_px: (f64, f64),
    handle_drag: bool,
    phase: SyncPhase,
    metrics: Option<TextMetrics>,
    on_brush: Option<BrushCallback>,
    on_range_change: Option<BrushCallback>,
}

impl BrushInner {
    fn relayout(&mut self, mode: SelectionMode, request: IndexRequest) {
        self.geometry = brush_geometry(&self.config, &self.preview, self.metrics.as_mut());
        let total = brush_total(&self.config, &self.preview);
        let extent = self.geometry.extent();
        self.scale = LinearScale::lenient((0.0, total.saturating_sub(1) as f64), extent);
        self.selection = resolve_selection(
            mode,
            request.with_total(total).with_step(self.config.step),
            self.selection,
        );
        self.sync_pixels();
    }

    fn sync_pixels(&mut self) {
        self.selection_px = (
            self.scale.map(self.selection.start_index as f64),
            self.scale.map(self.selection.end_index as f64),
        );
    }

    fn index_at(&self, px: f64) -> i64 {
        let index = self.scale.invert(px).round();
        if index.is_finite() { index as i64 } else { 0 }
    }

    fn label_for(&self, index: usize) -> String {
        self.preview
            .get(index)
            .map_or_else(|| index.to_string(), |datum| datum.text.to_string())
    }
}

/// Brush role of the coordination protocol.
///
/// Owns a step-aligned selection over the full series and broadcasts it to
/// charts as `BrushMove`.
pub struct BrushUnit {
    id: SubscriberId,
    channel: Option<EventChannel>,
    inner: Rc<RefCell<BrushInner>>,
}

impl fmt::Debug for BrushUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("BrushUnit")
            .field("id", &self.id)
            .field("selection", &inner.selection)
            .field("phase", &inner.phase)
            .finish()
    }
}

impl BrushUnit {
    #[must_use]
    pub fn new(config: BrushConfig, preview: Vec<Datum>, channel: Option<EventChannel>) -> Self {
        Self::build(config, preview, channel, None)
    }

    /// Like [`BrushUnit::new`], measuring handle labels with `metrics`.
    #[must_use]
    pub fn with_metrics(
        config: BrushConfig,
        preview: Vec<Datum>,
        channel: Option<EventChannel>,
        metrics: TextMetrics,
    ) -> Self {
        Self::build(config, preview, channel, Some(metrics))
    }

    fn build(
        config: BrushConfig,
        preview: Vec<Datum>,
        channel: Option<EventChannel>,
        metrics: Option<TextMetrics>,
    ) -> Self {
        let request = IndexRequest::new(config.start_index, config.end_index);
        let mut inner = BrushInner {
            config,
            preview,
            preview_lines: Vec::new(),
            geometry: BrushGeometry {
                left: 0.0,
                right: 0.0,
                width: 0.0,
                height: 0.0,
                handle_width: 0.0,
            },
            scale: LinearScale::lenient((0.0, 0.0), (0.0, 0.0)),
            selection: DataIndex::default(),
            selection_px: (0.0, 0.0),
            handle_drag: false,
            phase: SyncPhase::Unmounted,
            metrics,
            on_brush: None,
            on_range_change: None,
        };
        inner.relayout(SelectionMode::Update, request);

        Self {
            id: SubscriberId::unique("brush"),
            channel,
            inner: Rc::new(RefCell::new(inner)),
        }
    }

    #[must_use]
    pub fn id(&self) -> &SubscriberId {
        &self.id
    }

    /// Fired on every drag step with the snapped selection.
    pub fn on_brush(&self, callback: impl FnMut(DataIndex) + 'static) {
        self.inner.borrow_mut().on_brush = Some(Box::new(callback));
    }

    /// Fired once a handle drag ends.
    pub fn on_range_change(&self, callback: impl FnMut(DataIndex) + 'static) {
        self.inner.borrow_mut().on_range_change = Some(Box::new(callback));
    }

    pub fn set_preview_lines(&self, lines: Vec<CustomLine>) {
        self.inner.borrow_mut().preview_lines = lines;
    }

    /// Answers late charts, then pushes the current selection once.
    pub fn mount(&self) {
        let Some(channel) = &self.channel else {
            self.inner.borrow_mut().phase = SyncPhase::Synced;
            return;
        };

        let link = BrushLink {
            inner: Rc::downgrade(&self.inner),
            channel: channel.downgrade(),
        };
        channel.register(EventKind::ChartMount, &self.id, move |_| {
            link.resend();
            Ok(())
        });

        self.inner.borrow_mut().phase = SyncPhase::AwaitingPeer;
        let selection = self.inner.borrow().selection;
        if dispatch(channel, selection) > 0 {
            let mut inner = self.inner.borrow_mut();
            inner.phase = inner.phase.on_peer_message();
        }
        debug!(brush = %self.id, start = selection.start_index, end = selection.end_index, "brush mounted");
    }

    pub fn unmount(&self) {
        if let Some(channel) = &self.channel {
            channel.remove(RemoveTarget::Subscriber(self.id.clone()));
        }
        self.inner.borrow_mut().phase = SyncPhase::Unmounted;
    }

    /// Marks the current drag as a handle drag.
    pub fn begin_handle_drag(&self) {
        self.inner.borrow_mut().handle_drag = true;
    }

    /// Moves the selection to the pixel span `[px0, px1]`.
    ///
    /// Handle drags broadcast only when `auto_dispatch_when_range_change` is
    /// set; body drags always broadcast.
    pub fn drag_to(&self, px0: f64, px1: f64) -> DataIndex {
        let (selection, should_dispatch, callback) = {
            let mut inner = self.inner.borrow_mut();
            let request = IndexRequest::new(Some(inner.index_at(px0)), Some(inner.index_at(px1)));
            let total = brush_total(&inner.config, &inner.preview);
            let step = inner.config.step;
            inner.selection = resolve_selection(
                SelectionMode::Move,
                request.with_total(total).with_step(step),
                inner.selection,
            );
            inner.sync_pixels();
            let should_dispatch = inner.config.auto_dispatch_when_range_change || !inner.handle_drag;
            (inner.selection, should_dispatch, inner.on_brush.take())
        };

        if should_dispatch {
            if let Some(channel) = &self.channel {
                dispatch(channel, selection);
            }
        }
        self.run_callback(callback, selection, |inner, callback| inner.on_brush = Some(callback));
        selection
    }

    /// Ends a drag; handle drags report the final range.
    pub fn end_drag(&self) {
        let callback = {
            let mut inner = self.inner.borrow_mut();
            if !inner.handle_drag {
                return;
            }
            inner.handle_drag = false;
            inner.on_range_change.take()
        };
        let selection = self.selection();
        self.run_callback(callback, selection, |inner, callback| {
            inner.on_range_change = Some(callback);
        });
    }

    /// Click outside the selection. With `auto_adjust_range_when_click`, the
    /// selection keeps its width and starts at `px`; clicks outside the drag
    /// extent select everything.
    pub fn click_at(&self, px: f64) -> DataIndex {
        let target = {
            let mut inner = self.inner.borrow_mut();
            inner.handle_drag = false;
            if !inner.config.auto_adjust_range_when_click {
                return inner.selection;
            }
            let (low, high) = inner.geometry.extent();
            if px < low || px > high {
                (low, high)
            } else {
                let width = inner.selection_px.1 - inner.selection_px.0;
                if px + width > high {
                    (high - width, high)
                } else {
                    (px, px + width)
                }
            }
        };
        self.drag_to(target.0, target.1)
    }

    /// External range change. Broadcasts when the selection moved.
    pub fn set_range(&self, start_index: Option<i64>, end_index: Option<i64>) -> DataIndex {
        let (before, after) = {
            let mut inner = self.inner.borrow_mut();
            let before = inner.selection;
            inner.config.start_index = start_index;
            inner.config.end_index = end_index;
            inner.relayout(SelectionMode::Update, IndexRequest::new(start_index, end_index));
            (before, inner.selection)
        };
        if !before.same_range(after) {
            if let Some(channel) = &self.channel {
                dispatch(channel, after);
            }
        }
        after
    }

    pub fn set_preview(&self, preview: Vec<Datum>) {
        let mut inner = self.inner.borrow_mut();
        inner.preview = preview;
        let request = IndexRequest::from(inner.selection);
        inner.relayout(SelectionMode::Update, request);
    }

    pub fn set_config(&self, config: BrushConfig) {
        let mut inner = self.inner.borrow_mut();
        let request = IndexRequest::new(config.start_index, config.end_index);
        inner.config = config;
        inner.relayout(SelectionMode::Update, request);
    }

    #[must_use]
    pub fn selection(&self) -> DataIndex {
        self.inner.borrow().selection
    }

    #[must_use]
    pub fn selection_px(&self) -> (f64, f64) {
        self.inner.borrow().selection_px
    }

    #[must_use]
    pub fn geometry(&self) -> BrushGeometry {
        self.inner.borrow().geometry
    }

    #[must_use]
    pub fn phase(&self) -> SyncPhase {
        self.inner.borrow().phase
    }

    /// Start label left of the start handle, end label right of the end handle.
    #[must_use]
    pub fn handle_labels(&self) -> (HandleLabel, HandleLabel) {
        let mut inner = self.inner.borrow_mut();
        let start_text = inner.label_for(inner.selection.start_index);
        let end_text = inner.label_for(inner.selection.end_index);
        let font_size = inner.config.font_size;
        let (start_size, end_size) = match inner.metrics.as_mut() {
            Some(metrics) => (
                metrics.measure(&start_text, font_size, Some(LABEL_CACHE_GROUP)),
                metrics.measure(&end_text, font_size, Some(LABEL_CACHE_GROUP)),
            ),
            None => (TextSize::default(), TextSize::default()),
        };

        let half_handle = inner.config.handle_width / 2.0;
        let margin = inner.config.text_margin;
        let height = inner.geometry.height;
        (
            HandleLabel {
                x: inner.selection_px.0 - half_handle - start_size.width - margin,
                y: (height + start_size.height) / 2.0,
                text: start_text,
            },
            HandleLabel {
                x: inner.selection_px.1 + half_handle + margin,
                y: (height + end_size.height) / 2.0,
                text: end_text,
            },
        )
    }

    /// Overview of the whole preview series plus its marker lines.
    #[must_use]
    pub fn preview_curve(&self) -> PreviewCurve {
        let inner = self.inner.borrow();
        let geometry = inner.geometry;
        let width = geometry.width + geometry.handle_width;
        let height = geometry.height;
        let labels: Vec<XValue> = inner
            .preview
            .iter()
            .enumerate()
            .map(|(index, datum)| match &datum.text {
                XValue::Text(text) if text.is_empty() => XValue::from(index),
                other => other.clone(),
            })
            .collect();

        let x_scale = if inner.config.linear {
            let first = labels.first().and_then(XValue::as_f64).unwrap_or(0.0);
            let last = labels.last().and_then(XValue::as_f64).unwrap_or(0.0);
            PreviewX::Linear(LinearScale::lenient((first, last), (0.0, width)))
        } else {
            PreviewX::Point(PointScale::new(labels.iter().cloned(), (0.0, width)))
        };

        let (min_y, max_y) = inner
            .preview
            .iter()
            .map(|datum| datum.value)
            .filter(|value| value.is_finite())
            .fold((0.0_f64, 0.0_f64), |(lo, hi), value| (lo.min(value), hi.max(value)));
        let y_scale = LinearScale::lenient((min_y, max_y), (height, PREVIEW_TOP_OFFSET));

        let points = inner
            .preview
            .iter()
            .zip(&labels)
            .filter_map(|(datum, label)| {
                let x = x_scale.map(label)?;
                datum.value.is_finite().then(|| PreviewPoint {
                    x,
                    y: y_scale.map(datum.value),
                })
            })
            .collect();

        let custom_lines = inner
            .preview_lines
            .iter()
            .filter_map(|line| {
                x_scale.map(&line.tick_value).map(|x| GuideLine {
                    x1: x + 0.5,
                    y1: height,
                    x2: x + 0.5,
                    y2: 0.0,
                    stroke_width: line.stroke_width,
                    stroke_color: line.stroke_color.clone(),
                })
            })
            .collect();

        PreviewCurve {
            translate_x: geometry.left - geometry.handle_width / 2.0,
            width,
            height,
            points,
            custom_lines,
        }
    }

    fn run_callback(
        &self,
        callback: Option<BrushCallback>,
        selection: DataIndex,
        restore: impl FnOnce(&mut BrushInner, BrushCallback),
    ) {
        let Some(mut callback) = callback else {
            return;
        };
        callback(selection);
        restore(&mut self.inner.borrow_mut(), callback);
    }
}

enum PreviewX {
    Linear(LinearScale),
    Point(PointScale),
}

impl PreviewX {
    fn map(&self, label: &XValue) -> Option<f64> {
        match self {
            Self::Linear(scale) => label.as_f64().map(|x| scale.map(x)),
            Self::Point(scale) => scale.map(label),
        }
    }
}

fn dispatch(channel: &EventChannel, selection: DataIndex) -> usize {
    channel.emit(
        EventKind::BrushMove,
        &BusPayload::BrushMove {
            selection_index: selection,
            config: ChartConfigPatch::default(),
        },
    )
}

struct BrushLink {
    inner: Weak<RefCell<BrushInner>>,
    channel: WeakEventChannel,
}

impl BrushLink {
    fn resend(&self) {
        let Some(inner) = self.inner.upgrade() else {
            return;
        };
        let selection = {
            let mut inner = inner.borrow_mut();
            inner.phase = inner.phase.on_peer_message();
            inner.selection
        };
        if let Some(channel) = self.channel.upgrade() {
            dispatch(&channel, selection);
        }
    }
}

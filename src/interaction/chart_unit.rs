use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, trace, warn};

use crate::api::{
    ChartConfig, ChartInputs, ChartState, LineVisibility, TextMetrics, TooltipSource,
    compute_chart_state,
};
use crate::core::{DataIndex, Dataset, IndexRequest};
use crate::error::TendencyResult;
use crate::render::{RenderFrame, Renderer};

use super::event_bus::{BusPayload, EventChannel, EventKind, RemoveTarget, SubscriberId, WeakEventChannel};
use super::sync_phase::SyncPhase;

/// Snapshot handed to chart click callbacks.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartClick {
    pub state: ChartState,
    pub index: DataIndex,
}

struct ChartInner<R> {
    dataset: Dataset,
    config: ChartConfig,
    request: IndexRequest,
    state: ChartState,
    renderer: R,
    metrics: Option<TextMetrics>,
    phase: SyncPhase,
    revision: u64,
}

impl<R: Renderer> ChartInner<R> {
    fn recompute(&mut self, legend_present: bool) {
        let previous_tooltip = self.state.tooltip.to_signal();
        self.state = compute_chart_state(
            ChartInputs {
                dataset: &self.dataset,
                config: &self.config,
                request: self.request,
                previous_visibility: &self.state.visibility,
                legend_present,
            },
            self.metrics.as_mut(),
        );
        if previous_tooltip.is_tooltip_active {
            self.state.apply_tooltip(TooltipSource::Relayed(&previous_tooltip));
        }
        self.revision += 1;
    }

    fn render(&mut self) -> TendencyResult<()> {
        let frame = RenderFrame::from_state(&self.state, &self.config, self.metrics.as_mut());
        self.renderer.render(&frame).inspect_err(|err| {
            warn!(error = %err, "chart render failed");
        })
    }
}

/// Chart role of the coordination protocol.
///
/// Owns its derived [`ChartState`] and renderer. When attached to a channel
/// it follows brush selections, mirrors peer tooltips and shares line
/// visibility with a legend.
pub struct ChartUnit<R: Renderer + 'static> {
    id: SubscriberId,
    channel: Option<EventChannel>,
    inner: Rc<RefCell<ChartInner<R>>>,
}

impl<R: Renderer + 'static> ChartUnit<R> {
    /// Validates `config` and derives the initial state. Nothing is rendered
    /// or emitted until [`ChartUnit::mount`].
    pub fn new(
        renderer: R,
        dataset: Dataset,
        config: ChartConfig,
        channel: Option<EventChannel>,
    ) -> TendencyResult<Self> {
        let config = config.validate()?;
        let request = config.index_request();
        let legend_present = legend_present(channel.as_ref());

        let inner = ChartInner {
            state: compute_chart_state(
                ChartInputs {
                    dataset: &dataset,
                    config: &config,
                    request,
                    previous_visibility: &[],
                    legend_present,
                },
                None,
            ),
            dataset,
            config,
            request,
            renderer,
            metrics: None,
            phase: SyncPhase::Unmounted,
            revision: 1,
        };

        Ok(Self {
            id: SubscriberId::unique("chart"),
            channel,
            inner: Rc::new(RefCell::new(inner)),
        })
    }

    /// Measures labels through `metrics` from now on.
    #[must_use]
    pub fn with_metrics(self, metrics: TextMetrics) -> Self {
        {
            let mut inner = self.inner.borrow_mut();
            inner.metrics = Some(metrics);
            let legend = legend_present(self.channel.as_ref());
            inner.recompute(legend);
        }
        self
    }

    #[must_use]
    pub fn id(&self) -> &SubscriberId {
        &self.id
    }

    /// Registers handlers, renders, then announces itself and its lines.
    pub fn mount(&self) -> TendencyResult<()> {
        if let Some(channel) = &self.channel {
            self.register_handlers(channel);
        }

        let lines = {
            let mut inner = self.inner.borrow_mut();
            inner.phase = if self.channel.is_some() {
                SyncPhase::AwaitingPeer
            } else {
                SyncPhase::Synced
            };
            inner.render()?;
            inner.state.visibility.clone()
        };

        if let Some(channel) = &self.channel {
            let answered = channel.emit(EventKind::ChartMount, &BusPayload::None)
                + channel.emit(EventKind::LegendReceiveData, &BusPayload::LegendData(lines));
            if answered > 0 {
                let mut inner = self.inner.borrow_mut();
                inner.phase = inner.phase.on_peer_message();
            }
        }
        debug!(chart = %self.id, "chart mounted");
        Ok(())
    }

    /// Removes this chart's subscriptions only.
    pub fn unmount(&self) {
        if let Some(channel) = &self.channel {
            channel.remove(RemoveTarget::Subscriber(self.id.clone()));
        }
        self.inner.borrow_mut().phase = SyncPhase::Unmounted;
        debug!(chart = %self.id, "chart unmounted");
    }

    /// Resolves the tooltip under the pointer and mirrors it to peer charts.
    pub fn pointer_move(&self, x: f64, y: f64) -> TendencyResult<()> {
        let signal = {
            let mut inner = self.inner.borrow_mut();
            if !inner.config.tooltip.show {
                trace!(chart = %self.id, "pointer ignored with tooltip disabled");
                return Ok(());
            }
            let signal = inner
                .state
                .apply_tooltip(TooltipSource::Pointer { x, y })
                .to_signal();
            inner.render()?;
            signal
        };

        if let Some(channel) = &self.channel {
            channel.emit(EventKind::TooltipMove, &BusPayload::Tooltip(signal));
        }
        Ok(())
    }

    pub fn pointer_leave(&self) -> TendencyResult<()> {
        {
            let mut inner = self.inner.borrow_mut();
            if !inner.config.tooltip.show {
                return Ok(());
            }
            inner.state.hide_tooltip();
            inner.render()?;
        }
        if let Some(channel) = &self.channel {
            channel.emit(EventKind::TooltipLeave, &BusPayload::None);
        }
        Ok(())
    }

    /// Replaces the dataset. The window keeps its bounds and step, while the
    /// total is taken from the new reference series.
    pub fn set_dataset(&self, dataset: Dataset) -> TendencyResult<()> {
        self.update(|inner| {
            inner.request.total = None;
            inner.dataset = dataset;
        })
    }

    /// Replaces the config. A bound of the current window is only replaced
    /// when the configured bound itself changed.
    pub fn set_config(&self, config: ChartConfig) -> TendencyResult<()> {
        let config = config.validate()?;
        self.update(|inner| {
            if config.start_index != inner.config.start_index {
                inner.request.start_index = config.start_index;
            }
            if config.end_index != inner.config.end_index {
                inner.request.end_index = config.end_index;
            }
            inner.request.total = None;
            inner.config = config;
        })
    }

    pub fn resize(&self, width: f64, height: f64) -> TendencyResult<()> {
        let mut config = self.inner.borrow().config.clone();
        config.width = width;
        config.height = height;
        let config = config.validate()?;
        self.update(|inner| inner.config = config)
    }

    /// Current state and window, as passed to click callbacks.
    #[must_use]
    pub fn click(&self) -> ChartClick {
        let inner = self.inner.borrow();
        ChartClick {
            state: inner.state.clone(),
            index: inner.state.index,
        }
    }

    #[must_use]
    pub fn state(&self) -> ChartState {
        self.inner.borrow().state.clone()
    }

    #[must_use]
    pub fn data_index(&self) -> DataIndex {
        self.inner.borrow().state.index
    }

    #[must_use]
    pub fn visibility(&self) -> Vec<LineVisibility> {
        self.inner.borrow().state.visibility.clone()
    }

    #[must_use]
    pub fn phase(&self) -> SyncPhase {
        self.inner.borrow().phase
    }

    /// Number of state recomputes so far.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.inner.borrow().revision
    }

    /// Runs `f` against the renderer.
    pub fn with_renderer<T>(&self, f: impl FnOnce(&R) -> T) -> T {
        f(&self.inner.borrow().renderer)
    }

    fn update(&self, change: impl FnOnce(&mut ChartInner<R>)) -> TendencyResult<()> {
        let legend = legend_present(self.channel.as_ref());
        let (result, changed_lines) = {
            let mut inner = self.inner.borrow_mut();
            let before = inner.state.visibility.clone();
            change(&mut *inner);
            inner.recompute(legend);
            let result = if inner.phase.is_mounted() {
                inner.render()
            } else {
                Ok(())
            };
            let changed = (inner.state.visibility != before).then(|| inner.state.visibility.clone());
            (result, changed)
        };

        if let (Some(channel), Some(lines)) = (&self.channel, changed_lines) {
            channel.emit(EventKind::LegendReceiveData, &BusPayload::LegendData(lines));
        }
        result
    }

    fn register_handlers(&self, channel: &EventChannel) {
        let link = ChartLink {
            inner: Rc::downgrade(&self.inner),
            channel: channel.downgrade(),
            legend_present: legend_present(Some(channel)),
        };

        let on_brush = link.clone();
        channel.register(EventKind::BrushMove, &self.id, move |payload| {
            on_brush.on_brush_move(payload)
        });
        let on_tooltip = link.clone();
        channel.register(EventKind::TooltipMove, &self.id, move |payload| {
            on_tooltip.on_tooltip_move(payload)
        });
        let on_leave = link.clone();
        channel.register(EventKind::TooltipLeave, &self.id, move |_| {
            on_leave.on_tooltip_leave()
        });
        let on_click = link.clone();
        channel.register(EventKind::LegendClick, &self.id, move |payload| {
            on_click.on_legend_click(payload)
        });
        channel.register(EventKind::LegendMount, &self.id, move |_| {
            link.send_lines();
            Ok(())
        });
    }
}

fn legend_present(channel: Option<&EventChannel>) -> bool {
    channel.is_some_and(|channel| channel.is_declared(EventKind::LegendReceiveData))
}

/// Weak view of a chart captured by its bus handlers.
struct ChartLink<R> {
    inner: Weak<RefCell<ChartInner<R>>>,
    channel: WeakEventChannel,
    legend_present: bool,
}

impl<R> Clone for ChartLink<R> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            channel: self.channel.clone(),
            legend_present: self.legend_present,
        }
    }
}

impl<R: Renderer> ChartLink<R> {
    fn on_brush_move(&self, payload: &BusPayload) -> TendencyResult<()> {
        let BusPayload::BrushMove {
            selection_index,
            config,
        } = payload
        else {
            return Ok(());
        };
        let Some(inner) = self.inner.upgrade() else {
            return Ok(());
        };
        let mut inner = inner.borrow_mut();
        inner.phase = inner.phase.on_peer_message();

        if selection_index.same_range(inner.state.index) {
            trace!(
                start = selection_index.start_index,
                end = selection_index.end_index,
                "ignoring brush move with unchanged range"
            );
            return Ok(());
        }

        config.apply(&mut inner.config);
        inner.request = IndexRequest::from(*selection_index);
        inner.recompute(self.legend_present);
        inner.render()
    }

    fn on_tooltip_move(&self, payload: &BusPayload) -> TendencyResult<()> {
        let BusPayload::Tooltip(signal) = payload else {
            return Ok(());
        };
        let Some(inner) = self.inner.upgrade() else {
            return Ok(());
        };
        let mut inner = inner.borrow_mut();
        if !inner.config.tooltip.show {
            return Ok(());
        }
        inner.state.apply_tooltip(TooltipSource::Relayed(signal));
        inner.render()
    }

    fn on_tooltip_leave(&self) -> TendencyResult<()> {
        let Some(inner) = self.inner.upgrade() else {
            return Ok(());
        };
        let mut inner = inner.borrow_mut();
        if !inner.state.tooltip.active {
            return Ok(());
        }
        inner.state.hide_tooltip();
        inner.render()
    }

    fn on_legend_click(&self, payload: &BusPayload) -> TendencyResult<()> {
        let BusPayload::LegendClick(index) = payload else {
            return Ok(());
        };
        let Some(inner) = self.inner.upgrade() else {
            return Ok(());
        };
        let (result, lines) = {
            let mut inner = inner.borrow_mut();
            inner.phase = inner.phase.on_peer_message();
            if !inner.state.toggle_line(*index) {
                return Ok(());
            }
            (inner.render(), inner.state.visibility.clone())
        };
        self.emit_lines(lines);
        result
    }

    fn send_lines(&self) {
        let Some(inner) = self.inner.upgrade() else {
            return;
        };
        let lines = {
            let mut inner = inner.borrow_mut();
            inner.phase = inner.phase.on_peer_message();
            inner.state.visibility.clone()
        };
        self.emit_lines(lines);
    }

    fn emit_lines(&self, lines: Vec<LineVisibility>) {
        if let Some(channel) = self.channel.upgrade() {
            channel.emit(EventKind::LegendReceiveData, &BusPayload::LegendData(lines));
        }
    }
}

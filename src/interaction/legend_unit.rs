use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::LineVisibility;
use crate::core::XValue;
use crate::error::{TendencyError, TendencyResult};

use super::event_bus::{BusPayload, EventChannel, EventKind, RemoveTarget, SubscriberId};
use super::sync_phase::SyncPhase;

pub const INACTIVE_LEGEND_COLOR: &str = "#ccc";
pub const ACTIVE_LEGEND_TEXT_COLOR: &str = "#7e7e7e";

/// One rendered legend entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendItem {
    pub name: XValue,
    pub swatch_color: String,
    pub text_color: String,
    pub active: bool,
}

impl From<&LineVisibility> for LegendItem {
    fn from(line: &LineVisibility) -> Self {
        if line.active {
            Self {
                name: line.name.clone(),
                swatch_color: line.color.clone(),
                text_color: ACTIVE_LEGEND_TEXT_COLOR.to_owned(),
                active: true,
            }
        } else {
            Self {
                name: line.name.clone(),
                swatch_color: INACTIVE_LEGEND_COLOR.to_owned(),
                text_color: INACTIVE_LEGEND_COLOR.to_owned(),
                active: false,
            }
        }
    }
}

#[derive(Debug, Default)]
struct LegendInner {
    lines: Vec<LineVisibility>,
    phase: SyncPhase,
}

/// Legend role: mirrors the chart's line visibility and reports clicks.
///
/// Has no meaning without a channel, so one is required.
#[derive(Debug)]
pub struct LegendUnit {
    id: SubscriberId,
    channel: EventChannel,
    inner: Rc<RefCell<LegendInner>>,
}

impl LegendUnit {
    #[must_use]
    pub fn new(channel: EventChannel) -> Self {
        Self {
            id: SubscriberId::unique("legend"),
            channel,
            inner: Rc::new(RefCell::new(LegendInner::default())),
        }
    }

    #[must_use]
    pub fn id(&self) -> &SubscriberId {
        &self.id
    }

    /// Starts listening for line data, then asks the chart for it.
    pub fn mount(&self) {
        let inner = Rc::downgrade(&self.inner);
        self.channel
            .register(EventKind::LegendReceiveData, &self.id, move |payload| {
                let BusPayload::LegendData(lines) = payload else {
                    return Err(TendencyError::InvalidData(
                        "legend data event without line payload".to_owned(),
                    ));
                };
                if let Some(inner) = inner.upgrade() {
                    let mut inner = inner.borrow_mut();
                    inner.lines = lines.clone();
                    inner.phase = inner.phase.on_peer_message();
                }
                Ok(())
            });

        self.inner.borrow_mut().phase = SyncPhase::AwaitingPeer;
        self.channel.emit(EventKind::LegendMount, &BusPayload::None);
        debug!(legend = %self.id, "legend mounted");
    }

    pub fn unmount(&self) {
        self.channel.remove(RemoveTarget::Subscriber(self.id.clone()));
        self.inner.borrow_mut().phase = SyncPhase::Unmounted;
    }

    /// Asks the chart to toggle line `index`. The legend redraws once the
    /// chart answers with fresh data.
    pub fn click(&self, index: usize) -> TendencyResult<()> {
        let known = self.inner.borrow().lines.len();
        if index >= known {
            return Err(TendencyError::InvalidData(format!(
                "legend index {index} out of range for {known} lines"
            )));
        }
        self.channel
            .emit(EventKind::LegendClick, &BusPayload::LegendClick(index));
        Ok(())
    }

    #[must_use]
    pub fn items(&self) -> Vec<LegendItem> {
        self.inner.borrow().lines.iter().map(LegendItem::from).collect()
    }

    #[must_use]
    pub fn lines(&self) -> Vec<LineVisibility> {
        self.inner.borrow().lines.clone()
    }

    #[must_use]
    pub fn phase(&self) -> SyncPhase {
        self.inner.borrow().phase
    }
}

use std::cell::RefCell;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::api::{ChartConfigPatch, LineVisibility, TooltipSignal};
use crate::core::DataIndex;
use crate::error::{TendencyError, TendencyResult};

/// Closed set of coordination events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    #[serde(rename = "chartMount")]
    ChartMount,
    #[serde(rename = "brushMount")]
    BrushMount,
    #[serde(rename = "brushMove")]
    BrushMove,
    #[serde(rename = "toolTipMove")]
    TooltipMove,
    #[serde(rename = "toolTipLeave")]
    TooltipLeave,
    #[serde(rename = "legendMount")]
    LegendMount,
    #[serde(rename = "legendClick")]
    LegendClick,
    #[serde(rename = "legendReceiveData")]
    LegendReceiveData,
}

impl EventKind {
    pub const CHART: &'static [Self] = &[Self::ChartMount];
    pub const BRUSH: &'static [Self] = &[Self::BrushMount, Self::BrushMove];
    pub const TOOLTIP: &'static [Self] = &[Self::TooltipMove, Self::TooltipLeave];
    pub const LEGEND: &'static [Self] = &[
        Self::LegendMount,
        Self::LegendClick,
        Self::LegendReceiveData,
    ];
    pub const ALL: &'static [Self] = &[
        Self::ChartMount,
        Self::BrushMount,
        Self::BrushMove,
        Self::TooltipMove,
        Self::TooltipLeave,
        Self::LegendMount,
        Self::LegendClick,
        Self::LegendReceiveData,
    ];

    #[must_use]
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::ChartMount => "chartMount",
            Self::BrushMount => "brushMount",
            Self::BrushMove => "brushMove",
            Self::TooltipMove => "toolTipMove",
            Self::TooltipLeave => "toolTipLeave",
            Self::LegendMount => "legendMount",
            Self::LegendClick => "legendClick",
            Self::LegendReceiveData => "legendReceiveData",
        }
    }

    #[must_use]
    pub fn from_wire_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.wire_name() == name)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

static NEXT_SUBSCRIBER: AtomicU64 = AtomicU64::new(1);

/// Per-instance identity used to scope subscriptions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriberId(String);

impl SubscriberId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Process-unique id of the form `<prefix>-<n>`.
    #[must_use]
    pub fn unique(prefix: &str) -> Self {
        let n = NEXT_SUBSCRIBER.fetch_add(1, Ordering::Relaxed);
        Self(format!("{prefix}-{n}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Data carried by a bus event.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum BusPayload {
    #[default]
    None,
    #[serde(rename_all = "camelCase")]
    BrushMove {
        selection_index: DataIndex,
        #[serde(default)]
        config: ChartConfigPatch,
    },
    LegendClick(usize),
    LegendData(Vec<LineVisibility>),
    Tooltip(TooltipSignal),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusEvent {
    pub kind: EventKind,
    pub payload: BusPayload,
}

impl BusEvent {
    #[must_use]
    pub fn new(kind: EventKind, payload: BusPayload) -> Self {
        Self { kind, payload }
    }
}

pub type EventHandler = Box<dyn FnMut(&BusPayload) -> TendencyResult<()>>;

type SharedHandler = Rc<RefCell<EventHandler>>;

/// What [`EventChannel::remove`] drops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveTarget {
    All,
    Kind(EventKind),
    Kinds(Vec<EventKind>),
    Subscription {
        kind: EventKind,
        subscriber: SubscriberId,
    },
    Subscriber(SubscriberId),
}

impl RemoveTarget {
    fn matches(&self, kind: EventKind, subscriber: &SubscriberId) -> bool {
        match self {
            Self::All => true,
            Self::Kind(target) => *target == kind,
            Self::Kinds(targets) => targets.contains(&kind),
            Self::Subscription {
                kind: target_kind,
                subscriber: target_subscriber,
            } => *target_kind == kind && target_subscriber == subscriber,
            Self::Subscriber(target) => target == subscriber,
        }
    }
}

struct Subscription {
    kind: EventKind,
    subscriber: SubscriberId,
    handler: SharedHandler,
}

struct ChannelInner {
    declared: SmallVec<[EventKind; 8]>,
    subscriptions: Vec<Subscription>,
    faults: u64,
}

/// Single-threaded publish/subscribe channel shared by collaborating units.
///
/// Cloning yields another handle to the same channel. Dispatch is synchronous
/// and runs in registration order; handlers may emit, register or remove
/// while being dispatched.
#[derive(Clone)]
pub struct EventChannel {
    inner: Rc<RefCell<ChannelInner>>,
}

/// Non-owning handle captured by handlers so subscriptions never keep their
/// own channel alive.
#[derive(Clone, Default)]
pub struct WeakEventChannel {
    inner: Weak<RefCell<ChannelInner>>,
}

impl WeakEventChannel {
    #[must_use]
    pub fn upgrade(&self) -> Option<EventChannel> {
        self.inner.upgrade().map(|inner| EventChannel { inner })
    }
}

impl fmt::Debug for WeakEventChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakEventChannel")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

impl fmt::Debug for EventChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("EventChannel")
            .field("declared", &inner.declared)
            .field("subscriptions", &inner.subscriptions.len())
            .field("faults", &inner.faults)
            .finish()
    }
}

impl Default for EventChannel {
    fn default() -> Self {
        Self::all()
    }
}

impl EventChannel {
    /// Channel carrying exactly `kinds`.
    #[must_use]
    pub fn new(kinds: &[EventKind]) -> Self {
        let mut declared: SmallVec<[EventKind; 8]> = SmallVec::new();
        for kind in kinds {
            if !declared.contains(kind) {
                declared.push(*kind);
            }
        }
        Self {
            inner: Rc::new(RefCell::new(ChannelInner {
                declared,
                subscriptions: Vec::new(),
                faults: 0,
            })),
        }
    }

    #[must_use]
    pub fn all() -> Self {
        Self::new(EventKind::ALL)
    }

    #[must_use]
    pub fn downgrade(&self) -> WeakEventChannel {
        WeakEventChannel {
            inner: Rc::downgrade(&self.inner),
        }
    }

    #[must_use]
    pub fn is_declared(&self, kind: EventKind) -> bool {
        self.inner.borrow().declared.contains(&kind)
    }

    /// Registers `handler` under `(kind, subscriber)`, replacing any handler
    /// already registered with that identity.
    ///
    /// Returns the subscription name `"<wireName>.<subscriber>"`, or `None`
    /// when the channel does not carry `kind`.
    pub fn register<F>(&self, kind: EventKind, subscriber: &SubscriberId, handler: F) -> Option<String>
    where
        F: FnMut(&BusPayload) -> TendencyResult<()> + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        if !inner.declared.contains(&kind) {
            debug!(event = %kind, subscriber = %subscriber, "ignoring registration for undeclared event");
            return None;
        }

        let handler: SharedHandler = Rc::new(RefCell::new(Box::new(handler)));
        match inner
            .subscriptions
            .iter_mut()
            .find(|entry| entry.kind == kind && entry.subscriber == *subscriber)
        {
            Some(entry) => {
                trace!(event = %kind, subscriber = %subscriber, "replacing handler");
                entry.handler = handler;
            }
            None => inner.subscriptions.push(Subscription {
                kind,
                subscriber: subscriber.clone(),
                handler,
            }),
        }
        Some(subscription_name(kind, subscriber))
    }

    /// Dispatches `payload` to every handler of `kind`. Returns how many
    /// handlers completed successfully.
    ///
    /// Handler errors and panics are logged and counted; they never reach
    /// the caller and never stop later handlers.
    pub fn emit(&self, kind: EventKind, payload: &BusPayload) -> usize {
        let snapshot: SmallVec<[(SubscriberId, SharedHandler); 4]> = {
            let inner = self.inner.borrow();
            if !inner.declared.contains(&kind) {
                debug!(event = %kind, "ignoring emit for undeclared event");
                return 0;
            }
            inner
                .subscriptions
                .iter()
                .filter(|entry| entry.kind == kind)
                .map(|entry| (entry.subscriber.clone(), entry.handler.clone()))
                .collect()
        };

        let mut delivered = 0;
        for (subscriber, handler) in snapshot {
            if !self.is_live(kind, &handler) {
                trace!(event = %kind, subscriber = %subscriber, "handler removed during dispatch");
                continue;
            }
            let Ok(mut callback) = handler.try_borrow_mut() else {
                debug!(event = %kind, subscriber = %subscriber, "skipping re-entrant handler");
                continue;
            };

            let outcome = {
                let callback: &mut EventHandler = &mut callback;
                catch_unwind(AssertUnwindSafe(|| callback(payload)))
            };
            drop(callback);
            match outcome {
                Ok(Ok(())) => delivered += 1,
                Ok(Err(err)) => self.record_fault(kind, &subscriber, err.to_string()),
                Err(panic) => self.record_fault(kind, &subscriber, panic_message(panic.as_ref())),
            }
        }
        delivered
    }

    /// Removes matching subscriptions and returns how many were dropped.
    pub fn remove(&self, target: RemoveTarget) -> usize {
        let mut inner = self.inner.borrow_mut();
        let before = inner.subscriptions.len();
        inner
            .subscriptions
            .retain(|entry| !target.matches(entry.kind, &entry.subscriber));
        let removed = before - inner.subscriptions.len();
        trace!(?target, removed, "subscriptions removed");
        removed
    }

    #[must_use]
    pub fn subscription_names(&self) -> Vec<String> {
        self.inner
            .borrow()
            .subscriptions
            .iter()
            .map(|entry| subscription_name(entry.kind, &entry.subscriber))
            .collect()
    }

    #[must_use]
    pub fn has_subscribers(&self, kind: EventKind) -> bool {
        self.inner
            .borrow()
            .subscriptions
            .iter()
            .any(|entry| entry.kind == kind)
    }

    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.inner.borrow().subscriptions.len()
    }

    /// Number of handler failures caught since the channel was created.
    #[must_use]
    pub fn fault_count(&self) -> u64 {
        self.inner.borrow().faults
    }

    fn is_live(&self, kind: EventKind, handler: &SharedHandler) -> bool {
        self.inner
            .borrow()
            .subscriptions
            .iter()
            .any(|entry| entry.kind == kind && Rc::ptr_eq(&entry.handler, handler))
    }

    fn record_fault(&self, kind: EventKind, subscriber: &SubscriberId, message: String) {
        let fault = TendencyError::HandlerFault {
            event: kind.wire_name(),
            subscriber: subscriber.to_string(),
            message,
        };
        warn!(error = %fault, "event handler failed");
        let mut inner = self.inner.borrow_mut();
        inner.faults = inner.faults.saturating_add(1);
    }
}

fn subscription_name(kind: EventKind, subscriber: &SubscriberId) -> String {
    format!("{}.{}", kind.wire_name(), subscriber)
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "handler panicked".to_owned()
    }
}

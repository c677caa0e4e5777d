use std::cell::RefCell;
use std::rc::Rc;

use tendency_chart::TendencyError;
use tendency_chart::interaction::{BusPayload, EventChannel, EventKind, RemoveTarget, SubscriberId};

type Log = Rc<RefCell<Vec<String>>>;

fn recorder(log: &Log, tag: &'static str) -> impl FnMut(&BusPayload) -> tendency_chart::TendencyResult<()> + 'static {
    let log = Rc::clone(log);
    move |_| {
        log.borrow_mut().push(tag.to_owned());
        Ok(())
    }
}

#[test]
fn handlers_run_in_registration_order() {
    let channel = EventChannel::all();
    let log: Log = Rc::default();
    channel.register(EventKind::BrushMove, &SubscriberId::new("a"), recorder(&log, "a"));
    channel.register(EventKind::BrushMove, &SubscriberId::new("b"), recorder(&log, "b"));
    channel.register(EventKind::TooltipMove, &SubscriberId::new("c"), recorder(&log, "c"));

    assert_eq!(channel.emit(EventKind::BrushMove, &BusPayload::None), 2);
    assert_eq!(*log.borrow(), vec!["a", "b"]);
}

#[test]
fn registration_returns_scoped_names() {
    let channel = EventChannel::all();
    let name = channel.register(EventKind::TooltipLeave, &SubscriberId::new("chart-1"), |_| Ok(()));
    assert_eq!(name.as_deref(), Some("toolTipLeave.chart-1"));
    assert_eq!(channel.subscription_names(), vec!["toolTipLeave.chart-1".to_owned()]);
}

#[test]
fn same_identity_replaces_the_handler() {
    let channel = EventChannel::all();
    let log: Log = Rc::default();
    let id = SubscriberId::new("chart");
    channel.register(EventKind::ChartMount, &id, recorder(&log, "old"));
    channel.register(EventKind::ChartMount, &id, recorder(&log, "new"));

    assert_eq!(channel.subscription_count(), 1);
    channel.emit(EventKind::ChartMount, &BusPayload::None);
    assert_eq!(*log.borrow(), vec!["new"]);
}

#[test]
fn undeclared_events_are_ignored() {
    let channel = EventChannel::new(EventKind::TOOLTIP);
    let log: Log = Rc::default();
    assert!(
        channel
            .register(EventKind::BrushMove, &SubscriberId::new("a"), recorder(&log, "a"))
            .is_none()
    );
    assert_eq!(channel.emit(EventKind::BrushMove, &BusPayload::None), 0);
    assert!(!channel.is_declared(EventKind::LegendClick));
    assert!(channel.is_declared(EventKind::TooltipMove));
}

#[test]
fn failing_and_panicking_handlers_do_not_stop_dispatch() {
    let channel = EventChannel::all();
    let log: Log = Rc::default();
    channel.register(EventKind::LegendClick, &SubscriberId::new("err"), |_| {
        Err(TendencyError::InvalidData("boom".to_owned()))
    });
    channel.register(EventKind::LegendClick, &SubscriberId::new("panic"), |_| {
        panic!("handler exploded")
    });
    channel.register(EventKind::LegendClick, &SubscriberId::new("ok"), recorder(&log, "ok"));

    let delivered = channel.emit(EventKind::LegendClick, &BusPayload::LegendClick(0));
    assert_eq!(delivered, 1);
    assert_eq!(channel.fault_count(), 2);
    assert_eq!(*log.borrow(), vec!["ok"]);
}

#[test]
fn handler_removed_during_dispatch_is_skipped() {
    let channel = EventChannel::all();
    let log: Log = Rc::default();
    let weak = channel.downgrade();
    channel.register(EventKind::BrushMove, &SubscriberId::new("remover"), move |_| {
        if let Some(channel) = weak.upgrade() {
            channel.remove(RemoveTarget::Subscriber(SubscriberId::new("victim")));
        }
        Ok(())
    });
    channel.register(EventKind::BrushMove, &SubscriberId::new("victim"), recorder(&log, "victim"));

    assert_eq!(channel.emit(EventKind::BrushMove, &BusPayload::None), 1);
    assert!(log.borrow().is_empty());
}

#[test]
fn handlers_may_emit_other_events() {
    let channel = EventChannel::all();
    let log: Log = Rc::default();
    let weak = channel.downgrade();
    channel.register(EventKind::LegendMount, &SubscriberId::new("chart"), move |_| {
        if let Some(channel) = weak.upgrade() {
            channel.emit(EventKind::LegendReceiveData, &BusPayload::LegendData(Vec::new()));
        }
        Ok(())
    });
    channel.register(EventKind::LegendReceiveData, &SubscriberId::new("legend"), recorder(&log, "data"));

    channel.emit(EventKind::LegendMount, &BusPayload::None);
    assert_eq!(*log.borrow(), vec!["data"]);
}

#[test]
fn remove_targets_select_subscriptions() {
    let channel = EventChannel::all();
    let a = SubscriberId::new("a");
    let b = SubscriberId::new("b");
    for kind in EventKind::TOOLTIP.iter().chain(EventKind::BRUSH) {
        channel.register(*kind, &a, |_| Ok(()));
        channel.register(*kind, &b, |_| Ok(()));
    }
    assert_eq!(channel.subscription_count(), 8);

    assert_eq!(
        channel.remove(RemoveTarget::Subscription {
            kind: EventKind::BrushMove,
            subscriber: a.clone(),
        }),
        1
    );
    assert_eq!(channel.remove(RemoveTarget::Kind(EventKind::BrushMount)), 2);
    assert_eq!(channel.remove(RemoveTarget::Kinds(EventKind::TOOLTIP.to_vec())), 4);
    assert!(channel.has_subscribers(EventKind::BrushMove));
    assert_eq!(channel.remove(RemoveTarget::Subscriber(b)), 1);
    assert_eq!(channel.remove(RemoveTarget::All), 0);
    assert!(!channel.has_subscribers(EventKind::BrushMove));
}

#[test]
fn weak_handle_does_not_keep_the_channel_alive() {
    let channel = EventChannel::all();
    let weak = channel.downgrade();
    assert!(weak.upgrade().is_some());
    drop(channel);
    assert!(weak.upgrade().is_none());
}

#[test]
fn unique_ids_are_distinct() {
    let first = SubscriberId::unique("chart");
    let second = SubscriberId::unique("chart");
    assert_ne!(first, second);
    assert!(first.as_str().starts_with("chart-"));
}

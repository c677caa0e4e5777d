use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_relative_eq;
use tendency_chart::api::{BrushConfig, CustomLine, TextMetrics};
use tendency_chart::core::{DataIndex, Datum};
use tendency_chart::interaction::{BrushUnit, BusPayload, EventChannel, EventKind, SubscriberId};

fn preview() -> Vec<Datum> {
    (0..20)
        .map(|i| Datum::new(format!("d{i:02}"), (i % 7) as f64 * 3.0))
        .collect()
}

fn px(brush: &BrushUnit, i: f64) -> f64 {
    let geometry = brush.geometry();
    geometry.left + geometry.width * i / 19.0
}

fn bounds(index: DataIndex) -> (usize, usize) {
    (index.start_index, index.end_index)
}

/// Channel plus a log of every broadcast selection.
fn spy_channel() -> (EventChannel, Rc<RefCell<Vec<(usize, usize)>>>) {
    let channel = EventChannel::all();
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    channel.register(EventKind::BrushMove, &SubscriberId::new("spy"), move |payload| {
        if let BusPayload::BrushMove { selection_index, .. } = payload {
            sink.borrow_mut().push(bounds(*selection_index));
        }
        Ok(())
    });
    (channel, log)
}

#[test]
fn geometry_reserves_room_for_handle_labels() {
    let plain = BrushUnit::new(BrushConfig::new(500.0, 50.0), preview(), None);
    let geometry = plain.geometry();
    assert_relative_eq!(geometry.left, 6.0);
    assert_relative_eq!(geometry.width, 488.0);

    let measured = BrushUnit::with_metrics(
        BrushConfig::new(500.0, 50.0),
        preview(),
        None,
        TextMetrics::monospace(),
    );
    // "d19" at 12px: 3 * 12 * 0.6.
    assert_relative_eq!(measured.geometry().left, 21.6 + 3.0 + 3.0, epsilon = 1e-9);
}

#[test]
fn initial_selection_defaults_to_the_whole_series() {
    let brush = BrushUnit::new(BrushConfig::new(500.0, 50.0), preview(), None);
    assert_eq!(bounds(brush.selection()), (0, 19));

    let sized = BrushUnit::new(BrushConfig::new(500.0, 50.0).with_length(40), preview(), None);
    assert_eq!(sized.selection().total, 40);
}

#[test]
fn drag_snaps_to_the_step_and_broadcasts() {
    let (channel, log) = spy_channel();
    let brush = BrushUnit::new(
        BrushConfig::new(500.0, 50.0).with_step(5).with_range(Some(0), Some(5)),
        preview(),
        Some(channel),
    );
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    brush.on_brush(move |index| sink.borrow_mut().push(bounds(index)));

    let selection = brush.drag_to(px(&brush, 7.0), px(&brush, 13.0));
    assert_eq!(bounds(selection), (5, 10));
    assert_eq!(*log.borrow(), vec![(5, 10)]);
    assert_eq!(*seen.borrow(), vec![(5, 10)]);
    assert_relative_eq!(brush.selection_px().0, px(&brush, 5.0), epsilon = 1e-9);
}

#[test]
fn handle_drag_without_auto_dispatch_reports_on_release() {
    let (channel, log) = spy_channel();
    let brush = BrushUnit::new(
        BrushConfig::new(500.0, 50.0)
            .with_range(Some(0), Some(4))
            .with_auto_dispatch(false),
        preview(),
        Some(channel),
    );
    let released = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&released);
    brush.on_range_change(move |index| sink.borrow_mut().push(bounds(index)));

    brush.begin_handle_drag();
    brush.drag_to(px(&brush, 0.0), px(&brush, 8.0));
    assert!(log.borrow().is_empty());
    assert!(released.borrow().is_empty());

    brush.end_drag();
    assert_eq!(*released.borrow(), vec![(0, 8)]);

    brush.end_drag();
    assert_eq!(released.borrow().len(), 1);
}

#[test]
fn click_outside_the_extent_selects_everything() {
    let brush = BrushUnit::new(
        BrushConfig::new(500.0, 50.0)
            .with_range(Some(0), Some(4))
            .with_auto_adjust_on_click(true),
        preview(),
        None,
    );
    assert_eq!(bounds(brush.click_at(-20.0)), (0, 19));
}

#[test]
fn click_inside_keeps_the_width_and_stays_in_bounds() {
    let brush = BrushUnit::new(
        BrushConfig::new(500.0, 50.0)
            .with_range(Some(0), Some(4))
            .with_auto_adjust_on_click(true),
        preview(),
        None,
    );
    assert_eq!(bounds(brush.click_at(px(&brush, 6.0))), (6, 10));
    assert_eq!(bounds(brush.click_at(px(&brush, 17.0))), (15, 19));
}

#[test]
fn click_is_ignored_without_auto_adjust() {
    let brush = BrushUnit::new(
        BrushConfig::new(500.0, 50.0).with_range(Some(0), Some(4)),
        preview(),
        None,
    );
    assert_eq!(bounds(brush.click_at(px(&brush, 12.0))), (0, 4));
}

#[test]
fn external_range_broadcasts_only_on_change() {
    let (channel, log) = spy_channel();
    let brush = BrushUnit::new(
        BrushConfig::new(500.0, 50.0).with_step(5).with_range(Some(0), Some(5)),
        preview(),
        Some(channel),
    );

    brush.set_range(Some(0), Some(5));
    assert!(log.borrow().is_empty());

    assert_eq!(bounds(brush.set_range(Some(10), Some(15))), (10, 15));
    // Off-step start keeps the previous selection.
    assert_eq!(bounds(brush.set_range(Some(7), Some(12))), (10, 15));
    assert_eq!(*log.borrow(), vec![(10, 15)]);
}

#[test]
fn mount_pushes_the_selection_and_answers_late_charts() {
    let (channel, log) = spy_channel();
    let brush = BrushUnit::new(
        BrushConfig::new(500.0, 50.0).with_range(Some(2), Some(6)),
        preview(),
        Some(channel.clone()),
    );
    brush.mount();
    assert_eq!(*log.borrow(), vec![(2, 6)]);

    channel.emit(EventKind::ChartMount, &BusPayload::None);
    assert_eq!(log.borrow().len(), 2);

    brush.unmount();
    channel.emit(EventKind::ChartMount, &BusPayload::None);
    assert_eq!(log.borrow().len(), 2);
}

#[test]
fn handle_labels_flank_the_selection() {
    let brush = BrushUnit::new(
        BrushConfig::new(500.0, 50.0).with_range(Some(3), Some(9)),
        preview(),
        None,
    );
    let (start, end) = brush.handle_labels();
    assert_eq!(start.text, "d03");
    assert_eq!(end.text, "d09");
    let (start_px, end_px) = brush.selection_px();
    assert_relative_eq!(start.x, start_px - 3.0 - 3.0, epsilon = 1e-9);
    assert_relative_eq!(end.x, end_px + 3.0 + 3.0, epsilon = 1e-9);
    assert_relative_eq!(start.y, 25.0);
}

#[test]
fn preview_curve_spans_the_brush() {
    let brush = BrushUnit::new(BrushConfig::new(500.0, 50.0), preview(), None);
    brush.set_preview_lines(vec![CustomLine {
        tick_value: "d10".into(),
        stroke_width: 1.0,
        stroke_color: "#505765".to_owned(),
    }]);

    let curve = brush.preview_curve();
    assert_eq!(curve.points.len(), 20);
    assert_relative_eq!(curve.width, 488.0 + 6.0);
    assert_relative_eq!(curve.translate_x, 3.0);
    assert_relative_eq!(curve.points[0].x, 0.0);
    assert_relative_eq!(curve.points[19].x, curve.width);
    for point in &curve.points {
        assert!(point.y >= 1.0 && point.y <= 50.0);
    }
    // Zero values sit on the baseline.
    assert_relative_eq!(curve.points[0].y, 50.0);

    assert_eq!(curve.custom_lines.len(), 1);
    assert_relative_eq!(curve.custom_lines[0].x1, curve.width * 10.0 / 19.0 + 0.5, epsilon = 1e-9);
}

#[test]
fn linear_preview_places_points_by_value() {
    let data: Vec<Datum> = [0.0, 1.0, 4.0].iter().map(|x| Datum::new(*x, 1.0)).collect();
    let mut config = BrushConfig::new(300.0, 40.0);
    config.linear = true;
    let brush = BrushUnit::new(config, data, None);
    let curve = brush.preview_curve();
    assert_relative_eq!(curve.points[1].x, curve.width / 4.0);
}

use approx::assert_relative_eq;
use tendency_chart::api::{
    ChartConfig, ChartInputs, ChartState, CustomLine, GridBox, ScaleKind, SplitLineConfig,
    TextMetrics, TooltipSignal, TooltipSource, compute_chart_state,
};
use tendency_chart::core::{Datum, IndexRequest, Series, XValue};

fn dataset() -> Vec<Series> {
    let sales = (0..20)
        .map(|i| Datum::new(format!("d{i:02}"), i as f64 * 10.0))
        .collect();
    let cost = (0..20)
        .map(|i| Datum::new(format!("d{i:02}"), 100.0 - i as f64 * 5.0))
        .collect();
    vec![Series::new("sales", sales), Series::new("cost", cost)]
}

fn boxed_config() -> ChartConfig {
    ChartConfig::new(300.0, 200.0)
        .with_grid(GridBox {
            top: 10.0,
            right: 20.0,
            bottom: 30.0,
            left: 40.0,
        })
        .with_index_range(Some(5), Some(9))
        .with_line_colors(["#f00", "#0f0"])
}

fn state_for(dataset: &[Series], config: &ChartConfig) -> ChartState {
    compute_chart_state(
        ChartInputs {
            dataset,
            config,
            request: config.index_request(),
            previous_visibility: &[],
            legend_present: false,
        },
        None,
    )
}

#[test]
fn window_layout_and_axes_follow_the_config() {
    let data = dataset();
    let state = state_for(&data, &boxed_config());

    assert_eq!((state.index.start_index, state.index.end_index), (5, 9));
    assert_relative_eq!(state.layout.width, 239.5);
    assert_relative_eq!(state.layout.height, 159.5);

    assert_eq!(state.x_axis.kind, ScaleKind::Point);
    assert_eq!(state.x_axis.domain.first(), Some(&XValue::text("d05")));
    assert_eq!(state.ticks.len(), 5);
    assert_relative_eq!(state.ticks[0].coordinate, 40.0);
    assert_relative_eq!(state.ticks[4].coordinate, 279.5);
    assert_eq!(
        state.x_axis.tick_values,
        vec![XValue::text("d05"), XValue::text("d07"), XValue::text("d09")]
    );

    assert_eq!(state.y_axis.domain, vec![XValue::number(0.0), XValue::number(100.0)]);
    assert_eq!(state.y_axis.ticks.len(), 6);
}

#[test]
fn projected_points_sit_on_the_scales() {
    let data = dataset();
    let state = state_for(&data, &boxed_config());

    assert_eq!(state.lines.len(), 2);
    let first = state.lines[0].point_at(0).expect("first sales point");
    assert_relative_eq!(first.x, 40.0);
    assert_relative_eq!(first.y, 89.75);
    assert_eq!(first.origin.value, 50.0);
    assert_eq!(state.lines[1].points.len(), 5);
}

#[test]
fn explicit_value_domain_skips_the_scan() {
    let data = dataset();
    let state = state_for(&data, &boxed_config().with_value_domain(-10.0, 10.0));
    assert_eq!(state.y_axis.domain, vec![XValue::number(-10.0), XValue::number(10.0)]);
}

#[test]
fn pointer_tooltip_collects_every_active_line() {
    let data = dataset();
    let mut state = state_for(&data, &boxed_config());

    let tooltip = state.apply_tooltip(TooltipSource::Pointer { x: 100.0, y: 50.0 }).clone();
    assert!(tooltip.active);
    let tick = tooltip.tick.expect("active tick");
    assert_eq!(tick.index, 1);
    assert_eq!(tick.value, XValue::text("d06"));
    let values: Vec<f64> = tooltip.points.iter().map(|point| point.value).collect();
    assert_eq!(values, vec![60.0, 70.0]);
    assert_eq!(tooltip.points[0].color, "#f00");

    assert!(state.toggle_line(0));
    assert_eq!(state.tooltip.points.len(), 1);
    assert_eq!(state.tooltip.points[0].name, XValue::text("cost"));
    assert_eq!(state.active_line_count(), 1);

    state.hide_tooltip();
    assert!(!state.tooltip.active);
}

#[test]
fn relayed_tooltip_is_clamped_to_the_plot() {
    let data = dataset();
    let mut state = state_for(&data, &boxed_config());

    let mut signal = TooltipSignal::inactive();
    signal.is_tooltip_active = true;
    signal.active_tick_index = 3;
    signal.tooltip_coordinate = Some(tendency_chart::api::TooltipCoordinate { x: 0.0, y: 500.0 });

    let tooltip = state.apply_tooltip(TooltipSource::Relayed(&signal)).clone();
    assert!(tooltip.active);
    let coordinate = tooltip.coordinate.expect("coordinate");
    assert_relative_eq!(coordinate.y, state.layout.plot_bottom());
    assert_relative_eq!(coordinate.x, state.ticks[3].coordinate);

    signal.active_tick_index = 42;
    assert!(!state.apply_tooltip(TooltipSource::Relayed(&signal)).active);
}

#[test]
fn visibility_carries_over_only_with_a_legend() {
    let data = dataset();
    let config = boxed_config();
    let mut state = state_for(&data, &config);
    assert!(state.toggle_line(1));

    let inputs = |legend_present| ChartInputs {
        dataset: &data,
        config: &config,
        request: IndexRequest::new(Some(0), Some(4)),
        previous_visibility: &state.visibility,
        legend_present,
    };
    let kept = compute_chart_state(inputs(true), None);
    assert!(!kept.visibility[1].active);
    let reset = compute_chart_state(inputs(false), None);
    assert!(reset.visibility[1].active);
}

#[test]
fn linear_axis_has_one_hover_tick_per_point() {
    let series = Series::new(
        "temperature",
        (0..10).map(|i| Datum::new(i as f64 * 2.0, i as f64)).collect(),
    );
    let config = ChartConfig::new(400.0, 300.0).with_linear_x(true);
    let mut metrics = TextMetrics::monospace();
    let data = vec![series];
    let state = compute_chart_state(
        ChartInputs {
            dataset: &data,
            config: &config,
            request: config.index_request(),
            previous_visibility: &[],
            legend_present: false,
        },
        Some(&mut metrics),
    );

    assert_eq!(state.x_axis.kind, ScaleKind::Linear);
    assert_eq!(state.ticks.len(), 10);
    assert_eq!(state.ticks[3].value, XValue::number(6.0));
    assert_relative_eq!(state.ticks[0].coordinate, state.layout.left);
    assert_relative_eq!(state.ticks[9].coordinate, state.layout.plot_right());
    assert!(!state.x_axis.tick_values.is_empty());
}

#[test]
fn empty_text_labels_fall_back_to_position() {
    let series = Series::unnamed(vec![Datum::new("", 1.0), Datum::new("", 2.0)]);
    let data = vec![series];
    let state = state_for(&data, &ChartConfig::new(300.0, 200.0));
    assert_eq!(state.x_axis.domain, vec![XValue::from(0usize), XValue::from(1usize)]);
    assert_eq!(state.visibility[0].name, XValue::from(0usize));
    assert!(state.visibility[0].uses_default_color);
}

#[test]
fn split_and_custom_lines_are_derived_from_the_axes() {
    let data = dataset();
    let mut config = boxed_config();
    let shown = SplitLineConfig {
        show: true,
        ..SplitLineConfig::default()
    };
    config.x_axis.split_line = shown.clone();
    config.y_axis.split_line = shown;
    config.x_axis.custom_lines = vec![
        CustomLine {
            tick_value: XValue::text("d07"),
            stroke_width: 2.0,
            stroke_color: "#123456".to_owned(),
        },
        CustomLine {
            tick_value: XValue::text("d19"),
            stroke_width: 2.0,
            stroke_color: "#123456".to_owned(),
        },
    ];

    let state = state_for(&data, &config);
    assert_eq!(state.split_lines.len(), 3 + 6);
    assert_eq!(state.custom_lines.len(), 1);
    assert_relative_eq!(state.custom_lines[0].x1, state.ticks[2].coordinate);
}

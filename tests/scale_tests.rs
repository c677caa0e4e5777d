use approx::assert_relative_eq;
use tendency_chart::core::{
    LinearScale, PointScale, XValue, domain_by_step, get_tick_step, linear_ticks,
};

#[test]
fn linear_scale_maps_and_inverts() {
    let scale = LinearScale::new((0.0, 10.0), (0.0, 100.0)).expect("finite scale");
    assert_relative_eq!(scale.map(5.0), 50.0);
    assert_relative_eq!(scale.invert(25.0), 2.5);

    let flipped = LinearScale::new((0.0, 10.0), (200.0, 0.0)).expect("finite scale");
    assert_relative_eq!(flipped.map(10.0), 0.0);
    assert_relative_eq!(flipped.map(2.5), 150.0);
}

#[test]
fn degenerate_domain_maps_to_range_middle() {
    let scale = LinearScale::new((3.0, 3.0), (0.0, 80.0)).expect("finite scale");
    assert_relative_eq!(scale.map(3.0), 40.0);
    assert_relative_eq!(scale.map(-100.0), 40.0);
}

#[test]
fn non_finite_bounds_are_rejected_or_zeroed() {
    assert!(LinearScale::new((f64::NAN, 1.0), (0.0, 1.0)).is_err());
    assert!(LinearScale::new((0.0, 1.0), (0.0, f64::INFINITY)).is_err());

    let lenient = LinearScale::lenient((f64::NAN, 10.0), (0.0, 100.0));
    assert_eq!(lenient.domain(), (0.0, 10.0));
}

#[test]
fn tick_step_rounds_to_nice_numbers() {
    assert_relative_eq!(get_tick_step(0.0, 100.0, 5), 20.0);
    assert_relative_eq!(get_tick_step(0.0, 1.0, 5), 0.2);
    assert_relative_eq!(get_tick_step(0.0, 7.0, 5), 1.0);
    assert_relative_eq!(get_tick_step(0.0, 10.0, 5), 2.0);
    assert!(get_tick_step(100.0, 0.0, 5) < 0.0);
    assert_eq!(get_tick_step(4.0, 4.0, 5), 0.0);
}

#[test]
fn linear_ticks_cover_the_domain() {
    let ticks = linear_ticks(0.0, 100.0, 10);
    assert_eq!(ticks.len(), 11);
    assert_relative_eq!(ticks[0], 0.0);
    assert_relative_eq!(ticks[10], 100.0);

    let fractional = linear_ticks(0.0, 1.0, 5);
    assert_eq!(fractional.len(), 6);
    assert_relative_eq!(fractional[3], 0.6);

    let reversed = linear_ticks(10.0, 0.0, 5);
    assert_relative_eq!(reversed[0], 10.0);
    assert_eq!(linear_ticks(2.0, 2.0, 5), vec![2.0]);
    assert!(linear_ticks(0.0, 1.0, 0).is_empty());
}

#[test]
fn domain_expands_outward_to_step_multiples() {
    assert_eq!(domain_by_step(3.0, 97.0, 5), (0.0, 100.0));
    let (lo, hi) = domain_by_step(0.0, 1.0, 5);
    assert!(lo <= 0.0 && hi >= 1.0);
    assert_eq!(domain_by_step(-13.0, 41.0, 5), (-20.0, 50.0));
    assert_eq!(domain_by_step(5.0, 5.0, 5), (5.0, 5.0));
}

#[test]
fn linear_tick_labels_use_step_precision() {
    let scale = LinearScale::lenient((0.0, 1.0), (0.0, 100.0));
    assert_eq!(scale.format_tick(0.5, 10), "0.5");
    let wide = LinearScale::lenient((0.0, 1000.0), (0.0, 100.0));
    assert_eq!(wide.format_tick(250.0, 10), "250");
}

#[test]
fn point_scale_spreads_labels_evenly() {
    let scale = PointScale::new(["a", "b", "c", "d", "e"].into_iter().map(XValue::from), (0.0, 100.0));
    assert_eq!(scale.len(), 5);
    assert_relative_eq!(scale.step(), 25.0);
    assert_eq!(scale.map(&XValue::from("c")), Some(50.0));
    assert_eq!(scale.map(&XValue::from("z")), None);
    assert_eq!(scale.label_at(4), Some(&XValue::from("e")));

    let single = PointScale::new([XValue::from("only")], (0.0, 100.0));
    assert_eq!(single.position_of(0), Some(50.0));
}

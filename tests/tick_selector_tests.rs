use tendency_chart::api::{TextMetrics, select_discrete_ticks};
use tendency_chart::core::XValue;

fn labels(count: usize) -> Vec<XValue> {
    (0..count).map(|i| XValue::text(format!("d{i:03}"))).collect()
}

fn indices(ticks: &[tendency_chart::api::DiscreteTick]) -> Vec<usize> {
    ticks.iter().map(|tick| tick.index).collect()
}

#[test]
fn empty_and_single_label_inputs() {
    assert!(select_discrete_ticks(&[], 500.0, 2, None, None).is_empty());

    let single = select_discrete_ticks(&labels(1), 500.0, 2, None, None);
    assert_eq!(indices(&single), vec![0]);
}

#[test]
fn two_labels_are_always_both_shown() {
    let mut metrics = TextMetrics::monospace();
    let ticks = select_discrete_ticks(&labels(2), 10.0, 2, None, Some(&mut metrics));
    assert_eq!(indices(&ticks), vec![0, 1]);
}

#[test]
fn wide_axis_admits_every_interval() {
    let mut metrics = TextMetrics::monospace();
    // 24px labels at 100px per slot.
    let ticks = select_discrete_ticks(&labels(9), 900.0, 2, None, Some(&mut metrics));
    assert_eq!(indices(&ticks), vec![0, 2, 4, 6, 8]);
}

#[test]
fn crowded_axis_skips_overlapping_labels() {
    let mut metrics = TextMetrics::monospace();
    // 24px labels at 10px per slot: neighbours need at least three slots.
    let ticks = select_discrete_ticks(&labels(20), 200.0, 1, None, Some(&mut metrics));
    let picked = indices(&ticks);
    assert_eq!(picked.first(), Some(&0));
    assert_eq!(picked.last(), Some(&19));
    for pair in picked.windows(2) {
        assert!(pair[1] - pair[0] >= 3, "labels {pair:?} overlap");
    }
}

#[test]
fn final_label_is_protected_from_overlap() {
    let mut metrics = TextMetrics::monospace();
    let ticks = select_discrete_ticks(&labels(11), 110.0, 2, None, Some(&mut metrics));
    let picked = indices(&ticks);
    let before_final = picked[picked.len() - 2];
    assert!(10 - before_final >= 3);
}

#[test]
fn tick_cap_resamples_but_keeps_both_ends() {
    let ticks = select_discrete_ticks(&labels(41), 4100.0, 2, Some(4), None);
    let picked = indices(&ticks);
    assert_eq!(picked, vec![0, 10, 20, 30, 40]);
}

#[test]
fn non_positive_interval_falls_back_to_two() {
    let ticks = select_discrete_ticks(&labels(7), 700.0, 0, None, None);
    assert_eq!(indices(&ticks), vec![0, 2, 4, 6]);
}

#[test]
fn labels_are_carried_with_their_index() {
    let ticks = select_discrete_ticks(&labels(5), 500.0, 2, None, None);
    assert_eq!(ticks[1].label, XValue::text("d002"));
}

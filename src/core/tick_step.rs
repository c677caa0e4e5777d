//! "Nice number" tick arithmetic shared by the y axis and linear x axes.

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

fn nice_factor(error: f64) -> f64 {
    if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    }
}

/// Step between ticks for roughly `count` intervals over `[start, stop]`.
///
/// The raw step is rounded down to a power of ten and scaled by 1, 2, 5 or 10.
/// The result is negative when `stop < start`. Degenerate spans yield `0.0`
/// and a zero count yields infinity.
#[must_use]
pub fn get_tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let step0 = (stop - start).abs() / (count as f64);
    if step0 == 0.0 || !step0.is_finite() {
        return if stop < start { -step0 } else { step0 };
    }
    let step1 = 10f64.powf(step0.log10().floor());
    let step = step1 * nice_factor(step0 / step1);
    if stop < start { -step } else { step }
}

/// Signed tick increment: positive values are the step itself, negative values
/// encode `1 / step` so that sub-unit stops can be produced without drift.
#[must_use]
pub fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    let step = (stop - start) / (count as f64);
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = nice_factor(error);
    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -10f64.powf(-power) / factor
    }
}

/// Nice stops inside `[start, stop]`, in the same direction as the input.
#[must_use]
pub fn linear_ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }

    let reverse = stop < start;
    let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };
    let increment = tick_increment(lo, hi, count);
    if increment == 0.0 || !increment.is_finite() {
        return Vec::new();
    }

    let mut ticks = Vec::new();
    if increment > 0.0 {
        let first = (lo / increment).ceil() as i64;
        let last = (hi / increment).floor() as i64;
        for i in first..=last {
            ticks.push(i as f64 * increment);
        }
    } else {
        let inverse = -increment;
        let first = (lo * inverse).ceil() as i64;
        let last = (hi * inverse).floor() as i64;
        for i in first..=last {
            ticks.push(i as f64 / inverse);
        }
    }

    if reverse {
        ticks.reverse();
    }
    ticks
}

/// Expands `[start, stop]` outward to multiples of the nice tick step.
///
/// Degenerate inputs keep the original bounds when finite and fall back to
/// `(0.0, 0.0)` otherwise.
#[must_use]
pub fn domain_by_step(start: f64, stop: f64, count: usize) -> (f64, f64) {
    let step = get_tick_step(start, stop, count);
    let domain_start = (start / step).floor() * step;
    let domain_stop = (stop / step).ceil() * step;
    if domain_start.is_finite() && domain_stop.is_finite() {
        return (domain_start, domain_stop);
    }
    (
        if start.is_finite() { start } else { 0.0 },
        if stop.is_finite() { stop } else { 0.0 },
    )
}

/// Decimal places needed to tell adjacent ticks of `step` apart.
#[must_use]
pub fn step_precision(step: f64) -> usize {
    let step = step.abs();
    if !step.is_finite() || step == 0.0 || step >= 1.0 {
        return 0;
    }
    (-step.log10().floor()).max(0.0) as usize
}

#[cfg(test)]
mod tests {
    use super::{nice_factor, step_precision, tick_increment};

    #[test]
    fn nice_factor_brackets() {
        assert_eq!(nice_factor(1.0), 1.0);
        assert_eq!(nice_factor(1.5), 2.0);
        assert_eq!(nice_factor(4.0), 5.0);
        assert_eq!(nice_factor(8.0), 10.0);
    }

    #[test]
    fn tick_increment_encodes_fractional_steps_as_inverse() {
        assert_eq!(tick_increment(0.0, 100.0, 10), 10.0);
        assert_eq!(tick_increment(0.0, 1.0, 10), -10.0);
    }

    #[test]
    fn step_precision_counts_fraction_digits() {
        assert_eq!(step_precision(20.0), 0);
        assert_eq!(step_precision(0.2), 1);
        assert_eq!(step_precision(0.05), 2);
    }
}

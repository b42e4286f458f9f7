use chrono::{DateTime, Duration, Utc};
use log::debug;

use crate::orbit::{PropagationError, Propagator};
use crate::predict::config::PassConfig;
use crate::predict::elevation::ElevationFn;
use crate::predict::types::{EventKind, Pass, TimeWindow, VisibilityEvent};

/// Bisection and golden-section stop once the bracket is this narrow.
const MIN_BRACKET: Duration = Duration::milliseconds(1);
const INV_PHI: f64 = 0.618_033_988_749_894_8;

type Sample = (DateTime<Utc>, f64);

struct OpenPass {
    rise: VisibilityEvent,
    truncated_start: bool,
    samples: Vec<Sample>,
}

/// Find every pass above `config.min_elevation_deg` inside `window`.
///
/// Passes come back ordered by rise time and never overlap. A window that is
/// empty or inverted yields no passes.
pub fn find_passes<P: Propagator + ?Sized>(
    elevation: &ElevationFn<'_, P>,
    window: &TimeWindow,
    config: &PassConfig,
) -> Result<Vec<Pass>, PropagationError> {
    let mut passes = Vec::new();
    if window.end <= window.start {
        debug!(
            "empty search window {} .. {}, no passes",
            window.start, window.end
        );
        return Ok(passes);
    }

    let threshold = config.min_elevation_deg;
    let mut prev: Option<Sample> = None;
    let mut open: Option<OpenPass> = None;
    let mut cursor = window.start;

    loop {
        let el = elevation.at(cursor)?;
        let above = el >= threshold;

        match (prev, open.is_some()) {
            (None, _) if above => {
                open = Some(OpenPass {
                    rise: event(EventKind::Rise, cursor, el),
                    truncated_start: true,
                    samples: vec![(cursor, el)],
                });
            }
            (Some(before), false) if above => {
                let (time, rise_el) = refine_crossing(elevation, before, (cursor, el), config)?;
                open = Some(OpenPass {
                    rise: event(EventKind::Rise, time, rise_el),
                    truncated_start: false,
                    samples: vec![(cursor, el)],
                });
            }
            (Some(_), true) if above => {
                if let Some(pass) = open.as_mut() {
                    pass.samples.push((cursor, el));
                }
            }
            (Some(before), true) => {
                let (time, set_el) = refine_crossing(elevation, before, (cursor, el), config)?;
                if let Some(pass) = open.take() {
                    passes.push(close_pass(
                        elevation,
                        pass,
                        event(EventKind::Set, time, set_el),
                        false,
                        config,
                    )?);
                }
            }
            _ => {}
        }

        prev = Some((cursor, el));
        if cursor >= window.end {
            break;
        }
        cursor = (cursor + config.step).min(window.end);
    }

    if let Some(pass) = open.take() {
        let end_el = prev.map(|(_, el)| el).unwrap_or(threshold);
        passes.push(close_pass(
            elevation,
            pass,
            event(EventKind::Set, window.end, end_el),
            true,
            config,
        )?);
    }

    debug!("found {} passes in {} .. {}", passes.len(), window.start, window.end);
    Ok(passes)
}

/// Flattened `[Rise, Culminate, Set, Rise, ...]` view of [`find_passes`].
pub fn find_events<P: Propagator + ?Sized>(
    elevation: &ElevationFn<'_, P>,
    window: &TimeWindow,
    config: &PassConfig,
) -> Result<Vec<VisibilityEvent>, PropagationError> {
    Ok(find_passes(elevation, window, config)?
        .iter()
        .flat_map(Pass::events)
        .collect())
}

fn event(kind: EventKind, time: DateTime<Utc>, elevation_deg: f64) -> VisibilityEvent {
    VisibilityEvent {
        kind,
        time,
        elevation_deg,
    }
}

fn close_pass<P: Propagator + ?Sized>(
    elevation: &ElevationFn<'_, P>,
    pass: OpenPass,
    set: VisibilityEvent,
    truncated_end: bool,
    config: &PassConfig,
) -> Result<Pass, PropagationError> {
    let (time, el) = find_culmination(elevation, &pass.samples, pass.rise.time, set.time, config)?;
    Ok(Pass {
        rise: pass.rise,
        culmination: event(EventKind::Culminate, time, el),
        set,
        truncated_start: pass.truncated_start,
        truncated_end,
    })
}

/// Bisect a threshold crossing bracketed by two scan samples.
///
/// Returns whichever sampled time lies closest to the threshold once the
/// elevation error is within tolerance, the bracket collapses, or the
/// iteration budget runs out.
fn refine_crossing<P: Propagator + ?Sized>(
    elevation: &ElevationFn<'_, P>,
    before: Sample,
    after: Sample,
    config: &PassConfig,
) -> Result<Sample, PropagationError> {
    let threshold = config.min_elevation_deg;
    let before_above = before.1 >= threshold;
    let mut low = before;
    let mut high = after;

    for _ in 0..config.max_iterations {
        if high.0 - low.0 <= MIN_BRACKET {
            break;
        }
        let mid_time = low.0 + (high.0 - low.0) / 2;
        let mid = (mid_time, elevation.at(mid_time)?);
        if (mid.1 - threshold).abs() < config.tolerance_deg {
            return Ok(mid);
        }
        if (mid.1 >= threshold) == before_above {
            low = mid;
        } else {
            high = mid;
        }
    }

    if (low.1 - threshold).abs() < (high.1 - threshold).abs() {
        Ok(low)
    } else {
        Ok(high)
    }
}

/// Locate the peak between `rise` and `set`.
///
/// Golden-section search runs on the bracket around the highest scan sample.
/// If the refined point is lower than that sample (the segment was not
/// unimodal) the sample itself is reported.
fn find_culmination<P: Propagator + ?Sized>(
    elevation: &ElevationFn<'_, P>,
    samples: &[Sample],
    rise: DateTime<Utc>,
    set: DateTime<Utc>,
    config: &PassConfig,
) -> Result<Sample, PropagationError> {
    let Some((best_idx, &best)) = samples
        .iter()
        .enumerate()
        .max_by(|a, b| a.1 .1.total_cmp(&b.1 .1))
    else {
        let mid = rise + (set - rise) / 2;
        return Ok((mid, elevation.at(mid)?));
    };

    let lo = if best_idx > 0 {
        samples[best_idx - 1].0
    } else {
        rise
    };
    let hi = samples.get(best_idx + 1).map(|s| s.0).unwrap_or(set);

    let refined = golden_section_max(elevation, lo, hi, config.max_iterations)?;
    if refined.1 >= best.1 {
        Ok(refined)
    } else {
        debug!(
            "culmination search fell below best sample at {}, using the sample",
            best.0
        );
        Ok(best)
    }
}

fn golden_section_max<P: Propagator + ?Sized>(
    elevation: &ElevationFn<'_, P>,
    lo: DateTime<Utc>,
    hi: DateTime<Utc>,
    max_iterations: u32,
) -> Result<Sample, PropagationError> {
    let span_s = seconds(hi - lo);
    let at = |offset_s: f64| lo + Duration::microseconds((offset_s * 1e6).round() as i64);
    let min_bracket_s = seconds(MIN_BRACKET);

    let mut a = 0.0;
    let mut b = span_s;
    let mut c = b - INV_PHI * (b - a);
    let mut d = a + INV_PHI * (b - a);
    let mut fc = elevation.at(at(c))?;
    let mut fd = elevation.at(at(d))?;

    for _ in 0..max_iterations {
        if b - a <= min_bracket_s {
            break;
        }
        if fc >= fd {
            b = d;
            d = c;
            fd = fc;
            c = b - INV_PHI * (b - a);
            fc = elevation.at(at(c))?;
        } else {
            a = c;
            c = d;
            fc = fd;
            d = a + INV_PHI * (b - a);
            fd = elevation.at(at(d))?;
        }
    }

    Ok(if fc >= fd { (at(c), fc) } else { (at(d), fd) })
}

fn seconds(d: Duration) -> f64 {
    d.num_microseconds()
        .map(|us| us as f64 * 1e-6)
        .unwrap_or_else(|| d.num_seconds() as f64)
}

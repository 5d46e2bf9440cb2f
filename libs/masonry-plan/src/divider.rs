//! # Interval Divider
//!
//! Fills a 1-D interval with an ordered sequence of cut points under
//! average-spacing, minimum-spacing and random-deviation constraints.
//! Every other planning component turns spans into block boundaries
//! through this module.

use config::constants::MIN_BLOCK_DIMENSION;
use rand::Rng;

/// Rolls one forward step of `avg +/- dev`, re-rolling any step that
/// would violate the minimum spacing with a smaller jitter.
fn roll_step<R: Rng + ?Sized>(rng: &mut R, avg: f64, min: f64, dev: f64) -> f64 {
    let floor = min.max(MIN_BLOCK_DIMENSION);
    if dev <= 0.0 {
        return avg.max(floor);
    }
    let step = avg + rng.gen_range(-1.0..1.0) * dev;
    if step < floor {
        floor + rng.gen::<f64>() * (avg - floor).max(0.0)
    } else {
        step
    }
}

/// Divides `[left, right]` into an ordered sequence of cut points.
///
/// The result always starts at `left` and ends at `right`. Consecutive
/// gaps are at least `min`, except possibly the final snap-to-`right`
/// gap.
///
/// - `pad` shifts the walk start (`pad.0`) and reserves space before
///   the right edge (`pad.1`).
/// - `count > 0` ignores the right-edge termination rule and returns
///   exactly `count + 1` points (`count` jittered equal divisions).
/// - `center` uses `round(span / avg)` divisions and offsets the first
///   interior point by half the spacing remainder, so the point set is
///   centered and the end gaps absorb the remainder symmetrically.
///
/// # Example
///
/// ```rust
/// use masonry_plan::divider::fill;
/// use rand::SeedableRng;
///
/// let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(1);
/// let cuts = fill(&mut rng, 0.0, 10.0, 2.0, 0.5, 0.0, (0.0, 0.0), 0, false);
/// assert_eq!(cuts.first(), Some(&0.0));
/// assert_eq!(cuts.last(), Some(&10.0));
/// ```
#[allow(clippy::too_many_arguments)]
pub fn fill<R: Rng + ?Sized>(
    rng: &mut R,
    left: f64,
    right: f64,
    avg: f64,
    min: f64,
    dev: f64,
    pad: (f64, f64),
    count: usize,
    center: bool,
) -> Vec<f64> {
    let span = right - left;
    if span <= 0.0 || span < min {
        return vec![left, right];
    }
    let min = min.max(0.0);
    let avg = avg.max(min).max(MIN_BLOCK_DIMENSION);

    if count > 0 {
        return fill_counted(rng, left, right, min, dev, count);
    }

    let mut points = vec![left];
    if center {
        let usable = span - pad.0 - pad.1;
        let divisions = (usable / avg).round().max(1.0);
        let remainder = usable - divisions * avg;
        let mut pos = left + pad.0 + remainder / 2.0;
        for _ in 1..divisions as usize {
            pos += roll_step(rng, avg, min, dev);
            if pos >= right - pad.1 - min {
                break;
            }
            points.push(pos);
        }
    } else {
        let mut pos = left + pad.0;
        loop {
            pos += roll_step(rng, avg, min, dev);
            if pos > right - pad.1 - min {
                break;
            }
            points.push(pos);
        }
    }
    points.push(right);
    points
}

/// Fixed-cardinality division: `count` divisions, `count + 1` points.
fn fill_counted<R: Rng + ?Sized>(
    rng: &mut R,
    left: f64,
    right: f64,
    min: f64,
    dev: f64,
    count: usize,
) -> Vec<f64> {
    let seg = (right - left) / count as f64;
    // Jitter bounded so neighbouring points keep the minimum spacing
    // even when both move toward each other.
    let limit = ((seg - min) * 0.5).max(0.0).min(dev.max(0.0));
    let mut points = Vec::with_capacity(count + 1);
    points.push(left);
    for i in 1..count {
        let mut pos = left + seg * i as f64;
        if limit > 0.0 {
            pos += rng.gen_range(-1.0..1.0) * limit;
        }
        points.push(pos);
    }
    points.push(right);
    points
}

/// Deterministic centered division into segments of roughly `max_size`.
///
/// Used for box and arch tessellation, where the division count must
/// not depend on the random source. `max_size <= 0` disables
/// subdivision and returns just the interval ends.
pub fn subdivide(left: f64, right: f64, max_size: f64) -> Vec<f64> {
    let span = right - left;
    if max_size <= 0.0 || span <= max_size || span <= 0.0 {
        return vec![left, right];
    }
    let divisions = (span / max_size).round().max(1.0);
    let remainder = span - divisions * max_size;
    let mut points = Vec::with_capacity(divisions as usize + 1);
    points.push(left);
    let mut pos = left + remainder / 2.0;
    for _ in 1..divisions as usize {
        pos += max_size;
        points.push(pos);
    }
    points.push(right);
    points
}

// =============================================================================
// TESTS
// =============================================================================

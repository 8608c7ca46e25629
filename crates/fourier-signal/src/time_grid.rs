//! Time grid construction and validation.

use crate::error::{Error, Result};

/// `count` evenly spaced samples from `start` towards `stop`.
///
/// With `endpoint` the last sample is exactly `stop`; without it the grid
/// stops one step short, which is the right shape for one period of a
/// periodic signal.
pub fn linspace(start: f64, stop: f64, count: usize, endpoint: bool) -> Result<Vec<f64>> {
    if count == 0 {
        return Err(Error::InvalidParameter(
            "time grid needs at least one sample".to_string(),
        ));
    }
    if !(start.is_finite() && stop.is_finite()) || stop < start {
        return Err(Error::InvalidParameter(format!(
            "time span [{}, {}] is not a finite increasing interval",
            start, stop
        )));
    }

    let divisions = if endpoint { count.saturating_sub(1) } else { count };
    if divisions == 0 {
        return Ok(vec![start]);
    }
    let step = (stop - start) / divisions as f64;

    let mut grid: Vec<f64> = (0..count).map(|i| start + i as f64 * step).collect();
    if endpoint {
        grid[count - 1] = stop;
    }
    Ok(grid)
}

/// `count` samples covering one period `[0, period)`.
pub fn period_grid(period: f64, count: usize) -> Result<Vec<f64>> {
    if !(period.is_finite() && period > 0.0) {
        return Err(Error::InvalidParameter(format!(
            "period must be positive and finite, got {}",
            period
        )));
    }
    linspace(0.0, period, count, false)
}

/// Check that a caller-supplied grid is finite and non-decreasing.
pub fn validate_time_grid(times: &[f64]) -> Result<()> {
    if let Some((i, t)) = times.iter().enumerate().find(|(_, t)| !t.is_finite()) {
        return Err(Error::InvalidParameter(format!(
            "time grid sample {} is not finite ({})",
            i, t
        )));
    }
    if let Some(i) = times.windows(2).position(|w| w[1] < w[0]) {
        return Err(Error::InvalidParameter(format!(
            "time grid decreases at sample {} ({} -> {})",
            i + 1,
            times[i],
            times[i + 1]
        )));
    }
    Ok(())
}

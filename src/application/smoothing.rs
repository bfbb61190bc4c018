// Box-kernel moving average over chart series
use crate::domain::telemetry::TimeSeriesPoint;

/// Centred moving average with a half-window of `radius` samples.
///
/// Non-finite values are gaps: they count neither towards the sum nor the
/// weight. A window holding only gaps stays a gap. Radius 0 returns the
/// series unchanged.
pub fn smooth(series: &[TimeSeriesPoint], radius: usize) -> Vec<TimeSeriesPoint> {
    if radius == 0 {
        return series.to_vec();
    }

    // prefix[i] = (sum, count) of finite values in series[..i]
    let mut prefix = Vec::with_capacity(series.len() + 1);
    prefix.push((0.0_f64, 0_usize));
    for point in series {
        let (sum, count) = prefix[prefix.len() - 1];
        if point.value.is_finite() {
            prefix.push((sum + point.value, count + 1));
        } else {
            prefix.push((sum, count));
        }
    }

    series
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let lo = i.saturating_sub(radius);
            let hi = (i + radius + 1).min(series.len());
            let sum = prefix[hi].0 - prefix[lo].0;
            let count = prefix[hi].1 - prefix[lo].1;
            let value = if count == 0 { f64::NAN } else { sum / count as f64 };
            TimeSeriesPoint::new(point.t, value)
        })
        .collect()
}

/// Value of `smooth` at `index` alone, reading samples through `value_at`.
pub fn smooth_at(len: usize, value_at: impl Fn(usize) -> f64, index: usize, radius: usize) -> f64 {
    if index >= len {
        return f64::NAN;
    }
    let lo = index.saturating_sub(radius);
    let hi = (index + radius + 1).min(len);
    let (sum, count) = (lo..hi)
        .map(&value_at)
        .filter(|v| v.is_finite())
        .fold((0.0_f64, 0_usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 { f64::NAN } else { sum / count as f64 }
}

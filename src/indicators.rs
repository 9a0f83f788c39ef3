//! Trailing technical indicators derived from closing prices.
//!
//! Both indicators are undefined for the first `window - 1` bars of a series
//! and are reported as `None` there.

use crate::models::{IndicatorRow, PriceBar};

pub const SMA_WINDOW: usize = 20;
pub const RSI_WINDOW: usize = 14;

/// Attach SMA(20) and RSI(14) of the close to every bar
pub fn apply(series: &[PriceBar]) -> Vec<IndicatorRow> {
    apply_with_windows(series, SMA_WINDOW, RSI_WINDOW)
}

pub fn apply_with_windows(series: &[PriceBar], sma_window: usize, rsi_window: usize) -> Vec<IndicatorRow> {
    let closes: Vec<f64> = series.iter().map(|b| b.close).collect();
    let sma = simple_moving_average(&closes, sma_window);
    let rsi = relative_strength_index(&closes, rsi_window);

    series
        .iter()
        .zip(sma)
        .zip(rsi)
        .map(|((bar, sma20), rsi14)| IndicatorRow {
            bar: bar.clone(),
            sma20,
            rsi14,
        })
        .collect()
}

/// Arithmetic mean of the trailing `period` values, `None` until the window is full
pub fn simple_moving_average(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    for i in (period - 1)..values.len() {
        let window = &values[i + 1 - period..=i];
        out[i] = Some(window.iter().sum::<f64>() / period as f64);
    }

    out
}

/// Wilder relative strength index.
///
/// The change at index 0 has no prior close and counts as zero, so the first
/// value appears at index `period - 1`. That value is seeded from the simple
/// average gain and loss of the first `period` changes; later values use
/// Wilder smoothing `(prev * (period - 1) + current) / period`.
pub fn relative_strength_index(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    let (gains, losses): (Vec<f64>, Vec<f64>) = values
        .iter()
        .enumerate()
        .map(|(i, close)| {
            let change = if i == 0 { 0.0 } else { close - values[i - 1] };
            (change.max(0.0), (-change).max(0.0))
        })
        .unzip();

    let n = period as f64;
    let mut avg_gain = gains[..period].iter().sum::<f64>() / n;
    let mut avg_loss = losses[..period].iter().sum::<f64>() / n;
    out[period - 1] = Some(rsi_from_averages(avg_gain, avg_loss));

    for i in period..values.len() {
        avg_gain = (avg_gain * (n - 1.0) + gains[i]) / n;
        avg_loss = (avg_loss * (n - 1.0) + losses[i]) / n;
        out[i] = Some(rsi_from_averages(avg_gain, avg_loss));
    }

    out
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_gain == 0.0 && avg_loss == 0.0 {
        // flat series
        return 50.0;
    }
    if avg_loss == 0.0 {
        return 100.0;
    }
    if avg_gain == 0.0 {
        return 0.0;
    }

    let rs = avg_gain / avg_loss;
    (100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0)
}

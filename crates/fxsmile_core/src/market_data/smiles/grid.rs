//! Tabulation of a smile across the unit index-delta range.

use super::delta_smile::FxDeltaVolSmile;
use crate::market_data::error::MarketDataError;
use crate::math::distributions::{norm_cdf, norm_inv_cdf};

/// Default number of grid rows. Odd so the grid has an explicit midpoint.
pub const DEFAULT_GRID_ROWS: usize = 101;

/// Endpoint clamp so that `N^-1` stays finite.
const GRID_EDGE: f64 = 0.0001;

/// One row of [`FxDeltaVolSmile::grid`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmileGridRow {
    /// Index delta.
    pub index_delta: f64,
    /// Forward unadjusted put delta, `-index_delta`.
    pub put_delta_forward: f64,
    /// Volatility in percent.
    pub vol: f64,
    /// `d+` of the matching forward call.
    pub d_plus: f64,
    /// `d-`.
    pub d_min: f64,
    /// `vol * sqrt(T)` as a fraction.
    pub vol_sqrt_t: f64,
    /// `ln(k / f)`.
    pub log_moneyness: f64,
    /// `k / f`.
    pub moneyness: f64,
    /// Forward premium-adjusted put delta at the same strike.
    pub put_delta_forward_pa: f64,
}

impl FxDeltaVolSmile {
    /// Tabulates the smile at `n_rows` evenly spaced index deltas in `[0, 1]`.
    ///
    /// The end points are moved in to `0.0001` and `0.9999`. Values are plain
    /// `f64` whatever the AD order of the smile.
    ///
    /// # Errors
    /// - `InvalidGrid` unless `n_rows` is odd and at least 3
    /// - `OutOfRange` if the smile domain does not cover `[0, 1]`
    pub fn grid(&self, n_rows: usize) -> Result<Vec<SmileGridRow>, MarketDataError> {
        if n_rows < 3 || n_rows % 2 == 0 {
            return Err(MarketDataError::InvalidGrid(format!(
                "row count must be odd and at least 3, got {}",
                n_rows
            )));
        }

        let last = n_rows - 1;
        let mid = last / 2;
        let deltas: Vec<f64> = (0..n_rows)
            .map(|i| match i {
                0 => GRID_EDGE,
                i if i == last => 1.0 - GRID_EDGE,
                i => i as f64 / last as f64,
            })
            .collect();

        // N^-1(1 - x) = -N^-1(x): only the lower half is inverted
        let half: Vec<f64> = deltas[..=mid].iter().map(|&d| norm_inv_cdf(d)).collect();
        let sqrt_t = self.t_expiry().sqrt();

        deltas
            .iter()
            .enumerate()
            .map(|(i, &index_delta)| {
                let d_plus = if i <= mid { -half[i] } else { half[last - i] };
                let vol = self.lookup_plain(index_delta)?;
                let vol_sqrt_t = vol * sqrt_t / 100.0;
                let d_min = d_plus - vol_sqrt_t;
                let log_moneyness = (0.5 * vol_sqrt_t - d_plus) * vol_sqrt_t;
                let moneyness = log_moneyness.exp();
                Ok(SmileGridRow {
                    index_delta,
                    put_delta_forward: -index_delta,
                    vol,
                    d_plus,
                    d_min,
                    vol_sqrt_t,
                    log_moneyness,
                    moneyness,
                    put_delta_forward_pa: (norm_cdf(d_min) - 1.0) * moneyness,
                })
            })
            .collect()
    }
}

//! Strike to delta inversion against a smile.
//!
//! The delta of a strike depends on the volatility, which the smile reads off
//! at that same delta: a fixed point. It is solved by Newton in plain `f64`,
//! followed by one Newton step in [`Number`] arithmetic from the converged
//! root. That last step carries the sensitivity of the fixed point to the
//! node volatilities, strike, forward and discount factors.

use tracing::debug;

use super::delta_smile::FxDeltaVolSmile;
use super::delta_type::{
    basis_ratio, call_to_put_delta, delta_index_from_call_or_put_delta, BasisFactors, OptionType,
};
use crate::market_data::error::MarketDataError;
use crate::math::distributions::{norm_cdf, norm_pdf};
use crate::types::Number;

/// Result of a strike inversion.
#[derive(Debug, Clone, PartialEq)]
pub struct StrikeDeltaVol {
    /// Index delta of the strike (negated put delta).
    pub delta_index: Number,
    /// Volatility in percent at `delta_index`.
    pub vol: Number,
    /// The strike queried.
    pub strike: Number,
}

/// Constants of the delta equation for one strike.
struct DeltaEquation {
    phi: f64,
    p: f64,
    sqrt_t: f64,
    u: Number,
    z_u: Number,
    z_w: Number,
}

impl FxDeltaVolSmile {
    /// Index delta and volatility consistent with a strike.
    ///
    /// Solves `delta = z_w z_u phi N(phi d)` where
    /// `d = -ln(u) / (vol √T) + p vol √T`, `u = k / f` and `vol` is the smile
    /// read at the index of `delta`. For premium-adjusted smiles `p = -1/2`
    /// and `z_u = u`; otherwise `p = 1/2` and `z_u = 1`. On a spot basis
    /// `z_w = w_deli / w_spot`, else `1`.
    ///
    /// # Errors
    /// - `InvalidExpiry` at zero time to expiry
    /// - `MissingInput` for spot smiles without `basis`
    /// - `SolverDivergence` if Newton exceeds the iteration cap
    /// - `OutOfRange` if an iterate leaves the smile domain
    ///
    /// # Example
    ///
    /// ```
    /// use fxsmile_core::market_data::smiles::{DeltaType, FxDeltaVolSmile, OptionType};
    /// use fxsmile_core::types::{AdOrder, Date, Number};
    ///
    /// let smile = FxDeltaVolSmile::new(
    ///     vec![(0.25, 10.0), (0.5, 9.0), (0.75, 10.5)],
    ///     Date::from_ymd(2024, 1, 1).unwrap(),
    ///     Date::from_ymd(2025, 1, 1).unwrap(),
    ///     DeltaType::Forward,
    ///     AdOrder::One,
    /// )
    /// .unwrap();
    ///
    /// let res = smile
    ///     .get_from_strike(&Number::Float(1.10), OptionType::Call, &Number::Float(1.10), None)
    ///     .unwrap();
    /// assert!(res.delta_index.real() > 0.45 && res.delta_index.real() < 0.55);
    /// ```
    pub fn get_from_strike(
        &self,
        k: &Number,
        option: OptionType,
        f: &Number,
        basis: Option<&BasisFactors>,
    ) -> Result<StrikeDeltaVol, MarketDataError> {
        let t = self.t_expiry();
        if t <= 0.0 {
            return Err(MarketDataError::InvalidExpiry {
                days: self.expiry() - self.eval_date(),
            });
        }

        let u = k / f;
        let (p, z_u) = if self.delta_type().is_premium_adjusted() {
            (-0.5, u.clone())
        } else {
            (0.5, Number::Float(1.0))
        };
        let eq = DeltaEquation {
            phi: option.phi(),
            p,
            sqrt_t: t.sqrt(),
            z_w: basis_ratio(self.delta_type(), basis)?,
            z_u,
            u,
        };

        let delta_0 = self.initial_delta(&eq);
        let solver = self.solver();
        let root = solver.find_root_with(|delta| self.delta_root_plain(&eq, option, delta), delta_0)?;
        debug!(strike = k.real(), delta_0, root, "strike delta converged");

        let delta = solver.refine(|delta| self.delta_root(&eq, option, delta), root)?;

        let delta_index = match option {
            OptionType::Call => -call_to_put_delta(
                &delta,
                self.delta_type(),
                Some(&eq.z_w),
                Some(&eq.u),
            )?,
            OptionType::Put => -delta,
        };
        let vol = self.lookup(&delta_index)?;
        Ok(StrikeDeltaVol {
            delta_index,
            vol,
            strike: k.clone(),
        })
    }

    /// Resolves many strikes against one smile in parallel.
    ///
    /// Results are in the order of `strikes`; each fails independently.
    #[cfg(feature = "parallel")]
    pub fn par_get_from_strike(
        &self,
        strikes: &[Number],
        option: OptionType,
        f: &Number,
        basis: Option<&BasisFactors>,
    ) -> Vec<Result<StrikeDeltaVol, MarketDataError>> {
        use rayon::prelude::*;

        strikes
            .par_iter()
            .map(|k| self.get_from_strike(k, option, f, basis))
            .collect()
    }

    /// Closed-form delta at the middle node's flat volatility.
    fn initial_delta(&self, eq: &DeltaEquation) -> f64 {
        let nodes = self.nodes();
        let vol = nodes[nodes.len() / 2].1 / 100.0;
        let vol_sqrt_t = vol * eq.sqrt_t;
        let d = -eq.u.real().ln() / vol_sqrt_t + eq.p * vol_sqrt_t;
        eq.z_u.real() * eq.phi * eq.z_w.real() * norm_cdf(eq.phi * d)
    }

    /// `(root(delta), root'(delta))` in plain arithmetic.
    fn delta_root_plain(
        &self,
        eq: &DeltaEquation,
        option: OptionType,
        delta: f64,
    ) -> Result<(f64, f64), MarketDataError> {
        let (u, z_u, z_w) = (eq.u.real(), eq.z_u.real(), eq.z_w.real());
        let index = delta_index_from_call_or_put_delta(
            &Number::Float(delta),
            option,
            self.delta_type(),
            Some(&Number::Float(z_w)),
            Some(&Number::Float(u)),
        )?
        .real();

        let vol = self.lookup_plain(index)? / 100.0;
        let vol_sqrt_t = vol * eq.sqrt_t;
        let ln_u = u.ln();
        let d = -ln_u / vol_sqrt_t + eq.p * vol_sqrt_t;
        let value = delta - z_w * z_u * eq.phi * norm_cdf(eq.phi * d);

        // index = -delta + const, so dvol/ddelta = -vol'(index)
        let dvol = -self.slope_plain(index)? / 100.0;
        let dd = dvol * eq.sqrt_t * (ln_u / (vol_sqrt_t * vol_sqrt_t) + eq.p);
        let deriv = 1.0 - z_w * z_u * norm_pdf(eq.phi * d) * dd;
        Ok((value, deriv))
    }

    /// `(root(delta), root'(delta))` carrying sensitivities.
    fn delta_root(
        &self,
        eq: &DeltaEquation,
        option: OptionType,
        delta: f64,
    ) -> Result<(Number, Number), MarketDataError> {
        let index = delta_index_from_call_or_put_delta(
            &Number::Float(delta),
            option,
            self.delta_type(),
            Some(&eq.z_w),
            Some(&eq.u),
        )?;

        let vol = self.lookup(&index)? / 100.0;
        let vol_sqrt_t = &vol * eq.sqrt_t;
        let ln_u = eq.u.ln();
        let d = -(&ln_u / &vol_sqrt_t) + &vol_sqrt_t * eq.p;
        let scale = &eq.z_w * &eq.z_u;
        let value = delta - &scale * eq.phi * (&d * eq.phi).norm_cdf();

        let dvol = -self.spline().ppdnev_single_number(&index, 1)? / 100.0;
        let dd = dvol * eq.sqrt_t * (&ln_u / (&vol_sqrt_t * &vol_sqrt_t) + eq.p);
        let deriv = 1.0 - scale * (&d * eq.phi).norm_pdf() * dd;
        Ok((value, deriv))
    }
}

//! Black-76 pricing parameters implied by a delta and a volatility.

use tracing::debug;

use super::delta_smile::FxDeltaVolSmile;
use super::delta_type::{basis_ratio, BasisFactors, DeltaType, OptionType};
use crate::market_data::error::MarketDataError;
use crate::math::distributions::{norm_cdf, norm_pdf};
use crate::math::solvers::NewtonRaphsonSolver;
use crate::types::Number;

/// Source of the volatility for [`PricingRecord::from_delta_vol`].
#[derive(Debug, Clone)]
pub enum VolInput<'a> {
    /// Fractional volatility, e.g. `0.10` for 10%.
    Fixed(Number),
    /// Read from a smile at the given delta and divided by 100.
    Smile(&'a FxDeltaVolSmile),
}

/// Parameters of one delta and volatility resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingRecord {
    /// The input delta.
    pub delta: Number,
    /// Convention of `delta`.
    pub delta_type: DeltaType,
    /// Fractional volatility.
    pub vol: Number,
    /// `d+` of the Black-76 formula.
    pub d_plus: Number,
    /// `d-` of the Black-76 formula.
    pub d_min: Number,
    /// `vol * sqrt(T)`.
    pub vol_sqrt_t: Number,
    /// Log moneyness `ln(k / f)`.
    pub ln_u: Number,
    /// Moneyness `k / f`.
    pub u: Number,
}

impl PricingRecord {
    /// Resolves the moneyness and `d` terms of an option given its delta.
    ///
    /// Unadjusted deltas invert in closed form. Premium-adjusted deltas are
    /// solved for `u` by Newton from the unadjusted answer, then refined by
    /// one step carrying sensitivities to `delta`, `vol` and `basis`.
    ///
    /// # Errors
    /// - `InvalidExpiry` if `t_expiry` is not positive
    /// - `MissingInput` for spot deltas without `basis`
    /// - `NotImplemented` for premium-adjusted deltas against a smile
    /// - `SolverDivergence` if the premium-adjusted solve does not converge
    ///
    /// # Example
    ///
    /// ```
    /// use fxsmile_core::market_data::smiles::{DeltaType, OptionType, PricingRecord, VolInput};
    /// use fxsmile_core::types::Number;
    ///
    /// let rec = PricingRecord::from_delta_vol(
    ///     &Number::Float(0.5),
    ///     DeltaType::Forward,
    ///     VolInput::Fixed(Number::Float(0.10)),
    ///     1.0,
    ///     OptionType::Call,
    ///     None,
    /// )
    /// .unwrap();
    /// assert!(rec.d_plus.real().abs() < 1e-12);
    /// ```
    pub fn from_delta_vol(
        delta: &Number,
        delta_type: DeltaType,
        vol: VolInput<'_>,
        t_expiry: f64,
        option: OptionType,
        basis: Option<&BasisFactors>,
    ) -> Result<Self, MarketDataError> {
        if t_expiry <= 0.0 {
            return Err(MarketDataError::InvalidExpiry {
                days: (t_expiry * 365.0).round() as i64,
            });
        }

        let (vol, solver) = match vol {
            VolInput::Fixed(v) => (v, NewtonRaphsonSolver::with_defaults()),
            VolInput::Smile(smile) => (
                smile.get(delta.clone(), delta_type, option, basis)? / 100.0,
                smile.solver().clone(),
            ),
        };
        let phi = option.phi();
        let z_w = basis_ratio(delta_type, basis)?;
        let vol_sqrt_t = &vol * t_expiry.sqrt();

        let d_plus = (delta * phi / &z_w).norm_inv_cdf() * phi;
        let d_min = &d_plus - &vol_sqrt_t;
        let ln_u = (&vol_sqrt_t * 0.5 - &d_plus) * &vol_sqrt_t;

        if !delta_type.is_premium_adjusted() {
            let u = ln_u.exp();
            return Ok(PricingRecord {
                delta: delta.clone(),
                delta_type,
                vol,
                d_plus,
                d_min,
                vol_sqrt_t,
                ln_u,
                u,
            });
        }

        let u_0 = ln_u.real().exp();
        let (delta_f, vst_f, z_f) = (delta.real(), vol_sqrt_t.real(), z_w.real());
        let root = solver.find_root_with(
            |u| -> Result<(f64, f64), MarketDataError> {
                let d = -u.ln() / vst_f - 0.5 * vst_f;
                let value = delta_f - z_f * u * phi * norm_cdf(phi * d);
                let deriv = z_f * (-phi * norm_cdf(phi * d) + norm_pdf(phi * d) / vst_f);
                Ok((value, deriv))
            },
            u_0,
        )?;
        debug!(u_0, root, "premium adjusted moneyness converged");

        let u = solver.refine(
            |u| -> Result<(Number, Number), MarketDataError> {
                let d = -(u.ln() / &vol_sqrt_t) - &vol_sqrt_t * 0.5;
                let n = (&d * phi).norm_cdf();
                let value = delta - &z_w * u * phi * &n;
                let deriv = &z_w * (-(n * phi) + (&d * phi).norm_pdf() / &vol_sqrt_t);
                Ok((value, deriv))
            },
            root,
        )?;

        let d_min = (delta * phi / &z_w / &u).norm_inv_cdf() * phi;
        let d_plus = &d_min + &vol_sqrt_t;
        let ln_u = u.ln();
        Ok(PricingRecord {
            delta: delta.clone(),
            delta_type,
            vol,
            d_plus,
            d_min,
            vol_sqrt_t,
            ln_u,
            u,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AdOrder, Date};
    use approx::assert_relative_eq;

    fn fixed(
        delta: f64,
        dt: DeltaType,
        vol: Number,
        option: OptionType,
        basis: Option<&BasisFactors>,
    ) -> PricingRecord {
        PricingRecord::from_delta_vol(&Number::Float(delta), dt, VolInput::Fixed(vol), 1.0, option, basis)
            .unwrap()
    }

    #[test]
    fn test_unadjusted_forward_reproduces_delta() {
        let rec = fixed(0.25, DeltaType::Forward, Number::Float(0.10), OptionType::Call, None);
        assert_relative_eq!(norm_cdf(rec.d_plus.real()), 0.25, epsilon = 1e-12);
        assert_relative_eq!(rec.vol_sqrt_t.real(), 0.10, epsilon = 1e-15);
        assert_relative_eq!(rec.d_min.real(), rec.d_plus.real() - 0.10, epsilon = 1e-15);
        let d = -rec.ln_u.real() / 0.10 + 0.05;
        assert_relative_eq!(d, rec.d_plus.real(), epsilon = 1e-12);
        assert_relative_eq!(rec.u.real(), rec.ln_u.real().exp(), epsilon = 1e-15);
    }

    #[test]
    fn test_unadjusted_put_parity() {
        let call = fixed(0.3, DeltaType::Forward, Number::Float(0.12), OptionType::Call, None);
        let put = fixed(-0.7, DeltaType::Forward, Number::Float(0.12), OptionType::Put, None);
        assert_relative_eq!(call.u.real(), put.u.real(), epsilon = 1e-12);
        assert_relative_eq!(call.d_plus.real(), put.d_plus.real(), epsilon = 1e-12);
    }

    #[test]
    fn test_spot_delta_is_scaled_to_forward() {
        let basis = BasisFactors::new(0.98, 0.99);
        let rec = fixed(0.25, DeltaType::Spot, Number::Float(0.10), OptionType::Call, Some(&basis));
        assert_relative_eq!(norm_cdf(rec.d_plus.real()), 0.25 * 0.99 / 0.98, epsilon = 1e-12);
    }

    #[test]
    fn test_spot_requires_basis() {
        let err = PricingRecord::from_delta_vol(
            &Number::Float(0.25),
            DeltaType::SpotPremiumAdjusted,
            VolInput::Fixed(Number::Float(0.1)),
            1.0,
            OptionType::Call,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, MarketDataError::MissingInput(_)));
    }

    #[test]
    fn test_premium_adjusted_u_reproduces_delta() {
        for &(delta, option) in &[(-0.3, OptionType::Put), (0.25, OptionType::Call)] {
            let rec = fixed(delta, DeltaType::ForwardPremiumAdjusted, Number::Float(0.10), option, None);
            let phi = option.phi();
            let u = rec.u.real();
            let d = -u.ln() / 0.10 - 0.05;
            assert_relative_eq!(u * phi * norm_cdf(phi * d), delta, epsilon = 1e-10);
            assert_relative_eq!(rec.d_min.real(), d, epsilon = 1e-8);
            assert_relative_eq!(rec.d_plus.real(), d + 0.10, epsilon = 1e-8);
            assert_relative_eq!(rec.ln_u.real(), u.ln(), epsilon = 1e-15);
        }
    }

    #[test]
    fn test_premium_adjusted_vol_sensitivity() {
        let vol = Number::variable(0.10, "vol", AdOrder::One);
        let rec = fixed(-0.3, DeltaType::ForwardPremiumAdjusted, vol, OptionType::Put, None);
        let grad = rec.u.gradient(&["vol"])[0];

        let h = 1e-6;
        let bump = |v: f64| {
            fixed(-0.3, DeltaType::ForwardPremiumAdjusted, Number::Float(v), OptionType::Put, None)
                .u
                .real()
        };
        let fd = (bump(0.10 + h) - bump(0.10 - h)) / (2.0 * h);
        assert!((grad - fd).abs() < 1e-6, "ad {} vs fd {}", grad, fd);
    }

    #[test]
    fn test_smile_vol_input() {
        let smile = FxDeltaVolSmile::new(
            vec![(0.25, 10.0), (0.5, 9.0), (0.75, 10.5)],
            Date::from_ymd(2024, 1, 1).unwrap(),
            Date::from_ymd(2025, 1, 1).unwrap(),
            DeltaType::Forward,
            AdOrder::Zero,
        )
        .unwrap();
        let delta = Number::Float(-0.25);
        let rec = PricingRecord::from_delta_vol(
            &delta,
            DeltaType::Forward,
            VolInput::Smile(&smile),
            smile.t_expiry(),
            OptionType::Put,
            None,
        )
        .unwrap();
        assert_relative_eq!(rec.vol.real(), 0.10, epsilon = 1e-12);
    }

    #[test]
    fn test_premium_adjusted_against_smile_is_not_implemented() {
        let smile = FxDeltaVolSmile::new(
            vec![(0.5, 10.0)],
            Date::from_ymd(2024, 1, 1).unwrap(),
            Date::from_ymd(2025, 1, 1).unwrap(),
            DeltaType::Forward,
            AdOrder::Zero,
        )
        .unwrap();
        let err = PricingRecord::from_delta_vol(
            &Number::Float(-0.25),
            DeltaType::ForwardPremiumAdjusted,
            VolInput::Smile(&smile),
            1.0,
            OptionType::Put,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, MarketDataError::NotImplemented(_)));
    }

    #[test]
    fn test_non_positive_expiry() {
        let err = PricingRecord::from_delta_vol(
            &Number::Float(0.25),
            DeltaType::Forward,
            VolInput::Fixed(Number::Float(0.1)),
            0.0,
            OptionType::Call,
            None,
        )
        .unwrap_err();
        assert_eq!(err, MarketDataError::InvalidExpiry { days: 0 });
    }
}

//! Delta-indexed FX volatility smile.

use tracing::debug;
use uuid::Uuid;

use super::delta_type::{convert_same_adjustment_delta, BasisFactors, DeltaType, OptionType};
use crate::market_data::error::MarketDataError;
use crate::math::solvers::{NewtonRaphsonSolver, SolverConfig};
use crate::math::splines::PPSpline;
use crate::types::{time_to_expiry, AdOrder, Date, Number};

/// Cubic B-splines.
const SPLINE_ORDER: usize = 4;

/// Lower bound of the index delta domain.
const LOWER_BOUND: f64 = 0.0;

/// FX volatility smile indexed by delta.
///
/// Volatilities are quoted in percent against the *index delta*: the negated
/// put delta of the smile's [`DeltaType`]. A natural cubic spline runs
/// through the nodes with zero second derivative at both domain bounds.
///
/// Node volatilities are tagged as AD variables `"{id}{i}"`, so values read
/// from the smile carry sensitivities to each node at the chosen
/// [`AdOrder`].
///
/// # Example
///
/// ```
/// use fxsmile_core::market_data::smiles::{DeltaType, FxDeltaVolSmile};
/// use fxsmile_core::types::{AdOrder, Date};
///
/// let smile = FxDeltaVolSmile::new(
///     vec![(0.25, 10.0), (0.5, 9.0), (0.75, 10.5)],
///     Date::from_ymd(2024, 1, 1).unwrap(),
///     Date::from_ymd(2025, 1, 1).unwrap(),
///     DeltaType::Forward,
///     AdOrder::One,
/// )
/// .unwrap()
/// .with_id("eurusd_")
/// .unwrap();
///
/// let vol = smile.lookup(0.5).unwrap();
/// assert!((vol.real() - 9.0).abs() < 1e-9);
/// assert!((vol.gradient(&["eurusd_1"])[0] - 1.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct FxDeltaVolSmile {
    id: String,
    nodes: Vec<(f64, f64)>,
    node_values: Vec<Number>,
    eval_date: Date,
    expiry: Date,
    t_expiry: f64,
    delta_type: DeltaType,
    ad: AdOrder,
    upper_bound: f64,
    spline: PPSpline,
    spline_plain: PPSpline,
    solver: NewtonRaphsonSolver,
}

impl FxDeltaVolSmile {
    /// Builds and calibrates a smile.
    ///
    /// `nodes` are `(index_delta, vol_percent)` pairs with strictly increasing
    /// keys inside the domain.
    ///
    /// # Errors
    /// - `InsufficientData` if `nodes` is empty
    /// - `InvalidExpiry` if `expiry` precedes `eval_date`
    /// - `InvalidNodes` for unordered, non-finite or out-of-domain nodes
    /// - `Interpolation` if the spline cannot be solved
    pub fn new(
        nodes: Vec<(f64, f64)>,
        eval_date: Date,
        expiry: Date,
        delta_type: DeltaType,
        ad: AdOrder,
    ) -> Result<Self, MarketDataError> {
        if nodes.is_empty() {
            return Err(MarketDataError::InsufficientData { got: 0, need: 1 });
        }
        let days = expiry - eval_date;
        if days < 0 {
            return Err(MarketDataError::InvalidExpiry { days });
        }
        if let Some((k, v)) = nodes.iter().find(|(k, v)| !k.is_finite() || !v.is_finite()) {
            return Err(MarketDataError::InvalidNodes(format!(
                "node ({}, {}) is not finite",
                k, v
            )));
        }
        if let Some(w) = nodes.windows(2).find(|w| w[0].0 >= w[1].0) {
            return Err(MarketDataError::InvalidNodes(format!(
                "node keys must be strictly increasing, got {} then {}",
                w[0].0, w[1].0
            )));
        }

        let t_expiry = time_to_expiry(eval_date, expiry);
        let upper_bound = upper_bound(&nodes, delta_type, t_expiry);
        let (first, last) = (nodes[0].0, nodes[nodes.len() - 1].0);
        if first < LOWER_BOUND || last > upper_bound {
            return Err(MarketDataError::InvalidNodes(format!(
                "node keys must lie in [{}, {}], got [{}, {}]",
                LOWER_BOUND, upper_bound, first, last
            )));
        }

        let knots = knot_sequence(&nodes, upper_bound);
        let mut smile = Self {
            id: default_id(),
            nodes,
            node_values: Vec::new(),
            eval_date,
            expiry,
            t_expiry,
            delta_type,
            ad,
            upper_bound,
            spline: PPSpline::new(SPLINE_ORDER, knots.clone())?,
            spline_plain: PPSpline::new(SPLINE_ORDER, knots)?,
            solver: NewtonRaphsonSolver::default(),
        };
        smile.calibrate()?;
        Ok(smile)
    }

    /// Replaces the variable prefix and re-tags the nodes.
    pub fn with_id(mut self, id: impl Into<String>) -> Result<Self, MarketDataError> {
        self.id = id.into();
        self.calibrate()?;
        Ok(self)
    }

    /// Sets the Newton configuration used by strike inversion.
    pub fn with_solver_config(mut self, config: SolverConfig) -> Self {
        self.solver = NewtonRaphsonSolver::new(config);
        self
    }

    /// Changes the derivative order, re-tagging nodes and recalibrating.
    ///
    /// A no-op when the order is unchanged.
    pub fn set_ad_order(&mut self, ad: AdOrder) -> Result<(), MarketDataError> {
        if ad == self.ad {
            return Ok(());
        }
        self.ad = ad;
        self.calibrate()
    }

    fn calibrate(&mut self) -> Result<(), MarketDataError> {
        self.node_values = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, (_, vol))| Number::variable(*vol, format!("{}{}", self.id, i), self.ad))
            .collect();

        let (lb, ub) = (LOWER_BOUND, self.upper_bound);
        let zero = Number::Float(0.0);
        let mut tau = vec![lb];
        let mut y = vec![zero.clone()];
        if let [(key, _)] = self.nodes.as_slice() {
            // One node: pin its vol at two abscissae so the fit is flat
            let v = &self.node_values[0];
            if *key == lb {
                tau.extend([*key, ub]);
            } else {
                tau.extend([lb, *key]);
            }
            y.extend([v.clone(), v.clone()]);
        } else {
            tau.extend(self.nodes.iter().map(|(k, _)| *k));
            y.extend(self.node_values.iter().cloned());
        }
        tau.push(ub);
        y.push(zero);

        self.spline.csolve(&tau, &y, 2, 2)?;
        let plain: Vec<Number> = self
            .spline
            .coefficients()
            .unwrap_or_default()
            .iter()
            .map(|c| Number::Float(c.real()))
            .collect();
        self.spline_plain =
            PPSpline::with_coefficients(SPLINE_ORDER, self.spline.knots().to_vec(), plain)?;

        debug!(
            id = %self.id,
            nodes = self.nodes.len(),
            delta_type = %self.delta_type,
            ad = ?self.ad,
            upper_bound = ub,
            "smile calibrated"
        );
        Ok(())
    }

    /// Volatility (percent) at an index delta.
    ///
    /// A differentiable index propagates its own sensitivities.
    ///
    /// # Errors
    /// `OutOfRange` outside `[lower_bound, upper_bound]`; no extrapolation.
    pub fn lookup(&self, index: impl Into<Number>) -> Result<Number, MarketDataError> {
        let index = index.into();
        self.check_range(index.real())?;
        Ok(self.spline.ppev_single_number(&index)?)
    }

    /// Plain volatility (percent) at an index delta.
    pub(crate) fn lookup_plain(&self, index: f64) -> Result<f64, MarketDataError> {
        self.check_range(index)?;
        Ok(self.spline_plain.ppev_single(index)?.real())
    }

    /// Plain first derivative of the smile in index delta.
    pub(crate) fn slope_plain(&self, index: f64) -> Result<f64, MarketDataError> {
        self.check_range(index)?;
        Ok(self.spline_plain.ppdnev_single(index, 1)?.real())
    }

    fn check_range(&self, x: f64) -> Result<(), MarketDataError> {
        if x.is_nan() || x < LOWER_BOUND || x > self.upper_bound {
            return Err(MarketDataError::OutOfRange {
                x,
                min: LOWER_BOUND,
                max: self.upper_bound,
            });
        }
        Ok(())
    }

    /// Volatility (percent) for a real option delta.
    ///
    /// The delta is mapped to a put delta by parity in its own basis, negated,
    /// then rescaled to the smile's basis.
    ///
    /// # Errors
    /// - `NotImplemented` if the smile or the input is premium-adjusted
    /// - `MissingInput` if a spot delta or basis change lacks `basis`
    /// - `OutOfRange` as for [`lookup`](Self::lookup)
    pub fn get(
        &self,
        delta: impl Into<Number>,
        delta_type: DeltaType,
        option: OptionType,
        basis: Option<&BasisFactors>,
    ) -> Result<Number, MarketDataError> {
        let index = self.convert_delta(&delta.into(), delta_type, option, basis)?;
        self.lookup(index)
    }

    /// Index delta equivalent to an unadjusted option delta.
    pub fn convert_delta(
        &self,
        delta: &Number,
        delta_type: DeltaType,
        option: OptionType,
        basis: Option<&BasisFactors>,
    ) -> Result<Number, MarketDataError> {
        if self.delta_type.is_premium_adjusted() || delta_type.is_premium_adjusted() {
            return Err(MarketDataError::NotImplemented(format!(
                "cannot convert to or from premium-adjusted deltas (smile '{}', input '{}')",
                self.delta_type, delta_type
            )));
        }

        let put = match option {
            OptionType::Call => {
                let z_w = super::delta_type::basis_ratio(delta_type, basis)?;
                delta - z_w
            }
            OptionType::Put => delta.clone(),
        };
        convert_same_adjustment_delta(&-put, delta_type, self.delta_type, basis)
    }

    /// Variable prefix for node sensitivities.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// `(index_delta, vol_percent)` pairs as given.
    pub fn nodes(&self) -> &[(f64, f64)] {
        &self.nodes
    }

    /// Node volatilities tagged at the current order.
    pub fn node_values(&self) -> &[Number] {
        &self.node_values
    }

    /// Evaluation date.
    pub fn eval_date(&self) -> Date {
        self.eval_date
    }

    /// Expiry date.
    pub fn expiry(&self) -> Date {
        self.expiry
    }

    /// Act/365F time to expiry in years.
    pub fn t_expiry(&self) -> f64 {
        self.t_expiry
    }

    /// Delta convention of the index.
    pub fn delta_type(&self) -> DeltaType {
        self.delta_type
    }

    /// Current derivative order.
    pub fn ad_order(&self) -> AdOrder {
        self.ad
    }

    /// Lower bound of the index domain.
    pub fn lower_bound(&self) -> f64 {
        LOWER_BOUND
    }

    /// Upper bound of the index domain.
    pub fn upper_bound(&self) -> f64 {
        self.upper_bound
    }

    /// Spline knot sequence.
    pub fn knots(&self) -> &[f64] {
        self.spline.knots()
    }

    /// The fitted spline.
    pub fn spline(&self) -> &PPSpline {
        &self.spline
    }

    /// Newton solver used for strike inversion.
    pub fn solver(&self) -> &NewtonRaphsonSolver {
        &self.solver
    }
}

fn default_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{}_", &hex[..5])
}

/// `1` unadjusted; `exp(v√T(4.75 + v√T/2))` premium-adjusted, `v` the last
/// node vol as a fraction.
fn upper_bound(nodes: &[(f64, f64)], delta_type: DeltaType, t_expiry: f64) -> f64 {
    if !delta_type.is_premium_adjusted() {
        return 1.0;
    }
    let vol = nodes.last().map_or(0.0, |(_, v)| v / 100.0);
    let vol_sqrt_t = vol * t_expiry.max(0.0).sqrt();
    (vol_sqrt_t * (4.75 + 0.5 * vol_sqrt_t)).exp()
}

/// Clamped knots with interior node keys when there are three or more nodes.
fn knot_sequence(nodes: &[(f64, f64)], upper_bound: f64) -> Vec<f64> {
    let mut t = vec![LOWER_BOUND; SPLINE_ORDER];
    if nodes.len() >= 3 {
        t.extend(nodes[1..nodes.len() - 1].iter().map(|(k, _)| *k));
    }
    t.extend(std::iter::repeat(upper_bound).take(SPLINE_ORDER));
    t
}

//! FX delta conventions and conversions between them.
//!
//! An FX option delta is expressed on a forward or spot basis, and either
//! unadjusted or premium-adjusted (premium paid in the foreign currency).
//! Smiles index volatilities by the negated put delta of their own
//! convention; the helpers here map real option deltas onto that index.

use std::fmt;
use std::str::FromStr;

use num_traits::One;

use crate::market_data::error::MarketDataError;
use crate::types::Number;

/// Delta convention.
///
/// # Examples
///
/// ```
/// use fxsmile_core::market_data::smiles::DeltaType;
///
/// let dt: DeltaType = "Forward_PA".parse().unwrap();
/// assert_eq!(dt, DeltaType::ForwardPremiumAdjusted);
/// assert!(dt.is_premium_adjusted());
/// assert!("atm".parse::<DeltaType>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub enum DeltaType {
    /// Forward, unadjusted.
    Forward,
    /// Spot, unadjusted.
    Spot,
    /// Forward, premium-adjusted.
    ForwardPremiumAdjusted,
    /// Spot, premium-adjusted.
    SpotPremiumAdjusted,
}

impl DeltaType {
    /// Market short code: `forward`, `spot`, `forward_pa` or `spot_pa`.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeltaType::Forward => "forward",
            DeltaType::Spot => "spot",
            DeltaType::ForwardPremiumAdjusted => "forward_pa",
            DeltaType::SpotPremiumAdjusted => "spot_pa",
        }
    }

    /// Whether the delta is measured on a spot basis.
    pub fn is_spot(&self) -> bool {
        matches!(self, DeltaType::Spot | DeltaType::SpotPremiumAdjusted)
    }

    /// Whether the delta includes the premium adjustment.
    pub fn is_premium_adjusted(&self) -> bool {
        matches!(
            self,
            DeltaType::ForwardPremiumAdjusted | DeltaType::SpotPremiumAdjusted
        )
    }
}

impl FromStr for DeltaType {
    type Err = MarketDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "forward" => Ok(DeltaType::Forward),
            "spot" => Ok(DeltaType::Spot),
            "forward_pa" => Ok(DeltaType::ForwardPremiumAdjusted),
            "spot_pa" => Ok(DeltaType::SpotPremiumAdjusted),
            _ => Err(MarketDataError::InvalidConvention(format!(
                "delta type must be one of {{forward, spot, forward_pa, spot_pa}}, got '{}'",
                s
            ))),
        }
    }
}

impl TryFrom<String> for DeltaType {
    type Error = MarketDataError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<DeltaType> for String {
    fn from(dt: DeltaType) -> Self {
        dt.as_str().to_string()
    }
}

impl fmt::Display for DeltaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Call or put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OptionType {
    /// Call option.
    Call,
    /// Put option.
    Put,
}

impl OptionType {
    /// `+1` for a call, `-1` for a put.
    #[inline]
    pub fn phi(&self) -> f64 {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }
}

impl FromStr for OptionType {
    type Err = MarketDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "call" | "c" => Ok(OptionType::Call),
            "put" | "p" => Ok(OptionType::Put),
            _ => Err(MarketDataError::InvalidConvention(format!(
                "option type must be 'call' or 'put', got '{}'",
                s
            ))),
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => f.write_str("call"),
            OptionType::Put => f.write_str("put"),
        }
    }
}

/// Discount factors relating spot and forward deltas.
///
/// `w_deli` discounts to the delivery date and `w_spot` to the spot date.
#[derive(Debug, Clone, PartialEq)]
pub struct BasisFactors {
    /// Discount factor to delivery.
    pub w_deli: Number,
    /// Discount factor to spot.
    pub w_spot: Number,
}

impl BasisFactors {
    /// Creates basis factors.
    pub fn new(w_deli: impl Into<Number>, w_spot: impl Into<Number>) -> Self {
        Self {
            w_deli: w_deli.into(),
            w_spot: w_spot.into(),
        }
    }

    /// `z_w = w_deli / w_spot`.
    pub fn spot_forward_ratio(&self) -> Number {
        &self.w_deli / &self.w_spot
    }
}

fn required<'a>(value: Option<&'a Number>, what: &str, dt: DeltaType) -> Result<&'a Number, MarketDataError> {
    value.ok_or_else(|| {
        MarketDataError::MissingInput(format!("{} is required for '{}' deltas", what, dt))
    })
}

/// Converts a call delta to the put delta of the same strike.
///
/// Parity by convention, with `z_w = w_deli / w_spot` and `u = k / f`:
///
/// | convention   | put delta          |
/// |--------------|--------------------|
/// | `forward`    | `call - 1`         |
/// | `spot`       | `call - z_w`       |
/// | `forward_pa` | `call - u`         |
/// | `spot_pa`    | `call - z_w * u`   |
///
/// # Errors
/// `MissingInput` when `z_w` or `u` is needed but absent.
pub fn call_to_put_delta(
    delta: &Number,
    delta_type: DeltaType,
    z_w: Option<&Number>,
    u: Option<&Number>,
) -> Result<Number, MarketDataError> {
    let put = match delta_type {
        DeltaType::Forward => delta - 1.0,
        DeltaType::Spot => delta - required(z_w, "z_w", delta_type)?,
        DeltaType::ForwardPremiumAdjusted => delta - required(u, "moneyness", delta_type)?,
        DeltaType::SpotPremiumAdjusted => {
            let z_w = required(z_w, "z_w", delta_type)?;
            let u = required(u, "moneyness", delta_type)?;
            delta - z_w * u
        }
    };
    Ok(put)
}

/// Index delta for an option delta already in the smile's convention.
///
/// Calls are mapped to puts by [`call_to_put_delta`]; the index is the
/// negated put delta.
pub fn delta_index_from_call_or_put_delta(
    delta: &Number,
    option: OptionType,
    delta_type: DeltaType,
    z_w: Option<&Number>,
    u: Option<&Number>,
) -> Result<Number, MarketDataError> {
    let put = match option {
        OptionType::Call => call_to_put_delta(delta, delta_type, z_w, u)?,
        OptionType::Put => delta.clone(),
    };
    Ok(-put)
}

/// Rescales a delta between spot and forward bases.
///
/// Spot to forward multiplies by `w_spot / w_deli`; forward to spot by
/// `w_deli / w_spot`.
///
/// # Errors
/// - `NotImplemented` when converting between adjusted and unadjusted
/// - `MissingInput` when a basis change has no `basis`
///
/// # Examples
///
/// ```
/// use fxsmile_core::market_data::smiles::{convert_same_adjustment_delta, BasisFactors, DeltaType};
/// use fxsmile_core::types::Number;
///
/// let basis = BasisFactors::new(0.98, 0.99);
/// let fwd = convert_same_adjustment_delta(
///     &Number::Float(0.25),
///     DeltaType::Spot,
///     DeltaType::Forward,
///     Some(&basis),
/// )
/// .unwrap();
/// assert!((fwd.real() - 0.25 * 0.99 / 0.98).abs() < 1e-15);
/// ```
pub fn convert_same_adjustment_delta(
    delta: &Number,
    from: DeltaType,
    to: DeltaType,
    basis: Option<&BasisFactors>,
) -> Result<Number, MarketDataError> {
    if from.is_premium_adjusted() != to.is_premium_adjusted() {
        return Err(MarketDataError::NotImplemented(format!(
            "cannot convert '{}' delta to '{}': only deltas of the same premium adjustment convert",
            from, to
        )));
    }
    if from.is_spot() == to.is_spot() {
        return Ok(delta.clone());
    }
    let basis = basis.ok_or_else(|| {
        MarketDataError::MissingInput(format!(
            "basis factors are required to convert '{}' delta to '{}'",
            from, to
        ))
    })?;
    if from.is_spot() {
        Ok(delta * &basis.w_spot / &basis.w_deli)
    } else {
        Ok(delta * &basis.w_deli / &basis.w_spot)
    }
}

/// `1` for forward conventions, `w_deli / w_spot` for spot conventions.
pub(crate) fn basis_ratio(
    delta_type: DeltaType,
    basis: Option<&BasisFactors>,
) -> Result<Number, MarketDataError> {
    if !delta_type.is_spot() {
        return Ok(Number::one());
    }
    basis.map(BasisFactors::spot_forward_ratio).ok_or_else(|| {
        MarketDataError::MissingInput(format!(
            "basis factors (w_deli, w_spot) are required for '{}' deltas",
            delta_type
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AdOrder;
    use approx::assert_relative_eq;

    fn n(x: f64) -> Number {
        Number::Float(x)
    }

    #[test]
    fn test_delta_type_parse_case_insensitive() {
        assert_eq!("FORWARD".parse::<DeltaType>().unwrap(), DeltaType::Forward);
        assert_eq!("Spot".parse::<DeltaType>().unwrap(), DeltaType::Spot);
        assert_eq!("spot_PA".parse::<DeltaType>().unwrap(), DeltaType::SpotPremiumAdjusted);
    }

    #[test]
    fn test_delta_type_parse_invalid() {
        let err = "fwd".parse::<DeltaType>().unwrap_err();
        assert!(matches!(err, MarketDataError::InvalidConvention(_)));
        assert!(err.to_string().contains("fwd"));
    }

    #[test]
    fn test_delta_type_display_roundtrip() {
        for dt in [
            DeltaType::Forward,
            DeltaType::Spot,
            DeltaType::ForwardPremiumAdjusted,
            DeltaType::SpotPremiumAdjusted,
        ] {
            assert_eq!(dt.to_string().parse::<DeltaType>().unwrap(), dt);
        }
    }

    #[test]
    fn test_option_type() {
        assert_eq!(OptionType::Call.phi(), 1.0);
        assert_eq!(OptionType::Put.phi(), -1.0);
        assert_eq!("PUT".parse::<OptionType>().unwrap(), OptionType::Put);
        assert!("straddle".parse::<OptionType>().is_err());
    }

    #[test]
    fn test_unadjusted_parity() {
        let zw = n(0.98);
        for &d in &[0.05, 0.25, 0.5, 0.75, 0.95] {
            let put = call_to_put_delta(&n(d), DeltaType::Forward, None, None).unwrap();
            assert_eq!(put.real(), d - 1.0);

            let put = call_to_put_delta(&n(d), DeltaType::Spot, Some(&zw), None).unwrap();
            assert_eq!(put.real(), d - 0.98);
        }
    }

    #[test]
    fn test_index_is_negated_put_delta() {
        // A 25 delta call and a 75 delta put share the forward index 0.75
        let call_idx =
            delta_index_from_call_or_put_delta(&n(0.25), OptionType::Call, DeltaType::Forward, None, None)
                .unwrap();
        let put_idx =
            delta_index_from_call_or_put_delta(&n(-0.75), OptionType::Put, DeltaType::Forward, None, None)
                .unwrap();
        assert_relative_eq!(call_idx.real(), 0.75, epsilon = 1e-15);
        assert_relative_eq!(put_idx.real(), 0.75, epsilon = 1e-15);
    }

    #[test]
    fn test_premium_adjusted_parity_needs_moneyness() {
        let err = call_to_put_delta(&n(0.3), DeltaType::ForwardPremiumAdjusted, None, None).unwrap_err();
        assert!(matches!(err, MarketDataError::MissingInput(_)));

        let u = n(1.02);
        let zw = n(0.99);
        let put =
            call_to_put_delta(&n(0.3), DeltaType::SpotPremiumAdjusted, Some(&zw), Some(&u)).unwrap();
        assert_relative_eq!(put.real(), 0.3 - 0.99 * 1.02, epsilon = 1e-15);
    }

    #[test]
    fn test_parity_propagates_sensitivities() {
        let u = Number::variable(1.05, "u", AdOrder::One);
        let put = call_to_put_delta(&n(0.4), DeltaType::ForwardPremiumAdjusted, None, Some(&u)).unwrap();
        assert_eq!(put.gradient(&["u"]), vec![-1.0]);
    }

    #[test]
    fn test_convert_cross_adjustment_not_implemented() {
        let err = convert_same_adjustment_delta(
            &n(0.25),
            DeltaType::ForwardPremiumAdjusted,
            DeltaType::Spot,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, MarketDataError::NotImplemented(_)));
    }

    #[test]
    fn test_convert_same_basis_is_identity() {
        let d = convert_same_adjustment_delta(
            &n(0.25),
            DeltaType::SpotPremiumAdjusted,
            DeltaType::SpotPremiumAdjusted,
            None,
        )
        .unwrap();
        assert_eq!(d.real(), 0.25);
    }

    #[test]
    fn test_convert_spot_forward_roundtrip() {
        let basis = BasisFactors::new(0.97, 0.995);
        let fwd =
            convert_same_adjustment_delta(&n(0.3), DeltaType::Spot, DeltaType::Forward, Some(&basis))
                .unwrap();
        let back =
            convert_same_adjustment_delta(&fwd, DeltaType::Forward, DeltaType::Spot, Some(&basis))
                .unwrap();
        assert_relative_eq!(back.real(), 0.3, epsilon = 1e-15);
    }

    #[test]
    fn test_convert_basis_change_requires_factors() {
        let err =
            convert_same_adjustment_delta(&n(0.3), DeltaType::Forward, DeltaType::Spot, None).unwrap_err();
        assert!(matches!(err, MarketDataError::MissingInput(_)));
    }

    #[test]
    fn test_basis_ratio() {
        assert_eq!(basis_ratio(DeltaType::Forward, None).unwrap().real(), 1.0);
        let basis = BasisFactors::new(0.9, 0.95);
        assert_relative_eq!(
            basis_ratio(DeltaType::SpotPremiumAdjusted, Some(&basis)).unwrap().real(),
            0.9 / 0.95,
            epsilon = 1e-15
        );
        assert!(basis_ratio(DeltaType::Spot, None).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_delta_type_serde_uses_short_codes() {
        let json = serde_json::to_string(&DeltaType::SpotPremiumAdjusted).unwrap();
        assert_eq!(json, "\"spot_pa\"");
        let dt: DeltaType = serde_json::from_str("\"Forward\"").unwrap();
        assert_eq!(dt, DeltaType::Forward);
    }
}

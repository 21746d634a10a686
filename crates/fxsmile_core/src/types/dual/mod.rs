//! Forward-mode automatic differentiation with labelled variables.
//!
//! Every differentiable quantity in this crate is a [`Number`], an explicit
//! sum type over three representations:
//!
//! - `Number::Float`: plain `f64`, no sensitivities
//! - `Number::Dual`: value plus first derivatives ([`Dual`])
//! - `Number::Dual2`: value plus first and second derivatives ([`Dual2`])
//!
//! Derivatives are recorded against string labels (`vars`) rather than
//! positional seeds, so quantities built from unrelated inputs combine
//! correctly: variable sets are unioned before every binary operation.
//!
//! ## Promotion
//!
//! Combining two numbers of different [`AdOrder`] promotes the lower one via
//! [`Number::to_order`]. There is no global order; callers choose it
//! explicitly (for example when constructing a smile).
//!
//! ```
//! use fxsmile_core::types::dual::{AdOrder, Number};
//!
//! let x = Number::variable(2.0, "x", AdOrder::One);
//! let y = &x * &x + 3.0;
//!
//! assert_eq!(y.real(), 7.0);
//! assert_eq!(y.gradient(&["x"]), vec![4.0]);
//! ```

mod first;
mod number;
mod second;

use std::sync::Arc;

use indexmap::IndexSet;

use crate::types::error::DualError;

pub use first::Dual;
pub use number::Number;
pub use second::Dual2;

/// Shared, ordered set of variable labels.
pub(crate) type Vars = Arc<IndexSet<String>>;

/// Derivative order tracked by a [`Number`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub enum AdOrder {
    /// Plain floating point.
    #[default]
    Zero,
    /// First derivatives.
    One,
    /// First and second derivatives.
    Two,
}

impl TryFrom<u8> for AdOrder {
    type Error = DualError;

    fn try_from(order: u8) -> Result<Self, Self::Error> {
        match order {
            0 => Ok(AdOrder::Zero),
            1 => Ok(AdOrder::One),
            2 => Ok(AdOrder::Two),
            other => Err(DualError::InvalidOrder(other)),
        }
    }
}

impl From<AdOrder> for u8 {
    fn from(order: AdOrder) -> Self {
        match order {
            AdOrder::Zero => 0,
            AdOrder::One => 1,
            AdOrder::Two => 2,
        }
    }
}

/// Same labels in the same order.
#[inline]
fn same_vars(a: &Vars, b: &Vars) -> bool {
    Arc::ptr_eq(a, b) || (a.len() == b.len() && a.iter().eq(b.iter()))
}

/// Order-preserving union of two variable sets.
///
/// Returns one of the inputs when it already contains the other.
pub(crate) fn union_vars(a: &Vars, b: &Vars) -> Vars {
    if same_vars(a, b) || (a.len() >= b.len() && b.is_subset(a)) {
        return Arc::clone(a);
    }
    if a.is_subset(b) {
        return Arc::clone(b);
    }
    Arc::new(a.union(b).cloned().collect())
}

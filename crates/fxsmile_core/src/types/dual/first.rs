//! First-order dual number.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::sync::Arc;

use indexmap::IndexSet;
use ndarray::Array1;

use super::{same_vars, union_vars, Vars};
use crate::types::error::DualError;

/// Value with first derivatives against labelled variables.
///
/// `dual[i]` is the partial derivative with respect to `vars[i]`.
#[derive(Debug, Clone)]
pub struct Dual {
    real: f64,
    vars: Vars,
    dual: Array1<f64>,
}

impl Dual {
    /// Creates a dual number.
    ///
    /// Repeated labels collapse to one. An empty `dual` seeds every variable
    /// with a unit derivative.
    ///
    /// # Errors
    /// Returns `DualError::ShapeMismatch` when a non-empty `dual` does not
    /// match the distinct labels in length.
    pub fn new(real: f64, vars: Vec<String>, dual: Vec<f64>) -> Result<Self, DualError> {
        let vars: IndexSet<String> = vars.into_iter().collect();
        let dual = if dual.is_empty() {
            Array1::ones(vars.len())
        } else {
            Array1::from_vec(dual)
        };
        if dual.len() != vars.len() {
            return Err(DualError::ShapeMismatch {
                vars: vars.len(),
                dual: dual.len(),
            });
        }
        Ok(Self {
            real,
            vars: Arc::new(vars),
            dual,
        })
    }

    /// A single variable with unit derivative.
    pub fn variable(real: f64, name: impl Into<String>) -> Self {
        Self {
            real,
            vars: Arc::new(std::iter::once(name.into()).collect()),
            dual: Array1::ones(1),
        }
    }

    /// A constant carrying no variables.
    pub fn constant(real: f64) -> Self {
        Self {
            real,
            vars: Arc::new(IndexSet::new()),
            dual: Array1::zeros(0),
        }
    }

    pub(crate) fn from_parts(real: f64, vars: Vars, dual: Array1<f64>) -> Self {
        Self { real, vars, dual }
    }

    /// Value.
    #[inline]
    pub fn real(&self) -> f64 {
        self.real
    }

    /// Variable labels.
    #[inline]
    pub fn vars(&self) -> &IndexSet<String> {
        &self.vars
    }

    /// First derivatives, aligned with [`Dual::vars`].
    #[inline]
    pub fn dual(&self) -> &Array1<f64> {
        &self.dual
    }

    pub(crate) fn vars_arc(&self) -> &Vars {
        &self.vars
    }

    /// Re-expresses the gradient against `vars`, zero-filling new labels.
    pub(crate) fn to_vars(&self, vars: &Vars) -> Self {
        if same_vars(&self.vars, vars) {
            return Self::from_parts(self.real, Arc::clone(vars), self.dual.clone());
        }
        let dual = vars
            .iter()
            .map(|v| self.vars.get_index_of(v).map_or(0.0, |i| self.dual[i]))
            .collect();
        Self::from_parts(self.real, Arc::clone(vars), dual)
    }

    fn aligned(&self, other: &Self) -> (Self, Self) {
        let vars = union_vars(&self.vars, &other.vars);
        (self.to_vars(&vars), other.to_vars(&vars))
    }

    /// Applies `f` with `f(x) = f0`, `f'(x) = f1`.
    pub(crate) fn chain(&self, f0: f64, f1: f64) -> Self {
        Self::from_parts(f0, Arc::clone(&self.vars), &self.dual * f1)
    }

    pub(crate) fn scale(&self, s: f64) -> Self {
        self.chain(self.real * s, s)
    }

    pub(crate) fn shift(&self, s: f64) -> Self {
        Self::from_parts(self.real + s, Arc::clone(&self.vars), self.dual.clone())
    }

    /// Partial derivatives for the requested labels, zero where absent.
    pub fn gradient(&self, vars: &[&str]) -> Vec<f64> {
        vars.iter()
            .map(|var| self.vars.get_index_of(*var).map_or(0.0, |i| self.dual[i]))
            .collect()
    }
}

impl PartialEq for Dual {
    /// Equal values with identical gradients once labels are aligned.
    fn eq(&self, other: &Dual) -> bool {
        if self.real != other.real || self.vars.len() != other.vars.len() {
            return false;
        }
        if same_vars(&self.vars, &other.vars) {
            return self.dual == other.dual;
        }
        self.vars.is_subset(&other.vars) && other.to_vars(&self.vars).dual == self.dual
    }
}

impl Add for &Dual {
    type Output = Dual;

    fn add(self, rhs: &Dual) -> Dual {
        let (a, b) = self.aligned(rhs);
        Dual::from_parts(a.real + b.real, a.vars, a.dual + b.dual)
    }
}

impl Sub for &Dual {
    type Output = Dual;

    fn sub(self, rhs: &Dual) -> Dual {
        let (a, b) = self.aligned(rhs);
        Dual::from_parts(a.real - b.real, a.vars, a.dual - b.dual)
    }
}

impl Mul for &Dual {
    type Output = Dual;

    fn mul(self, rhs: &Dual) -> Dual {
        let (a, b) = self.aligned(rhs);
        let dual = &a.dual * b.real + &b.dual * a.real;
        Dual::from_parts(a.real * b.real, a.vars, dual)
    }
}

impl Neg for &Dual {
    type Output = Dual;

    fn neg(self) -> Dual {
        self.scale(-1.0)
    }
}

impl fmt::Display for Dual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<&str> = self.vars.iter().map(String::as_str).collect();
        write!(f, "<Dual: {:.6}, ({}), {}>", self.real, labels.join(", "), self.dual)
    }
}

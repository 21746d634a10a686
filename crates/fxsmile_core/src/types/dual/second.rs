//! Second-order dual number.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::sync::Arc;

use indexmap::IndexSet;
use ndarray::{Array1, Array2, Axis};

use super::{same_vars, union_vars, Dual, Vars};
use crate::types::error::DualError;

/// Value with gradient and Hessian against labelled variables.
///
/// `dual2` is `n x n` for `n` variables and holds the true second partial
/// derivatives.
#[derive(Debug, Clone)]
pub struct Dual2 {
    real: f64,
    vars: Vars,
    dual: Array1<f64>,
    dual2: Array2<f64>,
}

/// `g h^T + h g^T`.
fn sym_outer(g: &Array1<f64>, h: &Array1<f64>) -> Array2<f64> {
    let g_col = g.view().insert_axis(Axis(1));
    let h_row = h.view().insert_axis(Axis(0));
    let gh = g_col.dot(&h_row);
    &gh + &gh.t()
}

impl Dual2 {
    /// Creates a second-order dual number.
    ///
    /// Repeated labels collapse to one. An empty `dual` seeds unit first
    /// derivatives; an empty `dual2` seeds a zero Hessian. A non-empty
    /// `dual2` is read row-major.
    ///
    /// # Errors
    /// Returns `DualError::ShapeMismatch` when `dual` or `dual2` do not match
    /// `vars`.
    pub fn new(
        real: f64,
        vars: Vec<String>,
        dual: Vec<f64>,
        dual2: Vec<f64>,
    ) -> Result<Self, DualError> {
        let vars: IndexSet<String> = vars.into_iter().collect();
        let n = vars.len();
        let dual = if dual.is_empty() {
            Array1::ones(n)
        } else {
            Array1::from_vec(dual)
        };
        if dual.len() != n {
            return Err(DualError::ShapeMismatch {
                vars: n,
                dual: dual.len(),
            });
        }
        let dual2 = if dual2.is_empty() {
            Array2::zeros((n, n))
        } else {
            let len = dual2.len();
            Array2::from_shape_vec((n, n), dual2)
                .map_err(|_| DualError::ShapeMismatch { vars: n, dual: len })?
        };
        Ok(Self {
            real,
            vars: Arc::new(vars),
            dual,
            dual2,
        })
    }

    /// A single variable with unit gradient and zero Hessian.
    pub fn variable(real: f64, name: impl Into<String>) -> Self {
        Self {
            real,
            vars: Arc::new(std::iter::once(name.into()).collect()),
            dual: Array1::ones(1),
            dual2: Array2::zeros((1, 1)),
        }
    }

    /// A constant carrying no variables.
    pub fn constant(real: f64) -> Self {
        Self {
            real,
            vars: Arc::new(IndexSet::new()),
            dual: Array1::zeros(0),
            dual2: Array2::zeros((0, 0)),
        }
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

    /// First derivatives, aligned with [`Dual2::vars`].
    #[inline]
    pub fn dual(&self) -> &Array1<f64> {
        &self.dual
    }

    /// Hessian, rows and columns aligned with [`Dual2::vars`].
    #[inline]
    pub fn dual2(&self) -> &Array2<f64> {
        &self.dual2
    }

    /// Drops the Hessian.
    pub(crate) fn to_first(&self) -> Dual {
        Dual::from_parts(self.real, Arc::clone(&self.vars), self.dual.clone())
    }

    /// Lifts a first-order number with a zero Hessian.
    pub(crate) fn from_first(d: &Dual) -> Self {
        let n = d.vars().len();
        Self {
            real: d.real(),
            vars: Arc::clone(d.vars_arc()),
            dual: d.dual().clone(),
            dual2: Array2::zeros((n, n)),
        }
    }

    pub(crate) fn to_vars(&self, vars: &Vars) -> Self {
        if same_vars(&self.vars, vars) {
            return Self {
                real: self.real,
                vars: Arc::clone(vars),
                dual: self.dual.clone(),
                dual2: self.dual2.clone(),
            };
        }
        let map: Vec<Option<usize>> = vars.iter().map(|v| self.vars.get_index_of(v)).collect();
        let n = vars.len();
        let dual = map
            .iter()
            .map(|i| i.map_or(0.0, |i| self.dual[i]))
            .collect();
        let dual2 = Array2::from_shape_fn((n, n), |(r, c)| match (map[r], map[c]) {
            (Some(r), Some(c)) => self.dual2[[r, c]],
            _ => 0.0,
        });
        Self {
            real: self.real,
            vars: Arc::clone(vars),
            dual,
            dual2,
        }
    }

    fn aligned(&self, other: &Self) -> (Self, Self) {
        let vars = union_vars(&self.vars, &other.vars);
        (self.to_vars(&vars), other.to_vars(&vars))
    }

    /// Applies `f` with `f(x) = f0`, `f'(x) = f1`, `f''(x) = f2`.
    ///
    /// `H' = f1 H + f2 g g^T`.
    pub(crate) fn chain(&self, f0: f64, f1: f64, f2: f64) -> Self {
        let dual2 = &self.dual2 * f1 + sym_outer(&self.dual, &self.dual) * (0.5 * f2);
        Self {
            real: f0,
            vars: Arc::clone(&self.vars),
            dual: &self.dual * f1,
            dual2,
        }
    }

    pub(crate) fn scale(&self, s: f64) -> Self {
        Self {
            real: self.real * s,
            vars: Arc::clone(&self.vars),
            dual: &self.dual * s,
            dual2: &self.dual2 * s,
        }
    }

    pub(crate) fn shift(&self, s: f64) -> Self {
        Self {
            real: self.real + s,
            vars: Arc::clone(&self.vars),
            dual: self.dual.clone(),
            dual2: self.dual2.clone(),
        }
    }

    /// Partial derivatives for the requested labels, zero where absent.
    pub fn gradient(&self, vars: &[&str]) -> Vec<f64> {
        vars.iter()
            .map(|var| self.vars.get_index_of(*var).map_or(0.0, |i| self.dual[i]))
            .collect()
    }

    /// Hessian restricted to the requested labels, zero where absent.
    pub fn gradient2(&self, vars: &[&str]) -> Vec<Vec<f64>> {
        let idx: Vec<Option<usize>> = vars.iter().map(|v| self.vars.get_index_of(*v)).collect();
        idx.iter()
            .map(|r| {
                idx.iter()
                    .map(|c| match (r, c) {
                        (Some(r), Some(c)) => self.dual2[[*r, *c]],
                        _ => 0.0,
                    })
                    .collect()
            })
            .collect()
    }
}

impl PartialEq for Dual2 {
    /// Equal values with identical derivatives once labels are aligned.
    fn eq(&self, other: &Dual2) -> bool {
        if self.real != other.real || self.vars.len() != other.vars.len() {
            return false;
        }
        if same_vars(&self.vars, &other.vars) {
            return self.dual == other.dual && self.dual2 == other.dual2;
        }
        if !self.vars.is_subset(&other.vars) {
            return false;
        }
        let o = other.to_vars(&self.vars);
        o.dual == self.dual && o.dual2 == self.dual2
    }
}

impl Add for &Dual2 {
    type Output = Dual2;

    fn add(self, rhs: &Dual2) -> Dual2 {
        let (a, b) = self.aligned(rhs);
        Dual2 {
            real: a.real + b.real,
            dual: a.dual + b.dual,
            dual2: a.dual2 + b.dual2,
            vars: a.vars,
        }
    }
}

impl Sub for &Dual2 {
    type Output = Dual2;

    fn sub(self, rhs: &Dual2) -> Dual2 {
        let (a, b) = self.aligned(rhs);
        Dual2 {
            real: a.real - b.real,
            dual: a.dual - b.dual,
            dual2: a.dual2 - b.dual2,
            vars: a.vars,
        }
    }
}

impl Mul for &Dual2 {
    type Output = Dual2;

    /// `H = Ha b + Hb a + ga gb^T + gb ga^T`.
    fn mul(self, rhs: &Dual2) -> Dual2 {
        let (a, b) = self.aligned(rhs);
        let dual = &a.dual * b.real + &b.dual * a.real;
        let dual2 = &a.dual2 * b.real + &b.dual2 * a.real + sym_outer(&a.dual, &b.dual);
        Dual2 {
            real: a.real * b.real,
            vars: a.vars,
            dual,
            dual2,
        }
    }
}

impl Neg for &Dual2 {
    type Output = Dual2;

    fn neg(self) -> Dual2 {
        self.scale(-1.0)
    }
}

impl fmt::Display for Dual2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<&str> = self.vars.iter().map(String::as_str).collect();
        write!(
            f,
            "<Dual2: {:.6}, ({}), {}, {}>",
            self.real,
            labels.join(", "),
            self.dual,
            self.dual2
        )
    }
}

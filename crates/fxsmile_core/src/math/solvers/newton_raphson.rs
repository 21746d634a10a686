//! Newton-Raphson root-finding solver.

use tracing::trace;

use super::SolverConfig;
use crate::types::{Number, SolverError};

/// Below this the Newton step is considered undefined.
const DERIVATIVE_EPSILON: f64 = 1e-30;

/// Newton-Raphson root finder.
///
/// Iterates `x_{n+1} = x_n - f(x_n) / f'(x_n)` in plain `f64` until the step
/// falls under the configured tolerance. Sensitivities of the root to
/// parameters inside `f` are recovered afterwards with a single
/// [`refine`](NewtonRaphsonSolver::refine) step in [`Number`] arithmetic,
/// which is the implicit function theorem applied at the root.
///
/// # Example
///
/// ```
/// use fxsmile_core::math::solvers::{NewtonRaphsonSolver, SolverConfig};
///
/// // Solve x² - 2 = 0 (find √2)
/// let solver = NewtonRaphsonSolver::new(SolverConfig::default());
///
/// let f = |x: f64| x * x - 2.0;
/// let f_prime = |x: f64| 2.0 * x;
///
/// let root = solver.find_root(f, f_prime, 1.0).unwrap();
/// assert!((root - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct NewtonRaphsonSolver {
    config: SolverConfig,
}

impl NewtonRaphsonSolver {
    /// Create a new Newton-Raphson solver with the given configuration.
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Solver configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Find a root of `f` using explicit derivative `f_prime`.
    ///
    /// # Returns
    ///
    /// * `Ok(x)` - Iterate whose Newton step fell below tolerance
    /// * `Err(SolverError::MaxIterationsExceeded)` - Failed to converge
    /// * `Err(SolverError::DerivativeNearZero)` - Derivative too small
    pub fn find_root<F, G>(&self, f: F, f_prime: G, x0: f64) -> Result<f64, SolverError>
    where
        F: Fn(f64) -> f64,
        G: Fn(f64) -> f64,
    {
        self.find_root_with(|x| Ok::<_, SolverError>((f(x), f_prime(x))), x0)
    }

    /// Find a root of a fallible function returning `(f(x), f'(x))`.
    ///
    /// Errors raised by `eval` are passed through unchanged; solver failures
    /// are converted into the caller's error type.
    ///
    /// # Example
    ///
    /// ```
    /// use fxsmile_core::math::solvers::NewtonRaphsonSolver;
    /// use fxsmile_core::types::SolverError;
    ///
    /// let solver = NewtonRaphsonSolver::with_defaults();
    /// let root = solver
    ///     .find_root_with(|x| Ok::<_, SolverError>((x.exp() - 2.0, x.exp())), 0.5)
    ///     .unwrap();
    /// assert!((root - 2.0_f64.ln()).abs() < 1e-10);
    /// ```
    pub fn find_root_with<F, E>(&self, mut eval: F, x0: f64) -> Result<f64, E>
    where
        F: FnMut(f64) -> Result<(f64, f64), E>,
        E: From<SolverError>,
    {
        let mut x = x0;

        for iteration in 0..self.config.max_iterations {
            let (f_val, f_prime_val) = eval(x)?;

            if f_prime_val.abs() < DERIVATIVE_EPSILON {
                return Err(SolverError::DerivativeNearZero { x }.into());
            }

            let x_next = x - f_val / f_prime_val;

            if !x_next.is_finite() {
                return Err(SolverError::NumericalInstability(
                    "Newton iteration produced non-finite value".to_string(),
                )
                .into());
            }

            if (x_next - x).abs() < self.config.tolerance {
                trace!(iteration, root = x_next, "newton converged");
                return Ok(x_next);
            }
            x = x_next;
        }

        Err(SolverError::MaxIterationsExceeded {
            iterations: self.config.max_iterations,
        }
        .into())
    }

    /// One Newton step from a converged `root` in [`Number`] arithmetic.
    ///
    /// `eval` returns `(f(root), f'(root))` carrying sensitivities to the
    /// parameters of `f`. The result has value `root - f/f'` and gradient
    /// `-(df/dp) / (df/dx)`.
    pub fn refine<F, E>(&self, eval: F, root: f64) -> Result<Number, E>
    where
        F: FnOnce(f64) -> Result<(Number, Number), E>,
        E: From<SolverError>,
    {
        let (f_val, f_prime_val) = eval(root)?;
        if f_prime_val.real().abs() < DERIVATIVE_EPSILON {
            return Err(SolverError::DerivativeNearZero { x: root }.into());
        }
        Ok(root - f_val / f_prime_val)
    }
}

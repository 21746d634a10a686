//! Dense LU factorisation for small spline collocation systems.
//!
//! The matrix is always plain `f64` (knot geometry carries no sensitivities);
//! the right-hand side may be any [`Number`], so derivatives of the data flow
//! linearly into the solution.

use num_traits::Zero;

use crate::types::{InterpolationError, Number};

/// Pivots with magnitude below this are treated as singular.
const SINGULAR_PIVOT: f64 = 1e-14;

/// `PA = LU` with partial pivoting, stored compactly.
///
/// `L` has an implicit unit diagonal and shares storage with `U`.
#[derive(Debug, Clone)]
pub struct LuFactors {
    lu: Vec<Vec<f64>>,
    perm: Vec<usize>,
}

impl LuFactors {
    /// Factorises a square matrix given as rows.
    ///
    /// # Errors
    /// - `InvalidInput` if the matrix is empty or not square
    /// - `SingularSystem` if a pivot falls below tolerance
    pub fn factorise(matrix: &[Vec<f64>]) -> Result<Self, InterpolationError> {
        let n = matrix.len();
        if n == 0 || matrix.iter().any(|row| row.len() != n) {
            return Err(InterpolationError::InvalidInput(
                "collocation matrix must be square and non-empty".to_string(),
            ));
        }

        let mut lu = matrix.to_vec();
        let mut perm: Vec<usize> = (0..n).collect();

        for k in 0..n {
            let mut max_row = k;
            for i in k + 1..n {
                if lu[i][k].abs() > lu[max_row][k].abs() {
                    max_row = i;
                }
            }
            lu.swap(k, max_row);
            perm.swap(k, max_row);

            let pivot = lu[k][k];
            if pivot.abs() < SINGULAR_PIVOT {
                return Err(InterpolationError::SingularSystem { pivot: k });
            }

            for i in k + 1..n {
                let factor = lu[i][k] / pivot;
                lu[i][k] = factor;
                for j in k + 1..n {
                    lu[i][j] -= factor * lu[k][j];
                }
            }
        }

        Ok(Self { lu, perm })
    }

    /// Dimension of the system.
    pub fn dim(&self) -> usize {
        self.perm.len()
    }

    /// Solves `A x = b` for a [`Number`] right-hand side.
    ///
    /// # Errors
    /// `InvalidInput` if `rhs` has the wrong length.
    pub fn solve(&self, rhs: &[Number]) -> Result<Vec<Number>, InterpolationError> {
        let n = self.dim();
        if rhs.len() != n {
            return Err(InterpolationError::InvalidInput(format!(
                "right-hand side has {} entries, expected {}",
                rhs.len(),
                n
            )));
        }

        // Forward substitution with the row permutation
        let mut y: Vec<Number> = Vec::with_capacity(n);
        for i in 0..n {
            let mut acc = rhs[self.perm[i]].clone();
            for (j, yj) in y.iter().enumerate() {
                let l = self.lu[i][j];
                if l != 0.0 {
                    acc = acc - yj * l;
                }
            }
            y.push(acc);
        }

        // Back substitution
        let mut x = vec![Number::zero(); n];
        for i in (0..n).rev() {
            let mut acc = y[i].clone();
            for j in i + 1..n {
                let u = self.lu[i][j];
                if u != 0.0 {
                    acc = acc - &x[j] * u;
                }
            }
            x[i] = acc / self.lu[i][i];
        }
        Ok(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AdOrder;
    use approx::assert_relative_eq;

    fn floats(xs: &[f64]) -> Vec<Number> {
        xs.iter().map(|x| Number::Float(*x)).collect()
    }

    #[test]
    fn test_solve_requires_pivoting() {
        // Zero leading entry forces a row swap
        let a = vec![vec![0.0, 1.0], vec![2.0, 3.0]];
        let lu = LuFactors::factorise(&a).unwrap();
        let x = lu.solve(&floats(&[1.0, 8.0])).unwrap();
        assert_relative_eq!(x[0].real(), 2.5, epsilon = 1e-14);
        assert_relative_eq!(x[1].real(), 1.0, epsilon = 1e-14);
    }

    #[test]
    fn test_solve_3x3() {
        let a = vec![
            vec![4.0, -2.0, 1.0],
            vec![-2.0, 4.0, -2.0],
            vec![1.0, -2.0, 4.0],
        ];
        let b = [11.0, -16.0, 17.0];
        let lu = LuFactors::factorise(&a).unwrap();
        let x = lu.solve(&floats(&b)).unwrap();
        for (row, bi) in a.iter().zip(b) {
            let ax: f64 = row.iter().zip(&x).map(|(aij, xj)| aij * xj.real()).sum();
            assert_relative_eq!(ax, bi, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_singular_matrix_rejected() {
        let a = vec![vec![1.0, 2.0], vec![2.0, 4.0]];
        let err = LuFactors::factorise(&a).unwrap_err();
        assert!(matches!(err, InterpolationError::SingularSystem { pivot: 1 }));
    }

    #[test]
    fn test_non_square_rejected() {
        let a = vec![vec![1.0, 2.0], vec![2.0]];
        assert!(matches!(
            LuFactors::factorise(&a),
            Err(InterpolationError::InvalidInput(_))
        ));
        assert!(LuFactors::factorise(&[]).is_err());
    }

    #[test]
    fn test_rhs_sensitivities_are_linear() {
        // x = A^-1 b so dx/db = A^-1
        let a = vec![vec![2.0, 1.0], vec![1.0, 3.0]];
        let lu = LuFactors::factorise(&a).unwrap();
        let b = vec![
            Number::variable(1.0, "b0", AdOrder::One),
            Number::variable(2.0, "b1", AdOrder::One),
        ];
        let x = lu.solve(&b).unwrap();
        // A^-1 = 1/5 [[3, -1], [-1, 2]]
        let g0 = x[0].gradient(&["b0", "b1"]);
        let g1 = x[1].gradient(&["b0", "b1"]);
        assert_relative_eq!(g0[0], 0.6, epsilon = 1e-14);
        assert_relative_eq!(g0[1], -0.2, epsilon = 1e-14);
        assert_relative_eq!(g1[0], -0.2, epsilon = 1e-14);
        assert_relative_eq!(g1[1], 0.4, epsilon = 1e-14);
    }

    #[test]
    fn test_rhs_length_checked() {
        let lu = LuFactors::factorise(&[vec![1.0]]).unwrap();
        assert!(lu.solve(&floats(&[1.0, 2.0])).is_err());
    }
}

// src/solver.rs
//
// Exact polynomial interpolation through a Vandermonde-style linear system.
//
// Row i of the augmented matrix is [x_i^d, x_i^(d-1), ..., x_i, 1 | y_i].
// Forward elimination is fraction-free (Bareiss): every intermediate entry
// is a minor of the original matrix, so each division is exact and no
// rational arithmetic is needed until the very end. Partial pivoting picks
// the largest magnitude in the pivot column (first row on ties); in exact
// arithmetic it only decides which zero pivots are avoided.

use log::{debug, trace};
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

use crate::error::{Error, Result};
use crate::types::Point;

type Matrix = Vec<Vec<BigInt>>;

/// Coefficients of the interpolating polynomial as exact fractions
/// `scaled[i] / denominator`. Index 0 is the highest-degree coefficient,
/// the last index is the constant term.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Interpolant {
    scaled: Vec<BigInt>,
    denominator: BigInt,
}

impl Interpolant {
    pub fn degree(&self) -> usize {
        self.scaled.len() - 1
    }

    /// Common denominator, always positive.
    pub fn denominator(&self) -> &BigInt {
        &self.denominator
    }

    /// Coefficient `i` as a reduced fraction `(numerator, denominator)`.
    pub fn coefficient(&self, i: usize) -> (BigInt, BigInt) {
        // denominator > 0, so g > 0
        let g = self.scaled[i].gcd(&self.denominator);
        (&self.scaled[i] / &g, &self.denominator / &g)
    }

    /// Coefficient `i`, failing if it is not an integer.
    pub fn integer_coefficient(&self, i: usize) -> Result<BigInt> {
        let (q, r) = self.scaled[i].div_rem(&self.denominator);
        if !r.is_zero() {
            let (numerator, denominator) = self.coefficient(i);
            return Err(Error::NonIntegerResult {
                numerator: numerator.to_string(),
                denominator: denominator.to_string(),
            });
        }
        Ok(q)
    }

    /// The polynomial's value at zero.
    pub fn constant_term(&self) -> Result<BigInt> {
        self.integer_coefficient(self.degree())
    }

    /// Whether `point` lies on the polynomial (evaluated exactly).
    pub fn fits(&self, point: &Point) -> bool {
        let x = BigInt::from(point.x);
        let mut acc = BigInt::zero();
        for c in &self.scaled {
            acc = acc * &x + c;
        }
        acc == &self.denominator * &point.y
    }
}

/// Augmented k x (k+1) matrix; column j of row i holds x_i^(degree - j).
fn build_matrix(points: &[Point], degree: usize) -> Matrix {
    points
        .iter()
        .map(|p| {
            let x = BigInt::from(p.x);
            let mut row: Vec<BigInt> =
                (0..=degree).map(|j| num_traits::pow(x.clone(), degree - j)).collect();
            row.push(p.y.clone());
            row
        })
        .collect()
}

/// Fraction-free forward elimination with partial pivoting. Leaves `m`
/// upper triangular; the last diagonal entry is ±det of the original system.
fn eliminate(m: &mut Matrix) -> Result<()> {
    let k = m.len();
    let mut prev = BigInt::one();

    for i in 0..k {
        let mut max_row = i;
        for r in i + 1..k {
            if m[r][i].magnitude() > m[max_row][i].magnitude() {
                max_row = r;
            }
        }
        if max_row != i {
            trace!(target: "solver", "column {}: swap rows {} and {}", i, i, max_row);
            m.swap(i, max_row);
        }

        if m[i][i].is_zero() {
            return Err(Error::SingularMatrix(i));
        }

        let (upper, lower) = m.split_at_mut(i + 1);
        let pivot_row = &upper[i];
        for row in lower.iter_mut() {
            for c in i + 1..=k {
                let v = (&pivot_row[i] * &row[c] - &row[i] * &pivot_row[c]) / &prev;
                row[c] = v;
            }
            row[i] = BigInt::zero();
        }
        prev = m[i][i].clone();
    }

    Ok(())
}

/// Back-substitution on the triangular system, scaled by the final pivot so
/// every step stays integral.
fn back_substitute(m: &Matrix) -> Interpolant {
    let k = m.len();
    let det = m[k - 1][k - 1].clone();
    let mut scaled = vec![BigInt::zero(); k];

    for i in (0..k).rev() {
        let mut sum = &m[i][k] * &det;
        for j in i + 1..k {
            sum -= &m[i][j] * &scaled[j];
        }
        scaled[i] = sum / &m[i][i];
    }

    let mut denominator = det;
    if denominator.is_negative() {
        denominator = -denominator;
        for s in scaled.iter_mut() {
            *s = -&*s;
        }
    }

    Interpolant { scaled, denominator }
}

/// Solve for every coefficient of the degree-`degree` polynomial through
/// `points`. Exactly `degree + 1` points with distinct x are required.
pub fn solve_coefficients(points: &[Point], degree: usize) -> Result<Interpolant> {
    let expected = degree + 1;
    if points.len() != expected {
        return Err(Error::PointCountMismatch { expected, got: points.len() });
    }

    let mut m = build_matrix(points, degree);
    eliminate(&mut m)?;
    let ip = back_substitute(&m);

    debug!(
        target: "solver",
        "degree {} solved, common denominator has {} bits",
        degree,
        ip.denominator.bits()
    );
    Ok(ip)
}

/// The secret: constant term of the degree-`degree` polynomial through `points`.
pub fn solve_constant_term(points: &[Point], degree: usize) -> Result<BigInt> {
    solve_coefficients(points, degree)?.constant_term()
}

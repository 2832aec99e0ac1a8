use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

use crate::error::{Error, Result};
use crate::types::Point;

fn reduce(num: BigInt, den: BigInt) -> (BigInt, BigInt) {
    let g = num.gcd(&den);
    let (mut num, mut den) = (num / &g, den / &g);
    if den.is_negative() {
        num = -num;
        den = -den;
    }
    (num, den)
}

/// Lagrange coefficient L_{i,xs}(0) = Π_{k∈xs\{i}} k/(k-i), as a reduced
/// fraction (numerator, denominator) with a positive denominator.
pub fn lagrange_coeff(i: u64, xs: &[u64]) -> (BigInt, BigInt) {
    let i_b = BigInt::from(i);
    let mut num = BigInt::one();
    let mut den = BigInt::one();
    for &k in xs {
        if k == i {
            continue;
        }
        let k_b = BigInt::from(k);
        num *= &k_b;
        den *= k_b - &i_b;
    }
    reduce(num, den)
}

/// Secret = Σ y_i · L_i(0), summed exactly. Every x must be distinct.
pub fn interpolate_at_zero(points: &[Point]) -> Result<BigInt> {
    let mut xs: Vec<u64> = points.iter().map(|p| p.x).collect();
    xs.sort_unstable();
    if let Some(w) = xs.windows(2).find(|w| w[0] == w[1]) {
        return Err(Error::DuplicateShareIndex(w[0]));
    }

    let mut acc_num = BigInt::zero();
    let mut acc_den = BigInt::one();
    for p in points {
        let (l_num, l_den) = lagrange_coeff(p.x, &xs);
        // acc + y·l_num/l_den
        let num = &acc_num * &l_den + &p.y * &l_num * &acc_den;
        (acc_num, acc_den) = reduce(num, acc_den * l_den);
    }

    if !acc_den.is_one() {
        return Err(Error::NonIntegerResult {
            numerator: acc_num.to_string(),
            denominator: acc_den.to_string(),
        });
    }
    Ok(acc_num)
}

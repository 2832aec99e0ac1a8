use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use log::{debug, info, warn};
use num_bigint::BigInt;

use crate::codec::RoundTrip;
use crate::error::{Error, Result};
use crate::shamir::interpolate_at_zero;
use crate::solver::{solve_coefficients, Interpolant};
use crate::types::{Point, ShareEntry, ShareRecord, Threshold};

/// How the secret is computed from the selected points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Method {
    /// Solve the full Vandermonde system and take the constant term.
    #[default]
    Elimination,
    /// Evaluate the Lagrange form at zero.
    Lagrange,
}

impl Method {
    pub fn name(&self) -> &'static str {
        match self {
            Method::Elimination => "elimination",
            Method::Lagrange => "lagrange",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "elimination" | "gauss" => Ok(Method::Elimination),
            "lagrange" => Ok(Method::Lagrange),
            other => Err(format!("unknown method {:?}", other)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReconstructOptions {
    pub method: Method,
    /// Abort on a round-trip mismatch instead of only reporting it.
    pub strict: bool,
    /// Test shares beyond the first k against the recovered polynomial.
    pub check_spares: bool,
}

impl Default for ReconstructOptions {
    fn default() -> Self {
        Self { method: Method::Elimination, strict: false, check_spares: true }
    }
}

/// Round-trip status of one share used for reconstruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Validation {
    pub x: u64,
    pub base: u32,
    pub round_trip: RoundTrip,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpareStatus {
    Consistent,
    Inconsistent,
    Undecodable(String),
}

/// A share that was not needed for reconstruction, checked against the result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpareCheck {
    pub x: u64,
    pub status: SpareStatus,
}

#[derive(Clone, Debug)]
pub struct Reconstruction {
    pub secret: BigInt,
    pub threshold: Threshold,
    pub points: Vec<Point>,
    pub validations: Vec<Validation>,
    pub spares: Vec<SpareCheck>,
}

impl Reconstruction {
    pub fn all_valid(&self) -> bool {
        self.validations.iter().all(|v| v.round_trip.is_consistent())
    }

    pub fn inconsistent_spares(&self) -> Vec<u64> {
        self.spares
            .iter()
            .filter(|s| s.status != SpareStatus::Consistent)
            .map(|s| s.x)
            .collect()
    }
}

fn decode_share(x: u64, entry: &ShareEntry, strict: bool) -> Result<(Point, Validation)> {
    let base = entry.base()?;
    let (y, round_trip) = entry.decode()?;

    if round_trip.is_consistent() {
        info!(target: "protocol", "Key {} is correct", x);
    } else {
        warn!(target: "protocol", "Key {} is WRONG", x);
        warn!(target: "protocol", "  Original value: {}", round_trip.original);
        warn!(target: "protocol", "  Decoded and re-encoded: {}", round_trip.reencoded);
        if strict {
            return Err(Error::RoundTripMismatch(x));
        }
    }

    Ok((Point::new(x, y), Validation { x, base, round_trip }))
}

fn check_spares(ip: &Interpolant, spares: &[(u64, &ShareEntry)]) -> Vec<SpareCheck> {
    spares
        .iter()
        .map(|&(x, entry)| {
            let status = match entry.decode().map(|(y, _)| Point::new(x, y)) {
                Ok(point) if ip.fits(&point) => SpareStatus::Consistent,
                Ok(_) => {
                    warn!(target: "protocol", "Share {} does not lie on the recovered polynomial", x);
                    SpareStatus::Inconsistent
                }
                Err(e) => {
                    warn!(target: "protocol", "Share {} could not be decoded: {}", x, e);
                    SpareStatus::Undecodable(e.to_string())
                }
            };
            SpareCheck { x, status }
        })
        .collect()
}

/// Reconstruct the secret from the `k` shares with the smallest indices.
///
/// Decode errors on those shares and singular systems abort the call.
/// Round-trip mismatches only abort in strict mode; spare shares never do.
pub fn reconstruct(record: &ShareRecord, opts: &ReconstructOptions) -> Result<Reconstruction> {
    let threshold = record.keys;
    let k = threshold.k;
    if k == 0 {
        return Err(Error::InvalidThreshold(k));
    }

    let shares = record.indexed_shares()?;
    if shares.len() < k {
        return Err(Error::InsufficientShares { k, available: shares.len() });
    }
    if threshold.n != shares.len() {
        debug!(target: "protocol", "n = {} but {} shares present", threshold.n, shares.len());
    }

    let (selected, spare) = shares.split_at(k);
    let mut points = Vec::with_capacity(k);
    let mut validations = Vec::with_capacity(k);
    for &(x, entry) in selected {
        let (point, validation) = decode_share(x, entry, opts.strict)?;
        points.push(point);
        validations.push(validation);
    }

    let degree = k - 1;
    let start = Instant::now();
    let (secret, interpolant) = match opts.method {
        Method::Elimination => {
            let ip = solve_coefficients(&points, degree)?;
            (ip.constant_term()?, Some(ip))
        }
        Method::Lagrange => (interpolate_at_zero(&points)?, None),
    };
    debug!(target: "protocol", "{} over {} points took {:?}", opts.method, k, start.elapsed());

    let spares = if opts.check_spares && !spare.is_empty() {
        let ip = match interpolant {
            Some(ip) => ip,
            None => solve_coefficients(&points, degree)?,
        };
        check_spares(&ip, spare)
    } else {
        Vec::new()
    };

    Ok(Reconstruction { secret, threshold, points, validations, spares })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TESTCASE_1: &str = include_str!("../tests/data/testcase1.json");
    const TESTCASE_2: &str = include_str!("../tests/data/testcase2.json");

    #[test]
    fn testcase_1() {
        let rec = ShareRecord::from_json(TESTCASE_1).unwrap();
        let out = reconstruct(&rec, &ReconstructOptions::default()).unwrap();
        assert_eq!(out.secret, BigInt::from(3));
        assert_eq!(out.points.iter().map(|p| p.x).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(out.all_valid());
        assert_eq!(out.spares, vec![SpareCheck { x: 6, status: SpareStatus::Consistent }]);
    }

    #[test]
    fn testcase_2() {
        let rec = ShareRecord::from_json(TESTCASE_2).unwrap();
        let out = reconstruct(&rec, &ReconstructOptions::default()).unwrap();
        assert_eq!(out.secret, BigInt::from(79836264049851u64));
        assert_eq!(out.threshold, Threshold { n: 10, k: 7 });
        assert!(out.all_valid());
        assert_eq!(out.inconsistent_spares(), vec![8]);
    }

    #[test]
    fn lagrange_matches_elimination() {
        let opts = ReconstructOptions { method: Method::Lagrange, ..Default::default() };
        for (json, secret) in [(TESTCASE_1, 3u64), (TESTCASE_2, 79836264049851)] {
            let rec = ShareRecord::from_json(json).unwrap();
            let out = reconstruct(&rec, &opts).unwrap();
            assert_eq!(out.secret, BigInt::from(secret));
        }
    }

    #[test]
    fn mismatch_is_diagnostic_unless_strict() {
        let json = r#"{
            "keys": { "n": 3, "k": 3 },
            "1": { "base": "10", "value": "4" },
            "2": { "base": "2", "value": "0111" },
            "3": { "base": "10", "value": "12" }
        }"#;
        let rec = ShareRecord::from_json(json).unwrap();

        let out = reconstruct(&rec, &ReconstructOptions::default()).unwrap();
        assert_eq!(out.secret, BigInt::from(3));
        assert!(!out.all_valid());
        assert!(!out.validations[1].round_trip.is_consistent());

        let strict = ReconstructOptions { strict: true, ..Default::default() };
        assert!(matches!(reconstruct(&rec, &strict), Err(Error::RoundTripMismatch(2))));
    }

    #[test]
    fn decode_errors_abort() {
        let json = r#"{
            "keys": { "n": 2, "k": 2 },
            "1": { "base": "2", "value": "12" },
            "2": { "base": "10", "value": "7" }
        }"#;
        let rec = ShareRecord::from_json(json).unwrap();
        assert!(matches!(
            reconstruct(&rec, &ReconstructOptions::default()),
            Err(Error::InvalidDigit { ch: '2', .. })
        ));

        let json = r#"{
            "keys": { "n": 1, "k": 1 },
            "1": { "base": "40", "value": "7" }
        }"#;
        let rec = ShareRecord::from_json(json).unwrap();
        assert!(matches!(
            reconstruct(&rec, &ReconstructOptions::default()),
            Err(Error::InvalidBase(40))
        ));
    }

    #[test]
    fn bad_spare_is_reported_not_fatal() {
        let json = r#"{
            "keys": { "n": 4, "k": 3 },
            "1": { "base": "10", "value": "4" },
            "2": { "base": "2", "value": "111" },
            "3": { "base": "10", "value": "12" },
            "6": { "base": "4", "value": "219" }
        }"#;
        let rec = ShareRecord::from_json(json).unwrap();
        let out = reconstruct(&rec, &ReconstructOptions::default()).unwrap();
        assert_eq!(out.secret, BigInt::from(3));
        assert!(matches!(out.spares[0].status, SpareStatus::Undecodable(_)));

        let quiet = ReconstructOptions { check_spares: false, ..Default::default() };
        assert!(reconstruct(&rec, &quiet).unwrap().spares.is_empty());
    }

    #[test]
    fn threshold_errors() {
        let rec = ShareRecord::from_json(r#"{ "keys": { "n": 0, "k": 0 } }"#).unwrap();
        assert!(matches!(
            reconstruct(&rec, &ReconstructOptions::default()),
            Err(Error::InvalidThreshold(0))
        ));

        let mut rec = ShareRecord::from_json(TESTCASE_1).unwrap();
        rec.keys.k = 5;
        assert!(matches!(
            reconstruct(&rec, &ReconstructOptions::default()),
            Err(Error::InsufficientShares { k: 5, available: 4 })
        ));
    }

    #[test]
    fn method_parses() {
        assert_eq!("Lagrange".parse::<Method>().unwrap(), Method::Lagrange);
        assert_eq!("elimination".parse::<Method>().unwrap(), Method::Elimination);
        assert!("newton".parse::<Method>().is_err());
    }
}

use std::collections::BTreeMap;

use num_bigint::{BigInt, BigUint};
use serde::{Deserialize, Serialize};

use crate::codec::{self, RoundTrip};
use crate::error::{Error, Result};

/// One share: `x` is the share index, `y` the decoded share value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Point {
    pub x: u64,
    pub y: BigInt,
}

impl Point {
    pub fn new(x: u64, y: impl Into<BigInt>) -> Self {
        Self { x, y: y.into() }
    }
}

/// `n` is informational, `k` = degree + 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Threshold {
    pub n: usize,
    pub k: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareEntry {
    pub base: String,
    pub value: String,
}

impl ShareEntry {
    pub fn base(&self) -> Result<u32> {
        self.base.trim().parse().map_err(|_| Error::InvalidBaseField(self.base.clone()))
    }

    pub fn decode(&self) -> Result<(BigUint, RoundTrip)> {
        codec::round_trip(&self.value, self.base()?)
    }
}

/// `{"keys": {"n": .., "k": ..}, "1": {"base": "10", "value": "4"}, ...}`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareRecord {
    pub keys: Threshold,
    #[serde(flatten)]
    pub shares: BTreeMap<String, ShareEntry>,
}

impl ShareRecord {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Shares keyed by numeric index, ascending.
    pub fn indexed_shares(&self) -> Result<Vec<(u64, &ShareEntry)>> {
        let mut out = Vec::with_capacity(self.shares.len());
        for (key, entry) in &self.shares {
            let x: u64 =
                key.trim().parse().map_err(|_| Error::InvalidShareIndex(key.clone()))?;
            out.push((x, entry));
        }
        out.sort_by_key(|(x, _)| *x);

        if let Some(w) = out.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(Error::DuplicateShareIndex(w[0].0));
        }
        Ok(out)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordFile {
    One(ShareRecord),
    Many(Vec<ShareRecord>),
}

/// Parse a document holding either a single record or an array of records.
pub fn parse_records(json: &str) -> Result<Vec<ShareRecord>> {
    let file: RecordFile = serde_json::from_str(json)?;
    Ok(match file {
        RecordFile::One(r) => vec![r],
        RecordFile::Many(rs) => rs,
    })
}

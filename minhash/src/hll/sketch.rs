// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! HyperLogLog++ estimator backed by the `hyperloglogplus` crate.

use std::fmt;
use std::hash::BuildHasher;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use hyperloglogplus::HyperLogLog as _;
use hyperloglogplus::HyperLogLogPlus;
use serde::Deserialize;
use serde::Serialize;
use twox_hash::XxHash64;

use crate::codec::SketchBytes;
use crate::codec::SketchSlice;
use crate::codec::assert::insufficient_data;
use crate::error::Error;
use crate::hll::CardinalityEstimator;

const MIN_PRECISION: u8 = 4;
const MAX_PRECISION: u8 = 18;
const HASH_SEED: u64 = 9001;

/// Seeded xxHash64, so a decoded estimator keeps hashing values the same way.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct XxHashBuilder;

impl BuildHasher for XxHashBuilder {
    type Hasher = XxHash64;

    fn build_hasher(&self) -> XxHash64 {
        XxHash64::with_seed(HASH_SEED)
    }
}

type Inner = HyperLogLogPlus<u32, XxHashBuilder>;

/// HyperLogLog++ distinct-count estimator.
///
/// Small cardinalities are counted in the sparse representation, which is exact for a
/// handful of values at the default precision.
pub struct HyperLogLog {
    precision: u8,
    // counting flushes buffered inserts and needs exclusive access
    inner: Mutex<Inner>,
}

impl HyperLogLog {
    /// Creates an empty estimator with `2^precision` registers.
    ///
    /// # Panics
    ///
    /// Panics if `precision` is not in `[4, 18]`.
    pub fn new(precision: u8) -> Self {
        assert!(
            (MIN_PRECISION..=MAX_PRECISION).contains(&precision),
            "precision must be in [{MIN_PRECISION}, {MAX_PRECISION}], got {precision}"
        );
        match HyperLogLogPlus::new(precision, XxHashBuilder) {
            Ok(inner) => Self {
                precision,
                inner: Mutex::new(inner),
            },
            Err(err) => panic!("cannot create estimator with precision {precision}: {err}"),
        }
    }

    /// Returns the precision needed for a standard error of `relative_error`.
    ///
    /// # Panics
    ///
    /// Panics if `relative_error` is not in `(0, 1)`.
    pub fn precision_for(relative_error: f64) -> u8 {
        assert!(
            relative_error > 0.0 && relative_error < 1.0,
            "relative_error must be in (0, 1), got {relative_error}"
        );
        let m = (1.04 / relative_error).powi(2);
        let p = m.log2().ceil() as i64;
        p.clamp(MIN_PRECISION as i64, MAX_PRECISION as i64) as u8
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    /// Folds `other` into this estimator.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigMismatch`] error if the precisions differ.
    ///
    /// [`ConfigMismatch`]: crate::error::ErrorKind::ConfigMismatch
    pub fn merge(&mut self, other: &Self) -> Result<(), Error> {
        if self.precision != other.precision {
            return Err(
                Error::config_mismatch("cannot merge estimators with different precision")
                    .with_context("expected", self.precision)
                    .with_context("actual", other.precision),
            );
        }
        let theirs = other.lock();
        self.inner
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .merge(&*theirs)
            .map_err(|err| Error::config_mismatch(err.to_string()))
    }

    /// Returns the unrounded estimate.
    pub fn estimate(&self) -> f64 {
        self.lock().count()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Encodes the estimator as `[u8 precision][u32 len][len bytes of MessagePack state]`.
    pub(crate) fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let state = rmp_serde::to_vec(&*self.lock())
            .map_err(|err| Error::serialize_failed(format!("cannot encode hll state: {err}")))?;
        let mut out = SketchBytes::with_capacity(1 + 4 + state.len());
        out.write_u8(self.precision);
        out.write_u32_le(state.len() as u32);
        out.write(&state);
        Ok(out.into_bytes())
    }

    pub(crate) fn read_from(cursor: &mut SketchSlice<'_>) -> Result<Self, Error> {
        let precision = cursor
            .read_u8()
            .map_err(insufficient_data("hll_precision"))?;
        if !(MIN_PRECISION..=MAX_PRECISION).contains(&precision) {
            return Err(Error::deserial(format!(
                "hll precision out of range; got {precision}"
            )));
        }
        let len = cursor
            .read_u32_le()
            .map_err(insufficient_data("hll_state_len"))?;
        let state = cursor
            .read_exact(len as usize)
            .map_err(insufficient_data("hll_state"))?;
        let inner: Inner = rmp_serde::from_slice(state)
            .map_err(|err| Error::deserial(format!("invalid hll state: {err}")))?;
        Ok(Self {
            precision,
            inner: Mutex::new(inner),
        })
    }
}

impl Clone for HyperLogLog {
    fn clone(&self) -> Self {
        Self {
            precision: self.precision,
            inner: Mutex::new(self.lock().clone()),
        }
    }
}

impl fmt::Debug for HyperLogLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HyperLogLog")
            .field("precision", &self.precision)
            .finish_non_exhaustive()
    }
}

impl CardinalityEstimator for HyperLogLog {
    fn with_relative_error(relative_error: f64) -> Self {
        Self::new(Self::precision_for(relative_error))
    }

    fn add(&mut self, value: u32) {
        self.inner
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(&value);
    }

    fn cardinality(&self) -> u64 {
        self.estimate().round() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precision_for() {
        assert_eq!(HyperLogLog::precision_for(0.01), 14);
        assert_eq!(HyperLogLog::precision_for(0.05), 9);
        assert_eq!(HyperLogLog::precision_for(0.9), MIN_PRECISION);
        assert_eq!(HyperLogLog::precision_for(0.0001), MAX_PRECISION);
    }

    #[test]
    #[should_panic(expected = "relative_error must be in (0, 1)")]
    fn test_invalid_relative_error() {
        HyperLogLog::with_relative_error(0.0);
    }

    #[test]
    #[should_panic(expected = "precision must be in [4, 18]")]
    fn test_invalid_precision() {
        HyperLogLog::new(19);
    }

    #[test]
    fn test_small_counts_are_exact() {
        let mut hll = HyperLogLog::with_relative_error(0.01);
        assert_eq!(hll.cardinality(), 0);
        hll.add(12);
        assert_eq!(hll.cardinality(), 1);
        hll.add(12);
        assert_eq!(hll.cardinality(), 1);
        hll.add(13);
        hll.add(14);
        assert_eq!(hll.cardinality(), 3);
    }

    #[test]
    fn test_large_count_within_error() {
        let mut hll = HyperLogLog::new(12);
        for i in 0..100_000u32 {
            hll.add(i.wrapping_mul(2_654_435_761));
        }
        let estimate = hll.estimate();
        let error = (estimate - 100_000.0).abs() / 100_000.0;
        assert!(error < 0.06, "estimate {estimate} too far off");
    }

    #[test]
    fn test_merge() {
        let mut left = HyperLogLog::new(10);
        let mut right = HyperLogLog::new(10);
        for i in 0..50u32 {
            left.add(i);
            right.add(i + 25);
        }
        left.merge(&right).unwrap();
        let merged = left.cardinality();
        assert!((70..=80).contains(&merged), "merged estimate {merged}");

        let other = HyperLogLog::new(11);
        assert!(left.merge(&other).is_err());
    }

    #[test]
    fn test_clone_is_independent() {
        let mut hll = HyperLogLog::new(8);
        hll.add(1);
        let snapshot = hll.clone();
        hll.add(2);
        assert_eq!(snapshot.cardinality(), 1);
        assert_eq!(hll.cardinality(), 2);
    }

    #[test]
    fn test_write_then_read() {
        let mut hll = HyperLogLog::new(6);
        for i in 0..40u32 {
            hll.add(i);
        }
        let bytes = hll.to_bytes().unwrap();
        let mut cursor = SketchSlice::new(&bytes);
        let mut restored = HyperLogLog::read_from(&mut cursor).unwrap();
        assert_eq!(cursor.remaining(), 0);
        assert_eq!(restored.precision(), 6);
        assert_eq!(restored.estimate(), hll.estimate());

        // the restored estimator keeps counting the same way
        restored.add(0);
        assert_eq!(restored.estimate(), hll.estimate());
    }

    #[test]
    fn test_read_rejects_bad_input() {
        let bytes = [2u8, 0, 0, 0, 0];
        assert!(HyperLogLog::read_from(&mut SketchSlice::new(&bytes)).is_err());

        let bytes = [6u8, 3, 0, 0, 0, 0xc1, 0xc1, 0xc1];
        assert!(HyperLogLog::read_from(&mut SketchSlice::new(&bytes)).is_err());
    }
}

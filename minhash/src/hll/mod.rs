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

//! Approximate distinct counting used to weight partitions.
//!
//! Partitioned sketches only need two things from a cardinality estimator: feed it the raw
//! 32-bit hash of every element and ask it how many distinct values it has seen. Any type
//! implementing [`CardinalityEstimator`] can be plugged in; [`HyperLogLog`] is the default.
//!
//! # Usage
//!
//! ```rust
//! # use minhash::hll::CardinalityEstimator;
//! # use minhash::hll::HyperLogLog;
//! let mut hll = HyperLogLog::with_relative_error(0.01);
//! for value in 0..1000u32 {
//!     hll.add(value);
//!     hll.add(value);
//! }
//! let estimate = hll.cardinality();
//! assert!((980..=1020).contains(&estimate));
//! ```

mod sketch;

use std::fmt::Debug;

pub use self::sketch::HyperLogLog;

/// Relative error used when none is configured.
pub const DEFAULT_RELATIVE_ERROR: f64 = 0.01;

/// An approximate distinct-count estimator over raw 32-bit hash values.
pub trait CardinalityEstimator: Debug + Clone {
    /// Creates an empty estimator targeting the given relative error.
    fn with_relative_error(relative_error: f64) -> Self;

    /// Adds one raw value.
    fn add(&mut self, value: u32);

    /// Returns the estimated number of distinct values added so far.
    fn cardinality(&self) -> u64;
}

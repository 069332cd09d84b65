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

//! One-permutation hashing with rotation densification (OPHR).
//!
//! A single hash per element is routed to bucket `h mod k`, and each bucket keeps the
//! minimum hash it has received. Buckets that stayed empty would bias the estimator, so
//! on read every empty bucket borrows the value of the nearest non-empty bucket to its right
//! (circularly), offset by `r * distance` where `r = floor(MAX_HASH / k) + 1`.
//!
//! The densified array is computed lazily and cached until the next update changes a
//! bucket. Jaccard similarity is the fraction of positions whose densified values agree.
//!
//! # Usage
//!
//! ```rust
//! # use minhash::JaccardSketch;
//! # use minhash::ophr::OphrSketch;
//! let mut left = OphrSketch::new(128);
//! let mut right = OphrSketch::new(128);
//! for i in 0..1000u32 {
//!     left.update(i.to_le_bytes());
//!     right.update((i + 100).to_le_bytes());
//! }
//! // true Jaccard is 900 / 1100
//! let estimate = left.jaccard(&right).unwrap();
//! assert!(estimate > 0.6 && estimate < 0.95);
//! ```

mod densify;
mod sketch;

pub use self::sketch::OphrSketch;

/// Sentinel held by buckets that have not received a value.
pub const EMPTY_VALUE: u64 = 1 << 32;

/// Largest hash value; also the modulus applied to densified values.
pub const MAX_HASH: u64 = u32::MAX as u64;

/// Serialized images are never shorter than this many bytes.
pub const MIN_SERIALIZED_SIZE: usize = 48;

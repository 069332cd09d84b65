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

//! Partitioned MinHash.
//!
//! Elements are routed to one of `P` partitions by `hash mod P`. Each partition holds an
//! inner sketch (bottom-k or OPHR) and a [`CardinalityEstimator`] fed with the same hash
//! values. The overall Jaccard estimate is a weighted sum of the per-partition estimates:
//!
//! * [`Weighting::Cardinality`] weights partition `i` by `(|A_i| / |A| + |B_i| / |B|) / 2`.
//! * [`Weighting::UnionSize`] weights partition `i` by its estimated union size
//!   `max + (min - J_i * max) / (J_i + 1)` over the sum of those sizes.
//!
//! Two empty sketches yield 1.
//!
//! # Usage
//!
//! ```rust
//! # use minhash::partition::PartitionedSketch;
//! # use minhash::partition::Weighting;
//! let mut left = PartitionedSketch::builder().num_perm(64).build();
//! let mut right = PartitionedSketch::builder().num_perm(64).build();
//! for i in 0..100u32 {
//!     left.update(i.to_le_bytes());
//!     right.update(i.to_le_bytes());
//! }
//! assert!((left.jaccard(&right).unwrap() - 1.0).abs() < 1e-9);
//!
//! let weighted = PartitionedSketch::builder()
//!     .weighting(Weighting::UnionSize)
//!     .build();
//! assert!(weighted.is_empty());
//! ```
//!
//! [`CardinalityEstimator`]: crate::hll::CardinalityEstimator

mod inner;
mod part;
mod serialization;
mod sketch;

pub use self::inner::InnerKind;
pub use self::inner::InnerSketch;
pub use self::part::Partition;
pub use self::sketch::DEFAULT_NUM_PARTITIONS;
pub use self::sketch::PartitionedSketch;
pub use self::sketch::PartitionedSketchBuilder;
pub use self::sketch::Weighting;

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

//! MinHash sketches for estimating Jaccard similarity between large sets.
//!
//! This crate provides three sketch families over 32-bit element hashes:
//!
//! * [`minheap::MinHeapSketch`]: bottom-k MinHash keeping the `k` smallest distinct hashes.
//! * [`ophr::OphrSketch`]: one-permutation hashing with rotation densification.
//! * [`partition::PartitionedSketch`]: hash-partitioned sketches combined by cardinality or
//!   union-size weighting, each partition paired with a [`hll::HyperLogLog`] estimator.
//!
//! Elements are turned into hashes by a named [`digest::DigestAdapter`]. All sketches have a
//! compact little-endian binary image that records the adapter name, and decoding resolves it
//! through a [`digest::DigestRegistry`].
//!
//! # Examples
//!
//! ```rust
//! use minhash::JaccardSketch;
//! use minhash::ophr::OphrSketch;
//!
//! let mut left = OphrSketch::new(128);
//! let mut right = OphrSketch::new(128);
//! for i in 0..1000u32 {
//!     left.update(i.to_le_bytes());
//! }
//! for i in 500..1500u32 {
//!     right.update(i.to_le_bytes());
//! }
//! let estimate = left.jaccard(&right).unwrap();
//! assert!((estimate - 1.0 / 3.0).abs() < 0.15);
//! ```

pub mod common;
pub mod digest;
pub mod error;
pub mod hll;
pub mod minheap;
pub mod ophr;
pub mod partition;

mod codec;

pub use self::common::JaccardSketch;

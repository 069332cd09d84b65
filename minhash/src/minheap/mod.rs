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

//! Bottom-k MinHash backed by a bounded max-heap.
//!
//! The sketch keeps the `k` smallest distinct 32-bit hash values of a stream. Similarity is
//! estimated as the number of shared retained values over `min(k, max(|S1|, |S2|))`.
//!
//! Shared values are counted over both retained sets, not over the `k` smallest values of
//! their union. Once both sketches are full the estimate therefore tends towards
//! `|A ∩ B| / |A|` for sets of equal size, which exceeds the Jaccard index whenever the sets
//! differ. Streams with fewer than `k` distinct elements are retained in full.
//!
//! # Usage
//!
//! ```rust
//! # use minhash::JaccardSketch;
//! # use minhash::minheap::MinHeapSketch;
//! let mut left = MinHeapSketch::new(64);
//! let mut right = MinHeapSketch::new(64);
//! for word in ["a", "b", "c", "d"] {
//!     left.update(word);
//!     right.update(word);
//! }
//! right.update("e");
//! assert!(left.jaccard(&right).unwrap() > 0.7);
//! ```
//!
//! # Serialization
//!
//! ```rust
//! # use minhash::JaccardSketch;
//! # use minhash::digest::DigestRegistry;
//! # use minhash::minheap::MinHeapSketch;
//! let mut sketch = MinHeapSketch::new(16);
//! sketch.update("10");
//! let bytes = sketch.serialize();
//! let decoded = MinHeapSketch::deserialize(&bytes, &DigestRegistry::with_defaults()).unwrap();
//! assert_eq!(decoded, sketch);
//! ```

mod max_set;
mod sketch;

pub use self::max_set::BoundedUniqueMaxSet;
pub use self::sketch::MinHeapSketch;

/// Sentinel reported for unused slots and padded into serialized images.
pub const EMPTY_VALUE: u32 = u32::MAX;

/// Largest hash value the sketch retains; larger digests are clamped to it.
pub const MAX_HASH: u32 = u32::MAX - 1;

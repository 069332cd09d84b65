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

use std::fmt;

use crate::common::DEFAULT_NUM_PERM;
use crate::common::ensure_same_digest;
use crate::common::ensure_same_num_perm;
use crate::digest::SharedDigest;
use crate::digest::default_digest;
use crate::error::Error;
use crate::hll::CardinalityEstimator;
use crate::hll::DEFAULT_RELATIVE_ERROR;
use crate::hll::HyperLogLog;
use crate::partition::InnerKind;
use crate::partition::InnerSketch;
use crate::partition::Partition;

/// Number of partitions used when none is configured.
pub const DEFAULT_NUM_PARTITIONS: usize = 3;

/// How per-partition Jaccard estimates are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Weighting {
    /// Weight each partition by its share of the estimated cardinality on each side,
    /// averaged over the two sides.
    #[default]
    Cardinality,
    /// Weight each partition by its estimated union size.
    ///
    /// The union size of a partition is derived from its two cardinalities and its Jaccard
    /// estimate, which corrects for skew when the smaller side is nearly a subset of the
    /// larger one.
    UnionSize,
}

impl Weighting {
    pub(crate) fn to_byte(self) -> u8 {
        match self {
            Weighting::Cardinality => 0,
            Weighting::UnionSize => 1,
        }
    }

    pub(crate) fn from_byte(byte: u8) -> Result<Self, Error> {
        match byte {
            0 => Ok(Weighting::Cardinality),
            1 => Ok(Weighting::UnionSize),
            _ => Err(Error::deserial(format!("unknown weighting {byte}"))),
        }
    }
}

/// A sketch that routes each element to one of `P` partitions by `hash mod P`.
///
/// Each partition owns an inner sketch and a cardinality estimator fed with the same hash
/// values. See [`crate::partition`] for how estimates are combined.
#[derive(Clone)]
pub struct PartitionedSketch<C = HyperLogLog> {
    num_perm: usize,
    digest: SharedDigest,
    inner_kind: InnerKind,
    weighting: Weighting,
    partitions: Vec<Partition<C>>,
}

impl PartitionedSketch<HyperLogLog> {
    /// Creates a new builder for PartitionedSketch
    pub fn builder() -> PartitionedSketchBuilder {
        PartitionedSketchBuilder::default()
    }
}

impl<C: CardinalityEstimator> PartitionedSketch<C> {
    pub(crate) fn from_parts(
        num_perm: usize,
        digest: SharedDigest,
        inner_kind: InnerKind,
        weighting: Weighting,
        partitions: Vec<Partition<C>>,
    ) -> Self {
        Self {
            num_perm,
            digest,
            inner_kind,
            weighting,
            partitions,
        }
    }

    /// Digests `data` and routes the hash value to its partition.
    pub fn update(&mut self, data: impl AsRef<[u8]>) {
        let hash = self.digest.hash32(data.as_ref());
        self.update_hash(hash);
    }

    /// Routes an already digested hash value to partition `hash mod P`.
    pub fn update_hash(&mut self, hash: u32) {
        let index = hash as usize % self.partitions.len();
        self.partitions[index].update(hash);
    }

    /// Returns true if every partition is empty.
    pub fn is_empty(&self) -> bool {
        self.partitions.iter().all(Partition::is_empty)
    }

    /// Returns `k`, the number of hash values of each inner sketch.
    pub fn num_perm(&self) -> usize {
        self.num_perm
    }

    pub fn num_partitions(&self) -> usize {
        self.partitions.len()
    }

    pub fn partitions(&self) -> &[Partition<C>] {
        &self.partitions
    }

    pub fn inner_kind(&self) -> InnerKind {
        self.inner_kind
    }

    pub fn weighting(&self) -> Weighting {
        self.weighting
    }

    pub fn digest(&self) -> &SharedDigest {
        &self.digest
    }

    /// Returns the sum of the per-partition cardinality estimates.
    pub fn cardinality(&self) -> u64 {
        self.partitions.iter().map(Partition::cardinality).sum()
    }

    /// Estimates the Jaccard similarity between `self` and `other`.
    ///
    /// Two empty sketches are identical and yield 1.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigMismatch`] error if `k`, the partition count, the inner sketch
    /// variant, the weighting or the digest differ.
    ///
    /// [`ConfigMismatch`]: crate::error::ErrorKind::ConfigMismatch
    pub fn jaccard(&self, other: &Self) -> Result<f64, Error> {
        self.ensure_comparable(other)?;
        match self.weighting {
            Weighting::Cardinality => self.cardinality_weighted_jaccard(other),
            Weighting::UnionSize => self.union_weighted_jaccard(other),
        }
    }

    fn ensure_comparable(&self, other: &Self) -> Result<(), Error> {
        ensure_same_num_perm(self.num_perm, other.num_perm)?;
        if self.partitions.len() != other.partitions.len() {
            return Err(Error::config_mismatch(
                "cannot compare sketches with different numbers of partitions",
            )
            .with_context("expected", self.partitions.len())
            .with_context("actual", other.partitions.len()));
        }
        if self.inner_kind != other.inner_kind || self.weighting != other.weighting {
            return Err(Error::config_mismatch(
                "cannot compare partitioned sketches of different variants",
            )
            .with_context(
                "expected",
                format!("{:?}/{:?}", self.inner_kind, self.weighting),
            )
            .with_context(
                "actual",
                format!("{:?}/{:?}", other.inner_kind, other.weighting),
            ));
        }
        ensure_same_digest(self.digest.name(), other.digest.name())
    }

    fn cardinality_weighted_jaccard(&self, other: &Self) -> Result<f64, Error> {
        let mut estimates = Vec::with_capacity(self.partitions.len());
        let mut total_mine = 0.0;
        let mut total_theirs = 0.0;
        for (mine, theirs) in self.partitions.iter().zip(&other.partitions) {
            let similarity = mine.jaccard(theirs)?;
            let card_mine = mine.cardinality() as f64;
            let card_theirs = theirs.cardinality() as f64;
            total_mine += card_mine;
            total_theirs += card_theirs;
            estimates.push((similarity, card_mine, card_theirs));
        }

        let mut total = 0.0;
        for (similarity, card_mine, card_theirs) in estimates {
            let weight_mine = share(card_mine, total_mine);
            let weight_theirs = share(card_theirs, total_theirs);
            total += (weight_mine + weight_theirs) / 2.0 * similarity;
        }

        if total == 0.0 && self.is_empty() && other.is_empty() {
            return Ok(1.0);
        }
        Ok(total)
    }

    fn union_weighted_jaccard(&self, other: &Self) -> Result<f64, Error> {
        let mut estimates = Vec::with_capacity(self.partitions.len());
        for (mine, theirs) in self.partitions.iter().zip(&other.partitions) {
            let similarity = mine.jaccard(theirs)?;
            let union = union_size(
                mine.cardinality() as f64,
                theirs.cardinality() as f64,
                similarity,
            );
            estimates.push((similarity, union));
        }

        if self.is_empty() && other.is_empty() {
            return Ok(1.0);
        }

        let total_union: f64 = estimates.iter().map(|(_, union)| union).sum();
        if total_union <= 0.0 {
            return Ok(0.0);
        }
        Ok(estimates
            .into_iter()
            .map(|(similarity, union)| union / total_union * similarity)
            .sum())
    }
}

fn share(part: f64, total: f64) -> f64 {
    if total != 0.0 { part / total } else { 0.0 }
}

/// Estimates `|A ∪ B|` from `|A|`, `|B|` and `J(A, B)`.
///
/// With `min <= max`, the union is `max + alpha` where
/// `alpha = (min - J * max) / (J + 1)` is the part of the smaller set outside the larger one.
fn union_size(card_a: f64, card_b: f64, similarity: f64) -> f64 {
    let min = card_a.min(card_b);
    let max = card_a.max(card_b);
    max + (min - similarity * max) / (similarity + 1.0)
}

impl<C> PartialEq for PartitionedSketch<C> {
    fn eq(&self, other: &Self) -> bool {
        self.partitions == other.partitions
    }
}

impl<C: fmt::Debug> fmt::Debug for PartitionedSketch<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartitionedSketch")
            .field("num_perm", &self.num_perm)
            .field("digest", &self.digest.name())
            .field("inner_kind", &self.inner_kind)
            .field("weighting", &self.weighting)
            .field("partitions", &self.partitions)
            .finish()
    }
}

/// Builder for PartitionedSketch
#[derive(Debug, Clone)]
pub struct PartitionedSketchBuilder {
    num_perm: usize,
    num_partitions: usize,
    inner_kind: InnerKind,
    weighting: Weighting,
    relative_error: f64,
    digest: Option<SharedDigest>,
}

impl Default for PartitionedSketchBuilder {
    fn default() -> Self {
        Self {
            num_perm: DEFAULT_NUM_PERM,
            num_partitions: DEFAULT_NUM_PARTITIONS,
            inner_kind: InnerKind::default(),
            weighting: Weighting::default(),
            relative_error: DEFAULT_RELATIVE_ERROR,
            digest: None,
        }
    }
}

impl PartitionedSketchBuilder {
    /// Set `k`, the number of hash values of each inner sketch.
    ///
    /// # Panics
    ///
    /// If `num_perm` is zero.
    pub fn num_perm(mut self, num_perm: usize) -> Self {
        assert!(num_perm > 0, "num_perm must be at least 1");
        self.num_perm = num_perm;
        self
    }

    /// Set `P`, the number of partitions.
    ///
    /// # Panics
    ///
    /// If `num_partitions` is zero.
    pub fn num_partitions(mut self, num_partitions: usize) -> Self {
        assert!(num_partitions > 0, "num_partitions must be at least 1");
        self.num_partitions = num_partitions;
        self
    }

    /// Set the variant of the inner sketches.
    pub fn inner(mut self, inner_kind: InnerKind) -> Self {
        self.inner_kind = inner_kind;
        self
    }

    /// Set how per-partition estimates are combined.
    pub fn weighting(mut self, weighting: Weighting) -> Self {
        self.weighting = weighting;
        self
    }

    /// Set the target relative error of the cardinality estimators.
    ///
    /// # Panics
    ///
    /// If `relative_error` is not in `(0, 1)`.
    pub fn relative_error(mut self, relative_error: f64) -> Self {
        assert!(
            relative_error > 0.0 && relative_error < 1.0,
            "relative_error must be in (0, 1), got {relative_error}"
        );
        self.relative_error = relative_error;
        self
    }

    /// Set the digest adapter.
    pub fn digest(mut self, digest: SharedDigest) -> Self {
        self.digest = Some(digest);
        self
    }

    /// Build the PartitionedSketch with [`HyperLogLog`] estimators.
    pub fn build(self) -> PartitionedSketch<HyperLogLog> {
        self.build_with()
    }

    /// Build the PartitionedSketch with estimators of type `C`.
    pub fn build_with<C: CardinalityEstimator>(self) -> PartitionedSketch<C> {
        let digest = self.digest.unwrap_or_else(default_digest);
        let partitions = (0..self.num_partitions)
            .map(|_| {
                Partition::new(
                    InnerSketch::new(self.inner_kind, self.num_perm, digest.clone()),
                    C::with_relative_error(self.relative_error),
                )
            })
            .collect();
        log::debug!(
            "built partitioned sketch: num_perm={}, num_partitions={}, inner={:?}, weighting={:?}, digest={}",
            self.num_perm,
            self.num_partitions,
            self.inner_kind,
            self.weighting,
            digest.name()
        );
        PartitionedSketch::from_parts(
            self.num_perm,
            digest,
            self.inner_kind,
            self.weighting,
            partitions,
        )
    }
}

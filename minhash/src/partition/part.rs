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

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use crate::common::JaccardSketch;
use crate::error::Error;
use crate::hll::CardinalityEstimator;
use crate::partition::InnerSketch;

// marks an unset cardinality cache
const UNKNOWN_CARDINALITY: u64 = u64::MAX;

/// One partition: an inner sketch plus a distinct-count estimator over the same values.
#[derive(Debug)]
pub struct Partition<C> {
    sketch: InnerSketch,
    estimator: C,
    // invalidated on every update
    cardinality: AtomicU64,
}

impl<C: CardinalityEstimator> Partition<C> {
    pub(crate) fn new(sketch: InnerSketch, estimator: C) -> Self {
        Self {
            sketch,
            estimator,
            cardinality: AtomicU64::new(UNKNOWN_CARDINALITY),
        }
    }

    pub fn sketch(&self) -> &InnerSketch {
        &self.sketch
    }

    pub fn estimator(&self) -> &C {
        &self.estimator
    }

    /// Adds an already digested hash value to both the sketch and the estimator.
    pub(crate) fn update(&mut self, hash: u32) {
        self.sketch.update_hash(hash);
        self.estimator.add(hash);
        *self.cardinality.get_mut() = UNKNOWN_CARDINALITY;
    }

    pub fn is_empty(&self) -> bool {
        self.sketch.is_empty()
    }

    /// Returns the estimated number of distinct values routed to this partition.
    pub fn cardinality(&self) -> u64 {
        match self.cardinality.load(Ordering::Relaxed) {
            UNKNOWN_CARDINALITY => {
                let cardinality = self.estimator.cardinality();
                self.cardinality.store(cardinality, Ordering::Relaxed);
                cardinality
            }
            cardinality => cardinality,
        }
    }

    /// Estimates the Jaccard similarity of the two inner sketches.
    pub fn jaccard(&self, other: &Self) -> Result<f64, Error> {
        self.sketch.jaccard(&other.sketch)
    }
}

impl<C: Clone> Clone for Partition<C> {
    fn clone(&self) -> Self {
        Self {
            sketch: self.sketch.clone(),
            estimator: self.estimator.clone(),
            cardinality: AtomicU64::new(self.cardinality.load(Ordering::Relaxed)),
        }
    }
}

impl<C> PartialEq for Partition<C> {
    fn eq(&self, other: &Self) -> bool {
        self.sketch == other.sketch
    }
}

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

use crate::codec::SketchBytes;
use crate::codec::SketchSlice;
use crate::common::JaccardSketch;
use crate::digest::DigestSource;
use crate::digest::SharedDigest;
use crate::error::Error;
use crate::minheap::MinHeapSketch;
use crate::ophr::OphrSketch;

/// Selects the sketch variant owned by each partition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum InnerKind {
    /// Bottom-k sketch, see [`MinHeapSketch`].
    MinHeap,
    /// One-permutation sketch, see [`OphrSketch`].
    #[default]
    Ophr,
}

impl InnerKind {
    pub(crate) fn to_byte(self) -> u8 {
        match self {
            InnerKind::MinHeap => 0,
            InnerKind::Ophr => 1,
        }
    }

    pub(crate) fn from_byte(byte: u8) -> Result<Self, Error> {
        match byte {
            0 => Ok(InnerKind::MinHeap),
            1 => Ok(InnerKind::Ophr),
            _ => Err(Error::deserial(format!("unknown inner sketch kind {byte}"))),
        }
    }
}

/// A sketch of one of the supported variants.
#[derive(Debug, Clone, PartialEq)]
pub enum InnerSketch {
    MinHeap(MinHeapSketch),
    Ophr(OphrSketch),
}

impl InnerSketch {
    /// Creates an empty sketch of the given kind.
    ///
    /// # Panics
    ///
    /// Panics if `num_perm` is zero.
    pub fn new(kind: InnerKind, num_perm: usize, digest: SharedDigest) -> Self {
        match kind {
            InnerKind::MinHeap => {
                InnerSketch::MinHeap(MinHeapSketch::with_digest(num_perm, digest))
            }
            InnerKind::Ophr => InnerSketch::Ophr(OphrSketch::with_digest(num_perm, digest)),
        }
    }

    pub fn kind(&self) -> InnerKind {
        match self {
            InnerSketch::MinHeap(_) => InnerKind::MinHeap,
            InnerSketch::Ophr(_) => InnerKind::Ophr,
        }
    }

    pub(crate) fn write_to(&self, out: &mut SketchBytes) {
        match self {
            InnerSketch::MinHeap(sketch) => sketch.write_to(out),
            InnerSketch::Ophr(sketch) => sketch.write_to(out),
        }
    }

    pub(crate) fn read_from(
        kind: InnerKind,
        cursor: &mut SketchSlice<'_>,
        source: DigestSource<'_>,
    ) -> Result<Self, Error> {
        match kind {
            InnerKind::MinHeap => {
                MinHeapSketch::read_from(cursor, source).map(InnerSketch::MinHeap)
            }
            InnerKind::Ophr => OphrSketch::read_from(cursor, source).map(InnerSketch::Ophr),
        }
    }
}

impl From<MinHeapSketch> for InnerSketch {
    fn from(sketch: MinHeapSketch) -> Self {
        InnerSketch::MinHeap(sketch)
    }
}

impl From<OphrSketch> for InnerSketch {
    fn from(sketch: OphrSketch) -> Self {
        InnerSketch::Ophr(sketch)
    }
}

impl JaccardSketch for InnerSketch {
    fn update_hash(&mut self, hash: u32) {
        match self {
            InnerSketch::MinHeap(sketch) => sketch.update_hash(hash),
            InnerSketch::Ophr(sketch) => sketch.update_hash(hash),
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            InnerSketch::MinHeap(sketch) => sketch.is_empty(),
            InnerSketch::Ophr(sketch) => sketch.is_empty(),
        }
    }

    fn num_perm(&self) -> usize {
        match self {
            InnerSketch::MinHeap(sketch) => sketch.num_perm(),
            InnerSketch::Ophr(sketch) => sketch.num_perm(),
        }
    }

    fn digest(&self) -> &SharedDigest {
        match self {
            InnerSketch::MinHeap(sketch) => sketch.digest(),
            InnerSketch::Ophr(sketch) => sketch.digest(),
        }
    }

    fn jaccard(&self, other: &Self) -> Result<f64, Error> {
        match (self, other) {
            (InnerSketch::MinHeap(a), InnerSketch::MinHeap(b)) => a.jaccard(b),
            (InnerSketch::Ophr(a), InnerSketch::Ophr(b)) => a.jaccard(b),
            _ => Err(
                Error::config_mismatch("cannot compare sketches of different variants")
                    .with_context("expected", format!("{:?}", self.kind()))
                    .with_context("actual", format!("{:?}", other.kind())),
            ),
        }
    }

    fn bytesize(&self) -> usize {
        match self {
            InnerSketch::MinHeap(sketch) => sketch.bytesize(),
            InnerSketch::Ophr(sketch) => sketch.bytesize(),
        }
    }

    fn serialize(&self) -> Vec<u8> {
        match self {
            InnerSketch::MinHeap(sketch) => sketch.serialize(),
            InnerSketch::Ophr(sketch) => sketch.serialize(),
        }
    }
}

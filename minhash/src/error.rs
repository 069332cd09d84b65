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

//! Error types for sketch operations.

use std::fmt;

/// Classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Two sketches with different configurations were compared.
    ///
    /// Raised when `k`, the partition count, the sketch variant or the digest adapter differ.
    ConfigMismatch,
    /// A caller-provided buffer is smaller than the serialized image.
    InsufficientBuffer,
    /// A value was popped from an empty bounded set.
    EmptyPop,
    /// Serialized bytes are truncated or carry invalid header fields.
    MalformedBuffer,
    /// A digest adapter name could not be resolved.
    UnknownDigest,
    /// Sketch state could not be encoded.
    SerializeFailed,
}

impl ErrorKind {
    /// Returns the static name of this kind.
    pub fn into_static(self) -> &'static str {
        match self {
            ErrorKind::ConfigMismatch => "ConfigMismatch",
            ErrorKind::InsufficientBuffer => "InsufficientBuffer",
            ErrorKind::EmptyPop => "EmptyPop",
            ErrorKind::MalformedBuffer => "MalformedBuffer",
            ErrorKind::UnknownDigest => "UnknownDigest",
            ErrorKind::SerializeFailed => "SerializeFailed",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.into_static())
    }
}

/// Error returned by fallible sketch operations.
///
/// Every error is local to the call that produced it; sketches are left unchanged.
pub struct Error {
    kind: ErrorKind,
    message: String,
    context: Vec<(&'static str, String)>,
}

impl Error {
    /// Creates a new error with the given kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: vec![],
        }
    }

    /// Attaches a key/value pair describing the failing call.
    pub fn with_context(mut self, key: &'static str, value: impl ToString) -> Self {
        self.context.push((key, value.to_string()));
        self
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the message of this error.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the context attached to this error.
    pub fn context(&self) -> &[(&'static str, String)] {
        &self.context
    }
}

// Convenience constructors used throughout the crate
impl Error {
    pub(crate) fn config_mismatch(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigMismatch, msg)
    }

    pub(crate) fn insufficient_buffer(required: usize, actual: usize) -> Self {
        Self::new(
            ErrorKind::InsufficientBuffer,
            "buffer does not have enough space for the serialized sketch",
        )
        .with_context("required", required)
        .with_context("actual", actual)
    }

    pub(crate) fn empty_pop() -> Self {
        Self::new(ErrorKind::EmptyPop, "cannot pop from an empty set")
    }

    pub(crate) fn insufficient_data(tag: &'static str) -> Self {
        Self::new(
            ErrorKind::MalformedBuffer,
            format!("insufficient data for {tag}"),
        )
    }

    pub(crate) fn deserial(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedBuffer, msg)
    }

    pub(crate) fn serialize_failed(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::SerializeFailed, msg)
    }

    pub(crate) fn unknown_digest(name: &str) -> Self {
        Self::new(ErrorKind::UnknownDigest, "no digest adapter registered").with_context("name", name)
    }

    pub(crate) fn num_perm_mismatch(expected: usize, actual: usize) -> Self {
        Self::config_mismatch("cannot compare sketches with different numbers of hash values")
            .with_context("expected", expected)
            .with_context("actual", actual)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // alternate form prints the struct for debugging
        if f.alternate() {
            let mut de = f.debug_struct("Error");
            de.field("kind", &self.kind);
            de.field("message", &self.message);
            de.field("context", &self.context);
            return de.finish();
        }

        write!(f, "{}", self.kind)?;
        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }
        writeln!(f)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            writeln!(f, "Context:")?;
            for (k, v) in self.context.iter() {
                writeln!(f, "   {k}: {v}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        if !self.context.is_empty() {
            write!(f, ", context: {{ ")?;
            write!(
                f,
                "{}",
                self.context
                    .iter()
                    .map(|(k, v)| format!("{k}: {v}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            )?;
            write!(f, " }}")?;
        }

        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {}

// Dweve Perfsuite - Benchmark Suite Inspection Toolkit
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Structured error types for the Perfsuite CLI.
//!
//! Every command returns `Result<(), CliError>`; `main` prints the error and
//! exits with a failure status.

use perfsuite_core::SuiteError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for Perfsuite CLI operations.
#[derive(Error, Debug, Clone)]
pub enum CliError {
    /// Writing command output failed (suite files report `SuiteError::Io`).
    #[error("I/O error for '{path}': {message}")]
    Io {
        /// The file path that caused the error
        path: PathBuf,
        /// The error message
        message: String,
    },

    /// Loading, editing or comparing suites failed.
    #[error(transparent)]
    Suite(#[from] SuiteError),

    /// JSON serialization/deserialization error.
    #[error("JSON format error: {message}")]
    JsonFormat {
        /// The error message
        message: String,
    },

    /// Invalid input provided by the user.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// `system` operations reported errors; they are printed before this.
    #[error("{count} system operation(s) failed")]
    SystemErrors {
        /// Number of reported errors
        count: usize,
    },
}

impl CliError {
    /// Create an I/O error with file path context.
    pub fn io_error(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Create an invalid input error.
    ///
    /// ```rust
    /// use perfsuite_cli::error::CliError;
    ///
    /// let err = CliError::invalid_input("empty metadata key");
    /// assert_eq!(err.to_string(), "Invalid input: empty metadata key");
    /// ```
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

// Automatic conversion from serde_json::Error
impl From<serde_json::Error> for CliError {
    fn from(source: serde_json::Error) -> Self {
        Self::JsonFormat {
            message: source.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let err = CliError::io_error(
            "out.json",
            io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("out.json"));
        assert!(msg.contains("permission denied"));
    }

    #[test]
    fn test_suite_error_is_transparent() {
        let err: CliError = SuiteError::InsufficientSuites { count: 1 }.into();
        assert_eq!(err.to_string(), "need at least two benchmark files, got 1");
    }

    #[test]
    fn test_system_errors_display() {
        let err = CliError::SystemErrors { count: 2 };
        assert_eq!(err.to_string(), "2 system operation(s) failed");
    }

    #[test]
    fn test_json_format_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let cli_err: CliError = json_err.into();
        assert!(matches!(cli_err, CliError::JsonFormat { .. }));
    }
}

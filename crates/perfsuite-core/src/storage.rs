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

//! File I/O for benchmark suites: size-guarded reads and writes with
//! transparent gzip compression for `.gz` paths.

use crate::error::{Result, SuiteError};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;

/// Default maximum suite file size (1 GB).
/// Can be overridden via the `PERFSUITE_MAX_FILE_SIZE` environment variable.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024 * 1024;

/// Maximum file size from the environment, or the default.
pub fn max_file_size() -> u64 {
    std::env::var("PERFSUITE_MAX_FILE_SIZE")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_MAX_FILE_SIZE)
}

fn is_gzip(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == "gz")
}

/// Read a suite source into a string.
///
/// The size check happens before any allocation; gzip sources are checked
/// on their compressed size and decompressed with the same limit.
pub fn read_source(path: &Path) -> Result<String> {
    let source_id = path.display().to_string();
    let metadata = fs::metadata(path).map_err(|e| SuiteError::load(&source_id, e.to_string()))?;

    let limit = max_file_size();
    if metadata.len() > limit {
        return Err(SuiteError::load(
            &source_id,
            format!(
                "file is too large ({} bytes). Maximum allowed size is {} bytes ({} MB); \
                 set PERFSUITE_MAX_FILE_SIZE to raise it",
                metadata.len(),
                limit,
                limit / (1024 * 1024)
            ),
        ));
    }

    let file = File::open(path).map_err(|e| SuiteError::load(&source_id, e.to_string()))?;
    let mut content = String::new();
    let read = if is_gzip(path) {
        GzDecoder::new(file).take(limit + 1).read_to_string(&mut content)
    } else {
        io::BufReader::new(file).read_to_string(&mut content)
    };
    read.map_err(|e| SuiteError::load(&source_id, e.to_string()))?;

    if content.len() as u64 > limit {
        return Err(SuiteError::load(&source_id, "decompressed content is too large"));
    }
    Ok(content)
}

/// Write content to a path, gzip-compressed when the path ends in `.gz`.
pub fn write_output(path: &Path, content: &str) -> Result<()> {
    if is_gzip(path) {
        let file = File::create(path).map_err(|e| SuiteError::io_error(path, e))?;
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder
            .write_all(content.as_bytes())
            .map_err(|e| SuiteError::io_error(path, e))?;
        encoder.finish().map_err(|e| SuiteError::io_error(path, e))?;
        Ok(())
    } else {
        fs::write(path, content).map_err(|e| SuiteError::io_error(path, e))
    }
}

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

//! Metadata command - describe the host benchmarks would run on

use super::print_lines;
use crate::error::CliError;
use crate::render::metadata_lines;
use crate::system::{host_metadata, SystemConfig};

/// Print host metadata, as text or as a JSON object.
pub fn metadata(json: bool) -> Result<(), CliError> {
    let metadata = host_metadata(&SystemConfig::default());
    if json {
        print_lines(&[serde_json::to_string_pretty(&metadata)?])
    } else {
        print_lines(&metadata_lines(&metadata, None))
    }
}

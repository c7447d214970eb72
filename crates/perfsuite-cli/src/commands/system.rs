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

//! System command - show, tune or reset performance knobs

use super::print_lines;
use crate::error::CliError;
use crate::render::diagnostic_lines;
use crate::system::{Action, System, SystemConfig};
use perfsuite_core::Diagnostics;

/// Run `action` on every operation supported by the host.
///
/// Errors of individual operations are printed after the state; any of
/// them makes the command fail.
pub fn system(action: Action) -> Result<(), CliError> {
    let config = SystemConfig::default();
    let mut system = System::detect(&config);
    tracing::debug!(
        ?action,
        operations = ?system.operation_names(),
        "running system operations"
    );

    let mut diagnostics = Diagnostics::new();
    let report = system.run(action, &mut diagnostics);

    let mut lines = report.messages;
    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.extend(report.state);

    let count = diagnostics.errors().count();
    if count > 0 {
        lines.push(String::new());
        lines.extend(diagnostic_lines(&diagnostics));
    }
    print_lines(&lines)?;

    if count > 0 {
        return Err(CliError::SystemErrors { count });
    }
    Ok(())
}

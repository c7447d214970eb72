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

//! Shell completion generation

use clap::Command;
use clap_complete::{generate, Generator};
use std::io;

/// Write the completion script for `cmd` to stdout.
///
/// ```no_run
/// use clap::Command;
/// use clap_complete::shells::Bash;
/// use perfsuite_cli::commands::generate_completion_for_command;
///
/// let mut cmd = Command::new("perfsuite");
/// generate_completion_for_command(Bash, &mut cmd);
/// ```
pub fn generate_completion_for_command<G: Generator>(generator: G, cmd: &mut Command) {
    let name = cmd.get_name().to_string();
    generate(generator, cmd, name, &mut io::stdout());
}

/// Shell-specific instructions for enabling completions.
///
/// Shell names are case-insensitive; unknown shells yield
/// `"Unsupported shell"`.
///
/// ```
/// use perfsuite_cli::commands::print_installation_instructions;
///
/// assert!(print_installation_instructions("bash").contains("bash"));
/// assert_eq!(print_installation_instructions("tcsh"), "Unsupported shell");
/// ```
pub fn print_installation_instructions(shell: &str) -> String {
    match shell.to_lowercase().as_str() {
        "bash" => {
            r#"# Bash completion installation:

# For current session only:
eval "$(perfsuite completion bash)"

# For persistent installation, add to your ~/.bashrc:
echo 'eval "$(perfsuite completion bash)"' >> ~/.bashrc

# Or save to completions directory:
perfsuite completion bash > ~/.local/share/bash-completion/completions/perfsuite
"#
        }
        "zsh" => {
            r#"# Zsh completion installation:

# For current session only:
eval "$(perfsuite completion zsh)"

# Or save to completions directory (ensure directory is in $fpath):
perfsuite completion zsh > ~/.zsh/completions/_perfsuite
"#
        }
        "fish" => {
            r#"# Fish completion installation:

perfsuite completion fish > ~/.config/fish/completions/perfsuite.fish
"#
        }
        "powershell" | "pwsh" => {
            r#"# PowerShell completion installation:

# Add this line to your PowerShell profile ($PROFILE):
perfsuite completion powershell | Out-String | Invoke-Expression
"#
        }
        "elvish" => {
            r#"# Elvish completion installation:

# Add to your ~/.elvish/rc.elv:
eval (perfsuite completion elvish)
"#
        }
        _ => "Unsupported shell",
    }
    .to_string()
}

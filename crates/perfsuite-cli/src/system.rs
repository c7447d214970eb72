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

//! Probing and tuning of operating system performance knobs.
//!
//! Every knob is an [`Operation`] reading and writing files below the sysfs
//! and procfs roots of a [`SystemConfig`]. Failures never abort a run: they
//! are pushed into a [`Diagnostics`] collector and reported at the end.

use chrono::Local;
use perfsuite_core::ranges::{format_cpu_list, parse_cpu_list};
use perfsuite_core::{DiagnosticKind, Diagnostics, Metadata};
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Roots of the pseudo filesystems.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemConfig {
    pub sysfs: PathBuf,
    pub procfs: PathBuf,
}

impl Default for SystemConfig {
    /// `/sys` and `/proc`, overridable through `PERFSUITE_SYSFS` and
    /// `PERFSUITE_PROCFS`.
    fn default() -> Self {
        let root = |var: &str, default: &str| {
            std::env::var_os(var)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(default))
        };
        SystemConfig {
            sysfs: root("PERFSUITE_SYSFS", "/sys"),
            procfs: root("PERFSUITE_PROCFS", "/proc"),
        }
    }
}

impl SystemConfig {
    pub fn new(sysfs: impl Into<PathBuf>, procfs: impl Into<PathBuf>) -> Self {
        SystemConfig {
            sysfs: sysfs.into(),
            procfs: procfs.into(),
        }
    }

    pub fn sysfs_path(&self, relative: &str) -> PathBuf {
        self.sysfs.join(relative)
    }

    pub fn proc_path(&self, relative: &str) -> PathBuf {
        self.procfs.join(relative)
    }

    /// Number of logical CPUs, from `devices/system/cpu/online` or the
    /// standard library as a fallback.
    pub fn logical_cpu_count(&self) -> Option<usize> {
        read_first_line(&self.sysfs_path("devices/system/cpu/online"))
            .and_then(|line| parse_cpu_list(&line))
            .map(|cpus| cpus.len())
            .filter(|&n| n > 0)
            .or_else(|| std::thread::available_parallelism().ok().map(|n| n.get()))
    }

    /// CPUs isolated from the scheduler (`isolcpus=`), if any.
    pub fn isolated_cpus(&self) -> Option<BTreeSet<u32>> {
        read_first_line(&self.sysfs_path("devices/system/cpu/isolated"))
            .and_then(|line| parse_cpu_list(&line))
            .filter(|cpus| !cpus.is_empty())
    }

    pub fn kernel_cmdline(&self) -> Option<String> {
        read_first_line(&self.proc_path("cmdline"))
    }
}

/// First line of a file, trimmed; `None` when unreadable or empty.
pub fn read_first_line(path: &Path) -> Option<String> {
    let content = fs::read_to_string(path).ok()?;
    let line = content.lines().next()?.trim();
    if line.is_empty() {
        None
    } else {
        Some(line.to_string())
    }
}

/// What `system` does before reading the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Show,
    Tune,
    Reset,
}

/// One performance knob.
///
/// `tune` and `reset` return the informational messages of the changes they
/// made; `show` describes the state found by the last `read`.
pub trait Operation {
    fn name(&self) -> &'static str;

    fn read(&mut self, diagnostics: &mut Diagnostics);

    fn tune(&mut self, _diagnostics: &mut Diagnostics) -> Vec<String> {
        Vec::new()
    }

    fn reset(&mut self, _diagnostics: &mut Diagnostics) -> Vec<String> {
        Vec::new()
    }

    fn show(&self) -> Vec<String>;

    fn error(&self, diagnostics: &mut Diagnostics, message: impl Into<String>)
    where
        Self: Sized,
    {
        diagnostics.error(DiagnosticKind::System, self.name(), message);
    }
}

/// Checks of the `isolcpus=` and `rcu_nocbs=` kernel parameters.
#[derive(Debug, Clone)]
pub struct LinuxScheduler {
    config: SystemConfig,
    ncpu: Option<usize>,
    linux_version: Option<Vec<u32>>,
    messages: Vec<String>,
}

impl LinuxScheduler {
    pub fn new(config: SystemConfig) -> Self {
        LinuxScheduler {
            config,
            ncpu: None,
            linux_version: None,
            messages: Vec::new(),
        }
    }

    pub fn linux_version(&self) -> Option<&[u32]> {
        self.linux_version.as_deref()
    }

    fn check_isolcpus(&mut self, ncpu: usize) {
        match self.config.isolated_cpus() {
            Some(isolated) => self.messages.push(format!(
                "Isolated CPUs ({}/{}): {}",
                isolated.len(),
                ncpu,
                format_cpu_list(&isolated)
            )),
            None if ncpu > 1 => self
                .messages
                .push("Use isolcpus=<cpu list> kernel parameter to isolate CPUs".to_string()),
            None => {}
        }
    }

    fn read_rcu_nocbs(&self) -> Option<BTreeSet<u32>> {
        let cmdline = self.config.kernel_cmdline()?;
        let cpus = cmdline
            .split_whitespace()
            .find_map(|param| param.strip_prefix("rcu_nocbs="))?;
        parse_cpu_list(cpus).filter(|cpus| !cpus.is_empty())
    }

    fn check_rcu_nocbs(&mut self, ncpu: usize) {
        match self.read_rcu_nocbs() {
            Some(cpus) => self.messages.push(format!(
                "RCU disabled on CPUs ({}/{}): {}",
                cpus.len(),
                ncpu,
                format_cpu_list(&cpus)
            )),
            None if ncpu > 1 => self.messages.push(
                "Use rcu_nocbs=<cpu list> kernel parameter (with isolcpus) to not schedule RCU \
                 on isolated CPUs (Linux 3.8 and newer)"
                    .to_string(),
            ),
            None => {}
        }
    }
}

/// Parse `4.8.0-1-amd64` into `[4, 8, 0]`.
fn parse_linux_version(release: &str) -> Option<Vec<u32>> {
    release
        .split('-')
        .next()?
        .split('.')
        .map(|part| part.parse().ok())
        .collect()
}

impl Operation for LinuxScheduler {
    fn name(&self) -> &'static str {
        "Linux scheduler"
    }

    fn read(&mut self, diagnostics: &mut Diagnostics) {
        self.messages.clear();

        let Some(ncpu) = self.config.logical_cpu_count() else {
            self.error(diagnostics, "Unable to get the number of CPUs");
            return;
        };
        self.ncpu = Some(ncpu);

        let release =
            read_first_line(&self.config.proc_path("sys/kernel/osrelease")).unwrap_or_default();
        let Some(version) = parse_linux_version(&release) else {
            self.error(
                diagnostics,
                format!("Failed to get the Linux version: release={:?}", release),
            );
            return;
        };

        self.check_isolcpus(ncpu);
        // rcu_nocbs= appeared in Linux 3.8
        if version.as_slice() >= [3, 8].as_slice() {
            self.check_rcu_nocbs(ncpu);
        }
        self.linux_version = Some(version);
    }

    fn show(&self) -> Vec<String> {
        self.messages
            .iter()
            .map(|msg| format!("{}: {}", self.name(), msg))
            .collect()
    }
}

/// Turbo Boost of Intel CPUs through the `intel_pstate` driver's `no_turbo`.
#[derive(Debug, Clone)]
pub struct TurboBoostIntelPstate {
    config: SystemConfig,
    enabled: Option<bool>,
}

impl TurboBoostIntelPstate {
    pub fn new(config: SystemConfig) -> Self {
        TurboBoostIntelPstate {
            config,
            enabled: None,
        }
    }

    /// Whether CPU 0 is driven by `intel_pstate`.
    pub fn is_available(config: &SystemConfig) -> bool {
        read_first_line(&config.sysfs_path("devices/system/cpu/cpu0/cpufreq/scaling_driver"))
            .map_or(false, |driver| driver == "intel_pstate")
    }

    pub fn enabled(&self) -> Option<bool> {
        self.enabled
    }

    fn no_turbo_path(&self) -> PathBuf {
        self.config.sysfs_path("devices/system/cpu/intel_pstate/no_turbo")
    }

    fn write(&mut self, enabled: bool, diagnostics: &mut Diagnostics) -> Vec<String> {
        if self.enabled.is_none() {
            self.read(diagnostics);
        }
        if self.enabled == Some(enabled) {
            tracing::debug!(enabled, "no_turbo already set");
            return Vec::new();
        }

        let path = self.no_turbo_path();
        let content = if enabled { "0" } else { "1" };
        match fs::write(&path, content) {
            Ok(()) => {
                tracing::info!(path = %path.display(), content, "wrote no_turbo");
                self.enabled = Some(enabled);
                let state = if enabled { "enabled" } else { "disabled" };
                vec![format!(
                    "{}: Turbo Boost {}: '{}' written into {}",
                    self.name(),
                    state,
                    content,
                    path.display()
                )]
            }
            Err(e) => {
                let hint = if e.kind() == io::ErrorKind::PermissionDenied {
                    " (retry as root?)"
                } else {
                    ""
                };
                self.error(
                    diagnostics,
                    format!("Failed to write into {}{}: {}", path.display(), hint, e),
                );
                Vec::new()
            }
        }
    }
}

impl Operation for TurboBoostIntelPstate {
    fn name(&self) -> &'static str {
        "Turbo Boost (intel_pstate driver)"
    }

    fn read(&mut self, diagnostics: &mut Diagnostics) {
        let no_turbo = read_first_line(&self.no_turbo_path());
        match no_turbo.as_deref() {
            Some("1") => self.enabled = Some(false),
            Some("0") => self.enabled = Some(true),
            other => {
                self.enabled = None;
                self.error(
                    diagnostics,
                    format!("Invalid no_turbo value: {:?}", other.unwrap_or("")),
                );
            }
        }
    }

    fn tune(&mut self, diagnostics: &mut Diagnostics) -> Vec<String> {
        self.write(false, diagnostics)
    }

    fn reset(&mut self, diagnostics: &mut Diagnostics) -> Vec<String> {
        self.write(true, diagnostics)
    }

    fn show(&self) -> Vec<String> {
        match self.enabled {
            Some(true) => vec![format!("{}: enabled", self.name())],
            Some(false) => vec![format!("{}: disabled", self.name())],
            None => Vec::new(),
        }
    }
}

/// Output of [`System::run`].
#[derive(Debug, Default)]
pub struct SystemReport {
    /// Changes made by `tune`/`reset`.
    pub messages: Vec<String>,
    /// State of every operation after the changes.
    pub state: Vec<String>,
}

/// The operations available on this host.
pub struct System {
    operations: Vec<Box<dyn Operation>>,
}

impl System {
    /// Detect the operations supported by the host described by `config`.
    pub fn detect(config: &SystemConfig) -> Self {
        let mut operations: Vec<Box<dyn Operation>> = Vec::new();
        if cfg!(target_os = "linux") {
            operations.push(Box::new(LinuxScheduler::new(config.clone())));
        }
        if TurboBoostIntelPstate::is_available(config) {
            operations.push(Box::new(TurboBoostIntelPstate::new(config.clone())));
        } else {
            tracing::debug!("intel_pstate driver not in use, Turbo Boost left alone");
        }
        System { operations }
    }

    pub fn operation_names(&self) -> Vec<&'static str> {
        self.operations.iter().map(|op| op.name()).collect()
    }

    /// Apply `action`, then read and describe every operation.
    pub fn run(&mut self, action: Action, diagnostics: &mut Diagnostics) -> SystemReport {
        let mut report = SystemReport::default();
        for operation in &mut self.operations {
            match action {
                Action::Tune => report.messages.extend(operation.tune(diagnostics)),
                Action::Reset => report.messages.extend(operation.reset(diagnostics)),
                Action::Show => {}
            }
        }
        for operation in &mut self.operations {
            operation.read(diagnostics);
        }
        for operation in &self.operations {
            report.state.extend(operation.show());
        }
        report
    }
}

/// Metadata describing the host, as printed by the `metadata` command.
pub fn host_metadata(config: &SystemConfig) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert("date", Local::now().format("%Y-%m-%d %H:%M:%S").to_string());

    let mut platform = std::env::consts::OS.to_string();
    if let Some(release) = read_first_line(&config.proc_path("sys/kernel/osrelease")) {
        platform = format!("{}-{}", platform, release);
    }
    metadata.insert("platform", platform);
    metadata.insert("arch", std::env::consts::ARCH);
    if let Some(hostname) = read_first_line(&config.proc_path("sys/kernel/hostname")) {
        metadata.insert("hostname", hostname);
    }
    if let Some(count) = config.logical_cpu_count() {
        metadata.insert("cpu_count", count as i64);
    }
    if let Some(model) = cpu_model_name(config) {
        metadata.insert("cpu_model_name", model);
    }
    if let Some(isolated) = config.isolated_cpus() {
        metadata.insert("isolated_cpus", format_cpu_list(&isolated));
    }
    if let Some(cmdline) = config.kernel_cmdline() {
        metadata.insert("boot_cmdline", cmdline);
    }
    metadata
}

fn cpu_model_name(config: &SystemConfig) -> Option<String> {
    let cpuinfo = fs::read_to_string(config.proc_path("cpuinfo")).ok()?;
    cpuinfo.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        (key.trim() == "model name").then(|| value.trim().to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fake_host() -> (TempDir, SystemConfig) {
        let dir = TempDir::new().unwrap();
        let config = SystemConfig::new(dir.path().join("sys"), dir.path().join("proc"));
        write(&config.sysfs_path("devices/system/cpu/online"), "0-3\n");
        write(&config.proc_path("sys/kernel/osrelease"), "4.8.0-1-amd64\n");
        (dir, config)
    }

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn enable_intel_pstate(config: &SystemConfig, no_turbo: &str) {
        write(
            &config.sysfs_path("devices/system/cpu/cpu0/cpufreq/scaling_driver"),
            "intel_pstate\n",
        );
        write(&config.sysfs_path("devices/system/cpu/intel_pstate/no_turbo"), no_turbo);
    }

    #[test]
    fn test_parse_linux_version() {
        assert_eq!(parse_linux_version("4.8.0-1-amd64"), Some(vec![4, 8, 0]));
        assert_eq!(parse_linux_version("3.10"), Some(vec![3, 10]));
        assert_eq!(parse_linux_version("bogus"), None);
    }

    #[test]
    fn test_scheduler_advises_isolation() {
        let (_dir, config) = fake_host();
        let mut op = LinuxScheduler::new(config);
        let mut diagnostics = Diagnostics::new();
        Operation::read(&mut op, &mut diagnostics);

        assert!(diagnostics.is_empty());
        assert_eq!(op.linux_version(), Some(&[4, 8, 0][..]));
        let lines = Operation::show(&op);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Linux scheduler: Use isolcpus="));
        assert!(lines[1].contains("rcu_nocbs"));
    }

    #[test]
    fn test_scheduler_reports_isolated_cpus() {
        let (_dir, config) = fake_host();
        write(&config.sysfs_path("devices/system/cpu/isolated"), "2-3\n");
        write(&config.proc_path("cmdline"), "quiet isolcpus=2-3 rcu_nocbs=2-3\n");
        let mut op = LinuxScheduler::new(config);
        let mut diagnostics = Diagnostics::new();
        Operation::read(&mut op, &mut diagnostics);

        assert_eq!(
            Operation::show(&op),
            vec![
                "Linux scheduler: Isolated CPUs (2/4): 2-3",
                "Linux scheduler: RCU disabled on CPUs (2/4): 2-3",
            ]
        );
    }

    #[test]
    fn test_scheduler_skips_rcu_on_old_kernels() {
        let (_dir, config) = fake_host();
        write(&config.proc_path("sys/kernel/osrelease"), "3.2.0\n");
        let mut op = LinuxScheduler::new(config);
        Operation::read(&mut op, &mut Diagnostics::new());
        assert_eq!(Operation::show(&op).len(), 1);
    }

    #[test]
    fn test_scheduler_bad_release_is_an_error() {
        let (_dir, config) = fake_host();
        write(&config.proc_path("sys/kernel/osrelease"), "weird\n");
        let mut op = LinuxScheduler::new(config);
        let mut diagnostics = Diagnostics::new();
        Operation::read(&mut op, &mut diagnostics);
        assert!(diagnostics.has_errors());
        assert!(Operation::show(&op).is_empty());
    }

    #[test]
    fn test_turbo_boost_read() {
        let (_dir, config) = fake_host();
        enable_intel_pstate(&config, "1\n");
        let mut op = TurboBoostIntelPstate::new(config.clone());
        Operation::read(&mut op, &mut Diagnostics::new());
        assert_eq!(op.enabled(), Some(false));
        assert_eq!(Operation::show(&op), vec!["Turbo Boost (intel_pstate driver): disabled"]);

        write(&config.sysfs_path("devices/system/cpu/intel_pstate/no_turbo"), "2\n");
        let mut diagnostics = Diagnostics::new();
        Operation::read(&mut op, &mut diagnostics);
        assert_eq!(op.enabled(), None);
        assert_eq!(diagnostics.errors().count(), 1);
    }

    #[test]
    fn test_turbo_boost_tune_and_reset() {
        let (_dir, config) = fake_host();
        enable_intel_pstate(&config, "0\n");
        let path = config.sysfs_path("devices/system/cpu/intel_pstate/no_turbo");

        let mut op = TurboBoostIntelPstate::new(config.clone());
        let mut diagnostics = Diagnostics::new();
        let messages = Operation::tune(&mut op, &mut diagnostics);
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("Turbo Boost disabled"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "1");

        // already disabled: nothing written
        let mut fresh = TurboBoostIntelPstate::new(config);
        assert!(Operation::tune(&mut fresh, &mut diagnostics).is_empty());

        let messages = Operation::reset(&mut fresh, &mut diagnostics);
        assert!(messages[0].contains("Turbo Boost enabled"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "0");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_system_detect_and_run() {
        let (_dir, config) = fake_host();
        let mut system = System::detect(&config);
        if cfg!(target_os = "linux") {
            assert_eq!(system.operation_names(), vec!["Linux scheduler"]);
        }

        enable_intel_pstate(&config, "0\n");
        let mut system = System::detect(&config);
        assert!(system.operation_names().contains(&"Turbo Boost (intel_pstate driver)"));

        let mut diagnostics = Diagnostics::new();
        let report = system.run(Action::Tune, &mut diagnostics);
        assert_eq!(report.messages.len(), 1);
        assert!(report
            .state
            .contains(&"Turbo Boost (intel_pstate driver): disabled".to_string()));
        assert!(!diagnostics.has_errors());
    }

    #[test]
    fn test_host_metadata() {
        let (_dir, config) = fake_host();
        write(&config.proc_path("cpuinfo"), "processor\t: 0\nmodel name\t: Fake CPU @ 3.00GHz\n");
        write(&config.sysfs_path("devices/system/cpu/isolated"), "1,3\n");
        let metadata = host_metadata(&config);
        assert_eq!(metadata.get("cpu_count").and_then(|v| v.as_f64()), Some(4.0));
        assert_eq!(
            metadata.get("cpu_model_name").and_then(|v| v.as_str()),
            Some("Fake CPU @ 3.00GHz")
        );
        assert_eq!(metadata.get("isolated_cpus").and_then(|v| v.as_str()), Some("1,3"));
        assert!(metadata.contains_key("date"));
    }
}

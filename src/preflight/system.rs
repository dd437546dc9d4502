//! System-level preflight checks.
//!
//! Environment conditions that inflate or destabilize overhead samples.
//! None of them is fatal; they are reported next to the results.

use serde::{Deserialize, Serialize};

/// Warning from system checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SystemWarning {
    /// CPU frequency scaling is not set to performance mode.
    CpuGovernorNotPerformance {
        /// Current governor setting.
        current: String,
    },

    /// Turbo boost is enabled.
    TurboBoostEnabled,

    /// SMT siblings share the core's pipeline with the sampling loop.
    HyperthreadingEnabled,

    /// High system load detected.
    HighSystemLoad {
        /// One-minute load average.
        load_average: f64,
        /// Threshold exceeded.
        threshold: f64,
    },
}

impl SystemWarning {
    /// Get a human-readable description of the warning.
    pub fn description(&self) -> String {
        match self {
            SystemWarning::CpuGovernorNotPerformance { current } => {
                format!(
                    "CPU frequency governor is '{}', recommend 'performance' for stable \
                     cycle counts. Set with: sudo cpupower frequency-set -g performance",
                    current
                )
            }
            SystemWarning::TurboBoostEnabled => {
                "Turbo boost is enabled. Core frequency changes shift the ratio \
                 between core cycles and counter ticks."
                    .to_string()
            }
            SystemWarning::HyperthreadingEnabled => {
                "SMT is active. A busy sibling thread competes for the same \
                 pipeline and adds noise to each sample."
                    .to_string()
            }
            SystemWarning::HighSystemLoad {
                load_average,
                threshold,
            } => {
                format!(
                    "High system load detected: {:.2} (threshold: {:.2}). \
                     Expect more preempted samples.",
                    load_average, threshold
                )
            }
        }
    }
}

/// Perform all system checks.
///
/// On platforms other than Linux this returns an empty vector.
pub fn system_check() -> Vec<SystemWarning> {
    #[allow(unused_mut)]
    let mut warnings = Vec::new();

    #[cfg(target_os = "linux")]
    {
        warnings.extend(check_cpu_governor_linux());
        warnings.extend(check_turbo_boost_linux());
        warnings.extend(check_hyperthreading_linux());
        warnings.extend(check_load_linux());
    }

    warnings
}

#[cfg(target_os = "linux")]
fn check_cpu_governor_linux() -> Option<SystemWarning> {
    let governor =
        std::fs::read_to_string("/sys/devices/system/cpu/cpu0/cpufreq/scaling_governor").ok()?;
    let governor = governor.trim().to_lowercase();
    if governor != "performance" {
        Some(SystemWarning::CpuGovernorNotPerformance { current: governor })
    } else {
        None
    }
}

#[cfg(target_os = "linux")]
fn check_turbo_boost_linux() -> Option<SystemWarning> {
    if let Ok(value) = std::fs::read_to_string("/sys/devices/system/cpu/intel_pstate/no_turbo") {
        return (value.trim() == "0").then_some(SystemWarning::TurboBoostEnabled);
    }

    let value = std::fs::read_to_string("/sys/devices/system/cpu/cpufreq/boost").ok()?;
    (value.trim() == "1").then_some(SystemWarning::TurboBoostEnabled)
}

#[cfg(target_os = "linux")]
fn check_hyperthreading_linux() -> Option<SystemWarning> {
    let value = std::fs::read_to_string("/sys/devices/system/cpu/smt/active").ok()?;
    (value.trim() == "1").then_some(SystemWarning::HyperthreadingEnabled)
}

#[cfg(target_os = "linux")]
fn check_load_linux() -> Option<SystemWarning> {
    const LOAD_THRESHOLD: f64 = 1.0;

    let loadavg = std::fs::read_to_string("/proc/loadavg").ok()?;
    let load = loadavg
        .split_whitespace()
        .next()
        .and_then(|val| val.parse::<f64>().ok())?;

    (load > LOAD_THRESHOLD).then_some(SystemWarning::HighSystemLoad {
        load_average: load,
        threshold: LOAD_THRESHOLD,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_check_runs() {
        let _warnings = system_check();
    }

    #[test]
    fn test_warning_descriptions() {
        let warning = SystemWarning::CpuGovernorNotPerformance {
            current: "powersave".to_string(),
        };
        let desc = warning.description();
        assert!(desc.contains("powersave"));
        assert!(desc.contains("performance"));

        assert!(SystemWarning::TurboBoostEnabled
            .description()
            .contains("Turbo boost"));

        let warning = SystemWarning::HighSystemLoad {
            load_average: 2.5,
            threshold: 1.0,
        };
        assert!(warning.description().contains("2.50"));
    }
}

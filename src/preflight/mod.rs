//! Preflight checks run once before sampling.
//!
//! # Checks Performed
//!
//! - **Hardware**: CPUID must report `rdtsc`, `rdtscp`, and SSE2 (`lfence`).
//!   A missing instruction is fatal ([`Error::UnsupportedHardware`]).
//! - **Counter quality**: non-invariant TSC and hypervisor presence are
//!   reported as warnings.
//! - **System**: Linux governor, turbo, SMT, and load warnings.
//!
//! [`Error::UnsupportedHardware`]: crate::Error::UnsupportedHardware

mod hardware;
mod system;

pub use hardware::{hardware_check, HardwareInfo, HardwareWarning};
pub use system::{system_check, SystemWarning};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;

/// Result of running all preflight checks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreflightResult {
    /// Processor facts gathered by the hardware probe.
    pub hardware: HardwareInfo,

    /// All non-fatal warnings.
    pub warnings: PreflightWarnings,
}

impl PreflightResult {
    /// Check if there are any warnings.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Human-readable descriptions of every warning.
    pub fn descriptions(&self) -> Vec<String> {
        self.warnings
            .hardware
            .iter()
            .map(HardwareWarning::description)
            .chain(self.warnings.system.iter().map(SystemWarning::description))
            .collect()
    }
}

/// Collection of all warnings from preflight checks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreflightWarnings {
    /// Warnings derived from CPUID.
    pub hardware: Vec<HardwareWarning>,

    /// Warnings from system checks.
    pub system: Vec<SystemWarning>,
}

impl PreflightWarnings {
    /// Get total number of warnings.
    pub fn count(&self) -> usize {
        self.hardware.len() + self.system.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

/// Run the hardware probe and, optionally, the system checks.
///
/// # Errors
///
/// Propagates [`Error::UnsupportedHardware`](crate::Error::UnsupportedHardware)
/// from [`hardware_check`].
pub fn run_all_checks(include_system: bool) -> Result<PreflightResult> {
    let hardware = hardware_check()?;

    let warnings = PreflightWarnings {
        hardware: hardware.warnings(),
        system: if include_system {
            system_check()
        } else {
            Vec::new()
        },
    };

    let result = PreflightResult { hardware, warnings };
    for description in result.descriptions() {
        warn!("{}", description);
    }

    Ok(result)
}

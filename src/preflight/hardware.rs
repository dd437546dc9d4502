//! One-time processor capability probe.
//!
//! The clock readers emit `rdtsc`, `rdtscp`, and `lfence` unconditionally.
//! This check runs CPUID once at session start and refuses to proceed if any
//! of them is missing. There is no fallback timer.

use raw_cpuid::CpuId;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, MissingFeature, Result};

/// Processor facts relevant to counter-based measurement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareInfo {
    /// CPUID vendor string, e.g. `GenuineIntel`.
    pub vendor: Option<String>,
    /// Processor brand string.
    pub brand: Option<String>,
    /// Counter ticks at a constant rate across P-/C-state transitions.
    pub invariant_tsc: bool,
    /// Hypervisor identified through CPUID, if any.
    pub hypervisor: Option<String>,
}

impl HardwareInfo {
    /// Non-fatal conditions worth reporting alongside results.
    pub fn warnings(&self) -> Vec<HardwareWarning> {
        let mut warnings = Vec::new();
        if !self.invariant_tsc {
            warnings.push(HardwareWarning::NonInvariantTsc);
        }
        if let Some(name) = &self.hypervisor {
            warnings.push(HardwareWarning::Hypervisor { name: name.clone() });
        }
        warnings
    }
}

/// Warning derived from CPUID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HardwareWarning {
    /// The counter rate may follow core frequency.
    NonInvariantTsc,

    /// Running under a hypervisor; `rdtsc` may be trapped or offset.
    Hypervisor {
        /// Hypervisor name as reported by CPUID.
        name: String,
    },
}

impl HardwareWarning {
    /// Get a human-readable description of the warning.
    pub fn description(&self) -> String {
        match self {
            HardwareWarning::NonInvariantTsc => {
                "Timestamp counter is not invariant. Its rate may change with \
                 core frequency, so cycle counts from different P-states are \
                 not comparable."
                    .to_string()
            }
            HardwareWarning::Hypervisor { name } => {
                format!(
                    "Running under hypervisor '{}'. Counter reads may be \
                     intercepted, inflating the measured overhead.",
                    name
                )
            }
        }
    }
}

/// Probe CPUID for the instructions the clock readers use.
///
/// # Errors
///
/// [`Error::UnsupportedHardware`] naming the first missing feature.
pub fn hardware_check() -> Result<HardwareInfo> {
    let cpuid = CpuId::new();

    let features = cpuid
        .get_feature_info()
        .ok_or(Error::UnsupportedHardware(MissingFeature::Tsc))?;
    if !features.has_tsc() {
        return Err(Error::UnsupportedHardware(MissingFeature::Tsc));
    }
    if !features.has_sse2() {
        return Err(Error::UnsupportedHardware(MissingFeature::Sse2));
    }

    let has_rdtscp = cpuid
        .get_extended_processor_and_feature_identifiers()
        .map(|ext| ext.has_rdtscp())
        .unwrap_or(false);
    if !has_rdtscp {
        return Err(Error::UnsupportedHardware(MissingFeature::Rdtscp));
    }

    let info = HardwareInfo {
        vendor: cpuid.get_vendor_info().map(|v| v.as_str().to_string()),
        brand: cpuid
            .get_processor_brand_string()
            .map(|b| b.as_str().trim().to_string()),
        invariant_tsc: cpuid
            .get_advanced_power_mgmt_info()
            .map(|apm| apm.has_invariant_tsc())
            .unwrap_or(false),
        hypervisor: cpuid
            .get_hypervisor_info()
            .map(|hv| format!("{:?}", hv.identify())),
    };

    debug!(
        vendor = info.vendor.as_deref().unwrap_or("unknown"),
        brand = info.brand.as_deref().unwrap_or("unknown"),
        invariant_tsc = info.invariant_tsc,
        "timestamp counter instructions available"
    );

    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hardware_check_on_host() {
        // Every x86_64 host that can run this suite has rdtsc and SSE2.
        match hardware_check() {
            Ok(info) => assert!(info.vendor.is_some()),
            Err(err) => assert_eq!(err, Error::UnsupportedHardware(MissingFeature::Rdtscp)),
        }
    }

    #[test]
    fn test_warnings_from_info() {
        let info = HardwareInfo {
            vendor: Some("GenuineIntel".to_string()),
            brand: None,
            invariant_tsc: true,
            hypervisor: None,
        };
        assert!(info.warnings().is_empty());

        let info = HardwareInfo {
            invariant_tsc: false,
            hypervisor: Some("KVM".to_string()),
            ..info
        };
        let warnings = info.warnings();
        assert_eq!(warnings.len(), 2);
        assert!(warnings.contains(&HardwareWarning::NonInvariantTsc));
        assert!(warnings[1].description().contains("KVM"));
    }
}

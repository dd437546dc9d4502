//! JSON serialization for overhead reports.

use crate::result::OverheadReport;

/// Serialize a report to a compact JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for OverheadReport).
pub fn to_json(report: &OverheadReport) -> Result<String, serde_json::Error> {
    serde_json::to_string(report)
}

/// Serialize a report to a pretty-printed JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for OverheadReport).
pub fn to_json_pretty(report: &OverheadReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::tests::make_report;

    #[test]
    fn test_to_json() {
        let json = to_json(&make_report()).unwrap();
        assert!(json.contains("\"mean\":42.5"));
        assert!(json.contains("\"quality\":\"Good\""));
        assert!(json.contains("\"start_variant\":\"serializing_before_after\""));
        assert!(!json.contains("\"samples\":["));
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json_pretty(&make_report()).unwrap();
        assert!(json.contains('\n'));
        assert!(json.contains("variance"));
    }
}

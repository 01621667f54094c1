// Water quality classification
use serde::Serialize;

/// Severity tiers, ordered by increasing concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Clean,
    Medium,
    High,
    Alert,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub label: &'static str,
    pub severity: Severity,
}

impl Classification {
    const fn new(label: &'static str, severity: Severity) -> Self {
        Self { label, severity }
    }
}

/// Classify a turbidity percentage. Bounds are exclusive, first match wins.
pub fn classify_turbidity(percent: f64) -> Classification {
    if percent < 10.0 {
        Classification::new("Very Clear Water", Severity::Clean)
    } else if percent < 40.0 {
        Classification::new("Slightly Turbid", Severity::Medium)
    } else if percent < 75.0 {
        Classification::new("Moderately Turbid", Severity::High)
    } else {
        Classification::new("Very Turbid Water", Severity::Alert)
    }
}

/// Classify total dissolved solids in ppm. Bounds are inclusive.
pub fn classify_tds(ppm: f64) -> Classification {
    if ppm <= 100.0 {
        Classification::new("Excellent (Low Mineralization)", Severity::Clean)
    } else if ppm <= 300.0 {
        Classification::new("Acceptable (Potable)", Severity::Medium)
    } else if ppm <= 600.0 {
        Classification::new("High (Not Ideal)", Severity::High)
    } else {
        Classification::new("Very High (Unacceptable)", Severity::Alert)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turbidity_boundaries() {
        assert_eq!(classify_turbidity(9.999).severity, Severity::Clean);
        assert_eq!(classify_turbidity(10.0).severity, Severity::Medium);
        assert_eq!(classify_turbidity(39.9).severity, Severity::Medium);
        assert_eq!(classify_turbidity(40.0).severity, Severity::High);
        assert_eq!(classify_turbidity(74.99).severity, Severity::High);
        assert_eq!(classify_turbidity(75.0).severity, Severity::Alert);
        assert_eq!(classify_turbidity(250.0).severity, Severity::Alert);
    }

    #[test]
    fn test_turbidity_labels() {
        assert_eq!(classify_turbidity(5.0).label, "Very Clear Water");
        assert_eq!(classify_turbidity(20.0).label, "Slightly Turbid");
        assert_eq!(classify_turbidity(50.0).label, "Moderately Turbid");
        assert_eq!(classify_turbidity(90.0).label, "Very Turbid Water");
    }

    #[test]
    fn test_tds_boundaries() {
        assert_eq!(classify_tds(100.0).severity, Severity::Clean);
        assert_eq!(classify_tds(100.01).severity, Severity::Medium);
        assert_eq!(classify_tds(300.0).severity, Severity::Medium);
        assert_eq!(classify_tds(300.5).severity, Severity::High);
        assert_eq!(classify_tds(600.0).severity, Severity::High);
        assert_eq!(classify_tds(600.01).severity, Severity::Alert);
        assert_eq!(classify_tds(600.01).label, "Very High (Unacceptable)");
    }

    #[test]
    fn test_negative_values_fall_into_lowest_tier() {
        assert_eq!(classify_turbidity(-3.0).severity, Severity::Clean);
        assert_eq!(classify_tds(-1.0).severity, Severity::Clean);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Clean < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Alert);
    }

    #[test]
    fn test_serializes_lowercase_severity() {
        let json = serde_json::to_value(classify_tds(50.0)).unwrap();
        assert_eq!(json["severity"], "clean");
        assert_eq!(json["label"], "Excellent (Low Mineralization)");
    }
}

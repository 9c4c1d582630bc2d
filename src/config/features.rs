//! Feature flags configuration

use serde::Deserialize;

/// Feature flags for enabling/disabling functionality
#[derive(Debug, Clone, Deserialize, Default)]
pub struct FeatureFlags {
    /// Mount the diagnostic `POST /test-email` endpoint
    #[serde(default)]
    pub test_email_enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_flags_defaults() {
        let flags = FeatureFlags::default();
        assert!(!flags.test_email_enabled);
    }

    #[test]
    fn test_feature_flags_deserialization() {
        let flags: FeatureFlags = serde_json::from_str(r#"{ "test_email_enabled": true }"#).unwrap();
        assert!(flags.test_email_enabled);

        let flags: FeatureFlags = serde_json::from_str("{}").unwrap();
        assert!(!flags.test_email_enabled);
    }
}

//! Backend identifier resolution.
//!
//! Clients address a backend either by its bare device short-name
//! (`fermions`) or by the fully qualified form
//! `{provider}_{device}_{simulator|hardware}`. Provider names cannot contain
//! underscores, so splitting on `_` is unambiguous: one part is a short name,
//! three parts is a full name, anything else is malformed.

/// A parsed backend identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendName {
    /// Provider short-name; `None` for the bare one-part form, where
    /// provider resolution is deferred to the registry.
    pub provider: Option<String>,
    /// The canonical device short-name.
    pub device: String,
}

impl BackendName {
    /// Parse an opaque backend identifier. Total over arbitrary input:
    /// returns `None` for any token count other than 1 or 3.
    ///
    /// The third part of a full name (the variant) is informational only and
    /// is not validated against the device's actual simulator flag.
    pub fn parse(identifier: &str) -> Option<BackendName> {
        let parts: Vec<&str> = identifier.split('_').collect();
        match parts.as_slice() {
            [device] if !device.is_empty() => Some(BackendName {
                provider: None,
                device: (*device).to_string(),
            }),
            [provider, device, _variant] => Some(BackendName {
                provider: Some((*provider).to_string()),
                device: (*device).to_string(),
            }),
            _ => None,
        }
    }

    /// Fully qualified name for a device, with the variant suffix chosen
    /// from the device's own simulator flag.
    pub fn full_name(provider: &str, device: &str, simulator: bool) -> String {
        if simulator {
            format!("{provider}_{device}_simulator")
        } else {
            format!("{provider}_{device}_hardware")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_name() {
        let name = BackendName::parse("fermions").unwrap();
        assert_eq!(name.provider, None);
        assert_eq!(name.device, "fermions");
    }

    #[test]
    fn test_full_name() {
        let name = BackendName::parse("local1_fermions_simulator").unwrap();
        assert_eq!(name.provider.as_deref(), Some("local1"));
        assert_eq!(name.device, "fermions");
    }

    #[test]
    fn test_variant_not_validated() {
        // "hardware" is accepted even if the device is a simulator; the
        // variant is never checked against the device record here.
        let name = BackendName::parse("local1_fermions_hardware").unwrap();
        assert_eq!(name.device, "fermions");
    }

    #[test]
    fn test_rejects_other_token_counts() {
        assert_eq!(BackendName::parse(""), None);
        assert_eq!(BackendName::parse("a_b"), None);
        assert_eq!(BackendName::parse("a_b_c_d"), None);
        assert_eq!(BackendName::parse("____"), None);
    }

    #[test]
    fn test_full_name_suffix_follows_simulator_flag() {
        assert_eq!(
            BackendName::full_name("local1", "fermions", true),
            "local1_fermions_simulator"
        );
        assert_eq!(
            BackendName::full_name("local1", "fermions", false),
            "local1_fermions_hardware"
        );
    }
}

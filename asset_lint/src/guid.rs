use std::fmt;

pub const GUID_LEN: usize = 32;

/// Prefix reserved for engine built-in assets. References carrying it
/// are never backed by a project sidecar.
pub const BUILTIN_PREFIX: &str = "0000000000000000";

const NULL_GUID: &str = "00000000000000000000000000000000";

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Guid {
    value: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuidError {
    message: String,
}

impl GuidError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for GuidError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for GuidError {}

impl Guid {
    pub fn parse(input: &str) -> Result<Self, GuidError> {
        let trimmed = input.trim();
        if trimmed.len() != GUID_LEN {
            return Err(GuidError::new(format!(
                "guid length {} is not {}",
                trimmed.len(),
                GUID_LEN
            )));
        }
        if !trimmed.chars().all(|ch| ch.is_ascii_hexdigit()) {
            return Err(GuidError::new(format!("guid '{}' is not hex", trimmed)));
        }
        Ok(Self {
            value: trimmed.to_ascii_lowercase(),
        })
    }

    pub fn null() -> Self {
        Self {
            value: NULL_GUID.to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn is_null(&self) -> bool {
        self.value == NULL_GUID
    }

    pub fn is_builtin(&self) -> bool {
        self.value.starts_with(BUILTIN_PREFIX)
    }

    /// A guid that never needs to resolve against the project index:
    /// the null sentinel or an engine built-in.
    pub fn is_ignorable(&self) -> bool {
        self.is_null() || self.is_builtin()
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl fmt::Debug for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Guid({})", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_guid() {
        let guid = Guid::parse("0af04ab0b44f44cb389830a4f54e1df4").unwrap();
        assert_eq!(guid.as_str(), "0af04ab0b44f44cb389830a4f54e1df4");
        assert!(!guid.is_ignorable());
    }

    #[test]
    fn parse_lowercases_input() {
        let guid = Guid::parse("0AF04AB0B44F44CB389830A4F54E1DF4").unwrap();
        assert_eq!(guid.as_str(), "0af04ab0b44f44cb389830a4f54e1df4");
    }

    #[test]
    fn parse_rejects_short_guid() {
        let err = Guid::parse("0af04ab0").unwrap_err();
        assert!(err.to_string().contains("length"));
    }

    #[test]
    fn parse_rejects_non_hex() {
        let err = Guid::parse("zzf04ab0b44f44cb389830a4f54e1df4").unwrap_err();
        assert!(err.to_string().contains("not hex"));
    }

    #[test]
    fn null_guid_is_ignorable() {
        let guid = Guid::parse("00000000000000000000000000000000").unwrap();
        assert!(guid.is_null());
        assert!(guid.is_ignorable());
        assert_eq!(guid, Guid::null());
    }

    #[test]
    fn builtin_prefix_is_ignorable() {
        let guid = Guid::parse("0000000000000000f000000000000000").unwrap();
        assert!(!guid.is_null());
        assert!(guid.is_builtin());
        assert!(guid.is_ignorable());
    }

    #[test]
    fn display_roundtrip() {
        let guid = Guid::parse("deadbeefdeadbeefdeadbeefdeadbeef").unwrap();
        assert_eq!(guid.to_string(), "deadbeefdeadbeefdeadbeefdeadbeef");
    }
}

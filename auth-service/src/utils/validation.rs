use std::collections::BTreeMap;
use validator::ValidationError;

const MAX_HOSTNAME_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

pub const MAX_ATTRIBUTES: usize = 64;
pub const MAX_ATTRIBUTE_KEY_LEN: usize = 128;
pub const MAX_ATTRIBUTE_VALUE_LEN: usize = 1024;

/// RFC 1123 hostname check used by request validation.
pub fn validate_hostname(hostname: &str) -> Result<(), ValidationError> {
    if hostname.is_empty() || hostname.len() > MAX_HOSTNAME_LEN {
        return Err(ValidationError::new("hostname_length"));
    }

    let valid_label = |label: &str| {
        !label.is_empty()
            && label.len() <= MAX_LABEL_LEN
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    };

    if hostname.split('.').all(valid_label) {
        Ok(())
    } else {
        Err(ValidationError::new("hostname_rfc1123"))
    }
}

/// Bounds on identity attribute maps, so every entry fits the canonical
/// length prefix.
pub fn validate_attributes(attributes: &BTreeMap<String, String>) -> Result<(), ValidationError> {
    if attributes.len() > MAX_ATTRIBUTES {
        return Err(ValidationError::new("attributes_count"));
    }

    let oversized = attributes.iter().any(|(key, value)| {
        key.is_empty() || key.len() > MAX_ATTRIBUTE_KEY_LEN || value.len() > MAX_ATTRIBUTE_VALUE_LEN
    });
    if oversized {
        return Err(ValidationError::new("attribute_length"));
    }

    Ok(())
}

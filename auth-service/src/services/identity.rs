//! Device identity derivation.
//!
//! A device UID is the SHA-256 of the "version 1" canonical form of its
//! identity. The layout is fixed; changing it changes every UID in the fleet,
//! so a new layout must get a new version tag.

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

use crate::models::{DeviceIdentity, DeviceUid};

const CANONICAL_V1_TAG: &[u8] = b"device-identity:v1\n";

/// Derive the stable UID for a device identity.
pub fn derive(identity: &DeviceIdentity) -> DeviceUid {
    DeviceUid::from_digest(&Sha256::digest(canonical_bytes(identity)))
}

/// Canonical "version 1" serialization.
///
/// Strings are length-prefixed (u32 big-endian) so no attribute value can be
/// mistaken for a field boundary. Map entries follow key order.
pub fn canonical_bytes(identity: &DeviceIdentity) -> Vec<u8> {
    let mut buf = Vec::with_capacity(128);
    buf.extend_from_slice(CANONICAL_V1_TAG);

    put_str(&mut buf, "hostname");
    put_str(&mut buf, &identity.hostname);
    put_map(&mut buf, "hardware", &identity.hardware);
    put_map(&mut buf, "metadata", &identity.metadata);

    buf
}

/// Request validation bounds every length far below `u32::MAX`; anything
/// larger saturates rather than wrapping into a shorter prefix.
fn put_len(buf: &mut Vec<u8>, len: usize) {
    let len = u32::try_from(len).unwrap_or(u32::MAX);
    buf.extend_from_slice(&len.to_be_bytes());
}

fn put_str(buf: &mut Vec<u8>, value: &str) {
    put_len(buf, value.len());
    buf.extend_from_slice(value.as_bytes());
}

fn put_map(buf: &mut Vec<u8>, section: &str, map: &BTreeMap<String, String>) {
    put_str(buf, section);
    put_len(buf, map.len());
    for (key, value) in map {
        put_str(buf, key);
        put_str(buf, value);
    }
}

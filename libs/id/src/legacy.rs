//! Bridging legacy (V0) resource tokens into the current ID space.
//!
//! Records migrated from the legacy system keep their V0 identifiers. Their
//! current resource IDs are name-based (v5) UUIDs derived from the legacy
//! token, so the mapping must never change.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use uuid::Uuid;

use crate::error::{ArkError, ArkResult};

/// Organization URL hashed under the URL namespace to obtain the
/// migration namespace (`cace8b00-717e-50d5-bcb9-486f39d733a2`).
pub const MIGRATION_NAMESPACE_URL: &str = "https://dasch.swiss";

/// Factor the legacy system multiplied its sequential resource numbers by.
pub const RESOURCE_INT_ID_FACTOR: u128 = 982_451_653;

/// Returns the namespace UUID used for migrated resource IDs.
#[must_use]
pub fn migration_namespace() -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, MIGRATION_NAMESPACE_URL.as_bytes())
}

/// Derives the base64url resource ID of a migrated legacy record.
///
/// The 16 UUID bytes encode to 22 symbols plus a fixed `==` padding, which
/// is left off.
#[must_use]
pub fn legacy_resource_uuid(token: &str) -> String {
    let uuid = Uuid::new_v5(&migration_namespace(), token.as_bytes());
    URL_SAFE_NO_PAD.encode(uuid.as_bytes())
}

/// Recovers the legacy system's sequential resource number from a
/// hexadecimal resource ID: `hex / 982451653 - 1`.
pub fn legacy_resource_number(resource_id: &str) -> ArkResult<u128> {
    let invalid = || ArkError::InvalidResourceId {
        resource_id: resource_id.to_string(),
    };

    // from_str_radix tolerates a leading sign; the legacy format does not.
    if resource_id.is_empty() || !resource_id.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let encoded = u128::from_str_radix(resource_id, 16).map_err(|_| invalid())?;

    (encoded / RESOURCE_INT_ID_FACTOR)
        .checked_sub(1)
        .ok_or_else(invalid)
}

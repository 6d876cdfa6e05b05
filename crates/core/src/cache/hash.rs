//! Cache key generation for stored responses.

use sha2::{Digest, Sha256};

/// Compute the lookup key for a stored response.
///
/// The method is upper-cased; the URL is expected to be fragment-free.
pub fn compute_entry_key(method: &str, url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(method.to_ascii_uppercase().as_bytes());
    hasher.update(b"\n");
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}

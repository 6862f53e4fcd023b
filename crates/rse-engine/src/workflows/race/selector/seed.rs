use sha2::{Digest, Sha256};

use crate::config::normalize_key;

/// Stable textual key hashed into the audit seed. Venue and discipline are
/// trimmed and lowercased so `Vincennes` and `vincennes` seed alike.
pub fn seed_key(source_id: &str, venue: &str, discipline: &str, schema_ids: &[u32]) -> String {
    let venue = normalize_key(venue);
    let discipline = normalize_key(discipline);
    let ids = schema_ids
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(",");
    format!("{source_id}|{venue}|{discipline}|{ids}")
}

/// First eight bytes of the SHA-256 digest of the key, read big-endian.
pub fn derive_seed(source_id: &str, venue: &str, discipline: &str, schema_ids: &[u32]) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(seed_key(source_id, venue, discipline, schema_ids).as_bytes());
    let digest = hasher.finalize();

    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(prefix)
}

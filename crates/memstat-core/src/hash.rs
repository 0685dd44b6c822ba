//! Stable hashing for symbol text.
//!
//! Symbol hashes must not depend on process-random state so that identity
//! hashes (xor of the three symbol hashes) are reproducible across runs.

use blake3::Hasher;

/// 32-bit stable hash: first four bytes of the BLAKE3 digest, little endian.
pub fn hash_str(s: &str) -> u32 {
    let mut h = Hasher::new();
    h.update(s.as_bytes());
    let out = h.finalize();
    let bytes = out.as_bytes();
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

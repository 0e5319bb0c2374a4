//! Identifier entropy.

use rand::Rng;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// A lowercase base-36 string of `len` characters drawn from the OS RNG.
///
/// Each character carries log2(36) ≈ 5.17 bits, so 8 characters give just
/// over 41 bits.
pub fn random_base36(len: usize) -> String {
    let mut rng = rand::rngs::OsRng;
    (0..len)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}

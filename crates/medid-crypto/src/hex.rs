//! Lowercase hex codec for key and signature transport.

use crate::error::CryptoError;

/// Encode bytes as lowercase hex.
pub fn encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Decode a hex string of known length into a fixed-size array.
///
/// Upper-case digits and surrounding whitespace are accepted.
pub fn decode_fixed<const N: usize>(hex: &str) -> Result<[u8; N], CryptoError> {
    let hex = hex.trim();
    if hex.len() != N * 2 {
        return Err(CryptoError::Hex(format!(
            "expected {} hex chars, got {}",
            N * 2,
            hex.len()
        )));
    }
    let mut out = [0u8; N];
    for (i, slot) in out.iter_mut().enumerate() {
        let pair = hex
            .get(i * 2..i * 2 + 2)
            .ok_or_else(|| CryptoError::Hex(format!("non-ascii input at position {}", i * 2)))?;
        *slot = u8::from_str_radix(pair, 16)
            .map_err(|e| CryptoError::Hex(format!("invalid hex at position {}: {e}", i * 2)))?;
    }
    Ok(out)
}

/// First four bytes as hex, for redacted `Debug` output.
pub(crate) fn prefix(bytes: &[u8]) -> String {
    encode(&bytes[..bytes.len().min(4)])
}

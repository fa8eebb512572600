//! Base58Check: the varint-free, checksum-appended encoding used by WIF
//! private keys and legacy addresses.

use crate::error::Error;
use crate::hash::hash256;

/// Append a 4-byte `hash256` checksum and Base58-encode.
#[must_use]
pub fn encode_check(payload: &[u8]) -> String {
    let checksum = hash256(payload);
    let mut buf = Vec::with_capacity(payload.len() + 4);
    buf.extend_from_slice(payload);
    buf.extend_from_slice(&checksum[..4]);
    bs58::encode(buf).into_string()
}

/// Decode and verify the checksum, returning the payload without it.
pub fn decode_check(s: &str) -> Result<Vec<u8>, Error> {
    let data = bs58::decode(s)
        .into_vec()
        .map_err(|e| Error::value(format!("invalid base58: {e}")))?;
    if data.len() < 4 {
        return Err(Error::value("base58check payload too short"));
    }
    let (payload, checksum) = data.split_at(data.len() - 4);
    let expected = hash256(payload);
    if checksum != &expected[..4] {
        return Err(Error::value("base58check checksum mismatch"));
    }
    Ok(payload.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let payload = b"hello bitcoin";
        let encoded = encode_check(payload);
        let decoded = decode_check(&encoded).unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn rejects_corrupted_checksum() {
        let mut encoded = encode_check(b"payload");
        encoded.push('1');
        assert!(decode_check(&encoded).is_err());
    }
}

//! BIP-66 strict DER encoding for ECDSA `(r, s)` signature pairs.
//!
//! Bitcoin consensus rejects DER signatures that are merely "decodable" —
//! it additionally rejects non-minimal integer lengths, extra padding, and
//! trailing bytes. [`decode_strict`] enforces exactly those rules rather
//! than a general-purpose DER parser's more permissive grammar.

use crate::curve::secp256k1;
use crate::error::Error;
use crate::num::U256;

/// Minimal big-endian DER INTEGER encoding of `v`: no leading zero bytes
/// except the one needed to keep the value non-negative (DER integers are
/// signed two's complement).
fn encode_integer(v: &U256) -> Vec<u8> {
    let bytes = v.to_be_bytes();
    let mut start = 0;
    while start < 31 && bytes[start] == 0 {
        start += 1;
    }
    let mut body = bytes[start..].to_vec();
    if body.is_empty() {
        body.push(0);
    }
    if body[0] & 0x80 != 0 {
        body.insert(0, 0x00);
    }
    body
}

fn wrap_integer(body: &[u8]) -> Vec<u8> {
    let mut out = vec![0x02, body.len() as u8];
    out.extend_from_slice(body);
    out
}

/// Encode `(r, s)` as a strict DER `SEQUENCE { INTEGER r, INTEGER s }`.
#[must_use]
pub fn encode(r: &U256, s: &U256) -> Vec<u8> {
    let r_body = wrap_integer(&encode_integer(r));
    let s_body = wrap_integer(&encode_integer(s));
    let mut out = Vec::with_capacity(2 + r_body.len() + s_body.len());
    out.push(0x30);
    out.push((r_body.len() + s_body.len()) as u8);
    out.extend_from_slice(&r_body);
    out.extend_from_slice(&s_body);
    out
}

/// Parse a DER signature under BIP-66's strict rules, rejecting anything a
/// general-purpose DER parser would accept but Bitcoin consensus wouldn't:
/// wrong tags, non-minimal lengths, excess leading zero bytes, negative
/// integers, or trailing data after the sequence. Also enforces the scalar
/// range `r, s ∈ [1, n−1]` and the low-s form `s ≤ n/2`.
pub fn decode_strict(sig: &[u8]) -> Result<(U256, U256), Error> {
    if sig.len() < 9 || sig.len() > 73 {
        return Err(Error::value("DER signature length out of range"));
    }
    if sig[0] != 0x30 {
        return Err(Error::value("DER signature must start with a SEQUENCE tag"));
    }
    let total_len = sig[1] as usize;
    if total_len != sig.len() - 2 {
        return Err(Error::value("DER sequence length does not match buffer"));
    }

    let mut pos = 2;
    let (r, r_len) = parse_integer(sig, pos)?;
    pos += r_len;
    let (s, s_len) = parse_integer(sig, pos)?;
    pos += s_len;

    if pos != sig.len() {
        return Err(Error::value("trailing bytes after DER signature"));
    }

    let curve = secp256k1();
    if r.is_zero() || r >= curve.n {
        return Err(Error::value("DER signature r is outside [1, n-1]"));
    }
    if s.is_zero() || s >= curve.n {
        return Err(Error::value("DER signature s is outside [1, n-1]"));
    }
    if s > curve.n.shr1() {
        return Err(Error::value("DER signature s is not in low-s form"));
    }

    Ok((r, s))
}

/// Parse a DER signature that may carry a trailing sighash-type byte, as
/// found in a transaction's `scriptSig`/witness or a PSBT partial signature
/// value (`DER signature ‖ sighash byte`). Returns the parsed `(r, s)` along
/// with the sighash byte.
pub fn decode_with_sighash(sig: &[u8]) -> Result<((U256, U256), u8), Error> {
    let (sighash, der_bytes) = sig
        .split_last()
        .ok_or_else(|| Error::value("signature with sighash byte is empty"))?;
    let pair = decode_strict(der_bytes)?;
    Ok((pair, *sighash))
}

/// Parse one `INTEGER` TLV at `sig[offset..]`, returning the value and the
/// number of bytes consumed (tag + length + body).
fn parse_integer(sig: &[u8], offset: usize) -> Result<(U256, usize), Error> {
    if offset + 2 > sig.len() {
        return Err(Error::value("DER integer header truncated"));
    }
    if sig[offset] != 0x02 {
        return Err(Error::value("expected DER INTEGER tag"));
    }
    let len = sig[offset + 1] as usize;
    if len == 0 {
        return Err(Error::value("DER integer must not be empty"));
    }
    let start = offset + 2;
    let end = start
        .checked_add(len)
        .filter(|&e| e <= sig.len())
        .ok_or_else(|| Error::value("DER integer length exceeds buffer"))?;
    let body = &sig[start..end];

    if body[0] & 0x80 != 0 {
        return Err(Error::value("DER integer must not be negative"));
    }
    if body.len() > 1 && body[0] == 0x00 && body[1] & 0x80 == 0 {
        return Err(Error::value("DER integer has a non-minimal leading zero byte"));
    }
    if body.len() > 33 {
        return Err(Error::value("DER integer is wider than a secp256k1 scalar"));
    }

    let mut padded = [0u8; 32];
    padded[32 - body.len().min(32)..].copy_from_slice(&body[body.len().saturating_sub(32)..]);
    if body.len() == 33 && body[0] != 0x00 {
        return Err(Error::value("DER integer does not fit in 256 bits"));
    }

    Ok((U256::from_be_bytes(&padded), 2 + len))
}

//! Script token encoding and output-script (`scriptPubKey`) classification.
//!
//! This module covers exactly the handful of standard output templates a
//! transaction codec needs to recognize and build — it is not a script
//! interpreter.

use crate::encode::{Reader, write_varint};
use crate::error::Error;

pub const OP_0: u8 = 0x00;
pub const OP_PUSHDATA1: u8 = 0x4c;
pub const OP_PUSHDATA2: u8 = 0x4d;
pub const OP_PUSHDATA4: u8 = 0x4e;
pub const OP_1NEGATE: u8 = 0x4f;
pub const OP_1: u8 = 0x51;
pub const OP_16: u8 = 0x60;
pub const OP_RETURN: u8 = 0x6a;
pub const OP_DUP: u8 = 0x76;
pub const OP_EQUAL: u8 = 0x87;
pub const OP_EQUALVERIFY: u8 = 0x88;
pub const OP_HASH160: u8 = 0xa9;
pub const OP_CHECKSIG: u8 = 0xac;
pub const OP_CHECKMULTISIG: u8 = 0xae;

pub const SIGHASH_ALL: u32 = 0x01;
pub const SIGHASH_NONE: u32 = 0x02;
pub const SIGHASH_SINGLE: u32 = 0x03;
pub const SIGHASH_ANYONECANPAY: u32 = 0x80;

/// The complete set of standard sighash type bytes: the three base types,
/// each optionally combined with `ANYONECANPAY`.
pub fn is_valid_sighash(sighash: u32) -> bool {
    matches!(
        sighash,
        SIGHASH_ALL
            | SIGHASH_NONE
            | SIGHASH_SINGLE
            | SIGHASH_ALL_ANYONECANPAY
            | SIGHASH_NONE_ANYONECANPAY
            | SIGHASH_SINGLE_ANYONECANPAY
    )
}

const SIGHASH_ALL_ANYONECANPAY: u32 = SIGHASH_ALL | SIGHASH_ANYONECANPAY;
const SIGHASH_NONE_ANYONECANPAY: u32 = SIGHASH_NONE | SIGHASH_ANYONECANPAY;
const SIGHASH_SINGLE_ANYONECANPAY: u32 = SIGHASH_SINGLE | SIGHASH_ANYONECANPAY;

/// Append the canonical minimal-push encoding of `data` to `out`.
pub fn push_bytes(out: &mut Vec<u8>, data: &[u8]) {
    let len = data.len();
    if len < OP_PUSHDATA1 as usize {
        out.push(len as u8);
    } else if len <= u8::MAX as usize {
        out.push(OP_PUSHDATA1);
        out.push(len as u8);
    } else if len <= u16::MAX as usize {
        out.push(OP_PUSHDATA2);
        out.extend_from_slice(&(len as u16).to_le_bytes());
    } else {
        out.push(OP_PUSHDATA4);
        out.extend_from_slice(&(len as u32).to_le_bytes());
    }
    out.extend_from_slice(data);
}

/// Encode the small-integer opcode for `n` (`OP_0`, `OP_1`..`OP_16`), the
/// form multisig `m`-of-`n` thresholds are always expressed in.
fn small_int_opcode(n: u8) -> Result<u8, Error> {
    match n {
        0 => Ok(OP_0),
        1..=16 => Ok(OP_1 + (n - 1)),
        _ => Err(Error::value("small integer out of OP_0..OP_16 range")),
    }
}

fn decode_small_int(opcode: u8) -> Option<u8> {
    match opcode {
        OP_0 => Some(0),
        OP_1..=OP_16 => Some(opcode - OP_1 + 1),
        _ => None,
    }
}

/// Encode a small integer in `-1..=16` as its opcode (`OP_1NEGATE`, `OP_0`,
/// or `OP_1`..`OP_16`).
pub fn encode_small_int(n: i8) -> Result<u8, Error> {
    match n {
        -1 => Ok(OP_1NEGATE),
        0 => Ok(OP_0),
        1..=16 => Ok(OP_1 + (n as u8 - 1)),
        _ => Err(Error::value("small integer out of -1..16 range")),
    }
}

fn decode_small_int_opcode(opcode: u8) -> Option<i8> {
    match opcode {
        OP_1NEGATE => Some(-1),
        OP_0 => Some(0),
        OP_1..=OP_16 => Some((opcode - OP_1 + 1) as i8),
        _ => None,
    }
}

/// A single token of a general script: a named opcode, a small integer
/// pushed via its dedicated opcode, or a byte-string literal pushed with
/// the minimal `OP_PUSHBYTES_n`/`OP_PUSHDATA1`/`2`/`4` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Op(u8),
    SmallInt(i8),
    Bytes(Vec<u8>),
}

/// Encode a sequence of tokens into script bytes.
pub fn encode_tokens(tokens: &[Token]) -> Result<Vec<u8>, Error> {
    let mut out = Vec::new();
    for token in tokens {
        match token {
            Token::Op(code) => out.push(*code),
            Token::SmallInt(n) => out.push(encode_small_int(*n)?),
            Token::Bytes(data) => push_bytes(&mut out, data),
        }
    }
    Ok(out)
}

/// Decode script bytes into their token sequence: the inverse of
/// [`encode_tokens`].
pub fn decode_tokens(script: &[u8]) -> Result<Vec<Token>, Error> {
    let mut reader = Reader::new(script);
    let mut tokens = Vec::new();
    while !reader.is_empty() {
        let op = reader.read_u8()?;
        if let Some(n) = decode_small_int_opcode(op) {
            tokens.push(Token::SmallInt(n));
            continue;
        }
        let len = match op {
            1..=0x4b => op as usize,
            OP_PUSHDATA1 => reader.read_u8()? as usize,
            OP_PUSHDATA2 => reader.read_u16_le()? as usize,
            OP_PUSHDATA4 => reader.read_u32_le()? as usize,
            _ => {
                tokens.push(Token::Op(op));
                continue;
            }
        };
        tokens.push(Token::Bytes(reader.read_bytes(len)?.to_vec()));
    }
    Ok(tokens)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptPayload {
    P2pk(Vec<u8>),
    P2pkh([u8; 20]),
    P2sh([u8; 20]),
    P2ms { m: u8, pubkeys: Vec<Vec<u8>> },
    P2wpkh([u8; 20]),
    P2wsh([u8; 32]),
    NullData(Vec<u8>),
    NonStandard,
}

#[must_use]
pub fn p2pkh_script(hash: &[u8; 20]) -> Vec<u8> {
    let mut out = vec![OP_DUP, OP_HASH160];
    push_bytes(&mut out, hash);
    out.push(OP_EQUALVERIFY);
    out.push(OP_CHECKSIG);
    out
}

#[must_use]
pub fn p2sh_script(hash: &[u8; 20]) -> Vec<u8> {
    let mut out = vec![OP_HASH160];
    push_bytes(&mut out, hash);
    out.push(OP_EQUAL);
    out
}

#[must_use]
pub fn p2wpkh_script(hash: &[u8; 20]) -> Vec<u8> {
    let mut out = vec![OP_0];
    push_bytes(&mut out, hash);
    out
}

#[must_use]
pub fn p2wsh_script(hash: &[u8; 32]) -> Vec<u8> {
    let mut out = vec![OP_0];
    push_bytes(&mut out, hash);
    out
}

#[must_use]
pub fn p2pk_script(pubkey: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    push_bytes(&mut out, pubkey);
    out.push(OP_CHECKSIG);
    out
}

pub const NULLDATA_MAX_LEN: usize = 80;

pub fn nulldata_script(data: &[u8]) -> Result<Vec<u8>, Error> {
    if data.len() > NULLDATA_MAX_LEN {
        return Err(Error::value("nulldata payload exceeds 80 bytes"));
    }
    let mut out = vec![OP_RETURN];
    push_bytes(&mut out, data);
    Ok(out)
}

/// BIP-67 lexicographically sorts the pubkeys, then builds an
/// `m`-of-`pubkeys.len()` `CHECKMULTISIG` script.
pub fn multisig_script(m: u8, pubkeys: &[Vec<u8>]) -> Result<Vec<u8>, Error> {
    if pubkeys.is_empty() || pubkeys.len() > 16 || m == 0 || m as usize > pubkeys.len() {
        return Err(Error::value("invalid multisig threshold or pubkey count"));
    }
    let mut sorted = pubkeys.to_vec();
    sorted.sort();

    let mut out = vec![small_int_opcode(m)?];
    for pk in &sorted {
        push_bytes(&mut out, pk);
    }
    out.push(small_int_opcode(sorted.len() as u8)?);
    out.push(OP_CHECKMULTISIG);
    Ok(out)
}

/// Recognize one of the standard output templates, falling back to
/// [`ScriptPayload::NonStandard`] for anything else.
#[must_use]
pub fn classify(script: &[u8]) -> ScriptPayload {
    if let Some(hash) = match_p2pkh(script) {
        return ScriptPayload::P2pkh(hash);
    }
    if let Some(hash) = match_p2sh(script) {
        return ScriptPayload::P2sh(hash);
    }
    if let Some(hash) = match_witness_program(script, 20) {
        let mut arr = [0u8; 20];
        arr.copy_from_slice(&hash);
        return ScriptPayload::P2wpkh(arr);
    }
    if let Some(hash) = match_witness_program(script, 32) {
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&hash);
        return ScriptPayload::P2wsh(arr);
    }
    if let Some(pk) = match_p2pk(script) {
        return ScriptPayload::P2pk(pk);
    }
    if let Some((m, pubkeys)) = match_multisig(script) {
        return ScriptPayload::P2ms { m, pubkeys };
    }
    if let Some(data) = match_nulldata(script) {
        return ScriptPayload::NullData(data);
    }
    tracing::trace!(len = script.len(), "script did not match any standard template");
    ScriptPayload::NonStandard
}

fn match_p2pkh(script: &[u8]) -> Option<[u8; 20]> {
    if script.len() == 25
        && script[0] == OP_DUP
        && script[1] == OP_HASH160
        && script[2] == 20
        && script[23] == OP_EQUALVERIFY
        && script[24] == OP_CHECKSIG
    {
        let mut out = [0u8; 20];
        out.copy_from_slice(&script[3..23]);
        Some(out)
    } else {
        None
    }
}

fn match_p2sh(script: &[u8]) -> Option<[u8; 20]> {
    if script.len() == 23 && script[0] == OP_HASH160 && script[1] == 20 && script[22] == OP_EQUAL {
        let mut out = [0u8; 20];
        out.copy_from_slice(&script[2..22]);
        Some(out)
    } else {
        None
    }
}

fn match_witness_program(script: &[u8], len: usize) -> Option<Vec<u8>> {
    if script.len() == 2 + len && script[0] == OP_0 && script[1] as usize == len {
        Some(script[2..].to_vec())
    } else {
        None
    }
}

fn match_p2pk(script: &[u8]) -> Option<Vec<u8>> {
    let last = *script.last()?;
    if last != OP_CHECKSIG {
        return None;
    }
    let body = &script[..script.len() - 1];
    match body.first()? {
        33 if body.len() == 34 => Some(body[1..].to_vec()),
        65 if body.len() == 66 => Some(body[1..].to_vec()),
        _ => None,
    }
}

fn match_multisig(script: &[u8]) -> Option<(u8, Vec<Vec<u8>>)> {
    if script.len() < 3 {
        return None;
    }
    let m = decode_small_int(script[0])?;
    if *script.last()? != OP_CHECKMULTISIG {
        return None;
    }
    let n = decode_small_int(script[script.len() - 2])?;
    let mut reader = Reader::new(&script[1..script.len() - 2]);
    let mut pubkeys = Vec::new();
    while !reader.is_empty() {
        let len = reader.read_u8().ok()? as usize;
        pubkeys.push(reader.read_bytes(len).ok()?.to_vec());
    }
    if pubkeys.len() != n as usize || m == 0 || m > n {
        return None;
    }
    Some((m, pubkeys))
}

fn match_nulldata(script: &[u8]) -> Option<Vec<u8>> {
    if script.first()? != &OP_RETURN {
        return None;
    }
    let rest = &script[1..];
    if rest.is_empty() {
        return Some(Vec::new());
    }
    let tokens = decode_tokens(rest).ok()?;
    match tokens.as_slice() {
        [Token::Bytes(data)] if data.len() <= NULLDATA_MAX_LEN => Some(data.clone()),
        _ => None,
    }
}

/// Write a script as a var-bytes field into a transaction buffer.
pub fn write_script(out: &mut Vec<u8>, script: &[u8]) {
    write_varint(out, script.len() as u64);
    out.extend_from_slice(script);
}

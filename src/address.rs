//! Address encoding: Base58Check for legacy P2PKH/P2SH, Bech32/Bech32m
//! (BIP-173, BIP-350) for witness programs.

use bech32::Fe32;

use crate::base58;
use crate::error::Error;
use crate::keys::Network;
use crate::script::ScriptPayload;

/// Encode a recognized output payload as a human-readable address.
pub fn encode(payload: &ScriptPayload, network: Network) -> Result<String, Error> {
    match payload {
        ScriptPayload::P2pkh(hash) => Ok(encode_base58check(network.p2pkh_prefix(), hash)),
        ScriptPayload::P2sh(hash) => Ok(encode_base58check(network.p2sh_prefix(), hash)),
        ScriptPayload::P2wpkh(hash) => encode_witness(network, 0, hash),
        ScriptPayload::P2wsh(hash) => encode_witness(network, 0, hash),
        _ => Err(Error::type_("payload does not have a standard address form")),
    }
}

fn encode_base58check(prefix: u8, hash: &[u8]) -> String {
    let mut payload = Vec::with_capacity(1 + hash.len());
    payload.push(prefix);
    payload.extend_from_slice(hash);
    base58::encode_check(&payload)
}

fn encode_witness(network: Network, version: u8, program: &[u8]) -> Result<String, Error> {
    let hrp = bech32::Hrp::parse(network.bech32_hrp())
        .map_err(|e| Error::runtime(format!("invalid hrp constant: {e}")))?;
    let fe = Fe32::try_from(version).map_err(|_| Error::value("witness version out of range"))?;
    bech32::segwit::encode(hrp, fe, program).map_err(|e| Error::value(format!("bech32 encoding failed: {e}")))
}

/// The decoded form of an address: enough to rebuild its `scriptPubKey`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedAddress {
    P2pkh([u8; 20]),
    P2sh([u8; 20]),
    Witness { version: u8, program: Vec<u8> },
}

/// Parse an address, trying Base58Check first and falling back to Bech32/m.
/// Returns the decoded payload along with the network it was encoded for.
pub fn decode(address: &str) -> Result<(DecodedAddress, Network), Error> {
    if let Ok(payload) = base58::decode_check(address) {
        if payload.len() != 21 {
            return Err(Error::value("base58check address payload has the wrong length"));
        }
        let network = network_for_base58_prefix(payload[0])?;
        let mut hash = [0u8; 20];
        hash.copy_from_slice(&payload[1..]);
        let decoded = if payload[0] == Network::Mainnet.p2pkh_prefix() || payload[0] == Network::Testnet.p2pkh_prefix() {
            DecodedAddress::P2pkh(hash)
        } else {
            DecodedAddress::P2sh(hash)
        };
        return Ok((decoded, network));
    }

    let (hrp, fe, program) = bech32::segwit::decode(address).map_err(|e| Error::value(format!("not a valid address: {e}")))?;
    let network = network_for_hrp(hrp.as_str())?;
    Ok((
        DecodedAddress::Witness {
            version: fe.to_u8(),
            program,
        },
        network,
    ))
}

fn network_for_base58_prefix(prefix: u8) -> Result<Network, Error> {
    match prefix {
        p if p == Network::Mainnet.p2pkh_prefix() || p == Network::Mainnet.p2sh_prefix() => Ok(Network::Mainnet),
        p if p == Network::Testnet.p2pkh_prefix() || p == Network::Testnet.p2sh_prefix() => Ok(Network::Testnet),
        other => Err(Error::value(format!("unrecognized address version byte {other:#04x}"))),
    }
}

fn network_for_hrp(hrp: &str) -> Result<Network, Error> {
    match hrp {
        "bc" => Ok(Network::Mainnet),
        "tb" => Ok(Network::Testnet),
        other => Err(Error::value(format!("unrecognized bech32 hrp {other:?}"))),
    }
}

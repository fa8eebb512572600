//! Concrete address vectors, independent of this crate's own encoder: these
//! hex/address pairs are fixed Bitcoin mainnet test vectors, not round-trips
//! through our own code.

use hex_literal::hex;
use txforge::address::{decode, encode, DecodedAddress};
use txforge::keys::Network;
use txforge::script::{classify, p2pkh_script, p2sh_script, ScriptPayload};

#[test]
fn p2pkh_vector_matches_known_address() {
    let hash: [u8; 20] = hex!("12ab8dc588ca9d5787dde7eb29569da63c3a238c");
    let script = p2pkh_script(&hash);
    assert_eq!(hex::encode(&script), "76a91412ab8dc588ca9d5787dde7eb29569da63c3a238c88ac");
    assert_eq!(classify(&script), ScriptPayload::P2pkh(hash));

    let address = encode(&ScriptPayload::P2pkh(hash), Network::Mainnet).unwrap();
    assert_eq!(address, "12higDjoCCNXSA95xZMWUdPvXNmkAduhWv");

    let (decoded, network) = decode(&address).unwrap();
    assert_eq!(decoded, DecodedAddress::P2pkh(hash));
    assert_eq!(network, Network::Mainnet);
}

#[test]
fn p2sh_vector_matches_known_address() {
    let hash: [u8; 20] = hex!("748284390f9e263a4b766a75d0633c50426eb875");
    let script = p2sh_script(&hash);
    assert_eq!(hex::encode(&script), "a914748284390f9e263a4b766a75d0633c50426eb87587");
    assert_eq!(classify(&script), ScriptPayload::P2sh(hash));

    let address = encode(&ScriptPayload::P2sh(hash), Network::Mainnet).unwrap();
    assert_eq!(address, "3CK4fEwbMP7heJarmU4eqA3sMbVJyEnU3V");

    let (decoded, network) = decode(&address).unwrap();
    assert_eq!(decoded, DecodedAddress::P2sh(hash));
    assert_eq!(network, Network::Mainnet);
}

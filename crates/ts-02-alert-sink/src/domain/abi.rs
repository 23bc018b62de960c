//! Contract ABI encoding for the alert call.
//!
//! Only the one function the app calls is supported:
//! `Alert(string message, address user, int256 latitude, int256 longitude)`.

use sha3::{Digest, Keccak256};
use shared_types::WalletAddress;

/// Canonical signature of the alert function.
pub const ALERT_SIGNATURE: &str = "Alert(string,address,int256,int256)";

const WORD: usize = 32;

/// First four bytes of the keccak-256 hash of a function signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = Keccak256::digest(signature.as_bytes());
    let mut out = [0u8; 4];
    out.copy_from_slice(&hash[..4]);
    out
}

fn uint_word(value: u64) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[WORD - 8..].copy_from_slice(&value.to_be_bytes());
    word
}

/// Two's complement, sign-extended to 256 bits.
fn int_word(value: i64) -> [u8; WORD] {
    let fill = if value < 0 { 0xff } else { 0x00 };
    let mut word = [fill; WORD];
    word[WORD - 8..].copy_from_slice(&value.to_be_bytes());
    word
}

fn address_word(address: &WalletAddress) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[WORD - 20..].copy_from_slice(address.as_bytes());
    word
}

/// Calldata for `Alert(message, user, latitude, longitude)`.
pub fn encode_alert_call(
    message: &str,
    user: &WalletAddress,
    latitude: i64,
    longitude: i64,
) -> Vec<u8> {
    let bytes = message.as_bytes();
    let padded_len = bytes.len().div_ceil(WORD) * WORD;

    let mut data = Vec::with_capacity(4 + 5 * WORD + padded_len);
    data.extend_from_slice(&selector(ALERT_SIGNATURE));

    // Head: dynamic string offset, then the static arguments.
    data.extend_from_slice(&uint_word((4 * WORD) as u64));
    data.extend_from_slice(&address_word(user));
    data.extend_from_slice(&int_word(latitude));
    data.extend_from_slice(&int_word(longitude));

    // Tail: string length and right-padded bytes.
    data.extend_from_slice(&uint_word(bytes.len() as u64));
    data.extend_from_slice(bytes);
    data.resize(data.len() + (padded_len - bytes.len()), 0);

    data
}

/// `0x`-prefixed hex of calldata, as JSON-RPC expects.
pub fn to_hex_data(data: &[u8]) -> String {
    format!("0x{}", hex::encode(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> WalletAddress {
        "0x00000000000000000000000000000000000000aa".parse().unwrap()
    }

    #[test]
    fn test_known_selector() {
        assert_eq!(hex::encode(selector("transfer(address,uint256)")), "a9059cbb");
    }

    #[test]
    fn test_layout() {
        let data = encode_alert_call("hello", &user(), 23, 72);
        assert_eq!(data.len(), 4 + 6 * WORD);
        assert_eq!(&data[..4], &selector(ALERT_SIGNATURE));

        let word = |i: usize| &data[4 + i * WORD..4 + (i + 1) * WORD];
        assert_eq!(word(0), &uint_word(128));
        assert_eq!(word(1)[31], 0xaa);
        assert_eq!(word(2), &uint_word(23));
        assert_eq!(word(3), &uint_word(72));
        assert_eq!(word(4), &uint_word(5));
        assert_eq!(&word(5)[..5], b"hello");
        assert!(word(5)[5..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_negative_coordinates_sign_extend() {
        let data = encode_alert_call("", &user(), -1, -33);
        let lat = &data[4 + 2 * WORD..4 + 3 * WORD];
        assert!(lat.iter().all(|b| *b == 0xff));
        let lon = &data[4 + 3 * WORD..4 + 4 * WORD];
        assert_eq!(lon[31], 0xdf);
        assert_eq!(lon[0], 0xff);
        // Empty string: length word only, no data words.
        assert_eq!(data.len(), 4 + 5 * WORD);
    }

    #[test]
    fn test_exact_word_message_not_overpadded() {
        let msg = "a".repeat(32);
        let data = encode_alert_call(&msg, &user(), 0, 0);
        assert_eq!(data.len(), 4 + 6 * WORD);
    }

    #[test]
    fn test_hex_data() {
        assert_eq!(to_hex_data(&[0xde, 0xad]), "0xdead");
    }
}

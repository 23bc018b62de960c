//! Contract log decoding.
//!
//! Both events carry every argument in the log data (none are indexed), so
//! `topics[0]` selects the event and the data is a plain ABI tuple:
//!
//! ```text
//! ZoneAlert(string,string,int256,int256,uint256,uint256)
//! AlertEvent(address,string,string,string,string,string,string,int256,int256,uint256)
//! ```
//!
//! Integers are narrowed to 64 bits; a value that does not fit rejects the
//! whole log.

use sha3::{Digest, Keccak256};
use shared_types::WalletAddress;

use super::events::{ChainEvent, UserAlertLog, ZoneAlertLog};
use crate::error::{FeedError, FeedResult};

pub const ZONE_ALERT_SIGNATURE: &str = "ZoneAlert(string,string,int256,int256,uint256,uint256)";

pub const USER_ALERT_SIGNATURE: &str =
    "AlertEvent(address,string,string,string,string,string,string,int256,int256,uint256)";

const WORD: usize = 32;

/// Keccak-256 of an event signature, as it appears in `topics[0]`.
pub fn event_topic(signature: &str) -> [u8; WORD] {
    let mut topic = [0u8; WORD];
    topic.copy_from_slice(&Keccak256::digest(signature.as_bytes()));
    topic
}

/// `0x`-prefixed topic hash for JSON-RPC filters.
pub fn event_topic_hex(signature: &str) -> String {
    format!("0x{}", hex::encode(event_topic(signature)))
}

fn malformed(reason: impl Into<String>) -> FeedError {
    FeedError::MalformedLog(reason.into())
}

/// Word-addressed view over ABI-encoded log data.
struct Tuple<'a> {
    data: &'a [u8],
}

impl<'a> Tuple<'a> {
    fn word_at(&self, offset: usize) -> FeedResult<&'a [u8]> {
        offset
            .checked_add(WORD)
            .and_then(|end| self.data.get(offset..end))
            .ok_or_else(|| malformed(format!("data too short for word at byte {offset}")))
    }

    fn head(&self, index: usize) -> FeedResult<&'a [u8]> {
        self.word_at(index * WORD)
    }

    fn uint(&self, index: usize) -> FeedResult<u64> {
        word_to_u64(self.head(index)?)
    }

    fn int(&self, index: usize) -> FeedResult<i64> {
        let word = self.head(index)?;
        let negative = word[WORD - 8] & 0x80 != 0;
        let fill = if negative { 0xff } else { 0x00 };
        if word[..WORD - 8].iter().any(|b| *b != fill) {
            return Err(malformed(format!("int256 at head {index} exceeds 64 bits")));
        }
        let mut low = [0u8; 8];
        low.copy_from_slice(&word[WORD - 8..]);
        Ok(i64::from_be_bytes(low))
    }

    fn address(&self, index: usize) -> FeedResult<WalletAddress> {
        let word = self.head(index)?;
        if word[..WORD - 20].iter().any(|b| *b != 0) {
            return Err(malformed(format!("dirty address at head {index}")));
        }
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&word[WORD - 20..]);
        Ok(WalletAddress::from_bytes(bytes))
    }

    fn string(&self, index: usize) -> FeedResult<String> {
        let offset = to_usize(word_to_u64(self.head(index)?)?)?;
        let len = to_usize(word_to_u64(self.word_at(offset)?)?)?;
        let start = offset + WORD;
        let bytes = start
            .checked_add(len)
            .and_then(|end| self.data.get(start..end))
            .ok_or_else(|| malformed(format!("string at head {index} runs past data")))?;
        String::from_utf8(bytes.to_vec())
            .map_err(|_| malformed(format!("string at head {index} is not UTF-8")))
    }
}

fn word_to_u64(word: &[u8]) -> FeedResult<u64> {
    if word[..WORD - 8].iter().any(|b| *b != 0) {
        return Err(malformed("uint256 exceeds 64 bits"));
    }
    let mut low = [0u8; 8];
    low.copy_from_slice(&word[WORD - 8..]);
    Ok(u64::from_be_bytes(low))
}

fn to_usize(value: u64) -> FeedResult<usize> {
    usize::try_from(value).map_err(|_| malformed("offset out of range"))
}

/// Decode one log given its topics and data, both `0x`-prefixed hex.
pub fn decode_log(topics: &[String], data: &str) -> FeedResult<ChainEvent> {
    let topic0 = topics
        .first()
        .ok_or_else(|| malformed("log has no topics"))?
        .to_ascii_lowercase();
    let raw = hex::decode(data.trim_start_matches("0x"))
        .map_err(|e| malformed(format!("data is not hex: {e}")))?;
    let tuple = Tuple { data: &raw };

    if topic0 == event_topic_hex(ZONE_ALERT_SIGNATURE) {
        Ok(ChainEvent::ZoneAlert(ZoneAlertLog {
            alert_message: tuple.string(0)?,
            alert_type: tuple.string(1)?,
            latitude: tuple.int(2)?,
            longitude: tuple.int(3)?,
            radius: tuple.uint(4)?,
            timestamp: tuple.uint(5)? as i64,
        }))
    } else if topic0 == event_topic_hex(USER_ALERT_SIGNATURE) {
        Ok(ChainEvent::UserAlert(UserAlertLog {
            user_address: tuple.address(0)?,
            name: tuple.string(1)?,
            home_address: tuple.string(2)?,
            phone_number: tuple.string(3)?,
            aadhar: tuple.string(4)?,
            passport: tuple.string(5)?,
            alert_message: tuple.string(6)?,
            latitude: tuple.int(7)?,
            longitude: tuple.int(8)?,
            timestamp: tuple.uint(9)? as i64,
        }))
    } else {
        Err(malformed(format!("unknown event topic {topic0}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    enum Arg<'a> {
        Str(&'a str),
        Int(i64),
        Uint(u64),
        Addr([u8; 20]),
    }

    fn int_word(value: i64) -> [u8; WORD] {
        let mut word = [if value < 0 { 0xff } else { 0 }; WORD];
        word[WORD - 8..].copy_from_slice(&value.to_be_bytes());
        word
    }

    fn uint_word(value: u64) -> [u8; WORD] {
        let mut word = [0u8; WORD];
        word[WORD - 8..].copy_from_slice(&value.to_be_bytes());
        word
    }

    fn encode(args: &[Arg]) -> String {
        let mut head = Vec::new();
        let mut tail = Vec::new();
        for arg in args {
            match arg {
                Arg::Str(s) => {
                    head.extend_from_slice(&uint_word((args.len() * WORD + tail.len()) as u64));
                    tail.extend_from_slice(&uint_word(s.len() as u64));
                    tail.extend_from_slice(s.as_bytes());
                    tail.resize(tail.len() + (WORD - s.len() % WORD) % WORD, 0);
                }
                Arg::Int(v) => head.extend_from_slice(&int_word(*v)),
                Arg::Uint(v) => head.extend_from_slice(&uint_word(*v)),
                Arg::Addr(a) => {
                    let mut word = [0u8; WORD];
                    word[WORD - 20..].copy_from_slice(a);
                    head.extend_from_slice(&word);
                }
            }
        }
        head.extend_from_slice(&tail);
        format!("0x{}", hex::encode(head))
    }

    #[test]
    fn test_topics_are_distinct_keccak_hashes() {
        let zone = event_topic_hex(ZONE_ALERT_SIGNATURE);
        assert_eq!(zone.len(), 66);
        assert_ne!(zone, event_topic_hex(USER_ALERT_SIGNATURE));
        // Well-known keccak-256 of the empty string.
        assert_eq!(
            hex::encode(event_topic("")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_decode_zone_alert() {
        let data = encode(&[
            Arg::Str("Flash flood warning for the river bank"),
            Arg::Str("Weather"),
            Arg::Int(23),
            Arg::Int(-72),
            Arg::Uint(1500),
            Arg::Uint(1_700_000_000),
        ]);
        let event = decode_log(&[event_topic_hex(ZONE_ALERT_SIGNATURE)], &data).unwrap();
        assert_eq!(
            event,
            ChainEvent::ZoneAlert(ZoneAlertLog {
                alert_message: "Flash flood warning for the river bank".to_string(),
                alert_type: "Weather".to_string(),
                latitude: 23,
                longitude: -72,
                radius: 1500,
                timestamp: 1_700_000_000,
            })
        );
    }

    #[test]
    fn test_decode_user_alert() {
        let data = encode(&[
            Arg::Addr([0x55; 20]),
            Arg::Str("Meera"),
            Arg::Str("4 Hill View"),
            Arg::Str("+91 90000 00000"),
            Arg::Str("9999 8888 7777"),
            Arg::Str("Z7654321"),
            Arg::Str("Twisted ankle on the trail"),
            Arg::Int(30),
            Arg::Int(79),
            Arg::Uint(1_700_000_500),
        ]);
        let topic = event_topic_hex(USER_ALERT_SIGNATURE).to_uppercase().replacen("0X", "0x", 1);
        let ChainEvent::UserAlert(log) = decode_log(&[topic], &data).unwrap() else {
            panic!("expected a user alert");
        };
        assert_eq!(log.user_address, WalletAddress::from_bytes([0x55; 20]));
        assert_eq!(log.name, "Meera");
        assert_eq!(log.alert_message, "Twisted ankle on the trail");
        assert_eq!((log.latitude, log.longitude), (30, 79));
    }

    #[test]
    fn test_rejects_unknown_topic_and_truncated_data() {
        let unknown = format!("0x{}", "00".repeat(32));
        assert!(matches!(
            decode_log(&[unknown], "0x"),
            Err(FeedError::MalformedLog(_))
        ));
        assert!(matches!(
            decode_log(&[], "0x"),
            Err(FeedError::MalformedLog(_))
        ));

        let data = encode(&[Arg::Str("cut"), Arg::Str("short")]);
        assert!(matches!(
            decode_log(&[event_topic_hex(ZONE_ALERT_SIGNATURE)], &data),
            Err(FeedError::MalformedLog(_))
        ));
    }

    #[test]
    fn test_rejects_oversized_integer() {
        let mut data = encode(&[
            Arg::Str("m"),
            Arg::Str("t"),
            Arg::Int(1),
            Arg::Int(1),
            Arg::Uint(1),
            Arg::Uint(1),
        ]);
        // Set a high byte of the latitude word (head 2).
        let pos = 2 + 2 * WORD * 2;
        data.replace_range(pos..pos + 2, "01");
        assert!(matches!(
            decode_log(&[event_topic_hex(ZONE_ALERT_SIGNATURE)], &data),
            Err(FeedError::MalformedLog(_))
        ));
    }
}

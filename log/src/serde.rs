//! Wire codec for messages and the storage framing for log entries.
//!
//! # Message Format
//!
//! ```text
//! | version (u8) | sender_len (u16 BE) | sender (utf8) | content_len (u16 BE) | content (utf8) |
//! ```
//!
//! Lengths are byte lengths of the UTF-8 text. The encoding is deterministic:
//! equal messages always produce identical bytes.
//!
//! # Entry Format
//!
//! Each element of the backing list is a framed [`LogEntry`]:
//!
//! ```text
//! | version (u8) | offset (u64 BE) | payload (encoded message) |
//! ```
//!
//! Storing the offset next to the payload lets a reopened log recover its
//! offset counter and lets reads detect entries the log did not write.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{Error, Result};
use crate::model::{LogEntry, MAX_CONTENT_LEN, MAX_SENDER_LEN, Message, check_len};

/// Message format version (currently 0x01).
pub const MESSAGE_VERSION: u8 = 0x01;

/// Entry frame version (currently 0x01).
pub const ENTRY_VERSION: u8 = 0x01;

/// Size of the entry frame header: version byte plus offset.
const ENTRY_HEADER_LEN: usize = 1 + 8;

impl Message {
    /// Encodes the message for storage.
    ///
    /// Fails with [`Error::Encoding`] if either field violates its length
    /// constraint.
    pub fn encode(&self) -> Result<Bytes> {
        check_len("sender", self.sender(), MAX_SENDER_LEN).map_err(Error::Encoding)?;
        check_len("content", self.content(), MAX_CONTENT_LEN).map_err(Error::Encoding)?;

        let sender = self.sender().as_bytes();
        let content = self.content().as_bytes();
        let mut buf = BytesMut::with_capacity(1 + 2 + sender.len() + 2 + content.len());
        buf.put_u8(MESSAGE_VERSION);
        put_str(&mut buf, sender)?;
        put_str(&mut buf, content)?;
        Ok(buf.freeze())
    }

    /// Decodes a message produced by [`Message::encode`].
    ///
    /// Fails with [`Error::Decoding`] on an unknown version, truncated input,
    /// trailing bytes, invalid UTF-8, or field lengths outside their bounds.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut buf = data;
        if !buf.has_remaining() {
            return Err(Error::Decoding("empty message buffer".to_string()));
        }
        let version = buf.get_u8();
        if version != MESSAGE_VERSION {
            return Err(Error::Decoding(format!(
                "unsupported message version: 0x{:02x}",
                version
            )));
        }

        let sender = get_str(&mut buf, "sender", MAX_SENDER_LEN)?;
        let content = get_str(&mut buf, "content", MAX_CONTENT_LEN)?;
        if buf.has_remaining() {
            return Err(Error::Decoding(format!(
                "{} trailing bytes after message",
                buf.remaining()
            )));
        }

        Ok(Message::new_unchecked(sender, content))
    }
}

fn put_str(buf: &mut BytesMut, value: &[u8]) -> Result<()> {
    let len = u16::try_from(value.len())
        .map_err(|_| Error::Encoding(format!("field too large: {} bytes", value.len())))?;
    buf.put_u16(len);
    buf.put_slice(value);
    Ok(())
}

fn get_str(buf: &mut &[u8], field: &str, max_chars: usize) -> Result<String> {
    if buf.remaining() < 2 {
        return Err(Error::Decoding(format!("missing {} length", field)));
    }
    let len = buf.get_u16() as usize;
    if buf.remaining() < len {
        return Err(Error::Decoding(format!(
            "truncated {}: expected {} bytes, found {}",
            field,
            len,
            buf.remaining()
        )));
    }

    let value = String::from_utf8(buf[..len].to_vec())
        .map_err(|e| Error::Decoding(format!("{} is not valid UTF-8: {}", field, e)))?;
    buf.advance(len);

    check_len(field, &value, max_chars).map_err(Error::Decoding)?;
    Ok(value)
}

impl LogEntry {
    /// Frames the entry for storage in the backing list.
    pub(crate) fn serialize(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(ENTRY_HEADER_LEN + self.payload.len());
        buf.put_u8(ENTRY_VERSION);
        buf.put_u64(self.offset);
        buf.put_slice(&self.payload);
        buf.freeze()
    }

    /// Parses a framed entry read from the backing list.
    pub(crate) fn deserialize(data: Bytes) -> Result<Self> {
        if data.len() < ENTRY_HEADER_LEN {
            return Err(Error::Decoding(format!(
                "buffer too short for log entry: {} bytes",
                data.len()
            )));
        }
        if data[0] != ENTRY_VERSION {
            return Err(Error::Decoding(format!(
                "unsupported entry version: 0x{:02x}",
                data[0]
            )));
        }

        let mut header = &data[1..ENTRY_HEADER_LEN];
        let offset = header.get_u64();
        Ok(LogEntry {
            offset,
            payload: data.slice(ENTRY_HEADER_LEN..),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_encode_message_with_expected_layout() {
        // given
        let message = Message::new("ab", "xyz").unwrap();

        // when
        let encoded = message.encode().unwrap();

        // then
        assert_eq!(
            encoded.as_ref(),
            &[MESSAGE_VERSION, 0, 2, b'a', b'b', 0, 3, b'x', b'y', b'z']
        );
    }

    #[test]
    fn should_encode_deterministically() {
        let message = Message::new("alice", "hello").unwrap();
        assert_eq!(message.encode().unwrap(), message.encode().unwrap());
    }

    #[test]
    fn should_fail_encoding_invalid_message() {
        // given - bypass constructor validation
        let message = Message::new_unchecked(String::new(), "x".to_string());

        // when
        let result = message.encode();

        // then
        assert!(matches!(result, Err(Error::Encoding(msg)) if msg.contains("sender")));
    }

    #[test]
    fn should_decode_multibyte_text() {
        // given
        let message = Message::new("zoë", "こんにちは").unwrap();

        // when
        let decoded = Message::decode(&message.encode().unwrap()).unwrap();

        // then
        assert_eq!(decoded, message);
    }

    #[test]
    fn should_fail_decoding_empty_buffer() {
        assert!(matches!(Message::decode(&[]), Err(Error::Decoding(_))));
    }

    #[test]
    fn should_fail_decoding_unknown_version() {
        let result = Message::decode(&[0x7F, 0, 1, b'a', 0, 1, b'b']);
        assert!(matches!(result, Err(Error::Decoding(msg)) if msg.contains("version")));
    }

    #[test]
    fn should_fail_decoding_truncated_payload() {
        // given
        let encoded = Message::new("alice", "hello").unwrap().encode().unwrap();

        // when
        let result = Message::decode(&encoded[..encoded.len() - 1]);

        // then
        assert!(matches!(result, Err(Error::Decoding(msg)) if msg.contains("truncated")));
    }

    #[test]
    fn should_fail_decoding_missing_field() {
        // given - sender present, content length missing
        let data = [MESSAGE_VERSION, 0, 1, b'a'];

        // when
        let result = Message::decode(&data);

        // then
        assert!(matches!(result, Err(Error::Decoding(msg)) if msg.contains("content")));
    }

    #[test]
    fn should_fail_decoding_trailing_bytes() {
        let mut data = Message::new("a", "b").unwrap().encode().unwrap().to_vec();
        data.push(0);
        assert!(matches!(Message::decode(&data), Err(Error::Decoding(_))));
    }

    #[test]
    fn should_fail_decoding_invalid_utf8() {
        let data = [MESSAGE_VERSION, 0, 1, 0xFF, 0, 1, b'b'];
        assert!(matches!(Message::decode(&data), Err(Error::Decoding(_))));
    }

    #[test]
    fn should_fail_decoding_empty_field() {
        let data = [MESSAGE_VERSION, 0, 0, 0, 1, b'b'];
        assert!(matches!(Message::decode(&data), Err(Error::Decoding(_))));
    }

    #[test]
    fn should_fail_decoding_json_payload() {
        let data = br#"{"sender":"a","content":"b"}"#;
        assert!(matches!(Message::decode(data), Err(Error::Decoding(_))));
    }

    #[test]
    fn should_frame_log_entry_with_offset() {
        // given
        let entry = LogEntry {
            offset: 258,
            payload: Bytes::from_static(b"xy"),
        };

        // when
        let framed = entry.serialize();

        // then
        assert_eq!(
            framed.as_ref(),
            &[ENTRY_VERSION, 0, 0, 0, 0, 0, 0, 1, 2, b'x', b'y']
        );
        assert_eq!(LogEntry::deserialize(framed).unwrap(), entry);
    }

    #[test]
    fn should_fail_deserialize_entry_too_short() {
        let result = LogEntry::deserialize(Bytes::from_static(&[ENTRY_VERSION, 0, 0]));
        assert!(matches!(result, Err(Error::Decoding(_))));
    }

    #[test]
    fn should_fail_deserialize_entry_with_unknown_version() {
        let result = LogEntry::deserialize(Bytes::from_static(&[0x09; 12]));
        assert!(matches!(result, Err(Error::Decoding(msg)) if msg.contains("version")));
    }

    mod proptests {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            #[test]
            fn should_round_trip_valid_messages(
                sender in "\\PC{1,128}",
                content in "\\PC{1,1024}",
            ) {
                let message = Message::new(sender, content).unwrap();

                let decoded = Message::decode(&message.encode().unwrap()).unwrap();

                prop_assert_eq!(decoded, message);
            }

            #[test]
            fn should_never_panic_decoding_arbitrary_bytes(
                data in prop::collection::vec(any::<u8>(), 0..64),
            ) {
                let _ = Message::decode(&data);
            }
        }
    }
}

//! Codec Tests
//!
//! Tests for request encoding and response decoding.

use std::io::{Cursor, ErrorKind, Read};

use kvcache::protocol::{
    decode_response, encode_request, read_response, write_request, Request, Response,
    MAX_PAYLOAD_SIZE,
};
use kvcache::CacheError;

// =============================================================================
// Request Encoding Tests
// =============================================================================

#[test]
fn test_encode_fetch() {
    let encoded = encode_request(&Request::fetch("abc"));
    assert_eq!(&encoded[..], b"G3 abc");
}

#[test]
fn test_encode_store() {
    let encoded = encode_request(&Request::store("k", "v"));
    assert_eq!(&encoded[..], b"S1 1 kv");
}

#[test]
fn test_encode_delete() {
    let encoded = encode_request(&Request::delete("session:42"));
    assert_eq!(&encoded[..], b"D10 session:42");
}

#[test]
fn test_encode_empty_key_and_value() {
    assert_eq!(&encode_request(&Request::fetch(""))[..], b"G0 ");
    assert_eq!(&encode_request(&Request::store("", ""))[..], b"S0 0 ");
}

#[test]
fn test_encode_lengths_are_bytes_not_chars() {
    // "é" is two bytes, "日本" is six
    let encoded = encode_request(&Request::store("é", "日本"));
    let mut expected = b"S2 6 ".to_vec();
    expected.extend_from_slice("é日本".as_bytes());
    assert_eq!(&encoded[..], &expected[..]);
}

#[test]
fn test_encode_does_not_escape_delimiters() {
    // Spaces inside key and value are sent as-is; lengths delimit them
    let encoded = encode_request(&Request::store("a b", "c d "));
    assert_eq!(&encoded[..], b"S3 4 a bc d ");
}

#[test]
fn test_encode_binary_data() {
    let key: Vec<u8> = vec![0x00, 0x20, 0xFF];
    let encoded = encode_request(&Request::fetch(key.clone()));
    assert_eq!(&encoded[..3], b"G3 ");
    assert_eq!(&encoded[3..], &key[..]);
}

#[test]
fn test_write_request_to_stream() {
    let mut buffer = Vec::new();
    write_request(&mut buffer, &Request::delete("k")).unwrap();
    assert_eq!(buffer, b"D1 k");
}

// =============================================================================
// Response Decoding Tests
// =============================================================================

#[test]
fn test_decode_value() {
    let response = decode_response(b"3 xyz").unwrap();
    assert_eq!(response, Response::Value("xyz".into()));
}

#[test]
fn test_decode_empty() {
    let mut cursor = Cursor::new(&b"0 trailing"[..]);
    let response = read_response(&mut cursor).unwrap();

    assert_eq!(response, Response::Empty);
    // Only the length token and its space are consumed
    assert_eq!(cursor.position(), 2);
}

#[test]
fn test_decode_failure() {
    let response = decode_response(b"-9 not found").unwrap();
    assert_eq!(response, Response::Failure("not found".into()));
}

#[test]
fn test_decode_failure_keeps_raw_bytes() {
    let response = decode_response(b"-2 \xff\xfe").unwrap();

    match &response {
        Response::Failure(message) => assert_eq!(&message[..], b"\xff\xfe"),
        other => panic!("Expected Failure, got {:?}", other),
    }
    // Lossy conversion only happens when the message is rendered as text
    assert_eq!(response.failure_message().unwrap(), "\u{FFFD}\u{FFFD}");
}

#[test]
fn test_decode_failure_into_value() {
    let response = decode_response(b"-9 not found").unwrap();
    match response.into_value() {
        Err(CacheError::ServerFailure(message)) => assert_eq!(message, "not found"),
        other => panic!("Expected ServerFailure, got {:?}", other),
    }
}

#[test]
fn test_decode_payload_with_spaces() {
    let response = decode_response(b"11 hello world").unwrap();
    assert_eq!(&response.value().unwrap()[..], b"hello world");
}

#[test]
fn test_decode_leaves_following_bytes_unread() {
    let mut cursor = Cursor::new(&b"2 ok-1 x"[..]);
    assert_eq!(read_response(&mut cursor).unwrap(), Response::Value("ok".into()));
    assert_eq!(
        read_response(&mut cursor).unwrap(),
        Response::Failure("x".into())
    );
}

#[test]
fn test_decode_token_whitespace_is_trimmed() {
    let response = decode_response(b"\n2 hi").unwrap();
    assert_eq!(response, Response::Value("hi".into()));
}

#[test]
fn test_decode_same_buffer_twice() {
    let frame: &[u8] = b"-7 missing";
    let first = decode_response(frame).unwrap();
    let second = decode_response(frame).unwrap();

    assert_eq!(first, second);
    assert_eq!(first, Response::Failure("missing".into()));
}

// =============================================================================
// Error Handling Tests
// =============================================================================

#[test]
fn test_truncated_payload() {
    let result = decode_response(b"5 ab");
    match result {
        Err(CacheError::TruncatedPayload { expected, source }) => {
            assert_eq!(expected, 5);
            assert_eq!(source.kind(), ErrorKind::UnexpectedEof);
        }
        other => panic!("Expected TruncatedPayload, got {:?}", other),
    }
}

#[test]
fn test_truncated_failure_payload() {
    let result = decode_response(b"-20 short");
    assert!(matches!(result, Err(CacheError::TruncatedPayload { expected: 20, .. })));
}

#[test]
fn test_stream_ends_before_length_terminator() {
    let result = decode_response(b"12");
    match result {
        Err(CacheError::Protocol(msg)) => assert!(msg.contains("stream ended")),
        other => panic!("Expected Protocol error, got {:?}", other),
    }
}

#[test]
fn test_empty_stream() {
    let result = decode_response(b"");
    assert!(matches!(result, Err(CacheError::Protocol(_))));
}

#[test]
fn test_non_numeric_length() {
    let result = decode_response(b"abc xyz");
    match result {
        Err(CacheError::Protocol(msg)) => assert!(msg.contains("invalid length token")),
        other => panic!("Expected Protocol error, got {:?}", other),
    }
}

#[test]
fn test_blank_length_token() {
    let result = decode_response(b" xyz");
    assert!(matches!(result, Err(CacheError::Protocol(_))));
}

#[test]
fn test_overlong_length_token() {
    let result = decode_response(b"123456789012345678901234567890 x");
    match result {
        Err(CacheError::Protocol(msg)) => assert!(msg.contains("exceeds")),
        other => panic!("Expected Protocol error, got {:?}", other),
    }
}

#[test]
fn test_payload_too_large() {
    let frame = format!("{} ", MAX_PAYLOAD_SIZE + 1);
    let mut cursor = Cursor::new(frame.into_bytes());
    let result = read_response(&mut cursor);

    match result {
        Err(CacheError::Protocol(msg)) => assert!(msg.contains("too large")),
        other => panic!("Expected Protocol error, got {:?}", other),
    }
}

#[test]
fn test_most_negative_length_is_rejected() {
    let result = decode_response(b"-9223372036854775808 x");
    assert!(matches!(result, Err(CacheError::Protocol(_))));
}

/// Reader that fails with a non-EOF error once its data runs out
struct FailingReader {
    data: Cursor<Vec<u8>>,
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self.data.read(buf)? {
            0 => Err(std::io::Error::new(ErrorKind::ConnectionReset, "reset")),
            n => Ok(n),
        }
    }
}

#[test]
fn test_payload_io_error_is_not_truncation() {
    let reader = FailingReader {
        data: Cursor::new(b"4 ab".to_vec()),
    };
    let mut reader = std::io::BufReader::new(reader);
    let result = read_response(&mut reader);

    match result {
        Err(CacheError::Io(e)) => assert_eq!(e.kind(), ErrorKind::ConnectionReset),
        other => panic!("Expected Io error, got {:?}", other),
    }
}

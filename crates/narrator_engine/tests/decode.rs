use narrator_engine::{decode_text, DecodeError};

#[test]
fn plain_utf8_passes_through() {
    let decoded = decode_text("Hello world".as_bytes()).expect("decode ok");
    assert_eq!(decoded.text, "Hello world");
    assert_eq!(decoded.encoding_label, "UTF-8");
}

#[test]
fn utf8_bom_is_honored_and_stripped() {
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice("hello".as_bytes());

    let decoded = decode_text(&bytes).expect("decode ok");
    assert_eq!(decoded.text, "hello");
    assert_eq!(decoded.encoding_label, "UTF-8");
}

#[test]
fn utf16le_bom_is_honored() {
    let mut bytes = vec![0xFF, 0xFE];
    for unit in "hi".encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }

    let decoded = decode_text(&bytes).expect("decode ok");
    assert_eq!(decoded.text, "hi");
    assert_eq!(decoded.encoding_label, "UTF-16LE");
}

#[test]
fn truncated_utf16_is_a_decode_failure() {
    // UTF-16LE BOM followed by half a code unit.
    let bytes = vec![0xFF, 0xFE, 0x68];
    let err = decode_text(&bytes).unwrap_err();
    assert!(matches!(err, DecodeError::DecodeFailure { .. }));
}

#[test]
fn invalid_utf8_falls_back_to_detection() {
    // windows-1252 text: "un café très fort, s'il vous plaît"
    let bytes = b"un caf\xe9 tr\xe8s fort, s'il vous pla\xeet, merci beaucoup";

    let decoded = decode_text(bytes).expect("decode ok");
    assert!(decoded.text.contains("café"), "got: {}", decoded.text);
    assert_ne!(decoded.encoding_label, "UTF-8");
}

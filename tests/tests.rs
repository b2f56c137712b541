use gba_lz77::{decode, encode, lz77_info, Decoder, EncoderBuilder, Lz77Error};
use std::str::from_utf8;

#[test]
fn decode_lorem() {
    let lorem_text = include_str!("lorem.txt");
    let lorem_lz77 = include_bytes!("lorem.lz77");

    let decoded = decode(lorem_lz77, 0).unwrap();
    let decoded_str = from_utf8(&decoded).unwrap();

    assert_eq!(decoded_str, lorem_text);
}

#[test]
fn encode_lorem_matches_existing_data() {
    let lorem_text = include_bytes!("lorem.txt");
    let lorem_lz77 = include_bytes!("lorem.lz77");

    let encoded = encode(lorem_text).unwrap();
    assert_eq!(encoded.as_slice(), &lorem_lz77[..]);
}

#[test]
fn tiles_round_trip_byte_exact() {
    let uncompressed = include_bytes!("tiles.bin");
    let compressed = include_bytes!("tiles.lz77");

    let decoded = decode(compressed, 0).unwrap();
    assert_eq!(
        &uncompressed[..],
        decoded.as_slice(),
        "error decoding tiles"
    );
    assert_eq!(encode(uncompressed).unwrap().as_slice(), &compressed[..]);
}

#[test]
fn stream_info_reports_footprint() {
    let lorem_lz77 = include_bytes!("lorem.lz77");

    let (decoded, info) = Decoder::for_bytes(lorem_lz77).decode_with_info().unwrap();
    assert_eq!(info.header.size as usize, decoded.len());
    assert_eq!(info.consumed, 443);
    assert_eq!(info.padded_len(), lorem_lz77.len());
    assert_eq!(info.literals, 297);
    assert_eq!(info.references, 49);
}

#[test]
fn ababab() {
    let raw = b"ABABAB";
    let compressed = encode(raw).unwrap();

    assert_eq!(
        compressed,
        [0x10, 0x06, 0x00, 0x00, 0x20, 0x41, 0x42, 0x10, 0x01, 0x00, 0x00, 0x00]
    );
    assert_eq!(decode(&compressed, 0).unwrap(), raw);
}

#[test]
fn farther_match_is_kept() {
    let raw = b"ABCABDABC";
    let compressed = encode(raw).unwrap();

    assert_eq!(
        compressed,
        [
            0x10, 0x09, 0x00, 0x00, 0x02, 0x41, 0x42, 0x43, 0x41, 0x42, 0x44, 0x00, 0x05, 0x00,
            0x00, 0x00
        ]
    );
    assert_eq!(decode(&compressed, 0).unwrap(), raw);
}

#[test]
fn distinct_bytes_are_uncoded() {
    let raw: Vec<u8> = (0x20..0x34).collect();
    let compressed = encode(&raw).unwrap();

    // 4 header + (1 + 8) + (1 + 8) + (1 + 4) = 27, padded to 28
    assert_eq!(compressed.len(), 28);
    assert_eq!(compressed[4], 0);
    assert_eq!(&compressed[5..13], &raw[0..8]);
    assert_eq!(compressed[13], 0);
    assert_eq!(&compressed[14..22], &raw[8..16]);
    assert_eq!(compressed[22], 0);
    assert_eq!(&compressed[23..27], &raw[16..20]);
    assert_eq!(compressed[27], 0);
    assert_eq!(decode(&compressed, 0).unwrap(), raw);
}

#[test]
fn uncoded_size_formula() {
    for n in [1usize, 7, 8, 9, 100, 255] {
        let raw: Vec<u8> = (0..n).map(|i| i as u8).collect();
        let compressed = encode(&raw).unwrap();
        let unpadded = 4 + n + (n + 7) / 8;
        assert_eq!(compressed.len(), (unpadded + 3) / 4 * 4, "size {}", n);
    }
}

#[test]
fn empty_input() {
    let compressed = encode(&[]).unwrap();
    assert_eq!(compressed, [0x10, 0x00, 0x00, 0x00]);
    assert!(decode(&compressed, 0).unwrap().is_empty());
}

#[test]
fn header_holds_input_length() {
    // the size field is the real length, whatever the first bytes of input are
    let raw = [0xFF, 0xFE, 0xFD, 0x10, 0x10, 0x10, 0x10];
    let compressed = encode(&raw).unwrap();
    assert_eq!(&compressed[..4], &[0x10, 0x07, 0x00, 0x00]);
    assert_eq!(lz77_info(&compressed, 0).unwrap().size, 7);
}

#[test]
fn too_large_input_fails_fast() {
    let raw = vec![0u8; 1 << 24];
    match encode(&raw) {
        Err(Lz77Error::InputTooLarge(size)) => assert_eq!(size, 1 << 24),
        other => panic!("expected InputTooLarge, got {:?}", other.map(|v| v.len())),
    }
}

#[test]
fn decode_bad_tag() {
    for tag in [0x00, 0x11, 0x20, 0x24, 0xFF] {
        let mut compressed = encode(b"ABABAB").unwrap();
        compressed[0] = tag;
        match decode(&compressed, 0) {
            Err(Lz77Error::InvalidTag(found)) => assert_eq!(found, tag),
            other => panic!("expected InvalidTag, got {:?}", other),
        }
    }
    // the tag is checked before the rest of the header
    assert!(matches!(decode(&[0x30], 0), Err(Lz77Error::InvalidTag(0x30))));
}

#[test]
fn decode_truncated() {
    let truncated = [
        &[][..],
        &[0x10, 0x05][..],
        &[0x10, 0x05, 0x00, 0x00][..],
        &[0x10, 0x05, 0x00, 0x00, 0x00, 0x41][..],
        &[0x10, 0x05, 0x00, 0x00, 0x20, 0x41, 0x42, 0x10][..],
    ];

    for data in &truncated[..2] {
        match decode(data, 0) {
            Err(Lz77Error::TruncatedHeader(read)) => assert_eq!(read, data.len()),
            other => panic!("expected TruncatedHeader for {:02x?}, got {:?}", data, other),
        }
    }

    for data in &truncated[2..] {
        match decode(data, 0) {
            Err(Lz77Error::TruncatedStream { consumed, size, .. }) => {
                assert_eq!(consumed, data.len());
                assert_eq!(size, 5);
            }
            other => panic!("expected TruncatedStream for {:02x?}, got {:?}", data, other),
        }
    }

    let compressed = encode(b"ABABAB").unwrap();
    assert!(matches!(
        decode(&compressed, compressed.len() + 1),
        Err(Lz77Error::TruncatedHeader(0))
    ));
}

#[test]
fn decode_bad_reference() {
    // distance 16 in a 4 byte output
    let past_size = [0x10, 0x04, 0x00, 0x00, 0x80, 0x00, 0x0F];
    assert!(matches!(
        decode(&past_size, 0),
        Err(Lz77Error::BadReference {
            distance: 16,
            position: 0,
            size: 4
        })
    ));

    // distance 1 before anything has been written
    let before_start = [0x10, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00];
    assert!(matches!(
        decode(&before_start, 0),
        Err(Lz77Error::BadReference {
            distance: 1,
            position: 0,
            ..
        })
    ));

    // distance 3 after two bytes
    let one_short = [0x10, 0x08, 0x00, 0x00, 0x20, 0x41, 0x42, 0x00, 0x02];
    assert!(matches!(
        decode(&one_short, 0),
        Err(Lz77Error::BadReference {
            distance: 3,
            position: 2,
            ..
        })
    ));
}

#[test]
fn decode_distance_one_run() {
    // the encoder never uses a distance of one, but other tools do
    let run = [0x10, 0x0A, 0x00, 0x00, 0x40, 0x7A, 0x60, 0x00];
    assert_eq!(decode(&run, 0).unwrap(), [0x7A; 10]);
}

#[test]
fn decode_copy_from_window_start() {
    let raw: Vec<u8> = (0..4096).map(|i| (i % 251) as u8).collect();

    // 4099 bytes: 4096 literals, then 3 bytes copied from 4096 back
    let mut stream = vec![0x10, 0x03, 0x10, 0x00];
    for chunk in raw.chunks(8) {
        stream.push(0x00);
        stream.extend_from_slice(chunk);
    }
    stream.extend_from_slice(&[0x80, 0x0F, 0xFF]);

    let mut expected = raw.clone();
    expected.extend_from_slice(&raw[..3]);
    assert_eq!(decode(&stream, 0).unwrap(), expected);
}

#[test]
fn decode_stops_at_size() {
    // a copy of 18 bytes when only 3 are left is cut short
    let overlong = [0x10, 0x05, 0x00, 0x00, 0x20, 0x41, 0x42, 0xF0, 0x01];
    assert_eq!(decode(&overlong, 0).unwrap(), b"ABABA");

    // leftover flag bits are not read as tokens
    let leftover = [0x10, 0x02, 0x00, 0x00, 0x3F, 0x41, 0x42];
    assert_eq!(decode(&leftover, 0).unwrap(), b"AB");
}

#[test]
fn trailing_bytes_are_ignored() {
    let lorem_text = include_bytes!("lorem.txt");
    let mut compressed = encode(lorem_text).unwrap();
    compressed.extend_from_slice(&[0; 16]);
    assert_eq!(decode(&compressed, 0).unwrap(), &lorem_text[..]);

    compressed.extend_from_slice(&[0xFF; 16]);
    assert_eq!(decode(&compressed, 0).unwrap(), &lorem_text[..]);
}

#[test]
fn decode_at_offset() {
    let lorem_text = include_bytes!("lorem.txt");
    let mut rom = vec![0xAAu8; 0x123];
    rom.extend(encode(lorem_text).unwrap());
    rom.extend(vec![0xBBu8; 0x40]);

    assert_eq!(decode(&rom, 0x123).unwrap(), &lorem_text[..]);
    assert!(decode(&rom, 0x122).is_err());
}

#[test]
fn decoder_logging() {
    let compressed = encode(b"ABABAB").unwrap();
    let mut log: Vec<u8> = Vec::new();
    let decoded = Decoder::for_bytes(&compressed)
        .with_logging(&mut log)
        .decode()
        .unwrap();
    assert_eq!(decoded, b"ABABAB");

    let log = String::from_utf8(log).unwrap();
    assert!(log.contains("0000 - Uncoded: 41"));
    assert!(log.contains("0002 - Encoded [Copyback]: count: 4 distance: 2"));
}

#[test]
fn encoder_logging_does_not_change_output() {
    let lorem_text = include_bytes!("lorem.txt");
    let mut log: Vec<u8> = Vec::new();
    let logged = EncoderBuilder::for_bytes(lorem_text)
        .with_logging(&mut log)
        .encode_to_vec()
        .unwrap();

    assert_eq!(logged, encode(lorem_text).unwrap());
    assert!(!log.is_empty());
}

//! Wire-format checks against hand-computed frames.
//!
//! Run with:
//! ```bash
//! cargo test -p bosswire --test wire_format
//! ```

use bosswire::sysex::{
    classify, parse_data_set, verify_frame_checksum, Address, InboundMessage, RolandHeader, Size,
    SysExKind, DATA_REQUEST_LEN, DATA_SET_OVERHEAD,
};
use proptest::prelude::*;

/// Roland checksum computed the long way, independent of the library.
fn reference_checksum(bytes: &[u8]) -> u8 {
    let remainder = bytes.iter().map(|&b| b as u32).sum::<u32>() % 128;
    if remainder == 0 {
        0
    } else {
        (128 - remainder) as u8
    }
}

#[test]
fn test_rq1_concrete_example() {
    let header = RolandHeader::for_model([0x00, 0x00, 0x00, 0x01]);
    let msg = header
        .data_request(&[0x00, 0x00, 0x00, 0x00], &[0x00, 0x00, 0x00, 0x01])
        .unwrap();

    // checked range is address + size: sum 1, remainder 1, checksum 128 - 1
    let expected_checksum = reference_checksum(&[0, 0, 0, 0, 0, 0, 0, 1]);
    assert_eq!(expected_checksum, 0x7F);

    let expected = vec![
        0xF0,
        0x41,
        0x10,
        0x00,
        0x00,
        0x00,
        0x01,
        0x11,
        0x00,
        0x00,
        0x00,
        0x00,
        0x00,
        0x00,
        0x00,
        0x01,
        expected_checksum,
        0xF7,
    ];
    assert_eq!(msg, expected);
    assert_eq!(msg.len(), DATA_REQUEST_LEN);
}

#[test]
fn test_dt1_layout() {
    let header = RolandHeader::new(0x10, [0x00, 0x00, 0x00, 0x33]);
    let msg = header
        .data_set(&[0x60, 0x00, 0x00, 0x22], &[0x03, 0x40])
        .unwrap();

    assert_eq!(msg.len(), DATA_SET_OVERHEAD + 2);
    assert_eq!(&msg[..8], &[0xF0, 0x41, 0x10, 0x00, 0x00, 0x00, 0x33, 0x12]);
    assert_eq!(&msg[8..12], &[0x60, 0x00, 0x00, 0x22]);
    assert_eq!(&msg[12..14], &[0x03, 0x40]);
    assert_eq!(
        msg[14],
        reference_checksum(&[0x60, 0x00, 0x00, 0x22, 0x03, 0x40])
    );
    assert_eq!(msg[15], 0xF7);
}

#[test]
fn test_rq1_size_packing_for_large_blocks() {
    let size = Size::from_len(0x100).unwrap();
    assert_eq!(size.to_bytes(), [0x00, 0x00, 0x02, 0x00]);
    assert_eq!(size.len(), 0x100);
    assert!(Size::from_len(Size::MAX + 1).is_err());
}

#[test]
fn test_classify_identity_and_dump() {
    let identity = [
        0xF0, 0x7E, 0x10, 0x06, 0x02, 0x41, 0x33, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01,
        0xF7,
    ];
    assert!(matches!(classify(&identity), SysExKind::IdentityReply(_)));

    let dump = RolandHeader::for_model([0, 0, 0, 0x33])
        .data_set(&[0x60, 0, 0, 0x23], &[0x50])
        .unwrap();
    let SysExKind::DataSet(parsed) = classify(&dump) else {
        panic!("expected a data set");
    };
    assert_eq!(parsed.address, Address::from_bytes([0x60, 0, 0, 0x23]));
    assert_eq!(parsed.payload, &[0x50]);

    // RQ1 is not something a device sends back
    let request = RolandHeader::default()
        .data_request(&[0, 0, 0, 0], &[0, 0, 0, 1])
        .unwrap();
    assert_eq!(classify(&request), SysExKind::Unrecognized);
}

#[test]
fn test_raw_message_parsing() {
    assert_eq!(
        InboundMessage::parse(&[0xB3, 74, 100]).unwrap(),
        InboundMessage::ControlChange {
            channel: 3,
            controller: 74,
            value: 100
        }
    );
    assert_eq!(
        InboundMessage::parse(&[0xC0, 12]).unwrap(),
        InboundMessage::ProgramChange {
            channel: 0,
            program: 12
        }
    );
    assert!(InboundMessage::parse(&[0xE0, 0x00, 0x40]).is_err());
}

proptest! {
    #[test]
    fn prop_dt1_checksum_round_trip(
        address in proptest::array::uniform4(0u8..0x80),
        data in proptest::collection::vec(0u8..0x80, 1..64),
    ) {
        let msg = RolandHeader::default().data_set(&address, &data).unwrap();
        prop_assert!(verify_frame_checksum(&msg));

        let dump = parse_data_set(&msg).unwrap();
        prop_assert!(dump.checksum_valid());
        prop_assert_eq!(dump.payload, data.as_slice());

        let mut checked = address.to_vec();
        checked.extend_from_slice(&data);
        prop_assert_eq!(dump.checksum, reference_checksum(&checked));
    }
}

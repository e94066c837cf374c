//! Wire protocol integration tests: streaming frame decode and
//! transmit-clone byte equality across the public API.

use bytes::BytesMut;
use lattice::member::MemberId;
use lattice::request::{BackupRequest, MultiBackupRequest, SingleBackupRequest};
use lattice::version::{PartitionId, VersionMap};
use lattice::wire::codec::{decode_request, encode_request, FrameDecoder, FrameEncoder};

fn sample_batch() -> MultiBackupRequest {
    let versions: VersionMap = [
        (PartitionId(3), 10),
        (PartitionId(7), 11),
        (PartitionId(11), 4),
    ]
    .into_iter()
    .collect();
    MultiBackupRequest::new(MemberId(2), versions, true)
}

#[test]
fn frames_survive_arbitrary_chunking() -> anyhow::Result<()> {
    let encoder = FrameEncoder::new();
    let single = BackupRequest::Single(SingleBackupRequest::new(
        MemberId(3),
        PartitionId(5),
        42,
        false,
    ));
    let batch = BackupRequest::Multi(sample_batch());

    let mut stream = Vec::new();
    stream.extend_from_slice(&encoder.encode_to_bytes(&encode_request(&single)?));
    stream.extend_from_slice(&encoder.encode_to_bytes(&encode_request(&batch)?));

    // Feed the stream one byte at a time.
    let mut decoder = FrameDecoder::new();
    let mut buf = BytesMut::new();
    let mut decoded = Vec::new();
    for byte in stream {
        buf.extend_from_slice(&[byte]);
        while let Some(frame) = decoder.decode(&mut buf)? {
            decoded.push(decode_request(&frame)?);
        }
    }

    assert_eq!(decoded.len(), 2);
    match &decoded[0] {
        BackupRequest::Single(request) => {
            assert_eq!(request.partition(), PartitionId(5));
            assert_eq!(request.version(), 42);
        }
        BackupRequest::Multi(_) => panic!("first frame decoded as batch"),
    }
    match &decoded[1] {
        BackupRequest::Multi(request) => {
            assert_eq!(request.versions().len(), 3);
            assert_eq!(request.versions().get(PartitionId(11)), Some(4));
        }
        BackupRequest::Single(_) => panic!("second frame decoded as single"),
    }
    Ok(())
}

#[test]
fn transmit_clone_is_wire_identical() -> anyhow::Result<()> {
    // Receive-side mutations (skip growth, confirmation) must never
    // change what a forwarded copy puts on the wire.
    let original = BackupRequest::Multi(sample_batch());
    let forwarded = original.clone_for_transmit();

    assert_eq!(encode_request(&original)?, encode_request(&forwarded)?);

    let re_decoded = decode_request(&encode_request(&forwarded)?)?;
    assert!(!re_decoded.is_confirmed());
    Ok(())
}

#[test]
fn decode_rejects_malformed_stream_payloads() {
    // Truncated single body.
    let single = BackupRequest::Single(SingleBackupRequest::new(
        MemberId(1),
        PartitionId(0),
        1,
        false,
    ));
    let encoded = encode_request(&single).expect("encode");
    assert!(decode_request(&encoded[..encoded.len() - 1]).is_err());

    // Negative member id.
    let mut negative_origin = encoded.clone();
    negative_origin[1] = 0xFF;
    assert!(decode_request(&negative_origin).is_err());
}

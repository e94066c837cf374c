//! Frame codec and backup request encode/decode.
//!
//! This module handles the framing layer of the replication protocol:
//! - 4-byte length prefix (big-endian)
//! - Request body encode/decode and exact size estimation
//!
//! Body layout, after the length prefix:
//! kind `i8`, origin member `i32`, flags `i8` (bit 0 = sync), then
//! 12 bytes (partition `i32`, version `i64`) for a single request, or
//! count `i32` followed by `count` such pairs for a batch. The pair
//! sequence is emitted in the version map's iteration order; decoders
//! treat it as an unordered keyed collection.

use bytes::{Buf, Bytes, BytesMut};
use std::io::{self, Cursor};

use crate::backup::request::{BackupRequest, MultiBackupRequest, SingleBackupRequest};
use crate::cluster::member::MemberId;
use crate::partition::version::{PartitionId, VersionMap};
use crate::wire::types::{read_int32, read_int64, read_int8, write_int32, write_int64, write_int8};

// ---------------------------------------------------------------------------
// Frame Constants
// ---------------------------------------------------------------------------

/// Maximum frame size (16MB).
pub const MAX_FRAME_SIZE: usize = 16 * 1024 * 1024;

/// Minimum useful frame size: a complete single-partition request.
pub const MIN_FRAME_SIZE: usize = HEADER_LEN + PAIR_LEN;

/// Message kind: single-partition backup request.
const KIND_SINGLE: i8 = 1;
/// Message kind: multi-partition backup request.
const KIND_MULTI: i8 = 2;

/// Flags bit: sender waits for the backup before acknowledging.
const FLAG_SYNC: i8 = 0x01;

/// Header bytes shared by both kinds: kind, origin, flags.
const HEADER_LEN: usize = 1 + 4 + 1;
/// One (partition, version) pair.
const PAIR_LEN: usize = 4 + 8;

// ---------------------------------------------------------------------------
// Frame Decoder
// ---------------------------------------------------------------------------

/// Length-prefixed frame decoder state machine.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    state: DecodeState,
}

#[derive(Debug, Default)]
enum DecodeState {
    #[default]
    ReadingLength,
    ReadingPayload {
        length: usize,
    },
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a frame from the buffer.
    ///
    /// Returns `Ok(Some(frame))` if a complete frame was decoded,
    /// `Ok(None)` if more data is needed, or `Err` on protocol error.
    pub fn decode(&mut self, buf: &mut BytesMut) -> io::Result<Option<Bytes>> {
        loop {
            match self.state {
                DecodeState::ReadingLength => {
                    if buf.len() < 4 {
                        return Ok(None);
                    }
                    let length = buf.get_u32() as usize;
                    if length > MAX_FRAME_SIZE {
                        return Err(io::Error::new(
                            io::ErrorKind::InvalidData,
                            format!("frame too large: {} bytes", length),
                        ));
                    }
                    self.state = DecodeState::ReadingPayload { length };
                }
                DecodeState::ReadingPayload { length } => {
                    if buf.len() < length {
                        return Ok(None);
                    }
                    let frame = buf.split_to(length).freeze();
                    self.state = DecodeState::ReadingLength;
                    return Ok(Some(frame));
                }
            }
        }
    }

    /// Reset the decoder state.
    pub fn reset(&mut self) {
        self.state = DecodeState::ReadingLength;
    }
}

// ---------------------------------------------------------------------------
// Frame Encoder
// ---------------------------------------------------------------------------

/// Length-prefixing frame encoder.
#[derive(Debug, Default)]
pub struct FrameEncoder;

impl FrameEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Encode a frame with length prefix.
    pub fn encode(&self, payload: &[u8], buf: &mut BytesMut) {
        buf.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        buf.extend_from_slice(payload);
    }

    /// Encode a frame with length prefix, returning bytes.
    pub fn encode_to_bytes(&self, payload: &[u8]) -> Bytes {
        let mut buf = BytesMut::with_capacity(4 + payload.len());
        self.encode(payload, &mut buf);
        buf.freeze()
    }
}

// ---------------------------------------------------------------------------
// Request Encoding
// ---------------------------------------------------------------------------

/// Exact body size a request will encode to, without encoding it.
pub fn encoded_len(request: &BackupRequest) -> usize {
    match request {
        BackupRequest::Single(_) => HEADER_LEN + PAIR_LEN,
        BackupRequest::Multi(request) => HEADER_LEN + 4 + PAIR_LEN * request.versions().len(),
    }
}

fn encode_header(buf: &mut Vec<u8>, kind: i8, origin: MemberId, sync: bool) -> io::Result<()> {
    write_int8(buf, kind)?;
    write_int32(buf, origin.0 as i32)?;
    write_int8(buf, if sync { FLAG_SYNC } else { 0 })?;
    Ok(())
}

/// Encode a request body (no length prefix).
pub fn encode_request(request: &BackupRequest) -> io::Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(encoded_len(request));
    match request {
        BackupRequest::Single(request) => {
            encode_header(&mut buf, KIND_SINGLE, request.origin(), request.is_sync())?;
            write_int32(&mut buf, request.partition().0 as i32)?;
            write_int64(&mut buf, request.version())?;
        }
        BackupRequest::Multi(request) => {
            encode_header(&mut buf, KIND_MULTI, request.origin(), request.is_sync())?;
            write_int32(&mut buf, request.versions().len() as i32)?;
            for (partition, version) in request.versions().iter() {
                write_int32(&mut buf, partition.0 as i32)?;
                write_int64(&mut buf, version)?;
            }
        }
    }
    Ok(buf)
}

// ---------------------------------------------------------------------------
// Request Decoding
// ---------------------------------------------------------------------------

fn invalid(message: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message.into())
}

fn read_partition<R: io::Read>(reader: &mut R) -> io::Result<PartitionId> {
    let raw = read_int32(reader)?;
    if raw < 0 {
        return Err(invalid(format!("negative partition id: {}", raw)));
    }
    Ok(PartitionId(raw as u32))
}

/// Decode a request body (no length prefix).
pub fn decode_request(body: &[u8]) -> io::Result<BackupRequest> {
    let mut cursor = Cursor::new(body);

    let kind = read_int8(&mut cursor)?;
    let origin_raw = read_int32(&mut cursor)?;
    if origin_raw < 0 {
        return Err(invalid(format!("negative member id: {}", origin_raw)));
    }
    let origin = MemberId(origin_raw as u32);
    let flags = read_int8(&mut cursor)?;
    let sync = flags & FLAG_SYNC != 0;

    let request = match kind {
        KIND_SINGLE => {
            let partition = read_partition(&mut cursor)?;
            let version = read_int64(&mut cursor)?;
            BackupRequest::Single(SingleBackupRequest::new(origin, partition, version, sync))
        }
        KIND_MULTI => {
            let count = read_int32(&mut cursor)?;
            if count < 1 {
                return Err(invalid(format!("batch with {} pairs", count)));
            }
            let mut versions = VersionMap::new();
            for _ in 0..count {
                let partition = read_partition(&mut cursor)?;
                let version = read_int64(&mut cursor)?;
                if versions.insert(partition, version).is_some() {
                    return Err(invalid(format!("duplicate partition {} in batch", partition)));
                }
            }
            BackupRequest::Multi(MultiBackupRequest::new(origin, versions, sync))
        }
        other => return Err(invalid(format!("unknown message kind: {}", other))),
    };

    if cursor.position() as usize != body.len() {
        return Err(invalid("trailing bytes after request body"));
    }
    Ok(request)
}

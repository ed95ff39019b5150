//! Little-endian walkers over raw device-control payloads.
//!
//! Two control calls hand back the same framing: the first 8 bytes of the
//! payload are the continuation cursor (next file-reference index for MFT
//! enumeration, next USN for journal reads), and the remainder is a tightly
//! packed run of variable-length version-2 records. All multi-byte fields
//! are read explicitly as little-endian; nothing here depends on host
//! endianness or in-memory struct layout.
//!
//! Malformed input never panics: a record with a zero, undersized or
//! overflowing length terminates the batch, while a record whose filename
//! is out of bounds or fails UTF-16 decoding is skipped on its own.

use crate::types::{file_index, JournalHeader};

/// Fixed portion of a version-2 record; the UTF-16 filename follows it.
pub const RECORD_FIXED_LEN: usize = 60;

/// Byte length of the packed journal-query output.
pub const JOURNAL_HEADER_LEN: usize = 56;

fn read_u16(data: &[u8], at: usize) -> Option<u16> {
    let bytes = data.get(at..at + 2)?;
    Some(u16::from_le_bytes(bytes.try_into().ok()?))
}

fn read_u32(data: &[u8], at: usize) -> Option<u32> {
    let bytes = data.get(at..at + 4)?;
    Some(u32::from_le_bytes(bytes.try_into().ok()?))
}

fn read_u64(data: &[u8], at: usize) -> Option<u64> {
    let bytes = data.get(at..at + 8)?;
    Some(u64::from_le_bytes(bytes.try_into().ok()?))
}

fn read_i64(data: &[u8], at: usize) -> Option<i64> {
    read_u64(data, at).map(|value| value as i64)
}

/// Continuation cursor of an MFT-enumeration payload.
pub fn lead_u64(payload: &[u8]) -> Option<u64> {
    read_u64(payload, 0)
}

/// Continuation cursor of a journal-read payload.
pub fn lead_i64(payload: &[u8]) -> Option<i64> {
    read_i64(payload, 0)
}

/// Parse the 56-byte journal-query output.
pub fn parse_journal_header(data: &[u8]) -> Option<JournalHeader> {
    if data.len() < JOURNAL_HEADER_LEN {
        return None;
    }
    Some(JournalHeader {
        journal_id: read_u64(data, 0)?,
        first_usn: read_i64(data, 8)?,
        next_usn: read_i64(data, 16)?,
        lowest_valid_usn: read_i64(data, 24)?,
        max_usn: read_i64(data, 32)?,
        max_size: read_u64(data, 40)?,
        allocation_delta: read_u64(data, 48)?,
    })
}

fn read_utf16_name(record: &[u8], offset: usize, len_bytes: usize) -> Option<String> {
    if len_bytes % 2 != 0 {
        return None;
    }
    let bytes = record.get(offset..offset + len_bytes)?;
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).ok()
}

/// Validated frame of the record at `offset`, or None to end the batch.
fn record_frame(data: &[u8], offset: usize) -> Option<(usize, usize)> {
    if offset + RECORD_FIXED_LEN > data.len() {
        return None;
    }
    let record_length = read_u32(data, offset)? as usize;
    if record_length < RECORD_FIXED_LEN || offset + record_length > data.len() {
        return None;
    }
    Some((offset, record_length))
}

/// One parent link observed during MFT enumeration.
///
/// References are already masked down to their 48-bit record index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MftLink {
    pub file_index: u64,
    pub parent_index: u64,
    pub name: String,
}

/// Walks the records of one MFT-enumeration payload.
pub struct MftEnumWalker<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> MftEnumWalker<'a> {
    /// Walk `payload`, skipping its 8-byte continuation cursor.
    pub fn new(payload: &'a [u8]) -> Self {
        MftEnumWalker {
            data: payload,
            offset: 8,
        }
    }
}

impl Iterator for MftEnumWalker<'_> {
    type Item = MftLink;

    fn next(&mut self) -> Option<MftLink> {
        loop {
            let (start, record_length) = record_frame(self.data, self.offset)?;
            self.offset += record_length;
            let record = &self.data[start..start + record_length];

            let index = file_index(read_u64(record, 8)?);
            let parent_index = file_index(read_u64(record, 16)?);
            let name_len = read_u16(record, 56)? as usize;
            let name_offset = read_u16(record, 58)? as usize;

            match read_utf16_name(record, name_offset, name_len) {
                Some(name) => {
                    return Some(MftLink {
                        file_index: index,
                        parent_index,
                        name,
                    })
                }
                // Undecodable name: the record contributes no parent link
                None => continue,
            }
        }
    }
}

/// One raw version-2 change record, before enrichment.
///
/// The file references are kept unmasked; only path resolution uses the
/// 48-bit index form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawChangeRecord {
    pub usn: i64,
    pub file_reference: u64,
    pub parent_file_reference: u64,
    pub timestamp: u64,
    pub reason: u32,
    pub attributes: u32,
    pub name: String,
}

/// Walks the version-2 records of one journal-read payload.
///
/// Records with any other major version are skipped, advancing by their
/// declared length.
pub struct UsnWalker<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> UsnWalker<'a> {
    /// Walk `payload`, skipping its 8-byte continuation cursor.
    pub fn new(payload: &'a [u8]) -> Self {
        UsnWalker {
            data: payload,
            offset: 8,
        }
    }
}

impl Iterator for UsnWalker<'_> {
    type Item = RawChangeRecord;

    fn next(&mut self) -> Option<RawChangeRecord> {
        loop {
            let (start, record_length) = record_frame(self.data, self.offset)?;
            self.offset += record_length;
            let record = &self.data[start..start + record_length];

            let major_version = read_u16(record, 4)?;
            if major_version != 2 {
                continue;
            }

            let name_len = read_u16(record, 56)? as usize;
            let name_offset = read_u16(record, 58)? as usize;
            let Some(name) = read_utf16_name(record, name_offset, name_len) else {
                continue;
            };

            return Some(RawChangeRecord {
                usn: read_i64(record, 24)?,
                file_reference: read_u64(record, 8)?,
                parent_file_reference: read_u64(record, 16)?,
                timestamp: read_u64(record, 32)?,
                reason: read_u32(record, 40)?,
                attributes: read_u32(record, 52)?,
                name,
            });
        }
    }
}

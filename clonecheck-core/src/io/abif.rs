//! Reader for ABIF capillary-sequencing trace files (`.ab1`).
//!
//! Layout: the 4-byte magic `ABIF`, a 2-byte version, then a root directory
//! entry at byte 6 whose data block is the array of 28-byte directory
//! entries. Every entry names a tagged payload; payloads of four bytes or
//! less are stored inline in the entry's offset field.

use std::borrow::Cow;
use std::io::{Cursor, Read};

use byteorder::{BigEndian, ReadBytesExt};

use crate::error::{CheckError, CheckResult};

pub const MAGIC: &[u8; 4] = b"ABIF";
pub const DIR_ENTRY_SIZE: usize = 28;
const ROOT_ENTRY_OFFSET: usize = 6;

/// Primary (edited) base calls.
pub const BASE_CALLS: (&[u8; 4], u32) = (b"PBAS", 1);
/// Per-base quality values matching [`BASE_CALLS`].
pub const QUALITY_VALUES: (&[u8; 4], u32) = (b"PCON", 1);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirEntry {
    pub tag: [u8; 4],
    pub tag_number: u32,
    pub element_type: u16,
    pub element_size: u16,
    pub element_count: u32,
    pub data_size: u32,
    pub data_offset: u32,
}

impl DirEntry {
    fn read(data: &[u8], offset: usize) -> Option<Self> {
        let raw = data.get(offset..offset.checked_add(DIR_ENTRY_SIZE)?)?;
        let mut cur = Cursor::new(raw);
        let mut tag = [0u8; 4];
        cur.read_exact(&mut tag).ok()?;
        Some(Self {
            tag,
            tag_number: cur.read_u32::<BigEndian>().ok()?,
            element_type: cur.read_u16::<BigEndian>().ok()?,
            element_size: cur.read_u16::<BigEndian>().ok()?,
            element_count: cur.read_u32::<BigEndian>().ok()?,
            data_size: cur.read_u32::<BigEndian>().ok()?,
            data_offset: cur.read_u32::<BigEndian>().ok()?,
        })
    }

    pub fn tag_name(&self) -> String {
        format!("{}{}", String::from_utf8_lossy(&self.tag), self.tag_number)
    }

    pub fn is(&self, tag: &[u8; 4], tag_number: u32) -> bool {
        &self.tag == tag && self.tag_number == tag_number
    }

    /// Raw payload bytes of this entry within `data`.
    pub fn payload<'a>(&self, data: &'a [u8]) -> CheckResult<Cow<'a, [u8]>> {
        let size = self.data_size as usize;
        if size <= 4 {
            let packed = self.data_offset.to_be_bytes();
            return Ok(Cow::Owned(packed[4 - size..].to_vec()));
        }
        let start = self.data_offset as usize;
        start
            .checked_add(size)
            .and_then(|end| data.get(start..end))
            .map(Cow::Borrowed)
            .ok_or_else(|| CheckError::InvalidFormat {
                msg: format!("entry {} points outside file bounds", self.tag_name()),
            })
    }
}

/// A parsed trace: the raw bytes plus their directory.
#[derive(Clone, Debug)]
pub struct AbifTrace<'a> {
    data: &'a [u8],
    version: u16,
    entries: Vec<DirEntry>,
}

impl<'a> AbifTrace<'a> {
    pub fn parse(data: &'a [u8]) -> CheckResult<Self> {
        if data.get(..4) != Some(MAGIC.as_slice()) {
            return Err(CheckError::InvalidFormat {
                msg: "missing ABIF header".to_string(),
            });
        }
        let root = DirEntry::read(data, ROOT_ENTRY_OFFSET).ok_or_else(|| {
            CheckError::InvalidFormat {
                msg: "truncated root directory entry".to_string(),
            }
        })?;
        let version = u16::from_be_bytes([data[4], data[5]]);

        let base = root.data_offset as usize;
        let mut entries = Vec::new();
        for i in 0..root.element_count as usize {
            let entry = i
                .checked_mul(DIR_ENTRY_SIZE)
                .and_then(|rel| base.checked_add(rel))
                .and_then(|offset| DirEntry::read(data, offset));
            match entry {
                Some(entry) => entries.push(entry),
                None => {
                    log::warn!(
                        "abif: directory declares {} entries but only {} fit in the file",
                        root.element_count,
                        i
                    );
                    break;
                }
            }
        }
        log::trace!("abif: version {version}, {} directory entries", entries.len());

        Ok(Self {
            data,
            version,
            entries,
        })
    }

    pub fn version(&self) -> u16 {
        self.version
    }

    pub fn entries(&self) -> &[DirEntry] {
        &self.entries
    }

    pub fn find(&self, tag: &[u8; 4], tag_number: u32) -> Option<&DirEntry> {
        self.entries.iter().find(|e| e.is(tag, tag_number))
    }

    pub fn payload(&self, entry: &DirEntry) -> CheckResult<Cow<'a, [u8]>> {
        entry.payload(self.data)
    }

    /// Called bases from `PBAS1`; bytes outside ASCII are dropped.
    pub fn base_calls(&self) -> CheckResult<String> {
        let (tag, number) = BASE_CALLS;
        let entry = self.find(tag, number).ok_or(CheckError::MissingBaseCalls)?;
        let raw = entry.payload(self.data)?;
        Ok(raw.iter().filter(|b| b.is_ascii()).map(|&b| b as char).collect())
    }

    /// Per-base quality values from `PCON1`, if the trace carries them.
    pub fn quality_values(&self) -> CheckResult<Option<Vec<u8>>> {
        let (tag, number) = QUALITY_VALUES;
        match self.find(tag, number) {
            Some(entry) => Ok(Some(entry.payload(self.data)?.into_owned())),
            None => Ok(None),
        }
    }
}

/// Primary base calls of a trace file in one step.
pub fn decode_base_calls(data: &[u8]) -> CheckResult<String> {
    AbifTrace::parse(data)?.base_calls()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use byteorder::WriteBytesExt;

    fn write_entry(out: &mut Vec<u8>, tag: &[u8; 4], number: u32, count: u32, size: u32, offset: u32) {
        out.extend_from_slice(tag);
        out.write_u32::<BigEndian>(number).unwrap();
        out.write_u16::<BigEndian>(2).unwrap();
        out.write_u16::<BigEndian>(1).unwrap();
        out.write_u32::<BigEndian>(count).unwrap();
        out.write_u32::<BigEndian>(size).unwrap();
        out.write_u32::<BigEndian>(offset).unwrap();
        out.extend_from_slice(&[0u8; 4]);
    }

    /// Minimal trace holding `entries` as (tag, number, payload).
    pub(crate) fn build_trace(entries: &[(&[u8; 4], u32, &[u8])]) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(MAGIC);
        data.write_u16::<BigEndian>(101).unwrap();
        data.resize(ROOT_ENTRY_OFFSET + DIR_ENTRY_SIZE, 0);

        let mut offsets = Vec::new();
        for (_, _, payload) in entries {
            if payload.len() > 4 {
                offsets.push(data.len() as u32);
                data.extend_from_slice(payload);
            } else {
                let mut packed = [0u8; 4];
                packed[4 - payload.len()..].copy_from_slice(payload);
                offsets.push(u32::from_be_bytes(packed));
            }
        }

        let dir_offset = data.len() as u32;
        for ((tag, number, payload), offset) in entries.iter().zip(&offsets) {
            let len = payload.len() as u32;
            write_entry(&mut data, tag, *number, len, len, *offset);
        }

        let mut root = Vec::new();
        let n = entries.len() as u32;
        write_entry(&mut root, b"tdir", 1, n, n * DIR_ENTRY_SIZE as u32, dir_offset);
        data[ROOT_ENTRY_OFFSET..ROOT_ENTRY_OFFSET + DIR_ENTRY_SIZE].copy_from_slice(&root);
        data
    }

    #[test]
    fn decodes_inline_base_calls() {
        let data = build_trace(&[(b"PBAS", 1, b"ACGT")]);
        assert_eq!(decode_base_calls(&data).unwrap(), "ACGT");
    }

    #[test]
    fn decodes_referenced_base_calls() {
        let data = build_trace(&[
            (b"PBAS", 2, b"TTTTTTTT"),
            (b"PBAS", 1, b"ACGTNNACGT"),
            (b"PCON", 1, &[20, 30, 40, 40, 10, 10, 40, 40, 30, 20]),
        ]);
        let trace = AbifTrace::parse(&data).unwrap();
        assert_eq!(trace.version(), 101);
        assert_eq!(trace.entries().len(), 3);
        assert_eq!(trace.base_calls().unwrap(), "ACGTNNACGT");
        assert_eq!(
            trace.quality_values().unwrap(),
            Some(vec![20, 30, 40, 40, 10, 10, 40, 40, 30, 20])
        );
        assert_eq!(trace.entries()[0].tag_name(), "PBAS2");
    }

    #[test]
    fn rejects_bad_magic() {
        let mut data = build_trace(&[(b"PBAS", 1, b"ACGT")]);
        data[0] = b'X';
        assert!(matches!(
            decode_base_calls(&data),
            Err(CheckError::InvalidFormat { .. })
        ));
        assert!(matches!(
            decode_base_calls(b"AB"),
            Err(CheckError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn truncated_root_entry() {
        assert!(matches!(
            decode_base_calls(b"ABIF\x00\x65\x00\x00"),
            Err(CheckError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn missing_primary_calls() {
        let data = build_trace(&[(b"PBAS", 2, b"ACGTACGT")]);
        assert_eq!(decode_base_calls(&data), Err(CheckError::MissingBaseCalls));
        let trace = AbifTrace::parse(&data).unwrap();
        assert_eq!(trace.quality_values().unwrap(), None);
    }

    #[test]
    fn payload_out_of_bounds() {
        let mut data = build_trace(&[(b"PBAS", 1, b"ACGTACGT")]);
        // data_offset field of the only directory entry
        let entry_start = data.len() - DIR_ENTRY_SIZE;
        data[entry_start + 20..entry_start + 24].copy_from_slice(&10_000u32.to_be_bytes());
        assert!(matches!(
            decode_base_calls(&data),
            Err(CheckError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn short_directory_keeps_readable_entries() {
        let mut data = build_trace(&[(b"PBAS", 1, b"ACGTACGT"), (b"PCON", 1, b"\x28\x28")]);
        data.truncate(data.len() - DIR_ENTRY_SIZE);
        let trace = AbifTrace::parse(&data).unwrap();
        assert_eq!(trace.entries().len(), 1);
        assert_eq!(trace.base_calls().unwrap(), "ACGTACGT");
    }

    #[test]
    fn drops_non_ascii_calls() {
        let data = build_trace(&[(b"PBAS", 1, b"AC\xffGT\x80")]);
        assert_eq!(decode_base_calls(&data).unwrap(), "ACGT");
    }

    #[test]
    fn empty_payload() {
        let data = build_trace(&[(b"PBAS", 1, b"")]);
        assert_eq!(decode_base_calls(&data).unwrap(), "");
    }
}

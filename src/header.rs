//! Bundle framing header.
//!
//! The header precedes the serialized object graph and carries the format
//! magic, version, the bundle name, and the graph length plus CRC32. The
//! graph checksum is verified on load; a mismatch is a fatal load error.

use crate::error::{MapforgeError, Result};
use crate::wire::{Reader, Writer};

pub const MAGIC: [u8; 8] = *b"MFRG\x00\x01\x00\x00";
pub const VERSION_MAJOR: u16 = 1;
pub const VERSION_MINOR: u16 = 0;

/// Outer framing of a bundle file.
#[derive(Debug, Clone, PartialEq)]
pub struct BundleHeader {
    pub magic: [u8; 8],
    pub version_major: u16,
    pub version_minor: u16,
    /// Public bundle name; also drives the output file name.
    pub name: String,
    pub graph_len: u64,
    pub graph_crc32: u32,
}

impl BundleHeader {
    pub fn new(name: &str) -> Self {
        BundleHeader {
            magic: MAGIC,
            version_major: VERSION_MAJOR,
            version_minor: VERSION_MINOR,
            name: name.into(),
            graph_len: 0,
            graph_crc32: 0,
        }
    }

    /// Validate magic and version.
    pub fn validate(&self) -> Result<()> {
        if self.magic != MAGIC {
            return Err(MapforgeError::InvalidMagic);
        }
        if self.version_major != VERSION_MAJOR || self.version_minor != VERSION_MINOR {
            return Err(MapforgeError::UnsupportedVersion {
                major: self.version_major,
                minor: self.version_minor,
            });
        }
        Ok(())
    }

    pub(crate) fn encode(&self, w: &mut Writer) -> Result<()> {
        w.put_raw(&self.magic);
        w.put_u16(self.version_major);
        w.put_u16(self.version_minor);
        w.put_string(&self.name)?;
        w.put_u64(self.graph_len);
        w.put_u32(self.graph_crc32);
        Ok(())
    }

    pub(crate) fn decode(r: &mut Reader<'_>) -> Result<Self> {
        let magic_bytes = r.read_exact(8)?;
        let mut magic = [0u8; 8];
        magic.copy_from_slice(&magic_bytes);
        let header = BundleHeader {
            magic,
            version_major: r.read_u16()?,
            version_minor: r.read_u16()?,
            name: r.read_string()?,
            graph_len: r.read_u64()?,
            graph_crc32: r.read_u32()?,
        };
        header.validate()?;
        Ok(header)
    }
}

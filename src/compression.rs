//! Bundle packing step.
//!
//! After the rewritten bundle is on disk, a compressed variant is emitted
//! next to it. The packed form is one method byte followed by the
//! compressed file contents.

use crate::error::{MapforgeError, Result};

/// Compression method for the packed bundle variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CompressionMethod {
    /// No compression
    None = 0,
    /// LZ4 compression (fast, moderate ratio)
    Lz4 = 1,
    /// Zstd compression (slower, better ratio)
    Zstd = 2,
}

impl CompressionMethod {
    /// Convert from the packed-file method byte.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(CompressionMethod::None),
            1 => Some(CompressionMethod::Lz4),
            2 => Some(CompressionMethod::Zstd),
            _ => None,
        }
    }
}

/// Compress data using the specified method.
pub fn compress(data: &[u8], method: CompressionMethod) -> Result<Vec<u8>> {
    match method {
        CompressionMethod::None => Ok(data.to_vec()),
        CompressionMethod::Lz4 => Ok(lz4_flex::compress_prepend_size(data)),
        CompressionMethod::Zstd => zstd::bulk::compress(data, 3)
            .map_err(|e| MapforgeError::Compression(format!("Zstd compression failed: {e}"))),
    }
}

/// Decompress data using the specified method.
pub fn decompress(data: &[u8], method: CompressionMethod) -> Result<Vec<u8>> {
    match method {
        CompressionMethod::None => Ok(data.to_vec()),
        CompressionMethod::Lz4 => lz4_flex::decompress_size_prepended(data)
            .map_err(|e| MapforgeError::Compression(format!("LZ4 decompression failed: {e}"))),
        CompressionMethod::Zstd => zstd::stream::decode_all(data)
            .map_err(|e| MapforgeError::Compression(format!("Zstd decompression failed: {e}"))),
    }
}

/// Produce the packed variant of a bundle file: method byte + payload.
pub fn pack_bundle(data: &[u8], method: CompressionMethod) -> Result<Vec<u8>> {
    let mut packed = Vec::with_capacity(data.len() / 2 + 1);
    packed.push(method as u8);
    packed.extend_from_slice(&compress(data, method)?);
    Ok(packed)
}

/// Unpack a packed bundle variant.
pub fn unpack_bundle(packed: &[u8]) -> Result<Vec<u8>> {
    let (&method_byte, payload) = packed
        .split_first()
        .ok_or(MapforgeError::Truncated("empty packed bundle"))?;
    let method = CompressionMethod::from_u8(method_byte).ok_or_else(|| {
        MapforgeError::Compression(format!("unknown compression method {method_byte}"))
    })?;
    decompress(payload, method)
}

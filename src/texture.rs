//! Pixel-buffer preparation for texture objects.
//!
//! Page buffers are stored bottom-up, so rows are flipped vertically before
//! they land in the payload. The field fill mirrors the engine's Texture2D
//! layout: RGBA32, single mip, no streaming.

use image::RgbaImage;

use crate::error::Result;
use crate::field::FieldNode;

/// RGBA32 format code.
pub const TEXTURE_FORMAT_RGBA32: i32 = 4;

/// Reverse the row order of a tightly packed 4-byte-per-pixel buffer.
pub fn flip_rows(data: &[u8], width: u32, height: u32) -> Vec<u8> {
    let stride = width as usize * 4;
    let mut flipped = vec![0u8; data.len()];
    for row in 0..height as usize {
        let src = row * stride;
        let dst = (height as usize - row - 1) * stride;
        flipped[dst..dst + stride].copy_from_slice(&data[src..src + stride]);
    }
    flipped
}

/// Fill a Texture2D-shaped field tree from a raw image.
pub fn fill_texture_fields(node: &mut FieldNode, image: &RgbaImage, name: &str) -> Result<()> {
    let (width, height) = image.dimensions();
    let data = flip_rows(image.as_raw(), width, height);

    node.set_string("m_Name", name)?;
    node.set_i32("m_ForcedFallbackFormat", 4)?;
    node.set_bool("m_DownscaleFallback", false)?;
    node.set_i32("m_Width", width as i32)?;
    node.set_i32("m_Height", height as i32)?;
    node.set_u32("m_CompleteImageSize", data.len() as u32)?;
    node.set_i32("m_TextureFormat", TEXTURE_FORMAT_RGBA32)?;
    node.set_i32("m_MipCount", 1)?;
    node.set_bool("m_IsReadable", false)?;
    node.set_bool("m_StreamingMipmaps", false)?;
    node.set_i32("m_StreamingMipmapsPriority", 0)?;
    node.set_i32("m_ImageCount", 1)?;
    node.set_i32("m_TextureDimension", 2)?;
    node.set_i32("m_TextureSettings.m_FilterMode", 1)?;
    node.set_i32("m_TextureSettings.m_Aniso", 1)?;
    node.set_f32("m_TextureSettings.m_MipBias", 0.0)?;
    node.set_i32("m_TextureSettings.m_WrapU", 1)?;
    node.set_i32("m_TextureSettings.m_WrapV", 1)?;
    node.set_i32("m_TextureSettings.m_WrapW", 1)?;
    node.set_i32("m_LightmapFormat", 0)?;
    node.set_i32("m_ColorSpace", 1)?;
    node.set_bytes("image data", data)?;
    node.set_string("m_StreamData.path", "")?;
    Ok(())
}

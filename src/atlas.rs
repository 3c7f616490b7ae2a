//! Sprite-atlas synthesis.
//!
//! Packs equally-sized source images into fixed 1024x1024 pages on a
//! row-major grid, stages one texture object per page and one sprite object
//! per image, and rebuilds the owning atlas object's render-data map,
//! packed-sprite list, and name index wholesale from this run's placements.
//!
//! The page buffer is stored bottom-up while the grid scan is top-down, so
//! every render-data rectangle's y is flipped: `y' = image_height - cell_y`.

use std::path::Path;

use image::RgbaImage;
use rand::Rng;
use tracing::info;
use walkdir::WalkDir;

use crate::bundle::Bundle;
use crate::error::{MapforgeError, Result};
use crate::field::{FieldNode, FieldValue};

/// Page edge length in pixels.
pub const PAGE_DIM: u32 = 1024;

/// Discriminant stored in every render key's `second` lane.
const RENDER_KEY_KIND: i64 = 21300000;

/// One packed image: grid position in pixels and owning page.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
    pub page: usize,
}

/// Identifiers produced by one packing run.
#[derive(Debug, Default)]
pub struct AtlasOutput {
    /// Texture identifier per page, page order.
    pub page_ids: Vec<i64>,
    /// Sprite identifier per image, placement order.
    pub sprite_ids: Vec<(String, i64)>,
}

/// Row-major grid plan for `count` images of `img_w` x `img_h` pixels.
///
/// Returns one placement per image; the final page keeps any unfilled cells
/// blank. An image larger than the page cannot be planned.
pub fn plan_placements(count: usize, img_w: u32, img_h: u32) -> Result<Vec<Placement>> {
    let cols = PAGE_DIM / img_w;
    let rows = PAGE_DIM / img_h;
    if cols == 0 || rows == 0 {
        return Err(MapforgeError::AtlasImageSize {
            name: "atlas source".into(),
            width: img_w,
            height: img_h,
            expected_width: PAGE_DIM,
            expected_height: PAGE_DIM,
        });
    }
    let per_page = (cols * rows) as usize;
    let mut placements = Vec::with_capacity(count);
    for index in 0..count {
        let page = index / per_page;
        let cell = (index % per_page) as u32;
        placements.push(Placement {
            x: (cell % cols) * img_w,
            y: (cell / cols) * img_h,
            page,
        });
    }
    Ok(placements)
}

/// Pack every `.png` under `pictos_dir` and wire the results into the
/// bundle: page textures, sprites, and the rebuilt atlas object(s).
pub fn build_atlas(
    bundle: &mut Bundle,
    pictos_dir: &Path,
    map_name: &str,
    atlas_id: i64,
) -> Result<AtlasOutput> {
    info!("Making atlas...");

    let sources = load_sources(pictos_dir)?;
    let (img_w, img_h) = sources
        .first()
        .map(|(_, img)| img.dimensions())
        .unwrap_or((0, 0));

    let placements = if sources.is_empty() {
        Vec::new()
    } else {
        plan_placements(sources.len(), img_w, img_h)?
    };
    let page_count = placements.last().map_or(0, |p| p.page + 1);

    // Composite pages and stage one texture object per page.
    let mut output = AtlasOutput::default();
    for page_index in 0..page_count {
        let mut page = RgbaImage::new(PAGE_DIM, PAGE_DIM);
        for ((_, img), placement) in sources.iter().zip(&placements) {
            if placement.page == page_index {
                image::imageops::replace(&mut page, img, placement.x as i64, placement.y as i64);
            }
        }
        let name = format!("sactx-{page_index}-{PAGE_DIM}x{PAGE_DIM}-Crunch-{map_name}");
        output.page_ids.push(bundle.write_texture(&page, &name)?);
    }

    // Random render keys, one per image, shared between the sprite and its
    // render-data entry.
    let mut rng = rand::thread_rng();
    let keys: Vec<[u32; 4]> = sources
        .iter()
        .map(|_| std::array::from_fn(|_| rng.gen_range(0..0x00ff_ffff)))
        .collect();

    // One sprite object per placed image.
    let (sprite_type, base_sprite) = sprite_base(bundle)?;
    for (((name, _), placement), key) in sources.iter().zip(&placements).zip(&keys) {
        let page_id = output.page_ids[placement.page];
        let mut sprite = base_sprite.clone();
        sprite.set_string("m_Name", name)?;
        set_render_key(&mut sprite, "m_RenderDataKey.first.data", key)?;
        sprite.set_i64("m_RenderDataKey.second", RENDER_KEY_KIND)?;
        sprite.clear_children("m_AtlasTags.Array")?;
        let tag = sprite.append_default_child("m_AtlasTags.Array")?;
        tag.value = FieldValue::String(map_name.into());
        sprite.set_i64("m_SpriteAtlas.m_PathID", atlas_id)?;
        sprite.set_i64("m_RD.texture.m_PathID", page_id)?;
        for rect in ["m_Rect", "m_RD.textureRect"] {
            sprite.set_f32(&format!("{rect}.x"), placement.x as f32)?;
            sprite.set_f32(&format!("{rect}.y"), img_h as f32 - placement.y as f32)?;
            sprite.set_f32(&format!("{rect}.width"), img_w as f32)?;
            sprite.set_f32(&format!("{rect}.height"), img_h as f32)?;
        }
        let sprite_id = bundle.allocate_path_id();
        bundle.stage_field(sprite_id, sprite_type, &sprite)?;
        output.sprite_ids.push((name.clone(), sprite_id));
    }

    // Rebuild the owning atlas object(s) wholesale from this run.
    for (path_id, type_id) in bundle.objects_of_class("SpriteAtlas") {
        let mut atlas = bundle.base_field(path_id)?;
        atlas.set_string("m_Name", map_name)?;
        atlas.set_string("m_Tag", map_name)?;

        atlas.clear_children("m_RenderDataMap.Array")?;
        for (((_, _), placement), key) in sources.iter().zip(&placements).zip(&keys) {
            let page_id = output.page_ids[placement.page];
            let entry = atlas.append_default_child("m_RenderDataMap.Array")?;
            set_render_key(entry, "first.first.data", key)?;
            entry.set_i64("first.second", RENDER_KEY_KIND)?;
            entry.set_i64("second.texture.m_PathID", page_id)?;
            entry.set_f32("second.textureRect.x", placement.x as f32)?;
            entry.set_f32("second.textureRect.y", img_h as f32 - placement.y as f32)?;
            entry.set_f32("second.textureRect.width", img_w as f32)?;
            entry.set_f32("second.textureRect.height", img_h as f32)?;
            entry.set_f32("second.atlasRectOffset.x", -1.0)?;
            entry.set_f32("second.atlasRectOffset.y", -1.0)?;
            entry.set_f32("second.uvTransform.x", 100.0)?;
            entry.set_f32("second.uvTransform.y", 256.0)?;
            entry.set_f32("second.uvTransform.z", 100.0)?;
            entry.set_f32("second.uvTransform.w", 256.0)?;
            entry.set_f32("second.downscaleMultiplier", 1.0)?;
            entry.set_u32("second.settingsRaw", 3)?;
        }

        atlas.clear_children("m_PackedSprites.Array")?;
        for (_, sprite_id) in &output.sprite_ids {
            let entry = atlas.append_default_child("m_PackedSprites.Array")?;
            entry.set_i64("m_PathID", *sprite_id)?;
        }

        atlas.clear_children("m_PackedSpriteNamesToIndex.Array")?;
        for (name, _) in &output.sprite_ids {
            let entry = atlas.append_default_child("m_PackedSpriteNamesToIndex.Array")?;
            entry.value = FieldValue::String(name.clone());
        }

        bundle.stage_field(path_id, type_id, &atlas)?;
    }

    Ok(output)
}

/// Load every `.png` under `dir` (recursive, sorted by path for stable
/// placement order), enforcing the uniform-size precondition.
fn load_sources(dir: &Path) -> Result<Vec<(String, RgbaImage)>> {
    let mut files: Vec<_> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
        })
        .collect();
    files.sort();

    let mut sources = Vec::with_capacity(files.len());
    let mut expected: Option<(u32, u32)> = None;
    for path in files {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let img = image::open(&path)?.to_rgba8();
        let dims = img.dimensions();
        match expected {
            None => expected = Some(dims),
            Some((w, h)) if dims != (w, h) => {
                return Err(MapforgeError::AtlasImageSize {
                    name,
                    width: dims.0,
                    height: dims.1,
                    expected_width: w,
                    expected_height: h,
                });
            }
            Some(_) => {}
        }
        sources.push((name, img));
    }
    Ok(sources)
}

/// First existing sprite object as the base shape, falling back to the
/// schema default when the base bundle carries none.
fn sprite_base(bundle: &Bundle) -> Result<(u32, FieldNode)> {
    let schema = bundle.schemas().require_class("Sprite")?;
    let type_id = schema.type_id;
    let node = match bundle.first_object_of_class("Sprite") {
        Some((path_id, _)) => bundle.base_field(path_id)?,
        None => schema.template.instantiate(),
    };
    Ok((type_id, node))
}

/// Write the four 32-bit lanes of a render key, rebuilding the lane array.
fn set_render_key(node: &mut FieldNode, data_path: &str, key: &[u32; 4]) -> Result<()> {
    let array_path = format!("{data_path}.Array");
    node.clear_children(&array_path)?;
    for lane in key {
        let item = node.append_default_child(&array_path)?;
        item.value = FieldValue::UInt32(*lane);
    }
    Ok(())
}

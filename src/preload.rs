//! Preload table and container index rebuild.
//!
//! After all mutation and allocation is done, the bundle-manifest object's
//! lookup tables are rebuilt wholesale: one preload row per identifier
//! (pre-existing objects first, then this run's allocations), and one
//! container row per preload row, all sharing a single public name with
//! `preloadIndex` 0 and `preloadSize` equal to the total row count.

use crate::error::Result;
use crate::field::FieldNode;

/// Rebuild `m_PreloadTable` and `m_Container` on the manifest field tree.
pub fn rebuild_preload_index(
    manifest: &mut FieldNode,
    path_ids: &[i64],
    container_name: &str,
) -> Result<()> {
    manifest.clear_children("m_PreloadTable.Array")?;
    for path_id in path_ids {
        let row = manifest.append_default_child("m_PreloadTable.Array")?;
        row.set_i32("m_FileID", 0)?;
        row.set_i64("m_PathID", *path_id)?;
    }

    let total = path_ids.len() as i32;
    manifest.clear_children("m_Container.Array")?;
    for path_id in path_ids {
        let row = manifest.append_default_child("m_Container.Array")?;
        row.set_string("first", container_name)?;
        row.set_i32("second.preloadIndex", 0)?;
        row.set_i32("second.preloadSize", total)?;
        row.set_i32("second.asset.m_FileID", 0)?;
        row.set_i64("second.asset.m_PathID", *path_id)?;
    }
    Ok(())
}

/// Write the public bundle name into the manifest object.
pub fn set_bundle_name(manifest: &mut FieldNode, name: &str) -> Result<()> {
    manifest.set_string("m_Name", name)?;
    manifest.set_string("m_AssetBundleName", name)?;
    Ok(())
}

//! End-to-end map package pipeline.
//!
//! Loads the base bundle, parses the authored descriptors, dispatches the
//! per-object patchers, rebuilds the preload/container index over every
//! surviving and newly created identifier, renames the bundle after the
//! descriptor's map name, and writes the result.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::bundle::Bundle;
use crate::descriptor::{MusicTrackStructure, SongData};
use crate::error::{MapforgeError, Result};
use crate::patch::{self, PatchContext};
use crate::preload;

/// Public name shared by every container-index row.
pub const CONTAINER_NAME: &str = "MapPackage";

/// One map-package build: base bundle plus the authored data folder.
pub struct MapPackage {
    base_bundle: PathBuf,
    song_path: PathBuf,
    track_path: PathBuf,
    classifiers_dir: PathBuf,
    pictos_dir: PathBuf,
    container_name: String,
}

impl MapPackage {
    /// Standard map folder layout: `songdata.json`, `musictrack.json`,
    /// `MoveSpace/`, `Pictos/`.
    pub fn new(base_bundle: &Path, map_dir: &Path) -> Self {
        Self::with_paths(
            base_bundle,
            &map_dir.join("songdata.json"),
            &map_dir.join("musictrack.json"),
            &map_dir.join("MoveSpace"),
            &map_dir.join("Pictos"),
        )
    }

    pub fn with_paths(
        base_bundle: &Path,
        song_path: &Path,
        track_path: &Path,
        classifiers_dir: &Path,
        pictos_dir: &Path,
    ) -> Self {
        MapPackage {
            base_bundle: base_bundle.into(),
            song_path: song_path.into(),
            track_path: track_path.into(),
            classifiers_dir: classifiers_dir.into(),
            pictos_dir: pictos_dir.into(),
            container_name: CONTAINER_NAME.into(),
        }
    }

    /// Run the whole pipeline and return the path of the rewritten bundle.
    pub fn replace(&self, out_dir: &Path) -> Result<PathBuf> {
        info!("Loading base bundle...");
        let mut bundle = Bundle::load(&self.base_bundle)?;

        let song: SongData = serde_json::from_slice(&fs::read(&self.song_path)?)?;
        let track: MusicTrackStructure = serde_json::from_slice(&fs::read(&self.track_path)?)?;
        let map_name = song.map_name.clone();

        info!("Patching objects...");
        let script_objects = bundle.script_objects();
        {
            let mut ctx = PatchContext::new(
                &mut bundle,
                &song,
                &track,
                &self.classifiers_dir,
                &self.pictos_dir,
            );
            for obj in script_objects {
                match patch::lookup(&obj.script_name) {
                    Some(patch_fn) => {
                        let mut node = ctx.bundle.base_field(obj.path_id)?;
                        patch_fn(&mut ctx, &mut node)?;
                        ctx.bundle.stage_field(obj.path_id, obj.type_id, &node)?;
                    }
                    None => warn!("Unknown MonoBehaviour: {}", obj.script_name),
                }
            }
        }

        let (manifest_id, manifest_type) = bundle
            .first_object_of_class("AssetBundle")
            .ok_or(MapforgeError::MissingObject("AssetBundle"))?;
        let mut manifest = bundle.base_field(manifest_id)?;
        preload::rebuild_preload_index(&mut manifest, &bundle.preload_order(), &self.container_name)?;
        let bundle_name = format!("{map_name}_MapPackage");
        preload::set_bundle_name(&mut manifest, &bundle_name)?;
        bundle.stage_field(manifest_id, manifest_type, &manifest)?;
        bundle.set_name(&bundle_name);

        info!("Writing modded bundle...");
        bundle.write(out_dir)
    }
}

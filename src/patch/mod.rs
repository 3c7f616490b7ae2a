//! Patch dispatch.
//!
//! Behaviour objects are dispatched by script name through a fixed table of
//! patch functions. A script with no registered patcher is skipped — the
//! caller logs it and the run continues.

pub mod map;
pub mod track;

use std::path::Path;

use crate::bundle::Bundle;
use crate::descriptor::{MusicTrackStructure, SongData};
use crate::error::Result;
use crate::field::FieldNode;

/// Shared state for one patch run.
pub struct PatchContext<'a> {
    pub bundle: &'a mut Bundle,
    pub song: &'a SongData,
    pub track: &'a MusicTrackStructure,
    pub classifiers_dir: &'a Path,
    pub pictos_dir: &'a Path,
    /// Classifier identifier table: lower-cased file name -> identifier,
    /// registration order. Later files with the same name overwrite the
    /// identifier in place.
    pub classifier_ids: Vec<(String, i64)>,
}

impl<'a> PatchContext<'a> {
    pub fn new(
        bundle: &'a mut Bundle,
        song: &'a SongData,
        track: &'a MusicTrackStructure,
        classifiers_dir: &'a Path,
        pictos_dir: &'a Path,
    ) -> Self {
        PatchContext {
            bundle,
            song,
            track,
            classifiers_dir,
            pictos_dir,
            classifier_ids: Vec::new(),
        }
    }
}

/// A schema-specific patch function: mutates the object's field tree (and,
/// for the map patcher, the bundle itself).
pub type PatchFn = fn(&mut PatchContext<'_>, &mut FieldNode) -> Result<()>;

const PATCHERS: &[(&str, PatchFn)] = &[("JDMap", map::patch), ("MusicTrack", track::patch)];

/// Resolve the patch function for a script name.
pub fn lookup(script_name: &str) -> Option<PatchFn> {
    PATCHERS
        .iter()
        .find(|(name, _)| *name == script_name)
        .map(|(_, f)| *f)
}

//! Map object patcher.
//!
//! Rewrites the primary map behaviour from the song descriptor. Runs the
//! classifier insertion and atlas synthesis first: the move-model and
//! sprite reference fields need identifiers that do not exist until those
//! steps have staged their objects.
//!
//! Array fields are rebuilt destructively — prior contents never survive a
//! patch. Scalar fields fall back to the documented defaults below; these
//! are user-visible and reproduced exactly.

use std::fs;
use std::path::Path;

use tracing::info;
use walkdir::WalkDir;

use crate::atlas;
use crate::descriptor::{DanceTapeData, KaraokeData, SongDesc, MOVE_TYPE_FULL_BODY};
use crate::error::Result;
use crate::field::FieldNode;
use crate::patch::PatchContext;

const DEFAULT_JD_VERSION: i32 = 2023;
const DEFAULT_ORIGINAL_JD_VERSION: i32 = 3333;
const DEFAULT_ARTIST: &str = "Unknown Artist";
const DEFAULT_TITLE: &str = "Unknown Title";
const DEFAULT_CREDITS: &str = "All rights of the producer and other rightholders to the recorded work reserved. Unless otherwise authorized, the duplication, rental, loan, exchange or use of this video game for public performance, broadcasting and online distribution to the public are prohibited.";

pub fn patch(ctx: &mut PatchContext<'_>, node: &mut FieldNode) -> Result<()> {
    let map_name = ctx.song.map_name.clone();
    let atlas_id = node.get_i64("PictogramAtlas.m_PathID")?;

    insert_classifiers(ctx)?;
    atlas::build_atlas(ctx.bundle, ctx.pictos_dir, &map_name, atlas_id)?;

    info!("Modding song data");
    info!(
        "Replacing {} with {}",
        node.get_string("MapName")?,
        map_name
    );

    node.set_string("m_Name", &map_name)?;
    node.set_string("MapName", &map_name)?;
    node.set_string("KaraokeData.MapName", &map_name)?;
    node.set_string("DanceData.MapName", &map_name)?;

    patch_song_desc(node.get_mut("SongDesc")?, &ctx.song.song_desc, &map_name)?;
    patch_karaoke_data(node.get_mut("KaraokeData")?, &ctx.song.karaoke_data)?;
    patch_dance_data(node.get_mut("DanceData")?, &ctx.song.dance_data)?;
    patch_move_models(node, &ctx.classifier_ids)?;
    patch_coach_datas(node, ctx)?;
    Ok(())
}

/// Stage every classifier file as a raw asset, keyed by lower-cased file
/// name. Later files with the same name overwrite the mapping.
fn insert_classifiers(ctx: &mut PatchContext<'_>) -> Result<()> {
    info!("Inserting classifiers...");
    let mut files: Vec<_> = WalkDir::new(ctx.classifiers_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("msm"))
        })
        .collect();
    files.sort();

    for path in files {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let bytes = fs::read(&path)?;
        let path_id = ctx.bundle.write_blob(&file_name, bytes)?;
        let key = file_name.to_lowercase();
        match ctx.classifier_ids.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = path_id,
            None => ctx.classifier_ids.push((key, path_id)),
        }
    }
    Ok(())
}

pub(crate) fn patch_song_desc(
    field: &mut FieldNode,
    desc: &SongDesc,
    map_name: &str,
) -> Result<()> {
    field.set_string("MapName", desc.map_name.as_deref().unwrap_or(map_name))?;
    field.set_i32("JDVersion", desc.jd_version.unwrap_or(DEFAULT_JD_VERSION))?;
    field.set_i32(
        "OriginalJDVersion",
        desc.original_jd_version
            .unwrap_or(DEFAULT_ORIGINAL_JD_VERSION),
    )?;
    field.set_string("Artist", desc.artist.as_deref().unwrap_or(DEFAULT_ARTIST))?;
    field.set_string("Title", desc.title.as_deref().unwrap_or(DEFAULT_TITLE))?;
    field.set_string("Credits", desc.credits.as_deref().unwrap_or(DEFAULT_CREDITS))?;
    field.set_i32("NumCoach", desc.num_coach.unwrap_or(1))?;
    field.set_i32("MainCoach", desc.main_coach.unwrap_or(0))?;
    field.set_i32("Difficulty", desc.difficulty.unwrap_or(1))?;
    field.set_i32("SweatDifficulty", desc.sweat_difficulty.unwrap_or(1))?;
    Ok(())
}

pub(crate) fn patch_karaoke_data(field: &mut FieldNode, data: &KaraokeData) -> Result<()> {
    field.clear_children("Clips.Array")?;
    for container in &data.clips {
        let clip = &container.karaoke_clip;
        let item = field.append_default_child("Clips.Array")?;
        item.set_i64("KaraokeClip.Id", clip.id.unwrap_or(0))?;
        item.set_f64("KaraokeClip.TrackId", clip.track_id.unwrap_or(0.0))?;
        item.set_i32("KaraokeClip.StartTime", clip.start_time.unwrap_or(0))?;
        item.set_i32("KaraokeClip.Duration", clip.duration.unwrap_or(0))?;
        item.set_u8("KaraokeClip.IsActive", clip.is_active.unwrap_or(0))?;
        item.set_string("KaraokeClip.Lyrics", clip.lyrics.as_deref().unwrap_or(""))?;
        item.set_f64("KaraokeClip.Pitch", clip.pitch.unwrap_or(0.0))?;
        item.set_i32("KaraokeClip.IsEndOfLine", clip.is_end_of_line.unwrap_or(0))?;
        // The runtime only understands lyric clips; the authored value is
        // ignored on purpose.
        item.set_i32("KaraokeClip.ContentType", 1)?;
        item.set_i32(
            "KaraokeClip.SemitoneTolerance",
            clip.semitone_tolerance.unwrap_or(0),
        )?;
        item.set_i32(
            "KaraokeClip.StartTimeTolerance",
            clip.start_time_tolerance.unwrap_or(0),
        )?;
        item.set_i32(
            "KaraokeClip.EndTimeTolerance",
            clip.end_time_tolerance.unwrap_or(0),
        )?;
    }
    Ok(())
}

pub(crate) fn patch_dance_data(field: &mut FieldNode, data: &DanceTapeData) -> Result<()> {
    field.clear_children("MotionClips.Array")?;
    for clip in &data.motion_clips {
        // Full-body clips are dropped, not patched.
        if clip.move_type.unwrap_or(0) == MOVE_TYPE_FULL_BODY {
            continue;
        }
        let item = field.append_default_child("MotionClips.Array")?;
        item.set_i64("Id", clip.id.unwrap_or(0))?;
        item.set_f64("TrackId", clip.track_id.unwrap_or(0.0))?;
        item.set_i32("StartTime", clip.start_time.unwrap_or(0))?;
        item.set_i32("Duration", clip.duration.unwrap_or(0))?;
        item.set_u8("IsActive", clip.is_active.unwrap_or(0))?;
        item.set_string("MoveName", clip.move_name.as_deref().unwrap_or(""))?;
        item.set_u8("GoldMove", clip.gold_move.unwrap_or(0))?;
        item.set_i32("CoachId", clip.coach_id.unwrap_or(0))?;
        item.set_i32("MoveType", clip.move_type.unwrap_or(0))?;
        item.set_string("Color", clip.color.as_deref().unwrap_or(""))?;
    }

    field.clear_children("PictoClips.Array")?;
    for clip in &data.picto_clips {
        let item = field.append_default_child("PictoClips.Array")?;
        item.set_i64("Id", clip.id.unwrap_or(0))?;
        item.set_f64("TrackId", clip.track_id.unwrap_or(0.0))?;
        item.set_i32("StartTime", clip.start_time.unwrap_or(0))?;
        item.set_i32("Duration", clip.duration.unwrap_or(0))?;
        item.set_u8("IsActive", clip.is_active.unwrap_or(0))?;
        item.set_string("PictoPath", clip.picto_path.as_deref().unwrap_or(""))?;
        item.set_u32("CoachCount", clip.coach_count.unwrap_or(4294967295))?;
    }

    field.clear_children("GoldEffectClips.Array")?;
    for clip in &data.gold_effect_clips {
        let item = field.append_default_child("GoldEffectClips.Array")?;
        item.set_i64("Id", clip.id.unwrap_or(0))?;
        item.set_f64("TrackId", clip.track_id.unwrap_or(0.0))?;
        item.set_i32("StartTime", clip.start_time.unwrap_or(0))?;
        item.set_i32("Duration", clip.duration.unwrap_or(0))?;
        item.set_u8("IsActive", clip.is_active.unwrap_or(0))?;
        item.set_i32("GoldEffectType", clip.gold_effect_type.unwrap_or(1))?;
    }

    field.clear_children("HideHudClips.Array")?;
    for clip in &data.hide_hud_clips {
        let item = field.append_default_child("HideHudClips.Array")?;
        item.set_i32("StartTime", clip.start_time.unwrap_or(0))?;
        item.set_i32("Duration", clip.duration.unwrap_or(0))?;
        item.set_u8("IsActive", clip.is_active.unwrap_or(0))?;
    }
    Ok(())
}

pub(crate) fn patch_move_models(
    node: &mut FieldNode,
    classifier_ids: &[(String, i64)],
) -> Result<()> {
    // Camera move-model fields only exist in some engine revisions; absence
    // is not an error.
    for path in [
        "CameraMoveModels.list.Array",
        "CameraBlazePoseMoveModels.list.Array",
    ] {
        if node.find(path).is_some() {
            node.clear_children(path)?;
        }
    }

    node.clear_children("HandDeviceMoveModels.list.Array")?;
    for (file_name, path_id) in classifier_ids {
        let item = node.append_default_child("HandDeviceMoveModels.list.Array")?;
        let stem = Path::new(file_name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        item.set_string("Key", &stem)?;
        item.set_i32("Value.m_FileID", 0)?;
        item.set_i64("Value.m_PathID", *path_id)?;
    }
    Ok(())
}

fn patch_coach_datas(node: &mut FieldNode, ctx: &PatchContext<'_>) -> Result<()> {
    for (path, datas) in [
        ("FullBodyCoachDatas.Array", &ctx.song.full_body_coach_datas),
        ("HandOnlyCoachDatas.Array", &ctx.song.hand_only_coach_datas),
    ] {
        node.clear_children(path)?;
        for data in datas {
            let item = node.append_default_child(path)?;
            item.set_u32("GoldMovesCount", data.gold_moves_count.unwrap_or(0))?;
            item.set_u32(
                "StandardMovesCount",
                data.standard_moves_count.unwrap_or(0),
            )?;
        }
    }
    Ok(())
}

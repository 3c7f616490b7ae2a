//! Music track patcher.
//!
//! Rewrites the track behaviour's embedded structure from the track
//! descriptor: beat window, preview window, and the four timeline arrays
//! (signatures, markers, sections, comments), each rebuilt destructively.

use crate::descriptor::MusicTrackStructure;
use crate::error::Result;
use crate::field::FieldNode;
use crate::patch::PatchContext;

pub fn patch(ctx: &mut PatchContext<'_>, node: &mut FieldNode) -> Result<()> {
    patch_structure(node.get_mut("m_structure.MusicTrackStructure")?, ctx.track)
}

pub(crate) fn patch_structure(field: &mut FieldNode, track: &MusicTrackStructure) -> Result<()> {
    field.set_i32("startBeat", track.start_beat.unwrap_or(0))?;
    field.set_i32("endBeat", track.end_beat.unwrap_or(0))?;
    field.set_f64("videoStartTime", track.video_start_time.unwrap_or(0.0))?;
    field.set_f64("previewEntry", track.preview_entry.unwrap_or(0.0))?;
    field.set_f64("previewLoopStart", track.preview_loop_start.unwrap_or(0.0))?;
    field.set_f64("previewLoopEnd", track.preview_loop_end.unwrap_or(30.0))?;
    field.set_f64("previewDuration", track.preview_duration.unwrap_or(30.0))?;

    field.clear_children("signatures.Array")?;
    for container in &track.signatures {
        let signature = &container.music_signature;
        let item = field.append_default_child("signatures.Array")?;
        item.set_i32("MusicSignature.beats", signature.beats.unwrap_or(0))?;
        item.set_f64("MusicSignature.marker", signature.marker.unwrap_or(0.0))?;
        item.set_string(
            "MusicSignature.comment",
            signature.comment.as_deref().unwrap_or(""),
        )?;
    }

    field.clear_children("markers.Array")?;
    for marker in &track.markers {
        let item = field.append_default_child("markers.Array")?;
        item.set_i64("VAL", marker.val.unwrap_or(0))?;
    }

    field.clear_children("sections.Array")?;
    for container in &track.sections {
        let section = &container.music_section;
        let item = field.append_default_child("sections.Array")?;
        item.set_i32("MusicSection.sectionType", section.section_type.unwrap_or(0))?;
        item.set_i64("MusicSection.marker", section.marker.unwrap_or(0))?;
        item.set_string(
            "MusicSection.comment",
            section.comment.as_deref().unwrap_or(""),
        )?;
    }

    field.clear_children("comments.Array")?;
    for container in &track.comments {
        let comment = &container.comment;
        let item = field.append_default_child("comments.Array")?;
        item.set_f64("Comment.marker", comment.marker.unwrap_or(0.0))?;
        item.set_string(
            "Comment.commentType",
            comment.comment_type.as_deref().unwrap_or(""),
        )?;
        item.set_string("Comment.comment", comment.comment.as_deref().unwrap_or(""))?;
    }
    Ok(())
}

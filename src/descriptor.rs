//! External descriptor model.
//!
//! Serde mirror of the authored JSON describing a song/map. Every optional
//! key deserializes to `None` (or an empty list) — a missing key is never
//! an error; the patch layer supplies the documented defaults. JSON key
//! names are part of the authoring format and are preserved exactly.

use serde::Deserialize;

/// Engine object reference as it appears in descriptor data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PPtr {
    #[serde(rename = "m_FileID")]
    pub file_id: Option<i32>,
    #[serde(rename = "m_PathID")]
    pub path_id: Option<i64>,
}

/// Top-level song descriptor (`songdata.json`).
#[derive(Debug, Clone, Deserialize)]
pub struct SongData {
    #[serde(rename = "MapName")]
    pub map_name: String,
    #[serde(rename = "SongDesc", default)]
    pub song_desc: SongDesc,
    #[serde(rename = "KaraokeData", default)]
    pub karaoke_data: KaraokeData,
    #[serde(rename = "DanceData", default)]
    pub dance_data: DanceTapeData,
    #[serde(rename = "TrackData", default)]
    pub track_data: Option<PPtr>,
    #[serde(rename = "PictogramAtlas", default)]
    pub pictogram_atlas: Option<PPtr>,
    #[serde(rename = "FullBodyCoachDatas", default)]
    pub full_body_coach_datas: Vec<CoachData>,
    #[serde(rename = "HandOnlyCoachDatas", default)]
    pub hand_only_coach_datas: Vec<CoachData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SongDesc {
    #[serde(rename = "MapName")]
    pub map_name: Option<String>,
    #[serde(rename = "JDVersion")]
    pub jd_version: Option<i32>,
    #[serde(rename = "OriginalJDVersion")]
    pub original_jd_version: Option<i32>,
    #[serde(rename = "Artist")]
    pub artist: Option<String>,
    #[serde(rename = "DancerName")]
    pub dancer_name: Option<String>,
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Credits")]
    pub credits: Option<String>,
    #[serde(rename = "NumCoach")]
    pub num_coach: Option<i32>,
    #[serde(rename = "MainCoach")]
    pub main_coach: Option<i32>,
    #[serde(rename = "Difficulty")]
    pub difficulty: Option<i32>,
    #[serde(rename = "SweatDifficulty")]
    pub sweat_difficulty: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KaraokeData {
    #[serde(rename = "TapeClock")]
    pub tape_clock: Option<i32>,
    #[serde(rename = "TapeBarCount")]
    pub tape_bar_count: Option<i32>,
    #[serde(rename = "MapName")]
    pub map_name: Option<String>,
    #[serde(rename = "SoundwichEvent")]
    pub soundwich_event: Option<String>,
    #[serde(rename = "FreeResourcesAfterPlay")]
    pub free_resources_after_play: Option<u8>,
    #[serde(rename = "Tracks", default)]
    pub tracks: Vec<TapeTrackContainer>,
    #[serde(rename = "Clips", default)]
    pub clips: Vec<KaraokeClipContainer>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KaraokeClipContainer {
    #[serde(rename = "KaraokeClip")]
    pub karaoke_clip: KaraokeClip,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KaraokeClip {
    #[serde(rename = "Id")]
    pub id: Option<i64>,
    #[serde(rename = "TrackId")]
    pub track_id: Option<f64>,
    #[serde(rename = "StartTime")]
    pub start_time: Option<i32>,
    #[serde(rename = "Duration")]
    pub duration: Option<i32>,
    #[serde(rename = "IsActive")]
    pub is_active: Option<u8>,
    #[serde(rename = "Lyrics")]
    pub lyrics: Option<String>,
    #[serde(rename = "Pitch")]
    pub pitch: Option<f64>,
    #[serde(rename = "IsEndOfLine")]
    pub is_end_of_line: Option<i32>,
    #[serde(rename = "ContentType")]
    pub content_type: Option<i32>,
    #[serde(rename = "SemitoneTolerance")]
    pub semitone_tolerance: Option<i32>,
    #[serde(rename = "StartTimeTolerance")]
    pub start_time_tolerance: Option<i32>,
    #[serde(rename = "EndTimeTolerance")]
    pub end_time_tolerance: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TapeTrackContainer {
    #[serde(rename = "TapeTrack")]
    pub tape_track: TapeTrack,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TapeTrack {
    #[serde(rename = "Id")]
    pub id: Option<i64>,
    #[serde(rename = "Name")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DanceTapeData {
    #[serde(rename = "TapeClock")]
    pub tape_clock: Option<i32>,
    #[serde(rename = "TapeBarCount")]
    pub tape_bar_count: Option<i32>,
    #[serde(rename = "FreeResourcesAfterPlay")]
    pub free_resources_after_play: Option<u8>,
    #[serde(rename = "MapName")]
    pub map_name: Option<String>,
    #[serde(rename = "SoundwichEvent")]
    pub soundwich_event: Option<String>,
    #[serde(rename = "MotionClips", default)]
    pub motion_clips: Vec<MotionClipData>,
    #[serde(rename = "PictoClips", default)]
    pub picto_clips: Vec<PictogramClipData>,
    #[serde(rename = "GoldEffectClips", default)]
    pub gold_effect_clips: Vec<GoldEffectClipData>,
    #[serde(rename = "HideHudClips", default)]
    pub hide_hud_clips: Vec<HideHudClipData>,
}

/// Motion clip `MoveType` value marking full-body clips, which the patch
/// layer drops.
pub const MOVE_TYPE_FULL_BODY: i32 = 1;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MotionClipData {
    #[serde(rename = "Id")]
    pub id: Option<i64>,
    #[serde(rename = "TrackId")]
    pub track_id: Option<f64>,
    #[serde(rename = "StartTime")]
    pub start_time: Option<i32>,
    #[serde(rename = "Duration")]
    pub duration: Option<i32>,
    #[serde(rename = "IsActive")]
    pub is_active: Option<u8>,
    #[serde(rename = "MoveName")]
    pub move_name: Option<String>,
    #[serde(rename = "GoldMove")]
    pub gold_move: Option<u8>,
    #[serde(rename = "CoachId")]
    pub coach_id: Option<i32>,
    #[serde(rename = "MoveType")]
    pub move_type: Option<i32>,
    #[serde(rename = "Color")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PictogramClipData {
    #[serde(rename = "Id")]
    pub id: Option<i64>,
    #[serde(rename = "TrackId")]
    pub track_id: Option<f64>,
    #[serde(rename = "StartTime")]
    pub start_time: Option<i32>,
    #[serde(rename = "Duration")]
    pub duration: Option<i32>,
    #[serde(rename = "IsActive")]
    pub is_active: Option<u8>,
    #[serde(rename = "PictoPath")]
    pub picto_path: Option<String>,
    #[serde(rename = "CoachCount")]
    pub coach_count: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoldEffectClipData {
    #[serde(rename = "Id")]
    pub id: Option<i64>,
    #[serde(rename = "TrackId")]
    pub track_id: Option<f64>,
    #[serde(rename = "StartTime")]
    pub start_time: Option<i32>,
    #[serde(rename = "Duration")]
    pub duration: Option<i32>,
    #[serde(rename = "IsActive")]
    pub is_active: Option<u8>,
    #[serde(rename = "GoldEffectType")]
    pub gold_effect_type: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HideHudClipData {
    #[serde(rename = "StartTime")]
    pub start_time: Option<i32>,
    #[serde(rename = "Duration")]
    pub duration: Option<i32>,
    #[serde(rename = "IsActive")]
    pub is_active: Option<u8>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoachData {
    #[serde(rename = "GoldMovesCount")]
    pub gold_moves_count: Option<u32>,
    #[serde(rename = "StandardMovesCount")]
    pub standard_moves_count: Option<u32>,
}

/// Music track descriptor (`musictrack.json`); keys are camelCase in the
/// authoring format.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MusicTrackStructure {
    #[serde(rename = "startBeat")]
    pub start_beat: Option<i32>,
    #[serde(rename = "endBeat")]
    pub end_beat: Option<i32>,
    #[serde(rename = "videoStartTime")]
    pub video_start_time: Option<f64>,
    #[serde(rename = "previewEntry")]
    pub preview_entry: Option<f64>,
    #[serde(rename = "previewLoopStart")]
    pub preview_loop_start: Option<f64>,
    #[serde(rename = "previewLoopEnd")]
    pub preview_loop_end: Option<f64>,
    #[serde(rename = "previewDuration")]
    pub preview_duration: Option<f64>,
    #[serde(rename = "signatures", default)]
    pub signatures: Vec<SignatureContainer>,
    #[serde(rename = "markers", default)]
    pub markers: Vec<TrackMarker>,
    #[serde(rename = "sections", default)]
    pub sections: Vec<SectionContainer>,
    #[serde(rename = "comments", default)]
    pub comments: Vec<CommentContainer>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignatureContainer {
    #[serde(rename = "MusicSignature")]
    pub music_signature: MusicSignature,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MusicSignature {
    pub beats: Option<i32>,
    pub marker: Option<f64>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackMarker {
    #[serde(rename = "VAL")]
    pub val: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SectionContainer {
    #[serde(rename = "MusicSection")]
    pub music_section: MusicSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MusicSection {
    #[serde(rename = "sectionType")]
    pub section_type: Option<i32>,
    pub marker: Option<i64>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentContainer {
    #[serde(rename = "Comment")]
    pub comment: TrackComment,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackComment {
    pub marker: Option<f64>,
    #[serde(rename = "commentType")]
    pub comment_type: Option<String>,
    pub comment: Option<String>,
}

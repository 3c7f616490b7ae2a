#![allow(dead_code)]

//! Shared fixture: a synthetic base bundle with the full schema family
//! (TextAsset, Texture2D, Sprite, SpriteAtlas, AssetBundle, and the two
//! behaviour schemas), plus an authored map data folder.

use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use mapforge::field::{FieldKind, FieldTemplate};
use mapforge::{Bundle, Schema};

pub const TEXT_ASSET: u32 = 49;
pub const TEXTURE_2D: u32 = 28;
pub const SPRITE: u32 = 213;
pub const SPRITE_ATLAS: u32 = 687_078_895;
pub const ASSET_BUNDLE: u32 = 142;
pub const JD_MAP: u32 = 11400;
pub const MUSIC_TRACK: u32 = 11401;

fn pptr(name: &str) -> FieldTemplate {
    FieldTemplate::record(
        name,
        "PPtr<Object>",
        vec![
            FieldTemplate::scalar("m_FileID", "int", FieldKind::Int32),
            FieldTemplate::scalar("m_PathID", "SInt64", FieldKind::Int64),
        ],
    )
}

fn rect(name: &str) -> FieldTemplate {
    FieldTemplate::record(
        name,
        "Rectf",
        vec![
            FieldTemplate::scalar("x", "float", FieldKind::Float),
            FieldTemplate::scalar("y", "float", FieldKind::Float),
            FieldTemplate::scalar("width", "float", FieldKind::Float),
            FieldTemplate::scalar("height", "float", FieldKind::Float),
        ],
    )
}

fn render_key(name: &str) -> FieldTemplate {
    FieldTemplate::record(
        name,
        "pair",
        vec![
            FieldTemplate::record(
                "first",
                "GUID",
                vec![FieldTemplate::array(
                    "data",
                    FieldTemplate::scalar("data", "unsigned int", FieldKind::UInt32),
                )],
            ),
            FieldTemplate::scalar("second", "SInt64", FieldKind::Int64),
        ],
    )
}

fn sprite_render_data(name: &str) -> FieldTemplate {
    FieldTemplate::record(
        name,
        "SpriteAtlasData",
        vec![
            pptr("texture"),
            rect("textureRect"),
            FieldTemplate::record(
                "atlasRectOffset",
                "Vector2f",
                vec![
                    FieldTemplate::scalar("x", "float", FieldKind::Float),
                    FieldTemplate::scalar("y", "float", FieldKind::Float),
                ],
            ),
            FieldTemplate::record(
                "uvTransform",
                "Vector4f",
                vec![
                    FieldTemplate::scalar("x", "float", FieldKind::Float),
                    FieldTemplate::scalar("y", "float", FieldKind::Float),
                    FieldTemplate::scalar("z", "float", FieldKind::Float),
                    FieldTemplate::scalar("w", "float", FieldKind::Float),
                ],
            ),
            FieldTemplate::scalar("downscaleMultiplier", "float", FieldKind::Float),
            FieldTemplate::scalar("settingsRaw", "unsigned int", FieldKind::UInt32),
        ],
    )
}

fn move_models(name: &str) -> FieldTemplate {
    FieldTemplate::record(
        name,
        "MoveModels",
        vec![FieldTemplate::array(
            "list",
            FieldTemplate::record(
                "data",
                "pair",
                vec![FieldTemplate::string("Key"), pptr("Value")],
            ),
        )],
    )
}

fn coach_data_array(name: &str) -> FieldTemplate {
    FieldTemplate::array(
        name,
        FieldTemplate::record(
            "data",
            "CoachData",
            vec![
                FieldTemplate::scalar("GoldMovesCount", "unsigned int", FieldKind::UInt32),
                FieldTemplate::scalar("StandardMovesCount", "unsigned int", FieldKind::UInt32),
            ],
        ),
    )
}

pub fn text_asset_schema() -> Schema {
    Schema {
        type_id: TEXT_ASSET,
        class_name: "TextAsset".into(),
        script_name: String::new(),
        template: FieldTemplate::record(
            "Base",
            "TextAsset",
            vec![FieldTemplate::string("m_Name"), FieldTemplate::bytes("m_Script")],
        ),
    }
}

pub fn texture_schema() -> Schema {
    Schema {
        type_id: TEXTURE_2D,
        class_name: "Texture2D".into(),
        script_name: String::new(),
        template: FieldTemplate::record(
            "Base",
            "Texture2D",
            vec![
                FieldTemplate::string("m_Name"),
                FieldTemplate::scalar("m_ForcedFallbackFormat", "int", FieldKind::Int32),
                FieldTemplate::scalar("m_DownscaleFallback", "bool", FieldKind::Bool),
                FieldTemplate::scalar("m_Width", "int", FieldKind::Int32),
                FieldTemplate::scalar("m_Height", "int", FieldKind::Int32),
                FieldTemplate::scalar("m_CompleteImageSize", "unsigned int", FieldKind::UInt32),
                FieldTemplate::scalar("m_TextureFormat", "int", FieldKind::Int32),
                FieldTemplate::scalar("m_MipCount", "int", FieldKind::Int32),
                FieldTemplate::scalar("m_IsReadable", "bool", FieldKind::Bool),
                FieldTemplate::scalar("m_StreamingMipmaps", "bool", FieldKind::Bool),
                FieldTemplate::scalar("m_StreamingMipmapsPriority", "int", FieldKind::Int32),
                FieldTemplate::scalar("m_ImageCount", "int", FieldKind::Int32),
                FieldTemplate::scalar("m_TextureDimension", "int", FieldKind::Int32),
                FieldTemplate::record(
                    "m_TextureSettings",
                    "GLTextureSettings",
                    vec![
                        FieldTemplate::scalar("m_FilterMode", "int", FieldKind::Int32),
                        FieldTemplate::scalar("m_Aniso", "int", FieldKind::Int32),
                        FieldTemplate::scalar("m_MipBias", "float", FieldKind::Float),
                        FieldTemplate::scalar("m_WrapU", "int", FieldKind::Int32),
                        FieldTemplate::scalar("m_WrapV", "int", FieldKind::Int32),
                        FieldTemplate::scalar("m_WrapW", "int", FieldKind::Int32),
                    ],
                ),
                FieldTemplate::scalar("m_LightmapFormat", "int", FieldKind::Int32),
                FieldTemplate::scalar("m_ColorSpace", "int", FieldKind::Int32),
                FieldTemplate::bytes("image data"),
                FieldTemplate::record(
                    "m_StreamData",
                    "StreamingInfo",
                    vec![
                        FieldTemplate::scalar("offset", "UInt64", FieldKind::UInt64),
                        FieldTemplate::scalar("size", "unsigned int", FieldKind::UInt32),
                        FieldTemplate::string("path"),
                    ],
                ),
            ],
        ),
    }
}

pub fn sprite_schema() -> Schema {
    Schema {
        type_id: SPRITE,
        class_name: "Sprite".into(),
        script_name: String::new(),
        template: FieldTemplate::record(
            "Base",
            "Sprite",
            vec![
                FieldTemplate::string("m_Name"),
                rect("m_Rect"),
                render_key("m_RenderDataKey"),
                FieldTemplate::array("m_AtlasTags", FieldTemplate::string("data")),
                pptr("m_SpriteAtlas"),
                sprite_render_data("m_RD"),
            ],
        ),
    }
}

pub fn sprite_atlas_schema() -> Schema {
    Schema {
        type_id: SPRITE_ATLAS,
        class_name: "SpriteAtlas".into(),
        script_name: String::new(),
        template: FieldTemplate::record(
            "Base",
            "SpriteAtlas",
            vec![
                FieldTemplate::string("m_Name"),
                FieldTemplate::string("m_Tag"),
                FieldTemplate::array(
                    "m_RenderDataMap",
                    FieldTemplate::record(
                        "data",
                        "pair",
                        vec![render_key("first"), sprite_render_data("second")],
                    ),
                ),
                FieldTemplate::array("m_PackedSprites", pptr("data")),
                FieldTemplate::array("m_PackedSpriteNamesToIndex", FieldTemplate::string("data")),
            ],
        ),
    }
}

pub fn asset_bundle_schema() -> Schema {
    Schema {
        type_id: ASSET_BUNDLE,
        class_name: "AssetBundle".into(),
        script_name: String::new(),
        template: FieldTemplate::record(
            "Base",
            "AssetBundle",
            vec![
                FieldTemplate::string("m_Name"),
                FieldTemplate::array("m_PreloadTable", pptr("data")),
                FieldTemplate::array(
                    "m_Container",
                    FieldTemplate::record(
                        "data",
                        "pair",
                        vec![
                            FieldTemplate::string("first"),
                            FieldTemplate::record(
                                "second",
                                "AssetInfo",
                                vec![
                                    FieldTemplate::scalar("preloadIndex", "int", FieldKind::Int32),
                                    FieldTemplate::scalar("preloadSize", "int", FieldKind::Int32),
                                    pptr("asset"),
                                ],
                            ),
                        ],
                    ),
                ),
                FieldTemplate::string("m_AssetBundleName"),
            ],
        ),
    }
}

fn karaoke_clip_array() -> FieldTemplate {
    FieldTemplate::array(
        "Clips",
        FieldTemplate::record(
            "data",
            "KaraokeClipContainer",
            vec![FieldTemplate::record(
                "KaraokeClip",
                "KaraokeClip",
                vec![
                    FieldTemplate::scalar("Id", "SInt64", FieldKind::Int64),
                    FieldTemplate::scalar("TrackId", "double", FieldKind::Double),
                    FieldTemplate::scalar("StartTime", "int", FieldKind::Int32),
                    FieldTemplate::scalar("Duration", "int", FieldKind::Int32),
                    FieldTemplate::scalar("IsActive", "UInt8", FieldKind::UInt8),
                    FieldTemplate::string("Lyrics"),
                    FieldTemplate::scalar("Pitch", "double", FieldKind::Double),
                    FieldTemplate::scalar("IsEndOfLine", "int", FieldKind::Int32),
                    FieldTemplate::scalar("ContentType", "int", FieldKind::Int32),
                    FieldTemplate::scalar("SemitoneTolerance", "int", FieldKind::Int32),
                    FieldTemplate::scalar("StartTimeTolerance", "int", FieldKind::Int32),
                    FieldTemplate::scalar("EndTimeTolerance", "int", FieldKind::Int32),
                ],
            )],
        ),
    )
}

fn dance_data() -> FieldTemplate {
    FieldTemplate::record(
        "DanceData",
        "DanceTape",
        vec![
            FieldTemplate::string("MapName"),
            FieldTemplate::array(
                "MotionClips",
                FieldTemplate::record(
                    "data",
                    "MotionClip",
                    vec![
                        FieldTemplate::scalar("Id", "SInt64", FieldKind::Int64),
                        FieldTemplate::scalar("TrackId", "double", FieldKind::Double),
                        FieldTemplate::scalar("StartTime", "int", FieldKind::Int32),
                        FieldTemplate::scalar("Duration", "int", FieldKind::Int32),
                        FieldTemplate::scalar("IsActive", "UInt8", FieldKind::UInt8),
                        FieldTemplate::string("MoveName"),
                        FieldTemplate::scalar("GoldMove", "UInt8", FieldKind::UInt8),
                        FieldTemplate::scalar("CoachId", "int", FieldKind::Int32),
                        FieldTemplate::scalar("MoveType", "int", FieldKind::Int32),
                        FieldTemplate::string("Color"),
                    ],
                ),
            ),
            FieldTemplate::array(
                "PictoClips",
                FieldTemplate::record(
                    "data",
                    "PictoClip",
                    vec![
                        FieldTemplate::scalar("Id", "SInt64", FieldKind::Int64),
                        FieldTemplate::scalar("TrackId", "double", FieldKind::Double),
                        FieldTemplate::scalar("StartTime", "int", FieldKind::Int32),
                        FieldTemplate::scalar("Duration", "int", FieldKind::Int32),
                        FieldTemplate::scalar("IsActive", "UInt8", FieldKind::UInt8),
                        FieldTemplate::string("PictoPath"),
                        FieldTemplate::scalar("CoachCount", "unsigned int", FieldKind::UInt32),
                    ],
                ),
            ),
            FieldTemplate::array(
                "GoldEffectClips",
                FieldTemplate::record(
                    "data",
                    "GoldEffectClip",
                    vec![
                        FieldTemplate::scalar("Id", "SInt64", FieldKind::Int64),
                        FieldTemplate::scalar("TrackId", "double", FieldKind::Double),
                        FieldTemplate::scalar("StartTime", "int", FieldKind::Int32),
                        FieldTemplate::scalar("Duration", "int", FieldKind::Int32),
                        FieldTemplate::scalar("IsActive", "UInt8", FieldKind::UInt8),
                        FieldTemplate::scalar("GoldEffectType", "int", FieldKind::Int32),
                    ],
                ),
            ),
            FieldTemplate::array(
                "HideHudClips",
                FieldTemplate::record(
                    "data",
                    "HideHudClip",
                    vec![
                        FieldTemplate::scalar("StartTime", "int", FieldKind::Int32),
                        FieldTemplate::scalar("Duration", "int", FieldKind::Int32),
                        FieldTemplate::scalar("IsActive", "UInt8", FieldKind::UInt8),
                    ],
                ),
            ),
        ],
    )
}

pub fn jd_map_schema() -> Schema {
    Schema {
        type_id: JD_MAP,
        class_name: "MonoBehaviour".into(),
        script_name: "JDMap".into(),
        template: FieldTemplate::record(
            "Base",
            "JDMap",
            vec![
                FieldTemplate::string("m_Name"),
                FieldTemplate::string("MapName"),
                FieldTemplate::record(
                    "SongDesc",
                    "SongDesc",
                    vec![
                        FieldTemplate::string("MapName"),
                        FieldTemplate::scalar("JDVersion", "int", FieldKind::Int32),
                        FieldTemplate::scalar("OriginalJDVersion", "int", FieldKind::Int32),
                        FieldTemplate::string("Artist"),
                        FieldTemplate::string("Title"),
                        FieldTemplate::string("Credits"),
                        FieldTemplate::scalar("NumCoach", "int", FieldKind::Int32),
                        FieldTemplate::scalar("MainCoach", "int", FieldKind::Int32),
                        FieldTemplate::scalar("Difficulty", "int", FieldKind::Int32),
                        FieldTemplate::scalar("SweatDifficulty", "int", FieldKind::Int32),
                    ],
                ),
                FieldTemplate::record(
                    "KaraokeData",
                    "KaraokeTape",
                    vec![FieldTemplate::string("MapName"), karaoke_clip_array()],
                ),
                dance_data(),
                pptr("PictogramAtlas"),
                move_models("CameraMoveModels"),
                move_models("HandDeviceMoveModels"),
                coach_data_array("FullBodyCoachDatas"),
                coach_data_array("HandOnlyCoachDatas"),
            ],
        ),
    }
}

pub fn music_track_schema() -> Schema {
    Schema {
        type_id: MUSIC_TRACK,
        class_name: "MonoBehaviour".into(),
        script_name: "MusicTrack".into(),
        template: FieldTemplate::record(
            "Base",
            "MusicTrack",
            vec![
                FieldTemplate::string("m_Name"),
                FieldTemplate::record(
                    "m_structure",
                    "MusicTrackFSM",
                    vec![FieldTemplate::record(
                        "MusicTrackStructure",
                        "MusicTrackStructure",
                        vec![
                            FieldTemplate::scalar("startBeat", "int", FieldKind::Int32),
                            FieldTemplate::scalar("endBeat", "int", FieldKind::Int32),
                            FieldTemplate::scalar("videoStartTime", "double", FieldKind::Double),
                            FieldTemplate::scalar("previewEntry", "double", FieldKind::Double),
                            FieldTemplate::scalar("previewLoopStart", "double", FieldKind::Double),
                            FieldTemplate::scalar("previewLoopEnd", "double", FieldKind::Double),
                            FieldTemplate::scalar("previewDuration", "double", FieldKind::Double),
                            FieldTemplate::array(
                                "signatures",
                                FieldTemplate::record(
                                    "data",
                                    "SignatureContainer",
                                    vec![FieldTemplate::record(
                                        "MusicSignature",
                                        "MusicSignature",
                                        vec![
                                            FieldTemplate::scalar("beats", "int", FieldKind::Int32),
                                            FieldTemplate::scalar("marker", "double", FieldKind::Double),
                                            FieldTemplate::string("comment"),
                                        ],
                                    )],
                                ),
                            ),
                            FieldTemplate::array(
                                "markers",
                                FieldTemplate::record(
                                    "data",
                                    "Marker",
                                    vec![FieldTemplate::scalar("VAL", "SInt64", FieldKind::Int64)],
                                ),
                            ),
                            FieldTemplate::array(
                                "sections",
                                FieldTemplate::record(
                                    "data",
                                    "SectionContainer",
                                    vec![FieldTemplate::record(
                                        "MusicSection",
                                        "MusicSection",
                                        vec![
                                            FieldTemplate::scalar("sectionType", "int", FieldKind::Int32),
                                            FieldTemplate::scalar("marker", "SInt64", FieldKind::Int64),
                                            FieldTemplate::string("comment"),
                                        ],
                                    )],
                                ),
                            ),
                            FieldTemplate::array(
                                "comments",
                                FieldTemplate::record(
                                    "data",
                                    "CommentContainer",
                                    vec![FieldTemplate::record(
                                        "Comment",
                                        "Comment",
                                        vec![
                                            FieldTemplate::scalar("marker", "double", FieldKind::Double),
                                            FieldTemplate::string("commentType"),
                                            FieldTemplate::string("comment"),
                                        ],
                                    )],
                                ),
                            ),
                        ],
                    )],
                ),
            ],
        ),
    }
}

/// Assemble the base bundle: manifest, map behaviour (with stale array
/// contents that the patch must discard), track behaviour, atlas, a base
/// sprite, and one pre-existing raw asset. Identifiers 1 through 6.
pub fn build_base_bundle() -> Bundle {
    let mut bundle = Bundle::create("base");
    for schema in [
        text_asset_schema(),
        texture_schema(),
        sprite_schema(),
        sprite_atlas_schema(),
        asset_bundle_schema(),
        jd_map_schema(),
        music_track_schema(),
    ] {
        bundle.add_schema(schema);
    }

    let mut manifest = asset_bundle_schema().template.instantiate();
    manifest.set_string("m_Name", "base").unwrap();
    let stale = manifest.append_default_child("m_PreloadTable.Array").unwrap();
    stale.set_i64("m_PathID", 999).unwrap();
    bundle.add_object(1, ASSET_BUNDLE, manifest.encode().unwrap());

    let mut map = jd_map_schema().template.instantiate();
    map.set_string("m_Name", "BaseMap").unwrap();
    map.set_string("MapName", "BaseMap").unwrap();
    map.set_i64("PictogramAtlas.m_PathID", 4).unwrap();
    for _ in 0..2 {
        map.append_default_child("KaraokeData.Clips.Array").unwrap();
    }
    let stale_motion = map.append_default_child("DanceData.MotionClips.Array").unwrap();
    stale_motion.set_string("MoveName", "stale_move").unwrap();
    let stale_camera = map.append_default_child("CameraMoveModels.list.Array").unwrap();
    stale_camera.set_string("Key", "stale_camera").unwrap();
    let stale_hand = map.append_default_child("HandDeviceMoveModels.list.Array").unwrap();
    stale_hand.set_string("Key", "stale_hand").unwrap();
    bundle.add_object(2, JD_MAP, map.encode().unwrap());

    let mut track = music_track_schema().template.instantiate();
    track.set_string("m_Name", "BaseMap_MusicTrack").unwrap();
    let stale_marker = track
        .append_default_child("m_structure.MusicTrackStructure.markers.Array")
        .unwrap();
    stale_marker.set_i64("VAL", 777).unwrap();
    bundle.add_object(3, MUSIC_TRACK, track.encode().unwrap());

    let mut atlas = sprite_atlas_schema().template.instantiate();
    atlas.set_string("m_Name", "BaseMap").unwrap();
    bundle.add_object(4, SPRITE_ATLAS, atlas.encode().unwrap());

    let mut sprite = sprite_schema().template.instantiate();
    sprite.set_string("m_Name", "base_sprite").unwrap();
    bundle.add_object(5, SPRITE, sprite.encode().unwrap());

    let mut text = text_asset_schema().template.instantiate();
    text.set_string("m_Name", "legacy.msm").unwrap();
    text.set_bytes("m_Script", vec![1, 2, 3]).unwrap();
    bundle.add_object(6, TEXT_ASSET, text.encode().unwrap());

    bundle
}

/// Write the base bundle into `dir` and return its path.
pub fn write_base_bundle(dir: &Path) -> PathBuf {
    build_base_bundle().write(dir).unwrap()
}

/// Write a map data folder with `picto_count` 256x256 pictos and two
/// classifier files. Returns the folder path.
pub fn write_map_dir(dir: &Path, picto_count: usize) -> PathBuf {
    let map_dir = dir.join("map");
    let move_space = map_dir.join("MoveSpace");
    let pictos = map_dir.join("Pictos");
    fs::create_dir_all(&move_space).unwrap();
    fs::create_dir_all(&pictos).unwrap();

    fs::write(map_dir.join("songdata.json"), SONG_DATA_JSON).unwrap();
    fs::write(map_dir.join("musictrack.json"), MUSIC_TRACK_JSON).unwrap();

    fs::write(move_space.join("Classifier_A.msm"), b"classifier a bytes").unwrap();
    fs::write(move_space.join("b.msm"), b"classifier b bytes").unwrap();

    for i in 0..picto_count {
        let shade = (i * 40) as u8;
        let img = RgbaImage::from_pixel(256, 256, Rgba([shade, 0, 255 - shade, 255]));
        img.save(pictos.join(format!("picto_{i:03}.png"))).unwrap();
    }
    map_dir
}

pub const SONG_DATA_JSON: &str = r#"{
  "MapName": "TestSong",
  "SongDesc": {"Artist": "The Artist", "Difficulty": 3},
  "KaraokeData": {
    "Clips": [
      {"KaraokeClip": {"Lyrics": "hello world", "StartTime": 5, "Duration": 12, "ContentType": 7}}
    ]
  },
  "DanceData": {
    "MotionClips": [
      {"MoveName": "arm_wave", "MoveType": 0, "CoachId": 1},
      {"MoveName": "whole_body", "MoveType": 1},
      {"MoveName": "hand_flick"}
    ],
    "PictoClips": [{"PictoPath": "picto_000", "StartTime": 1}],
    "GoldEffectClips": [{"StartTime": 9}]
  },
  "FullBodyCoachDatas": [{"GoldMovesCount": 2}],
  "HandOnlyCoachDatas": [{}]
}"#;

pub const MUSIC_TRACK_JSON: &str = r#"{
  "startBeat": -8,
  "endBeat": 200,
  "signatures": [{"MusicSignature": {"beats": 4, "marker": 0.0}}],
  "markers": [{"VAL": 123}, {"VAL": 456}]
}"#;

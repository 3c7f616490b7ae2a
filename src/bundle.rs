//! Container store.
//!
//! [`Bundle`] owns a loaded container for the duration of one run: it
//! indexes objects by identifier, hands out field trees for mutation,
//! allocates fresh identifiers, and accumulates deferred replacers that are
//! applied with last-write-wins semantics when the bundle is written back.
//!
//! Replacers are never applied eagerly: identifier cross-references between
//! objects are only known late in the patch pipeline, so all staged writes
//! land at once in [`Bundle::write`].

use std::fs;
use std::path::{Path, PathBuf};

use ahash::AHashMap;
use image::RgbaImage;
use tracing::{debug, info};

use crate::compression::{self, CompressionMethod};
use crate::error::{MapforgeError, Result};
use crate::field::FieldNode;
use crate::header::BundleHeader;
use crate::schema::{Schema, SchemaRegistry};
use crate::texture;
use crate::wire::{Reader, Writer};

/// Payload alignment inside the serialized graph.
const OBJECT_ALIGN: usize = 8;

/// One object of the graph: identifier, type, and raw payload bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectEntry {
    pub path_id: i64,
    pub type_id: u32,
    pub data: Vec<u8>,
}

/// A deferred mutation, applied at write time.
#[derive(Debug, Clone)]
pub enum Replacer {
    /// Write this serialized object at this identifier (add or modify).
    Write {
        path_id: i64,
        type_id: u32,
        data: Vec<u8>,
    },
    /// Remove this identifier from the graph.
    Remove { path_id: i64 },
}

impl Replacer {
    pub fn path_id(&self) -> i64 {
        match self {
            Replacer::Write { path_id, .. } | Replacer::Remove { path_id } => *path_id,
        }
    }
}

/// A behaviour object eligible for patch dispatch.
#[derive(Debug, Clone)]
pub struct ScriptObject {
    pub path_id: i64,
    pub type_id: u32,
    pub script_name: String,
}

/// In-memory bundle: schema registry, object graph, and pending replacers.
pub struct Bundle {
    name: String,
    schemas: SchemaRegistry,
    objects: Vec<ObjectEntry>,
    index: AHashMap<i64, usize>,
    replacers: Vec<Replacer>,
    max_path_id: i64,
    new_path_ids: Vec<i64>,
}

impl Bundle {
    /// Create an empty in-memory bundle (used to assemble base bundles).
    pub fn create(name: &str) -> Self {
        Bundle {
            name: name.into(),
            schemas: SchemaRegistry::new(),
            objects: Vec::new(),
            index: AHashMap::new(),
            replacers: Vec::new(),
            max_path_id: 0,
            new_path_ids: Vec::new(),
        }
    }

    /// Load a bundle from disk. Any malformed input (bad magic, version,
    /// checksum, truncation) is fatal.
    pub fn load(path: &Path) -> Result<Bundle> {
        let bytes = fs::read(path)?;
        let mut r = Reader::new(&bytes);
        let header = BundleHeader::decode(&mut r)?;
        if (r.remaining() as u64) < header.graph_len {
            return Err(MapforgeError::Truncated("graph shorter than header claims"));
        }
        let graph = r.read_exact(header.graph_len as usize)?;
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&graph);
        if hasher.finalize() != header.graph_crc32 {
            return Err(MapforgeError::ChecksumMismatch);
        }

        let (schemas, objects) = decode_graph(&graph)?;
        let mut index = AHashMap::with_capacity(objects.len());
        let mut max_path_id = 0;
        for (slot, obj) in objects.iter().enumerate() {
            index.insert(obj.path_id, slot);
            max_path_id = max_path_id.max(obj.path_id);
        }
        debug!(
            objects = objects.len(),
            schemas = schemas.len(),
            max_path_id,
            "loaded bundle graph"
        );
        Ok(Bundle {
            name: header.name,
            schemas,
            objects,
            index,
            replacers: Vec::new(),
            max_path_id,
            new_path_ids: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the bundle; the new name drives the output file names.
    pub fn set_name(&mut self, name: &str) {
        self.name = name.into();
    }

    pub fn schemas(&self) -> &SchemaRegistry {
        &self.schemas
    }

    /// Register a schema on an assembled bundle.
    pub fn add_schema(&mut self, schema: Schema) {
        self.schemas.insert(schema);
    }

    /// Append an object to an assembled bundle.
    pub fn add_object(&mut self, path_id: i64, type_id: u32, data: Vec<u8>) {
        self.index.insert(path_id, self.objects.len());
        self.objects.push(ObjectEntry {
            path_id,
            type_id,
            data,
        });
        self.max_path_id = self.max_path_id.max(path_id);
    }

    /// Pre-existing objects in original enumeration order.
    pub fn objects(&self) -> &[ObjectEntry] {
        &self.objects
    }

    pub fn object(&self, path_id: i64) -> Result<&ObjectEntry> {
        self.index
            .get(&path_id)
            .map(|&slot| &self.objects[slot])
            .ok_or(MapforgeError::ObjectNotFound(path_id))
    }

    /// Pre-existing objects of one engine class, in enumeration order.
    pub fn objects_of_class(&self, class_name: &str) -> Vec<(i64, u32)> {
        self.objects
            .iter()
            .filter(|o| {
                self.schemas
                    .get(o.type_id)
                    .is_some_and(|s| s.class_name == class_name)
            })
            .map(|o| (o.path_id, o.type_id))
            .collect()
    }

    pub fn first_object_of_class(&self, class_name: &str) -> Option<(i64, u32)> {
        self.objects_of_class(class_name).into_iter().next()
    }

    /// Behaviour objects eligible for patch dispatch, with their script
    /// names resolved through the schema registry.
    pub fn script_objects(&self) -> Vec<ScriptObject> {
        self.objects
            .iter()
            .filter_map(|o| {
                let schema = self.schemas.get(o.type_id)?;
                if schema.class_name != "MonoBehaviour" {
                    return None;
                }
                Some(ScriptObject {
                    path_id: o.path_id,
                    type_id: o.type_id,
                    script_name: schema.script_name.clone(),
                })
            })
            .collect()
    }

    /// Decode an object's payload into its field tree.
    pub fn base_field(&self, path_id: i64) -> Result<FieldNode> {
        let entry = self.object(path_id)?;
        let schema = self.schemas.require(entry.type_id)?;
        FieldNode::decode(&schema.template, &entry.data)
    }

    /// Allocate a fresh identifier: strictly increasing, never colliding
    /// with a pre-existing object. Allocation order is preserved for the
    /// preload index rebuild.
    pub fn allocate_path_id(&mut self) -> i64 {
        self.max_path_id += 1;
        self.new_path_ids.push(self.max_path_id);
        self.max_path_id
    }

    /// Identifiers allocated during this run, in allocation order.
    pub fn new_path_ids(&self) -> &[i64] {
        &self.new_path_ids
    }

    /// Preload enumeration: every pre-existing identifier (original order)
    /// followed by every identifier allocated this run (allocation order).
    pub fn preload_order(&self) -> Vec<i64> {
        self.objects
            .iter()
            .map(|o| o.path_id)
            .chain(self.new_path_ids.iter().copied())
            .collect()
    }

    /// Stage an add/modify replacer.
    pub fn stage_object(&mut self, path_id: i64, type_id: u32, data: Vec<u8>) {
        self.replacers.push(Replacer::Write {
            path_id,
            type_id,
            data,
        });
    }

    /// Encode a field tree and stage it as an add/modify replacer.
    pub fn stage_field(&mut self, path_id: i64, type_id: u32, node: &FieldNode) -> Result<()> {
        let data = node.encode()?;
        self.stage_object(path_id, type_id, data);
        Ok(())
    }

    /// Stage a remove replacer. Kept as a store capability; the observed
    /// patch flow never removes objects.
    pub fn stage_removal(&mut self, path_id: i64) {
        self.replacers.push(Replacer::Remove { path_id });
    }

    pub fn replacers(&self) -> &[Replacer] {
        &self.replacers
    }

    /// Stage a raw binary resource as a TextAsset-shaped object and return
    /// its fresh identifier.
    pub fn write_blob(&mut self, name: &str, bytes: Vec<u8>) -> Result<i64> {
        let schema = self.schemas.require_class("TextAsset")?;
        let mut node = schema.template.instantiate();
        let type_id = schema.type_id;
        node.set_string("m_Name", name)?;
        node.set_bytes("m_Script", bytes)?;
        let path_id = self.allocate_path_id();
        self.stage_field(path_id, type_id, &node)?;
        Ok(path_id)
    }

    /// Stage an in-memory image as a Texture2D-shaped object and return its
    /// fresh identifier.
    pub fn write_texture(&mut self, image: &RgbaImage, name: &str) -> Result<i64> {
        let schema = self.schemas.require_class("Texture2D")?;
        let mut node = schema.template.instantiate();
        let type_id = schema.type_id;
        texture::fill_texture_fields(&mut node, image, name)?;
        let path_id = self.allocate_path_id();
        self.stage_field(path_id, type_id, &node)?;
        Ok(path_id)
    }

    /// Apply all replacers (last-write-wins per identifier), serialize the
    /// graph, wrap it in framing, and write `<name>.bundle` plus the packed
    /// `<name>_compressed.bundle` variant into `out_dir`.
    pub fn write(&self, out_dir: &Path) -> Result<PathBuf> {
        let final_objects = self.apply_replacers();
        let graph = encode_graph(&self.schemas, &final_objects)?;

        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&graph);
        let mut header = BundleHeader::new(&self.name);
        header.graph_len = graph.len() as u64;
        header.graph_crc32 = hasher.finalize();

        let mut w = Writer::new();
        header.encode(&mut w)?;
        w.put_raw(&graph);
        let file_bytes = w.into_bytes();

        fs::create_dir_all(out_dir)?;
        let bundle_path = out_dir.join(format!("{}.bundle", self.name));
        fs::write(&bundle_path, &file_bytes)?;
        debug!(objects = final_objects.len(), path = %bundle_path.display(), "wrote bundle");

        info!("Compressing bundle...");
        let packed = compression::pack_bundle(&file_bytes, CompressionMethod::Zstd)?;
        let compressed_path = out_dir.join(format!("{}_compressed.bundle", self.name));
        fs::write(&compressed_path, packed)?;

        Ok(bundle_path)
    }

    /// Resolve replacers against the original graph: pre-existing objects
    /// keep their order (replaced or dropped as staged), then newly
    /// allocated objects follow in allocation order.
    fn apply_replacers(&self) -> Vec<ObjectEntry> {
        let mut staged: AHashMap<i64, Option<(u32, Vec<u8>)>> = AHashMap::new();
        for replacer in &self.replacers {
            match replacer {
                Replacer::Write {
                    path_id,
                    type_id,
                    data,
                } => {
                    staged.insert(*path_id, Some((*type_id, data.clone())));
                }
                Replacer::Remove { path_id } => {
                    staged.insert(*path_id, None);
                }
            }
        }

        let mut result = Vec::with_capacity(self.objects.len() + self.new_path_ids.len());
        for obj in &self.objects {
            match staged.remove(&obj.path_id) {
                Some(Some((type_id, data))) => result.push(ObjectEntry {
                    path_id: obj.path_id,
                    type_id,
                    data,
                }),
                Some(None) => {}
                None => result.push(obj.clone()),
            }
        }
        for path_id in &self.new_path_ids {
            if let Some(Some((type_id, data))) = staged.remove(path_id) {
                result.push(ObjectEntry {
                    path_id: *path_id,
                    type_id,
                    data,
                });
            }
        }
        result
    }
}

fn decode_graph(graph: &[u8]) -> Result<(SchemaRegistry, Vec<ObjectEntry>)> {
    let mut r = Reader::new(graph);
    let schemas = SchemaRegistry::decode(&mut r)?;
    let count = r.read_u32()? as usize;
    let mut rows = Vec::with_capacity(count);
    for _ in 0..count {
        let path_id = r.read_i64()?;
        let type_id = r.read_u32()?;
        let byte_len = r.read_u32()? as usize;
        rows.push((path_id, type_id, byte_len));
    }
    let mut objects = Vec::with_capacity(count);
    for (path_id, type_id, byte_len) in rows {
        r.align(OBJECT_ALIGN)?;
        let data = r.read_exact(byte_len)?;
        objects.push(ObjectEntry {
            path_id,
            type_id,
            data,
        });
    }
    if r.remaining() != 0 {
        return Err(MapforgeError::Decode(format!(
            "{} trailing bytes after object payloads",
            r.remaining()
        )));
    }
    Ok((schemas, objects))
}

fn encode_graph(schemas: &SchemaRegistry, objects: &[ObjectEntry]) -> Result<Vec<u8>> {
    let mut w = Writer::new();
    schemas.encode(&mut w)?;
    w.put_u32(objects.len() as u32);
    for obj in objects {
        w.put_i64(obj.path_id);
        w.put_u32(obj.type_id);
        let byte_len = u32::try_from(obj.data.len())
            .map_err(|_| MapforgeError::Encode("object payload exceeds u32 length".into()))?;
        w.put_u32(byte_len);
    }
    for obj in objects {
        w.align(OBJECT_ALIGN);
        w.put_raw(&obj.data);
    }
    Ok(w.into_bytes())
}

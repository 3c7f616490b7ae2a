//! Schema registry: the per-bundle mapping from type id to object shape.
//!
//! Every bundle carries its own schema table; the registry is built once at
//! load time and drives payload decode/encode. A schema pairs an engine
//! class name (`"Texture2D"`, `"MonoBehaviour"`, ...) with an optional
//! script name that further discriminates behaviour objects
//! (`"JDMap"`, `"MusicTrack"`).

use ahash::AHashMap;

use crate::error::{MapforgeError, Result};
use crate::field::FieldTemplate;
use crate::wire::{Reader, Writer};

/// Shape and identity of one object type.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub type_id: u32,
    pub class_name: String,
    /// Script name for behaviour classes; empty for plain engine classes.
    pub script_name: String,
    pub template: FieldTemplate,
}

/// All schemas of one loaded bundle, indexed by type id.
#[derive(Debug, Default, Clone)]
pub struct SchemaRegistry {
    schemas: Vec<Schema>,
    by_id: AHashMap<u32, usize>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema; a later schema with the same type id replaces the
    /// earlier one.
    pub fn insert(&mut self, schema: Schema) {
        match self.by_id.get(&schema.type_id) {
            Some(&slot) => self.schemas[slot] = schema,
            None => {
                self.by_id.insert(schema.type_id, self.schemas.len());
                self.schemas.push(schema);
            }
        }
    }

    pub fn get(&self, type_id: u32) -> Option<&Schema> {
        self.by_id.get(&type_id).map(|&slot| &self.schemas[slot])
    }

    pub fn require(&self, type_id: u32) -> Result<&Schema> {
        self.get(type_id)
            .ok_or(MapforgeError::UnknownTypeId(type_id))
    }

    /// First schema whose class name matches (registration order).
    pub fn find_class(&self, class_name: &str) -> Option<&Schema> {
        self.schemas.iter().find(|s| s.class_name == class_name)
    }

    pub fn require_class(&self, class_name: &str) -> Result<&Schema> {
        self.find_class(class_name)
            .ok_or_else(|| MapforgeError::UnknownClass(class_name.into()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Schema> {
        self.schemas.iter()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    pub(crate) fn encode(&self, w: &mut Writer) -> Result<()> {
        w.put_u32(self.schemas.len() as u32);
        for schema in &self.schemas {
            w.put_u32(schema.type_id);
            w.put_string(&schema.class_name)?;
            w.put_string(&schema.script_name)?;
            schema.template.encode(w)?;
        }
        Ok(())
    }

    pub(crate) fn decode(r: &mut Reader<'_>) -> Result<Self> {
        let count = r.read_u32()? as usize;
        let mut registry = SchemaRegistry::new();
        for _ in 0..count {
            let type_id = r.read_u32()?;
            let class_name = r.read_string()?;
            let script_name = r.read_string()?;
            let template = FieldTemplate::decode(r)?;
            registry.insert(Schema {
                type_id,
                class_name,
                script_name,
                template,
            });
        }
        Ok(registry)
    }
}

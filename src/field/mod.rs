//! Typed field trees.
//!
//! Every object in a bundle is decoded into a [`FieldNode`] tree shaped by
//! its schema template. Nodes are addressed by dotted paths (see [`path`]);
//! lookups either succeed with the expected shape or fail explicitly — the
//! only way a node comes into existence is decoding or the template
//! default-instantiation used by [`FieldNode::append_default_child`].

pub mod path;
pub mod template;

use crate::error::{MapforgeError, Result};
use crate::wire::{Reader, Writer};

pub use path::Segment;
pub use template::{FieldKind, FieldTemplate};

/// Value payload of one field node.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Bool(bool),
    Int8(i8),
    UInt8(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Float(f32),
    Double(f64),
    String(String),
    Bytes(Vec<u8>),
    Struct(Vec<FieldNode>),
    Array {
        element: Box<FieldTemplate>,
        items: Vec<FieldNode>,
    },
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Bool(_) => FieldKind::Bool,
            FieldValue::Int8(_) => FieldKind::Int8,
            FieldValue::UInt8(_) => FieldKind::UInt8,
            FieldValue::Int16(_) => FieldKind::Int16,
            FieldValue::UInt16(_) => FieldKind::UInt16,
            FieldValue::Int32(_) => FieldKind::Int32,
            FieldValue::UInt32(_) => FieldKind::UInt32,
            FieldValue::Int64(_) => FieldKind::Int64,
            FieldValue::UInt64(_) => FieldKind::UInt64,
            FieldValue::Float(_) => FieldKind::Float,
            FieldValue::Double(_) => FieldKind::Double,
            FieldValue::String(_) => FieldKind::String,
            FieldValue::Bytes(_) => FieldKind::Bytes,
            FieldValue::Struct(_) => FieldKind::Struct,
            FieldValue::Array { .. } => FieldKind::Array,
        }
    }
}

/// One node of a typed field tree.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldNode {
    pub name: String,
    pub type_name: String,
    pub value: FieldValue,
}

macro_rules! scalar_accessors {
    ($get:ident, $set:ident, $variant:ident, $ty:ty) => {
        pub fn $get(&self, path: &str) -> Result<$ty> {
            match &self.get(path)?.value {
                FieldValue::$variant(v) => Ok(v.clone()),
                other => Err(mismatch(path, FieldKind::$variant, other.kind())),
            }
        }

        pub fn $set(&mut self, path: &str, value: $ty) -> Result<()> {
            let node = self.get_mut(path)?;
            match &mut node.value {
                FieldValue::$variant(v) => {
                    *v = value;
                    Ok(())
                }
                other => Err(mismatch(path, FieldKind::$variant, other.kind())),
            }
        }
    };
}

impl FieldNode {
    /// Look up a descendant by dotted path: a fold over the parsed
    /// segments.
    pub fn get(&self, path: &str) -> Result<&FieldNode> {
        path::parse(path)?
            .iter()
            .try_fold(self, |node, segment| node.step(segment, path))
    }

    /// Mutable variant of [`FieldNode::get`].
    pub fn get_mut(&mut self, path: &str) -> Result<&mut FieldNode> {
        path::parse(path)?
            .iter()
            .try_fold(self, |node, segment| node.step_mut(segment, path))
    }

    /// Probe for a descendant; `None` when the path does not resolve.
    ///
    /// This is the defensive lookup used for engine-version-dependent
    /// fields: absence is not an error.
    pub fn find(&self, path: &str) -> Option<&FieldNode> {
        self.get(path).ok()
    }

    /// Mutable variant of [`FieldNode::find`].
    pub fn find_mut(&mut self, path: &str) -> Option<&mut FieldNode> {
        self.get_mut(path).ok()
    }

    fn step<'a>(&'a self, segment: &Segment<'_>, full: &str) -> Result<&'a FieldNode> {
        // The literal `Array` marker addresses the array aspect of the
        // current node rather than a child; with an index it selects one of
        // the node's own elements.
        if segment.name == "Array" {
            return match segment.index {
                None => {
                    if matches!(self.value, FieldValue::Array { .. }) {
                        Ok(self)
                    } else {
                        Err(mismatch(full, FieldKind::Array, self.value.kind()))
                    }
                }
                Some(i) => match &self.value {
                    FieldValue::Array { items, .. } => items
                        .get(i)
                        .ok_or_else(|| MapforgeError::FieldNotFound(full.into())),
                    other => Err(mismatch(full, FieldKind::Array, other.kind())),
                },
            };
        }
        let child = match &self.value {
            FieldValue::Struct(fields) => fields.iter().find(|f| f.name == segment.name),
            _ => None,
        }
        .ok_or_else(|| MapforgeError::FieldNotFound(full.into()))?;

        match segment.index {
            None => Ok(child),
            Some(i) => match &child.value {
                FieldValue::Array { items, .. } => items
                    .get(i)
                    .ok_or_else(|| MapforgeError::FieldNotFound(full.into())),
                other => Err(mismatch(full, FieldKind::Array, other.kind())),
            },
        }
    }

    fn step_mut<'a>(&'a mut self, segment: &Segment<'_>, full: &str) -> Result<&'a mut FieldNode> {
        if segment.name == "Array" {
            return match segment.index {
                None => {
                    if matches!(self.value, FieldValue::Array { .. }) {
                        Ok(self)
                    } else {
                        Err(mismatch(full, FieldKind::Array, self.value.kind()))
                    }
                }
                Some(i) => match &mut self.value {
                    FieldValue::Array { items, .. } => items
                        .get_mut(i)
                        .ok_or_else(|| MapforgeError::FieldNotFound(full.into())),
                    other => Err(mismatch(full, FieldKind::Array, other.kind())),
                },
            };
        }
        let child = match &mut self.value {
            FieldValue::Struct(fields) => fields.iter_mut().find(|f| f.name == segment.name),
            _ => None,
        }
        .ok_or_else(|| MapforgeError::FieldNotFound(full.into()))?;

        match segment.index {
            None => Ok(child),
            Some(i) => match &mut child.value {
                FieldValue::Array { items, .. } => items
                    .get_mut(i)
                    .ok_or_else(|| MapforgeError::FieldNotFound(full.into())),
                other => Err(mismatch(full, FieldKind::Array, other.kind())),
            },
        }
    }

    scalar_accessors!(get_bool, set_bool, Bool, bool);
    scalar_accessors!(get_i8, set_i8, Int8, i8);
    scalar_accessors!(get_u8, set_u8, UInt8, u8);
    scalar_accessors!(get_i16, set_i16, Int16, i16);
    scalar_accessors!(get_u16, set_u16, UInt16, u16);
    scalar_accessors!(get_i32, set_i32, Int32, i32);
    scalar_accessors!(get_u32, set_u32, UInt32, u32);
    scalar_accessors!(get_i64, set_i64, Int64, i64);
    scalar_accessors!(get_u64, set_u64, UInt64, u64);
    scalar_accessors!(get_f32, set_f32, Float, f32);
    scalar_accessors!(get_f64, set_f64, Double, f64);
    scalar_accessors!(get_bytes, set_bytes, Bytes, Vec<u8>);

    pub fn get_string(&self, path: &str) -> Result<String> {
        match &self.get(path)?.value {
            FieldValue::String(v) => Ok(v.clone()),
            other => Err(mismatch(path, FieldKind::String, other.kind())),
        }
    }

    pub fn set_string(&mut self, path: &str, value: &str) -> Result<()> {
        let node = self.get_mut(path)?;
        match &mut node.value {
            FieldValue::String(v) => {
                *v = value.into();
                Ok(())
            }
            other => Err(mismatch(path, FieldKind::String, other.kind())),
        }
    }

    /// Ordered elements of an array-valued field.
    pub fn children(&self, path: &str) -> Result<&[FieldNode]> {
        match &self.get(path)?.value {
            FieldValue::Array { items, .. } => Ok(items),
            other => Err(mismatch(path, FieldKind::Array, other.kind())),
        }
    }

    /// Remove every element of an array-valued field.
    pub fn clear_children(&mut self, path: &str) -> Result<()> {
        let node = self.get_mut(path)?;
        match &mut node.value {
            FieldValue::Array { items, .. } => {
                items.clear();
                Ok(())
            }
            other => Err(mismatch(path, FieldKind::Array, other.kind())),
        }
    }

    /// Append a default-shaped element to an array-valued field and return
    /// it for filling.
    pub fn append_default_child(&mut self, path: &str) -> Result<&mut FieldNode> {
        let node = self.get_mut(path)?;
        match &mut node.value {
            FieldValue::Array { element, items } => {
                items.push(element.instantiate());
                Ok(items.last_mut().unwrap())
            }
            other => Err(mismatch(path, FieldKind::Array, other.kind())),
        }
    }

    /// Decode one object payload against its schema template.
    pub fn decode(template: &FieldTemplate, bytes: &[u8]) -> Result<FieldNode> {
        let mut r = Reader::new(bytes);
        let node = decode_node(template, &mut r)?;
        if r.remaining() != 0 {
            return Err(MapforgeError::Decode(format!(
                "{} trailing bytes after payload for '{}'",
                r.remaining(),
                template.type_name
            )));
        }
        Ok(node)
    }

    /// Serialize this tree to its payload byte form.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut w = Writer::new();
        encode_node(self, &mut w)?;
        Ok(w.into_bytes())
    }
}

fn mismatch(path: &str, expected: FieldKind, found: FieldKind) -> MapforgeError {
    MapforgeError::TypeMismatch {
        path: path.into(),
        expected: expected.name(),
        found: found.name(),
    }
}

fn decode_node(template: &FieldTemplate, r: &mut Reader<'_>) -> Result<FieldNode> {
    let value = match template.kind {
        FieldKind::Bool => FieldValue::Bool(r.read_u8()? != 0),
        FieldKind::Int8 => FieldValue::Int8(r.read_i8()?),
        FieldKind::UInt8 => FieldValue::UInt8(r.read_u8()?),
        FieldKind::Int16 => FieldValue::Int16(r.read_i16()?),
        FieldKind::UInt16 => FieldValue::UInt16(r.read_u16()?),
        FieldKind::Int32 => FieldValue::Int32(r.read_i32()?),
        FieldKind::UInt32 => FieldValue::UInt32(r.read_u32()?),
        FieldKind::Int64 => FieldValue::Int64(r.read_i64()?),
        FieldKind::UInt64 => FieldValue::UInt64(r.read_u64()?),
        FieldKind::Float => FieldValue::Float(r.read_f32()?),
        FieldKind::Double => FieldValue::Double(r.read_f64()?),
        FieldKind::String => FieldValue::String(r.read_string()?),
        FieldKind::Bytes => FieldValue::Bytes(r.read_bytes()?),
        FieldKind::Struct => {
            let mut fields = Vec::with_capacity(template.children.len());
            for child in &template.children {
                fields.push(decode_node(child, r)?);
            }
            FieldValue::Struct(fields)
        }
        FieldKind::Array => {
            let element = template.element().ok_or_else(|| {
                MapforgeError::Decode(format!("array '{}' has no element shape", template.name))
            })?;
            let count = r.read_u32()? as usize;
            let mut items = Vec::with_capacity(count.min(1024));
            for _ in 0..count {
                items.push(decode_node(element, r)?);
            }
            FieldValue::Array {
                element: Box::new(element.clone()),
                items,
            }
        }
    };
    Ok(FieldNode {
        name: template.name.clone(),
        type_name: template.type_name.clone(),
        value,
    })
}

fn encode_node(node: &FieldNode, w: &mut Writer) -> Result<()> {
    match &node.value {
        FieldValue::Bool(v) => w.put_u8(*v as u8),
        FieldValue::Int8(v) => w.put_i8(*v),
        FieldValue::UInt8(v) => w.put_u8(*v),
        FieldValue::Int16(v) => w.put_i16(*v),
        FieldValue::UInt16(v) => w.put_u16(*v),
        FieldValue::Int32(v) => w.put_i32(*v),
        FieldValue::UInt32(v) => w.put_u32(*v),
        FieldValue::Int64(v) => w.put_i64(*v),
        FieldValue::UInt64(v) => w.put_u64(*v),
        FieldValue::Float(v) => w.put_f32(*v),
        FieldValue::Double(v) => w.put_f64(*v),
        FieldValue::String(v) => w.put_string(v)?,
        FieldValue::Bytes(v) => w.put_bytes(v)?,
        FieldValue::Struct(fields) => {
            for field in fields {
                encode_node(field, w)?;
            }
        }
        FieldValue::Array { items, .. } => {
            let count = u32::try_from(items.len())
                .map_err(|_| MapforgeError::Encode("array exceeds u32 length".into()))?;
            w.put_u32(count);
            for item in items {
                encode_node(item, w)?;
            }
        }
    }
    Ok(())
}

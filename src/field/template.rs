//! Field templates: the schema-side shape of a typed object.
//!
//! A template mirrors the type tree embedded in the bundle: a named node
//! with a declared kind and, for structs and arrays, child shapes. An array
//! template carries exactly one child, the element shape.

use crate::error::{MapforgeError, Result};
use crate::field::{FieldNode, FieldValue};
use crate::wire::{Reader, Writer};

/// Declared kind of a field node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FieldKind {
    Bool = 0,
    Int8 = 1,
    UInt8 = 2,
    Int16 = 3,
    UInt16 = 4,
    Int32 = 5,
    UInt32 = 6,
    Int64 = 7,
    UInt64 = 8,
    Float = 9,
    Double = 10,
    String = 11,
    Bytes = 12,
    Struct = 13,
    Array = 14,
}

impl FieldKind {
    /// Convert from the schema-table byte value.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(FieldKind::Bool),
            1 => Some(FieldKind::Int8),
            2 => Some(FieldKind::UInt8),
            3 => Some(FieldKind::Int16),
            4 => Some(FieldKind::UInt16),
            5 => Some(FieldKind::Int32),
            6 => Some(FieldKind::UInt32),
            7 => Some(FieldKind::Int64),
            8 => Some(FieldKind::UInt64),
            9 => Some(FieldKind::Float),
            10 => Some(FieldKind::Double),
            11 => Some(FieldKind::String),
            12 => Some(FieldKind::Bytes),
            13 => Some(FieldKind::Struct),
            14 => Some(FieldKind::Array),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FieldKind::Bool => "bool",
            FieldKind::Int8 => "i8",
            FieldKind::UInt8 => "u8",
            FieldKind::Int16 => "i16",
            FieldKind::UInt16 => "u16",
            FieldKind::Int32 => "i32",
            FieldKind::UInt32 => "u32",
            FieldKind::Int64 => "i64",
            FieldKind::UInt64 => "u64",
            FieldKind::Float => "f32",
            FieldKind::Double => "f64",
            FieldKind::String => "string",
            FieldKind::Bytes => "bytes",
            FieldKind::Struct => "struct",
            FieldKind::Array => "array",
        }
    }
}

/// Shape of one field: name, declared type, kind, and child shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldTemplate {
    pub name: String,
    pub type_name: String,
    pub kind: FieldKind,
    pub children: Vec<FieldTemplate>,
}

impl FieldTemplate {
    pub fn scalar(name: &str, type_name: &str, kind: FieldKind) -> Self {
        FieldTemplate {
            name: name.into(),
            type_name: type_name.into(),
            kind,
            children: Vec::new(),
        }
    }

    pub fn string(name: &str) -> Self {
        Self::scalar(name, "string", FieldKind::String)
    }

    pub fn bytes(name: &str) -> Self {
        Self::scalar(name, "TypelessData", FieldKind::Bytes)
    }

    pub fn record(name: &str, type_name: &str, children: Vec<FieldTemplate>) -> Self {
        FieldTemplate {
            name: name.into(),
            type_name: type_name.into(),
            kind: FieldKind::Struct,
            children,
        }
    }

    pub fn array(name: &str, element: FieldTemplate) -> Self {
        FieldTemplate {
            name: name.into(),
            type_name: "Array".into(),
            kind: FieldKind::Array,
            children: vec![element],
        }
    }

    /// Element shape of an array template.
    pub fn element(&self) -> Option<&FieldTemplate> {
        match self.kind {
            FieldKind::Array => self.children.first(),
            _ => None,
        }
    }

    /// Instantiate a zero/empty-valued node of this shape.
    pub fn instantiate(&self) -> FieldNode {
        let value = match self.kind {
            FieldKind::Bool => FieldValue::Bool(false),
            FieldKind::Int8 => FieldValue::Int8(0),
            FieldKind::UInt8 => FieldValue::UInt8(0),
            FieldKind::Int16 => FieldValue::Int16(0),
            FieldKind::UInt16 => FieldValue::UInt16(0),
            FieldKind::Int32 => FieldValue::Int32(0),
            FieldKind::UInt32 => FieldValue::UInt32(0),
            FieldKind::Int64 => FieldValue::Int64(0),
            FieldKind::UInt64 => FieldValue::UInt64(0),
            FieldKind::Float => FieldValue::Float(0.0),
            FieldKind::Double => FieldValue::Double(0.0),
            FieldKind::String => FieldValue::String(String::new()),
            FieldKind::Bytes => FieldValue::Bytes(Vec::new()),
            FieldKind::Struct => {
                FieldValue::Struct(self.children.iter().map(|c| c.instantiate()).collect())
            }
            FieldKind::Array => FieldValue::Array {
                element: Box::new(self.children.first().cloned().unwrap_or_else(|| {
                    FieldTemplate::scalar("data", "u8", FieldKind::UInt8)
                })),
                items: Vec::new(),
            },
        };
        FieldNode {
            name: self.name.clone(),
            type_name: self.type_name.clone(),
            value,
        }
    }

    pub(crate) fn encode(&self, w: &mut Writer) -> Result<()> {
        w.put_string(&self.name)?;
        w.put_string(&self.type_name)?;
        w.put_u8(self.kind as u8);
        w.put_u32(self.children.len() as u32);
        for child in &self.children {
            child.encode(w)?;
        }
        Ok(())
    }

    pub(crate) fn decode(r: &mut Reader<'_>) -> Result<FieldTemplate> {
        let name = r.read_string()?;
        let type_name = r.read_string()?;
        let kind_byte = r.read_u8()?;
        let kind = FieldKind::from_u8(kind_byte)
            .ok_or_else(|| MapforgeError::Decode(format!("unknown field kind {kind_byte}")))?;
        let child_count = r.read_u32()? as usize;
        if kind == FieldKind::Array && child_count != 1 {
            return Err(MapforgeError::Decode(format!(
                "array template '{name}' must have exactly one element shape"
            )));
        }
        let mut children = Vec::with_capacity(child_count);
        for _ in 0..child_count {
            children.push(FieldTemplate::decode(r)?);
        }
        Ok(FieldTemplate {
            name,
            type_name,
            kind,
            children,
        })
    }
}

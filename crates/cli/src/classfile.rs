// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Minimal JVM class-file reader.
//!
//! Parses just enough of the class-file container to answer "which methods
//! of this class are test candidates and what annotations do they carry":
//! constant pool, access flags, method table, and `RuntimeVisibleAnnotations`
//! attributes with their element values. Everything else (bytecode, debug
//! info, signatures) is skipped by attribute length.
//!
//! No class is ever loaded or executed. Parsing is purely structural, so the
//! scanned classes' own dependencies never need to be resolvable by this
//! process.

pub const ACC_PUBLIC: u16 = 0x0001;
pub const ACC_STATIC: u16 = 0x0008;
pub const ACC_NATIVE: u16 = 0x0100;
pub const ACC_INTERFACE: u16 = 0x0200;
pub const ACC_ABSTRACT: u16 = 0x0400;
pub const ACC_ANNOTATION: u16 = 0x2000;
pub const ACC_ENUM: u16 = 0x4000;

const MAGIC: u32 = 0xCAFE_BABE;
const RUNTIME_VISIBLE_ANNOTATIONS: &str = "RuntimeVisibleAnnotations";

/// Class-file parse failure.
#[derive(Debug, thiserror::Error)]
pub enum ClassFileError {
    #[error("unexpected end of class file at offset {0}")]
    Truncated(usize),
    #[error("bad magic number 0x{0:08X}")]
    BadMagic(u32),
    #[error("unknown constant pool tag {0}")]
    UnknownConstantTag(u8),
    #[error("unknown annotation element tag 0x{0:02X}")]
    UnknownElementTag(u8),
    #[error("constant pool index {0} out of range or of unexpected kind")]
    BadConstantIndex(u16),
}

/// Structural view of one compiled class.
#[derive(Debug)]
pub struct ClassFile {
    pub access_flags: u16,
    /// Fully qualified class name in dotted form.
    pub class_name: String,
    /// Class-level runtime-visible annotations.
    pub annotations: Vec<Annotation>,
    pub methods: Vec<MethodInfo>,
}

impl ClassFile {
    /// Interfaces, abstract classes, annotation types and enums never host
    /// runnable test methods.
    pub fn is_instantiable_class(&self) -> bool {
        self.access_flags & (ACC_INTERFACE | ACC_ABSTRACT | ACC_ANNOTATION | ACC_ENUM) == 0
    }
}

#[derive(Debug)]
pub struct MethodInfo {
    pub access_flags: u16,
    pub name: String,
    pub descriptor: String,
    pub annotations: Vec<Annotation>,
}

impl MethodInfo {
    /// Public instance method, concrete, no arguments, void return, and not
    /// a constructor or static initializer.
    pub fn is_test_candidate(&self) -> bool {
        self.access_flags & ACC_PUBLIC != 0
            && self.access_flags & (ACC_ABSTRACT | ACC_NATIVE | ACC_STATIC) == 0
            && self.descriptor == "()V"
            && !self.name.starts_with('<')
    }
}

/// One runtime-visible annotation with its named element values.
#[derive(Debug)]
pub struct Annotation {
    /// Field descriptor form, e.g. `Lorg/junit/Test;`.
    pub type_descriptor: String,
    pub values: Vec<(String, ElementValue)>,
}

/// Annotation element value, reduced to the kinds the scanner consumes.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementValue {
    Int(i64),
    Boolean(bool),
    Str(String),
    Array(Vec<ElementValue>),
    /// Enum constants, class literals, nested annotations, floats. Parsed
    /// and discarded.
    Other,
}

enum Constant {
    Utf8(String),
    Integer(i32),
    Long(i64),
    Class(u16),
    Other,
    /// Second slot of a long/double entry.
    Unusable,
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], ClassFileError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&e| e <= self.bytes.len())
            .ok_or(ClassFileError::Truncated(self.pos))?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn u8(&mut self) -> Result<u8, ClassFileError> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16, ClassFileError> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn u32(&mut self) -> Result<u32, ClassFileError> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn i32(&mut self) -> Result<i32, ClassFileError> {
        Ok(self.u32()? as i32)
    }

    fn i64(&mut self) -> Result<i64, ClassFileError> {
        let b = self.take(8)?;
        Ok(i64::from_be_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    fn skip(&mut self, n: usize) -> Result<(), ClassFileError> {
        self.take(n).map(|_| ())
    }
}

struct ConstantPool(Vec<Constant>);

impl ConstantPool {
    fn get(&self, index: u16) -> Result<&Constant, ClassFileError> {
        self.0
            .get(index as usize)
            .ok_or(ClassFileError::BadConstantIndex(index))
    }

    fn utf8(&self, index: u16) -> Result<&str, ClassFileError> {
        match self.get(index)? {
            Constant::Utf8(s) => Ok(s),
            _ => Err(ClassFileError::BadConstantIndex(index)),
        }
    }

    fn integer(&self, index: u16) -> Result<i32, ClassFileError> {
        match self.get(index)? {
            Constant::Integer(v) => Ok(*v),
            _ => Err(ClassFileError::BadConstantIndex(index)),
        }
    }

    fn long(&self, index: u16) -> Result<i64, ClassFileError> {
        match self.get(index)? {
            Constant::Long(v) => Ok(*v),
            _ => Err(ClassFileError::BadConstantIndex(index)),
        }
    }

    fn class_name(&self, index: u16) -> Result<String, ClassFileError> {
        match self.get(index)? {
            Constant::Class(name_index) => Ok(self.utf8(*name_index)?.replace('/', ".")),
            _ => Err(ClassFileError::BadConstantIndex(index)),
        }
    }
}

/// Parse one class file from raw bytes.
pub fn parse(bytes: &[u8]) -> Result<ClassFile, ClassFileError> {
    let mut r = Reader::new(bytes);

    let magic = r.u32()?;
    if magic != MAGIC {
        return Err(ClassFileError::BadMagic(magic));
    }
    r.skip(4)?; // minor + major version

    let pool = parse_constant_pool(&mut r)?;

    let access_flags = r.u16()?;
    let this_class = r.u16()?;
    let class_name = pool.class_name(this_class)?;
    r.u16()?; // super class

    let interfaces_count = r.u16()? as usize;
    r.skip(interfaces_count * 2)?;

    // Field table: nothing of interest, skip member by member.
    let fields_count = r.u16()?;
    for _ in 0..fields_count {
        r.skip(6)?; // access, name, descriptor
        skip_attributes(&mut r)?;
    }

    let methods_count = r.u16()?;
    let mut methods = Vec::with_capacity(methods_count as usize);
    for _ in 0..methods_count {
        let access = r.u16()?;
        let name = pool.utf8(r.u16()?)?.to_string();
        let descriptor = pool.utf8(r.u16()?)?.to_string();
        let annotations = parse_member_attributes(&mut r, &pool)?;
        methods.push(MethodInfo {
            access_flags: access,
            name,
            descriptor,
            annotations,
        });
    }

    // Class attributes trail the method table in the container.
    let annotations = parse_member_attributes(&mut r, &pool)?;

    Ok(ClassFile {
        access_flags,
        class_name,
        annotations,
        methods,
    })
}

fn parse_constant_pool(r: &mut Reader) -> Result<ConstantPool, ClassFileError> {
    let count = r.u16()? as usize;
    let mut pool = Vec::with_capacity(count);
    pool.push(Constant::Unusable); // index 0 is reserved

    while pool.len() < count {
        let tag = r.u8()?;
        let constant = match tag {
            1 => {
                let len = r.u16()? as usize;
                let raw = r.take(len)?;
                // Modified UTF-8; lossy decoding is fine for the names and
                // string values the scanner looks at.
                Constant::Utf8(String::from_utf8_lossy(raw).into_owned())
            }
            3 => Constant::Integer(r.i32()?),
            4 => {
                r.skip(4)?;
                Constant::Other
            }
            5 => Constant::Long(r.i64()?),
            6 => {
                r.skip(8)?;
                Constant::Other
            }
            7 => Constant::Class(r.u16()?),
            8 | 16 | 19 | 20 => {
                r.skip(2)?;
                Constant::Other
            }
            9..=12 | 17 | 18 => {
                r.skip(4)?;
                Constant::Other
            }
            15 => {
                r.skip(3)?;
                Constant::Other
            }
            other => return Err(ClassFileError::UnknownConstantTag(other)),
        };
        let two_slots = matches!(tag, 5 | 6);
        pool.push(constant);
        if two_slots {
            pool.push(Constant::Unusable);
        }
    }

    Ok(ConstantPool(pool))
}

fn skip_attributes(r: &mut Reader) -> Result<(), ClassFileError> {
    let count = r.u16()?;
    for _ in 0..count {
        r.u16()?; // attribute name
        let len = r.u32()? as usize;
        r.skip(len)?;
    }
    Ok(())
}

/// Walk a member's attribute table, collecting runtime-visible annotations
/// and skipping everything else.
fn parse_member_attributes(
    r: &mut Reader,
    pool: &ConstantPool,
) -> Result<Vec<Annotation>, ClassFileError> {
    let count = r.u16()?;
    let mut annotations = Vec::new();
    for _ in 0..count {
        let name_index = r.u16()?;
        let len = r.u32()? as usize;
        if pool.utf8(name_index)? == RUNTIME_VISIBLE_ANNOTATIONS {
            let num = r.u16()?;
            for _ in 0..num {
                annotations.push(parse_annotation(r, pool)?);
            }
        } else {
            r.skip(len)?;
        }
    }
    Ok(annotations)
}

fn parse_annotation(r: &mut Reader, pool: &ConstantPool) -> Result<Annotation, ClassFileError> {
    let type_descriptor = pool.utf8(r.u16()?)?.to_string();
    let num_pairs = r.u16()?;
    let mut values = Vec::with_capacity(num_pairs as usize);
    for _ in 0..num_pairs {
        let name = pool.utf8(r.u16()?)?.to_string();
        let value = parse_element_value(r, pool)?;
        values.push((name, value));
    }
    Ok(Annotation {
        type_descriptor,
        values,
    })
}

fn parse_element_value(
    r: &mut Reader,
    pool: &ConstantPool,
) -> Result<ElementValue, ClassFileError> {
    let tag = r.u8()?;
    let value = match tag {
        b'B' | b'C' | b'I' | b'S' => ElementValue::Int(pool.integer(r.u16()?)? as i64),
        b'Z' => ElementValue::Boolean(pool.integer(r.u16()?)? != 0),
        b'J' => ElementValue::Int(pool.long(r.u16()?)?),
        b'D' | b'F' => {
            r.u16()?;
            ElementValue::Other
        }
        b's' => ElementValue::Str(pool.utf8(r.u16()?)?.to_string()),
        b'e' => {
            r.skip(4)?; // type name + const name
            ElementValue::Other
        }
        b'c' => {
            r.u16()?;
            ElementValue::Other
        }
        b'@' => {
            parse_annotation(r, pool)?;
            ElementValue::Other
        }
        b'[' => {
            let num = r.u16()?;
            let mut items = Vec::with_capacity(num as usize);
            for _ in 0..num {
                items.push(parse_element_value(r, pool)?);
            }
            ElementValue::Array(items)
        }
        other => return Err(ClassFileError::UnknownElementTag(other)),
    };
    Ok(value)
}

#[cfg(test)]
#[path = "classfile_tests.rs"]
mod tests;

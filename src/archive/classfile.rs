//! Minimal JVM class-file reader.
//!
//! Decodes just enough of a class file to place the class in the type
//! hierarchy: the constant pool (names only), access flags, this/super
//! class and the implemented interfaces. The field, method and attribute
//! tables are never visited, and no descriptor parsing happens at all.

use thiserror::Error;

pub const ACC_INTERFACE: u16 = 0x0200;
pub const ACC_ABSTRACT: u16 = 0x0400;
pub const ACC_ANNOTATION: u16 = 0x2000;
pub const ACC_ENUM: u16 = 0x4000;

#[derive(Debug, Error)]
pub enum ClassFileError {
    #[error("unexpected end of class file")]
    UnexpectedEof,
    #[error("invalid class file magic header")]
    InvalidMagic,
    #[error("unsupported constant pool tag {tag}")]
    UnsupportedConstant { tag: u8 },
    #[error("invalid constant pool index {index}")]
    InvalidConstantIndex { index: u16 },
    #[error("invalid UTF-8 string in constant pool: {0}")]
    Utf8Decode(#[from] std::string::FromUtf8Error),
}

/// Hierarchy-relevant header of one class file. Names are binary names
/// exactly as stored: slash-separated packages, `$` for nesting.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassHeader {
    pub binary_name: String,
    pub access_flags: u16,
    /// `None` only for `java/lang/Object`, the hierarchy root.
    pub superclass: Option<String>,
    pub interfaces: Vec<String>,
}

impl ClassHeader {
    pub fn is_interface(&self) -> bool {
        self.access_flags & ACC_INTERFACE != 0
    }

    pub fn is_annotation(&self) -> bool {
        self.access_flags & ACC_ANNOTATION != 0
    }

    pub fn is_enum(&self) -> bool {
        self.access_flags & ACC_ENUM != 0
    }

    pub fn is_abstract(&self) -> bool {
        self.access_flags & ACC_ABSTRACT != 0
    }
}

pub fn read_header(bytes: &[u8]) -> Result<ClassHeader, ClassFileError> {
    let mut reader = ClassReader::new(bytes);
    reader.expect_magic()?;
    let _minor_version = reader.read_u2()?;
    let _major_version = reader.read_u2()?;
    let constant_pool = ConstantPool::parse(&mut reader)?;

    let access_flags = reader.read_u2()?;
    let this_class = reader.read_u2()?;
    let super_class = reader.read_u2()?;

    let interfaces_count = reader.read_u2()?;
    let mut interfaces = Vec::with_capacity(interfaces_count as usize);
    for _ in 0..interfaces_count {
        let index = reader.read_u2()?;
        interfaces.push(constant_pool.class_name(index)?);
    }

    let binary_name = constant_pool.class_name(this_class)?;
    let superclass = if super_class == 0 {
        None
    } else {
        Some(constant_pool.class_name(super_class)?)
    };

    Ok(ClassHeader {
        binary_name,
        access_flags,
        superclass,
        interfaces,
    })
}

#[derive(Debug, Clone)]
enum Constant {
    Utf8(String),
    Class { name_index: u16 },
    Other,
    Unusable,
}

struct ConstantPool {
    entries: Vec<Constant>,
}

impl ConstantPool {
    fn parse(reader: &mut ClassReader<'_>) -> Result<Self, ClassFileError> {
        let count = reader.read_u2()? as usize;
        let mut entries = Vec::with_capacity(count);
        entries.push(Constant::Unusable); // index 0 unused

        let mut index = 1;
        while index < count {
            let tag = reader.read_u1()?;
            let entry = match tag {
                1 => {
                    let length = reader.read_u2()? as usize;
                    let bytes = reader.read_slice(length)?;
                    Constant::Utf8(String::from_utf8(bytes.to_vec())?)
                }
                3 | 4 => {
                    reader.skip(4)?;
                    Constant::Other
                }
                5 | 6 => {
                    // long/double take two pool slots
                    reader.skip(8)?;
                    entries.push(Constant::Unusable);
                    index += 1;
                    Constant::Other
                }
                7 => {
                    let name_index = reader.read_u2()?;
                    Constant::Class { name_index }
                }
                8 | 16 | 19 | 20 => {
                    reader.skip(2)?;
                    Constant::Other
                }
                9 | 10 | 11 | 12 | 17 | 18 => {
                    reader.skip(4)?;
                    Constant::Other
                }
                15 => {
                    reader.skip(3)?;
                    Constant::Other
                }
                other => return Err(ClassFileError::UnsupportedConstant { tag: other }),
            };

            entries.push(entry);
            index += 1;
        }

        Ok(Self { entries })
    }

    fn get(&self, index: u16) -> Result<&Constant, ClassFileError> {
        self.entries
            .get(index as usize)
            .ok_or(ClassFileError::InvalidConstantIndex { index })
    }

    fn utf8(&self, index: u16) -> Result<&str, ClassFileError> {
        match self.get(index)? {
            Constant::Utf8(value) => Ok(value.as_str()),
            _ => Err(ClassFileError::InvalidConstantIndex { index }),
        }
    }

    fn class_name(&self, index: u16) -> Result<String, ClassFileError> {
        match self.get(index)? {
            Constant::Class { name_index } => Ok(self.utf8(*name_index)?.to_string()),
            _ => Err(ClassFileError::InvalidConstantIndex { index }),
        }
    }
}

struct ClassReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ClassReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn expect_magic(&mut self) -> Result<(), ClassFileError> {
        const MAGIC: u32 = 0xCAFEBABE;
        if self.read_u4()? != MAGIC {
            return Err(ClassFileError::InvalidMagic);
        }
        Ok(())
    }

    fn read_u1(&mut self) -> Result<u8, ClassFileError> {
        if self.pos >= self.data.len() {
            return Err(ClassFileError::UnexpectedEof);
        }
        let value = self.data[self.pos];
        self.pos += 1;
        Ok(value)
    }

    fn read_u2(&mut self) -> Result<u16, ClassFileError> {
        if self.pos + 2 > self.data.len() {
            return Err(ClassFileError::UnexpectedEof);
        }
        let value = u16::from_be_bytes([self.data[self.pos], self.data[self.pos + 1]]);
        self.pos += 2;
        Ok(value)
    }

    fn read_u4(&mut self) -> Result<u32, ClassFileError> {
        if self.pos + 4 > self.data.len() {
            return Err(ClassFileError::UnexpectedEof);
        }
        let value = u32::from_be_bytes([
            self.data[self.pos],
            self.data[self.pos + 1],
            self.data[self.pos + 2],
            self.data[self.pos + 3],
        ]);
        self.pos += 4;
        Ok(value)
    }

    fn read_slice(&mut self, len: usize) -> Result<&'a [u8], ClassFileError> {
        if self.pos + len > self.data.len() {
            return Err(ClassFileError::UnexpectedEof);
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn skip(&mut self, len: usize) -> Result<(), ClassFileError> {
        if self.pos + len > self.data.len() {
            return Err(ClassFileError::UnexpectedEof);
        }
        self.pos += len;
        Ok(())
    }
}

/// Assemble the bytes of a minimal, valid class file for fixtures: a constant
/// pool holding only the class references, empty field/method/attribute
/// tables.
#[cfg(test)]
pub(crate) fn class_bytes(
    binary_name: &str,
    access_flags: u16,
    superclass: Option<&str>,
    interfaces: &[&str],
) -> Vec<u8> {
    fn add_class_entry(pool: &mut Vec<u8>, entry_count: &mut u16, binary: &str) -> u16 {
        pool.push(1); // CONSTANT_Utf8
        pool.extend_from_slice(&(binary.len() as u16).to_be_bytes());
        pool.extend_from_slice(binary.as_bytes());
        *entry_count += 1;
        let utf8_index = *entry_count;

        pool.push(7); // CONSTANT_Class
        pool.extend_from_slice(&utf8_index.to_be_bytes());
        *entry_count += 1;
        *entry_count
    }

    let mut pool = Vec::new();
    let mut entry_count: u16 = 0;
    let this_index = add_class_entry(&mut pool, &mut entry_count, binary_name);
    let super_index = superclass
        .map(|s| add_class_entry(&mut pool, &mut entry_count, s))
        .unwrap_or(0);
    let interface_indices: Vec<u16> = interfaces
        .iter()
        .map(|i| add_class_entry(&mut pool, &mut entry_count, i))
        .collect();

    let mut bytes = Vec::new();
    bytes.extend_from_slice(&0xCAFEBABEu32.to_be_bytes());
    bytes.extend_from_slice(&0u16.to_be_bytes()); // minor
    bytes.extend_from_slice(&52u16.to_be_bytes()); // major, Java 8
    bytes.extend_from_slice(&(entry_count + 1).to_be_bytes());
    bytes.extend_from_slice(&pool);
    bytes.extend_from_slice(&access_flags.to_be_bytes());
    bytes.extend_from_slice(&this_index.to_be_bytes());
    bytes.extend_from_slice(&super_index.to_be_bytes());
    bytes.extend_from_slice(&(interface_indices.len() as u16).to_be_bytes());
    for index in interface_indices {
        bytes.extend_from_slice(&index.to_be_bytes());
    }
    bytes.extend_from_slice(&0u16.to_be_bytes()); // fields_count
    bytes.extend_from_slice(&0u16.to_be_bytes()); // methods_count
    bytes.extend_from_slice(&0u16.to_be_bytes()); // attributes_count
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_name_superclass_and_interfaces() {
        let bytes = class_bytes(
            "hudson/tasks/Builder",
            ACC_ABSTRACT,
            Some("java/lang/Object"),
            &["hudson/ExtensionPoint", "hudson/model/Describable"],
        );
        let header = read_header(&bytes).unwrap();
        assert_eq!(header.binary_name, "hudson/tasks/Builder");
        assert_eq!(header.superclass.as_deref(), Some("java/lang/Object"));
        assert_eq!(
            header.interfaces,
            ["hudson/ExtensionPoint", "hudson/model/Describable"]
        );
        assert!(header.is_abstract());
        assert!(!header.is_interface());
    }

    #[test]
    fn interface_flags_are_exposed() {
        let bytes = class_bytes(
            "hudson/ExtensionPoint",
            ACC_INTERFACE | ACC_ABSTRACT,
            Some("java/lang/Object"),
            &[],
        );
        let header = read_header(&bytes).unwrap();
        assert!(header.is_interface());
        assert!(!header.is_annotation());
    }

    #[test]
    fn missing_superclass_means_hierarchy_root() {
        let bytes = class_bytes("java/lang/Object", 0, None, &[]);
        let header = read_header(&bytes).unwrap();
        assert!(header.superclass.is_none());
    }

    #[test]
    fn rejects_bad_magic() {
        let mut bytes = class_bytes("a/B", 0, Some("java/lang/Object"), &[]);
        bytes[0] = 0x00;
        assert!(matches!(
            read_header(&bytes),
            Err(ClassFileError::InvalidMagic)
        ));
    }

    #[test]
    fn truncated_input_is_unexpected_eof() {
        let bytes = class_bytes("a/B", 0, Some("java/lang/Object"), &[]);
        assert!(matches!(
            read_header(&bytes[..bytes.len() / 2]),
            Err(ClassFileError::UnexpectedEof)
        ));
    }
}

//! Constants from the [Java Virtual Machine Specification, Chapter 4](https://docs.oracle.com/javase/specs/jvms/se22/html/jvms-4.html).

pub(crate) const MAGIC: u32 = 0xCAFE_BABE;

pub(crate) mod pool {
	pub(crate) const UTF8: u8 = 1;
	pub(crate) const INTEGER: u8 = 3;
	pub(crate) const FLOAT: u8 = 4;
	pub(crate) const LONG: u8 = 5;
	pub(crate) const DOUBLE: u8 = 6;
	pub(crate) const CLASS: u8 = 7;
	pub(crate) const STRING: u8 = 8;
	pub(crate) const FIELD_REF: u8 = 9;
	pub(crate) const METHOD_REF: u8 = 10;
	pub(crate) const INTERFACE_METHOD_REF: u8 = 11;
	pub(crate) const NAME_AND_TYPE: u8 = 12;
	pub(crate) const METHOD_HANDLE: u8 = 15;
	pub(crate) const METHOD_TYPE: u8 = 16;
	pub(crate) const DYNAMIC: u8 = 17;
	pub(crate) const INVOKE_DYNAMIC: u8 = 18;
	pub(crate) const MODULE: u8 = 19;
	pub(crate) const PACKAGE: u8 = 20;
}

/// The `tag` item of the `element_value` structure.
pub(crate) mod element_value {
	pub(crate) const BYTE: u8 = b'B';
	pub(crate) const CHAR: u8 = b'C';
	pub(crate) const DOUBLE: u8 = b'D';
	pub(crate) const FLOAT: u8 = b'F';
	pub(crate) const INT: u8 = b'I';
	pub(crate) const LONG: u8 = b'J';
	pub(crate) const SHORT: u8 = b'S';
	pub(crate) const BOOLEAN: u8 = b'Z';
	pub(crate) const STRING: u8 = b's';
	pub(crate) const ENUM: u8 = b'e';
	pub(crate) const CLASS: u8 = b'c';
	pub(crate) const ANNOTATION: u8 = b'@';
	pub(crate) const ARRAY: u8 = b'[';
}

/// Names of the attributes this crate decodes.
pub mod attribute {
	pub const RUNTIME_VISIBLE_ANNOTATIONS: &str = "RuntimeVisibleAnnotations";
	pub const RUNTIME_INVISIBLE_ANNOTATIONS: &str = "RuntimeInvisibleAnnotations";
	pub const RUNTIME_VISIBLE_PARAMETER_ANNOTATIONS: &str = "RuntimeVisibleParameterAnnotations";
	pub const RUNTIME_INVISIBLE_PARAMETER_ANNOTATIONS: &str = "RuntimeInvisibleParameterAnnotations";
	pub const ANNOTATION_DEFAULT: &str = "AnnotationDefault";
}

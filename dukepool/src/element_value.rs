use crate::annotation::AnnotationEntry;
use crate::class_constants::element_value;
use crate::error::{illegal_argument, FormatError, Result};
use crate::pool::{java_float, ConstantPool, ConstantTag};
use crate::{ClassRead, ClassWrite};

/// How deep annotations and arrays may be nested inside each other when reading.
///
/// Each level only takes a few bytes, so without a limit a small attribute could exhaust the stack.
pub(crate) const MAX_NESTING: usize = 256;

/// The kinds of element values that consist of a single constant pool index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstantKind {
	Byte,
	Char,
	Double,
	Float,
	Int,
	Long,
	Short,
	Boolean,
	String,
}

impl ConstantKind {
	/// The tag of the pool entry the `const_value_index` must point to.
	pub fn pool_tag(self) -> ConstantTag {
		match self {
			ConstantKind::Byte | ConstantKind::Char | ConstantKind::Int | ConstantKind::Short | ConstantKind::Boolean => ConstantTag::Integer,
			ConstantKind::Double => ConstantTag::Double,
			ConstantKind::Float => ConstantTag::Float,
			ConstantKind::Long => ConstantTag::Long,
			ConstantKind::String => ConstantTag::Utf8,
		}
	}
}

/// The `tag` item of an `element_value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementValueTag {
	Constant(ConstantKind),
	Enum,
	Class,
	Annotation,
	Array,
}

impl ElementValueTag {
	pub fn value(self) -> u8 {
		match self {
			ElementValueTag::Constant(ConstantKind::Byte) => element_value::BYTE,
			ElementValueTag::Constant(ConstantKind::Char) => element_value::CHAR,
			ElementValueTag::Constant(ConstantKind::Double) => element_value::DOUBLE,
			ElementValueTag::Constant(ConstantKind::Float) => element_value::FLOAT,
			ElementValueTag::Constant(ConstantKind::Int) => element_value::INT,
			ElementValueTag::Constant(ConstantKind::Long) => element_value::LONG,
			ElementValueTag::Constant(ConstantKind::Short) => element_value::SHORT,
			ElementValueTag::Constant(ConstantKind::Boolean) => element_value::BOOLEAN,
			ElementValueTag::Constant(ConstantKind::String) => element_value::STRING,
			ElementValueTag::Enum => element_value::ENUM,
			ElementValueTag::Class => element_value::CLASS,
			ElementValueTag::Annotation => element_value::ANNOTATION,
			ElementValueTag::Array => element_value::ARRAY,
		}
	}
}

impl TryFrom<u8> for ElementValueTag {
	/// The unknown tag.
	type Error = u8;

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		Ok(match value {
			element_value::BYTE => ElementValueTag::Constant(ConstantKind::Byte),
			element_value::CHAR => ElementValueTag::Constant(ConstantKind::Char),
			element_value::DOUBLE => ElementValueTag::Constant(ConstantKind::Double),
			element_value::FLOAT => ElementValueTag::Constant(ConstantKind::Float),
			element_value::INT => ElementValueTag::Constant(ConstantKind::Int),
			element_value::LONG => ElementValueTag::Constant(ConstantKind::Long),
			element_value::SHORT => ElementValueTag::Constant(ConstantKind::Short),
			element_value::BOOLEAN => ElementValueTag::Constant(ConstantKind::Boolean),
			element_value::STRING => ElementValueTag::Constant(ConstantKind::String),
			element_value::ENUM => ElementValueTag::Enum,
			element_value::CLASS => ElementValueTag::Class,
			element_value::ANNOTATION => ElementValueTag::Annotation,
			element_value::ARRAY => ElementValueTag::Array,
			tag => return Err(tag),
		})
	}
}

/// The value of an annotation element.
///
/// Only the pool indices are stored. Pass the [`ConstantPool`] the value was read with to the methods that need to resolve them.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementValue {
	/// A primitive or a `String`, the `const_value_index` points to an entry of the type [`ConstantKind::pool_tag`].
	Constant {
		kind: ConstantKind,
		const_value_index: u16,
	},
	Enum {
		/// Index of a `CONSTANT_Utf8` with the field descriptor of the enum class.
		type_name_index: u16,
		/// Index of a `CONSTANT_Utf8` with the simple name of the enum constant.
		const_name_index: u16,
	},
	Class {
		/// Index of a `CONSTANT_Utf8` with the return descriptor of the class, like `Ljava/lang/Object;` or `V`.
		class_info_index: u16,
	},
	Annotation(Box<AnnotationEntry>),
	Array(Vec<ElementValue>),
}

fn check_tag(tag: u8, expected: u8, constructor: &str) -> Result<()> {
	if tag != expected {
		illegal_argument!("element value tag {:?} used with the {constructor} constructor, which only takes {:?}", tag as char, expected as char);
	}
	Ok(())
}

impl ElementValue {
	/// Creates a constant element value, `tag` must be one of `BCDFIJSZs`.
	pub fn constant(tag: u8, const_value_index: u16) -> Result<ElementValue> {
		match ElementValueTag::try_from(tag) {
			Ok(ElementValueTag::Constant(kind)) => Ok(ElementValue::Constant { kind, const_value_index }),
			_ => illegal_argument!("element value tag {:?} is not a constant tag", tag as char),
		}
	}

	pub fn enum_constant(tag: u8, type_name_index: u16, const_name_index: u16) -> Result<ElementValue> {
		check_tag(tag, element_value::ENUM, "enum")?;
		Ok(ElementValue::Enum { type_name_index, const_name_index })
	}

	pub fn class(tag: u8, class_info_index: u16) -> Result<ElementValue> {
		check_tag(tag, element_value::CLASS, "class")?;
		Ok(ElementValue::Class { class_info_index })
	}

	pub fn annotation(tag: u8, annotation: AnnotationEntry) -> Result<ElementValue> {
		check_tag(tag, element_value::ANNOTATION, "annotation")?;
		Ok(ElementValue::Annotation(Box::new(annotation)))
	}

	pub fn array(tag: u8, values: Vec<ElementValue>) -> Result<ElementValue> {
		check_tag(tag, element_value::ARRAY, "array")?;
		Ok(ElementValue::Array(values))
	}

	pub fn tag(&self) -> ElementValueTag {
		match self {
			ElementValue::Constant { kind, .. } => ElementValueTag::Constant(*kind),
			ElementValue::Enum { .. } => ElementValueTag::Enum,
			ElementValue::Class { .. } => ElementValueTag::Class,
			ElementValue::Annotation(_) => ElementValueTag::Annotation,
			ElementValue::Array(_) => ElementValueTag::Array,
		}
	}

	/// Reads an element value, checking all the indices against the `pool`.
	///
	/// An unknown tag fails right after reading the tag byte. Annotations nested in the value are marked as not runtime visible, as
	/// there's no enclosing annotation to take that from.
	pub fn read(reader: &mut impl ClassRead, pool: &ConstantPool) -> Result<ElementValue> {
		ElementValue::read_nested(reader, pool, false, 0)
	}

	pub(crate) fn read_nested(reader: &mut impl ClassRead, pool: &ConstantPool, runtime_visible: bool, depth: usize) -> Result<ElementValue> {
		if depth > MAX_NESTING {
			return Err(FormatError::NestingTooDeep { limit: MAX_NESTING }.into());
		}

		let tag = reader.read_u8()?;
		let tag = ElementValueTag::try_from(tag)
			.map_err(|tag| FormatError::UnknownElementValueTag { tag })?;

		Ok(match tag {
			ElementValueTag::Constant(kind) => {
				let const_value_index = reader.read_u16()?;
				pool.check(const_value_index, kind.pool_tag())?;
				ElementValue::Constant { kind, const_value_index }
			},
			ElementValueTag::Enum => {
				let type_name_index = reader.read_u16()?;
				pool.check(type_name_index, ConstantTag::Utf8)?;
				let const_name_index = reader.read_u16()?;
				pool.check(const_name_index, ConstantTag::Utf8)?;
				ElementValue::Enum { type_name_index, const_name_index }
			},
			ElementValueTag::Class => {
				let class_info_index = reader.read_u16()?;
				pool.check(class_info_index, ConstantTag::Utf8)?;
				ElementValue::Class { class_info_index }
			},
			ElementValueTag::Annotation => {
				let annotation = AnnotationEntry::read_nested(reader, pool, runtime_visible, depth + 1)?;
				ElementValue::Annotation(Box::new(annotation))
			},
			ElementValueTag::Array => {
				let values = reader.read_vec(
					|r| r.read_u16_as_usize(),
					|r| ElementValue::read_nested(r, pool, runtime_visible, depth + 1)
				)?;
				ElementValue::Array(values)
			},
		})
	}

	pub fn write(&self, writer: &mut impl ClassWrite) -> Result<()> {
		writer.write_u8(self.tag().value())?;
		match self {
			&ElementValue::Constant { const_value_index, .. } => writer.write_u16(const_value_index),
			&ElementValue::Enum { type_name_index, const_name_index } => {
				writer.write_u16(type_name_index)?;
				writer.write_u16(const_name_index)
			},
			&ElementValue::Class { class_info_index } => writer.write_u16(class_info_index),
			ElementValue::Annotation(annotation) => annotation.write(writer),
			ElementValue::Array(values) => {
				writer.write_slice(values,
					|w, size| w.write_usize_as_u16(size, "element value array"),
					|w, value| value.write(w)
				)
			},
		}
	}

	/// The number of bytes [`ElementValue::write`] writes.
	pub fn length(&self) -> usize {
		1 + match self {
			ElementValue::Constant { .. } | ElementValue::Class { .. } => 2,
			ElementValue::Enum { .. } => 4,
			ElementValue::Annotation(annotation) => annotation.length(),
			ElementValue::Array(values) => 2 + values.iter().map(ElementValue::length).sum::<usize>(),
		}
	}

	pub fn to_bytes(&self) -> Result<Vec<u8>> {
		let mut vec = Vec::with_capacity(self.length());
		self.write(&mut vec)?;
		Ok(vec)
	}

	/// Renders the value for humans.
	///
	/// Constants are shown as their value, enum constants as their name, classes as their descriptor, nested annotations as
	/// `@Ltype;(name=value, ...)` and arrays as `[a,b]`.
	pub fn stringify_value(&self, pool: &ConstantPool) -> Result<String> {
		Ok(match self {
			&ElementValue::Constant { kind, const_value_index: index } => match kind {
				ConstantKind::Int => pool.get_integer(index)?.to_string(),
				ConstantKind::Short => (pool.get_integer(index)? as i16).to_string(),
				ConstantKind::Byte => (pool.get_integer(index)? as i8).to_string(),
				ConstantKind::Char => {
					let code_unit = pool.get_integer(index)? as u16;
					char::from_u32(code_unit as u32).unwrap_or(char::REPLACEMENT_CHARACTER).to_string()
				},
				ConstantKind::Boolean => (pool.get_integer(index)? != 0).to_string(),
				ConstantKind::Long => pool.get_long(index)?.to_string(),
				ConstantKind::Float => java_float(pool.get_float(index)?),
				ConstantKind::Double => java_float(pool.get_double(index)?),
				ConstantKind::String => pool.get_utf8(index)?.as_str_lossy().into_owned(),
			},
			&ElementValue::Enum { const_name_index, .. } => pool.get_utf8(const_name_index)?.as_str_lossy().into_owned(),
			&ElementValue::Class { class_info_index } => pool.get_utf8(class_info_index)?.as_str_lossy().into_owned(),
			ElementValue::Annotation(annotation) => annotation.to_short_string(pool)?,
			ElementValue::Array(values) => {
				let values = values.iter()
					.map(|value| value.stringify_value(pool))
					.collect::<Result<Vec<_>>>()?;
				format!("[{}]", values.join(","))
			},
		})
	}

	pub fn to_short_string(&self, pool: &ConstantPool) -> Result<String> {
		self.stringify_value(pool)
	}
}

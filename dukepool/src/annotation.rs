use java_string::JavaStr;
use crate::element_value::ElementValue;
use crate::error::Result;
use crate::pool::{ConstantPool, ConstantTag};
use crate::{ClassRead, ClassWrite};

/// A named value of an annotation, like the `value = "hello"` in `@Foo(value = "hello")`.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementValuePair {
	/// Index of a `CONSTANT_Utf8` with the name of the element.
	pub element_name_index: u16,
	pub value: ElementValue,
}

impl ElementValuePair {
	pub fn new(element_name_index: u16, value: ElementValue) -> ElementValuePair {
		ElementValuePair { element_name_index, value }
	}

	pub fn read(reader: &mut impl ClassRead, pool: &ConstantPool) -> Result<ElementValuePair> {
		ElementValuePair::read_nested(reader, pool, false, 0)
	}

	fn read_nested(reader: &mut impl ClassRead, pool: &ConstantPool, runtime_visible: bool, depth: usize) -> Result<ElementValuePair> {
		let element_name_index = reader.read_u16()?;
		pool.check(element_name_index, ConstantTag::Utf8)?;
		let value = ElementValue::read_nested(reader, pool, runtime_visible, depth)?;
		Ok(ElementValuePair { element_name_index, value })
	}

	pub fn write(&self, writer: &mut impl ClassWrite) -> Result<()> {
		writer.write_u16(self.element_name_index)?;
		self.value.write(writer)
	}

	pub fn length(&self) -> usize {
		2 + self.value.length()
	}

	/// Gets the name of the element.
	pub fn name<'p>(&self, pool: &'p ConstantPool) -> Result<&'p JavaStr> {
		pool.get_utf8(self.element_name_index)
	}

	/// Renders the pair as `name=value`.
	pub fn to_short_string(&self, pool: &ConstantPool) -> Result<String> {
		Ok(format!("{}={}", self.name(pool)?.as_str_lossy(), self.value.to_short_string(pool)?))
	}
}

/// A single annotation.
///
/// The order of the [`ElementValuePair`]s is kept as read, and written in that order.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationEntry {
	/// Index of a `CONSTANT_Utf8` with the field descriptor of the annotation interface.
	pub type_index: u16,
	pub element_value_pairs: Vec<ElementValuePair>,
	/// Whether the annotation comes from a `RuntimeVisible*` attribute. This isn't part of the binary representation of the annotation.
	pub runtime_visible: bool,
}

impl AnnotationEntry {
	pub fn new(type_index: u16, element_value_pairs: Vec<ElementValuePair>, runtime_visible: bool) -> AnnotationEntry {
		AnnotationEntry { type_index, element_value_pairs, runtime_visible }
	}

	/// Reads an annotation, checking all the indices against the `pool`.
	///
	/// Annotations nested inside this one get the same `runtime_visible` flag.
	pub fn read(reader: &mut impl ClassRead, pool: &ConstantPool, runtime_visible: bool) -> Result<AnnotationEntry> {
		AnnotationEntry::read_nested(reader, pool, runtime_visible, 0)
	}

	pub(crate) fn read_nested(reader: &mut impl ClassRead, pool: &ConstantPool, runtime_visible: bool, depth: usize) -> Result<AnnotationEntry> {
		let type_index = reader.read_u16()?;
		pool.check(type_index, ConstantTag::Utf8)?;

		let element_value_pairs = reader.read_vec(
			|r| r.read_u16_as_usize(),
			|r| ElementValuePair::read_nested(r, pool, runtime_visible, depth)
		)?;

		Ok(AnnotationEntry { type_index, element_value_pairs, runtime_visible })
	}

	/// Writes the annotation. The number of pairs is taken from [`AnnotationEntry::element_value_pairs`].
	pub fn write(&self, writer: &mut impl ClassWrite) -> Result<()> {
		writer.write_u16(self.type_index)?;
		writer.write_slice(&self.element_value_pairs,
			|w, size| w.write_usize_as_u16(size, "element value pairs"),
			|w, pair| pair.write(w)
		)
	}

	/// The number of bytes [`AnnotationEntry::write`] writes.
	pub fn length(&self) -> usize {
		2 + 2 + self.element_value_pairs.iter().map(ElementValuePair::length).sum::<usize>()
	}

	pub fn to_bytes(&self) -> Result<Vec<u8>> {
		let mut vec = Vec::with_capacity(self.length());
		self.write(&mut vec)?;
		Ok(vec)
	}

	pub fn is_runtime_visible(&self) -> bool {
		self.runtime_visible
	}

	/// Gets the field descriptor of the annotation interface, like `Ljava/lang/Deprecated;`.
	pub fn annotation_type<'p>(&self, pool: &'p ConstantPool) -> Result<&'p JavaStr> {
		pool.get_utf8(self.type_index)
	}

	/// Renders the annotation as `@Ltype;(name=value, name=value)`. The parentheses are left out if there are no pairs.
	pub fn to_short_string(&self, pool: &ConstantPool) -> Result<String> {
		let mut s = format!("@{}", self.annotation_type(pool)?.as_str_lossy());

		if !self.element_value_pairs.is_empty() {
			let pairs = self.element_value_pairs.iter()
				.map(|pair| pair.to_short_string(pool))
				.collect::<Result<Vec<_>>>()?;
			s.push('(');
			s.push_str(&pairs.join(", "));
			s.push(')');
		}

		Ok(s)
	}
}

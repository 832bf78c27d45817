use java_string::JavaStr;
use log::{debug, trace};
use crate::annotation::AnnotationEntry;
use crate::class_constants::attribute;
use crate::element_value::ElementValue;
use crate::error::{illegal_argument, FormatError, Result};
use crate::pool::ConstantPool;
use crate::{ClassRead, ClassWrite};

/// Reads exactly `length` bytes and lets `f` parse them. `f` must consume all of them.
fn read_bounded<T>(reader: &mut impl ClassRead, length: u32, f: impl FnOnce(&mut &[u8]) -> Result<T>) -> Result<T> {
	let body = reader.read_u8_vec(length as usize)?;
	let mut slice = body.as_slice();

	let value = f(&mut slice)?;

	if !slice.is_empty() {
		let consumed = (body.len() - slice.len()) as u64;
		return Err(FormatError::LengthMismatch { declared: length, consumed }.into());
	}
	Ok(value)
}

fn read_entries(reader: &mut impl ClassRead, pool: &ConstantPool, runtime_visible: bool) -> Result<Vec<AnnotationEntry>> {
	reader.read_vec(
		|r| r.read_u16_as_usize(),
		|r| AnnotationEntry::read(r, pool, runtime_visible)
	)
}

fn write_entries(writer: &mut impl ClassWrite, entries: &[AnnotationEntry]) -> Result<()> {
	writer.write_slice(entries,
		|w, size| w.write_usize_as_u16(size, "annotations"),
		|w, entry| entry.write(w)
	)
}

fn entries_length(entries: &[AnnotationEntry]) -> usize {
	2 + entries.iter().map(AnnotationEntry::length).sum::<usize>()
}

/// The contents of a `RuntimeVisibleAnnotations` or `RuntimeInvisibleAnnotations` attribute.
///
/// The `attribute_name_index` and `attribute_length` are not part of this, see [`Attribute`] for that.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotations {
	pub runtime_visible: bool,
	pub entries: Vec<AnnotationEntry>,
}

impl Annotations {
	pub fn new(runtime_visible: bool, entries: Vec<AnnotationEntry>) -> Annotations {
		Annotations { runtime_visible, entries }
	}

	/// Reads the attribute contents, which must be exactly `length` bytes long.
	///
	/// The `num_annotations` decides how many annotations are read. If the data ends before that, this fails with
	/// [`FormatError::Truncated`]. If there's data left after that, this fails with [`FormatError::LengthMismatch`].
	pub fn read_body(reader: &mut impl ClassRead, length: u32, runtime_visible: bool, pool: &ConstantPool) -> Result<Annotations> {
		read_bounded(reader, length, |r| {
			let entries = read_entries(r, pool, runtime_visible)?;
			Ok(Annotations { runtime_visible, entries })
		})
	}

	/// Writes the attribute contents, that is [`Annotations::length`] bytes. The number of annotations is taken from
	/// [`Annotations::entries`].
	pub fn write_body(&self, writer: &mut impl ClassWrite) -> Result<()> {
		write_entries(writer, &self.entries)
	}

	/// The number of bytes [`Annotations::write_body`] writes.
	pub fn length(&self) -> usize {
		entries_length(&self.entries)
	}

	/// The name of the attribute, depending on [`Annotations::runtime_visible`].
	pub fn attribute_name(&self) -> &'static str {
		if self.runtime_visible {
			attribute::RUNTIME_VISIBLE_ANNOTATIONS
		} else {
			attribute::RUNTIME_INVISIBLE_ANNOTATIONS
		}
	}
}

/// The contents of a `RuntimeVisibleParameterAnnotations` or `RuntimeInvisibleParameterAnnotations` attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterAnnotations {
	pub runtime_visible: bool,
	/// The annotations for each parameter, in the order of the parameters.
	pub parameters: Vec<Vec<AnnotationEntry>>,
}

impl ParameterAnnotations {
	pub fn new(runtime_visible: bool, parameters: Vec<Vec<AnnotationEntry>>) -> ParameterAnnotations {
		ParameterAnnotations { runtime_visible, parameters }
	}

	/// Reads the attribute contents, which must be exactly `length` bytes long. See [`Annotations::read_body`].
	pub fn read_body(reader: &mut impl ClassRead, length: u32, runtime_visible: bool, pool: &ConstantPool) -> Result<ParameterAnnotations> {
		read_bounded(reader, length, |r| {
			let parameters = r.read_vec(
				|r| r.read_u8_as_usize(),
				|r| read_entries(r, pool, runtime_visible)
			)?;
			Ok(ParameterAnnotations { runtime_visible, parameters })
		})
	}

	pub fn write_body(&self, writer: &mut impl ClassWrite) -> Result<()> {
		writer.write_slice(&self.parameters,
			|w, size| w.write_usize_as_u8(size, "parameter annotations"),
			|w, entries| write_entries(w, entries)
		)
	}

	pub fn length(&self) -> usize {
		1 + self.parameters.iter().map(|entries| entries_length(entries)).sum::<usize>()
	}

	pub fn attribute_name(&self) -> &'static str {
		if self.runtime_visible {
			attribute::RUNTIME_VISIBLE_PARAMETER_ANNOTATIONS
		} else {
			attribute::RUNTIME_INVISIBLE_PARAMETER_ANNOTATIONS
		}
	}
}

/// The contents of an `AnnotationDefault` attribute: the default value of an element of an annotation interface.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationDefault {
	pub default_value: ElementValue,
}

impl AnnotationDefault {
	pub fn read_body(reader: &mut impl ClassRead, length: u32, pool: &ConstantPool) -> Result<AnnotationDefault> {
		read_bounded(reader, length, |r| {
			let default_value = ElementValue::read(r, pool)?;
			Ok(AnnotationDefault { default_value })
		})
	}

	pub fn write_body(&self, writer: &mut impl ClassWrite) -> Result<()> {
		self.default_value.write(writer)
	}

	pub fn length(&self) -> usize {
		self.default_value.length()
	}
}

/// An attribute of a class, field or method.
///
/// The annotation attributes are decoded, all others are kept as their raw bytes.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
	Annotations {
		name_index: u16,
		annotations: Annotations,
	},
	ParameterAnnotations {
		name_index: u16,
		annotations: ParameterAnnotations,
	},
	AnnotationDefault {
		name_index: u16,
		default: AnnotationDefault,
	},
	Unknown {
		name_index: u16,
		bytes: Vec<u8>,
	},
}

impl Attribute {
	/// Reads the `attribute_name_index`, the `attribute_length` and then the contents of the attribute.
	pub fn read(reader: &mut impl ClassRead, pool: &ConstantPool) -> Result<Attribute> {
		let name_index = reader.read_u16()?;
		let length = reader.read_u32()?;
		let name = pool.get_utf8(name_index)?.as_str_lossy();

		trace!("reading attribute {name:?} of length {length}");

		Ok(match &*name {
			attribute::RUNTIME_VISIBLE_ANNOTATIONS => Attribute::Annotations {
				name_index,
				annotations: Annotations::read_body(reader, length, true, pool)?,
			},
			attribute::RUNTIME_INVISIBLE_ANNOTATIONS => Attribute::Annotations {
				name_index,
				annotations: Annotations::read_body(reader, length, false, pool)?,
			},
			attribute::RUNTIME_VISIBLE_PARAMETER_ANNOTATIONS => Attribute::ParameterAnnotations {
				name_index,
				annotations: ParameterAnnotations::read_body(reader, length, true, pool)?,
			},
			attribute::RUNTIME_INVISIBLE_PARAMETER_ANNOTATIONS => Attribute::ParameterAnnotations {
				name_index,
				annotations: ParameterAnnotations::read_body(reader, length, false, pool)?,
			},
			attribute::ANNOTATION_DEFAULT => Attribute::AnnotationDefault {
				name_index,
				default: AnnotationDefault::read_body(reader, length, pool)?,
			},
			_ => {
				debug!("keeping attribute {name:?} as raw bytes");
				Attribute::Unknown {
					name_index,
					bytes: reader.read_u8_vec(length as usize)?,
				}
			},
		})
	}

	pub fn name_index(&self) -> u16 {
		match *self {
			Attribute::Annotations { name_index, .. } |
			Attribute::ParameterAnnotations { name_index, .. } |
			Attribute::AnnotationDefault { name_index, .. } |
			Attribute::Unknown { name_index, .. } => name_index,
		}
	}

	/// The `attribute_length`, so the length without the six bytes of name index and length.
	pub fn body_length(&self) -> usize {
		match self {
			Attribute::Annotations { annotations, .. } => annotations.length(),
			Attribute::ParameterAnnotations { annotations, .. } => annotations.length(),
			Attribute::AnnotationDefault { default, .. } => default.length(),
			Attribute::Unknown { bytes, .. } => bytes.len(),
		}
	}

	/// The number of bytes [`Attribute::write`] writes.
	pub fn length(&self) -> usize {
		2 + 4 + self.body_length()
	}

	/// The attribute name this kind of attribute must have. [`Attribute::Unknown`] can have any name.
	pub fn expected_name(&self) -> Option<&'static str> {
		match self {
			Attribute::Annotations { annotations, .. } => Some(annotations.attribute_name()),
			Attribute::ParameterAnnotations { annotations, .. } => Some(annotations.attribute_name()),
			Attribute::AnnotationDefault { .. } => Some(attribute::ANNOTATION_DEFAULT),
			Attribute::Unknown { .. } => None,
		}
	}

	/// Checks that the `name_index` names this kind of attribute, with the same runtime visibility.
	///
	/// Changing [`Annotations::runtime_visible`] after reading doesn't change the `name_index`, which this catches.
	pub fn check_name(&self, pool: &ConstantPool) -> Result<()> {
		if let Some(expected) = self.expected_name() {
			let name = pool.get_utf8(self.name_index())?;
			if name != JavaStr::from_str(expected) {
				illegal_argument!("attribute name index {} points to {:?}, but the attribute is a {expected}",
					self.name_index(), name.as_str_lossy());
			}
		}
		Ok(())
	}

	/// Writes the `attribute_name_index`, the `attribute_length` computed from the contents, and then the contents.
	///
	/// The `name_index` is written as is, use [`Attribute::check_name`] to see if it fits the contents.
	pub fn write(&self, writer: &mut impl ClassWrite) -> Result<()> {
		writer.write_u16(self.name_index())?;
		writer.write_usize_as_u32(self.body_length(), "attribute contents")?;
		match self {
			Attribute::Annotations { annotations, .. } => annotations.write_body(writer),
			Attribute::ParameterAnnotations { annotations, .. } => annotations.write_body(writer),
			Attribute::AnnotationDefault { default, .. } => default.write_body(writer),
			Attribute::Unknown { bytes, .. } => writer.write_u8_slice(bytes),
		}
	}

	/// Returns all annotations of this attribute. For parameter annotations, these are the ones of all parameters.
	pub fn annotations(&self) -> Vec<&AnnotationEntry> {
		match self {
			Attribute::Annotations { annotations, .. } => annotations.entries.iter().collect(),
			Attribute::ParameterAnnotations { annotations, .. } => annotations.parameters.iter().flatten().collect(),
			_ => Vec::new(),
		}
	}
}

#[cfg(test)]
mod testing {
	use anyhow::Result;
	use pretty_assertions::assert_eq;
	use crate::annotation::{AnnotationEntry, ElementValuePair};
	use crate::attribute::{AnnotationDefault, Annotations, Attribute, ParameterAnnotations};
	use crate::element_value::ElementValue;
	use crate::error::{Error, FormatError};
	use crate::pool::{ConstantPool, PoolBuilder};

	struct Pool {
		pool: ConstantPool,
		visible: u16,
		invisible: u16,
		parameters: u16,
		default: u16,
		code: u16,
		marker: u16,
		value: u16,
	}

	fn pool() -> Result<Pool> {
		let mut builder = PoolBuilder::new();
		let visible = builder.put_utf8("RuntimeVisibleAnnotations")?;
		let invisible = builder.put_utf8("RuntimeInvisibleAnnotations")?;
		let parameters = builder.put_utf8("RuntimeVisibleParameterAnnotations")?;
		let default = builder.put_utf8("AnnotationDefault")?;
		let code = builder.put_utf8("Code")?;
		let marker = builder.put_utf8("Lorg/example/Marker;")?;
		let value = builder.put_utf8("value")?;
		Ok(Pool { pool: builder.build(), visible, invisible, parameters, default, code, marker, value })
	}

	#[test]
	fn annotations_body() -> Result<()> {
		let p = pool()?;
		let m = p.marker as u8;
		let v = p.value as u8;
		let bytes = [0, 2, 0, m, 0, 0, 0, m, 0, 1, 0, v, b's', 0, v];

		let annotations = Annotations::read_body(&mut bytes.as_slice(), bytes.len() as u32, false, &p.pool)?;
		assert_eq!(annotations, Annotations::new(false, vec![
			AnnotationEntry::new(p.marker, vec![], false),
			AnnotationEntry::new(p.marker, vec![ElementValuePair::new(p.value, ElementValue::constant(b's', p.value)?)], false),
		]));
		assert_eq!(annotations.attribute_name(), "RuntimeInvisibleAnnotations");
		assert_eq!(annotations.length(), bytes.len());

		let mut vec = Vec::new();
		annotations.write_body(&mut vec)?;
		assert_eq!(vec, bytes);
		Ok(())
	}

	#[test]
	fn fewer_annotations_than_declared() -> Result<()> {
		let p = pool()?;
		let m = p.marker as u8;
		// declares two annotations, but the declared length only covers one
		let bytes = [0, 2, 0, m, 0, 0, /* outside of the attribute: */ 0, m, 0, 0];

		let result = Annotations::read_body(&mut bytes.as_slice(), 6, true, &p.pool);
		assert!(matches!(result, Err(Error::Format(FormatError::Truncated))));
		Ok(())
	}

	#[test]
	fn declared_length_too_large() -> Result<()> {
		let p = pool()?;
		let m = p.marker as u8;
		let bytes = [0, 1, 0, m, 0, 0];

		let result = Annotations::read_body(&mut bytes.as_slice(), 10, true, &p.pool);
		assert!(matches!(result, Err(Error::Format(FormatError::Truncated))));
		Ok(())
	}

	#[test]
	fn bytes_left_over() -> Result<()> {
		let p = pool()?;
		let m = p.marker as u8;
		let bytes = [0, 1, 0, m, 0, 0, 0xca, 0xfe];

		let result = Annotations::read_body(&mut bytes.as_slice(), 8, true, &p.pool);
		assert!(matches!(result, Err(Error::Format(FormatError::LengthMismatch { declared: 8, consumed: 6 }))));
		Ok(())
	}

	#[test]
	fn parameter_annotations_body() -> Result<()> {
		let p = pool()?;
		let m = p.marker as u8;
		let bytes = [2, 0, 0, 0, 1, 0, m, 0, 0];

		let annotations = ParameterAnnotations::read_body(&mut bytes.as_slice(), bytes.len() as u32, true, &p.pool)?;
		assert_eq!(annotations, ParameterAnnotations::new(true, vec![
			vec![],
			vec![AnnotationEntry::new(p.marker, vec![], true)],
		]));
		assert_eq!(annotations.length(), bytes.len());
		Ok(())
	}

	#[test]
	fn attribute_dispatch_and_round_trip() -> Result<()> {
		let p = pool()?;
		let (vi, ii, pi, di, ci) = (p.visible as u8, p.invisible as u8, p.parameters as u8, p.default as u8, p.code as u8);
		let (m, v) = (p.marker as u8, p.value as u8);

		let inputs: [&[u8]; 5] = [
			&[0, vi, 0, 0, 0, 6, 0, 1, 0, m, 0, 0],
			&[0, ii, 0, 0, 0, 2, 0, 0],
			&[0, pi, 0, 0, 0, 1, 0],
			&[0, di, 0, 0, 0, 3, b's', 0, v],
			&[0, ci, 0, 0, 0, 3, 1, 2, 3],
		];

		let mut attributes = Vec::new();
		for input in inputs {
			let attribute = Attribute::read(&mut &input[..], &p.pool)?;
			assert_eq!(attribute.length(), input.len());

			let mut vec = Vec::new();
			attribute.write(&mut vec)?;
			assert_eq!(vec, input);

			attributes.push(attribute);
		}

		assert!(matches!(&attributes[0], Attribute::Annotations { annotations, .. } if annotations.runtime_visible));
		assert!(matches!(&attributes[1], Attribute::Annotations { annotations, .. } if !annotations.runtime_visible));
		assert!(matches!(&attributes[2], Attribute::ParameterAnnotations { annotations, .. } if annotations.parameters.is_empty()));
		assert_eq!(attributes[3], Attribute::AnnotationDefault {
			name_index: p.default,
			default: AnnotationDefault { default_value: ElementValue::constant(b's', p.value)? },
		});
		assert_eq!(attributes[4], Attribute::Unknown { name_index: p.code, bytes: vec![1, 2, 3] });

		assert_eq!(attributes[0].annotations().len(), 1);
		assert_eq!(attributes[4].annotations().len(), 0);
		Ok(())
	}

	#[test]
	fn name_must_match_visibility() -> Result<()> {
		let p = pool()?;
		let mut attribute = Attribute::Annotations { name_index: p.visible, annotations: Annotations::new(true, vec![]) };
		attribute.check_name(&p.pool)?;

		if let Attribute::Annotations { annotations, .. } = &mut attribute {
			annotations.runtime_visible = false;
		}
		assert!(matches!(attribute.check_name(&p.pool), Err(Error::IllegalArgument(_))));

		let attribute = Attribute::AnnotationDefault {
			name_index: p.invisible,
			default: AnnotationDefault { default_value: ElementValue::constant(b's', p.value)? },
		};
		assert!(matches!(attribute.check_name(&p.pool), Err(Error::IllegalArgument(_))));

		let attribute = Attribute::Unknown { name_index: p.visible, bytes: vec![] };
		attribute.check_name(&p.pool)?;
		Ok(())
	}

	#[test]
	fn attribute_name_must_be_utf8() -> Result<()> {
		let p = pool()?;
		let result = Attribute::read(&mut [0u8; 6].as_slice(), &p.pool);
		assert!(matches!(result, Err(Error::Format(FormatError::InvalidIndex { index: 0, .. }))));
		Ok(())
	}
}

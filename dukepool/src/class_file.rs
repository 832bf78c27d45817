use log::debug;
use crate::annotation::AnnotationEntry;
use crate::attribute::Attribute;
use crate::class_constants::MAGIC;
use crate::element_value::ElementValue;
use crate::error::{FormatError, Result};
use crate::pool::{ConstantPool, ConstantTag};
use crate::{ClassRead, ClassWrite};

/// A field or a method.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
	pub access_flags: u16,
	pub name_index: u16,
	pub descriptor_index: u16,
	pub attributes: Vec<Attribute>,
}

impl Member {
	fn read(reader: &mut impl ClassRead, pool: &ConstantPool) -> Result<Member> {
		let access_flags = reader.read_u16()?;
		let name_index = reader.read_u16()?;
		pool.check(name_index, ConstantTag::Utf8)?;
		let descriptor_index = reader.read_u16()?;
		pool.check(descriptor_index, ConstantTag::Utf8)?;
		let attributes = read_attributes(reader, pool)?;
		Ok(Member { access_flags, name_index, descriptor_index, attributes })
	}

	fn write(&self, writer: &mut impl ClassWrite) -> Result<()> {
		writer.write_u16(self.access_flags)?;
		writer.write_u16(self.name_index)?;
		writer.write_u16(self.descriptor_index)?;
		write_attributes(writer, &self.attributes)
	}

	fn length(&self) -> usize {
		2 + 2 + 2 + attributes_length(&self.attributes)
	}

	/// Renders as `name descriptor`.
	fn describe(&self, pool: &ConstantPool) -> Result<String> {
		Ok(format!("{} {}",
			pool.get_utf8(self.name_index)?.as_str_lossy(),
			pool.get_utf8(self.descriptor_index)?.as_str_lossy()
		))
	}
}

fn read_attributes(reader: &mut impl ClassRead, pool: &ConstantPool) -> Result<Vec<Attribute>> {
	reader.read_vec(
		|r| r.read_u16_as_usize(),
		|r| Attribute::read(r, pool)
	)
}

fn write_attributes(writer: &mut impl ClassWrite, attributes: &[Attribute]) -> Result<()> {
	writer.write_slice(attributes,
		|w, size| w.write_usize_as_u16(size, "attributes"),
		|w, attribute| attribute.write(w)
	)
}

fn attributes_length(attributes: &[Attribute]) -> usize {
	2 + attributes.iter().map(Attribute::length).sum::<usize>()
}

fn read_members(reader: &mut impl ClassRead, pool: &ConstantPool) -> Result<Vec<Member>> {
	reader.read_vec(
		|r| r.read_u16_as_usize(),
		|r| Member::read(r, pool)
	)
}

fn write_members(writer: &mut impl ClassWrite, members: &[Member], what: &'static str) -> Result<()> {
	writer.write_slice(members,
		|w, size| w.write_usize_as_u16(size, what),
		|w, member| member.write(w)
	)
}

/// A whole class file. Only the annotation attributes are decoded, everything else (including the `Code` attribute) is kept
/// as raw bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassFile {
	pub minor_version: u16,
	pub major_version: u16,
	pub pool: ConstantPool,
	pub access_flags: u16,
	/// Index of a `CONSTANT_Class`.
	pub this_class: u16,
	/// Index of a `CONSTANT_Class`, or `0` for `java/lang/Object`.
	pub super_class: u16,
	pub interfaces: Vec<u16>,
	pub fields: Vec<Member>,
	pub methods: Vec<Member>,
	pub attributes: Vec<Attribute>,
}

impl ClassFile {
	pub fn read(reader: &mut impl ClassRead) -> Result<ClassFile> {
		let magic = reader.read_u32()?;
		if magic != MAGIC {
			return Err(FormatError::BadMagic(magic).into());
		}

		let minor_version = reader.read_u16()?;
		let major_version = reader.read_u16()?;
		debug!("reading class file of version {major_version}.{minor_version}");

		let pool = ConstantPool::read(reader)?;

		let access_flags = reader.read_u16()?;
		let this_class = reader.read_u16()?;
		pool.check(this_class, ConstantTag::Class)?;
		let super_class = reader.read_u16()?;
		if super_class != 0 {
			pool.check(super_class, ConstantTag::Class)?;
		}

		let interfaces = reader.read_vec(
			|r| r.read_u16_as_usize(),
			|r| {
				let index = r.read_u16()?;
				pool.check(index, ConstantTag::Class)?;
				Ok(index)
			}
		)?;

		let fields = read_members(reader, &pool)?;
		let methods = read_members(reader, &pool)?;
		let attributes = read_attributes(reader, &pool)?;

		Ok(ClassFile {
			minor_version,
			major_version,
			pool,
			access_flags,
			this_class,
			super_class,
			interfaces,
			fields,
			methods,
			attributes,
		})
	}

	/// Writes the class file. Before writing anything, the attribute names are checked with [`Attribute::check_name`].
	pub fn write(&self, writer: &mut impl ClassWrite) -> Result<()> {
		let members = self.fields.iter().chain(&self.methods);
		for attribute in members.flat_map(|member| &member.attributes).chain(&self.attributes) {
			attribute.check_name(&self.pool)?;
		}

		writer.write_u32(MAGIC)?;
		writer.write_u16(self.minor_version)?;
		writer.write_u16(self.major_version)?;
		self.pool.write(writer)?;
		writer.write_u16(self.access_flags)?;
		writer.write_u16(self.this_class)?;
		writer.write_u16(self.super_class)?;
		writer.write_slice(&self.interfaces,
			|w, size| w.write_usize_as_u16(size, "interfaces"),
			|w, &index| w.write_u16(index)
		)?;
		write_members(writer, &self.fields, "fields")?;
		write_members(writer, &self.methods, "methods")?;
		write_attributes(writer, &self.attributes)
	}

	/// The length of everything after the constant pool.
	fn length_after_pool(&self) -> usize {
		2 + 2 + 2
			+ 2 + 2 * self.interfaces.len()
			+ 2 + self.fields.iter().map(Member::length).sum::<usize>()
			+ 2 + self.methods.iter().map(Member::length).sum::<usize>()
			+ attributes_length(&self.attributes)
	}

	pub fn to_bytes(&self) -> Result<Vec<u8>> {
		let mut vec = Vec::with_capacity(4 + 2 + 2 + self.length_after_pool());
		self.write(&mut vec)?;
		Ok(vec)
	}

	/// Gets the name of this class, like `org/example/Foo`.
	pub fn name(&self) -> Result<String> {
		Ok(self.pool.get_class_name(self.this_class)?.as_str_lossy().into_owned())
	}

	/// Returns all annotations in this class file, each with a description of where it was found.
	///
	/// The locations look like `class org/example/Foo`, `field count I`, `method run ()V` and
	/// `method run (I)V parameter 0`.
	pub fn annotations(&self) -> Result<Vec<(String, &AnnotationEntry)>> {
		let mut result = Vec::new();

		let class = format!("class {}", self.name()?);
		collect_annotations(&mut result, &class, &self.attributes);

		for field in &self.fields {
			let location = format!("field {}", field.describe(&self.pool)?);
			collect_annotations(&mut result, &location, &field.attributes);
		}
		for method in &self.methods {
			let location = format!("method {}", method.describe(&self.pool)?);
			collect_annotations(&mut result, &location, &method.attributes);
		}

		Ok(result)
	}

	/// Returns the default values of the elements of an annotation interface, as `(method name, default value)`.
	pub fn annotation_defaults(&self) -> Result<Vec<(String, &ElementValue)>> {
		let mut result = Vec::new();
		for method in &self.methods {
			for attribute in &method.attributes {
				if let Attribute::AnnotationDefault { default, .. } = attribute {
					let name = self.pool.get_utf8(method.name_index)?.as_str_lossy().into_owned();
					result.push((name, &default.default_value));
				}
			}
		}
		Ok(result)
	}
}

fn collect_annotations<'a>(result: &mut Vec<(String, &'a AnnotationEntry)>, location: &str, attributes: &'a [Attribute]) {
	for attribute in attributes {
		match attribute {
			Attribute::Annotations { annotations, .. } => {
				for entry in &annotations.entries {
					result.push((location.to_owned(), entry));
				}
			},
			Attribute::ParameterAnnotations { annotations, .. } => {
				for (parameter, entries) in annotations.parameters.iter().enumerate() {
					for entry in entries {
						result.push((format!("{location} parameter {parameter}"), entry));
					}
				}
			},
			_ => {},
		}
	}
}

#[cfg(test)]
mod testing {
	use anyhow::Result;
	use pretty_assertions::assert_eq;
	use crate::annotation::{AnnotationEntry, ElementValuePair};
	use crate::attribute::{AnnotationDefault, Annotations, Attribute, ParameterAnnotations};
	use crate::class_file::{ClassFile, Member};
	use crate::element_value::ElementValue;
	use crate::error::{Error, FormatError};
	use crate::pool::PoolBuilder;

	fn class() -> Result<ClassFile> {
		let mut builder = PoolBuilder::new();
		let this_class = builder.put_class("org/example/Foo")?;
		let super_class = builder.put_class("java/lang/Object")?;
		let visible = builder.put_utf8("RuntimeVisibleAnnotations")?;
		let parameters = builder.put_utf8("RuntimeInvisibleParameterAnnotations")?;
		let default = builder.put_utf8("AnnotationDefault")?;
		let code = builder.put_utf8("Code")?;
		let marker = builder.put_utf8("Lorg/example/Marker;")?;
		let count = builder.put_utf8("count")?;
		let int = builder.put_utf8("I")?;
		let run = builder.put_utf8("run")?;
		let run_descriptor = builder.put_utf8("(I)V")?;
		let seven = builder.put_integer(7)?;

		let marked = |runtime_visible| AnnotationEntry::new(marker, vec![], runtime_visible);

		Ok(ClassFile {
			minor_version: 0,
			major_version: 52,
			pool: builder.build(),
			access_flags: 0x0021,
			this_class,
			super_class,
			interfaces: vec![],
			fields: vec![
				Member {
					access_flags: 0x0002,
					name_index: count,
					descriptor_index: int,
					attributes: vec![
						Attribute::Annotations { name_index: visible, annotations: Annotations::new(true, vec![
							AnnotationEntry::new(marker, vec![ElementValuePair::new(count, ElementValue::constant(b'I', seven)?)], true),
						]) },
					],
				},
			],
			methods: vec![
				Member {
					access_flags: 0x0001,
					name_index: run,
					descriptor_index: run_descriptor,
					attributes: vec![
						Attribute::Unknown { name_index: code, bytes: vec![0, 1, 0, 1, 0, 0, 0, 1, 0xb1, 0, 0, 0, 0] },
						Attribute::ParameterAnnotations { name_index: parameters, annotations: ParameterAnnotations::new(false, vec![
							vec![marked(false)],
						]) },
						Attribute::AnnotationDefault { name_index: default, default: AnnotationDefault {
							default_value: ElementValue::constant(b'I', seven)?,
						} },
					],
				},
			],
			attributes: vec![
				Attribute::Annotations { name_index: visible, annotations: Annotations::new(true, vec![marked(true)]) },
			],
		})
	}

	#[test]
	fn round_trip() -> Result<()> {
		let class = class()?;
		let bytes = class.to_bytes()?;
		assert_eq!(&bytes[0..8], [0xca, 0xfe, 0xba, 0xbe, 0, 0, 0, 52]);

		let read = ClassFile::read(&mut bytes.as_slice())?;
		assert_eq!(read, class);
		assert_eq!(read.to_bytes()?, bytes);
		Ok(())
	}

	#[test]
	fn annotations_with_locations() -> Result<()> {
		let class = class()?;
		let annotations = class.annotations()?.into_iter()
			.map(|(location, entry)| Ok(format!("{location}: {}", entry.to_short_string(&class.pool)?)))
			.collect::<Result<Vec<_>>>()?;

		assert_eq!(annotations, [
			"class org/example/Foo: @Lorg/example/Marker;",
			"field count I: @Lorg/example/Marker;(count=7)",
			"method run (I)V parameter 0: @Lorg/example/Marker;",
		]);

		let defaults = class.annotation_defaults()?;
		assert_eq!(defaults.len(), 1);
		assert_eq!(defaults[0].0, "run");
		assert_eq!(defaults[0].1.to_short_string(&class.pool)?, "7");
		Ok(())
	}

	#[test]
	fn write_checks_attribute_names() -> Result<()> {
		let mut class = class()?;
		let Some(Attribute::ParameterAnnotations { annotations, .. }) = class.methods[0].attributes.get_mut(1) else {
			panic!("expected parameter annotations as second method attribute");
		};
		annotations.runtime_visible = true;

		let mut vec = Vec::new();
		assert!(matches!(class.write(&mut vec), Err(Error::IllegalArgument(_))));
		assert!(vec.is_empty());
		Ok(())
	}

	#[test]
	fn bad_magic() {
		let result = ClassFile::read(&mut [0xcau8, 0xfe, 0xd0, 0x0d, 0, 0, 0, 52].as_slice());
		assert!(matches!(result, Err(Error::Format(FormatError::BadMagic(0xcafed00d)))));
	}

	#[test]
	fn truncated() -> Result<()> {
		let bytes = class()?.to_bytes()?;
		let result = ClassFile::read(&mut &bytes[..bytes.len() - 1]);
		assert!(matches!(result, Err(Error::Format(FormatError::Truncated))));
		Ok(())
	}
}

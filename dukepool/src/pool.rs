use std::collections::HashMap;
use std::fmt::{Display, Formatter, LowerExp};
use java_string::{JavaStr, JavaString};
use log::trace;
use crate::class_constants::pool;
use crate::error::{FormatError, Result};
use crate::{ClassRead, ClassWrite, jstring};

/// The `tag` item of a constant pool entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstantTag {
	Utf8,
	Integer,
	Float,
	Long,
	Double,
	Class,
	String,
	FieldRef,
	MethodRef,
	InterfaceMethodRef,
	NameAndType,
	MethodHandle,
	MethodType,
	Dynamic,
	InvokeDynamic,
	Module,
	Package,
}

impl ConstantTag {
	pub fn value(self) -> u8 {
		match self {
			ConstantTag::Utf8 => pool::UTF8,
			ConstantTag::Integer => pool::INTEGER,
			ConstantTag::Float => pool::FLOAT,
			ConstantTag::Long => pool::LONG,
			ConstantTag::Double => pool::DOUBLE,
			ConstantTag::Class => pool::CLASS,
			ConstantTag::String => pool::STRING,
			ConstantTag::FieldRef => pool::FIELD_REF,
			ConstantTag::MethodRef => pool::METHOD_REF,
			ConstantTag::InterfaceMethodRef => pool::INTERFACE_METHOD_REF,
			ConstantTag::NameAndType => pool::NAME_AND_TYPE,
			ConstantTag::MethodHandle => pool::METHOD_HANDLE,
			ConstantTag::MethodType => pool::METHOD_TYPE,
			ConstantTag::Dynamic => pool::DYNAMIC,
			ConstantTag::InvokeDynamic => pool::INVOKE_DYNAMIC,
			ConstantTag::Module => pool::MODULE,
			ConstantTag::Package => pool::PACKAGE,
		}
	}

	/// The number of pool slots an entry with this tag takes up.
	pub fn slots(self) -> usize {
		match self {
			ConstantTag::Long | ConstantTag::Double => 2,
			_ => 1,
		}
	}
}

impl TryFrom<u8> for ConstantTag {
	/// The unknown tag.
	type Error = u8;

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		Ok(match value {
			pool::UTF8 => ConstantTag::Utf8,
			pool::INTEGER => ConstantTag::Integer,
			pool::FLOAT => ConstantTag::Float,
			pool::LONG => ConstantTag::Long,
			pool::DOUBLE => ConstantTag::Double,
			pool::CLASS => ConstantTag::Class,
			pool::STRING => ConstantTag::String,
			pool::FIELD_REF => ConstantTag::FieldRef,
			pool::METHOD_REF => ConstantTag::MethodRef,
			pool::INTERFACE_METHOD_REF => ConstantTag::InterfaceMethodRef,
			pool::NAME_AND_TYPE => ConstantTag::NameAndType,
			pool::METHOD_HANDLE => ConstantTag::MethodHandle,
			pool::METHOD_TYPE => ConstantTag::MethodType,
			pool::DYNAMIC => ConstantTag::Dynamic,
			pool::INVOKE_DYNAMIC => ConstantTag::InvokeDynamic,
			pool::MODULE => ConstantTag::Module,
			pool::PACKAGE => ConstantTag::Package,
			tag => return Err(tag),
		})
	}
}

impl Display for ConstantTag {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			ConstantTag::Utf8 => "CONSTANT_Utf8",
			ConstantTag::Integer => "CONSTANT_Integer",
			ConstantTag::Float => "CONSTANT_Float",
			ConstantTag::Long => "CONSTANT_Long",
			ConstantTag::Double => "CONSTANT_Double",
			ConstantTag::Class => "CONSTANT_Class",
			ConstantTag::String => "CONSTANT_String",
			ConstantTag::FieldRef => "CONSTANT_Fieldref",
			ConstantTag::MethodRef => "CONSTANT_Methodref",
			ConstantTag::InterfaceMethodRef => "CONSTANT_InterfaceMethodref",
			ConstantTag::NameAndType => "CONSTANT_NameAndType",
			ConstantTag::MethodHandle => "CONSTANT_MethodHandle",
			ConstantTag::MethodType => "CONSTANT_MethodType",
			ConstantTag::Dynamic => "CONSTANT_Dynamic",
			ConstantTag::InvokeDynamic => "CONSTANT_InvokeDynamic",
			ConstantTag::Module => "CONSTANT_Module",
			ConstantTag::Package => "CONSTANT_Package",
		})
	}
}

/// The payload of the `CONSTANT_Fieldref`, `CONSTANT_Methodref` and `CONSTANT_InterfaceMethodref` pool entries.
///
/// The indices aren't checked when reading, as the pool may reference entries that come later. They're only checked once they're used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemberRef {
	/// Index of a `CONSTANT_Class` entry.
	pub class_index: u16,
	/// Index of a `CONSTANT_NameAndType` entry.
	pub name_and_type_index: u16,
}

impl MemberRef {
	/// Reads the two indices following the tag byte.
	pub fn read(reader: &mut impl ClassRead) -> Result<MemberRef> {
		let class_index = reader.read_u16()?;
		let name_and_type_index = reader.read_u16()?;
		Ok(MemberRef { class_index, name_and_type_index })
	}

	/// Writes the two indices, without the tag byte.
	pub fn write(&self, writer: &mut impl ClassWrite) -> Result<()> {
		writer.write_u16(self.class_index)?;
		writer.write_u16(self.name_and_type_index)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Constant {
	Utf8 { string: JavaString },
	Integer { bytes: i32 },
	/// Stored as bits, so that every `NaN` is kept as is.
	Float { bytes: u32 },
	Long { bytes: i64 },
	/// Stored as bits, so that every `NaN` is kept as is.
	Double { bytes: u64 },
	Class { name_index: u16 },
	String { string_index: u16 },
	FieldRef(MemberRef),
	MethodRef(MemberRef),
	InterfaceMethodRef(MemberRef),
	NameAndType { name_index: u16, descriptor_index: u16 },
	MethodHandle { reference_kind: u8, reference_index: u16 },
	MethodType { descriptor_index: u16 },
	Dynamic { bootstrap_method_attr_index: u16, name_and_type_index: u16 },
	InvokeDynamic { bootstrap_method_attr_index: u16, name_and_type_index: u16 },
	Module { name_index: u16 },
	Package { name_index: u16 },
}

impl Constant {
	pub fn tag(&self) -> ConstantTag {
		match self {
			Constant::Utf8 { .. } => ConstantTag::Utf8,
			Constant::Integer { .. } => ConstantTag::Integer,
			Constant::Float { .. } => ConstantTag::Float,
			Constant::Long { .. } => ConstantTag::Long,
			Constant::Double { .. } => ConstantTag::Double,
			Constant::Class { .. } => ConstantTag::Class,
			Constant::String { .. } => ConstantTag::String,
			Constant::FieldRef(_) => ConstantTag::FieldRef,
			Constant::MethodRef(_) => ConstantTag::MethodRef,
			Constant::InterfaceMethodRef(_) => ConstantTag::InterfaceMethodRef,
			Constant::NameAndType { .. } => ConstantTag::NameAndType,
			Constant::MethodHandle { .. } => ConstantTag::MethodHandle,
			Constant::MethodType { .. } => ConstantTag::MethodType,
			Constant::Dynamic { .. } => ConstantTag::Dynamic,
			Constant::InvokeDynamic { .. } => ConstantTag::InvokeDynamic,
			Constant::Module { .. } => ConstantTag::Module,
			Constant::Package { .. } => ConstantTag::Package,
		}
	}

	pub fn slots(&self) -> usize {
		self.tag().slots()
	}

	/// Reads the entry following an already read `tag`. The `index` is the pool index the entry will have, it's only used for errors.
	pub fn read(tag: ConstantTag, reader: &mut impl ClassRead, index: usize) -> Result<Constant> {
		Ok(match tag {
			ConstantTag::Utf8 => {
				let length = reader.read_u16_as_usize()?;
				let vec = reader.read_u8_vec(length)?;
				let string = jstring::from_vec_to_string(vec, index)?;
				Constant::Utf8 { string }
			},
			ConstantTag::Integer => Constant::Integer { bytes: reader.read_i32()? },
			ConstantTag::Float => Constant::Float { bytes: reader.read_u32()? },
			ConstantTag::Long => Constant::Long { bytes: reader.read_i64()? },
			ConstantTag::Double => Constant::Double { bytes: reader.read_u64()? },
			ConstantTag::Class => Constant::Class { name_index: reader.read_u16()? },
			ConstantTag::String => Constant::String { string_index: reader.read_u16()? },
			ConstantTag::FieldRef => Constant::FieldRef(MemberRef::read(reader)?),
			ConstantTag::MethodRef => Constant::MethodRef(MemberRef::read(reader)?),
			ConstantTag::InterfaceMethodRef => Constant::InterfaceMethodRef(MemberRef::read(reader)?),
			ConstantTag::NameAndType => {
				let name_index = reader.read_u16()?;
				let descriptor_index = reader.read_u16()?;
				Constant::NameAndType { name_index, descriptor_index }
			},
			ConstantTag::MethodHandle => {
				let reference_kind = reader.read_u8()?;
				let reference_index = reader.read_u16()?;
				Constant::MethodHandle { reference_kind, reference_index }
			},
			ConstantTag::MethodType => Constant::MethodType { descriptor_index: reader.read_u16()? },
			ConstantTag::Dynamic => {
				let bootstrap_method_attr_index = reader.read_u16()?;
				let name_and_type_index = reader.read_u16()?;
				Constant::Dynamic { bootstrap_method_attr_index, name_and_type_index }
			},
			ConstantTag::InvokeDynamic => {
				let bootstrap_method_attr_index = reader.read_u16()?;
				let name_and_type_index = reader.read_u16()?;
				Constant::InvokeDynamic { bootstrap_method_attr_index, name_and_type_index }
			},
			ConstantTag::Module => Constant::Module { name_index: reader.read_u16()? },
			ConstantTag::Package => Constant::Package { name_index: reader.read_u16()? },
		})
	}

	/// Writes the tag byte followed by the entry.
	pub fn write(&self, writer: &mut impl ClassWrite) -> Result<()> {
		writer.write_u8(self.tag().value())?;
		match self {
			Constant::Utf8 { string } => {
				let vec = jstring::from_string_to_vec(string);
				writer.write_usize_as_u16(vec.len(), "CONSTANT_Utf8 entry")?;
				writer.write_u8_slice(&vec)
			},
			&Constant::Integer { bytes } => writer.write_i32(bytes),
			&Constant::Float { bytes } => writer.write_u32(bytes),
			&Constant::Long { bytes } => writer.write_i64(bytes),
			&Constant::Double { bytes } => writer.write_u64(bytes),
			&Constant::Class { name_index } => writer.write_u16(name_index),
			&Constant::String { string_index } => writer.write_u16(string_index),
			Constant::FieldRef(member) | Constant::MethodRef(member) | Constant::InterfaceMethodRef(member) => member.write(writer),
			&Constant::NameAndType { name_index, descriptor_index } => {
				writer.write_u16(name_index)?;
				writer.write_u16(descriptor_index)
			},
			&Constant::MethodHandle { reference_kind, reference_index } => {
				writer.write_u8(reference_kind)?;
				writer.write_u16(reference_index)
			},
			&Constant::MethodType { descriptor_index } => writer.write_u16(descriptor_index),
			&Constant::Dynamic { bootstrap_method_attr_index, name_and_type_index } |
			&Constant::InvokeDynamic { bootstrap_method_attr_index, name_and_type_index } => {
				writer.write_u16(bootstrap_method_attr_index)?;
				writer.write_u16(name_and_type_index)
			},
			&Constant::Module { name_index } | &Constant::Package { name_index } => writer.write_u16(name_index),
		}
	}
}

/// The constant pool of a class file.
///
/// Indices start at `1`. Index `0` as well as the slot after a `CONSTANT_Long` or `CONSTANT_Double` can't be dereferenced.
///
/// The pool is not changed after it's created, so it can be shared freely between everything that stores indices into it.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantPool {
	/// We store a [`None`] for the zero index, as well as for the upper indices of [`Constant::Double`] and [`Constant::Long`].
	inner: Vec<Option<Constant>>,
}

impl ConstantPool {
	/// Reads the constant pool from the specified reader. The first thing read is an `u16` specifying the size of the constant pool.
	pub fn read(reader: &mut impl ClassRead) -> Result<ConstantPool> {
		let constant_pool_count = reader.read_u16_as_usize()?;
		if constant_pool_count == 0 {
			return Err(FormatError::EmptyPoolCount.into());
		}

		let mut inner = Vec::with_capacity(constant_pool_count);
		inner.push(None);

		while inner.len() < constant_pool_count {
			let index = inner.len();
			let tag = reader.read_u8()?;
			let tag = ConstantTag::try_from(tag)
				.map_err(|tag| FormatError::UnknownConstantTag { tag, index })?;

			let entry = Constant::read(tag, reader, index)?;
			inner.push(Some(entry));
			if tag.slots() == 2 {
				inner.push(None);
			}
		}

		// A `CONSTANT_Long` or `CONSTANT_Double` as the last entry would claim a slot past the end.
		if inner.len() > constant_pool_count {
			return Err(FormatError::InvalidIndex { index: constant_pool_count as u16, size: constant_pool_count }.into());
		}

		trace!("read constant pool with {} slots", inner.len());

		Ok(ConstantPool { inner })
	}

	/// Writes the `constant_pool_count` followed by all the entries.
	pub fn write(&self, writer: &mut impl ClassWrite) -> Result<()> {
		writer.write_usize_as_u16(self.inner.len(), "constant pool")?;
		for entry in self.inner.iter().flatten() {
			entry.write(writer)?;
		}
		Ok(())
	}

	/// The `constant_pool_count` of this pool, that is the number of slots including the zero slot.
	pub fn len(&self) -> usize {
		self.inner.len()
	}

	/// Returns `true` if there's no entry that could be dereferenced.
	pub fn is_empty(&self) -> bool {
		self.inner.iter().all(Option::is_none)
	}

	/// Iterates over all the entries together with their index. The unusable slots are skipped.
	pub fn iter(&self) -> impl Iterator<Item=(u16, &Constant)> {
		self.inner.iter()
			.enumerate()
			.filter_map(|(index, entry)| Some((index as u16, entry.as_ref()?)))
	}

	/// Gets the entry at `index`, regardless of its tag.
	pub fn entry(&self, index: u16) -> Result<&Constant> {
		match self.inner.get(index as usize) {
			Some(Some(entry)) => Ok(entry),
			Some(None) if index != 0 => Err(FormatError::UnusableIndex { index }.into()),
			_ => Err(FormatError::InvalidIndex { index, size: self.inner.len() }.into()),
		}
	}

	/// Gets the entry at `index`, failing if it isn't tagged with `expected`.
	pub fn get(&self, index: u16, expected: ConstantTag) -> Result<&Constant> {
		let entry = self.entry(index)?;
		let actual = entry.tag();
		if actual != expected {
			return Err(FormatError::TagMismatch { index, expected, actual }.into());
		}
		Ok(entry)
	}

	/// Checks that `index` points to an entry with the tag `expected`.
	pub(crate) fn check(&self, index: u16, expected: ConstantTag) -> Result<()> {
		self.get(index, expected).map(|_| ())
	}

	pub fn get_utf8(&self, index: u16) -> Result<&JavaStr> {
		match self.get(index, ConstantTag::Utf8)? {
			Constant::Utf8 { string } => Ok(string.as_java_str()),
			_ => unreachable!("tag was checked"),
		}
	}

	pub fn get_integer(&self, index: u16) -> Result<i32> {
		match *self.get(index, ConstantTag::Integer)? {
			Constant::Integer { bytes } => Ok(bytes),
			_ => unreachable!("tag was checked"),
		}
	}

	pub fn get_float(&self, index: u16) -> Result<f32> {
		match *self.get(index, ConstantTag::Float)? {
			Constant::Float { bytes } => Ok(f32::from_bits(bytes)),
			_ => unreachable!("tag was checked"),
		}
	}

	pub fn get_long(&self, index: u16) -> Result<i64> {
		match *self.get(index, ConstantTag::Long)? {
			Constant::Long { bytes } => Ok(bytes),
			_ => unreachable!("tag was checked"),
		}
	}

	pub fn get_double(&self, index: u16) -> Result<f64> {
		match *self.get(index, ConstantTag::Double)? {
			Constant::Double { bytes } => Ok(f64::from_bits(bytes)),
			_ => unreachable!("tag was checked"),
		}
	}

	/// Gets the internal name of the `CONSTANT_Class` at `index`, like `java/lang/Object`.
	pub fn get_class_name(&self, index: u16) -> Result<&JavaStr> {
		match *self.get(index, ConstantTag::Class)? {
			Constant::Class { name_index } => self.get_utf8(name_index),
			_ => unreachable!("tag was checked"),
		}
	}

	/// Gets the contents of the `CONSTANT_String` at `index`.
	pub fn get_string(&self, index: u16) -> Result<&JavaStr> {
		match *self.get(index, ConstantTag::String)? {
			Constant::String { string_index } => self.get_utf8(string_index),
			_ => unreachable!("tag was checked"),
		}
	}

	/// Gets the name and the descriptor of the `CONSTANT_NameAndType` at `index`.
	pub fn get_name_and_type(&self, index: u16) -> Result<(&JavaStr, &JavaStr)> {
		match *self.get(index, ConstantTag::NameAndType)? {
			Constant::NameAndType { name_index, descriptor_index } => Ok((self.get_utf8(name_index)?, self.get_utf8(descriptor_index)?)),
			_ => unreachable!("tag was checked"),
		}
	}

	/// Gets the [`MemberRef`] at `index`, which must be a `CONSTANT_Fieldref`, `CONSTANT_Methodref` or `CONSTANT_InterfaceMethodref`.
	pub fn get_member_ref(&self, index: u16, expected: ConstantTag) -> Result<&MemberRef> {
		if !matches!(expected, ConstantTag::FieldRef | ConstantTag::MethodRef | ConstantTag::InterfaceMethodRef) {
			crate::error::illegal_argument!("{expected} is not a member reference tag");
		}
		match self.get(index, expected)? {
			Constant::FieldRef(member) | Constant::MethodRef(member) | Constant::InterfaceMethodRef(member) => Ok(member),
			_ => unreachable!("tag was checked"),
		}
	}

	fn render_member(&self, member: &MemberRef) -> Result<String> {
		let class = class_name(self.get_class_name(member.class_index)?);
		let (name, descriptor) = self.get_name_and_type(member.name_and_type_index)?;
		Ok(format!("{class}.{} {}", name.as_str_lossy(), descriptor.as_str_lossy()))
	}

	/// Renders the entry at `index` for humans. Class names use `.` as separator, strings are quoted.
	pub fn render(&self, index: u16) -> Result<String> {
		Ok(match self.entry(index)? {
			Constant::Utf8 { string } => string.as_str_lossy().into_owned(),
			&Constant::Integer { bytes } => bytes.to_string(),
			&Constant::Float { bytes } => java_float(f32::from_bits(bytes)),
			&Constant::Long { bytes } => bytes.to_string(),
			&Constant::Double { bytes } => java_float(f64::from_bits(bytes)),
			&Constant::Class { name_index } => class_name(self.get_utf8(name_index)?),
			&Constant::String { string_index } => format!("{:?}", self.get_utf8(string_index)?.as_str_lossy()),
			Constant::FieldRef(member) | Constant::MethodRef(member) | Constant::InterfaceMethodRef(member) => {
				self.render_member(member)?
			},
			&Constant::NameAndType { name_index, descriptor_index } => {
				format!("{} {}", self.get_utf8(name_index)?.as_str_lossy(), self.get_utf8(descriptor_index)?.as_str_lossy())
			},
			&Constant::MethodHandle { reference_kind, reference_index } => {
				let member = match self.entry(reference_index)? {
					Constant::FieldRef(member) | Constant::MethodRef(member) | Constant::InterfaceMethodRef(member) => member,
					other => return Err(FormatError::TagMismatch {
						index: reference_index,
						expected: ConstantTag::MethodRef,
						actual: other.tag(),
					}.into()),
				};
				format!("{reference_kind}:{}", self.render_member(member)?)
			},
			&Constant::MethodType { descriptor_index } => self.get_utf8(descriptor_index)?.as_str_lossy().into_owned(),
			&Constant::Dynamic { bootstrap_method_attr_index, name_and_type_index } |
			&Constant::InvokeDynamic { bootstrap_method_attr_index, name_and_type_index } => {
				let (name, descriptor) = self.get_name_and_type(name_and_type_index)?;
				format!("#{bootstrap_method_attr_index}:{} {}", name.as_str_lossy(), descriptor.as_str_lossy())
			},
			&Constant::Module { name_index } | &Constant::Package { name_index } => class_name(self.get_utf8(name_index)?),
		})
	}
}

fn class_name(internal: &JavaStr) -> String {
	internal.as_str_lossy().replace('/', ".")
}

/// Renders a floating point number like Java's `Float.toString` and `Double.toString` do.
///
/// Magnitudes in `[1e-3, 1e7)` (and zero) are written as decimals, everything else as `<digits>.<digits>E<exponent>`.
/// The digits are the shortest ones that read back to the same value.
pub(crate) fn java_float<T: Copy + Into<f64> + Display + LowerExp>(value: T) -> String {
	let float: f64 = value.into();
	if float.is_nan() {
		"NaN".to_owned()
	} else if float.is_infinite() {
		if float > 0.0 { "Infinity" } else { "-Infinity" }.to_owned()
	} else if float == 0.0 || (1e-3..1e7).contains(&float.abs()) {
		let plain = value.to_string();
		if plain.contains('.') { plain } else { format!("{plain}.0") }
	} else {
		let scientific = format!("{value:e}");
		let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
		if mantissa.contains('.') {
			format!("{mantissa}E{exponent}")
		} else {
			format!("{mantissa}.0E{exponent}")
		}
	}
}

/// Builds a [`ConstantPool`] entry by entry. Equal entries are only put once.
#[derive(Debug)]
pub struct PoolBuilder {
	inner: Vec<Option<Constant>>,
	indices: HashMap<Constant, u16>,
}

impl PoolBuilder {
	pub fn new() -> PoolBuilder {
		PoolBuilder {
			inner: vec![None],
			indices: HashMap::new(),
		}
	}

	/// Puts an entry into the pool, and returns its index. If there's an equal entry already, that index is returned.
	pub fn put(&mut self, entry: Constant) -> Result<u16> {
		if let Some(&index) = self.indices.get(&entry) {
			return Ok(index);
		}

		let index = self.inner.len();
		// The last usable index is `u16::MAX - 1`, as the pool count is stored as `u16`.
		if index + entry.slots() > u16::MAX as usize {
			return Err(FormatError::TooMany { what: "constant pool", len: index + entry.slots() }.into());
		}
		let index = index as u16;

		let slots = entry.slots();
		self.indices.insert(entry.clone(), index);
		self.inner.push(Some(entry));
		if slots == 2 {
			self.inner.push(None);
		}

		Ok(index)
	}

	pub fn put_utf8(&mut self, string: impl Into<JavaString>) -> Result<u16> {
		self.put(Constant::Utf8 { string: string.into() })
	}

	pub fn put_integer(&mut self, value: i32) -> Result<u16> {
		self.put(Constant::Integer { bytes: value })
	}

	pub fn put_float(&mut self, value: f32) -> Result<u16> {
		self.put(Constant::Float { bytes: value.to_bits() })
	}

	pub fn put_long(&mut self, value: i64) -> Result<u16> {
		self.put(Constant::Long { bytes: value })
	}

	pub fn put_double(&mut self, value: f64) -> Result<u16> {
		self.put(Constant::Double { bytes: value.to_bits() })
	}

	/// Puts a `CONSTANT_Class` for the internal name `name`.
	pub fn put_class(&mut self, name: impl Into<JavaString>) -> Result<u16> {
		let name_index = self.put_utf8(name)?;
		self.put(Constant::Class { name_index })
	}

	pub fn put_string(&mut self, string: impl Into<JavaString>) -> Result<u16> {
		let string_index = self.put_utf8(string)?;
		self.put(Constant::String { string_index })
	}

	pub fn put_name_and_type(&mut self, name: impl Into<JavaString>, descriptor: impl Into<JavaString>) -> Result<u16> {
		let name_index = self.put_utf8(name)?;
		let descriptor_index = self.put_utf8(descriptor)?;
		self.put(Constant::NameAndType { name_index, descriptor_index })
	}

	fn put_member(&mut self, class: impl Into<JavaString>, name: impl Into<JavaString>, descriptor: impl Into<JavaString>) -> Result<MemberRef> {
		let class_index = self.put_class(class)?;
		let name_and_type_index = self.put_name_and_type(name, descriptor)?;
		Ok(MemberRef { class_index, name_and_type_index })
	}

	pub fn put_field_ref(&mut self, class: impl Into<JavaString>, name: impl Into<JavaString>, descriptor: impl Into<JavaString>) -> Result<u16> {
		let member = self.put_member(class, name, descriptor)?;
		self.put(Constant::FieldRef(member))
	}

	pub fn put_method_ref(&mut self, class: impl Into<JavaString>, name: impl Into<JavaString>, descriptor: impl Into<JavaString>) -> Result<u16> {
		let member = self.put_member(class, name, descriptor)?;
		self.put(Constant::MethodRef(member))
	}

	pub fn put_interface_method_ref(&mut self, class: impl Into<JavaString>, name: impl Into<JavaString>, descriptor: impl Into<JavaString>) -> Result<u16> {
		let member = self.put_member(class, name, descriptor)?;
		self.put(Constant::InterfaceMethodRef(member))
	}

	pub fn build(self) -> ConstantPool {
		ConstantPool { inner: self.inner }
	}
}

impl Default for PoolBuilder {
	fn default() -> Self {
		PoolBuilder::new()
	}
}

//! A crate for reading and writing the constant pool and the annotation attributes of
//! [Java Class Files](https://docs.oracle.com/javase/specs/jvms/se22/html/jvms-4.html).
//!
//! The constant pool is read first, as everything else only stores indices into it. All the annotation structures keep those raw
//! indices, so that writing them back out reproduces the input bytes. Resolving an index to its text is done by passing the
//! [`ConstantPool`] the structure was read with.
//!
//! ```
//! # use pretty_assertions::assert_eq;
//! use dukepool::{AnnotationEntry, ElementValue, ElementValuePair, PoolBuilder};
//!
//! let mut builder = PoolBuilder::new();
//! let type_index = builder.put_utf8("Lorg/example/Marker;")?;
//! let name_index = builder.put_utf8("value")?;
//! let hello_index = builder.put_utf8("hello")?;
//! let pool = builder.build();
//!
//! let annotation = AnnotationEntry::new(type_index, vec![
//!     ElementValuePair::new(name_index, ElementValue::constant(b's', hello_index)?),
//! ], true);
//!
//! assert_eq!(annotation.to_short_string(&pool)?, "@Lorg/example/Marker;(value=hello)");
//!
//! let bytes = annotation.to_bytes()?;
//! let read = AnnotationEntry::read(&mut bytes.as_slice(), &pool, true)?;
//! assert_eq!(read, annotation);
//! # Ok::<(), dukepool::Error>(())
//! ```

mod error;
mod jstring;
mod class_constants;
mod pool;
mod element_value;
mod annotation;
mod attribute;
mod class_file;

use std::io::{Read, Write};
pub use error::{Error, FormatError, Result};
pub use pool::{ConstantPool, Constant, ConstantTag, MemberRef, PoolBuilder};
pub use element_value::{ConstantKind, ElementValue, ElementValueTag};
pub use annotation::{AnnotationEntry, ElementValuePair};
pub use attribute::{AnnotationDefault, Annotations, Attribute, ParameterAnnotations};
pub use class_file::{ClassFile, Member};
pub use class_constants::attribute as attribute_names;

/// A sequential big-endian reader. Implemented for everything implementing [`Read`].
///
/// Running out of data is reported as [`FormatError::Truncated`].
pub trait ClassRead {
	fn read_n<const N: usize>(&mut self) -> Result<[u8; N]>;
	fn read_u8_vec(&mut self, size: usize) -> Result<Vec<u8>>;

	fn read_u8(&mut self) -> Result<u8> {
		Ok(u8::from_be_bytes(self.read_n()?))
	}
	fn read_u16(&mut self) -> Result<u16> {
		Ok(u16::from_be_bytes(self.read_n()?))
	}
	fn read_u32(&mut self) -> Result<u32> {
		Ok(u32::from_be_bytes(self.read_n()?))
	}
	fn read_u64(&mut self) -> Result<u64> {
		Ok(u64::from_be_bytes(self.read_n()?))
	}
	fn read_i32(&mut self) -> Result<i32> {
		Ok(i32::from_be_bytes(self.read_n()?))
	}
	fn read_i64(&mut self) -> Result<i64> {
		Ok(i64::from_be_bytes(self.read_n()?))
	}

	fn read_u8_as_usize(&mut self) -> Result<usize> {
		Ok(self.read_u8()? as usize)
	}
	fn read_u16_as_usize(&mut self) -> Result<usize> {
		Ok(self.read_u16()? as usize)
	}
	fn read_u32_as_usize(&mut self) -> Result<usize> {
		Ok(self.read_u32()? as usize)
	}

	fn read_vec<T, S, E>(&mut self, get_size: S, mut get_element: E) -> Result<Vec<T>>
		where
			S: FnOnce(&mut Self) -> Result<usize>,
			E: FnMut(&mut Self) -> Result<T>
	{
		let size = get_size(self)?;
		// The count comes from untrusted input, so don't let it decide the allocation alone.
		let mut vec = Vec::with_capacity(size.min(1024));
		for _ in 0..size {
			vec.push(get_element(self)?);
		}
		Ok(vec)
	}
}

impl<T: Read> ClassRead for T {
	fn read_n<const N: usize>(&mut self) -> Result<[u8; N]> {
		let mut buf = [0u8; N];
		self.read_exact(&mut buf)?;
		Ok(buf)
	}

	fn read_u8_vec(&mut self, size: usize) -> Result<Vec<u8>> {
		let mut vec = Vec::new();
		self.by_ref().take(size as u64).read_to_end(&mut vec)?;
		if vec.len() != size {
			return Err(FormatError::Truncated.into());
		}
		Ok(vec)
	}
}

/// A sequential big-endian writer. Implemented for everything implementing [`Write`].
pub trait ClassWrite {
	fn write_u8_slice(&mut self, buf: &[u8]) -> Result<()>;

	fn write_u8(&mut self, value: u8) -> Result<()> {
		self.write_u8_slice(&[value])
	}
	fn write_u16(&mut self, value: u16) -> Result<()> {
		self.write_u8_slice(&value.to_be_bytes())
	}
	fn write_u32(&mut self, value: u32) -> Result<()> {
		self.write_u8_slice(&value.to_be_bytes())
	}
	fn write_u64(&mut self, value: u64) -> Result<()> {
		self.write_u8_slice(&value.to_be_bytes())
	}
	fn write_i32(&mut self, value: i32) -> Result<()> {
		self.write_u8_slice(&value.to_be_bytes())
	}
	fn write_i64(&mut self, value: i64) -> Result<()> {
		self.write_u8_slice(&value.to_be_bytes())
	}

	/// The `what` is used for the error message, in case `value` is too large.
	fn write_usize_as_u8(&mut self, value: usize, what: &'static str) -> Result<()> {
		let value = u8::try_from(value).map_err(|_| FormatError::TooMany { what, len: value })?;
		self.write_u8(value)
	}
	fn write_usize_as_u16(&mut self, value: usize, what: &'static str) -> Result<()> {
		let value = u16::try_from(value).map_err(|_| FormatError::TooMany { what, len: value })?;
		self.write_u16(value)
	}
	fn write_usize_as_u32(&mut self, value: usize, what: &'static str) -> Result<()> {
		let value = u32::try_from(value).map_err(|_| FormatError::TooMany { what, len: value })?;
		self.write_u32(value)
	}

	fn write_slice<'t, T>(
		&mut self,
		slice: &'t [T],
		put_size: impl FnOnce(&mut Self, usize) -> Result<()>,
		mut put_element: impl FnMut(&mut Self, &'t T) -> Result<()>
	) -> Result<()> {
		put_size(self, slice.len())?;
		for value in slice {
			put_element(self, value)?;
		}
		Ok(())
	}
}

impl<T: Write> ClassWrite for T {
	fn write_u8_slice(&mut self, buf: &[u8]) -> Result<()> {
		self.write_all(buf).map_err(Error::Io)
	}
}

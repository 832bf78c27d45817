use thiserror::Error;
use crate::pool::ConstantTag;

/// The input bytes don't describe a valid structure.
///
/// Every variant aborts the current decode pass. What to do with the attribute (or the whole class file) is up to the caller.
#[derive(Error, Debug)]
pub enum FormatError {
	#[error("pool index {index} is out of bounds for a constant pool of size {size}")]
	InvalidIndex { index: u16, size: usize },
	#[error("pool index {index} is the unusable second slot of a `CONSTANT_Long` or `CONSTANT_Double`")]
	UnusableIndex { index: u16 },
	#[error("pool entry at index {index} is a `{actual}`, expected `{expected}`")]
	TagMismatch { index: u16, expected: ConstantTag, actual: ConstantTag },
	#[error("constant_pool_count is 0, but must be at least 1")]
	EmptyPoolCount,
	#[error("unknown constant pool tag {tag} at pool index {index}")]
	UnknownConstantTag { tag: u8, index: usize },
	#[error("unknown element value discriminant {tag:#04x}")]
	UnknownElementValueTag { tag: u8 },
	#[error("unexpected end of data, perhaps the declared length or count is too large?")]
	Truncated,
	#[error("declared length of {declared} bytes, but the structure consumed {consumed} bytes")]
	LengthMismatch { declared: u32, consumed: u64 },
	#[error("invalid modified utf8 contents in pool entry at index {index}")]
	InvalidUtf8 { index: usize },
	#[error("annotations and arrays are nested deeper than {limit} levels")]
	NestingTooDeep { limit: usize },
	#[error("wrong magic: got {0:#x}, expected 0xCAFEBABE")]
	BadMagic(u32),
	#[error("{what} has {len} elements, which doesn't fit into its count field")]
	TooMany { what: &'static str, len: usize },
}

/// All errors this crate may return.
#[derive(Error, Debug)]
pub enum Error {
	#[error(transparent)]
	Format(#[from] FormatError),
	/// A structure was constructed with arguments that don't belong together. This indicates a bug in the calling code, not a malformed input.
	#[error("illegal argument: {0}")]
	IllegalArgument(String),
	#[error("i/o error")]
	Io(#[source] std::io::Error),
}

impl Error {
	pub fn is_format_error(&self) -> bool {
		matches!(self, Error::Format(_))
	}

	/// Returns the [`FormatError`], if this is one.
	pub fn as_format_error(&self) -> Option<&FormatError> {
		match self {
			Error::Format(e) => Some(e),
			_ => None,
		}
	}
}

impl From<std::io::Error> for Error {
	fn from(value: std::io::Error) -> Self {
		if value.kind() == std::io::ErrorKind::UnexpectedEof {
			Error::Format(FormatError::Truncated)
		} else {
			Error::Io(value)
		}
	}
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

macro_rules! illegal_argument {
	($($arg:tt)*) => {
		return Err($crate::error::Error::IllegalArgument(format!($($arg)*)))
	};
}
pub(crate) use illegal_argument;

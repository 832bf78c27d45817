//! Conversion between the string format of `CONSTANT_Utf8` pool entries and [`JavaString`]s.
//!
//! The pool stores strings in "modified utf8": `\0` takes two bytes, and supplementary characters are written as two three byte
//! surrogates. See <https://docs.oracle.com/javase/specs/jvms/se22/html/jvms-4.html#jvms-4.4.7>.

use std::borrow::Cow;
use java_string::{JavaStr, JavaString};
use crate::error::FormatError;

/// Decodes the contents of the `CONSTANT_Utf8` pool entry at `index`. The index is only used for the error.
pub(crate) fn from_vec_to_string(vec: Vec<u8>, index: usize) -> Result<JavaString, FormatError> {
	JavaString::from_modified_utf8(vec)
		.map_err(|_| FormatError::InvalidUtf8 { index })
}

pub(crate) fn from_string_to_vec(string: &JavaStr) -> Cow<[u8]> {
	string.to_modified_utf8()
}

#[cfg(test)]
mod testing {
	use anyhow::Result;
	use java_string::JavaStr;
	use pretty_assertions::assert_eq;
	use crate::error::FormatError;
	use crate::jstring::{from_string_to_vec, from_vec_to_string};

	fn round_trip(raw: &[u8], string: &str) -> Result<()> {
		let str = JavaStr::from_str(string);
		assert_eq!(from_string_to_vec(str), raw);
		assert_eq!(from_vec_to_string(raw.to_owned(), 1)?, str);
		Ok(())
	}

	#[test]
	fn ascii() -> Result<()> {
		round_trip(b"Ljava/lang/Deprecated;", "Ljava/lang/Deprecated;")
	}

	#[test]
	fn zero_takes_two_bytes() -> Result<()> {
		round_trip(&[0b1100_0000, 0b1000_0000, b'a'], "\0a")
	}

	#[test]
	fn supplementary_as_surrogate_pair() -> Result<()> {
		round_trip(&[
			0b1110_1101, 0b1010_0000, 0b1000_0000, 0b1110_1101, 0b1011_0000, 0b1000_0000,
		], "\u{010000}")
	}

	#[test]
	fn invalid_reports_index() {
		// a lone continuation byte
		let result = from_vec_to_string(vec![0b1000_0000], 42);
		assert!(matches!(result, Err(FormatError::InvalidUtf8 { index: 42 })));
	}
}

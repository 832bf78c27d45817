use anyhow::Result;
use pretty_assertions::assert_eq;
use dukepool::{AnnotationEntry, Attribute, ConstantPool, ConstantTag, ElementValue, ElementValuePair, Error, FormatError};

/// The pool `#1 "Lorg/example/Marker;"`, `#2 Integer 1`, `#3 Long 2` (also taking `#4`), `#5 "value"`, `#6 "hello"`,
/// `#7 "RuntimeVisibleAnnotations"`, `#8 Class #9` and `#9 "org/example/Foo"`.
#[rustfmt::skip]
const POOL: &[u8] = &[
	0, 10,
	1, 0, 20, b'L', b'o', b'r', b'g', b'/', b'e', b'x', b'a', b'm', b'p', b'l', b'e', b'/', b'M', b'a', b'r', b'k', b'e', b'r', b';',
	3, 0, 0, 0, 1,
	5, 0, 0, 0, 0, 0, 0, 0, 2,
	1, 0, 5, b'v', b'a', b'l', b'u', b'e',
	1, 0, 5, b'h', b'e', b'l', b'l', b'o',
	1, 0, 25, b'R', b'u', b'n', b't', b'i', b'm', b'e', b'V', b'i', b's', b'i', b'b', b'l', b'e',
		b'A', b'n', b'n', b'o', b't', b'a', b't', b'i', b'o', b'n', b's',
	7, 0, 9,
	1, 0, 15, b'o', b'r', b'g', b'/', b'e', b'x', b'a', b'm', b'p', b'l', b'e', b'/', b'F', b'o', b'o',
];

fn pool() -> Result<ConstantPool> {
	let mut reader = POOL;
	let pool = ConstantPool::read(&mut reader)?;
	assert!(reader.is_empty());
	Ok(pool)
}

#[test]
fn pair_renders_name_and_value() -> Result<()> {
	let pool = pool()?;

	let pair = ElementValuePair::read(&mut [0u8, 5, b's', 0, 6].as_slice(), &pool)?;
	assert_eq!(pair.to_short_string(&pool)?, "value=hello");
	Ok(())
}

#[test]
fn typed_lookups() -> Result<()> {
	let pool = pool()?;

	let expected = [
		(1, ConstantTag::Utf8),
		(2, ConstantTag::Integer),
		(3, ConstantTag::Long),
		(5, ConstantTag::Utf8),
		(8, ConstantTag::Class),
	];
	let all_tags = [ConstantTag::Utf8, ConstantTag::Integer, ConstantTag::Long, ConstantTag::Class, ConstantTag::String];

	for (index, tag) in expected {
		assert_eq!(pool.get(index, tag)?.tag(), tag);

		for other in all_tags.into_iter().filter(|&other| other != tag) {
			let result = pool.get(index, other);
			assert!(
				matches!(result, Err(Error::Format(FormatError::TagMismatch { .. }))),
				"#{index} must not be a {other}: {result:?}"
			);
		}
	}

	for index in [0, 4, 10, 11, u16::MAX] {
		let result = pool.get(index, ConstantTag::Utf8);
		assert!(result.as_ref().is_err_and(Error::is_format_error), "#{index} must not be usable: {result:?}");
	}
	Ok(())
}

#[test]
fn stringify_utf8_constant() -> Result<()> {
	let pool = pool()?;
	let value = ElementValue::read(&mut [b's', 0, 9].as_slice(), &pool)?;
	assert_eq!(value.stringify_value(&pool)?, "org/example/Foo");
	Ok(())
}

#[test]
fn nested_annotation_round_trip() -> Result<()> {
	let pool = pool()?;

	let inner = AnnotationEntry::new(1, vec![
		ElementValuePair::new(5, ElementValue::constant(b's', 6)?),
	], true);
	let annotation = AnnotationEntry::new(1, vec![
		ElementValuePair::new(5, ElementValue::array(b'[', vec![
			ElementValue::annotation(b'@', inner.clone())?,
			ElementValue::annotation(b'@', inner)?,
		])?),
		ElementValuePair::new(6, ElementValue::constant(b'J', 3)?),
		ElementValuePair::new(5, ElementValue::array(b'[', vec![])?),
	], true);

	let bytes = annotation.to_bytes()?;
	assert_eq!(bytes.len(), annotation.length());
	assert_eq!(AnnotationEntry::read(&mut bytes.as_slice(), &pool, true)?, annotation);

	assert_eq!(
		annotation.to_short_string(&pool)?,
		"@Lorg/example/Marker;(value=[@Lorg/example/Marker;(value=hello),@Lorg/example/Marker;(value=hello)], hello=2, value=[])"
	);
	Ok(())
}

#[test]
fn empty_array_encoding() -> Result<()> {
	let pool = pool()?;

	let value = ElementValue::read(&mut [b'[', 0, 0].as_slice(), &pool)?;
	assert_eq!(value, ElementValue::Array(Vec::new()));
	assert_eq!(value.to_bytes()?, [b'[', 0, 0]);
	Ok(())
}

#[test]
fn attribute_declaring_more_annotations_than_it_holds() -> Result<()> {
	let pool = pool()?;

	#[rustfmt::skip]
	let bytes = [
		0u8, 7, 0, 0, 0, 6, // RuntimeVisibleAnnotations of length 6
		0, 2, // but two annotations
		0, 1, 0, 0, // @Lorg/example/Marker;
		0, 1, 0, 0, // a second one that isn't part of the attribute
	];

	let result = Attribute::read(&mut bytes.as_slice(), &pool);
	assert!(matches!(result, Err(Error::Format(FormatError::Truncated))), "{result:?}");
	Ok(())
}

#[test]
fn attribute_round_trip() -> Result<()> {
	let pool = pool()?;

	#[rustfmt::skip]
	let bytes = [
		0, 7, 0, 0, 0, 17,
		0, 2,
		0, 1, 0, 0,
		0, 1, 0, 1,
			0, 5, b'e', 0, 1, 0, 6,
	];

	let attribute = Attribute::read(&mut bytes.as_slice(), &pool)?;
	let Attribute::Annotations { name_index: 7, annotations } = &attribute else {
		panic!("expected an annotations attribute, got {attribute:?}");
	};
	assert!(annotations.runtime_visible);
	assert!(annotations.entries.iter().all(AnnotationEntry::is_runtime_visible));
	assert_eq!(annotations.entries[1].to_short_string(&pool)?, "@Lorg/example/Marker;(value=hello)");

	let mut written = Vec::new();
	attribute.write(&mut written)?;
	assert_eq!(written, bytes);
	Ok(())
}

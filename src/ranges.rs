/*!
# Byte classes used while scanning input
*/

pub trait ByteSelect {
	fn select(&self, b: u8) -> bool;
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct ByteRange(pub u8, pub u8);

impl ByteSelect for ByteRange {
	fn select(&self, b: u8) -> bool {
		self.0 <= b && b <= self.1
	}
}

impl ByteSelect for u8 {
	fn select(&self, b: u8) -> bool {
		b == *self
	}
}

impl ByteSelect for &'_ [u8] {
	fn select(&self, b: u8) -> bool {
		self.contains(&b)
	}
}

impl ByteSelect for &'_ [ByteRange] {
	fn select(&self, b: u8) -> bool {
		self.iter().any(|r| r.select(b))
	}
}

/// XML 1.0 § 2.3 \[3\]
pub static CLASS_XML_SPACE: &'static [u8] = b" \t\r\n";

/// Bytes which end an element or attribute name.
pub static CLASS_NAME_DELIMITER: &'static [u8] = b" \t\r\n=<>/";

/// Bytes which end a reference body. Only `;` ends it well.
pub static CLASS_REFERENCE_END: &'static [u8] = b";<>&'\" \t\r\n";

/// Bytes which may start an attribute name.
///
/// Multi-byte UTF-8 sequences are let through and vetted once the whole
/// name has been decoded.
pub static CLASS_NAME_START_BYTE: &'static [ByteRange] = &[
	ByteRange(b':', b':'),
	ByteRange(b'A', b'Z'),
	ByteRange(b'_', b'_'),
	ByteRange(b'a', b'z'),
	ByteRange(b'\xc3', b'\xf3'),
];

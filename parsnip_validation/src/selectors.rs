/*!
# Codepoint classes from XML 1.0

The tables here mirror the productions of XML 1.0 (Fifth Edition) § 2.2
and § 2.3.
*/
use std::fmt;

/// Predicate over chars.
pub trait CharSelector {
	fn select(&self, c: char) -> bool;
}

impl CharSelector for char {
	fn select(&self, c: char) -> bool {
		*self == c
	}
}

impl CharSelector for &'_ [char] {
	fn select(&self, c: char) -> bool {
		self.iter().any(|r| *r == c)
	}
}

/// Inclusive range of codepoints.
///
/// Both ends are included because several edge points of the XML
/// productions (e.g. U+FFFF) are not representable as exclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodepointRange(pub char, pub char);

impl CodepointRange {
	pub fn contains(&self, c: char) -> bool {
		self.0 <= c && c <= self.1
	}
}

impl CharSelector for CodepointRange {
	fn select(&self, c: char) -> bool {
		self.contains(c)
	}
}

/// Union of codepoint ranges, sorted by their start.
#[derive(Clone, Copy)]
pub struct CodepointRanges(pub &'static [CodepointRange]);

impl CharSelector for CodepointRanges {
	fn select(&self, c: char) -> bool {
		// tables are sorted and disjoint
		match self.0.binary_search_by(|r| {
			if r.1 < c {
				std::cmp::Ordering::Less
			} else if r.0 > c {
				std::cmp::Ordering::Greater
			} else {
				std::cmp::Ordering::Equal
			}
		}) {
			Ok(_) => true,
			Err(_) => false,
		}
	}
}

impl fmt::Debug for CodepointRanges {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		write!(f, "CodepointRanges(<{} ranges>)", self.0.len())
	}
}

/// Chars allowed anywhere in a document (XML 1.0 § 2.2 \[2\]).
pub const XML_CHAR_RANGES: &'static [CodepointRange] = &[
	CodepointRange('\x09', '\x0a'),
	CodepointRange('\x0d', '\x0d'),
	CodepointRange('\u{0020}', '\u{d7ff}'),
	CodepointRange('\u{e000}', '\u{fffd}'),
	CodepointRange('\u{10000}', '\u{10ffff}'),
];

/// Chars which are never allowed in a document.
///
/// Surrogates are left out since they cannot occur in a `char`.
pub const XML_NONCHAR_RANGES: &'static [CodepointRange] = &[
	CodepointRange('\x00', '\x08'),
	CodepointRange('\x0b', '\x0c'),
	CodepointRange('\x0e', '\x1f'),
	CodepointRange('\u{fffe}', '\u{ffff}'),
];

const NAME_START_RANGES: &'static [CodepointRange] = &[
	CodepointRange(':', ':'),
	CodepointRange('A', 'Z'),
	CodepointRange('_', '_'),
	CodepointRange('a', 'z'),
	CodepointRange('\u{c0}', '\u{d6}'),
	CodepointRange('\u{d8}', '\u{f6}'),
	CodepointRange('\u{f8}', '\u{2ff}'),
	CodepointRange('\u{370}', '\u{37d}'),
	CodepointRange('\u{37f}', '\u{1fff}'),
	CodepointRange('\u{200c}', '\u{200d}'),
	CodepointRange('\u{2070}', '\u{218f}'),
	CodepointRange('\u{2c00}', '\u{2fef}'),
	CodepointRange('\u{3001}', '\u{d7ff}'),
	CodepointRange('\u{f900}', '\u{fdcf}'),
	CodepointRange('\u{fdf0}', '\u{fffd}'),
	CodepointRange('\u{10000}', '\u{effff}'),
];

const NAME_RANGES: &'static [CodepointRange] = &[
	CodepointRange('-', '.'),
	CodepointRange('0', ':'),
	CodepointRange('A', 'Z'),
	CodepointRange('_', '_'),
	CodepointRange('a', 'z'),
	CodepointRange('\u{b7}', '\u{b7}'),
	CodepointRange('\u{c0}', '\u{d6}'),
	CodepointRange('\u{d8}', '\u{f6}'),
	CodepointRange('\u{f8}', '\u{37d}'),
	CodepointRange('\u{37f}', '\u{1fff}'),
	CodepointRange('\u{200c}', '\u{200d}'),
	CodepointRange('\u{203f}', '\u{2040}'),
	CodepointRange('\u{2070}', '\u{218f}'),
	CodepointRange('\u{2c00}', '\u{2fef}'),
	CodepointRange('\u{3001}', '\u{d7ff}'),
	CodepointRange('\u{f900}', '\u{fdcf}'),
	CodepointRange('\u{fdf0}', '\u{fffd}'),
	CodepointRange('\u{10000}', '\u{effff}'),
];

/// NameStartChar (XML 1.0 § 2.3 \[4\])
pub static CLASS_NAME_START: CodepointRanges = CodepointRanges(NAME_START_RANGES);

/// NameChar (XML 1.0 § 2.3 \[4a\])
pub static CLASS_NAME: CodepointRanges = CodepointRanges(NAME_RANGES);

/// Char (XML 1.0 § 2.2 \[2\])
pub static CLASS_CHAR: CodepointRanges = CodepointRanges(XML_CHAR_RANGES);

/// Complement of [`CLASS_CHAR`] within `char`.
pub static CLASS_NONCHAR: CodepointRanges = CodepointRanges(XML_NONCHAR_RANGES);

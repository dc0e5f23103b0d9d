/*!
# Name and character checks for XML 1.0

Supplementary crate for [`parsnip`](https://docs.rs/parsnip). The reader
uses it to vet the names it encounters and the writer to refuse emitting
names or text which would not parse back.
*/
use std::fmt;

pub mod selectors;

use selectors::CharSelector;

/// Reason a string was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
	/// A Name or NCName was empty.
	EmptyName,
	/// A char not allowed at that position was found.
	///
	/// Carries the char and its byte offset within the checked string.
	InvalidChar(char, usize),
}

impl fmt::Display for Error {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::EmptyName => f.write_str("name must not be empty"),
			Self::InvalidChar(c, at) => {
				write!(f, "character U+{:04x} at offset {} is not allowed", *c as u32, at)
			}
		}
	}
}

impl std::error::Error for Error {}

fn validate_with<S: CharSelector>(s: &str, start: &S, rest: &S, allow_colon: bool) -> Result<(), Error> {
	let mut chars = s.char_indices();
	match chars.next() {
		None => return Err(Error::EmptyName),
		Some((at, c)) => {
			if !start.select(c) || (!allow_colon && c == ':') {
				return Err(Error::InvalidChar(c, at));
			}
		}
	}
	for (at, c) in chars {
		if !rest.select(c) || (!allow_colon && c == ':') {
			return Err(Error::InvalidChar(c, at));
		}
	}
	Ok(())
}

/**
Check whether a str matches the XML 1.0 `Name` production.

# Example

```rust
use parsnip_validation::{validate_name, Error};

assert!(validate_name("stream").is_ok());
assert!(validate_name("ns:stream").is_ok());
assert_eq!(validate_name("a b"), Err(Error::InvalidChar(' ', 1)));
assert_eq!(validate_name(""), Err(Error::EmptyName));
```
*/
pub fn validate_name(s: &str) -> Result<(), Error> {
	validate_with(s, &selectors::CLASS_NAME_START, &selectors::CLASS_NAME, true)
}

/**
Check whether a str is a `Name` without any colon, i.e. usable as a
namespace prefix or a local name.

# Example

```rust
use parsnip_validation::{validate_ncname, Error};

assert!(validate_ncname("stream").is_ok());
assert_eq!(validate_ncname("ns:stream"), Err(Error::InvalidChar(':', 2)));
```
*/
pub fn validate_ncname(s: &str) -> Result<(), Error> {
	validate_with(s, &selectors::CLASS_NAME_START, &selectors::CLASS_NAME, false)
}

/**
Check whether every char of a str may appear in XML 1.0 character data.

# Example

```rust
use parsnip_validation::{validate_cdata, Error};

assert!(validate_cdata("1 < 2 & \"quoted\"").is_ok());
assert_eq!(validate_cdata("a\x01"), Err(Error::InvalidChar('\x01', 1)));
```
*/
pub fn validate_cdata(s: &str) -> Result<(), Error> {
	for (at, c) in s.char_indices() {
		if selectors::CLASS_NONCHAR.select(c) {
			return Err(Error::InvalidChar(c, at));
		}
	}
	Ok(())
}

/// Whether a single codepoint is an XML 1.0 `Char`.
///
/// Takes a `u32` because character references may name values which are
/// not valid Rust chars at all.
pub fn is_xml_char(cp: u32) -> bool {
	match std::char::from_u32(cp) {
		Some(c) => selectors::CLASS_CHAR.select(c),
		None => false,
	}
}

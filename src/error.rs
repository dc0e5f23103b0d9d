/*!
# Error types

Every error returned by the [`Reader`](crate::Reader) or the
[`Writer`](crate::Writer) carries the diagnostic path of the position at
which it occurred (see [`Error::path`]).
*/
use std::error;
use std::fmt;
use std::io;
use std::ops::Deref;
use std::result::Result as StdResult;
use std::sync::Arc;

use parsnip_validation::Error as ValidationError;

pub use crate::errctx::*;
use crate::reader::Token;

/// Input which does not match the lexical shape expected at the current
/// position.
#[derive(Debug, Clone, PartialEq)]
pub enum SyntaxError {
	/// Byte which was not expected at that point.
	///
	/// The contents are implementation details.
	UnexpectedByte(&'static str, u8, Option<&'static [&'static str]>),

	/// A name was empty where one was required.
	EmptyName(&'static str),

	/// A char which is not allowed at that position of a name or text.
	InvalidChar(&'static str, char),

	/// The bytes were not valid UTF-8.
	InvalidUtf8(&'static str),

	/// A different token was required by the called operation.
	UnexpectedToken {
		expected: Token,
		found: Token,
	},

	/// Closing tag name does not match the opening tag.
	ElementMismatch {
		expected: String,
		found: String,
	},

	/// Attribute occurs twice on one element.
	///
	/// Attributes are compared by local name and resolved namespace.
	DuplicateAttribute(String),

	/// Prefix with no enclosing declaration (strict namespace mode only).
	UndeclaredNamespacePrefix(String),

	/// Attempt to (re)bind the `xml` or `xmlns` prefix, or to bind their
	/// namespace names to another prefix.
	ReservedNamespacePrefix(String),

	/// `xmlns:prefix=""`, which Namespaces in XML 1.0 forbids.
	EmptyNamespaceUri(String),

	/// Malformed entity or character reference, or a character reference
	/// to a codepoint which is not an XML char.
	InvalidReference(String),

	/// Non-whitespace content after the root element closed.
	ContentAfterRoot,

	/// A second root element.
	MultipleRoots,

	/// DOCTYPE declaration after the root element opened.
	MisplacedDoctype,

	/// Nesting exceeded [`ReaderOptions::max_depth`](crate::ReaderOptions::max_depth).
	DepthLimitExceeded(usize),
}

impl SyntaxError {
	fn fmt_opts(f: &mut fmt::Formatter, opts: &[&str]) -> fmt::Result {
		if opts.len() == 1 {
			f.write_str(opts[0])?;
		} else {
			f.write_str("one of: ")?;
			for (i, opt) in opts.iter().enumerate() {
				if i > 0 {
					f.write_str(", ")?;
				}
				f.write_str(opt)?;
			}
		}
		f.write_str(")")
	}
}

impl fmt::Display for SyntaxError {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::UnexpectedByte(ctx, b, Some(opts)) if opts.len() > 0 => {
				write!(f, "0x{:02x} not allowed {} (expected ", *b, ctx)?;
				Self::fmt_opts(f, opts)
			}
			Self::UnexpectedByte(ctx, b, _) => write!(f, "0x{:02x} not allowed {}", *b, ctx),
			Self::EmptyName(ctx) => write!(f, "empty name {}", ctx),
			Self::InvalidChar(ctx, c) => write!(f, "U+{:04x} not allowed {}", *c as u32, ctx),
			Self::InvalidUtf8(ctx) => write!(f, "invalid utf-8 {}", ctx),
			Self::UnexpectedToken { expected, found } => {
				write!(f, "expected {} but found {}", expected, found)
			}
			Self::ElementMismatch { expected, found } => write!(
				f,
				"mismatched tags: expected '{}' but found '{}'",
				expected, found
			),
			Self::DuplicateAttribute(name) => write!(f, "duplicate attribute '{}'", name),
			Self::UndeclaredNamespacePrefix(prefix) => {
				write!(f, "use of undeclared namespace prefix '{}'", prefix)
			}
			Self::ReservedNamespacePrefix(prefix) => {
				write!(f, "reserved namespace prefix or name for '{}'", prefix)
			}
			Self::EmptyNamespaceUri(prefix) => {
				write!(f, "namespace URI for prefix '{}' is empty", prefix)
			}
			Self::InvalidReference(r) => write!(f, "invalid reference '&{};'", r),
			Self::ContentAfterRoot => f.write_str("content after the root element"),
			Self::MultipleRoots => f.write_str("more than one root element"),
			Self::MisplacedDoctype => f.write_str("DOCTYPE after start of root element"),
			Self::DepthLimitExceeded(max) => write!(f, "nesting deeper than {} elements", max),
		}
	}
}

impl error::Error for SyntaxError {}

/// Operation called in a state where it is not valid.
///
/// These indicate a bug in the calling code, not bad input.
#[derive(Debug, Clone, PartialEq)]
pub enum MisuseError {
	/// The reader or writer was closed.
	Closed,
	/// Element end requested without an open element.
	NoOpenElement,
	/// Second root element after the first one closed.
	MultipleRoots,
	/// Attribute outside of an element header.
	AttributeNotAllowed,
	/// Text outside of an element.
	TextNotAllowed,
	/// `value` without a preceding `name`.
	ValueWithoutName,
	/// `name` was not followed by `value` before the next structural call.
	DanglingName(String),
	/// The same qualified attribute name twice on one element.
	DuplicateAttribute(String),
	/// The document is not complete.
	IncompleteDocument,
	/// A name which does not match the XML `Name` production.
	InvalidName(String, ValidationError),
	/// A char which cannot be represented in XML 1.0.
	InvalidChar(char),
}

impl fmt::Display for MisuseError {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Closed => f.write_str("already closed"),
			Self::NoOpenElement => f.write_str("no open element"),
			Self::MultipleRoots => f.write_str("document already has a root element"),
			Self::AttributeNotAllowed => {
				f.write_str("attributes not allowed outside element headers")
			}
			Self::TextNotAllowed => f.write_str("text not allowed outside elements"),
			Self::ValueWithoutName => f.write_str("value written without attribute name"),
			Self::DanglingName(name) => write!(f, "attribute name '{}' has no value", name),
			Self::DuplicateAttribute(name) => write!(f, "attribute '{}' written twice", name),
			Self::IncompleteDocument => f.write_str("incomplete document"),
			Self::InvalidName(name, e) => write!(f, "invalid name '{}': {}", name, e),
			Self::InvalidChar(c) => {
				write!(f, "U+{:04x} cannot be represented in XML 1.0", *c as u32)
			}
		}
	}
}

impl error::Error for MisuseError {}

/// [`std::sync::Arc`]-based wrapper around [`std::io::Error`] to allow cloning.
#[derive(Clone)]
pub struct IOErrorWrapper(Arc<io::Error>);

impl IOErrorWrapper {
	fn wrap(e: io::Error) -> IOErrorWrapper {
		IOErrorWrapper(Arc::new(e))
	}
}

impl fmt::Debug for IOErrorWrapper {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		fmt::Debug::fmt(&**self, f)
	}
}

impl fmt::Display for IOErrorWrapper {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		fmt::Display::fmt(&**self, f)
	}
}

impl PartialEq for IOErrorWrapper {
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}
}

impl Deref for IOErrorWrapper {
	type Target = io::Error;

	fn deref(&self) -> &io::Error {
		&*self.0
	}
}

/// Errors returned by the reader and the writer.
///
/// None of these are recovered from internally. After an error other than
/// [`Error::IO`], the reader or writer state is unspecified and the
/// document should be abandoned.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
	/// The underlying stream failed.
	///
	/// This includes [`std::io::ErrorKind::WouldBlock`] from non-blocking
	/// sources, which are passed through unchanged.
	IO(IOErrorWrapper),

	/// Malformed input.
	Syntax(SyntaxError, String),

	/// The stream ended while more input was required.
	///
	/// The string indicates the construct which was being read and should
	/// not be interpreted by user code.
	UnexpectedEof(&'static str, String),

	/// Valid XML which uses a feature this crate rejects on purpose
	/// (user-defined entities, entity declarations in a DOCTYPE).
	Unsupported(&'static str, String),

	/// The caller invoked an operation which is not valid in the current
	/// state.
	Misuse(MisuseError, String),
}

pub type Result<T> = StdResult<T, Error>;

impl Error {
	pub fn io(e: io::Error) -> Error {
		Error::IO(IOErrorWrapper::wrap(e))
	}

	pub(crate) fn syntax(e: SyntaxError) -> Error {
		Error::Syntax(e, String::new())
	}

	pub(crate) fn eof(ctx: &'static str) -> Error {
		Error::UnexpectedEof(ctx, String::new())
	}

	pub(crate) fn unsupported(ctx: &'static str) -> Error {
		Error::Unsupported(ctx, String::new())
	}

	pub(crate) fn misuse(e: MisuseError) -> Error {
		Error::Misuse(e, String::new())
	}

	/// Attach a diagnostic path, unless one is set already.
	pub(crate) fn with_path<F: FnOnce() -> String>(self, path: F) -> Error {
		match self {
			Self::Syntax(e, p) if p.is_empty() => Self::Syntax(e, path()),
			Self::UnexpectedEof(ctx, p) if p.is_empty() => Self::UnexpectedEof(ctx, path()),
			Self::Unsupported(ctx, p) if p.is_empty() => Self::Unsupported(ctx, path()),
			Self::Misuse(e, p) if p.is_empty() => Self::Misuse(e, path()),
			other => other,
		}
	}

	/// The diagnostic path at which the error occurred, e.g.
	/// `/root/child[@attr]`.
	///
	/// I/O errors have no path.
	pub fn path(&self) -> Option<&str> {
		match self {
			Self::IO(_) => None,
			Self::Syntax(_, p)
			| Self::UnexpectedEof(_, p)
			| Self::Unsupported(_, p)
			| Self::Misuse(_, p) => Some(p.as_str()),
		}
	}
}

impl From<io::Error> for Error {
	fn from(e: io::Error) -> Error {
		Error::io(e)
	}
}

impl From<SyntaxError> for Error {
	fn from(e: SyntaxError) -> Error {
		Error::syntax(e)
	}
}

impl From<MisuseError> for Error {
	fn from(e: MisuseError) -> Error {
		Error::misuse(e)
	}
}

impl fmt::Display for Error {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Error::IO(e) => write!(f, "I/O error: {}", e),
			Error::Syntax(e, path) => write!(f, "syntax error: {} at path {}", e, path),
			Error::UnexpectedEof(ctx, path) => {
				write!(f, "unexpected end of input {} at path {}", ctx, path)
			}
			Error::Unsupported(ctx, path) => {
				write!(f, "unsupported construct {} at path {}", ctx, path)
			}
			Error::Misuse(e, path) => write!(f, "invalid operation: {} at path {}", e, path),
		}
	}
}

impl error::Error for Error {
	fn source(&self) -> Option<&(dyn error::Error + 'static)> {
		match self {
			Error::IO(e) => Some(&**e),
			Error::Syntax(e, _) => Some(e),
			Error::Misuse(e, _) => Some(e),
			Error::UnexpectedEof(..) | Error::Unsupported(..) => None,
		}
	}
}

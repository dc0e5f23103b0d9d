/*!
# Streaming writer

The [`Writer`] turns nested structural calls into XML bytes. It keeps the
same scope stack as the reader, so misplaced calls (an attribute after
text, a second root element, an unbalanced `end_tag`) are refused
instead of producing malformed output.

Text and attribute values are escaped; names are checked against the XML
`Name` production. No XML declaration is emitted.

```
use parsnip::{Namespace, Writer};

let mut writer = Writer::new(Vec::new());
writer
	.begin_tag("greeting").unwrap()
	.namespace(&Namespace::new(None, "urn:example")).unwrap()
	.attribute("lang", "en").unwrap()
	.text("hello & welcome").unwrap()
	.end_tag().unwrap();
writer.close().unwrap();
assert_eq!(
	&writer.into_inner()[..],
	&b"<greeting xmlns=\"urn:example\" lang=\"en\">hello &amp; welcome</greeting>"[..],
);
```
*/
use std::io;

use bytes::{BufMut, BytesMut};
use log::debug;
use smartstring::alias::String as SmartString;

use parsnip_validation::{
	validate_cdata, validate_name, validate_ncname, Error as ValidationError,
};

use crate::entities::escape;
use crate::error::{Error, MisuseError, Result};
use crate::namespaces::PREFIX_XMLNS;
use crate::scope::{Scope, ScopeStack};

/// Size at which staged output is handed to the sink.
pub const DEFAULT_CAPACITY: usize = 8192;

/// Namespace declaration, as passed to [`Writer::namespace`] and used as
/// prefix by the `*_ns` methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
	/// Prefix; `None` (or empty) declares the default namespace.
	pub alias: Option<String>,
	pub uri: String,
}

impl Namespace {
	pub fn new(alias: Option<&str>, uri: &str) -> Namespace {
		Namespace {
			alias: alias.map(|a| a.to_string()),
			uri: uri.to_string(),
		}
	}

	fn prefix(&self) -> Option<&str> {
		match self.alias.as_deref() {
			Some("") | None => None,
			Some(alias) => Some(alias),
		}
	}
}

fn qualify(prefix: Option<&str>, local: &str) -> Result<SmartString> {
	let invalid = |name: &str, e: ValidationError| {
		Error::misuse(MisuseError::InvalidName(name.to_string(), e))
	};
	match prefix {
		Some(prefix) => {
			validate_ncname(prefix).map_err(|e| invalid(prefix, e))?;
			validate_ncname(local).map_err(|e| invalid(local, e))?;
			let mut name = SmartString::from(prefix);
			name.push(':');
			name.push_str(local);
			Ok(name)
		}
		None => {
			validate_name(local).map_err(|e| invalid(local, e))?;
			Ok(local.into())
		}
	}
}

fn check_chars(s: &str) -> Result<()> {
	validate_cdata(s).map_err(|e| match e {
		ValidationError::InvalidChar(c, _) => Error::misuse(MisuseError::InvalidChar(c)),
		// cannot happen for character data, an empty string is fine
		ValidationError::EmptyName => Error::misuse(MisuseError::InvalidChar('\0')),
	})
}

/// Emits one XML document into an [`io::Write`].
#[derive(Debug)]
pub struct Writer<W: io::Write> {
	sink: W,
	buf: BytesMut,
	capacity: usize,
	scopes: ScopeStack,
	/// Attributes written into the open element header.
	attributes: Vec<SmartString>,
}

impl<W: io::Write> Writer<W> {
	pub fn new(sink: W) -> Self {
		Self::with_capacity(sink, DEFAULT_CAPACITY)
	}

	/// Create a writer which hands output to `sink` whenever `capacity`
	/// bytes are staged.
	pub fn with_capacity(sink: W, capacity: usize) -> Self {
		Self {
			sink,
			buf: BytesMut::with_capacity(capacity),
			capacity,
			scopes: ScopeStack::new(),
			attributes: Vec::new(),
		}
	}

	fn located(&self, r: Result<()>) -> Result<()> {
		r.map_err(|e| e.with_path(|| self.scopes.path()))
	}

	/// Diagnostic path of the current position.
	pub fn path(&self) -> String {
		self.scopes.path()
	}

	/// Start an element. Closes the header of the parent element first, if
	/// it is still open.
	pub fn begin_tag(&mut self, name: &str) -> Result<&mut Self> {
		let r = self.open(None, name);
		self.located(r)?;
		Ok(self)
	}

	/// Start an element named `alias:name`.
	///
	/// This does not declare the namespace; use [`Writer::namespace`] on
	/// this or an enclosing element for that.
	pub fn begin_tag_ns(&mut self, ns: &Namespace, name: &str) -> Result<&mut Self> {
		let r = self.open(ns.prefix(), name);
		self.located(r)?;
		Ok(self)
	}

	/// Finish the current element, as `/>` if nothing was written into it.
	pub fn end_tag(&mut self) -> Result<&mut Self> {
		let r = self.close_element();
		self.located(r)?;
		Ok(self)
	}

	/// Start an attribute; it is only written once [`Writer::value`]
	/// provides a value.
	pub fn name(&mut self, name: &str) -> Result<&mut Self> {
		let r = self.attribute_name(None, name);
		self.located(r)?;
		Ok(self)
	}

	/// Start an attribute named `alias:name`.
	pub fn name_ns(&mut self, ns: &Namespace, name: &str) -> Result<&mut Self> {
		let r = self.attribute_name(ns.prefix(), name);
		self.located(r)?;
		Ok(self)
	}

	/// Complete the attribute started by [`Writer::name`].
	///
	/// `None` drops the attribute without emitting anything.
	pub fn value(&mut self, value: Option<&str>) -> Result<&mut Self> {
		let r = self.attribute_value(value);
		self.located(r)?;
		Ok(self)
	}

	pub fn attribute(&mut self, name: &str, value: &str) -> Result<&mut Self> {
		self.name(name)?.value(Some(value))
	}

	pub fn attribute_ns(&mut self, ns: &Namespace, name: &str, value: &str) -> Result<&mut Self> {
		self.name_ns(ns, name)?.value(Some(value))
	}

	/// Write escaped text content. Closes the element header first, if it
	/// is still open.
	pub fn text(&mut self, text: &str) -> Result<&mut Self> {
		let r = self.write_text(text);
		self.located(r)?;
		Ok(self)
	}

	/// Declare `ns` on the element whose header is open, as
	/// `xmlns:alias="uri"` or `xmlns="uri"`.
	pub fn namespace(&mut self, ns: &Namespace) -> Result<&mut Self> {
		match ns.prefix() {
			Some(alias) => {
				let xmlns = Namespace::new(Some(PREFIX_XMLNS), "");
				self.attribute_ns(&xmlns, alias, &ns.uri)
			}
			None => self.attribute(PREFIX_XMLNS, &ns.uri),
		}
	}

	/// Hand all staged output to the sink and flush it.
	pub fn flush(&mut self) -> Result<()> {
		self.write_out()?;
		self.sink.flush()?;
		Ok(())
	}

	/// Flush, then check that exactly one root element was written and
	/// closed.
	///
	/// The writer is closed afterwards even if the check fails; the output
	/// written up to that point is not taken back.
	pub fn close(&mut self) -> Result<()> {
		if self.scopes.top() == Scope::Closed {
			return Err(Error::misuse(MisuseError::Closed));
		}
		let complete = self.scopes.len() == 1 && self.scopes.top() == Scope::NonEmptyDocument;
		let path = self.scopes.path();
		let flushed = self.flush();
		debug!("closing writer at {}", path);
		self.scopes.close();
		flushed?;
		if !complete {
			return Err(Error::misuse(MisuseError::IncompleteDocument).with_path(|| path));
		}
		Ok(())
	}

	pub fn get_ref(&self) -> &W {
		&self.sink
	}

	/// Return the sink. Output which was not flushed is discarded.
	pub fn into_inner(self) -> W {
		self.sink
	}

	/// Current scope, refusing closed writers and unfinished attributes.
	fn settled(&self) -> Result<Scope> {
		match self.scopes.top() {
			Scope::Closed => Err(Error::misuse(MisuseError::Closed)),
			Scope::ElementAttribute => Err(Error::misuse(MisuseError::DanglingName(
				self.scopes.top_name().unwrap_or("").to_string(),
			))),
			scope => Ok(scope),
		}
	}

	fn open(&mut self, prefix: Option<&str>, local: &str) -> Result<()> {
		let scope = self.settled()?;
		let name = qualify(prefix, local)?;
		match scope {
			Scope::EmptyDocument => self.scopes.replace_top(Scope::NonEmptyDocument),
			Scope::ElementContent => (),
			Scope::ElementOpening => {
				self.scopes.replace_top(Scope::ElementContent);
				self.buf.put_u8(b'>');
			}
			Scope::NonEmptyDocument => return Err(Error::misuse(MisuseError::MultipleRoots)),
			Scope::ElementAttribute | Scope::Closed => unreachable!(),
		}
		self.buf.put_u8(b'<');
		self.buf.put_slice(name.as_bytes());
		self.scopes.push(Scope::ElementOpening, Some(name));
		self.attributes.clear();
		self.write_some()
	}

	fn close_element(&mut self) -> Result<()> {
		match self.settled()? {
			Scope::ElementOpening => {
				self.buf.put_slice(b"/>");
				self.scopes.pop();
			}
			Scope::ElementContent => {
				let name = self.scopes.pop().unwrap_or_default();
				self.buf.put_slice(b"</");
				self.buf.put_slice(name.as_bytes());
				self.buf.put_u8(b'>');
			}
			_ => return Err(Error::misuse(MisuseError::NoOpenElement)),
		}
		self.write_some()
	}

	fn attribute_name(&mut self, prefix: Option<&str>, local: &str) -> Result<()> {
		if self.settled()? != Scope::ElementOpening {
			return Err(Error::misuse(MisuseError::AttributeNotAllowed));
		}
		let name = qualify(prefix, local)?;
		if self.attributes.iter().any(|a| *a == name) {
			return Err(Error::misuse(MisuseError::DuplicateAttribute(name.to_string())));
		}
		self.scopes.push(Scope::ElementAttribute, Some(name));
		Ok(())
	}

	fn attribute_value(&mut self, value: Option<&str>) -> Result<()> {
		match self.scopes.top() {
			Scope::Closed => return Err(Error::misuse(MisuseError::Closed)),
			Scope::ElementAttribute => (),
			_ => return Err(Error::misuse(MisuseError::ValueWithoutName)),
		}
		let value = match value {
			Some(value) => value,
			None => {
				self.scopes.pop();
				return Ok(());
			}
		};
		check_chars(value)?;
		let name = self.scopes.pop().unwrap_or_default();
		self.buf.put_u8(b' ');
		self.buf.put_slice(name.as_bytes());
		self.attributes.push(name);
		self.buf.put_slice(b"=\"");
		escape(&mut self.buf, value.as_bytes());
		self.buf.put_u8(b'"');
		self.write_some()
	}

	fn write_text(&mut self, text: &str) -> Result<()> {
		match self.settled()? {
			Scope::ElementOpening => {
				self.scopes.replace_top(Scope::ElementContent);
				self.buf.put_u8(b'>');
			}
			Scope::ElementContent => (),
			_ => return Err(Error::misuse(MisuseError::TextNotAllowed)),
		}
		check_chars(text)?;
		escape(&mut self.buf, text.as_bytes());
		self.write_some()
	}

	/// Hand staged output to the sink once it reaches the capacity.
	fn write_some(&mut self) -> Result<()> {
		if self.buf.len() >= self.capacity {
			self.write_out()?;
		}
		Ok(())
	}

	fn write_out(&mut self) -> Result<()> {
		if !self.buf.is_empty() {
			self.sink.write_all(&self.buf)?;
			self.buf.clear();
		}
		Ok(())
	}
}

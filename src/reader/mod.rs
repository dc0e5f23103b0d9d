/*!
# Pull reader

The [`Reader`] classifies one lexical unit at a time. [`Reader::peek`]
reports what comes next without consuming it; the `next_*`, `begin_tag`,
`end_tag` and `skip*` methods then consume exactly that unit.

Whitespace between markup, comments, processing instructions (including
the XML declaration), a DOCTYPE before the root element and a leading
UTF-8 byte order mark are consumed transparently while searching for the
next unit.

## Example

```
use parsnip::{Reader, Token};

let mut reader = Reader::new(&b"<greeting lang='en'>hello &amp; welcome</greeting>"[..]);
reader.begin_tag().unwrap();
assert_eq!(reader.next_tag_name().unwrap(), "greeting");
assert_eq!(reader.next_attribute().unwrap(), "lang");
assert_eq!(reader.next_value().unwrap(), "en");
assert_eq!(reader.next_text().unwrap(), "hello & welcome");
reader.end_tag().unwrap();
assert_eq!(reader.peek().unwrap(), Token::EndDocument);
```
*/
use std::fmt;
use std::io;

use log::{debug, trace};
use smartstring::alias::String as SmartString;

use parsnip_validation::{
	validate_cdata, validate_name, validate_ncname, Error as ValidationError,
};

use crate::entities::{self, ReferenceError};
use crate::errctx::*;
use crate::error::{Error, MisuseError, Result, SyntaxError};
use crate::namespaces::{NamespaceName, NamespaceTable, PREFIX_XMLNS};
use crate::ranges::{
	ByteSelect, CLASS_NAME_DELIMITER, CLASS_NAME_START_BYTE, CLASS_REFERENCE_END, CLASS_XML_SPACE,
};
use crate::scope::{Scope, ScopeStack};
use crate::source::{Source, DEFAULT_CHUNK_SIZE};

const UTF8_BOM: &'static [u8] = b"\xef\xbb\xbf";
const CDATA_START: &'static [u8] = b"<![CDATA[";
const CDATA_END: &'static [u8] = b"]]>";
const COMMENT_START: &'static [u8] = b"<!--";
const COMMENT_END: &'static [u8] = b"-->";
const PI_END: &'static [u8] = b"?>";
const DOCTYPE_START: &'static [u8] = b"<!DOCTYPE";

/// Kind of the next lexical unit, as reported by [`Reader::peek`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
	/// Start of an element; consume with [`Reader::begin_tag`].
	BeginTag,
	/// Name of the element just begun; consume with
	/// [`Reader::next_tag_name`] or [`Reader::next_tag_qname`].
	ElementName,
	/// End of the current element, either `</name>` or the `/>` of an
	/// empty element; consume with [`Reader::end_tag`].
	EndTag,
	/// Attribute name; consume with [`Reader::next_attribute`].
	Attribute,
	/// Attribute value; consume with [`Reader::next_value`].
	Value,
	/// Text or CDATA; consume with [`Reader::next_text`].
	Text,
	/// No further content.
	EndDocument,
}

impl fmt::Display for Token {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		f.write_str(match self {
			Self::BeginTag => "BEGIN_TAG",
			Self::ElementName => "ELEMENT_NAME",
			Self::EndTag => "END_TAG",
			Self::Attribute => "ATTRIBUTE",
			Self::Value => "VALUE",
			Self::Text => "TEXT",
			Self::EndDocument => "END_DOCUMENT",
		})
	}
}

/// Lookahead slot; finer grained than [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Peeked {
	/// `<` consumed.
	BeginTag,
	ElementName,
	/// `</` consumed.
	EndTag,
	/// `/>` consumed.
	EmptyTag,
	Attribute,
	/// `=` and the opening quote consumed; carries the quote.
	Value(u8),
	Text,
	/// `<![CDATA[` consumed.
	Cdata,
	EndDocument,
}

impl Peeked {
	fn token(self) -> Token {
		match self {
			Self::BeginTag => Token::BeginTag,
			Self::ElementName => Token::ElementName,
			Self::EndTag | Self::EmptyTag => Token::EndTag,
			Self::Attribute => Token::Attribute,
			Self::Value(_) => Token::Value,
			Self::Text | Self::Cdata => Token::Text,
			Self::EndDocument => Token::EndDocument,
		}
	}
}

/// Namespace-qualified name of an element or attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QName {
	/// Prefix as written, if it resolved to a namespace.
	pub prefix: Option<String>,
	/// Local part of the name.
	///
	/// For a prefix which could not be resolved this is the whole name as
	/// written, e.g. `ns:name`.
	pub local: String,
	/// Namespace URI the name belongs to.
	pub namespace: Option<NamespaceName>,
}

impl QName {
	pub fn namespace_str(&self) -> Option<&str> {
		self.namespace.as_deref()
	}
}

impl fmt::Display for QName {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self.namespace.as_ref() {
			Some(ns) => write!(f, "{{{}}}{}", ns, self.local),
			None => f.write_str(&self.local),
		}
	}
}

/**
# Reader configuration

## Example

```
use parsnip::{Reader, ReaderOptions};
let reader = Reader::with_options(
	&b"<a/>"[..],
	ReaderOptions::default().strict_namespaces(true).max_depth(64),
);
```
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderOptions {
	/// Fail on element or attribute prefixes without a declaration in
	/// scope.
	///
	/// When false, such a name is taken literally (`prefix:local` with no
	/// namespace).
	pub strict_namespaces: bool,

	/// Number of bytes requested from the underlying reader per read call.
	pub chunk_size: usize,

	/// Maximum element nesting depth.
	pub max_depth: usize,
}

impl ReaderOptions {
	/// Set [`ReaderOptions::strict_namespaces`].
	pub fn strict_namespaces(mut self, v: bool) -> ReaderOptions {
		self.strict_namespaces = v;
		self
	}

	/// Set [`ReaderOptions::chunk_size`].
	pub fn chunk_size(mut self, v: usize) -> ReaderOptions {
		self.chunk_size = v;
		self
	}

	/// Set [`ReaderOptions::max_depth`].
	pub fn max_depth(mut self, v: usize) -> ReaderOptions {
		self.max_depth = v;
		self
	}
}

impl Default for ReaderOptions {
	fn default() -> Self {
		Self {
			strict_namespaces: false,
			chunk_size: DEFAULT_CHUNK_SIZE,
			max_depth: 1024,
		}
	}
}

/// `xmlns` attribute whose value is still to be read.
#[derive(Debug)]
enum Declaration {
	Default,
	Prefix(SmartString),
}

/// Split `prefix:local`; names which are not two NCNames around one colon
/// are taken literally.
fn split_prefix(name: &str) -> Option<(&str, &str)> {
	let colon = name.find(':')?;
	let (prefix, local) = (&name[..colon], &name[colon + 1..]);
	if validate_ncname(prefix).is_err() || validate_ncname(local).is_err() {
		return None;
	}
	Some((prefix, local))
}

fn validation_error(ctx: &'static str, e: ValidationError) -> Error {
	match e {
		ValidationError::EmptyName => Error::syntax(SyntaxError::EmptyName(ctx)),
		ValidationError::InvalidChar(c, _) => Error::syntax(SyntaxError::InvalidChar(ctx, c)),
	}
}

/// Cursor over the lexical units of one XML document.
pub struct Reader<R> {
	src: Source<R>,
	scopes: ScopeStack,
	namespaces: NamespaceTable,
	peeked: Option<Peeked>,
	/// (local name, namespace) of the attributes of the current header.
	attributes: Vec<(SmartString, Option<NamespaceName>)>,
	/// An attribute name was consumed but not its value.
	awaiting_value: bool,
	/// A value was consumed and no attribute name has followed yet.
	after_value: bool,
	pending_decl: Option<Declaration>,
	at_start: bool,
	options: ReaderOptions,
}

impl<R: io::Read> Reader<R> {
	pub fn new(inner: R) -> Self {
		Self::with_options(inner, ReaderOptions::default())
	}

	pub fn with_options(inner: R, options: ReaderOptions) -> Self {
		Self {
			src: Source::with_chunk_size(inner, options.chunk_size),
			scopes: ScopeStack::new(),
			namespaces: NamespaceTable::new(),
			peeked: None,
			attributes: Vec::new(),
			awaiting_value: false,
			after_value: false,
			pending_decl: None,
			at_start: true,
			options,
		}
	}

	fn located<T>(&self, r: Result<T>) -> Result<T> {
		r.map_err(|e| e.with_path(|| self.scopes.path()))
	}

	/// Diagnostic path of the current position, e.g. `/root/child[@attr]`.
	pub fn path(&self) -> String {
		self.scopes.path()
	}

	/// Number of open elements.
	pub fn depth(&self) -> usize {
		self.namespaces.depth()
	}

	/// Classify the next unit without consuming it.
	///
	/// Calling this repeatedly returns the same token until a consuming
	/// operation runs.
	pub fn peek(&mut self) -> Result<Token> {
		let r = self.current().map(Peeked::token);
		self.located(r)
	}

	/// Consume the start of an element.
	pub fn begin_tag(&mut self) -> Result<()> {
		let r = self.begin_tag_inner();
		self.located(r)
	}

	/// Consume the name of the element just begun and return its local
	/// part.
	pub fn next_tag_name(&mut self) -> Result<String> {
		let r = self.next_tag_qname_inner().map(|q| q.local);
		self.located(r)
	}

	/// Consume the name of the element just begun, resolving its prefix.
	///
	/// The prefix is resolved against declarations on enclosing elements;
	/// declarations on the element itself come after its name and only
	/// apply to its attributes and descendants.
	pub fn next_tag_qname(&mut self) -> Result<QName> {
		let r = self.next_tag_qname_inner();
		self.located(r)
	}

	/// Consume the end of the current element.
	///
	/// For `</name>`, the name must match the one of the opening tag.
	pub fn end_tag(&mut self) -> Result<()> {
		let r = self.end_tag_inner();
		self.located(r)
	}

	/// Consume an attribute name and return its local part.
	pub fn next_attribute(&mut self) -> Result<String> {
		let r = self.next_attribute_qname_inner().map(|q| q.local);
		self.located(r)
	}

	/// Consume an attribute name, resolving its prefix.
	///
	/// `xmlns` and `xmlns:prefix` declarations are reported as attributes in
	/// the `http://www.w3.org/2000/xmlns/` namespace; the binding takes
	/// effect once their value has been consumed.
	pub fn next_attribute_qname(&mut self) -> Result<QName> {
		let r = self.next_attribute_qname_inner();
		self.located(r)
	}

	/// Consume an attribute value, expanding references.
	pub fn next_value(&mut self) -> Result<String> {
		let r = self.next_value_inner();
		self.located(r)
	}

	/// Consume text content up to the next tag, expanding references.
	///
	/// Adjacent text and CDATA runs, also when separated by comments, are
	/// returned as one string. Returns an empty string without consuming
	/// anything if the element ends here.
	pub fn next_text(&mut self) -> Result<String> {
		let r = self.next_text_inner();
		self.located(r)
	}

	/// Discard the next unit.
	///
	/// On [`Token::BeginTag`] the whole element is discarded.
	pub fn skip(&mut self) -> Result<()> {
		let r = self.skip_inner();
		self.located(r)
	}

	/// Discard the rest of the current element, including its end tag.
	pub fn skip_tag(&mut self) -> Result<()> {
		let r = self.skip_tag_inner();
		self.located(r)
	}

	/// Release buffered input; every later operation fails.
	///
	/// The wrapped reader itself stays owned by this `Reader` until it is
	/// dropped or taken back with [`Reader::into_inner`]; dropping it is
	/// what closes a file or socket.
	pub fn close(&mut self) {
		debug!("closing reader at {}", self.scopes.path());
		self.scopes.close();
		self.peeked = None;
		self.src.release();
	}

	pub fn get_ref(&self) -> &R {
		self.src.get_ref()
	}

	pub fn into_inner(self) -> R {
		self.src.into_inner()
	}

	fn current(&mut self) -> Result<Peeked> {
		if let Some(p) = self.peeked {
			return Ok(p);
		}
		let p = self.classify()?;
		self.peeked = Some(p);
		Ok(p)
	}

	fn expect(&mut self, want: Peeked) -> Result<()> {
		let found = self.current()?;
		if found == want {
			Ok(())
		} else {
			Err(Error::syntax(SyntaxError::UnexpectedToken {
				expected: want.token(),
				found: found.token(),
			}))
		}
	}

	fn classify(&mut self) -> Result<Peeked> {
		match self.scopes.top() {
			Scope::Closed => Err(Error::misuse(MisuseError::Closed)),
			Scope::ElementOpening => match self.src.skip_whitespace()? {
				// whitespace is tolerated between '<' and the name
				Some(_) => Ok(Peeked::ElementName),
				None => Err(Error::eof(ERRCTX_NAMESTART)),
			},
			Scope::ElementAttribute => self.classify_in_header(),
			Scope::EmptyDocument | Scope::NonEmptyDocument | Scope::ElementContent => {
				self.classify_in_content()
			}
		}
	}

	fn classify_in_header(&mut self) -> Result<Peeked> {
		let spaced = !self.after_value
			|| (self.src.request(1)? && CLASS_XML_SPACE.select(self.src.byte(0)));
		let b = match self.src.skip_whitespace()? {
			Some(b) => b,
			None => return Err(Error::eof(ERRCTX_ELEMENT)),
		};
		if self.awaiting_value {
			if b != b'=' {
				return Err(Error::syntax(SyntaxError::UnexpectedByte(
					ERRCTX_ATTNAME,
					b,
					Some(&["'='"]),
				)));
			}
			self.src.skip(1);
			let quote = match self.src.skip_whitespace()? {
				Some(b) => b,
				None => return Err(Error::eof(ERRCTX_ATTVAL)),
			};
			if quote != b'\'' && quote != b'"' {
				return Err(Error::syntax(SyntaxError::UnexpectedByte(
					ERRCTX_ATTVAL,
					quote,
					Some(&["'", "\""]),
				)));
			}
			self.src.skip(1);
			return Ok(Peeked::Value(quote));
		}
		match b {
			b'>' => {
				self.src.skip(1);
				self.after_value = false;
				self.scopes.pop();
				self.scopes.replace_top(Scope::ElementContent);
				self.attributes.clear();
				self.classify_in_content()
			}
			b'/' => {
				if !self.src.request(2)? {
					return Err(Error::eof(ERRCTX_ELEMENT_CLOSE));
				}
				let next = self.src.byte(1);
				if next != b'>' {
					return Err(Error::syntax(SyntaxError::UnexpectedByte(
						ERRCTX_ELEMENT_CLOSE,
						next,
						Some(&["'>'"]),
					)));
				}
				self.src.skip(2);
				Ok(Peeked::EmptyTag)
			}
			b if CLASS_NAME_START_BYTE.select(b) && !spaced => {
				Err(Error::syntax(SyntaxError::UnexpectedByte(
					ERRCTX_ELEMENT,
					b,
					Some(&["whitespace", "'>'", "'/>'"]),
				)))
			}
			b if CLASS_NAME_START_BYTE.select(b) => Ok(Peeked::Attribute),
			b => Err(Error::syntax(SyntaxError::UnexpectedByte(
				ERRCTX_ELEMENT,
				b,
				Some(&["attribute name", "'>'", "'/>'"]),
			))),
		}
	}

	fn classify_in_content(&mut self) -> Result<Peeked> {
		let top = self.scopes.top();
		let b = match self.skip_insignificant()? {
			Some(b) => b,
			None if top == Scope::ElementContent => return Err(Error::eof(ERRCTX_ELEMENT)),
			None => return Ok(Peeked::EndDocument),
		};
		if b != b'<' {
			return match top {
				Scope::ElementContent => Ok(Peeked::Text),
				Scope::NonEmptyDocument => Err(Error::syntax(SyntaxError::ContentAfterRoot)),
				_ => Err(Error::syntax(SyntaxError::UnexpectedByte(
					ERRCTX_DOCUMENT,
					b,
					Some(&["'<'"]),
				))),
			};
		}
		if !self.src.request(2)? {
			return Err(Error::eof(ERRCTX_ELEMENT));
		}
		match self.src.byte(1) {
			b'/' if top == Scope::ElementContent => {
				self.src.skip(2);
				Ok(Peeked::EndTag)
			}
			b'!' if top == Scope::ElementContent && self.src.starts_with(CDATA_START)? => {
				self.src.skip(CDATA_START.len());
				Ok(Peeked::Cdata)
			}
			b'/' | b'!' => Err(Error::syntax(SyntaxError::UnexpectedByte(
				ERRCTX_MARKUP_DECL,
				self.src.byte(1),
				None,
			))),
			_ if top == Scope::NonEmptyDocument => {
				Err(Error::syntax(SyntaxError::MultipleRoots))
			}
			_ => {
				self.src.skip(1);
				Ok(Peeked::BeginTag)
			}
		}
	}

	/// Consume whitespace, comments, processing instructions and DOCTYPE
	/// declarations; return the next byte without consuming it.
	fn skip_insignificant(&mut self) -> Result<Option<u8>> {
		if self.at_start {
			self.at_start = false;
			if self.src.starts_with(UTF8_BOM)? {
				self.src.skip(UTF8_BOM.len());
			}
		}
		loop {
			let b = match self.src.skip_whitespace()? {
				Some(b) => b,
				None => return Ok(None),
			};
			if b != b'<' || !self.src.request(2)? {
				return Ok(Some(b));
			}
			match self.src.byte(1) {
				b'?' => self.skip_pi()?,
				b'!' if self.src.starts_with(COMMENT_START)? => self.skip_comment()?,
				b'!' if self.src.starts_with(DOCTYPE_START)? => self.skip_doctype()?,
				_ => return Ok(Some(b)),
			}
		}
	}

	/// Classify what follows a text or CDATA run.
	///
	/// Unlike [`Reader::classify_in_content`], whitespace is kept: it
	/// belongs to the text which continues after a CDATA section, comment or
	/// processing instruction.
	fn classify_text_continuation(&mut self) -> Result<Peeked> {
		loop {
			if !self.src.request(2)? {
				return Err(Error::eof(ERRCTX_ELEMENT));
			}
			if self.src.byte(0) != b'<' {
				return Ok(Peeked::Text);
			}
			match self.src.byte(1) {
				b'?' => self.skip_pi()?,
				b'!' if self.src.starts_with(COMMENT_START)? => self.skip_comment()?,
				_ => return self.classify_in_content(),
			}
		}
	}

	fn skip_pi(&mut self) -> Result<()> {
		let end = match self.src.index_of_seq(PI_END, 2)? {
			Some(end) => end,
			None => return Err(Error::eof(ERRCTX_PI)),
		};
		trace!("skipping processing instruction of {} bytes", end + PI_END.len());
		self.src.skip(end + PI_END.len());
		Ok(())
	}

	fn skip_comment(&mut self) -> Result<()> {
		let end = match self.src.index_of_seq(COMMENT_END, COMMENT_START.len())? {
			Some(end) => end,
			None => return Err(Error::eof(ERRCTX_COMMENT)),
		};
		trace!("skipping comment of {} bytes", end + COMMENT_END.len());
		self.src.skip(end + COMMENT_END.len());
		Ok(())
	}

	fn skip_doctype(&mut self) -> Result<()> {
		if self.scopes.top() != Scope::EmptyDocument {
			return Err(Error::syntax(SyntaxError::MisplacedDoctype));
		}
		let end = match self.src.index_of_any(b"[>", DOCTYPE_START.len())? {
			Some(end) => end,
			None => return Err(Error::eof(ERRCTX_DOCTYPE)),
		};
		// an internal subset may declare entities and attribute defaults
		if self.src.byte(end) == b'[' {
			return Err(Error::unsupported(ERRCTX_DOCTYPE));
		}
		trace!("skipping DOCTYPE declaration of {} bytes", end + 1);
		self.src.skip(end + 1);
		Ok(())
	}

	/// Read a name up to the next delimiter and check it against the XML
	/// `Name` production.
	fn read_name(&mut self, ctx: &'static str) -> Result<SmartString> {
		let end = match self.src.index_of_any(CLASS_NAME_DELIMITER, 0)? {
			Some(end) => end,
			None => return Err(Error::eof(ctx)),
		};
		let name = self.src.read_utf8(end, ctx)?;
		validate_name(&name).map_err(|e| validation_error(ctx, e))?;
		Ok(name.into())
	}

	fn resolve_prefixed(&self, raw: &str, prefix: &str, local: &str) -> Result<QName> {
		match self.namespaces.resolve(prefix) {
			Some(ns) => Ok(QName {
				prefix: Some(prefix.to_string()),
				local: local.to_string(),
				namespace: Some(ns.clone()),
			}),
			None if self.options.strict_namespaces => Err(Error::syntax(
				SyntaxError::UndeclaredNamespacePrefix(prefix.to_string()),
			)),
			None => {
				trace!("prefix {:?} is not declared, keeping {:?} literally", prefix, raw);
				Ok(QName {
					prefix: None,
					local: raw.to_string(),
					namespace: None,
				})
			}
		}
	}

	fn begin_tag_inner(&mut self) -> Result<()> {
		self.expect(Peeked::BeginTag)?;
		if self.namespaces.depth() >= self.options.max_depth {
			return Err(Error::syntax(SyntaxError::DepthLimitExceeded(
				self.options.max_depth,
			)));
		}
		self.peeked = None;
		if self.scopes.top() == Scope::EmptyDocument {
			self.scopes.replace_top(Scope::NonEmptyDocument);
		}
		self.scopes.push(Scope::ElementOpening, None);
		self.namespaces.push();
		Ok(())
	}

	fn next_tag_qname_inner(&mut self) -> Result<QName> {
		self.expect(Peeked::ElementName)?;
		let raw = self.read_name(ERRCTX_NAME)?;
		self.peeked = None;
		let qname = match split_prefix(&raw) {
			Some((prefix, local)) => self.resolve_prefixed(&raw, prefix, local)?,
			None => QName {
				prefix: None,
				local: raw.to_string(),
				namespace: self.namespaces.default_namespace().cloned(),
			},
		};
		self.scopes.set_top_name(raw);
		self.scopes.push(Scope::ElementAttribute, None);
		self.attributes.clear();
		Ok(qname)
	}

	fn next_attribute_qname_inner(&mut self) -> Result<QName> {
		self.expect(Peeked::Attribute)?;
		let raw = self.read_name(ERRCTX_ATTNAME)?;
		if let Some(alias) = raw.strip_prefix("xmlns:") {
			validate_ncname(alias).map_err(|e| validation_error(ERRCTX_ATTNAME, e))?;
		}
		self.peeked = None;
		self.after_value = false;
		let mut decl = None;
		let qname = if raw == PREFIX_XMLNS {
			decl = Some(Declaration::Default);
			QName {
				prefix: None,
				local: raw.to_string(),
				namespace: Some(self.namespaces.xmlns().clone()),
			}
		} else {
			match split_prefix(&raw) {
				Some((PREFIX_XMLNS, alias)) => {
					decl = Some(Declaration::Prefix(alias.into()));
					QName {
						prefix: Some(PREFIX_XMLNS.to_string()),
						local: alias.to_string(),
						namespace: Some(self.namespaces.xmlns().clone()),
					}
				}
				Some((prefix, local)) => self.resolve_prefixed(&raw, prefix, local)?,
				None => QName {
					prefix: None,
					local: raw.to_string(),
					namespace: None,
				},
			}
		};
		let duplicate = self
			.attributes
			.iter()
			.any(|(local, ns)| {
				let local: &str = local;
				local == qname.local && *ns == qname.namespace
			});
		if duplicate {
			return Err(Error::syntax(SyntaxError::DuplicateAttribute(
				qname.to_string(),
			)));
		}
		self.attributes
			.push((qname.local.as_str().into(), qname.namespace.clone()));
		self.scopes.set_top_name(raw);
		self.pending_decl = decl;
		self.awaiting_value = true;
		Ok(qname)
	}

	fn next_value_inner(&mut self) -> Result<String> {
		let quote = match self.current()? {
			Peeked::Value(quote) => quote,
			other => {
				return Err(Error::syntax(SyntaxError::UnexpectedToken {
					expected: Token::Value,
					found: other.token(),
				}))
			}
		};
		self.peeked = None;
		let mut value = String::new();
		self.read_value(quote, &mut value)?;
		self.awaiting_value = false;
		self.after_value = true;
		if let Some(decl) = self.pending_decl.take() {
			self.declare(decl, &value)?;
		}
		Ok(value)
	}

	fn declare(&mut self, decl: Declaration, value: &str) -> Result<()> {
		let r = match decl {
			Declaration::Default if value.is_empty() => self.namespaces.declare_default(None),
			Declaration::Default => self.namespaces.declare_default(Some(value)),
			Declaration::Prefix(prefix) => self.namespaces.declare(&prefix, value),
		};
		r.map_err(Error::syntax)
	}

	fn read_value(&mut self, quote: u8, out: &mut String) -> Result<()> {
		let delimiters = [quote, b'&', b'<'];
		loop {
			let end = match self.src.index_of_any(&delimiters, 0)? {
				Some(end) => end,
				None => return Err(Error::eof(ERRCTX_ATTVAL)),
			};
			let start = out.len();
			self.src.read_utf8_into(end, ERRCTX_ATTVAL, out)?;
			validate_cdata(&out[start..]).map_err(|e| validation_error(ERRCTX_ATTVAL, e))?;
			match self.src.byte(0) {
				b'&' => {
					self.src.skip(1);
					self.read_reference(out)?;
				}
				b'<' => {
					return Err(Error::syntax(SyntaxError::UnexpectedByte(
						ERRCTX_ATTVAL,
						b'<',
						None,
					)))
				}
				_ => {
					self.src.skip(1);
					return Ok(());
				}
			}
		}
	}

	/// Expand a reference; the `&` has been consumed already.
	fn read_reference(&mut self, out: &mut String) -> Result<()> {
		let end = match self.src.index_of_any(CLASS_REFERENCE_END, 0)? {
			Some(end) => end,
			None => return Err(Error::eof(ERRCTX_REF)),
		};
		if self.src.byte(end) != b';' {
			let shown = String::from_utf8_lossy(&self.src.window()[..end]).into_owned();
			return Err(Error::syntax(SyntaxError::InvalidReference(shown)));
		}
		let body = self.src.read_utf8(end, ERRCTX_REF)?;
		self.src.skip(1);
		match entities::resolve(&body) {
			Ok(c) => {
				out.push(c);
				Ok(())
			}
			Err(ReferenceError::Undeclared) => Err(Error::unsupported(ERRCTX_REF)),
			Err(ReferenceError::Invalid) => {
				Err(Error::syntax(SyntaxError::InvalidReference(body)))
			}
		}
	}

	fn end_tag_inner(&mut self) -> Result<()> {
		match self.current()? {
			Peeked::EmptyTag => {
				self.peeked = None;
				self.scopes.pop();
				self.close_element();
				Ok(())
			}
			Peeked::EndTag => {
				let found = self.read_name(ERRCTX_ELEMENT_FOOT)?;
				let expected = self.scopes.top_name().unwrap_or("");
				if *expected != *found {
					return Err(Error::syntax(SyntaxError::ElementMismatch {
						expected: expected.to_string(),
						found: found.to_string(),
					}));
				}
				match self.src.skip_whitespace()? {
					Some(b'>') => self.src.skip(1),
					Some(b) => {
						return Err(Error::syntax(SyntaxError::UnexpectedByte(
							ERRCTX_ELEMENT_FOOT,
							b,
							Some(&["'>'"]),
						)))
					}
					None => return Err(Error::eof(ERRCTX_ELEMENT_FOOT)),
				}
				self.peeked = None;
				self.close_element();
				Ok(())
			}
			other => Err(Error::syntax(SyntaxError::UnexpectedToken {
				expected: Token::EndTag,
				found: other.token(),
			})),
		}
	}

	fn close_element(&mut self) {
		self.scopes.pop();
		self.namespaces.pop();
		self.attributes.clear();
		self.awaiting_value = false;
		self.after_value = false;
		self.pending_decl = None;
	}

	fn next_text_inner(&mut self) -> Result<String> {
		match self.current()? {
			Peeked::Text | Peeked::Cdata => (),
			Peeked::EndTag | Peeked::EmptyTag => return Ok(String::new()),
			other => {
				return Err(Error::syntax(SyntaxError::UnexpectedToken {
					expected: Token::Text,
					found: other.token(),
				}))
			}
		}
		let mut out = String::new();
		loop {
			match self.peeked.take() {
				Some(Peeked::Text) => self.read_text(&mut out)?,
				Some(Peeked::Cdata) => self.read_cdata(Some(&mut out))?,
				other => {
					self.peeked = other;
					return Ok(out);
				}
			}
			let next = self.classify_text_continuation()?;
			self.peeked = Some(next);
		}
	}

	fn read_text(&mut self, out: &mut String) -> Result<()> {
		loop {
			let end = match self.src.index_of_any(b"<&", 0)? {
				Some(end) => end,
				None => return Err(Error::eof(ERRCTX_TEXT)),
			};
			let start = out.len();
			self.src.read_utf8_into(end, ERRCTX_TEXT, out)?;
			validate_cdata(&out[start..]).map_err(|e| validation_error(ERRCTX_TEXT, e))?;
			if self.src.byte(0) != b'&' {
				return Ok(());
			}
			self.src.skip(1);
			self.read_reference(out)?;
		}
	}

	/// Consume the rest of a CDATA section including `]]>`.
	fn read_cdata(&mut self, out: Option<&mut String>) -> Result<()> {
		let end = match self.src.index_of_seq(CDATA_END, 0)? {
			Some(end) => end,
			None => return Err(Error::eof(ERRCTX_CDATA_SECTION)),
		};
		match out {
			Some(out) => {
				let start = out.len();
				self.src.read_utf8_into(end, ERRCTX_CDATA_SECTION, out)?;
				validate_cdata(&out[start..])
					.map_err(|e| validation_error(ERRCTX_CDATA_SECTION, e))?;
			}
			None => self.src.skip(end),
		}
		self.src.skip(CDATA_END.len());
		Ok(())
	}

	fn skip_text(&mut self) -> Result<()> {
		loop {
			match self.peeked.take() {
				Some(Peeked::Text) => {
					let end = match self.src.index_of(b'<', 0)? {
						Some(end) => end,
						None => return Err(Error::eof(ERRCTX_TEXT)),
					};
					self.src.skip(end);
				}
				Some(Peeked::Cdata) => self.read_cdata(None)?,
				other => {
					self.peeked = other;
					return Ok(());
				}
			}
			self.current()?;
		}
	}

	fn skip_value(&mut self) -> Result<()> {
		if self.pending_decl.is_some() {
			return self.next_value_inner().map(|_| ());
		}
		let quote = match self.current()? {
			Peeked::Value(quote) => quote,
			other => {
				return Err(Error::syntax(SyntaxError::UnexpectedToken {
					expected: Token::Value,
					found: other.token(),
				}))
			}
		};
		let end = match self.src.index_of(quote, 0)? {
			Some(end) => end,
			None => return Err(Error::eof(ERRCTX_ATTVAL)),
		};
		self.src.skip(end + 1);
		self.peeked = None;
		self.awaiting_value = false;
		self.after_value = true;
		Ok(())
	}

	fn skip_inner(&mut self) -> Result<()> {
		match self.current()? {
			Peeked::BeginTag => {
				self.begin_tag_inner()?;
				self.skip_tag_inner()
			}
			Peeked::ElementName => self.next_tag_qname_inner().map(|_| ()),
			Peeked::Attribute => {
				self.next_attribute_qname_inner()?;
				self.skip_value()
			}
			Peeked::Value(_) => self.skip_value(),
			Peeked::Text | Peeked::Cdata => self.skip_text(),
			Peeked::EndTag | Peeked::EmptyTag => self.end_tag_inner(),
			Peeked::EndDocument => Err(Error::eof(ERRCTX_DOCUMENT_END)),
		}
	}

	fn skip_tag_inner(&mut self) -> Result<()> {
		let depth = self.namespaces.depth();
		if depth == 0 {
			return Err(Error::misuse(MisuseError::NoOpenElement));
		}
		loop {
			match self.current()? {
				Peeked::BeginTag => self.begin_tag_inner()?,
				Peeked::ElementName => {
					self.next_tag_qname_inner()?;
				}
				Peeked::Attribute => {
					self.next_attribute_qname_inner()?;
					self.skip_value()?;
				}
				Peeked::Value(_) => self.skip_value()?,
				Peeked::Text | Peeked::Cdata => self.skip_text()?,
				Peeked::EndTag | Peeked::EmptyTag => {
					self.end_tag_inner()?;
					if self.namespaces.depth() < depth {
						return Ok(());
					}
				}
				Peeked::EndDocument => return Err(Error::eof(ERRCTX_ELEMENT)),
			}
		}
	}
}

#[cfg(test)]
mod tests;

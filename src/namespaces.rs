/*!
# Namespace bindings of the reader

Prefix bindings live in one ordered map. Each declaration pushes an entry
onto an undo log tagged with the element depth it was made at; closing that
element replays the log backwards, which removes fresh bindings and
restores shadowed ones. Default namespaces are kept per depth and
inherited by child elements.
*/
use std::collections::BTreeMap;
#[cfg(not(feature = "mt"))]
use std::rc::Rc;
#[cfg(feature = "mt")]
use std::sync::Arc;

use log::trace;
use smartstring::alias::String as SmartString;

use crate::error::SyntaxError;

/// Wrapper pointer around namespace URIs
///
/// In builds with the `mt` feature, this is a [`Arc`]. In non-`mt` builds,
/// this is a [`std::rc::Rc`]
#[cfg(feature = "mt")]
pub type RcPtr<T> = Arc<T>;
/// Wrapper pointer around namespace URIs
///
/// In builds with the `mt` feature, this is a [`std::sync::Arc`].
/// In non-`mt` builds, this is a [`Rc`].
#[cfg(not(feature = "mt"))]
pub type RcPtr<T> = Rc<T>;

/// Shared namespace URI
pub type NamespaceName = RcPtr<str>;

/// Namespace bound to the `xml` prefix.
pub const XMLNS_XML: &'static str = "http://www.w3.org/XML/1998/namespace";

/// Namespace of `xmlns` declaration attributes.
pub const XMLNS_XMLNS: &'static str = "http://www.w3.org/2000/xmlns/";

pub const PREFIX_XML: &'static str = "xml";
pub const PREFIX_XMLNS: &'static str = "xmlns";

#[derive(Debug)]
struct Undo {
	depth: usize,
	prefix: SmartString,
	previous: Option<NamespaceName>,
}

#[derive(Debug)]
pub struct NamespaceTable {
	bindings: BTreeMap<SmartString, NamespaceName>,
	undo: Vec<Undo>,
	/// Default namespace per depth; index 0 is the document level.
	defaults: Vec<Option<NamespaceName>>,
	xmlns: NamespaceName,
}

impl NamespaceTable {
	pub fn new() -> Self {
		let mut bindings = BTreeMap::new();
		bindings.insert(SmartString::from(PREFIX_XML), NamespaceName::from(XMLNS_XML));
		Self {
			bindings,
			undo: Vec::new(),
			defaults: vec![None],
			xmlns: NamespaceName::from(XMLNS_XMLNS),
		}
	}

	/// Number of open elements.
	pub fn depth(&self) -> usize {
		self.defaults.len() - 1
	}

	/// Enter a child element; it inherits the current default namespace.
	pub fn push(&mut self) {
		let inherited = self.defaults.last().cloned().flatten();
		self.defaults.push(inherited);
	}

	/// Leave the current element, undoing its declarations.
	pub fn pop(&mut self) {
		let depth = self.depth();
		if depth == 0 {
			return;
		}
		while let Some(undo) = self.undo.last() {
			if undo.depth < depth {
				break;
			}
			// checked by the loop condition
			let undo = match self.undo.pop() {
				Some(undo) => undo,
				None => break,
			};
			match undo.previous {
				Some(previous) => {
					trace!("restoring shadowed prefix {:?} -> {:?}", undo.prefix, previous);
					self.bindings.insert(undo.prefix, previous);
				}
				None => {
					self.bindings.remove(&undo.prefix);
				}
			}
		}
		self.defaults.pop();
	}

	/// Bind `prefix` to `uri` for the current element and its descendants.
	pub fn declare(&mut self, prefix: &str, uri: &str) -> Result<(), SyntaxError> {
		if prefix == PREFIX_XMLNS || uri == XMLNS_XMLNS {
			return Err(SyntaxError::ReservedNamespacePrefix(prefix.to_string()));
		}
		if (prefix == PREFIX_XML) != (uri == XMLNS_XML) {
			return Err(SyntaxError::ReservedNamespacePrefix(prefix.to_string()));
		}
		if prefix == PREFIX_XML {
			// rebinding xml to its own namespace is allowed and changes nothing
			return Ok(());
		}
		if uri.is_empty() {
			return Err(SyntaxError::EmptyNamespaceUri(prefix.to_string()));
		}
		let depth = self.depth();
		let prefix = SmartString::from(prefix);
		let previous = self.bindings.insert(prefix.clone(), NamespaceName::from(uri));
		match previous.as_ref() {
			Some(old) => trace!("prefix {:?} shadows {:?} with {:?} at depth {}", prefix, old, uri, depth),
			None => trace!("prefix {:?} bound to {:?} at depth {}", prefix, uri, depth),
		}
		self.undo.push(Undo {
			depth,
			prefix,
			previous,
		});
		Ok(())
	}

	/// Set the default namespace of the current element; `None` (from
	/// `xmlns=""`) removes it.
	pub fn declare_default(&mut self, uri: Option<&str>) -> Result<(), SyntaxError> {
		if let Some(uri) = uri {
			if uri == XMLNS_XML || uri == XMLNS_XMLNS {
				return Err(SyntaxError::ReservedNamespacePrefix(PREFIX_XMLNS.to_string()));
			}
		}
		trace!("default namespace {:?} at depth {}", uri, self.depth());
		if let Some(slot) = self.defaults.last_mut() {
			*slot = uri.map(NamespaceName::from);
		}
		Ok(())
	}

	pub fn resolve(&self, prefix: &str) -> Option<&NamespaceName> {
		self.bindings.get(prefix)
	}

	pub fn default_namespace(&self) -> Option<&NamespaceName> {
		self.defaults.last().and_then(|ns| ns.as_ref())
	}

	pub fn xmlns(&self) -> &NamespaceName {
		&self.xmlns
	}

}

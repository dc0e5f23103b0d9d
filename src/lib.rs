/*!
# Streaming XML pull reader and writer

This crate provides a cursor-style [`Reader`] which hands out one lexical
unit of an XML 1.0 document at a time, and a [`Writer`] which emits a
document from nested structural calls. Both are synchronous and work on
any [`std::io::Read`] or [`std::io::Write`].

## Features (some call them restrictions)

* UTF-8 input only
* Namespace-aware names, with `xmlns` declarations scoped to their element
* Only the five predefined entities and character references
* Comments, processing instructions and the XML declaration are skipped
* A DOCTYPE is skipped, but entity declarations in it are refused
* Exactly one root element, balanced tags and escaped output on the
  writing side
* Every error carries the path at which it occurred, e.g.
  `/root/child[@attr]`

## Example

```
use parsnip::{Reader, Token, Writer};

let mut reader = Reader::new(&b"<?xml version='1.0'?><hello who='World'/>"[..]);
let mut writer = Writer::new(Vec::new());
reader.begin_tag().unwrap();
writer.begin_tag(&reader.next_tag_name().unwrap()).unwrap();
while reader.peek().unwrap() == Token::Attribute {
	let name = reader.next_attribute().unwrap();
	let value = reader.next_value().unwrap();
	writer.attribute(&name, &value).unwrap();
}
reader.end_tag().unwrap();
writer.end_tag().unwrap();
writer.close().unwrap();
assert_eq!(&writer.into_inner()[..], &b"<hello who=\"World\"/>"[..]);
```

## Sharing

Namespace URIs are handed out as [`NamespaceName`], a reference counted
`str`. With the `mt` feature, `Arc` is used instead of `Rc` so that readers
and the names they return can be sent across threads.
*/
pub mod entities;
pub mod error;
mod errctx;
pub mod namespaces;
mod ranges;
pub mod reader;
pub mod scope;
pub mod source;
pub mod writer;


#[doc(inline)]
pub use error::{Error, Result};
#[doc(inline)]
pub use namespaces::{NamespaceName, RcPtr, XMLNS_XML, XMLNS_XMLNS};
#[doc(inline)]
pub use reader::{QName, Reader, ReaderOptions, Token};
#[doc(inline)]
pub use source::Source;
#[doc(inline)]
pub use writer::{Namespace, Writer};

pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");

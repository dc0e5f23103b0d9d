//! Read a document from stdin and write it back to stdout, normalized:
//! comments, processing instructions and insignificant whitespace are
//! dropped, attributes are double-quoted and text is re-escaped.
use std::io;

use parsnip::{Error, Namespace, Reader, Token, Writer};

fn pipe<R: io::Read, W: io::Write>(input: R, output: W) -> parsnip::Result<()> {
	let mut reader = Reader::new(input);
	let mut writer = Writer::new(output);
	loop {
		match reader.peek()? {
			Token::BeginTag => {
				reader.begin_tag()?;
				let name = reader.next_tag_qname()?;
				match name.prefix {
					Some(prefix) => {
						writer.begin_tag_ns(&Namespace::new(Some(&prefix), ""), &name.local)?
					}
					None => writer.begin_tag(&name.local)?,
				};
			}
			Token::Attribute => {
				let name = reader.next_attribute_qname()?;
				let value = reader.next_value()?;
				match name.prefix {
					Some(prefix) => writer.attribute_ns(
						&Namespace::new(Some(&prefix), ""),
						&name.local,
						&value,
					)?,
					None => writer.attribute(&name.local, &value)?,
				};
			}
			Token::Text => {
				writer.text(&reader.next_text()?)?;
			}
			Token::EndTag => {
				reader.end_tag()?;
				writer.end_tag()?;
			}
			Token::EndDocument => break,
			Token::ElementName | Token::Value => reader.skip()?,
		}
	}
	writer.close()
}

fn main() {
	let stdin = io::stdin();
	let stdout = io::stdout();
	match pipe(stdin.lock(), stdout.lock()) {
		Ok(()) => (),
		Err(Error::IO(e)) => panic!("I/O error: {}", e),
		Err(e) => panic!("invalid XML on input: {}", e),
	}
}

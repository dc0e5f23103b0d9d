#[macro_use]
extern crate afl;
extern crate parsnip;

use std::io;

use parsnip::{Namespace, Reader, ReaderOptions, Token, Writer};

/// Reader handing out one chunk per read call.
struct Chunked<'c, 'cc> {
	chunks: &'c [&'cc [u8]],
	offset: usize,
}

impl<'c, 'cc> io::Read for Chunked<'c, 'cc> {
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		loop {
			let chunk = match self.chunks.first() {
				Some(chunk) => *chunk,
				None => return Ok(0),
			};
			if self.offset >= chunk.len() {
				self.chunks = &self.chunks[1..];
				self.offset = 0;
				continue;
			}
			let n = buf.len().min(chunk.len() - self.offset);
			buf[..n].copy_from_slice(&chunk[self.offset..self.offset + n]);
			self.offset += n;
			return Ok(n);
		}
	}
}

fn walk_chunked<'c, 'cc>(chunks: &'c [&'cc [u8]], chunk_size: usize) -> parsnip::Result<usize> {
	let mut nunits = 0;
	let mut reader = Reader::with_options(
		Chunked { chunks, offset: 0 },
		ReaderOptions::default().chunk_size(chunk_size),
	);
	loop {
		match reader.peek()? {
			Token::EndDocument => return Ok(nunits),
			Token::BeginTag => {
				reader.begin_tag()?;
				reader.next_tag_qname()?;
			}
			Token::Attribute => {
				reader.next_attribute_qname()?;
				reader.next_value()?;
			}
			Token::Text => {
				reader.next_text()?;
			}
			_ => reader.skip()?,
		}
		nunits += 1;
	}
}

/// Read `input` and emit it again through a writer.
fn rewrite(input: &[u8]) -> parsnip::Result<Vec<u8>> {
	let mut reader = Reader::new(input);
	let mut writer = Writer::new(Vec::new());
	loop {
		match reader.peek()? {
			Token::EndDocument => break,
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
			Token::ElementName | Token::Value => reader.skip()?,
		}
	}
	writer.close()?;
	Ok(writer.into_inner())
}

fn main() {
    fuzz!(|data: &[u8]| {
		let mut chunks = Vec::<&[u8]>::new();
		let zero = &b"\0"[..];
		for chunk in data.split(|b| { *b == b'\0' }) {
			if chunk.len() == 0 {
				chunks.push(zero)
			} else {
				chunks.push(chunk)
			}
		}
		let chunked = walk_chunked(&chunks, 3).map_err(|e| e.to_string());
		let buf = chunks.join(&b""[..]);
		let whole = walk_chunked(&[&buf[..]], 8192).map_err(|e| e.to_string());
		if chunked != whole {
			panic!("result depends on chunking: {:?} != {:?}", chunked, whole)
		}
		if matches!(whole, Ok(n) if n > 0) {
			let written = match rewrite(&buf) {
				Ok(v) => v,
				Err(e) => panic!("document was read but could not be rewritten: {}", e),
			};
			if let Err(e) = walk_chunked(&[&written[..]], 8192) {
				panic!("rewritten document does not parse: {} in {:?}", e, String::from_utf8_lossy(&written))
			}
		}
    });
}

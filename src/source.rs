/*!
# Buffered byte source

[`Source`] wraps any [`io::Read`] and keeps a window of fetched but not yet
consumed bytes. The reader inspects that window at arbitrary offsets,
searches it for delimiters (fetching more input on demand) and discards
bytes once they have been classified.
*/
use std::io;
use std::str;

use bytes::{Buf, BytesMut};
use memchr::{memchr, memchr2, memchr3, memmem};

use crate::error::{Error, Result, SyntaxError};
use crate::ranges::{ByteSelect, CLASS_XML_SPACE};

/// Default number of bytes requested from the underlying reader at once.
pub const DEFAULT_CHUNK_SIZE: usize = 8192;

pub struct Source<R> {
	inner: R,
	buf: BytesMut,
	chunk_size: usize,
	eof: bool,
}

impl<R: io::Read> Source<R> {
	pub fn new(inner: R) -> Self {
		Self::with_chunk_size(inner, DEFAULT_CHUNK_SIZE)
	}

	pub fn with_chunk_size(inner: R, chunk_size: usize) -> Self {
		let chunk_size = chunk_size.max(1);
		Self {
			inner,
			buf: BytesMut::with_capacity(chunk_size),
			chunk_size,
			eof: false,
		}
	}

	/// Read one more chunk into the window.
	///
	/// Returns false if the underlying reader is exhausted.
	fn fill(&mut self) -> Result<bool> {
		if self.eof {
			return Ok(false);
		}
		let start = self.buf.len();
		self.buf.resize(start + self.chunk_size, 0);
		loop {
			match self.inner.read(&mut self.buf[start..]) {
				Ok(0) => {
					self.buf.truncate(start);
					self.eof = true;
					return Ok(false);
				}
				Ok(n) => {
					self.buf.truncate(start + n);
					return Ok(true);
				}
				Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
				Err(e) => {
					self.buf.truncate(start);
					return Err(Error::io(e));
				}
			}
		}
	}

	/// Ensure at least `n` bytes are in the window.
	///
	/// Returns false if the stream ends before that.
	pub fn request(&mut self, n: usize) -> Result<bool> {
		while self.buf.len() < n {
			if !self.fill()? {
				return Ok(false);
			}
		}
		Ok(true)
	}

	/// The bytes fetched but not consumed yet.
	pub fn window(&self) -> &[u8] {
		&self.buf[..]
	}

	/// Byte at offset `i` of the window.
	///
	/// # Panics
	///
	/// If `i` is outside the window; call [`Source::request`] first.
	pub fn byte(&self, i: usize) -> u8 {
		self.buf[i]
	}

	fn search<F>(&mut self, from: usize, overlap: usize, mut f: F) -> Result<Option<usize>>
	where
		F: FnMut(&[u8]) -> Option<usize>,
	{
		let mut pos = from;
		loop {
			if pos < self.buf.len() {
				if let Some(i) = f(&self.buf[pos..]) {
					return Ok(Some(pos + i));
				}
				pos = self.buf.len().saturating_sub(overlap).max(pos);
			}
			if !self.fill()? {
				return Ok(None);
			}
		}
	}

	/// Offset of the first `b` at or after `from`.
	pub fn index_of(&mut self, b: u8, from: usize) -> Result<Option<usize>> {
		self.search(from, 0, |hay| memchr(b, hay))
	}

	/// Offset of the first byte from `set` at or after `from`.
	pub fn index_of_any(&mut self, set: &[u8], from: usize) -> Result<Option<usize>> {
		match set.len() {
			1 => self.index_of(set[0], from),
			2 => self.search(from, 0, |hay| memchr2(set[0], set[1], hay)),
			3 => self.search(from, 0, |hay| memchr3(set[0], set[1], set[2], hay)),
			_ => self.find(from, &set),
		}
	}

	/// Offset of the first byte selected by `sel` at or after `from`.
	pub fn find<S: ByteSelect>(&mut self, from: usize, sel: &S) -> Result<Option<usize>> {
		self.search(from, 0, |hay| hay.iter().position(|b| sel.select(*b)))
	}

	/// Offset of the first occurence of `needle` at or after `from`.
	pub fn index_of_seq(&mut self, needle: &[u8], from: usize) -> Result<Option<usize>> {
		let finder = memmem::Finder::new(needle);
		let overlap = needle.len().saturating_sub(1);
		self.search(from, overlap, |hay| finder.find(hay))
	}

	/// Whether the window starts with `prefix`, fetching as needed.
	pub fn starts_with(&mut self, prefix: &[u8]) -> Result<bool> {
		self.request(prefix.len())?;
		Ok(self.buf.starts_with(prefix))
	}

	/// Discard whitespace and return the next byte without consuming it.
	pub fn skip_whitespace(&mut self) -> Result<Option<u8>> {
		loop {
			match self.buf.iter().position(|b| !CLASS_XML_SPACE.select(*b)) {
				Some(i) => {
					self.buf.advance(i);
					return Ok(Some(self.buf[0]));
				}
				None => {
					self.buf.clear();
					if !self.fill()? {
						return Ok(None);
					}
				}
			}
		}
	}

	/// Discard `n` bytes from the window.
	pub fn skip(&mut self, n: usize) {
		self.buf.advance(n);
	}

	/// Consume `n` bytes and append them to `out` as text.
	pub fn read_utf8_into(&mut self, n: usize, ctx: &'static str, out: &mut String) -> Result<()> {
		match str::from_utf8(&self.buf[..n]) {
			Ok(s) => out.push_str(s),
			Err(_) => return Err(Error::syntax(SyntaxError::InvalidUtf8(ctx))),
		}
		self.buf.advance(n);
		Ok(())
	}

	/// Consume `n` bytes as text.
	pub fn read_utf8(&mut self, n: usize, ctx: &'static str) -> Result<String> {
		let mut out = String::with_capacity(n);
		self.read_utf8_into(n, ctx, &mut out)?;
		Ok(out)
	}

	/// Drop all buffered input.
	pub fn release(&mut self) {
		self.buf = BytesMut::new();
		self.eof = true;
	}

	pub fn get_ref(&self) -> &R {
		&self.inner
	}

	pub fn into_inner(self) -> R {
		self.inner
	}
}

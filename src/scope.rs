/*!
# Scope stack shared by reader and writer

Both sides track where they are in the document with the same vocabulary
of [`Scope`]s. The stack also remembers the element or attribute name of
each frame; those names render the diagnostic path and let the reader
check that a closing tag matches its opener.
*/
use smartstring::alias::String as SmartString;

/// Lexical context of one stack frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
	/// No root element seen yet.
	EmptyDocument,
	/// The root element has been opened.
	NonEmptyDocument,
	/// Inside `<name`, before the name or any attribute.
	ElementOpening,
	/// Reading the attributes of an element header.
	ElementAttribute,
	/// Between `>` and the matching end tag.
	ElementContent,
	/// Terminal; nothing can be read or written any more.
	Closed,
}

#[derive(Debug)]
struct Frame {
	scope: Scope,
	name: Option<SmartString>,
}

#[derive(Debug)]
pub struct ScopeStack {
	frames: Vec<Frame>,
}

impl ScopeStack {
	pub fn new() -> Self {
		let mut frames = Vec::with_capacity(32);
		frames.push(Frame {
			scope: Scope::EmptyDocument,
			name: None,
		});
		Self { frames }
	}

	pub fn top(&self) -> Scope {
		match self.frames.last() {
			Some(frame) => frame.scope,
			None => Scope::Closed,
		}
	}

	pub fn len(&self) -> usize {
		self.frames.len()
	}

	pub fn push(&mut self, scope: Scope, name: Option<SmartString>) {
		self.frames.push(Frame { scope, name });
	}

	/// Remove the top frame, returning its name.
	///
	/// The bottom frame is never removed.
	pub fn pop(&mut self) -> Option<SmartString> {
		if self.frames.len() <= 1 {
			return None;
		}
		self.frames.pop().and_then(|frame| frame.name)
	}

	pub fn replace_top(&mut self, scope: Scope) {
		if let Some(frame) = self.frames.last_mut() {
			frame.scope = scope;
		}
	}

	pub fn set_top_name(&mut self, name: SmartString) {
		if let Some(frame) = self.frames.last_mut() {
			frame.name = Some(name);
		}
	}

	pub fn top_name(&self) -> Option<&str> {
		self.frames.last().and_then(|frame| frame.name.as_deref())
	}

	/// Drop all frames and make [`Scope::Closed`] the only one.
	pub fn close(&mut self) {
		self.frames.clear();
		self.frames.push(Frame {
			scope: Scope::Closed,
			name: None,
		});
	}

	/// Render an XPath-like location, e.g. `/root/child[@attr]` or
	/// `/root/child/text()`.
	pub fn path(&self) -> String {
		let mut out = String::new();
		let last = self.frames.len().saturating_sub(1);
		for (i, frame) in self.frames.iter().enumerate() {
			let name = match frame.name.as_deref() {
				Some(name) => name,
				None => continue,
			};
			match frame.scope {
				Scope::ElementOpening => {
					out.push('/');
					out.push_str(name);
				}
				Scope::ElementContent => {
					out.push('/');
					out.push_str(name);
					if i == last {
						out.push_str("/text()");
					}
				}
				Scope::ElementAttribute => {
					out.push_str("[@");
					out.push_str(name);
					out.push(']');
				}
				Scope::EmptyDocument | Scope::NonEmptyDocument | Scope::Closed => (),
			}
		}
		if out.is_empty() {
			out.push('/');
		}
		out
	}
}

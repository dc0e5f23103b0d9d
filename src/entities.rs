/*!
# Entity references and output escaping

Only the five predefined entities and numeric character references are
understood. Anything else is reported as unsupported rather than passed
through.
*/
use bytes::BufMut;

use parsnip_validation::is_xml_char;

#[derive(Debug, Clone, PartialEq)]
pub enum ReferenceError {
	/// Not a well-formed reference, or a reference to a non-char.
	Invalid,
	/// A name which could be a user-defined entity.
	Undeclared,
}

fn resolve_named(name: &str) -> Option<char> {
	match name {
		"amp" => Some('&'),
		"lt" => Some('<'),
		"gt" => Some('>'),
		"quot" => Some('"'),
		"apos" => Some('\''),
		_ => None,
	}
}

fn resolve_char_ref(digits: &str, radix: u32) -> Result<char, ReferenceError> {
	if digits.is_empty() || !digits.bytes().all(|b| (b as char).is_digit(radix)) {
		return Err(ReferenceError::Invalid);
	}
	let cp = u32::from_str_radix(digits, radix).map_err(|_| ReferenceError::Invalid)?;
	if !is_xml_char(cp) {
		return Err(ReferenceError::Invalid);
	}
	std::char::from_u32(cp).ok_or(ReferenceError::Invalid)
}

/// Resolve the body of a reference (the part between `&` and `;`).
pub fn resolve(body: &str) -> Result<char, ReferenceError> {
	if let Some(hex) = body.strip_prefix("#x") {
		return resolve_char_ref(hex, 16);
	}
	if let Some(dec) = body.strip_prefix('#') {
		return resolve_char_ref(dec, 10);
	}
	match resolve_named(body) {
		Some(c) => Ok(c),
		None if parsnip_validation::validate_ncname(body).is_ok() => {
			Err(ReferenceError::Undeclared)
		}
		None => Err(ReferenceError::Invalid),
	}
}

/// Write `data` to `out`, replacing `" ' < > &` by their predefined
/// entities.
pub fn escape<B: BufMut>(out: &mut B, data: &[u8]) {
	let mut last_index = 0;
	for (i, ch) in data.iter().enumerate() {
		let replacement: &'static [u8] = match *ch {
			b'"' => b"&quot;",
			b'\'' => b"&apos;",
			b'<' => b"&lt;",
			b'>' => b"&gt;",
			b'&' => b"&amp;",
			_ => continue,
		};
		if i > last_index {
			out.put_slice(&data[last_index..i]);
		}
		out.put_slice(replacement);
		last_index = i + 1;
	}
	out.put_slice(&data[last_index..]);
}

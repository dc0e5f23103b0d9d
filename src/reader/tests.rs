use super::*;

use crate::namespaces::{XMLNS_XML, XMLNS_XMLNS};

fn reader(doc: &str) -> Reader<&[u8]> {
	Reader::new(doc.as_bytes())
}

/// Reader which fetches a single byte per read call.
fn trickling_reader(doc: &str) -> Reader<&[u8]> {
	Reader::with_options(doc.as_bytes(), ReaderOptions::default().chunk_size(1))
}

fn open(reader: &mut Reader<&[u8]>, name: &str) {
	reader.begin_tag().unwrap();
	assert_eq!(reader.next_tag_name().unwrap(), name);
}

#[test]
fn reader_reads_self_closing_tag() {
	let mut r = reader("<test/>");
	assert_eq!(r.peek().unwrap(), Token::BeginTag);
	r.begin_tag().unwrap();
	assert_eq!(r.peek().unwrap(), Token::ElementName);
	assert_eq!(r.next_tag_name().unwrap(), "test");
	assert_eq!(r.peek().unwrap(), Token::EndTag);
	r.end_tag().unwrap();
	assert_eq!(r.peek().unwrap(), Token::EndDocument);
	assert_eq!(r.depth(), 0);
}

#[test]
fn reader_tolerates_whitespace_inside_tags() {
	let mut r = reader("< test />");
	open(&mut r, "test");
	r.end_tag().unwrap();
	assert_eq!(r.peek().unwrap(), Token::EndDocument);
}

#[test]
fn reader_reads_open_and_close_tag() {
	let mut r = reader("<test></test>");
	open(&mut r, "test");
	r.end_tag().unwrap();
	assert_eq!(r.peek().unwrap(), Token::EndDocument);
}

#[test]
fn reader_reads_nested_tags() {
	let mut r = reader("<test1><test2/></test1>");
	open(&mut r, "test1");
	open(&mut r, "test2");
	assert_eq!(r.depth(), 2);
	r.end_tag().unwrap();
	r.end_tag().unwrap();
	assert_eq!(r.peek().unwrap(), Token::EndDocument);
}

#[test]
fn reader_reads_nested_tags_with_whitespace() {
	let mut r = reader("<test1>\n  <test2/>\n</test1>\n");
	open(&mut r, "test1");
	open(&mut r, "test2");
	r.end_tag().unwrap();
	r.end_tag().unwrap();
	assert_eq!(r.peek().unwrap(), Token::EndDocument);
}

#[test]
fn reader_skips_xml_declaration() {
	let mut r = reader("<?xml version='1.0' encoding='utf-8'?>\n<test/>");
	open(&mut r, "test");
	r.end_tag().unwrap();
	assert_eq!(r.peek().unwrap(), Token::EndDocument);
}

#[test]
fn reader_skips_comments() {
	let mut r = reader("<!-- before --><test><!-- inside --></test><!-- after -->");
	open(&mut r, "test");
	assert_eq!(r.peek().unwrap(), Token::EndTag);
	r.end_tag().unwrap();
	assert_eq!(r.peek().unwrap(), Token::EndDocument);
}

#[test]
fn reader_skips_byte_order_mark() {
	let mut r = reader("\u{feff}<test/>");
	open(&mut r, "test");
	r.end_tag().unwrap();
}

#[test]
fn reader_reads_text() {
	let mut r = reader("<test>text</test>");
	open(&mut r, "test");
	assert_eq!(r.peek().unwrap(), Token::Text);
	assert_eq!(r.next_text().unwrap(), "text");
	r.end_tag().unwrap();
}

#[test]
fn reader_returns_empty_text_for_empty_element() {
	let mut r = reader("<test></test>");
	open(&mut r, "test");
	assert_eq!(r.next_text().unwrap(), "");
	r.end_tag().unwrap();

	let mut r = reader("<test/>");
	open(&mut r, "test");
	assert_eq!(r.next_text().unwrap(), "");
	r.end_tag().unwrap();
}

#[test]
fn reader_reads_single_quoted_attribute() {
	let mut r = reader("<test attribute='value'/>");
	open(&mut r, "test");
	assert_eq!(r.peek().unwrap(), Token::Attribute);
	assert_eq!(r.next_attribute().unwrap(), "attribute");
	assert_eq!(r.peek().unwrap(), Token::Value);
	assert_eq!(r.next_value().unwrap(), "value");
	r.end_tag().unwrap();
}

#[test]
fn reader_reads_double_quoted_attribute() {
	let mut r = reader("<test attribute=\"value\"/>");
	open(&mut r, "test");
	assert_eq!(r.next_attribute().unwrap(), "attribute");
	assert_eq!(r.next_value().unwrap(), "value");
	r.end_tag().unwrap();
}

#[test]
fn reader_reads_multiple_attributes() {
	let mut r = reader("<test attribute1='value1' attribute2 = \"value2\"></test>");
	open(&mut r, "test");
	assert_eq!(r.next_attribute().unwrap(), "attribute1");
	assert_eq!(r.next_value().unwrap(), "value1");
	assert_eq!(r.next_attribute().unwrap(), "attribute2");
	assert_eq!(r.next_value().unwrap(), "value2");
	assert_eq!(r.peek().unwrap(), Token::EndTag);
	r.end_tag().unwrap();
}

#[test]
fn reader_keeps_other_quote_inside_value() {
	let mut r = reader("<test a=\"it's\" b='say \"hi\"'/>");
	open(&mut r, "test");
	r.next_attribute().unwrap();
	assert_eq!(r.next_value().unwrap(), "it's");
	r.next_attribute().unwrap();
	assert_eq!(r.next_value().unwrap(), "say \"hi\"");
}

#[test]
fn reader_resolves_namespaced_tag_name() {
	let mut r = reader("<test1 xmlns:ns='foo'><ns:test2/></test1>");
	open(&mut r, "test1");
	r.next_attribute().unwrap();
	assert_eq!(r.next_value().unwrap(), "foo");
	r.begin_tag().unwrap();
	let name = r.next_tag_qname().unwrap();
	assert_eq!(name.local, "test2");
	assert_eq!(name.prefix.as_deref(), Some("ns"));
	assert_eq!(name.namespace_str(), Some("foo"));
}

#[test]
fn reader_resolves_namespaced_attribute() {
	let mut r = reader("<test xmlns:ns='foo' ns:attribute='value'/>");
	open(&mut r, "test");
	let decl = r.next_attribute_qname().unwrap();
	assert_eq!(decl.local, "ns");
	assert_eq!(decl.namespace_str(), Some(XMLNS_XMLNS));
	assert_eq!(r.next_value().unwrap(), "foo");
	let attr = r.next_attribute_qname().unwrap();
	assert_eq!(attr.local, "attribute");
	assert_eq!(attr.namespace_str(), Some("foo"));
	assert_eq!(r.next_value().unwrap(), "value");
	r.end_tag().unwrap();
}

#[test]
fn reader_uses_innermost_redeclared_prefix() {
	let mut r = reader(
		"<test1 xmlns:ns='foo'><test2 xmlns:ns='bar' ns:attribute='value'/><ns:test3/></test1>",
	);
	open(&mut r, "test1");
	r.next_attribute().unwrap();
	r.next_value().unwrap();
	open(&mut r, "test2");
	r.next_attribute().unwrap();
	r.next_value().unwrap();
	let attr = r.next_attribute_qname().unwrap();
	assert_eq!(attr.local, "attribute");
	assert_eq!(attr.namespace_str(), Some("bar"));
	assert_eq!(r.next_value().unwrap(), "value");
	r.end_tag().unwrap();
	r.begin_tag().unwrap();
	assert_eq!(r.next_tag_qname().unwrap().namespace_str(), Some("foo"));
}

#[test]
fn reader_forgets_declarations_of_closed_siblings() {
	let mut r = reader("<test1><test2 xmlns:ns='foo'/><test3 ns:attribute='value'/></test1>");
	open(&mut r, "test1");
	open(&mut r, "test2");
	r.next_attribute().unwrap();
	r.next_value().unwrap();
	r.end_tag().unwrap();
	open(&mut r, "test3");
	let attr = r.next_attribute_qname().unwrap();
	assert_eq!(attr.local, "ns:attribute");
	assert_eq!(attr.prefix, None);
	assert_eq!(attr.namespace, None);
	assert_eq!(r.next_value().unwrap(), "value");
}

#[test]
fn reader_applies_default_namespace_to_children() {
	let mut r = reader("<test1 xmlns='foo'><test2 attribute='value'/></test1>");
	open(&mut r, "test1");
	let decl = r.next_attribute_qname().unwrap();
	assert_eq!(decl.local, "xmlns");
	assert_eq!(r.next_value().unwrap(), "foo");
	r.begin_tag().unwrap();
	let child = r.next_tag_qname().unwrap();
	assert_eq!(child.local, "test2");
	assert_eq!(child.namespace_str(), Some("foo"));
	let attr = r.next_attribute_qname().unwrap();
	assert_eq!(attr.local, "attribute");
	assert_eq!(attr.namespace, None);
}

#[test]
fn reader_reads_attribute_after_default_namespace() {
	let mut r = reader("<test xmlns='foo' attribute='value'/>");
	open(&mut r, "test");
	r.next_attribute().unwrap();
	r.next_value().unwrap();
	assert_eq!(r.next_attribute().unwrap(), "attribute");
	assert_eq!(r.next_value().unwrap(), "value");
}

#[test]
fn reader_can_undeclare_default_namespace() {
	let mut r = reader("<a xmlns='foo'><b xmlns=''><c/></b></a>");
	open(&mut r, "a");
	r.next_attribute().unwrap();
	r.next_value().unwrap();
	open(&mut r, "b");
	r.next_attribute().unwrap();
	r.next_value().unwrap();
	r.begin_tag().unwrap();
	assert_eq!(r.next_tag_qname().unwrap().namespace, None);
}

#[test]
fn reader_resolves_predeclared_xml_prefix() {
	let mut r = reader("<a xml:lang='en'/>");
	open(&mut r, "a");
	let attr = r.next_attribute_qname().unwrap();
	assert_eq!(attr.local, "lang");
	assert_eq!(attr.namespace_str(), Some(XMLNS_XML));
}

#[test]
fn reader_rejects_undeclared_prefix_in_strict_mode() {
	let mut r = Reader::with_options(
		&b"<ns:a/>"[..],
		ReaderOptions::default().strict_namespaces(true),
	);
	r.begin_tag().unwrap();
	match r.next_tag_qname() {
		Err(Error::Syntax(SyntaxError::UndeclaredNamespacePrefix(p), _)) => assert_eq!(p, "ns"),
		other => panic!("unexpected read result: {:?}", other),
	}
}

#[test]
fn reader_rejects_rebinding_xmlns_prefix() {
	let mut r = reader("<a xmlns:xmlns='foo'/>");
	open(&mut r, "a");
	r.next_attribute().unwrap();
	match r.next_value() {
		Err(Error::Syntax(SyntaxError::ReservedNamespacePrefix(_), _)) => (),
		other => panic!("unexpected read result: {:?}", other),
	}
}

#[test]
fn reader_reads_cdata_verbatim() {
	let mut r = reader("<test><![CDATA[<a>text</b>]]></test>");
	open(&mut r, "test");
	assert_eq!(r.peek().unwrap(), Token::Text);
	assert_eq!(r.next_text().unwrap(), "<a>text</b>");
	r.end_tag().unwrap();
}

#[test]
fn reader_concatenates_text_cdata_and_comments() {
	let mut r = reader("<a>foo <![CDATA[<bar> &amp;]]><!-- x -->baz &lt;</a>");
	open(&mut r, "a");
	assert_eq!(r.next_text().unwrap(), "foo <bar> &amp;baz <");
	assert_eq!(r.peek().unwrap(), Token::EndTag);
	r.end_tag().unwrap();
}

#[test]
fn reader_keeps_whitespace_after_cdata_and_comments() {
	let mut r = reader("<a><![CDATA[x]]> more <!-- c --> end</a>");
	open(&mut r, "a");
	assert_eq!(r.next_text().unwrap(), "x more  end");
	r.end_tag().unwrap();
}

#[test]
fn reader_stops_text_at_child_element() {
	let mut r = reader("<a>before<b/>after</a>");
	open(&mut r, "a");
	assert_eq!(r.next_text().unwrap(), "before");
	assert_eq!(r.peek().unwrap(), Token::BeginTag);
	open(&mut r, "b");
	r.end_tag().unwrap();
	assert_eq!(r.next_text().unwrap(), "after");
	r.end_tag().unwrap();
}

#[test]
fn reader_expands_references() {
	let mut r = reader("<a v='&quot;&apos;&lt;&gt;&amp;'>&#65;&#x42;&#x1F600;</a>");
	open(&mut r, "a");
	r.next_attribute().unwrap();
	assert_eq!(r.next_value().unwrap(), "\"'<>&");
	assert_eq!(r.next_text().unwrap(), "AB\u{1f600}");
}

#[test]
fn reader_expands_references_with_leading_zeros() {
	let mut r = trickling_reader("<a v='&#x0000041;'>&#0000065;&#x00000000000042;</a>");
	open(&mut r, "a");
	r.next_attribute().unwrap();
	assert_eq!(r.next_value().unwrap(), "A");
	assert_eq!(r.next_text().unwrap(), "AB");
	r.end_tag().unwrap();
}

#[test]
fn reader_rejects_user_defined_entity() {
	let mut r = reader("<a>&nbsp;</a>");
	open(&mut r, "a");
	match r.next_text() {
		Err(Error::Unsupported(ERRCTX_REF, path)) => assert_eq!(path, "/a/text()"),
		other => panic!("unexpected read result: {:?}", other),
	}
}

#[test]
fn reader_rejects_malformed_references() {
	for doc in &["<a>&#xZZ;</a>", "<a>&#0;</a>", "<a>&amp and more</a>","<a>& b;</a>"] {
		let mut r = reader(doc);
		open(&mut r, "a");
		match r.next_text() {
			Err(Error::Syntax(SyntaxError::InvalidReference(_), _)) => (),
			other => panic!("unexpected read result for {:?}: {:?}", doc, other),
		}
	}
}

#[test]
fn reader_reports_unterminated_reference_at_eof() {
	let mut r = reader("<a>&#x0000041");
	open(&mut r, "a");
	match r.next_text() {
		Err(Error::UnexpectedEof(ERRCTX_REF, _)) => (),
		other => panic!("unexpected read result: {:?}", other),
	}
}

#[test]
fn reader_requires_whitespace_between_attributes() {
	let mut r = reader("<a b='1'c='2'/>");
	open(&mut r, "a");
	assert_eq!(r.next_attribute().unwrap(), "b");
	assert_eq!(r.next_value().unwrap(), "1");
	match r.peek() {
		Err(Error::Syntax(SyntaxError::UnexpectedByte(ERRCTX_ELEMENT, b'c', _), path)) => {
			assert_eq!(path, "/a[@b]")
		}
		other => panic!("unexpected read result: {:?}", other),
	}

	let mut r = reader("<a b=\"1\"\tc='2' d='3'/>");
	open(&mut r, "a");
	r.skip().unwrap();
	assert_eq!(r.next_attribute().unwrap(), "c");
	assert_eq!(r.next_value().unwrap(), "2");
	assert_eq!(r.next_attribute().unwrap(), "d");
	assert_eq!(r.next_value().unwrap(), "3");
	assert_eq!(r.peek().unwrap(), Token::EndTag);

	let mut r = reader("<a b='1'/>");
	open(&mut r, "a");
	r.skip().unwrap();
	assert_eq!(r.peek().unwrap(), Token::EndTag);
}

#[test]
fn reader_rejects_xmlns_with_empty_alias() {
	let mut r = reader("<a xmlns:='urn:x'/>");
	open(&mut r, "a");
	match r.next_attribute_qname() {
		Err(Error::Syntax(SyntaxError::EmptyName(ERRCTX_ATTNAME), _)) => (),
		other => panic!("unexpected read result: {:?}", other),
	}

	let mut r = reader("<a xmlns:1x='urn:x'/>");
	open(&mut r, "a");
	match r.next_attribute_qname() {
		Err(Error::Syntax(SyntaxError::InvalidChar(ERRCTX_ATTNAME, '1'), _)) => (),
		other => panic!("unexpected read result: {:?}", other),
	}
}

#[test]
fn reader_keeps_names_with_malformed_prefix_literally() {
	let mut r = reader("<a xmlns:a='urn:a'><a:1b a:c:d='x'/></a>");
	open(&mut r, "a");
	r.skip().unwrap();
	r.begin_tag().unwrap();
	let name = r.next_tag_qname().unwrap();
	assert_eq!(name.prefix, None);
	assert_eq!(name.local, "a:1b");
	assert_eq!(name.namespace, None);
	let attr = r.next_attribute_qname().unwrap();
	assert_eq!(attr.local, "a:c:d");
	assert_eq!(attr.namespace, None);
}

#[test]
fn reader_rejects_lt_in_attribute_value() {
	let mut r = reader("<a v='<'/>");
	open(&mut r, "a");
	r.next_attribute().unwrap();
	match r.next_value() {
		Err(Error::Syntax(SyntaxError::UnexpectedByte(ERRCTX_ATTVAL, b'<', _), _)) => (),
		other => panic!("unexpected read result: {:?}", other),
	}
}

#[test]
fn reader_fails_on_unterminated_self_closing_tag() {
	let mut r = reader("<test/");
	open(&mut r, "test");
	match r.end_tag() {
		Err(Error::UnexpectedEof(_, _)) => (),
		other => panic!("unexpected read result: {:?}", other),
	}
}

#[test]
fn reader_fails_on_garbage_after_slash() {
	let mut r = reader("<test/!");
	open(&mut r, "test");
	match r.end_tag() {
		Err(Error::Syntax(SyntaxError::UnexpectedByte(ERRCTX_ELEMENT_CLOSE, b'!', _), path)) => {
			assert_eq!(path, "/test")
		}
		other => panic!("unexpected read result: {:?}", other),
	}
}

#[test]
fn reader_fails_on_unterminated_end_tag() {
	let mut r = reader("<test></test");
	open(&mut r, "test");
	match r.end_tag() {
		Err(Error::UnexpectedEof(_, _)) => (),
		other => panic!("unexpected read result: {:?}", other),
	}
}

#[test]
fn reader_fails_on_garbage_in_end_tag() {
	let mut r = reader("<test></test!>");
	open(&mut r, "test");
	match r.end_tag() {
		Err(Error::Syntax(SyntaxError::InvalidChar(ERRCTX_ELEMENT_FOOT, '!'), _)) => (),
		other => panic!("unexpected read result: {:?}", other),
	}
}

#[test]
fn reader_fails_on_mismatched_end_tag() {
	let mut r = reader("<test></nope>");
	open(&mut r, "test");
	match r.end_tag() {
		Err(Error::Syntax(SyntaxError::ElementMismatch { expected, found }, path)) => {
			assert_eq!(expected, "test");
			assert_eq!(found, "nope");
			assert_eq!(path, "/test/text()");
		}
		other => panic!("unexpected read result: {:?}", other),
	}
}

#[test]
fn reader_fails_on_duplicate_attribute() {
	let mut r = reader("<test attribute='v1' attribute='v2'/>");
	open(&mut r, "test");
	r.next_attribute().unwrap();
	r.next_value().unwrap();
	match r.next_attribute() {
		Err(Error::Syntax(SyntaxError::DuplicateAttribute(name), _)) => {
			assert_eq!(name, "attribute")
		}
		other => panic!("unexpected read result: {:?}", other),
	}
}

#[test]
fn reader_detects_duplicates_by_resolved_namespace() {
	let mut r = reader("<a xmlns:p='u' xmlns:q='u' p:x='1' q:x='2'/>");
	open(&mut r, "a");
	for _ in 0..3 {
		r.next_attribute().unwrap();
		r.next_value().unwrap();
	}
	match r.next_attribute() {
		Err(Error::Syntax(SyntaxError::DuplicateAttribute(name), _)) => assert_eq!(name, "{u}x"),
		other => panic!("unexpected read result: {:?}", other),
	}

	let mut r = reader("<a xmlns:p='u' x='1' p:x='2'/>");
	open(&mut r, "a");
	for _ in 0..3 {
		r.next_attribute().unwrap();
		r.next_value().unwrap();
	}
	r.end_tag().unwrap();
}

#[test]
fn reader_reports_attribute_in_path() {
	let mut r = reader("<root><child attr='x'/></root>");
	open(&mut r, "root");
	open(&mut r, "child");
	r.next_attribute().unwrap();
	assert_eq!(r.path(), "/root/child[@attr]");
}

#[test]
fn reader_peek_is_idempotent() {
	let mut r = reader("<a>text</a>");
	assert_eq!(r.peek().unwrap(), Token::BeginTag);
	assert_eq!(r.peek().unwrap(), Token::BeginTag);
	open(&mut r, "a");
	assert_eq!(r.peek().unwrap(), Token::Text);
	assert_eq!(r.peek().unwrap(), Token::Text);
	assert_eq!(r.next_text().unwrap(), "text");
}

#[test]
fn reader_rejects_wrong_operation_for_token() {
	let mut r = reader("<a>text</a>");
	open(&mut r, "a");
	match r.end_tag() {
		Err(Error::Syntax(
			SyntaxError::UnexpectedToken {
				expected: Token::EndTag,
				found: Token::Text,
			},
			_,
		)) => (),
		other => panic!("unexpected read result: {:?}", other),
	}
	assert_eq!(r.next_text().unwrap(), "text");
}

#[test]
fn reader_skip_discards_whole_element() {
	let mut r = reader("<root><skip a='1'><x>t</x><![CDATA[</skip>]]></skip><keep/></root>");
	open(&mut r, "root");
	assert_eq!(r.peek().unwrap(), Token::BeginTag);
	r.skip().unwrap();
	open(&mut r, "keep");
	r.end_tag().unwrap();
	r.end_tag().unwrap();
	assert_eq!(r.peek().unwrap(), Token::EndDocument);
}

#[test]
fn reader_skip_discards_single_units() {
	let mut r = reader("<root a='1' b='2'>text<c/></root>");
	r.begin_tag().unwrap();
	r.skip().unwrap();
	assert_eq!(r.peek().unwrap(), Token::Attribute);
	r.skip().unwrap();
	assert_eq!(r.next_attribute().unwrap(), "b");
	r.skip().unwrap();
	assert_eq!(r.peek().unwrap(), Token::Text);
	r.skip().unwrap();
	assert_eq!(r.peek().unwrap(), Token::BeginTag);
	r.skip().unwrap();
	r.skip().unwrap();
	match r.skip() {
		Err(Error::UnexpectedEof(ERRCTX_DOCUMENT_END, _)) => (),
		other => panic!("unexpected read result: {:?}", other),
	}
}

#[test]
fn reader_skip_still_records_namespace_declarations() {
	let mut r = reader("<a xmlns:ns='foo'><ns:b/></a>");
	open(&mut r, "a");
	r.skip().unwrap();
	r.begin_tag().unwrap();
	assert_eq!(r.next_tag_qname().unwrap().namespace_str(), Some("foo"));
}

#[test]
fn reader_skip_tag_discards_rest_of_element() {
	let mut r = reader("<root><a x='1'><b/>text<![CDATA[</a>]]><b></b></a><c/></root>");
	open(&mut r, "root");
	open(&mut r, "a");
	r.skip_tag().unwrap();
	assert_eq!(r.depth(), 1);
	open(&mut r, "c");
	r.end_tag().unwrap();
	r.end_tag().unwrap();
	assert_eq!(r.peek().unwrap(), Token::EndDocument);
}

#[test]
fn reader_skip_tag_requires_open_element() {
	let mut r = reader("<a/>");
	match r.skip_tag() {
		Err(Error::Misuse(MisuseError::NoOpenElement, _)) => (),
		other => panic!("unexpected read result: {:?}", other),
	}
}

#[test]
fn reader_skips_doctype_before_root() {
	let mut r = reader("<!DOCTYPE html><html/>");
	open(&mut r, "html");
	r.end_tag().unwrap();

	let mut r = reader("<!DOCTYPE root SYSTEM \"root.dtd\">\n<root/>");
	open(&mut r, "root");
	r.end_tag().unwrap();
	assert_eq!(r.peek().unwrap(), Token::EndDocument);
}

#[test]
fn reader_rejects_internal_subsets() {
	for doc in &[
		"<!DOCTYPE root [<!ENTITY x 'y'>]><root/>",
		"<!DOCTYPE a [<!ATTLIST a b CDATA 'dflt'>]><a/>",
		"<!DOCTYPE root [<!ELEMENT root ANY>]>\n<root/>",
	] {
		let mut r = reader(doc);
		match r.peek() {
			Err(Error::Unsupported(ERRCTX_DOCTYPE, path)) => assert_eq!(path, "/"),
			other => panic!("unexpected read result for {:?}: {:?}", doc, other),
		}
	}
}

#[test]
fn reader_rejects_doctype_inside_root() {
	let mut r = reader("<root><!DOCTYPE root></root>");
	open(&mut r, "root");
	match r.peek() {
		Err(Error::Syntax(SyntaxError::MisplacedDoctype, _)) => (),
		other => panic!("unexpected read result: {:?}", other),
	}
}

#[test]
fn reader_rejects_content_after_root() {
	let mut r = reader("<a/>junk");
	open(&mut r, "a");
	r.end_tag().unwrap();
	match r.peek() {
		Err(Error::Syntax(SyntaxError::ContentAfterRoot, _)) => (),
		other => panic!("unexpected read result: {:?}", other),
	}

	let mut r = reader("<a/><b/>");
	open(&mut r, "a");
	r.end_tag().unwrap();
	match r.peek() {
		Err(Error::Syntax(SyntaxError::MultipleRoots, _)) => (),
		other => panic!("unexpected read result: {:?}", other),
	}
}

#[test]
fn reader_allows_comments_and_whitespace_after_root() {
	let mut r = reader("<a/>\n<!-- trailer -->\n<?pi x?>\n");
	open(&mut r, "a");
	r.end_tag().unwrap();
	assert_eq!(r.peek().unwrap(), Token::EndDocument);
}

#[test]
fn reader_fails_on_unterminated_element() {
	let mut r = reader("<a><b/>");
	open(&mut r, "a");
	open(&mut r, "b");
	r.end_tag().unwrap();
	match r.peek() {
		Err(Error::UnexpectedEof(ERRCTX_ELEMENT, path)) => assert_eq!(path, "/a/text()"),
		other => panic!("unexpected read result: {:?}", other),
	}
}

#[test]
fn reader_fails_on_unterminated_comment() {
	let mut r = reader("<a><!-- never closed</a>");
	open(&mut r, "a");
	match r.peek() {
		Err(Error::UnexpectedEof(ERRCTX_COMMENT, _)) => (),
		other => panic!("unexpected read result: {:?}", other),
	}
}

#[test]
fn reader_fails_on_unterminated_cdata() {
	let mut r = reader("<a><![CDATA[never closed</a>");
	open(&mut r, "a");
	match r.next_text() {
		Err(Error::UnexpectedEof(ERRCTX_CDATA_SECTION, _)) => (),
		other => panic!("unexpected read result: {:?}", other),
	}
}

#[test]
fn reader_rejects_missing_equals_sign() {
	let mut r = reader("<a b 'c'/>");
	open(&mut r, "a");
	r.next_attribute().unwrap();
	match r.next_value() {
		Err(Error::Syntax(SyntaxError::UnexpectedByte(ERRCTX_ATTNAME, b'\'', _), path)) => {
			assert_eq!(path, "/a[@b]")
		}
		other => panic!("unexpected read result: {:?}", other),
	}
}

#[test]
fn reader_rejects_unquoted_value() {
	let mut r = reader("<a b=c/>");
	open(&mut r, "a");
	r.next_attribute().unwrap();
	match r.peek() {
		Err(Error::Syntax(SyntaxError::UnexpectedByte(ERRCTX_ATTVAL, b'c', _), _)) => (),
		other => panic!("unexpected read result: {:?}", other),
	}
}

#[test]
fn reader_rejects_text_before_root() {
	let mut r = reader("hello");
	match r.peek() {
		Err(Error::Syntax(SyntaxError::UnexpectedByte(ERRCTX_DOCUMENT, b'h', _), path)) => {
			assert_eq!(path, "/")
		}
		other => panic!("unexpected read result: {:?}", other),
	}
}

#[test]
fn reader_reports_empty_input_as_end_of_document() {
	let mut r = reader("  \n");
	assert_eq!(r.peek().unwrap(), Token::EndDocument);
}

#[test]
fn reader_enforces_max_depth() {
	let mut r = Reader::with_options(
		&b"<a><b><c/></b></a>"[..],
		ReaderOptions::default().max_depth(2),
	);
	open(&mut r, "a");
	open(&mut r, "b");
	match r.begin_tag() {
		Err(Error::Syntax(SyntaxError::DepthLimitExceeded(2), _)) => (),
		other => panic!("unexpected read result: {:?}", other),
	}
}

#[test]
fn reader_handles_single_byte_chunks() {
	let doc = "\u{feff}<?xml version='1.0'?>\n<!DOCTYPE root>\n<root xmlns='urn:x' a=\"1 &amp; 2\"><!-- c --><child>t&#x41;xt \u{e9}</child><![CDATA[x]]]></root>";
	let mut r = trickling_reader(doc);
	r.begin_tag().unwrap();
	let root = r.next_tag_qname().unwrap();
	assert_eq!(root.local, "root");
	r.next_attribute().unwrap();
	assert_eq!(r.next_value().unwrap(), "urn:x");
	assert_eq!(r.next_attribute().unwrap(), "a");
	assert_eq!(r.next_value().unwrap(), "1 & 2");
	r.begin_tag().unwrap();
	let child = r.next_tag_qname().unwrap();
	assert_eq!(child.namespace_str(), Some("urn:x"));
	assert_eq!(r.next_text().unwrap(), "tAxt \u{e9}");
	r.end_tag().unwrap();
	assert_eq!(r.next_text().unwrap(), "x]");
	r.end_tag().unwrap();
	assert_eq!(r.peek().unwrap(), Token::EndDocument);
}

#[test]
fn reader_rejects_invalid_utf8() {
	let mut r = Reader::new(&b"<a>\xff</a>"[..]);
	r.begin_tag().unwrap();
	r.next_tag_name().unwrap();
	match r.next_text() {
		Err(Error::Syntax(SyntaxError::InvalidUtf8(ERRCTX_TEXT), _)) => (),
		other => panic!("unexpected read result: {:?}", other),
	}
}

#[test]
fn reader_rejects_non_xml_chars() {
	let mut r = reader("<a>x\u{1}y</a>");
	open(&mut r, "a");
	match r.next_text() {
		Err(Error::Syntax(SyntaxError::InvalidChar(ERRCTX_TEXT, '\u{1}'), _)) => (),
		other => panic!("unexpected read result: {:?}", other),
	}

	let mut r = reader("<a v='\u{1b}'/>");
	open(&mut r, "a");
	r.next_attribute().unwrap();
	match r.next_value() {
		Err(Error::Syntax(SyntaxError::InvalidChar(ERRCTX_ATTVAL, '\u{1b}'), _)) => (),
		other => panic!("unexpected read result: {:?}", other),
	}

	let mut r = reader("<a><![CDATA[\u{fffe}]]></a>");
	open(&mut r, "a");
	match r.next_text() {
		Err(Error::Syntax(SyntaxError::InvalidChar(ERRCTX_CDATA_SECTION, '\u{fffe}'), _)) => (),
		other => panic!("unexpected read result: {:?}", other),
	}
}

#[test]
fn reader_passes_io_errors_through() {
	struct Blocking;
	impl io::Read for Blocking {
		fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
			Err(io::Error::new(io::ErrorKind::WouldBlock, "later"))
		}
	}
	let mut r = Reader::new(Blocking);
	match r.peek() {
		Err(Error::IO(e)) => assert_eq!(e.kind(), io::ErrorKind::WouldBlock),
		other => panic!("unexpected read result: {:?}", other),
	}
}

#[test]
fn reader_fails_after_close() {
	let mut r = reader("<a/>");
	r.close();
	match r.peek() {
		Err(Error::Misuse(MisuseError::Closed, _)) => (),
		other => panic!("unexpected read result: {:?}", other),
	}
}

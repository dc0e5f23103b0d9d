pub const ERRCTX_DOCUMENT: &'static str = "at document level";
pub const ERRCTX_DOCUMENT_END: &'static str = "at end of document";
pub const ERRCTX_TEXT: &'static str = "in text node";
pub const ERRCTX_ATTVAL: &'static str = "in attribute value";
pub const ERRCTX_ATTNAME: &'static str = "in attribute name";
pub const ERRCTX_NAME: &'static str = "in element name";
pub const ERRCTX_NAMESTART: &'static str = "at start of name";
pub const ERRCTX_ELEMENT: &'static str = "in element";
pub const ERRCTX_ELEMENT_FOOT: &'static str = "in element footer";
pub const ERRCTX_ELEMENT_CLOSE: &'static str = "at element close";
pub const ERRCTX_CDATA_SECTION: &'static str = "in CDATA section";
pub const ERRCTX_MARKUP_DECL: &'static str = "in markup declaration";
pub const ERRCTX_COMMENT: &'static str = "in comment";
pub const ERRCTX_PI: &'static str = "in processing instruction";
pub const ERRCTX_DOCTYPE: &'static str = "in DOCTYPE declaration";
pub const ERRCTX_REF: &'static str = "in entity or character reference";

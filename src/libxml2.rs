//! LibXML2 FFI Wrapper Module
//!
//! Thin, safe wrapper around the libxml2 document parser running in recovery
//! mode. Malformed input (unclosed tags, stray end tags, undeclared namespace
//! prefixes) still yields the partial tree libxml2 managed to build, which is
//! exactly the tolerance patent data dumps need.
//!
//! The libxml2 document never escapes this module: it is converted into an
//! owned [`XmlDocument`] and freed before `parse_document` returns.
//!
//! ## Thread Safety
//!
//! libxml2 global initialization is not thread-safe and is guarded by
//! [`std::sync::Once`]. After that, parsing with separate parser contexts is
//! safe to run concurrently; every call here creates and frees its own context.

use std::ffi::{CStr, CString};
use std::marker::PhantomData;
use std::ptr;
use std::sync::Once;

use libc::{c_char, c_int, c_uchar, c_void};

use crate::document::{XmlAttribute, XmlDocument, XmlElement, XmlNode};
use crate::error::{LibXml2Error, LibXml2Result};

/// Global initialization flag for libxml2
static LIBXML2_INIT: Once = Once::new();

// xmlParserOption flags
const XML_PARSE_RECOVER: c_int = 1 << 0;
const XML_PARSE_NOENT: c_int = 1 << 1;
const XML_PARSE_NOERROR: c_int = 1 << 5;
const XML_PARSE_NOWARNING: c_int = 1 << 6;
const XML_PARSE_NONET: c_int = 1 << 11;
const XML_PARSE_HUGE: c_int = 1 << 19;
const XML_PARSE_IGNORE_ENC: c_int = 1 << 21;

/// Options used for every parse. The input handed to libxml2 is always UTF-8,
/// so the document's own encoding declaration is ignored. Internal DTD
/// entities are substituted; external ones are never fetched.
pub const RECOVERY_OPTIONS: c_int = XML_PARSE_RECOVER
    | XML_PARSE_NOENT
    | XML_PARSE_NOERROR
    | XML_PARSE_NOWARNING
    | XML_PARSE_NONET
    | XML_PARSE_HUGE
    | XML_PARSE_IGNORE_ENC;

// xmlElementType values
const XML_ELEMENT_NODE: c_int = 1;
const XML_TEXT_NODE: c_int = 3;
const XML_CDATA_SECTION_NODE: c_int = 4;

// xmlErrorLevel values
const XML_ERR_ERROR: c_int = 2;

/// Opaque libxml2 structures
#[repr(C)]
pub struct XmlDoc {
    _private: [u8; 0],
}

#[repr(C)]
pub struct XmlParserCtxt {
    _private: [u8; 0],
}

/// Leading fields of libxml2's `struct _xmlNode`. Only read through pointers
/// handed out by libxml2; never constructed on the Rust side.
#[repr(C)]
#[allow(dead_code)]
struct XmlNodeHead {
    _private: *mut c_void,
    node_type: c_int,
    name: *const c_uchar,
    children: *mut XmlNodeHead,
    last: *mut XmlNodeHead,
    parent: *mut XmlNodeHead,
    next: *mut XmlNodeHead,
    prev: *mut XmlNodeHead,
    doc: *mut XmlDoc,
    ns: *mut XmlNsHead,
    content: *mut c_uchar,
    properties: *mut XmlAttrHead,
}

/// Leading fields of `struct _xmlAttr`.
#[repr(C)]
#[allow(dead_code)]
struct XmlAttrHead {
    _private: *mut c_void,
    attr_type: c_int,
    name: *const c_uchar,
    children: *mut XmlNodeHead,
    last: *mut XmlNodeHead,
    parent: *mut XmlNodeHead,
    next: *mut XmlAttrHead,
    prev: *mut XmlAttrHead,
    doc: *mut XmlDoc,
    ns: *mut XmlNsHead,
}

/// Leading fields of `struct _xmlNs`.
#[repr(C)]
#[allow(dead_code)]
struct XmlNsHead {
    next: *mut XmlNsHead,
    ns_type: c_int,
    href: *const c_uchar,
    prefix: *const c_uchar,
}

#[repr(C)]
pub struct xmlError {
    pub domain: c_int,
    pub code: c_int,
    pub message: *const c_char,
    pub level: c_int,
    pub file: *const c_char,
    pub line: c_int,
    pub str1: *const c_char,
    pub str2: *const c_char,
    pub str3: *const c_char,
    pub int1: c_int,
    pub int2: c_int,
    pub ctxt: *mut c_void,
    pub node: *mut c_void,
}

// External libxml2 FFI declarations
#[cfg_attr(target_os = "windows", link(name = "libxml2"))]
#[cfg_attr(not(target_os = "windows"), link(name = "xml2"))]
unsafe extern "C" {
    fn xmlInitParser();

    fn xmlNewParserCtxt() -> *mut XmlParserCtxt;
    fn xmlFreeParserCtxt(ctxt: *mut XmlParserCtxt);
    fn xmlCtxtReadMemory(
        ctxt: *mut XmlParserCtxt,
        buffer: *const c_char,
        size: c_int,
        url: *const c_char,
        encoding: *const c_char,
        options: c_int,
    ) -> *mut XmlDoc;
    fn xmlCtxtGetLastError(ctx: *mut c_void) -> *const xmlError;

    fn xmlDocGetRootElement(doc: *const XmlDoc) -> *mut XmlNodeHead;
    fn xmlFreeDoc(doc: *mut XmlDoc);
}

/// The last error libxml2 recovered from while building a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveredError {
    pub code: i32,
    pub line: i32,
    pub message: String,
}

/// Result of a successful (possibly recovered) parse.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub document: XmlDocument,
    /// Set when libxml2 had to recover from malformed input
    pub recovered_error: Option<RecoveredError>,
}

impl ParsedDocument {
    pub fn was_recovered(&self) -> bool {
        self.recovered_error.is_some()
    }
}

/// Frees the parser context on drop.
struct ParserContext(*mut XmlParserCtxt);

impl Drop for ParserContext {
    fn drop(&mut self) {
        if !self.0.is_null() {
            unsafe { xmlFreeParserCtxt(self.0) };
        }
    }
}

/// Frees the document on drop.
struct DocumentHandle(*mut XmlDoc);

impl Drop for DocumentHandle {
    fn drop(&mut self) {
        if !self.0.is_null() {
            unsafe { xmlFreeDoc(self.0) };
        }
    }
}

/// Safe entry point into libxml2 parsing.
pub struct LibXml2Wrapper {
    _phantom: PhantomData<()>,
}

impl LibXml2Wrapper {
    /// Create a new wrapper, initializing libxml2 on first use.
    pub fn new() -> Self {
        LIBXML2_INIT.call_once(|| unsafe {
            xmlInitParser();
        });

        LibXml2Wrapper {
            _phantom: PhantomData,
        }
    }

    /// Parse UTF-8 encoded XML in recovery mode.
    ///
    /// # Errors
    ///
    /// Returns `LibXml2Error::DocumentParseFailed` when libxml2 produced no
    /// document at all and `LibXml2Error::EmptyDocument` when the recovered
    /// document has no root element.
    pub fn parse_document(&self, xml: &[u8], source_name: &str) -> LibXml2Result<ParsedDocument> {
        let size = c_int::try_from(xml.len())
            .map_err(|_| LibXml2Error::InputTooLarge { len: xml.len() })?;
        let url = CString::new(source_name).ok();
        let url_ptr = url.as_ref().map_or(ptr::null(), |u| u.as_ptr());

        unsafe {
            let ctxt = ParserContext(xmlNewParserCtxt());
            if ctxt.0.is_null() {
                return Err(LibXml2Error::ParserContextCreationFailed);
            }

            let doc = DocumentHandle(xmlCtxtReadMemory(
                ctxt.0,
                xml.as_ptr() as *const c_char,
                size,
                url_ptr,
                c"UTF-8".as_ptr(),
                RECOVERY_OPTIONS,
            ));
            let recovered_error = last_error(ctxt.0);

            if doc.0.is_null() {
                let details = recovered_error
                    .map(|e| e.message)
                    .unwrap_or_else(|| "no document produced".to_string());
                return Err(LibXml2Error::DocumentParseFailed { details });
            }

            let root = xmlDocGetRootElement(doc.0);
            if root.is_null() {
                return Err(LibXml2Error::EmptyDocument);
            }

            Ok(ParsedDocument {
                document: XmlDocument::new(convert_element(root)),
                recovered_error,
            })
        }
    }
}

impl Default for LibXml2Wrapper {
    fn default() -> Self {
        Self::new()
    }
}

unsafe fn last_error(ctxt: *mut XmlParserCtxt) -> Option<RecoveredError> {
    let error = unsafe { xmlCtxtGetLastError(ctxt as *mut c_void) };
    if error.is_null() {
        return None;
    }
    let error = unsafe { &*error };
    if error.code == 0 || error.level < XML_ERR_ERROR {
        return None;
    }

    let message = if error.message.is_null() {
        format!("libxml2 error code {}", error.code)
    } else {
        unsafe { CStr::from_ptr(error.message) }
            .to_string_lossy()
            .trim()
            .to_string()
    };

    Some(RecoveredError {
        code: error.code,
        line: error.line,
        message,
    })
}

unsafe fn xml_str(ptr: *const c_uchar) -> String {
    if ptr.is_null() {
        return String::new();
    }
    unsafe { CStr::from_ptr(ptr as *const c_char) }
        .to_string_lossy()
        .into_owned()
}

unsafe fn qualified_name(name: *const c_uchar, ns: *const XmlNsHead) -> String {
    let local = unsafe { xml_str(name) };
    if ns.is_null() {
        return local;
    }
    let prefix = unsafe { (*ns).prefix };
    if prefix.is_null() {
        local
    } else {
        format!("{}:{}", unsafe { xml_str(prefix) }, local)
    }
}

/// Concatenated content of the text and CDATA nodes in a sibling list.
unsafe fn sibling_text(mut node: *const XmlNodeHead) -> String {
    let mut text = String::new();
    while !node.is_null() {
        let current = unsafe { &*node };
        if matches!(current.node_type, XML_TEXT_NODE | XML_CDATA_SECTION_NODE) {
            text.push_str(&unsafe { xml_str(current.content) });
        }
        node = current.next;
    }
    text
}

unsafe fn convert_element(node: *const XmlNodeHead) -> XmlElement {
    let head = unsafe { &*node };
    let mut element = XmlElement::new(unsafe { qualified_name(head.name, head.ns) });

    let mut attr = head.properties as *const XmlAttrHead;
    while !attr.is_null() {
        let current = unsafe { &*attr };
        element.attributes.push(XmlAttribute {
            name: unsafe { qualified_name(current.name, current.ns) },
            value: unsafe { sibling_text(current.children) },
        });
        attr = current.next;
    }

    let mut child = head.children as *const XmlNodeHead;
    while !child.is_null() {
        let current = unsafe { &*child };
        match current.node_type {
            XML_ELEMENT_NODE => element
                .children
                .push(XmlNode::Element(unsafe { convert_element(child) })),
            XML_TEXT_NODE | XML_CDATA_SECTION_NODE => element
                .children
                .push(XmlNode::Text(unsafe { xml_str(current.content) })),
            _ => {}
        }
        child = current.next;
    }

    element
}

//! Tree walker: finds `document-id` candidates under `application-reference`.

use crate::document::{XmlDocument, XmlElement};
use crate::error_reporter::{ExtractionReporter, ExtractionWarning};

pub const APPLICATION_REFERENCE: &str = "application-reference";
pub const DOCUMENT_ID: &str = "document-id";
pub const DOC_NUMBER: &str = "doc-number";
pub const LOAD_SOURCE: &str = "load-source";

/// The `doc-number` of a candidate as found in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocNumberField {
    /// No `doc-number` child element
    Missing,
    /// Raw, untrimmed text of the first `doc-number` child
    Text(String),
}

/// One `document-id` element found under an `application-reference`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentIdCandidate {
    pub doc_number: DocNumberField,
    pub load_source: Option<String>,
    /// Position in document order across the whole traversal
    pub order: usize,
}

/// Result of walking a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkOutput {
    pub application_references: usize,
    pub candidates: Vec<DocumentIdCandidate>,
}

/// Walk `document` in pre-order and collect every `document-id` below an
/// `application-reference`, each exactly once.
pub fn walk(document: &XmlDocument, reporter: &dyn ExtractionReporter) -> WalkOutput {
    let mut output = WalkOutput::default();
    visit(&document.root, &mut output, reporter);
    output
}

fn visit(element: &XmlElement, output: &mut WalkOutput, reporter: &dyn ExtractionReporter) {
    if element.is_named(APPLICATION_REFERENCE) {
        output.application_references += 1;
        collect_block(element, 0, output, reporter);
        return;
    }
    for child in element.child_elements() {
        visit(child, output, reporter);
    }
}

/// Collect `document-id` descendants of a block. Nested
/// `application-reference`s are reported and folded into the outer block.
fn collect_block(
    element: &XmlElement,
    depth: usize,
    output: &mut WalkOutput,
    reporter: &dyn ExtractionReporter,
) {
    for child in element.child_elements() {
        if child.is_named(APPLICATION_REFERENCE) {
            reporter.warning(&ExtractionWarning::NestedApplicationReference { depth: depth + 1 });
            output.application_references += 1;
            collect_block(child, depth + 1, output, reporter);
            continue;
        }

        if child.is_named(DOCUMENT_ID) {
            let order = output.candidates.len();
            output.candidates.push(candidate(child, order));
        }
        collect_block(child, depth, output, reporter);
    }
}

fn candidate(document_id: &XmlElement, order: usize) -> DocumentIdCandidate {
    let doc_number = match document_id.first_child_named(DOC_NUMBER) {
        Some(element) => DocNumberField::Text(element.text()),
        None => DocNumberField::Missing,
    };

    DocumentIdCandidate {
        doc_number,
        load_source: document_id.attribute(LOAD_SOURCE).map(str::to_owned),
        order,
    }
}

use crate::errors::{AppError, AppResult};
use crate::report::layout::RenderedTable;

#[derive(Debug, Clone, PartialEq)]
pub enum DocumentElement {
    Table(RenderedTable),
    PageBreak,
}

/// Page-groups in order, separated by explicit breaks.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    elements: Vec<DocumentElement>,
}

impl Document {
    pub fn elements(&self) -> &[DocumentElement] {
        &self.elements
    }

    pub fn page_groups(&self) -> impl Iterator<Item = &RenderedTable> {
        self.elements.iter().filter_map(|e| match e {
            DocumentElement::Table(t) => Some(t),
            DocumentElement::PageBreak => None,
        })
    }

    pub fn page_break_count(&self) -> usize {
        self.elements
            .iter()
            .filter(|e| matches!(e, DocumentElement::PageBreak))
            .count()
    }
}

/// One page-group per table with a break between consecutive groups.
/// Callers must not pass an empty list.
pub fn assemble(tables: Vec<RenderedTable>) -> AppResult<Document> {
    if tables.is_empty() {
        return Err(AppError::EmptyDocument);
    }

    let mut elements = Vec::with_capacity(tables.len() * 2 - 1);
    for (i, table) in tables.into_iter().enumerate() {
        if i > 0 {
            elements.push(DocumentElement::PageBreak);
        }
        elements.push(DocumentElement::Table(table));
    }

    Ok(Document { elements })
}

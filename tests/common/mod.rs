use retrieva::core::document_source::DocumentSource;
use retrieva::core::error::Result;
use retrieva::core::types::DocId;

/// In-memory `DocumentSource` for tests: each document is given as a single
/// whitespace-separated string, split the same way `CsvDocumentSource` splits
/// its content columns.
pub struct InMemorySource {
    docs: Vec<(DocId, Vec<String>)>,
}

impl InMemorySource {
    pub fn new(docs: Vec<(&str, &str)>) -> Self {
        let docs = docs
            .into_iter()
            .map(|(id, content)| {
                (
                    DocId::new(id.to_string()),
                    content.split_whitespace().map(|w| w.to_string()).collect(),
                )
            })
            .collect();
        InMemorySource { docs }
    }
}

impl DocumentSource for InMemorySource {
    fn read_all(&mut self) -> Result<Vec<(DocId, Vec<String>)>> {
        Ok(self.docs.clone())
    }
}

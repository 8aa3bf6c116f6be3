use std::fs::File;
use std::path::Path;

use unicode_segmentation::UnicodeSegmentation;

use crate::core::error::Result;
use crate::core::types::DocId;

/// Yields raw, un-normalized documents to the indexer. Out-of-scope collaborator:
/// tokenization/case-folding/stemming is the `Normalizer`'s job, not this trait's.
pub trait DocumentSource {
    fn read_all(&mut self) -> Result<Vec<(DocId, Vec<String>)>>;
}

/// Reads a CSV corpus laid out as `[doc_id, <ignored>, content, ...]`: column 0
/// is the doc id, column 1 is skipped, and columns from 2 onward are
/// concatenated as document content and split into raw words. Mirrors
/// `original_source/index.py::read_data_file`'s column layout, which builds
/// content from `row[2]` onward and never reads `row[1]`.
pub struct CsvDocumentSource {
    path: std::path::PathBuf,
    content_columns: Vec<usize>,
}

impl CsvDocumentSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        CsvDocumentSource {
            path: path.as_ref().to_path_buf(),
            content_columns: Vec::new(),
        }
    }

    /// Restrict content extraction to specific column indices (0-based, excluding
    /// the id column). Defaults to "every column after the first".
    pub fn with_content_columns(mut self, columns: Vec<usize>) -> Self {
        self.content_columns = columns;
        self
    }
}

impl DocumentSource for CsvDocumentSource {
    fn read_all(&mut self) -> Result<Vec<(DocId, Vec<String>)>> {
        let file = File::open(&self.path)?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let mut docs = Vec::new();
        for result in reader.records() {
            let record = result?;
            if record.is_empty() {
                continue;
            }
            let doc_id = DocId::new(record.get(0).unwrap_or("").to_string());

            let content: String = if self.content_columns.is_empty() {
                record.iter().skip(2).collect::<Vec<_>>().join(" ")
            } else {
                self.content_columns
                    .iter()
                    .filter_map(|&i| record.get(i))
                    .collect::<Vec<_>>()
                    .join(" ")
            };

            let words: Vec<String> = content
                .unicode_words()
                .map(|w| w.to_string())
                .collect();

            docs.push((doc_id, words));
        }

        Ok(docs)
    }
}

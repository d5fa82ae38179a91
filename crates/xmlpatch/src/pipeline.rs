//! Batch pipeline: parse, mutate, serialize and persist a set of documents
//!
//! Each document is handled on its own. A failure at any stage is recorded
//! for that document and the batch moves on to the next one.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::error::{Error, Result};
use crate::parser::{Config as ParserConfig, Parser};
use crate::serializer::{Config as SerializerConfig, Serializer};
use crate::source::SourceDocument;
use crate::tree::Document;

/// Destination for serialized documents
pub trait Sink {
    fn write(&mut self, destination: &Path, contents: &str) -> io::Result<()>;
}

/// Writes each document to the filesystem, creating parent directories
#[derive(Clone, Copy, Debug, Default)]
pub struct FsSink;

impl Sink for FsSink {
    fn write(&mut self, destination: &Path, contents: &str) -> io::Result<()> {
        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(destination, contents)?;
        info!("File was saved at: {}", destination.display());
        Ok(())
    }
}

/// Keeps serialized documents in memory, keyed by destination
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemorySink {
    pub outputs: BTreeMap<PathBuf, String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, destination: impl AsRef<Path>) -> Option<&str> {
        self.outputs.get(destination.as_ref()).map(String::as_str)
    }
}

impl Sink for MemorySink {
    fn write(&mut self, destination: &Path, contents: &str) -> io::Result<()> {
        self.outputs
            .insert(destination.to_path_buf(), contents.to_string());
        Ok(())
    }
}

/// Result of processing one document
#[derive(Debug)]
pub struct ItemOutcome {
    pub label: String,
    pub destination: PathBuf,
    pub result: Result<()>,
}

impl ItemOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-document outcomes of a batch run, in input order
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<ItemOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &ItemOutcome> {
        self.outcomes.iter().filter(|o| o.is_success())
    }

    pub fn failed(&self) -> impl Iterator<Item = &ItemOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(ItemOutcome::is_success)
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Runs a caller-supplied mutation over a batch of documents
pub struct Pipeline<F> {
    mutation: F,
    parser_config: ParserConfig,
    serializer: Serializer,
}

impl<F> Pipeline<F>
where
    F: FnMut(Document) -> Result<Document>,
{
    pub fn new(mutation: F) -> Self {
        Self {
            mutation,
            parser_config: ParserConfig::default(),
            serializer: Serializer::default(),
        }
    }

    pub fn with_parser_config(mut self, config: ParserConfig) -> Self {
        self.parser_config = config;
        self
    }

    pub fn with_serializer_config(mut self, config: SerializerConfig) -> Self {
        self.serializer = Serializer::with_config(config);
        self
    }

    /// Parse, mutate and serialize one document
    pub fn transform(&mut self, text: &str) -> Result<String> {
        self.transform_bytes(text.as_bytes())
    }

    /// Like [`Pipeline::transform`], decoding the input as UTF-8 first
    pub fn transform_bytes(&mut self, bytes: &[u8]) -> Result<String> {
        let doc = Parser::with_config(bytes, self.parser_config).parse()?;
        let doc = (self.mutation)(doc)?;
        Ok(self.serializer.serialize(&doc)?)
    }

    /// Process every source, writing results through `sink`
    #[instrument(skip_all)]
    pub fn run<I, D, S>(&mut self, sources: I, destination: D, sink: &mut S) -> BatchReport
    where
        I: IntoIterator<Item = SourceDocument>,
        D: Fn(&SourceDocument) -> PathBuf,
        S: Sink + ?Sized,
    {
        let mut report = BatchReport::default();

        for source in sources {
            let target = destination(&source);
            let SourceDocument {
                label,
                path,
                contents,
                ..
            } = source;
            debug!(label = %label, "processing document");

            let result = contents
                .map_err(|e| Error::io(&path, e))
                .and_then(|bytes| self.transform_bytes(&bytes))
                .and_then(|output| {
                    sink.write(&target, &output)
                        .map_err(|e| Error::io(&target, e))
                });

            match &result {
                Ok(()) => {
                    debug!(label = %label, destination = %target.display(), "document written");
                }
                Err(err) => warn!(label = %label, "failed: {err}"),
            }

            report.outcomes.push(ItemOutcome {
                label,
                destination: target,
                result,
            });
        }

        let failed = report.failed().count();
        info!(
            total = report.len(),
            succeeded = report.len() - failed,
            failed,
            "batch finished"
        );
        report
    }
}

/// Ready-made mutations addressing one element by path
pub mod mutations {
    use tracing::info;

    use crate::error::{Error, Result};
    use crate::tree::{Document, Element, NodePath};

    /// A single change to the addressed element
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum Edit {
        SetAttribute { name: String, value: String },
        RemoveAttribute { name: String },
        SetText { value: String },
    }

    impl Edit {
        pub fn apply(&self, element: &mut Element) {
            match self {
                Self::SetAttribute { name, value } => {
                    let old = element.set_attribute(name.clone(), value.clone());
                    info!("Old attribute: '{}'", old.as_deref().unwrap_or_default());
                    info!("New attribute: '{value}'");
                }
                Self::RemoveAttribute { name } => {
                    if let Some(old) = element.remove_attribute(name) {
                        info!("Removed attribute {name}='{old}'");
                    }
                }
                Self::SetText { value } => {
                    info!("Old text: '{}'", element.text());
                    element.set_text(value.clone());
                    info!("New text: '{value}'");
                }
            }
        }
    }

    /// Apply `edits` in order to the element at `path`.
    ///
    /// A path that resolves to nothing fails with [`Error::PathNotFound`].
    pub fn edit(path: NodePath, edits: Vec<Edit>) -> impl FnMut(Document) -> Result<Document> {
        move |mut doc| {
            let element = doc
                .resolve_path_mut(&path)
                .ok_or_else(|| Error::PathNotFound {
                    path: path.to_string(),
                })?;
            for edit in &edits {
                edit.apply(element);
            }
            Ok(doc)
        }
    }

    pub fn set_attribute(
        path: NodePath,
        name: String,
        value: String,
    ) -> impl FnMut(Document) -> Result<Document> {
        edit(path, vec![Edit::SetAttribute { name, value }])
    }

    pub fn remove_attribute(
        path: NodePath,
        name: String,
    ) -> impl FnMut(Document) -> Result<Document> {
        edit(path, vec![Edit::RemoveAttribute { name }])
    }

    pub fn set_text(path: NodePath, value: String) -> impl FnMut(Document) -> Result<Document> {
        edit(path, vec![Edit::SetText { value }])
    }
}

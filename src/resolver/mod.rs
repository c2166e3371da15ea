//! Dependency resolver.
//!
//! Turns a recipe's ordered sources into the deduplicated, dependency-ordered
//! list of processed sources. Each source is emitted after everything it
//! `requires:` or pulls in through `skills:` (depth-first completion order),
//! and every identity appears at most once no matter how often it is
//! reached. Cycles terminate because an identity is marked seen as soon as
//! its content has been read.
//!
//! Missing `requires:` targets are skipped silently. A `skills:` reference
//! that is missing or lies outside a `skills` directory aborts the run.

mod classify;


pub use classify::{Classification, after_dir, classify, under_skills_dir};

use crate::error::{Result, ValidationError};
use crate::frontmatter::{Document, KeepFields};
use crate::remote::ContentReader;
use crate::source::{Canonicalizer, Identity, Source, SourceKind, path_segments};
use crate::warning::Warning;
use std::collections::{HashSet, VecDeque};

/// One source after reading, parsing, and classification.
#[derive(Debug, Clone)]
pub struct ProcessedSource {
    pub identity: Identity,
    pub source: Source,
    /// Content with the frontmatter block removed.
    pub content: String,
    /// Content exactly as read.
    pub original_content: String,
    pub document: Document,
    /// Path segments relative to the deepest containing search root.
    pub segments: Vec<String>,
    pub classification: Classification,
    /// Resolved `scripts:` entries, in declaration order.
    pub scripts: Vec<Script>,
}

/// A helper script shipped alongside a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    pub identity: Identity,
    pub content: String,
}

impl ProcessedSource {
    pub fn directives(&self) -> &crate::frontmatter::Directives {
        &self.document.directives
    }
}

/// Result of resolving one recipe.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub processed: Vec<ProcessedSource>,
    pub warnings: Vec<Warning>,
}

impl Resolution {
    pub fn of_class(&self, class: Classification) -> impl Iterator<Item = &ProcessedSource> {
        self.processed
            .iter()
            .filter(move |p| p.classification == class)
    }

    /// Every `mcp_servers:` name declared by a processed source, in order.
    pub fn declared_servers(&self) -> impl Iterator<Item = &String> {
        self.processed
            .iter()
            .flat_map(|p| p.directives().mcp_servers.iter())
    }
}

/// A source whose dependencies are still being walked.
struct Frame {
    processed: ProcessedSource,
    pending: VecDeque<Identity>,
}

/// Resolves sources for one recipe.
pub struct Resolver<'r, 'a> {
    canonicalizer: &'r Canonicalizer,
    reader: &'r mut ContentReader<'a>,
    seen: HashSet<Identity>,
    processed: Vec<ProcessedSource>,
    warnings: Vec<Warning>,
}

impl<'r, 'a> Resolver<'r, 'a> {
    pub fn new(canonicalizer: &'r Canonicalizer, reader: &'r mut ContentReader<'a>) -> Self {
        Self {
            canonicalizer,
            reader,
            seen: HashSet::new(),
            processed: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Resolve `sources` in order.
    ///
    /// Remote sources are first offered to the fetcher as one batch.
    pub fn resolve(mut self, sources: &[Source]) -> Result<Resolution> {
        let urls: Vec<String> = sources
            .iter()
            .filter(|s| s.kind == SourceKind::Remote)
            .map(|s| s.reference.clone())
            .collect();
        self.reader.prefetch(&urls);

        for source in sources {
            match self.canonicalizer.canonicalize(None, &source.reference) {
                Some(identity) => self.visit(identity)?,
                None => self.warnings.push(Warning::ReadFailed {
                    path: source.reference.clone(),
                    reason: "no such file".to_string(),
                }),
            }
        }

        tracing::debug!(
            processed = self.processed.len(),
            warnings = self.warnings.len(),
            "resolved sources"
        );
        Ok(Resolution {
            processed: self.processed,
            warnings: self.warnings,
        })
    }

    fn visit(&mut self, root: Identity) -> Result<()> {
        let mut stack: Vec<Frame> = Vec::new();
        if let Some(frame) = self.open(root)? {
            stack.push(frame);
        }

        while let Some(top) = stack.last_mut() {
            match top.pending.pop_front() {
                Some(next) => {
                    if let Some(frame) = self.open(next)? {
                        stack.push(frame);
                    }
                }
                None => {
                    if let Some(done) = stack.pop() {
                        tracing::trace!(source = %done.processed.identity, "resolved");
                        self.processed.push(done.processed);
                    }
                }
            }
        }
        Ok(())
    }

    /// Read and parse `identity`, returning its frame, or `None` if it was
    /// already seen or could not be read.
    fn open(&mut self, identity: Identity) -> Result<Option<Frame>> {
        if !self.seen.insert(identity.clone()) {
            return Ok(None);
        }

        let original = match self.reader.read(&identity) {
            Ok(content) => content,
            Err(warning) => {
                self.warnings.push(warning);
                return Ok(None);
            }
        };

        let (document, parse_error) = Document::parse_lenient(&original);
        if let Some(err) = parse_error {
            self.warnings.push(Warning::MalformedFrontmatter {
                file: identity.to_string(),
                reason: err.to_string(),
            });
        }

        let mut pending = VecDeque::new();
        for reference in &document.directives.requires {
            match self.canonicalizer.canonicalize(Some(&identity), reference) {
                Some(dep) if is_document(&dep) => pending.push_back(dep),
                _ => tracing::debug!(
                    reference = reference.as_str(),
                    declared_in = %identity,
                    "required file not found, skipping"
                ),
            }
        }
        for reference in &document.directives.skills {
            pending.push_back(self.resolve_skill(&identity, reference)?);
        }

        let scripts = self.resolve_scripts(&identity, &document);
        let roots = self.canonicalizer.segment_roots().roots();
        let segments = path_segments(&identity, roots);
        let classification = classify(&segments);

        let processed = ProcessedSource {
            source: Source::from_identity(&identity),
            identity,
            content: document.render(KeepFields::Nothing),
            original_content: original,
            document,
            segments,
            classification,
            scripts,
        };
        Ok(Some(Frame { processed, pending }))
    }

    fn resolve_skill(&self, declaring: &Identity, reference: &str) -> Result<Identity> {
        let Some(skill) = self
            .canonicalizer
            .canonicalize(Some(declaring), reference)
            .filter(is_document)
        else {
            return Err(ValidationError::MissingSkill {
                reference: reference.to_string(),
                declared_in: declaring.to_string(),
            }
            .into());
        };

        let segments = path_segments(&skill, self.canonicalizer.segment_roots().roots());
        if !under_skills_dir(&segments) {
            return Err(ValidationError::SkillOutsideSkillsDir {
                reference: reference.to_string(),
                declared_in: declaring.to_string(),
                resolved: skill.to_string(),
            }
            .into());
        }
        Ok(skill)
    }

    fn resolve_scripts(&mut self, declaring: &Identity, document: &Document) -> Vec<Script> {
        let scripts = &document.directives.scripts;
        let mut out: Vec<Script> = Vec::new();
        for reference in scripts.files.iter().chain(scripts.remote.iter()) {
            let Some(identity) = self
                .canonicalizer
                .canonicalize(Some(declaring), reference)
                .filter(is_document)
            else {
                self.warnings.push(Warning::MissingScript {
                    reference: reference.clone(),
                    declared_in: declaring.to_string(),
                });
                continue;
            };
            if out.iter().any(|s| s.identity == identity) {
                continue;
            }
            match self.reader.read(&identity) {
                Ok(content) => out.push(Script { identity, content }),
                Err(warning) => self.warnings.push(warning),
            }
        }
        out
    }
}

/// Local identities must be files; remote ones are checked on fetch.
fn is_document(identity: &Identity) -> bool {
    match identity {
        Identity::Local(path) => path.is_file(),
        Identity::Remote(_) => true,
    }
}

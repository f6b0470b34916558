//! Offline renderer over static HTML documents
//!
//! `SnapshotRenderer` serves a fixed set of documents keyed by URL. It answers
//! the same queries as the Chromium renderer using `scraper`, which makes the
//! pagination pipeline runnable against saved pages and in tests.
//!
//! Clicking a node that carries an `href` loads the document keyed by that
//! href. Any other click leaves the document as it is.

use crate::renderer::handle::NodeArena;
use crate::renderer::{NodeHandle, Renderer, RendererError, RendererResult};
use crate::HarvestError;
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::path::Path;

/// Renderer over pre-rendered HTML snapshots
#[derive(Debug, Default)]
pub struct SnapshotRenderer {
    documents: HashMap<String, String>,
    entry: Option<String>,
    current: Option<String>,
    nodes: NodeArena<usize>,
    open_calls: usize,
    close_calls: usize,
    clicks: usize,
}

impl SnapshotRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document served for `url`
    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.documents.insert(url.into(), html.into());
        self
    }

    /// Document served when `open` is asked for a URL that has no snapshot
    pub fn with_entry(mut self, url: impl Into<String>) -> Self {
        self.entry = Some(url.into());
        self
    }

    /// Loads every `*.html` file in `dir`, keyed by file name
    ///
    /// `index.html` becomes the entry document.
    pub fn from_dir(dir: &Path) -> Result<Self, HarvestError> {
        let mut renderer = Self::new();

        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("html") {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let html = std::fs::read_to_string(&path)?;
            renderer.documents.insert(name.to_string(), html);
        }

        tracing::info!(
            "Loaded {} snapshot documents from {}",
            renderer.documents.len(),
            dir.display()
        );

        Ok(renderer.with_entry("index.html"))
    }

    /// URL of the loaded document
    pub fn current_url(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn open_calls(&self) -> usize {
        self.open_calls
    }

    pub fn close_calls(&self) -> usize {
        self.close_calls
    }

    pub fn clicks(&self) -> usize {
        self.clicks
    }

    /// Parses the loaded document
    ///
    /// `Html` is not `Send`, so it is rebuilt per call instead of being kept.
    fn document(&self) -> RendererResult<Html> {
        let url = self.current.as_ref().ok_or(RendererError::NotOpen)?;
        let html = self.documents.get(url).ok_or_else(|| RendererError::Navigation {
            url: url.clone(),
            message: "document disappeared".to_string(),
        })?;
        Ok(Html::parse_document(html))
    }

    fn load(&mut self, url: &str) -> RendererResult<()> {
        let key = if self.documents.contains_key(url) {
            url.to_string()
        } else if let Some(entry) = self.entry.clone().filter(|e| self.documents.contains_key(e)) {
            entry
        } else {
            return Err(RendererError::Navigation {
                url: url.to_string(),
                message: "no snapshot for this url".to_string(),
            });
        };

        self.current = Some(key);
        self.nodes.invalidate();
        Ok(())
    }
}

fn parse_selector(selector: &str) -> RendererResult<Selector> {
    Selector::parse(selector)
        .map_err(|e| RendererError::Engine(format!("invalid selector '{}': {:?}", selector, e)))
}

/// Every element of the document in document order
fn elements(document: &Html) -> impl Iterator<Item = ElementRef<'_>> {
    document.root_element().descendants().filter_map(ElementRef::wrap)
}

fn element_at(document: &Html, index: usize) -> RendererResult<ElementRef<'_>> {
    elements(document)
        .nth(index)
        .ok_or_else(|| RendererError::Engine(format!("element {} no longer exists", index)))
}

#[async_trait]
impl Renderer for SnapshotRenderer {
    async fn open(&mut self, url: &str) -> RendererResult<()> {
        self.open_calls += 1;
        self.load(url)
    }

    async fn query_all(&mut self, selector: &str) -> RendererResult<Vec<NodeHandle>> {
        let selector = parse_selector(selector)?;
        let matched: Vec<usize> = {
            let document = self.document()?;
            elements(&document)
                .enumerate()
                .filter(|(_, element)| selector.matches(element))
                .map(|(index, _)| index)
                .collect()
        };

        Ok(matched
            .into_iter()
            .map(|index| self.nodes.register(index))
            .collect())
    }

    async fn find_children(
        &mut self,
        parent: NodeHandle,
        selector: &str,
    ) -> RendererResult<Vec<NodeHandle>> {
        let selector = parse_selector(selector)?;
        let parent_index = *self.nodes.resolve(parent)?;
        let matched: Vec<usize> = {
            let document = self.document()?;
            let parent_id = element_at(&document, parent_index)?.id();
            elements(&document)
                .enumerate()
                .filter(|(_, element)| element.ancestors().any(|a| a.id() == parent_id))
                .filter(|(_, element)| selector.matches(element))
                .map(|(index, _)| index)
                .collect()
        };

        Ok(matched
            .into_iter()
            .map(|index| self.nodes.register(index))
            .collect())
    }

    async fn node_text(&mut self, node: NodeHandle) -> RendererResult<String> {
        let index = *self.nodes.resolve(node)?;
        let document = self.document()?;
        let text: String = element_at(&document, index)?.text().collect();
        Ok(text.trim().to_string())
    }

    async fn click_via_script(&mut self, node: NodeHandle) -> RendererResult<()> {
        let index = *self.nodes.resolve(node)?;
        self.clicks += 1;

        let href = {
            let document = self.document()?;
            let element = element_at(&document, index)?;
            element.value().attr("href").map(str::to_string)
        };

        match href {
            Some(href) if self.documents.contains_key(&href) => {
                self.current = Some(href);
                self.nodes.invalidate();
                Ok(())
            }
            Some(href) => Err(RendererError::Navigation {
                url: href,
                message: "no snapshot for this url".to_string(),
            }),
            None => {
                self.nodes.invalidate();
                Ok(())
            }
        }
    }

    async fn close(&mut self) {
        self.close_calls += 1;
        self.current = None;
        self.nodes.invalidate();
    }
}

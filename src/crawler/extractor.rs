//! Quote block extraction
//!
//! Each required field is looked up independently and yields its own
//! `Result`; the results are combined into one record or one skip reason.

use crate::config::SelectorConfig;
use crate::renderer::{NodeHandle, Renderer, RendererError};
use crate::storage::QuoteRecord;
use thiserror::Error;

/// Why a quote block produced no record
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("missing {field} element ('{selector}')")]
    MissingField {
        field: &'static str,
        selector: String,
    },

    #[error("{field} element ('{selector}') has no text")]
    EmptyField {
        field: &'static str,
        selector: String,
    },

    #[error("renderer error while reading {field}: {source}")]
    Renderer {
        field: &'static str,
        source: RendererError,
    },
}

/// Pulls quote records out of rendered quote blocks
#[derive(Debug, Clone, Copy)]
pub struct Extractor<'a> {
    selectors: &'a SelectorConfig,
}

impl<'a> Extractor<'a> {
    pub fn new(selectors: &'a SelectorConfig) -> Self {
        Self { selectors }
    }

    /// Extracts one block, logging and swallowing any field failure
    pub async fn extract<R>(&self, renderer: &mut R, block: NodeHandle) -> Option<QuoteRecord>
    where
        R: Renderer + ?Sized,
    {
        match self.extract_fields(renderer, block).await {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Skipping quote block: {}", e);
                None
            }
        }
    }

    /// Extracts one block, reporting why it was unusable
    pub async fn extract_fields<R>(
        &self,
        renderer: &mut R,
        block: NodeHandle,
    ) -> Result<QuoteRecord, ExtractError>
    where
        R: Renderer + ?Sized,
    {
        let text = self
            .required_field(renderer, block, "text", &self.selectors.text)
            .await;
        let author = self
            .required_field(renderer, block, "author", &self.selectors.author)
            .await;
        let tags = self.tags(renderer, block).await;

        Ok(QuoteRecord {
            text: text?,
            author: author?,
            tags,
        })
    }

    async fn required_field<R>(
        &self,
        renderer: &mut R,
        block: NodeHandle,
        field: &'static str,
        selector: &str,
    ) -> Result<String, ExtractError>
    where
        R: Renderer + ?Sized,
    {
        let node = match renderer.find_child(block, selector).await {
            Ok(node) => node,
            Err(e) if e.is_not_found() => {
                return Err(ExtractError::MissingField {
                    field,
                    selector: selector.to_string(),
                })
            }
            Err(source) => return Err(ExtractError::Renderer { field, source }),
        };

        let text = renderer
            .node_text(node)
            .await
            .map_err(|source| ExtractError::Renderer { field, source })?;

        if text.is_empty() {
            return Err(ExtractError::EmptyField {
                field,
                selector: selector.to_string(),
            });
        }

        Ok(text)
    }

    /// Tag texts in document order; failures only drop the affected tag
    async fn tags<R>(&self, renderer: &mut R, block: NodeHandle) -> Vec<String>
    where
        R: Renderer + ?Sized,
    {
        let nodes = match renderer.find_children(block, &self.selectors.tag).await {
            Ok(nodes) => nodes,
            Err(e) => {
                tracing::warn!("Could not read tags, storing none: {}", e);
                return Vec::new();
            }
        };

        let mut tags = Vec::with_capacity(nodes.len());
        for node in nodes {
            match renderer.node_text(node).await {
                Ok(tag) if !tag.is_empty() => tags.push(tag),
                Ok(_) => {}
                Err(e) => tracing::debug!("Dropping unreadable tag: {}", e),
            }
        }
        tags
    }
}

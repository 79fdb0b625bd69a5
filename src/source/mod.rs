//! Sources
//!
//! Builds the incoming collection: specification documents are discovered in
//! the workspace, normalized, and converted into one service folder each.

pub mod converter;
pub mod discovery;
pub mod normalize;

pub use converter::{OpenApiConverter, SpecConverter};
pub use discovery::{discover_sources, service_name, SourceDocument};
pub use normalize::{load_document, normalize_document};

use crate::collection::model::{CollectionNode, CollectionTree};
use crate::error::SyncError;
use std::path::Path;
use tracing::info;

/// Convert every source matching `pattern` under `root` into one incoming tree.
///
/// Sources are converted one after another; the first failure aborts.
pub async fn build_incoming(
    root: &Path,
    pattern: &str,
    collection_name: &str,
    converter: &dyn SpecConverter,
) -> Result<CollectionTree, SyncError> {
    let sources = discover_sources(root, pattern)?;
    info!(count = sources.len(), pattern, "Found specification files");

    let mut incoming = CollectionTree::empty(collection_name);
    for source in &sources {
        info!(file = %source.path.display(), service = %source.service, "Converting");
        let mut document = load_document(&source.path)?;
        normalize_document(&mut document, &source.path)?;
        let mut fragment = converter.convert(&document, &source.service).await?;
        fragment.name = source.service.clone();
        incoming.item.push(CollectionNode::Folder(fragment));
    }
    Ok(incoming)
}

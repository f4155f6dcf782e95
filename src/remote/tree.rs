//! # Tree Builder
//!
//! Depth-first reconstruction of a repository's file tree from the contents
//! API. Listings are fetched one at a time; a directory's subtree is built
//! before the directory node itself is attached to its parent.
//!
//! Alongside the tree, the builder collects every file path in pre-order,
//! which is what the download flow offers for selection.

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use log::{debug, info, warn};

use crate::remote::context::FetchContext;
use crate::remote::error::FetchError;
use crate::remote::types::{ContentEntry, EntryKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Directory,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub name: String,
    pub path: String,
    pub kind: NodeKind,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    fn file(entry: ContentEntry) -> Self {
        Self {
            name: entry.name,
            path: entry.path,
            kind: NodeKind::File,
            children: Vec::new(),
        }
    }

    fn directory(name: String, path: String, children: Vec<TreeNode>) -> Self {
        Self {
            name,
            path,
            kind: NodeKind::Directory,
            children,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    pub fn leaf_count(&self) -> usize {
        match self.kind {
            NodeKind::File => 1,
            NodeKind::Directory => self.children.iter().map(TreeNode::leaf_count).sum(),
        }
    }

    pub fn directory_count(&self) -> usize {
        match self.kind {
            NodeKind::File => 0,
            NodeKind::Directory => {
                1 + self
                    .children
                    .iter()
                    .map(TreeNode::directory_count)
                    .sum::<usize>()
            }
        }
    }
}

/// A built tree plus its file paths in pre-order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltTree {
    pub root: TreeNode,
    pub files: Vec<String>,
}

pub struct TreeBuilder<'a> {
    ctx: &'a mut FetchContext,
    /// `{api}/repos/{org}/{app}/contents`
    contents_url: String,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(ctx: &'a mut FetchContext, contents_url: impl Into<String>) -> Self {
        Self {
            ctx,
            contents_url: contents_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Build the tree under `root_path` ("" for the repository root).
    /// The returned root node is named `root_name`.
    pub async fn build(self, root_path: &str, root_name: &str) -> Result<BuiltTree, FetchError> {
        let mut files = Vec::new();
        let children = walk(self.ctx, &self.contents_url, root_path, &mut files)
            .await
            .map_err(|e| {
                warn!("Tree build under {:?} aborted: {}", root_path, e);
                FetchError::AggregationAborted(Box::new(e))
            })?;

        let root = TreeNode::directory(root_name.to_string(), root_path.to_string(), children);
        info!(
            "Built tree {}: {} directories, {} files",
            root_name,
            root.directory_count(),
            files.len()
        );
        Ok(BuiltTree { root, files })
    }
}

fn listing_url(contents_url: &str, path: &str) -> String {
    if path.is_empty() {
        contents_url.to_string()
    } else {
        format!("{contents_url}/{path}")
    }
}

fn walk<'b>(
    ctx: &'b mut FetchContext,
    contents_url: &'b str,
    path: &'b str,
    files: &'b mut Vec<String>,
) -> LocalBoxFuture<'b, Result<Vec<TreeNode>, FetchError>> {
    async move {
        let url = listing_url(contents_url, path);
        let listing: Vec<ContentEntry> = ctx.get_resource_as(&url).await?;

        let mut nodes = Vec::with_capacity(listing.len());
        for entry in listing {
            match entry.kind {
                EntryKind::File => {
                    files.push(entry.path.clone());
                    nodes.push(TreeNode::file(entry));
                }
                EntryKind::Dir => {
                    let children = walk(&mut *ctx, contents_url, &entry.path, &mut *files).await?;
                    nodes.push(TreeNode::directory(entry.name, entry.path, children));
                }
                EntryKind::Symlink | EntryKind::Submodule => {
                    debug!("Skipping {:?} {}", entry.kind, entry.path);
                }
            }
        }
        Ok(nodes)
    }
    .boxed_local()
}

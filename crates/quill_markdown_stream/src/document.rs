use crate::error::{Error, Result};
use crate::node::{Node, render_html, size_of};

/// A live rich-text document that streamed content is written into.
pub trait RichDocument {
    /// Removes all content.
    fn clear(&mut self);

    /// Inserts `nodes` at `position` and returns the document size afterwards.
    fn insert_at(&mut self, position: usize, nodes: Vec<Node>) -> Result<usize>;

    fn current_size(&self) -> usize;

    /// Removes the content between two positions.
    fn delete_range(&mut self, from: usize, to: usize) -> Result<()>;
}

/// In-memory document holding top-level blocks.
///
/// Positions are only valid on block boundaries: `0`, and the end of every
/// top-level node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeDocument {
    nodes: Vec<Node>,
}

impl NodeDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_nodes(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn to_html(&self) -> String {
        render_html(&self.nodes)
    }

    /// Index of the top-level node starting at `position`.
    fn boundary(&self, position: usize) -> Option<usize> {
        let mut offset = 0;
        for (index, node) in self.nodes.iter().enumerate() {
            if offset == position {
                return Some(index);
            }
            offset += node.size();
        }
        (offset == position).then_some(self.nodes.len())
    }
}

impl RichDocument for NodeDocument {
    fn clear(&mut self) {
        self.nodes.clear();
    }

    fn insert_at(&mut self, position: usize, nodes: Vec<Node>) -> Result<usize> {
        let index = self
            .boundary(position)
            .ok_or(Error::InvalidPosition { position, size: self.current_size() })?;
        self.nodes.splice(index..index, nodes);
        Ok(self.current_size())
    }

    fn current_size(&self) -> usize {
        size_of(&self.nodes)
    }

    fn delete_range(&mut self, from: usize, to: usize) -> Result<()> {
        let invalid = || Error::InvalidRange { from, to, size: self.current_size() };
        let start = self.boundary(from).ok_or_else(invalid)?;
        let end = self.boundary(to).filter(|end| *end >= start).ok_or_else(invalid)?;
        self.nodes.drain(start..end);
        Ok(())
    }
}

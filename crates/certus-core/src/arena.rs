//! Arena allocator for expression storage.
//!
//! Nodes are stored contiguously and hash-consed, and each node's
//! [`NodeProps`] are derived once, at intern time, into a parallel table.

use hashbrown::HashMap;

use crate::error::ShapeError;
use crate::expr::ExprNode;
use crate::handle::ExprHandle;
use crate::props::NodeProps;
use crate::traversal::{is_leaf, post_order};

/// The arena holding one or more formula shapes.
///
/// Children are always interned before their parents, so handle order is a
/// valid topological order of the whole arena.
#[derive(Debug, Default, Clone)]
pub struct ExprArena {
    /// Storage for all expression nodes.
    nodes: Vec<ExprNode>,
    /// Properties of `nodes[i]`, same indexing.
    props: Vec<NodeProps>,
    /// Interning table: maps node content to its handle.
    intern_map: HashMap<ExprNode, ExprHandle>,
}

impl ExprArena {
    /// Creates a new empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an arena with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            props: Vec::with_capacity(capacity),
            intern_map: HashMap::with_capacity(capacity),
        }
    }

    /// Interns an expression node, returning its handle.
    ///
    /// If an identical node already exists, returns the existing handle.
    ///
    /// # Panics
    ///
    /// Panics if a child handle does not belong to this arena, or if the
    /// arena would exceed `u32::MAX` nodes.
    pub fn intern(&mut self, node: ExprNode) -> ExprHandle {
        if let Some(&handle) = self.intern_map.get(&node) {
            return handle;
        }

        let index = self.nodes.len();
        assert!(index < u32::MAX as usize, "Arena capacity exceeded");

        let props = NodeProps::derive(&node, |child| self.props[child.slot()]);
        let handle = ExprHandle::new(index as u32);
        self.nodes.push(node.clone());
        self.props.push(props);
        self.intern_map.insert(node, handle);
        handle
    }

    /// Gets the node at the given handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle is invalid.
    #[must_use]
    pub fn get(&self, handle: ExprHandle) -> &ExprNode {
        &self.nodes[handle.slot()]
    }

    /// Gets the derived properties of the node at the given handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle is invalid.
    #[must_use]
    pub fn props(&self, handle: ExprHandle) -> NodeProps {
        self.props[handle.slot()]
    }

    /// Returns true if `handle` indexes a node of this arena.
    #[must_use]
    pub fn contains(&self, handle: ExprHandle) -> bool {
        handle.slot() < self.nodes.len()
    }

    /// Returns `Ok(())` if `handle` belongs to this arena.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::UnknownHandle`] otherwise.
    pub fn check(&self, handle: ExprHandle) -> Result<(), ShapeError> {
        if self.contains(handle) {
            Ok(())
        } else {
            Err(ShapeError::UnknownHandle { handle })
        }
    }

    /// Returns the number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the arena is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns an iterator over every handle, children before parents.
    pub fn handles(&self) -> impl Iterator<Item = ExprHandle> + '_ {
        (0..self.nodes.len() as u32).map(ExprHandle::new)
    }

    /// Largest argument index read by the formula rooted at `root`, or 0 if
    /// it reads none.
    ///
    /// # Panics
    ///
    /// Panics if the handle is invalid.
    #[must_use]
    pub fn max_argument(&self, root: ExprHandle) -> u32 {
        post_order(self, root, is_leaf)
            .into_iter()
            .filter_map(|h| self.get(h).argument_index())
            .max()
            .unwrap_or(0)
    }

    // === Convenience constructors ===

    /// Creates a leaf reading input slot `n` (1-based).
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::ZeroArgumentIndex`] for `n == 0`.
    pub fn argument(&mut self, n: u32) -> Result<ExprHandle, ShapeError> {
        if n == 0 {
            return Err(ShapeError::ZeroArgumentIndex);
        }
        Ok(self.intern(ExprNode::Argument(n)))
    }

    /// Creates a constant leaf.
    ///
    /// `-0.0` is stored as `0.0`, so both spellings intern to one node.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::NonFiniteConstant`] for NaN and infinities.
    pub fn constant(&mut self, value: f64) -> Result<ExprHandle, ShapeError> {
        if !value.is_finite() {
            return Err(ShapeError::NonFiniteConstant { value });
        }
        let value = if value == 0.0 { 0.0 } else { value };
        Ok(self.intern(ExprNode::Constant(value.to_bits())))
    }

    /// Creates `left + right`.
    pub fn sum(&mut self, left: ExprHandle, right: ExprHandle) -> ExprHandle {
        self.intern(ExprNode::Sum(left, right))
    }

    /// Creates `left - right`.
    pub fn difference(&mut self, left: ExprHandle, right: ExprHandle) -> ExprHandle {
        self.intern(ExprNode::Difference(left, right))
    }

    /// Creates `left * right`.
    pub fn product(&mut self, left: ExprHandle, right: ExprHandle) -> ExprHandle {
        self.intern(ExprNode::Product(left, right))
    }

    /// Creates `min(left, right)`.
    pub fn min(&mut self, left: ExprHandle, right: ExprHandle) -> ExprHandle {
        self.intern(ExprNode::Min(left, right))
    }

    /// Creates `max(left, right)`.
    pub fn max(&mut self, left: ExprHandle, right: ExprHandle) -> ExprHandle {
        self.intern(ExprNode::Max(left, right))
    }

    /// Creates `|child|`.
    pub fn abs(&mut self, child: ExprHandle) -> ExprHandle {
        self.intern(ExprNode::Abs(child))
    }
}

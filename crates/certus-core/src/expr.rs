//! Expression node types.
//!
//! This module defines the closed set of node kinds stored in the arena.

use smallvec::SmallVec;

use crate::handle::ExprHandle;

/// The operator of a node. Leaves report [`OpKind::NoOp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    /// `left + right`
    Sum,
    /// `left - right`
    Difference,
    /// `left * right`
    Product,
    /// `min(left, right)`
    Min,
    /// `max(left, right)`
    Max,
    /// `|child|`
    Abs,
    /// Argument or constant.
    NoOp,
}

impl OpKind {
    /// Returns the number of operands this operator takes.
    #[must_use]
    pub const fn arity(self) -> Arity {
        match self {
            OpKind::NoOp => Arity::Nullary,
            OpKind::Abs => Arity::Unary,
            OpKind::Sum | OpKind::Difference | OpKind::Product | OpKind::Min | OpKind::Max => {
                Arity::Binary
            }
        }
    }
}

/// The operator of a binary node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `left + right`
    Sum,
    /// `left - right`
    Difference,
    /// `left * right`
    Product,
    /// `min(left, right)`
    Min,
    /// `max(left, right)`
    Max,
}

impl From<BinaryOp> for OpKind {
    fn from(op: BinaryOp) -> Self {
        match op {
            BinaryOp::Sum => OpKind::Sum,
            BinaryOp::Difference => OpKind::Difference,
            BinaryOp::Product => OpKind::Product,
            BinaryOp::Min => OpKind::Min,
            BinaryOp::Max => OpKind::Max,
        }
    }
}

/// Operand count of an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    /// Leaves.
    Nullary,
    /// `abs`.
    Unary,
    /// Everything else.
    Binary,
}

/// An expression node stored in the arena.
///
/// Constants are stored by bit pattern so that nodes can be hashed and
/// compared structurally. The arena normalises `-0.0` to `0.0` and rejects
/// non-finite values before a constant node is created.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExprNode {
    // === Leaves ===
    /// Reads input slot `n` (1-based).
    Argument(u32),

    /// A fixed `f64`, stored as `f64::to_bits`.
    Constant(u64),

    // === Binary ===
    /// `left + right`
    Sum(ExprHandle, ExprHandle),
    /// `left - right`
    Difference(ExprHandle, ExprHandle),
    /// `left * right`
    Product(ExprHandle, ExprHandle),
    /// `min(left, right)`
    Min(ExprHandle, ExprHandle),
    /// `max(left, right)`
    Max(ExprHandle, ExprHandle),

    // === Unary ===
    /// `|child|`
    Abs(ExprHandle),
}

impl ExprNode {
    /// Returns the operator kind of this node.
    #[must_use]
    pub fn op_kind(&self) -> OpKind {
        match self {
            ExprNode::Argument(_) | ExprNode::Constant(_) => OpKind::NoOp,
            ExprNode::Sum(..) => OpKind::Sum,
            ExprNode::Difference(..) => OpKind::Difference,
            ExprNode::Product(..) => OpKind::Product,
            ExprNode::Min(..) => OpKind::Min,
            ExprNode::Max(..) => OpKind::Max,
            ExprNode::Abs(_) => OpKind::Abs,
        }
    }

    /// Returns the arity of this node.
    #[must_use]
    pub fn arity(&self) -> Arity {
        self.op_kind().arity()
    }

    /// Returns true if this node is an argument or a constant.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, ExprNode::Argument(_) | ExprNode::Constant(_))
    }

    /// Returns the argument index if this is an argument leaf.
    #[must_use]
    pub fn argument_index(&self) -> Option<u32> {
        match self {
            ExprNode::Argument(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the value if this is a constant leaf.
    #[must_use]
    pub fn constant_value(&self) -> Option<f64> {
        match self {
            ExprNode::Constant(bits) => Some(f64::from_bits(*bits)),
            _ => None,
        }
    }

    /// Returns `(left, right)` for binary nodes.
    #[must_use]
    pub fn operands(&self) -> Option<(ExprHandle, ExprHandle)> {
        match *self {
            ExprNode::Sum(l, r)
            | ExprNode::Difference(l, r)
            | ExprNode::Product(l, r)
            | ExprNode::Min(l, r)
            | ExprNode::Max(l, r) => Some((l, r)),
            _ => None,
        }
    }

    /// Returns the operator and `(left, right)` for binary nodes.
    #[must_use]
    pub fn binary(&self) -> Option<(BinaryOp, ExprHandle, ExprHandle)> {
        match *self {
            ExprNode::Sum(l, r) => Some((BinaryOp::Sum, l, r)),
            ExprNode::Difference(l, r) => Some((BinaryOp::Difference, l, r)),
            ExprNode::Product(l, r) => Some((BinaryOp::Product, l, r)),
            ExprNode::Min(l, r) => Some((BinaryOp::Min, l, r)),
            ExprNode::Max(l, r) => Some((BinaryOp::Max, l, r)),
            _ => None,
        }
    }

    /// Returns the children of this node, left before right.
    #[must_use]
    pub fn children(&self) -> SmallVec<[ExprHandle; 2]> {
        match *self {
            ExprNode::Argument(_) | ExprNode::Constant(_) => SmallVec::new(),
            ExprNode::Abs(child) => smallvec::smallvec![child],
            ExprNode::Sum(l, r)
            | ExprNode::Difference(l, r)
            | ExprNode::Product(l, r)
            | ExprNode::Min(l, r)
            | ExprNode::Max(l, r) => smallvec::smallvec![l, r],
        }
    }
}

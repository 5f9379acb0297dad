//! Compiled per-shape tables.
//!
//! A compiled filter never looks at the arena again: every child reference
//! is resolved to an [`Operand`] pointing into the input slice, a constant,
//! or a slot of one of the two per-call arrays.

use certus_core::{BinaryOp, ExprHandle, ExprNode, ShapeError};
use hashbrown::HashMap;

/// A value whose floating-point sign can be trusted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Exact {
    /// Input slot, 0-based.
    Input(usize),
    /// Constant leaf.
    Constant(f64),
    /// Slot in the approximation array.
    Approx(usize),
}

impl Exact {
    #[inline]
    pub(crate) fn value(self, inputs: &[f64], approx: &[f64]) -> f64 {
        match self {
            Exact::Input(i) => inputs[i],
            Exact::Constant(c) => c,
            Exact::Approx(slot) => approx[slot],
        }
    }
}

/// Where a node's sign comes from at evaluation time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Operand {
    /// Read the value, compare against zero.
    Exact(Exact),
    /// Read a previously deduced sign.
    Deduced(usize),
}

/// One compiled operation: a binary operator or `abs`. Leaves never become
/// steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Step<T> {
    Binary { op: BinaryOp, left: T, right: T },
    Abs(T),
}

impl<T> Step<T> {
    /// Builds the step for an inner node, resolving each child with
    /// `resolve`. Returns `None` for leaves.
    pub(crate) fn of(
        node: &ExprNode,
        mut resolve: impl FnMut(ExprHandle) -> Result<T, ShapeError>,
    ) -> Result<Option<Self>, ShapeError> {
        if let ExprNode::Abs(child) = *node {
            return Ok(Some(Step::Abs(resolve(child)?)));
        }
        match node.binary() {
            Some((op, l, r)) => Ok(Some(Step::Binary {
                op,
                left: resolve(l)?,
                right: resolve(r)?,
            })),
            None => Ok(None),
        }
    }
}

/// One floating-point operation over sign-exact operands.
pub(crate) type ApproxStep = Step<Exact>;

/// A child of a node that needs deduction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct DeduceArg {
    pub operand: Operand,
    /// Static `non_negative` of the child.
    pub non_negative: bool,
}

/// One sign combination for a node that is not sign-exact.
pub(crate) type DeduceStep = Step<DeduceArg>;

/// Operands resolved so far during compilation, keyed by handle.
#[derive(Debug, Default)]
pub(crate) struct Resolved(HashMap<ExprHandle, Operand>);

impl Resolved {
    pub(crate) fn insert(&mut self, handle: ExprHandle, operand: Operand) {
        self.0.insert(handle, operand);
    }

    pub(crate) fn operand(&self, handle: ExprHandle) -> Result<Operand, ShapeError> {
        self.0
            .get(&handle)
            .copied()
            .ok_or(ShapeError::UnknownHandle { handle })
    }

    pub(crate) fn exact(&self, handle: ExprHandle) -> Result<Exact, ShapeError> {
        match self.operand(handle)? {
            Operand::Exact(exact) => Ok(exact),
            Operand::Deduced(_) => Err(ShapeError::InconsistentProps { handle }),
        }
    }
}

/// Resolves a leaf to its operand. Returns `None` for inner nodes.
///
/// Leaves interned directly through `ExprArena::intern` bypass the checks of
/// the leaf constructors, so they are validated again here.
pub(crate) fn leaf_operand(node: &ExprNode) -> Result<Option<Exact>, ShapeError> {
    match *node {
        ExprNode::Argument(0) => Err(ShapeError::ZeroArgumentIndex),
        ExprNode::Argument(n) => Ok(Some(Exact::Input(n as usize - 1))),
        ExprNode::Constant(bits) => {
            let value = f64::from_bits(bits);
            if value.is_finite() {
                Ok(Some(Exact::Constant(value)))
            } else {
                Err(ShapeError::NonFiniteConstant { value })
            }
        }
        _ => Ok(None),
    }
}

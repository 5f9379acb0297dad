//! Post-order traversal with anchor predicates.
//!
//! [`post_order`] lists the distinct sub-expressions of a formula so that
//! every node comes after its children. Recursion stops at nodes the anchor
//! accepts; those nodes are still listed, their children are not visited
//! through them.
//!
//! Two anchors cover the engine's needs: [`is_leaf`] yields the full
//! evaluation order, [`is_sign_exact`] yields the nodes that still need sign
//! deduction (plus the sign-exact operands they read).
//!
//! The traversal is iterative, so formula depth is not bounded by the call
//! stack.

use crate::arena::ExprArena;
use crate::handle::ExprHandle;

/// Anchor: stop at arguments and constants.
#[must_use]
pub fn is_leaf(arena: &ExprArena, handle: ExprHandle) -> bool {
    arena.props(handle).is_leaf
}

/// Anchor: stop at nodes whose floating-point value has a trustworthy sign.
#[must_use]
pub fn is_sign_exact(arena: &ExprArena, handle: ExprHandle) -> bool {
    arena.props(handle).sign_exact
}

/// Lists the sub-expressions reachable from `root`, children before parents.
///
/// Left operands are visited before right operands. A sub-expression reached
/// along several paths is listed once, at its earliest post-order position.
/// An anchored `root` yields `[root]`.
///
/// # Panics
///
/// Panics if `root` (or a node below it) does not belong to `arena`.
///
/// # Example
/// ```
/// use certus_core::{post_order, is_leaf, ExprArena};
///
/// let mut arena = ExprArena::new();
/// let a = arena.argument(1).unwrap();
/// let b = arena.argument(2).unwrap();
/// let d = arena.difference(a, b);
/// let sq = arena.product(d, d);
///
/// assert_eq!(post_order(&arena, sq, is_leaf), vec![a, b, d, sq]);
/// ```
pub fn post_order<F>(arena: &ExprArena, root: ExprHandle, anchor: F) -> Vec<ExprHandle>
where
    F: Fn(&ExprArena, ExprHandle) -> bool,
{
    let mut listed = vec![false; arena.len()];
    let mut order = Vec::new();
    // (node, children already pushed)
    let mut stack: Vec<(ExprHandle, bool)> = vec![(root, false)];

    while let Some((handle, expanded)) = stack.pop() {
        if listed[handle.slot()] {
            continue;
        }
        if expanded || anchor(arena, handle) {
            listed[handle.slot()] = true;
            order.push(handle);
            continue;
        }

        stack.push((handle, true));
        // Reverse so the left operand is popped first.
        for &child in arena.get(handle).children().iter().rev() {
            if !listed[child.slot()] {
                stack.push((child, false));
            }
        }
    }

    order
}

//! Static node properties.
//!
//! Every node carries three flags computed from its own kind and its
//! children's flags when it is interned. They describe the formula, not any
//! particular evaluation of it.

use crate::expr::ExprNode;
use crate::handle::ExprHandle;

/// Shape-derived properties of an expression node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NodeProps {
    /// True for arguments and constants.
    pub is_leaf: bool,
    /// Plain `f64` evaluation of this node always has the true sign.
    pub sign_exact: bool,
    /// The node's value is `>= 0` for every input.
    pub non_negative: bool,
}

impl NodeProps {
    /// Derives the properties of `node`, looking up children through `child`.
    ///
    /// Sums and differences are sign-exact only over two leaves: one correctly
    /// rounded operation on exact inputs keeps its sign, but a sum of rounded
    /// intermediates does not.
    pub fn derive(node: &ExprNode, child: impl Fn(ExprHandle) -> NodeProps) -> Self {
        match *node {
            ExprNode::Argument(_) => Self {
                is_leaf: true,
                sign_exact: true,
                non_negative: false,
            },
            ExprNode::Constant(bits) => Self {
                is_leaf: true,
                sign_exact: true,
                non_negative: f64::from_bits(bits) >= 0.0,
            },
            ExprNode::Sum(l, r) => {
                let (lp, rp) = (child(l), child(r));
                Self {
                    is_leaf: false,
                    sign_exact: lp.is_leaf && rp.is_leaf,
                    non_negative: lp.non_negative && rp.non_negative,
                }
            }
            ExprNode::Difference(l, r) => {
                let (lp, rp) = (child(l), child(r));
                Self {
                    is_leaf: false,
                    sign_exact: lp.is_leaf && rp.is_leaf,
                    non_negative: false,
                }
            }
            ExprNode::Product(l, r) => {
                let (lp, rp) = (child(l), child(r));
                Self {
                    is_leaf: false,
                    sign_exact: lp.sign_exact && rp.sign_exact,
                    // x * x >= 0 whatever the sign of x
                    non_negative: (lp.non_negative && rp.non_negative) || l == r,
                }
            }
            ExprNode::Min(l, r) => {
                let (lp, rp) = (child(l), child(r));
                Self {
                    is_leaf: false,
                    sign_exact: lp.sign_exact && rp.sign_exact,
                    non_negative: lp.non_negative && rp.non_negative,
                }
            }
            ExprNode::Max(l, r) => {
                let (lp, rp) = (child(l), child(r));
                Self {
                    is_leaf: false,
                    sign_exact: lp.sign_exact && rp.sign_exact,
                    non_negative: lp.non_negative || rp.non_negative,
                }
            }
            ExprNode::Abs(c) => Self {
                is_leaf: false,
                sign_exact: child(c).sign_exact,
                non_negative: true,
            },
        }
    }
}

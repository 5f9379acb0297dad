//! The rational evaluation stage.

use certus_core::{is_leaf, post_order, BinaryOp, ExprArena, ExprHandle, ExprNode, ShapeError};
use certus_filter::{check_inputs, FilterError, Sign, SignStage};
use dashu::base::Abs;
use dashu::rational::RBig;
use hashbrown::HashMap;
use log::debug;

use crate::rational::exact_from_f64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operand {
    Input(usize),
    Constant(usize),
    Value(usize),
}

#[derive(Debug, Clone)]
enum Step {
    Binary {
        op: BinaryOp,
        left: Operand,
        right: Operand,
    },
    Abs(Operand),
}

/// Evaluates a formula over exact rationals. Never uncertain.
///
/// Every input and constant is converted exactly, every operation is exact,
/// so the sign is the true mathematical sign. This is the last stage of a
/// [`StagedPredicate`](certus_filter::StagedPredicate).
#[derive(Debug, Clone)]
pub struct RationalStage {
    arg_count: usize,
    constants: Vec<RBig>,
    steps: Vec<Step>,
    root: Operand,
}

impl RationalStage {
    /// Compiles the formula rooted at `root`, taking as many inputs as the
    /// largest argument index it reads.
    ///
    /// # Errors
    ///
    /// Returns a [`ShapeError`] if `root` is not part of `arena` or the
    /// formula contains a malformed leaf.
    pub fn new(arena: &ExprArena, root: ExprHandle) -> Result<Self, ShapeError> {
        arena.check(root)?;
        let arity = arena.max_argument(root) as usize;
        Self::compile(arena, root, arity)
    }

    /// Compiles the formula for a declared number of inputs.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::ArgumentOutOfRange`] if the formula reads an
    /// argument beyond `arity`.
    pub fn with_arity(arena: &ExprArena, root: ExprHandle, arity: usize) -> Result<Self, ShapeError> {
        arena.check(root)?;
        let index = arena.max_argument(root);
        if index as usize > arity {
            return Err(ShapeError::ArgumentOutOfRange { index, arity });
        }
        Self::compile(arena, root, arity)
    }

    fn compile(arena: &ExprArena, root: ExprHandle, arity: usize) -> Result<Self, ShapeError> {
        let mut resolved: HashMap<ExprHandle, Operand> = HashMap::new();
        let mut constants = Vec::new();
        let mut steps = Vec::new();
        let lookup = |resolved: &HashMap<ExprHandle, Operand>, handle: ExprHandle| {
            resolved
                .get(&handle)
                .copied()
                .ok_or(ShapeError::UnknownHandle { handle })
        };

        for handle in post_order(arena, root, is_leaf) {
            let operand = match *arena.get(handle) {
                ExprNode::Argument(0) => return Err(ShapeError::ZeroArgumentIndex),
                ExprNode::Argument(n) => Operand::Input(n as usize - 1),
                ExprNode::Constant(bits) => {
                    let value = f64::from_bits(bits);
                    let exact = exact_from_f64(value).ok_or(ShapeError::NonFiniteConstant { value })?;
                    constants.push(exact);
                    Operand::Constant(constants.len() - 1)
                }
                ExprNode::Abs(child) => {
                    steps.push(Step::Abs(lookup(&resolved, child)?));
                    Operand::Value(steps.len() - 1)
                }
                ref node => {
                    let (op, l, r) = node
                        .binary()
                        .ok_or(ShapeError::UnknownHandle { handle })?;
                    steps.push(Step::Binary {
                        op,
                        left: lookup(&resolved, l)?,
                        right: lookup(&resolved, r)?,
                    });
                    Operand::Value(steps.len() - 1)
                }
            };
            resolved.insert(handle, operand);
        }

        let root = lookup(&resolved, root)?;
        debug!(
            "compiled rational stage: {} inputs, {} constants, {} steps",
            arity,
            constants.len(),
            steps.len()
        );

        Ok(Self {
            arg_count: arity,
            constants,
            steps,
            root,
        })
    }

    /// Exact value of the formula at `inputs`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InputCount`] or [`FilterError::NonFiniteInput`]
    /// for unusable inputs.
    pub fn evaluate(&self, inputs: &[f64]) -> Result<RBig, FilterError> {
        check_inputs(self.arg_count, inputs)?;
        let inputs = inputs
            .iter()
            .enumerate()
            .map(|(index, &x)| exact_from_f64(x).ok_or(FilterError::NonFiniteInput { index }))
            .collect::<Result<Vec<_>, _>>()?;

        let mut values: Vec<RBig> = Vec::with_capacity(self.steps.len());
        for step in &self.steps {
            let value = match *step {
                Step::Abs(child) => self.fetch(child, &inputs, &values).clone().abs(),
                Step::Binary { op, left, right } => {
                    let l = self.fetch(left, &inputs, &values);
                    let r = self.fetch(right, &inputs, &values);
                    match op {
                        BinaryOp::Sum => l + r,
                        BinaryOp::Difference => l - r,
                        BinaryOp::Product => l * r,
                        BinaryOp::Min => l.min(r).clone(),
                        BinaryOp::Max => l.max(r).clone(),
                    }
                }
            };
            values.push(value);
        }

        Ok(self.fetch(self.root, &inputs, &values).clone())
    }

    fn fetch<'a>(&'a self, operand: Operand, inputs: &'a [RBig], values: &'a [RBig]) -> &'a RBig {
        match operand {
            Operand::Input(i) => &inputs[i],
            Operand::Constant(i) => &self.constants[i],
            Operand::Value(i) => &values[i],
        }
    }
}

impl SignStage for RationalStage {
    fn arg_count(&self) -> usize {
        self.arg_count
    }

    fn sign(&self, inputs: &[f64]) -> Result<Sign, FilterError> {
        let value = self.evaluate(inputs)?;
        Ok(Sign::from(value.cmp(&RBig::ZERO)))
    }
}

/// Exact sign of the formula rooted at `root`, compiling a throwaway stage.
///
/// # Errors
///
/// Returns the shape or input errors of [`RationalStage`].
pub fn exact_sign(arena: &ExprArena, root: ExprHandle, inputs: &[f64]) -> Result<Sign, FilterError> {
    RationalStage::new(arena, root)?.sign(inputs)
}

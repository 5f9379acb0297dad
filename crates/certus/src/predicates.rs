//! Ready-made robust geometric predicates.
//!
//! Each predicate is a formula compiled once into a staged chain: the
//! signs-only filter first, then (with the `exact` feature) the rational
//! stage. The compiled tables are immutable and shared by every caller.

use certus_core::{ExprArena, ExprHandle, ShapeError};
use certus_filter::{FilterError, Sign, SignStage, SignsOnlyFilter, StagedPredicate};
use log::debug;
use once_cell::sync::Lazy;

#[cfg(feature = "exact")]
use certus_exact::RationalStage;

/// A point in the plane.
pub type Point = (f64, f64);

/// A compiled formula together with its stage chain.
#[derive(Debug)]
pub struct Predicate {
    arena: ExprArena,
    root: ExprHandle,
    chain: StagedPredicate,
}

impl Predicate {
    /// Compiles the formula rooted at `root` into a filter-first chain.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::Shape`] if the formula cannot be compiled.
    pub fn compile(arena: ExprArena, root: ExprHandle) -> Result<Self, FilterError> {
        let filter = SignsOnlyFilter::new(&arena, root)?;
        debug!(
            "predicate {root}: {} approximations, {} deductions",
            filter.approximation_count(),
            filter.deduction_count()
        );
        let chain = StagedPredicate::new(filter);
        #[cfg(feature = "exact")]
        let chain = chain.then(RationalStage::new(&arena, root)?)?;

        Ok(Self { arena, root, chain })
    }

    /// The arena holding the formula.
    #[must_use]
    pub fn arena(&self) -> &ExprArena {
        &self.arena
    }

    /// Root of the formula.
    #[must_use]
    pub fn root(&self) -> ExprHandle {
        self.root
    }
}

impl SignStage for Predicate {
    fn arg_count(&self) -> usize {
        self.chain.arg_count()
    }

    fn sign(&self, inputs: &[f64]) -> Result<Sign, FilterError> {
        self.chain.sign(inputs)
    }
}

/// Builds `(ax - cx) * (by - cy) - (ay - cy) * (bx - cx)` over arguments
/// `ax, ay, bx, by, cx, cy` = 1..=6.
///
/// Positive when `c` lies to the left of the directed line `a -> b`.
///
/// # Errors
///
/// Never fails for a well-formed arena; the `Result` carries leaf errors.
pub fn orient2d_expression(arena: &mut ExprArena) -> Result<ExprHandle, ShapeError> {
    let [ax, ay, bx, by, cx, cy] = arguments::<6>(arena)?;
    let acx = arena.difference(ax, cx);
    let bcy = arena.difference(by, cy);
    let acy = arena.difference(ay, cy);
    let bcx = arena.difference(bx, cx);
    let left = arena.product(acx, bcy);
    let right = arena.product(acy, bcx);
    Ok(arena.difference(left, right))
}

/// Builds the lifted 3x3 in-circle determinant over arguments
/// `ax, ay, bx, by, cx, cy, dx, dy` = 1..=8.
///
/// Positive when `d` lies inside the circle through `a, b, c` given in
/// counter-clockwise order, zero when it lies on it.
///
/// # Errors
///
/// Never fails for a well-formed arena; the `Result` carries leaf errors.
pub fn incircle_expression(arena: &mut ExprArena) -> Result<ExprHandle, ShapeError> {
    let [ax, ay, bx, by, cx, cy, dx, dy] = arguments::<8>(arena)?;
    let adx = arena.difference(ax, dx);
    let ady = arena.difference(ay, dy);
    let bdx = arena.difference(bx, dx);
    let bdy = arena.difference(by, dy);
    let cdx = arena.difference(cx, dx);
    let cdy = arena.difference(cy, dy);

    let mut lift = |x: ExprHandle, y: ExprHandle| {
        let xx = arena.product(x, x);
        let yy = arena.product(y, y);
        arena.sum(xx, yy)
    };
    let alift = lift(adx, ady);
    let blift = lift(bdx, bdy);
    let clift = lift(cdx, cdy);

    let mut cross = |p: ExprHandle, q: ExprHandle, r: ExprHandle, s: ExprHandle| {
        let pq = arena.product(p, q);
        let rs = arena.product(r, s);
        arena.difference(pq, rs)
    };
    let bc = cross(bdx, cdy, cdx, bdy);
    let ca = cross(cdx, ady, adx, cdy);
    let ab = cross(adx, bdy, bdx, ady);

    let ta = arena.product(alift, bc);
    let tb = arena.product(blift, ca);
    let tc = arena.product(clift, ab);
    let head = arena.sum(ta, tb);
    Ok(arena.sum(head, tc))
}

fn arguments<const N: usize>(arena: &mut ExprArena) -> Result<[ExprHandle; N], ShapeError> {
    let mut handles = [ExprHandle::new(0); N];
    for (n, handle) in (1u32..).zip(handles.iter_mut()) {
        *handle = arena.argument(n)?;
    }
    Ok(handles)
}

fn build(shape: fn(&mut ExprArena) -> Result<ExprHandle, ShapeError>) -> Result<Predicate, FilterError> {
    let mut arena = ExprArena::new();
    let root = shape(&mut arena)?;
    Predicate::compile(arena, root)
}

static ORIENT2D: Lazy<Result<Predicate, FilterError>> = Lazy::new(|| build(orient2d_expression));
static INCIRCLE: Lazy<Result<Predicate, FilterError>> = Lazy::new(|| build(incircle_expression));

fn shared(predicate: &'static Lazy<Result<Predicate, FilterError>>) -> Result<&'static Predicate, FilterError> {
    predicate.as_ref().map_err(Clone::clone)
}

/// Orientation of `c` relative to the directed line `a -> b`:
/// `Positive` for a left turn, `Negative` for a right turn, `Zero` when
/// collinear.
///
/// # Errors
///
/// Returns [`FilterError::NonFiniteInput`] for NaN or infinite coordinates.
pub fn orient2d(a: Point, b: Point, c: Point) -> Result<Sign, FilterError> {
    shared(&ORIENT2D)?.sign(&[a.0, a.1, b.0, b.1, c.0, c.1])
}

/// Position of `d` relative to the circle through `a, b, c` (counter-clockwise):
/// `Positive` inside, `Negative` outside, `Zero` on the circle.
///
/// # Errors
///
/// Returns [`FilterError::NonFiniteInput`] for NaN or infinite coordinates.
pub fn incircle(a: Point, b: Point, c: Point, d: Point) -> Result<Sign, FilterError> {
    shared(&INCIRCLE)?.sign(&[a.0, a.1, b.0, b.1, c.0, c.1, d.0, d.1])
}

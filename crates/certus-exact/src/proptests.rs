//! Property-based soundness tests for the signs-only filter.

#[cfg(test)]
mod tests {
    use certus_core::{ExprArena, ExprHandle};
    use certus_filter::{Sign, SignStage, SignsOnlyFilter};
    use proptest::prelude::*;

    use crate::RationalStage;

    const ARITY: usize = 4;

    /// A formula shape, built into an arena on demand.
    #[derive(Debug, Clone)]
    enum Recipe {
        Arg(u32),
        Const(f64),
        Sum(Box<Recipe>, Box<Recipe>),
        Difference(Box<Recipe>, Box<Recipe>),
        Product(Box<Recipe>, Box<Recipe>),
        Min(Box<Recipe>, Box<Recipe>),
        Max(Box<Recipe>, Box<Recipe>),
        Abs(Box<Recipe>),
    }

    impl Recipe {
        /// Interns the recipe, reading argument `slot[n - 1]` for `Arg(n)`.
        fn build(&self, arena: &mut ExprArena, slot: &[u32; ARITY]) -> ExprHandle {
            match self {
                Recipe::Arg(n) => arena.argument(slot[*n as usize - 1]).unwrap(),
                Recipe::Const(c) => arena.constant(*c).unwrap(),
                Recipe::Sum(l, r) => {
                    let (l, r) = (l.build(arena, slot), r.build(arena, slot));
                    arena.sum(l, r)
                }
                Recipe::Difference(l, r) => {
                    let (l, r) = (l.build(arena, slot), r.build(arena, slot));
                    arena.difference(l, r)
                }
                Recipe::Product(l, r) => {
                    let (l, r) = (l.build(arena, slot), r.build(arena, slot));
                    arena.product(l, r)
                }
                Recipe::Min(l, r) => {
                    let (l, r) = (l.build(arena, slot), r.build(arena, slot));
                    arena.min(l, r)
                }
                Recipe::Max(l, r) => {
                    let (l, r) = (l.build(arena, slot), r.build(arena, slot));
                    arena.max(l, r)
                }
                Recipe::Abs(c) => {
                    let c = c.build(arena, slot);
                    arena.abs(c)
                }
            }
        }

        /// Plain recursive `f64` evaluation.
        fn float(&self, inputs: &[f64]) -> f64 {
            match self {
                Recipe::Arg(n) => inputs[*n as usize - 1],
                Recipe::Const(c) => *c,
                Recipe::Sum(l, r) => l.float(inputs) + r.float(inputs),
                Recipe::Difference(l, r) => l.float(inputs) - r.float(inputs),
                Recipe::Product(l, r) => l.float(inputs) * r.float(inputs),
                Recipe::Min(l, r) => l.float(inputs).min(r.float(inputs)),
                Recipe::Max(l, r) => l.float(inputs).max(r.float(inputs)),
                Recipe::Abs(c) => c.float(inputs).abs(),
            }
        }
    }

    const IDENTITY: [u32; ARITY] = [1, 2, 3, 4];

    fn recipe() -> impl Strategy<Value = Recipe> {
        let leaf = prop_oneof![
            4 => (1u32..=4).prop_map(Recipe::Arg),
            1 => prop::sample::select(vec![0.0, 1.0, -0.5, 3.0]).prop_map(Recipe::Const),
        ];
        leaf.prop_recursive(5, 48, 2, |inner| {
            prop_oneof![
                (inner.clone(), inner.clone())
                    .prop_map(|(l, r)| Recipe::Sum(Box::new(l), Box::new(r))),
                (inner.clone(), inner.clone())
                    .prop_map(|(l, r)| Recipe::Difference(Box::new(l), Box::new(r))),
                (inner.clone(), inner.clone())
                    .prop_map(|(l, r)| Recipe::Product(Box::new(l), Box::new(r))),
                (inner.clone(), inner.clone())
                    .prop_map(|(l, r)| Recipe::Min(Box::new(l), Box::new(r))),
                (inner.clone(), inner.clone())
                    .prop_map(|(l, r)| Recipe::Max(Box::new(l), Box::new(r))),
                inner.prop_map(|c| Recipe::Abs(Box::new(c))),
            ]
        })
    }

    /// Inputs that stress rounding: zeros, powers of two, near-ties,
    /// huge and tiny magnitudes.
    fn adversarial_input() -> impl Strategy<Value = f64> {
        prop_oneof![
            Just(0.0),
            (-8i32..=8).prop_map(f64::from),
            (-60i32..=60, any::<bool>()).prop_map(|(e, neg)| {
                let v = 2f64.powi(e);
                if neg { -v } else { v }
            }),
            (-4i32..=4).prop_map(|k| 1.0 + f64::from(k) * f64::EPSILON),
            prop::sample::select(vec![1e300, -1e300, 1e-300, -1e-300, 1e16, -1e16]),
            -1e6f64..1e6,
        ]
    }

    /// Inputs for which a depth-5 formula neither overflows nor underflows.
    fn moderate_input() -> impl Strategy<Value = f64> {
        prop_oneof![
            Just(0.0),
            (-8i32..=8).prop_map(f64::from),
            (-20i32..=20, any::<bool>()).prop_map(|(e, neg)| {
                let v = 2f64.powi(e);
                if neg { -v } else { v }
            }),
            (-4i32..=4).prop_map(|k| 1.0 + f64::from(k) * f64::EPSILON),
        ]
    }

    fn inputs(element: impl Strategy<Value = f64>) -> impl Strategy<Value = Vec<f64>> {
        prop::collection::vec(element, ARITY)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn filter_is_sound_on_every_subexpression(r in recipe(), x in inputs(adversarial_input())) {
            let mut arena = ExprArena::new();
            r.build(&mut arena, &IDENTITY);

            for handle in arena.handles() {
                let filter = SignsOnlyFilter::with_arity(&arena, handle, ARITY).unwrap();
                let exact = RationalStage::with_arity(&arena, handle, ARITY).unwrap();
                let got = filter.evaluate_sign(&x).unwrap();
                let truth = exact.sign(&x).unwrap();

                prop_assert!(truth.is_certain());
                if got.is_certain() {
                    prop_assert_eq!(got, truth, "node {} at {:?}", handle, x);
                }
            }
        }

        #[test]
        fn filter_is_deterministic(r in recipe(), x in inputs(adversarial_input())) {
            let mut arena = ExprArena::new();
            let root = r.build(&mut arena, &IDENTITY);
            let filter = SignsOnlyFilter::with_arity(&arena, root, ARITY).unwrap();

            let first = filter.evaluate_sign(&x).unwrap();
            prop_assert_eq!(filter.evaluate_sign(&x).unwrap(), first);

            // A second compilation of the same shape behaves identically.
            let again = SignsOnlyFilter::with_arity(&arena, root, ARITY).unwrap();
            prop_assert_eq!(again.evaluate_sign(&x).unwrap(), first);
        }

        #[test]
        fn argument_bindings_follow_permutation(
            r in recipe(),
            x in inputs(adversarial_input()),
            perm in Just(IDENTITY.to_vec()).prop_shuffle(),
        ) {
            let slot: [u32; ARITY] = [perm[0], perm[1], perm[2], perm[3]];

            let mut arena = ExprArena::new();
            let root = r.build(&mut arena, &IDENTITY);
            let plain = SignsOnlyFilter::with_arity(&arena, root, ARITY).unwrap();

            // Argument n now reads slot[n - 1]; move inputs to match.
            let mut moved = vec![0.0; ARITY];
            for (n, &target) in slot.iter().enumerate() {
                moved[target as usize - 1] = x[n];
            }
            let mut permuted_arena = ExprArena::new();
            let permuted_root = r.build(&mut permuted_arena, &slot);
            let permuted = SignsOnlyFilter::with_arity(&permuted_arena, permuted_root, ARITY).unwrap();

            prop_assert_eq!(
                plain.evaluate_sign(&x).unwrap(),
                permuted.evaluate_sign(&moved).unwrap()
            );
        }

        #[test]
        fn sign_exact_nodes_float_correctly(r in recipe(), x in inputs(moderate_input())) {
            let mut arena = ExprArena::new();
            let root = r.build(&mut arena, &IDENTITY);
            prop_assume!(arena.props(root).sign_exact);

            let truth = RationalStage::with_arity(&arena, root, ARITY)
                .unwrap()
                .sign(&x)
                .unwrap();
            prop_assert_eq!(Sign::of(r.float(&x)), truth);
        }
    }

    #[test]
    fn classic_near_degenerate_orientation() {
        // Points on the line y = x, the third nudged by one ulp.
        let mut arena = ExprArena::new();
        let x: Vec<_> = (1..=6).map(|i| arena.argument(i).unwrap()).collect();
        let adx = arena.difference(x[0], x[4]);
        let bdy = arena.difference(x[3], x[5]);
        let ady = arena.difference(x[1], x[5]);
        let bdx = arena.difference(x[2], x[4]);
        let l = arena.product(adx, bdy);
        let r = arena.product(ady, bdx);
        let root = arena.difference(l, r);

        let filter = SignsOnlyFilter::new(&arena, root).unwrap();
        let exact = RationalStage::new(&arena, root).unwrap();

        let base = 0.5;
        for k in 0..64 {
            let nudge = base + f64::from(k) * f64::EPSILON;
            let pts = [0.1, 0.1, 12.0, 12.0, nudge, 0.5];
            let got = filter.evaluate_sign(&pts).unwrap();
            let truth = exact.sign(&pts).unwrap();
            if got.is_certain() {
                assert_eq!(got, truth, "k = {k}");
            }
        }
    }
}

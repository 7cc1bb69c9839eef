use std::{cmp::Ordering, mem::discriminant};

use log::{debug, trace};
use smallvec::SmallVec;
use symbolica::atom::Atom;

use crate::{idx::Idx, value::IndexValue};

/// Index lists of a single tensor term rarely exceed a handful of entries.
pub type IndexList<V = Atom> = SmallVec<[Idx<V>; 4]>;

/// Free and dummy indices of a collection, both in canonical order. Each
/// contracted pair contributes one entry to `dummy`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreeDummy<V = Atom> {
    pub free: IndexList<V>,
    pub dummy: IndexList<V>,
}

impl<V> Default for FreeDummy<V> {
    fn default() -> Self {
        FreeDummy {
            free: SmallVec::new(),
            dummy: SmallVec::new(),
        }
    }
}

/// Whether `a` and `b` are the two halves of a contraction.
///
/// Indices of different kinds never pair, whatever their values.
pub fn is_dummy_pair<V: IndexValue>(a: &Idx<V>, b: &Idx<V>) -> bool {
    if discriminant(a) != discriminant(b) {
        return false;
    }
    match (a, b) {
        (Idx::Plain(a), Idx::Plain(b)) => a.pairs_with(b),
        (Idx::Variant(a), Idx::Variant(b)) => a.pairs_with(b),
        _ => false,
    }
}

/// Brings indices into canonical order, in which the halves of every dummy
/// pair are adjacent. Exchange sort; index lists are short.
pub fn sort_indices<V: IndexValue>(indices: &mut [Idx<V>]) {
    if indices.len() < 2 {
        return;
    }
    for i in 0..indices.len() - 1 {
        for j in i + 1..indices.len() {
            if indices[i].compare(&indices[j]) == Ordering::Greater {
                indices.swap(i, j);
            }
        }
    }
}

/// Splits `indices` into free and dummy indices.
///
/// A lone index is free when its value is a symbol. Otherwise the collection
/// is sorted canonically and scanned pairwise: a dummy pair records its
/// second index as dummy, a repeated identical index drops both occurrences,
/// and anything else with a symbolic value is free. Numeric indices are fixed
/// components and end up in neither list.
pub fn find_free_and_dummy<V: IndexValue>(indices: &[Idx<V>]) -> FreeDummy<V> {
    let mut out = FreeDummy::default();

    match indices {
        [] => return out,
        [single] => {
            if single.value().is_symbol() {
                out.free.push(single.clone());
            }
            return out;
        }
        _ => {}
    }

    let mut sorted: IndexList<V> = indices.iter().cloned().collect();
    sort_indices(&mut sorted);

    let mut i = 1;
    while i < sorted.len() {
        let (last, current) = (&sorted[i - 1], &sorted[i]);
        if is_dummy_pair(current, last) {
            trace!("contracting {} with {}", last, current);
            out.dummy.push(current.clone());
            i += 2;
        } else if current == last {
            debug!("dropping repeated index {}", current);
            i += 2;
        } else {
            if last.value().is_symbol() {
                out.free.push(last.clone());
            }
            i += 1;
        }
    }

    // i == len leaves the final index unconsumed; i == len + 1 means it closed a pair
    if i == sorted.len() {
        let last = &sorted[i - 1];
        if last.value().is_symbol() {
            out.free.push(last.clone());
        }
    }

    debug!(
        "{} indices: {} free, {} dummy",
        sorted.len(),
        out.free.len(),
        out.dummy.len()
    );
    out
}

/// Indices of `a`, in their original order, that do not occur in `b`.
/// Occurrence means exact equality, including kind and variance.
pub fn index_set_difference<V: IndexValue>(a: &[Idx<V>], b: &[Idx<V>]) -> IndexList<V> {
    a.iter().filter(|i| !b.contains(i)).cloned().collect()
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use symbolica::{atom::Atom, parse};

    use super::*;
    use crate::idx::Variance::{Contravariant, Covariant};

    fn sym(name: &str) -> Atom {
        parse!(name)
    }

    fn plain(value: &str, dim: i64) -> Idx {
        Idx::new(sym(value), Atom::num(dim)).unwrap()
    }

    fn var(value: &str, dim: i64, variance: crate::idx::Variance) -> Idx {
        Idx::variant(sym(value), Atom::num(dim), variance).unwrap()
    }

    fn sample() -> Vec<Idx> {
        vec![
            var("mu", 4, Covariant),
            var("nu", 4, Contravariant),
            plain("a", 8),
            var("mu", 4, Contravariant),
            Idx::new(Atom::num(2), Atom::num(3)).unwrap(),
            plain("a", 8),
            var("rho", 4, Covariant),
            Idx::new(parse!("2*n+1"), Atom::num(3)).unwrap(),
        ]
    }

    #[test]
    fn plain_pair_is_dummy() {
        let res = find_free_and_dummy(&[plain("x", 3), plain("x", 3)]);
        assert_eq!(res.dummy.as_slice(), &[plain("x", 3)]);
        assert!(res.free.is_empty());
    }

    #[test]
    fn opposite_variance_pair_is_dummy() {
        let res = find_free_and_dummy(&[var("mu", 4, Covariant), var("mu", 4, Contravariant)]);
        assert_eq!(res.dummy.len(), 1);
        assert_eq!(res.dummy[0].value(), &sym("mu"));
        assert!(res.free.is_empty());
    }

    #[test]
    fn repeated_covariant_index_is_dropped() {
        let res = find_free_and_dummy(&[var("mu", 4, Covariant), var("mu", 4, Covariant)]);
        assert!(res.dummy.is_empty());
        assert!(res.free.is_empty());
    }

    #[test]
    fn lone_numeric_index_is_neither() {
        let res = find_free_and_dummy(&[Idx::new(Atom::num(5), Atom::num(3)).unwrap()]);
        assert_eq!(res, FreeDummy::default());
    }

    #[test]
    fn lone_symbolic_index_is_free() {
        let res = find_free_and_dummy(&[var("mu", 4, Contravariant)]);
        assert_eq!(res.free.as_slice(), &[var("mu", 4, Contravariant)]);
        assert!(res.dummy.is_empty());
    }

    #[test]
    fn empty_collection() {
        assert_eq!(find_free_and_dummy::<Atom>(&[]), FreeDummy::default());
    }

    #[test]
    fn trailing_index_is_flushed() {
        let res = find_free_and_dummy(&[plain("x", 3), plain("y", 3), plain("x", 3)]);
        assert_eq!(res.dummy.as_slice(), &[plain("x", 3)]);
        assert_eq!(res.free.as_slice(), &[plain("y", 3)]);

        let res = find_free_and_dummy(&[plain("x", 3), plain("y", 3)]);
        assert_eq!(res.free.len(), 2);
        assert!(res.dummy.is_empty());
    }

    #[test]
    fn mixed_collection() {
        let res = find_free_and_dummy(&sample());

        let mut dummies = res.dummy.iter().map(|i| i.value().clone()).collect_vec();
        dummies.sort();
        let mut expected = vec![sym("mu"), sym("a")];
        expected.sort();
        assert_eq!(dummies, expected);

        assert_eq!(res.free.len(), 2);
        assert!(res.free.contains(&var("nu", 4, Contravariant)));
        assert!(res.free.contains(&var("rho", 4, Covariant)));
    }

    #[test]
    fn dimensions_must_match() {
        assert!(!is_dummy_pair(&plain("x", 3), &plain("x", 4)));
        let res = find_free_and_dummy(&[plain("x", 3), plain("x", 4)]);
        assert_eq!(res.free.len(), 2);
    }

    #[test]
    fn compound_values_never_pair() {
        let a = Idx::new(parse!("2*n+1"), Atom::num(3)).unwrap();
        assert!(!is_dummy_pair(&a, &a.clone()));

        let fixed = Idx::new(Atom::num(1), Atom::num(3)).unwrap();
        assert!(!is_dummy_pair(&fixed, &fixed.clone()));
    }

    #[test]
    fn kinds_must_match() {
        let p = plain("mu", 4);
        for v in [var("mu", 4, Covariant), var("mu", 4, Contravariant)] {
            assert!(!is_dummy_pair(&p, &v));
            assert!(!is_dummy_pair(&v, &p));
        }

        let res = find_free_and_dummy(&[p.clone(), var("mu", 4, Contravariant)]);
        assert!(res.dummy.is_empty());
        assert_eq!(res.free.len(), 2);
    }

    #[test]
    fn variance_must_differ() {
        let co = var("mu", 4, Covariant);
        let contra = var("mu", 4, Contravariant);
        assert!(is_dummy_pair(&co, &contra));
        assert!(!is_dummy_pair(&co, &co));
        assert!(!is_dummy_pair(&contra, &contra));
    }

    #[test]
    fn pairing_is_symmetric() {
        let indices = sample();
        for (a, b) in indices.iter().cartesian_product(indices.iter()) {
            assert_eq!(is_dummy_pair(a, b), is_dummy_pair(b, a), "{a} {b}");
        }
    }

    #[test]
    fn pair_candidates_are_adjacent() {
        let mut indices = vec![
            var("mu", 4, Contravariant),
            var("nu", 4, Covariant),
            var("mu", 4, Covariant),
        ];
        sort_indices(&mut indices);

        let mu = indices
            .iter()
            .positions(|i| i.value() == &sym("mu"))
            .collect_vec();
        assert_eq!(mu.len(), 2);
        assert_eq!(mu[1], mu[0] + 1);
        assert!(indices[mu[0]].is_covariant());
    }

    #[test]
    fn sort_is_idempotent() {
        let mut once = sample();
        sort_indices(&mut once);
        let mut twice = once.clone();
        sort_indices(&mut twice);
        assert_eq!(once, twice);

        let mut std_sorted = sample();
        std_sorted.sort();
        assert_eq!(once, std_sorted);
    }

    #[test]
    fn classification_ignores_input_order() {
        let indices = vec![
            var("mu", 4, Covariant),
            plain("a", 8),
            var("mu", 4, Contravariant),
            var("nu", 4, Covariant),
            plain("a", 8),
        ];
        let reference = find_free_and_dummy(&indices);
        assert_eq!(reference.dummy.len(), 2);
        assert_eq!(reference.free.as_slice(), &[var("nu", 4, Covariant)]);

        for perm in indices.iter().cloned().permutations(indices.len()) {
            assert_eq!(find_free_and_dummy(&perm), reference);
        }
    }

    #[test]
    fn repeated_index_handling_ignores_input_order() {
        let (co, contra) = (var("mu", 4, Covariant), var("mu", 4, Contravariant));

        // co co | contra: the identical pair is dropped, the trailing index is free
        let indices = [co.clone(), co.clone(), contra.clone()];
        for perm in indices.iter().cloned().permutations(indices.len()) {
            let res = find_free_and_dummy(&perm);
            assert!(res.dummy.is_empty(), "{perm:?}");
            assert_eq!(res.free.as_slice(), &[contra.clone()], "{perm:?}");
        }

        // co contra | contra: one contraction, the leftover contravariant index is free
        let indices = [co.clone(), contra.clone(), contra.clone()];
        for perm in indices.iter().cloned().permutations(indices.len()) {
            let res = find_free_and_dummy(&perm);
            assert_eq!(res.dummy.as_slice(), &[contra.clone()], "{perm:?}");
            assert_eq!(res.free.as_slice(), &[contra.clone()], "{perm:?}");
        }
    }

    #[test]
    fn difference_keeps_order() {
        let (a, b, c) = (plain("a", 3), plain("b", 3), plain("c", 3));
        let diff = index_set_difference(&[a.clone(), b.clone(), c.clone()], &[b]);
        assert_eq!(diff.as_slice(), &[a, c]);
    }

    #[test]
    fn difference_is_exact() {
        let co = var("mu", 4, Covariant);
        let contra = var("mu", 4, Contravariant);
        let diff = index_set_difference(&[co.clone(), plain("mu", 4)], &[contra]);
        assert_eq!(diff.as_slice(), &[co, plain("mu", 4)]);

        let diff = index_set_difference(&[plain("mu", 4)], &[plain("mu", 5)]);
        assert_eq!(diff.len(), 1);
        assert!(index_set_difference::<Atom>(&[], &[plain("mu", 4)]).is_empty());
    }
}

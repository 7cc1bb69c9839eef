use std::fmt::Display;

use symbolica::{
    atom::{Atom, AtomCore, AtomView},
    domains::rational::Rational,
    id::Replacement,
};

/// The part of the expression kernel an index relies on.
///
/// Indices never look inside their values beyond these queries, so any
/// expression type with a total order, a substitution primitive and a notion
/// of "atomic symbol" can be carried.
pub trait IndexValue: Clone + Ord + Display {
    /// True for a bare symbolic name such as `mu`, false for compound
    /// expressions like `2*n+1` and for numbers.
    fn is_symbol(&self) -> bool;

    /// True for a bare numeric literal.
    fn is_numeric(&self) -> bool;

    /// True only for a numeric literal that is an integer greater than zero.
    fn is_positive_integer(&self) -> bool;

    /// Simultaneous substitution of `patterns[i]` by `replacements[i]`.
    fn subs(&self, patterns: &[Self], replacements: &[Self]) -> Self;

    /// Form written into archive records.
    fn to_canonical(&self) -> String {
        self.to_string()
    }
}

impl IndexValue for Atom {
    fn is_symbol(&self) -> bool {
        matches!(self.as_view(), AtomView::Var(_))
    }

    fn is_numeric(&self) -> bool {
        matches!(self.as_view(), AtomView::Num(_))
    }

    fn is_positive_integer(&self) -> bool {
        match self.as_view() {
            view @ AtomView::Num(_) => Rational::try_from(view)
                .is_ok_and(|r| r.is_integer() && !r.is_negative() && !r.is_zero()),
            _ => false,
        }
    }

    fn subs(&self, patterns: &[Self], replacements: &[Self]) -> Self {
        let reps = patterns
            .iter()
            .zip(replacements)
            .map(|(lhs, rhs)| Replacement::new(lhs.to_pattern(), rhs.to_pattern()))
            .collect::<Vec<_>>();
        self.replace_multiple(&reps)
    }

    fn to_canonical(&self) -> String {
        self.to_canonical_string()
    }
}

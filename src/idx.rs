use std::{borrow::Cow, cmp::Ordering, fmt, sync::Arc};

use serde::{Deserialize, Serialize};
use symbolica::atom::Atom;
use thiserror::Error;

use crate::value::IndexValue;


#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdxError {
    #[error("dimension of space must be a positive integer, got {0}")]
    InvalidDimension(String),
}

/// Position of a variant index. Covariant sorts first.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variance {
    Covariant,
    Contravariant,
}

impl Variance {
    pub fn toggle(self) -> Self {
        match self {
            Variance::Covariant => Variance::Contravariant,
            Variance::Contravariant => Variance::Covariant,
        }
    }

    pub fn is_covariant(self) -> bool {
        self == Variance::Covariant
    }
}

/// Value and dimension of an index, shared by every kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainIdx<V = Atom> {
    value: Arc<V>,
    dim: Arc<V>,
}

impl<V: IndexValue> PlainIdx<V> {
    fn new(value: Arc<V>, dim: Arc<V>) -> Result<Self, IdxError> {
        if dim.is_numeric() && !dim.is_positive_integer() {
            return Err(IdxError::InvalidDimension(dim.to_string()));
        }
        Ok(PlainIdx { value, dim })
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn dim(&self) -> &V {
        &self.dim
    }

    /// Value first, then dimension.
    pub fn compare(&self, other: &Self) -> Ordering {
        self.value
            .cmp(&other.value)
            .then_with(|| self.dim.cmp(&other.dim))
    }

    /// Only pure symbols form dummy pairs, `2*n+1` never does.
    pub(crate) fn pairs_with(&self, other: &Self) -> bool {
        self.value.is_symbol() && self.value == other.value && self.dim == other.dim
    }

    fn with_value(&self, value: Arc<V>) -> Self {
        PlainIdx {
            value,
            dim: Arc::clone(&self.dim),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarIdx<V = Atom> {
    base: PlainIdx<V>,
    variance: Variance,
}

impl<V: IndexValue> VarIdx<V> {
    pub fn base(&self) -> &PlainIdx<V> {
        &self.base
    }

    pub fn variance(&self) -> Variance {
        self.variance
    }

    /// Variance is compared last so that the two halves of a dummy pair end
    /// up next to each other after sorting.
    pub fn compare(&self, other: &Self) -> Ordering {
        self.base
            .compare(&other.base)
            .then_with(|| self.variance.cmp(&other.variance))
    }

    pub(crate) fn pairs_with(&self, other: &Self) -> bool {
        self.variance != other.variance && self.base.pairs_with(&other.base)
    }

    pub fn toggle_variance(&self) -> Self {
        VarIdx {
            base: self.base.clone(),
            variance: self.variance.toggle(),
        }
    }
}

/// An index of a tensor slot.
///
/// Indices are immutable: substitution and variance toggling hand back new
/// values, and the value and dimension expressions are reference counted so
/// those copies share structure with the original.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Idx<V = Atom> {
    Plain(PlainIdx<V>),
    Variant(VarIdx<V>),
}

/// One entry of a substitution list: either a whole index or an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subs<V = Atom> {
    Index(Idx<V>),
    Expr(V),
}

impl<V> From<Idx<V>> for Subs<V> {
    fn from(value: Idx<V>) -> Self {
        Subs::Index(value)
    }
}

impl From<Atom> for Subs<Atom> {
    fn from(value: Atom) -> Self {
        Subs::Expr(value)
    }
}

/// Named fields a persistence layer stores for an index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdxRecord {
    pub value: String,
    pub dim: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub covariant: Option<bool>,
}

impl<V: IndexValue> Idx<V> {
    /// A plain index. Fails if `dim` is a number that is not a positive integer.
    pub fn new(value: V, dim: V) -> Result<Self, IdxError> {
        Self::from_shared(Arc::new(value), Arc::new(dim))
    }

    pub fn variant(value: V, dim: V, variance: Variance) -> Result<Self, IdxError> {
        Self::variant_from_shared(Arc::new(value), Arc::new(dim), variance)
    }

    /// A plain index pointing into expressions already owned elsewhere.
    pub fn from_shared(value: Arc<V>, dim: Arc<V>) -> Result<Self, IdxError> {
        Ok(Idx::Plain(PlainIdx::new(value, dim)?))
    }

    pub fn variant_from_shared(
        value: Arc<V>,
        dim: Arc<V>,
        variance: Variance,
    ) -> Result<Self, IdxError> {
        Ok(Idx::Variant(VarIdx {
            base: PlainIdx::new(value, dim)?,
            variance,
        }))
    }

    pub fn base(&self) -> &PlainIdx<V> {
        match self {
            Idx::Plain(p) => p,
            Idx::Variant(v) => &v.base,
        }
    }

    pub fn value(&self) -> &V {
        self.base().value()
    }

    pub fn dim(&self) -> &V {
        self.base().dim()
    }

    pub fn value_arc(&self) -> &Arc<V> {
        &self.base().value
    }

    pub fn dim_arc(&self) -> &Arc<V> {
        &self.base().dim
    }

    pub fn variance(&self) -> Option<Variance> {
        match self {
            Idx::Plain(_) => None,
            Idx::Variant(v) => Some(v.variance),
        }
    }

    pub fn is_covariant(&self) -> bool {
        self.variance().is_some_and(Variance::is_covariant)
    }

    pub fn is_contravariant(&self) -> bool {
        self.variance() == Some(Variance::Contravariant)
    }

    /// The index value is a concrete number.
    pub fn is_numeric(&self) -> bool {
        self.value().is_numeric()
    }

    pub fn is_symbolic(&self) -> bool {
        !self.is_numeric()
    }

    pub fn is_dim_numeric(&self) -> bool {
        self.dim().is_numeric()
    }

    pub fn is_dim_symbolic(&self) -> bool {
        !self.is_dim_numeric()
    }

    /// Opposite variance, same value and dimension. `None` for plain indices,
    /// which carry no variance.
    pub fn toggle_variance(&self) -> Option<Self> {
        match self {
            Idx::Plain(_) => None,
            Idx::Variant(v) => Some(Idx::Variant(v.toggle_variance())),
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            Idx::Plain(_) => 0,
            Idx::Variant(_) => 1,
        }
    }

    /// Total order used for canonical sorting. Kinds are kept apart, then each
    /// kind applies its own field order.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Idx::Plain(a), Idx::Plain(b)) => a.compare(b),
            (Idx::Variant(a), Idx::Variant(b)) => a.compare(b),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }

    fn with_value(&self, value: Arc<V>) -> Self {
        match self {
            Idx::Plain(p) => Idx::Plain(p.with_value(value)),
            Idx::Variant(v) => Idx::Variant(VarIdx {
                base: v.base.with_value(value),
                variance: v.variance,
            }),
        }
    }

    /// Substitutes `patterns[i]` by `replacements[i]`.
    ///
    /// An index matching an index pattern is replaced as a whole when the
    /// replacement is an index, or gets the replacement as its new value when
    /// it is an expression. Otherwise the expression pairs are applied to the
    /// value only; the dimension is never touched. When nothing changes the
    /// index itself is returned borrowed.
    ///
    /// # Panics
    ///
    /// If the two lists differ in length.
    pub fn subs<'a>(&'a self, patterns: &[Subs<V>], replacements: &'a [Subs<V>]) -> Cow<'a, Self> {
        assert_eq!(
            patterns.len(),
            replacements.len(),
            "substitution needs as many replacements as patterns"
        );

        for (pattern, replacement) in patterns.iter().zip(replacements) {
            if matches!(pattern, Subs::Index(p) if p == self) {
                return match replacement {
                    Subs::Index(i) => Cow::Borrowed(i),
                    Subs::Expr(e) => Cow::Owned(self.with_value(Arc::new(e.clone()))),
                };
            }
        }

        let (lhs, rhs): (Vec<V>, Vec<V>) = patterns
            .iter()
            .zip(replacements)
            .filter_map(|pair| match pair {
                (Subs::Expr(p), Subs::Expr(r)) => Some((p.clone(), r.clone())),
                _ => None,
            })
            .unzip();
        if lhs.is_empty() {
            return Cow::Borrowed(self);
        }

        let value = self.value().subs(&lhs, &rhs);
        if &value == self.value() {
            Cow::Borrowed(self)
        } else {
            Cow::Owned(self.with_value(Arc::new(value)))
        }
    }

    pub fn archive(&self) -> IdxRecord {
        IdxRecord {
            value: self.value().to_canonical(),
            dim: self.dim().to_canonical(),
            covariant: self.variance().map(Variance::is_covariant),
        }
    }

    /// Raw form, e.g. `varidx(mu,dim=4,covariant=true)`.
    pub fn raw(&self) -> String {
        match self {
            Idx::Plain(p) => format!("idx({},dim={})", p.value, p.dim),
            Idx::Variant(v) => format!(
                "varidx({},dim={},covariant={})",
                v.base.value,
                v.base.dim,
                v.variance.is_covariant()
            ),
        }
    }
}

impl<V: IndexValue> PartialOrd for Idx<V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<V: IndexValue> Ord for Idx<V> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl<V: IndexValue> fmt::Display for Idx<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.is_contravariant() { '~' } else { '.' };
        let value = self.value();
        if value.is_symbol() || value.is_numeric() {
            write!(f, "{marker}{value}")
        } else {
            write!(f, "{marker}({value})")
        }
    }
}

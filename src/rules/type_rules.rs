//! Type Rules Table: which semantic types a type may point at.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::vocab::{BoxType, NodeKind};

const CANONICAL: &[(BoxType, &[BoxType])] = &[
    (BoxType::Symbol, &[BoxType::Train, BoxType::Transform, BoxType::Deduce]),
    (BoxType::Data, &[BoxType::Train, BoxType::Transform, BoxType::Deduce]),
    (BoxType::Model, &[BoxType::Deduce]),
    (BoxType::Actor, &[BoxType::Engineer]),
    (BoxType::Train, &[BoxType::Model, BoxType::Symbol]),
    (BoxType::Engineer, &[BoxType::Model, BoxType::Symbol]),
    (BoxType::Transform, &[BoxType::Data, BoxType::Symbol, BoxType::Model]),
    (BoxType::Deduce, &[BoxType::Symbol, BoxType::Data]),
];

/// Directed adjacency rules. `permits(a, b)` says nothing about `permits(b, a)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeRules {
    next: BTreeMap<BoxType, BTreeSet<BoxType>>,
}

impl TypeRules {
    pub fn canonical() -> Self {
        Self::from_pairs(
            CANONICAL
                .iter()
                .flat_map(|(from, targets)| targets.iter().map(move |to| (*from, *to))),
        )
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (BoxType, BoxType)>) -> Self {
        let mut next: BTreeMap<BoxType, BTreeSet<BoxType>> = BTreeMap::new();
        for (from, to) in pairs {
            next.entry(from).or_default().insert(to);
        }
        TypeRules { next }
    }

    /// Allowed targets for `from`. A type with no entry has none.
    pub fn allowed(&self, from: BoxType) -> impl Iterator<Item = BoxType> + '_ {
        self.next.get(&from).into_iter().flatten().copied()
    }

    pub fn permits(&self, from: BoxType, to: BoxType) -> bool {
        self.next.get(&from).is_some_and(|targets| targets.contains(&to))
    }

    /// Rule check on classified nodes. Anything without a recognized type
    /// (unrecognized names, annotations, groups) has no allowed targets and
    /// is never a legal target.
    pub fn permits_kinds(&self, from: NodeKind, to: NodeKind) -> bool {
        match (from.box_type(), to.box_type()) {
            (Some(from), Some(to)) => self.permits(from, to),
            _ => false,
        }
    }
}

impl Default for TypeRules {
    fn default() -> Self {
        Self::canonical()
    }
}

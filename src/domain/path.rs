//! Positional node addresses.

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Child indices leading from a tree root to a node.
///
/// The root's path is empty. Paths are positional: removing an earlier
/// sibling shifts the paths of the later ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Splits into the parent's path and the last index, or `None` for the root path.
    pub fn split_last(&self) -> Option<(NodePath, usize)> {
        self.0
            .split_last()
            .map(|(&last, init)| (NodePath(init.to_vec()), last))
    }

}

impl Deref for NodePath {
    type Target = [usize];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl From<&[usize]> for NodePath {
    fn from(indices: &[usize]) -> Self {
        Self(indices.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for NodePath {
    fn from(indices: [usize; N]) -> Self {
        Self(indices.to_vec())
    }
}

impl FromIterator<usize> for NodePath {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Renders as `[0, 2, 1]`; the root path renders as `[]`.
impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.iter().join(", "))
    }
}

/// Parses `0,2,1`, `[0, 2, 1]` or an empty string (root).
impl FromStr for NodePath {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = s.trim().trim_start_matches('[').trim_end_matches(']');
        inner
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::parse::<usize>)
            .collect()
    }
}

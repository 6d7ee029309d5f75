use std::collections::BTreeMap;
use std::fmt;
use std::iter::{FromIterator, IntoIterator};
use std::ops::Index;

use num_traits::identities::Zero;

use super::Integer;

// Unassigned variables read as this.
lazy_static! {
    static ref THE_ZERO: Integer = Integer::zero();
}

#[derive(Clone, Copy, Debug, Hash, Ord, Eq, PartialOrd, PartialEq)]
pub struct VarIdent(pub u32);

impl fmt::Display for VarIdent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

pub fn int(n: i64) -> Integer {
    Integer::from(n)
}

/// A total mapping from variables to integers.
///
/// Only non-zero values are stored. Every variable that is absent from the map
/// reads as zero, which makes the derived equality coincide with equality of
/// the total functions.
///
/// States are values: `set` hands out a new state and leaves `self` alone, so
/// several semantics can start from the same state without interfering.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct State(BTreeMap<VarIdent, Integer>);

impl State {
    pub fn new() -> State {
        State(BTreeMap::new())
    }

    pub fn get(&self, var: &VarIdent) -> &Integer {
        self.0.get(var).unwrap_or(&THE_ZERO)
    }

    pub fn set(&self, var: VarIdent, value: Integer) -> State {
        let mut next = self.clone();
        next.assign(var, value);
        next
    }

    fn assign(&mut self, var: VarIdent, value: Integer) {
        if value.is_zero() {
            self.0.remove(&var);
        } else {
            self.0.insert(var, value);
        }
    }

    /// Iterates over the variables with a non-zero value, in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (&VarIdent, &Integer)> {
        self.0.iter()
    }
}

impl FromIterator<(VarIdent, Integer)> for State {
    fn from_iter<I: IntoIterator<Item = (VarIdent, Integer)>>(iter: I) -> State {
        let mut state = State::new();
        for (var, value) in iter {
            state.assign(var, value);
        }
        state
    }
}

impl<'a> IntoIterator for &'a State {
    type Item = (&'a VarIdent, &'a Integer);

    type IntoIter = <&'a BTreeMap<VarIdent, Integer> as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Index<&VarIdent> for State {
    type Output = Integer;

    fn index(&self, var: &VarIdent) -> &Self::Output {
        self.get(var)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (var, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} = {}", var, value)?;
        }
        write!(f, "}}")
    }
}

use std::fmt;

use super::{eval_arith, eval_bool, Command, State};

/// What a bounded execution can report.
///
/// `Undetermined` covers both a diverging program and one that simply needed
/// a larger budget. It never means "diverges".
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    Terminated(State),
    Undetermined,
}

impl Outcome {
    pub fn is_terminated(&self) -> bool {
        matches!(self, Outcome::Terminated(_))
    }

    pub fn state(&self) -> Option<&State> {
        match self {
            Outcome::Terminated(state) => Some(state),
            Outcome::Undetermined => None,
        }
    }

    pub fn into_state(self) -> Option<State> {
        self.into()
    }

    /// Runs `next` on the final state, if there is one.
    pub fn and_then<F: FnOnce(State) -> Outcome>(self, next: F) -> Outcome {
        match self {
            Outcome::Terminated(state) => next(state),
            Outcome::Undetermined => Outcome::Undetermined,
        }
    }
}

impl From<Option<State>> for Outcome {
    fn from(result: Option<State>) -> Outcome {
        match result {
            Some(state) => Outcome::Terminated(state),
            None => Outcome::Undetermined,
        }
    }
}

impl From<Outcome> for Option<State> {
    fn from(outcome: Outcome) -> Option<State> {
        match outcome {
            Outcome::Terminated(state) => Some(state),
            Outcome::Undetermined => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Outcome::Terminated(state) => write!(f, "terminated in {}", state),
            Outcome::Undetermined => write!(f, "undetermined"),
        }
    }
}

/// Executes `command` with at most `budget` levels of unfolding.
///
/// Every command consumes one unit before looking at its parts; both halves of
/// a sequence get the remaining budget, as do the body and the rest of a loop.
/// Guards are free.
pub fn interp(budget: usize, command: &Command, state: &State) -> Option<State> {
    let rest = match budget.checked_sub(1) {
        Some(rest) => rest,
        None => {
            tracing::trace!(%command, "budget exhausted");
            return None;
        }
    };

    match command {
        Command::Skip => Some(state.clone()),
        Command::Assign(var, expr) => Some(state.set(*var, eval_arith(state, expr))),
        Command::Seq(first, second) => {
            let mid = interp(rest, first, state)?;
            interp(rest, second, &mid)
        }
        Command::If(guard, then_branch, else_branch) => {
            if eval_bool(state, guard) {
                interp(rest, then_branch, state)
            } else {
                interp(rest, else_branch, state)
            }
        }
        Command::While(guard, body) => {
            // Re-entering the loop is a tail call; unfold it in place.
            let mut fuel = rest;
            let mut current = state.clone();
            loop {
                if !eval_bool(&current, guard) {
                    return Some(current);
                }
                current = interp(fuel, body, &current)?;
                fuel = fuel.checked_sub(1)?;
            }
        }
    }
}

/// Runs `command` from `initial` within `budget`.
pub fn run(command: &Command, initial: &State, budget: usize) -> Outcome {
    let outcome = Outcome::from(interp(budget, command, initial));
    tracing::debug!(budget, %outcome, "run finished");
    outcome
}

//! The meaning of a command as the limit of the budgeted interpreter.
//!
//! For a fixed command and state, `budget -> interp(budget, ..)` is constant
//! from the first terminating budget on (monotonicity), and constantly `None`
//! if there is no such budget. That constant is the denotation. Finding it
//! takes unbounded search in general, so everything here works up to an
//! explicit limit and answers `Undetermined` beyond it.

use super::{eval_bool, interp, BExp, Command, Limits, Outcome, State};

/// A function on states, as used for candidate meanings of a loop.
pub type Meaning<'a> = Box<dyn Fn(&State) -> Outcome + 'a>;

/// The denotation of `command` from `state`, searched up to
/// `limits.search_limit`.
pub fn denote(state: &State, command: &Command, limits: &Limits) -> Outcome {
    let mut budget: usize = 1;
    loop {
        let attempt = budget.min(limits.search_limit);
        if let Some(result) = interp(attempt, command, state) {
            tracing::debug!(budget = attempt, "denotation found");
            return Outcome::Terminated(result);
        }
        if attempt >= limits.search_limit {
            tracing::debug!(search_limit = limits.search_limit, "no denotation within limit");
            return Outcome::Undetermined;
        }
        budget = budget.saturating_mul(2);
    }
}

/// `interp(0, ..)`, `interp(1, ..)`, ... without end.
pub struct Approximations<'a> {
    command: &'a Command,
    state: &'a State,
    budget: usize,
}

impl<'a> Iterator for Approximations<'a> {
    type Item = Option<State>;

    fn next(&mut self) -> Option<Option<State>> {
        let approximation = interp(self.budget, self.command, self.state);
        self.budget += 1;
        Some(approximation)
    }
}

pub fn approximations<'a>(command: &'a Command, state: &'a State) -> Approximations<'a> {
    Approximations {
        command,
        state,
        budget: 0,
    }
}

/// The smallest budget at which `command` terminates from `state`, if it is at
/// most `max`.
pub fn least_budget(command: &Command, state: &State, max: usize) -> Option<usize> {
    interp(max, command, state)?;
    // Terminating budgets are closed upwards; budget 0 never terminates.
    let (mut low, mut high) = (0, max);
    while high - low > 1 {
        let mid = low + (high - low) / 2;
        if interp(mid, command, state).is_some() {
            high = mid;
        } else {
            low = mid;
        }
    }
    Some(high)
}

/// One unfolding of `while guard do body`, with `f` standing for the loop.
pub fn while_functional<'a, F>(guard: &'a BExp, body: &'a Command, limits: Limits, f: F) -> Meaning<'a>
where
    F: Fn(&State) -> Outcome + 'a,
{
    Box::new(move |state: &State| {
        if eval_bool(state, guard) {
            denote(state, body, &limits).and_then(|mid| f(&mid))
        } else {
            Outcome::Terminated(state.clone())
        }
    })
}

/// `n` unfoldings of the loop applied to the everywhere undetermined meaning.
///
/// Terminates exactly where the loop does with at most `n` guard checks.
pub fn kleene_approximant<'a>(guard: &'a BExp, body: &'a Command, limits: Limits, n: usize) -> Meaning<'a> {
    let mut approximant: Meaning<'a> = Box::new(|_: &State| Outcome::Undetermined);
    for _ in 0..n {
        approximant = while_functional(guard, body, limits, approximant);
    }
    approximant
}

/// Whether `f` satisfies the unfolding equation of `while guard do body` at
/// each of `states`.
pub fn satisfies_while_equation<F>(guard: &BExp, body: &Command, f: F, states: &[State], limits: Limits) -> bool
where
    F: Fn(&State) -> Outcome,
{
    let unfolded = while_functional(guard, body, limits, &f);
    states.iter().all(|state| f(state) == unfolded(state))
}

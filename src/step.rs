use std::ops::Deref;
use std::rc::Rc;

use super::{eval_arith, eval_bool, Command, State};

/// A command still to be executed, together with the state it runs on.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Configuration {
    pub command: Command,
    pub state: State,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Halts {
    OnOrBefore(usize),
    NotEvenAfter(usize),
}

impl Halts {
    pub fn satisfies(&self, requirement: &Halts) -> bool {
        use Halts::*;
        match (self, requirement) {
            (NotEvenAfter(act), NotEvenAfter(exp)) => act >= exp,
            (OnOrBefore(act), NotEvenAfter(exp)) => act > exp,
            // Execution was stopped before the requirement could be decided.
            (NotEvenAfter(_), OnOrBefore(_)) => false,
            (OnOrBefore(act), OnOrBefore(exp)) => act <= exp,
        }
    }
}

impl Configuration {
    pub fn new(command: Command, state: State) -> Configuration {
        Configuration { command, state }
    }

    pub fn is_completed(&self) -> bool {
        self.command.is_skip()
    }

    /// Takes one transition. A completed configuration stays as it is.
    pub fn step(&mut self) {
        if let Some((command, state)) = step_parts(&self.command, &self.state) {
            tracing::trace!(%command, %state, "step");
            self.command = command;
            self.state = state;
        }
    }

    pub fn run(&mut self, max_steps: usize) -> Halts {
        for taken in 0..max_steps {
            if self.is_completed() {
                tracing::debug!(steps = taken, "reached skip");
                return Halts::OnOrBefore(taken);
            }
            self.step();
        }
        if self.is_completed() {
            Halts::OnOrBefore(max_steps)
        } else {
            tracing::debug!(steps = max_steps, "step limit reached");
            Halts::NotEvenAfter(max_steps)
        }
    }
}

impl Deref for Configuration {
    type Target = State;

    fn deref(&self) -> &State {
        &self.state
    }
}

/// The unique successor of `config`, or `None` if it is `Skip`.
///
/// Every other command shape has exactly one applicable rule in every state,
/// so a configuration without successor is always a completed one.
pub fn step_once(config: &Configuration) -> Option<Configuration> {
    step_parts(&config.command, &config.state).map(|(command, state)| Configuration { command, state })
}

fn step_parts(command: &Command, state: &State) -> Option<(Command, State)> {
    match command {
        Command::Skip => None,
        Command::Assign(var, expr) => Some((Command::Skip, state.set(*var, eval_arith(state, expr)))),
        Command::Seq(first, second) => {
            if first.is_skip() {
                Some(((**second).clone(), state.clone()))
            } else {
                let (first, state) = step_parts(first, state)?;
                Some((Command::Seq(Rc::new(first), Rc::clone(second)), state))
            }
        }
        Command::If(guard, then_branch, else_branch) => {
            let taken = if eval_bool(state, guard) { then_branch } else { else_branch };
            Some(((**taken).clone(), state.clone()))
        }
        Command::While(guard, body) => {
            if eval_bool(state, guard) {
                let again = Rc::new(command.clone());
                Some((Command::Seq(Rc::clone(body), again), state.clone()))
            } else {
                Some((Command::Skip, state.clone()))
            }
        }
    }
}

/// All configurations `config` steps to, trying each rule on its own.
///
/// This is the step relation read as a relation rather than a function.
/// Determinism means the result never has more than one element.
pub fn successors(config: &Configuration) -> Vec<Configuration> {
    let Configuration { command, state } = config;
    let mut found = Vec::new();

    if let Command::Assign(var, expr) = command {
        found.push(Configuration::new(Command::Skip, state.set(*var, eval_arith(state, expr))));
    }
    if let Command::Seq(first, second) = command {
        let left = Configuration::new((**first).clone(), state.clone());
        for next in successors(&left) {
            found.push(Configuration::new(
                Command::Seq(Rc::new(next.command), Rc::clone(second)),
                next.state,
            ));
        }
    }
    if let Command::Seq(first, second) = command {
        if first.is_skip() {
            found.push(Configuration::new((**second).clone(), state.clone()));
        }
    }
    if let Command::If(guard, then_branch, _) = command {
        if eval_bool(state, guard) {
            found.push(Configuration::new((**then_branch).clone(), state.clone()));
        }
    }
    if let Command::If(guard, _, else_branch) = command {
        if !eval_bool(state, guard) {
            found.push(Configuration::new((**else_branch).clone(), state.clone()));
        }
    }
    if let Command::While(guard, body) = command {
        if eval_bool(state, guard) {
            found.push(Configuration::new(
                Command::Seq(Rc::clone(body), Rc::new(command.clone())),
                state.clone(),
            ));
        }
    }
    if let Command::While(guard, _) = command {
        if !eval_bool(state, guard) {
            found.push(Configuration::new(Command::Skip, state.clone()));
        }
    }

    found
}

/// The configurations visited from a starting point, the start included.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Trace(Vec<Configuration>);

impl Trace {
    // Callers supply at least the start configuration.
    pub(crate) fn new(configurations: Vec<Configuration>) -> Trace {
        debug_assert!(!configurations.is_empty());
        Trace(configurations)
    }

    pub fn configurations(&self) -> &[Configuration] {
        &self.0
    }

    pub fn steps(&self) -> usize {
        self.0.len() - 1
    }

    pub fn last(&self) -> &Configuration {
        &self.0[self.0.len() - 1]
    }

    pub fn is_terminated(&self) -> bool {
        self.last().is_completed()
    }

    /// The final state, if the trace reached `Skip`.
    pub fn final_state(&self) -> Option<&State> {
        if self.is_terminated() {
            Some(&self.last().state)
        } else {
            None
        }
    }
}

/// Follows `step_once` from `start` for at most `max_steps` transitions.
pub fn trace(start: &Configuration, max_steps: usize) -> Trace {
    let mut visited = vec![start.clone()];
    let mut current = start.clone();
    for _ in 0..max_steps {
        match step_once(&current) {
            None => break,
            Some(next) => {
                visited.push(next.clone());
                current = next;
            }
        }
    }
    Trace(visited)
}

//! Big-step semantics as explicit derivation trees.
//!
//! A judgement `initial =[ command ]=> result` holds exactly when there is a
//! finite derivation for it. Diverging programs have none, so nothing here
//! searches without a budget: trees are either checked (`Derivation::check`),
//! built within a budget (`derive`), or translated from and to small-step
//! traces.

use std::fmt;
use std::mem;
use std::rc::Rc;

use super::{eval_arith, eval_bool, interp, step_once, BExp, Command, Configuration, DerivationError, State, Trace};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Judgement {
    pub initial: State,
    pub command: Command,
    pub result: State,
}

impl fmt::Display for Judgement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} =[ {} ]=> {}", self.initial, self.command, self.result)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Rule {
    Skip,
    Assign,
    Seq(Box<Derivation>, Box<Derivation>),
    IfTrue(Box<Derivation>),
    IfFalse(Box<Derivation>),
    WhileFalse,
    /// The loop body, then the same loop from the body's result.
    WhileTrue(Box<Derivation>, Box<Derivation>),
}

impl Rule {
    pub fn name(&self) -> &'static str {
        match self {
            Rule::Skip => "E-Skip",
            Rule::Assign => "E-Assign",
            Rule::Seq(_, _) => "E-Seq",
            Rule::IfTrue(_) => "E-IfTrue",
            Rule::IfFalse(_) => "E-IfFalse",
            Rule::WhileFalse => "E-WhileFalse",
            Rule::WhileTrue(_, _) => "E-WhileTrue",
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Derivation {
    pub conclusion: Judgement,
    pub rule: Rule,
}

impl Derivation {
    fn new(initial: State, command: Command, result: State, rule: Rule) -> Derivation {
        Derivation {
            conclusion: Judgement {
                initial,
                command,
                result,
            },
            rule,
        }
    }

    pub fn initial(&self) -> &State {
        &self.conclusion.initial
    }

    pub fn command(&self) -> &Command {
        &self.conclusion.command
    }

    pub fn result(&self) -> &State {
        &self.conclusion.result
    }

    /// Longest path from the conclusion to a leaf, counting both ends.
    ///
    /// This is also the smallest budget for which `derive` finds the tree.
    pub fn height(&self) -> usize {
        // Walks down the last premise in place; only first premises recurse.
        let mut height = 0;
        let mut depth = 1;
        let mut current = self;
        loop {
            match &current.rule {
                Rule::Skip | Rule::Assign | Rule::WhileFalse => return height.max(depth),
                Rule::IfTrue(branch) | Rule::IfFalse(branch) => current = &**branch,
                Rule::Seq(first, second) | Rule::WhileTrue(first, second) => {
                    height = height.max(depth + first.height());
                    current = &**second;
                }
            }
            depth += 1;
        }
    }

    /// Verifies every rule application in the tree.
    pub fn check(&self) -> Result<(), DerivationError> {
        let mut current = self;
        while let Some(last) = current.check_rule()? {
            current = last;
        }
        Ok(())
    }

    /// Verifies the rule applied at the root and the subtrees of all premises
    /// but the last one, which is returned unchecked.
    fn check_rule(&self) -> Result<Option<&Derivation>, DerivationError> {
        let Judgement {
            initial, command, ..
        } = &self.conclusion;
        match (&self.rule, command) {
            (Rule::Skip, Command::Skip) => self.concludes(initial).map(|()| None),
            (Rule::Assign, Command::Assign(var, expr)) => self
                .concludes(&initial.set(*var, eval_arith(initial, expr)))
                .map(|()| None),
            (Rule::Seq(first, second), Command::Seq(c1, c2)) => {
                self.premise(first, initial, c1)?;
                first.check()?;
                self.premise(second, first.result(), c2)?;
                self.concludes(second.result())?;
                Ok(Some(&**second))
            }
            (Rule::IfTrue(branch), Command::If(guard, c1, _)) => {
                guard_is(guard, initial, true)?;
                self.premise(branch, initial, c1)?;
                self.concludes(branch.result())?;
                Ok(Some(&**branch))
            }
            (Rule::IfFalse(branch), Command::If(guard, _, c2)) => {
                guard_is(guard, initial, false)?;
                self.premise(branch, initial, c2)?;
                self.concludes(branch.result())?;
                Ok(Some(&**branch))
            }
            (Rule::WhileFalse, Command::While(guard, _)) => {
                guard_is(guard, initial, false)?;
                self.concludes(initial).map(|()| None)
            }
            (Rule::WhileTrue(body, again), Command::While(guard, c)) => {
                guard_is(guard, initial, true)?;
                self.premise(body, initial, c)?;
                body.check()?;
                self.premise(again, body.result(), command)?;
                self.concludes(again.result())?;
                Ok(Some(&**again))
            }
            (rule, _) => Err(DerivationError::WrongRule {
                rule: rule.name(),
                command: command.to_string(),
            }),
        }
    }

    fn concludes(&self, expected: &State) -> Result<(), DerivationError> {
        if self.result() == expected {
            Ok(())
        } else {
            Err(DerivationError::WrongResult {
                command: self.command().to_string(),
                claimed: self.result().to_string(),
                expected: expected.to_string(),
            })
        }
    }

    // Only where the premise attaches; its own subtree is checked by the caller.
    fn premise(&self, premise: &Derivation, initial: &State, command: &Command) -> Result<(), DerivationError> {
        if premise.initial() != initial || premise.command() != command {
            return Err(DerivationError::PremiseMismatch {
                command: self.command().to_string(),
                initial: initial.to_string(),
                premise: premise.command().to_string(),
                premise_initial: premise.initial().to_string(),
            });
        }
        Ok(())
    }

    /// The small-step execution this derivation describes, from
    /// `(command, initial)` to `(skip, result)`.
    pub fn to_trace(&self) -> Trace {
        let mut visited = Vec::new();
        self.push_configurations(&mut visited);
        Trace::new(visited)
    }

    fn push_configurations(&self, visited: &mut Vec<Configuration>) {
        let mut current = self;
        loop {
            let Judgement {
                initial,
                command,
                result,
            } = &current.conclusion;
            match (&current.rule, command) {
                (Rule::Seq(first, second), Command::Seq(_, c2)) => {
                    let from = visited.len();
                    first.push_configurations(visited);
                    lift_left(&mut visited[from..], c2);
                    current = &**second;
                }
                (Rule::IfTrue(branch), _) | (Rule::IfFalse(branch), _) => {
                    visited.push(Configuration::new(command.clone(), initial.clone()));
                    current = &**branch;
                }
                (Rule::WhileTrue(body, again), _) => {
                    visited.push(Configuration::new(command.clone(), initial.clone()));
                    let from = visited.len();
                    body.push_configurations(visited);
                    lift_left(&mut visited[from..], &Rc::new(command.clone()));
                    current = &**again;
                }
                (Rule::Skip, _) => {
                    visited.push(Configuration::new(Command::Skip, initial.clone()));
                    return;
                }
                _ => {
                    visited.push(Configuration::new(command.clone(), initial.clone()));
                    visited.push(Configuration::new(Command::Skip, result.clone()));
                    return;
                }
            }
        }
    }

    /// Rebuilds the derivation behind a terminated small-step trace.
    ///
    /// Every consecutive pair in `trace` must be a `step_once` transition and
    /// the last configuration must be completed.
    pub fn from_trace(trace: &Trace) -> Result<Derivation, DerivationError> {
        let visited = trace.configurations();
        for pair in visited.windows(2) {
            if step_once(&pair[0]).as_ref() != Some(&pair[1]) {
                return Err(DerivationError::InvalidStep {
                    from: pair[0].command.to_string(),
                    to: pair[1].command.to_string(),
                });
            }
        }
        if !trace.is_terminated() {
            return Err(DerivationError::Unterminated {
                command: trace.last().command.to_string(),
            });
        }
        rebuild(visited)
    }
}

impl Drop for Derivation {
    // Loops nest one `WhileTrue` per iteration, too deep to drop recursively.
    fn drop(&mut self) {
        let mut pending = take_premises(&mut self.rule);
        while let Some(mut premise) = pending.pop() {
            pending.extend(take_premises(&mut premise.rule));
        }
    }
}

fn take_premises(rule: &mut Rule) -> Vec<Box<Derivation>> {
    match mem::replace(rule, Rule::Skip) {
        Rule::Skip | Rule::Assign | Rule::WhileFalse => vec![],
        Rule::IfTrue(branch) | Rule::IfFalse(branch) => vec![branch],
        Rule::Seq(first, second) | Rule::WhileTrue(first, second) => vec![first, second],
    }
}

fn guard_is(guard: &BExp, state: &State, expected: bool) -> Result<(), DerivationError> {
    let actual = eval_bool(state, guard);
    if actual == expected {
        Ok(())
    } else {
        Err(DerivationError::GuardMismatch {
            guard: guard.to_string(),
            state: state.to_string(),
            actual,
        })
    }
}

fn lift_left(visited: &mut [Configuration], second: &Rc<Command>) {
    for conf in visited {
        let first = mem::replace(&mut conf.command, Command::Skip);
        conf.command = Command::Seq(Rc::new(first), Rc::clone(second));
    }
}

fn unterminated(visited: &[Configuration]) -> DerivationError {
    DerivationError::Unterminated {
        command: visited
            .last()
            .map_or_else(|| Command::Skip.to_string(), |conf| conf.command.to_string()),
    }
}

// Expects a valid, terminated trace; see `Derivation::from_trace`.
fn rebuild(visited: &[Configuration]) -> Result<Derivation, DerivationError> {
    let (start, last) = match (visited.first(), visited.last()) {
        (Some(start), Some(last)) if last.is_completed() => (start, last),
        _ => return Err(unterminated(visited)),
    };
    let Configuration { command, state } = start;
    let rule = match command {
        Command::Skip => Rule::Skip,
        Command::Assign(_, _) => Rule::Assign,
        Command::Seq(_, _) => {
            let collapse = visited
                .iter()
                .position(|conf| match &conf.command {
                    Command::Seq(first, _) => first.is_skip(),
                    _ => false,
                })
                .ok_or_else(|| unterminated(visited))?;
            let left = visited[..=collapse]
                .iter()
                .map(|conf| match &conf.command {
                    Command::Seq(first, _) => Some(Configuration::new((**first).clone(), conf.state.clone())),
                    _ => None,
                })
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| unterminated(visited))?;
            let first = rebuild(&left)?;
            let second = rebuild(&visited[collapse + 1..])?;
            Rule::Seq(Box::new(first), Box::new(second))
        }
        Command::If(guard, _, _) => {
            let branch = Box::new(rebuild(&visited[1..])?);
            if eval_bool(state, guard) {
                Rule::IfTrue(branch)
            } else {
                Rule::IfFalse(branch)
            }
        }
        Command::While(guard, _) => {
            if eval_bool(state, guard) {
                // The rest of the trace runs `body; while ...`.
                let mut unrolled = rebuild(&visited[1..])?;
                match mem::replace(&mut unrolled.rule, Rule::Skip) {
                    Rule::Seq(body, again) => Rule::WhileTrue(body, again),
                    other => {
                        return Err(DerivationError::WrongRule {
                            rule: other.name(),
                            command: command.to_string(),
                        })
                    }
                }
            } else {
                Rule::WhileFalse
            }
        }
    };
    Ok(Derivation::new(state.clone(), command.clone(), last.state.clone(), rule))
}

/// Builds the derivation for `command` from `state`, spending budget the way
/// `interp` does.
///
/// `None` means no derivation of height at most `budget` exists. It does not
/// mean that there is no derivation at all.
pub fn derive(budget: usize, command: &Command, state: &State) -> Option<Derivation> {
    let rest = budget.checked_sub(1)?;
    let derivation = match command {
        Command::Skip => Derivation::new(state.clone(), Command::Skip, state.clone(), Rule::Skip),
        Command::Assign(var, expr) => {
            let result = state.set(*var, eval_arith(state, expr));
            Derivation::new(state.clone(), command.clone(), result, Rule::Assign)
        }
        Command::Seq(c1, c2) => {
            let first = derive(rest, c1, state)?;
            let second = derive(rest, c2, first.result())?;
            let result = second.result().clone();
            Derivation::new(state.clone(), command.clone(), result, Rule::Seq(Box::new(first), Box::new(second)))
        }
        Command::If(guard, c1, c2) => {
            if eval_bool(state, guard) {
                let branch = derive(rest, c1, state)?;
                let result = branch.result().clone();
                Derivation::new(state.clone(), command.clone(), result, Rule::IfTrue(Box::new(branch)))
            } else {
                let branch = derive(rest, c2, state)?;
                let result = branch.result().clone();
                Derivation::new(state.clone(), command.clone(), result, Rule::IfFalse(Box::new(branch)))
            }
        }
        Command::While(guard, body) => {
            // Derive the iterations first, then nest them from the last one out.
            let mut fuel = rest;
            let mut current = state.clone();
            let mut iterations = Vec::new();
            while eval_bool(&current, guard) {
                let iteration = derive(fuel, body, &current)?;
                current = iteration.result().clone();
                iterations.push(iteration);
                fuel = fuel.checked_sub(1)?;
            }
            let exit = Derivation::new(current.clone(), command.clone(), current.clone(), Rule::WhileFalse);
            iterations.into_iter().rev().fold(exit, |again, iteration| {
                Derivation::new(
                    iteration.initial().clone(),
                    command.clone(),
                    current.clone(),
                    Rule::WhileTrue(Box::new(iteration), Box::new(again)),
                )
            })
        }
    };
    Some(derivation)
}

/// The final state of the derivation for `command` from `state`, if one of
/// height at most `budget` exists.
///
/// Only the conclusion is needed, so no tree is built. `derive` and `interp`
/// spend budget identically, which makes `interp` answer the same question in
/// constant stack per loop iteration.
pub fn exec_big(state: &State, command: &Command, budget: usize) -> Option<State> {
    let found = interp(budget, command, state);
    tracing::debug!(budget, found = found.is_some(), "big-step derivation search");
    found
}

/// Whether `state =[ command ]=> result` is derivable within `budget`.
pub fn relates(state: &State, command: &Command, result: &State, budget: usize) -> bool {
    exec_big(state, command, budget).as_ref() == Some(result)
}

#[macro_use]
extern crate lazy_static;

mod config;
mod denote;
mod error;
mod eval;
mod interp;
mod natural;
mod optimize;
mod state;
mod step;
mod syntax;

#[cfg(test)]
mod check;

use num_bigint::BigInt;

pub type Integer = BigInt;

pub use config::Limits;
pub use denote::{
    approximations, denote, kleene_approximant, least_budget, satisfies_while_equation,
    while_functional, Approximations, Meaning,
};
pub use error::{DerivationError, UsageError};
pub use eval::{eval_arith, eval_bool};
pub use interp::{interp, run, Outcome};
pub use natural::{derive, exec_big, relates, Derivation, Judgement, Rule};
pub use optimize::{optimize_bexp, optimize_command, optimize_zero_plus};
pub use state::{int, State, VarIdent};
pub use step::{step_once, successors, trace, Configuration, Halts, Trace};
pub use syntax::{AExp, BExp, Command};

use std::rc::Rc;

use num_traits::identities::Zero;

use super::{AExp, BExp, Command};

/// Folds every `0 + e` into `e`, bottom-up.
pub fn optimize_zero_plus(expr: &AExp) -> AExp {
    match expr {
        AExp::Const(_) | AExp::Var(_) => expr.clone(),
        AExp::Plus(lhs, rhs) => match &**lhs {
            AExp::Const(n) if n.is_zero() => optimize_zero_plus(rhs),
            _ => AExp::plus(optimize_zero_plus(lhs), optimize_zero_plus(rhs)),
        },
        AExp::Minus(lhs, rhs) => AExp::minus(optimize_zero_plus(lhs), optimize_zero_plus(rhs)),
    }
}

pub fn optimize_bexp(expr: &BExp) -> BExp {
    match expr {
        BExp::True | BExp::False => expr.clone(),
        BExp::Eq(lhs, rhs) => BExp::eq(optimize_zero_plus(lhs), optimize_zero_plus(rhs)),
        BExp::Le(lhs, rhs) => BExp::le(optimize_zero_plus(lhs), optimize_zero_plus(rhs)),
        BExp::Not(inner) => BExp::not(optimize_bexp(inner)),
        BExp::And(lhs, rhs) => BExp::and(optimize_bexp(lhs), optimize_bexp(rhs)),
    }
}

/// Applies `optimize_zero_plus` to every arithmetic expression in `command`.
pub fn optimize_command(command: &Command) -> Command {
    match command {
        Command::Skip => Command::Skip,
        Command::Assign(var, expr) => Command::Assign(*var, optimize_zero_plus(expr)),
        Command::Seq(first, second) => Command::Seq(
            Rc::new(optimize_command(first)),
            Rc::new(optimize_command(second)),
        ),
        Command::If(guard, then_branch, else_branch) => Command::If(
            optimize_bexp(guard),
            Rc::new(optimize_command(then_branch)),
            Rc::new(optimize_command(else_branch)),
        ),
        Command::While(guard, body) => {
            Command::While(optimize_bexp(guard), Rc::new(optimize_command(body)))
        }
    }
}

use super::{AExp, BExp, Integer, State};

pub fn eval_arith(state: &State, expr: &AExp) -> Integer {
    match expr {
        AExp::Const(n) => n.clone(),
        AExp::Var(var) => state[var].clone(),
        AExp::Plus(lhs, rhs) => eval_arith(state, lhs) + eval_arith(state, rhs),
        AExp::Minus(lhs, rhs) => eval_arith(state, lhs) - eval_arith(state, rhs),
    }
}

// Evaluation can neither fail nor write, so `&&` short-circuiting is
// unobservable.
pub fn eval_bool(state: &State, expr: &BExp) -> bool {
    match expr {
        BExp::True => true,
        BExp::False => false,
        BExp::Eq(lhs, rhs) => eval_arith(state, lhs) == eval_arith(state, rhs),
        BExp::Le(lhs, rhs) => eval_arith(state, lhs) <= eval_arith(state, rhs),
        BExp::Not(inner) => !eval_bool(state, inner),
        BExp::And(lhs, rhs) => eval_bool(state, lhs) && eval_bool(state, rhs),
    }
}

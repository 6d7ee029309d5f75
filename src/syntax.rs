use std::fmt;
use std::rc::Rc;

use super::{int, Integer, VarIdent};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AExp {
    Const(Integer),
    Var(VarIdent),
    Plus(Box<AExp>, Box<AExp>),
    Minus(Box<AExp>, Box<AExp>),
}

impl AExp {
    pub fn num(n: i64) -> AExp {
        AExp::Const(int(n))
    }

    pub fn var(n: u32) -> AExp {
        AExp::Var(VarIdent(n))
    }

    pub fn plus(lhs: AExp, rhs: AExp) -> AExp {
        AExp::Plus(Box::new(lhs), Box::new(rhs))
    }

    pub fn minus(lhs: AExp, rhs: AExp) -> AExp {
        AExp::Minus(Box::new(lhs), Box::new(rhs))
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BExp {
    True,
    False,
    Eq(Box<AExp>, Box<AExp>),
    Le(Box<AExp>, Box<AExp>),
    Not(Box<BExp>),
    And(Box<BExp>, Box<BExp>),
}

impl BExp {
    pub fn eq(lhs: AExp, rhs: AExp) -> BExp {
        BExp::Eq(Box::new(lhs), Box::new(rhs))
    }

    pub fn le(lhs: AExp, rhs: AExp) -> BExp {
        BExp::Le(Box::new(lhs), Box::new(rhs))
    }

    pub fn not(inner: BExp) -> BExp {
        BExp::Not(Box::new(inner))
    }

    pub fn and(lhs: BExp, rhs: BExp) -> BExp {
        BExp::And(Box::new(lhs), Box::new(rhs))
    }
}

// Sub-commands sit behind `Rc`: unrolling a loop and stepping inside a
// sequence both rebuild commands around existing children.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Command {
    Skip,
    Assign(VarIdent, AExp),
    Seq(Rc<Command>, Rc<Command>),
    If(BExp, Rc<Command>, Rc<Command>),
    While(BExp, Rc<Command>),
}

impl Command {
    pub fn assign(var: u32, expr: AExp) -> Command {
        Command::Assign(VarIdent(var), expr)
    }

    pub fn seq(first: Command, second: Command) -> Command {
        Command::Seq(Rc::new(first), Rc::new(second))
    }

    /// Right-nested sequence of `commands`; `Skip` when there are none.
    pub fn block<I>(commands: I) -> Command
    where
        I: IntoIterator<Item = Command>,
        I::IntoIter: DoubleEndedIterator,
    {
        let mut rev = commands.into_iter().rev();
        match rev.next() {
            None => Command::Skip,
            Some(last) => rev.fold(last, |rest, command| Command::seq(command, rest)),
        }
    }

    pub fn if_then_else(guard: BExp, then_branch: Command, else_branch: Command) -> Command {
        Command::If(guard, Rc::new(then_branch), Rc::new(else_branch))
    }

    pub fn while_do(guard: BExp, body: Command) -> Command {
        Command::While(guard, Rc::new(body))
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, Command::Skip)
    }
}

impl fmt::Display for AExp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AExp::Const(n) => write!(f, "{}", n),
            AExp::Var(var) => write!(f, "{}", var),
            AExp::Plus(lhs, rhs) => write!(f, "({} + {})", lhs, rhs),
            AExp::Minus(lhs, rhs) => write!(f, "({} - {})", lhs, rhs),
        }
    }
}

impl fmt::Display for BExp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BExp::True => write!(f, "true"),
            BExp::False => write!(f, "false"),
            BExp::Eq(lhs, rhs) => write!(f, "{} = {}", lhs, rhs),
            BExp::Le(lhs, rhs) => write!(f, "{} <= {}", lhs, rhs),
            BExp::Not(inner) => write!(f, "~({})", inner),
            BExp::And(lhs, rhs) => write!(f, "({}) && ({})", lhs, rhs),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Command::Skip => write!(f, "skip"),
            Command::Assign(var, expr) => write!(f, "{} := {}", var, expr),
            Command::Seq(first, second) => write!(f, "{}; {}", first, second),
            Command::If(guard, then_branch, else_branch) => write!(
                f,
                "if {} then {{ {} }} else {{ {} }}",
                guard, then_branch, else_branch
            ),
            Command::While(guard, body) => write!(f, "while {} do {{ {} }}", guard, body),
        }
    }
}

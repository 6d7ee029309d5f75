use quickcheck::{empty_shrinker, Arbitrary, Gen, QuickCheck, TestResult};

use super::{
    denote, derive, eval_arith, eval_bool, exec_big, int, interp, optimize_command, optimize_zero_plus, run,
    step_once, successors, trace, AExp, BExp, Command, Configuration, Derivation, Limits, Outcome, State,
    VarIdent,
};

// Shared programs

pub const X: VarIdent = VarIdent(0);
pub const Y: VarIdent = VarIdent(1);
pub const R: VarIdent = VarIdent(2);
pub const Q: VarIdent = VarIdent(3);

/// `r := x; q := 0; while y <= r do { r := r - y; q := q + 1 }`
pub fn euclid() -> Command {
    Command::block(vec![
        Command::Assign(R, AExp::Var(X)),
        Command::Assign(Q, AExp::num(0)),
        Command::while_do(
            BExp::le(AExp::Var(Y), AExp::Var(R)),
            Command::block(vec![
                Command::Assign(R, AExp::minus(AExp::Var(R), AExp::Var(Y))),
                Command::Assign(Q, AExp::plus(AExp::Var(Q), AExp::num(1))),
            ]),
        ),
    ])
}

pub fn euclid_input(x: i64, y: i64) -> State {
    State::new().set(X, int(x)).set(Y, int(y))
}

pub fn diverging() -> Command {
    Command::while_do(BExp::True, Command::Skip)
}

// Generators

const VARIABLES: u8 = 4;

fn arbitrary_var(g: &mut Gen) -> VarIdent {
    VarIdent(u32::from(u8::arbitrary(g) % VARIABLES))
}

fn arbitrary_int(g: &mut Gen) -> i64 {
    // Zero often enough to give the optimizer something to do.
    if u8::arbitrary(g) % 3 == 0 {
        0
    } else {
        i64::from(i8::arbitrary(g))
    }
}

impl AExp {
    fn arbitrary_depth(g: &mut Gen, depth: u32) -> AExp {
        let shapes = if depth == 0 { 2 } else { 4 };
        match u8::arbitrary(g) % shapes {
            0 => AExp::num(arbitrary_int(g)),
            1 => AExp::Var(arbitrary_var(g)),
            2 => AExp::plus(Self::arbitrary_depth(g, depth - 1), Self::arbitrary_depth(g, depth - 1)),
            3 => AExp::minus(Self::arbitrary_depth(g, depth - 1), Self::arbitrary_depth(g, depth - 1)),
            _ => unreachable!(),
        }
    }
}

impl Arbitrary for AExp {
    fn arbitrary(g: &mut Gen) -> Self {
        Self::arbitrary_depth(g, 4)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        match self {
            AExp::Const(_) | AExp::Var(_) => empty_shrinker(),
            AExp::Plus(lhs, rhs) | AExp::Minus(lhs, rhs) => Box::new(vec![(**lhs).clone(), (**rhs).clone()].into_iter()),
        }
    }
}

impl BExp {
    fn arbitrary_depth(g: &mut Gen, depth: u32) -> BExp {
        let shapes = if depth == 0 { 4 } else { 6 };
        match u8::arbitrary(g) % shapes {
            0 => BExp::True,
            1 => BExp::False,
            2 => BExp::eq(AExp::arbitrary_depth(g, 1), AExp::arbitrary_depth(g, 1)),
            3 => BExp::le(AExp::arbitrary_depth(g, 1), AExp::arbitrary_depth(g, 1)),
            4 => BExp::not(Self::arbitrary_depth(g, depth - 1)),
            5 => BExp::and(Self::arbitrary_depth(g, depth - 1), Self::arbitrary_depth(g, depth - 1)),
            _ => unreachable!(),
        }
    }
}

impl Arbitrary for BExp {
    fn arbitrary(g: &mut Gen) -> Self {
        Self::arbitrary_depth(g, 2)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        match self {
            BExp::Not(inner) => Box::new(vec![(**inner).clone()].into_iter()),
            BExp::And(lhs, rhs) => Box::new(vec![(**lhs).clone(), (**rhs).clone()].into_iter()),
            BExp::Eq(_, _) | BExp::Le(_, _) => Box::new(vec![BExp::True, BExp::False].into_iter()),
            BExp::True | BExp::False => empty_shrinker(),
        }
    }
}

impl Command {
    fn arbitrary_depth(g: &mut Gen, depth: u32) -> Command {
        if depth == 0 {
            return match u8::arbitrary(g) % 3 {
                0 => Command::Skip,
                _ => Command::Assign(arbitrary_var(g), AExp::arbitrary_depth(g, 2)),
            };
        }
        match u8::arbitrary(g) % 10 {
            0 => Command::Skip,
            1 | 2 => Command::Assign(arbitrary_var(g), AExp::arbitrary_depth(g, 2)),
            3 | 4 | 5 => Command::seq(Self::arbitrary_depth(g, depth - 1), Self::arbitrary_depth(g, depth - 1)),
            6 | 7 => Command::if_then_else(
                BExp::arbitrary_depth(g, 1),
                Self::arbitrary_depth(g, depth - 1),
                Self::arbitrary_depth(g, depth - 1),
            ),
            8 | 9 => Command::while_do(BExp::arbitrary_depth(g, 1), Self::arbitrary_depth(g, depth - 1)),
            _ => unreachable!(),
        }
    }
}

impl Arbitrary for Command {
    fn arbitrary(g: &mut Gen) -> Self {
        Self::arbitrary_depth(g, 4)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        match self {
            Command::Skip => empty_shrinker(),
            Command::Assign(_, _) => Box::new(vec![Command::Skip].into_iter()),
            Command::Seq(first, second) => Box::new(vec![(**first).clone(), (**second).clone()].into_iter()),
            Command::If(_, then_branch, else_branch) => {
                Box::new(vec![(**then_branch).clone(), (**else_branch).clone()].into_iter())
            }
            Command::While(_, body) => Box::new(vec![Command::Skip, (**body).clone()].into_iter()),
        }
    }
}

impl Arbitrary for State {
    fn arbitrary(g: &mut Gen) -> Self {
        (0..u32::from(VARIABLES))
            .map(|var| (VarIdent(var), int(arbitrary_int(g))))
            .collect()
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let without: Vec<State> = self.iter().map(|(var, _)| self.set(*var, int(0))).collect();
        Box::new(without.into_iter())
    }
}

// Properties

const BUDGET: usize = 48;
const STEP_CAP: usize = 1_000_000;

fn small() -> Limits {
    Limits {
        budget: BUDGET,
        search_limit: 64,
    }
}

fn large() -> Limits {
    Limits {
        budget: BUDGET,
        search_limit: 128,
    }
}

fn check_optimize_sound(expr: AExp, state: State) -> bool {
    eval_arith(&state, &optimize_zero_plus(&expr)) == eval_arith(&state, &expr)
}

fn check_optimize_command_sound(command: Command, state: State) -> bool {
    run(&optimize_command(&command), &state, BUDGET) == run(&command, &state, BUDGET)
}

fn check_step_deterministic(command: Command, state: State) -> bool {
    let visited = trace(&Configuration::new(command, state), 300);
    visited.configurations().iter().all(|conf| {
        let all = successors(conf);
        all.len() <= 1 && all.first() == step_once(conf).as_ref() && conf.is_completed() == all.is_empty()
    })
}

fn check_monotone(command: Command, state: State, a: u8, b: u8) -> TestResult {
    let low = usize::from(a % 64);
    let high = low + usize::from(b % 64);
    match interp(low, &command, &state) {
        None => TestResult::discard(),
        Some(result) => TestResult::from_bool(interp(high, &command, &state) == Some(result)),
    }
}

fn check_big_step_agrees(command: Command, state: State) -> bool {
    let derived = derive(BUDGET, &command, &state);
    let interpreted = interp(BUDGET, &command, &state);
    if derived.as_ref().map(Derivation::result) != interpreted.as_ref() {
        return false;
    }
    if exec_big(&state, &command, BUDGET) != interpreted {
        return false;
    }
    match derived {
        None => true,
        Some(derivation) => {
            derivation.check().is_ok()
                && derivation.height() <= BUDGET
                && derive(derivation.height(), &command, &state).as_ref() == Some(&derivation)
                && denote(&state, &command, &large()) == Outcome::Terminated(derivation.result().clone())
        }
    }
}

fn check_small_step_agrees(command: Command, state: State) -> bool {
    let start = Configuration::new(command.clone(), state.clone());
    match derive(BUDGET, &command, &state) {
        Some(derivation) => {
            let visited = trace(&start, STEP_CAP);
            visited.final_state() == Some(derivation.result())
                && derivation.to_trace() == visited
                && Derivation::from_trace(&visited).as_ref() == Ok(&derivation)
        }
        None => {
            let visited = trace(&start, 500);
            match visited.final_state() {
                // n steps to skip means budget n + 1 is enough.
                Some(result) => {
                    visited.steps() + 1 > BUDGET && interp(visited.steps() + 1, &command, &state).as_ref() == Some(result)
                }
                None => true,
            }
        }
    }
}

// The right-hand side of the defining equation for the top-level shape.
fn unfold(command: &Command, state: &State, limits: &Limits) -> Outcome {
    match command {
        Command::Skip => Outcome::Terminated(state.clone()),
        Command::Assign(var, expr) => Outcome::Terminated(state.set(*var, eval_arith(state, expr))),
        Command::Seq(first, second) => {
            denote(state, first, limits).and_then(|mid| denote(&mid, second, limits))
        }
        Command::If(guard, then_branch, else_branch) => {
            let taken = if eval_bool(state, guard) { then_branch } else { else_branch };
            denote(state, taken, limits)
        }
        Command::While(guard, body) => {
            if eval_bool(state, guard) {
                denote(state, body, limits).and_then(|mid| denote(&mid, command, limits))
            } else {
                Outcome::Terminated(state.clone())
            }
        }
    }
}

fn check_denote_equations(command: Command, state: State) -> bool {
    // Composing two results may need one unit more than either part, so the
    // comparison side gets the larger limit.
    let unfolded = unfold(&command, &state, &small());
    let whole = denote(&state, &command, &small());
    let unfolded_ok = !unfolded.is_terminated() || denote(&state, &command, &large()) == unfolded;
    let whole_ok = !whole.is_terminated() || unfolded == whole;
    unfolded_ok && whole_ok
}

fn quick() -> QuickCheck {
    QuickCheck::new().tests(300).max_tests(3000).gen(Gen::new(20))
}

#[test]
fn quick_check_optimizer() {
    quick().quickcheck(check_optimize_sound as fn(AExp, State) -> bool);
    quick().quickcheck(check_optimize_command_sound as fn(Command, State) -> bool);
}

#[test]
fn quick_check_step_determinism() {
    quick().quickcheck(check_step_deterministic as fn(Command, State) -> bool);
}

#[test]
fn quick_check_monotonicity() {
    quick().quickcheck(check_monotone as fn(Command, State, u8, u8) -> TestResult);
}

#[test]
fn quick_check_big_step() {
    quick().quickcheck(check_big_step_agrees as fn(Command, State) -> bool);
}

#[test]
fn quick_check_small_step() {
    quick().quickcheck(check_small_step_agrees as fn(Command, State) -> bool);
}

#[test]
fn quick_check_denotation() {
    quick().quickcheck(check_denote_equations as fn(Command, State) -> bool);
}

#[test]
fn test_scenarios_agree() {
    let programs = vec![
        (
            Command::if_then_else(
                BExp::le(AExp::num(1), AExp::num(2)),
                Command::Assign(X, AExp::num(3)),
                Command::Assign(X, AExp::num(0)),
            ),
            State::new(),
        ),
        (euclid(), euclid_input(101, 7)),
        (euclid(), euclid_input(0, 3)),
    ];
    for (program, input) in programs {
        let by_run = run(&program, &input, 1000).into_state();
        let by_big_step = exec_big(&input, &program, 1000);
        let by_steps = trace(&Configuration::new(program.clone(), input.clone()), 10_000)
            .final_state()
            .cloned();
        let by_denotation = denote(&input, &program, &Limits::default()).into_state();
        assert!(by_run.is_some());
        assert_eq!(by_run, by_big_step);
        assert_eq!(by_run, by_steps);
        assert_eq!(by_run, by_denotation);
    }
}

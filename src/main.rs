use std::process;

use imp::{denote, exec_big, int, run, AExp, BExp, Command, Configuration, Limits, State, UsageError, VarIdent};

fn limits_from_args() -> Result<Limits, UsageError> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match &args[..] {
        [] => Ok(Limits::default()),
        [budget] => budget
            .parse()
            .map(|budget| Limits::default().with_budget(budget))
            .map_err(|source| UsageError::InvalidBudget {
                input: budget.clone(),
                source,
            }),
        _ => Err(UsageError::TooManyArguments),
    }
}

fn main() {
    let limits = limits_from_args().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(2);
    });

    let (x, y, r, q) = (VarIdent(0), VarIdent(1), VarIdent(2), VarIdent(3));
    // Quotient and remainder of v0 divided by v1, into v3 and v2.
    let sample_prog = Command::block(vec![
        Command::Assign(r, AExp::Var(x)),
        Command::Assign(q, AExp::num(0)),
        Command::while_do(
            BExp::le(AExp::Var(y), AExp::Var(r)),
            Command::block(vec![
                Command::Assign(r, AExp::minus(AExp::Var(r), AExp::Var(y))),
                Command::Assign(q, AExp::plus(AExp::Var(q), AExp::num(1))),
            ]),
        ),
    ]);
    let initial = State::new().set(x, int(101)).set(y, int(7));

    println!("Program: {}", sample_prog);
    println!("Initial state: {}", initial);
    println!("Interpreter: {}", run(&sample_prog, &initial, limits.budget));
    match exec_big(&initial, &sample_prog, limits.budget) {
        Some(result) => println!("Big-step: {}", result),
        None => println!("Big-step: no derivation within budget {}", limits.budget),
    }
    let mut conf = Configuration::new(sample_prog.clone(), initial.clone());
    let halts = conf.run(limits.budget);
    println!("Small-step: {:?}, at {}", halts, conf.state);
    println!("Denotation: {}", denote(&initial, &sample_prog, &limits));
    println!("Done");
}

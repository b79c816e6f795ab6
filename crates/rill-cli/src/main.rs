use std::{env, process::ExitCode};

use rill::{Interp, StdPrint};

fn main() -> ExitCode {
    let mut args = env::args().skip(1);
    let source = args.next();
    let rest: Vec<String> = args.collect();

    let mut interp = Interp::new(rest);
    let mut print = StdPrint;

    // the embedded prelude runs unconditionally, before argv is consulted
    if let Err(halt) = interp.run_prelude(&mut print) {
        return exit_code(halt.code());
    }

    let Some(source) = source else {
        return ExitCode::SUCCESS;
    };
    match interp.run_file(&source, &mut print) {
        Ok(()) => ExitCode::SUCCESS,
        Err(halt) => exit_code(halt.code()),
    }
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code.rem_euclid(256)).unwrap_or(1))
}

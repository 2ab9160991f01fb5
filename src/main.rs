//
// src/main.rs: driver program for the ADIF library.  This parses the given ADI
// file and dumps the result, optionally validating and rewriting it.
//

use env_logger::Env;
use std::process;

mod cli;

fn main()
{
    let args = cli::parse_cli();
    setup_logging(&args.log_level);

    match cli::process_file(&args) {
        Ok(()) => (),
        Err(errmsg) => fatal(&errmsg)
    }
}

//
// RUST_LOG, if set, overrides the level given on the command line.
//
fn setup_logging(level: &str)
{
    let env = Env::default().filter_or("RUST_LOG", level);
    env_logger::Builder::from_env(env).init();
}

fn fatal(message: &str)
{
    eprintln!("adif: {}", message);
    process::exit(1);
}

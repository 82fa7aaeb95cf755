use clap::Parser;
use mu::report::render_parse_error;
use mu::{run, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let (mut out, mut err) = (std::io::stdout().lock(), std::io::stderr());
    match run(&cli, &mut out, &mut err) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            match error.downcast_ref::<mu_core::ParseError>() {
                Some(parse_error) => {
                    eprintln!("{}", render_parse_error(parse_error));
                    eprintln!("  while compiling {}", cli.input.display());
                }
                None => eprintln!("Error: {:#}", error),
            }
            ExitCode::FAILURE
        }
    }
}

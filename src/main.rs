mod cli;
mod error;
mod listener;
mod request;
mod responder;
mod response;
mod telemetry;

use std::process::ExitCode;

use anyhow::Context as _;

use crate::{cli::Parsed, responder::Responder};

fn main() -> ExitCode {
    let args = match cli::parse(std::env::args_os()) {
        Parsed::Run(args) => args,
        Parsed::Exit {
            code,
            stdout,
            message,
        } => {
            if stdout {
                print!("{message}");
            } else {
                eprint!("{message}");
            }
            return ExitCode::from(code);
        }
    };
    telemetry::init(args.verbose);

    match run(args.port) {
        Ok(never) => match never {},
        Err(err) => {
            let chain = format!("{err:#}");
            tracing::error!(message = "Startup failed", error = %chain);
            eprintln!("error: {chain}");
            ExitCode::FAILURE
        }
    }
}

fn run(port: u16) -> anyhow::Result<std::convert::Infallible> {
    let responder =
        Responder::bind(port).with_context(|| format!("failed to listen on port {port}"))?;
    tracing::info!(message = "Serving PublisherA", addr = %responder.local_addr()?);
    responder.serve_forever()
}

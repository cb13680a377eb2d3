use clap::{error::ErrorKind, Parser};

#[derive(Debug, PartialEq, Eq, Parser)]
#[command(name = "publisher-stub", version, about = "Answers every GET with {\"caller\": \"PublisherA\"}")]
pub struct Args {
    /// Port to listen on, 0 lets the OS pick one
    pub port: u16,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Parsed {
    Run(Args),
    /// Usage goes to stdout for a missing port, everything else to stderr.
    Exit { code: u8, stdout: bool, message: String },
}

pub fn parse<I, T>(args: I) -> Parsed
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let err = match Args::try_parse_from(args) {
        Ok(args) => return Parsed::Run(args),
        Err(err) => err,
    };
    let message = err.render().to_string();
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => Parsed::Exit {
            code: 0,
            stdout: true,
            message,
        },
        ErrorKind::MissingRequiredArgument
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => Parsed::Exit {
            code: 1,
            stdout: true,
            message,
        },
        _ => Parsed::Exit {
            code: 1,
            stdout: false,
            message,
        },
    }
}

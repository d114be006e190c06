use clap::{Arg, ArgAction, Command};

pub use super::fill_handler::handle_fill;

pub fn fill_subcommand() -> Command {
    Command::new("fill")
        .about("Fill in the form and submit it")
        .arg(
            Arg::new("user")
                .long("user")
                .short('u')
                .help("Prefill from a stored user record. E.g. 'user1'"),
        )
        .arg(
            Arg::new("set")
                .long("set")
                .short('s')
                .action(ArgAction::Append)
                .help(
                    "Enter a value into a field, applied after any prefill. \
                     E.g. 'username=user2'. Can be repeated",
                ),
        )
        .arg(
            Arg::new("interactive")
                .long("interactive")
                .short('i')
                .action(ArgAction::SetTrue)
                .help("Prompt for every field on stdin [default: false]"),
        )
}

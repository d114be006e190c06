use clap::{Arg, ArgAction, Command};

pub use super::show_handler::handle_show;

pub fn show_subcommand() -> Command {
    Command::new("show")
        .about("Build the form, load remote options and print its state")
        .arg(
            Arg::new("user")
                .long("user")
                .short('u')
                .help(
                    "Prefill the form from a stored user record. E.g. 'user1'",
                ),
        )
        .arg(
            Arg::new("touch")
                .long("touch")
                .short('t')
                .action(ArgAction::SetTrue)
                .help(
                    "Mark every field as visited, so validation messages are \
                     shown [default: false]",
                ),
        )
}

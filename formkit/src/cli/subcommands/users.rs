use clap::Command;
use formkit::{FormSpec, FormkitError};

pub fn users_subcommand() -> Command {
    Command::new("users").about("List the user records available for prefill")
}

pub fn handle_users(
    _users_matches: &clap::ArgMatches,
    spec: &FormSpec,
) -> Result<(), FormkitError> {
    let prefill = spec.prefill();
    for record in prefill.records() {
        let email = if record.email.is_empty() {
            "-"
        } else {
            record.email.as_str()
        };
        // records may carry an empty key, which matches an empty lookup
        println!("{:<16} {}", format!("'{}'", record.username), email);
    }
    Ok(())
}

use std::sync::Arc;

use clap::{Arg, ArgAction, Command};
use formkit::{FormSession, FormSpec, FormkitError, OfflineSource, RecordSource};

use super::subcommands::fill::*;
use super::subcommands::show::*;
use super::subcommands::users::*;

const PROGRAM_NAME: &str = "formkit";

pub async fn run_cli(args: Vec<String>) {
    env_logger::init();
    let app = Command::new(PROGRAM_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .arg_required_else_help(true)
        .about(format!(
            "{}: declarative forms with validation and remote options",
            PROGRAM_NAME
        ))
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("Form specification (YAML). Defaults to the built-in \
                       profile form"),
        )
        .arg(
            Arg::new("offline")
                .long("offline")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Do not fetch remote options [default: false]"),
        )
        .subcommand(show_subcommand()) // "show"
        .subcommand(fill_subcommand()) // "fill"
        .subcommand(users_subcommand()); // "users"

    let matches = app.try_get_matches_from(args);

    match matches {
        Ok(matches) => {
            let spec = match load_spec(&matches) {
                Ok(spec) => spec,
                Err(e) => {
                    eprintln!("Error loading form specification: {}", e);
                    std::process::exit(1);
                }
            };
            let offline = matches.get_flag("offline");

            let result = match matches.subcommand() {
                Some(("show", matches)) => {
                    handle_show(matches, &spec, offline).await
                }
                Some(("fill", matches)) => {
                    match handle_fill(matches, &spec, offline).await {
                        Ok(outcome) if !outcome.is_submitted() => {
                            std::process::exit(1);
                        }
                        Ok(_) => Ok(()),
                        Err(e) => Err(e),
                    }
                }
                Some(("users", matches)) => handle_users(matches, &spec),
                _ => {
                    // given the `arg_required_else_help(true)` is defined,
                    // this branch should never be reached
                    unreachable!("arg_required_else_help(true) not defined")
                }
            };
            if let Err(e) = result {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Err(e) => {
            if e.kind() == clap::error::ErrorKind::DisplayHelp
                || e.kind() == clap::error::ErrorKind::DisplayVersion
            {
                print!("{}", e);
            } else {
                eprintln!("Error parsing command-line arguments: {}", e);
                eprintln!(
                    "For more detailed help, try running '--help' or \
                     '<subcommand> --help'."
                );
                std::process::exit(1);
            }
        }
    }
}

fn load_spec(matches: &clap::ArgMatches) -> Result<FormSpec, FormkitError> {
    match matches.get_one::<String>("config") {
        Some(path) => FormSpec::from_file(path),
        None => FormSpec::default_form(),
    }
}

fn record_source(spec: &FormSpec, offline: bool) -> Arc<dyn RecordSource> {
    if offline {
        log::info!("Offline, remote options will not be loaded");
        return Arc::new(OfflineSource);
    }
    http_source(spec)
}

#[cfg(feature = "http_client")]
fn http_source(spec: &FormSpec) -> Arc<dyn RecordSource> {
    use formkit::{HttpClient, HttpRecordSource};
    let client = HttpClient::new().with_timeout(spec.timeout());
    Arc::new(HttpRecordSource::new(client))
}

#[cfg(not(feature = "http_client"))]
fn http_source(_spec: &FormSpec) -> Arc<dyn RecordSource> {
    log::warn!("HTTP support is not enabled, remote options are unavailable");
    Arc::new(OfflineSource)
}

/// Builds the form and waits until every remote option fetch has settled.
pub async fn load_session(
    spec: &FormSpec,
    offline: bool,
) -> Result<FormSession, FormkitError> {
    let mut session =
        FormSession::start(spec.form_builder()?, record_source(spec, offline));
    let pending = session.pending();
    if !pending.is_empty() {
        log::info!("Loading options for: {}", pending.join(", "));
    }
    session.settle().await;
    Ok(session)
}

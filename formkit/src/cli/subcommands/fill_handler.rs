use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};

use formkit::{FormSpec, FormState, FormValues, FormkitError, SubmitOutcome};
use log::{info, warn};

use super::super::parser::load_session;
use super::super::render::numbered_options;

pub async fn handle_fill(
    fill_matches: &clap::ArgMatches,
    spec: &FormSpec,
    offline: bool,
) -> Result<SubmitOutcome, FormkitError> {
    let mut session = load_session(spec, offline).await?;

    if let Some(user) = fill_matches.get_one::<String>("user") {
        if !spec.prefill().apply(user, session.state_mut()) {
            eprintln!("No user record matches '{}'", user);
        }
    }

    if let Some(assignments) = fill_matches.get_many::<String>("set") {
        for assignment in assignments {
            let (name, value) = parse_assignment(assignment)?;
            session.state_mut().enter(name, value)?;
        }
    }

    if fill_matches.get_flag("interactive") {
        let stdin = io::stdin();
        prompt_fields(session.state_mut(), &mut stdin.lock())?;
    }

    for (name, messages) in session.state().messages() {
        for message in messages {
            eprintln!("{}: {}", name, message);
        }
    }

    let outcome = session.submit(&print_values);
    if let SubmitOutcome::Rejected { invalid } = &outcome {
        eprintln!("Form not submitted, invalid fields: {}", invalid.join(", "));
    }
    session.close();
    Ok(outcome)
}

fn parse_assignment(assignment: &str) -> Result<(&str, &str), FormkitError> {
    match assignment.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim(), value))
        }
        _ => Err(FormkitError::InvalidInput(
            assignment.to_string(),
            "expected NAME=VALUE".to_string(),
        )),
    }
}

fn print_values(values: &FormValues) {
    let sorted: BTreeMap<&String, &Option<String>> = values.iter().collect();
    match serde_json::to_string_pretty(&sorted) {
        Ok(json) => println!("{}", json),
        Err(e) => warn!("Failed to serialize submitted values: {}", e),
    }
    info!("Form submitted");
}

// Walks the fields in order and enters each answer. An empty line keeps the
// current value; invalid answers are asked again.
fn prompt_fields<R: BufRead>(
    state: &mut FormState,
    input: &mut R,
) -> Result<(), FormkitError> {
    let names = state.names().to_vec();
    for name in names {
        loop {
            let Some(control) = state.get(&name) else {
                break;
            };
            let current = control.value().unwrap_or("").to_string();
            if !control.options().is_empty() {
                println!("{}", numbered_options(control));
            }
            print!("{} [{}]: ", name, current);
            io::stdout().flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                // stdin closed, leave the remaining fields as they are
                return Ok(());
            }
            let answer = resolve_answer(control.options(), line.trim());
            let answer = if answer.is_empty() { current } else { answer };

            match state.enter(&name, &answer) {
                Ok(()) => {}
                Err(FormkitError::InvalidInput(_, reason)) => {
                    eprintln!("{}", reason);
                    continue;
                }
                Err(e) => return Err(e),
            }
            let Some(control) = state.get(&name) else {
                break;
            };
            if control.is_valid() {
                break;
            }
            let messages = control.messages(&name);
            if messages.is_empty() {
                eprintln!("{} is not valid", name);
            }
            for message in messages {
                eprintln!("{}", message);
            }
        }
    }
    Ok(())
}

// A number picks from the listed options, anything else is taken literally.
fn resolve_answer(options: &[Option<String>], answer: &str) -> String {
    answer
        .parse::<usize>()
        .ok()
        .filter(|index| *index >= 1)
        .and_then(|index| options.get(index - 1))
        .and_then(|option| option.clone())
        .unwrap_or_else(|| answer.to_string())
}

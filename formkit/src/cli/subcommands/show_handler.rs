use formkit::{FormSpec, FormkitError};

use super::super::parser::load_session;
use super::super::render::render_form;

pub async fn handle_show(
    show_matches: &clap::ArgMatches,
    spec: &FormSpec,
    offline: bool,
) -> Result<(), FormkitError> {
    let mut session = load_session(spec, offline).await?;

    if let Some(user) = show_matches.get_one::<String>("user") {
        if !spec.prefill().apply(user, session.state_mut()) {
            eprintln!("No user record matches '{}'", user);
        }
    }
    if show_matches.get_flag("touch") {
        let state = session.state_mut();
        let names = state.names().to_vec();
        for name in names {
            state.blur(&name)?;
        }
    }

    let descriptors = session.builder().descriptors();
    print!("{}", render_form(spec.title(), &descriptors, session.state()));
    session.close();
    Ok(())
}

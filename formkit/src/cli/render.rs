use std::fmt::Write;

use formkit::{Control, FieldDescriptor, FormState};

const OPTIONS_PREVIEW: usize = 5;

pub fn render_form(
    title: &str,
    descriptors: &[FieldDescriptor],
    state: &FormState,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", title);
    for descriptor in descriptors {
        render_field(&mut out, descriptor, state.get(descriptor.name()));
    }
    let status = if state.is_valid() { "valid" } else { "invalid" };
    let _ = writeln!(out, "[form is {}]", status);
    out
}

fn render_field(
    out: &mut String,
    descriptor: &FieldDescriptor,
    control: Option<&Control>,
) {
    let name = descriptor.name();
    let Some(control) = control else {
        let _ = writeln!(
            out,
            "  {} ({}): not available",
            name,
            descriptor.kind()
        );
        return;
    };
    let rules: Vec<String> =
        control.rules().iter().map(|rule| rule.to_string()).collect();
    let _ = writeln!(
        out,
        "  {} ({}) [{}]",
        descriptor.label(),
        descriptor.kind(),
        rules.join(", ")
    );
    if descriptor.kind().is_choice() {
        let _ = writeln!(out, "    options: {}", options_summary(control));
    }
    let value = match control.value() {
        None | Some("") => "<empty>",
        Some(value) => value,
    };
    let _ = writeln!(out, "    value: {}", value);
    for message in control.messages(name) {
        let _ = writeln!(out, "    ! {}", message);
    }
}

fn options_summary(control: &Control) -> String {
    let options = control.options();
    if options.is_empty() {
        return "none".to_string();
    }
    let preview: Vec<&str> = options
        .iter()
        .take(OPTIONS_PREVIEW)
        .map(|option| option.as_deref().unwrap_or("<absent>"))
        .collect();
    if options.len() > OPTIONS_PREVIEW {
        format!("{} loaded ({}, ...)", options.len(), preview.join(", "))
    } else {
        preview.join(", ")
    }
}

/// Numbered option list used when prompting for a choice.
pub fn numbered_options(control: &Control) -> String {
    control
        .options()
        .iter()
        .enumerate()
        .map(|(index, option)| {
            format!(
                "    {}) {}",
                index + 1,
                option.as_deref().unwrap_or("<absent>")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use formkit::{ControlKind, FormBuilder, Rule, UpdateOn};

    use super::*;

    #[test]
    fn test_render_form() {
        let descriptors = vec![
            FieldDescriptor::text("username").with_rule(Rule::Required),
            FieldDescriptor::radio(
                "gender",
                vec!["Male".to_string(), "Female".to_string()],
            ),
        ];
        let mut state = FormBuilder::new(descriptors.clone()).build();
        state.blur("username").unwrap();

        let out = render_form("Profile", &descriptors, &state);
        assert!(out.starts_with("Profile\n"));
        assert!(out.contains("  username (text) [required]\n"));
        assert!(out.contains("    ! username is required\n"));
        assert!(out.contains("    options: Male, Female\n"));
        assert!(out.ends_with("[form is invalid]\n"));
    }

    #[test]
    fn test_options_summary() {
        let many: Vec<Option<String>> =
            (0..7).map(|i| Some(format!("o{}", i))).collect();
        let control = Control::new(None, vec![], UpdateOn::Change)
            .with_kind(ControlKind::Choice)
            .with_options(many);
        assert_eq!(
            options_summary(&control),
            "7 loaded (o0, o1, o2, o3, o4, ...)"
        );
        assert!(numbered_options(&control).starts_with("    1) o0\n"));
    }
}

//! Form validation for the topic picker and the save-progress form.

use crate::wizard::error::WizardError;

/// Trimmed name and email that passed [`validate_contact`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub name: String,
    pub email: String,
}

/// Validates the save-progress form. All problems are reported in one message.
pub fn validate_contact(name: &str, email: &str) -> Result<Contact, WizardError> {
    let name = name.trim();
    let email = email.trim();
    let mut problems = Vec::new();

    if name.is_empty() {
        problems.push("name is required");
    }
    if email.is_empty() {
        problems.push("email is required");
    } else if !is_plausible_email(email) {
        problems.push("email must look like local@domain.tld");
    }

    if !problems.is_empty() {
        return Err(WizardError::Validation(problems.join("; ")));
    }

    Ok(Contact {
        name: name.to_string(),
        email: email.to_string(),
    })
}

/// Basic `local@domain.tld` shape check. No whitespace anywhere, a non-empty local
/// part, and a domain with a non-empty label on both sides of its last dot.
pub fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.rsplit_once('@') else {
        return false;
    };
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !local.is_empty() && !host.is_empty() && !tld.is_empty()
}

/// Validates the user's topic choice against the offered list. Returns the chosen
/// titles trimmed and de-duplicated, in the order given.
pub fn choose_topics(offered: &[String], requested: &[String]) -> Result<Vec<String>, WizardError> {
    let mut chosen: Vec<String> = Vec::with_capacity(requested.len());
    for title in requested {
        let title = title.trim();
        if title.is_empty() || chosen.iter().any(|c| c == title) {
            continue;
        }
        if !offered.iter().any(|o| o == title) {
            return Err(WizardError::Validation(format!(
                "'{title}' is not one of the offered topics"
            )));
        }
        chosen.push(title.to_string());
    }

    if chosen.is_empty() {
        return Err(WizardError::Validation(
            "select at least one topic".to_string(),
        ));
    }
    Ok(chosen)
}

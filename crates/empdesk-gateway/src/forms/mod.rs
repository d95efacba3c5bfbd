//! Form validation
//!
//! Static validators for the three form shapes the gateway accepts. Each
//! returns either the normalized payload or a [`FieldErrors`] mapping.

mod errors;

pub use errors::{humanize, FieldErrors};

use empdesk_protocol::{Credentials, EmployeeRecord, RegistrationRequest};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::sync::LazyLock;

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_EMAIL: &str = "Enter a valid email address.";
pub const CONFIRM_PASSWORD: &str = "Please confirm your password.";
pub const PASSWORD_MISMATCH: &str = "Passwords do not match.";

const USERNAME_MAX: usize = 150;
const EMPLOYEE_ID_MAX: usize = 20;
const EMPLOYEE_NAME_MAX: usize = 100;
const EMPLOYEE_CONTACT_MAX: usize = 20;

const EMAIL_MAX: usize = 320;
const EMAIL_DOMAIN_ALLOWLIST: [&str; 1] = ["localhost"];

// Dot-atom or quoted-string local part
static RE_EMAIL_USER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)^(?:[-!#$%&'*+/=?^_`{}|~0-9A-Z]+(?:\.[-!#$%&'*+/=?^_`{}|~0-9A-Z]+)*|"(?:[\x01-\x08\x0b\x0c\x0e-\x1f!#-\[\]-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])*")$"#,
    )
    .unwrap()
});

// Dot-separated labels; the last one is 2-63 chars and does not end in '-'
static RE_EMAIL_DOMAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:[A-Z0-9](?:[A-Z0-9-]{0,61}[A-Z0-9])?\.)+[A-Z0-9-]{1,62}[A-Z0-9]$")
        .unwrap()
});

static RE_EMAIL_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\[([A-F0-9:.]+)\]$").unwrap());

/// Raw sign-up form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrationInput {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

/// Raw sign-in form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginInput {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Raw employee form, also used to pre-fill the edit page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeInput {
    #[serde(default)]
    pub employee_id: String,
    #[serde(default)]
    pub employee_name: String,
    #[serde(default)]
    pub employee_email: String,
    #[serde(default)]
    pub employee_contact: String,
}

impl From<EmployeeRecord> for EmployeeInput {
    fn from(record: EmployeeRecord) -> Self {
        Self {
            employee_id: record.employee_id,
            employee_name: record.employee_name,
            employee_email: record.employee_email,
            employee_contact: record.employee_contact,
        }
    }
}

pub fn validate_registration(
    input: &RegistrationInput,
) -> Result<RegistrationRequest, FieldErrors> {
    let mut errors = FieldErrors::default();

    let username = text(&mut errors, "username", &input.username, Some(USERNAME_MAX));
    let email = email(&mut errors, "email", &input.email);
    let password = secret(&mut errors, "password", &input.password);
    let confirm_password = secret(&mut errors, "confirm_password", &input.confirm_password);

    match (&password, &confirm_password) {
        (_, None) => errors.push_non_field(CONFIRM_PASSWORD),
        (password, Some(confirm)) if password.as_ref() != Some(confirm) => {
            errors.push_non_field(PASSWORD_MISMATCH)
        }
        _ => {}
    }

    match (username, email, password, confirm_password) {
        (Some(username), Some(email), Some(password), Some(confirm_password))
            if errors.is_empty() =>
        {
            Ok(RegistrationRequest {
                username,
                email,
                password,
                confirm_password,
            })
        }
        _ => Err(errors),
    }
}

pub fn validate_login(input: &LoginInput) -> Result<Credentials, FieldErrors> {
    let mut errors = FieldErrors::default();

    let username = text(&mut errors, "username", &input.username, Some(USERNAME_MAX));
    let password = secret(&mut errors, "password", &input.password);

    match (username, password) {
        (Some(username), Some(password)) if errors.is_empty() => {
            Ok(Credentials { username, password })
        }
        _ => Err(errors),
    }
}

/// Validates an employee form into a record without a backend id
pub fn validate_employee(input: &EmployeeInput) -> Result<EmployeeRecord, FieldErrors> {
    let mut errors = FieldErrors::default();

    let employee_id = text(&mut errors, "employee_id", &input.employee_id, Some(EMPLOYEE_ID_MAX));
    let employee_name = text(
        &mut errors,
        "employee_name",
        &input.employee_name,
        Some(EMPLOYEE_NAME_MAX),
    );
    let employee_email = email(&mut errors, "employee_email", &input.employee_email);
    let employee_contact = text(
        &mut errors,
        "employee_contact",
        &input.employee_contact,
        Some(EMPLOYEE_CONTACT_MAX),
    );

    match (employee_id, employee_name, employee_email, employee_contact) {
        (Some(employee_id), Some(employee_name), Some(employee_email), Some(employee_contact))
            if errors.is_empty() =>
        {
            Ok(EmployeeRecord {
                id: None,
                employee_id,
                employee_name,
                employee_email,
                employee_contact,
            })
        }
        _ => Err(errors),
    }
}

/// Email grammar: local part, `@`, then a domain name, an allowlisted host
/// or a bracketed IP literal
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().count() > EMAIL_MAX {
        return false;
    }

    let Some((user, domain)) = value.rsplit_once('@') else {
        return false;
    };

    if !RE_EMAIL_USER.is_match(user) {
        return false;
    }

    if EMAIL_DOMAIN_ALLOWLIST.contains(&domain) || RE_EMAIL_DOMAIN.is_match(domain) {
        return true;
    }

    RE_EMAIL_LITERAL
        .captures(domain)
        .and_then(|caps| caps.get(1))
        .is_some_and(|ip| ip.as_str().parse::<IpAddr>().is_ok())
}

/// Trimmed, required text field with an optional character limit
fn text(
    errors: &mut FieldErrors,
    field: &str,
    raw: &str,
    max_len: Option<usize>,
) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() {
        errors.push(field, REQUIRED);
        return None;
    }

    if let Some(max) = max_len {
        let len = value.chars().count();
        if len > max {
            errors.push(
                field,
                format!("Ensure this value has at most {max} characters (it has {len})."),
            );
            return None;
        }
    }

    Some(value.to_string())
}

fn email(errors: &mut FieldErrors, field: &str, raw: &str) -> Option<String> {
    let value = text(errors, field, raw, None)?;
    if !is_valid_email(&value) {
        errors.push(field, INVALID_EMAIL);
        return None;
    }
    Some(value)
}

// Passwords are taken verbatim
fn secret(errors: &mut FieldErrors, field: &str, raw: &str) -> Option<String> {
    if raw.is_empty() {
        errors.push(field, REQUIRED);
        return None;
    }
    Some(raw.to_string())
}

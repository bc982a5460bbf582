//! Declarative form fields and client-side validation.
//!
//! DESIGN
//! ======
//! Pages describe their inputs as a list of [`FieldSpec`]s. Validation is a
//! pure function of (fields, values) so the `Form` component, tests and any
//! page-level pre-checks all agree. [`FormState`] carries the per-submission
//! bookkeeping: values, field errors, a form-level error and the in-flight
//! flag that keeps a second click from submitting twice.
//!
//! RULE ORDER
//! ==========
//! Per field: required, then email, then minimum length, then custom
//! patterns. The first failing rule supplies the field's single message. An
//! empty optional field skips every other rule.

#[cfg(test)]
#[path = "form_test.rs"]
mod form_test;

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::LazyLock;

use regex::Regex;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// Input widget a field renders as.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FieldKind {
    #[default]
    Text,
    Email,
    Password,
    Number,
    Date,
    TextArea,
}

impl FieldKind {
    /// HTML `type` attribute for `<input>` kinds.
    #[must_use]
    pub fn input_type(self) -> &'static str {
        match self {
            Self::Text | Self::TextArea => "text",
            Self::Email => "email",
            Self::Password => "password",
            Self::Number => "number",
            Self::Date => "date",
        }
    }
}

#[derive(Clone, Debug)]
pub enum Rule {
    Email,
    MinLength(usize),
    Pattern { regex: Regex, message: String },
}

impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Email, Self::Email) => true,
            (Self::MinLength(a), Self::MinLength(b)) => a == b,
            (Self::Pattern { regex: ra, message: ma }, Self::Pattern { regex: rb, message: mb }) => {
                ra.as_str() == rb.as_str() && ma == mb
            }
            _ => false,
        }
    }
}

/// One declared input.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    pub rules: Vec<Rule>,
}

impl FieldSpec {
    #[must_use]
    pub fn new(name: &str, label: &str) -> Self {
        Self {
            name: name.to_owned(),
            label: label.to_owned(),
            kind: FieldKind::Text,
            required: false,
            rules: Vec::new(),
        }
    }

    #[must_use]
    pub fn kind(mut self, kind: FieldKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn email(mut self) -> Self {
        self.rules.push(Rule::Email);
        self
    }

    #[must_use]
    pub fn min_length(mut self, min: usize) -> Self {
        self.rules.push(Rule::MinLength(min));
        self
    }

    #[must_use]
    pub fn pattern(mut self, regex: Regex, message: &str) -> Self {
        self.rules.push(Rule::Pattern { regex, message: message.to_owned() });
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub type FormValues = BTreeMap<String, String>;

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Rank rules so they run in the documented order regardless of how they
/// were declared.
fn rule_rank(rule: &Rule) -> u8 {
    match rule {
        Rule::Email => 0,
        Rule::MinLength(_) => 1,
        Rule::Pattern { .. } => 2,
    }
}

fn check_rule(field: &FieldSpec, rule: &Rule, value: &str) -> Option<String> {
    match rule {
        Rule::Email if !EMAIL_PATTERN.is_match(value.trim()) => Some("Please enter a valid email address".to_owned()),
        Rule::MinLength(min) if value.chars().count() < *min => {
            Some(format!("{} must be at least {min} characters", field.label))
        }
        Rule::Pattern { regex, message } if !regex.is_match(value) => Some(message.clone()),
        _ => None,
    }
}

/// Message for the first rule `value` fails, if any.
#[must_use]
pub fn validate_field(field: &FieldSpec, value: &str) -> Option<String> {
    if is_blank(value) {
        return field.required.then(|| format!("{} is required", field.label));
    }
    let mut rules: Vec<&Rule> = field.rules.iter().collect();
    rules.sort_by_key(|r| rule_rank(r));
    rules.into_iter().find_map(|rule| check_rule(field, rule, value))
}

/// Validate every field, in declaration order. Missing values count as empty.
#[must_use]
pub fn validate_form(fields: &[FieldSpec], values: &FormValues) -> Vec<ValidationError> {
    fields
        .iter()
        .filter_map(|field| {
            let value = values.get(&field.name).map_or("", String::as_str);
            validate_field(field, value).map(|message| ValidationError { field: field.name.clone(), message })
        })
        .collect()
}

// =============================================================================
// FORM STATE
// =============================================================================

/// Why a submission did not reach the handler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitBlocked {
    Invalid(Vec<ValidationError>),
    InFlight,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormState {
    pub values: FormValues,
    pub errors: Vec<ValidationError>,
    pub form_error: Option<String>,
    pub submitting: bool,
}

impl FormState {
    /// One value per declared field, seeded from `initial` where present.
    #[must_use]
    pub fn new(fields: &[FieldSpec], initial: &FormValues) -> Self {
        let values = fields
            .iter()
            .map(|f| (f.name.clone(), initial.get(&f.name).cloned().unwrap_or_default()))
            .collect();
        Self { values, ..Self::default() }
    }

    #[must_use]
    pub fn value(&self, name: &str) -> &str {
        self.values.get(name).map_or("", String::as_str)
    }

    /// Update one value; editing a field clears its stale error.
    pub fn set_value(&mut self, name: &str, value: String) {
        if let Some(slot) = self.values.get_mut(name) {
            *slot = value;
            self.errors.retain(|e| e.field != name);
        }
    }

    #[must_use]
    pub fn error_for(&self, name: &str) -> Option<&str> {
        self.errors.iter().find(|e| e.field == name).map(|e| e.message.as_str())
    }

    /// Validate and, when clean, mark the form as submitting.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitBlocked`] when a submission is already in flight or
    /// any field fails validation; the handler must not run.
    pub fn begin_submit(&mut self, fields: &[FieldSpec]) -> Result<FormValues, SubmitBlocked> {
        if self.submitting {
            return Err(SubmitBlocked::InFlight);
        }
        self.form_error = None;
        self.errors = validate_form(fields, &self.values);
        if !self.errors.is_empty() {
            return Err(SubmitBlocked::Invalid(self.errors.clone()));
        }
        self.submitting = true;
        Ok(self.values.clone())
    }

    /// Record the handler's outcome and release the in-flight flag.
    pub fn finish_submit<E: fmt::Display>(&mut self, outcome: Result<(), E>) {
        self.submitting = false;
        self.form_error = outcome.err().map(|e| e.to_string());
    }

    /// Validate, run `handler` with the values, and record its outcome.
    ///
    /// Returns `true` when the handler ran and succeeded.
    pub async fn submit<H, Fut, E>(&mut self, fields: &[FieldSpec], handler: H) -> bool
    where
        H: FnOnce(FormValues) -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: fmt::Display,
    {
        let Ok(values) = self.begin_submit(fields) else {
            return false;
        };
        let outcome = handler(values).await;
        let ok = outcome.is_ok();
        self.finish_submit(outcome);
        ok
    }
}

//! Form state and validation for the login, register and session forms.
//!
//! DESIGN
//! ======
//! Validation is a pure function of the current values ([`validate`]).
//! [`Form`] recomputes it synchronously on every [`Form::set`], so
//! `can_submit()` is always in step with the last keystroke. A field that
//! has been edited is "dirty"; views style a field as invalid only once it
//! is dirty, so a blank form does not open covered in red.


pub mod validate;

use std::collections::{BTreeMap, BTreeSet};

pub use validate::{FieldError, FormField, Rule, Validation, is_email, validate, validate_value};

use crate::net::types::{LoginRequest, RegisterRequest, SessionPayload, timestamp};

/// Submit attempted while the form is invalid. Never reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid form fields: {}", .fields.join(", "))]
pub struct ValidationError {
    pub fields: Vec<&'static str>,
}

// =============================================================================
// FORM
// =============================================================================

#[derive(Debug, Clone)]
pub struct Form<F: FormField> {
    values: BTreeMap<F, String>,
    dirty: BTreeSet<F>,
    validation: Validation<F>,
}

impl<F: FormField> Default for Form<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FormField> Form<F> {
    /// Empty form. Invalid whenever any field is required.
    #[must_use]
    pub fn new() -> Self {
        let values = BTreeMap::new();
        let validation = validate(&values);
        Self { values, dirty: BTreeSet::new(), validation }
    }

    /// Prefilled form (e.g. edit mode). Prefilled fields are not dirty.
    #[must_use]
    pub fn with_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = (F, S)>,
        S: Into<String>,
    {
        let values: BTreeMap<F, String> = values.into_iter().map(|(f, v)| (f, v.into())).collect();
        let validation = validate(&values);
        Self { values, dirty: BTreeSet::new(), validation }
    }

    /// Update one field and revalidate.
    pub fn set(&mut self, field: F, value: impl Into<String>) {
        self.values.insert(field, value.into());
        self.dirty.insert(field);
        self.validation = validate(&self.values);
    }

    #[must_use]
    pub fn value(&self, field: F) -> &str {
        self.values.get(&field).map_or("", String::as_str)
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validation.valid
    }

    /// Submit control state. Identical to [`Form::is_valid`].
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.validation.valid
    }

    #[must_use]
    pub fn validation(&self) -> &Validation<F> {
        &self.validation
    }

    #[must_use]
    pub fn errors(&self, field: F) -> &[FieldError] {
        self.validation.errors(field)
    }

    #[must_use]
    pub fn has_error(&self, field: F, error: FieldError) -> bool {
        self.errors(field).contains(&error)
    }

    #[must_use]
    pub fn is_field_valid(&self, field: F) -> bool {
        self.errors(field).is_empty()
    }

    #[must_use]
    pub fn is_dirty(&self, field: F) -> bool {
        self.dirty.contains(&field)
    }

    /// Whether the view should style `field` as invalid.
    #[must_use]
    pub fn shows_invalid(&self, field: F) -> bool {
        self.is_dirty(field) && !self.is_field_valid(field)
    }

    /// Flag every field dirty, e.g. after a rejected submit.
    pub fn mark_all_dirty(&mut self) {
        self.dirty.extend(F::ALL.iter().copied());
    }

    /// Gate for submission.
    ///
    /// # Errors
    ///
    /// Returns the names of the failing fields when the form is invalid.
    pub fn check(&self) -> Result<(), ValidationError> {
        if self.validation.valid {
            return Ok(());
        }
        Err(ValidationError { fields: self.validation.field_errors.keys().map(|f| f.name()).collect() })
    }
}

// =============================================================================
// LOGIN
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LoginField {
    Email,
    Password,
}

impl FormField for LoginField {
    const ALL: &'static [Self] = &[Self::Email, Self::Password];

    fn name(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Password => "password",
        }
    }

    fn rules(self) -> &'static [Rule] {
        match self {
            Self::Email => &[Rule::Required, Rule::Email],
            Self::Password => &[Rule::Required],
        }
    }
}

pub type LoginForm = Form<LoginField>;

impl Form<LoginField> {
    /// # Errors
    ///
    /// Returns [`ValidationError`] when the form is invalid.
    pub fn login_request(&self) -> Result<LoginRequest, ValidationError> {
        self.check()?;
        Ok(LoginRequest {
            email: self.value(LoginField::Email).to_owned(),
            password: self.value(LoginField::Password).to_owned(),
        })
    }
}

// =============================================================================
// REGISTER
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RegisterField {
    FirstName,
    LastName,
    Email,
    Password,
}

impl FormField for RegisterField {
    const ALL: &'static [Self] = &[Self::FirstName, Self::LastName, Self::Email, Self::Password];

    fn name(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Email => "email",
            Self::Password => "password",
        }
    }

    fn rules(self) -> &'static [Rule] {
        match self {
            Self::Email => &[Rule::Required, Rule::Email],
            Self::FirstName | Self::LastName | Self::Password => &[Rule::Required],
        }
    }
}

pub type RegisterForm = Form<RegisterField>;

impl Form<RegisterField> {
    /// # Errors
    ///
    /// Returns [`ValidationError`] when the form is invalid.
    pub fn register_request(&self) -> Result<RegisterRequest, ValidationError> {
        self.check()?;
        Ok(RegisterRequest {
            email: self.value(RegisterField::Email).to_owned(),
            first_name: self.value(RegisterField::FirstName).to_owned(),
            last_name: self.value(RegisterField::LastName).to_owned(),
            password: self.value(RegisterField::Password).to_owned(),
        })
    }
}

// =============================================================================
// SESSION (create / edit)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SessionField {
    Name,
    Date,
    TeacherId,
    Description,
}

impl FormField for SessionField {
    const ALL: &'static [Self] = &[Self::Name, Self::Date, Self::TeacherId, Self::Description];

    fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Date => "date",
            Self::TeacherId => "teacher_id",
            Self::Description => "description",
        }
    }

    fn rules(self) -> &'static [Rule] {
        match self {
            Self::Date => &[Rule::Required, Rule::Day],
            Self::TeacherId => &[Rule::Required, Rule::Integer],
            Self::Name | Self::Description => &[Rule::Required],
        }
    }
}

pub type SessionForm = Form<SessionField>;

impl Form<SessionField> {
    /// Edit-mode form prefilled from an existing session's fields.
    #[must_use]
    pub fn from_payload(payload: &SessionPayload) -> Self {
        Self::with_values([
            (SessionField::Name, payload.name.clone()),
            (SessionField::Date, timestamp::format_day(payload.date)),
            (SessionField::TeacherId, payload.teacher_id.to_string()),
            (SessionField::Description, payload.description.clone()),
        ])
    }

    /// Convert to a request body. The date must be `YYYY-MM-DD` and the
    /// teacher a numeric id; both are field rules, so a form that
    /// `can_submit()` always converts.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when the form is invalid or a value does
    /// not convert.
    pub fn session_payload(&self) -> Result<SessionPayload, ValidationError> {
        self.check()?;
        let date = timestamp::parse_day(self.value(SessionField::Date))
            .map_err(|_| ValidationError { fields: vec![SessionField::Date.name()] })?;
        let teacher_id = self
            .value(SessionField::TeacherId)
            .trim()
            .parse()
            .map_err(|_| ValidationError { fields: vec![SessionField::TeacherId.name()] })?;
        Ok(SessionPayload {
            name: self.value(SessionField::Name).to_owned(),
            description: self.value(SessionField::Description).to_owned(),
            date,
            teacher_id,
        })
    }
}

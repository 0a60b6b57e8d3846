//! Utilities for validating constraints on types.

use super::error::ValidationError;
use serde::Deserialize;
use validator::{Validate, ValidationErrors};

/// Fixes the order in which field errors are reported.
///
/// Only the first failing field in [`FieldOrder::FIELD_ORDER`] ends up in the
/// [`ValidationError`].
pub trait FieldOrder {
    /// Field names, most important first.
    const FIELD_ORDER: &'static [&'static str];
}

/// A type that cannot be instatiated without validating the value within.
/// That is, if you have a [`Valid<T>`], `T` is guaranteed to be valid.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Valid<T> {
    value: T,
}

impl<T> Valid<T> {
    /// Constructs a new validated value.
    pub fn new(value: T) -> Result<Valid<T>, ValidationError>
    where
        T: Validate + FieldOrder,
    {
        value
            .validate()
            .map(|_| Valid { value })
            .map_err(|e| first_error::<T>(&e))
    }

    /// Returns a reference to the validated value.
    pub fn inner(&self) -> &T {
        &self.value
    }

    /// Returns the validated value.
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> AsRef<T> for Valid<T> {
    fn as_ref(&self) -> &T {
        &self.value
    }
}

impl<'de, T: Deserialize<'de> + Validate + FieldOrder> Deserialize<'de> for Valid<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value: T = T::deserialize(deserializer)?;
        Valid::new(value).map_err(|e| serde::de::Error::custom(e.to_string()))
    }
}

fn first_error<T: FieldOrder>(errors: &ValidationErrors) -> ValidationError {
    let field_errors = errors.field_errors();
    for field in T::FIELD_ORDER {
        let errs = field_errors
            .iter()
            .find_map(|(name, errs)| (name == field).then_some(errs));
        if let Some(e) = errs.and_then(|errs| errs.first()) {
            return match &e.message {
                Some(message) => ValidationError::new(message.to_string()),
                None => ValidationError::new(format!("{field} is invalid")),
            };
        }
    }
    ValidationError::new(errors.to_string())
}

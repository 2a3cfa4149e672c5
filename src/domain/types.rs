//! Strongly-typed value objects used by domain entities.
//!
//! Domain structs should carry these wrappers instead of raw primitives so
//! that identifiers, text values and numeric constraints are enforced at the
//! boundary.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when attempting to construct constrained domain types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// An identifier was zero or negative.
    #[error("{0} must be greater than zero")]
    NonPositiveId(&'static str),
    /// A numeric value required to be non-negative was negative or invalid.
    #[error("{0} must be zero or greater")]
    NegativeNumber(&'static str),
    /// A string was empty or whitespace-only after trimming.
    #[error("{0} cannot be empty")]
    EmptyString(&'static str),
}

fn trim_and_require_non_empty<S: Into<String>>(
    value: S,
    field: &'static str,
) -> Result<String, TypeConstraintError> {
    let trimmed = value.into().trim().to_string();
    if trimmed.is_empty() {
        Err(TypeConstraintError::EmptyString(field))
    } else {
        Ok(trimmed)
    }
}

/// Wrapper for non-empty, trimmed strings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Trims whitespace and rejects empty inputs.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        Self::new_for_field(value, "value")
    }

    /// Same as [`Self::new`] but with field-specific error context.
    pub fn new_for_field<S: Into<String>>(
        value: S,
        field: &'static str,
    ) -> Result<Self, TypeConstraintError> {
        trim_and_require_non_empty(value, field).map(Self)
    }

    /// Borrow the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper returning the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for NonEmptyString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyString {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(
            Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId($field))
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<i32> for $name {
            fn eq(&self, other: &i32) -> bool {
                self.0 == *other
            }
        }

        impl PartialEq<$name> for i32 {
            fn eq(&self, other: &$name) -> bool {
                *self == other.0
            }
        }
    };
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let inner = NonEmptyString::new_for_field(value, $field)?;
                Ok(Self(inner.into_inner()))
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.as_str() == *other
            }
        }

        impl PartialEq<$name> for &str {
            fn eq(&self, other: &$name) -> bool {
                *self == other.as_str()
            }
        }
    };
}

id_newtype!(ProductId, "Identifier of a product record.", "product id");
id_newtype!(ColorId, "Identifier of a color reference record.", "color id");

non_empty_string_newtype!(ProductName, "Display name of a product.", "product name");
non_empty_string_newtype!(ProductSize, "Size label of a product.", "product size");
non_empty_string_newtype!(ColorName, "Display name of a color.", "color name");

/// Price of a product. Always finite and non-negative.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, PartialOrd)]
#[serde(transparent)]
pub struct ProductPrice(f64);

impl ProductPrice {
    /// Creates a price, rejecting negative or non-finite values.
    pub fn new(value: f64) -> Result<Self, TypeConstraintError> {
        if value.is_finite() && value >= 0.0 {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::NegativeNumber("product price"))
        }
    }

    /// Returns the raw `f64` backing this price.
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl Display for ProductPrice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<f64> for ProductPrice {
    type Error = TypeConstraintError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProductPrice> for f64 {
    fn from(value: ProductPrice) -> Self {
        value.0
    }
}

impl PartialEq<f64> for ProductPrice {
    fn eq(&self, other: &f64) -> bool {
        self.0 == *other
    }
}

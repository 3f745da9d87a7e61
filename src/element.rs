use crate::{
    duration::{Duration, DurationError},
    float::{format_general, Float, FLOAT_PRECISION},
    str_to_bool::str_to_bool,
};
use std::num::{ParseFloatError, ParseIntError};

/// A failure to parse a single element of a flag value
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ElementError {
    /// Not one of the accepted boolean spellings
    #[error("invalid bool {0:?}, expected one of true/false/t/f/yes/no/y/n/1/0")]
    Bool(String),
    /// Not a base-10 integer in range
    #[error(transparent)]
    Int(#[from] ParseIntError),
    /// Not a floating point number
    #[error(transparent)]
    Float(#[from] ParseFloatError),
    /// Not a duration
    #[error(transparent)]
    Duration(#[from] DurationError),
}

/// A type which can appear in a flag value, alone or as a member of a
/// delimited slice or set.
///
/// `decode` and `encode` are inverses up to canonical form: `encode` always
/// produces text that `decode` accepts, though `decode` may accept more than
/// one spelling of a value.
pub trait Element: Sized {
    /// Short name of the value type, used as a placeholder in usage text
    const TYPE_NAME: &'static str;

    /// True for `bool`: a scalar flag of this type may be given without a value
    const IS_BOOL: bool = false;

    /// True if a scalar default of this type is shown in quotes in usage text
    const QUOTED: bool = false;

    /// Parse one element from its text form
    fn decode(src: &str) -> Result<Self, ElementError>;

    /// Render the canonical text form
    fn encode(&self) -> String;
}

impl Element for bool {
    const TYPE_NAME: &'static str = "bool";
    const IS_BOOL: bool = true;

    fn decode(src: &str) -> Result<Self, ElementError> {
        str_to_bool(src).ok_or_else(|| ElementError::Bool(src.to_owned()))
    }

    fn encode(&self) -> String {
        self.to_string()
    }
}

macro_rules! int_element {
    ($typ:ty, $name:literal) => {
        impl Element for $typ {
            const TYPE_NAME: &'static str = $name;

            fn decode(src: &str) -> Result<Self, ElementError> {
                Ok(src.parse::<$typ>()?)
            }

            fn encode(&self) -> String {
                self.to_string()
            }
        }
    };
}

int_element!(i32, "int");
int_element!(i64, "int");
int_element!(u32, "uint");
int_element!(u64, "uint");

impl Element for f64 {
    const TYPE_NAME: &'static str = "float";

    fn decode(src: &str) -> Result<Self, ElementError> {
        Ok(src.parse::<f64>()?)
    }

    fn encode(&self) -> String {
        format_general(*self, FLOAT_PRECISION)
    }
}

impl Element for Float {
    const TYPE_NAME: &'static str = "float";

    fn decode(src: &str) -> Result<Self, ElementError> {
        f64::decode(src).map(Self)
    }

    fn encode(&self) -> String {
        self.0.encode()
    }
}

impl Element for Duration {
    const TYPE_NAME: &'static str = "duration";

    fn decode(src: &str) -> Result<Self, ElementError> {
        Ok(src.parse::<Duration>()?)
    }

    fn encode(&self) -> String {
        self.to_string()
    }
}

impl Element for String {
    const TYPE_NAME: &'static str = "string";
    const QUOTED: bool = true;

    fn decode(src: &str) -> Result<Self, ElementError> {
        Ok(src.to_owned())
    }

    fn encode(&self) -> String {
        self.clone()
    }
}

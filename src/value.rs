use crate::{
    codec::{decode_set, decode_slice, encode_set, encode_slice},
    element::Element,
};
use std::{collections::HashSet, fmt, hash::Hash, str::FromStr};

/// Error type produced when a [`Value`] rejects its input
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The dynamic part of a flag: something that can be set from text and
/// rendered back to text.
///
/// Implement this to register a flag of a custom kind with
/// [`FlagSet::var`](crate::FlagSet::var).
pub trait Value {
    /// Replace the current value by parsing `raw`.
    /// On error the current value must be left unchanged.
    fn set(&mut self, raw: &str) -> Result<(), BoxError>;

    /// Render the current value
    fn encode(&self) -> String;

    /// The placeholder shown after the flag name in usage text,
    /// unless the usage text supplies one in back quotes
    fn type_name(&self) -> &str {
        "value"
    }

    /// The text of this kind of flag's zero value. Defaults equal to this are
    /// not shown in usage text.
    fn zero_text(&self) -> String {
        String::new()
    }

    /// True if the flag may appear with no value, meaning "true"
    fn is_bool_flag(&self) -> bool {
        false
    }

    /// True if the default should be shown in quotes in usage text
    fn quote_default(&self) -> bool {
        false
    }

    /// True if the flag may be given more than once. Each occurrence is passed to
    /// [`Value::set`] in command-line order. Otherwise a repeat is a parse error.
    fn is_repeatable(&self) -> bool {
        false
    }
}

/// A single element bound to a variable
pub struct ScalarValue<'a, T> {
    target: &'a mut T,
}

impl<'a, T> ScalarValue<'a, T> {
    /// Bind to target
    pub fn new(target: &'a mut T) -> Self {
        Self { target }
    }
}

impl<'a, T: Element + Default> Value for ScalarValue<'a, T> {
    fn set(&mut self, raw: &str) -> Result<(), BoxError> {
        *self.target = T::decode(raw)?;
        Ok(())
    }

    fn encode(&self) -> String {
        self.target.encode()
    }

    fn type_name(&self) -> &str {
        if T::IS_BOOL {
            ""
        } else {
            T::TYPE_NAME
        }
    }

    fn zero_text(&self) -> String {
        T::default().encode()
    }

    fn is_bool_flag(&self) -> bool {
        T::IS_BOOL
    }

    fn quote_default(&self) -> bool {
        T::QUOTED
    }
}

/// A delimited ordered sequence bound to a `Vec`
pub struct SliceValue<'a, T> {
    target: &'a mut Vec<T>,
    delimiter: String,
}

impl<'a, T> SliceValue<'a, T> {
    /// Bind to target, splitting and joining on delimiter
    pub fn new(target: &'a mut Vec<T>, delimiter: impl Into<String>) -> Self {
        Self {
            target,
            delimiter: delimiter.into(),
        }
    }
}

impl<'a, T: Element> Value for SliceValue<'a, T> {
    fn set(&mut self, raw: &str) -> Result<(), BoxError> {
        *self.target = decode_slice(raw, &self.delimiter)?;
        Ok(())
    }

    fn encode(&self) -> String {
        encode_slice(self.target.as_slice(), &self.delimiter)
    }

    fn type_name(&self) -> &str {
        T::TYPE_NAME
    }
}

/// A delimited set bound to a `HashSet`
pub struct SetValue<'a, T> {
    target: &'a mut HashSet<T>,
    delimiter: String,
}

impl<'a, T> SetValue<'a, T> {
    /// Bind to target, splitting and joining on delimiter
    pub fn new(target: &'a mut HashSet<T>, delimiter: impl Into<String>) -> Self {
        Self {
            target,
            delimiter: delimiter.into(),
        }
    }
}

impl<'a, T: Element + Eq + Hash> Value for SetValue<'a, T> {
    fn set(&mut self, raw: &str) -> Result<(), BoxError> {
        *self.target = decode_set(raw, &self.delimiter)?;
        Ok(())
    }

    fn encode(&self) -> String {
        encode_set(&*self.target, &self.delimiter)
    }

    fn type_name(&self) -> &str {
        T::TYPE_NAME
    }
}

/// Any `FromStr + Display` type bound to a variable
pub struct TextValue<'a, T> {
    target: &'a mut T,
}

impl<'a, T> TextValue<'a, T> {
    /// Bind to target
    pub fn new(target: &'a mut T) -> Self {
        Self { target }
    }
}

impl<'a, T> Value for TextValue<'a, T>
where
    T: FromStr + fmt::Display,
    T::Err: Into<BoxError>,
{
    fn set(&mut self, raw: &str) -> Result<(), BoxError> {
        *self.target = raw.parse::<T>().map_err(Into::<BoxError>::into)?;
        Ok(())
    }

    fn encode(&self) -> String {
        self.target.to_string()
    }
}

/// A callback invoked with each value seen for the flag
pub struct FuncValue<F> {
    func: F,
}

impl<F> FuncValue<F> {
    /// Wrap a callback
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F, E> Value for FuncValue<F>
where
    F: FnMut(&str) -> Result<(), E>,
    E: Into<BoxError>,
{
    fn set(&mut self, raw: &str) -> Result<(), BoxError> {
        (self.func)(raw).map_err(Into::into)
    }

    fn encode(&self) -> String {
        String::new()
    }

    fn is_repeatable(&self) -> bool {
        true
    }
}

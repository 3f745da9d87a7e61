use crate::value::{BoxError, Value};
use std::fmt;

/// A registered flag: its names, help text, default, and the value it writes
/// into.
pub struct Flag<'a> {
    pub(crate) name: String,
    pub(crate) alias: Option<String>,
    pub(crate) usage: String,
    pub(crate) def_value: String,
    pub(crate) value: Box<dyn Value + 'a>,
    pub(crate) changed: bool,
}

impl<'a> Flag<'a> {
    pub(crate) fn new(
        value: Box<dyn Value + 'a>,
        name: &str,
        alias: &str,
        usage: &str,
    ) -> Self {
        let def_value = value.encode();
        Self {
            name: name.to_owned(),
            alias: (!alias.is_empty()).then(|| alias.to_owned()),
            usage: usage.to_owned(),
            def_value,
            value,
            changed: false,
        }
    }

    /// Name as it was registered
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The alias, if one was registered
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Help text
    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// Text of the value the flag had when it was registered
    pub fn default_value(&self) -> &str {
        &self.def_value
    }

    /// Text of the flag's current value
    pub fn value(&self) -> String {
        self.value.encode()
    }

    /// True if the value was set by parsing or by `FlagSet::set`
    pub fn changed(&self) -> bool {
        self.changed
    }

    /// True if the flag may be given without a value
    pub fn is_bool_flag(&self) -> bool {
        self.value.is_bool_flag()
    }

    /// True if the flag may appear more than once, each value being passed to it in turn
    pub fn is_repeatable(&self) -> bool {
        self.value.is_repeatable()
    }

    pub(crate) fn set(&mut self, raw: &str) -> Result<(), BoxError> {
        self.value.set(raw)?;
        self.changed = true;
        Ok(())
    }

    /// The flag's primary spelling on the command line, e.g. `--timeout` or `-t`
    pub fn switch(&self) -> String {
        switch(&self.name)
    }

    /// Extract a back-quoted name from the usage text, if any, and return it
    /// along with the un-quoted usage. Given "a `name` to show" it returns
    /// ("name", "a name to show"). If there are no back quotes, the name is
    /// the value's type name, which is empty for bool flags.
    pub fn unquote_usage(&self) -> (String, String) {
        if let Some((before, rest)) = self.usage.split_once('`') {
            if let Some((name, after)) = rest.split_once('`') {
                return (name.to_owned(), format!("{before}{name}{after}"));
            }
        }
        (self.value.type_name().to_owned(), self.usage.clone())
    }

    fn default_is_zero_value(&self) -> bool {
        self.def_value == self.value.zero_text()
    }

    // Desired output is like:
    //   --timeout (-t) duration
    //     	just a timeout (default 10s)
    //
    // One-letter flags with no placeholder keep the usage on the same line.
    pub(crate) fn print(&self, stream: &mut impl fmt::Write) -> fmt::Result {
        let mut line = format!("  {}", self.switch());
        if let Some(alias) = self.alias.as_deref() {
            line.push_str(&format!(" ({})", switch(alias)));
        }
        let (name, usage) = self.unquote_usage();
        if !name.is_empty() {
            line.push(' ');
            line.push_str(&name);
        }
        if line.len() <= 4 {
            // space, space, '-', 'x'
            line.push('\t');
        } else {
            // Four spaces before the tab triggers good alignment
            // for both 4- and 8-space tab stops.
            line.push_str("\n    \t");
        }
        line.push_str(&usage.replace('\n', "\n    \t"));

        if !self.default_is_zero_value() {
            if self.value.quote_default() {
                line.push_str(&format!(" (default {:?})", self.def_value));
            } else {
                line.push_str(&format!(" (default {})", self.def_value));
            }
        }
        writeln!(stream, "{line}")
    }
}

impl fmt::Debug for Flag<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flag")
            .field("name", &self.name)
            .field("alias", &self.alias)
            .field("usage", &self.usage)
            .field("def_value", &self.def_value)
            .field("value", &self.value.encode())
            .field("changed", &self.changed)
            .finish()
    }
}

/// How a name is spelled on the command line: one character names are short
/// switches, longer names are long switches
pub(crate) fn switch(name: &str) -> String {
    if short_char(name).is_some() {
        format!("-{name}")
    } else {
        format!("--{name}")
    }
}

pub(crate) fn short_char(name: &str) -> Option<char> {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

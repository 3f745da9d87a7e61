use crate::{
    element::Element,
    flag::{short_char, Flag},
    value::{BoxError, FuncValue, ScalarValue, SetValue, SliceValue, TextValue, Value},
    Duration, Error, Float,
};
use clap::{builder::ValueParser, parser::ValueSource, Arg, ArgAction, Command};
use std::{
    collections::{BTreeMap, HashSet},
    ffi::OsString,
    fmt,
    hash::Hash,
    str::FromStr,
};

// Id of the catch-all positional argument. Flag names cannot contain '=' so
// this never collides with one.
const ARGS_ID: &str = "=args";
const HELP_ID: &str = "=help";

/// A set of flags bound to variables.
///
/// Each flag has a primary name and an optional alias, and either spelling
/// on the command line sets the same variable. One-character names are short
/// switches (`-t`) and longer names are long switches (`--timeout`).
///
/// The flag set mutably borrows every variable registered with it, and writes
/// each variable's default into it at registration. After [`FlagSet::parse`],
/// drop the flag set (or let it go out of scope) to read the variables.
///
/// Flag names must be unique within a `FlagSet`, counting aliases. An attempt to
/// define a flag whose name is already in use panics.
///
/// ```
/// use flagkit::{Duration, FlagSet};
///
/// let mut timeout = Duration::ZERO;
/// let mut ids: Vec<u64> = Vec::new();
///
/// let mut flags = FlagSet::new("fetch");
/// flags.duration(&mut timeout, "timeout", "t", Duration::from_secs(10), "just a timeout");
/// flags.uint64_slice(&mut ids, "ids", "", vec![], ",", "`IDS` to fetch");
/// flags.parse(["-t", "20s", "--ids=3,1,2", "out.json"]).unwrap();
/// assert_eq!(flags.args(), ["out.json"]);
/// drop(flags);
///
/// assert_eq!(timeout, Duration::from_secs(20));
/// assert_eq!(ids, [3, 1, 2]);
/// ```
pub struct FlagSet<'a> {
    name: String,
    parsed: bool,
    args: Vec<String>,
    flags: Vec<Flag<'a>>,
    // Every primary name and alias, mapped to its index in flags
    names: BTreeMap<String, usize>,
}

macro_rules! scalar_flag {
    ($method:ident, $typ:ty) => {
        #[doc = concat!(
            "Define a `", stringify!($typ), "` flag with the specified name, alias, default value, and usage string.\n\n",
            "The variable p is set to the default immediately, and receives the flag's value when it is parsed. ",
            "An empty alias means no alias."
        )]
        pub fn $method(&mut self, p: &'a mut $typ, name: &str, alias: &str, value: $typ, usage: &str) {
            *p = value;
            self.var(ScalarValue::new(p), name, alias, usage);
        }
    };
}

macro_rules! slice_flag {
    ($method:ident, $typ:ty) => {
        #[doc = concat!(
            "Define a flag holding a `Vec<", stringify!($typ), ">`, with the specified name, alias, default value, delimiter, and usage string.\n\n",
            "The value on the command line is split on the delimiter and every segment must parse, ",
            "otherwise the variable is left unchanged. An empty value means an empty `Vec`. ",
            "An empty alias means no alias."
        )]
        pub fn $method(
            &mut self,
            p: &'a mut Vec<$typ>,
            name: &str,
            alias: &str,
            value: Vec<$typ>,
            delimiter: &str,
            usage: &str,
        ) {
            *p = value;
            self.var(SliceValue::new(p, delimiter), name, alias, usage);
        }
    };
}

macro_rules! set_flag {
    ($method:ident, $typ:ty) => {
        #[doc = concat!(
            "Define a flag holding a `HashSet<", stringify!($typ), ">`, with the specified name, alias, default value, delimiter, and usage string.\n\n",
            "The value on the command line is split on the delimiter and every segment must parse, ",
            "otherwise the variable is left unchanged. Repeated members collapse. The current value is ",
            "rendered with its members sorted as text. An empty alias means no alias."
        )]
        pub fn $method(
            &mut self,
            p: &'a mut HashSet<$typ>,
            name: &str,
            alias: &str,
            value: HashSet<$typ>,
            delimiter: &str,
            usage: &str,
        ) {
            *p = value;
            self.var(SetValue::new(p, delimiter), name, alias, usage);
        }
    };
}

impl<'a> FlagSet<'a> {
    /// Create an empty flag set. The name is used in error and usage messages.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parsed: false,
            args: Vec::new(),
            flags: Vec::new(),
            names: BTreeMap::new(),
        }
    }

    /// The name given to [`FlagSet::new`]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Define a flag backed by any [`Value`].
    ///
    /// An empty alias means no alias will be created.
    ///
    /// # Panics
    ///
    /// If the name or alias is already in use in this set, if the name is empty, or if
    /// either begins with '-' or contains '='.
    pub fn var(&mut self, value: impl Value + 'a, name: &str, alias: &str, usage: &str) {
        self.check_name(name);
        if !alias.is_empty() {
            if alias == name {
                panic!("{} flag redefined: {}", self.name, alias);
            }
            self.check_name(alias);
        }

        let idx = self.flags.len();
        self.names.insert(name.to_owned(), idx);
        if !alias.is_empty() {
            self.names.insert(alias.to_owned(), idx);
        }
        self.flags
            .push(Flag::new(Box::new(value), name, alias, usage));

        tracing::trace!(flag_set = %self.name, name, alias, "registered flag");
    }

    fn check_name(&self, name: &str) {
        if name.is_empty() {
            panic!("{} flag has an empty name", self.name);
        }
        if name.starts_with('-') {
            panic!("flag {name:?} begins with -");
        }
        if name.contains('=') {
            panic!("flag {name:?} contains =");
        }
        if self.names.contains_key(name) {
            panic!("{} flag redefined: {}", self.name, name);
        }
    }

    /// Define a flag which calls `func` with each value given for it. The flag may be repeated,
    /// and `func` sees the values in command-line order. An error returned from `func` is
    /// reported as an invalid value for the flag.
    ///
    /// An empty alias means no alias will be created.
    pub fn func<F, E>(&mut self, name: &str, alias: &str, usage: &str, func: F)
    where
        F: FnMut(&str) -> Result<(), E> + 'a,
        E: Into<BoxError>,
    {
        self.var(FuncValue::new(func), name, alias, usage);
    }

    /// Define a flag for any type with a text form, i.e. `FromStr` and `Display`, with the
    /// specified name, alias, default value, and usage string.
    ///
    /// The variable p is set to the default immediately, and the flag's value is passed to
    /// `T::from_str` when it is parsed. An empty alias means no alias will be created.
    ///
    /// ```
    /// use flagkit::FlagSet;
    /// use std::net::IpAddr;
    ///
    /// let mut ip: IpAddr = [0, 0, 0, 0].into();
    /// let mut flags = FlagSet::new("serve");
    /// flags.text(&mut ip, "ip", "", [192, 168, 0, 100].into(), "`IP address` to parse");
    /// flags.parse(["--ip", "127.0.0.1"]).unwrap();
    /// drop(flags);
    /// assert_eq!(ip.to_string(), "127.0.0.1");
    /// ```
    pub fn text<T>(&mut self, p: &'a mut T, name: &str, alias: &str, value: T, usage: &str)
    where
        T: FromStr + fmt::Display,
        T::Err: Into<BoxError>,
    {
        *p = value;
        self.var(TextValue::new(p), name, alias, usage);
    }

    scalar_flag!(bool, bool);
    scalar_flag!(int32, i32);
    scalar_flag!(int64, i64);
    scalar_flag!(uint32, u32);
    scalar_flag!(uint64, u64);
    scalar_flag!(float64, f64);
    scalar_flag!(duration, Duration);
    scalar_flag!(string, String);

    slice_flag!(bool_slice, bool);
    slice_flag!(int32_slice, i32);
    slice_flag!(int64_slice, i64);
    slice_flag!(uint32_slice, u32);
    slice_flag!(uint64_slice, u64);
    slice_flag!(float64_slice, f64);
    slice_flag!(duration_slice, Duration);
    slice_flag!(string_slice, String);

    set_flag!(int32_set, i32);
    set_flag!(int64_set, i64);
    set_flag!(uint32_set, u32);
    set_flag!(uint64_set, u64);
    set_flag!(float64_set, Float);
    set_flag!(duration_set, Duration);
    set_flag!(string_set, String);

    /// Define a slice flag for any [`Element`] type. See [`FlagSet::int64_slice`].
    pub fn slice<T: Element + 'a>(
        &mut self,
        p: &'a mut Vec<T>,
        name: &str,
        alias: &str,
        value: Vec<T>,
        delimiter: &str,
        usage: &str,
    ) {
        *p = value;
        self.var(SliceValue::new(p, delimiter), name, alias, usage);
    }

    /// Define a set flag for any [`Element`] type. See [`FlagSet::int64_set`].
    pub fn set_of<T: Element + Eq + Hash + 'a>(
        &mut self,
        p: &'a mut HashSet<T>,
        name: &str,
        alias: &str,
        value: HashSet<T>,
        delimiter: &str,
        usage: &str,
    ) {
        *p = value;
        self.var(SetValue::new(p, delimiter), name, alias, usage);
    }

    /// Build the clap command which parses this flag set.
    ///
    /// This is also useful to render clap's own help text.
    pub fn command(&self) -> Command {
        let mut command = Command::new(self.name.clone())
            .no_binary_name(true)
            .disable_help_flag(true);

        for flag in self.flags.iter() {
            command = command.arg(Self::make_arg(flag));
        }

        // Each help spelling is only provided if the user has not claimed its name.
        let long_help = !self.names.contains_key("help");
        let short_help = !self.names.contains_key("h");
        if long_help || short_help {
            let mut help = Arg::new(HELP_ID)
                .action(ArgAction::Help)
                .help("Print help");
            if long_help {
                help = help.long("help");
            }
            if short_help {
                help = help.short('h');
            }
            command = command.arg(help);
        }

        command.arg(
            Arg::new(ARGS_ID)
                .value_name("ARGS")
                .num_args(1..)
                .action(ArgAction::Append)
                .trailing_var_arg(true)
                .value_parser(ValueParser::string()),
        )
    }

    // Turn a Flag into a clap arg, under its name and alias.
    fn make_arg(flag: &Flag) -> Arg {
        let mut arg = Arg::new(flag.name.clone())
            .required(false)
            .value_parser(ValueParser::string());

        arg = match short_char(&flag.name) {
            Some(c) => arg.short(c),
            None => arg.long(flag.name.clone()),
        };
        if let Some(alias) = flag.alias.as_deref() {
            arg = match (short_char(alias), short_char(&flag.name)) {
                // A second short spelling
                (Some(c), Some(_)) => arg.visible_short_alias(c),
                (Some(c), None) => arg.short(c),
                // A long spelling for a short flag
                (None, Some(_)) => arg.long(alias.to_owned()),
                (None, None) => arg.visible_alias(alias.to_owned()),
            };
        }

        let (value_name, usage) = flag.unquote_usage();
        if !usage.is_empty() {
            arg = arg.help(usage);
        }

        if flag.is_bool_flag() {
            // -v means -v=true, and a value must be attached with '='
            arg = arg
                .action(ArgAction::Set)
                .num_args(0..=1)
                .require_equals(true)
                .default_missing_value("true");
        } else {
            let action = if flag.is_repeatable() {
                ArgAction::Append
            } else {
                ArgAction::Set
            };
            arg = arg.action(action).num_args(1).allow_hyphen_values(true);
        }
        if !value_name.is_empty() {
            arg = arg.value_name(value_name);
        }
        arg
    }

    /// Parse flag definitions from the argument list, which should not include the command
    /// name. Must be called after all flags in the FlagSet are defined and before flags are
    /// accessed by the program.
    ///
    /// Parsing stops at the first argument which is not a flag or a flag value, or after
    /// "--". That argument and everything after it is available from [`FlagSet::args`].
    ///
    /// If `--help` or `-h` was given and that name was not defined, this returns an error for
    /// which [`Error::is_help`] is true, and which prints the help text.
    pub fn parse<I, T>(&mut self, arguments: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        self.parsed = true;

        let mut command = self.command();
        let matches = command.try_get_matches_from_mut(arguments)?;

        self.args = matches
            .get_many::<String>(ARGS_ID)
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default();

        for flag in self.flags.iter_mut() {
            if matches.value_source(&flag.name) != Some(ValueSource::CommandLine) {
                continue;
            }
            // Repeatable flags see every occurrence, in command-line order
            for raw in matches.get_many::<String>(&flag.name).into_iter().flatten() {
                flag.set(raw)
                    .map_err(|err| Error::invalid_value(&mut command, &flag.switch(), raw, err))?;
                tracing::debug!(flag_set = %self.name, name = %flag.name, value = %raw, "set flag");
            }
        }

        Ok(())
    }

    /// Set the value of the named flag, by primary name or alias, as if it had been given on
    /// the command line.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), Error> {
        let idx = *self
            .names
            .get(name)
            .ok_or_else(|| Error::no_such_flag(name))?;
        let mut command = self.command();
        let flag = &mut self.flags[idx];
        flag.set(value)
            .map_err(|err| Error::invalid_value(&mut command, &flag.switch(), value, err))?;
        tracing::debug!(flag_set = %self.name, name = %flag.name, value, "set flag");
        Ok(())
    }

    /// Report whether [`FlagSet::parse`] has been called
    pub fn is_parsed(&self) -> bool {
        self.parsed
    }

    /// The number of flags that have been set. A flag counts once even if it was given by
    /// both names.
    pub fn n_flag(&self) -> usize {
        self.flags.iter().filter(|flag| flag.changed).count()
    }

    /// The number of arguments remaining after flags have been processed
    pub fn n_arg(&self) -> usize {
        self.args.len()
    }

    /// The i'th argument remaining after flags have been processed, or "" if there is no
    /// such argument
    pub fn arg(&self, i: usize) -> &str {
        self.args.get(i).map(String::as_str).unwrap_or_default()
    }

    /// The arguments remaining after flags have been processed
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Find a flag by primary name or alias
    pub fn lookup(&self, name: &str) -> Option<&Flag<'a>> {
        self.names.get(name).map(|idx| &self.flags[*idx])
    }

    fn sorted(&self) -> Vec<&Flag<'a>> {
        let mut flags: Vec<&Flag<'a>> = self.flags.iter().collect();
        flags.sort_by(|a, b| a.name.cmp(&b.name));
        flags
    }

    /// Visit every flag, in order of primary name. Aliases are not visited separately.
    pub fn visit_all(&self, mut f: impl FnMut(&Flag<'a>)) {
        self.sorted().into_iter().for_each(|flag| f(flag));
    }

    /// Visit the flags which have been set, in order of primary name
    pub fn visit(&self, mut f: impl FnMut(&Flag<'a>)) {
        self.sorted()
            .into_iter()
            .filter(|flag| flag.changed)
            .for_each(|flag| f(flag));
    }

    /// Write the usage and default value of every flag, in order of primary name. Aliases are
    /// listed next to their flag's name rather than as separate entries.
    pub fn write_defaults(&self, stream: &mut impl fmt::Write) -> fmt::Result {
        self.sorted()
            .into_iter()
            .try_for_each(|flag| flag.print(stream))
    }

    /// The text [`FlagSet::write_defaults`] would write
    pub fn defaults(&self) -> String {
        self.to_string()
    }

    /// Print the usage and default value of every flag to stderr
    pub fn print_defaults(&self) {
        eprint!("{self}");
    }
}

/// Renders the same text as [`FlagSet::write_defaults`]
impl fmt::Display for FlagSet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_defaults(f)
    }
}

impl fmt::Debug for FlagSet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlagSet")
            .field("name", &self.name)
            .field("parsed", &self.parsed)
            .field("args", &self.args)
            .field("flags", &self.flags)
            .finish()
    }
}

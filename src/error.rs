use clap::{error::ErrorKind, Command, Error as ClapError};
use std::fmt;

/// An error which occurs when parsing flags, or when setting one by name.
//
// Note: This is a thin wrapper around clap::Error so that our public API is independent of clap.
// Unknown flags and missing values come straight from clap. Values that fail to decode are
// turned into clap errors of kind `ValueValidation`, so they print like every other clap error.
#[derive(Debug)]
pub struct Error(ClapError);

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl Error {
    /// Print formatted and colored error text to stderr or stdout as appropriate (as clap does)
    pub fn print(&self) -> Result<(), std::io::Error> {
        self.0.print()
    }

    /// Exit the program, printing an error message to stderr or stdout as appropriate (as clap
    /// does)
    pub fn exit(&self) -> ! {
        self.0.exit()
    }

    /// The exit code this error will exit the program with
    pub fn exit_code(&self) -> i32 {
        self.0.exit_code()
    }

    /// The kind of problem, as classified by clap
    pub fn kind(&self) -> ErrorKind {
        self.0.kind()
    }

    /// True if parsing stopped because help was requested
    pub fn is_help(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        )
    }

    // A flag value that could not be decoded
    pub(crate) fn invalid_value(
        command: &mut Command,
        switch: &str,
        raw: &str,
        err: impl fmt::Display,
    ) -> Self {
        command
            .error(
                ErrorKind::ValueValidation,
                format!("invalid value '{raw}' for '{switch}': {err}"),
            )
            .into()
    }

    // A lookup by name that found nothing
    pub(crate) fn no_such_flag(name: &str) -> Self {
        ClapError::raw(ErrorKind::UnknownArgument, format!("no such flag '{name}'\n")).into()
    }
}

impl From<ClapError> for Error {
    fn from(src: ClapError) -> Error {
        Error(src)
    }
}

//! Typed, aliased command-line flags on top of [`clap`].
//!
//! A [`FlagSet`] binds flags to variables in the program. Every flag has a primary name and an
//! optional alias which sets the same variable. Besides scalars (bools, integers, floats,
//! [`Duration`]s, strings, and anything with a text form), flags may hold a delimited list
//! (`Vec<T>`) or a delimited set (`HashSet<T>`) of elements.
//!
//! clap does all the work of scanning the command line. This crate only decides how flags are
//! named, and how their values are decoded and rendered. The decoding of delimited values lives
//! in [`codec`] and can be used on its own.
//!
//! ```
//! use flagkit::FlagSet;
//! use std::collections::HashSet;
//!
//! let mut verbose = false;
//! let mut ports: HashSet<u32> = HashSet::new();
//!
//! let mut flags = FlagSet::new("serve");
//! flags.bool(&mut verbose, "verbose", "v", false, "log more");
//! flags.uint32_set(&mut ports, "ports", "p", HashSet::from([80]), ",", "ports to listen on");
//! flags.parse(["-v", "--ports", "443,8443,443"]).unwrap();
//! assert_eq!(flags.lookup("ports").unwrap().value(), "443,8443");
//! drop(flags);
//!
//! assert!(verbose);
//! assert_eq!(ports, HashSet::from([443, 8443]));
//! ```
#![deny(unsafe_code)]
#![deny(missing_docs)]

pub mod codec;
mod duration;
mod element;
mod error;
mod flag;
mod flag_set;
mod float;
mod str_to_bool;
mod value;

pub use codec::DecodeError;
pub use duration::{Duration, DurationError};
pub use element::{Element, ElementError};
pub use error::Error;
pub use flag::Flag;
pub use flag_set::FlagSet;
pub use float::Float;
pub use str_to_bool::str_to_bool;
pub use value::{BoxError, FuncValue, ScalarValue, SetValue, SliceValue, TextValue, Value};

/// The kinds of [`Error`], as classified by clap
pub use clap::error::ErrorKind;

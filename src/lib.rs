//! A query-style command line flag table.
//!
//! Flags are parsed once into an [`ArgumentTable`] and then queried by name, without declaring
//! them up front:
//!
//! ```
//! use getarg::ArgumentTable;
//!
//! let args = ArgumentTable::parse_from(["prog", "-verbose", "--port=8333", "-nolisten", "data"]);
//! assert!(args.get_bool_arg("-verbose", false));
//! assert_eq!(args.get_int_arg("-port", 8332), 8333);
//! assert!(!args.get_bool_arg("-listen", true));
//! assert_eq!(args.get_arg("-datadir", "/var/lib/app"), "/var/lib/app");
//! ```
//!
//! `-name` and `--name` are interchangeable, `-noname` negates `-name` unless `-name` itself is
//! given, and lenient accessors never fail: a missing flag gives the default and an unparsable
//! integer gives `0`.
#![forbid(unsafe_code)]

mod error;
mod flag;
pub mod global;
mod options;
mod table;
mod values;

pub use crate::error::{Error, ErrorKind};
pub use crate::options::ParseOptions;
pub use crate::table::ArgumentTable;

pub type Result<T, E = Error> = std::result::Result<T, E>;

//! A process-wide [`ArgumentTable`] for callers that parse once in `main` and query from
//! anywhere.
//!
//! Every [`parse_parameters`] call replaces the whole table; nothing from an earlier parse
//! survives it.
use std::ffi::OsString;
use std::sync::{LazyLock, PoisonError, RwLock};

use crate::{ArgumentTable, ParseOptions};

static TABLE: LazyLock<RwLock<ArgumentTable>> = LazyLock::new(RwLock::default);

/// Replace the process-wide table with one parsed from `iter`.
pub fn parse_parameters<I, T>(iter: I)
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    parse_parameters_with(iter, &ParseOptions::default());
}

pub fn parse_parameters_with<I, T>(iter: I, options: &ParseOptions)
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let table = ArgumentTable::parse_from_with(iter, options);
    // The table is swapped as a whole, so a poisoned lock still guards a consistent value.
    *TABLE.write().unwrap_or_else(PoisonError::into_inner) = table;
}

/// Run `f` against the process-wide table.
pub fn with_table<R>(f: impl FnOnce(&ArgumentTable) -> R) -> R {
    f(&*TABLE.read().unwrap_or_else(PoisonError::into_inner))
}

/// See [`ArgumentTable::get_arg`].
pub fn get_arg(name: &str, default: &str) -> String {
    with_table(|t| t.get_arg(name, default).to_owned())
}

/// See [`ArgumentTable::get_int_arg`].
pub fn get_int_arg(name: &str, default: i64) -> i64 {
    with_table(|t| t.get_int_arg(name, default))
}

/// See [`ArgumentTable::get_bool_arg`].
pub fn get_bool_arg(name: &str, default: bool) -> bool {
    with_table(|t| t.get_bool_arg(name, default))
}

/// See [`ArgumentTable::get_args`].
pub fn get_args(name: &str) -> Vec<String> {
    with_table(|t| t.get_args(name).to_vec())
}

pub fn is_set(name: &str) -> bool {
    with_table(|t| t.is_set(name))
}

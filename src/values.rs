use std::str::FromStr;

use crate::error::DynStdError;
use crate::{ErrorKind, Result};

/// Parse a recorded value into `T` through `FromStr`.
pub(crate) fn coerce<T>(raw: &str) -> Result<T>
where
    T: FromStr<Err: Into<DynStdError>>,
{
    raw.parse::<T>()
        .map_err(|err| ErrorKind::InvalidValue.with_input(raw).with_source(err.into()))
}

/// Base 10 integer coercion. `"NaN"`, `""` and `"11abc"` all fail.
pub(crate) fn coerce_int(raw: &str) -> Result<i64> {
    coerce::<i64>(raw)
}

/// Integer truthiness: any non-zero integer is true, anything unparsable is false.
pub(crate) fn truthy(raw: &str) -> bool {
    coerce_int(raw).is_ok_and(|v| v != 0)
}

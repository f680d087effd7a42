use std::borrow::Cow;
use std::ffi::OsStr;
use std::fmt;

use os_str_bytes::OsStrBytesExt;
use ref_cast::RefCast;

use crate::error::ErrorKind;
use crate::options::ParseOptions;
use crate::Result;

/// The value recorded for a flag given without `=`.
pub(crate) const IMPLICIT_VALUE: &str = "1";

/// A flag name with its leading dashes stripped.
///
/// `-CAL`, `--CAL` and `CAL` all name the same flag.
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, RefCast)]
#[repr(transparent)]
pub(crate) struct FlagName(str);

impl FlagName {
    pub(crate) fn new(s: &str) -> &Self {
        let s = s.strip_prefix("--").or_else(|| s.strip_prefix('-')).unwrap_or(s);
        Self::ref_cast(s)
    }

    /// Wrap a name whose prefix was already stripped.
    pub(crate) fn from_stripped(s: &str) -> &Self {
        Self::ref_cast(s)
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }

    /// The name whose presence negates this flag, `no<name>`.
    pub(crate) fn negated(&self) -> String {
        let mut s = String::with_capacity(2 + self.0.len());
        s.push_str("no");
        s.push_str(&self.0);
        s
    }
}

impl fmt::Debug for FlagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for FlagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("-")?;
        f.write_str(&self.0)
    }
}

/// How to treat tokens that are not valid UTF-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Utf8Policy {
    Lossy,
    Strict,
}

/// A flag token split into its name and value.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct RawFlag<'a> {
    pub name: Cow<'a, str>,
    pub value: Cow<'a, str>,
}

/// Split one raw token. Returns `None` for positional arguments.
///
/// `-name` and `--name` record the implicit value `"1"`, while `-name=` records an empty value.
pub(crate) fn split_flag<'a>(
    token: &'a OsStr,
    opts: &ParseOptions,
    policy: Utf8Policy,
) -> Result<Option<RawFlag<'a>>> {
    let Some(rest) = token
        .strip_prefix("--")
        .or_else(|| token.strip_prefix('-'))
        .or_else(|| token.strip_prefix('/').filter(|_| opts.slash_prefix))
    else {
        return Ok(None);
    };

    let (name, value) = match rest.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (rest, None),
    };

    let decode = |s: &'a OsStr| -> Result<Cow<'a, str>> {
        match policy {
            Utf8Policy::Lossy => Ok(s.to_string_lossy()),
            Utf8Policy::Strict => s
                .to_str()
                .map(Cow::Borrowed)
                .ok_or_else(|| ErrorKind::InvalidUtf8.with_input(token)),
        }
    };

    let name = opts.normalize(decode(name)?);
    let value = match value {
        Some(value) => decode(value)?,
        None => Cow::Borrowed(IMPLICIT_VALUE),
    };
    Ok(Some(RawFlag { name, value }))
}

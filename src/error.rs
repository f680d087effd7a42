use std::ffi::OsString;
use std::fmt;

pub(crate) type DynStdError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error returned by strict construction and strict accessors.
///
/// Lenient accessors never produce it; they fall back to a default instead.
pub struct Error(Box<Inner>);

#[cfg(test)]
struct _AssertErrorIsSendSync
where
    Error: Send + Sync;

struct Inner {
    kind: ErrorKind,

    /// The flag name being queried, without dashes.
    /// For construction errors, this is `None`.
    flag: Option<String>,
    /// The raw input that failed, when there is one.
    input: Option<OsString>,
    /// The underlying source error, if there is any.
    source: Option<DynStdError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A flag token is not valid UTF-8.
    InvalidUtf8,
    /// A recorded value cannot be coerced into the requested type.
    InvalidValue,
    /// The queried flag was not given.
    MissingArgument,
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source.as_ref().map(|err| &**err as _)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let e = &*self.0;
        f.debug_struct("Error")
            .field("kind", &e.kind)
            .field("flag", &e.flag)
            .field("input", &e.input)
            .field("source", &e.source)
            .finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let e = &*self.0;

        let opt_input = |f: &mut fmt::Formatter<'_>| {
            if let Some(input) = &e.input {
                f.write_str(" '")?;
                f.write_str(&input.to_string_lossy())?;
                f.write_str("'")?;
            }
            Ok(())
        };
        let opt_flag = |f: &mut fmt::Formatter<'_>, with_for: bool| {
            if let Some(flag) = &e.flag {
                f.write_str(if with_for { " for '-" } else { " '-" })?;
                f.write_str(flag)?;
                f.write_str("'")?;
            }
            Ok(())
        };

        match e.kind {
            ErrorKind::InvalidUtf8 => {
                f.write_str("invalid UTF-8 in argument")?;
                opt_input(f)
            }
            ErrorKind::InvalidValue => {
                f.write_str("invalid value")?;
                opt_input(f)?;
                opt_flag(f, true)
            }
            ErrorKind::MissingArgument => {
                f.write_str("argument")?;
                opt_flag(f, false)?;
                f.write_str(" is required but not provided")
            }
        }
    }
}

impl Error {
    fn new(kind: ErrorKind, flag: Option<String>, input: Option<OsString>) -> Self {
        Self(Box::new(Inner { kind, flag, input, source: None }))
    }

    pub fn kind(&self) -> ErrorKind {
        self.0.kind
    }

    /// The flag name involved, without leading dashes.
    pub fn flag(&self) -> Option<&str> {
        self.0.flag.as_deref()
    }

    pub(crate) fn with_flag(mut self, flag: &str) -> Self {
        self.0.flag = Some(flag.into());
        self
    }

    pub(crate) fn with_source(mut self, source: DynStdError) -> Self {
        self.0.source = Some(source);
        self
    }
}

impl From<ErrorKind> for Error {
    #[cold]
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind, None, None)
    }
}

impl ErrorKind {
    #[cold]
    pub(crate) fn with_input(self, input: impl Into<OsString>) -> Error {
        Error::new(self, None, Some(input.into()))
    }

    #[cold]
    pub(crate) fn with_flag(self, flag: &str) -> Error {
        Error::new(self, Some(flag.into()), None)
    }
}

use std::borrow::Cow;

/// Settings applied when building an [`ArgumentTable`][crate::ArgumentTable].
///
/// The table keeps the options it was built with, so queries normalize flag names the same way
/// construction did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Also accept `/name` as a flag, in addition to `-name` and `--name`.
    pub slash_prefix: bool,
    /// Compare flag names case-insensitively by lowercasing them.
    pub ignore_case: bool,
}

impl ParseOptions {
    /// The platform convention: Windows accepts `/name` and ignores case, other targets do
    /// neither.
    pub fn native() -> Self {
        Self { slash_prefix: cfg!(windows), ignore_case: cfg!(windows) }
    }

    pub(crate) fn normalize<'a>(&self, name: Cow<'a, str>) -> Cow<'a, str> {
        if self.ignore_case && name.chars().any(char::is_uppercase) {
            Cow::Owned(name.to_lowercase())
        } else {
            name
        }
    }
}

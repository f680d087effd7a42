use std::borrow::Cow;
use std::collections::HashMap;
use std::ffi::OsString;
use std::fmt;
use std::str::FromStr;

use tracing::{debug, trace};

use crate::flag::{FlagName, IMPLICIT_VALUE, Utf8Policy, split_flag};
use crate::options::ParseOptions;
use crate::values::{coerce, coerce_int, truthy};
use crate::{ErrorKind, Result};

/// Flags parsed from a command line, queried by name.
///
/// Every query takes a flag name with its leading dash, like `"-datadir"`; a bare name or a
/// `--` prefix works the same. A flag may be given more than once, in which case the first
/// occurrence answers queries and [`get_args`][Self::get_args] lists all of them.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ArgumentTable {
    index: HashMap<String, usize>,
    entries: Vec<Entry>,
    options: ParseOptions,
}

#[derive(Clone, PartialEq, Eq)]
struct Entry {
    name: String,
    values: Vec<String>,
}

impl fmt::Debug for ArgumentTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter().map(|e| (&e.name, &e.values))).finish()
    }
}

impl ArgumentTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the arguments of the current process with the default options. Use
    /// [`parse_from_with`][Self::parse_from_with] and [`ParseOptions::native`] for the platform
    /// convention.
    pub fn from_env() -> Self {
        Self::parse_from(std::env::args_os())
    }

    /// Parse a full argument list. The first item is the program name and is skipped.
    ///
    /// Tokens not starting with `-` are ignored, and tokens that are not valid UTF-8 are
    /// converted lossily.
    pub fn parse_from<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::parse_from_with(iter, &ParseOptions::default())
    }

    pub fn parse_from_with<I, T>(iter: I, options: &ParseOptions) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let mut iter = iter.into_iter().map(Into::into);
        Self::build(&mut iter, options, Utf8Policy::Lossy)
            .unwrap_or_else(|err| unreachable!("lossy decoding cannot fail: {err}"))
    }

    /// Like [`parse_from`][Self::parse_from], but fails on a flag token that is not valid
    /// UTF-8.
    pub fn try_parse_from<I, T>(iter: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from_with(iter, &ParseOptions::default())
    }

    pub fn try_parse_from_with<I, T>(iter: I, options: &ParseOptions) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let mut iter = iter.into_iter().map(Into::into);
        Self::build(&mut iter, options, Utf8Policy::Strict)
    }

    fn build(
        iter: &mut dyn Iterator<Item = OsString>,
        options: &ParseOptions,
        policy: Utf8Policy,
    ) -> Result<Self> {
        let mut table = Self { options: *options, ..Self::default() };
        // argv[0]
        iter.next();
        for token in iter {
            let Some(flag) = split_flag(&token, options, policy)? else {
                debug!(?token, "ignoring positional argument");
                continue;
            };
            if !table.insert(flag.name.as_ref(), flag.value.into_owned()) {
                debug!(flag = %flag.name, "repeated flag, keeping its first value");
            }
        }
        trace!(table = ?table, "parsed arguments");
        Ok(table)
    }

    /// Record a value under an already normalized key. Returns whether the flag is new.
    fn insert(&mut self, key: &str, value: String) -> bool {
        if let Some(&i) = self.index.get(key) {
            self.entries[i].values.push(value);
            return false;
        }
        self.index.insert(key.to_owned(), self.entries.len());
        self.entries.push(Entry { name: key.to_owned(), values: vec![value] });
        true
    }

    fn key<'n>(&self, name: &'n str) -> Cow<'n, str> {
        self.options.normalize(Cow::Borrowed(FlagName::new(name).as_str()))
    }

    fn first_by_key(&self, key: &str) -> Option<&str> {
        let &i = self.index.get(key)?;
        self.entries[i].values.first().map(String::as_str)
    }

    fn first(&self, name: &str) -> Option<&str> {
        self.first_by_key(&self.key(name))
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Number of distinct flag names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flag names without dashes, in order of first appearance.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Whether the flag itself was given. Its negation does not count.
    pub fn is_set(&self, name: &str) -> bool {
        self.index.contains_key(self.key(name).as_ref())
    }

    /// The value of a flag, or `default` if it was not given.
    ///
    /// A flag given without `=` has the value `"1"`; `-name=` has the empty value.
    pub fn get_arg<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.first(name).unwrap_or(default)
    }

    /// The value of a flag as a base 10 integer, or `default` if it was not given.
    ///
    /// A value that is not an integer gives `0`, not `default`.
    pub fn get_int_arg(&self, name: &str, default: i64) -> i64 {
        let Some(raw) = self.first(name) else {
            return default;
        };
        coerce_int(raw).unwrap_or_else(|err| {
            debug!(flag = name, %err, "non-integer value, using 0");
            0
        })
    }

    /// The boolean value of a flag.
    ///
    /// `-name` and `-name=1` are true, any other value of `-name` is false. Without `-name`,
    /// `-noname` inverts: `-noname` is false and `-noname=0` is true. The flag itself always
    /// takes precedence over its negation, wherever each appears.
    pub fn get_bool_arg(&self, name: &str, default: bool) -> bool {
        let key = self.key(name);
        if let Some(value) = self.first_by_key(&key) {
            return value == IMPLICIT_VALUE;
        }
        let negated = FlagName::from_stripped(&key).negated();
        match self.first_by_key(&negated) {
            Some("1") => false,
            Some("0") => true,
            Some(other) => !truthy(other),
            None => default,
        }
    }

    /// Every value given for a flag, in order of appearance.
    pub fn get_args(&self, name: &str) -> &[String] {
        match self.index.get(self.key(name).as_ref()) {
            Some(&i) => &self.entries[i].values,
            None => &[],
        }
    }

    /// The value of a flag, failing if it was not given.
    pub fn try_get_arg(&self, name: &str) -> Result<&str> {
        let key = self.key(name);
        self.first_by_key(&key).ok_or_else(|| ErrorKind::MissingArgument.with_flag(&key))
    }

    /// The value of a flag as a base 10 integer, failing if it was not given or is not an
    /// integer.
    pub fn try_get_int_arg(&self, name: &str) -> Result<i64> {
        self.try_get_parsed(name)
    }

    /// The value of a flag parsed through [`FromStr`].
    pub fn try_get_parsed<T>(&self, name: &str) -> Result<T>
    where
        T: FromStr<Err: Into<Box<dyn std::error::Error + Send + Sync + 'static>>>,
    {
        let key = self.key(name);
        let raw =
            self.first_by_key(&key).ok_or_else(|| ErrorKind::MissingArgument.with_flag(&key))?;
        coerce(raw).map_err(|err| err.with_flag(&key))
    }
}

#[cfg(test)]
mod tests {
    use expect_test::expect;

    use super::*;

    #[test]
    fn debug_lists_flags_in_order() {
        let table = ArgumentTable::parse_from(["prog", "-b=2", "file", "--a", "-b=3", "-c="]);
        expect![[r#"{"b": ["2", "3"], "a": ["1"], "c": [""]}"#]].assert_eq(&format!("{table:?}"));
        assert_eq!(table.names().collect::<Vec<_>>(), ["b", "a", "c"]);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn empty() {
        let table = ArgumentTable::parse_from(None::<&str>);
        assert!(table.is_empty());
        assert_eq!(table, ArgumentTable::new());

        let table = ArgumentTable::parse_from(["prog"]);
        assert!(table.is_empty());
    }

    #[test]
    fn multiple_values() {
        let table = ArgumentTable::parse_from(["prog", "-connect=a", "--connect=b", "-connect"]);
        assert_eq!(table.get_args("-connect"), ["a", "b", "1"]);
        assert_eq!(table.get_arg("-connect", ""), "a");
        assert!(table.get_args("-addnode").is_empty());
    }

    #[test]
    fn is_set() {
        let table = ArgumentTable::parse_from(["prog", "-noCAL", "-bar=0"]);
        assert!(!table.is_set("-CAL"));
        assert!(table.is_set("-noCAL"));
        assert!(table.is_set("--bar"));
        assert!(table.is_set("bar"));
    }

    #[test]
    fn queries_leave_the_table_unchanged() {
        let table = ArgumentTable::parse_from(["prog", "-noCAL", "-bar=x", "-bar=y"]);
        let parsed = table.clone();

        assert!(!table.get_bool_arg("-CAL", true));
        assert!(table.get_bool_arg("-missing", true));
        assert_eq!(table.get_arg("-bar", ""), "x");
        assert_eq!(table.get_int_arg("-bar", 5), 0);
        assert!(table.try_get_arg("-CAL").is_err());
        assert!(!table.is_set("-CAL"));

        assert_eq!(table, parsed);
        assert!(!table.get_bool_arg("-CAL", true));
    }

    #[test]
    fn from_env_is_case_sensitive() {
        let table = ArgumentTable::from_env();
        assert_eq!(table.options(), &ParseOptions::default());
    }

    #[test]
    fn strict_accessors() {
        let table = ArgumentTable::parse_from(["prog", "-port=8333", "-CAL=NaN", "-rate=0.5"]);
        assert_eq!(table.try_get_arg("-port").unwrap(), "8333");
        assert_eq!(table.try_get_int_arg("--port").unwrap(), 8333);
        assert_eq!(table.try_get_parsed::<u16>("-port").unwrap(), 8333);
        assert!((table.try_get_parsed::<f64>("-rate").unwrap() - 0.5).abs() < f64::EPSILON);

        let err = table.try_get_int_arg("-CAL").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
        assert_eq!(err.flag(), Some("CAL"));
        expect!["invalid value 'NaN' for '-CAL'"].assert_eq(&err.to_string());

        let err = table.try_get_arg("-datadir").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingArgument);
        expect!["argument '-datadir' is required but not provided"].assert_eq(&err.to_string());
    }

    #[test]
    fn negation_with_other_values() {
        let table = ArgumentTable::parse_from(["prog", "-noA=2", "-noB=", "-noC=x"]);
        assert!(!table.get_bool_arg("-A", true));
        assert!(table.get_bool_arg("-B", false));
        assert!(table.get_bool_arg("-C", false));
    }

    #[test]
    fn ignore_case() {
        let options = ParseOptions { slash_prefix: true, ignore_case: true };
        let table = ArgumentTable::parse_from_with(["prog", "/DataDir=x", "-NOLISTEN"], &options);
        assert_eq!(table.options(), &options);
        assert_eq!(table.get_arg("-datadir", ""), "x");
        assert_eq!(table.get_arg("-DATADIR", ""), "x");
        assert!(!table.get_bool_arg("-Listen", true));
    }

    #[test]
    fn slash_is_positional_by_default() {
        let table = ArgumentTable::parse_from(["prog", "/CAL"]);
        assert!(table.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_tokens() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let args = ["prog", "-a"].map(OsString::from).into_iter().chain([
            OsStr::from_bytes(b"-n\xFF=1").to_owned(),
            OsStr::from_bytes(b"pos\xFF").to_owned(),
        ]);
        let args = args.collect::<Vec<_>>();

        let err = ArgumentTable::try_parse_from(args.clone()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidUtf8);

        let table = ArgumentTable::parse_from(args);
        assert!(table.get_bool_arg("-n\u{FFFD}", false));
        assert_eq!(table.len(), 2);
    }
}

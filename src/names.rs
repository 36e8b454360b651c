use std::ops::Deref;

/// One or more method names handed to a registration call.
///
/// Built from a single name or from any list of names, so both
/// `add("read", ..)` and `add(["read", "write"], ..)` work.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MethodNames(Vec<String>);

impl MethodNames {
    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl Deref for MethodNames {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl IntoIterator for MethodNames {
    type IntoIter = <Vec<String> as IntoIterator>::IntoIter;
    type Item = String;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<S> FromIterator<S> for MethodNames
where
    S: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(S::into).collect())
    }
}

impl From<&str> for MethodNames {
    fn from(name: &str) -> Self {
        Self(vec![name.to_owned()])
    }
}

impl From<String> for MethodNames {
    fn from(name: String) -> Self {
        Self(vec![name])
    }
}

impl<S: Into<String>> From<Vec<S>> for MethodNames {
    fn from(names: Vec<S>) -> Self {
        names.into_iter().collect()
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for MethodNames {
    fn from(names: [S; N]) -> Self {
        names.into_iter().collect()
    }
}

impl From<&[&str]> for MethodNames {
    fn from(names: &[&str]) -> Self {
        names.iter().copied().collect()
    }
}

/// Substitutes `name` into a printf-style `format`.
///
/// The first `%s` receives the name and `%%` is a literal `%`. These are the
/// only directives: `%d`, `%j` and the other numeric or object conversions
/// are kept as written and never consume the name, since a method name is
/// always a string. A format without a `%s` gets the name appended after a
/// space.
///
/// ```
/// use thunkwrap::format_method_name;
///
/// assert_eq!(format_method_name("%sSync", "read"), "readSync");
/// assert_eq!(format_method_name("try_%s", "read"), "try_read");
/// assert_eq!(format_method_name("sync", "read"), "sync read");
/// assert_eq!(format_method_name("%d_%s", "read"), "%d_read");
/// ```
pub fn format_method_name(format: &str, name: &str) -> String {
    let mut out = String::with_capacity(format.len() + name.len());
    let mut substituted = false;
    let mut chars = format.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('s') if !substituted => {
                chars.next();
                out.push_str(name);
                substituted = true;
            }
            Some('%') => {
                chars.next();
                out.push('%');
            }
            _ => out.push('%'),
        }
    }
    if !substituted {
        out.push(' ');
        out.push_str(name);
    }
    out
}

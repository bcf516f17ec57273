use crate::error::PipeError;

/// A positional argument for a command template.
///
/// The distinction between the two variants is what makes templating safe:
/// ordinary data is always [`Value`], which gets quoted so the shell hands it
/// to the command as a single argument regardless of embedded whitespace or
/// metacharacters. [`Raw`] is the one deliberate trapdoor — the caller
/// asserts the string is already shell syntax (e.g. an inner pipeline) and it
/// is inserted verbatim.
///
/// [`Value`]: Arg::Value
/// [`Raw`]: Arg::Raw
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Arg {
    /// A data value; quoted before insertion into the command line.
    Value(String),
    /// A pre-formatted fragment; inserted into the command line as-is.
    Raw(String),
}

impl Arg {
    /// Creates a passthrough argument that will not be quoted.
    pub fn raw(s: impl Into<String>) -> Arg {
        Arg::Raw(s.into())
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Arg {
        Arg::Value(s.to_owned())
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Arg {
        Arg::Value(s)
    }
}

impl From<&String> for Arg {
    fn from(s: &String) -> Arg {
        Arg::Value(s.clone())
    }
}

/// Quote `s` for the POSIX shell.
///
/// The result is left bare when every character is obviously safe, and
/// single-quoted otherwise, with embedded single quotes rendered as `'\''`.
/// A shell splitting the result back into words produces exactly the
/// original bytes as one token.
pub fn quote(s: &str) -> String {
    fn nice_char(c: char) -> bool {
        match c {
            '-' | '_' | '.' | ',' | '/' => true,
            c if c.is_ascii_alphanumeric() => true,
            _ => false,
        }
    }
    if !s.is_empty() && s.chars().all(nice_char) {
        s.to_owned()
    } else {
        format!("'{}'", s.replace('\'', r#"'\''"#))
    }
}

/// Format a command template, substituting `{}` placeholders with `args`.
///
/// Each occurrence of `{}` is replaced by the corresponding argument, in
/// order. [`Arg::Value`] arguments are quoted with [`quote`]; [`Arg::Raw`]
/// arguments are inserted verbatim.
///
/// # Errors
///
/// Returns [`PipeError::TemplateArity`] when the placeholder count differs
/// from `args.len()`.
///
/// # Example
///
/// ```
/// use cmdpipe::{format_cmd, Arg};
///
/// let cmdline = format_cmd("grep {} | wc -l", &["a b".into()]).unwrap();
/// assert_eq!(cmdline, "grep 'a b' | wc -l");
/// ```
pub fn format_cmd(template: &str, args: &[Arg]) -> Result<String, PipeError> {
    let parts: Vec<&str> = template.split("{}").collect();
    let expected = parts.len() - 1;
    if expected != args.len() {
        return Err(PipeError::TemplateArity {
            template: template.to_owned(),
            expected,
            got: args.len(),
        });
    }
    let mut out = String::with_capacity(template.len());
    out.push_str(parts[0]);
    for (part, arg) in parts[1..].iter().zip(args) {
        match arg {
            Arg::Value(v) => out.push_str(&quote(v)),
            Arg::Raw(r) => out.push_str(r),
        }
        out.push_str(part);
    }
    Ok(out)
}

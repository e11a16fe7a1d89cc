use std::fmt;

#[cfg(not(test))]
use proc_macro::{Delimiter, TokenStream, TokenTree};
#[cfg(test)]
use proc_macro2::{Delimiter, TokenStream, TokenTree};

use crate::ast;

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug)]
pub(crate) struct Error {
    msg: String,
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.msg, f)
    }
}

macro_rules! format_err {
    ($($tt:tt)*) => {
        Error { msg: format!($($tt)*) }
    };
}

macro_rules! bail {
    ($($tt:tt)*) => {
        return Err(format_err!($($tt)*))
    };
}

pub(crate) fn opt_id(ts: TokenStream) -> Result<ast::Identifier> {
    let s = single_string(ts)?;
    identifier(s.trim())
}

pub(crate) fn opt_ids(ts: TokenStream) -> Result<Vec<ast::Identifier>> {
    let s = single_string(ts)?;
    s.split(',').map(|it| identifier(it.trim())).collect()
}

fn identifier(s: &str) -> Result<ast::Identifier> {
    if let Some(word) = s.strip_prefix("--") {
        if word.is_empty() {
            bail!("`{s}` is missing its name")
        }
        if word.contains('=') {
            bail!("`{s}` must not contain an equals character ('=')")
        }
        return Ok(ast::Identifier::Long(word.to_string()));
    }
    let rest = match s.strip_prefix('-') {
        Some(it) => it,
        None => bail!("`{s}` must start with a dash character ('-')"),
    };
    let mut chars = rest.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(ast::Identifier::Short(c)),
        _ => bail!("`{s}` preceded with just one dash must be exactly one character"),
    }
}

fn single_string(ts: TokenStream) -> Result<String> {
    let mut tokens = ts.into_iter().collect::<Vec<_>>();
    // Literals forwarded by `macro_rules!` arrive wrapped in an invisible group.
    loop {
        let inner = match tokens.as_slice() {
            [TokenTree::Group(g)] if g.delimiter() == Delimiter::None => g.stream(),
            _ => break,
        };
        tokens = inner.into_iter().collect();
    }
    match tokens.as_slice() {
        [TokenTree::Literal(lit)] => {
            str_lit_value(&lit.to_string()).ok_or_else(|| format_err!("expected a string literal"))
        }
        [_] | [] => bail!("expected a string literal"),
        _ => bail!("expected a single string literal"),
    }
}

/// Parses a string literal token into its value.
///
/// Really needs support in the proc_macro library:
/// <https://internals.rust-lang.org/t/getting-value-out-of-proc-macro-literal/14140>
fn str_lit_value(lit: &str) -> Option<String> {
    if let Some(raw) = lit.strip_prefix('r') {
        let body = raw.trim_start_matches('#');
        let hashes = raw.len() - body.len();
        let body = body.strip_prefix('"')?.strip_suffix(&"#".repeat(hashes))?.strip_suffix('"')?;
        return Some(body.to_string());
    }

    let body = lit.strip_prefix('"')?.strip_suffix('"')?;
    let mut res = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            res.push(c);
            continue;
        }
        match chars.next()? {
            'n' => res.push('\n'),
            't' => res.push('\t'),
            'r' => res.push('\r'),
            '0' => res.push('\0'),
            c @ ('\\' | '"' | '\'') => res.push(c),
            _ => return None,
        }
    }
    Some(res)
}

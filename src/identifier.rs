use std::{fmt, str::FromStr};

use crate::{DefinitionError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionStyle {
    /// `-c`
    Short,
    /// `--word`
    Long,
}

impl fmt::Display for OptionStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OptionStyle::Short => "short",
            OptionStyle::Long => "long",
        };
        f.write_str(s)
    }
}

/// A single name an option can be spelled with on the command line.
///
/// Short and long identifiers live in separate namespaces: `-h` and `--h`
/// never compare equal.
///
/// `Display` renders the identifier with its dashes (`-h`, `--help`), the
/// alternate form (`{:#}`) without them (`h`, `help`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OptionIdentifier {
    repr: Repr,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Repr {
    Short(char),
    Long(Box<str>),
}

impl OptionIdentifier {
    pub fn short(c: char) -> OptionIdentifier {
        OptionIdentifier { repr: Repr::Short(c) }
    }

    pub fn long(word: impl Into<String>) -> Result<OptionIdentifier> {
        let word = word.into();
        if word.is_empty() {
            return Err(DefinitionError::EmptyLongIdentifier);
        }
        if word.contains('=') {
            return Err(DefinitionError::EqualsInLongIdentifier(word));
        }
        Ok(OptionIdentifier::long_unchecked(&word))
    }

    /// The caller guarantees a non-empty word without `=`.
    pub(crate) fn long_unchecked(word: &str) -> OptionIdentifier {
        debug_assert!(!word.is_empty() && !word.contains('='));
        OptionIdentifier { repr: Repr::Long(word.into()) }
    }

    /// Parses a comma separated list of identifier literals, e.g. `"-h, --help"`.
    pub fn parse_list(s: &str) -> Result<Vec<OptionIdentifier>> {
        s.split(',').map(|it| it.trim().parse()).collect()
    }

    pub fn style(&self) -> OptionStyle {
        match self.repr {
            Repr::Short(_) => OptionStyle::Short,
            Repr::Long(_) => OptionStyle::Long,
        }
    }

    pub fn is_short(&self) -> bool {
        self.style() == OptionStyle::Short
    }

    pub fn is_long(&self) -> bool {
        self.style() == OptionStyle::Long
    }

    pub fn char(&self) -> Option<char> {
        match self.repr {
            Repr::Short(c) => Some(c),
            Repr::Long(_) => None,
        }
    }

    pub fn word(&self) -> Option<&str> {
        match &self.repr {
            Repr::Short(_) => None,
            Repr::Long(word) => Some(word),
        }
    }
}

impl fmt::Display for OptionIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let with_dashes = !f.alternate();
        match &self.repr {
            Repr::Short(c) => {
                if with_dashes {
                    f.write_str("-")?;
                }
                write!(f, "{c}")
            }
            Repr::Long(word) => {
                if with_dashes {
                    f.write_str("--")?;
                }
                f.write_str(word)
            }
        }
    }
}

impl FromStr for OptionIdentifier {
    type Err = DefinitionError;

    fn from_str(s: &str) -> Result<OptionIdentifier> {
        if let Some(word) = s.strip_prefix("--") {
            return OptionIdentifier::long(word);
        }
        let rest = s.strip_prefix('-').ok_or_else(|| DefinitionError::MissingDash(s.to_string()))?;
        let mut chars = rest.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(OptionIdentifier::short(c)),
            _ => Err(DefinitionError::ShortIdentifierLength(s.to_string())),
        }
    }
}

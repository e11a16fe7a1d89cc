//! Constructors the `opt_id!`/`opt_ids!` expansions call into. The literals
//! are checked when the macro expands, so these never fail.

use crate::OptionIdentifier;

pub fn short(c: char) -> OptionIdentifier {
    OptionIdentifier::short(c)
}

pub fn long(word: &'static str) -> OptionIdentifier {
    OptionIdentifier::long_unchecked(word)
}

mod ast;
mod emit;
mod parse;

/// A single option identifier, checked at compile time.
///
/// `opt_id!("--help")` is `OptionIdentifier::long("help")` without the
/// `Result`.
#[proc_macro]
pub fn opt_id(_ts: proc_macro::TokenStream) -> proc_macro::TokenStream {
    #[cfg(not(test))]
    {
        let text = match parse::opt_id(_ts) {
            Ok(id) => emit::opt_id(&id),
            Err(err) => emit::compile_error(&err),
        };
        text.parse().unwrap()
    }
    #[cfg(test)]
    unimplemented!()
}

/// An array of option identifiers from a comma separated list,
/// e.g. `opt_ids!("-h, --help")`.
#[proc_macro]
pub fn opt_ids(_ts: proc_macro::TokenStream) -> proc_macro::TokenStream {
    #[cfg(not(test))]
    {
        let text = match parse::opt_ids(_ts) {
            Ok(ids) => emit::opt_ids(&ids),
            Err(err) => emit::compile_error(&err),
        };
        text.parse().unwrap()
    }
    #[cfg(test)]
    unimplemented!()
}

#[cfg(test)]
pub fn compile(macro_name: &str, src: &str) -> String {
    use proc_macro2::TokenStream;

    let ts = src.parse::<TokenStream>().unwrap();
    let res = match macro_name {
        "opt_id" => parse::opt_id(ts).map(|id| emit::opt_id(&id)),
        "opt_ids" => parse::opt_ids(ts).map(|ids| emit::opt_ids(&ids)),
        _ => panic!("unknown macro: {macro_name}"),
    };
    res.unwrap_or_else(|err| emit::compile_error(&err))
}

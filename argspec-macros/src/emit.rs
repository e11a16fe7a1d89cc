use std::fmt::Write;

use crate::{ast, parse::Error};

macro_rules! w {
    ($($tt:tt)*) => {
        drop(write!($($tt)*))
    };
}

pub(crate) fn opt_id(id: &ast::Identifier) -> String {
    let mut buf = String::new();
    emit_identifier(&mut buf, id);
    buf
}

pub(crate) fn opt_ids(ids: &[ast::Identifier]) -> String {
    let mut buf = String::new();
    w!(buf, "[");
    for (i, id) in ids.iter().enumerate() {
        if i > 0 {
            w!(buf, ", ");
        }
        emit_identifier(&mut buf, id);
    }
    w!(buf, "]");
    buf
}

pub(crate) fn compile_error(err: &Error) -> String {
    format!("compile_error!({:?})", format!("invalid option identifier, {err}"))
}

fn emit_identifier(buf: &mut String, id: &ast::Identifier) {
    match id {
        ast::Identifier::Short(c) => w!(buf, "::argspec::rt::short({c:?})"),
        ast::Identifier::Long(word) => w!(buf, "::argspec::rt::long({word:?})"),
    }
}

#[derive(Debug)]
pub(crate) enum Identifier {
    Short(char),
    Long(String),
}

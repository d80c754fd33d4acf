mod raw;
#[allow(clippy::module_inception)]
mod token;

pub use raw::RawToken;
pub use token::{Token, TYPE};

mod load;
mod parse;

pub use load::{InputFormat, load_records};
pub use parse::{RawRecord, Record, resolve_affiliation};

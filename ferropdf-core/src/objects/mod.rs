//! The value hierarchy: primitive values, names, strings, arrays,
//! dictionaries and their attached streams.

mod array;
mod dictionary;
mod name;
mod primitive;
mod stream;
pub mod string;

pub use array::Array;
pub use dictionary::{Dictionary, ValueCreate};
pub use name::Name;
pub use primitive::{Object, ObjectId};
pub use stream::Stream;
pub use string::{format_date, parse_date, PdfString, StringFormat};

#![crate_type = "lib"]
#![deny(trivial_numeric_casts, unsafe_code, unstable_features)]
#![warn(
    missing_debug_implementations,
    missing_docs,
    unused_qualifications,
    unused_import_braces
)]

//! This is the core library of the data model, containing the concepts
//! every other part of it is written in terms of.
//!
//! - [`header`] comprises the attribute tag, tag masks and value lengths.
//! - [`vr`] is the registry of value representations and their
//!   fixed properties.
//! - [`dictionary`] describes the lookup tables which resolve tags
//!   to a default VR and name, and UIDs to their description.
//! - [`uid`] holds the unique identifier value type.
//! - [`value`] holds date and time parsing and date ranges.
//!
//! [`dictionary`]: ./dictionary/index.html
//! [`header`]: ./header/index.html
//! [`uid`]: ./uid/index.html
//! [`value`]: ./value/index.html
//! [`vr`]: ./vr/index.html

pub mod dictionary;
pub mod header;
pub mod uid;
pub mod value;
pub mod vr;

pub use dictionary::{DataDictionary, DictionaryEntry, UidDictionary};
pub use header::{Header, Length, Tag, TagMask};
pub use uid::{Uid, UidType};
pub use value::{DateKind, DateRange};
pub use vr::VR;

// re-export crates that are part of the public API
pub use chrono;

//! This crate implements standard DICOM dictionaries and constants.
//!
//! ## Run-time dictionaries
//!
//! - [`data_element`]: the DICOM attributes known to the data model,
//!   with their typical value representation and display name.
//! - [`uid`]: well-known unique identifiers
//!   (transfer syntaxes, SOP classes and others)
//!   along with their description.
//!
//! Each dictionary is provided as a singleton
//! behind a unit type for efficiency and ease of use.
//!
//! ## Constants
//!
//! - [`tags`], which map an attribute alias to a DICOM tag
//! - [`uids`], for various normative DICOM unique identifiers
pub mod data_element;
pub mod tags;
pub mod uid;
pub mod uids;

pub use data_element::{StandardDataDictionary, StandardDataDictionaryRegistry};
pub use uid::{StandardUidDictionary, StandardUidRegistry};

//! Human readable dump of data sets.
//!
//! Each element is printed on one line:
//! its tag, VR, value (in a column 40 characters wide minus the indentation),
//! byte length and attribute name.
//! Sequence items are indented with `  > `.
//!
//! ```
//! # use dcm_object::{Dataset, DumpOptions};
//! # use dcm_dictionary_std::tags;
//! # fn main() -> Result<(), dcm_object::Error> {
//! let mut dataset = Dataset::default();
//! dataset.add_element_with_value(tags::MODALITY, "MR")?;
//! let text = dataset.dump(DumpOptions::default());
//! assert!(text.starts_with("(0008,0060) CS [MR]"));
//! # Ok(())
//! # }
//! ```

use crate::element::{Element, ElementFamily};
use dcm_core::{DataDictionary, Tag, UidDictionary, UidType, VR};
use dcm_dictionary_std::{StandardDataDictionary, StandardUidDictionary};

/// Width of the value column at the top level.
const VALUE_WIDTH: usize = 40;

/// Maximum line length when lines are restricted.
const MAX_LINE_LENGTH: usize = 79;

/// Options for dumping a data set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub struct DumpOptions {
    /// cut values wider than the value column
    pub shorten_long_values: bool,
    /// cut lines at 79 characters
    pub restrict_80_characters_per_line: bool,
    /// also print group length elements
    pub keep_group_length_elements: bool,
}

impl Default for DumpOptions {
    fn default() -> Self {
        DumpOptions {
            shorten_long_values: true,
            restrict_80_characters_per_line: true,
            keep_group_length_elements: false,
        }
    }
}

impl DumpOptions {
    /// The default options: long values and long lines are cut.
    pub fn new() -> Self {
        Default::default()
    }

    /// Options with no flag set, printing everything in full.
    pub fn none() -> Self {
        DumpOptions {
            shorten_long_values: false,
            restrict_80_characters_per_line: false,
            keep_group_length_elements: false,
        }
    }

    /// Set whether to cut values wider than the value column.
    pub fn shorten_long_values(&mut self, shorten: bool) -> &mut Self {
        self.shorten_long_values = shorten;
        self
    }

    /// Set whether to cut lines at 79 characters.
    pub fn restrict_80_characters_per_line(&mut self, restrict: bool) -> &mut Self {
        self.restrict_80_characters_per_line = restrict;
        self
    }

    /// Set whether to print group length elements.
    pub fn keep_group_length_elements(&mut self, keep: bool) -> &mut Self {
        self.keep_group_length_elements = keep;
        self
    }
}

static DICTIONARY: StandardDataDictionary = StandardDataDictionary;

/// The attribute name of a tag.
pub(crate) fn tag_name(tag: Tag) -> &'static str {
    DICTIONARY.name_of(tag)
}

/// The first `max` characters of a string.
fn cut_str(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}

fn shorten(value: String, width: usize, suffix: &str) -> String {
    if value.chars().count() <= width {
        return value;
    }
    let keep = width.saturating_sub(suffix.len());
    let mut out = cut_str(&value, keep).to_string();
    out.push_str(suffix);
    out
}

/// The value column of an element.
fn value_column(element: &Element, width: usize, options: DumpOptions) -> String {
    if element.length() == 0 {
        return "(no value available)".to_string();
    }
    let text = element
        .value_string()
        .unwrap_or_else(|e| format!("<{}>", e));
    let shorten_long = options.shorten_long_values;

    if !element.vr().is_string() {
        return if shorten_long {
            shorten(text, width, "...")
        } else {
            text
        };
    }

    if element.vr() == VR::UI {
        let uid = StandardUidDictionary.lookup(&text);
        let value = if uid.uid_type() == UidType::Unknown {
            format!("[{}]", uid.uid())
        } else {
            format!("={}", uid.name())
        };
        return if shorten_long {
            shorten(value, width, "")
        } else {
            value
        };
    }

    let value = format!("[{}]", text);
    if shorten_long {
        shorten(value, width, "...]")
    } else {
        value
    }
}

/// Append one line describing an element.
pub(crate) fn dump_element(
    element: &Element,
    out: &mut String,
    prefix: &str,
    options: DumpOptions,
) {
    let width = VALUE_WIDTH.saturating_sub(prefix.chars().count());
    let value = value_column(element, width, options);
    let mut line = format!(
        "{}{} {} {:<width$} # {:>4} {}",
        prefix,
        element.tag(),
        element.vr(),
        value,
        element.length(),
        tag_name(element.tag()),
        width = width
    );
    if options.restrict_80_characters_per_line {
        let len = cut_str(&line, MAX_LINE_LENGTH).len();
        line.truncate(len);
    }
    out.push_str(&line);
}

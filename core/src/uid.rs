//! Unique identifiers, as known to a UID dictionary or freshly generated.

use std::cmp::Ordering;
use std::fmt;

/// The kind of entity identified by a UID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UidType {
    /// Transfer Syntax
    TransferSyntax,
    /// SOP Class
    SopClass,
    /// Meta SOP Class
    MetaSopClass,
    /// SOP Instance
    SopInstance,
    /// Application Context Name
    ApplicationContextName,
    /// Coding Scheme
    CodingScheme,
    /// Frame of Reference
    FrameOfReference,
    /// LDAP OID
    Ldap,
    /// Not known
    Unknown,
}

/// A unique identifier along with its description.
///
/// Two UIDs are equal when their identifier strings are equal,
/// regardless of description or type.
#[derive(Debug, Clone, Eq)]
pub struct Uid {
    uid: String,
    name: String,
    uid_type: UidType,
}

impl Uid {
    /// Create a described UID.
    pub fn new(uid: impl Into<String>, name: impl Into<String>, uid_type: UidType) -> Self {
        Uid {
            uid: uid.into(),
            name: name.into(),
            uid_type,
        }
    }

    /// A UID of unknown type, described by its own value.
    pub fn unknown(uid: impl Into<String>) -> Self {
        let uid = uid.into();
        Uid {
            name: uid.clone(),
            uid,
            uid_type: UidType::Unknown,
        }
    }

    /// The identifier.
    pub fn uid(&self) -> &str {
        &self.uid
    }

    /// The description of the identified entity.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The kind of identified entity.
    pub fn uid_type(&self) -> UidType {
        self.uid_type
    }

    /// Whether the identifier is made of digits and dots only,
    /// with no empty component.
    pub fn is_valid(&self) -> bool {
        is_valid_uid(&self.uid)
    }

    /// Compare two UIDs component by component as numbers,
    /// so that `1.2.10` sorts after `1.2.9`.
    pub fn compare_numeric(&self, other: &Uid) -> Ordering {
        compare_numeric(&self.uid, &other.uid)
    }
}

impl PartialEq for Uid {
    fn eq(&self, other: &Self) -> bool {
        self.uid == other.uid
    }
}

impl std::hash::Hash for Uid {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.uid.hash(state)
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.uid)
    }
}

impl AsRef<str> for Uid {
    fn as_ref(&self) -> &str {
        &self.uid
    }
}

/// Whether the string is a syntactically valid UID.
pub fn is_valid_uid(uid: &str) -> bool {
    !uid.is_empty()
        && uid.len() <= 64
        && uid
            .split('.')
            .all(|c| !c.is_empty() && c.bytes().all(|b| b.is_ascii_digit()))
}

/// Compare two UID strings component by component as numbers.
pub fn compare_numeric(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => {
                let l = l.trim_start_matches('0');
                let r = r.trim_start_matches('0');
                let ord = l.len().cmp(&r.len()).then_with(|| l.cmp(r));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validity() {
        assert!(is_valid_uid("1.2.840.10008.1.2"));
        assert!(!is_valid_uid("1.2..3"));
        assert!(!is_valid_uid("1.2.a"));
        assert!(!is_valid_uid(""));
    }

    #[test]
    fn numeric_ordering() {
        assert_eq!(compare_numeric("1.2.10", "1.2.9"), Ordering::Greater);
        assert_eq!(compare_numeric("1.2.9", "1.2.9.1"), Ordering::Less);
        assert_eq!(compare_numeric("1.2.840", "1.2.840"), Ordering::Equal);
    }

    #[test]
    fn equality_ignores_description() {
        let a = Uid::new("1.2.3", "Something", UidType::SopClass);
        let b = Uid::unknown("1.2.3");
        assert_eq!(a, b);
        assert_eq!(b.name(), "1.2.3");
        assert_eq!(b.uid_type(), UidType::Unknown);
    }
}


//! The fixed table of recognized channel names.

use std::fmt;
use exr::meta::attribute::Text;
use crate::diagnostic::{Diagnostic, Diagnostics};


/// What the samples of a channel represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {

    /// The red color component.
    Red,

    /// The green color component.
    Green,

    /// The blue color component.
    Blue,

    /// The opacity.
    Alpha,

    /// Any non-color quantity, like depth or a mask.
    /// Stored as a grayscale image when split per channel.
    Data,
}

/// Lowercase channel suffixes and their roles.
/// Looked up in order, the first matching entry wins.
/// Full words come before the single letters.
pub const CHANNEL_ROLES: &[(&str, Role)] = &[
    ("red", Role::Red),
    ("green", Role::Green),
    ("blue", Role::Blue),
    ("alpha", Role::Alpha),

    ("zback", Role::Data),
    ("depth", Role::Data),
    ("data", Role::Data),
    ("shadows", Role::Data),
    ("mask", Role::Data),
    ("ar", Role::Data),
    ("ag", Role::Data),
    ("ab", Role::Data),
    ("ry", Role::Data),
    ("gy", Role::Data),
    ("by", Role::Data),
    ("x", Role::Data),
    ("y", Role::Data),

    ("r", Role::Red),
    ("g", Role::Green),
    ("b", Role::Blue),
    ("a", Role::Alpha),

    ("z", Role::Data),
    ("v", Role::Data),
    ("u", Role::Data),
];


/// Find the role of a channel suffix, ignoring ascii case.
/// Returns `None` for names that are not in the table.
pub fn lookup_role(label: &[u8]) -> Option<Role> {
    CHANNEL_ROLES.iter()
        .find(|(suffix, _)| suffix.as_bytes().eq_ignore_ascii_case(label))
        .map(|&(_, role)| role)
}

/// Find the role of a channel suffix.
/// Unknown suffixes are treated as data, and reported once.
pub fn classify_role(label: &Text, diagnostics: &mut impl Diagnostics) -> Role {
    lookup_role(label.as_slice()).unwrap_or_else(|| {
        diagnostics.report(Diagnostic::UnknownChannel { channel: label.clone() });
        Role::Data
    })
}


impl fmt::Display for Role {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Role::Red => "R",
            Role::Green => "G",
            Role::Blue => "B",
            Role::Alpha => "A",
            Role::Data => "DATA",
        })
    }
}

//! Identity types shared with the remote data model.
//!
//! All identities are signed. Negative values are placeholders issued by
//! [`crate::IdAllocator`] for entities the remote system has not persisted
//! yet; the remote side reassigns them on save.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! identity {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Creates an identity from its raw value.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Returns the raw value.
            #[must_use]
            pub const fn as_i64(self) -> i64 {
                self.0
            }

            /// True when this is a placeholder awaiting a permanent identity.
            #[must_use]
            pub const fn is_placeholder(self) -> bool {
                self.0 < 0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, ":{}"), self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }
    };
}

identity!(
    /// Identity of a node.
    NodeId,
    "node"
);
identity!(
    /// Identity of a link.
    LinkId,
    "link"
);
identity!(
    /// Identity of an attribute definition in the catalog.
    AttrId,
    "attr"
);
identity!(
    /// Identity of the relation binding an attribute to one node or link.
    ResourceAttrId,
    "resattr"
);
identity!(
    /// Identity of a project.
    ProjectId,
    "project"
);
identity!(
    /// Identity of a network.
    NetworkId,
    "network"
);
identity!(
    /// Identity of a scenario.
    ScenarioId,
    "scenario"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_detection() {
        assert!(NodeId::new(-1).is_placeholder());
        assert!(!NodeId::new(0).is_placeholder());
        assert!(!LinkId::new(17).is_placeholder());
    }

    #[test]
    fn display_prefix() {
        assert_eq!(format!("{}", NodeId::new(-3)), "node:-3");
        assert_eq!(format!("{}", AttrId::new(42)), "attr:42");
    }

    #[test]
    fn serializes_as_plain_integer() {
        let json = serde_json::to_string(&LinkId::new(-7)).unwrap();
        assert_eq!(json, "-7");
        let back: LinkId = serde_json::from_str("12").unwrap();
        assert_eq!(back, LinkId::new(12));
    }
}

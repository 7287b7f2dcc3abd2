//! Link model: an unordered connection between two distinct switches.

use serde::Serialize;
use std::fmt;

use super::errors::LinkError;
use super::switch::Switch;

/// Connection between two switches.
///
/// Identity is the pair of switch names sorted lexicographically, so
/// `Link::new(a, b)` and `Link::new(b, a)` are the same link. The
/// construction checks run once; later state changes are the network
/// validator's business.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Link {
    first: String,
    second: String,
}

impl Link {
    pub fn new(a: &Switch, b: &Switch) -> Result<Self, LinkError> {
        if a == b {
            return Err(LinkError::SelfLinking);
        }

        if a.on_substation() && b.on_substation() && a.is_on() && b.is_on() {
            return Err(LinkError::SubstationLinking);
        }

        let (first, second) = if a.name() <= b.name() {
            (a.name(), b.name())
        } else {
            (b.name(), a.name())
        };

        Ok(Self {
            first: first.to_string(),
            second: second.to_string(),
        })
    }

    /// Endpoint names in identity order
    pub fn switches(&self) -> (&str, &str) {
        (&self.first, &self.second)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.first == name || self.second == name
    }

    /// The endpoint opposite `name`, if `name` is an endpoint
    pub fn other(&self, name: &str) -> Option<&str> {
        if self.first == name {
            Some(&self.second)
        } else if self.second == name {
            Some(&self.first)
        } else {
            None
        }
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Link({}, {})", self.first, self.second)
    }
}

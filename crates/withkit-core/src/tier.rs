//! Theme layer identification

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which layer of the theme supplied a file.
///
/// The override tier is the child theme; the base tier is the parent theme it
/// falls back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Override,
    Base,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Override => write!(f, "override"),
            Tier::Base => write!(f, "base"),
        }
    }
}

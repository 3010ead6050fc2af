use crate::player::PlayerId;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a city on the board. Ids are dense, in the order cities were added.
///
/// # JSON
/// Cities ids are serialized as a plain unsigned integer.
#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(transparent)]
pub struct CityId(pub usize);

impl fmt::Display for CityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Top-level representation of a connection between two cities.
pub type CityToCity = (CityId, CityId);

/// Orders both ends of a connection, so that A-B and B-A map to the same key.
///
/// # Example
/// ```
/// use rails::city::{unordered, CityId};
///
/// assert_eq!(unordered((CityId(4), CityId(1))), (CityId(1), CityId(4)));
/// assert_eq!(unordered((CityId(1), CityId(4))), (CityId(1), CityId(4)));
/// ```
#[inline]
pub fn unordered((start, end): CityToCity) -> CityToCity {
    if start <= end {
        (start, end)
    } else {
        (end, start)
    }
}

/// A city, on which a single station can be built.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct City {
    id: CityId,
    name: String,
    /// Who built a station here, if anyone. Never changes once set.
    owner: Option<PlayerId>,
}

impl City {
    pub(crate) fn new(id: CityId, name: String) -> Self {
        Self {
            id,
            name,
            owner: None,
        }
    }

    #[inline]
    pub fn id(&self) -> CityId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The player who built a station in this city, if any.
    #[inline]
    pub fn owner(&self) -> Option<PlayerId> {
        self.owner
    }

    #[inline]
    pub fn has_station(&self) -> bool {
        self.owner.is_some()
    }

    pub(crate) fn set_owner(&mut self, player_id: PlayerId) {
        debug_assert!(self.owner.is_none(), "station built twice in {}", self.name);
        self.owner = Some(player_id);
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

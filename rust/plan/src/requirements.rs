// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Client room requirements
//!
//! Field names follow the camelCase JSON sent by the requirements form. Both
//! the long form (`entranceDirection`, `pujaRoom`, ...) and the short form
//! (`mainEntrance`, `puja`, ...) of the preference block are accepted.

use serde::{Deserialize, Serialize};

/// Compass direction on the plot (north is up, y grows southward)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

/// Traditional siting preferences
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct VastuPreferences {
    #[serde(alias = "entranceDirection")]
    pub main_entrance: Option<Direction>,
    #[serde(alias = "masterBedroomPosition")]
    pub master_bedroom: Option<Direction>,
    #[serde(alias = "kitchenPosition")]
    pub kitchen: Option<Direction>,
    /// Include a puja room and score its presence
    #[serde(alias = "pujaRoom")]
    pub puja: bool,
    pub staircase: Option<Direction>,
}

/// What the client wants the plan to contain
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RequirementsSpec {
    pub bedrooms: u32,
    pub bathrooms: u32,
    #[serde(default)]
    pub kitchen_orientation: Option<Direction>,
    #[serde(default, alias = "vastPreferences")]
    pub vastu_preferences: VastuPreferences,
    /// Custom room names, used verbatim
    #[serde(default)]
    pub additional_rooms: Vec<String>,
}

impl RequirementsSpec {
    /// Desired room names in assignment order
    ///
    /// Living room and master bedroom first, then the remaining bedrooms
    /// (numbered from 2), bathrooms (from 1), kitchen, dining room, the puja
    /// room when requested and finally the additional rooms.
    pub fn desired_room_names(&self) -> Vec<String> {
        let mut names = vec!["Living Room".to_string(), "Master Bedroom".to_string()];
        names.extend((2..=self.bedrooms).map(|i| format!("Bedroom {}", i)));
        names.extend((1..=self.bathrooms).map(|i| format!("Bathroom {}", i)));
        names.push("Kitchen".to_string());
        names.push("Dining Room".to_string());
        if self.vastu_preferences.puja {
            names.push("Puja Room".to_string());
        }
        names.extend(self.additional_rooms.iter().cloned());
        names
    }
}

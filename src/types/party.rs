use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

/// A party on the ballot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Party {
    Democrat,
    Republican,
    Green,
    Libertarian,
    Reform,
    Independent,
    Constitution,
}

impl Party {
    pub const ALL: [Party; 7] = [
        Party::Democrat,
        Party::Republican,
        Party::Green,
        Party::Libertarian,
        Party::Reform,
        Party::Independent,
        Party::Constitution,
    ];

    pub fn to_str(self) -> &'static str {
        match self {
            Party::Democrat => "democrat",
            Party::Republican => "republican",
            Party::Green => "green",
            Party::Libertarian => "libertarian",
            Party::Reform => "reform",
            Party::Independent => "independent",
            Party::Constitution => "constitution",
        }
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.to_str()) }
}

/// Vote counts per party.
pub type Votes = BTreeMap<Party, u64>;

/// Republican share of the two-party vote, or `None` without two-party votes.
pub fn two_party_ratio(votes: &Votes) -> Option<f64> {
    let rep = votes.get(&Party::Republican).copied().unwrap_or(0);
    let dem = votes.get(&Party::Democrat).copied().unwrap_or(0);
    if rep + dem == 0 { return None }
    Some(rep as f64 / (rep + dem) as f64)
}

use std::{path::Path, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{error::{Error, Result}, partition::Communities, types::State};

/// A saved community assignment: one list of precinct ids per community.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityFrame {
    pub communities: Vec<Vec<String>>,
}

impl CommunityFrame {
    pub fn to_json(&self) -> Result<String> { Ok(serde_json::to_string_pretty(self)?) }

    pub fn from_json(json: &str) -> Result<Self> { Ok(serde_json::from_str(json)?) }
}

impl Communities {
    /// Export the assignment as precinct ids, each community sorted by precinct index.
    pub fn to_frame(&self) -> CommunityFrame {
        CommunityFrame {
            communities: self.ids()
                .map(|c| self.sorted_members(c).into_iter()
                    .map(|p| self.state().precinct(p).id().to_string())
                    .collect())
                .collect(),
        }
    }

    /// Rebuild communities from a frame. Every precinct must be listed exactly once.
    pub fn from_frame(state: impl Into<Arc<State>>, frame: &CommunityFrame) -> Result<Self> {
        let state: Arc<State> = state.into();
        let mut assignments = vec![0; state.len()];

        for (i, ids) in frame.communities.iter().enumerate() {
            for id in ids {
                let p = state.index_of(id).ok_or_else(|| Error::UnknownPrecinct(id.clone()))?;
                if assignments[p] != 0 { return Err(Error::DuplicatePrecinct(id.clone())) }
                assignments[p] = i + 1;
            }
        }
        if let Some(p) = assignments.iter().position(|&c| c == 0) {
            return Err(Error::MissingPrecinct(state.precinct(p).id().to_string()))
        }

        let mut communities = Communities::new(state, frame.communities.len());
        communities.set_assignments(&assignments);
        Ok(communities)
    }

    /// Write the frame as JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        Ok(std::fs::write(path, self.to_frame().to_json()?)?)
    }

    /// Read a JSON frame written by [`Communities::save`].
    pub fn load(state: impl Into<Arc<State>>, path: impl AsRef<Path>) -> Result<Self> {
        let frame = CommunityFrame::from_json(&std::fs::read_to_string(path)?)?;
        Self::from_frame(state, &frame)
    }
}

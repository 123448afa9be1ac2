use netdata_core::{NetdataClient, Space};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::Resource;
use crate::error::{found, ApiResultExt, ProviderError};
use crate::validation::require_non_empty;

/// `netdata_space`: a space plus the claim token issued when it was created.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpaceState {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub claim_token: String,
}

impl SpaceState {
    fn refreshed(&self, space: Space) -> Self {
        Self {
            id: space.id,
            name: space.name,
            description: space.description,
            claim_token: self.claim_token.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpaceResource {
    client: NetdataClient,
}

impl SpaceResource {
    pub fn new(client: NetdataClient) -> Self {
        Self { client }
    }
}

impl Resource for SpaceResource {
    type State = SpaceState;

    const TYPE_NAME: &'static str = "netdata_space";

    fn validate(&self, plan: &SpaceState) -> Result<(), ProviderError> {
        require_non_empty("name", &plan.name)
    }

    fn create(&self, plan: &SpaceState) -> Result<SpaceState, ProviderError> {
        self.validate(plan)?;
        info!(name = %plan.name, "creating space");
        let space = self
            .client
            .create_space(&plan.name, &plan.description)
            .context(|| format!("Could not create space {:?}", plan.name))?;

        let claim_token = self
            .client
            .space_claim_token(&space.id)
            .context(|| format!("Could not create claim token for space_id: {}", space.id))?;

        Ok(SpaceState {
            id: space.id,
            name: space.name,
            description: space.description,
            claim_token,
        })
    }

    fn read(&self, state: &SpaceState) -> Result<Option<SpaceState>, ProviderError> {
        let space = found(self.client.get_space(&state.id))
            .context(|| format!("Could not read space space_id: {}", state.id))?;
        Ok(space.map(|space| state.refreshed(space)))
    }

    fn update(&self, plan: &SpaceState, state: &SpaceState) -> Result<SpaceState, ProviderError> {
        self.validate(plan)?;
        info!(space_id = %state.id, "updating space");
        self.client
            .update_space(&state.id, &plan.name, &plan.description)
            .context(|| format!("Could not update space space_id: {}", state.id))?;
        let space = self
            .client
            .get_space(&state.id)
            .context(|| format!("Could not read space space_id: {}", state.id))?;
        Ok(state.refreshed(space))
    }

    fn delete(&self, state: &SpaceState) -> Result<(), ProviderError> {
        info!(space_id = %state.id, "deleting space");
        self.client
            .delete_space(&state.id)
            .context(|| format!("Could not delete space space_id: {}", state.id))
    }

    fn import(&self, id: &str) -> Result<SpaceState, ProviderError> {
        if id.is_empty() {
            return Err(ProviderError::InvalidImportId {
                expected: "space_id",
                got: id.to_string(),
            });
        }
        Ok(SpaceState {
            id: id.to_string(),
            ..SpaceState::default()
        })
    }
}

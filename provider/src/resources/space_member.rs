use netdata_core::{NetdataClient, SpaceMember};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::Resource;
use crate::error::{found, split_import_id, ApiResultExt, ProviderError};
use crate::validation::{require_match, EMAIL_PATTERN, ROLE_PATTERN};

/// `netdata_space_member`: a member invited into a space by email.
/// Changing `email` or `space_id` requires a new member; only the role is
/// updated in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpaceMemberState {
    #[serde(default)]
    pub id: String,
    pub space_id: String,
    pub email: String,
    pub role: String,
}

impl SpaceMemberState {
    fn from_member(space_id: &str, member: SpaceMember) -> Self {
        Self {
            id: member.member_id,
            space_id: space_id.to_string(),
            email: member.email,
            role: member.role,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpaceMemberResource {
    client: NetdataClient,
}

impl SpaceMemberResource {
    pub fn new(client: NetdataClient) -> Self {
        Self { client }
    }
}

impl Resource for SpaceMemberResource {
    type State = SpaceMemberState;

    const TYPE_NAME: &'static str = "netdata_space_member";

    fn validate(&self, plan: &SpaceMemberState) -> Result<(), ProviderError> {
        require_match("email", EMAIL_PATTERN, &plan.email)?;
        require_match("role", ROLE_PATTERN, &plan.role)
    }

    fn create(&self, plan: &SpaceMemberState) -> Result<SpaceMemberState, ProviderError> {
        self.validate(plan)?;
        info!(space_id = %plan.space_id, role = %plan.role, "creating space member");
        let member = self
            .client
            .create_space_member(&plan.space_id, &plan.email, &plan.role)
            .context(|| format!("Could not create space member for space_id: {}", plan.space_id))?;
        Ok(SpaceMemberState::from_member(&plan.space_id, member))
    }

    fn read(&self, state: &SpaceMemberState) -> Result<Option<SpaceMemberState>, ProviderError> {
        let member = found(self.client.get_space_member(&state.space_id, &state.id)).context(|| {
            format!(
                "Could not read space member space_id/member_id: {}/{}",
                state.space_id, state.id
            )
        })?;
        Ok(member.map(|member| SpaceMemberState::from_member(&state.space_id, member)))
    }

    fn update(
        &self,
        plan: &SpaceMemberState,
        state: &SpaceMemberState,
    ) -> Result<SpaceMemberState, ProviderError> {
        self.validate(plan)?;
        let context = || {
            format!(
                "Could not update space member space_id/member_id: {}/{}",
                state.space_id, state.id
            )
        };
        info!(space_id = %state.space_id, member_id = %state.id, role = %plan.role, "updating space member");
        self.client
            .update_space_member_role(&state.space_id, &state.id, &plan.role)
            .context(context)?;
        let member = self
            .client
            .get_space_member(&state.space_id, &state.id)
            .context(context)?;
        Ok(SpaceMemberState::from_member(&state.space_id, member))
    }

    fn delete(&self, state: &SpaceMemberState) -> Result<(), ProviderError> {
        info!(space_id = %state.space_id, member_id = %state.id, "deleting space member");
        self.client
            .delete_space_member(&state.space_id, &state.id)
            .context(|| {
                format!(
                    "Could not delete space member space_id/member_id: {}/{}",
                    state.space_id, state.id
                )
            })
    }

    fn import(&self, id: &str) -> Result<SpaceMemberState, ProviderError> {
        let [space_id, id] = split_import_id(id, "space_id,member_id")?;
        Ok(SpaceMemberState {
            id,
            space_id,
            ..SpaceMemberState::default()
        })
    }
}

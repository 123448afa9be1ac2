use netdata_core::NetdataClient;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::Resource;
use crate::error::{found, split_import_id, ApiResultExt, ProviderError};

/// `netdata_room_member`: links a space member to a room. Has no identity
/// of its own; every attribute forces a new link.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomMemberState {
    pub space_id: String,
    pub room_id: String,
    pub space_member_id: String,
}

#[derive(Debug, Clone)]
pub struct RoomMemberResource {
    client: NetdataClient,
}

impl RoomMemberResource {
    pub fn new(client: NetdataClient) -> Self {
        Self { client }
    }

    fn describe(&self, action: &str, state: &RoomMemberState) -> String {
        format!(
            "Could not {action} room member space_id/room_id/space_member_id: {}/{}/{}",
            state.space_id, state.room_id, state.space_member_id
        )
    }
}

impl Resource for RoomMemberResource {
    type State = RoomMemberState;

    const TYPE_NAME: &'static str = "netdata_room_member";

    fn create(&self, plan: &RoomMemberState) -> Result<RoomMemberState, ProviderError> {
        info!(
            space_id = %plan.space_id,
            room_id = %plan.room_id,
            space_member_id = %plan.space_member_id,
            "adding member to room"
        );
        self.client
            .create_room_member(&plan.space_id, &plan.room_id, &plan.space_member_id)
            .context(|| self.describe("create", plan))?;
        Ok(plan.clone())
    }

    fn read(&self, state: &RoomMemberState) -> Result<Option<RoomMemberState>, ProviderError> {
        let member = found(self.client.get_room_member(
            &state.space_id,
            &state.room_id,
            &state.space_member_id,
        ))
        .context(|| self.describe("read", state))?;
        Ok(member.map(|member| RoomMemberState {
            space_member_id: member.space_member_id,
            ..state.clone()
        }))
    }

    /// Nothing is mutable in place; confirms the link still exists.
    fn update(
        &self,
        plan: &RoomMemberState,
        _state: &RoomMemberState,
    ) -> Result<RoomMemberState, ProviderError> {
        self.client
            .get_room_member(&plan.space_id, &plan.room_id, &plan.space_member_id)
            .context(|| self.describe("read", plan))?;
        Ok(plan.clone())
    }

    fn delete(&self, state: &RoomMemberState) -> Result<(), ProviderError> {
        info!(
            space_id = %state.space_id,
            room_id = %state.room_id,
            space_member_id = %state.space_member_id,
            "removing member from room"
        );
        self.client
            .delete_room_member(&state.space_id, &state.room_id, &state.space_member_id)
            .context(|| self.describe("delete", state))
    }

    fn import(&self, id: &str) -> Result<RoomMemberState, ProviderError> {
        let [space_id, room_id, space_member_id] =
            split_import_id(id, "space_id,room_id,space_member_id")?;
        Ok(RoomMemberState {
            space_id,
            room_id,
            space_member_id,
        })
    }
}

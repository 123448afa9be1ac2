use netdata_core::{NetdataClient, Room};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::Resource;
use crate::error::{found, split_import_id, ApiResultExt, ProviderError};

/// `netdata_room`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomState {
    #[serde(default)]
    pub id: String,
    pub space_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl RoomState {
    fn from_room(space_id: &str, room: Room) -> Self {
        Self {
            id: room.id,
            space_id: space_id.to_string(),
            name: room.name,
            description: room.description,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RoomResource {
    client: NetdataClient,
}

impl RoomResource {
    pub fn new(client: NetdataClient) -> Self {
        Self { client }
    }
}

impl Resource for RoomResource {
    type State = RoomState;

    const TYPE_NAME: &'static str = "netdata_room";

    fn create(&self, plan: &RoomState) -> Result<RoomState, ProviderError> {
        info!(space_id = %plan.space_id, name = %plan.name, "creating room");
        let room = self
            .client
            .create_room(&plan.space_id, &plan.name, &plan.description)
            .context(|| format!("Could not create room for space_id: {}", plan.space_id))?;
        Ok(RoomState::from_room(&plan.space_id, room))
    }

    fn read(&self, state: &RoomState) -> Result<Option<RoomState>, ProviderError> {
        let room = found(self.client.get_room(&state.space_id, &state.id)).context(|| {
            format!(
                "Could not read room space_id/room_id: {}/{}",
                state.space_id, state.id
            )
        })?;
        Ok(room.map(|room| RoomState::from_room(&state.space_id, room)))
    }

    fn update(&self, plan: &RoomState, state: &RoomState) -> Result<RoomState, ProviderError> {
        let context = || {
            format!(
                "Could not update room space_id/room_id: {}/{}",
                state.space_id, state.id
            )
        };
        info!(space_id = %state.space_id, room_id = %state.id, "updating room");
        self.client
            .update_room(&state.space_id, &state.id, &plan.name, &plan.description)
            .context(context)?;
        let room = self
            .client
            .get_room(&state.space_id, &state.id)
            .context(context)?;
        Ok(RoomState::from_room(&state.space_id, room))
    }

    fn delete(&self, state: &RoomState) -> Result<(), ProviderError> {
        info!(space_id = %state.space_id, room_id = %state.id, "deleting room");
        self.client
            .delete_room(&state.space_id, &state.id)
            .context(|| {
                format!(
                    "Could not delete room space_id/room_id: {}/{}",
                    state.space_id, state.id
                )
            })
    }

    fn import(&self, id: &str) -> Result<RoomState, ProviderError> {
        let [space_id, id] = split_import_id(id, "space_id,room_id")?;
        Ok(RoomState {
            id,
            space_id,
            ..RoomState::default()
        })
    }
}

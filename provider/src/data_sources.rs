//! Read-only lookups of existing spaces and rooms.

use netdata_core::NetdataClient;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{found, ApiResultExt, ProviderError};
use crate::resources::DataSource;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SpaceLookup {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SpaceData {
    pub id: String,
    pub name: String,
    pub description: String,
    /// A fresh claim token for connecting nodes to the space.
    #[serde(rename = "claimtoken")]
    pub claim_token: String,
}

/// `netdata_space` data source.
#[derive(Debug, Clone)]
pub struct SpaceDataSource {
    client: NetdataClient,
}

impl SpaceDataSource {
    pub fn new(client: NetdataClient) -> Self {
        Self { client }
    }
}

impl DataSource for SpaceDataSource {
    type Config = SpaceLookup;
    type State = SpaceData;

    const TYPE_NAME: &'static str = "netdata_space";

    fn read(&self, config: &SpaceLookup) -> Result<Option<SpaceData>, ProviderError> {
        info!(space_id = %config.id, "reading space");
        let Some(space) = found(self.client.get_space(&config.id))
            .context(|| format!("Could not read space space_id: {}", config.id))?
        else {
            return Ok(None);
        };

        let claim_token = self
            .client
            .space_claim_token(&space.id)
            .context(|| format!("Could not create claim token for space_id: {}", space.id))?;

        Ok(Some(SpaceData {
            id: space.id,
            name: space.name,
            description: space.description,
            claim_token,
        }))
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RoomLookup {
    pub id: String,
    pub space_id: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RoomData {
    pub id: String,
    pub space_id: String,
    pub name: String,
    pub description: String,
}

/// `netdata_room` data source.
#[derive(Debug, Clone)]
pub struct RoomDataSource {
    client: NetdataClient,
}

impl RoomDataSource {
    pub fn new(client: NetdataClient) -> Self {
        Self { client }
    }
}

impl DataSource for RoomDataSource {
    type Config = RoomLookup;
    type State = RoomData;

    const TYPE_NAME: &'static str = "netdata_room";

    fn read(&self, config: &RoomLookup) -> Result<Option<RoomData>, ProviderError> {
        let room = found(self.client.get_room(&config.space_id, &config.id)).context(|| {
            format!(
                "Could not read room space_id/room_id: {}/{}",
                config.space_id, config.id
            )
        })?;
        Ok(room.map(|room| RoomData {
            id: room.id,
            space_id: config.space_id.clone(),
            name: room.name,
            description: room.description,
        }))
    }
}

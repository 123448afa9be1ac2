//! Provider entry point: resolves configuration once and hands the shared
//! client to every resource and data source it builds.

use netdata_core::NetdataClient;
use tracing::info;

use crate::config::{ProviderConfig, ProviderSettings};
use crate::data_sources::{RoomDataSource, SpaceDataSource};
use crate::error::ProviderError;
use crate::resources::{
    DataSource, DiscordChannelResource, DynDataSource, DynResource, NodeRoomMemberResource,
    PagerDutyChannelResource, Resource, RoomMemberResource, RoomResource, SlackChannelResource,
    SpaceMemberResource, SpaceResource,
};

/// Provider type name; every resource type is prefixed with it.
pub const PROVIDER_TYPE_NAME: &str = "netdata";

const RESOURCE_TYPES: [&str; 8] = [
    SpaceResource::TYPE_NAME,
    RoomResource::TYPE_NAME,
    SpaceMemberResource::TYPE_NAME,
    RoomMemberResource::TYPE_NAME,
    NodeRoomMemberResource::TYPE_NAME,
    SlackChannelResource::TYPE_NAME,
    DiscordChannelResource::TYPE_NAME,
    PagerDutyChannelResource::TYPE_NAME,
];

const DATA_SOURCE_TYPES: [&str; 2] = [SpaceDataSource::TYPE_NAME, RoomDataSource::TYPE_NAME];

#[derive(Debug, Clone)]
pub struct NetdataProvider {
    client: NetdataClient,
}

impl NetdataProvider {
    pub fn new(client: NetdataClient) -> Self {
        Self { client }
    }

    /// Resolve `settings` against the environment and build the client.
    pub fn configure(settings: &ProviderSettings) -> Result<Self, ProviderError> {
        let config = ProviderConfig::load(settings)?;
        info!(url = %config.url, "configured Netdata Cloud provider");
        Ok(Self::new(config.client()))
    }

    pub fn client(&self) -> &NetdataClient {
        &self.client
    }

    pub fn resource_types(&self) -> &'static [&'static str] {
        &RESOURCE_TYPES
    }

    pub fn data_source_types(&self) -> &'static [&'static str] {
        &DATA_SOURCE_TYPES
    }

    pub fn resource(&self, type_name: &str) -> Result<Box<dyn DynResource>, ProviderError> {
        let client = self.client.clone();
        let resource: Box<dyn DynResource> = match type_name {
            SpaceResource::TYPE_NAME => Box::new(SpaceResource::new(client)),
            RoomResource::TYPE_NAME => Box::new(RoomResource::new(client)),
            SpaceMemberResource::TYPE_NAME => Box::new(SpaceMemberResource::new(client)),
            RoomMemberResource::TYPE_NAME => Box::new(RoomMemberResource::new(client)),
            NodeRoomMemberResource::TYPE_NAME => Box::new(NodeRoomMemberResource::new(client)),
            SlackChannelResource::TYPE_NAME => Box::new(SlackChannelResource::new(client)),
            DiscordChannelResource::TYPE_NAME => Box::new(DiscordChannelResource::new(client)),
            PagerDutyChannelResource::TYPE_NAME => Box::new(PagerDutyChannelResource::new(client)),
            other => return Err(ProviderError::UnknownResource(other.to_string())),
        };
        Ok(resource)
    }

    pub fn data_source(&self, type_name: &str) -> Result<Box<dyn DynDataSource>, ProviderError> {
        let client = self.client.clone();
        let data_source: Box<dyn DynDataSource> = match type_name {
            SpaceDataSource::TYPE_NAME => Box::new(SpaceDataSource::new(client)),
            RoomDataSource::TYPE_NAME => Box::new(RoomDataSource::new(client)),
            other => return Err(ProviderError::UnknownResource(other.to_string())),
        };
        Ok(data_source)
    }
}

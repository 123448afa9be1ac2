//! Resource adapters.
//!
//! # Design
//! Each adapter translates declarative state into client calls and back.
//! The host decides when to call which operation; adapters only perform
//! it. `read` returning `Ok(None)` asks the host to drop the entity from
//! state. `import` yields a state holding just the identifiers, which the
//! host then refreshes with `read`.
//!
//! [`DynResource`] erases the state type so the provider can dispatch by
//! type name over JSON.

mod channels;
mod node_room_member;
mod room;
mod room_member;
mod space;
mod space_member;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::ProviderError;

pub use channels::{
    ChannelState, ChannelType, DiscordChannel, DiscordFields, PagerDutyChannel, PagerDutyFields,
    SlackChannel, SlackFields,
};
pub use node_room_member::{NodeRoomMemberResource, NodeRoomMemberState, RuleClauseState, RuleState};
pub use room::{RoomResource, RoomState};
pub use room_member::{RoomMemberResource, RoomMemberState};
pub use space::{SpaceResource, SpaceState};
pub use space_member::{SpaceMemberResource, SpaceMemberState};

pub type SlackChannelResource = channels::ChannelResource<SlackChannel>;
pub type DiscordChannelResource = channels::ChannelResource<DiscordChannel>;
pub type PagerDutyChannelResource = channels::ChannelResource<PagerDutyChannel>;

/// Lifecycle of one managed resource type.
pub trait Resource {
    type State: Serialize + DeserializeOwned;

    const TYPE_NAME: &'static str;

    /// Client-side checks on a planned state, run before any request.
    fn validate(&self, _plan: &Self::State) -> Result<(), ProviderError> {
        Ok(())
    }

    fn create(&self, plan: &Self::State) -> Result<Self::State, ProviderError>;

    fn read(&self, state: &Self::State) -> Result<Option<Self::State>, ProviderError>;

    fn update(&self, plan: &Self::State, state: &Self::State) -> Result<Self::State, ProviderError>;

    fn delete(&self, state: &Self::State) -> Result<(), ProviderError>;

    fn import(&self, id: &str) -> Result<Self::State, ProviderError>;
}

/// Read-only lookup of an existing entity.
pub trait DataSource {
    type Config: DeserializeOwned;
    type State: Serialize;

    const TYPE_NAME: &'static str;

    fn read(&self, config: &Self::Config) -> Result<Option<Self::State>, ProviderError>;
}

/// Object-safe view of a [`Resource`] over JSON state.
pub trait DynResource: Send + Sync {
    fn type_name(&self) -> &'static str;
    fn create(&self, plan: Value) -> Result<Value, ProviderError>;
    fn read(&self, state: Value) -> Result<Option<Value>, ProviderError>;
    fn update(&self, plan: Value, state: Value) -> Result<Value, ProviderError>;
    fn delete(&self, state: Value) -> Result<(), ProviderError>;
    fn import(&self, id: &str) -> Result<Value, ProviderError>;
}

impl<R> DynResource for R
where
    R: Resource + Send + Sync,
{
    fn type_name(&self) -> &'static str {
        R::TYPE_NAME
    }

    fn create(&self, plan: Value) -> Result<Value, ProviderError> {
        let plan: R::State = serde_json::from_value(plan)?;
        Ok(serde_json::to_value(Resource::create(self, &plan)?)?)
    }

    fn read(&self, state: Value) -> Result<Option<Value>, ProviderError> {
        let state: R::State = serde_json::from_value(state)?;
        Resource::read(self, &state)?
            .map(serde_json::to_value)
            .transpose()
            .map_err(ProviderError::from)
    }

    fn update(&self, plan: Value, state: Value) -> Result<Value, ProviderError> {
        let plan: R::State = serde_json::from_value(plan)?;
        let state: R::State = serde_json::from_value(state)?;
        Ok(serde_json::to_value(Resource::update(self, &plan, &state)?)?)
    }

    fn delete(&self, state: Value) -> Result<(), ProviderError> {
        let state: R::State = serde_json::from_value(state)?;
        Resource::delete(self, &state)
    }

    fn import(&self, id: &str) -> Result<Value, ProviderError> {
        Ok(serde_json::to_value(Resource::import(self, id)?)?)
    }
}

/// Object-safe view of a [`DataSource`] over JSON.
pub trait DynDataSource: Send + Sync {
    fn type_name(&self) -> &'static str;
    fn read(&self, config: Value) -> Result<Option<Value>, ProviderError>;
}

impl<D> DynDataSource for D
where
    D: DataSource + Send + Sync,
{
    fn type_name(&self) -> &'static str {
        D::TYPE_NAME
    }

    fn read(&self, config: Value) -> Result<Option<Value>, ProviderError> {
        let config: D::Config = serde_json::from_value(config)?;
        DataSource::read(self, &config)?
            .map(serde_json::to_value)
            .transpose()
            .map_err(ProviderError::from)
    }
}

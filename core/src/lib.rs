//! Blocking client for the Netdata Cloud REST API.
//!
//! # Overview
//! Wraps spaces, rooms, space and room members, node room membership, node
//! membership rules, notification channels and invitations behind typed
//! methods on `NetdataClient`. Every call is one authenticated, synchronous
//! HTTP round-trip (or a short fixed sequence of them); nothing is cached.
//!
//! # Design
//! - `NetdataClient` is immutable after construction and cheap to clone;
//!   share it by passing it to whoever needs it.
//! - The network sits behind the `Transport` trait. `UreqTransport` is the
//!   default; tests substitute their own.
//! - Status classification and JSON decoding live in the client, not the
//!   transport, so every transport reports errors the same way.
//! - Required identifiers are checked before any request is built.

mod api;
pub mod client;
pub mod error;
pub mod http;
pub mod types;

#[cfg(test)]
mod testing;

pub use client::{NetdataClient, DEFAULT_BASE_URL};
pub use error::{ApiError, ValidationError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport, DEFAULT_TIMEOUT};
pub use types::{
    ChannelKind, ChannelSecrets, ChannelSettings, ClauseOperator, DiscordChannelParams,
    DiscordChannelType, DiscordSecrets, Invitation, MembershipRuleInput, NodeMembershipClause,
    NodeMembershipRule, NotificationChannel, NotificationIntegration, PagerDutySecrets, Room,
    RoomMember, RoomNode, RoomNodes, RuleAction, SlackSecrets, Space, SpaceMember, ALL_NODES_ROOM,
    NODE_STATE_REACHABLE,
};

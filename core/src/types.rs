//! Wire DTOs for the Netdata Cloud REST API.
//!
//! # Design
//! Every type mirrors a JSON shape of the remote API; field renames carry the
//! wire names so the Rust side can use snake_case. Fields the API sometimes
//! omits default instead of failing the decode. Nothing here is owned by the
//! client: each value is a snapshot of remote state at the time of the call.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

/// Display name of the room every claimed node belongs to.
pub const ALL_NODES_ROOM: &str = "All nodes";

/// Node state that allows adding the node to a room by name.
pub const NODE_STATE_REACHABLE: &str = "reachable";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Space {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Room {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpaceMember {
    #[serde(rename = "memberID")]
    pub member_id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
}

/// Membership link between a room and a space member.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomMember {
    #[serde(rename = "memberID")]
    pub space_member_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomNodes {
    #[serde(default)]
    pub nodes: Vec<RoomNode>,
}

impl RoomNodes {
    /// First node called `name`, optionally restricted to reachable nodes.
    pub fn find_by_name(&self, name: &str, reachable_only: bool) -> Option<&RoomNode> {
        self.nodes
            .iter()
            .find(|node| node.node_name == name && (!reachable_only || node.is_reachable()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomNode {
    #[serde(rename = "nd")]
    pub node_id: String,
    #[serde(rename = "nm")]
    pub node_name: String,
    #[serde(default)]
    pub state: String,
}

impl RoomNode {
    pub fn is_reachable(&self) -> bool {
        self.state == NODE_STATE_REACHABLE
    }
}

/// Whether nodes matched by a rule join or leave the room.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum RuleAction {
    Include,
    Exclude,
}

impl fmt::Display for RuleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleAction::Include => f.write_str("INCLUDE"),
            RuleAction::Exclude => f.write_str("EXCLUDE"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClauseOperator {
    Equals,
    StartsWith,
    EndsWith,
    Contains,
}

/// One host-label comparison. Clauses of a rule are AND-ed server-side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeMembershipClause {
    pub label: String,
    pub operator: ClauseOperator,
    pub value: String,
    #[serde(default)]
    pub negate: bool,
}

/// A stored rule. Rules of a room are OR-ed server-side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeMembershipRule {
    pub id: Uuid,
    pub action: RuleAction,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub clauses: Vec<NodeMembershipClause>,
}

/// Request payload for creating or replacing a membership rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MembershipRuleInput {
    pub action: RuleAction,
    pub description: String,
    pub clauses: Vec<NodeMembershipClause>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationIntegration {
    pub id: String,
    #[serde(default)]
    pub slug: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct NotificationIntegrations {
    #[serde(default)]
    pub integrations: Vec<NotificationIntegration>,
}

/// A notification channel as returned by the API. `secrets` stays opaque
/// until the caller decodes it for the channel's kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationChannel {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub integration: NotificationIntegration,
    #[serde(default)]
    pub alarms: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub rooms: Vec<String>,
    #[serde(default)]
    pub secrets: serde_json::Value,
    #[serde(
        rename = "repeatNotificationMinute",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub repeat_notification_minute: Option<u32>,
}

impl NotificationChannel {
    pub fn decode_secrets(&self, kind: ChannelKind) -> Result<ChannelSecrets, ApiError> {
        ChannelSecrets::from_value(kind, self.secrets.clone())
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Integration type a channel delivers through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    Slack,
    Discord,
    PagerDuty,
}

impl ChannelKind {
    /// Integration slug as listed by the API, lowercase.
    pub fn slug(self) -> &'static str {
        match self {
            ChannelKind::Slack => "slack",
            ChannelKind::Discord => "discord",
            ChannelKind::PagerDuty => "pagerduty",
        }
    }

    pub fn matches(self, slug: &str) -> bool {
        self.slug().eq_ignore_ascii_case(slug)
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlackSecrets {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DiscordChannelType {
    /// Records that never chose a type carry an empty selection.
    #[default]
    #[serde(alias = "")]
    Text,
    Forum,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiscordChannelParams {
    #[serde(default)]
    pub selection: DiscordChannelType,
    #[serde(rename = "threadName", default)]
    pub thread_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiscordSecrets {
    #[serde(default)]
    pub url: String,
    #[serde(rename = "channelParams", default)]
    pub channel_params: DiscordChannelParams,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PagerDutySecrets {
    #[serde(rename = "alertEventsURL", default)]
    pub alert_events_url: String,
    #[serde(rename = "integrationKey", default)]
    pub integration_key: String,
}

/// Type-specific channel configuration. On the wire each variant is the bare
/// JSON object of its payload, nested under the envelope's `secrets` key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelSecrets {
    Slack(SlackSecrets),
    Discord(DiscordSecrets),
    PagerDuty(PagerDutySecrets),
}

impl ChannelSecrets {
    pub fn kind(&self) -> ChannelKind {
        match self {
            ChannelSecrets::Slack(_) => ChannelKind::Slack,
            ChannelSecrets::Discord(_) => ChannelKind::Discord,
            ChannelSecrets::PagerDuty(_) => ChannelKind::PagerDuty,
        }
    }

    pub fn to_value(&self) -> Result<serde_json::Value, ApiError> {
        let value = match self {
            ChannelSecrets::Slack(s) => serde_json::to_value(s),
            ChannelSecrets::Discord(s) => serde_json::to_value(s),
            ChannelSecrets::PagerDuty(s) => serde_json::to_value(s),
        };
        value.map_err(ApiError::Serialization)
    }

    pub fn from_value(kind: ChannelKind, value: serde_json::Value) -> Result<Self, ApiError> {
        let secrets = match kind {
            ChannelKind::Slack => serde_json::from_value(value).map(ChannelSecrets::Slack),
            ChannelKind::Discord => serde_json::from_value(value).map(ChannelSecrets::Discord),
            ChannelKind::PagerDuty => serde_json::from_value(value).map(ChannelSecrets::PagerDuty),
        };
        secrets.map_err(ApiError::Decode)
    }
}

/// Envelope fields shared by every channel kind.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChannelSettings {
    pub name: String,
    pub enabled: bool,
    /// Empty means every room of the space.
    pub rooms: Vec<String>,
    pub alarms: String,
    pub repeat_notification_minute: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChannelPayload<'a> {
    pub name: &'a str,
    #[serde(rename = "integrationID", skip_serializing_if = "Option::is_none")]
    pub integration_id: Option<&'a str>,
    pub alarms: &'a str,
    pub rooms: Option<&'a [String]>,
    pub secrets: serde_json::Value,
    #[serde(
        rename = "repeatNotificationMinute",
        skip_serializing_if = "Option::is_none"
    )]
    pub repeat_notification_minute: Option<u32>,
}

impl<'a> ChannelPayload<'a> {
    pub fn new(
        settings: &'a ChannelSettings,
        integration_id: Option<&'a str>,
        secrets: &ChannelSecrets,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            name: &settings.name,
            integration_id,
            alarms: &settings.alarms,
            rooms: (!settings.rooms.is_empty()).then_some(settings.rooms.as_slice()),
            secrets: secrets.to_value()?,
            repeat_notification_minute: settings.repeat_notification_minute,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Invitation {
    pub id: String,
    #[serde(default)]
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn space_member_uses_wire_field_names() {
        let member: SpaceMember =
            serde_json::from_value(json!({"memberID": "m1", "email": "a@b.io", "role": "admin"}))
                .unwrap();
        assert_eq!(member.member_id, "m1");
        assert_eq!(member.role, "admin");
    }

    #[test]
    fn room_node_decodes_short_keys() {
        let nodes: RoomNodes = serde_json::from_value(json!({
            "nodes": [
                {"nd": "n1", "nm": "web-1", "state": "reachable"},
                {"nd": "n2", "nm": "web-2", "state": "unreachable"}
            ]
        }))
        .unwrap();
        assert_eq!(nodes.find_by_name("web-1", true).unwrap().node_id, "n1");
        assert!(nodes.find_by_name("web-2", true).is_none());
        assert_eq!(nodes.find_by_name("web-2", false).unwrap().node_id, "n2");
        assert!(nodes.find_by_name("db-1", false).is_none());
    }

    #[test]
    fn rule_enums_use_api_spelling() {
        let input = MembershipRuleInput {
            action: RuleAction::Exclude,
            description: "no staging".to_string(),
            clauses: vec![NodeMembershipClause {
                label: "env".to_string(),
                operator: ClauseOperator::StartsWith,
                value: "stag".to_string(),
                negate: false,
            }],
        };
        let body = serde_json::to_value(&input).unwrap();
        assert_eq!(body["action"], "EXCLUDE");
        assert_eq!(body["clauses"][0]["operator"], "starts_with");
        assert_eq!(RuleAction::Include.to_string(), "INCLUDE");
    }

    #[test]
    fn channel_tolerates_null_rooms_and_missing_fields() {
        let channel: NotificationChannel =
            serde_json::from_value(json!({"id": "c1", "name": "ops", "rooms": null})).unwrap();
        assert!(channel.rooms.is_empty());
        assert!(!channel.enabled);
        assert!(channel.secrets.is_null());
    }

    #[test]
    fn discord_secrets_nest_channel_params() {
        let secrets = ChannelSecrets::Discord(DiscordSecrets {
            url: "https://discord.example/hook".to_string(),
            channel_params: DiscordChannelParams {
                selection: DiscordChannelType::Forum,
                thread_name: "alerts".to_string(),
            },
        });
        let value = secrets.to_value().unwrap();
        assert_eq!(value["channelParams"]["selection"], "forum");
        assert_eq!(value["channelParams"]["threadName"], "alerts");
        assert_eq!(secrets.kind(), ChannelKind::Discord);
    }

    #[test]
    fn secrets_decode_per_kind() {
        let value = json!({"alertEventsURL": "https://events.pagerduty.com/v2/enqueue", "integrationKey": "k"});
        let secrets = ChannelSecrets::from_value(ChannelKind::PagerDuty, value.clone()).unwrap();
        assert!(matches!(secrets, ChannelSecrets::PagerDuty(ref p) if p.integration_key == "k"));

        let err = ChannelSecrets::from_value(ChannelKind::Slack, json!("hook")).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn discord_secrets_without_channel_params_decode_as_text() {
        let secrets = ChannelSecrets::from_value(
            ChannelKind::Discord,
            json!({"url": "https://discord.example/hook"}),
        )
        .unwrap();
        assert_eq!(
            secrets,
            ChannelSecrets::Discord(DiscordSecrets {
                url: "https://discord.example/hook".to_string(),
                channel_params: DiscordChannelParams::default(),
            })
        );
    }

    #[test]
    fn discord_empty_selection_decodes_as_text() {
        let secrets = ChannelSecrets::from_value(
            ChannelKind::Discord,
            json!({
                "url": "https://discord.example/hook",
                "channelParams": {"selection": "", "threadName": ""}
            }),
        )
        .unwrap();
        let ChannelSecrets::Discord(discord) = secrets else {
            panic!("expected discord secrets");
        };
        assert_eq!(discord.channel_params.selection, DiscordChannelType::Text);
        assert!(discord.channel_params.thread_name.is_empty());
    }

    #[test]
    fn pagerduty_secrets_tolerate_missing_keys() {
        let secrets = ChannelSecrets::from_value(
            ChannelKind::PagerDuty,
            json!({"alertEventsURL": "https://events.pagerduty.com/v2/enqueue"}),
        )
        .unwrap();
        assert!(matches!(
            secrets,
            ChannelSecrets::PagerDuty(ref p)
                if p.integration_key.is_empty() && p.alert_events_url.ends_with("/enqueue")
        ));
    }

    #[test]
    fn payload_sends_null_rooms_for_all_rooms() {
        let settings = ChannelSettings {
            name: "ops".to_string(),
            enabled: true,
            rooms: Vec::new(),
            alarms: "ALARMS_SETTING_ALL".to_string(),
            repeat_notification_minute: None,
        };
        let secrets = ChannelSecrets::Slack(SlackSecrets {
            url: "https://hooks.slack.example/x".to_string(),
        });
        let payload = ChannelPayload::new(&settings, Some("int-1"), &secrets).unwrap();
        let body = serde_json::to_value(&payload).unwrap();
        assert!(body["rooms"].is_null());
        assert_eq!(body["integrationID"], "int-1");
        assert_eq!(body["secrets"]["url"], "https://hooks.slack.example/x");
        assert!(body.get("repeatNotificationMinute").is_none());
        assert!(body.get("enabled").is_none());
    }

    #[test]
    fn channel_kind_matches_slug_case_insensitively() {
        assert!(ChannelKind::PagerDuty.matches("PagerDuty"));
        assert!(ChannelKind::Slack.matches("SLACK"));
        assert!(!ChannelKind::Discord.matches("slack"));
    }
}

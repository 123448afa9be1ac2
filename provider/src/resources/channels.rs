//! Notification channel resources.
//!
//! Slack, Discord and PagerDuty channels share one envelope and one
//! lifecycle; a [`ChannelType`] supplies the type-specific attributes and
//! their mapping to and from the secrets payload.

use std::fmt;
use std::marker::PhantomData;

use netdata_core::{
    ChannelKind, ChannelSecrets, ChannelSettings, DiscordChannelParams, DiscordChannelType,
    DiscordSecrets, NetdataClient, NotificationChannel, PagerDutySecrets, SlackSecrets,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::Resource;
use crate::error::{found, split_import_id, ApiResultExt, ProviderError};
use crate::validation::{require_match, require_non_empty, ALARMS_PATTERN};

pub trait ChannelType: Send + Sync + 'static {
    type Fields: Serialize + DeserializeOwned + Clone + Default + fmt::Debug + PartialEq;

    const TYPE_NAME: &'static str;
    const KIND: ChannelKind;

    fn validate(_fields: &Self::Fields) -> Result<(), ProviderError> {
        Ok(())
    }

    fn secrets(fields: &Self::Fields) -> ChannelSecrets;

    /// `None` when `secrets` belongs to another kind.
    fn fields(secrets: ChannelSecrets) -> Option<Self::Fields>;
}

/// Envelope attributes plus the type-specific `fields`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChannelState<F> {
    #[serde(default)]
    pub id: String,
    pub space_id: String,
    pub name: String,
    pub enabled: bool,
    /// `None` applies the channel to every room of the space.
    #[serde(default)]
    pub rooms_id: Option<Vec<String>>,
    pub alarms: String,
    #[serde(default)]
    pub repeat_notification_min: Option<u32>,
    #[serde(flatten)]
    pub fields: F,
}

impl<F> ChannelState<F> {
    fn settings(&self) -> ChannelSettings {
        ChannelSettings {
            name: self.name.clone(),
            enabled: self.enabled,
            rooms: self.rooms_id.clone().unwrap_or_default(),
            alarms: self.alarms.clone(),
            repeat_notification_minute: self.repeat_notification_min,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlackFields {
    pub webhook_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiscordFields {
    pub webhook_url: String,
    pub channel_type: DiscordChannelType,
    /// Required for forum channels.
    #[serde(default)]
    pub channel_thread: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PagerDutyFields {
    pub alert_events_url: String,
    pub integration_key: String,
}

#[derive(Debug, Clone, Copy)]
pub struct SlackChannel;

impl ChannelType for SlackChannel {
    type Fields = SlackFields;

    const TYPE_NAME: &'static str = "netdata_notification_slack_channel";
    const KIND: ChannelKind = ChannelKind::Slack;

    fn validate(fields: &SlackFields) -> Result<(), ProviderError> {
        require_non_empty("webhook_url", &fields.webhook_url)
    }

    fn secrets(fields: &SlackFields) -> ChannelSecrets {
        ChannelSecrets::Slack(SlackSecrets {
            url: fields.webhook_url.clone(),
        })
    }

    fn fields(secrets: ChannelSecrets) -> Option<SlackFields> {
        match secrets {
            ChannelSecrets::Slack(s) => Some(SlackFields { webhook_url: s.url }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DiscordChannel;

impl ChannelType for DiscordChannel {
    type Fields = DiscordFields;

    const TYPE_NAME: &'static str = "netdata_notification_discord_channel";
    const KIND: ChannelKind = ChannelKind::Discord;

    fn validate(fields: &DiscordFields) -> Result<(), ProviderError> {
        require_non_empty("webhook_url", &fields.webhook_url)?;
        let thread = fields.channel_thread.as_deref().unwrap_or_default();
        if fields.channel_type == DiscordChannelType::Forum && thread.is_empty() {
            return Err(ProviderError::Validation(
                "channel_thread is required if channel_type is forum".to_string(),
            ));
        }
        Ok(())
    }

    fn secrets(fields: &DiscordFields) -> ChannelSecrets {
        ChannelSecrets::Discord(DiscordSecrets {
            url: fields.webhook_url.clone(),
            channel_params: DiscordChannelParams {
                selection: fields.channel_type,
                thread_name: fields.channel_thread.clone().unwrap_or_default(),
            },
        })
    }

    fn fields(secrets: ChannelSecrets) -> Option<DiscordFields> {
        match secrets {
            ChannelSecrets::Discord(s) => Some(DiscordFields {
                webhook_url: s.url,
                channel_type: s.channel_params.selection,
                channel_thread: Some(s.channel_params.thread_name).filter(|t| !t.is_empty()),
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PagerDutyChannel;

impl ChannelType for PagerDutyChannel {
    type Fields = PagerDutyFields;

    const TYPE_NAME: &'static str = "netdata_notification_pagerduty_channel";
    const KIND: ChannelKind = ChannelKind::PagerDuty;

    fn validate(fields: &PagerDutyFields) -> Result<(), ProviderError> {
        require_non_empty("alert_events_url", &fields.alert_events_url)?;
        require_non_empty("integration_key", &fields.integration_key)
    }

    fn secrets(fields: &PagerDutyFields) -> ChannelSecrets {
        ChannelSecrets::PagerDuty(PagerDutySecrets {
            alert_events_url: fields.alert_events_url.clone(),
            integration_key: fields.integration_key.clone(),
        })
    }

    fn fields(secrets: ChannelSecrets) -> Option<PagerDutyFields> {
        match secrets {
            ChannelSecrets::PagerDuty(s) => Some(PagerDutyFields {
                alert_events_url: s.alert_events_url,
                integration_key: s.integration_key,
            }),
            _ => None,
        }
    }
}

pub struct ChannelResource<T> {
    client: NetdataClient,
    channel_type: PhantomData<T>,
}

impl<T> fmt::Debug for ChannelResource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelResource")
            .field("client", &self.client)
            .finish()
    }
}

impl<T: ChannelType> ChannelResource<T> {
    pub fn new(client: NetdataClient) -> Self {
        Self {
            client,
            channel_type: PhantomData,
        }
    }

    fn to_state(
        &self,
        space_id: &str,
        channel: NotificationChannel,
    ) -> Result<ChannelState<T::Fields>, ProviderError> {
        let context = || {
            format!(
                "Could not decode {} notification secrets for space_id/channel_id: {}/{}",
                T::KIND,
                space_id,
                channel.id
            )
        };
        let secrets = channel.decode_secrets(T::KIND).context(context)?;
        let fields = T::fields(secrets).ok_or_else(|| ProviderError::Validation(context()))?;
        Ok(ChannelState {
            id: channel.id.clone(),
            space_id: space_id.to_string(),
            name: channel.name,
            enabled: channel.enabled,
            rooms_id: Some(channel.rooms).filter(|rooms| !rooms.is_empty()),
            alarms: channel.alarms,
            repeat_notification_min: channel.repeat_notification_minute,
            fields,
        })
    }

    fn describe(&self, action: &str, space_id: &str, channel_id: &str) -> String {
        format!(
            "Could not {action} {} notification for space_id/channel_id: {space_id}/{channel_id}",
            T::KIND
        )
    }
}

impl<T: ChannelType> Resource for ChannelResource<T> {
    type State = ChannelState<T::Fields>;

    const TYPE_NAME: &'static str = T::TYPE_NAME;

    fn validate(&self, plan: &Self::State) -> Result<(), ProviderError> {
        require_non_empty("name", &plan.name)?;
        require_match("alarms", ALARMS_PATTERN, &plan.alarms)?;
        if plan.rooms_id.as_ref().is_some_and(Vec::is_empty) {
            return Err(ProviderError::Validation(
                "rooms_id must list at least one room; omit it for all rooms".to_string(),
            ));
        }
        T::validate(&plan.fields)
    }

    fn create(&self, plan: &Self::State) -> Result<Self::State, ProviderError> {
        self.validate(plan)?;
        info!(space_id = %plan.space_id, kind = %T::KIND, name = %plan.name, "creating notification channel");
        let channel = self
            .client
            .create_channel(&plan.space_id, &plan.settings(), &T::secrets(&plan.fields))
            .context(|| format!("Could not create {} notification for space_id: {}", T::KIND, plan.space_id))?;

        // The creation response may omit secrets; keep the planned ones.
        Ok(ChannelState {
            id: channel.id,
            enabled: channel.enabled,
            ..plan.clone()
        })
    }

    fn read(&self, state: &Self::State) -> Result<Option<Self::State>, ProviderError> {
        let channel = found(self.client.get_channel(&state.space_id, &state.id, T::KIND))
            .context(|| self.describe("read", &state.space_id, &state.id))?;
        channel
            .map(|channel| self.to_state(&state.space_id, channel))
            .transpose()
    }

    fn update(&self, plan: &Self::State, state: &Self::State) -> Result<Self::State, ProviderError> {
        self.validate(plan)?;
        info!(space_id = %state.space_id, channel_id = %state.id, kind = %T::KIND, "updating notification channel");
        self.client
            .update_channel(&state.space_id, &state.id, &plan.settings(), &T::secrets(&plan.fields))
            .context(|| self.describe("update", &state.space_id, &state.id))?;

        Ok(ChannelState {
            id: state.id.clone(),
            ..plan.clone()
        })
    }

    fn delete(&self, state: &Self::State) -> Result<(), ProviderError> {
        info!(space_id = %state.space_id, channel_id = %state.id, kind = %T::KIND, "deleting notification channel");
        self.client
            .delete_channel(&state.space_id, &state.id)
            .context(|| self.describe("delete", &state.space_id, &state.id))
    }

    fn import(&self, id: &str) -> Result<Self::State, ProviderError> {
        let [space_id, id] = split_import_id(id, "space_id,channel_id")?;
        Ok(ChannelState {
            id,
            space_id,
            ..ChannelState::default()
        })
    }
}

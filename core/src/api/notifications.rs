use serde_json::json;
use tracing::debug;

use crate::client::{json_body, NetdataClient};
use crate::error::{require, ApiError, ValidationError};
use crate::http::HttpMethod;
use crate::types::{
    ChannelKind, ChannelPayload, ChannelSecrets, ChannelSettings, NotificationChannel,
    NotificationIntegration, NotificationIntegrations,
};

impl NetdataClient {
    /// Integration of `kind` available in the space, matched by slug
    /// ignoring case.
    pub fn notification_integration(
        &self,
        space_id: &str,
        kind: ChannelKind,
    ) -> Result<NotificationIntegration, ApiError> {
        require(space_id, ValidationError::SpaceIdRequired)?;
        let listed: NotificationIntegrations = self.send_json(
            HttpMethod::Get,
            &format!("/api/v2/spaces/{space_id}/integrations"),
            None,
        )?;
        listed
            .integrations
            .into_iter()
            .find(|integration| kind.matches(&integration.slug))
            .map(|mut integration| {
                integration.slug = integration.slug.to_lowercase();
                integration
            })
            .ok_or(ApiError::NotFound)
    }

    /// Channels of the space delivering through `kind`. An empty result is
    /// reported as `NotFound`.
    pub fn list_channels_by_kind(
        &self,
        space_id: &str,
        kind: ChannelKind,
    ) -> Result<Vec<NotificationChannel>, ApiError> {
        require(space_id, ValidationError::SpaceIdRequired)?;
        let channels: Vec<NotificationChannel> = self.send_json(
            HttpMethod::Get,
            &format!("/api/v2/spaces/{space_id}/channel"),
            None,
        )?;
        let matching: Vec<_> = channels
            .into_iter()
            .filter(|channel| kind.matches(&channel.integration.slug))
            .map(|mut channel| {
                channel.integration.slug = channel.integration.slug.to_lowercase();
                channel
            })
            .collect();
        if matching.is_empty() {
            return Err(ApiError::NotFound);
        }
        Ok(matching)
    }

    /// Detailed record of one channel, after confirming it exists with the
    /// expected kind. Secrets come back opaque; see
    /// `NotificationChannel::decode_secrets`.
    pub fn get_channel(
        &self,
        space_id: &str,
        channel_id: &str,
        kind: ChannelKind,
    ) -> Result<NotificationChannel, ApiError> {
        require(space_id, ValidationError::SpaceIdRequired)?;
        require(channel_id, ValidationError::ChannelIdRequired)?;

        let listed = self.list_channels_by_kind(space_id, kind)?;
        if !listed.iter().any(|channel| channel.id == channel_id) {
            return Err(ApiError::NotFound);
        }

        self.send_entity_json(
            HttpMethod::Get,
            &format!("/api/v2/spaces/{space_id}/channel/{channel_id}"),
            None,
        )
    }

    /// Create a channel: resolve the integration, POST the envelope, then
    /// PATCH the enabled flag, which the creation endpoint does not accept.
    ///
    /// A failure in the PATCH leaves the channel created with the server's
    /// default enabled state.
    pub fn create_channel(
        &self,
        space_id: &str,
        settings: &ChannelSettings,
        secrets: &ChannelSecrets,
    ) -> Result<NotificationChannel, ApiError> {
        require(space_id, ValidationError::SpaceIdRequired)?;
        let integration = self.notification_integration(space_id, secrets.kind())?;

        let payload = ChannelPayload::new(settings, Some(integration.id.as_str()), secrets)?;
        let mut channel: NotificationChannel = self.send_json(
            HttpMethod::Post,
            &format!("/api/v2/spaces/{space_id}/channel"),
            json_body(&payload)?,
        )?;
        debug!(space_id, channel_id = %channel.id, kind = %secrets.kind(), "created notification channel");

        self.enable_channel(space_id, &channel.id, settings.enabled)?;
        channel.enabled = settings.enabled;
        Ok(channel)
    }

    /// Update a channel: PATCH the enabled flag first, then PUT the envelope.
    pub fn update_channel(
        &self,
        space_id: &str,
        channel_id: &str,
        settings: &ChannelSettings,
        secrets: &ChannelSecrets,
    ) -> Result<NotificationChannel, ApiError> {
        require(space_id, ValidationError::SpaceIdRequired)?;
        require(channel_id, ValidationError::ChannelIdRequired)?;

        self.enable_channel(space_id, channel_id, settings.enabled)?;

        let payload = ChannelPayload::new(settings, None, secrets)?;
        self.send_json(
            HttpMethod::Put,
            &format!("/api/v2/spaces/{space_id}/channel/{channel_id}"),
            json_body(&payload)?,
        )
    }

    pub fn enable_channel(&self, space_id: &str, channel_id: &str, enabled: bool) -> Result<(), ApiError> {
        require(space_id, ValidationError::SpaceIdRequired)?;
        require(channel_id, ValidationError::ChannelIdRequired)?;
        let body = json_body(&json!({ "enabled": enabled }))?;
        self.send(
            HttpMethod::Patch,
            &format!("/api/v2/spaces/{space_id}/channel/{channel_id}"),
            body,
        )?;
        Ok(())
    }

    pub fn delete_channel(&self, space_id: &str, channel_id: &str) -> Result<(), ApiError> {
        require(space_id, ValidationError::SpaceIdRequired)?;
        require(channel_id, ValidationError::ChannelIdRequired)?;
        self.send_entity(
            HttpMethod::Delete,
            &format!("/api/v2/spaces/{space_id}/channel/{channel_id}"),
            None,
        )?;
        Ok(())
    }
}

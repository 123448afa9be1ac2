use crate::client::NetdataClient;
use crate::error::{require, ApiError, ValidationError};
use crate::http::HttpMethod;
use crate::types::Invitation;

impl NetdataClient {
    pub fn list_invitations(&self, space_id: &str) -> Result<Vec<Invitation>, ApiError> {
        require(space_id, ValidationError::SpaceIdRequired)?;
        self.send_json(
            HttpMethod::Get,
            &format!("/api/v2/spaces/{space_id}/invitations"),
            None,
        )
    }

    /// Revoke `invitations` in one call. Sends nothing for an empty slice.
    pub fn delete_invitations(&self, space_id: &str, invitations: &[Invitation]) -> Result<(), ApiError> {
        require(space_id, ValidationError::SpaceIdRequired)?;
        if invitations.is_empty() {
            return Ok(());
        }
        let ids = invitations
            .iter()
            .map(|invitation| invitation.id.as_str())
            .collect::<Vec<_>>()
            .join(",");
        self.send(
            HttpMethod::Delete,
            &format!("/api/v1/spaces/{space_id}/invitations?invitation_ids={ids}"),
            None,
        )?;
        Ok(())
    }
}

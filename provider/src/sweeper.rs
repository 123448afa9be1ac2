//! Cleanup of pending invitations left behind by acceptance runs.

use netdata_core::NetdataClient;
use tracing::info;

use crate::error::{ApiResultExt, ProviderError};

/// Environment variable naming the space acceptance runs invite members into.
pub const SPACE_ID_ENV: &str = "SPACE_ID_NON_COMMUNITY";

/// Revoke every pending invitation of `space_id` in one call and return how
/// many were revoked.
pub fn sweep_invitations(client: &NetdataClient, space_id: &str) -> Result<usize, ProviderError> {
    let invitations = client
        .list_invitations(space_id)
        .context(|| format!("Could not list invitations for space_id: {space_id}"))?;
    if invitations.is_empty() {
        info!(space_id, "no pending invitations");
        return Ok(0);
    }

    client
        .delete_invitations(space_id, &invitations)
        .context(|| format!("Could not delete invitations for space_id: {space_id}"))?;
    info!(space_id, count = invitations.len(), "revoked pending invitations");
    Ok(invitations.len())
}

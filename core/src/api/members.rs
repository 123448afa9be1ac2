use serde_json::json;

use crate::client::{json_body, NetdataClient};
use crate::error::{require, ApiError, ValidationError};
use crate::http::HttpMethod;
use crate::types::SpaceMember;

impl NetdataClient {
    pub fn list_space_members(&self, space_id: &str) -> Result<Vec<SpaceMember>, ApiError> {
        require(space_id, ValidationError::SpaceIdRequired)?;
        self.send_json(HttpMethod::Get, &format!("/api/v2/spaces/{space_id}/members"), None)
    }

    pub fn get_space_member(&self, space_id: &str, member_id: &str) -> Result<SpaceMember, ApiError> {
        require(member_id, ValidationError::MemberIdRequired)?;
        self.list_space_members(space_id)?
            .into_iter()
            .find(|member| member.member_id == member_id)
            .ok_or(ApiError::NotFound)
    }

    /// Invite `email` into the space with `role`.
    pub fn create_space_member(&self, space_id: &str, email: &str, role: &str) -> Result<SpaceMember, ApiError> {
        require(space_id, ValidationError::SpaceIdRequired)?;
        require(email, ValidationError::EmailRequired)?;
        require(role, ValidationError::RoleRequired)?;
        let body = json_body(&json!({ "email": email, "role": role }))?;
        self.send_json(HttpMethod::Post, &format!("/api/v2/spaces/{space_id}/members"), body)
    }

    pub fn update_space_member_role(&self, space_id: &str, member_id: &str, role: &str) -> Result<(), ApiError> {
        require(space_id, ValidationError::SpaceIdRequired)?;
        require(member_id, ValidationError::MemberIdRequired)?;
        require(role, ValidationError::RoleRequired)?;
        let body = json_body(&json!({ "role": role }))?;
        self.send(
            HttpMethod::Patch,
            &format!("/api/v2/spaces/{space_id}/members/{member_id}"),
            body,
        )?;
        Ok(())
    }

    pub fn delete_space_member(&self, space_id: &str, member_id: &str) -> Result<(), ApiError> {
        require(space_id, ValidationError::SpaceIdRequired)?;
        require(member_id, ValidationError::MemberIdRequired)?;
        self.send_entity(
            HttpMethod::Delete,
            &format!("/api/v2/spaces/{space_id}/members?member_ids={member_id}"),
            None,
        )?;
        Ok(())
    }
}

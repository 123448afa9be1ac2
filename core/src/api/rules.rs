use crate::client::{json_body, NetdataClient};
use crate::error::{require, ApiError, ValidationError};
use crate::http::HttpMethod;
use crate::types::{MembershipRuleInput, NodeMembershipRule};

/// Collection path for the membership rules of one room. Rules are stored
/// and evaluated by the remote service; the client only forwards them.
fn rules_path(space_id: &str, room_id: &str) -> Result<String, ApiError> {
    require(space_id, ValidationError::SpaceIdRequired)?;
    require(room_id, ValidationError::RoomIdRequired)?;
    Ok(format!(
        "/api/v3/spaces/{space_id}/rooms/{room_id}/node-membership-rules"
    ))
}

impl NetdataClient {
    pub fn list_membership_rules(&self, space_id: &str, room_id: &str) -> Result<Vec<NodeMembershipRule>, ApiError> {
        let path = rules_path(space_id, room_id)?;
        self.send_json(HttpMethod::Get, &path, None)
    }

    pub fn get_membership_rule(
        &self,
        space_id: &str,
        room_id: &str,
        rule_id: &str,
    ) -> Result<NodeMembershipRule, ApiError> {
        let path = rules_path(space_id, room_id)?;
        require(rule_id, ValidationError::RuleIdRequired)?;
        self.send_entity_json(HttpMethod::Get, &format!("{path}/{rule_id}"), None)
    }

    pub fn create_membership_rule(
        &self,
        space_id: &str,
        room_id: &str,
        rule: &MembershipRuleInput,
    ) -> Result<NodeMembershipRule, ApiError> {
        let path = rules_path(space_id, room_id)?;
        self.send_json(HttpMethod::Post, &path, json_body(rule)?)
    }

    pub fn update_membership_rule(
        &self,
        space_id: &str,
        room_id: &str,
        rule_id: &str,
        rule: &MembershipRuleInput,
    ) -> Result<NodeMembershipRule, ApiError> {
        let path = rules_path(space_id, room_id)?;
        require(rule_id, ValidationError::RuleIdRequired)?;
        self.send_json(HttpMethod::Put, &format!("{path}/{rule_id}"), json_body(rule)?)
    }

    pub fn delete_membership_rule(&self, space_id: &str, room_id: &str, rule_id: &str) -> Result<(), ApiError> {
        let path = rules_path(space_id, room_id)?;
        require(rule_id, ValidationError::RuleIdRequired)?;
        self.send_entity(HttpMethod::Delete, &format!("{path}/{rule_id}"), None)?;
        Ok(())
    }
}

use crate::client::{json_body, NetdataClient};
use crate::error::{require, ApiError, ValidationError};
use crate::http::HttpMethod;
use crate::types::RoomMember;

impl NetdataClient {
    pub fn list_room_members(&self, space_id: &str, room_id: &str) -> Result<Vec<RoomMember>, ApiError> {
        require(space_id, ValidationError::SpaceIdRequired)?;
        require(room_id, ValidationError::RoomIdRequired)?;
        self.send_json(
            HttpMethod::Get,
            &format!("/api/v2/spaces/{space_id}/rooms/{room_id}/members"),
            None,
        )
    }

    pub fn get_room_member(
        &self,
        space_id: &str,
        room_id: &str,
        space_member_id: &str,
    ) -> Result<RoomMember, ApiError> {
        require(space_member_id, ValidationError::MemberIdRequired)?;
        self.list_room_members(space_id, room_id)?
            .into_iter()
            .find(|member| member.space_member_id == space_member_id)
            .ok_or(ApiError::NotFound)
    }

    pub fn create_room_member(&self, space_id: &str, room_id: &str, space_member_id: &str) -> Result<(), ApiError> {
        require(space_id, ValidationError::SpaceIdRequired)?;
        require(room_id, ValidationError::RoomIdRequired)?;
        require(space_member_id, ValidationError::MemberIdRequired)?;
        let body = json_body(&[space_member_id])?;
        self.send(
            HttpMethod::Post,
            &format!("/api/v2/spaces/{space_id}/rooms/{room_id}/members"),
            body,
        )?;
        Ok(())
    }

    pub fn delete_room_member(&self, space_id: &str, room_id: &str, space_member_id: &str) -> Result<(), ApiError> {
        require(space_id, ValidationError::SpaceIdRequired)?;
        require(room_id, ValidationError::RoomIdRequired)?;
        require(space_member_id, ValidationError::MemberIdRequired)?;
        self.send_entity(
            HttpMethod::Delete,
            &format!("/api/v2/spaces/{space_id}/rooms/{room_id}/members?member_ids={space_member_id}"),
            None,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::error::{ApiError, ValidationError};
    use crate::testing::{client, ScriptedTransport};

    #[test]
    fn create_room_member_posts_id_list() {
        let transport = ScriptedTransport::new(vec![(200, "")]);
        client(&transport).create_room_member("s1", "r1", "m1").unwrap();
        assert_eq!(
            transport.calls(),
            vec!["POST http://cloud.test/api/v2/spaces/s1/rooms/r1/members"]
        );
        assert_eq!(transport.body(0), serde_json::json!(["m1"]));
    }

    #[test]
    fn get_room_member_matches_space_member_id() {
        let transport = ScriptedTransport::new(vec![(200, r#"[{"memberID":"m1"},{"memberID":"m2"}]"#)]);
        let member = client(&transport).get_room_member("s1", "r1", "m2").unwrap();
        assert_eq!(member.space_member_id, "m2");
    }

    #[test]
    fn missing_room_member_is_not_found() {
        let transport = ScriptedTransport::new(vec![(200, "[]")]);
        let err = client(&transport).get_room_member("s1", "r1", "m1").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn room_member_writes_require_ids() {
        let transport = ScriptedTransport::new(Vec::new());
        let c = client(&transport);
        assert!(matches!(
            c.create_room_member("s1", "", "m1"),
            Err(ApiError::Validation(ValidationError::RoomIdRequired))
        ));
        assert!(matches!(
            c.delete_room_member("s1", "r1", ""),
            Err(ApiError::Validation(ValidationError::MemberIdRequired))
        ));
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn get_room_member_requires_member_id_before_listing() {
        let transport = ScriptedTransport::new(vec![(200, r#"[{"memberID":""}]"#)]);
        assert!(matches!(
            client(&transport).get_room_member("s1", "r1", ""),
            Err(ApiError::Validation(ValidationError::MemberIdRequired))
        ));
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn missing_room_on_delete_is_not_found() {
        let transport = ScriptedTransport::new(vec![(404, "")]);
        let err = client(&transport).delete_room_member("s1", "r1", "m1").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn missing_room_on_list_is_a_request_error() {
        let transport = ScriptedTransport::new(vec![(404, "no such room")]);
        let err = client(&transport).list_room_members("s1", "r1").unwrap_err();
        assert!(!err.is_not_found());
        assert_eq!(err.status(), Some(404));
    }
}

use serde_json::json;

use crate::client::{json_body, NetdataClient};
use crate::error::{require, ApiError, ValidationError};
use crate::http::HttpMethod;
use crate::types::Space;

impl NetdataClient {
    pub fn list_spaces(&self) -> Result<Vec<Space>, ApiError> {
        self.send_json(HttpMethod::Get, "/api/v3/spaces", None)
    }

    pub fn get_space(&self, space_id: &str) -> Result<Space, ApiError> {
        require(space_id, ValidationError::IdRequired)?;
        self.list_spaces()?
            .into_iter()
            .find(|space| space.id == space_id)
            .ok_or(ApiError::NotFound)
    }

    /// Create a space, then set its description with a follow-up PATCH; the
    /// creation endpoint ignores descriptions.
    pub fn create_space(&self, name: &str, description: &str) -> Result<Space, ApiError> {
        require(name, ValidationError::NameRequired)?;
        let body = json_body(&json!({ "name": name }))?;
        let mut space: Space = self.send_json(HttpMethod::Post, "/api/v1/spaces", body)?;

        self.update_space(&space.id, name, description)?;

        space.name = name.to_string();
        space.description = description.to_string();
        Ok(space)
    }

    pub fn update_space(&self, space_id: &str, name: &str, description: &str) -> Result<(), ApiError> {
        require(space_id, ValidationError::IdRequired)?;
        let body = json_body(&json!({ "name": name, "description": description }))?;
        self.send(HttpMethod::Patch, &format!("/api/v1/spaces/{space_id}"), body)?;
        Ok(())
    }

    pub fn delete_space(&self, space_id: &str) -> Result<(), ApiError> {
        require(space_id, ValidationError::IdRequired)?;
        self.send_entity(HttpMethod::Delete, &format!("/api/v1/spaces/{space_id}"), None)?;
        Ok(())
    }

    /// Issue a claim token for connecting nodes to the space.
    pub fn space_claim_token(&self, space_id: &str) -> Result<String, ApiError> {
        require(space_id, ValidationError::IdRequired)?;
        let data: serde_json::Value =
            self.send_json(HttpMethod::Post, &format!("/api/v1/spaces/{space_id}/tokens"), None)?;
        data.get("token")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
            .ok_or(ApiError::TokenNotFound)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::{ApiError, ValidationError};
    use crate::testing::{client, ScriptedTransport};

    #[test]
    fn get_space_scans_the_list() {
        let transport = ScriptedTransport::new(vec![(
            200,
            r#"[{"id":"s1","name":"one","description":""},{"id":"s2","name":"two","description":"second"}]"#,
        )]);
        let space = client(&transport).get_space("s2").unwrap();
        assert_eq!(space.name, "two");
        assert_eq!(space.description, "second");
        assert_eq!(transport.calls(), vec!["GET http://cloud.test/api/v3/spaces"]);
    }

    #[test]
    fn get_space_reports_missing_id_as_not_found() {
        let transport = ScriptedTransport::new(vec![(200, r#"[{"id":"s1","name":"one"}]"#)]);
        let err = client(&transport).get_space("s9").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn create_space_posts_name_then_patches_description() {
        let transport = ScriptedTransport::new(vec![(200, r#"{"id":"s1","name":"X"}"#), (200, "")]);
        let space = client(&transport).create_space("X", "Y").unwrap();

        assert_eq!(space.id, "s1");
        assert_eq!(space.name, "X");
        assert_eq!(space.description, "Y");
        assert_eq!(
            transport.calls(),
            vec![
                "POST http://cloud.test/api/v1/spaces",
                "PATCH http://cloud.test/api/v1/spaces/s1",
            ]
        );
        let create = transport.body(0);
        assert_eq!(create["name"], "X");
        assert!(create.get("description").is_none());
        assert_eq!(transport.body(1)["description"], "Y");
    }

    #[test]
    fn write_operations_validate_before_sending() {
        let transport = ScriptedTransport::new(Vec::new());
        let c = client(&transport);

        assert!(matches!(
            c.update_space("", "n", "d"),
            Err(ApiError::Validation(ValidationError::IdRequired))
        ));
        assert!(matches!(
            c.delete_space(""),
            Err(ApiError::Validation(ValidationError::IdRequired))
        ));
        assert!(matches!(
            c.create_space("", "d"),
            Err(ApiError::Validation(ValidationError::NameRequired))
        ));
        assert!(matches!(
            c.space_claim_token(""),
            Err(ApiError::Validation(ValidationError::IdRequired))
        ));
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn claim_token_is_read_from_token_key() {
        let transport = ScriptedTransport::new(vec![(200, r#"{"token":"abc123"}"#)]);
        let token = client(&transport).space_claim_token("space1").unwrap();
        assert_eq!(token, "abc123");
        assert_eq!(
            transport.calls(),
            vec!["POST http://cloud.test/api/v1/spaces/space1/tokens"]
        );
    }

    #[test]
    fn claim_token_without_token_key_fails() {
        let transport = ScriptedTransport::new(vec![(200, r#"{"foo":"bar"}"#), (200, r#"{"token":42}"#)]);
        let c = client(&transport);
        assert!(matches!(c.space_claim_token("space1"), Err(ApiError::TokenNotFound)));
        assert!(matches!(c.space_claim_token("space1"), Err(ApiError::TokenNotFound)));
    }
}

use serde_json::json;

use crate::client::{json_body, NetdataClient};
use crate::error::{require, ApiError, ValidationError};
use crate::http::HttpMethod;
use crate::types::Room;

impl NetdataClient {
    pub fn list_rooms(&self, space_id: &str) -> Result<Vec<Room>, ApiError> {
        require(space_id, ValidationError::SpaceIdRequired)?;
        self.send_json(HttpMethod::Get, &format!("/api/v2/spaces/{space_id}/rooms"), None)
    }

    pub fn get_room(&self, space_id: &str, room_id: &str) -> Result<Room, ApiError> {
        require(room_id, ValidationError::RoomIdRequired)?;
        self.list_rooms(space_id)?
            .into_iter()
            .find(|room| room.id == room_id)
            .ok_or(ApiError::NotFound)
    }

    /// Create a room, then PATCH name and description onto it.
    pub fn create_room(&self, space_id: &str, name: &str, description: &str) -> Result<Room, ApiError> {
        require(space_id, ValidationError::SpaceIdRequired)?;
        require(name, ValidationError::NameRequired)?;
        let body = json_body(&json!({ "name": name }))?;
        let mut room: Room =
            self.send_json(HttpMethod::Post, &format!("/api/v1/spaces/{space_id}/rooms"), body)?;

        self.update_room(space_id, &room.id, name, description)?;

        room.name = name.to_string();
        room.description = description.to_string();
        Ok(room)
    }

    pub fn update_room(
        &self,
        space_id: &str,
        room_id: &str,
        name: &str,
        description: &str,
    ) -> Result<(), ApiError> {
        require(space_id, ValidationError::SpaceIdRequired)?;
        require(room_id, ValidationError::RoomIdRequired)?;
        let body = json_body(&json!({ "name": name, "description": description }))?;
        self.send(
            HttpMethod::Patch,
            &format!("/api/v1/spaces/{space_id}/rooms/{room_id}"),
            body,
        )?;
        Ok(())
    }

    pub fn delete_room(&self, space_id: &str, room_id: &str) -> Result<(), ApiError> {
        require(space_id, ValidationError::SpaceIdRequired)?;
        require(room_id, ValidationError::RoomIdRequired)?;
        self.send_entity(
            HttpMethod::Delete,
            &format!("/api/v1/spaces/{space_id}/rooms/{room_id}"),
            None,
        )?;
        Ok(())
    }
}

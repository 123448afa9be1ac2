use serde_json::json;

use crate::client::{json_body, NetdataClient};
use crate::error::{require, ApiError, ValidationError};
use crate::http::HttpMethod;
use crate::types::{RoomNodes, ALL_NODES_ROOM};

impl NetdataClient {
    /// Nodes currently in a room, with their reachability state.
    pub fn room_nodes(&self, space_id: &str, room_id: &str) -> Result<RoomNodes, ApiError> {
        require(space_id, ValidationError::SpaceIdRequired)?;
        require(room_id, ValidationError::RoomIdRequired)?;
        let body = json_body(&json!({ "scope": { "nodes": [] } }))?;
        self.send_json(
            HttpMethod::Post,
            &format!("/api/v3/spaces/{space_id}/rooms/{room_id}/nodes"),
            body,
        )
    }

    /// Every node claimed to the space, read from the room named "All nodes".
    pub fn all_nodes(&self, space_id: &str) -> Result<RoomNodes, ApiError> {
        let room = self
            .list_rooms(space_id)?
            .into_iter()
            .find(|room| room.name == ALL_NODES_ROOM)
            .ok_or(ApiError::NotFound)?;
        self.room_nodes(space_id, &room.id)
    }

    pub fn add_node_to_room(&self, space_id: &str, room_id: &str, node_id: &str) -> Result<(), ApiError> {
        require(space_id, ValidationError::SpaceIdRequired)?;
        require(room_id, ValidationError::RoomIdRequired)?;
        require(node_id, ValidationError::NodeIdRequired)?;
        let body = json_body(&[node_id])?;
        self.send(
            HttpMethod::Post,
            &format!("/api/v1/spaces/{space_id}/rooms/{room_id}/claimed-nodes"),
            body,
        )?;
        Ok(())
    }

    pub fn remove_node_from_room(&self, space_id: &str, room_id: &str, node_id: &str) -> Result<(), ApiError> {
        require(space_id, ValidationError::SpaceIdRequired)?;
        require(room_id, ValidationError::RoomIdRequired)?;
        require(node_id, ValidationError::NodeIdRequired)?;
        self.send_entity(
            HttpMethod::Delete,
            &format!("/api/v1/spaces/{space_id}/rooms/{room_id}/claimed-nodes?node_ids={node_id}"),
            None,
        )?;
        Ok(())
    }
}

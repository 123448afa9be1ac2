//! In-memory fake of the Netdata Cloud REST API.
//!
//! Serves the subset of endpoints the client talks to, keeps all state in a
//! shared `Cloud`, rejects requests without a bearer token, and records every
//! request line so tests can assert call order.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const ALL_NODES_ROOM: &str = "All nodes";

/// Integration slugs every new space offers.
const INTEGRATION_SLUGS: [&str; 4] = ["email", "slack", "discord", "pagerduty"];

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Space {
    pub id: String,
    pub name: String,
    pub description: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Room {
    pub id: String,
    pub name: String,
    pub description: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Member {
    #[serde(rename = "memberID")]
    pub member_id: String,
    pub email: String,
    pub role: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Node {
    #[serde(rename = "nd")]
    pub id: String,
    #[serde(rename = "nm")]
    pub name: String,
    pub state: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Clause {
    pub label: String,
    pub operator: String,
    pub value: String,
    pub negate: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rule {
    pub id: Uuid,
    pub action: String,
    pub description: String,
    pub clauses: Vec<Clause>,
}

#[derive(Deserialize)]
pub struct RuleInput {
    pub action: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub clauses: Vec<Clause>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Integration {
    pub id: String,
    pub slug: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Channel {
    pub id: String,
    pub name: String,
    pub enabled: bool,
    pub integration: Integration,
    pub alarms: String,
    pub rooms: Option<Vec<String>>,
    pub secrets: Value,
    #[serde(rename = "repeatNotificationMinute", skip_serializing_if = "Option::is_none")]
    pub repeat_notification_minute: Option<u32>,
}

#[derive(Deserialize)]
pub struct ChannelInput {
    pub name: String,
    #[serde(rename = "integrationID")]
    pub integration_id: Option<String>,
    #[serde(default)]
    pub alarms: String,
    pub rooms: Option<Vec<String>>,
    #[serde(default)]
    pub secrets: Value,
    #[serde(rename = "repeatNotificationMinute")]
    pub repeat_notification_minute: Option<u32>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Invitation {
    pub id: String,
    pub email: String,
}

#[derive(Deserialize)]
pub struct NameInput {
    pub name: String,
}

#[derive(Deserialize)]
pub struct NameDescriptionInput {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct MemberInput {
    pub email: String,
    pub role: String,
}

#[derive(Deserialize)]
pub struct RoleInput {
    pub role: String,
}

#[derive(Deserialize)]
pub struct EnabledInput {
    pub enabled: bool,
}

#[derive(Clone, Debug, Default)]
struct RoomRecord {
    room: Room,
    members: Vec<String>,
    nodes: Vec<String>,
    rules: Vec<Rule>,
}

#[derive(Clone, Debug, Default)]
struct SpaceRecord {
    space: Space,
    rooms: Vec<RoomRecord>,
    members: Vec<Member>,
    nodes: Vec<Node>,
    integrations: Vec<Integration>,
    channels: Vec<Channel>,
    invitations: Vec<Invitation>,
}

impl SpaceRecord {
    fn room_mut(&mut self, room_id: &str) -> Result<&mut RoomRecord, StatusCode> {
        self.rooms
            .iter_mut()
            .find(|r| r.room.id == room_id)
            .ok_or(StatusCode::NOT_FOUND)
    }

    fn channel_mut(&mut self, channel_id: &str) -> Result<&mut Channel, StatusCode> {
        self.channels
            .iter_mut()
            .find(|c| c.id == channel_id)
            .ok_or(StatusCode::NOT_FOUND)
    }

    /// Nodes of a room; the "All nodes" room holds every node of the space.
    fn room_nodes(&self, room_id: &str) -> Result<Vec<Node>, StatusCode> {
        let record = self
            .rooms
            .iter()
            .find(|r| r.room.id == room_id)
            .ok_or(StatusCode::NOT_FOUND)?;
        if record.room.name == ALL_NODES_ROOM {
            return Ok(self.nodes.clone());
        }
        Ok(self
            .nodes
            .iter()
            .filter(|n| record.nodes.contains(&n.id))
            .cloned()
            .collect())
    }
}

/// Complete state of the fake service plus the log of requests served.
#[derive(Debug, Default)]
pub struct Cloud {
    spaces: Vec<SpaceRecord>,
    requests: Vec<String>,
}

impl Cloud {
    /// Create a space with its "All nodes" room and default integrations.
    pub fn seed_space(&mut self, name: &str) -> String {
        let id = Uuid::new_v4().to_string();
        let integrations = INTEGRATION_SLUGS
            .iter()
            .map(|slug| Integration {
                id: Uuid::new_v4().to_string(),
                slug: slug.to_string(),
            })
            .collect();
        self.spaces.push(SpaceRecord {
            space: Space {
                id: id.clone(),
                name: name.to_string(),
                description: String::new(),
            },
            rooms: vec![RoomRecord {
                room: Room {
                    id: Uuid::new_v4().to_string(),
                    name: ALL_NODES_ROOM.to_string(),
                    description: String::new(),
                },
                ..RoomRecord::default()
            }],
            integrations,
            ..SpaceRecord::default()
        });
        id
    }

    /// Claim a node to the space. Returns its id, or `None` for an unknown space.
    pub fn seed_node(&mut self, space_id: &str, name: &str, reachable: bool) -> Option<String> {
        let record = self.space_mut(space_id).ok()?;
        let id = Uuid::new_v4().to_string();
        record.nodes.push(Node {
            id: id.clone(),
            name: name.to_string(),
            state: if reachable { "reachable" } else { "unreachable" }.to_string(),
        });
        Some(id)
    }

    pub fn seed_invitation(&mut self, space_id: &str, email: &str) -> Option<String> {
        let record = self.space_mut(space_id).ok()?;
        let id = Uuid::new_v4().to_string();
        record.invitations.push(Invitation {
            id: id.clone(),
            email: email.to_string(),
        });
        Some(id)
    }

    /// Drop the integrations of one slug, as on a plan that lacks them.
    pub fn remove_integration(&mut self, space_id: &str, slug: &str) {
        if let Ok(record) = self.space_mut(space_id) {
            record.integrations.retain(|i| i.slug != slug);
        }
    }

    pub fn room_node_ids(&self, space_id: &str, room_id: &str) -> Vec<String> {
        self.space(space_id)
            .and_then(|s| s.room_nodes(room_id).ok())
            .map(|nodes| nodes.into_iter().map(|n| n.id).collect())
            .unwrap_or_default()
    }

    pub fn channel(&self, space_id: &str, channel_id: &str) -> Option<Channel> {
        self.space(space_id)?
            .channels
            .iter()
            .find(|c| c.id == channel_id)
            .cloned()
    }

    pub fn rules(&self, space_id: &str, room_id: &str) -> Vec<Rule> {
        self.space(space_id)
            .and_then(|s| s.rooms.iter().find(|r| r.room.id == room_id))
            .map(|r| r.rules.clone())
            .unwrap_or_default()
    }

    /// Request lines served so far, as `"METHOD /path?query"`.
    pub fn requests(&self) -> &[String] {
        &self.requests
    }

    pub fn clear_requests(&mut self) {
        self.requests.clear();
    }

    fn space(&self, space_id: &str) -> Option<&SpaceRecord> {
        self.spaces.iter().find(|s| s.space.id == space_id)
    }

    fn space_mut(&mut self, space_id: &str) -> Result<&mut SpaceRecord, StatusCode> {
        self.spaces
            .iter_mut()
            .find(|s| s.space.id == space_id)
            .ok_or(StatusCode::NOT_FOUND)
    }
}

pub type Db = Arc<RwLock<Cloud>>;

pub fn new_db() -> Db {
    Arc::new(RwLock::new(Cloud::default()))
}

pub fn app() -> Router {
    app_with(new_db())
}

pub fn app_with(db: Db) -> Router {
    Router::new()
        .route("/api/v3/spaces", get(list_spaces))
        .route("/api/v1/spaces", post(create_space))
        .route("/api/v1/spaces/{space_id}", patch(update_space).delete(delete_space))
        .route("/api/v1/spaces/{space_id}/tokens", post(create_claim_token))
        .route("/api/v2/spaces/{space_id}/rooms", get(list_rooms))
        .route("/api/v1/spaces/{space_id}/rooms", post(create_room))
        .route(
            "/api/v1/spaces/{space_id}/rooms/{room_id}",
            patch(update_room).delete(delete_room),
        )
        .route(
            "/api/v2/spaces/{space_id}/members",
            get(list_members).post(create_member).delete(delete_members),
        )
        .route("/api/v2/spaces/{space_id}/members/{member_id}", patch(update_member))
        .route(
            "/api/v2/spaces/{space_id}/rooms/{room_id}/members",
            get(list_room_members)
                .post(add_room_members)
                .delete(remove_room_members),
        )
        .route("/api/v3/spaces/{space_id}/rooms/{room_id}/nodes", post(list_room_nodes))
        .route(
            "/api/v1/spaces/{space_id}/rooms/{room_id}/claimed-nodes",
            post(add_room_nodes).delete(remove_room_nodes),
        )
        .route(
            "/api/v3/spaces/{space_id}/rooms/{room_id}/node-membership-rules",
            get(list_rules).post(create_rule),
        )
        .route(
            "/api/v3/spaces/{space_id}/rooms/{room_id}/node-membership-rules/{rule_id}",
            get(get_rule).put(update_rule).delete(delete_rule),
        )
        .route("/api/v2/spaces/{space_id}/integrations", get(list_integrations))
        .route(
            "/api/v2/spaces/{space_id}/channel",
            get(list_channels).post(create_channel),
        )
        .route(
            "/api/v2/spaces/{space_id}/channel/{channel_id}",
            get(get_channel)
                .put(replace_channel)
                .patch(enable_channel)
                .delete(delete_channel),
        )
        .route("/api/v2/spaces/{space_id}/invitations", get(list_invitations))
        .route("/api/v1/spaces/{space_id}/invitations", axum::routing::delete(delete_invitations))
        .layer(middleware::from_fn_with_state(db.clone(), authenticate_and_log))
        .with_state(db)
}

pub async fn run_with(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(db)).await
}

/// Serve `db` on a random local port from a background thread.
pub fn spawn(db: Db) -> std::io::Result<SocketAddr> {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = std_listener.local_addr()?;
    std_listener.set_nonblocking(true)?;

    std::thread::spawn(move || -> std::io::Result<()> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        rt.block_on(async {
            let listener = TcpListener::from_std(std_listener)?;
            run_with(listener, db).await
        })
    });

    Ok(addr)
}

async fn authenticate_and_log(State(db): State<Db>, request: Request, next: Next) -> Response {
    let line = format!(
        "{} {}",
        request.method(),
        request
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/")
    );
    db.write().await.requests.push(line);

    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Bearer ") && v.len() > "Bearer ".len());
    if !authorized {
        return (StatusCode::UNAUTHORIZED, "missing bearer token").into_response();
    }
    next.run(request).await
}

fn ids_param(query: &HashMap<String, String>, key: &str) -> Result<Vec<String>, StatusCode> {
    let raw = query.get(key).ok_or(StatusCode::BAD_REQUEST)?;
    Ok(raw
        .split(',')
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect())
}

// --- spaces ---

async fn list_spaces(State(db): State<Db>) -> Json<Vec<Space>> {
    let cloud = db.read().await;
    Json(cloud.spaces.iter().map(|s| s.space.clone()).collect())
}

async fn create_space(State(db): State<Db>, Json(input): Json<NameInput>) -> Json<Space> {
    let mut cloud = db.write().await;
    let id = cloud.seed_space(&input.name);
    let space = cloud.space(&id).map(|s| s.space.clone()).unwrap_or_default();
    Json(space)
}

async fn update_space(
    State(db): State<Db>,
    Path(space_id): Path<String>,
    Json(input): Json<NameDescriptionInput>,
) -> Result<StatusCode, StatusCode> {
    let mut cloud = db.write().await;
    let record = cloud.space_mut(&space_id)?;
    if let Some(name) = input.name {
        record.space.name = name;
    }
    if let Some(description) = input.description {
        record.space.description = description;
    }
    Ok(StatusCode::OK)
}

async fn delete_space(
    State(db): State<Db>,
    Path(space_id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    let mut cloud = db.write().await;
    let before = cloud.spaces.len();
    cloud.spaces.retain(|s| s.space.id != space_id);
    if cloud.spaces.len() == before {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(StatusCode::OK)
}

async fn create_claim_token(
    State(db): State<Db>,
    Path(space_id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let mut cloud = db.write().await;
    cloud.space_mut(&space_id)?;
    Ok(Json(json!({ "token": format!("claim-{}", Uuid::new_v4()) })))
}

// --- rooms ---

async fn list_rooms(
    State(db): State<Db>,
    Path(space_id): Path<String>,
) -> Result<Json<Vec<Room>>, StatusCode> {
    let mut cloud = db.write().await;
    let record = cloud.space_mut(&space_id)?;
    Ok(Json(record.rooms.iter().map(|r| r.room.clone()).collect()))
}

/// Like the real endpoint, ignores any description in the body.
async fn create_room(
    State(db): State<Db>,
    Path(space_id): Path<String>,
    Json(input): Json<NameInput>,
) -> Result<Json<Room>, StatusCode> {
    let mut cloud = db.write().await;
    let record = cloud.space_mut(&space_id)?;
    let room = Room {
        id: Uuid::new_v4().to_string(),
        name: input.name,
        description: String::new(),
    };
    record.rooms.push(RoomRecord {
        room: room.clone(),
        ..RoomRecord::default()
    });
    Ok(Json(room))
}

async fn update_room(
    State(db): State<Db>,
    Path((space_id, room_id)): Path<(String, String)>,
    Json(input): Json<NameDescriptionInput>,
) -> Result<StatusCode, StatusCode> {
    let mut cloud = db.write().await;
    let room = &mut cloud.space_mut(&space_id)?.room_mut(&room_id)?.room;
    if let Some(name) = input.name {
        room.name = name;
    }
    if let Some(description) = input.description {
        room.description = description;
    }
    Ok(StatusCode::OK)
}

async fn delete_room(
    State(db): State<Db>,
    Path((space_id, room_id)): Path<(String, String)>,
) -> Result<StatusCode, StatusCode> {
    let mut cloud = db.write().await;
    let record = cloud.space_mut(&space_id)?;
    let before = record.rooms.len();
    record.rooms.retain(|r| r.room.id != room_id);
    if record.rooms.len() == before {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(StatusCode::OK)
}

// --- space members ---

async fn list_members(
    State(db): State<Db>,
    Path(space_id): Path<String>,
) -> Result<Json<Vec<Member>>, StatusCode> {
    let mut cloud = db.write().await;
    Ok(Json(cloud.space_mut(&space_id)?.members.clone()))
}

async fn create_member(
    State(db): State<Db>,
    Path(space_id): Path<String>,
    Json(input): Json<MemberInput>,
) -> Result<Json<Member>, StatusCode> {
    let mut cloud = db.write().await;
    let record = cloud.space_mut(&space_id)?;
    if record.members.iter().any(|m| m.email == input.email) {
        return Err(StatusCode::CONFLICT);
    }
    let member = Member {
        member_id: Uuid::new_v4().to_string(),
        email: input.email,
        role: input.role,
    };
    record.members.push(member.clone());
    Ok(Json(member))
}

async fn update_member(
    State(db): State<Db>,
    Path((space_id, member_id)): Path<(String, String)>,
    Json(input): Json<RoleInput>,
) -> Result<StatusCode, StatusCode> {
    let mut cloud = db.write().await;
    let member = cloud
        .space_mut(&space_id)?
        .members
        .iter_mut()
        .find(|m| m.member_id == member_id)
        .ok_or(StatusCode::NOT_FOUND)?;
    member.role = input.role;
    Ok(StatusCode::OK)
}

async fn delete_members(
    State(db): State<Db>,
    Path(space_id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<StatusCode, StatusCode> {
    let ids = ids_param(&query, "member_ids")?;
    let mut cloud = db.write().await;
    let record = cloud.space_mut(&space_id)?;
    let before = record.members.len();
    record.members.retain(|m| !ids.contains(&m.member_id));
    if record.members.len() == before {
        return Err(StatusCode::NOT_FOUND);
    }
    for room in &mut record.rooms {
        room.members.retain(|m| !ids.contains(m));
    }
    Ok(StatusCode::OK)
}

// --- room members ---

async fn list_room_members(
    State(db): State<Db>,
    Path((space_id, room_id)): Path<(String, String)>,
) -> Result<Json<Value>, StatusCode> {
    let mut cloud = db.write().await;
    let room = cloud.space_mut(&space_id)?.room_mut(&room_id)?;
    let members: Vec<Value> = room
        .members
        .iter()
        .map(|id| json!({ "memberID": id }))
        .collect();
    Ok(Json(Value::Array(members)))
}

async fn add_room_members(
    State(db): State<Db>,
    Path((space_id, room_id)): Path<(String, String)>,
    Json(ids): Json<Vec<String>>,
) -> Result<StatusCode, StatusCode> {
    let mut cloud = db.write().await;
    let record = cloud.space_mut(&space_id)?;
    if !ids
        .iter()
        .all(|id| record.members.iter().any(|m| &m.member_id == id))
    {
        return Err(StatusCode::BAD_REQUEST);
    }
    let room = record.room_mut(&room_id)?;
    for id in ids {
        if !room.members.contains(&id) {
            room.members.push(id);
        }
    }
    Ok(StatusCode::OK)
}

async fn remove_room_members(
    State(db): State<Db>,
    Path((space_id, room_id)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<StatusCode, StatusCode> {
    let ids = ids_param(&query, "member_ids")?;
    let mut cloud = db.write().await;
    let room = cloud.space_mut(&space_id)?.room_mut(&room_id)?;
    let before = room.members.len();
    room.members.retain(|m| !ids.contains(m));
    if room.members.len() == before {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(StatusCode::OK)
}

// --- nodes ---

async fn list_room_nodes(
    State(db): State<Db>,
    Path((space_id, room_id)): Path<(String, String)>,
) -> Result<Json<Value>, StatusCode> {
    let mut cloud = db.write().await;
    let nodes = cloud.space_mut(&space_id)?.room_nodes(&room_id)?;
    Ok(Json(json!({ "nodes": nodes })))
}

async fn add_room_nodes(
    State(db): State<Db>,
    Path((space_id, room_id)): Path<(String, String)>,
    Json(ids): Json<Vec<String>>,
) -> Result<StatusCode, StatusCode> {
    let mut cloud = db.write().await;
    let record = cloud.space_mut(&space_id)?;
    if !ids.iter().all(|id| record.nodes.iter().any(|n| &n.id == id)) {
        return Err(StatusCode::BAD_REQUEST);
    }
    let room = record.room_mut(&room_id)?;
    for id in ids {
        if !room.nodes.contains(&id) {
            room.nodes.push(id);
        }
    }
    Ok(StatusCode::OK)
}

async fn remove_room_nodes(
    State(db): State<Db>,
    Path((space_id, room_id)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<StatusCode, StatusCode> {
    let ids = ids_param(&query, "node_ids")?;
    let mut cloud = db.write().await;
    let room = cloud.space_mut(&space_id)?.room_mut(&room_id)?;
    let before = room.nodes.len();
    room.nodes.retain(|n| !ids.contains(n));
    if room.nodes.len() == before {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(StatusCode::OK)
}

// --- node membership rules ---

async fn list_rules(
    State(db): State<Db>,
    Path((space_id, room_id)): Path<(String, String)>,
) -> Result<Json<Vec<Rule>>, StatusCode> {
    let mut cloud = db.write().await;
    let room = cloud.space_mut(&space_id)?.room_mut(&room_id)?;
    Ok(Json(room.rules.clone()))
}

async fn create_rule(
    State(db): State<Db>,
    Path((space_id, room_id)): Path<(String, String)>,
    Json(input): Json<RuleInput>,
) -> Result<(StatusCode, Json<Rule>), StatusCode> {
    if input.clauses.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let mut cloud = db.write().await;
    let room = cloud.space_mut(&space_id)?.room_mut(&room_id)?;
    let rule = Rule {
        id: Uuid::new_v4(),
        action: input.action,
        description: input.description,
        clauses: input.clauses,
    };
    room.rules.push(rule.clone());
    Ok((StatusCode::CREATED, Json(rule)))
}

async fn get_rule(
    State(db): State<Db>,
    Path((space_id, room_id, rule_id)): Path<(String, String, Uuid)>,
) -> Result<Json<Rule>, StatusCode> {
    let mut cloud = db.write().await;
    let room = cloud.space_mut(&space_id)?.room_mut(&room_id)?;
    room.rules
        .iter()
        .find(|r| r.id == rule_id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn update_rule(
    State(db): State<Db>,
    Path((space_id, room_id, rule_id)): Path<(String, String, Uuid)>,
    Json(input): Json<RuleInput>,
) -> Result<Json<Rule>, StatusCode> {
    let mut cloud = db.write().await;
    let room = cloud.space_mut(&space_id)?.room_mut(&room_id)?;
    let rule = room
        .rules
        .iter_mut()
        .find(|r| r.id == rule_id)
        .ok_or(StatusCode::NOT_FOUND)?;
    rule.action = input.action;
    rule.description = input.description;
    rule.clauses = input.clauses;
    Ok(Json(rule.clone()))
}

async fn delete_rule(
    State(db): State<Db>,
    Path((space_id, room_id, rule_id)): Path<(String, String, Uuid)>,
) -> Result<StatusCode, StatusCode> {
    let mut cloud = db.write().await;
    let room = cloud.space_mut(&space_id)?.room_mut(&room_id)?;
    let before = room.rules.len();
    room.rules.retain(|r| r.id != rule_id);
    if room.rules.len() == before {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(StatusCode::NO_CONTENT)
}

// --- notification channels ---

async fn list_integrations(
    State(db): State<Db>,
    Path(space_id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let mut cloud = db.write().await;
    let record = cloud.space_mut(&space_id)?;
    Ok(Json(json!({ "integrations": record.integrations })))
}

/// Summaries only; secrets are served by the detail endpoint.
async fn list_channels(
    State(db): State<Db>,
    Path(space_id): Path<String>,
) -> Result<Json<Vec<Channel>>, StatusCode> {
    let mut cloud = db.write().await;
    let record = cloud.space_mut(&space_id)?;
    let summaries = record
        .channels
        .iter()
        .cloned()
        .map(|mut c| {
            c.secrets = Value::Null;
            c
        })
        .collect();
    Ok(Json(summaries))
}

/// New channels start disabled; the enabled flag is only set by PATCH.
async fn create_channel(
    State(db): State<Db>,
    Path(space_id): Path<String>,
    Json(input): Json<ChannelInput>,
) -> Result<Json<Channel>, StatusCode> {
    let mut cloud = db.write().await;
    let record = cloud.space_mut(&space_id)?;
    let integration_id = input.integration_id.ok_or(StatusCode::BAD_REQUEST)?;
    let integration = record
        .integrations
        .iter()
        .find(|i| i.id == integration_id)
        .cloned()
        .ok_or(StatusCode::BAD_REQUEST)?;
    let channel = Channel {
        id: Uuid::new_v4().to_string(),
        name: input.name,
        enabled: false,
        integration,
        alarms: input.alarms,
        rooms: input.rooms,
        secrets: input.secrets,
        repeat_notification_minute: input.repeat_notification_minute,
    };
    record.channels.push(channel.clone());
    Ok(Json(channel))
}

async fn get_channel(
    State(db): State<Db>,
    Path((space_id, channel_id)): Path<(String, String)>,
) -> Result<Json<Channel>, StatusCode> {
    let mut cloud = db.write().await;
    let channel = cloud.space_mut(&space_id)?.channel_mut(&channel_id)?;
    Ok(Json(channel.clone()))
}

async fn replace_channel(
    State(db): State<Db>,
    Path((space_id, channel_id)): Path<(String, String)>,
    Json(input): Json<ChannelInput>,
) -> Result<Json<Channel>, StatusCode> {
    let mut cloud = db.write().await;
    let record = cloud.space_mut(&space_id)?;
    let integration = match input.integration_id {
        Some(id) => Some(
            record
                .integrations
                .iter()
                .find(|i| i.id == id)
                .cloned()
                .ok_or(StatusCode::BAD_REQUEST)?,
        ),
        None => None,
    };
    let channel = record.channel_mut(&channel_id)?;
    channel.name = input.name;
    channel.alarms = input.alarms;
    channel.rooms = input.rooms;
    channel.secrets = input.secrets;
    channel.repeat_notification_minute = input.repeat_notification_minute;
    if let Some(integration) = integration {
        channel.integration = integration;
    }
    Ok(Json(channel.clone()))
}

async fn enable_channel(
    State(db): State<Db>,
    Path((space_id, channel_id)): Path<(String, String)>,
    Json(input): Json<EnabledInput>,
) -> Result<StatusCode, StatusCode> {
    let mut cloud = db.write().await;
    cloud.space_mut(&space_id)?.channel_mut(&channel_id)?.enabled = input.enabled;
    Ok(StatusCode::OK)
}

async fn delete_channel(
    State(db): State<Db>,
    Path((space_id, channel_id)): Path<(String, String)>,
) -> Result<StatusCode, StatusCode> {
    let mut cloud = db.write().await;
    let record = cloud.space_mut(&space_id)?;
    let before = record.channels.len();
    record.channels.retain(|c| c.id != channel_id);
    if record.channels.len() == before {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(StatusCode::OK)
}

// --- invitations ---

async fn list_invitations(
    State(db): State<Db>,
    Path(space_id): Path<String>,
) -> Result<Json<Vec<Invitation>>, StatusCode> {
    let mut cloud = db.write().await;
    Ok(Json(cloud.space_mut(&space_id)?.invitations.clone()))
}

async fn delete_invitations(
    State(db): State<Db>,
    Path(space_id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<StatusCode, StatusCode> {
    let ids = ids_param(&query, "invitation_ids")?;
    let mut cloud = db.write().await;
    let record = cloud.space_mut(&space_id)?;
    record.invitations.retain(|i| !ids.contains(&i.id));
    Ok(StatusCode::OK)
}

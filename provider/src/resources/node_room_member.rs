//! `netdata_node_room_member`: nodes placed in a room by name, plus the
//! membership rules that let the service place further nodes on its own.

use netdata_core::{
    ClauseOperator, MembershipRuleInput, NetdataClient, NodeMembershipClause, NodeMembershipRule,
    RoomNodes, RuleAction,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use super::Resource;
use crate::error::{split_import_id, ApiResultExt, ProviderError};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeRoomMemberState {
    pub space_id: String,
    pub room_id: String,
    #[serde(default)]
    pub node_names: Vec<String>,
    #[serde(default, rename = "rule")]
    pub rules: Vec<RuleState>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleState {
    /// Empty until the service assigns one.
    #[serde(default)]
    pub id: String,
    pub action: RuleAction,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "clause")]
    pub clauses: Vec<RuleClauseState>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleClauseState {
    pub label: String,
    pub operator: ClauseOperator,
    pub value: String,
    #[serde(default)]
    pub negate: bool,
}

impl RuleState {
    fn input(&self) -> MembershipRuleInput {
        MembershipRuleInput {
            action: self.action,
            description: self.description.clone(),
            clauses: self
                .clauses
                .iter()
                .map(|c| NodeMembershipClause {
                    label: c.label.clone(),
                    operator: c.operator,
                    value: c.value.clone(),
                    negate: c.negate,
                })
                .collect(),
        }
    }

    fn from_rule(rule: NodeMembershipRule) -> Self {
        Self {
            id: rule.id.to_string(),
            action: rule.action,
            description: rule.description,
            clauses: rule
                .clauses
                .into_iter()
                .map(|c| RuleClauseState {
                    label: c.label,
                    operator: c.operator,
                    value: c.value,
                    negate: c.negate,
                })
                .collect(),
        }
    }

    /// Planned rules only carry the id, action and description back; the
    /// clauses stay as planned.
    fn with_assigned(&self, rule: &NodeMembershipRule) -> Self {
        Self {
            id: rule.id.to_string(),
            action: rule.action,
            description: rule.description.clone(),
            clauses: self.clauses.clone(),
        }
    }

    fn is(&self, id: &Uuid) -> bool {
        Uuid::parse_str(&self.id).is_ok_and(|own| own == *id)
    }
}

fn has_rule(rules: &[RuleState], id: &str) -> bool {
    !id.is_empty() && rules.iter().any(|r| r.id == id)
}

#[derive(Debug, Clone)]
pub struct NodeRoomMemberResource {
    client: NetdataClient,
}

impl NodeRoomMemberResource {
    pub fn new(client: NetdataClient) -> Self {
        Self { client }
    }

    fn all_nodes(&self, space_id: &str) -> Result<RoomNodes, ProviderError> {
        self.client
            .all_nodes(space_id)
            .context(|| format!("Could not list all nodes of space_id: {space_id}"))
    }

    /// Resolve every planned name to the id of a reachable node before any
    /// write is attempted.
    fn precheck(&self, plan: &NodeRoomMemberState, all: &RoomNodes) -> Result<Vec<String>, ProviderError> {
        plan.node_names
            .iter()
            .map(|name| {
                all.find_by_name(name, true)
                    .map(|node| node.node_id.clone())
                    .ok_or_else(|| ProviderError::UnreachableNode {
                        node: name.clone(),
                        space_id: plan.space_id.clone(),
                    })
            })
            .collect()
    }

    fn add_nodes(&self, plan: &NodeRoomMemberState, node_ids: &[String]) -> Result<(), ProviderError> {
        for node_id in node_ids {
            debug!(space_id = %plan.space_id, room_id = %plan.room_id, node_id = %node_id, "adding node to room");
            self.client
                .add_node_to_room(&plan.space_id, &plan.room_id, node_id)
                .context(|| {
                    format!(
                        "Could not add node to room space_id/room_id/node_id: {}/{}/{}",
                        plan.space_id, plan.room_id, node_id
                    )
                })?;
        }
        Ok(())
    }

    fn remove_node(&self, state: &NodeRoomMemberState, node_id: &str) -> Result<(), ProviderError> {
        debug!(space_id = %state.space_id, room_id = %state.room_id, node_id = %node_id, "removing node from room");
        self.client
            .remove_node_from_room(&state.space_id, &state.room_id, node_id)
            .context(|| {
                format!(
                    "Could not remove node from room space_id/room_id/node_id: {}/{}/{}",
                    state.space_id, state.room_id, node_id
                )
            })
    }

    fn create_rule(&self, plan: &NodeRoomMemberState, rule: &RuleState) -> Result<RuleState, ProviderError> {
        let created = self
            .client
            .create_membership_rule(&plan.space_id, &plan.room_id, &rule.input())
            .context(|| {
                format!(
                    "Could not create node membership rule for space_id/room_id: {}/{}",
                    plan.space_id, plan.room_id
                )
            })?;
        Ok(rule.with_assigned(&created))
    }

    fn delete_rule(&self, state: &NodeRoomMemberState, rule_id: &str) -> Result<(), ProviderError> {
        self.client
            .delete_membership_rule(&state.space_id, &state.room_id, rule_id)
            .context(|| {
                format!(
                    "Could not delete node membership rule space_id/room_id/rule_id: {}/{}/{}",
                    state.space_id, state.room_id, rule_id
                )
            })
    }
}

impl Resource for NodeRoomMemberResource {
    type State = NodeRoomMemberState;

    const TYPE_NAME: &'static str = "netdata_node_room_member";

    fn validate(&self, plan: &NodeRoomMemberState) -> Result<(), ProviderError> {
        if plan.rules.iter().any(|rule| rule.clauses.is_empty()) {
            return Err(ProviderError::Validation(
                "rule: every rule needs at least one clause".to_string(),
            ));
        }
        Ok(())
    }

    fn create(&self, plan: &NodeRoomMemberState) -> Result<NodeRoomMemberState, ProviderError> {
        self.validate(plan)?;
        info!(
            space_id = %plan.space_id,
            room_id = %plan.room_id,
            node_names = ?plan.node_names,
            "creating node room member"
        );
        let all = self.all_nodes(&plan.space_id)?;
        let node_ids = self.precheck(plan, &all)?;
        self.add_nodes(plan, &node_ids)?;

        let rules = plan
            .rules
            .iter()
            .map(|rule| self.create_rule(plan, rule))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(NodeRoomMemberState {
            rules,
            ..plan.clone()
        })
    }

    fn read(&self, state: &NodeRoomMemberState) -> Result<Option<NodeRoomMemberState>, ProviderError> {
        let context = || {
            format!(
                "Could not read node room member space_id/room_id: {}/{}",
                state.space_id, state.room_id
            )
        };
        let in_room = self
            .client
            .room_nodes(&state.space_id, &state.room_id)
            .context(context)?;
        let node_names = state
            .node_names
            .iter()
            .filter(|name| in_room.find_by_name(name, false).is_some())
            .cloned()
            .collect();

        let current = self
            .client
            .list_membership_rules(&state.space_id, &state.room_id)
            .context(context)?;
        let mut rules = Vec::new();
        for rule in &state.rules {
            if !current.iter().any(|c| rule.is(&c.id)) {
                continue;
            }
            let fetched = self
                .client
                .get_membership_rule(&state.space_id, &state.room_id, &rule.id)
                .context(|| {
                    format!(
                        "Could not read node membership rule space_id/room_id/rule_id: {}/{}/{}",
                        state.space_id, state.room_id, rule.id
                    )
                })?;
            rules.push(RuleState::from_rule(fetched));
        }

        Ok(Some(NodeRoomMemberState {
            space_id: state.space_id.clone(),
            room_id: state.room_id.clone(),
            node_names,
            rules,
        }))
    }

    /// Dropped nodes and rules are removed, planned nodes are (re-)added,
    /// kept rules are replaced in place and new rules are created.
    fn update(
        &self,
        plan: &NodeRoomMemberState,
        state: &NodeRoomMemberState,
    ) -> Result<NodeRoomMemberState, ProviderError> {
        self.validate(plan)?;
        info!(
            space_id = %plan.space_id,
            room_id = %plan.room_id,
            node_names = ?plan.node_names,
            "updating node room member"
        );
        let all = self.all_nodes(&plan.space_id)?;
        let node_ids = self.precheck(plan, &all)?;

        for name in state.node_names.iter().filter(|n| !plan.node_names.contains(n)) {
            if let Some(node) = all.find_by_name(name, false) {
                self.remove_node(state, &node.node_id)?;
            }
        }
        self.add_nodes(plan, &node_ids)?;

        for rule in state.rules.iter().filter(|r| !has_rule(&plan.rules, &r.id)) {
            self.delete_rule(state, &rule.id)?;
        }

        let mut rules = Vec::with_capacity(plan.rules.len());
        for rule in &plan.rules {
            let rule = if has_rule(&state.rules, &rule.id) {
                let updated = self
                    .client
                    .update_membership_rule(&plan.space_id, &plan.room_id, &rule.id, &rule.input())
                    .context(|| {
                        format!(
                            "Could not update node membership rule space_id/room_id/rule_id: {}/{}/{}",
                            plan.space_id, plan.room_id, rule.id
                        )
                    })?;
                rule.with_assigned(&updated)
            } else {
                self.create_rule(plan, rule)?
            };
            rules.push(rule);
        }

        Ok(NodeRoomMemberState {
            rules,
            ..plan.clone()
        })
    }

    fn delete(&self, state: &NodeRoomMemberState) -> Result<(), ProviderError> {
        info!(space_id = %state.space_id, room_id = %state.room_id, "deleting node room member");
        let in_room = self
            .client
            .room_nodes(&state.space_id, &state.room_id)
            .context(|| {
                format!(
                    "Could not read node room member space_id/room_id: {}/{}",
                    state.space_id, state.room_id
                )
            })?;
        for name in &state.node_names {
            if let Some(node) = in_room.find_by_name(name, false) {
                self.remove_node(state, &node.node_id)?;
            }
        }
        for rule in &state.rules {
            self.delete_rule(state, &rule.id)?;
        }
        Ok(())
    }

    fn import(&self, id: &str) -> Result<NodeRoomMemberState, ProviderError> {
        let [space_id, room_id] = split_import_id(id, "space_id,room_id")?;
        Ok(NodeRoomMemberState {
            space_id,
            room_id,
            ..NodeRoomMemberState::default()
        })
    }
}

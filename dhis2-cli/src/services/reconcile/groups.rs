//! Group membership diffing
//!
//! For every existing group: members claimed by this import are removed, then
//! every imported entity assigned to the group by name is appended. Only
//! groups whose member set actually changed are returned, so groups the
//! import does not touch never leave the client.

use std::collections::HashSet;

use crate::api::metadata::{D2DataElementGroup, D2IndicatorGroup, Ref};

/// A server group with a mutable member list
pub trait MemberGroup: Clone {
    fn name(&self) -> &str;
    fn members(&self) -> &[Ref];
    fn set_members(&mut self, members: Vec<Ref>);
}

impl MemberGroup for D2DataElementGroup {
    fn name(&self) -> &str {
        &self.name
    }

    fn members(&self) -> &[Ref] {
        &self.data_elements
    }

    fn set_members(&mut self, members: Vec<Ref>) {
        self.data_elements = members;
    }
}

impl MemberGroup for D2IndicatorGroup {
    fn name(&self) -> &str {
        &self.name
    }

    fn members(&self) -> &[Ref] {
        &self.indicators
    }

    fn set_members(&mut self, members: Vec<Ref>) {
        self.indicators = members;
    }
}

/// Groups an imported entity is assigned to
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment<'a> {
    pub id: &'a str,
    pub groups: Vec<&'a str>,
}

fn id_set(members: &[Ref]) -> HashSet<&str> {
    members.iter().map(|member| member.id.as_str()).collect()
}

/// Order-insensitive comparison of two member lists by id
pub fn has_changes(before: &[Ref], after: &[Ref]) -> bool {
    id_set(before) != id_set(after)
}

/// Compute the groups whose membership changes with this import
pub fn diff_groups<G: MemberGroup>(current: &[G], assignments: &[Assignment<'_>]) -> Vec<G> {
    let claimed: HashSet<&str> = assignments.iter().map(|a| a.id).collect();

    current
        .iter()
        .filter_map(|group| {
            let mut members: Vec<Ref> = group
                .members()
                .iter()
                .filter(|member| !claimed.contains(member.id.as_str()))
                .cloned()
                .collect();

            members.extend(
                assignments
                    .iter()
                    .filter(|a| a.groups.contains(&group.name()))
                    .map(|a| Ref::new(a.id)),
            );

            if has_changes(group.members(), &members) {
                log::debug!(
                    "Group '{}': {} -> {} members",
                    group.name(),
                    group.members().len(),
                    members.len()
                );
                let mut updated = group.clone();
                updated.set_members(members);
                Some(updated)
            } else {
                None
            }
        })
        .collect()
}

//! Group membership evaluation
//!
//! Groups store a filter; the membership resolver turns that filter into a
//! predicate the directory can run.

use crate::error::Result;
use crate::predicate::DevicePredicate;
use golden_types::{Group, GroupFilter};

/// Evaluates a group's stored filter
pub trait GroupMembershipResolver: Send + Sync {
    /// Predicate selecting the members of `group`
    fn evaluate(&self, group: &Group) -> Result<DevicePredicate>;
}

/// Resolver that translates [`GroupFilter`] fields one to one
#[derive(Debug, Default, Clone, Copy)]
pub struct FilterMembershipResolver;

impl FilterMembershipResolver {
    pub fn new() -> Self {
        Self
    }

    /// Translate a filter; a trivial filter becomes [`DevicePredicate::All`]
    pub fn predicate_for(filter: &GroupFilter) -> DevicePredicate {
        let fields = filter
            .fields
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(field, values)| DevicePredicate::field_in(*field, values.iter().cloned()));

        let mut constraints: Vec<DevicePredicate> = fields.collect();
        if !filter.tags.is_empty() {
            constraints.push(DevicePredicate::tag_in(filter.tags.iter().cloned()));
        }
        if !filter.devices.is_empty() {
            constraints.push(DevicePredicate::id_in(filter.devices.iter().cloned()));
        }

        DevicePredicate::all_of(constraints)
    }
}

impl GroupMembershipResolver for FilterMembershipResolver {
    fn evaluate(&self, group: &Group) -> Result<DevicePredicate> {
        Ok(Self::predicate_for(&group.filter))
    }
}

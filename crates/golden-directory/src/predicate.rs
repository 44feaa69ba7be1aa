//! Device query predicates
//!
//! A [`DevicePredicate`] is a small query language over device attributes.
//! Backends either translate it into their native query form or evaluate
//! it in memory with [`DevicePredicate::matches`].

use golden_types::{Device, DeviceField, DeviceId};
use std::collections::BTreeSet;

/// Boolean query over devices
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DevicePredicate {
    /// Matches every device
    All,

    /// Matches no device
    Nothing,

    /// Attribute reference is one of `values`
    FieldIn {
        field: DeviceField,
        values: BTreeSet<String>,
    },

    /// Device carries at least one of the tags
    TagIn(BTreeSet<String>),

    /// Device identifier is one of the ids
    IdIn(BTreeSet<DeviceId>),

    /// Device has no platform assigned
    PlatformMissing,

    /// Every inner predicate matches
    And(Vec<DevicePredicate>),

    /// At least one inner predicate matches
    Or(Vec<DevicePredicate>),
}

impl DevicePredicate {
    pub fn field_in(
        field: DeviceField,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self::FieldIn {
            field,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn tag_in(tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::TagIn(tags.into_iter().map(Into::into).collect())
    }

    pub fn id_in(ids: impl IntoIterator<Item = DeviceId>) -> Self {
        Self::IdIn(ids.into_iter().collect())
    }

    /// AND-combine with another predicate
    pub fn and(self, other: DevicePredicate) -> Self {
        match (self, other) {
            (DevicePredicate::All, p) | (p, DevicePredicate::All) => p,
            (DevicePredicate::Nothing, _) | (_, DevicePredicate::Nothing) => {
                DevicePredicate::Nothing
            }
            (DevicePredicate::And(mut left), DevicePredicate::And(right)) => {
                left.extend(right);
                DevicePredicate::And(left)
            }
            (DevicePredicate::And(mut left), p) => {
                left.push(p);
                DevicePredicate::And(left)
            }
            (p, DevicePredicate::And(mut right)) => {
                right.insert(0, p);
                DevicePredicate::And(right)
            }
            (left, right) => DevicePredicate::And(vec![left, right]),
        }
    }

    /// OR-combine with another predicate
    pub fn or(self, other: DevicePredicate) -> Self {
        match (self, other) {
            (DevicePredicate::Nothing, p) | (p, DevicePredicate::Nothing) => p,
            (DevicePredicate::All, _) | (_, DevicePredicate::All) => DevicePredicate::All,
            (DevicePredicate::Or(mut left), DevicePredicate::Or(right)) => {
                left.extend(right);
                DevicePredicate::Or(left)
            }
            (DevicePredicate::Or(mut left), p) => {
                left.push(p);
                DevicePredicate::Or(left)
            }
            (p, DevicePredicate::Or(mut right)) => {
                right.insert(0, p);
                DevicePredicate::Or(right)
            }
            (left, right) => DevicePredicate::Or(vec![left, right]),
        }
    }

    /// AND of all predicates; `All` when empty
    pub fn all_of(predicates: impl IntoIterator<Item = DevicePredicate>) -> Self {
        predicates
            .into_iter()
            .fold(DevicePredicate::All, DevicePredicate::and)
    }

    /// OR of all predicates; `Nothing` when empty
    pub fn any_of(predicates: impl IntoIterator<Item = DevicePredicate>) -> Self {
        predicates
            .into_iter()
            .fold(DevicePredicate::Nothing, DevicePredicate::or)
    }

    /// Evaluate against a device in memory
    pub fn matches(&self, device: &Device) -> bool {
        match self {
            DevicePredicate::All => true,
            DevicePredicate::Nothing => false,
            DevicePredicate::FieldIn { field, values } => device
                .attribute(*field)
                .is_some_and(|value| values.contains(value)),
            DevicePredicate::TagIn(tags) => device.tags.iter().any(|t| tags.contains(t)),
            DevicePredicate::IdIn(ids) => ids.contains(&device.id),
            DevicePredicate::PlatformMissing => device.platform().is_none(),
            DevicePredicate::And(inner) => inner.iter().all(|p| p.matches(device)),
            DevicePredicate::Or(inner) => inner.iter().any(|p| p.matches(device)),
        }
    }
}

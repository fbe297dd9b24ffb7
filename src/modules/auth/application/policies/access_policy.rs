use std::collections::HashMap;
use thiserror::Error;

use crate::auth::application::domain::entities::{Identity, Role};
use crate::modules::lifecycle::application::domain::{EntityKind, Operation};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("role {role} may not {operation} {entity}")]
pub struct AccessDenied {
    pub role: Role,
    pub entity: &'static str,
    pub operation: Operation,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyParseError {
    #[error("malformed rule '{0}', expected entity.operation=Role|Role")]
    MalformedRule(String),

    #[error("{0}")]
    UnknownName(String),
}

/// Pure role check. No IO, no panics.
pub fn require_role(identity: &Identity, allowed: &[Role]) -> bool {
    allowed.contains(&identity.role)
}

/// The single table answering "may this role run this operation on this entity".
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    rules: HashMap<(EntityKind, Operation), Vec<Role>>,
}

impl AccessPolicy {
    pub fn defaults() -> Self {
        use Operation::*;
        use Role::*;

        let mut rules = HashMap::new();
        let staff = vec![Manager, Admin];
        let admin_only = vec![Admin];

        for kind in [EntityKind::Category, EntityKind::Product] {
            for op in [Create, Get, ListActive, ListDeleted, Update, SoftDelete, Restore] {
                rules.insert((kind, op), staff.clone());
            }
            for op in [Purge, PurgeAllDeleted, RestoreAllDeleted] {
                rules.insert((kind, op), admin_only.clone());
            }
        }
        rules.insert(
            (EntityKind::Product, Get),
            vec![Seller, Manager, Admin],
        );

        for op in Operation::ALL {
            rules.insert((EntityKind::User, op), admin_only.clone());
        }
        rules.insert((EntityKind::User, Get), Role::ALL.to_vec());
        rules.insert((EntityKind::User, Update), Role::ALL.to_vec());

        Self { rules }
    }

    /// Applies `entity.operation=Role|Role` rules separated by `;` on top of the defaults.
    pub fn with_overrides(overrides: &str) -> Result<Self, PolicyParseError> {
        let mut policy = Self::defaults();

        for rule in overrides.split(';').map(str::trim).filter(|r| !r.is_empty()) {
            let (target, roles) = rule
                .split_once('=')
                .ok_or_else(|| PolicyParseError::MalformedRule(rule.to_string()))?;
            let (entity, operation) = target
                .split_once('.')
                .ok_or_else(|| PolicyParseError::MalformedRule(rule.to_string()))?;

            let kind: EntityKind = entity.parse().map_err(PolicyParseError::UnknownName)?;
            let op: Operation = operation.parse().map_err(PolicyParseError::UnknownName)?;
            let roles = roles
                .split('|')
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(|r| r.parse::<Role>().map_err(PolicyParseError::UnknownName))
                .collect::<Result<Vec<_>, _>>()?;

            policy.rules.insert((kind, op), roles);
        }

        Ok(policy)
    }

    pub fn allowed_roles(&self, kind: EntityKind, op: Operation) -> &[Role] {
        self.rules
            .get(&(kind, op))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn authorize(
        &self,
        identity: &Identity,
        kind: EntityKind,
        op: Operation,
    ) -> Result<(), AccessDenied> {
        if require_role(identity, self.allowed_roles(kind, op)) {
            Ok(())
        } else {
            Err(AccessDenied {
                role: identity.role,
                entity: kind.as_str(),
                operation: op,
            })
        }
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::defaults()
    }
}

//! Permission-gated secret resolution
//!
//! A caller either bypasses the check (superuser, or the capability is
//! exempt), holds `extras.view_secretsgroup`, or receives a denial string in
//! place of the value. The denial is the same whether or not the group or
//! secret exists.

use golden_directory::{
    AuthorizationOracle, DeviceDirectory, SecretError, SecretStore, VIEW_SECRETS_GROUP,
};
use golden_types::{AccessType, Principal, SecretType, SecretsGroupId};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Text rendered in place of a secret the caller may not read
pub fn denial_message(group: &SecretsGroupId) -> String {
    format!("You have no permission to read this secret {group}.")
}

/// Resolves secrets on behalf of a principal
#[derive(Clone)]
pub struct SecretResolver {
    directory: Arc<dyn DeviceDirectory>,
    authorization: Arc<dyn AuthorizationOracle>,
    store: Arc<dyn SecretStore>,
}

impl SecretResolver {
    pub fn new(
        directory: Arc<dyn DeviceDirectory>,
        authorization: Arc<dyn AuthorizationOracle>,
        store: Arc<dyn SecretStore>,
    ) -> Self {
        Self {
            directory,
            authorization,
            store,
        }
    }

    /// Whether `principal` may read secrets at all
    pub fn is_permitted(&self, principal: &Principal) -> bool {
        if principal.is_superuser() || self.authorization.is_exempt(VIEW_SECRETS_GROUP) {
            return true;
        }
        principal.is_authenticated()
            && self
                .authorization
                .has_capability(principal, VIEW_SECRETS_GROUP)
    }

    /// Secret value for (`access_type`, `secret_type`) in `group`
    ///
    /// Returns [`denial_message`] as a successful value when the caller
    /// lacks permission. Lookup and provider failures are only reachable by
    /// permitted callers and propagate unchanged.
    #[instrument(skip(self, principal), fields(user = %principal))]
    pub fn resolve_secret(
        &self,
        principal: &Principal,
        group: &SecretsGroupId,
        secret_type: SecretType,
        access_type: AccessType,
    ) -> Result<String, SecretError> {
        if !self.is_permitted(principal) {
            debug!(secrets_group = %group, "Secret access denied");
            return Ok(denial_message(group));
        }

        let secrets_group = self
            .directory
            .secrets_group(group)?
            .ok_or_else(|| SecretError::SecretsGroupNotFound(group.clone()))?;

        debug!(
            secrets_group = %group,
            secret_type = %secret_type,
            access_type = %access_type,
            "Resolving secret"
        );
        self.store
            .secret_value(&secrets_group, access_type, secret_type)
    }

    /// Fix the principal for every later lookup
    pub fn bind(&self, principal: Principal) -> BoundSecretResolver {
        BoundSecretResolver {
            resolver: self.clone(),
            principal,
        }
    }
}

/// [`SecretResolver`] with the calling principal fixed
///
/// This is the value handed to the template environment; templates can pick
/// the group and secret but never the principal.
#[derive(Clone)]
pub struct BoundSecretResolver {
    resolver: SecretResolver,
    principal: Principal,
}

impl BoundSecretResolver {
    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn resolve(
        &self,
        group: &SecretsGroupId,
        secret_type: SecretType,
        access_type: AccessType,
    ) -> Result<String, SecretError> {
        self.resolver
            .resolve_secret(&self.principal, group, secret_type, access_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use golden_directory::{
        EnvironmentSecretStore, InMemoryDirectory, StaticAuthorizationOracle,
        ENVIRONMENT_PROVIDER,
    };
    use golden_types::{SecretRef, SecretsGroup};

    struct Fixture {
        oracle: Arc<StaticAuthorizationOracle>,
        resolver: SecretResolver,
    }

    fn fixture() -> Fixture {
        let directory = Arc::new(InMemoryDirectory::new());
        directory.add_secrets_group(SecretsGroup::new("sg1", "Lab credentials").with_secret(
            AccessType::Generic,
            SecretType::Secret,
            SecretRef::new("lab-secret", ENVIRONMENT_PROVIDER).with_parameter("variable", "LAB_SECRET"),
        ));
        let oracle = Arc::new(StaticAuthorizationOracle::new());
        let store = Arc::new(EnvironmentSecretStore::with_lookup(|name| {
            (name == "LAB_SECRET").then(|| "supersecretvalue".to_string())
        }));
        let resolver = SecretResolver::new(directory, oracle.clone(), store);
        Fixture { oracle, resolver }
    }

    fn sg1() -> SecretsGroupId {
        SecretsGroupId::new("sg1")
    }

    #[test]
    fn test_superuser_bypasses_check() {
        let f = fixture();
        let value = f
            .resolver
            .resolve_secret(&Principal::superuser("root"), &sg1(), SecretType::Secret, AccessType::Generic)
            .unwrap();
        assert_eq!(value, "supersecretvalue");
    }

    #[test]
    fn test_user_without_capability_is_denied() {
        let f = fixture();
        let value = f
            .resolver
            .resolve_secret(&Principal::user("alice"), &sg1(), SecretType::Secret, AccessType::Generic)
            .unwrap();
        assert_eq!(value, "You have no permission to read this secret sg1.");
    }

    #[test]
    fn test_granted_user_reads_secret() {
        let f = fixture();
        f.oracle.grant("alice", VIEW_SECRETS_GROUP);
        let value = f
            .resolver
            .resolve_secret(&Principal::user("alice"), &sg1(), SecretType::Secret, AccessType::Generic)
            .unwrap();
        assert_eq!(value, "supersecretvalue");
    }

    #[test]
    fn test_anonymous_is_denied_even_with_grant() {
        let f = fixture();
        f.oracle.grant("anonymous", VIEW_SECRETS_GROUP);
        let value = f
            .resolver
            .resolve_secret(&Principal::anonymous(), &sg1(), SecretType::Secret, AccessType::Generic)
            .unwrap();
        assert_eq!(value, denial_message(&sg1()));
    }

    #[test]
    fn test_exempt_capability_bypasses_check() {
        let f = fixture();
        f.oracle.exempt(VIEW_SECRETS_GROUP);
        let value = f
            .resolver
            .resolve_secret(&Principal::anonymous(), &sg1(), SecretType::Secret, AccessType::Generic)
            .unwrap();
        assert_eq!(value, "supersecretvalue");
    }

    #[test]
    fn test_denial_hides_missing_group() {
        let f = fixture();
        let missing = SecretsGroupId::new("nope");
        let value = f
            .resolver
            .resolve_secret(&Principal::user("bob"), &missing, SecretType::Password, AccessType::Ssh)
            .unwrap();
        assert_eq!(value, denial_message(&missing));
    }

    #[test]
    fn test_missing_group_propagates_for_permitted_caller() {
        let f = fixture();
        let err = f
            .resolver
            .resolve_secret(
                &Principal::superuser("root"),
                &SecretsGroupId::new("nope"),
                SecretType::Secret,
                AccessType::Generic,
            )
            .unwrap_err();
        assert_eq!(err, SecretError::SecretsGroupNotFound(SecretsGroupId::new("nope")));
    }

    #[test]
    fn test_missing_secret_propagates() {
        let f = fixture();
        let err = f
            .resolver
            .resolve_secret(&Principal::superuser("root"), &sg1(), SecretType::Password, AccessType::Generic)
            .unwrap_err();
        assert!(matches!(err, SecretError::SecretNotFound { .. }));
    }

    #[test]
    fn test_bound_resolver_uses_fixed_principal() {
        let f = fixture();
        let bound = f.resolver.bind(Principal::user("carol"));
        assert_eq!(bound.principal().username, "carol");
        assert_eq!(
            bound.resolve(&sg1(), SecretType::Secret, AccessType::Generic).unwrap(),
            denial_message(&sg1())
        );

        f.oracle.grant("carol", VIEW_SECRETS_GROUP);
        assert_eq!(
            bound.resolve(&sg1(), SecretType::Secret, AccessType::Generic).unwrap(),
            "supersecretvalue"
        );
    }
}

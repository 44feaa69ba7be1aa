//! Template rendering engine
//!
//! Two environments are built per call:
//!
//! - the secret-aware environment: HTML autoescaping, strict undefined
//!   handling, the whitelisted encryption filters and the secret filter bound
//!   to the calling principal. Variables come from the device's context query.
//! - the plain environment: strict undefined handling only, with the device
//!   bound as `obj`.
//!
//! Engine errors are classified into [`TemplateError`] variants. When a
//! [`FailureLog`] is configured every failure is recorded against the device
//! before it is returned.

use crate::error::{Result, TemplateError};
use crate::filters::{self, SECRET_RENDER_FILTERS};
use crate::log::FailureLog;
use crate::secrets::{BoundSecretResolver, SecretResolver};
use golden_directory::{ContextData, ContextQueryExecutor};
use golden_types::{
    AccessType, Device, IntendedConfigArtifact, Principal, SecretType, SecretsGroupId,
    SettingsObject,
};
use minijinja::{context, AutoEscape, Environment, Error, ErrorKind, UndefinedBehavior};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Name of the secret lookup filter in templates
pub const SECRET_FILTER: &str = "get_secret_by_secret_group_slug";

/// Renders device templates
#[derive(Clone)]
pub struct TemplateRenderer {
    context: Arc<dyn ContextQueryExecutor>,
    secrets: SecretResolver,
    failure_log: Option<Arc<dyn FailureLog>>,
}

impl TemplateRenderer {
    pub fn new(context: Arc<dyn ContextQueryExecutor>, secrets: SecretResolver) -> Self {
        Self {
            context,
            secrets,
            failure_log: None,
        }
    }

    /// Record failures against the device before returning them
    pub fn with_failure_log(mut self, failure_log: Arc<dyn FailureLog>) -> Self {
        self.failure_log = Some(failure_log);
        self
    }

    pub fn secrets(&self) -> &SecretResolver {
        &self.secrets
    }

    /// Environment used for secret-aware rendering on behalf of `principal`
    pub fn secret_environment(&self, principal: &Principal) -> Environment<'static> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        filters::register(&mut env, &SECRET_RENDER_FILTERS);

        let bound = self.secrets.bind(principal.clone());
        env.add_filter(
            SECRET_FILTER,
            move |group: String, secret_type: String, access_type: Option<String>| {
                secret_filter(&bound, &group, &secret_type, access_type.as_deref())
            },
        );
        env
    }

    fn plain_environment() -> Environment<'static> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env
    }

    /// Render `template` with secrets, using the device's context data
    ///
    /// The template is compiled before the context query runs, so syntax
    /// errors never cost a query.
    #[instrument(skip_all, fields(device = %device.name, settings = %settings.id))]
    pub fn render(
        &self,
        template: &str,
        device: &Device,
        principal: &Principal,
        settings: &SettingsObject,
    ) -> Result<String> {
        let result = self.render_with_secrets(template, device, principal, settings);
        self.record(device, result)
    }

    fn render_with_secrets(
        &self,
        template: &str,
        device: &Device,
        principal: &Principal,
        settings: &SettingsObject,
    ) -> Result<String> {
        let env = self.secret_environment(principal);
        let compiled = env
            .template_from_str(template)
            .map_err(|err| classify(err, template))?;

        let data = match &settings.context_query {
            Some(query) => {
                debug!(query = %query.name, "Fetching context data");
                self.context.fetch(device, query)?
            }
            None => {
                debug!("Settings define no context query; rendering with empty context");
                ContextData::new()
            }
        };

        compiled.render(&data).map_err(|err| classify(err, template))
    }

    /// Render `template` without secrets, with the device bound as `obj`
    #[instrument(skip_all, fields(device = %device.name))]
    pub fn render_plain(&self, template: &str, device: &Device) -> Result<String> {
        let env = Self::plain_environment();
        let result = env
            .template_from_str(template)
            .and_then(|compiled| compiled.render(context! { obj => device }))
            .map_err(|err| classify(err, template));
        self.record(device, result)
    }

    /// Secret-aware render of `current`, or of the stored intended
    /// configuration when `current` is empty
    pub fn render_intended(
        &self,
        current: &str,
        artifact: &IntendedConfigArtifact,
        principal: &Principal,
        settings: &SettingsObject,
    ) -> Result<String> {
        let source = if current.is_empty() {
            artifact
                .intended()
                .ok_or(TemplateError::NoReferenceConfiguration)?
        } else {
            current
        };
        self.render(source, &artifact.device, principal, settings)
    }

    fn record(&self, device: &Device, result: Result<String>) -> Result<String> {
        if let (Err(err), Some(log)) = (&result, &self.failure_log) {
            log.log_failure(device, &err.log_message());
        }
        result
    }
}

fn secret_filter(
    bound: &BoundSecretResolver,
    group: &str,
    secret_type: &str,
    access_type: Option<&str>,
) -> std::result::Result<String, Error> {
    let invalid = |message: String| Error::new(ErrorKind::InvalidOperation, message);

    let secret_type: SecretType = secret_type.parse().map_err(|e| invalid(format!("{e}")))?;
    let access_type = match access_type {
        Some(label) => label.parse::<AccessType>().map_err(|e| invalid(format!("{e}")))?,
        None => AccessType::default(),
    };

    bound
        .resolve(&SecretsGroupId::new(group), secret_type, access_type)
        .map_err(|e| invalid(e.to_string()))
}

/// Map an engine error onto the template error taxonomy
fn classify(err: Error, template: &str) -> TemplateError {
    let message = err.to_string();
    let template = template.to_string();
    match err.kind() {
        ErrorKind::SyntaxError
        | ErrorKind::UnknownFilter
        | ErrorKind::UnknownTest
        | ErrorKind::UnknownFunction => TemplateError::Syntax {
            line: err.line().unwrap_or_default(),
            message,
            template,
        },
        ErrorKind::UndefinedError => TemplateError::Undefined { message, template },
        _ => TemplateError::Generic { message, template },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use golden_directory::{
        ContextError, EnvironmentSecretStore, InMemoryDirectory, StaticAuthorizationOracle,
        StaticContextExecutor, ENVIRONMENT_PROVIDER,
    };
    use golden_types::{ContextQueryRef, DeviceId, GroupId, SecretRef, SecretsGroup};
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingLog {
        entries: Mutex<Vec<(String, String)>>,
    }

    impl FailureLog for RecordingLog {
        fn log_failure(&self, device: &Device, message: &str) {
            self.entries
                .lock()
                .unwrap()
                .push((device.name.clone(), message.to_string()));
        }
    }

    fn device() -> Device {
        Device::new("1", "edge-01").with_platform("cisco_ios")
    }

    fn settings() -> SettingsObject {
        SettingsObject::new("default", GroupId::new("all"), 1)
            .with_context_query(ContextQueryRef::new("device-data", "query { device }"))
    }

    fn renderer() -> TemplateRenderer {
        let directory = Arc::new(InMemoryDirectory::new());
        directory.add_secrets_group(SecretsGroup::new("sg1", "Lab").with_secret(
            AccessType::Generic,
            SecretType::Secret,
            SecretRef::new("lab", ENVIRONMENT_PROVIDER).with_parameter("variable", "LAB"),
        ));
        let store = Arc::new(EnvironmentSecretStore::with_lookup(|_| Some("s3cr&t".into())));
        let secrets = SecretResolver::new(
            directory,
            Arc::new(StaticAuthorizationOracle::new()),
            store,
        );

        let context = Arc::new(StaticContextExecutor::new());
        context.insert_json(
            DeviceId::new("1"),
            json!({"hostname": "edge-01", "banner": "a<b"}),
        );
        TemplateRenderer::new(context, secrets)
    }

    fn root() -> Principal {
        Principal::superuser("root")
    }

    #[test]
    fn test_render_uses_context_data() {
        let out = renderer()
            .render("hostname {{ hostname }}", &device(), &root(), &settings())
            .unwrap();
        assert_eq!(out, "hostname edge-01");
    }

    #[test]
    fn test_render_autoescapes() {
        let out = renderer()
            .render("{{ banner }}", &device(), &root(), &settings())
            .unwrap();
        assert_eq!(out, "a&lt;b");
    }

    #[test]
    fn test_secret_filter_and_encryption_chain() {
        let r = renderer();
        let out = r
            .render(
                "{{ 'sg1' | get_secret_by_secret_group_slug('secret') }}",
                &device(),
                &root(),
                &settings(),
            )
            .unwrap();
        assert_eq!(out, "s3cr&amp;t");

        let out = r
            .render(
                "{{ 'sg1' | get_secret_by_secret_group_slug('secret', 'generic') | encrypt_type7(3) }}",
                &device(),
                &root(),
                &settings(),
            )
            .unwrap();
        assert_eq!(out, filters::encrypt_type7("s3cr&t", Some(3)).unwrap());
    }

    #[test]
    fn test_secret_filter_denies_plain_user() {
        let out = renderer()
            .render(
                "{{ 'sg1' | get_secret_by_secret_group_slug('secret') }}",
                &device(),
                &Principal::user("alice"),
                &settings(),
            )
            .unwrap();
        assert_eq!(out, "You have no permission to read this secret sg1.");
    }

    #[test]
    fn test_only_whitelisted_catalog_filters() {
        let err = renderer()
            .render("{{ '0822455D0A16' | decrypt_type7 }}", &device(), &root(), &settings())
            .unwrap_err();
        assert!(matches!(err, TemplateError::Syntax { .. }));
    }

    #[test]
    fn test_syntax_error_carries_line_and_template() {
        let template = "hostname {{ hostname }}\n{% if %}\n";
        let err = renderer()
            .render(template, &device(), &root(), &settings())
            .unwrap_err();
        match err {
            TemplateError::Syntax { line, template: t, .. } => {
                assert_eq!(line, 2);
                assert_eq!(t, template);
            }
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_undefined_variable() {
        let err = renderer()
            .render("{{ not_in_context }}", &device(), &root(), &settings())
            .unwrap_err();
        assert!(matches!(err, TemplateError::Undefined { .. }));
        assert_eq!(err.template(), Some("{{ not_in_context }}"));
    }

    #[test]
    fn test_filter_failure_is_generic() {
        let err = renderer()
            .render(
                "{{ 'sg1' | get_secret_by_secret_group_slug('bogus') }}",
                &device(),
                &root(),
                &settings(),
            )
            .unwrap_err();
        assert!(matches!(err, TemplateError::Generic { .. }));

        let err = renderer()
            .render("{{ 'cisco' | encrypt_type7(99) }}", &device(), &root(), &settings())
            .unwrap_err();
        assert!(matches!(err, TemplateError::Generic { .. }));
    }

    #[test]
    fn test_context_failure_propagates() {
        let stranger = Device::new("9", "stranger");
        let err = renderer()
            .render("{{ hostname }}", &stranger, &root(), &settings())
            .unwrap_err();
        assert!(matches!(err, TemplateError::Context(ContextError::QueryFailed { .. })));
    }

    #[test]
    fn test_missing_context_query_renders_static_text() {
        let bare = SettingsObject::new("bare", GroupId::new("all"), 1);
        let out = renderer()
            .render("no variables here", &device(), &root(), &bare)
            .unwrap();
        assert_eq!(out, "no variables here");
    }

    #[test]
    fn test_render_plain_binds_obj() {
        let d = Device::new("5", "core<1>");
        let out = renderer().render_plain("hostname {{ obj.name }}", &d).unwrap();
        assert_eq!(out, "hostname core<1>");
    }

    #[test]
    fn test_render_plain_has_no_secret_filter() {
        let err = renderer()
            .render_plain("{{ 'sg1' | get_secret_by_secret_group_slug('secret') }}", &device())
            .unwrap_err();
        assert!(matches!(err, TemplateError::Syntax { .. }));
    }

    #[test]
    fn test_render_intended_fallback() {
        let r = renderer();
        let artifact = IntendedConfigArtifact::new(device(), "hostname {{ hostname }}");

        assert_eq!(
            r.render_intended("", &artifact, &root(), &settings()).unwrap(),
            "hostname edge-01"
        );
        assert_eq!(
            r.render_intended("override", &artifact, &root(), &settings()).unwrap(),
            "override"
        );

        let empty = IntendedConfigArtifact::empty(device());
        assert_eq!(
            r.render_intended("", &empty, &root(), &settings()),
            Err(TemplateError::NoReferenceConfiguration)
        );
    }

    #[test]
    fn test_failures_recorded_against_device() {
        let log = Arc::new(RecordingLog::default());
        let r = renderer().with_failure_log(log.clone());

        assert!(r.render("{{ nope }}", &device(), &root(), &settings()).is_err());
        assert!(r.render("ok", &device(), &root(), &settings()).is_ok());

        let entries = log.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, "edge-01");
        assert!(entries[0].1.contains("Template:\n{{ nope }}"));
    }
}

//! Secret-aware rendering against in-memory collaborators

use golden_directory::{
    EnvironmentSecretStore, InMemoryDirectory, StaticAuthorizationOracle, StaticContextExecutor,
    ENVIRONMENT_PROVIDER, VIEW_SECRETS_GROUP,
};
use golden_render::{SecretResolver, TemplateRenderer, TracingFailureLog};
use golden_types::{
    AccessType, ContextQueryRef, Device, DeviceId, GroupId, Principal, SecretRef, SecretType,
    SecretsGroup, SettingsObject,
};
use serde_json::json;
use std::sync::Arc;

const TEMPLATE: &str = "hostname {{ hostname }}\n\
enable secret {{ secrets_group | get_secret_by_secret_group_slug('secret') }}";

struct Lab {
    oracle: Arc<StaticAuthorizationOracle>,
    renderer: TemplateRenderer,
    device: Device,
    settings: SettingsObject,
}

fn lab() -> Lab {
    let directory = Arc::new(InMemoryDirectory::new());
    directory.add_secrets_group(SecretsGroup::new("sg1", "Lab credentials").with_secret(
        AccessType::Generic,
        SecretType::Secret,
        SecretRef::new("enable", ENVIRONMENT_PROVIDER).with_parameter("variable", "LAB_ENABLE"),
    ));
    let oracle = Arc::new(StaticAuthorizationOracle::new());
    let store = Arc::new(EnvironmentSecretStore::with_lookup(|variable| {
        (variable == "LAB_ENABLE").then(|| "supersecretvalue".to_string())
    }));

    let context = Arc::new(StaticContextExecutor::new());
    context.insert_json(
        DeviceId::new("10"),
        json!({"hostname": "ams-edge-01", "secrets_group": "sg1"}),
    );

    let renderer = TemplateRenderer::new(
        context,
        SecretResolver::new(directory, oracle.clone(), store),
    )
    .with_failure_log(Arc::new(TracingFailureLog));

    Lab {
        oracle,
        renderer,
        device: Device::new("10", "ams-edge-01").with_platform("cisco_ios"),
        settings: SettingsObject::new("ams", GroupId::new("ams"), 10)
            .with_context_query(ContextQueryRef::new("device", "query ($device_id: ID!) { device }")),
    }
}

#[test]
fn superuser_sees_secret() {
    let lab = lab();
    let out = lab
        .renderer
        .render(TEMPLATE, &lab.device, &Principal::superuser("admin"), &lab.settings)
        .unwrap();
    assert_eq!(out, "hostname ams-edge-01\nenable secret supersecretvalue");
}

#[test]
fn user_sees_denial_until_granted() {
    let lab = lab();
    let alice = Principal::user("alice");

    let out = lab
        .renderer
        .render(TEMPLATE, &lab.device, &alice, &lab.settings)
        .unwrap();
    assert_eq!(
        out,
        "hostname ams-edge-01\nenable secret You have no permission to read this secret sg1."
    );

    lab.oracle.grant("alice", VIEW_SECRETS_GROUP);
    let out = lab
        .renderer
        .render(TEMPLATE, &lab.device, &alice, &lab.settings)
        .unwrap();
    assert!(out.ends_with("enable secret supersecretvalue"));
}

#[test]
fn anonymous_is_denied() {
    let lab = lab();
    let out = lab
        .renderer
        .render(TEMPLATE, &lab.device, &Principal::anonymous(), &lab.settings)
        .unwrap();
    assert!(out.contains("You have no permission to read this secret sg1."));
    assert!(!out.contains("supersecretvalue"));
}

#[test]
fn type5_hash_of_secret() {
    let lab = lab();
    let out = lab
        .renderer
        .render(
            "{{ 'sg1' | get_secret_by_secret_group_slug('secret') | encrypt_type5('saltsalt') }}",
            &lab.device,
            &Principal::superuser("admin"),
            &lab.settings,
        )
        .unwrap();
    assert_eq!(
        out,
        golden_render::filters::encrypt_type5("supersecretvalue", Some("saltsalt")).unwrap()
    );
    assert!(out.starts_with("$1$saltsalt$"));
}

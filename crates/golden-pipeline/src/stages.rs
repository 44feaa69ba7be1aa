//! Built-in stages

use crate::error::{RenderConfigToPushError, Result};
use crate::stage::PushStage;
use golden_directory::DeviceDirectory;
use golden_render::TemplateRenderer;
use golden_scope::SettingsResolver;
use golden_types::{IntendedConfigArtifact, Principal};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Name of the secret rendering stage
pub const RENDER_SECRETS: &str = "render_secrets";

/// Name of the line removal stage
pub const REMOVE_LINES: &str = "remove_lines";

/// Secret-aware render of the previous output
///
/// With no previous output the stored intended configuration is rendered.
/// Settings (and so the context query) are looked up for the device at
/// call time.
pub struct RenderSecretsStage {
    renderer: TemplateRenderer,
    directory: Arc<dyn DeviceDirectory>,
    settings: SettingsResolver,
}

impl RenderSecretsStage {
    pub fn new(renderer: TemplateRenderer, directory: Arc<dyn DeviceDirectory>) -> Self {
        Self {
            renderer,
            settings: SettingsResolver::new(directory.clone()),
            directory,
        }
    }
}

impl PushStage for RenderSecretsStage {
    fn name(&self) -> &str {
        RENDER_SECRETS
    }

    fn apply(
        &self,
        current: &str,
        configs: &IntendedConfigArtifact,
        principal: &Principal,
    ) -> Result<String> {
        let device = &configs.device;

        // Memberships may have changed since the artifact was stored.
        let current_device = self
            .directory
            .device(&device.id)
            .map_err(|e| RenderConfigToPushError::new(e.to_string()))?;
        let lookup = current_device.as_ref().unwrap_or(device);

        let settings = self.settings.settings_for(lookup)?.ok_or_else(|| {
            RenderConfigToPushError::new(format!("no settings apply to device {}", device.name))
        })?;
        debug!(device = %device.name, settings = %settings.id, "Rendering secrets");

        Ok(self
            .renderer
            .render_intended(current, configs, principal, &settings)?)
    }
}

/// Strips text matching the patterns configured for the device's platform
///
/// Patterns are multi-line regexes substituted away over the whole output,
/// in order. A rule removes a whole line only when it consumes the line
/// break, e.g. `^enable secret.*\n`.
#[derive(Debug, Clone, Default)]
pub struct RemoveLinesStage {
    rules: BTreeMap<String, Vec<Regex>>,
}

impl RemoveLinesStage {
    pub fn new(rules: BTreeMap<String, Vec<Regex>>) -> Self {
        Self { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl PushStage for RemoveLinesStage {
    fn name(&self) -> &str {
        REMOVE_LINES
    }

    fn apply(
        &self,
        current: &str,
        configs: &IntendedConfigArtifact,
        _principal: &Principal,
    ) -> Result<String> {
        let Some(patterns) = configs
            .device
            .platform()
            .and_then(|platform| self.rules.get(platform))
        else {
            return Ok(current.to_string());
        };

        let mut output = current.to_string();
        for pattern in patterns {
            output = pattern.replace_all(&output, "").into_owned();
        }
        debug!(
            device = %configs.device.name,
            removed_bytes = current.len() - output.len(),
            "Applied line removal rules"
        );
        Ok(output)
    }
}

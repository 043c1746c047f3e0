/// Location of a settings object in both backends.
///
/// Durable keys are hierarchical (`module/prefix/property`); parameter keys
/// are flat (`prefix_property`) and ignore the module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsScope {
    module: String,
    prefix: Option<String>,
}

impl SettingsScope {
    pub fn new(module: impl Into<String>, prefix: Option<&str>) -> Self {
        let prefix = prefix.map(|value| value.replace(' ', "")).filter(|value| !value.is_empty());
        Self { module: module.into(), prefix }
    }

    /// Root of the durable subtree owned by this scope.
    pub fn settings_root(&self) -> String {
        match &self.prefix {
            Some(prefix) if self.module.is_empty() => prefix.clone(),
            Some(prefix) => format!("{}/{}", self.module, prefix),
            None => self.module.clone(),
        }
    }

    pub fn settings_key(&self, property: &str) -> String {
        let root = self.settings_root();
        if root.is_empty() { property.to_string() } else { format!("{root}/{property}") }
    }

    pub fn params_key(&self, property: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}_{}", prefix.replace('-', ""), property),
            None => property.to_string(),
        }
    }
}

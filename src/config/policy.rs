use std::collections::BTreeMap;

use serde::Deserialize;

/// Which casing of the table name forms the artifact file name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingFormat {
    Snake,
    Camel,
    Pascal,
}

/// Which concrete emitter a technology entry runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeneratorKind {
    Types,
    Model,
    Actions,
    Selectors,
    Middleware,
    Service,
    Component,
}

/// Naming and path policy for one output technology.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TechnologyPolicy {
    pub kind: GeneratorKind,
    pub naming: NamingFormat,
    pub prefix: String,
    pub suffix: String,
    pub save_dir: String,
    pub output_dir: String,
    pub extension: String,
    pub project_type: String,
    pub framework: String,
}

/// Partial replacement for one technology entry. Present fields replace
/// the corresponding policy fields; absent fields keep the registry value.
/// Nothing below field level is merged.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TechnologyOverride {
    #[serde(default)]
    pub kind: Option<GeneratorKind>,
    #[serde(default)]
    pub naming: Option<NamingFormat>,
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub suffix: Option<String>,
    #[serde(default)]
    pub save_dir: Option<String>,
    #[serde(default)]
    pub output_dir: Option<String>,
    #[serde(default)]
    pub extension: Option<String>,
    #[serde(default)]
    pub project_type: Option<String>,
    #[serde(default)]
    pub framework: Option<String>,
}

/// Baseline entry an override patches when it names a technology the
/// registry does not carry yet: a plain camel-cased `.ts` emitter under
/// the default project layout.
impl Default for TechnologyPolicy {
    fn default() -> Self {
        Self {
            kind: GeneratorKind::Types,
            naming: NamingFormat::Camel,
            prefix: String::new(),
            suffix: String::new(),
            save_dir: String::new(),
            output_dir: "src/app".to_owned(),
            extension: "ts".to_owned(),
            project_type: "web-client".to_owned(),
            framework: "react".to_owned(),
        }
    }
}

impl TechnologyPolicy {
    pub(crate) fn apply(&mut self, patch: &TechnologyOverride) {
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(naming) = patch.naming {
            self.naming = naming;
        }
        if let Some(prefix) = &patch.prefix {
            self.prefix = prefix.clone();
        }
        if let Some(suffix) = &patch.suffix {
            self.suffix = suffix.clone();
        }
        if let Some(save_dir) = &patch.save_dir {
            self.save_dir = save_dir.clone();
        }
        if let Some(output_dir) = &patch.output_dir {
            self.output_dir = output_dir.clone();
        }
        if let Some(extension) = &patch.extension {
            self.extension = extension.clone();
        }
        if let Some(project_type) = &patch.project_type {
            self.project_type = project_type.clone();
        }
        if let Some(framework) = &patch.framework {
            self.framework = framework.clone();
        }
    }
}

/// Directory conventions of one project layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectTypePolicy {
    pub components_dir: String,
    pub services_dir: String,
    pub state_dir: String,
    pub types_dir: String,
    pub utilities_dir: String,
}

/// Import conventions of one target framework.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameworkPolicy {
    pub import_alias: String,
    pub app_dir: String,
}

/// Database type to target-language type, shared by all technologies.
pub type TypeMap = BTreeMap<String, String>;

pub(crate) fn default_type_map() -> TypeMap {
    [
        ("uuid", "string"),
        ("text", "string"),
        ("varchar", "string"),
        ("char", "string"),
        ("citext", "string"),
        ("smallint", "number"),
        ("int", "number"),
        ("integer", "number"),
        ("bigint", "number"),
        ("numeric", "number"),
        ("real", "number"),
        ("double precision", "number"),
        ("bool", "boolean"),
        ("boolean", "boolean"),
        ("date", "Date"),
        ("timestamp", "Date"),
        ("timestamptz", "Date"),
        ("json", "Record<string, unknown>"),
        ("jsonb", "Record<string, unknown>"),
        ("bytea", "Uint8Array"),
    ]
    .into_iter()
    .map(|(db, target)| (db.to_owned(), target.to_owned()))
    .collect()
}

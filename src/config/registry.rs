use std::collections::BTreeMap;

use tracing::debug;

use crate::{
    default_type_map, Error, FrameworkPolicy, GeneratorKind, NamingFormat, ProjectTypePolicy,
    TechSnapshot, TechnologyOverride, TechnologyPolicy, TypeMap,
};

/// The layered configuration tables: technologies, project types,
/// frameworks and the global type map. Static after construction;
/// `resolve` flattens one technology into a [`TechSnapshot`].
#[derive(Clone, Debug)]
pub struct Registry {
    technologies: BTreeMap<String, TechnologyPolicy>,
    project_types: BTreeMap<String, ProjectTypePolicy>,
    frameworks: BTreeMap<String, FrameworkPolicy>,
    type_map: TypeMap,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            technologies: default_technologies(),
            project_types: default_project_types(),
            frameworks: default_frameworks(),
            type_map: default_type_map(),
        }
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry over caller-supplied tables, replacing the built-in
    /// ones wholesale. Dangling project-type or framework references are
    /// not checked here; they surface from `resolve`.
    pub fn from_tables(
        technologies: BTreeMap<String, TechnologyPolicy>,
        project_types: BTreeMap<String, ProjectTypePolicy>,
        frameworks: BTreeMap<String, FrameworkPolicy>,
        type_map: TypeMap,
    ) -> Self {
        Self {
            technologies,
            project_types,
            frameworks,
            type_map,
        }
    }

    /// Built-in tables with per-technology overrides applied. An override
    /// for technology `X` patches `X`'s entry only, field by field; other
    /// entries are untouched. An override naming a key outside the
    /// built-in set inserts a new entry, patched over
    /// [`TechnologyPolicy::default`].
    pub fn with_overrides(overrides: BTreeMap<String, TechnologyOverride>) -> Self {
        let mut registry = Self::default();
        for (key, patch) in overrides {
            registry
                .technologies
                .entry(key)
                .or_default()
                .apply(&patch);
        }
        registry
    }

    pub fn technology_keys(&self) -> impl Iterator<Item = &str> {
        self.technologies.keys().map(String::as_str)
    }

    pub fn type_map(&self) -> &TypeMap {
        &self.type_map
    }

    /// Flatten one technology key into its snapshot. Unknown keys and
    /// dangling project-type / framework references fail here, before any
    /// generator for this technology is constructed.
    pub fn resolve(&self, technology: &str) -> Result<TechSnapshot, Error> {
        let policy = self
            .technologies
            .get(technology)
            .ok_or_else(|| Error::config(technology, "unknown technology key"))?;
        let project = self.project_types.get(&policy.project_type).ok_or_else(|| {
            Error::config(
                technology,
                format!("unresolved project type `{}`", policy.project_type),
            )
        })?;
        let framework = self.frameworks.get(&policy.framework).ok_or_else(|| {
            Error::config(
                technology,
                format!("unresolved framework `{}`", policy.framework),
            )
        })?;
        let directory = if policy.save_dir.is_empty() {
            policy.output_dir.clone()
        } else {
            format!("{}/{}", policy.output_dir, policy.save_dir)
        };
        debug!(technology, directory, "resolved technology snapshot");
        Ok(TechSnapshot {
            technology: technology.to_owned(),
            kind: policy.kind,
            naming: policy.naming,
            prefix: policy.prefix.clone(),
            suffix: policy.suffix.clone(),
            extension: policy.extension.clone(),
            directory,
            project: project.clone(),
            framework: framework.clone(),
            type_map: self.type_map.clone(),
        })
    }
}

fn technology(
    kind: GeneratorKind,
    naming: NamingFormat,
    suffix: &str,
    save_dir: &str,
    extension: &str,
) -> TechnologyPolicy {
    TechnologyPolicy {
        kind,
        naming,
        prefix: String::new(),
        suffix: suffix.to_owned(),
        save_dir: save_dir.to_owned(),
        output_dir: "src/app".to_owned(),
        extension: extension.to_owned(),
        project_type: "web-client".to_owned(),
        framework: "react".to_owned(),
    }
}

fn default_technologies() -> BTreeMap<String, TechnologyPolicy> {
    [
        (
            "typescript-types",
            technology(GeneratorKind::Types, NamingFormat::Pascal, "", "types", "ts"),
        ),
        (
            "redux-model",
            technology(
                GeneratorKind::Model,
                NamingFormat::Camel,
                ".model",
                "state/models",
                "ts",
            ),
        ),
        (
            "redux-actions",
            technology(
                GeneratorKind::Actions,
                NamingFormat::Camel,
                ".actions",
                "state/actions",
                "ts",
            ),
        ),
        (
            "redux-selectors",
            technology(
                GeneratorKind::Selectors,
                NamingFormat::Camel,
                ".selectors",
                "state/selectors",
                "ts",
            ),
        ),
        (
            "redux-middleware",
            technology(
                GeneratorKind::Middleware,
                NamingFormat::Camel,
                ".middleware",
                "state/middleware",
                "ts",
            ),
        ),
        (
            "data-service",
            technology(
                GeneratorKind::Service,
                NamingFormat::Camel,
                ".service",
                "services",
                "ts",
            ),
        ),
        (
            "react-component",
            technology(
                GeneratorKind::Component,
                NamingFormat::Pascal,
                "View",
                "components",
                "tsx",
            ),
        ),
    ]
    .into_iter()
    .map(|(key, policy)| (key.to_owned(), policy))
    .collect()
}

fn default_project_types() -> BTreeMap<String, ProjectTypePolicy> {
    [
        (
            "web-client",
            ProjectTypePolicy {
                components_dir: "components".to_owned(),
                services_dir: "services".to_owned(),
                state_dir: "state".to_owned(),
                types_dir: "types".to_owned(),
                utilities_dir: "utils".to_owned(),
            },
        ),
        (
            "library",
            ProjectTypePolicy {
                components_dir: "lib/components".to_owned(),
                services_dir: "lib/services".to_owned(),
                state_dir: "lib/state".to_owned(),
                types_dir: "lib/types".to_owned(),
                utilities_dir: "lib/utils".to_owned(),
            },
        ),
    ]
    .into_iter()
    .map(|(key, policy)| (key.to_owned(), policy))
    .collect()
}

fn default_frameworks() -> BTreeMap<String, FrameworkPolicy> {
    [
        (
            "react",
            FrameworkPolicy {
                import_alias: "@app".to_owned(),
                app_dir: "src/app".to_owned(),
            },
        ),
        (
            "next",
            FrameworkPolicy {
                import_alias: "@".to_owned(),
                app_dir: "app".to_owned(),
            },
        ),
    ]
    .into_iter()
    .map(|(key, policy)| (key.to_owned(), policy))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn resolves_default_technology() {
        let registry = Registry::new();
        let snapshot = registry.resolve("typescript-types").unwrap();
        assert_eq!(snapshot.kind, GeneratorKind::Types);
        assert_eq!(snapshot.directory, "src/app/types");
        assert_eq!(snapshot.extension, "ts");
        assert_eq!(snapshot.framework.import_alias, "@app");
        assert_eq!(snapshot.resolve_type("uuid"), Some("string"));
    }

    #[test]
    fn unknown_technology_is_a_config_error() {
        let registry = Registry::new();
        let err = registry.resolve("cobol-copybooks").unwrap_err();
        match err {
            Error::Config { technology, .. } => assert_eq!(technology, "cobol-copybooks"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn shallow_override_patches_supplied_fields_only() {
        let baseline = Registry::new().resolve("data-service").unwrap();

        let mut overrides = BTreeMap::new();
        overrides.insert(
            "data-service".to_owned(),
            TechnologyOverride {
                suffix: Some(".api".to_owned()),
                ..Default::default()
            },
        );
        let patched = Registry::with_overrides(overrides)
            .resolve("data-service")
            .unwrap();

        assert_eq!(patched.suffix, ".api");
        // Every other field is untouched.
        assert_eq!(patched.prefix, baseline.prefix);
        assert_eq!(patched.naming, baseline.naming);
        assert_eq!(patched.directory, baseline.directory);
        assert_eq!(patched.extension, baseline.extension);
        assert_eq!(patched.project, baseline.project);
        assert_eq!(patched.framework, baseline.framework);
        assert_eq!(patched.type_map, baseline.type_map);
    }

    #[test]
    fn override_does_not_leak_into_sibling_technologies() {
        let mut overrides = BTreeMap::new();
        overrides.insert(
            "redux-model".to_owned(),
            TechnologyOverride {
                output_dir: Some("generated".to_owned()),
                ..Default::default()
            },
        );
        let registry = Registry::with_overrides(overrides);
        assert_eq!(
            registry.resolve("redux-model").unwrap().directory,
            "generated/state/models"
        );
        assert_eq!(
            registry.resolve("redux-actions").unwrap().directory,
            "src/app/state/actions"
        );
    }

    #[test]
    fn caller_supplied_tables_replace_the_builtins() {
        let technologies = BTreeMap::from([(
            "vue-types".to_owned(),
            TechnologyPolicy {
                kind: GeneratorKind::Types,
                naming: NamingFormat::Pascal,
                prefix: String::new(),
                suffix: String::new(),
                save_dir: "typings".to_owned(),
                output_dir: "src".to_owned(),
                extension: "ts".to_owned(),
                project_type: "spa".to_owned(),
                framework: "vue".to_owned(),
            },
        )]);
        let project_types = BTreeMap::from([(
            "spa".to_owned(),
            ProjectTypePolicy {
                components_dir: "components".to_owned(),
                services_dir: "api".to_owned(),
                state_dir: "store".to_owned(),
                types_dir: "typings".to_owned(),
                utilities_dir: "helpers".to_owned(),
            },
        )]);
        let frameworks = BTreeMap::from([(
            "vue".to_owned(),
            FrameworkPolicy {
                import_alias: "~".to_owned(),
                app_dir: "src".to_owned(),
            },
        )]);
        let type_map = BTreeMap::from([("uuid".to_owned(), "Uuid".to_owned())]);

        let registry = Registry::from_tables(technologies, project_types, frameworks, type_map);
        let snapshot = registry.resolve("vue-types").unwrap();
        assert_eq!(snapshot.directory, "src/typings");
        assert_eq!(snapshot.framework.import_alias, "~");
        assert_eq!(snapshot.resolve_type("uuid"), Some("Uuid"));
        // The built-in entries are gone along with their tables.
        assert!(registry.resolve("typescript-types").is_err());
    }

    #[test]
    fn override_for_a_new_key_inserts_an_entry() {
        let mut overrides = BTreeMap::new();
        overrides.insert(
            "graphql-types".to_owned(),
            TechnologyOverride {
                naming: Some(NamingFormat::Pascal),
                save_dir: Some("graphql".to_owned()),
                extension: Some("graphql.ts".to_owned()),
                ..Default::default()
            },
        );
        let registry = Registry::with_overrides(overrides);

        let snapshot = registry.resolve("graphql-types").unwrap();
        assert_eq!(snapshot.kind, GeneratorKind::Types);
        assert_eq!(snapshot.directory, "src/app/graphql");
        assert_eq!(snapshot.extension, "graphql.ts");
        // Baseline fields the override left out come from the default policy.
        assert_eq!(snapshot.framework.import_alias, "@app");
        // Built-in siblings are untouched.
        assert_eq!(
            registry.resolve("typescript-types").unwrap().directory,
            "src/app/types"
        );
    }

    #[test]
    fn dangling_project_type_is_a_config_error() {
        let mut overrides = BTreeMap::new();
        overrides.insert(
            "react-component".to_owned(),
            TechnologyOverride {
                project_type: Some("no-such-project".to_owned()),
                ..Default::default()
            },
        );
        let registry = Registry::with_overrides(overrides);
        let err = registry.resolve("react-component").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert!(err.to_string().contains("no-such-project"));
    }
}

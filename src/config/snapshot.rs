use crate::{FrameworkPolicy, GeneratorKind, NamingFormat, ProjectTypePolicy, TypeMap};

/// Fully resolved policy for one technology: the technology entry, its
/// project-type directories, its framework conventions and the type map,
/// flattened into a single read-only value. Built once per technology by
/// `Registry::resolve` and handed by value to every generator; generators
/// never mutate it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TechSnapshot {
    pub technology: String,
    pub kind: GeneratorKind,
    pub naming: NamingFormat,
    pub prefix: String,
    pub suffix: String,
    pub extension: String,
    /// `<output_dir>/<save_dir>`, the directory artifacts land in.
    pub directory: String,
    pub project: ProjectTypePolicy,
    pub framework: FrameworkPolicy,
    pub type_map: TypeMap,
}

impl TechSnapshot {
    /// File name for one table under this technology:
    /// `<prefix><canonicalName><suffix>.<extension>`.
    pub fn file_name(&self, naming: &crate::Naming) -> String {
        let canonical = match self.naming {
            NamingFormat::Snake => &naming.snake,
            NamingFormat::Camel => &naming.camel,
            NamingFormat::Pascal => &naming.pascal,
        };
        format!("{}{}{}.{}", self.prefix, canonical, self.suffix, self.extension)
    }

    /// Full artifact path for one table under this technology.
    pub fn file_path(&self, naming: &crate::Naming) -> String {
        format!("{}/{}", self.directory, self.file_name(naming))
    }

    /// Import path of the type-declaration artifact for `naming`, rooted
    /// at the framework import alias. Used by every technology that
    /// references the entity's declared type.
    pub fn type_import_path(&self, naming: &crate::Naming) -> String {
        format!(
            "{}/{}/{}",
            self.framework.import_alias, self.project.types_dir, naming.pascal
        )
    }

    pub fn resolve_type(&self, data_type: &str) -> Option<&str> {
        self.type_map.get(data_type).map(String::as_str)
    }
}

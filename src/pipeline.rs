use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::PathBuf;

use tracing::{error, info};

use crate::{
    resolve_relations, Error, Registry, ResolutionWarning, SchemaProvider, Table, TechGenerator,
};

/// Persistence boundary. The pipeline only ever calls `write`; where the
/// bytes go is the caller's business.
pub trait ArtifactSink {
    fn write(&mut self, path: &str, content: &str) -> Result<(), Error>;
}

/// Collects artifacts in memory, keyed by path. The sink tests and dry
/// runs use.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub files: BTreeMap<String, String>,
}

impl ArtifactSink for MemorySink {
    fn write(&mut self, path: &str, content: &str) -> Result<(), Error> {
        self.files.insert(path.to_owned(), content.to_owned());
        Ok(())
    }
}

/// Writes artifacts under a root directory, creating parents as needed.
#[derive(Debug)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }
}

impl ArtifactSink for DirectorySink {
    fn write(&mut self, path: &str, content: &str) -> Result<(), Error> {
        let full = self.root.join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(full, content)?;
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnitStatus {
    Generated { path: String },
    Failed { error: String },
}

/// Outcome of one (table, technology) unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnitOutcome {
    pub table: String,
    pub technology: String,
    pub status: UnitStatus,
}

/// Per-unit success/failure summary of one pipeline run, plus the
/// relationship-resolution warnings. Nothing is rolled back: artifacts
/// already written stay written even when a sibling unit failed.
#[derive(Clone, Debug, Default)]
pub struct RunReport {
    pub units: Vec<UnitOutcome>,
    pub warnings: Vec<ResolutionWarning>,
}

impl RunReport {
    pub fn generated(&self) -> usize {
        self.units
            .iter()
            .filter(|unit| matches!(unit.status, UnitStatus::Generated { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.units.len() - self.generated()
    }

    pub fn outcome(&self, table: &str, technology: &str) -> Option<&UnitStatus> {
        self.units
            .iter()
            .find(|unit| unit.table == table && unit.technology == technology)
            .map(|unit| &unit.status)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for unit in &self.units {
            match &unit.status {
                UnitStatus::Generated { path } => {
                    writeln!(f, "ok      {}/{} -> {}", unit.table, unit.technology, path)?
                }
                UnitStatus::Failed { error } => {
                    writeln!(f, "FAILED  {}/{}: {}", unit.table, unit.technology, error)?
                }
            }
        }
        for warning in &self.warnings {
            writeln!(f, "warning {warning}")?;
        }
        write!(
            f,
            "{} generated, {} failed, {} warnings",
            self.generated(),
            self.failed(),
            self.warnings.len()
        )
    }
}

/// Drives the whole run: load schema, build the table registry, resolve
/// relationships, then one generator per (table, technology) pair.
/// Failures below the schema level are scoped to their unit; the batch
/// always runs to completion.
#[derive(Debug)]
pub struct Pipeline {
    registry: Registry,
    technologies: Vec<String>,
    tables: Vec<String>,
    ignore_tables: Vec<String>,
    include_hidden_tables: bool,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(Registry::new())
    }
}

impl Pipeline {
    /// Pipeline over every technology the registry knows.
    pub fn new(registry: Registry) -> Self {
        let technologies = registry
            .technology_keys()
            .map(str::to_owned)
            .collect();
        Self {
            registry,
            technologies,
            tables: Vec::new(),
            ignore_tables: Vec::new(),
            include_hidden_tables: false,
        }
    }

    pub fn with_technologies<I, S>(mut self, technologies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.technologies = technologies.into_iter().map(Into::into).collect();
        self
    }

    /// Restrict the run to these tables. Empty means all.
    pub fn with_tables<I, S>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tables = tables.into_iter().map(Into::into).collect();
        self
    }

    pub fn ignore_tables<I, S>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_tables = tables.into_iter().map(Into::into).collect();
        self
    }

    pub fn include_hidden_tables(mut self, include: bool) -> Self {
        self.include_hidden_tables = include;
        self
    }

    pub fn run(
        &self,
        provider: &dyn SchemaProvider,
        sink: &mut dyn ArtifactSink,
    ) -> Result<RunReport, Error> {
        let schema = provider.load()?;

        let keep = |name: &str| -> bool {
            (self.tables.is_empty() || self.tables.iter().any(|t| t == name))
                && !self.ignore_tables.iter().any(|t| t == name)
                && (self.include_hidden_tables || !name.starts_with('_'))
        };

        let type_map = self.registry.type_map().clone();
        let mut tables: BTreeMap<String, Table> = schema
            .tables
            .iter()
            .filter(|raw| keep(&raw.table_name))
            .map(|raw| (raw.table_name.clone(), Table::from_raw(raw, &type_map)))
            .collect();

        let warnings = resolve_relations(&mut tables);

        let mut report = RunReport {
            units: Vec::new(),
            warnings,
        };
        for technology in &self.technologies {
            let snapshot = match self.registry.resolve(technology) {
                Ok(snapshot) => snapshot,
                Err(err) => {
                    error!(technology = technology.as_str(), "{err}");
                    for table in tables.keys() {
                        report.units.push(UnitOutcome {
                            table: table.clone(),
                            technology: technology.clone(),
                            status: UnitStatus::Failed {
                                error: err.to_string(),
                            },
                        });
                    }
                    continue;
                }
            };
            for (name, table) in &tables {
                let mut generator = TechGenerator::new(table, snapshot.clone());
                let status = match generator.initialize().and_then(|_| generator.emit()) {
                    Ok(artifact) => {
                        sink.write(&artifact.path, &artifact.content)?;
                        UnitStatus::Generated {
                            path: artifact.path,
                        }
                    }
                    Err(err) => {
                        error!(table = name.as_str(), technology = technology.as_str(), "{err}");
                        UnitStatus::Failed {
                            error: err.to_string(),
                        }
                    }
                };
                report.units.push(UnitOutcome {
                    table: name.clone(),
                    technology: technology.clone(),
                    status,
                });
            }
        }
        info!(
            generated = report.generated(),
            failed = report.failed(),
            warnings = report.warnings.len(),
            "pipeline finished"
        );
        Ok(report)
    }
}

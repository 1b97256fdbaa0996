// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Generator driver
//!
//! Runs the whole pipeline for one config:
//!
//! 1. Look up every configured table in the catalog and describe its model
//! 2. Extract every configured interface and build, then compile, each
//!    method against every table it applies to
//! 3. Render model, query and helper files
//!
//! Failures of a single table, interface or method are logged, recorded in
//! the [`GenerateReport`] and skipped; the rest of the run continues.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use sqlgen_catalog::{Catalog, StaticCatalog};
use sqlgen_check::naming::{column_name, struct_name};
use sqlgen_check::{BuildContext, MethodDescriptor, StructDescriptor, StructRegistry, registry};
use sqlgen_extract::{GoExtractor, find_interface, find_struct};
use sqlgen_ir::{GoFile, Import};
use tracing::{debug, info, warn};

use crate::config::{Config, ConfigError};
use crate::emit::{
    GeneratedMethod, HELPER_FILE, QueryFile, render_helper, render_model, render_query,
};
use crate::error::{GenerateError, GenerateResult};

/// A file to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub contents: String,
}

/// Counts and per-item failures of a run
#[derive(Debug, Default)]
pub struct GenerateReport {
    pub tables: usize,
    pub methods: usize,
    pub files: usize,
    pub failures: Vec<GenerateError>,
}

impl GenerateReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn fail(&mut self, error: GenerateError) {
        warn!(error = %error, "skipped");
        self.failures.push(error);
    }
}

/// Model and compiled methods of one table
#[derive(Debug, Clone)]
pub struct TablePlan {
    pub table: String,
    pub model: StructDescriptor,
    pub methods: Vec<GeneratedMethod>,
}

/// Everything resolved before rendering
#[derive(Debug, Default)]
pub struct Plan {
    pub tables: Vec<TablePlan>,
    pub report: GenerateReport,
}

impl Plan {
    /// Descriptor and clause tree of every compiled method named `method`
    pub fn dump_ir(&self, method: &str) -> serde_json::Value {
        let entries: Vec<serde_json::Value> = self
            .tables
            .iter()
            .flat_map(|t| t.methods.iter().map(move |m| (t, m)))
            .filter(|(_, m)| m.descriptor.name == method)
            .map(|(t, m)| {
                serde_json::json!({
                    "table": t.table,
                    "interface": m.descriptor.interface,
                    "method": m.descriptor,
                    "compiled": m.compiled,
                })
            })
            .collect();
        serde_json::Value::Array(entries)
    }
}

/// Output of a full run
#[derive(Debug)]
pub struct Output {
    pub files: Vec<GeneratedFile>,
    pub report: GenerateReport,
}

impl Output {
    /// Write every file, creating directories as needed
    pub fn write_all(&self) -> GenerateResult<()> {
        for file in &self.files {
            let io_error = |e: std::io::Error| GenerateError::Io {
                path: file.path.display().to_string(),
                message: e.to_string(),
            };
            if let Some(parent) = file.path.parent() {
                std::fs::create_dir_all(parent).map_err(io_error)?;
            }
            std::fs::write(&file.path, &file.contents).map_err(io_error)?;
            debug!(path = %file.path.display(), "wrote file");
        }
        Ok(())
    }
}

pub struct Generator {
    config: Config,
    catalog: Arc<dyn Catalog>,
}

impl Generator {
    /// Use an already opened catalog
    pub fn with_catalog(config: Config, catalog: Arc<dyn Catalog>) -> Self {
        Self { config, catalog }
    }

    /// Open the catalog the config names
    pub async fn open(config: Config) -> GenerateResult<Self> {
        config.validate()?;
        let catalog: Arc<dyn Catalog> = match (
            &config.catalog.schema_file,
            &config.catalog.connection_string,
        ) {
            (Some(file), None) => Arc::new(StaticCatalog::from_file(file)?),
            (None, Some(conn)) => Arc::from(sqlgen_catalog::connect(config.dialect, conn).await?),
            _ => {
                return Err(ConfigError::CatalogSource {
                    reason: "exactly one catalog source is required".to_string(),
                }
                .into());
            }
        };
        Ok(Self::with_catalog(config, catalog))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Plan and render
    pub async fn generate(&self) -> GenerateResult<Output> {
        let Plan { tables, mut report } = self.plan().await?;
        let files = self.render(&tables)?;
        report.files = files.len();
        info!(
            tables = report.tables,
            methods = report.methods,
            files = report.files,
            failures = report.failures.len(),
            "generation finished"
        );
        Ok(Output { files, report })
    }

    /// Resolve models and compile every applied method
    pub async fn plan(&self) -> GenerateResult<Plan> {
        let config = &self.config;
        let mut report = GenerateReport::default();
        let mut extractor = GoExtractor::new()?;

        let model_source = match &config.model_source {
            Some(path) => Some(extractor.extract_file(path)?),
            None => None,
        };

        let mut tables = Vec::new();
        for table in &config.tables {
            let metadata = match self.catalog.get_table(table).await {
                Ok(metadata) => metadata,
                Err(source) => {
                    report.fail(GenerateError::Table {
                        table: table.clone(),
                        source,
                    });
                    continue;
                }
            };
            let model = match &model_source {
                Some(file) => match find_struct(file, &struct_name(table)) {
                    Ok(decl) => StructDescriptor::from_struct(decl, table, &config.model_package),
                    Err(source) => {
                        report.fail(GenerateError::ModelSource {
                            table: table.clone(),
                            source,
                        });
                        continue;
                    }
                },
                None => StructDescriptor::from_table(&metadata, &config.model_package),
            };
            match model {
                Ok(model) => tables.push(TablePlan {
                    table: table.clone(),
                    model,
                    methods: Vec::new(),
                }),
                Err(source) => report.fail(GenerateError::Model {
                    table: table.clone(),
                    source,
                }),
            }
        }
        report.tables = tables.len();

        let structs = self.registry(&tables, model_source.as_ref());
        let options = config.compile_options();

        for iface_config in &config.interfaces {
            let path = iface_config.source.display().to_string();
            let file = match extractor.extract_file(&iface_config.source) {
                Ok(file) => file,
                Err(source) => {
                    report.fail(GenerateError::Interface {
                        name: iface_config.name.clone(),
                        path,
                        source,
                    });
                    continue;
                }
            };
            let iface = match find_interface(&file, &iface_config.name) {
                Ok(iface) => iface,
                Err(source) => {
                    report.fail(GenerateError::Interface {
                        name: iface_config.name.clone(),
                        path,
                        source,
                    });
                    continue;
                }
            };

            for plan in tables
                .iter_mut()
                .filter(|t| iface_config.applies_to(&t.table))
            {
                let ctx = BuildContext::new(plan.model.go_type(), &structs)
                    .with_gen_package(&config.gen_package)
                    .with_receiver(&config.receiver);
                for signature in &iface.methods {
                    let built = MethodDescriptor::build(&iface.name, signature, &ctx).and_then(
                        |descriptor| {
                            let compiled = descriptor.compile(&plan.table, &structs, &options)?;
                            Ok((descriptor, compiled))
                        },
                    );
                    match built {
                        Ok((descriptor, compiled)) => {
                            debug!(
                                table = %plan.table,
                                method = %descriptor.name,
                                statements = compiled.statements.len(),
                                "compiled method"
                            );
                            let imports = self.method_imports(&descriptor, &file);
                            plan.methods.push(GeneratedMethod {
                                descriptor,
                                compiled,
                                comment: signature.doc.clone(),
                                imports,
                            });
                            report.methods += 1;
                        }
                        Err(source) => report.fail(GenerateError::Method {
                            interface: iface.name.clone(),
                            method: signature.name.clone(),
                            source,
                        }),
                    }
                }
            }
        }

        Ok(Plan { tables, report })
    }

    /// Render model, query and helper files of a plan
    pub fn render(&self, tables: &[TablePlan]) -> GenerateResult<Vec<GeneratedFile>> {
        let config = &self.config;
        let mut files = Vec::new();

        for plan in tables {
            let file_name = format!("{}.gen.go", plan.table);
            if let (Some(dir), None) = (&config.model_dir, &config.model_source) {
                files.push(GeneratedFile {
                    path: dir.join(&file_name),
                    contents: render_model(&plan.model)?,
                });
            }
            let query = QueryFile {
                package: &config.query_package,
                model: &plan.model,
                receiver: &config.receiver,
                model_import: self.model_import(),
                gen_import: &config.gen_import,
                gen_package: &config.gen_package,
                methods: plan.methods.clone(),
            };
            files.push(GeneratedFile {
                path: config.out_dir.join(&file_name),
                contents: render_query(&query)?,
            });
        }

        if !tables.is_empty() {
            files.push(GeneratedFile {
                path: config.out_dir.join(HELPER_FILE),
                contents: render_helper(&config.query_package)?,
            });
        }
        Ok(files)
    }

    /// Models plus the other structs of the model source
    fn registry(&self, tables: &[TablePlan], model_source: Option<&GoFile>) -> StructRegistry {
        let mut structs = registry(tables.iter().map(|t| &t.model));
        if let Some(file) = model_source {
            for decl in &file.structs {
                let known = tables.iter().any(|t| t.model.name == decl.name);
                if known {
                    continue;
                }
                if let Ok(model) = StructDescriptor::from_struct(
                    decl,
                    &column_name(&decl.name),
                    &self.config.model_package,
                ) {
                    structs.insert(model.go_type(), model.shape());
                }
            }
        }
        structs
    }

    fn model_import(&self) -> Import {
        let import = Import::new(&self.config.model_import);
        let alias =
            (import.qualifier() != self.config.model_package).then(|| self.config.model_package.clone());
        Import { alias, ..import }
    }

    /// Imports for the package qualifiers a method signature uses
    fn method_imports(&self, descriptor: &MethodDescriptor, file: &GoFile) -> Vec<Import> {
        let config = &self.config;
        let aliases: HashMap<&str, &str> = file
            .imports
            .iter()
            .map(|i| (i.qualifier(), i.path.as_str()))
            .collect();
        descriptor
            .packages()
            .into_iter()
            .filter(|q| *q != config.gen_package)
            .map(|qualifier| {
                if qualifier == config.model_package {
                    return self.model_import();
                }
                let path = aliases.get(qualifier.as_str()).copied().unwrap_or(qualifier.as_str());
                let import = Import::new(path);
                let alias = (import.qualifier() != qualifier).then_some(qualifier.clone());
                Import { alias, ..import }
            })
            .collect()
    }
}

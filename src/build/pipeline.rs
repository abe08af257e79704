//! Pipeline orchestration.
//!
//! Runs one block per manifest block (or a single block without a
//! manifest). A block failure is reported and the next block still runs.

use crate::build::{BuildError, RunReport};
use crate::collect::{collect_files, resolve_source};
use crate::config::loader::apply_settings;
use crate::config::Configuration;
use crate::manifest::read_manifest;
use crate::package::{packager_for, IconConverter, Iconutil};
use crate::plan::{compile_plans, TransformPlan};
use std::rc::Rc;
use std::time::Instant;
use tracing::{debug, info};

/// Outcome of one block.
#[derive(Debug)]
pub struct BlockOutcome {
    /// 1-based manifest block number, `0` without a manifest
    pub index: usize,
    pub result: Result<RunReport, BuildError>,
}

impl BlockOutcome {
    pub fn is_success(&self) -> bool {
        self.result.as_ref().is_ok_and(RunReport::is_success)
    }
}

/// Runs configured jobs.
pub struct Pipeline {
    base: Configuration,
    converter: Rc<dyn IconConverter>,
}

impl Pipeline {
    /// Create a pipeline over a base configuration.
    pub fn new(base: Configuration) -> Self {
        Self { base, converter: Rc::new(Iconutil) }
    }

    /// Use a different icns converter.
    pub fn with_converter(mut self, converter: Rc<dyn IconConverter>) -> Self {
        self.converter = converter;
        self
    }

    pub fn base(&self) -> &Configuration {
        &self.base
    }

    /// Run every block.
    pub fn run(&self) -> Vec<BlockOutcome> {
        let Some(manifest) = &self.base.manifest else {
            return vec![BlockOutcome { index: 0, result: self.run_block(&self.base, &[]) }];
        };

        let blocks = match read_manifest(manifest) {
            Ok(blocks) => blocks,
            Err(e) => return vec![BlockOutcome { index: 0, result: Err(e.into()) }],
        };

        let base_complete = self.base.src.is_some() && self.base.dst.is_some();
        blocks
            .iter()
            .enumerate()
            .filter_map(|(i, block)| {
                // empty blocks run only on top of a complete base job
                if block.is_empty() && !base_complete {
                    debug!("Skipping empty manifest block {}", i + 1);
                    return None;
                }
                info!("Manifest block {}", i + 1);
                let config = apply_settings(&self.base, &block.settings);
                Some(BlockOutcome { index: i + 1, result: self.run_block(&config, &block.files) })
            })
            .collect()
    }

    /// Run one resolved configuration over an optional explicit file list.
    pub fn run_block(&self, config: &Configuration, files: &[String]) -> Result<RunReport, BuildError> {
        let start = Instant::now();
        config.validate()?;

        let src = config.src.clone().unwrap_or_default();
        let (dir, requested) = resolve_source(&src, files);
        let sources = collect_files(&dir, &config.valid_formats, &requested)?;

        let plans = compile_plans(config.preset, &TransformPlan::from_configuration(config));
        debug!("{} plan(s) from preset {:?}", plans.len(), config.preset);

        let mut packager = packager_for(config, Rc::clone(&self.converter))?;
        packager.prepare(&sources)?;

        if sources.len() == 1 {
            info!("Processing 1 image...");
        } else {
            info!("Processing {} images...", sources.len());
        }

        let mut report = RunReport::new();
        for source in &sources {
            report.extend(packager.process_source(source, &plans));
        }
        if let Err(e) = packager.finish() {
            report.add_package_error(e);
        }

        Ok(report.with_duration(start.elapsed()))
    }
}

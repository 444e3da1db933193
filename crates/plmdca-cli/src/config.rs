use crate::cli::ScoreArgs;
use crate::error::{CliError, Result};
use plmdca::core::io::score_table::ScoreTableOptions;
use plmdca::core::models::alignment::AlignmentSummary;
use plmdca::core::models::shape::Biomolecule;
use plmdca::engine::config as core_config;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialRegularizationConfig {
    #[serde(rename = "lambda-h")]
    lambda_h: Option<f64>,
    #[serde(rename = "lambda-j")]
    lambda_j: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialBackendConfig {
    #[serde(rename = "max-iterations")]
    max_iterations: Option<usize>,
    #[serde(rename = "num-threads")]
    num_threads: Option<usize>,
    verbose: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialOutputConfig {
    apc: Option<bool>,
    top: Option<usize>,
    #[serde(rename = "one-based")]
    one_based: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialScoreConfig {
    biomolecule: Option<String>,
    #[serde(rename = "sequence-identity")]
    sequence_identity: Option<f64>,
    regularization: Option<PartialRegularizationConfig>,
    backend: Option<PartialBackendConfig>,
    output: Option<PartialOutputConfig>,
}

/// Everything the `score` command needs once file, `--set` and flags are merged.
#[derive(Debug, Clone)]
pub struct ScoreSettings {
    pub analysis: core_config::AnalysisConfig,
    pub apc: bool,
    pub table: ScoreTableOptions,
}

impl PartialScoreConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn merge_with_cli(
        mut self,
        args: &ScoreArgs,
        alignment: AlignmentSummary,
        threads: Option<usize>,
    ) -> Result<ScoreSettings> {
        self.apply_set_values(&args.set_values)?;

        let regularization = self.regularization.take().unwrap_or_default();
        let backend = self.backend.take().unwrap_or_default();
        let output = self.output.take().unwrap_or_default();

        let biomolecule = match (args.biomolecule, self.biomolecule.as_deref()) {
            (Some(b), _) => b,
            (None, Some(name)) => {
                Biomolecule::from_str(name).map_err(|e| CliError::Config(e.to_string()))?
            }
            (None, None) => {
                return Err(CliError::Config(
                    "A value for 'biomolecule' is required either in the config file or via CLI argument."
                        .to_string(),
                ));
            }
        };

        let mut builder = core_config::AnalysisConfigBuilder::new()
            .biomolecule(biomolecule)
            .msa_path(args.msa.clone())
            .alignment(alignment);

        if let Some(seqid) = args.sequence_identity.or(self.sequence_identity) {
            builder = builder.sequence_identity(seqid);
        }
        if let Some(lambda_h) = args.lambda_h.or(regularization.lambda_h) {
            builder = builder.lambda_h(lambda_h);
        }
        if let Some(lambda_j) = args.lambda_j.or(regularization.lambda_j) {
            builder = builder.lambda_j(lambda_j);
        }
        if let Some(max_iterations) = args.max_iterations.or(backend.max_iterations) {
            builder = builder.max_iterations(max_iterations);
        }
        if let Some(num_threads) = threads.or(backend.num_threads) {
            builder = builder.num_threads(num_threads);
        }
        if let Some(verbose) = backend.verbose {
            builder = builder.verbose(verbose);
        }

        let analysis = builder
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        let apc = !args.no_apc && output.apc.unwrap_or(true);
        let table = ScoreTableOptions {
            one_based: args.one_based || output.one_based.unwrap_or(false),
            limit: args.top.or(output.top),
            ..ScoreTableOptions::default()
        };

        Ok(ScoreSettings {
            analysis,
            apc,
            table,
        })
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let (key, value_str) = kv_pair.split_once('=').ok_or_else(|| {
                CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                ))
            })?;
            let key = key.trim();
            let value_str = value_str.trim();

            match key {
                "biomolecule" => {
                    self.biomolecule = Some(value_str.to_string());
                }
                "sequence-identity" => {
                    self.sequence_identity = Some(parse_value(key, value_str, "float")?);
                }
                "regularization.lambda-h" => {
                    self.regularization
                        .get_or_insert_with(Default::default)
                        .lambda_h = Some(parse_value(key, value_str, "float")?);
                }
                "regularization.lambda-j" => {
                    self.regularization
                        .get_or_insert_with(Default::default)
                        .lambda_j = Some(parse_value(key, value_str, "float")?);
                }
                "backend.max-iterations" => {
                    self.backend
                        .get_or_insert_with(Default::default)
                        .max_iterations = Some(parse_value(key, value_str, "integer")?);
                }
                "backend.num-threads" => {
                    self.backend.get_or_insert_with(Default::default).num_threads =
                        Some(parse_value(key, value_str, "integer")?);
                }
                "backend.verbose" => {
                    self.backend.get_or_insert_with(Default::default).verbose =
                        Some(parse_value(key, value_str, "boolean")?);
                }
                "output.apc" => {
                    self.output.get_or_insert_with(Default::default).apc =
                        Some(parse_value(key, value_str, "boolean")?);
                }
                "output.top" => {
                    self.output.get_or_insert_with(Default::default).top =
                        Some(parse_value(key, value_str, "integer")?);
                }
                "output.one-based" => {
                    self.output.get_or_insert_with(Default::default).one_based =
                        Some(parse_value(key, value_str, "boolean")?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

fn parse_value<T: FromStr>(key: &str, value_str: &str, kind: &str) -> Result<T> {
    value_str.parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value_str))
    })
}

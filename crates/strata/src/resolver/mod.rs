//! The ordered resolution pipeline.
//!
//! A [`Resolver`] snapshots its process collaborators (argument list,
//! environment variables, runtime-environment name) at construction and
//! then folds the configuration layers together in fixed precedence
//! order:
//!
//! 1. base file,
//! 2. environment override file,
//! 3. mapped environment variables,
//! 4. command-line supplied file,
//! 5. mapped command-line switches.
//!
//! Any loader failure aborts the remaining stages; optional sources that
//! simply do not apply leave their layer absent and resolution continues.

use std::collections::HashMap;

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::{Map, Value};
use strata_core::Layer;
use tokio::task::JoinSet;
use tracing::debug;

use crate::{
    coerce::TypeCoercionMap,
    expr, file,
    merge::{self, MergeOptions},
    options::ResolveOptions,
    ConfigResult,
};

/// Process variable naming the current runtime environment (for example
/// `production`); its absence disables environment-file lookup entirely
pub const ENVIRONMENT_VARIABLE: &str = "RUN_ENV";

/// Resolves configuration against a snapshot of process state.
///
/// Two resolvers never share mutable state, so independent resolutions
/// cannot interleave; each call to [`Resolver::resolve`] threads its own
/// state through the pipeline and returns everything in the
/// [`Resolution`].
#[derive(Debug, Clone)]
pub struct Resolver {
    args: Vec<String>,
    env_vars: HashMap<String, String>,
    environment: Option<String>,
}

impl Resolver {
    /// Creates a resolver over explicit collaborators: the argument list
    /// (excluding the program name), an environment-variable mapping, and
    /// the runtime-environment name
    pub fn new(
        args: Vec<String>,
        env_vars: HashMap<String, String>,
        environment: Option<String>,
    ) -> Self {
        Self {
            args,
            env_vars,
            environment: environment.filter(|name| !name.is_empty()),
        }
    }

    /// Captures the current process's arguments and environment
    pub fn from_process() -> Self {
        let environment = std::env::var(ENVIRONMENT_VARIABLE).ok();

        Self::new(
            std::env::args().skip(1).collect(),
            std::env::vars().collect(),
            environment,
        )
    }

    /// Replaces the argument list (excluding the program name)
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the environment-variable snapshot
    pub fn with_env_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env_vars = vars
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        self
    }

    /// Sets the runtime-environment name
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into()).filter(|name| !name.is_empty());
        self
    }

    /// Runs the full resolution pipeline and returns the resolved
    /// configuration along with every intermediate layer
    pub async fn resolve(&self, options: ResolveOptions) -> ConfigResult<Resolution> {
        let (base, types) = self.load_base(&options).await?;

        let mut override_paths = Vec::new();

        let environment = self.load_environment_file(&options).await?;
        let environment =
            self.apply_environment_variables(&options, &types, &mut override_paths, environment);

        let command_line = self.load_command_line_file(&options).await?;
        let command_line =
            self.apply_command_line_switches(&options, &types, &mut override_paths, command_line);

        let strict = options.strict && options.base_path().is_some();
        let empty = Value::Object(Map::new());
        let config = merge::merge(
            &[
                &base,
                environment.as_ref().unwrap_or(&empty),
                command_line.as_ref().unwrap_or(&empty),
            ],
            MergeOptions {
                schema: strict.then_some(&types),
                allowed_paths: &override_paths,
                strip_empty: true,
            },
        );

        Ok(Resolution {
            options,
            base,
            environment,
            command_line,
            config,
        })
    }

    /// Stage 3: the base file, which also seeds the type coercion map.
    /// A configured path that is missing or unparsable is fatal.
    async fn load_base(
        &self,
        options: &ResolveOptions,
    ) -> ConfigResult<(Value, TypeCoercionMap)> {
        let Some(path) = options.base_path() else {
            debug!("no base configuration path set");
            return Ok((Value::Object(Map::new()), TypeCoercionMap::default()));
        };

        let contents = file::load_config_file(path, Layer::Base).await?;
        let types = TypeCoercionMap::from_base(&contents);
        debug!(%path, fields = types.len(), "loaded base configuration");

        Ok((contents, types))
    }

    /// Stage 4: probe every search path for `<env>.json` and `<env>.yml`
    /// concurrently and load the last existing candidate in probe order.
    /// JSON candidates for all paths come before YAML candidates for all
    /// paths, so a YAML match anywhere wins over any JSON match, and
    /// later search paths win within one format. No match is not an
    /// error.
    async fn load_environment_file(
        &self,
        options: &ResolveOptions,
    ) -> ConfigResult<Option<Value>> {
        let Some(environment) = self.environment.as_deref() else {
            debug!("no runtime environment set, skipping environment file lookup");
            return Ok(None);
        };

        if options.environment_search_paths.is_empty() {
            return Ok(None);
        }

        let mut candidates: Vec<Utf8PathBuf> = Vec::new();
        for extension in ["json", "yml"] {
            for dir in &options.environment_search_paths {
                candidates.push(dir.join(format!("{environment}.{extension}")));
            }
        }

        let mut probes = JoinSet::new();
        for (index, path) in candidates.iter().cloned().enumerate() {
            probes.spawn(async move { (index, file::file_exists(&path).await) });
        }

        let mut selected: Option<usize> = None;
        while let Some(probed) = probes.join_next().await {
            if let Ok((index, true)) = probed {
                selected = Some(selected.map_or(index, |current| current.max(index)));
            }
        }

        let Some(index) = selected else {
            debug!(environment, "no environment override file found");
            return Ok(None);
        };

        let path = &candidates[index];
        debug!(%path, environment, "loading environment override file");

        file::load_config_file(path, Layer::Environment).await.map(Some)
    }

    /// Stage 5: fold mapped environment variables over the environment
    /// layer. Variables are applied in sorted name order so resolution is
    /// deterministic.
    fn apply_environment_variables(
        &self,
        options: &ResolveOptions,
        types: &TypeCoercionMap,
        override_paths: &mut Vec<String>,
        current: Option<Value>,
    ) -> Option<Value> {
        if options.read_environment_map.is_empty() {
            return current;
        }

        let mut names: Vec<&String> = self
            .env_vars
            .keys()
            .filter(|name| options.read_environment_map.contains_key(*name))
            .collect();
        names.sort();

        let mut fragments = Vec::new();
        for name in names {
            let expression = &options.read_environment_map[name];
            debug!(variable = %name, path = %expression, "applying environment variable override");
            fragments.push(self.override_fragment(expression, &self.env_vars[name], types, override_paths));
        }

        Some(fold_fragments(current, fragments))
    }

    /// Stage 6: scan the argument list for the first configured switch
    /// followed by a value and load that file. Absence is a no-op;
    /// a named file that is missing or unparsable is fatal.
    async fn load_command_line_file(
        &self,
        options: &ResolveOptions,
    ) -> ConfigResult<Option<Value>> {
        if options.command_line_switches.is_empty() {
            return Ok(None);
        }

        let path = self
            .args
            .iter()
            .zip(self.args.iter().skip(1))
            .find(|(arg, _)| options.command_line_switches.iter().any(|s| s == *arg))
            .map(|(_, value)| value);

        let Some(path) = path else {
            return Ok(None);
        };

        debug!(%path, "loading command-line configuration file");

        file::load_config_file(Utf8Path::new(path), Layer::CommandLine)
            .await
            .map(Some)
    }

    /// Stage 7: fold mapped command-line switches over the command-line
    /// layer; every matching switch contributes in argument order
    fn apply_command_line_switches(
        &self,
        options: &ResolveOptions,
        types: &TypeCoercionMap,
        override_paths: &mut Vec<String>,
        current: Option<Value>,
    ) -> Option<Value> {
        if options.read_command_line_map.is_empty() {
            return current;
        }

        let mut fragments = Vec::new();
        for (arg, value) in self.args.iter().zip(self.args.iter().skip(1)) {
            if let Some(expression) = options.read_command_line_map.get(arg) {
                debug!(switch = %arg, path = %expression, "applying command-line override");
                fragments.push(self.override_fragment(expression, value, types, override_paths));
            }
        }

        Some(fold_fragments(current, fragments))
    }

    /// Builds one override fragment, coercing the raw value through the
    /// type map and recording the target path for strict-mode exemption
    fn override_fragment(
        &self,
        expression: &str,
        raw: &str,
        types: &TypeCoercionMap,
        override_paths: &mut Vec<String>,
    ) -> Value {
        let tokens = expr::parse_path(expression);
        let key_path = tokens.join(".");
        let coercion = types.get(&key_path);

        if !tokens.is_empty() {
            override_paths.push(key_path);
        }

        expr::build_fragment(&tokens, raw, coercion)
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::from_process()
    }
}

/// Non-strict layer-internal merge of override fragments over an
/// existing layer
fn fold_fragments(current: Option<Value>, fragments: Vec<Value>) -> Value {
    let empty = Value::Object(Map::new());
    let mut layers: Vec<&Value> = vec![current.as_ref().unwrap_or(&empty)];
    layers.extend(fragments.iter());

    merge::merge(&layers, MergeOptions::default())
}

/// Resolves configuration using the current process's arguments and
/// environment
pub async fn resolve(options: ResolveOptions) -> ConfigResult<Resolution> {
    Resolver::from_process().resolve(options).await
}

/// The outcome of one resolution: the final configuration plus every
/// intermediate layer and the effective options, kept readable for
/// diagnostics
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    options: ResolveOptions,
    base: Value,
    environment: Option<Value>,
    command_line: Option<Value>,
    config: Value,
}

impl Resolution {
    /// The resolved configuration
    pub fn config(&self) -> &Value {
        &self.config
    }

    /// Consumes the resolution, returning the resolved configuration
    pub fn into_config(self) -> Value {
        self.config
    }

    /// The base layer (empty mapping when no base file was configured)
    pub fn base(&self) -> &Value {
        &self.base
    }

    /// The environment layer, if any source for it applied
    pub fn environment(&self) -> Option<&Value> {
        self.environment.as_ref()
    }

    /// The command-line layer, if any source for it applied
    pub fn command_line(&self) -> Option<&Value> {
        self.command_line.as_ref()
    }

    /// The effective options this resolution ran with
    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }
}

use ::rhai::{AST, Array, Dynamic, Engine, Map, Scope};
use tracing::debug;

use crate::bail;
use crate::error::{ErrorKind, PodLogsResult};
use crate::key::KeyDeriver;
use crate::podlogs_error;

const MAX_OPERATIONS: u64 = 100_000;
const MAX_CALL_LEVELS: usize = 32;
const MAX_EXPR_DEPTH: usize = 64;

/// [`KeyDeriver`] evaluating a [Rhai](https://rhai.rs) expression.
///
/// The expression is compiled once and evaluated per pod against a fresh scope
/// holding:
///
/// - `namespace` and `name`, copied from `metadata`,
/// - every top-level field of the pod (`apiVersion`, `kind`, `metadata`, `spec`, `status`),
/// - `pod`, the whole object.
///
/// So the default `namespace + "/" + name` yields `<namespace>/<name>`, and
/// `metadata.labels["app"] + "/" + name` groups logs by application.
pub struct RhaiKeyDeriver {
    engine: Engine,
    ast: AST,
}

impl RhaiKeyDeriver {
    /// Compiles `expression`. Fails with [`ErrorKind::KeyExpressionInvalid`] on syntax errors.
    pub fn compile(expression: &str) -> PodLogsResult<Self> {
        let mut engine = Engine::new();
        engine.set_max_operations(MAX_OPERATIONS);
        engine.set_max_call_levels(MAX_CALL_LEVELS);
        engine.set_max_expr_depths(MAX_EXPR_DEPTH, MAX_EXPR_DEPTH);
        engine.disable_symbol("eval");

        let ast = engine.compile(expression).map_err(|err| {
            podlogs_error!(
                ErrorKind::KeyExpressionInvalid,
                "failed to compile key expression",
                format!("{expression}: {err}")
            )
        })?;

        Ok(Self {
            engine,
            ast,
        })
    }

    fn build_scope(pod: &serde_json::Value) -> Scope<'static> {
        let mut scope = Scope::new();

        if let serde_json::Value::Object(fields) = pod {
            for (field, value) in fields {
                scope.push_constant_dynamic(field.as_str(), json_to_dynamic(value));
            }
        }

        let metadata = pod.get("metadata");
        for field in ["namespace", "name"] {
            let value = metadata
                .and_then(|metadata| metadata.get(field))
                .map(json_to_dynamic)
                .unwrap_or(Dynamic::UNIT);
            scope.push_constant_dynamic(field, value);
        }

        scope.push_constant_dynamic("pod", json_to_dynamic(pod));

        scope
    }
}

impl KeyDeriver for RhaiKeyDeriver {
    fn derive(&self, pod: &serde_json::Value) -> PodLogsResult<String> {
        let mut scope = Self::build_scope(pod);

        let result = self
            .engine
            .eval_ast_with_scope::<Dynamic>(&mut scope, &self.ast)
            .map_err(|err| {
                podlogs_error!(
                    ErrorKind::KeyDerivationFailed,
                    "failed to evaluate key expression",
                    err
                )
            })?;

        if result.is_unit() {
            bail!(
                ErrorKind::KeyDerivationFailed,
                "key expression returned no value"
            );
        }

        if result.is_array() {
            bail!(
                ErrorKind::KeyDerivationFailed,
                "key expression returned multiple values"
            );
        }

        let type_name = result.type_name();
        let Ok(key) = result.into_string() else {
            bail!(
                ErrorKind::KeyDerivationFailed,
                "key expression returned a non-string value",
                type_name
            );
        };

        if key.is_empty() {
            bail!(
                ErrorKind::KeyDerivationFailed,
                "key expression returned an empty string"
            );
        }

        debug!(key, "derived storage key prefix");

        Ok(key)
    }
}

fn json_to_dynamic(value: &serde_json::Value) -> Dynamic {
    match value {
        serde_json::Value::Null => Dynamic::UNIT,
        serde_json::Value::Bool(b) => Dynamic::from(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Dynamic::from(i)
            } else if let Some(f) = n.as_f64() {
                Dynamic::from(f)
            } else {
                Dynamic::UNIT
            }
        }
        serde_json::Value::String(s) => Dynamic::from(s.clone()),
        serde_json::Value::Array(values) => {
            let array: Array = values.iter().map(json_to_dynamic).collect();
            Dynamic::from(array)
        }
        serde_json::Value::Object(fields) => {
            let mut map = Map::new();
            for (field, value) in fields {
                map.insert(field.as_str().into(), json_to_dynamic(value));
            }
            Dynamic::from(map)
        }
    }
}

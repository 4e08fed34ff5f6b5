//! JSON Schema compilation and validation shared by document loaders.
//!
//! Schemas ship inside the binary (`include_str!`) so validation does not
//! depend on the working directory. Validation failures are reported with
//! every violation on its own line.

use anyhow::{Context, Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde_json::Value;

/// Parse and compile a schema embedded at build time.
pub(crate) fn compile_embedded_schema(name: &str, raw: &str) -> Result<JSONSchema> {
    let schema: Value =
        serde_json::from_str(raw).with_context(|| format!("parsing {name} schema"))?;
    compile_schema(name, &schema)
}

pub(crate) fn compile_schema(name: &str, schema: &Value) -> Result<JSONSchema> {
    JSONSchema::compile(schema).map_err(|err| anyhow!("compiling {name} schema: {err}"))
}

/// Validate `instance`, collecting every violation into one error.
pub(crate) fn validate_instance(schema: &JSONSchema, instance: &Value, name: &str) -> Result<()> {
    if let Err(errors) = schema.validate(instance) {
        let details = errors
            .map(|err| err.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        bail!("{name} failed schema validation:\n{details}");
    }
    Ok(())
}

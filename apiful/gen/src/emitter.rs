//! Declaration file emission.
//!
//! ## Output Structure
//!
//! ```text
//! <banner>
//! declare module 'apiful/schema' {       # hub: imports, repository, helpers
//!   ...
//! }
//!
//! declare module 'apiful/__petStore__' { # one block per service
//!   ...
//! }
//! ```
//!
//! Services are resolved and compiled concurrently, but blocks always follow
//! registration order, so the same inputs produce byte-identical output.

use futures::future::join_all;
use tracing::{debug, error, info};

use crate::compiler::SchemaCompiler;
use crate::errors::GeneratorError;
use crate::naming::property_key;
use crate::registry::{Service, ServiceRegistry};

/// Banner placed at the top of every generated declaration file.
pub const BANNER: &str = "/* eslint-disable */
/* prettier-ignore */
// @ts-nocheck
// This file was automatically generated by apiful. Do not edit manually.
";

/// Module path of the hub block.
pub const HUB_MODULE: &str = "apiful/schema";

/// Declarations used for a service whose types could not be generated.
pub const PLACEHOLDER_TYPES: &str = "export type paths = Record<string, never>
export type webhooks = Record<string, never>
export interface components {
  schemas: never
  responses: never
  parameters: never
  requestBodies: never
  headers: never
  pathItems: never
}
export type $defs = Record<string, never>
export type operations = Record<string, never>
";

/// HTTP methods an OpenAPI path item may define.
const HTTP_METHODS: &str = "'get' | 'put' | 'post' | 'delete' | 'options' | 'head' | 'patch' | 'trace'";

/// Module path holding the compiled types of service `id`.
///
/// ## Examples
///
/// ```
/// use apiful_gen::emitter::service_module;
///
/// assert_eq!(service_module("petStore"), "apiful/__petStore__");
/// ```
pub fn service_module(id: &str) -> String {
    format!("apiful/__{id}__")
}

/// Generates the declaration file for every service that declares a schema.
///
/// A service whose schema cannot be resolved or compiled gets
/// [`PLACEHOLDER_TYPES`] instead; the failure is logged with the service id
/// and never affects the other services.
pub async fn emit(registry: &ServiceRegistry, compiler: &dyn SchemaCompiler) -> String {
    let services: Vec<Service<'_>> = registry.with_schemas().collect();
    info!(services = services.len(), "generating declarations");

    let types = join_all(
        services
            .iter()
            .map(|service| service_types(*service, compiler)),
    )
    .await;

    let mut blocks = Vec::with_capacity(services.len() + 2);
    blocks.push(BANNER.trim_end().to_string());
    blocks.push(hub_block(&services));
    for (service, types) in services.iter().zip(&types) {
        blocks.push(module_block(service.id, types));
    }

    let mut output = blocks.join("\n\n");
    output.push('\n');
    output
}

/// Resolves and compiles one service, degrading to placeholders on failure.
async fn service_types(service: Service<'_>, compiler: &dyn SchemaCompiler) -> String {
    match compile_service(service, compiler).await {
        Ok(types) => {
            debug!(service = service.id, bytes = types.len(), "generated service types");
            types
        }
        Err(err) => {
            error!(
                service = service.id,
                error = %err,
                "Failed to generate types, using empty placeholder declarations"
            );
            PLACEHOLDER_TYPES.to_string()
        }
    }
}

async fn compile_service(
    service: Service<'_>,
    compiler: &dyn SchemaCompiler,
) -> Result<String, GeneratorError> {
    let Some(source) = &service.options.schema else {
        return Ok(PLACEHOLDER_TYPES.to_string());
    };

    let document = source.resolve(service.id).await?;
    compiler
        .compile(&document, service.options.compiler_options.as_ref())
        .await
        .map_err(|e| GeneratorError::Compile {
            service: service.id.to_string(),
            message: e.to_string(),
        })
}

fn hub_block(services: &[Service<'_>]) -> String {
    let imports = services
        .iter()
        .map(|s| {
            format!(
                "  import {{ paths as {p}Paths, operations as {p}Operations }} from '{}'",
                service_module(s.id),
                p = s.identifier
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let repository = services
        .iter()
        .map(|s| format!("    {}: {}Paths", property_key(s.id), s.identifier))
        .collect::<Vec<_>>()
        .join("\n");

    let helpers = services
        .iter()
        .map(|s| helper_aliases(s.identifier))
        .collect::<Vec<_>>()
        .join("\n\n");

    let mut sections = Vec::new();
    if !imports.is_empty() {
        sections.push(imports);
    }
    sections.push(format!(
        "  interface OpenAPISchemaRepository {{\n{repository}{}  }}",
        if repository.is_empty() { "" } else { "\n" }
    ));
    if !helpers.is_empty() {
        sections.push(helpers);
    }

    format!("declare module '{HUB_MODULE}' {{\n{}\n}}", sections.join("\n\n"))
}

/// Type helpers for one service, all derived by indexing into its paths.
fn helper_aliases(p: &str) -> String {
    let pm = format!("P extends {p}Path, M extends {p}Method<P>");
    [
        format!("  export type {p}Path = keyof {p}Paths"),
        format!("  export type {p}Method<P extends {p}Path> = Extract<keyof {p}Paths[P], {HTTP_METHODS}>"),
        format!("  export type {p}Operation<{pm}> = {p}Paths[P][M]"),
        format!("  export type {p}OperationById<T extends keyof {p}Operations> = {p}Operations[T]"),
        format!(
            "  export type {p}PathParams<{pm}> = {p}Operation<P, M> extends {{ parameters: {{ path?: infer U }} }} ? U : never"
        ),
        format!(
            "  export type {p}Query<{pm}> = {p}Operation<P, M> extends {{ parameters: {{ query?: infer U }} }} ? U : never"
        ),
        format!(
            "  export type {p}RequestBody<{pm}> = {p}Operation<P, M> extends {{ requestBody?: {{ content: {{ 'application/json': infer U }} }} }} ? U : never"
        ),
        format!(
            "  export type {p}Responses<{pm}> = {p}Operation<P, M> extends {{ responses: infer R }}\n    ? {{ [S in keyof R]: R[S] extends {{ content: {{ 'application/json': infer U }} }} ? U : unknown }}\n    : never"
        ),
        format!(
            "  export type {p}Response<\n    {pm},\n    S extends keyof {p}Responses<P, M> = 200 extends keyof {p}Responses<P, M> ? 200 : never\n  > = {p}Responses<P, M>[S]"
        ),
    ]
    .join("\n")
}

fn module_block(id: &str, types: &str) -> String {
    format!(
        "declare module '{}' {{\n{}\n}}",
        service_module(id),
        normalize_indentation(types).trim_end()
    )
}

/// Re-indents compiler output for nesting inside a module block.
///
/// Each leading run of four spaces becomes two, then every line is
/// indented by two more. Trailing whitespace is removed from each line.
///
/// ## Examples
///
/// ```
/// use apiful_gen::emitter::normalize_indentation;
///
/// assert_eq!(
///     normalize_indentation("export interface A {\n    b: string\n}"),
///     "  export interface A {\n    b: string\n  }"
/// );
/// ```
pub fn normalize_indentation(code: &str) -> String {
    code.lines()
        .map(|line| {
            let trimmed = line.trim_start_matches(' ');
            let leading = line.len() - trimmed.len();
            let (groups, rest) = (leading / 4, leading % 4);
            let indent = "  ".repeat(groups + 1) + &" ".repeat(rest);
            format!("{indent}{trimmed}").trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CompilerError;
    use crate::registry::ServiceOptions;
    use crate::source::SchemaSource;
    use serde_json::{Map, Value, json};
    use tracing_test::traced_test;

    fn stub(document: &Value, _: Option<&Map<String, Value>>) -> Result<String, CompilerError> {
        if document.get("broken").is_some() {
            return Err(CompilerError::Rejected("unsupported document".to_string()));
        }
        Ok("export interface paths {\n    \"/pets\": {\n        get: operations[\"listPets\"]\n    }\n}\nexport interface operations {\n    listPets: {}\n}\n".to_string())
    }

    fn registry(entries: &[(&str, Value)]) -> ServiceRegistry {
        let mut registry = ServiceRegistry::new();
        for (id, document) in entries {
            registry
                .register(*id, ServiceOptions::new().with_schema(SchemaSource::Inline(document.clone())))
                .unwrap();
        }
        registry
    }

    #[test]
    fn indentation_groups_of_four_are_halved() {
        assert_eq!(normalize_indentation("a\n    b\n        c"), "  a\n    b\n      c");
        assert_eq!(normalize_indentation("      six"), "      six");
        assert_eq!(normalize_indentation("   three"), "     three");
        assert_eq!(normalize_indentation("x   \n"), "  x");
        assert_eq!(normalize_indentation("a\n\nb"), "  a\n\n  b");
    }

    #[tokio::test]
    async fn emits_hub_and_module_blocks() {
        let out = emit(&registry(&[("petStore", json!({ "openapi": "3.1.0" }))]), &stub).await;

        assert!(out.starts_with(BANNER));
        assert!(out.contains("declare module 'apiful/schema' {"));
        assert!(out.contains(
            "  import { paths as PetStorePaths, operations as PetStoreOperations } from 'apiful/__petStore__'"
        ));
        assert!(out.contains("  interface OpenAPISchemaRepository {\n    petStore: PetStorePaths\n  }"));
        assert!(out.contains("export type PetStoreResponse<"));
        assert!(out.contains("export type PetStorePathParams<P extends PetStorePath, M extends PetStoreMethod<P>>"));
        assert!(out.contains("declare module 'apiful/__petStore__' {\n  export interface paths {\n    \"/pets\": {\n      get: operations[\"listPets\"]\n    }\n  }"));
        assert!(out.ends_with("}\n"));
    }

    #[tokio::test]
    async fn blocks_follow_registration_order() {
        let out = emit(
            &registry(&[("zoo", json!({})), ("alpha", json!({}))]),
            &stub,
        )
        .await;
        let zoo = out.find("declare module 'apiful/__zoo__'").unwrap();
        let alpha = out.find("declare module 'apiful/__alpha__'").unwrap();
        assert!(zoo < alpha);
    }

    #[tokio::test]
    async fn output_is_idempotent() {
        let registry = registry(&[("a", json!({})), ("b-c", json!({}))]);
        let first = emit(&registry, &stub).await;
        let second = emit(&registry, &stub).await;
        assert_eq!(first, second);
        assert!(first.contains("    \"b-c\": BCPaths"));
    }

    #[tokio::test]
    #[traced_test]
    async fn compiler_failures_degrade_to_placeholders() {
        let out = emit(
            &registry(&[("bad", json!({ "broken": true })), ("good", json!({}))]),
            &stub,
        )
        .await;

        let bad = out.find("declare module 'apiful/__bad__'").unwrap();
        let good = out.find("declare module 'apiful/__good__'").unwrap();
        assert!(out[bad..good].contains("  export type paths = Record<string, never>"));
        assert!(out[bad..good].contains("    pathItems: never"));
        assert!(out[good..].contains("listPets"));

        assert!(logs_contain("Failed to generate types"));
        assert!(logs_contain("bad"));
        assert!(logs_contain("unsupported document"));
    }

    #[tokio::test]
    #[traced_test]
    async fn resolution_failures_degrade_to_placeholders() {
        let mut registry = ServiceRegistry::new();
        registry
            .register(
                "remote",
                ServiceOptions::new()
                    .with_schema(SchemaSource::resolver(|| async { Err("connection refused".to_string()) })),
            )
            .unwrap();

        let out = emit(&registry, &stub).await;
        assert!(out.contains("declare module 'apiful/__remote__' {\n  export type paths = Record<string, never>"));
        assert!(logs_contain("connection refused"));
    }

    #[tokio::test]
    async fn services_without_schema_are_skipped() {
        let mut registry = registry(&[("a", json!({}))]);
        registry
            .register("urlOnly", ServiceOptions::new().with_url("https://x.example"))
            .unwrap();
        let out = emit(&registry, &stub).await;
        assert!(!out.contains("UrlOnly"));
    }

    #[tokio::test]
    async fn empty_registry_still_emits_a_hub() {
        let out = emit(&ServiceRegistry::new(), &stub).await;
        assert!(out.contains("declare module 'apiful/schema' {\n  interface OpenAPISchemaRepository {\n  }\n}"));
    }
}

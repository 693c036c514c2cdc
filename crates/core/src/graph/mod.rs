//! Resource graph assembly: role, function, optional alias, output.
//!
//! Resources are added to the sink in strict dependency order. A template
//! consumer that resolves references in declaration order requires the role
//! to be declared before the function that attaches it, and the function
//! before its alias and output.

use std::collections::HashMap;

use serde_json::{json, Value};
use tracing::debug;

use crate::errors::{BuildError, BuildResult};
use crate::model::{AliasSpec, DeploymentContext, ResolvedConfig, RoleDescriptor, SourcePayload};
use crate::template::{OutputSpec, Resource, ResourceRef, TemplateSink};

const POLICY_DOCUMENT_VERSION: &str = "2012-10-17";

/// Strip every non-alphanumeric character, preserving order.
///
/// Logical ids in the template schema permit only alphanumerics. Characters
/// are stripped, not escaped, so distinct inputs can collapse to the same
/// id; the sink catches those as duplicates.
pub fn logical_id_fragment(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_alphanumeric).collect()
}

/// Emits one function's resources into a template sink.
///
/// Exclusively owns the sink borrow for the duration of one build; the same
/// builder is reused across all functions so shared roles can be detected.
pub struct GraphBuilder<'a, S: TemplateSink> {
    sink: &'a mut S,
    context: &'a DeploymentContext,
    /// Roles already emitted, keyed by logical id. A second function using
    /// an identical descriptor reuses the existing role; a different
    /// descriptor under the same id is a collision.
    roles: HashMap<String, (RoleDescriptor, ResourceRef)>,
}

impl<'a, S: TemplateSink> GraphBuilder<'a, S> {
    pub fn new(sink: &'a mut S, context: &'a DeploymentContext) -> Self {
        Self { sink, context, roles: HashMap::new() }
    }

    /// Add the role, function, optional alias, and output for one function,
    /// in that order. Returns the function's reference.
    pub fn add_function(&mut self, config: &ResolvedConfig) -> BuildResult<ResourceRef> {
        let base_id = logical_id_fragment(&format!(
            "{}{}{}",
            config.function_name, self.context.stack_name, self.context.stage
        ));

        let role_ref = self.add_role(&config.role)?;
        let function_ref = self.add_function_resource(&base_id, config, role_ref)?;
        if let Some(alias) = &config.alias {
            self.add_alias(alias, &function_ref)?;
        }
        self.add_output(&base_id, config, &function_ref)?;

        debug!(function = %config.function_name, logical_id = %base_id, "emitted resource graph");
        Ok(function_ref)
    }

    fn add_role(&mut self, role: &RoleDescriptor) -> BuildResult<ResourceRef> {
        let logical_id = logical_id_fragment(&role.name);
        if let Some((existing, reference)) = self.roles.get(&logical_id) {
            if existing == role {
                return Ok(reference.clone());
            }
            return Err(BuildError::DuplicateIdentifier(logical_id));
        }

        let mut properties = json!({
            "RoleName": role.name,
            "AssumeRolePolicyDocument": {
                "Version": POLICY_DOCUMENT_VERSION,
                "Statement": [{
                    "Effect": "Allow",
                    "Principal": { "Service": role.trust_services },
                    "Action": "sts:AssumeRole",
                }],
            },
        });
        if !role.statements.is_empty() {
            let statements: Vec<Value> = role
                .statements
                .iter()
                .map(|statement| {
                    json!({
                        "Effect": statement.effect,
                        "Action": statement.actions,
                        "Resource": statement.resources,
                    })
                })
                .collect();
            properties["Policies"] = json!([{
                "PolicyName": format!("{}Policy", role.name),
                "PolicyDocument": {
                    "Version": POLICY_DOCUMENT_VERSION,
                    "Statement": statements,
                },
            }]);
        }

        let reference = self.sink.add_resource(Resource {
            logical_id: logical_id.clone(),
            kind: "AWS::IAM::Role".to_string(),
            properties,
        })?;
        self.roles.insert(logical_id, (role.clone(), reference.clone()));
        Ok(reference)
    }

    fn add_function_resource(
        &mut self,
        base_id: &str,
        config: &ResolvedConfig,
        role: ResourceRef,
    ) -> BuildResult<ResourceRef> {
        let code = match &config.source {
            SourcePayload::Inline(lines) => json!({ "ZipFile": lines.join("\n") }),
            SourcePayload::S3 { bucket, key } => json!({ "S3Bucket": bucket, "S3Key": key }),
        };
        // The logical id is schema-constrained; the function name shown in
        // consoles keeps the readable separators.
        let display_name = format!(
            "{}-{}-{}",
            config.function_name, self.context.stack_name, self.context.stage
        );
        let properties = json!({
            "FunctionName": display_name,
            "Handler": config.runtime.handler,
            "Runtime": config.runtime.runtime,
            "MemorySize": config.runtime.memory_size,
            "Timeout": config.runtime.timeout,
            "Role": role.get_att("Arn"),
            "Code": code,
            "Environment": { "Variables": config.environment },
        });
        self.sink.add_resource(Resource {
            logical_id: base_id.to_string(),
            kind: "AWS::Lambda::Function".to_string(),
            properties,
        })
    }

    fn add_alias(&mut self, alias: &AliasSpec, function: &ResourceRef) -> BuildResult<ResourceRef> {
        let properties = json!({
            "Name": alias.name,
            "FunctionName": function.reference(),
            "FunctionVersion": alias.function_version,
        });
        self.sink.add_resource(Resource {
            logical_id: logical_id_fragment(&format!("{}Alias", alias.name)),
            kind: "AWS::Lambda::Alias".to_string(),
            properties,
        })
    }

    fn add_output(
        &mut self,
        base_id: &str,
        config: &ResolvedConfig,
        function: &ResourceRef,
    ) -> BuildResult<()> {
        self.sink.add_output(OutputSpec {
            logical_id: base_id.to_string(),
            description: format!(
                "ARN of {} in stage {}",
                config.function_name, self.context.stage
            ),
            value: function.get_att("Arn"),
            export_name: base_id.to_string(),
        })
    }
}

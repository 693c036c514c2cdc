//! CloudFormation-shaped JSON template sink.

use indexmap::IndexMap;
use serde_json::{json, Value};

use crate::errors::{BuildError, BuildResult};
use crate::template::{OutputSpec, ParameterSpec, Resource, ResourceRef, TemplateSink};

const TEMPLATE_FORMAT_VERSION: &str = "2010-09-09";

/// Template document with insertion-ordered sections.
///
/// Resources serialize in the order they were added, which preserves the
/// role-before-function declaration order the graph builder guarantees.
#[derive(Debug, Default)]
pub struct JsonTemplate {
    description: Option<String>,
    parameters: IndexMap<String, Value>,
    resources: IndexMap<String, Value>,
    outputs: IndexMap<String, Value>,
}

impl JsonTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Logical ids of the resources added so far, in declaration order.
    pub fn resource_ids(&self) -> Vec<&str> {
        self.resources.keys().map(String::as_str).collect()
    }

    /// Logical ids of the outputs added so far, in declaration order.
    pub fn output_ids(&self) -> Vec<&str> {
        self.outputs.keys().map(String::as_str).collect()
    }
}

impl TemplateSink for JsonTemplate {
    fn add_resource(&mut self, resource: Resource) -> BuildResult<ResourceRef> {
        if self.resources.contains_key(&resource.logical_id) {
            return Err(BuildError::DuplicateIdentifier(resource.logical_id));
        }
        let entry = json!({
            "Type": resource.kind,
            "Properties": resource.properties,
        });
        let reference = ResourceRef::new(&resource.logical_id);
        self.resources.insert(resource.logical_id, entry);
        Ok(reference)
    }

    fn add_output(&mut self, output: OutputSpec) -> BuildResult<()> {
        if self.outputs.contains_key(&output.logical_id) {
            return Err(BuildError::DuplicateIdentifier(output.logical_id));
        }
        let entry = json!({
            "Description": output.description,
            "Value": output.value,
            "Export": { "Name": output.export_name },
        });
        self.outputs.insert(output.logical_id, entry);
        Ok(())
    }

    fn add_parameter(&mut self, parameter: ParameterSpec) -> BuildResult<ResourceRef> {
        if self.parameters.contains_key(&parameter.logical_id) {
            return Err(BuildError::DuplicateIdentifier(parameter.logical_id));
        }
        let mut entry = json!({ "Type": parameter.kind });
        if let Some(description) = &parameter.description {
            entry["Description"] = json!(description);
        }
        let reference = ResourceRef::new(&parameter.logical_id);
        self.parameters.insert(parameter.logical_id, entry);
        Ok(reference)
    }

    fn serialize(&self) -> BuildResult<String> {
        let mut document = serde_json::Map::new();
        document
            .insert("AWSTemplateFormatVersion".to_string(), json!(TEMPLATE_FORMAT_VERSION));
        if let Some(description) = &self.description {
            document.insert("Description".to_string(), json!(description));
        }
        if !self.parameters.is_empty() {
            document.insert("Parameters".to_string(), serde_json::to_value(&self.parameters)?);
        }
        document.insert("Resources".to_string(), serde_json::to_value(&self.resources)?);
        if !self.outputs.is_empty() {
            document.insert("Outputs".to_string(), serde_json::to_value(&self.outputs)?);
        }
        Ok(serde_json::to_string_pretty(&Value::Object(document))?)
    }
}

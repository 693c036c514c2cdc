//! Template sink abstraction and typed resource references.
//!
//! The graph builder only composes resources and references; it never
//! inspects the serialized form. Everything format-specific lives behind the
//! [`TemplateSink`] trait, with [`JsonTemplate`] as the shipped
//! implementation.

mod json;

pub use json::JsonTemplate;

use serde_json::{json, Value};

use crate::errors::BuildResult;

/// Reference to a resource already added to a sink.
///
/// Holding one is proof the resource exists in the template, which lets the
/// graph builder require a role reference before it will construct a
/// function, and a function reference before an alias or output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    logical_id: String,
}

impl ResourceRef {
    pub fn new(logical_id: impl Into<String>) -> Self {
        Self { logical_id: logical_id.into() }
    }

    pub fn logical_id(&self) -> &str {
        &self.logical_id
    }

    /// `Ref` expression resolving to the resource's primary identifier.
    pub fn reference(&self) -> Value {
        json!({ "Ref": self.logical_id })
    }

    /// `Fn::GetAtt` expression for a runtime-resolved attribute.
    ///
    /// The canonical reference of a function is `get_att("Arn")`.
    pub fn get_att(&self, attribute: &str) -> Value {
        json!({ "Fn::GetAtt": [self.logical_id, attribute] })
    }
}

/// An abstract resource to be added to the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    /// Alphanumeric logical identifier, unique within the template.
    pub logical_id: String,
    /// Provider resource type, e.g. `AWS::IAM::Role`.
    pub kind: String,
    pub properties: Value,
}

/// One template output: an exported value with a description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSpec {
    pub logical_id: String,
    pub description: String,
    pub value: Value,
    pub export_name: String,
}

/// One template parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSpec {
    pub logical_id: String,
    /// Parameter type, e.g. `String`.
    pub kind: String,
    pub description: Option<String>,
}

/// Accumulator for resources, outputs, and parameters.
///
/// A sink is exclusively owned by one build; it is not meant to be shared
/// across concurrent builds. Add operations reject duplicate logical ids so
/// that two inputs collapsing to the same sanitized identifier fail loudly
/// instead of silently overwriting each other.
pub trait TemplateSink {
    fn add_resource(&mut self, resource: Resource) -> BuildResult<ResourceRef>;
    fn add_output(&mut self, output: OutputSpec) -> BuildResult<()>;
    fn add_parameter(&mut self, parameter: ParameterSpec) -> BuildResult<ResourceRef>;
    fn serialize(&self) -> BuildResult<String>;
}

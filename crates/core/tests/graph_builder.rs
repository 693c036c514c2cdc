use std::collections::BTreeMap;

use foundry_core::errors::BuildError;
use foundry_core::graph::{logical_id_fragment, GraphBuilder};
use foundry_core::model::{
    AliasSpec, DeploymentContext, PolicyStatement, ResolvedConfig, RoleDescriptor,
    RuntimeSettings, SourcePayload,
};
use foundry_core::template::{JsonTemplate, TemplateSink};
use serde_json::Value;

fn role(name: &str) -> RoleDescriptor {
    RoleDescriptor {
        name: name.to_string(),
        trust_services: vec!["lambda.amazonaws.com".to_string()],
        statements: vec![PolicyStatement {
            effect: "Allow".to_string(),
            actions: vec!["logs:PutLogEvents".to_string()],
            resources: vec!["*".to_string()],
        }],
    }
}

fn config(name: &str, role_name: &str) -> ResolvedConfig {
    ResolvedConfig {
        function_name: name.to_string(),
        source: SourcePayload::Inline(vec!["def handler(event, context):".into(), "    pass".into()]),
        role: role(role_name),
        environment: BTreeMap::new(),
        alias: None,
        runtime: RuntimeSettings {
            handler: format!("{name}_handler"),
            runtime: "python3.12".to_string(),
            memory_size: 128,
            timeout: 60,
        },
    }
}

fn parse(template: &JsonTemplate) -> Value {
    serde_json::from_str(&template.serialize().expect("serialize")).expect("parse template")
}

#[test]
fn composite_identifier_matches_documented_example() {
    assert_eq!(logical_id_fragment("my-funcprodv1"), "myfuncprodv1");
}

#[test]
fn role_is_declared_before_function_before_output() {
    let context = DeploymentContext::new("acct", "dev");
    let mut template = JsonTemplate::new();
    let mut builder = GraphBuilder::new(&mut template, &context);

    builder.add_function(&config("billing", "billingIAMRole")).expect("add function");

    assert_eq!(template.resource_ids(), ["billingIAMRole", "billingacctdev"]);
    assert_eq!(template.output_ids(), ["billingacctdev"]);
}

#[test]
fn function_resource_carries_settings_and_role_reference() {
    let context = DeploymentContext::new("acct", "dev");
    let mut template = JsonTemplate::new();
    let mut builder = GraphBuilder::new(&mut template, &context);

    let mut cfg = config("billing", "billingIAMRole");
    cfg.environment.insert("LOG_LEVEL".into(), "debug".into());
    cfg.environment.insert("RETRIES".into(), "3".into());
    builder.add_function(&cfg).expect("add function");

    let doc = parse(&template);
    let function = &doc["Resources"]["billingacctdev"];
    assert_eq!(function["Type"], "AWS::Lambda::Function");

    let props = &function["Properties"];
    assert_eq!(props["FunctionName"], "billing-acct-dev");
    assert_eq!(props["Handler"], "billing_handler");
    assert_eq!(props["Runtime"], "python3.12");
    assert_eq!(props["MemorySize"], 128);
    assert_eq!(props["Timeout"], 60);
    assert_eq!(props["Role"]["Fn::GetAtt"][0], "billingIAMRole");
    assert_eq!(props["Role"]["Fn::GetAtt"][1], "Arn");
    assert_eq!(
        props["Code"]["ZipFile"],
        "def handler(event, context):\n    pass"
    );

    let variables = props["Environment"]["Variables"].as_object().expect("variables object");
    assert_eq!(variables.len(), 2);
    assert_eq!(variables["LOG_LEVEL"], "debug");
    assert_eq!(variables["RETRIES"], "3");
}

#[test]
fn empty_environment_is_an_empty_map_not_a_placeholder() {
    let context = DeploymentContext::new("acct", "dev");
    let mut template = JsonTemplate::new();
    let mut builder = GraphBuilder::new(&mut template, &context);

    builder.add_function(&config("billing", "billingIAMRole")).expect("add function");

    let doc = parse(&template);
    let variables = &doc["Resources"]["billingacctdev"]["Properties"]["Environment"]["Variables"];
    assert!(variables.as_object().expect("variables object").is_empty());
}

#[test]
fn function_without_alias_emits_no_alias_resource() {
    let context = DeploymentContext::new("acct", "dev");
    let mut template = JsonTemplate::new();
    let mut builder = GraphBuilder::new(&mut template, &context);

    builder.add_function(&config("billing", "billingIAMRole")).expect("add function");

    let doc = parse(&template);
    let resources = doc["Resources"].as_object().expect("resources");
    assert!(resources.values().all(|r| r["Type"] != "AWS::Lambda::Alias"));
    assert_eq!(doc["Outputs"].as_object().expect("outputs").len(), 1);
}

#[test]
fn alias_references_the_function() {
    let context = DeploymentContext::new("acct", "dev");
    let mut template = JsonTemplate::new();
    let mut builder = GraphBuilder::new(&mut template, &context);

    let mut cfg = config("billing", "billingIAMRole");
    cfg.alias = Some(AliasSpec { name: "billinglive".into(), function_version: "2".into() });
    builder.add_function(&cfg).expect("add function");

    assert_eq!(
        template.resource_ids(),
        ["billingIAMRole", "billingacctdev", "billingliveAlias"]
    );

    let doc = parse(&template);
    let alias = &doc["Resources"]["billingliveAlias"];
    assert_eq!(alias["Type"], "AWS::Lambda::Alias");
    assert_eq!(alias["Properties"]["Name"], "billinglive");
    assert_eq!(alias["Properties"]["FunctionName"]["Ref"], "billingacctdev");
    assert_eq!(alias["Properties"]["FunctionVersion"], "2");
}

#[test]
fn output_exports_the_function_arn_under_the_composite_name() {
    let context = DeploymentContext::new("acct", "dev");
    let mut template = JsonTemplate::new();
    let mut builder = GraphBuilder::new(&mut template, &context);

    builder.add_function(&config("billing", "billingIAMRole")).expect("add function");

    let doc = parse(&template);
    let output = &doc["Outputs"]["billingacctdev"];
    assert_eq!(output["Value"]["Fn::GetAtt"][0], "billingacctdev");
    assert_eq!(output["Value"]["Fn::GetAtt"][1], "Arn");
    assert_eq!(output["Export"]["Name"], "billingacctdev");
    let description = output["Description"].as_str().expect("description");
    assert!(description.contains("dev"), "description should mention the stage: {description}");
}

#[test]
fn identical_shared_role_is_emitted_once_and_reused() {
    let context = DeploymentContext::new("acct", "dev");
    let mut template = JsonTemplate::new();
    let mut builder = GraphBuilder::new(&mut template, &context);

    builder.add_function(&config("billing", "sharedRole")).expect("add billing");
    builder.add_function(&config("orders", "sharedRole")).expect("add orders");

    assert_eq!(
        template.resource_ids(),
        ["sharedRole", "billingacctdev", "ordersacctdev"]
    );
}

#[test]
fn conflicting_roles_with_same_identifier_fail() {
    let context = DeploymentContext::new("acct", "dev");
    let mut template = JsonTemplate::new();
    let mut builder = GraphBuilder::new(&mut template, &context);

    builder.add_function(&config("billing", "shared-Role")).expect("add billing");
    // Different descriptor (extra statement), same sanitized id.
    let mut second = config("orders", "sharedRole");
    second.role.statements.clear();
    let err = builder.add_function(&second).unwrap_err();
    assert!(matches!(err, BuildError::DuplicateIdentifier(id) if id == "sharedRole"));
}

#[test]
fn functions_collapsing_to_the_same_identifier_fail() {
    let context = DeploymentContext::new("acct", "dev");
    let mut template = JsonTemplate::new();
    let mut builder = GraphBuilder::new(&mut template, &context);

    builder.add_function(&config("my-func", "roleA")).expect("add first");
    let err = builder.add_function(&config("myfunc", "roleB")).unwrap_err();
    assert!(matches!(err, BuildError::DuplicateIdentifier(id) if id == "myfuncacctdev"));
}

#[test]
fn storage_payload_produces_bucket_and_key_properties() {
    let context = DeploymentContext::new("acct", "dev");
    let mut template = JsonTemplate::new();
    let mut builder = GraphBuilder::new(&mut template, &context);

    let mut cfg = config("billing", "billingIAMRole");
    cfg.source = SourcePayload::S3 { bucket: "deploy-bucket".into(), key: "billing.zip".into() };
    builder.add_function(&cfg).expect("add function");

    let doc = parse(&template);
    let code = &doc["Resources"]["billingacctdev"]["Properties"]["Code"];
    assert_eq!(code["S3Bucket"], "deploy-bucket");
    assert_eq!(code["S3Key"], "billing.zip");
    assert!(code.get("ZipFile").is_none());
}

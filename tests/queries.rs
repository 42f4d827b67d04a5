//! End-to-end tests: model build -> URI parse -> SQL generation.

use odatasql::edm_model::{
    EdmModel, EdmModelBuilder, EdmModelBuilderOptions, PropertyNamingPolicy, ScalarKind,
    TypeDescription,
};
use odatasql::query_generator::ParameterValue;
use odatasql::store::ExecutionOptions;
use odatasql::{Error, ODataParseError, QueryGeneratorError};
use std::sync::Arc;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn person() -> Arc<TypeDescription> {
    TypeDescription::build("Tests", "Person")
        .property("Id", ScalarKind::Guid)
        .property("FirstName", ScalarKind::String)
        .property("LastName", ScalarKind::String)
        .property("Hometown", ScalarKind::String)
        .property("DateOfBirth", ScalarKind::DateTime)
        .nullable_property("MobilePhone", ScalarKind::String)
        .finish()
}

fn employee(person: &Arc<TypeDescription>) -> Arc<TypeDescription> {
    TypeDescription::build("Tests", "Employee")
        .base(person)
        .nullable_property("LastDayOfEmployment", ScalarKind::DateTime)
        .nullable_complex_property("EmergencyContact", person)
        .finish()
}

fn camel_case_model() -> EdmModel {
    let person = person();
    let employee = employee(&person);
    EdmModelBuilder::with_options(EdmModelBuilderOptions {
        naming_policy: PropertyNamingPolicy::CamelCase,
    })
    .add_keyed_entity_type(&person, "Id", "persons")
    .add_keyed_entity_type(&employee, "Id", "employees")
    .build()
    .unwrap()
}

#[test]
fn select_filter_and_order_by_round_trip() {
    init_logging();
    let model = camel_case_model();
    let query = model
        .create_uri_parser(
            "/persons?$select=firstName,lastName&$filter=dateOfBirth lt 1980-01-01&$orderby=dateOfBirth desc",
        )
        .unwrap()
        .create_query_definition()
        .unwrap();

    assert_eq!(
        query.query_text,
        "SELECT c.firstName,c.lastName FROM c WHERE c.dateOfBirth < @p0 ORDER BY c.dateOfBirth desc"
    );
    assert_eq!(query.parameters.len(), 1);
    assert_eq!(query.parameters[0].name, "@p0");
    let ParameterValue::DateTime(bound) = &query.parameters[0].value else {
        panic!("expected the date constant to bind as a date-time");
    };
    assert_eq!(bound.to_rfc3339(), "1980-01-01T00:00:00+00:00");
}

#[test]
fn bare_entity_set_compiles_to_select_star() {
    let model = camel_case_model();
    let query = model
        .create_uri_parser("/persons")
        .unwrap()
        .create_query_definition()
        .unwrap();

    assert_eq!(query.query_text, "SELECT * FROM c");
    assert!(query.parameters.is_empty());
}

#[test]
fn order_by_without_filter() {
    let model = camel_case_model();
    let query = model
        .create_uri_parser("/persons?$orderby=lastName,dateOfBirth desc")
        .unwrap()
        .create_query_definition()
        .unwrap();

    assert_eq!(
        query.query_text,
        "SELECT * FROM c ORDER BY c.lastName,c.dateOfBirth desc"
    );
}

#[test]
fn select_with_string_filter() {
    let model = camel_case_model();
    let query = model
        .create_uri_parser("/persons?$select=id,firstName,lastName&$filter=lastName eq 'Burton'")
        .unwrap()
        .create_query_definition()
        .unwrap();

    assert_eq!(
        query.query_text,
        "SELECT c.id,c.firstName,c.lastName FROM c WHERE c.lastName = @p0"
    );
    assert_eq!(
        query.parameters[0].value,
        ParameterValue::String("Burton".to_string())
    );
}

#[test]
fn explicit_parentheses_around_or_are_preserved() {
    let model = camel_case_model();
    let query = model
        .create_uri_parser(
            "/persons?$filter=dateOfBirth lt 1980-01-01 and (hometown eq 'Helsinki' or hometown eq 'Tampere')",
        )
        .unwrap()
        .create_query_definition()
        .unwrap();

    assert_eq!(
        query.query_text,
        "SELECT * FROM c WHERE c.dateOfBirth < @p0 and (c.hometown = @p1 or c.hometown = @p2)"
    );
    assert_eq!(query.parameters.len(), 3);
    assert_eq!(
        query.parameters[1].value,
        ParameterValue::String("Helsinki".to_string())
    );
}

#[test]
fn unparenthesized_composition_renders_differently() {
    let model = camel_case_model();
    let parenthesized = model
        .create_uri_parser(
            "/persons?$filter=dateOfBirth lt 1980-01-01 and (hometown eq 'Helsinki' or hometown eq 'Tampere')",
        )
        .unwrap()
        .create_query_definition()
        .unwrap();
    let flat = model
        .create_uri_parser(
            "/persons?$filter=dateOfBirth lt 1980-01-01 and hometown eq 'Helsinki' or hometown eq 'Tampere'",
        )
        .unwrap()
        .create_query_definition()
        .unwrap();

    assert_eq!(
        flat.query_text,
        "SELECT * FROM c WHERE c.dateOfBirth < @p0 and c.hometown = @p1 or c.hometown = @p2"
    );
    assert_ne!(parenthesized.query_text, flat.query_text);
}

#[test]
fn parenthesized_and_on_the_left_of_or_needs_no_brackets() {
    let model = camel_case_model();
    let query = model
        .create_uri_parser(
            "/persons?$filter=(dateOfBirth ge 1970-01-01 and dateOfBirth lt 2000-01-01) or firstName eq 'Peter'",
        )
        .unwrap()
        .create_query_definition()
        .unwrap();

    assert_eq!(
        query.query_text,
        "SELECT * FROM c WHERE c.dateOfBirth >= @p0 and c.dateOfBirth < @p1 or c.firstName = @p2"
    );
}

#[test]
fn empty_filter_option_is_ignored() {
    let model = camel_case_model();
    let query = model
        .create_uri_parser("/persons?$filter=")
        .unwrap()
        .create_query_definition()
        .unwrap();

    assert_eq!(query.query_text, "SELECT * FROM c");
}

#[test]
fn compilation_is_idempotent() {
    let model = camel_case_model();
    let parser = model
        .create_uri_parser("/persons?$filter=hometown eq 'Helsinki' and dateOfBirth lt 1980-01-01")
        .unwrap();

    let first = parser.create_query_definition().unwrap();
    let second = parser.create_query_definition().unwrap();
    assert_eq!(first, second);
}

#[test]
fn expand_without_select_compiles_to_select_star() {
    let model = camel_case_model();
    let query = model
        .create_uri_parser("/employees?$expand=emergencyContact")
        .unwrap()
        .create_query_definition()
        .unwrap();

    assert_eq!(query.query_text, "SELECT * FROM c");
    assert!(query.parameters.is_empty());
}

#[test]
fn expand_item_fails_select_compilation() {
    let model = camel_case_model();
    let result = model
        .create_uri_parser("/employees?$select=firstName&$expand=emergencyContact")
        .unwrap()
        .create_query_definition();

    assert!(matches!(
        result,
        Err(Error::Generator(
            QueryGeneratorError::UnsupportedSelectShape { .. }
        ))
    ));
}

#[test]
fn inherited_property_filters_on_the_derived_set() {
    let model = camel_case_model();
    let query = model
        .create_uri_parser("/employees?$filter=lastName eq 'Doe'")
        .unwrap()
        .create_query_definition()
        .unwrap();

    assert_eq!(query.query_text, "SELECT * FROM c WHERE c.lastName = @p0");
}

#[test]
fn absolute_uri_is_rejected() {
    let model = camel_case_model();
    assert!(matches!(
        model.create_uri_parser("https://example.com/persons"),
        Err(ODataParseError::InvalidRelativeReference { .. })
    ));
}

#[test]
fn top_and_skip_stay_out_of_the_query_text() {
    let model = camel_case_model();
    let parser = model
        .create_uri_parser("/persons?$top=10&$skip=30")
        .unwrap();

    let query = parser.parse_query().unwrap();
    let definition = parser.create_query_definition().unwrap();
    assert_eq!(definition.query_text, "SELECT * FROM c");

    let options = ExecutionOptions::from_query(&query);
    assert_eq!(options.top, Some(10));
    assert_eq!(options.skip, Some(30));
}

#[test]
fn count_parses_but_is_not_compiled() {
    let model = camel_case_model();
    let parser = model
        .create_uri_parser("/persons?$filter=dateOfBirth lt 1980-01-01")
        .unwrap();
    assert_eq!(parser.count(), None);

    let parser = model.create_uri_parser("/persons?$count=true").unwrap();
    assert_eq!(parser.count(), Some(true));
    assert_eq!(
        parser.create_query_definition().unwrap().query_text,
        "SELECT * FROM c"
    );
}

#[test]
fn identity_policy_keeps_declared_names_in_query_text() {
    let person = person();
    let model = EdmModelBuilder::new()
        .add_keyed_entity_type(&person, "Id", "persons")
        .build()
        .unwrap();

    let query = model
        .create_uri_parser("/persons?$filter=DateOfBirth lt 1980-01-01&$orderby=LastName")
        .unwrap()
        .create_query_definition()
        .unwrap();

    assert_eq!(
        query.query_text,
        "SELECT * FROM c WHERE c.DateOfBirth < @p0 ORDER BY c.LastName"
    );
}

#[test]
fn query_definition_serializes_for_the_driver() {
    let model = camel_case_model();
    let query = model
        .create_uri_parser("/persons?$filter=lastName eq 'Doe' and dateOfBirth lt 1980-01-01")
        .unwrap()
        .create_query_definition()
        .unwrap();

    let json = serde_json::to_value(&query).unwrap();
    assert_eq!(
        json["queryText"].as_str(),
        None,
        "field names are snake_case"
    );
    assert_eq!(
        json["query_text"].as_str().unwrap(),
        "SELECT * FROM c WHERE c.lastName = @p0 and c.dateOfBirth < @p1"
    );
    assert_eq!(json["parameters"][0]["name"], "@p0");
    assert_eq!(json["parameters"][0]["value"], "Doe");
    assert_eq!(json["parameters"][1]["value"], "1980-01-01T00:00:00Z");
}

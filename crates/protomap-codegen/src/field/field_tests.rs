#![allow(non_snake_case)]

use super::*;
use crate::nullability::{FileOptionPolicy, NoAnnotations};
use protomap_core::DescriptorPool;
use protomap_core::testing;
use protomap_resolver::{FieldOrigin, ResolveError, ResolveResult};
use std::collections::HashMap;
use std::sync::Mutex;

const SHOP_PROTO: &str = r#"
syntax = "proto3";

package shop;

import "protomap/options.proto";

message GrpcOrder {
  int64 id = 1;
  int32 _count = 2;
  optional string note = 3;
  oneof payment {
    string card = 4;
  }
  GrpcDiscount discount = 5;
  bytes legacy = 6 [(protomap.unused) = true];
  string ref_code = 7 [(protomap.field_name) = "_referenceCode"];
  string customer = 8;
}

message GrpcDiscount {
  optional double value = 1;
}
"#;

const LEGACY_PROTO: &str = r#"
syntax = "proto2";

package shop;

message GrpcOrder {
  optional string nick = 1;
  optional int32 rank = 2;
  required int64 id = 3;
}
"#;

#[derive(Clone, Copy)]
enum Answer {
    Direct,
    Accessor,
    NotFound,
    Cyclic,
}

/// Canned resolver that records every query
#[derive(Default)]
struct StubResolver {
    answers: HashMap<(String, String), Answer>,
    queries: Mutex<Vec<(String, String)>>,
}

impl StubResolver {
    fn answer(mut self, class: &str, field: &str, answer: Answer) -> Self {
        self.answers
            .insert((class.to_string(), field.to_string()), answer);
        self
    }

    fn queries(&self) -> Vec<(String, String)> {
        self.queries.lock().unwrap().clone()
    }
}

impl VisibilityQuery for StubResolver {
    fn needs_accessor(
        &self,
        class_name: &str,
        field_name: &str,
    ) -> ResolveResult<VisibilityResolution> {
        let key = (class_name.to_string(), field_name.to_string());
        self.queries.lock().unwrap().push(key.clone());

        let origin = |visibility| FieldOrigin::Runtime {
            class: "shop.Base".to_string(),
            visibility,
        };
        match self.answers.get(&key).copied().unwrap_or(Answer::Direct) {
            Answer::Direct => Ok(VisibilityResolution::new(
                class_name,
                field_name,
                FieldOrigin::Unresolved,
            )),
            Answer::Accessor => Ok(VisibilityResolution::new(
                class_name,
                field_name,
                origin(protomap_resolver::Visibility::Private),
            )),
            Answer::NotFound => Err(ResolveError::NotFound {
                class: class_name.to_string(),
            }),
            Answer::Cyclic => Err(ResolveError::CyclicHierarchy {
                chain: "Order -> Order".to_string(),
            }),
        }
    }
}

fn pool() -> DescriptorPool {
    testing::compile(&[("shop.proto", SHOP_PROTO)]).unwrap()
}

fn generate(resolver: &StubResolver, pool: &DescriptorPool, name: &str) -> GeneratorResult<GeneratedField> {
    let policy = FileOptionPolicy::default();
    let generator = FieldGenerator::new(resolver, &policy);
    let field = pool.message("shop.GrpcOrder").unwrap().field(name).unwrap();
    let result = generator.generate(&field)?;
    Ok(result.into_generated().unwrap())
}

#[test]
fn FieldGenerator___unused_field___empty_result_without_query() {
    let resolver = StubResolver::default();
    let policy = FileOptionPolicy::default();
    let pool = pool();
    let field = pool.message("shop.GrpcOrder").unwrap().field("legacy").unwrap();

    let result = FieldGenerator::new(&resolver, &policy).generate(&field).unwrap();

    assert!(result.is_empty());
    assert_eq!(result.field(), &field);
    assert!(resolver.queries().is_empty());
}

#[test]
fn FieldGenerator___required_primitive___direct_identifier_without_marker() {
    let resolver = StubResolver::default();
    let pool = pool();

    let generated = generate(&resolver, &pool, "id").unwrap();

    assert_eq!(generated.identifier.name, "id");
    assert_eq!(generated.identifier.java_type, "long");
    assert_eq!(generated.identifier.marker, None);
    assert!(!generated.nullable);
    assert!(!generated.visibility.needs_accessor());
}

#[test]
fn FieldGenerator___queries_domain_class_without_prefix() {
    let resolver = StubResolver::default();
    let pool = pool();

    generate(&resolver, &pool, "id").unwrap();

    assert_eq!(
        resolver.queries(),
        vec![("Order".to_string(), "id".to_string())]
    );
}

#[test]
fn FieldGenerator___leading_underscore___normalized_before_query_and_getter() {
    let resolver = StubResolver::default().answer("Order", "count", Answer::Accessor);
    let pool = pool();

    let generated = generate(&resolver, &pool, "_count").unwrap();

    assert_eq!(generated.identifier.name, "getCount");
    assert!(generated.visibility.needs_accessor());
    assert_eq!(generated.identifier.domain_expr(true), "getCount()");
}

#[test]
fn FieldGenerator___overridden_name___used_for_identifier() {
    let resolver = StubResolver::default();
    let pool = pool();

    let generated = generate(&resolver, &pool, "ref_code").unwrap();

    assert_eq!(generated.identifier.name, "referenceCode");
    assert_eq!(
        resolver.queries(),
        vec![("Order".to_string(), "referenceCode".to_string())]
    );
}

#[test]
fn FieldGenerator___optional_string___nullable_marker() {
    let resolver = StubResolver::default();
    let pool = pool();

    let generated = generate(&resolver, &pool, "note").unwrap();

    assert!(generated.nullable);
    assert_eq!(generated.identifier.marker, Some(NullabilityMarker::Nullable));
}

#[test]
fn FieldGenerator___required_string___not_null_marker() {
    let resolver = StubResolver::default();
    let pool = pool();

    let generated = generate(&resolver, &pool, "customer").unwrap();

    assert!(!generated.nullable);
    assert_eq!(generated.identifier.marker, Some(NullabilityMarker::NotNull));
}

#[test]
fn FieldGenerator___oneof_member___nullable() {
    let resolver = StubResolver::default();
    let pool = pool();

    let generated = generate(&resolver, &pool, "card").unwrap();

    assert!(generated.nullable);
}

#[test]
fn FieldGenerator___nullable_unfolded_primitive___boxed() {
    let resolver = StubResolver::default();
    let pool = pool();

    let generated = generate(&resolver, &pool, "discount").unwrap();

    assert!(generated.nullable);
    assert_eq!(generated.identifier.java_type, "Double");
    assert!(!generated.type_model.is_primitive_like());
    assert!(matches!(generated.type_model, TypeModel::Unfolded { .. }));
    assert_eq!(generated.identifier.marker, Some(NullabilityMarker::Nullable));
}

#[test]
fn FieldGenerator___resolver_not_found___defaults_to_direct_access() {
    let resolver = StubResolver::default().answer("Order", "customer", Answer::NotFound);
    let pool = pool();

    let generated = generate(&resolver, &pool, "customer").unwrap();

    assert_eq!(generated.identifier.name, "customer");
    assert!(generated.visibility.is_defaulted());
    assert!(!generated.visibility.needs_accessor());
}

#[test]
fn FieldGenerator___cyclic_hierarchy___is_resolution_error() {
    let resolver = StubResolver::default().answer("Order", "id", Answer::Cyclic);
    let pool = pool();

    let result = generate(&resolver, &pool, "id");

    assert!(matches!(result, Err(GeneratorError::Resolution(msg)) if msg.contains("shop.GrpcOrder")));
}

#[test]
fn FieldGenerator___annotations_disabled___no_marker() {
    let resolver = StubResolver::default();
    let pool = pool();
    let field = pool.message("shop.GrpcOrder").unwrap().field("note").unwrap();

    let result = FieldGenerator::new(&resolver, &NoAnnotations)
        .generate(&field)
        .unwrap();

    assert_eq!(result.generated().unwrap().identifier.marker, None);
}

#[test]
fn FieldGenerator___proto2_optional_fields___nullable_and_boxed() {
    let resolver = StubResolver::default();
    let pool = testing::compile(&[("legacy.proto", LEGACY_PROTO)]).unwrap();

    let nick = generate(&resolver, &pool, "nick").unwrap();
    let rank = generate(&resolver, &pool, "rank").unwrap();
    let id = generate(&resolver, &pool, "id").unwrap();

    assert!(nick.nullable);
    assert_eq!(nick.identifier.marker, Some(NullabilityMarker::Nullable));
    assert!(rank.nullable);
    assert_eq!(rank.identifier.java_type, "Integer");
    assert!(!id.nullable);
    assert_eq!(id.identifier.java_type, "long");
}

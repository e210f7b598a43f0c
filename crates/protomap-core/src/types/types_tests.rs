#![allow(non_snake_case)]

use super::*;
use crate::DescriptorPool;
use crate::testing;
use test_case::test_case;

const CATALOG_PROTO: &str = r#"
syntax = "proto3";

package catalog;

import "protomap/options.proto";

message GrpcProduct {
  int64 id = 1;
  string title = 2;
  GrpcStatus status = 3;
  repeated GrpcVariant variants = 4;
  map<string, int32> attributes = 5;
  map<string, GrpcVariant> stock = 6;
  GrpcPrice price = 7;
  repeated string tags = 8 [(protomap.repeated_container) = SORTED_SET];
  repeated GrpcVariant history = 9 [(protomap.repeated_container) = STREAM];
  repeated GrpcVariant related = 10 [(protomap.repeated_container) = SET];
  GrpcWeight weight = 11;
  bytes payload = 12;
}

message GrpcVariant {
  string sku = 1;
  string color = 2;
}

message GrpcPrice {
  optional double value = 1;
}

message GrpcWeight {
  int32 grams = 1;
}

enum GrpcStatus {
  ACTIVE = 0;
}
"#;

fn catalog() -> DescriptorPool {
    testing::compile(&[("catalog.proto", CATALOG_PROTO)]).unwrap()
}

fn model(pool: &DescriptorPool, name: &str) -> TypeModel {
    let field = pool.message("catalog.GrpcProduct").unwrap().field(name).unwrap();
    TypeModel::for_field(&field).unwrap()
}

#[test_case("id", "long", true ; "int64 is primitive")]
#[test_case("title", "String", false ; "string is a reference")]
#[test_case("payload", "ByteString", false ; "bytes is a reference")]
#[test_case("status", "Status", false ; "enum uses domain name")]
#[test_case("variants", "List<Variant>", false ; "repeated message")]
#[test_case("attributes", "Map<String, Integer>", false ; "map boxes values")]
#[test_case("tags", "SortedSet<String>", false ; "sorted set container")]
#[test_case("history", "Stream<Variant>", false ; "stream container")]
#[test_case("price", "Double", false ; "nullable unfolded inner is boxed")]
#[test_case("weight", "int", true ; "required unfolded inner stays primitive")]
fn TypeModel___for_field___java_type_and_primitiveness(
    field: &str,
    java_type: &str,
    primitive_like: bool,
) {
    let pool = catalog();

    let model = model(&pool, field);

    assert_eq!(model.java_type(), java_type);
    assert_eq!(model.is_primitive_like(), primitive_like);
}

#[test]
fn TypeModel___primitive___converts_by_identity() {
    let pool = catalog();
    let id = model(&pool, "id");

    assert_eq!(id.to_wire("this.id"), "this.id");
    assert_eq!(id.from_wire("grpc.getId()"), "grpc.getId()");
}

#[test]
fn TypeModel___boxed___is_no_longer_primitive_like() {
    let pool = catalog();

    let boxed = model(&pool, "id").boxed();

    assert!(!boxed.is_primitive_like());
    assert_eq!(boxed.java_type(), "Long");
    assert_eq!(boxed.to_wire("id"), "id");
}

#[test]
fn TypeModel___enum___uses_grpc_translation() {
    let pool = catalog();
    let status = model(&pool, "status");

    assert_eq!(status.to_wire("status"), "status.toGrpc()");
    assert_eq!(
        status.from_wire("grpc.getStatus()"),
        "Status.fromGrpc(grpc.getStatus())"
    );
}

#[test]
fn TypeModel___repeated_message___maps_each_element_in_order() {
    let pool = catalog();
    let variants = model(&pool, "variants");

    assert_eq!(
        variants.to_wire("variants"),
        "variants.stream().map(it -> it.toGrpc()).toList()"
    );
    assert_eq!(
        variants.from_wire("grpc.getVariantsList()"),
        "grpc.getVariantsList().stream().map(it -> Variant.fromGrpc(it)).toList()"
    );
}

#[test]
fn TypeModel___repeated_identity___copies_into_container() {
    let pool = catalog();
    let tags = model(&pool, "tags");

    assert_eq!(tags.to_wire("tags"), "tags");
    assert_eq!(
        tags.from_wire("grpc.getTagsList()"),
        "new TreeSet<>(grpc.getTagsList())"
    );
}

#[test]
fn TypeModel___stream_container___has_no_stream_call_on_domain_side() {
    let pool = catalog();
    let history = model(&pool, "history");

    assert_eq!(
        history.to_wire("history"),
        "history.map(it -> it.toGrpc()).toList()"
    );
    assert_eq!(
        history.from_wire("grpc.getHistoryList()"),
        "grpc.getHistoryList().stream().map(it -> Variant.fromGrpc(it))"
    );
}

#[test]
fn TypeModel___set_container___collects_to_set() {
    let pool = catalog();
    let related = model(&pool, "related");

    assert_eq!(
        related.from_wire("grpc.getRelatedList()"),
        "grpc.getRelatedList().stream().map(it -> Variant.fromGrpc(it)).collect(Collectors.toSet())"
    );
}

#[test]
fn TypeModel___identity_map___passes_through() {
    let pool = catalog();
    let attributes = model(&pool, "attributes");

    assert_eq!(attributes.to_wire("attributes"), "attributes");
    assert_eq!(
        attributes.from_wire("grpc.getAttributesMap()"),
        "grpc.getAttributesMap()"
    );
}

#[test]
fn TypeModel___message_map___converts_every_entry_without_dedup() {
    let pool = catalog();
    let stock = model(&pool, "stock");

    let to_wire = stock.to_wire("stock");
    let from_wire = stock.from_wire("grpc.getStockMap()");

    assert_eq!(
        to_wire,
        "stock.entrySet().stream().collect(Collectors.toMap(it -> it.getKey(), it -> it.getValue().toGrpc()))"
    );
    assert_eq!(
        from_wire,
        "grpc.getStockMap().entrySet().stream().collect(Collectors.toMap(it -> it.getKey(), it -> Variant.fromGrpc(it.getValue())))"
    );
    assert!(!to_wire.contains("distinct"));
    assert!(!from_wire.contains("distinct"));
}

#[test]
fn TypeModel___unfolded___boxes_through_wrapper() {
    let pool = catalog();
    let price = model(&pool, "price");

    assert_eq!(
        price.to_wire("price"),
        "GrpcPrice.newBuilder().setValue(price).build()"
    );
    assert_eq!(
        price.from_wire("grpc.getPrice()"),
        "grpc.getPrice().getValue()"
    );
}

#[test]
fn TypeModel___accessor_names___depend_on_variant() {
    let pool = catalog();

    let single = model(&pool, "title").accessor_names("title");
    let list = model(&pool, "variants").accessor_names("variants");
    let map = model(&pool, "attributes").accessor_names("attributes");

    assert_eq!((single.getter.as_str(), single.setter.as_str()), ("getTitle", "setTitle"));
    assert_eq!(single.has, "hasTitle");
    assert_eq!((list.getter.as_str(), list.setter.as_str()), ("getVariantsList", "addAllVariants"));
    assert_eq!((map.getter.as_str(), map.setter.as_str()), ("getAttributesMap", "putAllAttributes"));
}

#[test]
fn TypeModel___accessor_names___drop_leading_underscore() {
    let model = TypeModel::Primitive {
        scalar: ScalarType::Int,
        boxed: false,
    };

    let names = model.accessor_names("_count");

    assert_eq!(names.getter, "getCount");
    assert_eq!(names.setter, "setCount");
    assert_eq!(names.has, "hasCount");
}

#[test]
fn TypeModel___repeated_unfolded_elements___unwrap_per_element() {
    let source = r#"
syntax = "proto3";
message GrpcBag { repeated GrpcId ids = 1; }
message GrpcId { int64 value = 1; }
"#;
    let pool = testing::compile(&[("a.proto", source)]).unwrap();
    let ids = pool.message("GrpcBag").unwrap().field("ids").unwrap();

    let model = TypeModel::for_field(&ids).unwrap();

    assert_eq!(model.java_type(), "List<Long>");
    assert_eq!(
        model.to_wire("ids"),
        "ids.stream().map(it -> GrpcId.newBuilder().setValue(it).build()).toList()"
    );
    assert_eq!(
        model.from_wire("grpc.getIdsList()"),
        "grpc.getIdsList().stream().map(it -> it.getValue()).toList()"
    );
}

#[test]
fn TypeModel___self_wrapping_message___falls_back_to_message() {
    let source = "syntax = \"proto3\"; message GrpcNode { GrpcNode next = 1; }";
    let pool = testing::compile(&[("a.proto", source)]).unwrap();
    let next = pool.message("GrpcNode").unwrap().field("next").unwrap();

    let model = TypeModel::for_field(&next).unwrap();

    let TypeModel::Unfolded { inner, .. } = model else {
        panic!("expected unfolded model");
    };
    assert_eq!(
        *inner,
        TypeModel::Message {
            wire_type: "GrpcNode".into(),
            domain_type: "Node".into()
        }
    );
}

#[test]
fn TypeModel___proto2_optional_scalar___boxed_reference() {
    let source = r#"
syntax = "proto2";
package legacy;
message GrpcUser {
  optional int32 age = 1;
  required int32 id = 2;
}
"#;
    let pool = testing::compile(&[("legacy.proto", source)]).unwrap();
    let user = pool.message("legacy.GrpcUser").unwrap();

    let age = user.field("age").unwrap();
    let id = user.field("id").unwrap();

    assert!(age.is_nullable());
    assert!(!id.is_nullable());
    assert_eq!(TypeModel::for_field(&age).unwrap().boxed().java_type(), "Integer");
    assert_eq!(TypeModel::for_field(&id).unwrap().java_type(), "int");
}

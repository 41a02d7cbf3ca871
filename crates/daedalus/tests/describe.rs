mod common;

use common::{my_routes, returns};
use daedalus::prelude::*;
use daedalus_test::TestClient;
use http::StatusCode;
use serde_json::{json, Value};

fn documented_server() -> Server {
    let mut server = Server::with_resource("/v1", my_routes());
    server
        .root()
        .api_spec(
            ApiSpec::new("My API", "2.1.0")
                .description("Routes used in tests")
                .server("https://api.example.com"),
        )
        .collect_routes(&[])
        .add_route("anything", returns("any"), None)
        .add_get_route("hidden", returns("hidden").doc("@openapi-ignore"))
        .add_get_route("moved", returns("moved").doc("@openapi-url /elsewhere"))
        .add_sub_controller("admin")
        .add_delete_route(
            r"users/(\d+)",
            returns("deleted").signature(Signature::new().typed_param("userId", TypeTag::Integer)),
        )
        .done();
    server
}

fn spec(client: &TestClient, uri: &str) -> Value {
    let response = client.get(uri).send();
    response.assert_status(StatusCode::OK);
    assert!(!response.text().unwrap().contains('\n'), "spec is compact JSON");
    response.json_value().unwrap()
}

#[test]
fn test_options_describes_matching_routes() {
    let client = TestClient::new(documented_server());
    let response = client.options("/v1/login").send();

    response
        .assert_status(StatusCode::OK)
        .assert_json_field("data.controller.entryPoint", &json!("/v1"))
        .assert_json_field("data.controller.routes.login.uri", &json!("/v1/login"))
        .assert_json_field("data.parameters._method.values", &json!("GET, POST, PUT, DELETE, HEAD, OPTIONS, PATCH"))
        .assert_json_field("data.parameters._suppress_status_code.type", &json!("boolean"));

    let data = response.data().unwrap();
    let routes = data["controller"]["routes"].as_object().unwrap();
    assert_eq!(routes.len(), 1);
    assert!(data.get("subController").is_none());
}

#[test]
fn test_options_on_prefix_describes_tree() {
    let client = TestClient::new(documented_server());
    let data = client.options("/v1").send().data().unwrap();

    assert!(data["controller"]["routes"].get("stats").is_some());
    assert!(data["controller"]["routes"].get("test/test").is_some());
    let admin = &data["subController"]["/v1/admin"];
    assert_eq!(admin["controller"]["entryPoint"], "/v1/admin");
    assert!(admin.get("parameters").is_none());
    assert_eq!(
        admin["controller"]["routes"][r"users/(\d+)"]["methods"]["DELETE"]["parameters"]["userId"]["in"],
        "path"
    );
}

#[test]
fn test_options_in_child_describes_child() {
    let client = TestClient::new(documented_server());
    let data = client.options(r"/v1/admin/users/3").send().data().unwrap();
    assert_eq!(data["controller"]["entryPoint"], "/v1/admin");
    assert!(data["parameters"].is_object());
}

#[test]
fn test_spec_document() {
    let client = TestClient::new(documented_server());
    let doc = spec(&client, "/v1/spec");

    assert_eq!(doc["openapi"], "3.0.0");
    assert_eq!(
        doc["info"],
        json!({"title": "My API", "version": "2.1.0", "description": "Routes used in tests"})
    );
    assert_eq!(doc["servers"], json!([{"url": "https://api.example.com"}]));

    let paths: Vec<&str> = doc["paths"].as_object().unwrap().keys().map(String::as_str).collect();
    let mut sorted = paths.clone();
    sorted.sort_unstable();
    assert_eq!(paths, sorted);
    assert!(paths.contains(&"/v1/spec"));
    assert!(paths.contains(&"/v1/admin/spec"));
    assert!(paths.contains(&"/v1/admin/users/{userId}"));
    assert!(paths.contains(&"/v1/stats/{id}"));
    assert!(paths.contains(&"/elsewhere"));
    assert!(!paths.contains(&"/v1/moved"));
    assert!(!paths.contains(&"/v1/hidden"));

    assert_eq!(doc["components"]["schemas"]["AnyValue"], json!({}));
    assert_eq!(doc["components"]["schemas"]["500"]["properties"]["status"]["type"], "integer");
}

#[test]
fn test_spec_operations() {
    let client = TestClient::new(documented_server());
    let doc = spec(&client, "/v1/spec");

    let login = &doc["paths"]["/v1/login"]["post"];
    let body = &login["requestBody"];
    assert_eq!(body["required"], true);
    assert_eq!(
        body["content"]["application/json"]["schema"]["properties"]["username"]["type"],
        "string"
    );
    assert!(body["content"]["application/x-www-form-urlencoded"].is_object());
    assert_eq!(
        login["responses"]["200"]["content"]["application/json"]["schema"]["properties"]["data"]["type"],
        "boolean"
    );
    assert_eq!(
        login["responses"]["500"]["content"]["application/json"]["schema"]["$ref"],
        "#/components/schemas/500"
    );

    let stats = &doc["paths"]["/v1/stats"]["get"];
    assert_eq!(stats["parameters"][0]["in"], "query");
    assert_eq!(stats["parameters"][0]["name"], "id");

    let delete = &doc["paths"]["/v1/admin/users/{userId}"]["delete"];
    assert_eq!(delete["parameters"][0]["in"], "path");
    assert_eq!(delete["parameters"][0]["required"], true);

    let anything = doc["paths"]["/v1/anything"].as_object().unwrap();
    let verbs: Vec<&str> = anything.keys().map(String::as_str).collect();
    assert_eq!(verbs, vec!["get", "put", "post", "delete", "patch"]);
}

#[test]
fn test_spec_output_mime_follows_format() {
    let client = TestClient::new(documented_server());
    let response = client.get("/v1/spec.xml").send();
    response.assert_content_type("application/json");

    let doc = response.json_value().unwrap();
    let responses = &doc["paths"]["/v1/login"]["post"]["responses"]["200"]["content"];
    assert!(responses.get("application/xml").is_some());
}

#[test]
fn test_child_spec_and_recurse() {
    let mut server = Server::new("/");
    server
        .root()
        .api_spec(ApiSpec::new("Root", "1").recurse(false))
        .add_get_route("ping", returns("pong"))
        .add_sub_controller("admin")
        .add_get_route("stats", returns("stats"))
        .done();

    let client = TestClient::new(server);
    let root = spec(&client, "/spec");
    assert!(root["paths"].get("/admin/stats").is_none());
    assert!(root["paths"].get("/ping").is_some());

    let child = spec(&client, "/admin/spec");
    assert!(child["paths"].get("/admin/stats").is_some());
    assert!(child["paths"].get("/ping").is_none());
}

#[test]
fn test_registered_spec_route_wins() {
    let mut server = Server::new("/");
    server
        .root()
        .api_spec(ApiSpec::new("Root", "1"))
        .add_get_route("spec", returns("mine"));

    assert_eq!(TestClient::new(server).get("/spec").send().data().unwrap(), "mine");
}

#[test]
fn test_describe_serializes() {
    let server = documented_server();
    let description = server.describe(Some("stats/9"));
    let value = serde_json::to_value(&description).unwrap();
    let routes = value["controller"]["routes"].as_object().unwrap();
    assert_eq!(routes.keys().collect::<Vec<_>>(), vec![r"stats/(\d+)"]);
}

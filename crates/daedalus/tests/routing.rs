mod common;

use common::{failure, my_routes, returns, success};
use daedalus::prelude::*;
use daedalus_test::TestClient;
use http::StatusCode;

fn login_server(prefix: &str) -> Server {
    let mut server = Server::with_resource(prefix, my_routes());
    server.root().add_post_route("login", "postLogin");
    server
}

#[test]
fn test_custom_url() {
    let mut server = Server::with_resource("/", my_routes());
    server.root().collect_routes(&[]);

    let response = TestClient::new(server).get("/test/test").send();
    response.assert_status(StatusCode::OK).assert_body_eq(success("\"test\""));
}

#[test]
fn test_own_controller() {
    let client = TestClient::new(login_server("/"));

    client
        .post("/login?")
        .send()
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_body_eq(failure(
            400,
            "MissingRequiredArgumentException",
            "Argument 'username' is missing.",
        ));

    client
        .post("/login")
        .query("username", "bla")
        .send()
        .assert_body_eq(failure(
            400,
            "MissingRequiredArgumentException",
            "Argument 'password' is missing.",
        ));

    client
        .post("/login?username=peter&password=pwd")
        .send()
        .assert_status(StatusCode::OK)
        .assert_body_eq(success("true"));

    client
        .get("/login?username=peter&password=pwd")
        .send()
        .assert_body_eq(failure(400, "RouteNotFoundException", "There is no route for 'login'."));
}

#[test]
fn test_body_arguments() {
    let client = TestClient::new(login_server("/"));

    let response = client
        .post("/login")
        .form(&[("username", "peter"), ("password", "pwd")])
        .send();
    assert_eq!(response.data().unwrap(), true);

    let response = client
        .post("/login")
        .json(&serde_json::json!({"username": "peter", "password": "nope"}))
        .send();
    assert_eq!(response.data().unwrap(), false);
}

#[test]
fn test_different_prefixes() {
    for prefix in ["/v1", "/v1/", "v1"] {
        let client = TestClient::new(login_server(prefix));
        client
            .post("/v1/login?username=peter&password=pwd")
            .send()
            .assert_body_eq(success("true"));
    }
}

#[test]
fn test_sub_controller() {
    let mut server = Server::with_resource("v1", my_routes());
    server
        .root()
        .add_post_route("login", "postLogin")
        .add_sub_resource("sub", my_routes())
        .add_post_route("login", "postLogin")
        .done();

    let client = TestClient::new(server);
    client
        .post("/v1/sub/login?username=peter&password=pwd")
        .send()
        .assert_body_eq(success("true"));
    client
        .post("/v1/login?username=peter&password=pwd")
        .send()
        .assert_body_eq(success("true"));
}

#[test]
fn test_sub_controller_with_slash_root_parent() {
    let mut server = Server::with_resource("/", my_routes());
    server
        .root()
        .add_sub_resource("sub", my_routes())
        .add_post_route("login", "postLogin")
        .done();

    TestClient::new(server)
        .post("/sub/login?username=peter&password=pwd")
        .send()
        .assert_body_eq(success("true"));
}

#[test]
fn test_nested_sub_controllers() {
    let mut server = Server::new("/api");
    server
        .root()
        .add_sub_controller("v1")
        .add_sub_controller("users")
        .add_get_route(r"(\d+)", returns("user"))
        .done()
        .add_get_route("ping", returns("v1 pong"))
        .done()
        .add_get_route("ping", returns("root pong"));

    let client = TestClient::new(server);
    assert_eq!(client.get("/api/v1/users/7").send().data().unwrap(), "user");
    assert_eq!(client.get("/api/v1/ping").send().data().unwrap(), "v1 pong");
    assert_eq!(client.get("/api/ping").send().data().unwrap(), "root pong");
    assert_eq!(
        client.get("/api/v1/users/x").send().json_value().unwrap()["message"],
        "There is no route for 'v1/users/x'."
    );
}

fn all_verbs_server() -> Server {
    let mut server = Server::new("/");
    server
        .root()
        .add_get_route("test", returns("getTest"))
        .add_post_route("test", returns("postTest"))
        .add_patch_route("test", returns("patchTest"))
        .add_put_route("test", returns("putTest"))
        .add_options_route("test", returns("optionsTest"))
        .add_delete_route("test", returns("deleteTest"))
        .add_head_route("test", returns("headTest"))
        .add_route("all-test", returns("allTest"), None);
    server
}

#[test]
fn test_all_routes_closures() {
    let client = TestClient::new(all_verbs_server());

    for verb in ["get", "post", "put", "patch", "delete", "head", "options"] {
        let method = Method::from_bytes(verb.to_uppercase().as_bytes()).unwrap();
        client
            .request(method.clone(), "/test")
            .send()
            .assert_body_eq(success(&format!("\"{verb}Test\"")));

        if method != Method::OPTIONS {
            client
                .request(method, "/all-test")
                .send()
                .assert_body_eq(success("\"allTest\""));
        }
    }
}

#[test]
fn test_options_on_wildcard_describes() {
    let client = TestClient::new(all_verbs_server());
    let response = client.options("/all-test").send();
    response.assert_json_field("data.controller.routes.all-test.methods._ALL_.return.type", &"mixed".into());
}

#[test]
fn test_options_on_wildcard_without_describe_routes() {
    let mut server = all_verbs_server();
    server.root().describe_routes(false);
    TestClient::new(server)
        .options("/all-test")
        .send()
        .assert_body_eq(success("\"allTest\""));
}

#[test]
fn test_method_override() {
    let client = TestClient::new(all_verbs_server());

    assert_eq!(client.post("/test?_method=delete").send().data().unwrap(), "deleteTest");
    assert_eq!(client.post("/test").form(&[("_method", "PUT")]).send().data().unwrap(), "putTest");
    assert_eq!(client.post("/test").method_override("patch").send().data().unwrap(), "patchTest");
    assert_eq!(client.post("/test?_method=bogus").send().data().unwrap(), "getTest");
}

#[test]
fn test_first_registered_pattern_wins() {
    let mut server = Server::new("/");
    server
        .root()
        .add_get_route(r"items/(\d+)", returns("numeric"))
        .add_get_route(r"items/(.+)", returns("any"));

    let client = TestClient::new(server);
    assert_eq!(client.get("/items/12").send().data().unwrap(), "numeric");
    assert_eq!(client.get("/items/ab").send().data().unwrap(), "any");
}

#[test]
fn test_explicit_verb_beats_wildcard() {
    let mut server = Server::new("/");
    server
        .root()
        .add_route("thing", returns("any"), None)
        .add_get_route("thing", returns("get"));

    let client = TestClient::new(server);
    assert_eq!(client.get("/thing").send().data().unwrap(), "get");
    assert_eq!(client.delete("/thing").send().data().unwrap(), "any");
}

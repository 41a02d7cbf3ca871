#![allow(dead_code)]

use std::sync::Arc;

use daedalus::prelude::*;
use serde_json::{json, Value};

/// The resource most scenarios mount.
pub struct MyRoutes;

impl Resource for MyRoutes {
    fn name(&self) -> &str {
        "MyRoutes"
    }

    fn methods(&self) -> Vec<MethodDecl> {
        vec![
            MethodDecl::new("postLogin")
                .signature(Signature::new().param("username").param("password"))
                .doc(
                    "/**\n * Checks the credentials.\n *\n * @param string $username\n * @param string $password\n * @return boolean\n */",
                ),
            MethodDecl::new("getTest").doc("/**\n * @url test/test\n * @return string\n */"),
            MethodDecl::new("getStats")
                .signature(Signature::new().optional_param("id", json!(1)))
                .doc("/**\n * @param integer $id\n * @url stats\n * @url stats/(\\d+)\n */"),
            MethodDecl::new("getMethodWithoutDocs"),
        ]
    }

    fn call(&self, method: &str, args: &Args) -> Option<HandlerResult> {
        let result = match method {
            "postLogin" => Ok(json!(
                args.get_str("username") == Some("peter") && args.get_str("password") == Some("pwd")
            )),
            "getTest" => Ok(json!("test")),
            "getStats" => Ok(json!(format!("Stats for {}", plain(args.get("id"))))),
            "getMethodWithoutDocs" => Ok(json!("hi")),
            _ => return None,
        };
        Some(result)
    }
}

fn plain(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

pub fn my_routes() -> Arc<dyn Resource> {
    Arc::new(MyRoutes)
}

/// A handler returning a fixed string.
pub fn returns(value: &'static str) -> FunctionHandler {
    FunctionHandler::new(move |_| Ok(json!(value)))
}

/// The pretty JSON success body for `data`.
pub fn success(data: &str) -> String {
    format!("{{\n    \"status\": 200,\n    \"data\": {data}\n}}")
}

/// The pretty JSON error body.
pub fn failure(status: u16, error: &str, message: &str) -> String {
    format!("{{\n    \"status\": {status},\n    \"error\": \"{error}\",\n    \"message\": \"{message}\"\n}}")
}

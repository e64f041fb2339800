use geo::prelude::*;
use std::sync::{Arc, Mutex};

type Trace = Arc<Mutex<Vec<String>>>;

fn recorder(trace: &Trace, name: &str) -> HandlerFunc {
    let trace = Arc::clone(trace);
    let name = name.to_string();
    handler(move |ctx| {
        trace.lock().unwrap().push(name.clone());
        ctx.next()
    })
}

fn endpoint(trace: &Trace, name: &str) -> impl Fn(&mut Context<'_>) -> Result<()> + Send + Sync {
    let trace = Arc::clone(trace);
    let name = name.to_string();
    move |ctx| {
        trace.lock().unwrap().push(name.clone());
        ctx.string(StatusCode::OK, name.clone());
        Ok(())
    }
}

fn get(router: &Router, path: &str) -> Response {
    router.handle_request(Request::new("GET", path))
}

#[test]
fn test_named_parameter_is_bound() {
    let mut builder = Router::builder();
    builder
        .get("/hello/:name", |ctx| {
            let body = format!("hello {}", ctx.param("name").unwrap_or_default());
            ctx.string(StatusCode::OK, body);
            Ok(())
        })
        .unwrap();
    let router = builder.build();

    let response = get(&router, "/hello/world");
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body_as_string(), "hello world");

    let matched = router.get_route("GET", "/hello/world").unwrap();
    assert_eq!(matched.params.len(), 1);
    assert_eq!(matched.params["name"], "world");
}

#[test]
fn test_catch_all_binds_remaining_path() {
    let mut builder = Router::builder();
    builder
        .get("/assets/*filepath", |ctx| {
            let file = ctx.param("filepath").unwrap_or_default().to_string();
            ctx.string(StatusCode::OK, file);
            Ok(())
        })
        .unwrap();
    let router = builder.build();

    assert_eq!(get(&router, "/assets/css/a.css").body_as_string(), "css/a.css");
    assert_eq!(get(&router, "/assets/logo.png").body_as_string(), "logo.png");
}

#[test]
fn test_multiple_parameters() {
    let mut builder = Router::builder();
    builder
        .get("/users/:id/posts/:post_id", |ctx| {
            let body = format!(
                "{}:{}",
                ctx.param("id").unwrap_or_default(),
                ctx.param("post_id").unwrap_or_default()
            );
            ctx.string(StatusCode::OK, body);
            Ok(())
        })
        .unwrap();
    let router = builder.build();

    assert_eq!(get(&router, "/users/7/posts/99").body_as_string(), "7:99");
}

#[test]
fn test_unmatched_path_is_not_found() {
    let trace: Trace = Arc::default();
    let mut builder = Router::builder();
    builder.use_middleware(vec![recorder(&trace, "global")]);
    builder.get("/users", endpoint(&trace, "users")).unwrap();
    let router = builder.build();

    let response = get(&router, "/missing/page");
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body_as_string(), "404 NOT FOUND: /missing/page\n");
    // middleware still ran in front of the fallback
    assert_eq!(*trace.lock().unwrap(), vec!["global"]);
}

#[test]
fn test_unknown_method_is_not_found() {
    let trace: Trace = Arc::default();
    let mut builder = Router::builder();
    builder.get("/users", endpoint(&trace, "users")).unwrap();
    let router = builder.build();

    let response = router.handle_request(Request::new("POST", "/users"));
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body_as_string(), "404 NOT FOUND: /users\n");
    assert!(trace.lock().unwrap().is_empty());
}

#[test]
fn test_methods_dispatch_independently() {
    let trace: Trace = Arc::default();
    let mut builder = Router::builder();
    builder
        .get("/items", endpoint(&trace, "list"))
        .unwrap()
        .post("/items", endpoint(&trace, "create"))
        .unwrap()
        .put("/items/:id", endpoint(&trace, "replace"))
        .unwrap()
        .delete("/items/:id", endpoint(&trace, "remove"))
        .unwrap();
    let router = builder.build();

    for (method, path, expected) in [
        ("GET", "/items", "list"),
        ("POST", "/items", "create"),
        ("PUT", "/items/3", "replace"),
        ("DELETE", "/items/3", "remove"),
    ] {
        let response = router.handle_request(Request::new(method, path));
        assert_eq!(response.body_as_string(), expected, "{} {}", method, path);
    }
}

#[test]
fn test_nested_group_middleware_order() {
    let trace: Trace = Arc::default();
    let mut builder = Router::builder();
    {
        let mut api = builder.group("/api", vec![recorder(&trace, "A")]);
        let mut v1 = api.group("/v1", vec![recorder(&trace, "B")]);
        v1.get("/users", endpoint(&trace, "users")).unwrap();
    }
    let router = builder.build();

    let response = get(&router, "/api/v1/users");
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(*trace.lock().unwrap(), vec!["A", "B", "users"]);

    trace.lock().unwrap().clear();
    let response = get(&router, "/api/other");
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(*trace.lock().unwrap(), vec!["A"]);
}

#[test]
fn test_group_scope_does_not_match_longer_segment() {
    let trace: Trace = Arc::default();
    let mut builder = Router::builder();
    builder.group("/api", vec![recorder(&trace, "api")]);
    builder.get("/apibase", endpoint(&trace, "apibase")).unwrap();
    let router = builder.build();

    get(&router, "/apibase");
    assert_eq!(*trace.lock().unwrap(), vec!["apibase"]);
}

#[test]
fn test_root_middleware_runs_before_group_middleware() {
    let trace: Trace = Arc::default();
    let mut builder = Router::builder();
    {
        let mut admin = builder.group("/admin", vec![recorder(&trace, "auth")]);
        admin.get("/stats", endpoint(&trace, "stats")).unwrap();
    }
    // added after the group existed, still applies to every request
    builder.use_middleware(vec![recorder(&trace, "global")]);
    let router = builder.build();

    get(&router, "/admin/stats");
    assert_eq!(*trace.lock().unwrap(), vec!["global", "auth", "stats"]);
}

#[test]
fn test_group_use_middleware_appends() {
    let trace: Trace = Arc::default();
    let mut builder = Router::builder();
    {
        let mut api = builder.group("/api", vec![recorder(&trace, "first")]);
        api.use_middleware(vec![recorder(&trace, "second")])
            .get("/ping", endpoint(&trace, "ping"))
            .unwrap();
    }
    let router = builder.build();

    get(&router, "/api/ping");
    assert_eq!(*trace.lock().unwrap(), vec!["first", "second", "ping"]);
}

#[test]
fn test_middleware_wraps_handler() {
    let trace: Trace = Arc::default();
    let wrapper = {
        let trace = Arc::clone(&trace);
        handler(move |ctx| {
            trace.lock().unwrap().push("before".to_string());
            ctx.next()?;
            trace.lock().unwrap().push("after".to_string());
            ctx.set_header("X-Wrapped", "yes");
            Ok(())
        })
    };

    let mut builder = Router::builder();
    builder.use_middleware(vec![wrapper]);
    builder.get("/", endpoint(&trace, "index")).unwrap();
    let router = builder.build();

    let response = get(&router, "/");
    assert_eq!(*trace.lock().unwrap(), vec!["before", "index", "after"]);
    assert_eq!(response.header("x-wrapped"), Some("yes"));
}

#[test]
fn test_middleware_short_circuit() {
    let trace: Trace = Arc::default();
    let mut builder = Router::builder();
    {
        let mut private = builder.group(
            "/private",
            vec![handler(|ctx| {
                if ctx.req.header("authorization").is_none() {
                    ctx.string(StatusCode::UNAUTHORIZED, "login required");
                    return Ok(());
                }
                ctx.next()
            })],
        );
        private.get("/data", endpoint(&trace, "data")).unwrap();
    }
    let router = builder.build();

    let denied = get(&router, "/private/data");
    assert_eq!(denied.status, StatusCode::UNAUTHORIZED);
    assert!(trace.lock().unwrap().is_empty());

    let allowed = router.handle_request(
        Request::new("GET", "/private/data").with_header("Authorization", "Bearer t"),
    );
    assert_eq!(allowed.status, StatusCode::OK);
    assert_eq!(*trace.lock().unwrap(), vec!["data"]);
}

#[test]
fn test_reregistration_uses_latest_handler() {
    let trace: Trace = Arc::default();
    let mut builder = Router::builder();
    builder.get("/page", endpoint(&trace, "old")).unwrap();
    builder.get("/page", endpoint(&trace, "new")).unwrap();
    let router = builder.build();

    assert_eq!(get(&router, "/page").body_as_string(), "new");
    assert_eq!(*trace.lock().unwrap(), vec!["new"]);
}

#[test]
fn test_trailing_slash_join() {
    let trace: Trace = Arc::default();
    let mut builder = Router::builder();
    {
        let mut api = builder.group("/api/", Vec::new());
        api.get("users/", endpoint(&trace, "slash")).unwrap();
        api.get("teams", endpoint(&trace, "plain")).unwrap();
    }
    let router = builder.build();

    let routes: Vec<String> = router.routes().into_iter().map(|r| r.path).collect();
    assert!(routes.contains(&"/api/users/".to_string()));
    assert!(routes.contains(&"/api/teams".to_string()));
}

#[test]
fn test_conflicting_wildcards_rejected() {
    let trace: Trace = Arc::default();
    let mut builder = Router::builder();
    builder.get("/users/:id", endpoint(&trace, "by_id")).unwrap();

    let err = builder
        .get("/users/:name/profile", endpoint(&trace, "profile"))
        .err()
        .unwrap();
    assert!(matches!(err, Error::ConflictingWildcard { .. }));

    // the same name keeps extending the existing wildcard
    builder
        .get("/users/:id/profile", endpoint(&trace, "profile"))
        .unwrap();
    let router = builder.build();
    assert_eq!(get(&router, "/users/5/profile").body_as_string(), "profile");
}

#[test]
fn test_literal_preferred_over_parameter() {
    let trace: Trace = Arc::default();
    let mut builder = Router::builder();
    builder.get("/users/:id", endpoint(&trace, "param")).unwrap();
    builder.get("/users/me", endpoint(&trace, "literal")).unwrap();
    let router = builder.build();

    assert_eq!(get(&router, "/users/me").body_as_string(), "literal");
    assert_eq!(get(&router, "/users/42").body_as_string(), "param");
}

#[test]
fn test_handlers_see_router() {
    let mut builder = Router::builder();
    builder.get("/a", |_ctx| Ok(())).unwrap();
    builder
        .get("/routes", |ctx| {
            let count = ctx.router().routes().len();
            ctx.string(StatusCode::OK, count.to_string());
            Ok(())
        })
        .unwrap();
    let router = builder.build();

    assert_eq!(get(&router, "/routes").body_as_string(), "2");
}

#[test]
fn test_serve_writes_into_sink() {
    let mut builder = Router::builder();
    builder
        .get("/json", |ctx| ctx.json(StatusCode::OK, &json!({"id": 1})))
        .unwrap();
    let router = builder.build();

    let mut sink = Response::ok();
    router.serve(Request::new("GET", "/json?pretty=1"), &mut sink);
    assert_eq!(sink.header("content-type"), Some("application/json"));
    assert_eq!(sink.body_as_string(), "{\"id\":1}");
}

#[test]
fn test_router_shared_across_threads() {
    let trace: Trace = Arc::default();
    let mut builder = Router::builder();
    builder.get("/n/:n", |ctx| {
        let n = ctx.param("n").unwrap_or_default().to_string();
        ctx.string(StatusCode::OK, n);
        Ok(())
    })
    .unwrap();
    builder.get("/unused", endpoint(&trace, "unused")).unwrap();
    let router = Arc::new(builder.build());

    let workers: Vec<_> = (0..4)
        .map(|i| {
            let router = Arc::clone(&router);
            std::thread::spawn(move || get(&router, &format!("/n/{}", i)).body_as_string())
        })
        .collect();

    let results: Vec<String> = workers.into_iter().map(|w| w.join().unwrap()).collect();
    assert_eq!(results, vec!["0", "1", "2", "3"]);
}

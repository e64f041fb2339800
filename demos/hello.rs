use geo::prelude::*;

fn hello(ctx: &mut Context<'_>) -> Result<()> {
    let body = format!("hello {}\n", ctx.param("name").unwrap_or("stranger"));
    ctx.string(StatusCode::OK, body);
    Ok(())
}

fn asset(ctx: &mut Context<'_>) -> Result<()> {
    let filepath = ctx.param("filepath").unwrap_or_default().to_string();
    ctx.json(StatusCode::OK, &json!({ "filepath": filepath }))
}

fn require_token(ctx: &mut Context<'_>) -> Result<()> {
    if ctx.query("token") != Some("secret") {
        ctx.string(StatusCode::UNAUTHORIZED, "missing token\n");
        return Ok(());
    }
    ctx.next()
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env()?;
    env_logger::Builder::new()
        .filter_level(
            config
                .log_level()
                .unwrap_or_else(|| config.environment.default_log_level()),
        )
        .init();

    let mut builder = Router::builder();
    builder.use_middleware(handlers![middleware::recovery, middleware::logger]);
    builder
        .get("/", |ctx| {
            ctx.html(StatusCode::OK, "<h1>geo</h1>");
            Ok(())
        })?
        .get("/hello/:name", hello)?
        .get("/assets/*filepath", asset)?;

    {
        let mut admin = builder.group("/admin", handlers![require_token]);
        admin.get("/routes", |ctx| {
            let routes: Vec<String> = ctx
                .router()
                .routes()
                .into_iter()
                .map(|r| format!("{} {}", r.method, r.path))
                .collect();
            ctx.json(StatusCode::OK, &routes)
        })?;
    }

    Server::from_config(builder.build(), &config)
        .serve(None)
        .await
}

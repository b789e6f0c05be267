use std::time::Duration;

use ctxlog::{Attr, Context, Level, Logger, Value};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Operation {
    action: String,
    name: String,
}

fn main() {
    let env_logger = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .build();
    ctxlog::set_default(Logger::new(env_logger).with([("instance", "contexted_log_sync")]));

    let ctx = Context::background();
    ctxlog::info(&ctx, "Initialized context logger", ());

    // Derive a context for the request; the original one is left untouched.
    let request = ctxlog::with(&ctx, [("user_id", "12345")]);
    ctxlog::info(&request, "Logging in", ());

    // Create a nested context with additional attributes.
    {
        let login = ctxlog::with_attrs(
            &request,
            [Attr::new(
                "action",
                Value::serde(Operation {
                    action: "login".to_string(),
                    name: "user".to_string(),
                }),
            )],
        );
        ctxlog::info(&login, "User logged in successfully", ());
    }

    let db = ctxlog::with_group(&request, "db");
    ctxlog::log(
        &db,
        Level::Debug,
        "Query executed",
        (("table", "users"), ("elapsed", Duration::from_millis(45))),
    );

    ctxlog::info(&request, "Login completed", ());
}

use std::time::Duration;

use ctxlog::{Context, ContextLogger, FutureExt, Logger, Value};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Operation {
    action: String,
    name: String,
}

fn try_init_logger() -> Result<(), Box<dyn std::error::Error>> {
    let level = log::LevelFilter::Info;

    let logger = structured_logger::Builder::with_level(level.as_str())
        .with_target_writer("*", structured_logger::json::new_writer(std::io::stdout()))
        .build();
    ctxlog::set_default(Logger::new(logger).with([("instance", "contexted_log_async")]));
    ContextLogger::new().try_init(level)?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    try_init_logger()?;

    log::info!("Initialized context logger");

    // Create a new context with attributes.
    let ctx = ctxlog::with(&Context::background(), [("user_id", "12345")]);
    let first_future = async {
        log::info!("Logging in");
        // Create a nested context with additional attributes.
        let login = ctxlog::with(
            &Context::current(),
            [(
                "action",
                Value::serde(Operation {
                    action: "login".to_string(),
                    name: "user".to_string(),
                }),
            )],
        );
        async move {
            log::info!("User logged in successfully");
            tokio::task::yield_now().await;
        }
        .in_context(login)
        .await;

        tokio::time::sleep(Duration::from_millis(100)).await;
        log::info!("Login completed");
    }
    .in_context(ctx);

    let ctx = ctxlog::with(
        &Context::background(),
        (
            ("name", "Alice"),
            ("age", 25),
            ("married", true),
            ("email", "alice@example.com"),
        ),
    );
    let second_future = async {
        tokio::task::yield_now().await;

        log::info!("Another future pending");
        tokio::time::sleep(Duration::from_millis(100)).await;
        log::info!("Future completed");
    }
    .in_context(ctx);

    let ctx = ctxlog::with(
        &Context::background(),
        (("name", "Bob"), ("age", 30), ("email", "bob@example.com")),
    );
    let third_future = tokio::spawn(
        async {
            tokio::task::yield_now().await;

            log::info!("Third future pending");
            tokio::time::sleep(Duration::from_millis(100)).await;

            // The explicit API works alongside the macros.
            let logout = ctxlog::with_group(&Context::current(), "logout");
            ctxlog::info(&logout, "Third future completed", [("reason", "idle")]);
        }
        .in_context(ctx),
    );

    let ((), (), res) = tokio::join!(first_future, second_future, third_future);
    res?;

    let ctx = ctxlog::with(
        &Context::background(),
        (("name", "Charlie"), ("age", 35), ("email", "charlie@example.com")),
    );
    let _guard = ctx.enter();

    log::info!("Last call completed");

    Ok(())
}

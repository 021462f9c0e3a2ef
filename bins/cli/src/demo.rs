//! The tour itself. Each scenario writes a handful of records.

use grovelog::{
    Attr, Level, LogContext, LogError, Logger, Value, caller, err, err_opt, error_ctx, kv,
    wrap_ctx,
};
use serde::Serialize;
use std::io;

#[derive(Debug, Serialize)]
struct Order {
    id: u64,
    items: Vec<&'static str>,
    total_cents: i64,
}

pub fn run_all(logger: &Logger) -> Result<(), LogError> {
    levels(logger);
    attributes(logger)?;
    groups(logger);
    context(logger);
    errors(logger);
    Ok(())
}

pub fn levels(logger: &Logger) {
    logger.debug("cache warmed", [kv("entries", 128)]);
    logger.info("server started", [kv("port", 8080)]);
    logger.log(
        &LogContext::new(),
        Level::new(Level::INFO.severity() + 2),
        "slow start",
        [kv("elapsed_ms", 412)],
    );
    logger.warn("disk almost full", [kv("free_pct", 4.5)]);
    logger.error("upstream unreachable", [kv("retries", 3)]);
}

pub fn attributes(logger: &Logger) -> Result<(), LogError> {
    let order = Order {
        id: 42,
        items: vec!["tea", "scone"],
        total_cents: 1150,
    };
    logger.info(
        "order placed",
        [
            kv("user", "ada"),
            kv("vip", true),
            kv("order", Value::from_serialize(&order)?),
            Attr::group("http", [kv("method", "POST"), kv("status", 201)]),
            kv("note", Value::Null),
        ],
    );
    logger.info("call site attached by hand", [caller()]);
    Ok(())
}

pub fn groups(logger: &Logger) {
    let service = logger.with([kv("service", "checkout")]);
    let request = service.with_group("request").with([kv("id", "r-7")]);
    request.info("handled", [kv("status", 200)]);
    request.with_group("db").debug("query", [kv("rows", 3)]);
    service.info("idle", []);
}

pub fn context(logger: &Logger) {
    let ctx = LogContext::new().with_op("checkout.pay").with("request_id", "r-7");
    logger.info_ctx(&ctx, "charging card", [kv("amount_cents", 1150)]);

    // Record attributes win over the ambient context.
    logger.warn_ctx(&ctx, "retrying", [kv("request_id", "r-7b")]);
}

pub fn errors(logger: &Logger) {
    let origin = LogContext::new().with_op("ledger.write").with("account", 9);
    let failure = wrap_ctx(&origin, io::Error::other("connection reset"));

    let ctx = error_ctx(&LogContext::new().with("worker", 2), &failure);
    logger.error_ctx(&ctx, "payment not recorded", [err(&failure)]);

    let recovered: Option<&io::Error> = None;
    logger.info("payment retried", [err_opt(recovered)]);
}

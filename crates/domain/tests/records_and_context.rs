//! Integration coverage for records, levels, and ambient context.

use grovelog_domain::{Attr, Level, LogContext, Record, Source, Value, error_ctx, wrap_ctx};
use grovelog_shared::LogError;
use std::error::Error;

#[test]
fn context_attrs_can_be_appended_to_a_record() {
    let ctx = LogContext::new().with_op("checkout").with("user", "alice");
    let record = Record::new(Level::INFO, "placed order")
        .with_attr("items", 3)
        .with_attrs(ctx.attrs())
        .with_source(Source::new("shop.rs", 12));

    let keys: Vec<&str> = record.attrs.iter().map(|attr| attr.key.as_str()).collect();
    assert_eq!(keys, ["items", "op", "user"]);
    assert_eq!(
        record.source.as_ref().map(ToString::to_string),
        Some("shop.rs:12".to_string())
    );
}

#[test]
fn error_context_survives_a_boundary() -> Result<(), Box<dyn Error>> {
    fn load(ctx: &LogContext) -> Result<(), grovelog_domain::ContextualError> {
        let ctx = ctx.with_op("load").with("path", "/etc/app.toml");
        Err(wrap_ctx(&ctx, "file not found"))
    }

    let request = LogContext::new().with("request_id", 42u64);
    let Err(error) = load(&request) else {
        return Err("load should fail".into());
    };

    let replayed = error_ctx(&request, &error);
    assert_eq!(replayed.get("op"), Some(&Value::from("load")));
    assert_eq!(replayed.get("request_id"), Some(&Value::U64(42)));
    assert_eq!(error.to_string(), "file not found");
    Ok(())
}

#[test]
fn levels_deserialize_from_names() -> Result<(), Box<dyn Error>> {
    let levels: Vec<Level> = serde_json::from_str(r#"["debug", "WARN", "INFO+2"]"#)?;
    assert_eq!(levels, [Level::DEBUG, Level::WARN, Level::new(2)]);

    let encoded = serde_json::to_string(&Level::new(-6))?;
    assert_eq!(encoded, r#""DEBUG-2""#);
    Ok(())
}

#[test]
fn unparsable_level_is_a_config_error() {
    let parsed: Result<Level, LogError> = "verbose".parse();
    assert!(parsed.is_err_and(|error| error.is_config()));
}

#[test]
fn nested_groups_keep_their_members() {
    let attr = Attr::group(
        "http",
        [
            Attr::new("method", "GET"),
            Attr::group("response", [Attr::new("status", 200)]),
        ],
    );

    let members = attr.value.as_group().map(<[Attr]>::len);
    assert_eq!(members, Some(2));
}

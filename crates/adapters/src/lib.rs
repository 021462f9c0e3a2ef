//! # grovelog-adapters
//!
//! Handler and sink implementations for the grovelog ports: attribute
//! flattening, level colors, the pooled field encoder, the rich line
//! formatter, the format handler and the fan-out handler.
//! This crate depends on `ports`, `shared`, `config`, and `domain`.

pub mod colorize;
pub mod encoder;
pub mod flatten;
pub mod formatter;
pub mod handler;
pub mod log_sink;
pub mod multi;

/// Returns the adapters crate version.
#[must_use]
pub const fn adapters_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub use colorize::{Decorate, Palette, colorize};
pub use encoder::{BufferPool, FieldEncoder, PooledBuffer};
pub use flatten::{FlatFields, KEY_SEPARATOR, MAX_GROUP_DEPTH, flatten};
pub use formatter::RecordFormatter;
pub use handler::{FormatHandler, Renderer};
pub use log_sink::{DiscardSink, FileSink, StderrSink, StdoutSink, WriterSink};
pub use multi::MultiHandler;

#[cfg(test)]
mod tests {
    use super::*;
    use grovelog_config::config_crate_version;
    use grovelog_ports::ports_crate_version;
    use grovelog_shared::shared_crate_version;

    fn workspace_deps() -> Vec<String> {
        let cargo_toml = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/Cargo.toml"));
        let mut deps = Vec::new();
        let mut in_deps = false;
        let mut in_dev_deps = false;

        for raw_line in cargo_toml.lines() {
            let line = raw_line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            if line.starts_with('[') {
                in_deps = line == "[dependencies]";
                in_dev_deps = line == "[dev-dependencies]";
                continue;
            }
            if !(in_deps || in_dev_deps) {
                continue;
            }
            if line.starts_with("grovelog") {
                let key = line.split('=').next().unwrap_or("").trim();
                let name = key.split('.').next().unwrap_or("").trim();
                deps.push(name.to_string());
            }
        }

        deps
    }

    #[test]
    fn adapters_do_not_depend_on_the_facade() {
        let deps = workspace_deps();
        assert!(
            !deps.iter().any(|dep| dep == "grovelog"),
            "forbidden dependency found: grovelog"
        );
    }

    #[test]
    fn adapters_crate_compiles() {
        let version = adapters_crate_version();
        assert!(!version.is_empty());
    }

    #[test]
    fn adapters_can_use_ports_shared_config() {
        assert!(!ports_crate_version().is_empty());
        assert!(!shared_crate_version().is_empty());
        assert!(!config_crate_version().is_empty());
    }
}

//! Handler construction from options.

use grovelog_adapters::{FileSink, FormatHandler, StderrSink, StdoutSink};
use grovelog_config::{Destination, Format, Options};
use grovelog_ports::{Handler, LogSink};
use grovelog_shared::Result;
use std::path::Path;
use std::sync::Arc;

/// Handler writing to `sink`, in the encoding `options` select.
pub fn new_handler(sink: Arc<dyn LogSink>, options: Options) -> Result<Arc<dyn Handler>> {
    Ok(Arc::new(FormatHandler::new(sink, options)?))
}

/// Open the sink `destination` names.
pub fn open_destination(destination: &Destination) -> Result<Arc<dyn LogSink>> {
    Ok(match destination {
        Destination::Stdout => Arc::new(StdoutSink),
        Destination::Stderr => Arc::new(StderrSink),
        Destination::File(path) => Arc::new(FileSink::open(path)?),
    })
}

/// Handler for `options.destination`.
pub fn destination_handler(options: Options) -> Result<Arc<dyn Handler>> {
    options.validate()?;
    let options = file_options(options);
    let sink = open_destination(&options.destination)?;
    new_handler(sink, options)
}

/// Handler appending to the file at `path`.
///
/// Rich output is downgraded to structured: escape codes have no place in a
/// log file.
pub fn file_handler(path: impl AsRef<Path>, options: Options) -> Result<Arc<dyn Handler>> {
    let path = path.as_ref();
    options.validate()?;
    let options = file_options(options.with_destination(Destination::File(path.to_path_buf())));
    let sink = FileSink::open(path)?;
    tracing::debug!(path = %path.display(), format = %options.format, "opened log file");
    new_handler(Arc::new(sink), options)
}

fn file_options(options: Options) -> Options {
    if !matches!(options.destination, Destination::File(_)) || options.format != Format::Rich {
        return options;
    }
    tracing::debug!("rich format downgraded to structured for file output");
    options.with_format(Format::Structured)
}

#[cfg(test)]
mod tests {
    use super::*;
    use grovelog_ports::{Level, LogContext, Record};
    use std::error::Error;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn scratch_path(name: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos())
            .unwrap_or_default();
        std::env::temp_dir().join(format!("grovelog-{name}-{}-{nanos}.log", std::process::id()))
    }

    #[test]
    fn rich_is_downgraded_for_files() -> Result<(), Box<dyn Error>> {
        let path = scratch_path("downgrade");
        let handler = file_handler(&path, Options::development())?;
        handler.handle(
            &LogContext::new(),
            &Record::new(Level::INFO, "to file").with_attr("k", 1),
        )?;
        handler.flush()?;

        let contents = std::fs::read_to_string(&path)?;
        std::fs::remove_file(&path)?;
        let object: serde_json::Value = serde_json::from_str(contents.trim_end())?;
        assert_eq!(object.get("msg"), Some(&serde_json::Value::from("to file")));
        assert!(!contents.contains('\u{1b}'));
        Ok(())
    }

    #[test]
    fn console_destinations_keep_their_format() {
        let options = Options::development();
        assert_eq!(file_options(options).format, Format::Rich);
    }

    #[test]
    fn unopenable_destination_fails_before_logging() {
        let path = scratch_path("missing").join("nested").join("app.log");
        let options = Options::production().with_destination(Destination::File(path));
        let error = destination_handler(options).err();
        assert!(matches!(error, Some(ref error) if error.is_config()));
    }
}

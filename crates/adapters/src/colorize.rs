//! Level-keyed ANSI decoration.

use colored::Colorize;
use grovelog_config::ColorChoice;
use grovelog_domain::Level;

/// Decoration applied to one segment of a rich line.
pub type Decorate = fn(&str) -> String;

/// Decoration for a level token.
///
/// Total over every level: the four named levels get their own color, any
/// other value falls back to white.
#[must_use]
pub fn colorize(level: Level) -> Decorate {
    match level {
        Level::DEBUG => |text| text.blue().to_string(),
        Level::INFO => |text| text.green().to_string(),
        Level::WARN => |text| text.yellow().to_string(),
        Level::ERROR => |text| text.red().to_string(),
        _ => |text| text.white().to_string(),
    }
}

/// Decoration for the message segment.
#[must_use]
pub fn message_decoration() -> Decorate {
    |text| text.cyan().to_string()
}

/// Decoration for the encoded fields segment.
#[must_use]
pub fn fields_decoration() -> Decorate {
    |text| text.white().to_string()
}

/// Applies decorations, or passes text through when color is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    /// Resolve a color policy once, at handler construction.
    #[must_use]
    pub fn new(choice: ColorChoice) -> Self {
        let enabled = match choice {
            ColorChoice::Auto => colored::control::SHOULD_COLORIZE.should_colorize(),
            ColorChoice::Never => false,
        };
        Self { enabled }
    }

    /// Palette that never emits escapes.
    #[must_use]
    pub const fn plain() -> Self {
        Self { enabled: false }
    }

    /// Returns true when escapes are emitted.
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        self.enabled
    }

    /// Decorate a level token.
    #[must_use]
    pub fn level(self, level: Level, text: &str) -> String {
        self.apply(colorize(level), text)
    }

    /// Decorate the message.
    #[must_use]
    pub fn message(self, text: &str) -> String {
        self.apply(message_decoration(), text)
    }

    /// Decorate the encoded fields.
    #[must_use]
    pub fn fields(self, text: &str) -> String {
        self.apply(fields_decoration(), text)
    }

    fn apply(self, decorate: Decorate, text: &str) -> String {
        if self.enabled {
            decorate(text)
        } else {
            text.to_string()
        }
    }
}

//! Editor options: the `:set` system.
//!
//! [`EditorOptions`] holds the engine's tunables; [`parse_set`] turns the
//! arguments of a `:set` command into [`SetDirective`]s which
//! [`EditorOptions::apply`] then executes.
//!
//! # `:set` arguments
//!
//! | Argument      | Meaning                                         |
//! |---------------|-------------------------------------------------|
//! | `tl`          | turn `translit` on (a value option prints itself) |
//! | `notl`        | turn `translit` off                             |
//! | `tl!`         | flip `translit`                                 |
//! | `mc?`         | print the value                                 |
//! | `mc=4`        | assign                                          |
//! | *(none)*      | print options that differ from the defaults     |
//! | `all`         | print every option                              |
//!
//! # Options
//!
//! | Name            | Short | Kind    | Default |
//! |-----------------|-------|---------|---------|
//! | `translit`       | `tl`   | bool    | true    |
//! | `maxcandidates`  | `mc`   | integer | 8       |
//! | `recordseconds`  | `rs`   | integer | 5       |
//! | `voicelang`      | `vl`   | string  | `ta-IN` |
//! | `speechlang`     | `sl`   | string  | `ta-IN` |

use crate::error::OptionError;

// ---------------------------------------------------------------------------
// EditorOptions
// ---------------------------------------------------------------------------

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorOptions {
    /// Look up transliterations on word boundaries. When off, boundary keys
    /// insert directly.
    pub transliterate: bool,
    /// Upper bound on kept candidates per lookup. Zero means no cap.
    pub max_candidates: usize,
    /// Seconds of audio to record for one dictation.
    pub record_seconds: u32,
    /// Locale hint for speech recognition.
    pub voice_language: String,
    /// Locale hint for speech synthesis.
    pub speech_language: String,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            transliterate: true,
            max_candidates: 8,
            record_seconds: 5,
            voice_language: "ta-IN".to_string(),
            speech_language: "ta-IN".to_string(),
        }
    }
}

impl EditorOptions {
    /// Execute one directive. Returns text for the host to show, if any.
    ///
    /// # Errors
    ///
    /// Returns an [`OptionError`] for unknown names, unparsable values, or a
    /// boolean directive aimed at a value option.
    pub fn apply(&mut self, directive: &SetDirective) -> Result<Option<String>, OptionError> {
        match directive {
            SetDirective::On(name) => self.set_bool(name, |_| true).map(|()| None),
            SetDirective::Off(name) => self.set_bool(name, |_| false).map(|()| None),
            SetDirective::Toggle(name) => self.set_bool(name, |v| !v).map(|()| None),
            SetDirective::Query(name) => self.show(name).map(Some),
            SetDirective::Assign(name, value) => self.assign(name, value).map(|()| None),
            SetDirective::ShowChanged => Ok(Some(self.describe(true))),
            SetDirective::ShowAll => Ok(Some(self.describe(false))),
        }
    }

    fn set_bool(&mut self, name: &str, f: impl FnOnce(bool) -> bool) -> Result<(), OptionError> {
        match canonical(name) {
            Some("translit") => {
                self.transliterate = f(self.transliterate);
                Ok(())
            }
            Some(_) => Err(OptionError::NotBoolean(name.to_string())),
            None => Err(OptionError::Unknown(name.to_string())),
        }
    }

    fn assign(&mut self, name: &str, value: &str) -> Result<(), OptionError> {
        let invalid = || OptionError::InvalidValue {
            option: name.to_string(),
            value: value.to_string(),
        };
        match canonical(name) {
            Some("translit") => match value {
                "on" | "auto" | "true" | "1" => self.transliterate = true,
                "off" | "false" | "0" => self.transliterate = false,
                _ => return Err(invalid()),
            },
            Some("maxcandidates") => self.max_candidates = value.parse().map_err(|_| invalid())?,
            Some("recordseconds") => {
                let secs: u32 = value.parse().map_err(|_| invalid())?;
                if secs == 0 {
                    return Err(invalid());
                }
                self.record_seconds = secs;
            }
            Some("voicelang") if !value.is_empty() => self.voice_language = value.to_string(),
            Some("speechlang") if !value.is_empty() => self.speech_language = value.to_string(),
            Some(_) => return Err(invalid()),
            None => return Err(OptionError::Unknown(name.to_string())),
        }
        Ok(())
    }

    fn show(&self, name: &str) -> Result<String, OptionError> {
        match canonical(name) {
            Some("translit") => Ok(format_bool("translit", self.transliterate)),
            Some("maxcandidates") => Ok(format!("maxcandidates={}", self.max_candidates)),
            Some("recordseconds") => Ok(format!("recordseconds={}", self.record_seconds)),
            Some("voicelang") => Ok(format!("voicelang={}", self.voice_language)),
            Some("speechlang") => Ok(format!("speechlang={}", self.speech_language)),
            _ => Err(OptionError::Unknown(name.to_string())),
        }
    }

    /// All options (or only those differing from the defaults), one per
    /// space-separated entry.
    #[must_use]
    pub fn describe(&self, changed_only: bool) -> String {
        let defaults = Self::default();
        let mut out = Vec::new();
        for name in ALL_OPTIONS {
            let differs = match *name {
                "translit" => self.transliterate != defaults.transliterate,
                "maxcandidates" => self.max_candidates != defaults.max_candidates,
                "recordseconds" => self.record_seconds != defaults.record_seconds,
                "voicelang" => self.voice_language != defaults.voice_language,
                _ => self.speech_language != defaults.speech_language,
            };
            if !changed_only || differs {
                if let Ok(shown) = self.show(name) {
                    out.push(shown);
                }
            }
        }
        out.join("  ")
    }
}

// ---------------------------------------------------------------------------
// Names
// ---------------------------------------------------------------------------

const ALL_OPTIONS: &[&str] = &[
    "translit",
    "maxcandidates",
    "recordseconds",
    "voicelang",
    "speechlang",
];

/// Map a full name or abbreviation to its full name.
fn canonical(name: &str) -> Option<&'static str> {
    match name {
        "translit" | "tl" => Some("translit"),
        "maxcandidates" | "mc" => Some("maxcandidates"),
        "recordseconds" | "rs" => Some("recordseconds"),
        "voicelang" | "vl" => Some("voicelang"),
        "speechlang" | "sl" => Some("speechlang"),
        _ => None,
    }
}

/// True for `translit` and its abbreviation.
#[must_use]
pub fn is_bool_option(name: &str) -> bool {
    canonical(name) == Some("translit")
}

/// True for every known option that holds a number or a string.
#[must_use]
pub fn is_value_option(name: &str) -> bool {
    canonical(name).is_some_and(|full| full != "translit")
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// One argument of a `:set` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetDirective {
    /// `name`
    On(String),
    /// `noname`
    Off(String),
    /// `name!`
    Toggle(String),
    /// `name?`, or a bare value option
    Query(String),
    /// `name=value`
    Assign(String, String),
    /// no arguments
    ShowChanged,
    /// `all`
    ShowAll,
}

/// Split `:set` arguments on whitespace; `:set notl mc=4` yields two
/// directives. An empty argument list means "show what changed".
#[must_use]
pub fn parse_set(args: &str) -> Vec<SetDirective> {
    let directives: Vec<_> = args.split_whitespace().map(parse_set_arg).collect();
    if directives.is_empty() {
        vec![SetDirective::ShowChanged]
    } else {
        directives
    }
}

/// Classify one `:set` argument by its shape.
#[must_use]
pub fn parse_set_arg(arg: &str) -> SetDirective {
    if let Some((name, value)) = arg.split_once('=') {
        return SetDirective::Assign(name.into(), value.into());
    }
    match (arg.strip_suffix('?'), arg.strip_suffix('!')) {
        (Some(name), _) => SetDirective::Query(name.into()),
        (_, Some(name)) => SetDirective::Toggle(name.into()),
        _ if arg == "all" => SetDirective::ShowAll,
        // `no` is only a prefix when what follows is a real boolean, so an
        // unknown `nofoo` still reports `nofoo`.
        _ => match arg.strip_prefix("no") {
            Some(name) if is_bool_option(name) => SetDirective::Off(name.into()),
            _ if is_value_option(arg) => SetDirective::Query(arg.into()),
            _ => SetDirective::On(arg.into()),
        },
    }
}

/// `translit` or `notranslit`.
#[must_use]
pub fn format_bool(name: &str, value: bool) -> String {
    let prefix = if value { "" } else { "no" };
    format!("{prefix}{name}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Runtime options.
//!
//! Read from a flag string in the style of GNU long options, normally the
//! [`OPTIONS_ENV`] environment variable:
//!
//! ```text
//! MOREL_OPTIONS="--heap-size=65536 --relocate-every-alloc --type-ctor-stats"
//! ```

use morel_heap::HeapConfig;

/// Environment variable [`RuntimeOptions::from_env`] reads.
pub const OPTIONS_ENV: &str = "MOREL_OPTIONS";

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum OptionsError {
    #[error("unknown option `{0}`")]
    UnknownFlag(String),
    #[error("option `{0}` needs a value")]
    MissingValue(String),
    #[error("option `{0}` does not take a value")]
    UnexpectedValue(String),
    #[error("invalid value `{value}` for option `{flag}`")]
    InvalidValue { flag: String, value: String },
    #[error("heap expansion factor must be greater than 1, got {0}")]
    ExpansionFactor(f64),
    #[error("`MOREL_OPTIONS` is not valid unicode")]
    NotUnicode,
}

/// Everything configurable about a runtime.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RuntimeOptions {
    pub heap: HeapConfig,
    /// Count constructor visits in a [`TypeCtorStats`](crate::TypeCtorStats).
    pub type_ctor_stats: bool,
    /// Trace every engine exit.
    pub trace_exits: bool,
}

impl RuntimeOptions {
    /// Parse whitespace-separated flags. Later flags override earlier ones.
    pub fn parse(flags: &str) -> Result<Self, OptionsError> {
        let mut options = RuntimeOptions::default();
        for arg in flags.split_whitespace() {
            let (flag, value) = match arg.split_once('=') {
                Some((flag, value)) => (flag, Some(value)),
                None => (arg, None),
            };
            match flag {
                "--heap-size" => {
                    options.heap.initial_words = parse_value(flag, value)?;
                }
                "--heap-expansion-factor" => {
                    let factor: f64 = parse_value(flag, value)?;
                    if factor.is_nan() || factor <= 1.0 {
                        return Err(OptionsError::ExpansionFactor(factor));
                    }
                    options.heap.expansion_factor = factor;
                }
                "--relocate-every-alloc" => {
                    no_value(flag, value)?;
                    options.heap.relocate_every_alloc = true;
                }
                "--type-ctor-stats" => {
                    no_value(flag, value)?;
                    options.type_ctor_stats = true;
                }
                "--trace-exits" => {
                    no_value(flag, value)?;
                    options.trace_exits = true;
                }
                _ => return Err(OptionsError::UnknownFlag(flag.to_string())),
            }
        }
        Ok(options)
    }

    /// Parse [`OPTIONS_ENV`]; defaults when it is unset.
    pub fn from_env() -> Result<Self, OptionsError> {
        match std::env::var(OPTIONS_ENV) {
            Ok(flags) => Self::parse(&flags),
            Err(std::env::VarError::NotPresent) => Ok(Self::default()),
            Err(std::env::VarError::NotUnicode(_)) => Err(OptionsError::NotUnicode),
        }
    }
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<&str>) -> Result<T, OptionsError> {
    let value = value.ok_or_else(|| OptionsError::MissingValue(flag.to_string()))?;
    value.parse().map_err(|_| OptionsError::InvalidValue {
        flag: flag.to_string(),
        value: value.to_string(),
    })
}

fn no_value(flag: &str, value: Option<&str>) -> Result<(), OptionsError> {
    match value {
        None => Ok(()),
        Some(_) => Err(OptionsError::UnexpectedValue(flag.to_string())),
    }
}

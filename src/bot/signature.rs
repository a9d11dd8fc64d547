//! Bot signatures.
//!
//! Config files list signatures as a mixed array: plain strings are exact
//! tokens, tables carry a regex pattern. The shape is decided once when the
//! list is compiled, never per request.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::{PrerenderError, Result};

/// A signature as it appears in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SignatureDef {
    Token(String),
    Pattern {
        name: String,
        pattern: String,
        /// Example User-Agent for documentation; never evaluated.
        #[serde(default, alias = "UA", skip_serializing_if = "Option::is_none")]
        sample: Option<String>,
    },
}

impl SignatureDef {
    pub fn token(text: impl Into<String>) -> Self {
        SignatureDef::Token(text.into())
    }

    pub fn pattern(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        SignatureDef::Pattern {
            name: name.into(),
            pattern: pattern.into(),
            sample: None,
        }
    }

    /// Compiles this definition. Malformed or empty patterns are configuration errors.
    pub fn compile(&self) -> Result<BotSignature> {
        match self {
            SignatureDef::Token(text) => {
                if text.trim().is_empty() {
                    return Err(PrerenderError::config(
                        "Bot signature tokens must not be empty",
                    ));
                }
                Ok(BotSignature::ExactToken {
                    token: text.clone(),
                    needle: text.to_lowercase(),
                })
            }
            SignatureDef::Pattern {
                name,
                pattern,
                sample,
            } => {
                if pattern.is_empty() {
                    return Err(PrerenderError::config(format!(
                        "Bot signature '{}' has an empty pattern",
                        name
                    )));
                }
                let regex = RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| PrerenderError::InvalidPattern {
                        name: name.clone(),
                        source,
                    })?;
                Ok(BotSignature::PatternRule {
                    name: name.clone(),
                    regex,
                    sample: sample.clone(),
                })
            }
        }
    }
}

/// A compiled bot signature.
#[derive(Debug, Clone)]
pub enum BotSignature {
    ExactToken {
        token: String,
        needle: String,
    },
    PatternRule {
        name: String,
        regex: Regex,
        sample: Option<String>,
    },
}

impl BotSignature {
    /// Name for logs: the token itself, or the rule name.
    pub fn name(&self) -> &str {
        match self {
            BotSignature::ExactToken { token, .. } => token,
            BotSignature::PatternRule { name, .. } => name,
        }
    }

    /// `lowered` must be `identifier.to_lowercase()`.
    pub(crate) fn matches(&self, identifier: &str, lowered: &str) -> bool {
        match self {
            BotSignature::ExactToken { needle, .. } => lowered.contains(needle.as_str()),
            BotSignature::PatternRule { regex, .. } => regex.is_match(identifier),
        }
    }
}

/// Crawlers recognised when the config file does not list its own.
pub fn default_signatures() -> Vec<SignatureDef> {
    vec![
        SignatureDef::token("googlebot"),
        SignatureDef::token("bingbot"),
        SignatureDef::token("slackbot"),
        SignatureDef::token("twitterbot"),
        SignatureDef::token("facebookexternalhit"),
        SignatureDef::Pattern {
            name: "baidu".to_string(),
            pattern: "baiduspider".to_string(),
            sample: Some(
                "Mozilla/5.0 (compatible; Baiduspider/2.0; +http://www.baidu.com/search/spider.html)"
                    .to_string(),
            ),
        },
    ]
}

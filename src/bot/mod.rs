//! Bot detection from request User-Agent strings.
//!
//! # Module Structure
//!
//! - [`signature`] - Signature definitions as written in config, compiled once at load
//! - [`matcher`] - The `BotMatcher` predicate over a compiled signature list
//!
//! # Example
//!
//! ```
//! use prerender_lib::BotMatcher;
//!
//! let matcher = BotMatcher::with_defaults()?;
//! assert!(matcher.is_bot(Some("Mozilla/5.0 (compatible; Googlebot/2.1)")));
//! assert!(!matcher.is_bot(None));
//! # Ok::<(), prerender_lib::PrerenderError>(())
//! ```

mod matcher;
mod signature;

pub use matcher::BotMatcher;
pub use signature::{default_signatures, BotSignature, SignatureDef};

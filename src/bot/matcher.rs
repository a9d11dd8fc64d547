use std::sync::Arc;

use super::signature::{default_signatures, BotSignature, SignatureDef};
use crate::Result;

/// Classifies User-Agent strings against an immutable signature list.
///
/// Cloning is cheap; clones share the compiled list.
#[derive(Debug, Clone)]
pub struct BotMatcher {
    signatures: Arc<[BotSignature]>,
}

impl BotMatcher {
    /// Compiles `defs` in order. The first malformed entry fails construction.
    pub fn new(defs: &[SignatureDef]) -> Result<Self> {
        let signatures = defs
            .iter()
            .map(SignatureDef::compile)
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(count = signatures.len(), "Compiled bot signatures");
        Ok(Self {
            signatures: signatures.into(),
        })
    }

    /// Matcher over [`default_signatures`].
    pub fn with_defaults() -> Result<Self> {
        Self::new(&default_signatures())
    }

    pub fn signatures(&self) -> &[BotSignature] {
        &self.signatures
    }

    /// First signature in declaration order that matches `identifier`.
    pub fn matching(&self, identifier: Option<&str>) -> Option<&BotSignature> {
        let identifier = identifier.filter(|s| !s.is_empty())?;
        let lowered = identifier.to_lowercase();
        self.signatures
            .iter()
            .find(|sig| sig.matches(identifier, &lowered))
    }

    /// Absent or empty identifiers are never bots.
    pub fn is_bot(&self, identifier: Option<&str>) -> bool {
        self.matching(identifier).is_some()
    }
}

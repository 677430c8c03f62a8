use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Interner shared by every document in the process.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

static NEXT_BLOCK: AtomicU64 = AtomicU64::new(1);

/// Identifier of a block in a [`Document`](crate::document::Document).
///
/// Backed by a `Spur`, so it is `Copy` and compares in O(1). Node views keep
/// one of these instead of a document position, because positions shift
/// whenever content before the block changes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Spur);

impl NodeId {
    pub fn intern(s: &str) -> Self {
        NodeId(INTERNER.get_or_intern(s))
    }

    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Id for a newly created block of `kind`, e.g. `image-3`.
    ///
    /// Names that are already interned (loaded from saved content, or
    /// handed over by the page) are skipped, so a fresh id never aliases an
    /// existing block.
    pub fn fresh(kind: &str) -> Self {
        loop {
            let n = NEXT_BLOCK.fetch_add(1, Ordering::Relaxed);
            let name = format!("{kind}-{n}");
            if INTERNER.get(name.as_str()).is_none() {
                return Self::intern(&name);
            }
            log::trace!("block id {name} already in use");
        }
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(NodeId::intern(&s))
    }
}

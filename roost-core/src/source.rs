//! Read access to candidate locations.

use crate::Location;

/// Supplies candidate locations to the ranking pipeline.
///
/// Persistence is outside the engine; implementations adapt whatever store
/// holds location records. Iteration order is the order results are ranked
/// in before sorting, so implementations should be deterministic.
pub trait LocationSource {
    /// Look up a single location by identifier.
    fn location(&self, id: &str) -> Option<Location>;

    /// Iterate over every candidate location.
    fn locations(&self) -> Box<dyn Iterator<Item = Location> + Send + '_>;
}

impl LocationSource for [Location] {
    fn location(&self, id: &str) -> Option<Location> {
        self.iter().find(|location| location.id == id).cloned()
    }

    fn locations(&self) -> Box<dyn Iterator<Item = Location> + Send + '_> {
        Box::new(self.iter().cloned())
    }
}

impl LocationSource for Vec<Location> {
    fn location(&self, id: &str) -> Option<Location> {
        self.as_slice().location(id)
    }

    fn locations(&self) -> Box<dyn Iterator<Item = Location> + Send + '_> {
        self.as_slice().locations()
    }
}

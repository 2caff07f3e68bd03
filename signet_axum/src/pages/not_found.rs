use serde::Serialize;

/// The page shown for any unknown path
#[derive(Clone, Copy, Debug, Serialize)]
pub struct NotFound {
    /// Where the "go home" link points
    pub home: &'static str,
}

impl NotFound {
    /// The not-found page
    pub const fn new() -> Self {
        Self { home: "/" }
    }
}

impl Default for NotFound {
    fn default() -> Self {
        Self::new()
    }
}

//! Navigation manager parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// Internal
use crate::guidance;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the navigation manager and all its subcomponents.
#[derive(Deserialize, Debug, Clone)]
pub struct Params {

    /// Parameters for the guidance engine.
    pub guidance: guidance::Params
}

// Wed Oct 14 2026 - Alex

//! The normalized profile layout: two JSON data entries and a metadata
//! record naming them. Nothing written here is ever executed by a consumer.

pub mod class;
pub mod writer;

pub use class::{infer_profile_class, variant_name};
pub use writer::ProfileWriter;

use serde::{Deserialize, Serialize};

pub const CONSTANTS_ENTRY: &str = "Constants.json";
pub const VTYPES_ENTRY: &str = "vtypes.json";
pub const METADATA_ENTRY: &str = "metadata";
pub const MODULE_ENTRY: &str = "module.ko";

/// Metadata record. Fields are declared in sorted key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileMetadata {
    #[serde(rename = "Constants")]
    pub constants: String,
    #[serde(rename = "ProfileClass")]
    pub profile_class: String,
    #[serde(rename = "VTypes")]
    pub vtypes: String,
}

impl ProfileMetadata {
    pub fn new(profile_class: &str) -> Self {
        Self {
            constants: CONSTANTS_ENTRY.to_string(),
            profile_class: profile_class.to_string(),
            vtypes: VTYPES_ENTRY.to_string(),
        }
    }
}

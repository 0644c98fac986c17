//! Category references embedded in product rows.
//!
//! Categories and subcategories are managed elsewhere; products only read
//! their id, name and slug to populate responses.

use serde::{Deserialize, Serialize};
use storefront_core::types::DbId;

/// A populated category or subcategory reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: DbId,
    pub name: String,
    pub slug: String,
}

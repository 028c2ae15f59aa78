//! Domain constants

/// Remote collection holding user profile documents.
pub const USERS_COLLECTION: &str = "users";

/// Remote collection holding progress records.
pub const AVANCES_COLLECTION: &str = "avances";

/// Remote collection holding productivity events.
pub const PRODUCTIVIDAD_COLLECTION: &str = "productividad";

/// Namespace prefix for user snapshots in the local cache (`user_<id>`).
pub const USER_CACHE_PREFIX: &str = "user_";

/// Display prefix for locally generated record identifiers.
pub const PENDING_ID_PREFIX: &str = "temp-";

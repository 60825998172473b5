/// Application name
pub const APP_NAME: &str = "Tuck Shop Admin";

/// Document store collection holding catalog items
pub const ITEMS_COLLECTION: &str = "items";

/// Document store collection holding promotional offers
pub const OFFERS_COLLECTION: &str = "offers";

/// Document store collection holding recorded purchases (append-only)
pub const PURCHASES_COLLECTION: &str = "purchases";

/// Default administrator username
pub const DEFAULT_ADMIN_USERNAME: &str = "Admin";

/// Default administrator password
pub const DEFAULT_ADMIN_PASSWORD: &str = "1234";

/// Credential file looked up in the working directory when no override is set
pub const DEFAULT_CREDENTIALS_FILE: &str = "ServiceAccountKey.json";

/// Env var overriding the credential file path
pub const ENV_CREDENTIALS: &str = "TUCKSHOP_CREDENTIALS";

/// Env var pointing at an explicit database file
pub const ENV_DB_PATH: &str = "TUCKSHOP_DB_PATH";

/// Marker prefixed to each rendered offer line
pub const OFFER_BULLET: &str = "•";

/// Item name length bounds (inclusive, in characters)
pub const ITEM_NAME_MIN_LEN: usize = 2;
pub const ITEM_NAME_MAX_LEN: usize = 100;

/// Accepted image extensions for `Image_Path` (compared case-insensitively)
pub const IMAGE_EXTENSIONS: [&str; 4] = [".jpg", ".png", ".gif", ".webp"];

/// Pseudo length bounds (inclusive, in characters)
pub const PSEUDO_MIN_LEN: usize = 3;
pub const PSEUDO_MAX_LEN: usize = 30;

/// Minimum password length before hashing
pub const PASSWORD_MIN_LEN: usize = 6;

/// Crafting grid is GRID_SIZE x GRID_SIZE, positions are 1..=GRID_CELLS
pub const GRID_SIZE: i64 = 3;
pub const GRID_CELLS: i64 = GRID_SIZE * GRID_SIZE;

/// Session lifetime (24 hours)
pub const SESSION_MAX_AGE_SECS: i64 = 24 * 60 * 60;

/// Name of the session cookie
pub const SESSION_COOKIE_NAME: &str = "crafting_session";

/// Header carrying the anti-forgery token on mutating requests
pub const CSRF_HEADER: &str = "x-csrf-token";

/// Maximum accepted request body (10 KiB)
pub const MAX_REQUEST_BODY_BYTES: usize = 10 * 1024;

/// Prune the rate-limit table once it tracks this many clients
pub const RATE_LIMIT_PRUNE_THRESHOLD: usize = 10_000;

// =============================================================================
// Error Messages
// =============================================================================

/// Shared by "unknown email" and "wrong password"
pub const ERR_INVALID_CREDENTIALS: &str = "Invalid email or password";

pub const ERR_CREDENTIALS_REQUIRED: &str = "Email and password are required";

pub const ERR_AUTH_REQUIRED: &str = "Authentication required";

pub const ERR_INVALID_CSRF_TOKEN: &str = "CSRF token validation failed";

pub const ERR_INVALID_ID: &str = "ID must be a number";

pub const ERR_EMAIL_TAKEN: &str = "This email is already in use";

pub const ERR_ITEM_USED_IN_RECIPES: &str =
    "Cannot delete the item because it is used in recipes";

pub const ERR_INTERNAL: &str = "Internal server error";

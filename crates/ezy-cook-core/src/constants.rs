// ABOUTME: Application-wide constants for the Ezy Cook platform
// ABOUTME: Groups service names, auth, OTP, upload and recipe defaults by domain
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ezy Cook

/// Service identification
pub mod service_names {
    /// Name used in logs and startup banners
    pub const EZY_COOK_SERVER: &str = "ezy-cook-server";
    /// Display name used in outgoing emails and the welcome route
    pub const DISPLAY_NAME: &str = "Ezy Cook Recipe App";
}

/// Network defaults
pub mod network {
    /// Default HTTP port
    pub const DEFAULT_HTTP_PORT: u16 = 5000;
    /// Default bind address
    pub const DEFAULT_HOST: &str = "0.0.0.0";
    /// Default overall request timeout in seconds
    pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
}

/// Authentication constants
pub mod auth {
    /// Tokens are valid for 30 days
    pub const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24 * 30;
    /// JWT audience claim
    pub const JWT_AUDIENCE: &str = "ezy-cook-api";
    /// Minimum accepted password length
    pub const MIN_PASSWORD_LENGTH: usize = 6;
}

/// One-time password (password reset) constants
pub mod otp {
    /// Smallest 4-digit code
    pub const CODE_MIN: u32 = 1000;
    /// Largest 4-digit code
    pub const CODE_MAX: u32 = 9999;
    /// Minutes before a code expires
    pub const TTL_MINUTES: i64 = 5;
    /// Subject line of the reset email
    pub const EMAIL_SUBJECT: &str = "Password Reset OTP";
}

/// Upload limits
pub mod uploads {
    /// Default directory for stored images
    pub const DEFAULT_UPLOAD_DIR: &str = "uploads";
    /// URL prefix under which stored images are served
    pub const PUBLIC_PREFIX: &str = "/uploads";
    /// Maximum size of an uploaded image (5MB)
    pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
    /// Maximum size of a text form field (2MB)
    pub const MAX_FIELD_BYTES: usize = 2 * 1024 * 1024;
    /// Upper bound of a whole multipart request body
    pub const MAX_REQUEST_BYTES: usize = MAX_IMAGE_BYTES + 4 * MAX_FIELD_BYTES;
    /// Form field carrying a recipe image
    pub const RECIPE_IMAGE_FIELD: &str = "image";
    /// Form field carrying a profile image
    pub const PROFILE_IMAGE_FIELD: &str = "profileImage";
    /// Accepted image extensions (also matched against the MIME subtype)
    pub const ALLOWED_IMAGE_TYPES: &[&str] = &["jpg", "jpeg", "png"];
}

/// Recipe defaults
pub mod recipes {
    /// Servings used when none (or an invalid value) is provided
    pub const DEFAULT_SERVINGS: u32 = 1;
    /// Partial tiers tried after the "match all" tier, strictest first
    pub const PARTIAL_MATCH_TIERS: [usize; 2] = [2, 1];
}

/// User-facing messages shared between services and tests
pub mod messages {
    /// Welcome message of the root route
    pub const WELCOME: &str = "Welcome to the Ezy Cook API!";
    /// Signup missing fields
    pub const SIGNUP_FIELDS_REQUIRED: &str = "Please fill all required fields";
    /// Signup email does not look like an address
    pub const INVALID_EMAIL: &str = "Please provide a valid email address";
    /// Password under the minimum length
    pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters";
    /// Signup conflict
    pub const USER_ALREADY_EXISTS: &str = "Username or email already taken";
    /// Login failure
    pub const INVALID_CREDENTIALS: &str = "Invalid username or password";
    /// OTP dispatched
    pub const OTP_SENT: &str = "OTP sent to email";
    /// OTP mismatch
    pub const INVALID_OTP: &str = "Invalid OTP";
    /// OTP too old
    pub const OTP_EXPIRED: &str = "OTP expired";
    /// Password changed
    pub const PASSWORD_RESET: &str = "Password reset successful";
    /// Profile read
    pub const PROFILE_FETCHED: &str = "Profile fetched successfully";
    /// Profile written
    pub const PROFILE_UPDATED: &str = "Profile updated successfully";
    /// Bearer token absent
    pub const NO_TOKEN: &str = "Not authorized, no token";
    /// Bearer token rejected
    pub const TOKEN_FAILED: &str = "Not authorized, token failed";
    /// Recipe creation missing fields
    pub const RECIPE_FIELDS_REQUIRED: &str = "Title, description, and ingredients are required";
    /// Ingredients could not be parsed
    pub const INVALID_INGREDIENTS: &str = "Ingredients must be a valid JSON array";
    /// Tools could not be parsed
    pub const INVALID_TOOLS: &str = "Tools must be a valid JSON array";
    /// Update by non-owner
    pub const NOT_RECIPE_OWNER_UPDATE: &str = "Not authorized to update this recipe";
    /// Delete by non-owner
    pub const NOT_RECIPE_OWNER_DELETE: &str = "Not authorized to delete this recipe";
    /// Recipe deleted
    pub const RECIPE_DELETED: &str = "Recipe deleted successfully";
    /// Wrong image type
    pub const IMAGES_ONLY: &str = "Images only! Allowed types: jpg, jpeg, png";
    /// File part on a field that does not take files
    pub const UNEXPECTED_FILE_FIELD: &str = "Unexpected file field.";
    /// Image over the size limit
    pub const FILE_TOO_LARGE: &str = "File too large. Maximum size is 5MB.";
    /// Text field over the size limit
    pub const FIELD_TOO_LARGE: &str = "Field value too large. Maximum size is 2MB.";
}

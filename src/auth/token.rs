use uuid::Uuid;

/// Opaque tokens are UUID v4 with the dashes stripped.
pub const TOKEN_LENGTH: usize = 32;

/// Generates an opaque token for sessions and plan access alike.
#[must_use]
pub fn generate_token() -> String {
    Uuid::new_v4().simple().to_string()
}

use rand::Rng;

pub const INVITE_CODE_LENGTH: usize = 24;

/// ## Summary
/// Generates a random lower-case alphanumeric invite code.
#[must_use]
pub fn generate_invite_code() -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(INVITE_CODE_LENGTH)
        .map(|byte| char::from(byte).to_ascii_lowercase())
        .collect()
}

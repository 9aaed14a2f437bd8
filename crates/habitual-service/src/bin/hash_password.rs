//! Prints the SQL that sets a user's password, for recovering accounts by hand.
//!
//! Usage: `hash_password <email> <password>`

use habitual_core::constants::PASSWORD_AUTH_SOURCE;
use habitual_service::{auth::password::hash_password, profile::account::normalize_email};

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let (Some(email), Some(password)) = (args.next(), args.next()) else {
        anyhow::bail!("usage: hash_password <email> <password>");
    };

    let hash = hash_password(&password)?;
    let email = normalize_email(&email).replace('\'', "''");

    println!(
        "INSERT INTO auth_user (auth_source, auth_id, user_id)\n\
         SELECT '{PASSWORD_AUTH_SOURCE}', '{hash}', id FROM \"user\" WHERE email = '{email}'\n\
         ON CONFLICT (user_id, auth_source) DO UPDATE SET auth_id = EXCLUDED.auth_id, updated_at = now();"
    );

    Ok(())
}

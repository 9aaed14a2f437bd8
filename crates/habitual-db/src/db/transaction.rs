//! Transaction helper for multi-statement writes.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use diesel_async::scoped_futures::ScopedFutureExt;
//! use habitual_db::db::transaction::with_transaction;
//!
//! with_transaction(&mut conn, |tx| async move {
//!     query::entry::delete_for_user(tx, user_id).await?;
//!     query::habit::delete_for_user(tx, user_id).await?;
//!     Ok::<_, ServiceError>(())
//! }.scope_boxed()).await?;
//! ```

use diesel_async::{AsyncConnection, AsyncPgConnection, scoped_futures::ScopedBoxFuture};

/// ## Summary
/// Runs `callback` inside a database transaction and returns its result.
///
/// The transaction is committed when the callback returns `Ok` and rolled back otherwise.
///
/// ## Errors
/// Returns any error produced by the closure, or errors raised while starting
/// or committing the transaction.
pub async fn with_transaction<'a, 'conn, T, E, F>(
    conn: &'conn mut AsyncPgConnection,
    callback: F,
) -> Result<T, E>
where
    F: for<'r> FnOnce(&'r mut AsyncPgConnection) -> ScopedBoxFuture<'a, 'r, Result<T, E>>
        + Send
        + 'a,
    E: From<diesel::result::Error> + Send + 'a,
    T: Send + 'a,
    'a: 'conn,
{
    conn.transaction(callback).await
}

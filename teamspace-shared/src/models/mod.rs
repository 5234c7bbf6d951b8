/// Database models
///
/// One module per table, each owning its SQL. Query functions take
/// `impl PgExecutor<'_>` so the same statement runs against the pool or
/// inside the bootstrap transaction.
///
/// # Models
///
/// - `user`: identities and their current workspace
/// - `account`: user-to-provider bindings (one per provider identity)
/// - `workspace`: tenant boundaries, each owned by a user
/// - `role`: named permission sets, seeded by migration
/// - `member`: a user's role-scoped participation in a workspace

pub mod account;
pub mod member;
pub mod role;
pub mod user;
pub mod workspace;

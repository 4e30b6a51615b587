pub mod assemble;
pub mod favorite;
pub mod ownership;
pub mod relation;
pub mod share;
pub mod token;

/// Listing endpoints never return more than this many rows per page.
pub const MAX_PAGE_SIZE: i64 = 30;

/// Clamps a client-supplied page onto sane bounds.
#[must_use]
pub fn clamp_page(offset: i64, count: i64) -> (i64, i64) {
    let offset = offset.max(0);
    let count = count.clamp(1, MAX_PAGE_SIZE);
    (offset, count)
}

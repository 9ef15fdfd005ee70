use crate::db::StoreHandle;
use crate::error::app_error::AppError;

#[derive(Clone)]
pub struct JsonRepository {
    pub store: StoreHandle,
}

/// Next identity for a collection: one past the largest id in use, or 1 when empty.
/// Ids freed by deleting the newest record are handed out again.
#[allow(clippy::result_large_err)]
pub(crate) fn next_id(ids: impl Iterator<Item = u64>) -> Result<u64, AppError> {
    match ids.max() {
        None => Ok(1),
        Some(max) => max
            .checked_add(1)
            .ok_or_else(|| AppError::BadRequest("No free id left after the largest stored id".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_id_starts_at_one() {
        assert_eq!(next_id(std::iter::empty()).unwrap(), 1);
    }

    #[test]
    fn next_id_follows_the_largest_id_not_the_count() {
        assert_eq!(next_id([1, 2, 7].into_iter()).unwrap(), 8);
        assert_eq!(next_id([4].into_iter()).unwrap(), 5);
    }

    #[test]
    fn next_id_refuses_to_wrap_past_the_largest_id() {
        assert!(matches!(next_id([3, u64::MAX].into_iter()), Err(AppError::BadRequest(_))));
    }
}

use sea_orm::{ConnectionTrait, DbErr, EntityTrait, Select};

pub mod inspection_chain;
pub mod records;
pub mod reference_data;

/// Upper bound on bound parameters per `IN (...)` list.
pub const IN_LIST_CHUNK: usize = 500;

/// Runs `build` once per chunk of `ids` and concatenates the results.
///
/// Rows keep the order each chunk query returns them in; callers that need a
/// global order must pass sorted ids and order by the chunked column.
pub async fn find_in_chunks<E, C, F>(conn: &C, ids: &[i64], build: F) -> Result<Vec<E::Model>, DbErr>
where
    E: EntityTrait,
    C: ConnectionTrait,
    F: Fn(Vec<i64>) -> Select<E>,
{
    let mut rows = Vec::new();
    for chunk in ids.chunks(IN_LIST_CHUNK) {
        rows.extend(build(chunk.to_vec()).all(conn).await?);
    }
    Ok(rows)
}

/// Sorted, de-duplicated ids.
pub fn unique_ids(ids: impl IntoIterator<Item = i64>) -> Vec<i64> {
    let mut ids: Vec<i64> = ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_ids_sorts_and_dedups() {
        assert_eq!(unique_ids([5, 1, 5, 3, 1]), vec![1, 3, 5]);
        assert!(unique_ids(Vec::new()).is_empty());
    }
}

//! Three-way outcome of a lookup by key

/// Result of fetching an object that may legitimately be absent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T, E> {
    Found(T),
    NotFound,
    Failed(E),
}

impl<T, E> Lookup<T, E> {
    /// Collapse into a `Result`, mapping absence to `None`
    pub fn into_result(self) -> Result<Option<T>, E> {
        match self {
            Lookup::Found(value) => Ok(Some(value)),
            Lookup::NotFound => Ok(None),
            Lookup::Failed(err) => Err(err),
        }
    }

    /// Build a lookup from a result, classifying errors with `is_not_found`
    pub fn from_result(result: Result<T, E>, is_not_found: impl FnOnce(&E) -> bool) -> Self {
        match result {
            Ok(value) => Lookup::Found(value),
            Err(err) if is_not_found(&err) => Lookup::NotFound,
            Err(err) => Lookup::Failed(err),
        }
    }
}

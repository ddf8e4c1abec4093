//! Favorite-movie reconciliation
//!
//! The favorites view is derived: a pure function of the user's favorite ids
//! and the catalog. Nothing here holds state; callers re-run [`resolve`]
//! after every change to either input.

use std::collections::HashMap;

use serde::Serialize;

use super::Movie;

/// Favorite ids resolved against the catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FavoritesView {
    /// Matching movies, in favorite-id order
    pub movies: Vec<Movie>,
    /// Favorite ids with no movie in the catalog
    pub unresolved_ids: Vec<String>,
}

impl FavoritesView {
    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}

/// Resolve favorite ids against the catalog, preserving id order.
///
/// Duplicate ids resolve once per occurrence. Ids missing from the catalog
/// are dropped from `movies` and reported in `unresolved_ids`.
pub fn resolve(favorite_ids: &[String], catalog: &[Movie]) -> FavoritesView {
    let by_id: HashMap<&str, &Movie> = catalog.iter().map(|m| (m.id.as_str(), m)).collect();

    let mut view = FavoritesView::default();
    for id in favorite_ids {
        match by_id.get(id.as_str()) {
            Some(movie) => view.movies.push((*movie).clone()),
            None => view.unresolved_ids.push(id.clone()),
        }
    }
    view
}

/// Membership test over the favorite ids
pub fn is_favorite(movie_id: &str, favorite_ids: &[String]) -> bool {
    favorite_ids.iter().any(|id| id == movie_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn catalog() -> Vec<Movie> {
        vec![Movie::new("m1", "A"), Movie::new("m2", "B"), Movie::new("m3", "C")]
    }

    #[test]
    fn test_resolve_drops_unknown_ids() {
        let catalog = vec![Movie::new("m1", "A"), Movie::new("m2", "B")];
        let view = resolve(&ids(&["m2", "m9"]), &catalog);

        assert_eq!(view.movies, vec![Movie::new("m2", "B")]);
        assert_eq!(view.unresolved_ids, ids(&["m9"]));
    }

    #[test]
    fn test_resolve_preserves_id_order_not_catalog_order() {
        let view = resolve(&ids(&["m3", "m1", "m2"]), &catalog());
        let titles: Vec<&str> = view.movies.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "A", "B"]);
        assert!(view.unresolved_ids.is_empty());
    }

    #[test]
    fn test_resolve_keeps_duplicates_from_id_list() {
        let view = resolve(&ids(&["m1", "m1"]), &catalog());
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn test_resolve_empty_inputs() {
        assert!(resolve(&[], &catalog()).is_empty());

        let view = resolve(&ids(&["m1"]), &[]);
        assert!(view.is_empty());
        assert_eq!(view.unresolved_ids, ids(&["m1"]));
    }

    #[test]
    fn test_is_favorite() {
        let favorites = ids(&["m1", "m3"]);
        assert!(is_favorite("m1", &favorites));
        assert!(is_favorite("m3", &favorites));
        assert!(!is_favorite("m2", &favorites));
        assert!(!is_favorite("m1", &[]));
    }
}

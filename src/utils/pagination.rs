// ============================================================================
// PAGINATION
// ============================================================================
//
// Description:
//   Paramètres ?page&size&sortBy&direction communs à toutes les listes et
//   enveloppe de réponse { <items>, currentPage, totalItems, totalPages }.
//
// Règles:
//   - page commence à 0, size par défaut 10, maximum 100
//   - direction "desc" (insensible à la casse) => DESC, tout le reste => ASC
//   - sortBy accepte le nom de colonne en snake_case ou camelCase
//   - totalPages = ceil(totalItems / size)
//   - page * size doit tenir dans un OFFSET signé 64 bits, sinon 400
//
// ============================================================================

use std::str::FromStr;

use sea_orm::{ColumnTrait, ItemsAndPagesNumber, Order};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::errors::{AppError, AppResult};

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("desc") {
            Direction::Desc
        } else {
            Direction::Asc
        }
    }
}

impl From<Direction> for Order {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Asc => Order::Asc,
            Direction::Desc => Order::Desc,
        }
    }
}

/// Query string brute d'une liste paginée
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    pub page: Option<u64>,
    pub size: Option<u64>,
    pub sort_by: Option<String>,
    pub direction: Option<String>,
}

/// Query string d'une recherche: ?query&page&size (tri fixe par id croissant).
/// `query` est obligatoire.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SearchParams {
    pub query: String,
    pub page: Option<u64>,
    pub size: Option<u64>,
}

impl SearchParams {
    pub fn page_request(&self) -> AppResult<PageRequest> {
        PageParams {
            page: self.page,
            size: self.size,
            sort_by: None,
            direction: None,
        }
        .into_request("id", Direction::Asc)
    }
}

/// Requête de page validée
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
    pub sort_by: String,
    pub direction: Direction,
}

impl PageParams {
    pub fn into_request(self, default_sort: &str, default_direction: Direction) -> AppResult<PageRequest> {
        let size = self.size.unwrap_or(DEFAULT_PAGE_SIZE);
        if size == 0 || size > MAX_PAGE_SIZE {
            return Err(AppError::BadRequest(format!(
                "Page size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }

        let page = self.page.unwrap_or(0);
        if page
            .checked_mul(size)
            .is_none_or(|offset| offset > i64::MAX as u64)
        {
            return Err(AppError::BadRequest(format!("Page {} is out of range", page)));
        }

        Ok(PageRequest {
            page,
            size,
            sort_by: self.sort_by.unwrap_or_else(|| default_sort.to_string()),
            direction: self
                .direction
                .as_deref()
                .map(Direction::parse)
                .unwrap_or(default_direction),
        })
    }
}

impl PageParams {
    /// Pour les endpoints à ordre imposé (historique): sortBy/direction refusés
    pub fn into_unsorted_request(self, sort: &str, direction: Direction) -> AppResult<PageRequest> {
        if self.sort_by.is_some() || self.direction.is_some() {
            return Err(AppError::BadRequest(
                "Sorting is not supported on this endpoint".to_string(),
            ));
        }
        self.into_request(sort, direction)
    }
}

impl PageRequest {
    /// Colonne de tri de l'entité, 400 si elle n'existe pas
    pub fn sort_column<C>(&self) -> AppResult<C>
    where
        C: ColumnTrait + FromStr,
    {
        C::from_str(&self.sort_by)
            .map_err(|_| AppError::BadRequest(format!("Cannot sort by '{}'", self.sort_by)))
    }

    pub fn order(&self) -> Order {
        self.direction.into()
    }
}

/// Enveloppe paginée. La clé de la liste ("songs", "favorites"...) dépend de l'endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResponse<T> {
    pub label: &'static str,
    pub items: Vec<T>,
    pub current_page: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

impl<T> PageResponse<T> {
    pub fn new(label: &'static str, items: Vec<T>, request: &PageRequest, totals: ItemsAndPagesNumber) -> Self {
        PageResponse {
            label,
            items,
            current_page: request.page,
            total_items: totals.number_of_items,
            total_pages: totals.number_of_pages,
        }
    }
}

impl<T: Serialize> Serialize for PageResponse<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4))?;
        map.serialize_entry(self.label, &self.items)?;
        map.serialize_entry("currentPage", &self.current_page)?;
        map.serialize_entry("totalItems", &self.total_items)?;
        map.serialize_entry("totalPages", &self.total_pages)?;
        map.end()
    }
}

//! One star per grid cell.
//!
//! Cell contests are decided by a total order over candidates, so the winner
//! never depends on which star was read first.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::schema::CatalogStar;

/// A catalog star placed on the galaxy grid
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedStar {
    pub star: CatalogStar,
    pub grid_x: u8,
    pub grid_y: u8,
    pub is_sol: bool,
}

/// `Some` beats `None`; between two values `prefer` decides
fn present_first(a: Option<f64>, b: Option<f64>, prefer: impl Fn(f64, f64) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => prefer(a, b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

/// `Greater` means `a` keeps the cell over `b`.
///
/// Sol, then catalog-named, then higher luminosity, then lower apparent
/// magnitude, then smaller distance, then smaller catalog id.
pub fn cell_priority(a: &ProjectedStar, b: &ProjectedStar) -> Ordering {
    a.is_sol
        .cmp(&b.is_sol)
        .then_with(|| a.star.is_named().cmp(&b.star.is_named()))
        .then_with(|| present_first(a.star.luminosity, b.star.luminosity, |x, y| x.total_cmp(&y)))
        .then_with(|| present_first(a.star.magnitude, b.star.magnitude, |x, y| y.total_cmp(&x)))
        .then_with(|| b.star.distance_ly.total_cmp(&a.star.distance_ly))
        .then_with(|| b.star.catalog_id.cmp(&a.star.catalog_id))
        .then_with(|| b.star.spectral_type.cmp(&a.star.spectral_type))
}

/// Outcome of collision resolution
#[derive(Debug)]
pub struct Resolved {
    pub survivors: Vec<ProjectedStar>,
    pub dropped: usize,
}

/// Keep the highest-priority star in every occupied cell
pub fn resolve_collisions(stars: Vec<ProjectedStar>) -> Resolved {
    let total = stars.len();
    let mut cells: BTreeMap<(u8, u8), ProjectedStar> = BTreeMap::new();

    for candidate in stars {
        let key = (candidate.grid_x, candidate.grid_y);
        match cells.get_mut(&key) {
            Some(holder) => {
                if cell_priority(&candidate, holder) == Ordering::Greater {
                    *holder = candidate;
                }
            }
            None => {
                cells.insert(key, candidate);
            }
        }
    }

    let survivors: Vec<ProjectedStar> = cells.into_values().collect();
    Resolved {
        dropped: total - survivors.len(),
        survivors,
    }
}

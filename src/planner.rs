//! Batch placement planner: orders items, chooses a container per item
//! (preferring zone match), and records placements and unresolved items
//! (spec §4.4).

use std::collections::HashMap;

use crate::model::{Container, Item, ItemLocation};
use crate::packer::Packer;

/// One successful placement produced by a planning run.
#[derive(Clone, Debug, PartialEq)]
pub struct PlannedPlacement {
    pub item_id: String,
    pub container_id: String,
    pub location: ItemLocation,
}

/// Result of planning a batch: placements made, and items left unplaced.
#[derive(Clone, Debug, Default)]
pub struct PlanResult {
    pub placements: Vec<PlannedPlacement>,
    pub unplaced: Vec<String>,
}

/// Plans placements for `items` against `containers`.
///
/// `packers` holds one [`Packer`] per container id, pre-seeded with
/// whatever is already committed there, so a planning run composes with
/// prior placements in the store. Already-placed items are skipped
/// (idempotence, spec §4.4's last paragraph) — filtering them out is the
/// caller's responsibility, matching the store's usage in practice.
pub fn plan(
    items: &[Item],
    containers: &[Container],
    packers: &mut HashMap<String, Packer>,
) -> PlanResult {
    let mut ordered: Vec<&Item> = items.iter().filter(|item| !item.is_placed()).collect();
    // (priority descending, volume ascending) — spec §4.4.
    ordered.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| a.volume().partial_cmp(&b.volume()).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut result = PlanResult::default();
    for item in ordered {
        match place_one(item, containers, packers) {
            Some(placed) => result.placements.push(placed),
            None => result.unplaced.push(item.id.clone()),
        }
    }
    result
}

/// Builds the container preference list for one item: zone match first (in
/// input order), then every other container (in input order).
fn preference_order<'a>(item: &Item, containers: &'a [Container]) -> Vec<&'a Container> {
    let mut preferred = Vec::new();
    let mut rest = Vec::new();
    for container in containers {
        if container.zone == item.preferred_zone {
            preferred.push(container);
        } else {
            rest.push(container);
        }
    }
    preferred.extend(rest);
    preferred
}

fn place_one(
    item: &Item,
    containers: &[Container],
    packers: &mut HashMap<String, Packer>,
) -> Option<PlannedPlacement> {
    for container in preference_order(item, containers) {
        let packer = packers
            .entry(container.id.clone())
            .or_insert_with(|| Packer::new(container.dims_as_vec3()));
        if let Some(placement) = packer.insert(item.dims, item.priority) {
            return Some(PlannedPlacement {
                item_id: item.id.clone(),
                container_id: container.id.clone(),
                location: ItemLocation {
                    container_id: container.id.clone(),
                    placement,
                },
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container(id: &str, zone: &str, dims: (f64, f64, f64)) -> Container {
        Container::new(id.into(), zone.into(), dims).unwrap()
    }

    fn item(id: &str, priority: i32, dims: (f64, f64, f64), zone: &str) -> Item {
        Item::new(id.into(), id.into(), dims, 1.0, priority, None, None, zone.into()).unwrap()
    }

    #[test]
    fn test_single_perfect_fit() {
        let containers = vec![container("C1", "A", (100.0, 100.0, 100.0))];
        let items = vec![item("I1", 50, (50.0, 50.0, 50.0), "A")];
        let mut packers = HashMap::new();

        let result = plan(&items, &containers, &mut packers);
        assert_eq!(result.placements.len(), 1);
        assert!(result.unplaced.is_empty());
        assert_eq!(result.placements[0].location.placement.start, (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_priority_wins_depth_across_batch() {
        let containers = vec![container("C1", "A", (100.0, 100.0, 100.0))];
        let items = vec![
            item("LOW", 10, (40.0, 40.0, 40.0), "A"),
            item("HIGH", 90, (40.0, 40.0, 40.0), "A"),
        ];
        let mut packers = HashMap::new();

        let result = plan(&items, &containers, &mut packers);
        let high = result.placements.iter().find(|p| p.item_id == "HIGH").unwrap();
        let low = result.placements.iter().find(|p| p.item_id == "LOW").unwrap();
        assert!(high.location.placement.start.1 <= low.location.placement.start.1);
    }

    #[test]
    fn test_zone_preference_before_fallback() {
        let containers = vec![
            container("C_OTHER", "B", (100.0, 100.0, 100.0)),
            container("C_MATCH", "A", (100.0, 100.0, 100.0)),
        ];
        let items = vec![item("I1", 50, (10.0, 10.0, 10.0), "A")];
        let mut packers = HashMap::new();

        let result = plan(&items, &containers, &mut packers);
        assert_eq!(result.placements[0].container_id, "C_MATCH");
    }

    #[test]
    fn test_no_fit_reports_unplaced() {
        let containers = vec![container("C1", "A", (5.0, 5.0, 5.0))];
        let items = vec![item("I1", 50, (50.0, 50.0, 50.0), "A")];
        let mut packers = HashMap::new();

        let result = plan(&items, &containers, &mut packers);
        assert!(result.placements.is_empty());
        assert_eq!(result.unplaced, vec!["I1".to_string()]);
    }

    #[test]
    fn test_already_placed_items_are_skipped() {
        let containers = vec![container("C1", "A", (100.0, 100.0, 100.0))];
        let mut placed_item = item("I1", 50, (10.0, 10.0, 10.0), "A");
        placed_item.location = Some(ItemLocation {
            container_id: "C1".into(),
            placement: crate::model::Placement::from_start_and_extents(
                crate::types::Vec3::zero(),
                crate::types::Vec3::new(10.0, 10.0, 10.0),
            ),
        });
        let items = vec![placed_item];
        let mut packers = HashMap::new();

        let result = plan(&items, &containers, &mut packers);
        assert!(result.placements.is_empty());
        assert!(result.unplaced.is_empty());
    }
}

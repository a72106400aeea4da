//! Lifecycle tracker: expiry, usage depletion, waste transitions, and
//! weight-bounded return planning (spec §4.6). The only core component
//! that writes the waste flag.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::model::{Item, Placement, WasteReason};
use crate::obstruction::{self, Occupant, RetrievalStep};

/// One entry in a day's usage list: resolved by item id first, then by
/// first match on name (spec §4.6 "Usage application").
#[derive(Clone, Debug)]
pub struct UsageEvent {
    pub item_id: Option<String>,
    pub item_name: Option<String>,
}

/// Summary of one lifecycle pass over a day boundary.
#[derive(Clone, Debug, Default)]
pub struct DailySummary {
    pub used: Vec<String>,
    pub expired: Vec<String>,
    pub depleted: Vec<String>,
}

/// Applies the day's usage events, then expiry and depletion checks, to
/// `items` in place. Order matches spec §4.6: usage application first (it
/// may itself cause depletion), then the standing expiry/depletion sweep
/// over every non-waste item.
pub fn advance_day(items: &mut [Item], today: NaiveDate, usage: &[UsageEvent]) -> DailySummary {
    let mut summary = DailySummary::default();

    for event in usage {
        if let Some(index) = resolve_index(items, event) {
            let was_waste = items[index].waste;
            items[index].apply_usage();
            summary.used.push(items[index].id.clone());
            if !was_waste && items[index].waste {
                summary.depleted.push(items[index].id.clone());
            }
        }
    }

    for item in items.iter_mut() {
        let was_waste = item.waste;
        item.apply_expiry(today);
        if !was_waste && item.waste {
            summary.expired.push(item.id.clone());
        }
    }

    for item in items.iter_mut() {
        let was_waste = item.waste;
        item.apply_depletion();
        if !was_waste && item.waste && !summary.depleted.contains(&item.id) {
            summary.depleted.push(item.id.clone());
        }
    }

    summary
}

/// Resolution order: itemId first; if the event carries no itemId at all,
/// fall back to the first non-waste item matching by name (spec §4.6 /
/// spec.md:102). An itemId that fails to match resolves to nothing — it
/// does not fall through to a name lookup.
fn resolve_index(items: &[Item], event: &UsageEvent) -> Option<usize> {
    if let Some(id) = &event.item_id {
        return items.iter().position(|item| &item.id == id && !item.waste);
    }
    if let Some(name) = &event.item_name {
        return items.iter().position(|item| &item.name == name && !item.waste);
    }
    None
}

/// One item included in a return manifest.
#[derive(Clone, Debug, PartialEq)]
pub struct ReturnedItem {
    pub item_id: String,
    pub mass: f64,
    pub waste_reason: Option<WasteReason>,
}

/// A move of an item from its current container to the undocking container.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveStep {
    pub item_id: String,
    pub from_container: String,
    pub to_container: String,
    pub order: usize,
}

/// The manifest plus the retrieval steps needed to actually pull each
/// included item out of its current container.
#[derive(Clone, Debug, Default)]
pub struct ReturnPlan {
    pub undocking_container_id: String,
    pub date: NaiveDate,
    pub included: Vec<ReturnedItem>,
    pub total_volume: f64,
    pub total_mass: f64,
    pub move_steps: Vec<MoveStep>,
    pub retrieval_steps: Vec<(String, Vec<RetrievalStep>)>,
}

impl ReturnPlan {
    fn empty(undocking_container_id: String, date: NaiveDate) -> Self {
        Self {
            undocking_container_id,
            date,
            ..Default::default()
        }
    }
}

/// Builds a weight-bounded return plan (spec §4.6 "Return planning").
/// First-fit-decreasing by mass, skipping (not stopping at) items that
/// would overflow `max_weight` — a later, smaller item may still fit.
pub fn plan_return(items: &[Item], undocking_container_id: &str, date: NaiveDate, max_weight: f64) -> ReturnPlan {
    let mut waste: Vec<&Item> = items.iter().filter(|item| item.waste).collect();
    waste.sort_by(|a, b| b.mass.partial_cmp(&a.mass).unwrap_or(std::cmp::Ordering::Equal));

    let mut plan = ReturnPlan::empty(undocking_container_id.to_string(), date);
    let mut running_mass = 0.0;
    let mut order = 0usize;

    for item in waste {
        if running_mass + item.mass > max_weight {
            continue;
        }
        running_mass += item.mass;
        plan.total_volume += item.volume();
        plan.included.push(ReturnedItem {
            item_id: item.id.clone(),
            mass: item.mass,
            waste_reason: item.waste_reason,
        });

        if let Some(location) = &item.location {
            order += 1;
            plan.move_steps.push(MoveStep {
                item_id: item.id.clone(),
                from_container: location.container_id.clone(),
                to_container: undocking_container_id.to_string(),
                order,
            });
            plan.retrieval_steps.push((
                item.id.clone(),
                retrieval_steps_for(item, &location.placement, items),
            ));
        }
    }

    plan.total_mass = running_mass;
    plan
}

fn retrieval_steps_for(target: &Item, target_placement: &Placement, items: &[Item]) -> Vec<RetrievalStep> {
    let container_id = match &target.location {
        Some(location) => &location.container_id,
        None => return Vec::new(),
    };

    let occupant_items: Vec<&Item> = items
        .iter()
        .filter(|other| {
            other.id != target.id
                && other
                    .location
                    .as_ref()
                    .is_some_and(|loc| &loc.container_id == container_id)
        })
        .collect();

    let occupants: Vec<Occupant> = occupant_items
        .iter()
        .map(|other| Occupant {
            item_id: other.id.as_str(),
            placement: &other.location.as_ref().unwrap().placement,
        })
        .collect();

    obstruction::find_obstructions(target_placement, &occupants)
}

/// Permanently removes every waste item (spec §4.6 "Undocking commit").
/// The only operation that deletes items; returns the count removed.
pub fn commit_undocking(items: &mut Vec<Item>) -> usize {
    let before = items.len();
    items.retain(|item| !item.waste);
    before - items.len()
}

/// Groups items by container id, for callers that need a snapshot of
/// occupancy per container (e.g. the HTTP layer assembling a search
/// response's retrieval steps).
pub fn items_by_container(items: &[Item]) -> HashMap<String, Vec<&Item>> {
    let mut grouped: HashMap<String, Vec<&Item>> = HashMap::new();
    for item in items {
        if let Some(location) = &item.location {
            grouped.entry(location.container_id.clone()).or_default().push(item);
        }
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ItemLocation;
    use crate::types::Vec3;

    fn item_with_mass(id: &str, mass: f64) -> Item {
        let mut item = Item::new(id.into(), id.into(), (1.0, 1.0, 1.0), mass, 50, None, None, "A".into()).unwrap();
        item.mark_waste(WasteReason::Expired);
        item
    }

    #[test]
    fn test_expiry_triggers_waste() {
        let mut items = vec![Item::new(
            "I1".into(),
            "Widget".into(),
            (1.0, 1.0, 1.0),
            1.0,
            50,
            Some(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()),
            None,
            "A".into(),
        )
        .unwrap()];

        let summary = advance_day(&mut items, NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(), &[]);
        assert!(items[0].waste);
        assert_eq!(items[0].waste_reason, Some(WasteReason::Expired));
        assert_eq!(summary.expired, vec!["I1".to_string()]);
    }

    #[test]
    fn test_usage_event_resolves_by_id_before_name() {
        let mut items = vec![
            Item::new("I1".into(), "Widget".into(), (1.0, 1.0, 1.0), 1.0, 50, None, Some(1), "A".into()).unwrap(),
            Item::new("I2".into(), "Widget".into(), (1.0, 1.0, 1.0), 1.0, 50, None, Some(1), "A".into()).unwrap(),
        ];
        let usage = vec![UsageEvent {
            item_id: Some("I2".into()),
            item_name: Some("Widget".into()),
        }];

        advance_day(&mut items, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(), &usage);
        assert_eq!(items[0].remaining_uses, Some(1));
        assert_eq!(items[1].remaining_uses, Some(0));
    }

    #[test]
    fn test_usage_event_with_unmatched_id_does_not_fall_back_to_name() {
        let mut items =
            vec![Item::new("I1".into(), "Widget".into(), (1.0, 1.0, 1.0), 1.0, 50, None, Some(1), "A".into())
                .unwrap()];
        let usage = vec![UsageEvent {
            item_id: Some("does-not-exist".into()),
            item_name: Some("Widget".into()),
        }];

        advance_day(&mut items, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(), &usage);
        assert_eq!(items[0].remaining_uses, Some(1));
    }

    #[test]
    fn test_return_knapsack_heaviest_first_skip_not_stop() {
        let items = vec![
            item_with_mass("A", 30.0),
            item_with_mass("B", 20.0),
            item_with_mass("C", 15.0),
            item_with_mass("D", 5.0),
        ];

        let plan = plan_return(&items, "UNDOCK", NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(), 40.0);
        let ids: Vec<&str> = plan.included.iter().map(|r| r.item_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "D"]);
        assert!((plan.total_mass - 35.0).abs() < 1e-9);
    }

    #[test]
    fn test_return_plan_emits_move_and_retrieval_steps_for_placed_items() {
        let mut item = item_with_mass("A", 10.0);
        item.location = Some(ItemLocation {
            container_id: "C1".into(),
            placement: Placement::from_start_and_extents(Vec3::zero(), Vec3::new(10.0, 10.0, 10.0)),
        });
        let items = vec![item];

        let plan = plan_return(&items, "UNDOCK", NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(), 100.0);
        assert_eq!(plan.move_steps.len(), 1);
        assert_eq!(plan.move_steps[0].to_container, "UNDOCK");
        assert_eq!(plan.retrieval_steps.len(), 1);
    }

    #[test]
    fn test_commit_undocking_removes_only_waste_and_returns_count() {
        let mut items = vec![
            item_with_mass("A", 1.0),
            Item::new("B".into(), "Keep".into(), (1.0, 1.0, 1.0), 1.0, 50, None, None, "A".into()).unwrap(),
        ];
        let removed = commit_undocking(&mut items);
        assert_eq!(removed, 1);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "B");
    }
}

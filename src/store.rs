//! In-memory store of containers, items, and the audit log (spec §5, §6).
//!
//! The store itself performs no I/O; the HTTP layer is responsible for
//! wrapping it in `Arc<Mutex<Store>>` and round-tripping to persistence
//! around each call (spec §5).

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};

use crate::audit::{ActionType, AuditFilter, AuditLog};
use crate::error::CoreError;
use crate::geometry;
use crate::lifecycle::{self, ReturnPlan, UsageEvent};
use crate::model::{Container, Item, ItemLocation, Placement};
use crate::obstruction::{self, Occupant, RetrievalStep};
use crate::packer::Packer;
use crate::planner::{self, PlanResult};
use crate::simulate::{self, Advance, SimulationResult};
use crate::types::axis_epsilon;

/// Result of a search: the item's current location, if any, and the
/// retrieval steps needed to pull it out (spec §6 "search").
#[derive(Clone, Debug)]
pub struct SearchResult {
    pub item: Item,
    pub retrieval_steps: Vec<RetrievalStep>,
}

/// Store holding every container and item, plus the append-only log and
/// the simulated day. Mutating operations are expected to be serialized by
/// a collaborator-level mutex (spec §5); the store assumes exclusive
/// access for the duration of each call.
pub struct Store {
    containers: HashMap<String, Container>,
    items: HashMap<String, Item>,
    audit_log: AuditLog,
    today: NaiveDate,
}

impl Store {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            containers: HashMap::new(),
            items: HashMap::new(),
            audit_log: AuditLog::new(),
            today,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn containers(&self) -> impl Iterator<Item = &Container> {
        self.containers.values()
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn add_container(&mut self, container: Container) {
        self.containers.insert(container.id.clone(), container);
    }

    pub fn add_item(&mut self, item: Item) {
        self.items.insert(item.id.clone(), item);
    }

    /// Imports a CSV-parsed batch of items, logging one audit entry for the
    /// whole call (spec §5/§4.9: CSV import is a writer of "containers,
    /// items, and logs").
    pub fn import_items(&mut self, items: Vec<Item>, now: DateTime<Utc>) {
        let count = items.len();
        for item in items {
            self.add_item(item);
        }
        self.audit_log.append(
            now,
            Some("system".to_string()),
            ActionType::Import,
            None,
            format!("imported {} item(s)", count),
        );
    }

    /// Imports a CSV-parsed batch of containers, logging one audit entry
    /// for the whole call.
    pub fn import_containers(&mut self, containers: Vec<Container>, now: DateTime<Utc>) {
        let count = containers.len();
        for container in containers {
            self.add_container(container);
        }
        self.audit_log.append(
            now,
            Some("system".to_string()),
            ActionType::Import,
            None,
            format!("imported {} container(s)", count),
        );
    }

    pub fn audit_log(&self) -> &AuditLog {
        &self.audit_log
    }

    pub fn query_audit_log(&self, filter: &AuditFilter, limit: usize) -> Vec<crate::audit::AuditEntry> {
        self.audit_log.query(filter, limit)
    }

    /// Plans placements for every unplaced item against every container
    /// (spec §6 "plan placement"). Writer: builds one [`Packer`] per
    /// container, seeded with what is already committed there, so the run
    /// composes with prior placements.
    pub fn plan_placement(&mut self, now: DateTime<Utc>) -> PlanResult {
        let containers: Vec<Container> = self.containers.values().cloned().collect();
        let items: Vec<Item> = self.items.values().cloned().collect();

        let mut packers: HashMap<String, Packer> = HashMap::new();
        for container in &containers {
            let committed: Vec<Placement> = items
                .iter()
                .filter_map(|item| {
                    item.location
                        .as_ref()
                        .filter(|loc| loc.container_id == container.id)
                        .map(|loc| loc.placement)
                })
                .collect();
            packers.insert(container.id.clone(), Packer::with_existing(container.dims_as_vec3(), committed));
        }

        let result = planner::plan(&items, &containers, &mut packers);
        for placement in &result.placements {
            if let Some(item) = self.items.get_mut(&placement.item_id) {
                item.location = Some(placement.location.clone());
            }
            self.audit_log.append(
                now,
                Some("system".to_string()),
                ActionType::Placement,
                Some(placement.item_id.clone()),
                format!("placed in {}", placement.container_id),
            );
        }
        result
    }

    /// Locates an item by id or name and computes its retrieval steps
    /// (spec §6 "search").
    pub fn search(&self, item_id: Option<&str>, item_name: Option<&str>) -> Result<SearchResult, CoreError> {
        let item = self
            .find_item(item_id, item_name)
            .ok_or_else(|| CoreError::not_found("item not found"))?;

        let retrieval_steps = match &item.location {
            Some(location) => {
                let occupant_items: Vec<&Item> = self
                    .items
                    .values()
                    .filter(|other| {
                        other.id != item.id
                            && other
                                .location
                                .as_ref()
                                .is_some_and(|loc| loc.container_id == location.container_id)
                    })
                    .collect();
                let occupants: Vec<Occupant> = occupant_items
                    .iter()
                    .map(|other| Occupant {
                        item_id: other.id.as_str(),
                        placement: &other.location.as_ref().unwrap().placement,
                    })
                    .collect();
                obstruction::find_obstructions(&location.placement, &occupants)
            }
            None => Vec::new(),
        };

        Ok(SearchResult { item: item.clone(), retrieval_steps })
    }

    fn find_item(&self, item_id: Option<&str>, item_name: Option<&str>) -> Option<&Item> {
        if let Some(id) = item_id {
            return self.items.get(id);
        }
        let name = item_name?;
        self.items.values().find(|item| item.name == name)
    }

    /// Trusted manual placement (spec §6 "manual place"): rejected
    /// atomically on containment or overlap violation; the store is left
    /// unchanged.
    pub fn manual_place(
        &mut self,
        item_id: &str,
        container_id: &str,
        start: (f64, f64, f64),
        end: (f64, f64, f64),
        now: DateTime<Utc>,
    ) -> Result<(), CoreError> {
        let container = self
            .containers
            .get(container_id)
            .ok_or_else(|| CoreError::not_found("container not found"))?;
        if !self.items.contains_key(item_id) {
            return Err(CoreError::not_found("item not found"));
        }

        let start_vec = crate::types::Vec3::from_tuple(start);
        let end_vec = crate::types::Vec3::from_tuple(end);
        if end_vec.w <= start_vec.w || end_vec.d <= start_vec.d || end_vec.h <= start_vec.h {
            return Err(CoreError::input_invalid("end corner must exceed start corner on every axis"));
        }

        let candidate = Placement::new(start_vec, end_vec);
        let container_extents = container.dims_as_vec3();
        let tolerance = axis_epsilon(container_extents.w)
            .min(axis_epsilon(container_extents.d))
            .min(axis_epsilon(container_extents.h));

        if !candidate.bounding_box().contained_in(
            &crate::types::BoundingBox::from_position_and_dims(crate::types::Vec3::zero(), container_extents),
            tolerance,
        ) {
            return Err(CoreError::conflict("placement is not contained in the container"));
        }

        let overlaps = self.items.values().any(|other| {
            other.id != item_id
                && other
                    .location
                    .as_ref()
                    .is_some_and(|loc| loc.container_id == container_id && geometry::intersects(&loc.placement, &candidate))
        });
        if overlaps {
            return Err(CoreError::conflict("placement overlaps an existing item"));
        }

        let item = self.items.get_mut(item_id).expect("checked above");
        item.location = Some(ItemLocation { container_id: container_id.to_string(), placement: candidate });

        self.audit_log.append(
            now,
            Some("system".to_string()),
            ActionType::ManualPlace,
            Some(item_id.to_string()),
            format!("manually placed in {}", container_id),
        );
        Ok(())
    }

    /// Records a retrieval (spec §6 "retrieve"): decrements the item's
    /// remaining uses, marking it waste if that depletes it, and logs the
    /// caller-supplied user.
    pub fn retrieve_item(&mut self, item_id: &str, user_id: &str, now: DateTime<Utc>) -> Result<(), CoreError> {
        let item = self.items.get_mut(item_id).ok_or_else(|| CoreError::not_found("item not found"))?;
        item.apply_usage();

        self.audit_log.append(
            now,
            Some(user_id.to_string()),
            ActionType::Retrieval,
            Some(item_id.to_string()),
            "retrieved",
        );
        Ok(())
    }

    /// Lists items currently flagged as waste (spec §6 "identify waste").
    pub fn identify_waste(&self) -> Vec<&Item> {
        self.items.values().filter(|item| item.waste).collect()
    }

    /// Builds a weight-bounded return plan (spec §6 "plan return").
    pub fn plan_return(&self, undocking_container_id: &str, date: NaiveDate, max_weight: f64) -> ReturnPlan {
        let items: Vec<Item> = self.items.values().cloned().collect();
        lifecycle::plan_return(&items, undocking_container_id, date, max_weight)
    }

    /// Permanently removes every waste item (spec §6 "commit undocking").
    pub fn commit_undocking(&mut self, now: DateTime<Utc>) -> usize {
        let mut items: Vec<Item> = self.items.drain().map(|(_, item)| item).collect();
        let removed_ids: Vec<String> = items.iter().filter(|item| item.waste).map(|item| item.id.clone()).collect();
        let removed = lifecycle::commit_undocking(&mut items);
        for item in items {
            self.items.insert(item.id.clone(), item);
        }
        for item_id in removed_ids {
            self.audit_log.append(
                now,
                Some("system".to_string()),
                ActionType::Undocking,
                Some(item_id),
                "removed on undocking",
            );
        }
        removed
    }

    /// Advances the simulated clock (spec §6 "simulate").
    pub fn simulate(&mut self, advance_by: Advance, usage: &[UsageEvent], now: DateTime<Utc>) -> SimulationResult {
        let mut items: Vec<Item> = self.items.drain().map(|(_, item)| item).collect();
        let result = simulate::advance(self.today, advance_by, &mut items, usage);
        for item in items {
            self.items.insert(item.id.clone(), item);
        }
        self.today = result.new_date;
        self.audit_log.append(
            now,
            Some("system".to_string()),
            ActionType::Simulate,
            None,
            format!("advanced to {}", result.new_date),
        );
        result
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    fn sample_store() -> Store {
        let mut store = Store::new(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        store.add_container(Container::new("C1".into(), "A".into(), (100.0, 100.0, 100.0)).unwrap());
        store.add_item(Item::new("I1".into(), "Widget".into(), (50.0, 50.0, 50.0), 5.0, 50, None, None, "A".into()).unwrap());
        store
    }

    #[test]
    fn test_plan_placement_places_item_and_logs() {
        let mut store = sample_store();
        let result = store.plan_placement(now());
        assert_eq!(result.placements.len(), 1);
        assert!(store.items.get("I1").unwrap().is_placed());
        assert_eq!(store.audit_log.len(), 1);
    }

    #[test]
    fn test_search_after_placement_returns_item_with_location() {
        let mut store = sample_store();
        store.plan_placement(now());
        let result = store.search(Some("I1"), None).unwrap();
        assert!(result.item.is_placed());
    }

    #[test]
    fn test_manual_place_rejects_overlap() {
        let mut store = sample_store();
        store.add_item(
            Item::new("I2".into(), "Gadget".into(), (10.0, 10.0, 10.0), 1.0, 50, None, None, "A".into()).unwrap(),
        );
        store
            .manual_place("I1", "C1", (0.0, 0.0, 0.0), (50.0, 50.0, 50.0), now())
            .unwrap();
        let err = store.manual_place("I2", "C1", (10.0, 10.0, 10.0), (20.0, 20.0, 20.0), now());
        assert!(err.is_err());
    }

    #[test]
    fn test_retrieve_item_decrements_uses_and_logs() {
        let mut store = sample_store();
        store.items.get_mut("I1").unwrap().remaining_uses = Some(1);
        store.retrieve_item("I1", "astro1", now()).unwrap();
        assert_eq!(store.items.get("I1").unwrap().remaining_uses, Some(0));
        assert!(store.items.get("I1").unwrap().waste);
        assert_eq!(store.audit_log.len(), 1);
    }

    #[test]
    fn test_commit_undocking_removes_waste_items() {
        let mut store = sample_store();
        store.items.get_mut("I1").unwrap().mark_waste(crate::model::WasteReason::Expired);
        let removed = store.commit_undocking(now());
        assert_eq!(removed, 1);
        assert!(store.items.get("I1").is_none());
    }

    #[test]
    fn test_import_items_adds_items_and_logs_once() {
        let mut store = Store::new(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        let items = vec![
            Item::new("I1".into(), "Widget".into(), (1.0, 1.0, 1.0), 1.0, 50, None, None, "A".into()).unwrap(),
            Item::new("I2".into(), "Gadget".into(), (1.0, 1.0, 1.0), 1.0, 50, None, None, "A".into()).unwrap(),
        ];
        store.import_items(items, now());
        assert_eq!(store.items.len(), 2);
        assert_eq!(store.audit_log.len(), 1);
    }

    #[test]
    fn test_import_containers_adds_containers_and_logs_once() {
        let mut store = Store::new(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        let containers = vec![Container::new("C1".into(), "A".into(), (10.0, 10.0, 10.0)).unwrap()];
        store.import_containers(containers, now());
        assert_eq!(store.containers.len(), 1);
        assert_eq!(store.audit_log.len(), 1);
    }
}

//! Availability index
//!
//! Derived free/busy view over one snapshot of missions. Bookings come from
//! every Planning or Active mission that names a pilot or drone; Completed
//! missions release their resources.

use serde::{Deserialize, Serialize};
use sortie_domain::{locations_match, DateRange, Mission, Resource, ResourceKind};
use std::collections::BTreeMap;

/// One mission holding a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Mission holding the resource
    pub mission_id: String,

    /// Days the resource is held
    pub range: DateRange,
}

/// Why a resource cannot take a query range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Blocker {
    /// Status, window or maintenance rule on the record itself
    NotReady(String),
    /// Already booked on an overlapping mission
    Booked(Booking),
    /// Based somewhere else
    Elsewhere {
        /// Where the resource currently is
        location: String,
    },
}

/// Per-resource booking intervals for one snapshot
#[derive(Debug, Clone, Default)]
pub struct AvailabilityIndex {
    bookings: BTreeMap<(ResourceKind, String), Vec<Booking>>,
}

impl AvailabilityIndex {
    /// Index every active mission assignment
    pub fn build(missions: &[Mission]) -> Self {
        Self::build_filtered(missions, |_| true)
    }

    /// Index every active mission assignment except `mission_id`'s own,
    /// for re-staffing that mission.
    pub fn excluding(missions: &[Mission], mission_id: &str) -> Self {
        Self::build_filtered(missions, |m| m.id != mission_id)
    }

    fn build_filtered(missions: &[Mission], keep: impl Fn(&Mission) -> bool) -> Self {
        let mut bookings: BTreeMap<(ResourceKind, String), Vec<Booking>> = BTreeMap::new();

        for mission in missions.iter().filter(|m| m.is_active() && keep(m)) {
            for kind in [ResourceKind::Pilot, ResourceKind::Drone] {
                if let Some(resource_id) = mission.assigned(kind) {
                    bookings
                        .entry((kind, resource_id.to_string()))
                        .or_default()
                        .push(Booking {
                            mission_id: mission.id.clone(),
                            range: mission.schedule,
                        });
                }
            }
        }

        for list in bookings.values_mut() {
            list.sort_by(|a, b| {
                a.range
                    .start
                    .cmp(&b.range.start)
                    .then_with(|| a.mission_id.cmp(&b.mission_id))
            });
        }

        Self { bookings }
    }

    /// All bookings held by a resource, earliest first
    pub fn bookings(&self, kind: ResourceKind, resource_id: &str) -> &[Booking] {
        self.bookings
            .get(&(kind, resource_id.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Bookings of a resource that overlap `range`
    pub fn clashes<'a>(
        &'a self,
        kind: ResourceKind,
        resource_id: &str,
        range: &'a DateRange,
    ) -> impl Iterator<Item = &'a Booking> + 'a {
        self.bookings(kind, resource_id)
            .iter()
            .filter(move |b| b.range.overlaps(range))
    }

    /// Every reason `resource` cannot work `range` at `location`. Empty
    /// means the resource is free.
    pub fn blockers<R: Resource + ?Sized>(
        &self,
        resource: &R,
        range: &DateRange,
        location: &str,
    ) -> Vec<Blocker> {
        let mut blockers = Vec::new();

        if let Some(reason) = resource.unavailability(range) {
            blockers.push(Blocker::NotReady(reason));
        }

        blockers.extend(
            self.clashes(resource.kind(), resource.resource_id(), range)
                .cloned()
                .map(Blocker::Booked),
        );

        if !locations_match(resource.location(), location) {
            blockers.push(Blocker::Elsewhere {
                location: resource.location().to_string(),
            });
        }

        blockers
    }

    /// Check if `resource` is free for `range` at `location`
    pub fn is_available<R: Resource + ?Sized>(
        &self,
        resource: &R,
        range: &DateRange,
        location: &str,
    ) -> bool {
        resource.is_ready_for(range)
            && self
                .clashes(resource.kind(), resource.resource_id(), range)
                .next()
                .is_none()
            && locations_match(resource.location(), location)
    }

    /// Number of resources holding at least one booking
    pub fn booked_count(&self) -> usize {
        self.bookings.len()
    }
}

/// One-shot availability query against a set of missions.
///
/// Completed missions in `active_missions` are ignored, so callers may pass
/// the full mission list.
pub fn is_entity_available<R: Resource + ?Sized>(
    entity: &R,
    range: &DateRange,
    location: &str,
    active_missions: &[Mission],
) -> bool {
    AvailabilityIndex::build(active_missions).is_available(entity, range, location)
}

//! Weekly service calendar.
//!
//! Each service id runs on a fixed set of weekdays. Resolving a weekday to
//! its trips goes weekday -> active service ids -> trips of those services.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{ServiceId, Trip, TripId};

use super::error::TimetableError;

/// Seven-bit weekday set. Bit 0 is Monday, bit 6 is Sunday.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct WeekdayMask(u8);

/// Error for masks with bits above Sunday set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("weekday mask {0:#04x} has bits outside Monday..Sunday")]
pub struct InvalidWeekdayMask(u8);

impl WeekdayMask {
    pub const EMPTY: WeekdayMask = WeekdayMask(0);
    pub const WEEKDAYS: WeekdayMask = WeekdayMask(0b001_1111);
    pub const EVERY_DAY: WeekdayMask = WeekdayMask(0b111_1111);

    /// Build a mask from raw bits.
    pub fn from_bits(bits: u8) -> Result<Self, InvalidWeekdayMask> {
        if bits & !Self::EVERY_DAY.0 != 0 {
            return Err(InvalidWeekdayMask(bits));
        }
        Ok(Self(bits))
    }

    /// Build a mask from a list of days.
    pub fn from_days(days: &[Weekday]) -> Self {
        days.iter().fold(Self::EMPTY, |mask, day| mask.with(*day))
    }

    /// Returns a copy with `day` set.
    pub fn with(self, day: Weekday) -> Self {
        Self(self.0 | bit(day))
    }

    /// True if the service runs on `day`.
    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & bit(day) != 0
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

fn bit(day: Weekday) -> u8 {
    1 << day.num_days_from_monday()
}

impl TryFrom<u8> for WeekdayMask {
    type Error = InvalidWeekdayMask;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        Self::from_bits(bits)
    }
}

impl From<WeekdayMask> for u8 {
    fn from(mask: WeekdayMask) -> u8 {
        mask.0
    }
}

impl fmt::Debug for WeekdayMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WeekdayMask({:07b})", self.0)
    }
}

/// One row of the calendar table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub service_id: ServiceId,
    pub days: WeekdayMask,
}

impl CalendarEntry {
    pub fn new(service_id: impl Into<ServiceId>, days: WeekdayMask) -> Self {
        Self {
            service_id: service_id.into(),
            days,
        }
    }
}

/// Weekday -> service -> trip resolution.
#[derive(Debug, Clone, Default)]
pub struct ServiceCalendar {
    /// Activity mask per service id.
    services: BTreeMap<ServiceId, WeekdayMask>,

    /// Trip ids grouped by their service id.
    trips_by_service: BTreeMap<ServiceId, Vec<TripId>>,
}

impl ServiceCalendar {
    /// Index calendar entries and the trips that reference them.
    ///
    /// Repeated service ids are merged. Trips whose service id has no
    /// calendar entry are kept but never run.
    pub fn new(entries: Vec<CalendarEntry>, trips: &[Trip]) -> Self {
        let mut services: BTreeMap<ServiceId, WeekdayMask> = BTreeMap::new();
        for entry in entries {
            let mask = services.entry(entry.service_id.clone()).or_default();
            if !mask.is_empty() {
                warn!(service = %entry.service_id, "duplicate calendar entry, merging days");
            }
            *mask = WeekdayMask(mask.0 | entry.days.0);
        }

        let mut trips_by_service: BTreeMap<ServiceId, Vec<TripId>> = BTreeMap::new();
        for trip in trips {
            if !services.contains_key(&trip.service_id) {
                warn!(
                    trip = %trip.id,
                    service = %trip.service_id,
                    "trip references a service with no calendar entry"
                );
            }
            trips_by_service
                .entry(trip.service_id.clone())
                .or_default()
                .push(trip.id.clone());
        }

        Self {
            services,
            trips_by_service,
        }
    }

    /// Service ids whose mask includes `weekday`.
    pub fn active_service_ids(&self, weekday: Weekday) -> BTreeSet<ServiceId> {
        self.services
            .iter()
            .filter(|(_, mask)| mask.contains(weekday))
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Trips belonging to a service active on `weekday`.
    ///
    /// Fails with `NoService` if nothing runs that day.
    pub fn active_trip_ids(&self, weekday: Weekday) -> Result<BTreeSet<TripId>, TimetableError> {
        let trips: BTreeSet<TripId> = self
            .active_service_ids(weekday)
            .iter()
            .filter_map(|service| self.trips_by_service.get(service))
            .flatten()
            .cloned()
            .collect();

        if trips.is_empty() {
            return Err(TimetableError::NoService { weekday });
        }
        Ok(trips)
    }
}

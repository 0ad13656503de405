//! Drill-down state machine
//!
//! The controller holds the province-level region index built from the root
//! boundary document, the currently displayed level and at most one pending
//! drill target. It never performs IO: events go in, a [`Transition`] with
//! the intents for the host comes out.
//!
//! A drill into a province is only committed once its boundary data is
//! there. Until then the state stays `AtCountry` and the province is
//! recorded as pending; a resolution for anything other than the pending
//! target is discarded as stale.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::algorithm::{Aggregator, AssignmentReport, RegionIndex};
use crate::drilldown::interaction::InteractionMode;
use crate::drilldown::state::{
    DrilldownEvent, DrilldownState, Intent, LevelView, ModalContent, Transition,
};
use crate::error::{Error, FetchError, Result};
use crate::models::{BoundaryPayload, LocationField, PersonRecord, Region, RegionLevel};

/// Title shown at country level
pub const COUNTRY_TITLE: &str = "中国";

/// Series name of the province-level counts
pub const COUNTRY_SERIES: &str = "各省人数";

/// State machine for two-level drill-down navigation
#[derive(Debug)]
pub struct DrilldownController {
    mode: InteractionMode,
    provinces: RegionIndex,
    country_report: AssignmentReport,
    state: DrilldownState,
    pending: Option<String>,
    cities: Option<RegionIndex>,
    city_report: Option<AssignmentReport>,
    // City regions of every province visited this session
    visited: FxHashMap<String, Vec<Region>>,
    selected: Option<String>,
}

impl DrilldownController {
    /// Build the country level from the root boundary document
    ///
    /// # Errors
    /// Returns `Error::MissingRootData` when the document contains no regions.
    pub fn new(
        root: &BoundaryPayload,
        records: &[Arc<PersonRecord>],
        mode: InteractionMode,
    ) -> Result<Self> {
        if root.is_empty() {
            return Err(Error::MissingRootData {
                code: root.code.clone(),
                reason: "document contains no regions".to_string(),
            });
        }

        let mut provinces =
            RegionIndex::build(root.regions(RegionLevel::Province, Some(&root.code)));
        let country_report = Aggregator::assign(&mut provinces, records, LocationField::Province);

        Ok(Self {
            mode,
            provinces,
            country_report,
            state: DrilldownState::AtCountry,
            pending: None,
            cities: None,
            city_report: None,
            visited: FxHashMap::default(),
            selected: None,
        })
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> &DrilldownState {
        &self.state
    }

    /// Interaction mode selections are handled in
    #[must_use]
    pub const fn mode(&self) -> InteractionMode {
        self.mode
    }

    /// Province whose boundary data is awaited
    #[must_use]
    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// Region shown in the summary sheet
    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Province-level regions with their counts
    #[must_use]
    pub const fn provinces(&self) -> &RegionIndex {
        &self.provinces
    }

    /// City-level regions of the displayed province
    #[must_use]
    pub const fn cities(&self) -> Option<&RegionIndex> {
        self.cities.as_ref()
    }

    /// Outcome of the province-level aggregation
    #[must_use]
    pub const fn country_report(&self) -> &AssignmentReport {
        &self.country_report
    }

    /// Outcome of the city-level aggregation of the displayed province
    #[must_use]
    pub const fn city_report(&self) -> Option<&AssignmentReport> {
        self.city_report.as_ref()
    }

    /// Whether city regions of a province are already held in memory
    #[must_use]
    pub fn has_visited(&self, province_id: &str) -> bool {
        self.visited.contains_key(province_id)
    }

    /// Regions of the displayed level
    #[must_use]
    pub fn current_view(&self) -> LevelView {
        match (&self.state, &self.cities) {
            (DrilldownState::AtProvince(id), Some(cities)) => {
                let name = self
                    .provinces
                    .get(id)
                    .map_or_else(|| id.clone(), |province| province.name.clone());
                LevelView {
                    state: self.state.clone(),
                    title: name.clone(),
                    series_name: name,
                    regions: cities.regions().to_vec(),
                }
            }
            _ => LevelView {
                state: DrilldownState::AtCountry,
                title: COUNTRY_TITLE.to_string(),
                series_name: COUNTRY_SERIES.to_string(),
                regions: self.provinces.regions().to_vec(),
            },
        }
    }

    /// Apply one event
    ///
    /// # Errors
    /// Events that are not valid in the current state fail with
    /// `Error::InvalidTransition`, `Error::UnknownRegion` or
    /// `Error::NotDrillable` and leave the controller unchanged.
    pub fn handle(&mut self, event: DrilldownEvent) -> Result<Transition> {
        let name = event.name();
        let intents = match event {
            DrilldownEvent::SelectRegion { region_id } => self.select_region(&region_id)?,
            DrilldownEvent::DrillInto { province_id } => self.drill_into(&province_id, name)?,
            DrilldownEvent::DrillUp => self.drill_up(name)?,
            DrilldownEvent::DismissModal => self.dismiss_modal(),
            DrilldownEvent::DrillSelected => self.drill_selected(name)?,
            DrilldownEvent::BoundaryLoaded {
                province_id,
                payload,
            } => self.boundary_loaded(&province_id, &payload)?,
            DrilldownEvent::BoundaryFailed { province_id, error } => {
                self.boundary_failed(&province_id, &error)
            }
        };

        Ok(Transition {
            state: self.state.clone(),
            intents,
        })
    }

    fn invalid(&self, event: &'static str) -> Error {
        Error::InvalidTransition {
            event,
            state: self.state.clone(),
        }
    }

    fn displayed_region(&self, region_id: &str) -> Option<&Region> {
        match &self.state {
            DrilldownState::AtCountry => self.provinces.get(region_id),
            DrilldownState::AtProvince(_) => self.cities.as_ref()?.get(region_id),
        }
    }

    fn select_region(&mut self, region_id: &str) -> Result<Vec<Intent>> {
        let region = self
            .displayed_region(region_id)
            .ok_or_else(|| Error::UnknownRegion(region_id.to_string()))?;
        let at_country = self.state == DrilldownState::AtCountry;

        if self.mode.is_touch() {
            let content = ModalContent {
                region_id: region.id.clone(),
                name: region.name.clone(),
                series_name: self.current_series_name(),
                value: region.value,
                members: region.members.clone(),
                can_drill: at_country && region.is_drillable(),
            };
            self.selected = Some(region_id.to_string());
            return Ok(vec![Intent::ShowModal(content)]);
        }

        if at_country && region.is_drillable() {
            self.drill_into(region_id, "drill into a province")
        } else {
            Ok(Vec::new())
        }
    }

    fn current_series_name(&self) -> String {
        match self.state.province_id() {
            Some(id) => self
                .provinces
                .get(id)
                .map_or_else(|| id.to_string(), |province| province.name.clone()),
            None => COUNTRY_SERIES.to_string(),
        }
    }

    fn drill_into(&mut self, province_id: &str, event: &'static str) -> Result<Vec<Intent>> {
        if self.state != DrilldownState::AtCountry {
            return Err(self.invalid(event));
        }
        let province = self
            .provinces
            .get(province_id)
            .ok_or_else(|| Error::UnknownRegion(province_id.to_string()))?;
        let load_key = province
            .child_load_key
            .clone()
            .ok_or_else(|| Error::NotDrillable(province_id.to_string()))?;

        let mut intents = Vec::new();
        if self.selected.take().is_some() {
            intents.push(Intent::CloseModal);
        }

        if let Some(cities) = self.visited.get(province_id).cloned() {
            let mut index = RegionIndex::build(cities);
            let members = self.province_members(province_id);
            let report = Aggregator::assign(&mut index, &members, LocationField::City);
            intents.extend(self.commit(province_id, index, report));
            return Ok(intents);
        }

        if self.pending.as_deref() != Some(province_id) {
            if let Some(previous) = self.pending.replace(province_id.to_string()) {
                log::debug!("Drill into {previous} superseded by {province_id}");
            }
            intents.push(Intent::ShowLoading {
                province_id: province_id.to_string(),
            });
        }
        intents.push(Intent::FetchBoundary {
            province_id: province_id.to_string(),
            load_key,
        });
        Ok(intents)
    }

    fn province_members(&self, province_id: &str) -> Vec<Arc<PersonRecord>> {
        self.provinces
            .get(province_id)
            .map(|province| province.members.clone())
            .unwrap_or_default()
    }

    fn boundary_loaded(
        &mut self,
        province_id: &str,
        payload: &BoundaryPayload,
    ) -> Result<Vec<Intent>> {
        if self.state.province_id() == Some(province_id) {
            return Ok(Vec::new());
        }
        if self.pending.as_deref() != Some(province_id) {
            log::debug!("Discarding stale boundary data for {province_id}");
            return Ok(Vec::new());
        }

        let province = self
            .provinces
            .get(province_id)
            .ok_or_else(|| Error::UnknownRegion(province_id.to_string()))?;
        if payload.is_empty() {
            log::warn!("Boundary data for {province_id} contains no cities");
        }
        let (index, report) = Aggregator::partition(province, payload, LocationField::City);

        self.visited
            .insert(province_id.to_string(), index.regions().to_vec());
        Ok(self.commit(province_id, index, report))
    }

    fn commit(
        &mut self,
        province_id: &str,
        index: RegionIndex,
        report: AssignmentReport,
    ) -> Vec<Intent> {
        let mut intents = Vec::new();
        if self.pending.take().is_some() {
            intents.push(Intent::HideLoading);
        }

        self.cities = Some(index);
        self.city_report = Some(report);
        self.state = DrilldownState::AtProvince(province_id.to_string());
        log::info!("Drilled into {province_id}");

        intents.push(Intent::Render(self.current_view()));
        intents.push(Intent::FitToBounds);
        intents
    }

    fn boundary_failed(&mut self, province_id: &str, error: &FetchError) -> Vec<Intent> {
        if self.pending.as_deref() != Some(province_id) {
            log::debug!("Discarding stale fetch failure for {province_id}: {error}");
            return Vec::new();
        }

        log::error!("Drill into {province_id} failed: {error}");
        self.pending = None;
        vec![Intent::HideLoading]
    }

    fn drill_up(&mut self, event: &'static str) -> Result<Vec<Intent>> {
        match &self.state {
            DrilldownState::AtProvince(province_id) => {
                log::info!("Drilled up from {province_id}");
                let mut intents = Vec::new();
                if self.selected.take().is_some() {
                    intents.push(Intent::CloseModal);
                }

                self.state = DrilldownState::AtCountry;
                self.cities = None;
                self.city_report = None;

                intents.push(Intent::Render(self.current_view()));
                intents.push(Intent::FitToBounds);
                Ok(intents)
            }
            DrilldownState::AtCountry => match self.pending.take() {
                Some(province_id) => {
                    log::info!("Drill into {province_id} abandoned");
                    Ok(vec![Intent::HideLoading])
                }
                None => Err(self.invalid(event)),
            },
        }
    }

    fn dismiss_modal(&mut self) -> Vec<Intent> {
        if self.selected.take().is_some() {
            vec![Intent::CloseModal]
        } else {
            Vec::new()
        }
    }

    fn drill_selected(&mut self, event: &'static str) -> Result<Vec<Intent>> {
        let Some(region_id) = self.selected.clone() else {
            return Err(self.invalid(event));
        };
        self.drill_into(&region_id, event)
    }
}

//! Host for the drill-down state machine
//!
//! The session owns a controller, a topology cache and a view. Dispatching
//! an event runs the controller's transition, performs the requested
//! fetches through the cache and feeds their outcome back in as events.
//!
//! Everything runs on one task. Several dispatches may be in flight at
//! once (for instance two taps on the same province before its data
//! arrives); they interleave only while awaiting a fetch, and no borrow of
//! the controller or the view is held across that await.

use std::cell::{Ref, RefCell};
use std::collections::VecDeque;
use std::sync::Arc;

use crate::async_io::TopologyCache;
use crate::common::traits::MapView;
use crate::drilldown::controller::DrilldownController;
use crate::drilldown::interaction::InteractionMode;
use crate::drilldown::state::{DrilldownEvent, DrilldownState, Intent};
use crate::error::{Error, Result};
use crate::models::PersonRecord;

/// Drill-down controller wired to a topology cache and a view
pub struct DrilldownSession<V: MapView> {
    controller: RefCell<DrilldownController>,
    cache: TopologyCache,
    view: RefCell<V>,
}

impl<V: MapView> DrilldownSession<V> {
    /// Load the root boundary document, aggregate the records per province
    /// and render the country level
    ///
    /// # Errors
    /// Returns `Error::MissingRootData` when the root document cannot be
    /// fetched or contains no regions.
    pub async fn initialize(
        cache: TopologyCache,
        root_code: &str,
        records: &[Arc<PersonRecord>],
        mode: InteractionMode,
        view: V,
    ) -> Result<Self> {
        let root = cache.load(root_code).await.map_err(|e| Error::MissingRootData {
            code: e.code.clone(),
            reason: e.to_string(),
        })?;

        let controller = DrilldownController::new(&root, records, mode)?;
        let session = Self {
            controller: RefCell::new(controller),
            cache,
            view: RefCell::new(view),
        };

        let country = session.controller.borrow().current_view();
        {
            let mut view = session.view.borrow_mut();
            view.render(&country);
            view.fit_to_bounds();
        }

        Ok(session)
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> DrilldownState {
        self.controller.borrow().state().clone()
    }

    /// Read access to the controller
    ///
    /// The returned guard must not be held across an await.
    pub fn controller(&self) -> Ref<'_, DrilldownController> {
        self.controller.borrow()
    }

    /// Read access to the view
    ///
    /// The returned guard must not be held across an await.
    pub fn view(&self) -> Ref<'_, V> {
        self.view.borrow()
    }

    /// Topology cache used for drill targets
    #[must_use]
    pub const fn cache(&self) -> &TopologyCache {
        &self.cache
    }

    /// Select a region of the displayed level
    pub async fn select_region(&self, region_id: &str) -> Result<DrilldownState> {
        self.dispatch(DrilldownEvent::SelectRegion {
            region_id: region_id.to_string(),
        })
        .await
    }

    /// Drill into a province
    ///
    /// # Errors
    /// Returns `Error::Fetch` when the province's boundary data cannot be
    /// fetched; the state then stays `AtCountry`. A call whose drill was
    /// superseded by a later one still reports its own fetch failure, even
    /// though the controller ignores it and the later drill proceeds.
    pub async fn drill_into(&self, province_id: &str) -> Result<DrilldownState> {
        self.dispatch(DrilldownEvent::DrillInto {
            province_id: province_id.to_string(),
        })
        .await
    }

    /// Return to the country level
    pub async fn drill_up(&self) -> Result<DrilldownState> {
        self.dispatch(DrilldownEvent::DrillUp).await
    }

    /// Dismiss the summary sheet
    pub async fn dismiss_modal(&self) -> Result<DrilldownState> {
        self.dispatch(DrilldownEvent::DismissModal).await
    }

    /// Drill into the region shown in the summary sheet
    pub async fn drill_selected(&self) -> Result<DrilldownState> {
        self.dispatch(DrilldownEvent::DrillSelected).await
    }

    /// Run an event and every event its intents produce
    ///
    /// Returns the state once all resulting work is done. A failed fetch is
    /// returned as `Error::Fetch` after the controller has been told about
    /// it, whether or not the controller still waited for that province.
    pub async fn dispatch(&self, event: DrilldownEvent) -> Result<DrilldownState> {
        let mut queue = VecDeque::from([event]);
        let mut failure = None;

        while let Some(event) = queue.pop_front() {
            let transition = self.controller.borrow_mut().handle(event)?;

            for intent in transition.intents {
                match intent {
                    Intent::FetchBoundary {
                        province_id,
                        load_key,
                    } => {
                        let pending = self.cache.load(&load_key);
                        let next = match pending.await {
                            Ok(payload) => DrilldownEvent::BoundaryLoaded {
                                province_id,
                                payload,
                            },
                            Err(error) => {
                                failure = Some(error.clone());
                                DrilldownEvent::BoundaryFailed { province_id, error }
                            }
                        };
                        queue.push_back(next);
                    }
                    other => self.apply(other),
                }
            }
        }

        match failure {
            Some(error) => Err(Error::Fetch(error)),
            None => Ok(self.state()),
        }
    }

    fn apply(&self, intent: Intent) {
        let mut view = self.view.borrow_mut();
        match intent {
            Intent::ShowLoading { province_id } => view.show_loading(&province_id),
            Intent::HideLoading => view.hide_loading(),
            Intent::Render(level) => view.render(&level),
            Intent::FitToBounds => view.fit_to_bounds(),
            Intent::ShowModal(content) => view.show_modal(&content),
            Intent::CloseModal => view.close_modal(),
            Intent::FetchBoundary { .. } => {}
        }
    }
}

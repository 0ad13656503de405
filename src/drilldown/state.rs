//! Drill-down states, events and intents

use std::fmt;
use std::sync::Arc;

use crate::error::FetchError;
use crate::models::{BoundaryPayload, PersonRecord, Region};

/// Currently displayed hierarchy level
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum DrilldownState {
    /// Provinces of the whole country
    #[default]
    AtCountry,
    /// Cities of one province
    AtProvince(String),
}

impl DrilldownState {
    /// Province being displayed, if any
    #[must_use]
    pub fn province_id(&self) -> Option<&str> {
        match self {
            Self::AtCountry => None,
            Self::AtProvince(id) => Some(id),
        }
    }
}

impl fmt::Display for DrilldownState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AtCountry => f.write_str("at country level"),
            Self::AtProvince(id) => write!(f, "at province {id}"),
        }
    }
}

/// Input to the drill-down state machine
#[derive(Debug, Clone)]
pub enum DrilldownEvent {
    /// A region of the displayed level was clicked or tapped
    SelectRegion { region_id: String },
    /// Navigate from the country into one province
    DrillInto { province_id: String },
    /// Navigate back to the country
    DrillUp,
    /// The summary sheet was dismissed
    DismissModal,
    /// The summary sheet's drill button was pressed
    DrillSelected,
    /// Boundary data for a drill target arrived
    BoundaryLoaded {
        province_id: String,
        payload: Arc<BoundaryPayload>,
    },
    /// Boundary data for a drill target could not be fetched
    BoundaryFailed {
        province_id: String,
        error: FetchError,
    },
}

impl DrilldownEvent {
    /// Short event name used in transition errors
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SelectRegion { .. } => "select a region",
            Self::DrillInto { .. } => "drill into a province",
            Self::DrillUp => "drill up",
            Self::DismissModal => "dismiss the summary",
            Self::DrillSelected => "drill into the selected region",
            Self::BoundaryLoaded { .. } => "apply boundary data",
            Self::BoundaryFailed { .. } => "apply a fetch failure",
        }
    }
}

/// Regions of one level, ready to be painted
#[derive(Debug, Clone, PartialEq)]
pub struct LevelView {
    /// Level the regions belong to
    pub state: DrilldownState,
    /// Breadcrumb/subtitle text
    pub title: String,
    /// Name of the data series
    pub series_name: String,
    /// Regions in boundary document order
    pub regions: Vec<Region>,
}

impl LevelView {
    /// Number of people assigned across all regions
    #[must_use]
    pub fn total(&self) -> u32 {
        self.regions.iter().map(|region| region.value).sum()
    }
}

/// Content of the touch-mode summary sheet
#[derive(Debug, Clone, PartialEq)]
pub struct ModalContent {
    pub region_id: String,
    pub name: String,
    pub series_name: String,
    pub value: u32,
    pub members: Vec<Arc<PersonRecord>>,
    /// Whether the sheet offers a drill-down button
    pub can_drill: bool,
}

/// Side effect requested from the host
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// A drill target is being fetched
    ShowLoading { province_id: String },
    /// The pending fetch settled or was abandoned
    HideLoading,
    /// Load the boundary document `load_key` for `province_id`
    FetchBoundary {
        province_id: String,
        load_key: String,
    },
    /// Paint a level
    Render(LevelView),
    /// Fit and recenter on the rendered regions
    FitToBounds,
    /// Present the summary sheet
    ShowModal(ModalContent),
    /// Dismiss the summary sheet
    CloseModal,
}

/// Result of handling one event
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// State after the event
    pub state: DrilldownState,
    /// Side effects, in the order they must be carried out
    pub intents: Vec<Intent>,
}

impl Transition {
    /// Whether the host has nothing to do
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.intents.is_empty()
    }
}

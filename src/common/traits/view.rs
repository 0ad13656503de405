//! Rendering collaborator trait
//!
//! The engine never draws anything. A `MapView` receives what to show and is
//! free to paint it with whatever chart or map library the host uses.

use crate::drilldown::{LevelView, ModalContent};

/// Surface the drill-down session reports to
pub trait MapView {
    /// Paint the regions of a level
    fn render(&mut self, view: &LevelView);

    /// Fit and recenter on the currently rendered regions
    fn fit_to_bounds(&mut self);

    /// A drill target is being fetched
    fn show_loading(&mut self, _province_id: &str) {}

    /// The pending fetch settled or was abandoned
    fn hide_loading(&mut self) {}

    /// Present the summary sheet for a selected region
    fn show_modal(&mut self, content: &ModalContent);

    /// Dismiss the summary sheet
    fn close_modal(&mut self);
}

/// View that only writes what it would show to the log
#[derive(Debug, Default)]
pub struct LoggingView;

impl MapView for LoggingView {
    fn render(&mut self, view: &LevelView) {
        log::info!(
            "Rendering {} ({}): {} regions, {} people",
            view.title,
            view.series_name,
            view.regions.len(),
            view.total()
        );
    }

    fn fit_to_bounds(&mut self) {
        log::debug!("Fitting map to bounds");
    }

    fn show_loading(&mut self, province_id: &str) {
        log::info!("Loading boundary data for {province_id}");
    }

    fn show_modal(&mut self, content: &ModalContent) {
        log::info!(
            "{} / {}: {} people{}",
            content.series_name,
            content.name,
            content.value,
            if content.can_drill { " (drillable)" } else { "" }
        );
    }

    fn close_modal(&mut self) {
        log::debug!("Closing summary sheet");
    }
}

//! Tests for the drill-down state machine without any IO

use std::sync::Arc;

use classmap::{
    BoundaryPayload, DrilldownController, DrilldownEvent, DrilldownState, Error, FetchError,
    InteractionMode, Intent, Transition,
};
use serde_json::json;

use crate::utils::{BEIJING, TAIWAN, ZHEJIANG, beijing_document, country_payload, records, zhejiang_payload};

fn controller(mode: InteractionMode) -> DrilldownController {
    DrilldownController::new(&country_payload(), &records(), mode).unwrap()
}

fn drill_into(controller: &mut DrilldownController, id: &str) -> classmap::Result<Transition> {
    controller.handle(DrilldownEvent::DrillInto {
        province_id: id.to_string(),
    })
}

fn loaded(controller: &mut DrilldownController, id: &str, payload: BoundaryPayload) -> Transition {
    controller
        .handle(DrilldownEvent::BoundaryLoaded {
            province_id: id.to_string(),
            payload: Arc::new(payload),
        })
        .unwrap()
}

fn select(controller: &mut DrilldownController, id: &str) -> classmap::Result<Transition> {
    controller.handle(DrilldownEvent::SelectRegion {
        region_id: id.to_string(),
    })
}

fn at_zhejiang(mode: InteractionMode) -> DrilldownController {
    let mut controller = controller(mode);
    drill_into(&mut controller, ZHEJIANG).unwrap();
    loaded(&mut controller, ZHEJIANG, zhejiang_payload());
    controller
}

fn render_titles(transition: &Transition) -> Vec<&str> {
    transition
        .intents
        .iter()
        .filter_map(|intent| match intent {
            Intent::Render(view) => Some(view.title.as_str()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_starts_at_country() {
    let controller = controller(InteractionMode::Precise);

    assert_eq!(controller.state(), &DrilldownState::AtCountry);
    assert!(controller.pending().is_none());

    let view = controller.current_view();
    assert_eq!(view.title, "中国");
    assert_eq!(view.series_name, "各省人数");
    assert_eq!(view.regions.len(), 3);
    assert_eq!(view.total(), 5);
    assert_eq!(controller.country_report().unmatched.len(), 1);
}

#[test]
fn test_empty_root_document_is_rejected() {
    let empty =
        BoundaryPayload::from_document("100000", json!({"type": "FeatureCollection", "features": []}))
            .unwrap();

    let result = DrilldownController::new(&empty, &records(), InteractionMode::Precise);
    assert!(matches!(result, Err(Error::MissingRootData { .. })));
}

#[test]
fn test_drill_waits_for_boundary_data() {
    let mut controller = controller(InteractionMode::Precise);

    let transition = drill_into(&mut controller, ZHEJIANG).unwrap();
    assert_eq!(transition.state, DrilldownState::AtCountry);
    assert_eq!(
        transition.intents,
        vec![
            Intent::ShowLoading {
                province_id: ZHEJIANG.to_string()
            },
            Intent::FetchBoundary {
                province_id: ZHEJIANG.to_string(),
                load_key: ZHEJIANG.to_string()
            },
        ]
    );
    assert_eq!(controller.pending(), Some(ZHEJIANG));

    let transition = loaded(&mut controller, ZHEJIANG, zhejiang_payload());
    assert_eq!(transition.state, DrilldownState::AtProvince(ZHEJIANG.to_string()));
    assert_eq!(transition.intents.first(), Some(&Intent::HideLoading));
    assert_eq!(transition.intents.last(), Some(&Intent::FitToBounds));
    assert_eq!(render_titles(&transition), vec!["浙江"]);
    assert!(controller.pending().is_none());

    let view = controller.current_view();
    assert_eq!(view.series_name, "浙江");
    assert_eq!(view.regions.len(), 3);
    assert_eq!(view.total(), 3);
    assert_eq!(
        controller.city_report().unwrap().unmatched_names(classmap::LocationField::City),
        vec!["舟山市"]
    );
}

#[test]
fn test_repeated_drill_does_not_show_loading_twice() {
    let mut controller = controller(InteractionMode::Precise);
    drill_into(&mut controller, ZHEJIANG).unwrap();

    let again = drill_into(&mut controller, ZHEJIANG).unwrap();
    assert_eq!(
        again.intents,
        vec![Intent::FetchBoundary {
            province_id: ZHEJIANG.to_string(),
            load_key: ZHEJIANG.to_string()
        }]
    );

    loaded(&mut controller, ZHEJIANG, zhejiang_payload());
    // The second resolution of the coalesced fetch changes nothing
    let duplicate = loaded(&mut controller, ZHEJIANG, zhejiang_payload());
    assert!(duplicate.is_noop());
    assert_eq!(duplicate.state, DrilldownState::AtProvince(ZHEJIANG.to_string()));
}

#[test]
fn test_drill_up_restores_country_counts() {
    let mut controller = at_zhejiang(InteractionMode::Precise);

    let transition = controller.handle(DrilldownEvent::DrillUp).unwrap();
    assert_eq!(transition.state, DrilldownState::AtCountry);
    assert_eq!(render_titles(&transition), vec!["中国"]);
    assert_eq!(transition.intents.last(), Some(&Intent::FitToBounds));

    assert!(controller.cities().is_none());
    let zhejiang = controller.provinces().get(ZHEJIANG).unwrap();
    assert_eq!(zhejiang.value, 4);
    assert_eq!(zhejiang.members.len(), 4);
}

#[test]
fn test_drill_up_at_country_is_invalid() {
    let mut controller = controller(InteractionMode::Precise);

    let error = controller.handle(DrilldownEvent::DrillUp).unwrap_err();
    assert!(matches!(
        error,
        Error::InvalidTransition {
            state: DrilldownState::AtCountry,
            ..
        }
    ));
    assert_eq!(controller.state(), &DrilldownState::AtCountry);
}

#[test]
fn test_drill_up_abandons_pending_drill() {
    let mut controller = controller(InteractionMode::Precise);
    drill_into(&mut controller, ZHEJIANG).unwrap();

    let transition = controller.handle(DrilldownEvent::DrillUp).unwrap();
    assert_eq!(transition.intents, vec![Intent::HideLoading]);
    assert!(controller.pending().is_none());

    let late = loaded(&mut controller, ZHEJIANG, zhejiang_payload());
    assert!(late.is_noop());
    assert_eq!(controller.state(), &DrilldownState::AtCountry);
}

#[test]
fn test_superseded_drill_is_discarded() {
    let mut controller = controller(InteractionMode::Precise);
    drill_into(&mut controller, ZHEJIANG).unwrap();

    let transition = drill_into(&mut controller, BEIJING).unwrap();
    assert_eq!(
        transition.intents[0],
        Intent::ShowLoading {
            province_id: BEIJING.to_string()
        }
    );
    assert_eq!(controller.pending(), Some(BEIJING));

    let stale = loaded(&mut controller, ZHEJIANG, zhejiang_payload());
    assert!(stale.is_noop());
    assert_eq!(controller.state(), &DrilldownState::AtCountry);

    let beijing = BoundaryPayload::from_document(BEIJING, beijing_document()).unwrap();
    let transition = loaded(&mut controller, BEIJING, beijing);
    assert_eq!(transition.state, DrilldownState::AtProvince(BEIJING.to_string()));
    assert_eq!(controller.current_view().total(), 1);
}

#[test]
fn test_failed_fetch_stays_at_country() {
    let mut controller = controller(InteractionMode::Precise);
    drill_into(&mut controller, ZHEJIANG).unwrap();

    let transition = controller
        .handle(DrilldownEvent::BoundaryFailed {
            province_id: ZHEJIANG.to_string(),
            error: FetchError::status(ZHEJIANG, 404, "Not Found"),
        })
        .unwrap();

    assert_eq!(transition.intents, vec![Intent::HideLoading]);
    assert_eq!(transition.state, DrilldownState::AtCountry);
    assert!(controller.pending().is_none());
    assert!(!controller.has_visited(ZHEJIANG));

    let zhejiang = controller.provinces().get(ZHEJIANG).unwrap();
    assert_eq!(zhejiang.value, 4);
    assert_eq!(zhejiang.members.len(), 4);

    // A new attempt asks for the data again
    let retry = drill_into(&mut controller, ZHEJIANG).unwrap();
    assert!(retry.intents.iter().any(|i| matches!(i, Intent::FetchBoundary { .. })));
}

#[test]
fn test_stale_failure_is_ignored() {
    let mut controller = controller(InteractionMode::Precise);
    drill_into(&mut controller, BEIJING).unwrap();

    let transition = controller
        .handle(DrilldownEvent::BoundaryFailed {
            province_id: ZHEJIANG.to_string(),
            error: FetchError::transport(ZHEJIANG, "connection reset"),
        })
        .unwrap();

    assert!(transition.is_noop());
    assert_eq!(controller.pending(), Some(BEIJING));
}

#[test]
fn test_revisit_needs_no_fetch() {
    let mut controller = at_zhejiang(InteractionMode::Precise);
    controller.handle(DrilldownEvent::DrillUp).unwrap();
    assert!(controller.has_visited(ZHEJIANG));

    let transition = drill_into(&mut controller, ZHEJIANG).unwrap();
    assert_eq!(transition.state, DrilldownState::AtProvince(ZHEJIANG.to_string()));
    assert!(
        !transition
            .intents
            .iter()
            .any(|i| matches!(i, Intent::FetchBoundary { .. } | Intent::ShowLoading { .. }))
    );
    assert_eq!(render_titles(&transition), vec!["浙江"]);
    assert_eq!(controller.current_view().total(), 3);
}

#[test]
fn test_rejected_drills_change_nothing() {
    let mut controller = controller(InteractionMode::Precise);

    assert!(matches!(
        drill_into(&mut controller, TAIWAN),
        Err(Error::NotDrillable(id)) if id == TAIWAN
    ));
    assert!(matches!(
        drill_into(&mut controller, "999999"),
        Err(Error::UnknownRegion(_))
    ));
    assert!(controller.pending().is_none());

    let mut controller = at_zhejiang(InteractionMode::Precise);
    assert!(matches!(
        drill_into(&mut controller, BEIJING),
        Err(Error::InvalidTransition { .. })
    ));
    assert_eq!(controller.state(), &DrilldownState::AtProvince(ZHEJIANG.to_string()));
}

#[test]
fn test_precise_selection_drills_directly() {
    let mut controller = controller(InteractionMode::Precise);

    let taiwan = select(&mut controller, TAIWAN).unwrap();
    assert!(taiwan.is_noop());

    let zhejiang = select(&mut controller, ZHEJIANG).unwrap();
    assert!(zhejiang.intents.iter().any(|i| matches!(i, Intent::FetchBoundary { .. })));
    assert!(controller.selected().is_none());

    loaded(&mut controller, ZHEJIANG, zhejiang_payload());
    assert!(select(&mut controller, "330100").unwrap().is_noop());
    assert!(matches!(select(&mut controller, ZHEJIANG), Err(Error::UnknownRegion(_))));
}

#[test]
fn test_touch_selection_opens_summary() {
    let mut controller = controller(InteractionMode::Touch);

    let transition = select(&mut controller, ZHEJIANG).unwrap();
    let [Intent::ShowModal(content)] = transition.intents.as_slice() else {
        panic!("expected a single summary, got {:?}", transition.intents);
    };
    assert_eq!(content.name, "浙江");
    assert_eq!(content.series_name, "各省人数");
    assert_eq!(content.value, 4);
    assert_eq!(content.members.len(), 4);
    assert!(content.can_drill);
    assert_eq!(controller.selected(), Some(ZHEJIANG));
    assert_eq!(controller.state(), &DrilldownState::AtCountry);

    let drill = controller.handle(DrilldownEvent::DrillSelected).unwrap();
    assert_eq!(drill.intents[0], Intent::CloseModal);
    assert!(drill.intents.iter().any(|i| matches!(i, Intent::FetchBoundary { .. })));
    assert!(controller.selected().is_none());
}

#[test]
fn test_touch_summary_of_region_without_children() {
    let mut controller = controller(InteractionMode::Touch);

    let transition = select(&mut controller, TAIWAN).unwrap();
    assert!(matches!(
        transition.intents.as_slice(),
        [Intent::ShowModal(content)] if !content.can_drill && content.value == 0
    ));
    assert!(matches!(
        controller.handle(DrilldownEvent::DrillSelected),
        Err(Error::NotDrillable(_))
    ));
}

#[test]
fn test_touch_city_summary_and_drill_up() {
    let mut controller = at_zhejiang(InteractionMode::Touch);

    let transition = select(&mut controller, "330100").unwrap();
    assert!(matches!(
        transition.intents.as_slice(),
        [Intent::ShowModal(content)]
            if !content.can_drill && content.series_name == "浙江" && content.value == 2
    ));

    let up = controller.handle(DrilldownEvent::DrillUp).unwrap();
    assert_eq!(up.intents[0], Intent::CloseModal);
    assert_eq!(render_titles(&up), vec!["中国"]);
    assert!(controller.selected().is_none());
}

#[test]
fn test_dismiss_modal() {
    let mut controller = controller(InteractionMode::Touch);

    assert!(controller.handle(DrilldownEvent::DismissModal).unwrap().is_noop());
    assert!(matches!(
        controller.handle(DrilldownEvent::DrillSelected),
        Err(Error::InvalidTransition { .. })
    ));

    select(&mut controller, ZHEJIANG).unwrap();
    let transition = controller.handle(DrilldownEvent::DismissModal).unwrap();
    assert_eq!(transition.intents, vec![Intent::CloseModal]);
    assert!(controller.selected().is_none());
}

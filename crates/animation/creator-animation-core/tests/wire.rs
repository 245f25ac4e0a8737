use creator_animation_core::{
    resolve_timeline_json, AnimatedEntity, CoreError, EasingFunction, InterpolationMode,
    Keyframe, ResolvedEntity, Timeline,
};
use creator_test_fixtures::scenes;
use serde_json::json;

#[test]
fn fixtures_round_trip_structurally() {
    for key in scenes::keys() {
        let timeline: Timeline = scenes::load(&key).unwrap();
        let text = timeline.to_json().unwrap();
        let back: Timeline = serde_json::from_str(&text).unwrap();
        assert_eq!(back, timeline, "{key}");
    }
}

#[test]
fn keyframe_ids_survive_round_trip() {
    let timeline: Timeline = scenes::load("title_card").unwrap();
    let back: Timeline = serde_json::from_str(&timeline.to_json().unwrap()).unwrap();
    let AnimatedEntity::Text(before) = &timeline.entities[0] else {
        panic!("title_card starts with a text entity");
    };
    let AnimatedEntity::Text(after) = &back.entities[0] else {
        panic!("round trip changed the variant");
    };
    let ids = |e: &creator_animation_core::AnimatedTextEntity| -> Vec<String> {
        e.origin.keyframes[0]
            .keyframes
            .values
            .iter()
            .map(|k| k.id.clone())
            .collect()
    };
    assert_eq!(ids(before), ids(after));
    assert!(ids(before).iter().all(|id| !id.is_empty()));
}

#[test]
fn interpolation_modes_use_type_tags() {
    let linear = serde_json::to_value(InterpolationMode::Linear).unwrap();
    assert_eq!(linear, json!({ "type": "Linear" }));

    let eased = serde_json::to_value(InterpolationMode::easing(EasingFunction::QuintOut)).unwrap();
    assert_eq!(eased, json!({ "type": "EasingFunction", "easing_function": "QuintOut" }));

    let spring: InterpolationMode = serde_json::from_value(json!({
        "type": "Spring", "mass": 1, "damping": 20, "stiffness": 200
    }))
    .unwrap();
    assert_eq!(spring, InterpolationMode::spring(1.0, 20.0, 200.0));
}

#[test]
fn missing_keyframe_id_is_rejected() {
    let err = serde_json::from_value::<Keyframe>(json!({ "value": 1.0, "offset": 0.0 }));
    assert!(err.is_err());

    let k: Keyframe =
        serde_json::from_value(json!({ "id": "k0", "value": 1.0, "offset": 0.0 })).unwrap();
    assert_eq!(k.id, "k0");
    assert_eq!(k.interpolation, None);
}

#[test]
fn missing_cache_is_rejected() {
    let timeline: Timeline = scenes::load("title_card").unwrap();
    let mut value = serde_json::to_value(&timeline).unwrap();
    value["entities"][0]
        .as_object_mut()
        .unwrap()
        .remove("cache");
    let err = Timeline::from_json(&value.to_string()).unwrap_err();
    assert!(matches!(err, CoreError::Json(_)), "{err:?}");
}

#[test]
fn duplicate_entity_ids_are_rejected() {
    let timeline: Timeline = scenes::load("title_card").unwrap();
    let mut value = serde_json::to_value(&timeline).unwrap();
    let first_id = value["entities"][0]["id"].clone();
    value["entities"][2]["id"] = first_id;
    match Timeline::from_json(&value.to_string()) {
        Err(CoreError::Validation { path, reason }) => {
            assert_eq!(path, "entities[2].id");
            assert!(reason.contains("duplicate"), "{reason}");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn duplicate_keyframe_ids_in_a_track_are_rejected() {
    let timeline: Timeline = scenes::load("easing_lanes").unwrap();
    let mut value = serde_json::to_value(&timeline).unwrap();
    let values = &mut value["entities"][0]["position"]["keyframes"][0]["keyframes"]["values"];
    let first_id = values[0]["id"].clone();
    values[1]["id"] = first_id;
    match Timeline::from_json(&value.to_string()) {
        Err(CoreError::Validation { path, .. }) => assert_eq!(path, "entities[0].position"),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn parsing_is_deterministic() {
    let text = scenes::json("easing_lanes").unwrap();
    let a = Timeline::from_json(&text).unwrap();
    let b = Timeline::from_json(&text).unwrap();
    assert_eq!(a, b);
}

#[test]
fn unknown_entity_type_is_rejected() {
    let err = Timeline::from_json(
        &json!({
            "entities": [{ "type": "Polygon", "id": "p" }],
            "render_state": { "curr_frame": 0 },
            "fps": 60,
            "size": [100, 100],
            "duration": 1.0
        })
        .to_string(),
    )
    .unwrap_err();
    assert!(matches!(err, CoreError::Json(_)));
}

#[test]
fn schema_violations_carry_a_path() {
    let mut timeline: Timeline = scenes::load("staggered_text").unwrap();
    if let AnimatedEntity::StaggeredText(e) = &mut timeline.entities[0] {
        e.stagger = -1.0;
    }
    let text = serde_json::to_string(&timeline).unwrap();
    match Timeline::from_json(&text) {
        Err(CoreError::Validation { path, .. }) => assert_eq!(path, "entities[0].stagger"),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn zero_fps_is_rejected_at_the_boundary() {
    let mut timeline: Timeline = scenes::load("title_card").unwrap();
    timeline.fps = 0;
    let text = serde_json::to_string(&timeline).unwrap();
    assert_eq!(Timeline::from_json(&text), Err(CoreError::InvalidFps));
}

#[test]
fn empty_track_is_an_evaluation_error_not_a_schema_error() {
    let text = scenes::json("empty_track").unwrap();
    let timeline = Timeline::from_json(&text).unwrap();
    let frame = timeline.calculate().unwrap();
    assert_eq!(frame.failures.len(), 1);
    assert_eq!(frame.failures[0].id, "broken");
    assert_eq!(frame.entities.len(), 1);
}

#[test]
fn resolve_timeline_json_returns_resolved_entities() {
    let text = scenes::json("easing_lanes").unwrap();
    let out = resolve_timeline_json(&text).unwrap();
    let resolved: Vec<ResolvedEntity> = serde_json::from_str(&out).unwrap();
    assert_eq!(resolved.len(), 4);
    // Frame 120 at 60 fps lands on the second keyframe of every lane.
    for entity in &resolved {
        let ResolvedEntity::Ellipse(e) = entity else {
            panic!("easing_lanes holds ellipses only");
        };
        assert_eq!(e.position, (1180.0, 360.0), "{}", e.id);
    }
}

use creator_animation_core::{
    resolve, resolve_frame, AnimatedEntity, AnimatedNumber, AnimatedRectEntity,
    AnimatedStaggeredTextEntity, AnimatedStaggeredTextLetter, AnimatedTransform, AnimatedVec2,
    AnimationData, Cache, Color, CoreError, Keyframe, Keyframes, Paint, PaintStyle,
    ResolvedEntity, TextAlign, TextPaint,
};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn moving_rect(id: &str, offset: f32, duration: f32) -> AnimatedEntity {
    AnimatedEntity::Rect(AnimatedRectEntity {
        id: id.to_string(),
        cache: Cache::default(),
        paint: Paint {
            style: PaintStyle::fill(Color::new(10, 20, 30, 1.0)),
        },
        position: AnimatedVec2::new(
            AnimatedNumber::from_keyframes(vec![
                Keyframe::new(0.0, 0.0),
                Keyframe::new(100.0, 1.0),
            ]),
            AnimatedNumber::constant(5.0),
        ),
        size: AnimatedVec2::constant(20.0, 20.0),
        origin: AnimatedVec2::constant(0.0, 0.0),
        transform: None,
        animation_data: AnimationData::new(offset, duration),
    })
}

fn staggered(text: &str, stagger: f32) -> AnimatedEntity {
    let mut letter = AnimatedTransform::identity();
    letter.translate.keyframes[1] =
        AnimatedNumber::from_keyframes(vec![Keyframe::new(0.0, 0.0), Keyframe::new(10.0, 1.0)]);
    AnimatedEntity::StaggeredText(AnimatedStaggeredTextEntity {
        id: "stagger".into(),
        cache: Cache { valid: true },
        text: text.into(),
        stagger,
        origin: AnimatedVec2::constant(0.0, 0.0),
        transform: None,
        letter: AnimatedStaggeredTextLetter {
            transform: letter,
            paint: TextPaint {
                style: PaintStyle::fill(Color::default()),
                align: TextAlign::Left,
                font_name: "Inter".into(),
                size: 32.0,
            },
        },
        animation_data: AnimationData::new(0.0, 5.0),
    })
}

fn position(e: &ResolvedEntity) -> (f32, f32) {
    match e {
        ResolvedEntity::Rect(r) => r.position,
        other => panic!("expected rect, got {other:?}"),
    }
}

#[test]
fn window_excludes_before_and_after() {
    let scene = vec![moving_rect("a", 2.0, 3.0)];
    assert!(resolve(&scene, 60, 60).unwrap().is_empty()); // 1.0s
    assert!(resolve(&scene, 330, 60).unwrap().is_empty()); // 5.5s
    let at_three = resolve(&scene, 180, 60).unwrap(); // 3.0s
    assert_eq!(at_three.len(), 1);
    approx(position(&at_three[0]).0, 100.0, 1e-4);
}

#[test]
fn window_is_half_open() {
    let scene = vec![moving_rect("a", 2.0, 3.0)];
    assert_eq!(resolve(&scene, 120, 60).unwrap().len(), 1); // start
    assert!(resolve(&scene, 300, 60).unwrap().is_empty()); // end
}

#[test]
fn hidden_entities_are_excluded() {
    let mut rect = moving_rect("a", 0.0, 10.0);
    if let AnimatedEntity::Rect(r) = &mut rect {
        r.animation_data.visible = false;
    }
    assert!(resolve(&[rect], 30, 60).unwrap().is_empty());
}

#[test]
fn local_time_is_relative_to_the_window() {
    let scene = vec![moving_rect("a", 1.0, 5.0)];
    let out = resolve(&scene, 90, 60).unwrap(); // global 1.5 -> local 0.5
    approx(position(&out[0]).0, 50.0, 1e-4);
    assert_eq!(position(&out[0]).1, 5.0);
}

#[test]
fn resolved_entities_keep_their_window() {
    let scene = vec![moving_rect("a", 1.0, 5.0), staggered("Hi", 0.1)];
    let out = resolve(&scene, 90, 60).unwrap();
    assert_eq!(out[0].animation_data(), &AnimationData::new(1.0, 5.0));
    assert_eq!(out[1].animation_data(), &AnimationData::new(0.0, 5.0));
    let wire = serde_json::to_value(&out[0]).unwrap();
    assert_eq!(wire["animation_data"]["offset"], 1.0);
}

#[test]
fn reordering_changes_draw_order_not_values() {
    let a = moving_rect("a", 0.0, 5.0);
    let b = moving_rect("b", 0.5, 5.0);
    let forward = resolve_frame(&[a.clone(), b.clone()], 60, 60).unwrap();
    let reversed = resolve_frame(&[b, a], 60, 60).unwrap();

    let order = |f: &creator_animation_core::ResolvedFrame| -> Vec<String> {
        f.draw_order().map(|e| e.id().to_string()).collect()
    };
    assert_eq!(order(&forward), vec!["b", "a"]);
    assert_eq!(order(&reversed), vec!["a", "b"]);
    for id in ["a", "b"] {
        assert_eq!(forward.get(id), reversed.get(id));
    }
}

#[test]
fn cache_flag_passes_through_untouched() {
    let mut valid = moving_rect("v", 0.0, 5.0);
    valid.cache_mut().valid = true;
    let invalid = moving_rect("i", 0.0, 5.0);
    let out = resolve_frame(&[valid, invalid], 0, 60).unwrap();
    assert!(out.get("v").unwrap().cache().valid);
    assert!(!out.get("i").unwrap().cache().valid);
    assert!(!out.is_cached());
}

#[test]
fn failing_entity_does_not_abort_siblings() {
    let mut broken = moving_rect("broken", 0.0, 5.0);
    if let AnimatedEntity::Rect(r) = &mut broken {
        r.size.keyframes[0].keyframes = Keyframes::default();
    }
    let scene = vec![moving_rect("before", 0.0, 5.0), broken, moving_rect("after", 0.0, 5.0)];
    let out = resolve_frame(&scene, 30, 60).unwrap();

    let ids: Vec<&str> = out.entities.iter().map(|e| e.id()).collect();
    assert_eq!(ids, vec!["before", "after"]);
    assert_eq!(out.failures.len(), 1);
    assert_eq!(out.failures[0].id, "broken");
    match &out.failures[0].error {
        CoreError::Entity { id, source } => {
            assert_eq!(id, "broken");
            assert_eq!(**source, CoreError::EmptyTrack);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn broken_entity_outside_its_window_is_not_evaluated() {
    let mut broken = moving_rect("broken", 10.0, 5.0);
    if let AnimatedEntity::Rect(r) = &mut broken {
        r.size.keyframes[0].keyframes = Keyframes::default();
    }
    let out = resolve_frame(&[broken], 0, 60).unwrap();
    assert!(out.entities.is_empty());
    assert!(out.failures.is_empty());
}

#[test]
fn zero_fps_is_rejected() {
    assert_eq!(
        resolve_frame(&[moving_rect("a", 0.0, 1.0)], 0, 0).unwrap_err(),
        CoreError::InvalidFps
    );
}

#[test]
fn stagger_delays_each_letter() {
    let scene = vec![staggered("abc", 0.25)];
    let out = resolve(&scene, 30, 60).unwrap(); // local 0.5
    let ResolvedEntity::StaggeredText(text) = &out[0] else {
        panic!("expected staggered text");
    };
    let ys: Vec<f32> = text.letter.transforms.iter().map(|t| t.translate.1).collect();
    assert_eq!(ys.len(), 3);
    approx(ys[0], 5.0, 1e-4);
    approx(ys[1], 2.5, 1e-4);
    approx(ys[2], 0.0, 1e-4);
    assert!(text.cache.valid);
}

#[test]
fn stagger_letter_time_never_goes_negative() {
    let scene = vec![staggered("abcdef", 1.0)];
    let out = resolve(&scene, 0, 60).unwrap();
    let ResolvedEntity::StaggeredText(text) = &out[0] else {
        panic!("expected staggered text");
    };
    assert!(text.letter.transforms.iter().all(|t| t.translate.1 == 0.0));
}

#[test]
fn stagger_counts_chars_not_bytes() {
    let scene = vec![staggered("héllo", 0.1)];
    let out = resolve(&scene, 0, 60).unwrap();
    let ResolvedEntity::StaggeredText(text) = &out[0] else {
        panic!("expected staggered text");
    };
    assert_eq!(text.letter.transforms.len(), 5);
}

use folio3d::animation::{idle_pose, AnimationTuning, AvatarAnimationLoop};
use folio3d::avatar::{RigSpec, Scene, SegmentRole};
use folio3d::palette::Palette;
use std::io::Write;
use tempfile::NamedTempFile;

const DT: f64 = 1.0 / 60.0;

#[test]
fn click_settles_within_thirteen_frames() {
    let mut clicked = AvatarAnimationLoop::default();
    let mut calm = AvatarAnimationLoop::default();
    clicked.on_click();

    for frame in 1..=20 {
        let t = frame as f64 * DT;
        let pose = clicked.advance_frame(t);
        let reference = calm.advance_frame(t);
        if frame < 13 {
            assert!(clicked.pulse().active, "pulse ended early at frame {frame}");
            assert!(pose.bounce > reference.bounce);
        } else {
            assert!(!clicked.pulse().active, "pulse still active at frame {frame}");
            assert_eq!(clicked.pulse().remaining_intensity, 0.0);
            assert_eq!(pose, reference);
        }
    }
}

#[test]
fn pointer_in_a_corner_turns_the_figure_but_not_past_the_limit() {
    let tuning = AnimationTuning::default();
    let mut animation = AvatarAnimationLoop::new(tuning.clone());
    animation.on_pointer_move(10_000.0, -10_000.0, 800.0, 600.0);

    for frame in 0..600 {
        animation.advance_frame(frame as f64 * DT);
        let rotation = animation.rotation();
        assert!(rotation.yaw.abs() <= tuning.max_yaw + 1e-12);
        assert!(rotation.pitch.abs() <= tuning.max_pitch + 1e-12);
    }
    assert!((animation.rotation().yaw - tuning.max_yaw).abs() < 1e-6);
}

#[test]
fn idle_figure_moves_every_limb() {
    let tuning = AnimationTuning::default();
    let scene = Scene::new(RigSpec::default_figure());
    let palette = Palette::DARK;

    let rest = scene.pose(&idle_pose(0.0, &tuning), &palette);
    let later = scene.pose(&idle_pose(0.4, &tuning), &palette);
    for (i, spec) in scene.rig().segments.iter().enumerate() {
        if spec.role == SegmentRole::Prop {
            continue;
        }
        assert_ne!(rest[i].corners, later[i].corners, "{} did not move", spec.name);
    }
}

#[test]
fn rig_asset_loads_and_bad_asset_falls_back() {
    let mut good = NamedTempFile::new().unwrap();
    write!(
        good,
        r#"
        [[segments]]
        name = "crate"
        role = "body"
        half_extents = [0.5, 0.5, 0.5]
        pivot = [0.0, 0.0, 0.0]
        color = "accent"
        "#
    )
    .unwrap();
    let rig = RigSpec::load(good.path()).unwrap();
    assert_eq!(rig.segments.len(), 1);
    assert_eq!(rig.segments[0].offset, [0.0; 3]);

    let mut bad = NamedTempFile::new().unwrap();
    write!(bad, "segments = 3").unwrap();
    assert_eq!(RigSpec::load_or_placeholder(bad.path()), RigSpec::placeholder());

    let scene = Scene::new(RigSpec::placeholder());
    let mesh = scene.mesh(&Default::default(), &Palette::LIGHT);
    assert_eq!(mesh.len(), 12);
}

//! File round trips for muscle rig data.
//!
//! Run with: cargo test -p rig-types --test rig_data_files

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]

use rig_types::{
    MirrorAxis, MuscleGroupKind, MuscleGroupRecord, MuscleUnit, Point3, RigData, RigError, Side,
    place_between,
};

/// A trapezius group laid out the way the rigging tools seed it: each
/// locator placed a fixed fraction along a pair of skeleton joints.
fn trapezius() -> MuscleGroupRecord {
    let neck = Point3::new(0.0, 150.0, -2.0);
    let head = Point3::new(0.0, 162.0, 0.0);
    let back3 = Point3::new(0.0, 135.0, -4.0);
    let clavicle = Point3::new(3.0, 145.0, 2.0);
    let shoulder = Point3::new(16.0, 144.0, -1.0);
    let acromion = Point3::new(14.0, 146.0, -3.0);
    let scapula = Point3::new(10.0, 132.0, -8.0);

    let placements = [
        ("L_trapA", (neck, head, 1.0 / 2.0), (clavicle, shoulder, 5.0 / 6.0)),
        ("L_trapB", (back3, neck, 6.0 / 8.0), (acromion, scapula, 1.0 / 4.0)),
        ("L_trapC", (back3, neck, 1.0 / 8.0), (acromion, scapula, 3.0 / 4.0)),
    ];

    let mut record = MuscleGroupRecord::new(MuscleGroupKind::TrapGroup)
        .with_input("back2Joint", "back_02")
        .with_input("clavicleJoint", "L_clavicle")
        .with_input("acromionJoint", "L_acromion");

    for (name, (o0, o1, of), (i0, i1, if_)) in placements {
        let origin = place_between(&o0, &o1, of);
        let insertion = place_between(&i0, &i1, if_);
        let center = place_between(&origin, &insertion, 0.5);
        record.insert_unit(&MuscleUnit::new(name, origin, insertion, center));
    }
    record
}

#[test]
fn save_then_load_preserves_groups() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("biped_muscles.json");

    let mut data = RigData::new();
    data.insert("L_trap", trapezius());
    data.save(&path).unwrap();

    let loaded = RigData::load(&path).unwrap();
    assert_eq!(loaded, data);

    let units = loaded.group("L_trap").unwrap().units("L_trap").unwrap();
    assert_eq!(units.len(), 3);
    assert_eq!(units[0].origin, Point3::new(0.0, 156.0, -1.0));
}

#[test]
fn load_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = RigData::load(dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, RigError::Io(_)));
}

#[test]
fn reads_files_written_by_rigging_tools() {
    // Compact separators and a mix of integer and float coordinates.
    let json = r#"{
    "R_delt":{
        "R_deltA_muscleOrigin":[-3.0,145.0,2.0],
        "R_deltA_muscleInsertion":[-18,130,1],
        "R_deltA_JOmuscle":[-12.5,140.0,3.5],
        "R_deltB_muscleOrigin":[-14.0,146.0,-3.0],
        "R_deltB_muscleInsertion":[-18,130,1],
        "R_deltB_JOmuscle":[-17.0,141.0,-1.0],
        "R_deltC_muscleOrigin":[-12.0,146.0,-5.0],
        "R_deltC_muscleInsertion":[-18,130,1],
        "R_deltC_JOmuscle":[-15.0,140.0,-5.0],
        "Tag":"DeltoidGroup",
        "inputs":{
            "clavicleJoint":"R_clavicle",
            "upperArmJoint":"R_upperArm",
            "twist1Joint":"R_upperArm_twist1",
            "twist2Joint":"R_upperArm_twist2",
            "acromionJoint":"R_acromion"
        }
    }
}"#;

    let data = RigData::from_json_str(json).unwrap();
    let known = data.known_groups();
    assert_eq!(known.len(), 1);

    let (name, kind, record) = known[0];
    assert_eq!(name, "R_delt");
    assert_eq!(kind, MuscleGroupKind::DeltoidGroup);
    record.validate(name).unwrap();

    // Mirror back to the left side across X.
    let mut data = data;
    let left = data.mirror_group("R_delt", MirrorAxis::X, Side::Right).unwrap();
    assert_eq!(left, "L_delt");

    let units = data.group("L_delt").unwrap().units("L_delt").unwrap();
    assert_eq!(units[1].insertion, Point3::new(18.0, 130.0, 1.0));
    assert_eq!(
        data.group("L_delt").unwrap().input("acromionJoint"),
        Some("L_acromion")
    );
}

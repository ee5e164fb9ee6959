//! Muscle rig data files.
//!
//! Rig data is a JSON object keyed by muscle group name. Each group holds its
//! kind tag, the skeleton joints it attaches to, and the world-space
//! translation of every muscle joint:
//!
//! ```json
//! {
//!     "L_trap":{
//!         "L_trapA_muscleOrigin":[
//!             0.0,
//!             150.0,
//!             -2.0
//!         ],
//!         "L_trapA_muscleInsertion":[ ... ],
//!         "L_trapA_JOmuscle":[ ... ],
//!         "L_trapB_muscleOrigin":[ ... ],
//!         ...
//!         "Tag":"TrapGroup",
//!         "inputs":{
//!             "back2Joint":"back_02",
//!             "clavicleJoint":"L_clavicle",
//!             "acromionJoint":"L_acromion"
//!         }
//!     }
//! }
//! ```
//!
//! The rigging tools read the joint lists positionally, three per unit as
//! origin, insertion, center, so the writer emits joints unit by unit in
//! that order, then `Tag` and `inputs`, with `":"` between key and value.
//!
//! Unknown tags are kept when loading so their groups are written back out,
//! but [`RigData::known_groups`] skips them.

use std::collections::BTreeMap;
use std::io;
use std::path::Path;

use nalgebra::Point3;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::ser::{Formatter, PrettyFormatter};
use tracing::{debug, info, warn};

use crate::mirror::{MirrorAxis, Side, mirror_name};
use crate::muscle::{
    CENTER_SUFFIX, INSERTION_SUFFIX, MuscleGroupKind, MuscleUnit, ORIGIN_SUFFIX,
};
use crate::{Result, RigError};

/// One muscle group as stored in a rig data file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MuscleGroupRecord {
    /// Group kind tag, see [`MuscleGroupKind::tag`].
    #[serde(rename = "Tag")]
    pub tag: String,

    /// Input name to skeleton joint name.
    #[serde(default)]
    pub inputs: BTreeMap<String, String>,

    /// Muscle joint name to world-space translation.
    #[serde(flatten)]
    pub joints: BTreeMap<String, [f64; 3]>,
}

impl MuscleGroupRecord {
    /// Create an empty record of the given kind.
    #[must_use]
    pub fn new(kind: MuscleGroupKind) -> Self {
        Self {
            tag: kind.tag().to_string(),
            inputs: BTreeMap::new(),
            joints: BTreeMap::new(),
        }
    }

    /// Parse the kind tag.
    pub fn kind(&self) -> Result<MuscleGroupKind> {
        self.tag.parse()
    }

    /// Set an input joint.
    #[must_use]
    pub fn with_input(mut self, input: impl Into<String>, joint: impl Into<String>) -> Self {
        self.inputs.insert(input.into(), joint.into());
        self
    }

    /// Get an input joint by input name.
    #[must_use]
    pub fn input(&self, input: &str) -> Option<&str> {
        self.inputs.get(input).map(String::as_str)
    }

    /// Set the position of a muscle joint.
    pub fn set_position(&mut self, joint: impl Into<String>, position: Point3<f64>) {
        self.joints
            .insert(joint.into(), [position.x, position.y, position.z]);
    }

    /// Get the position of a muscle joint.
    #[must_use]
    pub fn position(&self, joint: &str) -> Option<Point3<f64>> {
        self.joints.get(joint).map(|&[x, y, z]| Point3::new(x, y, z))
    }

    /// Store all three joints of a unit.
    pub fn insert_unit(&mut self, unit: &MuscleUnit) {
        self.set_position(unit.origin_joint(), unit.origin);
        self.set_position(unit.insertion_joint(), unit.insertion);
        self.set_position(unit.center_joint(), unit.center);
    }

    /// Collect the units of a group called `group_name`, in unit order.
    pub fn units(&self, group_name: &str) -> Result<Vec<MuscleUnit>> {
        let kind = self.kind()?;
        kind.unit_names(group_name)
            .into_iter()
            .map(|name| -> Result<MuscleUnit> {
                let mut unit = MuscleUnit::new(
                    name,
                    Point3::origin(),
                    Point3::origin(),
                    Point3::origin(),
                );
                unit.origin = self.require(&unit, unit.origin_joint())?;
                unit.insertion = self.require(&unit, unit.insertion_joint())?;
                unit.center = self.require(&unit, unit.center_joint())?;
                Ok(unit)
            })
            .collect()
    }

    fn require(&self, unit: &MuscleUnit, joint: String) -> Result<Point3<f64>> {
        self.position(&joint).ok_or_else(|| RigError::IncompleteUnit {
            unit: unit.name.clone(),
            joint,
        })
    }

    /// Check that the tag is known, all inputs are set, and every unit is
    /// complete.
    pub fn validate(&self, group_name: &str) -> Result<()> {
        let kind = self.kind()?;
        if let Some(missing) = kind
            .required_inputs()
            .iter()
            .find(|input| !self.inputs.contains_key(**input))
        {
            return Err(RigError::MissingInput {
                group: group_name.to_string(),
                input: (*missing).to_string(),
            });
        }
        self.units(group_name)?;
        Ok(())
    }

    /// Mirror this record from side `from` to the opposite side.
    ///
    /// Input joints and muscle joint names have their side prefix swapped and
    /// positions are reflected across `axis`.
    #[must_use]
    pub fn mirrored(&self, axis: MirrorAxis, from: Side) -> Self {
        let inputs = self
            .inputs
            .iter()
            .map(|(input, joint)| (input.clone(), mirror_name(joint, from)))
            .collect();

        let joints = self
            .joints
            .iter()
            .map(|(joint, &[x, y, z])| {
                let p = axis.reflect(&Point3::new(x, y, z));
                (mirror_name(joint, from), [p.x, p.y, p.z])
            })
            .collect();

        Self {
            tag: self.tag.clone(),
            inputs,
            joints,
        }
    }

    /// Joint names in file order: unit by unit as origin, insertion,
    /// center, then joints without a unit suffix by name.
    #[must_use]
    pub fn joint_order(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.joints.keys().map(String::as_str).collect();
        names.sort_by_key(|&name| {
            [ORIGIN_SUFFIX, INSERTION_SUFFIX, CENTER_SUFFIX]
                .into_iter()
                .enumerate()
                .find_map(|(rank, suffix)| {
                    name.strip_suffix(suffix).map(|unit| (false, unit, rank))
                })
                .unwrap_or((true, name, 0))
        });
        names
    }

    /// Inputs in file order: the kind's required inputs first, then any
    /// extras by name.
    fn input_order(&self) -> Vec<(&str, &str)> {
        let required = self.kind().map_or(&[][..], MuscleGroupKind::required_inputs);
        let mut ordered: Vec<(&str, &str)> = required
            .iter()
            .filter_map(|input| self.inputs.get_key_value(*input))
            .map(|(input, joint)| (input.as_str(), joint.as_str()))
            .collect();
        ordered.extend(
            self.inputs
                .iter()
                .filter(|(input, _)| !required.contains(&input.as_str()))
                .map(|(input, joint)| (input.as_str(), joint.as_str())),
        );
        ordered
    }
}

impl Serialize for MuscleGroupRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.joints.len() + 2))?;
        for name in self.joint_order() {
            if let Some(position) = self.joints.get(name) {
                map.serialize_entry(name, position)?;
            }
        }
        map.serialize_entry("Tag", &self.tag)?;
        map.serialize_entry("inputs", &OrderedInputs(self.input_order()))?;
        map.end()
    }
}

struct OrderedInputs<'a>(Vec<(&'a str, &'a str)>);

impl Serialize for OrderedInputs<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().copied())
    }
}

/// Four-space pretty printing with `":"` between keys and values.
struct RigFileFormatter(PrettyFormatter<'static>);

impl RigFileFormatter {
    fn new() -> Self {
        Self(PrettyFormatter::with_indent(b"    "))
    }
}

impl Formatter for RigFileFormatter {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.0.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.0.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b":")
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object_value(writer)
    }
}

/// A rig data document: muscle groups keyed by group name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RigData {
    groups: BTreeMap<String, MuscleGroupRecord>,
}

impl RigData {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a document from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to JSON in the rigging tools' layout.
    pub fn to_json_string(&self) -> Result<String> {
        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, RigFileFormatter::new());
        self.serialize(&mut ser)?;
        String::from_utf8(buf).map_err(|e| RigError::invalid_config(e.to_string()))
    }

    /// Load a document from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let data = Self::from_json_str(&text)?;
        info!(path = %path.display(), groups = data.len(), "loaded rig data");
        Ok(data)
    }

    /// Write the document to a file, replacing it.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json_string()?)?;
        info!(path = %path.display(), groups = self.len(), "saved rig data");
        Ok(())
    }

    /// Insert or replace a group.
    pub fn insert(&mut self, name: impl Into<String>, record: MuscleGroupRecord) {
        self.groups.insert(name.into(), record);
    }

    /// Copy every group from `other`, replacing groups with the same name.
    pub fn merge(&mut self, other: Self) {
        self.groups.extend(other.groups);
    }

    /// Get a group by name.
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&MuscleGroupRecord> {
        self.groups.get(name)
    }

    /// Get a mutable group by name.
    #[must_use]
    pub fn group_mut(&mut self, name: &str) -> Option<&mut MuscleGroupRecord> {
        self.groups.get_mut(name)
    }

    /// Iterate over all groups, sorted by name.
    pub fn groups(&self) -> impl Iterator<Item = (&str, &MuscleGroupRecord)> {
        self.groups.iter().map(|(name, record)| (name.as_str(), record))
    }

    /// Groups whose tag names a known kind.
    ///
    /// Groups with unknown tags are logged and skipped.
    #[must_use]
    pub fn known_groups(&self) -> Vec<(&str, MuscleGroupKind, &MuscleGroupRecord)> {
        self.groups()
            .filter_map(|(name, record)| match record.kind() {
                Ok(kind) => Some((name, kind, record)),
                Err(err) => {
                    warn!(group = name, %err, "skipping muscle group");
                    None
                }
            })
            .collect()
    }

    /// Number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check if the document has no groups.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Mirror group `name` from side `from` and insert the result.
    ///
    /// Returns the mirrored group's name. Fails without touching the
    /// document when `name` carries no `from` prefix.
    pub fn mirror_group(&mut self, name: &str, axis: MirrorAxis, from: Side) -> Result<String> {
        let record = self.group(name).ok_or_else(|| RigError::GroupNotFound {
            name: name.to_string(),
        })?;
        let mirrored_name = mirror_name(name, from);
        if mirrored_name == name {
            return Err(RigError::NotSided {
                name: name.to_string(),
                prefix: from.prefix().to_string(),
            });
        }
        let mirrored = record.mirrored(axis, from);
        debug!(from = name, to = %mirrored_name, ?axis, "mirrored muscle group");
        self.insert(mirrored_name.clone(), mirrored);
        Ok(mirrored_name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pectoralis() -> MuscleGroupRecord {
        let mut record = MuscleGroupRecord::new(MuscleGroupKind::PectoralisGroup)
            .with_input("back3Joint", "back_03")
            .with_input("clavicleJoint", "L_clavicle")
            .with_input("upperarmJoint", "L_upperArm")
            .with_input("twist2Joint", "L_upperArm_twist2");
        record.insert_unit(&MuscleUnit::new(
            "L_pecA",
            Point3::new(2.0, 140.0, 8.0),
            Point3::new(14.0, 138.0, 3.0),
            Point3::new(8.0, 139.0, 6.0),
        ));
        record.insert_unit(&MuscleUnit::new(
            "L_pecB",
            Point3::new(1.0, 130.0, 9.0),
            Point3::new(14.0, 137.0, 3.0),
            Point3::new(7.0, 133.0, 7.0),
        ));
        record
    }

    #[test]
    fn test_units_in_order() {
        let units = pectoralis().units("L_pec").unwrap();
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].name, "L_pecA");
        assert_eq!(units[1].origin, Point3::new(1.0, 130.0, 9.0));
    }

    #[test]
    fn test_validate() {
        assert!(pectoralis().validate("L_pec").is_ok());

        let mut record = pectoralis();
        record.inputs.remove("twist2Joint");
        let err = record.validate("L_pec").unwrap_err();
        assert!(matches!(err, RigError::MissingInput { ref input, .. } if input == "twist2Joint"));

        let mut record = pectoralis();
        record.joints.remove("L_pecB_JOmuscle");
        let err = record.validate("L_pec").unwrap_err();
        assert!(matches!(err, RigError::IncompleteUnit { ref unit, .. } if unit == "L_pecB"));
    }

    #[test]
    fn test_json_layout() {
        let mut data = RigData::new();
        data.insert("L_pec", pectoralis());
        let json = data.to_json_string().unwrap();

        assert!(json.contains("\"Tag\":\"PectoralisGroup\""));
        assert!(json.contains("\n    \"L_pec\":{"));
        assert!(!json.contains("\": "));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let origin = &value["L_pec"]["L_pecA_muscleOrigin"];
        assert_eq!(origin[1].as_f64(), Some(140.0));
        assert_eq!(value["L_pec"]["inputs"]["back3Joint"], "back_03");
    }

    #[test]
    fn test_parse_without_inputs() {
        let json = r#"{"C_neck": {"Tag": "NeckGroup", "C_neckA_muscleOrigin": [0, 1, 2]}}"#;
        let data = RigData::from_json_str(json).unwrap();
        let record = data.group("C_neck").unwrap();
        assert!(record.inputs.is_empty());
        assert_eq!(record.position("C_neckA_muscleOrigin"), Some(Point3::new(0.0, 1.0, 2.0)));

        // Unknown tags survive parsing but are not offered as known groups.
        assert!(data.known_groups().is_empty());
    }

    #[test]
    fn test_malformed_json() {
        let err = RigData::from_json_str(r#"{"L_pec": {"Tag": 3}}"#).unwrap_err();
        assert!(err.is_data_error());
    }

    #[test]
    fn test_mirror_group() {
        let mut data = RigData::new();
        data.insert("L_pec", pectoralis());

        let name = data.mirror_group("L_pec", MirrorAxis::X, Side::Left).unwrap();
        assert_eq!(name, "R_pec");
        assert_eq!(data.len(), 2);

        let mirrored = data.group("R_pec").unwrap();
        assert_eq!(mirrored.input("clavicleJoint"), Some("R_clavicle"));
        assert_eq!(mirrored.input("back3Joint"), Some("back_03"));

        let units = mirrored.units("R_pec").unwrap();
        assert_relative_eq!(units[0].origin.x, -2.0);
        assert_relative_eq!(units[0].origin.y, 140.0);
        assert_relative_eq!(units[0].length(), pectoralis().units("L_pec").unwrap()[0].length());
    }

    #[test]
    fn test_json_writes_units_in_file_order() {
        let mut data = RigData::new();
        data.insert("L_pec", pectoralis().with_input("extraJoint", "spine"));
        let json = data.to_json_string().unwrap();

        let keys = [
            "\"L_pecA_muscleOrigin\":",
            "\"L_pecA_muscleInsertion\":",
            "\"L_pecA_JOmuscle\":",
            "\"L_pecB_muscleOrigin\":",
            "\"L_pecB_muscleInsertion\":",
            "\"L_pecB_JOmuscle\":",
            "\"Tag\":",
            "\"inputs\":",
            "\"back3Joint\":",
            "\"clavicleJoint\":",
            "\"upperarmJoint\":",
            "\"twist2Joint\":",
            "\"extraJoint\":",
        ];
        let offsets: Vec<usize> = keys.iter().map(|key| json.find(key).unwrap()).collect();
        assert!(offsets.windows(2).all(|pair| pair[0] < pair[1]), "{json}");

        assert_eq!(RigData::from_json_str(&json).unwrap(), data);
    }

    #[test]
    fn test_joint_order_puts_loose_joints_last() {
        let mut record = pectoralis();
        record.set_position("L_pec_extra", Point3::origin());
        let order = record.joint_order();
        assert_eq!(order[0], "L_pecA_muscleOrigin");
        assert_eq!(order[2], "L_pecA_JOmuscle");
        assert_eq!(order.last(), Some(&"L_pec_extra"));
    }

    #[test]
    fn test_mirror_unsided_group_is_rejected() {
        let mut data = RigData::new();
        data.insert("L_pec", pectoralis());

        let err = data
            .mirror_group("L_pec", MirrorAxis::X, Side::Right)
            .unwrap_err();
        assert!(matches!(err, RigError::NotSided { ref prefix, .. } if prefix == "R_"));
        assert_eq!(data.len(), 1);
        assert_eq!(
            data.group("L_pec").unwrap().position("L_pecA_muscleOrigin"),
            Some(Point3::new(2.0, 140.0, 8.0))
        );
        assert!(data.group("R_pec").is_none());
    }

    #[test]
    fn test_mirror_missing_group() {
        let mut data = RigData::new();
        let err = data.mirror_group("L_lats", MirrorAxis::X, Side::Left).unwrap_err();
        assert!(matches!(err, RigError::GroupNotFound { .. }));
    }

    #[test]
    fn test_merge_replaces() {
        let mut a = RigData::new();
        a.insert("L_pec", pectoralis());

        let mut b = RigData::new();
        b.insert("L_pec", MuscleGroupRecord::new(MuscleGroupKind::PectoralisGroup));
        b.insert("L_trap", MuscleGroupRecord::new(MuscleGroupKind::TrapGroup));

        a.merge(b);
        assert_eq!(a.len(), 2);
        assert!(a.group("L_pec").unwrap().joints.is_empty());
    }
}

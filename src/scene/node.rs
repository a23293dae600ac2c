//! Definitie van nodes binnen het scenedocument.

use std::collections::BTreeMap;

use super::NodePath;
use crate::math::Vec3;

/// Soorten nodes die het document kan bevatten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Xform,
    Scope,
    Camera,
    RectLight,
    Cube,
}

impl NodeKind {
    /// Geeft de naam van de soort terug. Wordt gebruikt in snapshots en
    /// foutmeldingen.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Xform => "Xform",
            Self::Scope => "Scope",
            Self::Camera => "Camera",
            Self::RectLight => "RectLight",
            Self::Cube => "Cube",
        }
    }
}

/// Getypeerde attribuutwaarde op een node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttrValue {
    Float(f32),
    Bool(bool),
}

impl AttrValue {
    #[must_use]
    pub const fn as_float(self) -> Option<f32> {
        if let Self::Float(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn as_bool(self) -> Option<bool> {
        if let Self::Bool(value) = self {
            Some(value)
        } else {
            None
        }
    }
}

impl From<f32> for AttrValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Transformatie-operatie op een node. Operaties worden toegepast in de
/// volgorde waarin ze aangemaakt zijn; rotatiehoeken zijn in graden.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum XformOp {
    /// Translatie. `None` betekent dat de operatie wel aangemaakt is maar
    /// nooit een waarde heeft gekregen; de node blijft dan op de oorsprong.
    Translate(Option<Vec3>),
    RotateX(f32),
    RotateY(f32),
    RotateZ(f32),
    Scale(Vec3),
}

/// Eén node in het scenedocument: een pad, een soort, een geordende lijst
/// transformatie-operaties en een verzameling getypeerde attributen.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    path: NodePath,
    kind: NodeKind,
    ops: Vec<XformOp>,
    attrs: BTreeMap<String, AttrValue>,
}

impl SceneNode {
    pub(super) fn new(path: NodePath, kind: NodeKind) -> Self {
        Self {
            path,
            kind,
            ops: Vec::new(),
            attrs: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &NodePath {
        &self.path
    }

    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Laatste padsegment van de node.
    #[must_use]
    pub fn name(&self) -> &str {
        self.path.leaf()
    }

    pub fn add_translate_op(&mut self, value: Option<Vec3>) {
        self.ops.push(XformOp::Translate(value));
    }

    pub fn add_rotate_x_op(&mut self, degrees: f32) {
        self.ops.push(XformOp::RotateX(degrees));
    }

    pub fn add_rotate_y_op(&mut self, degrees: f32) {
        self.ops.push(XformOp::RotateY(degrees));
    }

    pub fn add_rotate_z_op(&mut self, degrees: f32) {
        self.ops.push(XformOp::RotateZ(degrees));
    }

    pub fn add_scale_op(&mut self, value: Vec3) {
        self.ops.push(XformOp::Scale(value));
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        self.attrs.insert(name.into(), value.into());
    }

    #[must_use]
    pub fn attr(&self, name: &str) -> Option<AttrValue> {
        self.attrs.get(name).copied()
    }

    #[must_use]
    pub fn ops(&self) -> &[XformOp] {
        &self.ops
    }

    /// Attributen in vaste (alfabetische) volgorde.
    pub fn attrs(&self) -> impl Iterator<Item = (&str, AttrValue)> {
        self.attrs.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

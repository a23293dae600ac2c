//! Conversie van een geparst MPCDI-document naar een scenedocument.
//!
//! De wandeling volgt `display` → `buffer` → `region`: per buffer één
//! scope, per regio één camera met een `RectLight` en een `ProjectorBox`
//! eronder. Elke fout breekt de volledige conversie af; er wordt nooit een
//! gedeeltelijk document opgeleverd.

use std::fmt;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::frustum::{self, CoordinateFrame, RegionFrustum};
use crate::ident;
use crate::math::Vec3;
use crate::parse::mpcdi_xml::{self, RawBuffer, RawCoordinateFrame, RawFrustum, RawRegion};
use crate::scene::{NodeKind, NodePath, SceneDocument, SceneError};

/// Naam van de roottransform; tevens de default node van het document.
pub const ROOT_NODE_NAME: &str = "mpcdi_payload";

const LIGHT_NODE_NAME: &str = "RectLight";
const BOX_NODE_NAME: &str = "ProjectorBox";

/// Vaste afmetingen en lokale offset van de projectorbehuizing, in
/// scene-eenheden.
const PROJECTOR_BOX_SIZE: Vec3 = Vec3::new(50.0, 15.0, 40.0);
const PROJECTOR_BOX_OFFSET: Vec3 = Vec3::new(0.0, 0.0, 42.0);

/// Result type voor conversies.
pub type ReadResult<T> = Result<T, ReadError>;

/// Beschrijft fouten tijdens het lezen en converteren van een bestand.
#[derive(Debug, Error)]
pub enum ReadError {
    /// Het bestand kon niet gelezen worden.
    #[error("kan bestand niet lezen: {0}")]
    Io(#[from] std::io::Error),
    /// Het XML-document zelf is onleesbaar.
    #[error(transparent)]
    Parse(#[from] mpcdi_xml::ParseError),
    /// Een verplicht element ontbreekt.
    #[error("ontbrekend element `{element}` ({scope})")]
    MissingElement {
        element: &'static str,
        scope: Scope,
    },
    /// Een verplicht attribuut ontbreekt.
    #[error("ontbrekend attribuut `{attribute}` op `{element}` ({scope})")]
    MissingAttribute {
        attribute: &'static str,
        element: &'static str,
        scope: Scope,
    },
    /// De tekst van een element is geen leesbaar getal.
    #[error("ongeldige numerieke waarde `{text}` voor `{element}` ({scope})")]
    MalformedNumber {
        element: &'static str,
        text: String,
        scope: Scope,
    },
    /// Het document kon niet opgebouwd worden (bv. dubbel pad na
    /// naamopschoning).
    #[error(transparent)]
    Scene(#[from] SceneError),
    /// Terugschrijven naar het MPCDI-formaat wordt niet ondersteund.
    #[error("terugschrijven naar het MPCDI-formaat wordt niet ondersteund")]
    WriteUnsupported,
}

/// Buffer/regio-context voor diagnostiek.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    buffer: Option<String>,
    region: Option<String>,
}

impl Scope {
    fn buffer(id: &str) -> Self {
        Self {
            buffer: Some(id.to_owned()),
            region: None,
        }
    }

    fn region(buffer_id: &str, region_id: &str) -> Self {
        Self {
            buffer: Some(buffer_id.to_owned()),
            region: Some(region_id.to_owned()),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.buffer.as_deref(), self.region.as_deref()) {
            (None, _) => f.write_str("display"),
            (Some(buffer), None) => write!(f, "buffer `{buffer}`"),
            (Some(buffer), Some(region)) => {
                write!(f, "buffer `{buffer}`, regio `{region}`")
            }
        }
    }
}

/// Leest een MPCDI-bestand van schijf en bouwt er een scenedocument uit op.
pub fn read_file(path: impl AsRef<Path>) -> ReadResult<SceneDocument> {
    let contents = fs::read_to_string(path)?;
    read_str(&contents)
}

/// Converteert de XML-inhoud van een MPCDI-bestand naar een scenedocument.
pub fn read_str(input: &str) -> ReadResult<SceneDocument> {
    let raw = mpcdi_xml::parse_str(input)?;
    let display = raw.display.as_ref().ok_or(ReadError::MissingElement {
        element: "display",
        scope: Scope::default(),
    })?;

    let mut document = SceneDocument::new();
    let root_path = NodePath::root(ROOT_NODE_NAME);
    document.define_node(root_path.clone(), NodeKind::Xform)?;
    document.set_default_node(root_path.clone());

    for buffer in &display.buffers {
        emit_buffer(&mut document, &root_path, buffer)?;
    }

    log::debug!("MPCDI document geconverteerd: {} nodes", document.node_count());
    Ok(document)
}

fn emit_buffer(
    document: &mut SceneDocument,
    root_path: &NodePath,
    buffer: &RawBuffer,
) -> ReadResult<()> {
    let buffer_id = buffer.id.as_deref().ok_or(ReadError::MissingAttribute {
        attribute: "id",
        element: "buffer",
        scope: Scope::default(),
    })?;

    let buffer_path = root_path.append(&ident::sanitize(buffer_id));
    document.define_node(buffer_path.clone(), NodeKind::Scope)?;

    for region in &buffer.regions {
        emit_region(document, &buffer_path, buffer_id, region)?;
    }

    Ok(())
}

fn emit_region(
    document: &mut SceneDocument,
    buffer_path: &NodePath,
    buffer_id: &str,
    region: &RawRegion,
) -> ReadResult<()> {
    let region_id = region.id.as_deref().ok_or_else(|| ReadError::MissingAttribute {
        attribute: "id",
        element: "region",
        scope: Scope::buffer(buffer_id),
    })?;
    let scope = Scope::region(buffer_id, region_id);

    let frustum = extract_frustum(region.frustum.as_ref(), &scope)?;
    let frame = extract_coordinate_frame(region.coordinate_frame.as_ref(), &scope)?;

    let (degenerate_h, degenerate_v) = frustum.degenerate_axes();
    if degenerate_h {
        log::warn!(
            "gedegenereerd frustum ({scope}): leftAngle en rightAngle hebben \
             dezelfde tangens, lens shift is niet gedefinieerd"
        );
    }
    if degenerate_v {
        log::warn!(
            "gedegenereerd frustum ({scope}): upAngle en downAngle hebben \
             dezelfde tangens, lens shift is niet gedefinieerd"
        );
    }

    let (camera, light, transform) = frustum::compute_camera(&frustum, &frame);

    let region_path = buffer_path.append(&ident::sanitize(region_id));

    let camera_node = document.define_node(region_path.clone(), NodeKind::Camera)?;
    camera_node.add_translate_op(Some(transform.translate));
    camera_node.add_rotate_y_op(transform.rotate_y);
    camera_node.add_rotate_x_op(transform.rotate_x);
    camera_node.add_rotate_z_op(transform.rotate_z);
    camera_node.set_attr("focalLength", camera.focal_length);
    camera_node.set_attr("focusDistance", camera.focus_distance);
    camera_node.set_attr("horizontalAperture", camera.horizontal_aperture);
    camera_node.set_attr("horizontalApertureOffset", camera.horizontal_aperture_offset);
    camera_node.set_attr("verticalAperture", camera.vertical_aperture);
    camera_node.set_attr("verticalApertureOffset", camera.vertical_aperture_offset);

    let light_node = document.define_node(region_path.append(LIGHT_NODE_NAME), NodeKind::RectLight)?;
    // De translate-operatie krijgt bewust geen waarde; het licht blijft op
    // de oorsprong staan. TODO: nagaan of het licht de berekende
    // camerapositie moet overnemen.
    light_node.add_translate_op(None);
    light_node.set_attr("width", light.width);
    light_node.set_attr("height", light.height);
    light_node.set_attr("isProjector", light.is_projector);
    light_node.set_attr("exposure", light.exposure);
    light_node.set_attr("intensity", light.intensity);

    let box_node = document.define_node(region_path.append(BOX_NODE_NAME), NodeKind::Cube)?;
    box_node.add_translate_op(Some(PROJECTOR_BOX_OFFSET));
    box_node.add_scale_op(PROJECTOR_BOX_SIZE);

    Ok(())
}

fn extract_frustum(raw: Option<&RawFrustum>, scope: &Scope) -> ReadResult<RegionFrustum> {
    let raw = raw.ok_or_else(|| ReadError::MissingElement {
        element: "frustum",
        scope: scope.clone(),
    })?;

    Ok(RegionFrustum {
        yaw: extract_float(raw.yaw.as_deref(), "yaw", scope)?,
        pitch: extract_float(raw.pitch.as_deref(), "pitch", scope)?,
        roll: extract_float(raw.roll.as_deref(), "roll", scope)?,
        right_angle: extract_float(raw.right_angle.as_deref(), "rightAngle", scope)?,
        left_angle: extract_float(raw.left_angle.as_deref(), "leftAngle", scope)?,
        up_angle: extract_float(raw.up_angle.as_deref(), "upAngle", scope)?,
        down_angle: extract_float(raw.down_angle.as_deref(), "downAngle", scope)?,
    })
}

fn extract_coordinate_frame(
    raw: Option<&RawCoordinateFrame>,
    scope: &Scope,
) -> ReadResult<CoordinateFrame> {
    let raw = raw.ok_or_else(|| ReadError::MissingElement {
        element: "coordinateFrame",
        scope: scope.clone(),
    })?;

    Ok(CoordinateFrame {
        position: Vec3::new(
            extract_float(raw.posx.as_deref(), "posx", scope)?,
            extract_float(raw.posy.as_deref(), "posy", scope)?,
            extract_float(raw.posz.as_deref(), "posz", scope)?,
        ),
        yaw: Vec3::new(
            extract_float(raw.yawx.as_deref(), "yawx", scope)?,
            extract_float(raw.yawy.as_deref(), "yawy", scope)?,
            extract_float(raw.yawz.as_deref(), "yawz", scope)?,
        ),
        pitch: Vec3::new(
            extract_float(raw.pitchx.as_deref(), "pitchx", scope)?,
            extract_float(raw.pitchy.as_deref(), "pitchy", scope)?,
            extract_float(raw.pitchz.as_deref(), "pitchz", scope)?,
        ),
        roll: Vec3::new(
            extract_float(raw.rollx.as_deref(), "rollx", scope)?,
            extract_float(raw.rolly.as_deref(), "rolly", scope)?,
            extract_float(raw.rollz.as_deref(), "rollz", scope)?,
        ),
    })
}

/// Leest de tekst van een verplicht kindelement als `f32`. Alleen gewone
/// decimale notatie; geen locale-afhankelijke scheidingstekens.
fn extract_float(text: Option<&str>, element: &'static str, scope: &Scope) -> ReadResult<f32> {
    let text = text.ok_or_else(|| ReadError::MissingElement {
        element,
        scope: scope.clone(),
    })?;

    let trimmed = text.trim();
    trimmed
        .parse::<f32>()
        .map_err(|_| ReadError::MalformedNumber {
            element,
            text: trimmed.to_owned(),
            scope: scope.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::{ReadError, read_str};
    use crate::scene::{AttrValue, NodeKind, XformOp};

    const SINGLE_REGION: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<MPCDI version="2.0">
  <display>
    <buffer id="B1">
      <region id="0">
        <frustum>
          <yaw>10</yaw>
          <pitch>0</pitch>
          <roll>0</roll>
          <rightAngle>20</rightAngle>
          <leftAngle>-20</leftAngle>
          <upAngle>15</upAngle>
          <downAngle>-15</downAngle>
        </frustum>
        <coordinateFrame>
          <posx>0</posx>
          <posy>0</posy>
          <posz>0</posz>
          <yawx>0</yawx>
          <yawy>1</yawy>
          <yawz>0</yawz>
          <pitchx>1</pitchx>
          <pitchy>0</pitchy>
          <pitchz>0</pitchz>
          <rollx>0</rollx>
          <rolly>0</rolly>
          <rollz>1</rollz>
        </coordinateFrame>
      </region>
    </buffer>
  </display>
</MPCDI>
"#;

    #[test]
    fn emits_the_expected_node_tree() {
        let document = read_str(SINGLE_REGION).expect("document geconverteerd");

        assert_eq!(document.node_count(), 5);
        assert_eq!(
            document.default_node().map(|path| path.as_str()),
            Some("/mpcdi_payload")
        );

        assert_eq!(
            document.node("/mpcdi_payload").map(|node| node.kind()),
            Some(NodeKind::Xform)
        );
        assert_eq!(
            document.node("/mpcdi_payload/B1").map(|node| node.kind()),
            Some(NodeKind::Scope)
        );
        assert_eq!(
            document.node("/mpcdi_payload/B1/_0").map(|node| node.kind()),
            Some(NodeKind::Camera)
        );
        assert_eq!(
            document
                .node("/mpcdi_payload/B1/_0/RectLight")
                .map(|node| node.kind()),
            Some(NodeKind::RectLight)
        );
        assert_eq!(
            document
                .node("/mpcdi_payload/B1/_0/ProjectorBox")
                .map(|node| node.kind()),
            Some(NodeKind::Cube)
        );
    }

    #[test]
    fn camera_carries_lens_attributes_and_ops() {
        let document = read_str(SINGLE_REGION).expect("document geconverteerd");
        let camera = document.node("/mpcdi_payload/B1/_0").expect("camera node");

        let float_attr = |name: &str| {
            camera
                .attr(name)
                .and_then(AttrValue::as_float)
                .unwrap_or_else(|| panic!("attribuut {name} ontbreekt"))
        };

        assert_eq!(float_attr("focalLength"), 10.0);
        assert_eq!(float_attr("focusDistance"), 2000.0);
        assert!(float_attr("horizontalApertureOffset").abs() < 1e-6);
        assert!(float_attr("verticalApertureOffset").abs() < 1e-6);

        let expected_h = 2.0 * 20.0_f32.to_radians().tan() * 10.0;
        let expected_v = 2.0 * 15.0_f32.to_radians().tan() * 10.0;
        assert!((float_attr("horizontalAperture") - expected_h).abs() < 1e-5);
        assert!((float_attr("verticalAperture") - expected_v).abs() < 1e-5);

        match camera.ops() {
            [
                XformOp::Translate(Some(translate)),
                XformOp::RotateY(yaw),
                XformOp::RotateX(pitch),
                XformOp::RotateZ(roll),
            ] => {
                assert_eq!(translate.to_array(), [0.0, 0.0, 0.0]);
                assert_eq!(*yaw, -10.0);
                assert_eq!(*pitch, 0.0);
                assert_eq!(*roll, 0.0);
            }
            other => panic!("onverwachte operatievolgorde: {other:?}"),
        }
    }

    #[test]
    fn light_translate_op_stays_without_value() {
        let document = read_str(SINGLE_REGION).expect("document geconverteerd");
        let light = document
            .node("/mpcdi_payload/B1/_0/RectLight")
            .expect("light node");

        assert_eq!(light.ops(), [XformOp::Translate(None)]);
        assert_eq!(
            light.attr("isProjector").and_then(AttrValue::as_bool),
            Some(true)
        );
        assert_eq!(
            light.attr("exposure").and_then(AttrValue::as_float),
            Some(5.0)
        );
        assert_eq!(
            light.attr("intensity").and_then(AttrValue::as_float),
            Some(15000.0)
        );
    }

    #[test]
    fn projector_box_gets_offset_then_size() {
        let document = read_str(SINGLE_REGION).expect("document geconverteerd");
        let cube = document
            .node("/mpcdi_payload/B1/_0/ProjectorBox")
            .expect("cube node");

        match cube.ops() {
            [XformOp::Translate(Some(offset)), XformOp::Scale(size)] => {
                assert_eq!(offset.to_array(), [0.0, 0.0, 42.0]);
                assert_eq!(size.to_array(), [50.0, 15.0, 40.0]);
            }
            other => panic!("onverwachte operaties op de projectorbox: {other:?}"),
        }
    }

    #[test]
    fn missing_display_is_an_error() {
        let err = read_str("<MPCDI><anders/></MPCDI>").unwrap_err();
        assert!(matches!(
            err,
            ReadError::MissingElement {
                element: "display",
                ..
            }
        ));
    }

    #[test]
    fn missing_frustum_names_the_region() {
        let xml = r#"<MPCDI><display><buffer id="B1">
            <region id="R7"><coordinateFrame/></region>
        </buffer></display></MPCDI>"#;

        let err = read_str(xml).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("frustum"), "melding: {message}");
        assert!(message.contains("R7"), "melding: {message}");
    }

    #[test]
    fn malformed_number_names_the_field_and_text() {
        let xml = r#"<MPCDI><display><buffer id="B1">
            <region id="0">
              <frustum>
                <yaw>0</yaw><pitch>0</pitch><roll>0</roll>
                <rightAngle>abc</rightAngle>
                <leftAngle>-20</leftAngle>
                <upAngle>15</upAngle>
                <downAngle>-15</downAngle>
              </frustum>
              <coordinateFrame/>
            </region>
        </buffer></display></MPCDI>"#;

        let err = read_str(xml).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("rightAngle"), "melding: {message}");
        assert!(message.contains("abc"), "melding: {message}");
    }

    #[test]
    fn missing_buffer_id_is_an_error() {
        let xml = "<MPCDI><display><buffer/></display></MPCDI>";
        let err = read_str(xml).unwrap_err();
        assert!(matches!(
            err,
            ReadError::MissingAttribute {
                attribute: "id",
                element: "buffer",
                ..
            }
        ));
    }

    #[test]
    fn duplicate_sanitized_buffer_ids_abort_the_read() {
        let xml = r#"<MPCDI><display>
            <buffer id="a b"/>
            <buffer id="a-b"/>
        </display></MPCDI>"#;

        let err = read_str(xml).unwrap_err();
        assert!(err.to_string().contains("a_b"), "melding: {err}");
    }

    #[test]
    fn empty_display_produces_only_the_payload_root() {
        let document = read_str("<MPCDI><display/></MPCDI>").expect("document geconverteerd");
        assert_eq!(document.node_count(), 1);
    }
}

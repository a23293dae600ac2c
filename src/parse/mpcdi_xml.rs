//! Parser voor MPCDI XML-bestanden.
//!
//! Dit niveau leest alleen de rauwe elementboom in; numerieke bladwaarden
//! blijven strings zodat ontbrekende of onleesbare waarden later met
//! buffer/regio-context gemeld kunnen worden.

use quick_xml::de::from_str;
use serde::Deserialize;
use thiserror::Error;

/// Result type voor parsing van MPCDI-bestanden.
pub type ParseResult<T> = Result<T, ParseError>;

/// Beschrijft fouten tijdens het parsen.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Het XML-document kon niet gede-serialiseerd worden.
    #[error("XML parsefout: {0}")]
    Xml(#[from] quick_xml::DeError),
}

/// Leest een MPCDI-document in. De naam van het wortelelement is vrij;
/// alleen de inhoud (`display` → `buffer` → `region`) telt.
pub fn parse_str(input: &str) -> ParseResult<RawMpcdi> {
    log::debug!("start parsing MPCDI document");
    let document: RawMpcdi = from_str(input)?;

    if let Some(display) = document.display.as_ref() {
        let region_count: usize = display
            .buffers
            .iter()
            .map(|buffer| buffer.regions.len())
            .sum();
        log::debug!(
            "found {} buffers, {} regions",
            display.buffers.len(),
            region_count
        );
    }

    Ok(document)
}

/// Rauwe inhoud van het wortelelement.
#[derive(Debug, Default, Deserialize)]
pub struct RawMpcdi {
    #[serde(default)]
    pub display: Option<RawDisplay>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawDisplay {
    #[serde(default, rename = "buffer")]
    pub buffers: Vec<RawBuffer>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawBuffer {
    #[serde(default, rename = "@id")]
    pub id: Option<String>,
    #[serde(default, rename = "region")]
    pub regions: Vec<RawRegion>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawRegion {
    #[serde(default, rename = "@id")]
    pub id: Option<String>,
    #[serde(default)]
    pub frustum: Option<RawFrustum>,
    #[serde(default, rename = "coordinateFrame")]
    pub coordinate_frame: Option<RawCoordinateFrame>,
}

/// Frustumwaarden zoals ze in het bestand staan; validatie gebeurt bij de
/// conversie.
#[derive(Debug, Default, Deserialize)]
pub struct RawFrustum {
    #[serde(default)]
    pub yaw: Option<String>,
    #[serde(default)]
    pub pitch: Option<String>,
    #[serde(default)]
    pub roll: Option<String>,
    #[serde(default, rename = "rightAngle")]
    pub right_angle: Option<String>,
    #[serde(default, rename = "leftAngle")]
    pub left_angle: Option<String>,
    #[serde(default, rename = "upAngle")]
    pub up_angle: Option<String>,
    #[serde(default, rename = "downAngle")]
    pub down_angle: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawCoordinateFrame {
    #[serde(default)]
    pub posx: Option<String>,
    #[serde(default)]
    pub posy: Option<String>,
    #[serde(default)]
    pub posz: Option<String>,
    #[serde(default)]
    pub yawx: Option<String>,
    #[serde(default)]
    pub yawy: Option<String>,
    #[serde(default)]
    pub yawz: Option<String>,
    #[serde(default)]
    pub pitchx: Option<String>,
    #[serde(default)]
    pub pitchy: Option<String>,
    #[serde(default)]
    pub pitchz: Option<String>,
    #[serde(default)]
    pub rollx: Option<String>,
    #[serde(default)]
    pub rolly: Option<String>,
    #[serde(default)]
    pub rollz: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::parse_str;

    #[test]
    fn parses_a_minimal_document() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<MPCDI version="2.0">
  <display>
    <buffer id="B1">
      <region id="0">
        <frustum>
          <yaw>10</yaw>
          <rightAngle>20</rightAngle>
        </frustum>
        <coordinateFrame>
          <posx>0.5</posx>
        </coordinateFrame>
      </region>
    </buffer>
  </display>
</MPCDI>
"#;

        let document = parse_str(xml).expect("document parsed");
        let display = document.display.expect("display aanwezig");
        assert_eq!(display.buffers.len(), 1);

        let buffer = &display.buffers[0];
        assert_eq!(buffer.id.as_deref(), Some("B1"));
        assert_eq!(buffer.regions.len(), 1);

        let region = &buffer.regions[0];
        assert_eq!(region.id.as_deref(), Some("0"));

        let frustum = region.frustum.as_ref().expect("frustum aanwezig");
        assert_eq!(frustum.yaw.as_deref(), Some("10"));
        assert_eq!(frustum.right_angle.as_deref(), Some("20"));
        assert_eq!(frustum.left_angle, None);

        let frame = region
            .coordinate_frame
            .as_ref()
            .expect("coordinateFrame aanwezig");
        assert_eq!(frame.posx.as_deref(), Some("0.5"));
    }

    #[test]
    fn root_element_name_is_free() {
        let xml = "<anything><display><buffer id=\"a\"/></display></anything>";
        let document = parse_str(xml).expect("document parsed");
        assert_eq!(document.display.expect("display").buffers.len(), 1);
    }

    #[test]
    fn missing_display_parses_to_none() {
        let xml = "<MPCDI><somethingElse/></MPCDI>";
        let document = parse_str(xml).expect("document parsed");
        assert!(document.display.is_none());
    }

    #[test]
    fn malformed_xml_is_a_parse_error() {
        let xml = "<MPCDI><display></MPCDI>";
        assert!(parse_str(xml).is_err());
    }
}

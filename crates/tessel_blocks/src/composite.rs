//! Composite blocks whose ports are inferred from a nested sub-circuit.
//!
//! The sub-circuit comes from a project file loaded elsewhere. Only the parts
//! needed to expose ports are typed here; everything else is carried through
//! as opaque JSON.

use crate::builder::BlockBuilder;
use crate::descriptor::{
    BlockDescriptor, BlockKind, GenericData, ImageRef, ImplicitInput, PortSpec, Ports, Position,
    Size,
};
use crate::error::{BlockError, BlockResult};
use crate::label::BitRange;
use crate::unique::check_unique;
use serde::Deserialize;
use std::collections::BTreeMap;

/// A composite block definition as stored in a project file.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CompositeSource {
    /// Package metadata.
    #[serde(default)]
    pub package: PackageMeta,
    /// The nested design, absent in malformed files.
    #[serde(default)]
    pub design: Option<CompositeDesign>,
}

/// Package metadata of a composite.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PackageMeta {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Tooltip text.
    #[serde(default)]
    pub description: String,
    /// Embedded image, plain or percent-encoded SVG.
    #[serde(default)]
    pub image: Option<String>,
}

/// The nested design of a composite.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CompositeDesign {
    /// Blocks and wires of the sub-circuit.
    #[serde(default)]
    pub graph: Option<Graph>,
    /// Opaque configuration map.
    #[serde(default)]
    pub config: BTreeMap<String, serde_json::Value>,
    /// Opaque pull-up map.
    #[serde(default)]
    pub pullup: BTreeMap<String, serde_json::Value>,
}

/// Blocks and wires of a sub-circuit.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Graph {
    /// Inner blocks.
    #[serde(default)]
    pub blocks: Option<Vec<InnerBlock>>,
    /// Inner wires, not interpreted.
    #[serde(default)]
    pub wires: Option<Vec<serde_json::Value>>,
}

/// One block of a sub-circuit.
#[derive(Clone, Debug, Deserialize)]
pub struct InnerBlock {
    /// Block id, used as the exposed port id.
    pub id: String,
    /// Type tag such as `basic.input`.
    #[serde(rename = "type")]
    pub type_name: String,
    /// The fields of the inner block that affect the exposed ports.
    #[serde(default)]
    pub data: InnerData,
}

/// The fields of an inner block that affect the exposed ports.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct InnerData {
    /// Port or parameter name.
    #[serde(default)]
    pub name: String,
    /// Range text, e.g. `[7:0]`.
    #[serde(default)]
    pub range: Option<String>,
    /// Pin list; only its length matters here.
    #[serde(default)]
    pub pins: Option<Vec<serde_json::Value>>,
    /// Width fallback when there is no pin list.
    #[serde(default)]
    pub size: Option<u32>,
    /// Clock flag of inputs.
    #[serde(default)]
    pub clock: bool,
    /// Local parameters stay hidden.
    #[serde(default)]
    pub local: bool,
}

impl InnerData {
    fn width(&self) -> u32 {
        match &self.pins {
            Some(pins) => u32::try_from(pins.len()).unwrap_or(u32::MAX),
            None => self.size.unwrap_or(1),
        }
    }

    fn has_range(&self) -> bool {
        self.range.as_deref().is_some_and(|range| !range.is_empty())
    }

    fn port(&self, id: &str) -> PortSpec {
        let range_text = self.range.as_deref().unwrap_or_default();
        PortSpec {
            id: id.to_string(),
            name: self.name.clone(),
            label: format!("{}{range_text}", self.name),
            size: self.width(),
            range: range_text.parse::<BitRange>().ok(),
            clock: self.clock,
        }
    }
}

impl CompositeSource {
    /// Parses a project file's JSON text.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    fn blocks(&self, type_name: &str) -> BlockResult<(&[InnerBlock], &CompositeDesign)> {
        let malformed = |missing| BlockError::MalformedComposite {
            kind: type_name.to_string(),
            missing,
        };
        let design = self.design.as_ref().ok_or_else(|| malformed("design"))?;
        let graph = design.graph.as_ref().ok_or_else(|| malformed("design.graph"))?;
        let blocks = graph
            .blocks
            .as_deref()
            .ok_or_else(|| malformed("design.graph.blocks"))?;
        if graph.wires.is_none() {
            return Err(malformed("design.graph.wires"));
        }
        Ok((blocks, design))
    }
}

/// Size of a composite from the number of ports per edge.
pub fn composite_size(ports: &Ports, unit: i32) -> Size {
    let unit = u32::try_from(unit).unwrap_or(0);
    let across = ports.top.len().max(ports.bottom.len());
    let down = ports.left.len().max(ports.right.len());
    let span = |count: usize, minimum: u32| {
        let count = u32::try_from(count).unwrap_or(u32::MAX);
        unit.saturating_mul(4)
            .saturating_mul(count)
            .max(unit.saturating_mul(minimum))
    };
    Size::new(span(across, 12), span(down, 8))
}

/// Extracts the SVG markup of a package image, if it has one.
fn decode_image(image: &str) -> Option<String> {
    if image.starts_with("%3Csvg") {
        Some(percent_decode(image))
    } else if image.starts_with("<svg") {
        Some(image.to_string())
    } else {
        None
    }
}

fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut index = 0;
    while index < bytes.len() {
        if bytes[index] == b'%' && index + 2 < bytes.len() {
            let high = hex_nibble(bytes[index + 1]);
            let low = hex_nibble(bytes[index + 2]);
            if let (Some(high), Some(low)) = (high, low) {
                decoded.push((high << 4) | low);
                index += 3;
                continue;
            }
        }
        decoded.push(bytes[index]);
        index += 1;
    }
    String::from_utf8_lossy(&decoded).into_owned()
}

const fn hex_nibble(value: u8) -> Option<u8> {
    match value {
        b'0'..=b'9' => Some(value - b'0'),
        b'a'..=b'f' => Some(value - b'a' + 10),
        b'A'..=b'F' => Some(value - b'A' + 10),
        _ => None,
    }
}

impl BlockBuilder {
    /// Builds a composite block from its source definition.
    ///
    /// Inner inputs become left ports, inner outputs right ports and
    /// non-local constants and memories top ports. `pinned` overrides the
    /// computed size.
    pub fn new_generic(
        &self,
        type_name: &str,
        source: &CompositeSource,
        position: Position,
        pinned: Option<Size>,
    ) -> BlockResult<BlockDescriptor> {
        let (blocks, design) = source.blocks(type_name)?;

        let mut ports = Ports::default();
        let mut implicit_inputs = Vec::new();
        for block in blocks {
            let data = &block.data;
            match block.type_name.as_str() {
                "basic.input" => {
                    if !data.has_range() {
                        implicit_inputs.push(ImplicitInput {
                            name: block.id.clone(),
                            default: self.rules().default_for_input(&data.name, data.clock),
                        });
                    }
                    ports.left.push(data.port(&block.id));
                }
                "basic.output" => {
                    let mut port = data.port(&block.id);
                    port.clock = false;
                    ports.right.push(port);
                }
                "basic.constant" | "basic.memory" if !data.local => {
                    ports.top.push(PortSpec {
                        id: block.id.clone(),
                        name: data.name.clone(),
                        label: data.name.clone(),
                        size: 1,
                        range: None,
                        clock: false,
                    });
                }
                _ => {}
            }
        }
        check_unique(ports.iter().map(|(_, port)| port.id.as_str()))?;

        let image = source
            .package
            .image
            .as_deref()
            .and_then(decode_image)
            .filter(|svg| !svg.is_empty())
            .map(ImageRef::new);
        let size = pinned.unwrap_or_else(|| composite_size(&ports, self.unit()));
        log::debug!(
            "composite {type_name}: {} left, {} right, {} top port(s), {}x{}",
            ports.left.len(),
            ports.right.len(),
            ports.top.len(),
            size.width,
            size.height
        );

        let data = GenericData {
            type_name: type_name.to_string(),
            label: source.package.name.clone(),
            tooltip: self.translate(&source.package.description),
            image,
            config: design.config.clone(),
            pullup: design.pullup.clone(),
            implicit_inputs,
        };
        Ok(BlockDescriptor {
            id: None,
            kind: BlockKind::Generic(Box::new(data)),
            position,
            size: Some(size),
            ports,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::BuildSettings;
    use crate::rules::BoardRules;
    use tessel_config::InputRuleDef;

    const ADDER: &str = r#"{
        "package": { "name": "Adder", "description": "Adds two numbers", "image": "%3Csvg%3E%3C/svg%3E" },
        "design": {
            "config": { "freq": 12 },
            "graph": {
                "blocks": [
                    { "id": "i1", "type": "basic.input", "data": { "name": "a", "range": "[3:0]", "pins": [{}, {}, {}, {}] } },
                    { "id": "i2", "type": "basic.input", "data": { "name": "ck", "clock": true } },
                    { "id": "o1", "type": "basic.output", "data": { "name": "sum", "range": "[3:0]", "size": 4 } },
                    { "id": "k1", "type": "basic.constant", "data": { "name": "N" } },
                    { "id": "k2", "type": "basic.constant", "data": { "name": "L", "local": true } },
                    { "id": "c1", "type": "basic.code", "data": {} }
                ],
                "wires": []
            }
        }
    }"#;

    fn generic(block: &BlockDescriptor) -> &GenericData {
        match &block.kind {
            BlockKind::Generic(data) => data,
            other => panic!("not a composite: {other:?}"),
        }
    }

    #[test]
    fn exposes_inner_ports() {
        let source = CompositeSource::from_json(ADDER).unwrap();
        let block = BlockBuilder::default()
            .new_generic("adder", &source, Position::default(), None)
            .unwrap();
        assert_eq!(block.ports.left.len(), 2);
        assert_eq!(block.ports.left[0].label, "a[3:0]");
        assert_eq!(block.ports.left[0].size, 4);
        assert!(block.ports.left[1].clock);
        assert_eq!(block.ports.right[0].id, "o1");
        assert_eq!(block.ports.right[0].size, 4);
        assert_eq!(block.ports.top.len(), 1);
        assert_eq!(block.ports.top[0].id, "k1");
        assert_eq!(block.type_name(), "adder");
    }

    #[test]
    fn computes_size_from_port_counts() {
        let source = CompositeSource::from_json(ADDER).unwrap();
        let block = BlockBuilder::default()
            .new_generic("adder", &source, Position::default(), None)
            .unwrap();
        // one top port: max(32, 96); two left ports: max(64, 64)
        assert_eq!(block.size, Some(Size::new(96, 64)));

        let pinned = Size::new(200, 100);
        let block = BlockBuilder::default()
            .new_generic("adder", &source, Position::default(), Some(pinned))
            .unwrap();
        assert_eq!(block.size, Some(pinned));
    }

    #[test]
    fn size_grows_with_ports() {
        let ports = Ports {
            left: vec![PortSpec::named("a", None, 1); 5],
            top: vec![PortSpec::named("n", None, 1); 4],
            ..Ports::default()
        };
        assert_eq!(composite_size(&ports, 8), Size::new(128, 160));
    }

    #[test]
    fn implicit_inputs_use_clock_rule() {
        let settings = BuildSettings {
            rules: BoardRules::new(vec![InputRuleDef {
                port: "clk".into(),
                pin: "21".into(),
            }]),
            ..BuildSettings::default()
        };
        let source = CompositeSource::from_json(ADDER).unwrap();
        let block = BlockBuilder::new(settings)
            .new_generic("adder", &source, Position::default(), None)
            .unwrap();
        let implicit = &generic(&block).implicit_inputs;
        assert_eq!(implicit.len(), 1);
        assert_eq!(implicit[0].name, "i2");
        assert_eq!(implicit[0].default.as_ref().map(|hint| hint.port.as_str()), Some("clk"));
    }

    #[test]
    fn metadata_passes_through() {
        let source = CompositeSource::from_json(ADDER).unwrap();
        let block = BlockBuilder::default()
            .new_generic("adder", &source, Position::new(16, 24), None)
            .unwrap();
        let data = generic(&block);
        assert_eq!(data.label, "Adder");
        assert_eq!(data.tooltip, "Adds two numbers");
        assert_eq!(data.config["freq"], 12);
        let image = data.image.as_ref().unwrap();
        assert_eq!(image.svg, "<svg></svg>");
        assert_eq!(block.position, Position::new(16, 24));
    }

    #[test]
    fn missing_sections_are_reported() {
        let cases = [
            (r#"{"package": {}}"#, "design"),
            (r#"{"design": {}}"#, "design.graph"),
            (r#"{"design": {"graph": {"wires": []}}}"#, "design.graph.blocks"),
            (r#"{"design": {"graph": {"blocks": []}}}"#, "design.graph.wires"),
        ];
        for (json, expected) in cases {
            let source = CompositeSource::from_json(json).unwrap();
            let err = BlockBuilder::default()
                .new_generic("x", &source, Position::default(), None)
                .unwrap_err();
            assert_eq!(
                err,
                BlockError::MalformedComposite {
                    kind: "x".into(),
                    missing: expected
                }
            );
        }
    }

    #[test]
    fn shared_inner_ids_are_duplicates() {
        let json = r#"{
            "design": {
                "graph": {
                    "blocks": [
                        { "id": "p1", "type": "basic.input", "data": { "name": "a" } },
                        { "id": "p1", "type": "basic.output", "data": { "name": "y" } }
                    ],
                    "wires": []
                }
            }
        }"#;
        let source = CompositeSource::from_json(json).unwrap();
        let err = BlockBuilder::default()
            .new_generic("broken", &source, Position::default(), None)
            .unwrap_err();
        assert_eq!(err, BlockError::DuplicateName { name: "p1".into() });
    }

    #[test]
    fn image_formats() {
        assert_eq!(decode_image("<svg/>").as_deref(), Some("<svg/>"));
        assert_eq!(decode_image("%3Csvg%20a%3D%221%22/%3E").as_deref(), Some("<svg a=\"1\"/>"));
        assert_eq!(decode_image("data:image/png;base64,AAAA"), None);
    }

    #[test]
    fn percent_decode_keeps_stray_percent() {
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("%4"), "%4");
        assert_eq!(percent_decode("%41"), "A");
        assert_eq!(percent_decode("%zz"), "%zz");
    }
}

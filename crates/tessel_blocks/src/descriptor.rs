//! Block descriptors handed to the rendering layer.
//!
//! A [`BlockDescriptor`] is an immutable value: the builder creates a new one
//! for every creation or edit, and the caller decides whether to patch an
//! existing visual object with it or swap the object out.

use crate::label::BitRange;
use crate::pins::Pin;
use crate::rules::DefaultHint;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tessel_common::ContentHash;

/// Port id of an input block's single output connector.
pub const INPUT_PORT_ID: &str = "out";
/// Port id of an output block's single input connector.
pub const OUTPUT_PORT_ID: &str = "in";
/// Port id of an input label's connector.
pub const INPUT_LABEL_PORT_ID: &str = "inlabel";
/// Port id of an output label's connector.
pub const OUTPUT_LABEL_PORT_ID: &str = "outlabel";
/// Port id of a constant block's connector.
pub const CONSTANT_PORT_ID: &str = "constant-out";
/// Port id of a memory block's connector.
pub const MEMORY_PORT_ID: &str = "memory-out";

/// Top-left anchor of a block, in layout units times the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
}

impl Position {
    /// Creates a position.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The same position moved down by `dy`.
    pub fn shifted_y(self, dy: i32) -> Self {
        Self {
            x: self.x,
            y: self.y.saturating_add(dy),
        }
    }
}

/// Block dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    /// Horizontal extent.
    pub width: u32,
    /// Vertical extent.
    pub height: u32,
}

impl Size {
    /// Creates a size.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// The edge of a block a port sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Inputs.
    Left,
    /// Outputs.
    Right,
    /// Parameters.
    Top,
    /// Constant and memory values.
    Bottom,
}

/// One connection point on a block edge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortSpec {
    /// Identifier wires use to attach to this port.
    pub id: String,
    /// Port name, empty for single-port blocks.
    pub name: String,
    /// Text shown next to the port: name plus range.
    pub label: String,
    /// Pin count.
    pub size: u32,
    /// Declared range, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<BitRange>,
    /// Set for composite inputs that forward a clock.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub clock: bool,
}

impl PortSpec {
    /// The anonymous connector of a single-port block.
    pub fn anonymous(id: &str, size: u32) -> Self {
        Self {
            id: id.to_string(),
            name: String::new(),
            label: String::new(),
            size,
            range: None,
            clock: false,
        }
    }

    /// A named port whose id is its name.
    pub fn named(name: &str, range: Option<BitRange>, size: u32) -> Self {
        Self {
            id: name.to_string(),
            name: name.to_string(),
            label: label_text(name, range),
            size,
            range,
            clock: false,
        }
    }
}

/// Ports grouped by edge.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ports {
    /// Left edge.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub left: Vec<PortSpec>,
    /// Right edge.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub right: Vec<PortSpec>,
    /// Top edge.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub top: Vec<PortSpec>,
    /// Bottom edge.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bottom: Vec<PortSpec>,
}

impl Ports {
    /// Ports on one edge.
    pub fn on(&self, side: Side) -> &[PortSpec] {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
            Side::Top => &self.top,
            Side::Bottom => &self.bottom,
        }
    }

    /// Every port with the edge it sits on.
    pub fn iter(&self) -> impl Iterator<Item = (Side, &PortSpec)> {
        [Side::Left, Side::Right, Side::Top, Side::Bottom]
            .into_iter()
            .flat_map(move |side| self.on(side).iter().map(move |port| (side, port)))
    }

    /// Total number of ports.
    pub fn len(&self) -> usize {
        self.left.len() + self.right.len() + self.top.len() + self.bottom.len()
    }

    /// Returns `true` when the block has no ports at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Data of an input or output port block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortData {
    /// Port name.
    pub name: String,
    /// Bus range, absent for a scalar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<BitRange>,
    /// One entry per bit.
    #[serde(default)]
    pub pins: Vec<Pin>,
    /// Not bound to a physical FPGA pin.
    #[serde(rename = "virtual", default)]
    pub is_virtual: bool,
    /// Marked as a clock input.
    #[serde(default)]
    pub clock: bool,
}

impl PortData {
    /// Pin count, never less than one.
    pub fn size(&self) -> u32 {
        u32::try_from(self.pins.len()).unwrap_or(u32::MAX).max(1)
    }
}

/// Data of an input or output label. Labels are always virtual.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelData {
    /// Label name.
    pub name: String,
    /// Bus range, absent for a scalar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<BitRange>,
    /// One entry per bit.
    #[serde(default)]
    pub pins: Vec<Pin>,
    /// Display color chosen by the user.
    #[serde(rename = "blockColor", default)]
    pub color: String,
}

impl LabelData {
    /// Pin count, never less than one.
    pub fn size(&self) -> u32 {
        u32::try_from(self.pins.len()).unwrap_or(u32::MAX).max(1)
    }
}

/// Data of a constant block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstantData {
    /// Parameter name.
    pub name: String,
    /// Value text as entered on the block.
    #[serde(default)]
    pub value: String,
    /// Local parameters are not exposed on an enclosing composite.
    #[serde(default)]
    pub local: bool,
}

/// Numeric base used to display memory addresses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum AddressFormat {
    /// Base 2.
    Binary,
    /// Base 10.
    #[default]
    Decimal,
    /// Base 16.
    Hexadecimal,
}

impl AddressFormat {
    /// The numeric base.
    pub fn radix(self) -> u8 {
        match self {
            AddressFormat::Binary => 2,
            AddressFormat::Decimal => 10,
            AddressFormat::Hexadecimal => 16,
        }
    }
}

impl TryFrom<u8> for AddressFormat {
    type Error = String;

    fn try_from(radix: u8) -> Result<Self, Self::Error> {
        match radix {
            2 => Ok(AddressFormat::Binary),
            10 => Ok(AddressFormat::Decimal),
            16 => Ok(AddressFormat::Hexadecimal),
            other => Err(format!("unsupported address format {other}, expected 2, 10 or 16")),
        }
    }
}

impl From<AddressFormat> for u8 {
    fn from(format: AddressFormat) -> Self {
        format.radix()
    }
}

/// Data of a memory block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryData {
    /// Parameter name.
    pub name: String,
    /// Memory contents as entered on the block.
    #[serde(default)]
    pub list: String,
    /// Local parameters are not exposed on an enclosing composite.
    #[serde(default)]
    pub local: bool,
    /// Address display base.
    #[serde(default)]
    pub format: AddressFormat,
}

/// A port declared on a code block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodePort {
    /// Port name.
    pub name: String,
    /// Bus range, absent for a scalar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<BitRange>,
    /// Pin count.
    #[serde(default = "one")]
    pub size: u32,
    /// Board default, only for unranged inputs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultHint>,
}

fn one() -> u32 {
    1
}

/// A parameter declared on a code block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamDecl {
    /// Parameter name.
    pub name: String,
}

/// Input and output ports of a code block.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodePorts {
    /// Inputs, left edge.
    #[serde(rename = "in", default)]
    pub inputs: Vec<CodePort>,
    /// Outputs, right edge.
    #[serde(rename = "out", default)]
    pub outputs: Vec<CodePort>,
}

/// Data of a code block.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeData {
    /// The HDL body.
    #[serde(default)]
    pub code: String,
    /// Parameters, top edge.
    #[serde(default)]
    pub params: Vec<ParamDecl>,
    /// Declared ports.
    #[serde(default)]
    pub ports: CodePorts,
}

/// Data of an annotation block.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoData {
    /// Source text.
    #[serde(default)]
    pub info: String,
    /// Read-only notes are shown translated.
    #[serde(default)]
    pub readonly: bool,
    /// Display text for read-only notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// An SVG payload and the key it is cached under.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    /// Cache key.
    pub hash: ContentHash,
    /// Decoded SVG markup.
    pub svg: String,
}

impl ImageRef {
    /// Hashes `svg` and wraps it.
    pub fn new(svg: String) -> Self {
        Self {
            hash: ContentHash::of_str(&svg),
            svg,
        }
    }

    /// File name used by the asset cache.
    pub fn file_name(&self) -> String {
        format!("{}.svg", self.hash)
    }
}

/// An unranged inner input of a composite, candidate for a board default.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImplicitInput {
    /// The inner block id.
    pub name: String,
    /// Board default, if a rule matched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultHint>,
}

/// Data of a composite block.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenericData {
    /// The composite's type name.
    pub type_name: String,
    /// Package name shown on the block.
    pub label: String,
    /// Package description, translated.
    #[serde(default)]
    pub tooltip: String,
    /// Embedded block image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
    /// Opaque configuration map from the package.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub config: BTreeMap<String, serde_json::Value>,
    /// Opaque pull-up map from the package.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub pullup: BTreeMap<String, serde_json::Value>,
    /// Unranged inner inputs.
    #[serde(default)]
    pub implicit_inputs: Vec<ImplicitInput>,
}

/// The closed set of block kinds, each with its own data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum BlockKind {
    /// Circuit input port.
    #[serde(rename = "basic.input")]
    Input(PortData),
    /// Circuit output port.
    #[serde(rename = "basic.output")]
    Output(PortData),
    /// Virtual boundary label with a left connector.
    #[serde(rename = "basic.inputLabel")]
    InputLabel(LabelData),
    /// Virtual boundary label with a right connector.
    #[serde(rename = "basic.outputLabel")]
    OutputLabel(LabelData),
    /// Constant parameter.
    #[serde(rename = "basic.constant")]
    Constant(ConstantData),
    /// Memory parameter.
    #[serde(rename = "basic.memory")]
    Memory(MemoryData),
    /// Custom HDL block.
    #[serde(rename = "basic.code")]
    Code(CodeData),
    /// Free-text annotation.
    #[serde(rename = "basic.info")]
    Info(InfoData),
    /// Composite built from a nested sub-circuit.
    #[serde(rename = "generic")]
    Generic(Box<GenericData>),
}

impl BlockKind {
    /// The type tag, e.g. `basic.input`; composites report their own type name.
    pub fn type_name(&self) -> &str {
        match self {
            BlockKind::Input(_) => "basic.input",
            BlockKind::Output(_) => "basic.output",
            BlockKind::InputLabel(_) => "basic.inputLabel",
            BlockKind::OutputLabel(_) => "basic.outputLabel",
            BlockKind::Constant(_) => "basic.constant",
            BlockKind::Memory(_) => "basic.memory",
            BlockKind::Code(_) => "basic.code",
            BlockKind::Info(_) => "basic.info",
            BlockKind::Generic(data) => &data.type_name,
        }
    }

    /// Returns `true` for label-only kinds.
    pub fn is_virtual(&self) -> bool {
        match self {
            BlockKind::Input(data) | BlockKind::Output(data) => data.is_virtual,
            BlockKind::InputLabel(_) | BlockKind::OutputLabel(_) => true,
            _ => false,
        }
    }

    /// Ports implied by the data of a basic kind. Composites return `None`
    /// because their ports come from the sub-circuit.
    pub fn basic_ports(&self) -> Option<Ports> {
        let mut ports = Ports::default();
        match self {
            BlockKind::Input(data) => {
                ports.right.push(PortSpec::anonymous(INPUT_PORT_ID, data.size()));
            }
            BlockKind::Output(data) => {
                ports.left.push(PortSpec::anonymous(OUTPUT_PORT_ID, data.size()));
            }
            BlockKind::InputLabel(data) => {
                ports
                    .left
                    .push(PortSpec::anonymous(INPUT_LABEL_PORT_ID, data.size()));
            }
            BlockKind::OutputLabel(data) => {
                ports
                    .right
                    .push(PortSpec::anonymous(OUTPUT_LABEL_PORT_ID, data.size()));
            }
            BlockKind::Constant(_) => ports.bottom.push(PortSpec::anonymous(CONSTANT_PORT_ID, 1)),
            BlockKind::Memory(_) => ports.bottom.push(PortSpec::anonymous(MEMORY_PORT_ID, 1)),
            BlockKind::Code(data) => {
                ports.left = data
                    .ports
                    .inputs
                    .iter()
                    .map(|p| PortSpec::named(&p.name, p.range, p.size))
                    .collect();
                ports.right = data
                    .ports
                    .outputs
                    .iter()
                    .map(|p| PortSpec::named(&p.name, p.range, p.size))
                    .collect();
                ports.top = data
                    .params
                    .iter()
                    .map(|p| PortSpec::named(&p.name, None, 1))
                    .collect();
            }
            BlockKind::Info(_) => {}
            BlockKind::Generic(_) => return None,
        }
        Some(ports)
    }
}

/// A complete, positioned block ready to hand to the rendering layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockDescriptor {
    /// Identity of the block in its circuit, `None` until the caller assigns one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Kind and kind-specific data.
    pub kind: BlockKind,
    /// Top-left anchor.
    #[serde(default)]
    pub position: Position,
    /// Explicit size, `None` to let the renderer size the block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    /// Connection points per edge.
    #[serde(default)]
    pub ports: Ports,
}

impl BlockDescriptor {
    /// Returns the block's type tag.
    pub fn type_name(&self) -> &str {
        self.kind.type_name()
    }

    /// Returns `true` if the block has the given id.
    pub fn has_id(&self, id: &str) -> bool {
        self.id.as_deref() == Some(id)
    }
}

/// Joins a name and its range the way port labels are displayed.
pub fn label_text(name: &str, range: Option<BitRange>) -> String {
    match range {
        Some(range) => format!("{name}{range}"),
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(pins: usize, is_virtual: bool) -> BlockKind {
        BlockKind::Input(PortData {
            name: "a".into(),
            range: None,
            pins: (0..pins as u32).map(Pin::empty).collect(),
            is_virtual,
            clock: false,
        })
    }

    #[test]
    fn input_exposes_right_port() {
        let ports = input(4, false).basic_ports().unwrap();
        assert_eq!(ports.right.len(), 1);
        assert_eq!(ports.right[0].id, INPUT_PORT_ID);
        assert_eq!(ports.right[0].size, 4);
        assert!(ports.left.is_empty());
    }

    #[test]
    fn missing_pins_count_as_one() {
        let ports = input(0, false).basic_ports().unwrap();
        assert_eq!(ports.right[0].size, 1);
    }

    #[test]
    fn code_ports_use_names_as_ids() {
        let kind = BlockKind::Code(CodeData {
            code: String::new(),
            params: vec![ParamDecl { name: "N".into() }],
            ports: CodePorts {
                inputs: vec![CodePort {
                    name: "a".into(),
                    range: Some(BitRange::new(3, 0)),
                    size: 4,
                    default: None,
                }],
                outputs: vec![],
            },
        });
        let ports = kind.basic_ports().unwrap();
        assert_eq!(ports.left[0].id, "a");
        assert_eq!(ports.left[0].label, "a[3:0]");
        assert_eq!(ports.top[0].label, "N");
        assert_eq!(ports.len(), 2);
        let sides: Vec<Side> = ports.iter().map(|(side, _)| side).collect();
        assert_eq!(sides, vec![Side::Left, Side::Top]);
    }

    #[test]
    fn virtuality() {
        assert!(input(1, true).is_virtual());
        assert!(!input(1, false).is_virtual());
        let label = BlockKind::OutputLabel(LabelData {
            name: "x".into(),
            range: None,
            pins: vec![],
            color: "fuchsia".into(),
        });
        assert!(label.is_virtual());
    }

    #[test]
    fn address_format_serde() {
        assert_eq!(serde_json::to_string(&AddressFormat::Hexadecimal).unwrap(), "16");
        let back: AddressFormat = serde_json::from_str("2").unwrap();
        assert_eq!(back, AddressFormat::Binary);
        assert!(serde_json::from_str::<AddressFormat>("8").is_err());
    }

    #[test]
    fn kind_is_tagged_by_type() {
        let json = serde_json::to_value(input(1, false)).unwrap();
        assert_eq!(json["type"], "basic.input");
        assert_eq!(json["data"]["name"], "a");
        assert_eq!(json["data"]["virtual"], false);
    }

    #[test]
    fn descriptor_roundtrips_through_json() {
        let block = BlockDescriptor {
            id: Some("b1".into()),
            kind: input(2, false),
            position: Position::new(8, 16),
            size: None,
            ports: input(2, false).basic_ports().unwrap(),
        };
        let json = serde_json::to_string(&block).unwrap();
        let back: BlockDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, block);
        assert!(back.has_id("b1"));
    }

    #[test]
    fn image_file_name_uses_hash() {
        let image = ImageRef::new("<svg/>".into());
        assert_eq!(image.file_name(), format!("{}.svg", image.hash));
    }
}

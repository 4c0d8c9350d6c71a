//! Block creation from label lists.
//!
//! Every creation flow parses its whole input before producing anything: one
//! bad entry fails the batch and no descriptor is returned. Blocks created
//! from one list are stacked so they don't overlap.

use crate::descriptor::{
    AddressFormat, BlockDescriptor, BlockKind, ConstantData, InfoData, LabelData, MemoryData,
    PortData, Position, Size,
};
use crate::error::{BlockError, BlockResult};
use crate::i18n::{Localizer, Passthrough};
use crate::label::{
    parse_param_list, parse_port_label_with, parse_port_list, split_names, Grammar, PortLabel,
};
use crate::pins::derive_pins;
use crate::rules::{BoardRules, InputRules};
use tessel_config::{RangeOrder, TesselConfig, DEFAULT_UNIT};

/// Default size of code and info blocks.
pub const CODE_SIZE: Size = Size {
    width: 192,
    height: 128,
};
/// Default size of memory blocks.
pub const MEMORY_SIZE: Size = Size {
    width: 96,
    height: 104,
};

/// Horizontal position of the output half of a label pair.
const PAIRED_LABEL_X: i32 = 100;

/// Everything the builder needs from configuration.
#[derive(Clone, Debug)]
pub struct BuildSettings {
    /// Layout grid constant.
    pub unit: i32,
    /// How ascending ranges such as `[0:7]` are treated.
    pub range_order: RangeOrder,
    /// Board defaults for well-known inputs.
    pub rules: BoardRules,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            unit: DEFAULT_UNIT,
            range_order: RangeOrder::default(),
            rules: BoardRules::default(),
        }
    }
}

impl BuildSettings {
    /// Reads the settings out of a loaded `tessel.toml`.
    pub fn from_config(config: &TesselConfig) -> Self {
        Self {
            unit: config.layout.unit,
            range_order: config.labels.range_order,
            rules: BoardRules::from_config(&config.rules),
        }
    }
}

/// Flags of an input port block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PortOptions {
    /// No physical FPGA pin behind the port.
    pub is_virtual: bool,
    /// The port carries a clock and must be a single bit.
    pub clock: bool,
}

/// Turns parsed labels into positioned block descriptors.
pub struct BlockBuilder {
    unit: i32,
    range_order: RangeOrder,
    rules: Box<dyn InputRules>,
    localizer: Box<dyn Localizer>,
}

impl Default for BlockBuilder {
    fn default() -> Self {
        Self::new(BuildSettings::default())
    }
}

impl BlockBuilder {
    /// Creates a builder with untranslated text.
    pub fn new(settings: BuildSettings) -> Self {
        Self {
            unit: settings.unit,
            range_order: settings.range_order,
            rules: Box::new(settings.rules),
            localizer: Box::new(Passthrough),
        }
    }

    /// Replaces the board rule set.
    pub fn with_rules(mut self, rules: impl InputRules + 'static) -> Self {
        self.rules = Box::new(rules);
        self
    }

    /// Replaces the translation backend.
    pub fn with_localizer(mut self, localizer: impl Localizer + 'static) -> Self {
        self.localizer = Box::new(localizer);
        self
    }

    /// The layout grid constant.
    pub fn unit(&self) -> i32 {
        self.unit
    }

    pub(crate) fn range_order(&self) -> RangeOrder {
        self.range_order
    }

    pub(crate) fn rules(&self) -> &dyn InputRules {
        self.rules.as_ref()
    }

    pub(crate) fn translate(&self, text: &str) -> String {
        self.localizer.translate(text)
    }

    /// Assembles a descriptor for a basic kind, deriving its ports from its data.
    ///
    /// Read-only info text is translated here. Composites get no ports from
    /// this path; use [`BlockBuilder::new_generic`](crate::BlockBuilder::new_generic).
    pub fn build(
        &self,
        id: Option<String>,
        kind: BlockKind,
        position: Position,
        size: Option<Size>,
    ) -> BlockDescriptor {
        let kind = match kind {
            BlockKind::Info(mut data) => {
                data.text = data.readonly.then(|| self.translate(&data.info));
                BlockKind::Info(data)
            }
            other => other,
        };
        let ports = kind.basic_ports().unwrap_or_default();
        BlockDescriptor {
            id,
            kind,
            position,
            size,
            ports,
        }
    }

    /// Parses one boundary port label and checks it against the clock flag.
    pub fn parse_port(&self, text: &str, clock: bool) -> BlockResult<PortLabel> {
        let label = parse_port_label_with(text, Grammar::Global, self.range_order)?;
        check_clock(&label, text, clock)?;
        Ok(label)
    }

    fn parse_ports(&self, names: &str, clock: bool) -> BlockResult<Vec<PortLabel>> {
        let labels = parse_port_list(names, Grammar::Global, self.range_order)?;
        for (label, text) in labels.iter().zip(split_names(names)) {
            check_clock(label, text, clock)?;
        }
        Ok(labels)
    }

    fn parse_params(&self, names: &str) -> BlockResult<Vec<String>> {
        let params = parse_param_list(names, Grammar::Global)?;
        Ok(params.into_iter().map(|param| param.name).collect())
    }

    fn port_step(&self, label: &PortLabel, is_virtual: bool) -> i32 {
        let rows = if is_virtual {
            10
        } else {
            let pins = i32::try_from(label.size()).unwrap_or(i32::MAX);
            pins.saturating_mul(4).saturating_add(6)
        };
        rows.saturating_mul(self.unit)
    }

    /// Creates one input block per name in a comma-separated list.
    pub fn new_inputs(&self, names: &str, options: PortOptions) -> BlockResult<Vec<BlockDescriptor>> {
        let labels = self.parse_ports(names, options.clock)?;
        let mut position = Position::default();
        let mut blocks = Vec::with_capacity(labels.len());
        for label in labels {
            let step = self.port_step(&label, options.is_virtual);
            let data = PortData {
                pins: derive_pins(&label),
                name: label.name,
                range: label.range,
                is_virtual: options.is_virtual,
                clock: options.clock,
            };
            blocks.push(self.build(None, BlockKind::Input(data), position, None));
            position = position.shifted_y(step);
        }
        log::debug!("created {} input block(s)", blocks.len());
        Ok(blocks)
    }

    /// Creates one output block per name in a comma-separated list.
    pub fn new_outputs(&self, names: &str, is_virtual: bool) -> BlockResult<Vec<BlockDescriptor>> {
        let labels = self.parse_ports(names, false)?;
        let mut position = Position::default();
        let mut blocks = Vec::with_capacity(labels.len());
        for label in labels {
            let step = self.port_step(&label, is_virtual);
            let data = PortData {
                pins: derive_pins(&label),
                name: label.name,
                range: label.range,
                is_virtual,
                clock: false,
            };
            blocks.push(self.build(None, BlockKind::Output(data), position, None));
            position = position.shifted_y(step);
        }
        log::debug!("created {} output block(s)", blocks.len());
        Ok(blocks)
    }

    fn label_data(label: &PortLabel, color: &str) -> LabelData {
        LabelData {
            name: label.name.clone(),
            range: label.range,
            pins: derive_pins(label),
            color: color.to_string(),
        }
    }

    fn new_labels(
        &self,
        names: &str,
        color: &str,
        make: fn(LabelData) -> BlockKind,
    ) -> BlockResult<Vec<BlockDescriptor>> {
        let labels = self.parse_ports(names, false)?;
        let step = self.unit.saturating_mul(10);
        let mut position = Position::default();
        let mut blocks = Vec::with_capacity(labels.len());
        for label in &labels {
            let kind = make(Self::label_data(label, color));
            blocks.push(self.build(None, kind, position, None));
            position = position.shifted_y(step);
        }
        Ok(blocks)
    }

    /// Creates one input label per name.
    pub fn new_input_labels(&self, names: &str, color: &str) -> BlockResult<Vec<BlockDescriptor>> {
        self.new_labels(names, color, BlockKind::InputLabel)
    }

    /// Creates one output label per name.
    pub fn new_output_labels(&self, names: &str, color: &str) -> BlockResult<Vec<BlockDescriptor>> {
        self.new_labels(names, color, BlockKind::OutputLabel)
    }

    /// Creates an input label and a matching output label per name, side by side.
    pub fn new_paired_labels(&self, names: &str, color: &str) -> BlockResult<Vec<BlockDescriptor>> {
        let labels = self.parse_ports(names, false)?;
        let step = self.unit.saturating_mul(10);
        let mut y = 0;
        let mut blocks = Vec::with_capacity(labels.len() * 2);
        for label in &labels {
            let input = BlockKind::InputLabel(Self::label_data(label, color));
            let output = BlockKind::OutputLabel(Self::label_data(label, color));
            blocks.push(self.build(None, input, Position::new(0, y), None));
            blocks.push(self.build(None, output, Position::new(PAIRED_LABEL_X, y), None));
            y = y.saturating_add(step);
        }
        Ok(blocks)
    }

    /// Creates one constant block per parameter name, left to right.
    pub fn new_constants(&self, names: &str, local: bool) -> BlockResult<Vec<BlockDescriptor>> {
        let params = self.parse_params(names)?;
        let step = self.unit.saturating_mul(15);
        let mut x = 0;
        let mut blocks = Vec::with_capacity(params.len());
        for name in params {
            let data = ConstantData {
                name,
                value: String::new(),
                local,
            };
            blocks.push(self.build(None, BlockKind::Constant(data), Position::new(x, 0), None));
            x = x.saturating_add(step);
        }
        Ok(blocks)
    }

    /// Creates one memory block per parameter name, left to right.
    pub fn new_memories(
        &self,
        names: &str,
        format: AddressFormat,
        local: bool,
    ) -> BlockResult<Vec<BlockDescriptor>> {
        let params = self.parse_params(names)?;
        let step = self.unit.saturating_mul(15);
        let mut x = 0;
        let mut blocks = Vec::with_capacity(params.len());
        for name in params {
            let data = MemoryData {
                name,
                list: String::new(),
                local,
                format,
            };
            let position = Position::new(x, 0);
            blocks.push(self.build(None, BlockKind::Memory(data), position, Some(MEMORY_SIZE)));
            x = x.saturating_add(step);
        }
        Ok(blocks)
    }

    /// Creates an empty, editable info block.
    pub fn new_info(&self) -> BlockDescriptor {
        self.build(
            None,
            BlockKind::Info(InfoData::default()),
            Position::default(),
            Some(CODE_SIZE),
        )
    }
}

fn check_clock(label: &PortLabel, text: &str, clock: bool) -> BlockResult<()> {
    if clock && label.is_bus() {
        return Err(BlockError::ClockRangeConflict {
            text: text.to_string(),
        });
    }
    Ok(())
}

//! Code blocks: ports and parameters declared as three comma lists.

use crate::builder::{BlockBuilder, CODE_SIZE};
use crate::descriptor::{
    label_text, BlockDescriptor, BlockKind, CodeData, CodePort, CodePorts, ParamDecl, Position,
};
use crate::error::{BlockError, BlockResult};
use crate::label::{parse_param_label, parse_port_label_with, split_declared, Grammar, PortLabel};
use crate::unique::check_unique;

/// The editable text form of a code block's declarations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodeFormFields {
    /// Input ports, e.g. `"a[3:0] , b"`.
    pub inputs: String,
    /// Output ports.
    pub outputs: String,
    /// Parameters.
    pub params: String,
}

/// Renders the declarations of a code block back to the text the user edits.
pub fn code_form_fields(data: &CodeData) -> CodeFormFields {
    let ports = |ports: &[CodePort]| {
        ports
            .iter()
            .map(|port| label_text(&port.name, port.range))
            .collect::<Vec<_>>()
            .join(" , ")
    };
    CodeFormFields {
        inputs: ports(&data.ports.inputs),
        outputs: ports(&data.ports.outputs),
        params: data
            .params
            .iter()
            .map(|param| param.name.as_str())
            .collect::<Vec<_>>()
            .join(" , "),
    }
}

impl BlockBuilder {
    fn parse_code_ports(&self, text: &str) -> BlockResult<Vec<PortLabel>> {
        split_declared(text)
            .map(|entry| parse_port_label_with(entry, Grammar::Local, self.range_order()))
            .collect()
    }

    /// Parses and validates the three declaration lists of a code block.
    ///
    /// Empty entries are ignored. At least one input or output is required,
    /// and all names, parameters included, must be distinct.
    pub fn code_data(
        &self,
        code: String,
        inputs: &str,
        outputs: &str,
        params: &str,
    ) -> BlockResult<CodeData> {
        let inputs = self.parse_code_ports(inputs)?;
        let outputs = self.parse_code_ports(outputs)?;
        if inputs.is_empty() && outputs.is_empty() {
            return Err(BlockError::InsufficientPorts);
        }
        let params = split_declared(params)
            .map(|entry| parse_param_label(entry, Grammar::Local))
            .collect::<BlockResult<Vec<_>>>()?;

        let names = inputs
            .iter()
            .chain(&outputs)
            .map(|label| label.name.as_str())
            .chain(params.iter().map(|param| param.name.as_str()));
        check_unique(names)?;

        let inputs = inputs
            .into_iter()
            .map(|label| {
                let default = if label.range.is_none() {
                    self.rules().default_for(&label.name)
                } else {
                    None
                };
                CodePort {
                    size: label.size(),
                    name: label.name,
                    range: label.range,
                    default,
                }
            })
            .collect();
        let outputs = outputs
            .into_iter()
            .map(|label| CodePort {
                size: label.size(),
                name: label.name,
                range: label.range,
                default: None,
            })
            .collect();
        let params = params
            .into_iter()
            .map(|param| ParamDecl { name: param.name })
            .collect();

        Ok(CodeData {
            code,
            params,
            ports: CodePorts { inputs, outputs },
        })
    }

    /// Creates an empty code block with the declared ports and parameters.
    pub fn new_code(&self, inputs: &str, outputs: &str, params: &str) -> BlockResult<BlockDescriptor> {
        let data = self.code_data(String::new(), inputs, outputs, params)?;
        log::debug!(
            "created code block with {} input(s), {} output(s), {} parameter(s)",
            data.ports.inputs.len(),
            data.ports.outputs.len(),
            data.params.len()
        );
        Ok(self.build(None, BlockKind::Code(data), Position::default(), Some(CODE_SIZE)))
    }
}

//! Ports, port references, and connections.
//!
//! Port values live in a [`PortBank`] owned by the graph (and, after
//! compilation, by the render program). Nodes never hold references to each
//! other's ports; an input only remembers which output it reads from.

use crate::node::NodeId;

/// Index of an output port in a [`PortBank`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct OutputId(u32);

impl OutputId {
    /// The always-silent source every input starts out mapped to.
    pub const SILENCE: OutputId = OutputId(0);
}

/// Index of an input port in a [`PortBank`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct InputId(u32);

/// A port producing one value per tick.
#[derive(Clone, Debug)]
pub struct OutputPort {
    /// Node that writes this port; `None` only for the silence source.
    pub owner: Option<NodeId>,
    pub value: f32,
}

/// A port consuming whatever its mapped source produced this tick.
#[derive(Clone, Debug)]
pub struct InputPort {
    pub owner: NodeId,
    /// Never dangling: unconnected inputs read [`OutputId::SILENCE`].
    pub source: OutputId,
}

/// Arena of every port in a graph.
#[derive(Clone, Debug)]
pub struct PortBank {
    outputs: Vec<OutputPort>,
    inputs: Vec<InputPort>,
}

impl PortBank {
    pub(crate) fn new() -> Self {
        Self {
            outputs: vec![OutputPort {
                owner: None,
                value: 0.0,
            }],
            inputs: Vec::new(),
        }
    }

    pub(crate) fn add_output(&mut self, owner: NodeId) -> OutputId {
        let id = OutputId(self.outputs.len() as u32);
        self.outputs.push(OutputPort {
            owner: Some(owner),
            value: 0.0,
        });
        id
    }

    pub(crate) fn add_input(&mut self, owner: NodeId) -> InputId {
        let id = InputId(self.inputs.len() as u32);
        self.inputs.push(InputPort {
            owner,
            source: OutputId::SILENCE,
        });
        id
    }

    /// Point `input` at `source`, returning the previous mapping.
    pub(crate) fn map(&mut self, input: InputId, source: OutputId) -> OutputId {
        std::mem::replace(&mut self.inputs[input.0 as usize].source, source)
    }

    pub fn output(&self, id: OutputId) -> &OutputPort {
        &self.outputs[id.0 as usize]
    }

    pub fn input(&self, id: InputId) -> &InputPort {
        &self.inputs[id.0 as usize]
    }

    /// Current value seen by an input (its mapped source's value).
    #[inline]
    pub fn read(&self, input: InputId) -> f32 {
        self.outputs[self.inputs[input.0 as usize].source.0 as usize].value
    }

    #[inline]
    pub(crate) fn write(&mut self, output: OutputId, value: f32) {
        debug_assert_ne!(output, OutputId::SILENCE, "the silence source is read-only");
        self.outputs[output.0 as usize].value = value;
    }
}

/// Reference to an output port of a node, obtained from a [`Handle`](crate::Handle).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct OutputRef {
    pub node: NodeId,
    pub port: usize,
}

/// Reference to an input port of a node, obtained from a [`Handle`](crate::Handle).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct InputRef {
    pub node: NodeId,
    pub port: usize,
}

/// A directed edge from one node's output to another node's input.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Connection {
    pub source: OutputRef,
    pub destination: InputRef,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(index: u32) -> NodeId {
        NodeId { graph: 0, index }
    }

    #[test]
    fn unconnected_inputs_read_silence() {
        let mut bank = PortBank::new();
        let out = bank.add_output(node(0));
        let input = bank.add_input(node(1));
        bank.write(out, 0.75);

        assert_eq!(bank.input(input).source, OutputId::SILENCE);
        assert_eq!(bank.read(input), 0.0);
        assert_eq!(bank.output(OutputId::SILENCE).owner, None);
    }

    #[test]
    fn latest_mapping_wins() {
        let mut bank = PortBank::new();
        let a = bank.add_output(node(0));
        let b = bank.add_output(node(1));
        let input = bank.add_input(node(2));
        bank.write(a, 1.0);
        bank.write(b, 2.0);

        assert_eq!(bank.map(input, a), OutputId::SILENCE);
        assert_eq!(bank.read(input), 1.0);
        assert_eq!(bank.map(input, b), a);
        assert_eq!(bank.read(input), 2.0);
        assert_eq!(bank.output(b).owner, Some(node(1)));
    }
}

//! Audio graph - owns nodes, ports, and connections, and compiles them into a render order

use core::marker::PhantomData;
use std::sync::atomic::{AtomicU32, Ordering};

use hashbrown::HashMap;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use tracing::{debug, trace, warn};

use crate::error::{CycleError, Error, PortDirection, Result};
use crate::node::{Node, NodeId, ProcessContext, Render};
use crate::port::{Connection, InputId, InputRef, OutputId, OutputRef, PortBank};
use crate::program::RenderProgram;

static NEXT_GRAPH_ID: AtomicU32 = AtomicU32::new(0);

/// A node together with the ports it created.
pub(crate) struct Slot {
    pub(crate) node: Node,
    pub(crate) inputs: Vec<InputId>,
    pub(crate) outputs: Vec<OutputId>,
}

type Topology = DiGraph<Slot, Connection>;

/// A typed reference to a node added to a [`Graph`].
///
/// Handles hand out port references for [`Graph::connect`]. Each built-in node
/// kind adds named accessors (e.g. [`Handle<Mixer>::mix`](crate::nodes::Mixer)),
/// and [`input`](Self::input)/[`output`](Self::output) work for any node.
pub struct Handle<N> {
    id: NodeId,
    _marker: PhantomData<fn() -> N>,
}

impl<N> Handle<N> {
    pub(crate) fn new(id: NodeId) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The `port`-th input of this node.
    pub fn input(&self, port: usize) -> InputRef {
        InputRef {
            node: self.id,
            port,
        }
    }

    /// The `port`-th output of this node.
    pub fn output(&self, port: usize) -> OutputRef {
        OutputRef {
            node: self.id,
            port,
        }
    }
}

impl<N> Clone for Handle<N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N> Copy for Handle<N> {}

impl<N> core::fmt::Debug for Handle<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Handle").field(&self.id).finish()
    }
}

/// A fixed topology of nodes under construction.
///
/// Add nodes with [`add`](Self::add), wire them with [`connect`](Self::connect),
/// then turn the graph into a [`RenderProgram`] with [`compile`](Self::compile).
/// Compilation consumes the graph, so a topology can't change once it renders.
///
/// ```
/// use klangwerk::{Graph, ProcessContext};
/// use klangwerk::nodes::{Combiner, Oscillator};
///
/// let ctx = ProcessContext::default();
/// let mut graph = Graph::with_context(ctx);
/// let osc = graph.add(Oscillator::new(&ctx, 440.0)?);
/// let sum = graph.add(Combiner::new(0.5, 0.5)?);
/// graph.connect(osc.output(0), sum.first())?;
///
/// let mut program = graph.compile()?;
/// program.run(64)?;
/// # Ok::<(), klangwerk::Error>(())
/// ```
pub struct Graph {
    id: u32,
    ctx: ProcessContext,
    topology: Topology,
    ports: PortBank,
}

impl Graph {
    /// Create an empty graph at the default sample rate.
    pub fn new() -> Self {
        Self::with_context(ProcessContext::default())
    }

    /// Create an empty graph for nodes built with `ctx`.
    pub fn with_context(ctx: ProcessContext) -> Self {
        Self {
            id: NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed),
            ctx,
            topology: Topology::with_capacity(16, 32),
            ports: PortBank::new(),
        }
    }

    pub fn context(&self) -> ProcessContext {
        self.ctx
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.topology.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.topology.node_count() == 0
    }

    /// Every recorded connection, in the order they were made.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> + '_ {
        self.topology.raw_edges().iter().map(|edge| &edge.weight)
    }

    pub fn ports(&self) -> &PortBank {
        &self.ports
    }

    /// Add a node, creating its ports. Returns a handle for connecting it.
    pub fn add<N: Into<Node>>(&mut self, node: N) -> Handle<N> {
        let node = node.into();
        let id = NodeId {
            graph: self.id,
            index: self.topology.node_count() as u32,
        };

        let inputs = (0..node.num_inputs())
            .map(|_| self.ports.add_input(id))
            .collect();
        let outputs = (0..node.num_outputs())
            .map(|_| self.ports.add_output(id))
            .collect();

        trace!(node = id.index(), kind = node.kind(), "added node");
        let idx = self.topology.add_node(Slot {
            node,
            inputs,
            outputs,
        });
        debug_assert_eq!(idx.index(), id.index());

        Handle::new(id)
    }

    /// Connect `source` to `destination`.
    ///
    /// The destination's previous mapping (if any) is replaced: the latest
    /// connection wins. The earlier connection stays recorded and still counts
    /// as a dependency when compiling.
    pub fn connect(&mut self, source: OutputRef, destination: InputRef) -> Result<Connection> {
        let output = self.output_id(source)?;
        let input = self.input_id(destination)?;

        let previous = self.ports.map(input, output);
        if previous != OutputId::SILENCE {
            warn!(
                node = destination.node.index(),
                port = destination.port,
                "input already connected; replacing its source"
            );
        }

        let connection = Connection {
            source,
            destination,
        };
        self.topology.add_edge(
            NodeIndex::new(source.node.index()),
            NodeIndex::new(destination.node.index()),
            connection,
        );
        trace!(
            from = source.node.index(),
            to = destination.node.index(),
            "connected"
        );

        Ok(connection)
    }

    /// Compute the order in which nodes must render.
    ///
    /// Each pass walks the pending nodes in insertion order and emits every
    /// node whose dependencies have all been emitted, including ones emitted
    /// earlier in the same pass. A pass that emits nothing means the rest of
    /// the graph is cyclic.
    pub fn render_order(&self) -> core::result::Result<Vec<NodeId>, CycleError> {
        let mut dependencies: HashMap<NodeIndex, Vec<NodeIndex>> = self
            .topology
            .node_indices()
            .map(|idx| (idx, Vec::new()))
            .collect();
        for edge in self.topology.edge_references() {
            dependencies
                .entry(edge.target())
                .or_default()
                .push(edge.source());
        }

        let mut pending: Vec<NodeIndex> = self.topology.node_indices().collect();
        let mut resolved = vec![false; pending.len()];
        let mut order = Vec::with_capacity(pending.len());

        while !pending.is_empty() {
            let before = pending.len();

            pending.retain(|&idx| {
                let ready = dependencies[&idx].iter().all(|dep| resolved[dep.index()]);
                if ready {
                    resolved[idx.index()] = true;
                    order.push(self.node_id(idx));
                }
                !ready
            });

            if pending.len() == before {
                return Err(CycleError {
                    unresolved: pending.iter().map(|&idx| self.node_id(idx)).collect(),
                });
            }
        }

        Ok(order)
    }

    /// Compile the graph into a program that renders one tick at a time.
    pub fn compile(self) -> Result<RenderProgram> {
        let order = self.render_order()?;
        debug!(
            order = ?order.iter().map(|id| id.index()).collect::<Vec<_>>(),
            "compiled render program"
        );

        let slots = self
            .topology
            .into_nodes_edges()
            .0
            .into_iter()
            .map(|node| node.weight)
            .collect();

        Ok(RenderProgram::new(
            self.id,
            self.ctx,
            slots,
            order.iter().map(NodeId::index).collect(),
            self.ports,
        ))
    }

    fn node_id(&self, idx: NodeIndex) -> NodeId {
        NodeId {
            graph: self.id,
            index: idx.index() as u32,
        }
    }

    fn slot(&self, node: NodeId) -> Result<&Slot> {
        if node.graph != self.id {
            return Err(Error::ForeignNode(node));
        }
        self.topology
            .node_weight(NodeIndex::new(node.index()))
            .ok_or(Error::ForeignNode(node))
    }

    fn output_id(&self, output: OutputRef) -> Result<OutputId> {
        self.slot(output.node)?
            .outputs
            .get(output.port)
            .copied()
            .ok_or(Error::NoSuchPort {
                node: output.node,
                port: output.port,
                direction: PortDirection::Output,
            })
    }

    fn input_id(&self, input: InputRef) -> Result<InputId> {
        self.slot(input.node)?
            .inputs
            .get(input.port)
            .copied()
            .ok_or(Error::NoSuchPort {
                node: input.node,
                port: input.port,
                direction: PortDirection::Input,
            })
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

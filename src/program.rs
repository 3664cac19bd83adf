//! Render scheduler - runs a compiled graph one tick at a time

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{error, info};

use crate::error::{Error, PortDirection, Result};
use crate::graph::Slot;
use crate::node::{NodeId, ProcessContext, Render};
use crate::port::{OutputRef, PortBank};

/// Cooperative cancellation for [`RenderProgram::run_until`].
///
/// Clones share the same flag, so one can be handed to another thread (a UI,
/// a signal handler) while the render loop checks it between ticks.
#[derive(Clone, Debug, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the render loop to stop after the tick in progress.
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Clear the flag so the signal can be reused.
    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

/// A compiled graph: nodes in dependency order plus their port values.
///
/// Each [`tick`](Self::tick) renders every node exactly once, in compiled
/// order, so a node always sees this tick's output of everything it depends
/// on. Ticks run strictly one after another on the calling thread.
///
/// Device sinks are opened lazily by the first tick (or explicitly with
/// [`start`](Self::start)) and closed by [`finish`](Self::finish) or on drop.
///
/// A sink failure aborts the tick in progress. The nodes that already
/// rendered have moved on, so the aborted tick still counts and its sample
/// is lost. The program then refuses to render with [`Error::Halted`] until
/// it is finished and started again.
pub struct RenderProgram {
    graph: u32,
    ctx: ProcessContext,
    /// Nodes in insertion order, so a `NodeId` indexes straight into it.
    slots: Vec<Slot>,
    /// Render order as indices into `slots`.
    order: Vec<usize>,
    ports: PortBank,

    inputs: Vec<f32>,
    outputs: Vec<f32>,

    ticks: u64,
    open: bool,
    halted: bool,
}

impl RenderProgram {
    pub(crate) fn new(
        graph: u32,
        ctx: ProcessContext,
        slots: Vec<Slot>,
        order: Vec<usize>,
        ports: PortBank,
    ) -> Self {
        Self {
            graph,
            ctx,
            slots,
            order,
            ports,
            inputs: Vec::with_capacity(4),
            outputs: Vec::with_capacity(4),
            ticks: 0,
            open: false,
            halted: false,
        }
    }

    pub fn context(&self) -> ProcessContext {
        self.ctx
    }

    /// Ticks rendered so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// The compiled render order.
    pub fn order(&self) -> Vec<NodeId> {
        self.order
            .iter()
            .map(|&index| NodeId {
                graph: self.graph,
                index: index as u32,
            })
            .collect()
    }

    pub fn ports(&self) -> &PortBank {
        &self.ports
    }

    /// Current value of any output port (what was produced by the last tick).
    pub fn output_value(&self, output: OutputRef) -> Result<f32> {
        if output.node.graph != self.graph {
            return Err(Error::ForeignNode(output.node));
        }
        let slot = self
            .slots
            .get(output.node.index())
            .ok_or(Error::ForeignNode(output.node))?;
        let id = slot.outputs.get(output.port).ok_or(Error::NoSuchPort {
            node: output.node,
            port: output.port,
            direction: PortDirection::Output,
        })?;
        Ok(self.ports.output(*id).value)
    }

    /// Open every node that talks to a device. Does nothing if already open.
    ///
    /// If one sink fails to open, the ones opened before it are closed again.
    pub fn start(&mut self) -> Result<()> {
        if self.open {
            return Ok(());
        }

        for i in 0..self.slots.len() {
            if let Err(err) = self.slots[i].node.open() {
                error!(node = i, kind = self.slots[i].node.kind(), %err, "failed to open");
                for slot in self.slots[..i].iter_mut() {
                    slot.node.close();
                }
                return Err(err.into());
            }
        }

        self.open = true;
        info!(
            nodes = self.slots.len(),
            sample_rate = self.ctx.sample_rate,
            "render program started"
        );
        Ok(())
    }

    /// Whether a sink failure has stopped rendering.
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Close every node, letting sinks play out what they have buffered.
    ///
    /// Also clears a halt, so the next tick reopens the sinks.
    pub fn finish(&mut self) {
        if !self.open {
            return;
        }
        self.halted = false;

        for slot in self.slots.iter_mut() {
            slot.node.close();
        }
        self.open = false;
        info!(ticks = self.ticks, "render program finished");
    }

    /// Render one tick: every node once, in compiled order.
    pub fn tick(&mut self) -> Result<()> {
        if self.halted {
            return Err(Error::Halted);
        }
        if !self.open {
            self.start()?;
        }

        for &index in &self.order {
            let slot = &mut self.slots[index];

            self.inputs.clear();
            self.inputs
                .extend(slot.inputs.iter().map(|&id| self.ports.read(id)));
            self.outputs.clear();
            self.outputs
                .extend(slot.outputs.iter().map(|&id| self.ports.output(id).value));

            if let Err(err) = slot.node.render(&self.inputs, &mut self.outputs) {
                error!(
                    node = index,
                    kind = slot.node.kind(),
                    tick = self.ticks,
                    %err,
                    "render failed"
                );
                self.ticks += 1;
                self.halted = true;
                return Err(err.into());
            }

            for (&id, &value) in slot.outputs.iter().zip(self.outputs.iter()) {
                self.ports.write(id, value);
            }
        }

        self.ticks += 1;
        Ok(())
    }

    /// Render `ticks` ticks back to back.
    pub fn run(&mut self, ticks: u64) -> Result<()> {
        for _ in 0..ticks {
            self.tick()?;
        }
        Ok(())
    }

    /// Render `seconds` worth of ticks at the program's sample rate.
    pub fn run_for(&mut self, seconds: f64) -> Result<()> {
        self.run(self.ctx.ticks_for(seconds))
    }

    /// Render up to `ticks` ticks, checking `stop` before each one.
    ///
    /// Returns how many ticks were rendered.
    pub fn run_until(&mut self, ticks: u64, stop: &StopSignal) -> Result<u64> {
        let mut rendered = 0;
        while rendered < ticks && !stop.is_stopped() {
            self.tick()?;
            rendered += 1;
        }
        Ok(rendered)
    }

    /// Open the sinks, render `seconds` of audio, then close them.
    ///
    /// Sinks are closed even if rendering fails; the error is returned afterwards.
    pub fn play(&mut self, seconds: f64) -> Result<()> {
        self.start()?;
        let result = self.run_for(seconds);
        self.finish();
        result
    }
}

impl Drop for RenderProgram {
    fn drop(&mut self) {
        self.finish();
    }
}

/// What a node needs to know to render one block of a struck key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderCtx {
    pub sample_rate: f32,
    /// Pitch in Hz, straight from the note table
    pub frequency: f32,
}

impl RenderCtx {
    pub fn new(sample_rate: f32, frequency: f32) -> Self {
        Self {
            sample_rate,
            frequency,
        }
    }
}

/// Core trait for audio processing graph nodes
///
/// A node renders mono blocks and hears when its key is struck or cut off.
/// Piano keys have no velocity: every strike is full strength.
pub trait GraphNode: Send {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx);

    /// The key was struck. Default does nothing (stateless nodes).
    fn note_on(&mut self, _ctx: &RenderCtx) {}

    /// The tone was cut off before or at the end of its window.
    fn note_off(&mut self, _ctx: &RenderCtx) {}

    /// Current envelope gain, if this node (or one inside it) has an envelope
    fn get_envelope_level(&self) -> Option<f32> {
        None
    }

    /// Whether the node would still make sound if left running
    fn is_active(&self) -> bool {
        true
    }
}

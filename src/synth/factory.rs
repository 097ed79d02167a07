use crate::graph::node::GraphNode;

/// Builds the voices that fill a [`PolySynth`](super::PolySynth) pool.
///
/// Every voice in the pool comes from the same factory, so all keys share one
/// tone shape. Any `Fn() -> impl GraphNode` closure is a factory.
pub trait VoiceFactory: Send {
    type Voice: GraphNode;

    fn create_voice(&self) -> Self::Voice;
}

impl<F, T> VoiceFactory for F
where
    F: Fn() -> T + Send,
    T: GraphNode,
{
    type Voice = T;

    fn create_voice(&self) -> T {
        self()
    }
}

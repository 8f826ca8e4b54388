use crate::graph::{amplify::Amplify, node::GraphNode, through::Through};

pub trait NodeExt: GraphNode + Sized {
    fn amplify<M: GraphNode>(self, envelope: M, gain: f32) -> Amplify<Self, M> {
        Amplify::new(self, envelope, gain)
    }

    fn through<F: GraphNode>(self, effect: F) -> Through<Self, F> {
        Through::new(self, effect)
    }
}

impl<T: GraphNode> NodeExt for T {}

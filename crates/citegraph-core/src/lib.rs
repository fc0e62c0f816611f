//! Citegraph Core — citation DAG with transactional mutation

pub mod error;
pub mod graph;
pub mod journal;
pub mod model;
pub mod publication;
pub mod registry;
pub mod shape;



pub use error::{GraphError, Result};
pub use graph::CitationGraph;
pub use publication::Publication;
pub use shape::{GraphShape, NodeShape};

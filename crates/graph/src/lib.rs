pub mod assemble;
pub mod layout;
pub mod mermaid;
pub mod plot;
pub mod summary;

pub use assemble::{EntityNode, KnowledgeGraph, RelationEdge, assemble};
pub use layout::{LayoutConfig, spring_layout};
pub use mermaid::{render_markdown, render_mermaid, write_markdown};
pub use plot::{PlotConfig, render_png};
pub use summary::{GraphSummary, describe_edges, describe_nodes};

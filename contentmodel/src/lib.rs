//! Bidirectional transducer between styled markup and a content model
//!
//!     A rich-text editor keeps its document in a structured Content Model and shows it as a
//!     styled markup tree. This crate converts in both directions: it reads a tree of elements
//!     with inline styles into the model, and writes a model back out as a tree. A selection
//!     travels with the content each way: positions in the source tree become flags on the
//!     segments they cover, and those flags become positions in the produced tree.
//!
//!     This is a pure lib, no code here supposes a shell environment (printing, env vars, files).
//!     The CLI lives in contentmodel-cli.
//!
//! Architecture
//!
//!     Source tree ──▶ builder ──▶ normalize ──▶ ContentModel ──▶ serializer ──▶ output tree
//!                     ▲    ▲                                        │
//!                resolver  selection tracker                selection recorder
//!                          table placement                  span compaction
//!
//!     The file structure :
//!     .
//!     ├── dom                     # SourceNode, Element, inline Style, Position, Selection
//!     ├── model                   # ContentModel, blocks, segments, formats, selection queries
//!     ├── resolver                # Tag table, style → format handlers and their write-back
//!     ├── selection.rs            # Selection tracking (build) and recording (serialize)
//!     ├── table.rs                # Span placement and compaction
//!     ├── builder                 # Source tree → model walk
//!     ├── normalize.rs            # Post-build cleanup
//!     ├── serializer              # Model → output tree through an OutputFactory
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     └── formats
//!         ├── html                # html5ever parsing, rcdom serialization
//!         ├── json                # serde dump of the model
//!         └── treeviz             # Tree view of models and source trees
//!
//! Core Algorithms
//!
//!     Format resolution: every element's format is derived from its parent's by running an ordered
//!     list of handlers over the element's effective style (its inline style over the tag's default
//!     style). Formats are values; each scope works on its own copy.
//!
//!     Selection mapping: the builder advances a small state machine at every boundary it passes
//!     (before each child, at each text offset, after the last child). Segments built while the
//!     machine is inside the range are selected; a collapsed range leaves a selection marker.
//!
//!     Table reconstruction: cells with row and column spans are placed into a dense grid, each
//!     covered slot becoming a span marker pointing back at its origin. Serialization compacts the
//!     grid back into spans.
//!
//! Testing
//!     tests
//!     ├── lib.rs
//!     └── <area>.rs
//!
//!     Unit tests sit next to the code; tests/ holds end to end scenarios through the public API.

pub mod builder;
pub mod dom;
pub mod error;
pub mod format;
pub mod formats;
pub mod model;
pub mod normalize;
pub mod registry;
pub mod resolver;
pub mod selection;
pub mod serializer;
pub mod table;

pub use builder::{build_model, build_model_with_options, BuildOptions};
pub use dom::{Element, Position, Selection, SourceNode, Style};
pub use error::FormatError;
pub use format::Format;
pub use model::ContentModel;
pub use normalize::normalize_model;
pub use registry::FormatRegistry;
pub use serializer::{
    serialize_model, serialize_model_with_options, serialize_to_source, OutputFactory,
    SerializeOptions, Serialized, SourceTreeFactory,
};

mod generate;

pub use generate::{
    generate, generate_str, generate_stream, seeded_registry, GeneratedDocument, StreamSummary,
};

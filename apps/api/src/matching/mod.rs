// Resume ranking engine.
// Implements: skill extraction, lexical similarity, hybrid scoring, batch fan-out, ranking.
// Handlers are the only part that knows about HTTP.

pub mod batch;
pub mod handlers;
pub mod hybrid;
pub mod models;
pub mod ranker;
pub mod similarity;
pub mod skill_extractor;
pub mod taxonomy;
pub mod tokenize;

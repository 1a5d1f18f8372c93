pub mod ranker;

pub use ranker::{RankedEntity, Ranker};

// Symbol Model - the closed vocabulary of a chart
//
// Each symbol is a closed enum:
// - Element / Polarity: the five phases and yin/yang
// - Stem (10) and Branch (12): cyclic, with fixed element tables
// - Pillar: a parity-matched (stem, branch) pair of the sexagenary cycle

pub mod element;
pub mod stem;
pub mod branch;
pub mod pillar;

pub use element::{Element, Polarity};
pub use stem::Stem;
pub use branch::Branch;
pub use pillar::{Pillar, CYCLE_LEN};

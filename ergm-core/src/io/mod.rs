//! File formats: Pajek networks, attribute tables, and per-node integer
//! vectors (snowball zones, citation terms).

mod attrs;
mod nodefile;
mod pajek;

pub use attrs::{
    AttributeFileError, read_binary_attributes, read_categorical_attributes,
    read_continuous_attributes, read_set_attributes,
};
pub use nodefile::{NodeFileError, read_node_integers};
pub use pajek::{NetworkFileError, PajekNetwork, read_pajek, write_pajek};

//! Kernel device-node discovery and sysfs control-node access.

mod resolver;
mod sysfs;

pub use resolver::{AccessMethod, NodeInfo, NodeQuery, Resolver};
pub use sysfs::{read_node_value, set_enable_node, write_node_value};

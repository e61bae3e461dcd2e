mod arena;
mod handle;
mod node;
mod raw_tree_map;

pub(crate) use node::Side;
pub(crate) use raw_tree_map::RawTreeMap;

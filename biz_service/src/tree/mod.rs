pub mod menu_actions;
pub mod resource_tree;
pub mod tree_controller;

pub use menu_actions::{available_actions, BrowseMode, Capabilities, MenuAction, NodeContext};
pub use resource_tree::{MenuNode, ResourceTree, TreeGroups};
pub use tree_controller::{MoveOutcome, ParentPolicy, ResourceTreeController, TreeState};
